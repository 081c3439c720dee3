//! Session context reduction.
//!
//! Merges the parameters extracted on each turn into the running
//! `SessionContext`: a present, non-blank value wins, otherwise the previous
//! value is kept.

use serde::{Deserialize, Serialize};

use campus_core::types::{Level, SessionContext};

/// Parameters the oracle extracted from a single turn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedParams {
    pub department: Option<String>,
    pub level: Option<Level>,
    pub course_code: Option<String>,
}

impl ExtractedParams {
    /// The extracted department, if non-blank.
    pub fn department(&self) -> Option<&str> {
        self.department.as_deref().filter(|d| !d.trim().is_empty())
    }

    /// The extracted level, if non-blank.
    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref().filter(|l| !l.as_str().trim().is_empty())
    }

    /// The extracted course code, if non-blank.
    pub fn course_code(&self) -> Option<&str> {
        self.course_code.as_deref().filter(|c| !c.trim().is_empty())
    }

    /// True when nothing usable was extracted.
    pub fn is_empty(&self) -> bool {
        self.department().is_none() && self.level().is_none() && self.course_code().is_none()
    }
}

/// Fold one turn's extraction into the current context.
///
/// Pure and total. Each field takes the extracted value when it is present
/// and non-blank, otherwise keeps the current value. The extracted course
/// code becomes `last_course_code`.
pub fn reduce(current: &SessionContext, extracted: &ExtractedParams) -> SessionContext {
    SessionContext {
        department: extracted
            .department()
            .map(str::to_string)
            .or_else(|| current.department.clone()),
        level: extracted.level().cloned().or_else(|| current.level.clone()),
        last_course_code: extracted
            .course_code()
            .map(str::to_string)
            .or_else(|| current.last_course_code.clone()),
    }
}

/// The context after an explicit reset.
pub fn reset() -> SessionContext {
    SessionContext::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn department(name: &str) -> ExtractedParams {
        ExtractedParams {
            department: Some(name.to_string()),
            ..ExtractedParams::default()
        }
    }

    fn full_context() -> SessionContext {
        SessionContext {
            department: Some("Computer Engineering".to_string()),
            level: Some(Level::L300),
            last_course_code: Some("CPE 301".to_string()),
        }
    }

    #[test]
    fn test_new_value_wins() {
        let ctx = reduce(&full_context(), &department("Electrical Engineering"));
        assert_eq!(ctx.department.as_deref(), Some("Electrical Engineering"));
        assert_eq!(ctx.level, Some(Level::L300));
        assert_eq!(ctx.last_course_code.as_deref(), Some("CPE 301"));
    }

    #[test]
    fn test_no_extraction_keeps_everything() {
        let ctx = reduce(&full_context(), &ExtractedParams::default());
        assert_eq!(ctx, full_context());
    }

    #[test]
    fn test_blank_values_count_as_absent() {
        let extracted = ExtractedParams {
            department: Some("   ".to_string()),
            level: Some(Level::Other(String::new())),
            course_code: Some(String::new()),
        };
        assert!(extracted.is_empty());
        assert_eq!(reduce(&full_context(), &extracted), full_context());
    }

    #[test]
    fn test_absent_field_never_populated() {
        let mut ctx = SessionContext::default();
        let sequence = [
            department("Computer Engineering"),
            ExtractedParams {
                course_code: Some("CPE 409".to_string()),
                ..ExtractedParams::default()
            },
            ExtractedParams::default(),
            department("Electrical Engineering"),
        ];
        for extracted in &sequence {
            ctx = reduce(&ctx, extracted);
            assert!(ctx.level.is_none());
        }
        assert_eq!(ctx.department.as_deref(), Some("Electrical Engineering"));
        assert_eq!(ctx.last_course_code.as_deref(), Some("CPE 409"));
    }

    #[test]
    fn test_reduce_is_idempotent() {
        let extracted = department("Computer Engineering");
        let once = reduce(&SessionContext::default(), &extracted);
        let twice = reduce(&once, &extracted);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_course_code_maps_to_last_course_code() {
        let extracted = ExtractedParams {
            course_code: Some("MTH 101".to_string()),
            ..ExtractedParams::default()
        };
        let ctx = reduce(&SessionContext::default(), &extracted);
        assert_eq!(ctx.last_course_code.as_deref(), Some("MTH 101"));
    }

    #[test]
    fn test_out_of_enum_level_passes_through() {
        let extracted = ExtractedParams {
            level: Some(Level::parse("Part III")),
            ..ExtractedParams::default()
        };
        let ctx = reduce(&SessionContext::default(), &extracted);
        assert_eq!(ctx.level, Some(Level::Other("Part III".to_string())));
    }

    #[test]
    fn test_reset_differs_from_empty_extraction() {
        let kept = reduce(&full_context(), &ExtractedParams::default());
        assert!(!kept.is_empty());
        assert!(reset().is_empty());
    }
}
