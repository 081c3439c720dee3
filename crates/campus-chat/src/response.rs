//! Assistant reply composition.
//!
//! The oracle's prose always leads; catalog notes (empty-result fallbacks
//! and study advice) are appended after a blank line.

use campus_core::types::Level;

/// Appended when a course query matches nothing.
pub const NO_COURSES: &str = "No specific courses found for these parameters in our database yet.";

/// Note for a material query that matched nothing.
pub fn no_materials(course_code: &str) -> String {
    format!("No materials found for {}.", course_code)
}

/// Note for a past question query that matched nothing.
pub fn no_past_questions(course_code: &str) -> String {
    format!("No past questions found for {}.", course_code)
}

/// Note carrying study advice for a level.
pub fn advice_note(level: &Level, advice: &str) -> String {
    format!("Advice for {}: {}", level, advice)
}

/// Join the oracle's answer with an optional catalog note.
pub fn compose(answer: &str, note: Option<&str>) -> String {
    match note {
        Some(note) if answer.trim().is_empty() => note.to_string(),
        Some(note) => format!("{}\n\n{}", answer, note),
        None => answer.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_without_note_is_answer() {
        assert_eq!(compose("Here you go.", None), "Here you go.");
    }

    #[test]
    fn test_compose_appends_note() {
        assert_eq!(
            compose("Let me check.", Some(&no_materials("CPE 999"))),
            "Let me check.\n\nNo materials found for CPE 999."
        );
    }

    #[test]
    fn test_compose_empty_answer_shows_note_only() {
        assert_eq!(compose("  ", Some(NO_COURSES)), NO_COURSES);
    }

    #[test]
    fn test_fallback_sentences() {
        assert!(NO_COURSES.to_lowercase().contains("no specific courses found"));
        assert_eq!(
            no_past_questions("CPE 302"),
            "No past questions found for CPE 302."
        );
        assert_eq!(
            advice_note(&Level::L100, "Join a study group."),
            "Advice for 100L: Join a study group."
        );
    }
}
