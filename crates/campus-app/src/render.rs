//! Plain-text rendering of assistant turns for the terminal chat.

use campus_core::types::{
    AttachedData, Course, PastQuestion, Role, SessionContext, StudyMaterial, Turn,
};

/// Render a turn: speaker label, text, then one card per attached record.
pub fn render_turn(turn: &Turn) -> String {
    let label = match turn.role {
        Role::User => "you",
        Role::Assistant => "assistant",
    };
    let mut out = format!("{}> {}", label, turn.text);
    if let Some(data) = &turn.attached_data {
        for card in cards(data) {
            out.push('\n');
            out.push_str(&card);
        }
    }
    out
}

/// One line (or two, for courses) per attached record.
pub fn cards(data: &AttachedData) -> Vec<String> {
    match data {
        AttachedData::Courses(items) => items.iter().map(course_card).collect(),
        AttachedData::Materials(items) => items.iter().map(material_card).collect(),
        AttachedData::PastQuestions(items) => items.iter().map(past_question_card).collect(),
    }
}

fn course_card(course: &Course) -> String {
    format!(
        "  [{}] {} ({} units)\n      {}",
        course.code, course.title, course.units, course.description
    )
}

fn material_card(material: &StudyMaterial) -> String {
    format!(
        "  <{}> {} <{}>",
        material.kind.as_str(),
        material.title,
        material.url
    )
}

fn past_question_card(paper: &PastQuestion) -> String {
    format!(
        "  {} {} Semester <{}>",
        paper.year,
        paper.semester.as_str(),
        paper.url
    )
}

/// One-line summary of the session context, for `/context`.
pub fn render_context(context: &SessionContext) -> String {
    format!(
        "department: {}, level: {}, last course: {}",
        context.department.as_deref().unwrap_or("-"),
        context.level.as_ref().map_or("-", |l| l.as_str()),
        context.last_course_code.as_deref().unwrap_or("-"),
    )
}
