//! Per-level study advice.

use campus_core::types::Level;

/// Advice returned for levels outside the canonical set.
pub const GENERIC_ADVICE: &str = "Stay focused on your studies and ask for help when needed.";

/// Study advice for a level.
pub fn advice_for(level: &Level) -> &'static str {
    match level {
        Level::L100 => {
            "Welcome to University life! Focus on building a strong foundation in Mathematics \
             and General Studies. Join a study group early."
        }
        Level::L200 => {
            "This is the foundation year for your core engineering courses. Don't lag behind \
             in Laboratory work."
        }
        Level::L300 => {
            "The workload increases here. Focus on mastering professional software and \
             hardware tools related to your major."
        }
        Level::L400 => {
            "Industrial Training (IT) year! Start looking for placement early. Balance your \
             academics with practical experience."
        }
        Level::L500 => {
            "Final lap! Your Project is paramount. Manage your time strictly between seminars \
             and core specialized courses."
        }
        Level::Other(_) => GENERIC_ADVICE,
    }
}
