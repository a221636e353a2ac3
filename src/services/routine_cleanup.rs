use std::sync::OnceLock;

use regex::Regex;

use crate::database::LocalStore;
use crate::error::LifeResult;
use crate::models::{RoutineOrigin, RoutineRecord};

pub const MIN_ROUTINE_CHARS: usize = 4;

fn noise_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^(oi|olá|ola|ok|teste|test|hello|hi)$").expect("static pattern")
    })
}

pub fn is_noise(record: &RoutineRecord) -> bool {
    let text = record.text.trim();
    let too_short = text.chars().count() < MIN_ROUTINE_CHARS;
    let greeting = noise_pattern().is_match(text);
    let unconfirmed_chat =
        record.origin == RoutineOrigin::Chat && record.confirmed != Some(true);
    too_short || greeting || unconfirmed_chat
}

/// Drop greetings, fragments and unconfirmed chat entries. Safe to call any
/// number of times; returns how many records were removed.
pub fn cleanup_routines(store: &LocalStore) -> LifeResult<usize> {
    let doomed: Vec<i64> = store
        .list_routines()?
        .iter()
        .filter(|r| is_noise(r))
        .map(|r| r.id)
        .collect();

    let deleted = store.delete_routines(&doomed)?;
    if deleted > 0 {
        log::info!("routine cleanup removed {} record(s)", deleted);
    }
    Ok(deleted)
}
