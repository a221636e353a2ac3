use chrono::Local;

use crate::commands::{required_title, tolerate_missing};
use crate::error::LifeResult;
use crate::models::{RoutineOrigin, RoutineRecord};
use crate::services::routine_cleanup;
use crate::state::AppState;
use crate::utils::{fresh_id, now_ms, today_bounds_local};

pub async fn list_routines(state: &AppState) -> Result<Vec<RoutineRecord>, String> {
    state.store.list_routines().map_err(|e| e.to_string())
}

/// Today's entries that count as lived routine: manual ones and confirmed chat ones.
pub async fn todays_routine(state: &AppState) -> Result<Vec<RoutineRecord>, String> {
    let (_, start, end) = today_bounds_local(&Local::now());
    let records = state
        .store
        .list_routines_between(start, end)
        .map_err(|e| e.to_string())?;
    Ok(records.into_iter().filter(|r| r.is_context_eligible()).collect())
}

fn build_manual(state: &AppState, text: &str) -> LifeResult<RoutineRecord> {
    let text = required_title(text)?;
    let now = now_ms();
    Ok(RoutineRecord {
        id: fresh_id(now, state.store.list_routines()?.iter().map(|r| r.id)),
        text,
        date: now,
        origin: RoutineOrigin::Manual,
        confirmed: None,
    })
}

pub async fn add_manual_routine(state: &AppState, text: String) -> Result<RoutineRecord, String> {
    let record = build_manual(state, &text).map_err(|e| e.to_string())?;
    state.store.insert_routine(&record).map_err(|e| e.to_string())?;
    Ok(record)
}

pub async fn delete_routine(state: &AppState, id: i64) -> Result<(), String> {
    tolerate_missing(state.store.delete_routine(id)).map(|_| ())
}

pub async fn cleanup_routines(state: &AppState) -> Result<usize, String> {
    routine_cleanup::cleanup_routines(&state.store).map_err(|e| e.to_string())
}
