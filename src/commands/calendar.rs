use chrono::Local;

use crate::commands::{required_title, tolerate_missing};
use crate::error::{LifeError, LifeResult};
use crate::models::{CalendarEvent, CreateEventRequest, EventPatch};
use crate::services::insight_engine::{events_on, normalize_events};
use crate::state::AppState;
use crate::utils::{fresh_id, is_valid_date_key, is_valid_time, now_ms, today_bounds_local};

fn check_date(date: &str) -> LifeResult<String> {
    let date = date.trim();
    if !is_valid_date_key(date) {
        return Err(LifeError::validation(format!("date must be YYYY-MM-DD, got `{}`", date)));
    }
    Ok(date.to_string())
}

fn check_time(time: &str) -> LifeResult<String> {
    let time = time.trim();
    if !is_valid_time(time) {
        return Err(LifeError::validation(format!("time must be HH:MM, got `{}`", time)));
    }
    Ok(time.to_string())
}

fn today_key() -> String {
    today_bounds_local(&Local::now()).0
}

/// All events, undated ones shown as today.
pub async fn list_events(state: &AppState) -> Result<Vec<CalendarEvent>, String> {
    let events = state.store.list_events().map_err(|e| e.to_string())?;
    Ok(normalize_events(events, &today_key()))
}

pub async fn events_for_date(state: &AppState, date: String) -> Result<Vec<CalendarEvent>, String> {
    let date = check_date(&date).map_err(|e| e.to_string())?;
    let events = list_events(state).await?;
    Ok(events_on(&events, &date).into_iter().cloned().collect())
}

pub async fn events_for_today(state: &AppState) -> Result<Vec<CalendarEvent>, String> {
    events_for_date(state, today_key()).await
}

fn build_event(state: &AppState, request: &CreateEventRequest) -> LifeResult<CalendarEvent> {
    let title = required_title(&request.title)?;
    let date = match request.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(date) => check_date(date)?,
        None => today_key(),
    };
    let time = request
        .time
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(check_time)
        .transpose()?;

    Ok(CalendarEvent {
        id: fresh_id(now_ms(), state.store.list_events()?.iter().map(|e| e.id)),
        title,
        date: Some(date),
        time,
        energy: request.energy,
    })
}

pub async fn create_event(state: &AppState, request: CreateEventRequest) -> Result<CalendarEvent, String> {
    let event = build_event(state, &request).map_err(|e| e.to_string())?;
    state.store.insert_event(&event).map_err(|e| e.to_string())?;
    log::debug!("created event {} on {:?}", event.id, event.date);
    Ok(event)
}

pub async fn update_event(
    state: &AppState,
    id: i64,
    patch: EventPatch,
) -> Result<Option<CalendarEvent>, String> {
    let checked = || -> LifeResult<EventPatch> {
        Ok(EventPatch {
            title: patch.title.as_deref().map(required_title).transpose()?,
            date: patch.date.as_deref().map(check_date).transpose()?,
            time: match &patch.time {
                Some(Some(time)) => Some(Some(check_time(time)?)),
                other => other.clone(),
            },
            energy: patch.energy,
        })
    };
    let patch = checked().map_err(|e| e.to_string())?;
    tolerate_missing(state.store.update_event(id, &patch))
}

pub async fn delete_event(state: &AppState, id: i64) -> Result<(), String> {
    tolerate_missing(state.store.delete_event(id)).map(|_| ())
}
