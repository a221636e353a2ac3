use chrono::Local;

use crate::commands::{required_title, tolerate_missing};
use crate::error::{LifeError, LifeResult};
use crate::models::{CreateHabitRequest, Frequency, Habit, HabitPatch};
use crate::services::insight_engine::load_habits_for_today;
use crate::state::AppState;
use crate::utils::{fresh_id, now_ms};

fn check_weekday(weekday: Option<u8>) -> LifeResult<()> {
    match weekday {
        Some(day) if day > 6 => Err(LifeError::validation(format!(
            "weekday must be 0 (Sunday) to 6 (Saturday), got {}",
            day
        ))),
        _ => Ok(()),
    }
}

pub async fn list_habits(state: &AppState) -> Result<Vec<Habit>, String> {
    state.store.list_habits().map_err(|e| e.to_string())
}

/// Daily habits plus weekly ones scheduled for today's weekday.
pub async fn habits_for_today(state: &AppState) -> Result<Vec<Habit>, String> {
    load_habits_for_today(&state.store, &Local::now()).map_err(|e| e.to_string())
}

fn build_habit(state: &AppState, request: &CreateHabitRequest) -> LifeResult<Habit> {
    let title = required_title(&request.title)?;
    check_weekday(request.scheduled_weekday)?;
    let frequency = request.frequency.unwrap_or(Frequency::Daily);
    if frequency == Frequency::Weekly && request.scheduled_weekday.is_none() {
        return Err(LifeError::validation("weekly habits need a weekday"));
    }

    let now = now_ms();
    Ok(Habit {
        id: fresh_id(now, state.store.list_habits()?.iter().map(|h| h.id)),
        title,
        done: false,
        frequency: Some(frequency),
        last_done_at: None,
        created_at: Some(now),
        scheduled_weekday: match frequency {
            Frequency::Weekly => request.scheduled_weekday,
            Frequency::Daily => None,
        },
    })
}

pub async fn create_habit(state: &AppState, request: CreateHabitRequest) -> Result<Habit, String> {
    let habit = build_habit(state, &request).map_err(|e| e.to_string())?;
    state.store.insert_habit(&habit).map_err(|e| e.to_string())?;
    log::debug!("created habit {}", habit.id);
    Ok(habit)
}

pub async fn update_habit(state: &AppState, id: i64, patch: HabitPatch) -> Result<Option<Habit>, String> {
    let title = patch
        .title
        .as_deref()
        .map(required_title)
        .transpose()
        .map_err(|e| e.to_string())?;
    check_weekday(patch.scheduled_weekday.flatten()).map_err(|e| e.to_string())?;
    let patch = HabitPatch { title, ..patch };
    tolerate_missing(state.store.update_habit(id, &patch))
}

/// Completing stamps `lastDoneAt`; undoing clears it.
pub async fn toggle_habit(state: &AppState, id: i64) -> Result<Option<Habit>, String> {
    let current = state
        .store
        .list_habits()
        .map_err(|e| e.to_string())?
        .into_iter()
        .find(|h| h.id == id);
    let Some(current) = current else {
        log::warn!("ignored: toggle of missing habit {}", id);
        return Ok(None);
    };

    let patch = if current.done {
        HabitPatch {
            done: Some(false),
            last_done_at: Some(None),
            ..HabitPatch::default()
        }
    } else {
        HabitPatch {
            done: Some(true),
            last_done_at: Some(Some(now_ms())),
            ..HabitPatch::default()
        }
    };
    tolerate_missing(state.store.update_habit(id, &patch))
}

pub async fn delete_habit(state: &AppState, id: i64) -> Result<(), String> {
    tolerate_missing(state.store.delete_habit(id)).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::state_with;

    fn request(title: &str, frequency: Option<Frequency>, weekday: Option<u8>) -> CreateHabitRequest {
        CreateHabitRequest {
            title: title.to_string(),
            frequency,
            scheduled_weekday: weekday,
        }
    }

    #[tokio::test]
    async fn toggling_sets_and_clears_completion_time() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(dir.path(), &[]);
        let habit = create_habit(&state, request("beber água", None, None)).await.unwrap();
        assert_eq!(habit.frequency, Some(Frequency::Daily));

        let done = toggle_habit(&state, habit.id).await.unwrap().unwrap();
        assert!(done.done);
        assert!(done.last_done_at.is_some());

        let undone = toggle_habit(&state, habit.id).await.unwrap().unwrap();
        assert!(!undone.done);
        assert_eq!(undone.last_done_at, None);
    }

    #[tokio::test]
    async fn weekday_is_validated() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(dir.path(), &[]);
        assert!(create_habit(&state, request("yoga", Some(Frequency::Weekly), Some(7)))
            .await
            .is_err());
        assert!(create_habit(&state, request("yoga", Some(Frequency::Weekly), None))
            .await
            .is_err());
        assert!(list_habits(&state).await.unwrap().is_empty());

        let weekly = create_habit(&state, request("yoga", Some(Frequency::Weekly), Some(2)))
            .await
            .unwrap();
        assert_eq!(weekly.scheduled_weekday, Some(2));
    }

    #[tokio::test]
    async fn daily_habits_are_always_listed_for_today() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(dir.path(), &[]);
        create_habit(&state, request("alongar", None, None)).await.unwrap();
        assert_eq!(habits_for_today(&state).await.unwrap().len(), 1);
    }
}
