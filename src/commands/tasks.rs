use crate::commands::{required_title, tolerate_missing};
use crate::error::LifeResult;
use crate::models::{CreateTaskRequest, Priority, Task, TaskBoard, TaskPatch};
use crate::services::insight_engine::{filter_by_priority, task_board};
use crate::state::AppState;
use crate::utils::{fresh_id, now_ms};

pub async fn list_tasks(state: &AppState) -> Result<Vec<Task>, String> {
    state.store.list_tasks().map_err(|e| e.to_string())
}

pub async fn get_task_board(state: &AppState) -> Result<TaskBoard, String> {
    let tasks = state.store.list_tasks().map_err(|e| e.to_string())?;
    Ok(task_board(&tasks))
}

pub async fn tasks_by_priority(state: &AppState, priority: Priority) -> Result<Vec<Task>, String> {
    let tasks = state.store.list_tasks().map_err(|e| e.to_string())?;
    Ok(filter_by_priority(&tasks, priority).into_iter().cloned().collect())
}

fn build_task(state: &AppState, request: &CreateTaskRequest) -> LifeResult<Task> {
    let title = required_title(&request.title)?;
    let now = now_ms();
    let id = fresh_id(now, state.store.list_tasks()?.iter().map(|t| t.id));
    Ok(Task {
        id,
        title,
        done: false,
        priority: Some(request.priority.unwrap_or(Priority::Essential)),
        created_at: Some(now),
    })
}

pub async fn create_task(state: &AppState, request: CreateTaskRequest) -> Result<Task, String> {
    let task = build_task(state, &request).map_err(|e| e.to_string())?;
    state.store.insert_task(&task).map_err(|e| e.to_string())?;
    log::debug!("created task {}", task.id);
    Ok(task)
}

pub async fn update_task(state: &AppState, id: i64, patch: TaskPatch) -> Result<Option<Task>, String> {
    let title = patch
        .title
        .as_deref()
        .map(required_title)
        .transpose()
        .map_err(|e| e.to_string())?;
    let patch = TaskPatch { title, ..patch };
    tolerate_missing(state.store.update_task(id, &patch))
}

pub async fn toggle_task(state: &AppState, id: i64) -> Result<Option<Task>, String> {
    let current = state
        .store
        .list_tasks()
        .map_err(|e| e.to_string())?
        .into_iter()
        .find(|t| t.id == id);
    let Some(current) = current else {
        log::warn!("ignored: toggle of missing task {}", id);
        return Ok(None);
    };

    let patch = TaskPatch {
        done: Some(!current.done),
        ..TaskPatch::default()
    };
    tolerate_missing(state.store.update_task(id, &patch))
}

pub async fn delete_task(state: &AppState, id: i64) -> Result<(), String> {
    tolerate_missing(state.store.delete_task(id)).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::state_with;

    fn request(title: &str, priority: Option<Priority>) -> CreateTaskRequest {
        CreateTaskRequest {
            title: title.to_string(),
            priority,
        }
    }

    #[tokio::test]
    async fn create_toggle_and_group() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(dir.path(), &[]);

        let a = create_task(&state, request("  pagar aluguel ", None)).await.unwrap();
        let b = create_task(&state, request("ler", Some(Priority::Optional))).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.title, "pagar aluguel");
        assert_eq!(a.priority, Some(Priority::Essential));
        assert!(a.created_at.is_some());

        let toggled = toggle_task(&state, a.id).await.unwrap().unwrap();
        assert!(toggled.done);

        let board = get_task_board(&state).await.unwrap();
        assert_eq!(board.done.len(), 1);
        assert_eq!(board.optional.len(), 1);
        assert!(board.essential.is_empty());

        let optional = tasks_by_priority(&state, Priority::Optional).await.unwrap();
        assert_eq!(optional.len(), 1);
    }

    #[tokio::test]
    async fn blank_title_is_rejected_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(dir.path(), &[]);
        assert!(create_task(&state, request("  ", None)).await.is_err());
        assert!(list_tasks(&state).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_ids_are_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(dir.path(), &[]);
        assert!(delete_task(&state, 42).await.is_ok());
        assert_eq!(toggle_task(&state, 42).await.unwrap(), None);
        assert_eq!(update_task(&state, 42, TaskPatch::default()).await.unwrap(), None);
    }
}
