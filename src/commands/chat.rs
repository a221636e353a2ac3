use chrono::Local;

use crate::models::{ChatMessage, ConfirmOutcome, TurnState};
use crate::services::insight_engine::load_daily_insights;
use crate::services::tone_adapter::{adapt_action_confirmation, passive_reply, ConfirmationCopy};
use crate::state::AppState;
use crate::utils::now_ms;

/// Sends one message through the session. Blank input yields `None`; any
/// failure to get a reply yields the fallback bubble, not an error.
pub async fn send_chat_message(state: &AppState, message: String) -> Result<Option<ChatMessage>, String> {
    let mut session = state.chat.lock().await;
    session.set_assistant_tone(state.preferences.get().assistant_tone);
    let reply = session
        .send(&state.store, state.assistant.as_ref(), &message, &Local::now())
        .await;
    Ok(reply.cloned())
}

pub async fn get_chat_messages(state: &AppState) -> Result<Vec<ChatMessage>, String> {
    Ok(state.chat.lock().await.messages().to_vec())
}

pub async fn get_chat_state(state: &AppState) -> Result<TurnState, String> {
    Ok(state.chat.lock().await.state())
}

pub async fn confirm_chat_action(state: &AppState) -> Result<ConfirmOutcome, String> {
    let mut session = state.chat.lock().await;
    Ok(session.confirm(&state.store, now_ms()))
}

pub async fn cancel_chat_action(state: &AppState) -> Result<bool, String> {
    Ok(state.chat.lock().await.cancel(now_ms()))
}

/// Prompt and button labels for the pending proposal, in the current tone.
pub async fn get_confirmation_copy(state: &AppState) -> Result<Option<ConfirmationCopy>, String> {
    let session = state.chat.lock().await;
    if session.state() != TurnState::AwaitingConfirmation {
        return Ok(None);
    }
    let action = session
        .pending_action()
        .and_then(|a| a.label.clone().or_else(|| Some(a.action_type.clone())))
        .unwrap_or_default();
    Ok(Some(adapt_action_confirmation(&action, state.preferences.get().tone)))
}

/// Canned answer for the passive panel; never calls the assistant.
pub async fn ask_passive(state: &AppState, query: String) -> Result<String, String> {
    let insights = load_daily_insights(&state.store, &Local::now()).map_err(|e| e.to_string())?;
    Ok(passive_reply(&query, &insights, state.preferences.get().tone))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::state_with;
    use crate::services::chat_session::{BACKEND_FALLBACK, CONFIRMED_MESSAGE};

    #[tokio::test]
    async fn proposal_then_confirm_through_commands() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(
            dir.path(),
            &["Posso remover as tarefas concluídas de hoje. Deseja confirmar?"],
        );

        let reply = send_chat_message(&state, "limpar tarefas feitas".into())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reply.kind, Some(crate::models::ReplyKind::ActionProposal));
        assert_eq!(get_chat_state(&state).await.unwrap(), TurnState::AwaitingConfirmation);
        assert!(get_confirmation_copy(&state).await.unwrap().is_some());

        assert_eq!(confirm_chat_action(&state).await.unwrap(), ConfirmOutcome::Written);
        let messages = get_chat_messages(&state).await.unwrap();
        assert_eq!(messages.last().unwrap().text, CONFIRMED_MESSAGE);
        assert_eq!(state.store.list_routines().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn offline_assistant_becomes_a_bubble() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(dir.path(), &[]);
        let reply = send_chat_message(&state, "bom dia".into()).await.unwrap().unwrap();
        assert_eq!(reply.text, BACKEND_FALLBACK);
        assert!(get_confirmation_copy(&state).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn passive_panel_answers_locally() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(dir.path(), &[]);
        let answer = ask_passive(&state, "qual meu foco hoje?".into()).await.unwrap();
        assert!(!answer.is_empty());
    }
}
