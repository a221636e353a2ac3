use std::time::Instant;

use chrono::{DateTime, Local};
use uuid::Uuid;

use crate::database::LocalStore;
use crate::error::LifeResult;
use crate::models::{
    AssistantReply, AssistantTone, ChatMessage, ConfirmOutcome, ReplyKind, RoutineOrigin,
    RoutineRecord, Sender, SuggestedAction, TurnState,
};
use crate::services::assistant_client::Assistant;
use crate::services::chat_context::{assemble_context, classify_reply};
use crate::services::routine_cleanup::{cleanup_routines, MIN_ROUTINE_CHARS};
use crate::utils::fresh_id;

pub const BACKEND_FALLBACK: &str =
    "IA temporariamente indisponível. Verifique se o backend está rodando.";
pub const CONFIRMED_MESSAGE: &str = "Confirmado. Registrei na sua rotina.";
pub const INSUFFICIENT_TEXT_MESSAGE: &str = "Texto insuficiente para registrar uma rotina.";
pub const STORE_FAILED_MESSAGE: &str = "Não foi possível registrar sua rotina agora.";
pub const CANCELLED_MESSAGE: &str = "Entendido. Ação cancelada.";

/// Reply timestamp: the turn's clock plus the time spent waiting on the assistant.
fn arrival(sent_ts: i64, started: Instant) -> i64 {
    let waited = i64::try_from(started.elapsed().as_millis()).unwrap_or(i64::MAX);
    sent_ts.saturating_add(waited)
}

fn write_routine(store: &LocalStore, text: String, now_ms: i64) -> LifeResult<i64> {
    let taken = store.list_routines()?;
    let record = RoutineRecord {
        id: fresh_id(now_ms, taken.iter().map(|r| r.id)),
        text,
        date: now_ms,
        origin: RoutineOrigin::Chat,
        confirmed: Some(true),
    };
    store.insert_routine(&record)?;
    Ok(record.id)
}

/// One conversation thread. Messages live only in memory; the only thing a
/// session ever writes is a confirmed routine.
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    state: TurnState,
    pending_action: Option<SuggestedAction>,
    assistant_tone: AssistantTone,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new(AssistantTone::default())
    }
}

impl ChatSession {
    pub fn new(assistant_tone: AssistantTone) -> Self {
        Self {
            messages: Vec::new(),
            state: TurnState::AwaitingInput,
            pending_action: None,
            assistant_tone,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Action object the assistant attached to the proposal now awaiting confirmation.
    pub fn pending_action(&self) -> Option<&SuggestedAction> {
        self.pending_action.as_ref()
    }

    pub fn set_assistant_tone(&mut self, tone: AssistantTone) {
        self.assistant_tone = tone;
    }

    fn transition(&mut self, next: TurnState) {
        log::debug!("chat turn {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn post(&mut self, sender: Sender, text: &str, ts: i64, kind: Option<ReplyKind>) {
        self.messages.push(ChatMessage {
            id: Uuid::new_v4().to_string(),
            sender,
            text: text.to_string(),
            ts,
            kind,
        });
    }

    /// Runs one turn. Blank input is ignored and returns `None`; otherwise the
    /// returned bubble is the assistant's reply or the fallback notice. No
    /// failure leaves the turn without a reply.
    pub async fn send(
        &mut self,
        store: &LocalStore,
        assistant: &dyn Assistant,
        text: &str,
        now: &DateTime<Local>,
    ) -> Option<&ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if self.state == TurnState::AwaitingConfirmation {
            log::debug!("new message dropped the pending proposal");
            self.pending_action = None;
        }

        let ts = now.timestamp_millis();
        self.post(Sender::User, text, ts, None);
        self.transition(TurnState::Sent);

        if let Err(e) = cleanup_routines(store) {
            log::warn!("routine cleanup before send failed: {}", e);
        }

        let started = Instant::now();
        match self.request(store, assistant, text, now).await {
            Ok(reply) => {
                let kind = classify_reply(&reply.reply);
                self.post(Sender::Lifeos, &reply.reply, arrival(ts, started), Some(kind));
                self.transition(TurnState::ReplyRendered);
                if kind == ReplyKind::ActionProposal {
                    self.pending_action = reply.action;
                    self.transition(TurnState::AwaitingConfirmation);
                } else {
                    self.transition(TurnState::AwaitingInput);
                }
            }
            Err(e) => {
                if e.is_backend_failure() {
                    log::warn!("assistant request failed: {}", e);
                } else {
                    log::error!("chat turn failed before a reply: {}", e);
                }
                self.post(
                    Sender::Lifeos,
                    BACKEND_FALLBACK,
                    arrival(ts, started),
                    Some(ReplyKind::Conversation),
                );
                self.transition(TurnState::ErrorRendered);
                self.transition(TurnState::AwaitingInput);
            }
        }

        self.messages.last()
    }

    async fn request(
        &self,
        store: &LocalStore,
        assistant: &dyn Assistant,
        text: &str,
        now: &DateTime<Local>,
    ) -> LifeResult<AssistantReply> {
        let mut context = assemble_context(store, now)?;
        context.tone = Some(self.assistant_tone.as_str().to_string());
        assistant.send(text, &context).await
    }

    /// Stores the latest user message as a confirmed chat routine.
    pub fn confirm(&mut self, store: &LocalStore, now_ms: i64) -> ConfirmOutcome {
        if self.state != TurnState::AwaitingConfirmation {
            return ConfirmOutcome::NothingPending;
        }
        self.pending_action = None;

        let text = self
            .messages
            .iter()
            .rev()
            .find(|m| m.sender == Sender::User)
            .map(|m| m.text.trim().to_string())
            .unwrap_or_default();

        let outcome = if text.chars().count() < MIN_ROUTINE_CHARS {
            self.post(Sender::Lifeos, INSUFFICIENT_TEXT_MESSAGE, now_ms, None);
            ConfirmOutcome::InsufficientText
        } else {
            match write_routine(store, text, now_ms) {
                Ok(id) => {
                    log::info!("confirmed chat routine {}", id);
                    self.post(Sender::Lifeos, CONFIRMED_MESSAGE, now_ms, None);
                    self.transition(TurnState::ConfirmedWritten);
                    ConfirmOutcome::Written
                }
                Err(e) => {
                    log::warn!("could not store confirmed routine: {}", e);
                    self.post(Sender::Lifeos, STORE_FAILED_MESSAGE, now_ms, None);
                    ConfirmOutcome::StoreFailed
                }
            }
        };

        self.transition(TurnState::AwaitingInput);
        outcome
    }

    pub fn cancel(&mut self, now_ms: i64) -> bool {
        if self.state != TurnState::AwaitingConfirmation {
            return false;
        }
        self.pending_action = None;
        self.post(Sender::Lifeos, CANCELLED_MESSAGE, now_ms, None);
        self.transition(TurnState::Cancelled);
        self.transition(TurnState::AwaitingInput);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LifeError;
    use crate::models::ChatContext;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    const PROPOSAL: &str = "Você quer apagar a tarefa de hoje, deseja confirmar?";

    struct ScriptedAssistant {
        replies: Mutex<VecDeque<LifeResult<AssistantReply>>>,
        seen: Mutex<Vec<ChatContext>>,
    }

    impl ScriptedAssistant {
        fn new(replies: Vec<LifeResult<AssistantReply>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn replying(texts: &[&str]) -> Self {
            Self::new(
                texts
                    .iter()
                    .map(|t| {
                        Ok(AssistantReply {
                            reply: t.to_string(),
                            action: None,
                        })
                    })
                    .collect(),
            )
        }
    }

    #[async_trait]
    impl Assistant for ScriptedAssistant {
        async fn send(&self, _message: &str, context: &ChatContext) -> LifeResult<AssistantReply> {
            self.seen.lock().unwrap().push(context.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(LifeError::BackendUnavailable("script exhausted".into())))
        }
    }

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 6, 10, 9, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn confirming_a_proposal_writes_one_chat_routine() {
        let store = LocalStore::open_in_memory().unwrap();
        let assistant = ScriptedAssistant::replying(&[PROPOSAL]);
        let mut session = ChatSession::default();

        let reply = session
            .send(&store, &assistant, "apagar tarefa", &now())
            .await
            .unwrap();
        assert_eq!(reply.kind, Some(ReplyKind::ActionProposal));
        assert_eq!(session.state(), TurnState::AwaitingConfirmation);

        let at = now().timestamp_millis() + 5;
        assert_eq!(session.confirm(&store, at), ConfirmOutcome::Written);
        assert_eq!(session.state(), TurnState::AwaitingInput);

        let routines = store.list_routines().unwrap();
        assert_eq!(routines.len(), 1);
        assert_eq!(routines[0].text, "apagar tarefa");
        assert_eq!(routines[0].origin, RoutineOrigin::Chat);
        assert_eq!(routines[0].confirmed, Some(true));
        assert_eq!(routines[0].id, at);
        assert_eq!(routines[0].date, at);
        assert_eq!(session.messages().last().unwrap().text, CONFIRMED_MESSAGE);
    }

    #[tokio::test]
    async fn short_text_is_not_written() {
        let store = LocalStore::open_in_memory().unwrap();
        let assistant = ScriptedAssistant::replying(&[PROPOSAL]);
        let mut session = ChatSession::default();

        session.send(&store, &assistant, "oi", &now()).await;
        assert_eq!(
            session.confirm(&store, now().timestamp_millis()),
            ConfirmOutcome::InsufficientText
        );
        assert!(store.list_routines().unwrap().is_empty());
        assert_eq!(session.messages().last().unwrap().text, INSUFFICIENT_TEXT_MESSAGE);
    }

    #[tokio::test]
    async fn cancel_writes_nothing() {
        let store = LocalStore::open_in_memory().unwrap();
        let assistant = ScriptedAssistant::replying(&[PROPOSAL]);
        let mut session = ChatSession::default();

        session
            .send(&store, &assistant, "limpar registros", &now())
            .await;
        assert!(session.cancel(now().timestamp_millis()));
        assert!(store.list_routines().unwrap().is_empty());
        assert_eq!(session.messages().last().unwrap().text, CANCELLED_MESSAGE);
        assert_eq!(session.state(), TurnState::AwaitingInput);
        assert!(!session.cancel(now().timestamp_millis()));
    }

    #[tokio::test]
    async fn plain_replies_cannot_be_confirmed() {
        let store = LocalStore::open_in_memory().unwrap();
        let assistant = ScriptedAssistant::replying(&["Talvez seja bom revisar sua rotina"]);
        let mut session = ChatSession::default();

        let reply = session
            .send(&store, &assistant, "como estou indo?", &now())
            .await
            .unwrap();
        assert_eq!(reply.kind, Some(ReplyKind::Suggestion));
        assert_eq!(session.state(), TurnState::AwaitingInput);
        assert_eq!(
            session.confirm(&store, now().timestamp_millis()),
            ConfirmOutcome::NothingPending
        );
        assert!(store.list_routines().unwrap().is_empty());
    }

    #[tokio::test]
    async fn backend_failure_posts_fallback() {
        let store = LocalStore::open_in_memory().unwrap();
        let assistant =
            ScriptedAssistant::new(vec![Err(LifeError::InvalidResponse("no reply".into()))]);
        let mut session = ChatSession::default();

        let bubble = session
            .send(&store, &assistant, "olá, tudo bem?", &now())
            .await
            .unwrap();
        assert_eq!(bubble.text, BACKEND_FALLBACK);
        assert_eq!(bubble.sender, Sender::Lifeos);
        assert_eq!(session.state(), TurnState::AwaitingInput);
        assert_eq!(session.messages().len(), 2);
    }

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let store = LocalStore::open_in_memory().unwrap();
        let assistant = ScriptedAssistant::replying(&["nunca"]);
        let mut session = ChatSession::default();

        assert!(session.send(&store, &assistant, "   ", &now()).await.is_none());
        assert!(session.messages().is_empty());
        assert!(assistant.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn cleanup_runs_before_context_is_built() {
        let store = LocalStore::open_in_memory().unwrap();
        let ms = now().timestamp_millis();
        store
            .bulk_insert_routines(&[
                RoutineRecord {
                    id: 1,
                    text: "meditar antes do trabalho".into(),
                    date: ms,
                    origin: RoutineOrigin::Chat,
                    confirmed: None,
                },
                RoutineRecord {
                    id: 2,
                    text: "caminhada leve".into(),
                    date: ms,
                    origin: RoutineOrigin::Manual,
                    confirmed: None,
                },
            ])
            .unwrap();
        let assistant = ScriptedAssistant::replying(&["Oi! Como posso ajudar?"]);
        let mut session = ChatSession::new(AssistantTone::Calmo);

        session.send(&store, &assistant, "bom dia", &now()).await;

        let seen = assistant.seen.lock().unwrap();
        assert_eq!(seen[0].routines, vec!["caminhada leve".to_string()]);
        assert_eq!(seen[0].tone.as_deref(), Some("calmo"));
        let left: Vec<i64> = store.list_routines().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(left, vec![2]);
    }

    #[tokio::test]
    async fn unreadable_store_still_gets_a_reply_bubble() {
        let store = LocalStore::open_in_memory().unwrap();
        store.execute_batch("DROP TABLE calendar;").unwrap();
        let assistant = ScriptedAssistant::replying(&["nunca"]);
        let mut session = ChatSession::default();

        let bubble = session.send(&store, &assistant, "bom dia", &now()).await.unwrap();
        assert_eq!(bubble.text, BACKEND_FALLBACK);
        assert_eq!(bubble.sender, Sender::Lifeos);
        assert_eq!(session.state(), TurnState::AwaitingInput);
        assert_eq!(session.messages().len(), 2);
        assert!(assistant.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn any_assistant_error_posts_fallback() {
        let store = LocalStore::open_in_memory().unwrap();
        let assistant = ScriptedAssistant::new(vec![Err(LifeError::validation("bad request"))]);
        let mut session = ChatSession::default();

        let bubble = session.send(&store, &assistant, "bom dia", &now()).await.unwrap();
        assert_eq!(bubble.text, BACKEND_FALLBACK);
        assert_eq!(bubble.kind, Some(ReplyKind::Conversation));
        assert_eq!(session.state(), TurnState::AwaitingInput);
        assert_eq!(session.messages().len(), 2);
    }

    #[tokio::test]
    async fn confirmed_routine_skips_an_id_already_taken() {
        let store = LocalStore::open_in_memory().unwrap();
        let at = now().timestamp_millis() + 5;
        store
            .insert_routine(&RoutineRecord {
                id: at,
                text: "caminhada leve".into(),
                date: at,
                origin: RoutineOrigin::Manual,
                confirmed: None,
            })
            .unwrap();
        let assistant = ScriptedAssistant::replying(&[PROPOSAL]);
        let mut session = ChatSession::default();

        session.send(&store, &assistant, "apagar tarefa", &now()).await;
        assert_eq!(session.confirm(&store, at), ConfirmOutcome::Written);

        let routines = store.list_routines().unwrap();
        assert_eq!(routines.len(), 2);
        let written = routines.iter().find(|r| r.origin == RoutineOrigin::Chat).unwrap();
        assert_eq!(written.id, at + 1);
        assert_eq!(written.date, at);
        assert_eq!(written.text, "apagar tarefa");
    }

    #[tokio::test]
    async fn failed_write_reports_store_failed() {
        let store = LocalStore::open_in_memory().unwrap();
        let assistant = ScriptedAssistant::replying(&[PROPOSAL]);
        let mut session = ChatSession::default();

        session.send(&store, &assistant, "apagar tarefa", &now()).await;
        store.execute_batch("DROP TABLE routines;").unwrap();

        assert_eq!(
            session.confirm(&store, now().timestamp_millis()),
            ConfirmOutcome::StoreFailed
        );
        assert_eq!(session.messages().last().unwrap().text, STORE_FAILED_MESSAGE);
        assert_eq!(session.state(), TurnState::AwaitingInput);
        assert!(session.pending_action().is_none());
    }

    struct SlowAssistant(Duration);

    #[async_trait]
    impl Assistant for SlowAssistant {
        async fn send(&self, _message: &str, _context: &ChatContext) -> LifeResult<AssistantReply> {
            tokio::time::sleep(self.0).await;
            Ok(AssistantReply {
                reply: "Oi! Como posso ajudar?".into(),
                action: None,
            })
        }
    }

    #[tokio::test]
    async fn reply_is_stamped_when_it_arrives() {
        let store = LocalStore::open_in_memory().unwrap();
        let assistant = SlowAssistant(Duration::from_millis(30));
        let mut session = ChatSession::default();

        session.send(&store, &assistant, "bom dia", &now()).await;

        let messages = session.messages();
        assert_eq!(messages[0].ts, now().timestamp_millis());
        assert!(messages[1].ts >= messages[0].ts + 30);
    }
}
