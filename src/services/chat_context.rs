use std::sync::OnceLock;

use chrono::{DateTime, Local};
use regex::Regex;

use crate::database::LocalStore;
use crate::error::LifeResult;
use crate::models::{ChatContext, ContextEvent, ContextTask, ReplyKind};
use crate::services::insight_engine::events_on;
use crate::utils::today_bounds_local;

const CONFIRMATION_CUES: [&str; 2] = ["deseja confirmar?", "quer que eu faça isso?"];

struct ReplyPatterns {
    action_verb: Regex,
    target: Regex,
    suggestive: Regex,
    offer_of_help: Regex,
}

fn reply_patterns() -> &'static ReplyPatterns {
    static PATTERNS: OnceLock<ReplyPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| ReplyPatterns {
        action_verb: Regex::new(r"apagar|excluir|remover|alterar|ajustar|executar|limpar|criar|mover")
            .expect("static pattern"),
        target: Regex::new(r"registros|tarefas|rotina|prioridade|data|hoje").expect("static pattern"),
        suggestive: Regex::new(r"posso|poderia|sugiro|talvez|vamos").expect("static pattern"),
        offer_of_help: Regex::new(r"(posso|poderia) (te |lhe )?ajudar").expect("static pattern"),
    })
}

/// A reply is an action proposal only when it asks for confirmation, names an
/// action and points at something concrete. Otherwise suggestive wording makes
/// it a suggestion, and anything else is conversation. A plain offer of help
/// ("como posso ajudar?") is not suggestive wording.
pub fn classify_reply(reply: &str) -> ReplyKind {
    let text = reply.to_lowercase();
    let patterns = reply_patterns();
    let without_offer = patterns.offer_of_help.replace_all(&text, "");

    let asks_confirmation = CONFIRMATION_CUES.iter().any(|cue| text.contains(cue));
    let has_action_verb = patterns.action_verb.is_match(&text);
    let has_target = patterns.target.is_match(&text);

    if asks_confirmation && has_action_verb && has_target {
        ReplyKind::ActionProposal
    } else if patterns.suggestive.is_match(&without_offer) {
        ReplyKind::Suggestion
    } else {
        ReplyKind::Conversation
    }
}

/// Today's confirmed routines, open tasks and today's events, read in full
/// before anything is sent.
pub fn assemble_context(store: &LocalStore, now: &DateTime<Local>) -> LifeResult<ChatContext> {
    let (today_key, day_start, day_end) = today_bounds_local(now);

    let routines = store
        .list_routines_between(day_start, day_end)?
        .into_iter()
        .filter(|r| r.is_context_eligible())
        .map(|r| r.text)
        .filter(|text| !text.is_empty())
        .collect();

    let tasks = store
        .list_tasks()?
        .into_iter()
        .filter(|t| !t.done)
        .map(|t| ContextTask {
            id: t.id,
            title: t.title,
            priority: t.priority,
        })
        .collect();

    let events = store.list_events()?;
    let calendar = events_on(&events, &today_key)
        .into_iter()
        .map(|e| ContextEvent {
            id: e.id,
            title: e.title.clone(),
            time: e.time.clone(),
        })
        .collect();

    Ok(ChatContext {
        routines,
        tasks,
        calendar,
        tone: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CalendarEvent, Priority, RoutineOrigin, RoutineRecord, Task};
    use crate::utils::{date_key, DAY_MS};
    use chrono::TimeZone;

    #[test]
    fn classifies_the_reference_replies() {
        assert_eq!(
            classify_reply("Você quer apagar a tarefa de hoje, deseja confirmar?"),
            ReplyKind::ActionProposal
        );
        assert_eq!(
            classify_reply("Talvez seja bom revisar sua rotina"),
            ReplyKind::Suggestion
        );
        assert_eq!(classify_reply("Oi! Como posso ajudar?"), ReplyKind::Conversation);
    }

    #[test]
    fn confirmation_cue_alone_is_not_enough() {
        // No action verb.
        assert_eq!(
            classify_reply("Anotei suas tarefas de hoje. Deseja confirmar?"),
            ReplyKind::Conversation
        );
        // No target.
        assert_eq!(
            classify_reply("Vou criar isso. Quer que eu faça isso?"),
            ReplyKind::Conversation
        );
        assert_eq!(
            classify_reply("Posso MOVER a reunião para outra DATA. Deseja confirmar?"),
            ReplyKind::ActionProposal
        );
    }

    #[test]
    fn context_keeps_only_todays_eligible_records() {
        let store = LocalStore::open_in_memory().unwrap();
        let now = Local.with_ymd_and_hms(2026, 6, 10, 14, 0, 0).unwrap();
        let (today, start, end) = today_bounds_local(&now);
        let ms = now.timestamp_millis();

        let routine = |id: i64, text: &str, date: i64, origin, confirmed| RoutineRecord {
            id,
            text: text.to_string(),
            date,
            origin,
            confirmed,
        };
        store
            .bulk_insert_routines(&[
                routine(1, "caminhada", start, RoutineOrigin::Manual, None),
                routine(2, "yoga", end, RoutineOrigin::Chat, Some(true)),
                routine(3, "pendente", ms, RoutineOrigin::Chat, None),
                routine(4, "ontem", start - 1, RoutineOrigin::Manual, None),
                routine(5, "amanhã", end + 1, RoutineOrigin::Manual, None),
            ])
            .unwrap();

        let task = |id: i64, title: &str, done: bool, priority| Task {
            id,
            title: title.to_string(),
            done,
            priority,
            created_at: None,
        };
        store
            .bulk_insert_tasks(&[
                task(1, "aberta", false, Some(Priority::Important)),
                task(2, "feita", true, None),
                task(3, "sem prioridade", false, None),
            ])
            .unwrap();

        let next_week = date_key((now + chrono::Duration::milliseconds(7 * DAY_MS)).date_naive());
        let event = |id: i64, title: &str, date: Option<String>, time: Option<&str>| CalendarEvent {
            id,
            title: title.to_string(),
            date,
            time: time.map(str::to_string),
            energy: None,
        };
        store
            .bulk_insert_events(&[
                event(1, "dentista", Some(today.clone()), Some("09:30")),
                event(2, "antigo", None, None),
                event(3, "semana que vem", Some(next_week), None),
            ])
            .unwrap();

        let ctx = assemble_context(&store, &now).unwrap();
        assert_eq!(ctx.routines, vec!["caminhada".to_string(), "yoga".to_string()]);
        assert_eq!(ctx.tasks.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(ctx.tasks[0].priority, Some(Priority::Important));
        assert_eq!(ctx.calendar.len(), 2);
        assert_eq!(ctx.calendar[0].time.as_deref(), Some("09:30"));
    }
}
