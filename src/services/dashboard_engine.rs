use chrono::{DateTime, Local};

use crate::database::LocalStore;
use crate::error::LifeResult;
use crate::models::{DashboardOverview, Tone};
use crate::services::insight_engine::{analyze_life_context, daily_insights, life_context, primary_insight};
use crate::services::tone_adapter::{adapt_insight, passive_opener};
use crate::utils::today_bounds_local;

/// Everything the dashboard shows, computed from one read of the three
/// collections.
pub fn build_dashboard_overview(
    store: &LocalStore,
    now: &DateTime<Local>,
    tone: Tone,
) -> LifeResult<DashboardOverview> {
    let (date_key, _, _) = today_bounds_local(now);
    let now_ms = now.timestamp_millis();

    let tasks = store.list_tasks()?;
    let habits = store.list_habits()?;
    let events = store.list_events()?;

    let context = life_context(&tasks, &habits, &events, now_ms, &date_key);
    let daily = daily_insights(&tasks, &habits, &events, now_ms);
    let insights = analyze_life_context(&context);
    let message = primary_insight(&insights).map(|i| adapt_insight(i.category, &i.message, tone).message);
    let passive_opener = passive_opener(&daily, tone);

    log::debug!(
        "dashboard for {}: {} open task(s), overload {}",
        date_key,
        context.open_tasks,
        context.overload_level.as_str()
    );

    Ok(DashboardOverview {
        date_key,
        context,
        daily,
        insights,
        message,
        passive_opener,
        updated_at: now_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Habit, InsightKind, OverloadLevel, Task};
    use chrono::TimeZone;

    #[test]
    fn empty_store_is_a_calm_day() {
        let store = LocalStore::open_in_memory().unwrap();
        let now = Local.with_ymd_and_hms(2026, 6, 10, 9, 0, 0).unwrap();
        let overview = build_dashboard_overview(&store, &now, Tone::Balanced).unwrap();

        assert_eq!(overview.date_key, "2026-06-10");
        assert_eq!(overview.context.open_tasks, 0);
        assert_eq!(overview.context.overload_level, OverloadLevel::Baixo);
        assert_eq!(overview.insights[0].message, "Tarefas abertas: 0");
        assert!(overview.message.is_some());
        assert_eq!(overview.updated_at, now.timestamp_millis());
    }

    #[test]
    fn warning_drives_the_message() {
        let store = LocalStore::open_in_memory().unwrap();
        let now = Local.with_ymd_and_hms(2026, 6, 10, 9, 0, 0).unwrap();
        store
            .insert_task(&Task {
                id: 1,
                title: "relatório".into(),
                done: false,
                priority: None,
                created_at: Some(now.timestamp_millis()),
            })
            .unwrap();
        store
            .insert_habit(&Habit {
                id: 2,
                title: "correr".into(),
                done: false,
                frequency: None,
                last_done_at: None,
                created_at: None,
                scheduled_weekday: None,
            })
            .unwrap();

        let overview = build_dashboard_overview(&store, &now, Tone::Direct).unwrap();
        assert_eq!(overview.context.habits_at_risk, 1);
        assert!(overview
            .insights
            .iter()
            .any(|i| i.kind == InsightKind::Warning));
        assert_eq!(
            overview.message.as_deref(),
            Some("Há itens da rotina em risco — corrija hoje.")
        );
        assert!(overview.daily.has_priority_today);
    }
}
