//! Derived signals over the store contents.
//!
//! Everything here is a pure function of the records plus "now", except the
//! `load_*` helpers which only add the full scans in front.
//!
//! Two habit-risk rules coexist on purpose: the commentary feed uses the
//! completion-time windows ([`is_habit_at_risk`]) while the dashboard cards use
//! the plain `done` flag ([`daily_insights`]).

use chrono::{DateTime, Local};

use crate::database::LocalStore;
use crate::error::LifeResult;
use crate::models::{
    CalendarEvent, CalendarLoad, DailyInsights, Frequency, Habit, Insight, InsightCategory,
    InsightKind, LifeContext, OverloadLevel, Priority, Task, TaskBoard,
};
use crate::utils::{today_bounds_local, weekday_index, DAY_MS, HOUR_MS};

const DAILY_RISK_WINDOW_MS: i64 = 48 * HOUR_MS;
const WEEKLY_RISK_WINDOW_MS: i64 = 14 * DAY_MS;

const OVERDUE_AFTER_MS: i64 = 7 * DAY_MS;
const PRIORITY_WINDOW_MS: i64 = DAY_MS;

struct OverloadThresholds {
    tasks: usize,
    habits: usize,
    events: usize,
}

const HIGH: OverloadThresholds = OverloadThresholds {
    tasks: 15,
    habits: 6,
    events: 6,
};
const MEDIUM: OverloadThresholds = OverloadThresholds {
    tasks: 8,
    habits: 3,
    events: 3,
};

// ─── Context insights ───

/// Daily habits go stale after 48h, weekly ones after 14 days. A habit never
/// completed counts from the epoch, so it is always at risk.
pub fn is_habit_at_risk(habit: &Habit, now_ms: i64) -> bool {
    let last = habit.last_done_at.unwrap_or(0);
    let elapsed = now_ms.saturating_sub(last);
    match habit.effective_frequency() {
        Frequency::Daily => elapsed > DAILY_RISK_WINDOW_MS,
        Frequency::Weekly => elapsed > WEEKLY_RISK_WINDOW_MS,
    }
}

pub fn overload_level(open_tasks: usize, habits_at_risk: usize, today_events: usize) -> OverloadLevel {
    let exceeds = |t: &OverloadThresholds| {
        open_tasks >= t.tasks || habits_at_risk >= t.habits || today_events >= t.events
    };
    if exceeds(&HIGH) {
        OverloadLevel::Alto
    } else if exceeds(&MEDIUM) {
        OverloadLevel::Medio
    } else {
        OverloadLevel::Baixo
    }
}

pub fn life_context(
    tasks: &[Task],
    habits: &[Habit],
    events: &[CalendarEvent],
    now_ms: i64,
    today_key: &str,
) -> LifeContext {
    let open_tasks = tasks.iter().filter(|t| !t.done).count();
    let habits_at_risk = habits
        .iter()
        .filter(|h| is_habit_at_risk(h, now_ms))
        .count();
    let today_events = events_on(events, today_key).len();

    LifeContext {
        open_tasks,
        habits_at_risk,
        today_events,
        overload_level: overload_level(open_tasks, habits_at_risk, today_events),
    }
}

/// Neutral commentary lines, in display order.
pub fn analyze_life_context(ctx: &LifeContext) -> Vec<Insight> {
    let mut insights = Vec::new();

    insights.push(Insight {
        kind: InsightKind::Info,
        category: InsightCategory::OpenTasks,
        message: format!("Tarefas abertas: {}", ctx.open_tasks),
    });

    if ctx.habits_at_risk > 0 {
        insights.push(Insight {
            kind: InsightKind::Warning,
            category: InsightCategory::HabitsAtRisk,
            message: format!("Há {} hábito(s) em risco hoje.", ctx.habits_at_risk),
        });
    }

    let (kind, category, message) = match ctx.overload_level {
        OverloadLevel::Alto => (
            InsightKind::Warning,
            InsightCategory::CalendarOverload,
            "Carga alta hoje — avalie prioridades.",
        ),
        OverloadLevel::Medio => (
            InsightKind::Info,
            InsightCategory::CalendarOverload,
            "Carga moderada hoje.",
        ),
        // A calm day is not an overload signal.
        OverloadLevel::Baixo => (InsightKind::Info, InsightCategory::General, "Dia tranquilo."),
    };
    insights.push(Insight {
        kind,
        category,
        message: message.to_string(),
    });

    if ctx.open_tasks >= 10 {
        insights.push(Insight {
            kind: InsightKind::Warning,
            category: InsightCategory::OpenTasks,
            message: format!("Número elevado de tarefas em aberto: {}.", ctx.open_tasks),
        });
    } else if ctx.open_tasks >= 5 {
        insights.push(Insight {
            kind: InsightKind::Info,
            category: InsightCategory::OpenTasks,
            message: "Há várias tarefas em aberto.".to_string(),
        });
    }

    insights
}

/// First warning, otherwise the first line.
pub fn primary_insight(insights: &[Insight]) -> Option<&Insight> {
    insights
        .iter()
        .find(|i| i.kind == InsightKind::Warning)
        .or_else(|| insights.first())
}

// ─── Daily insights ───

pub fn calendar_load(event_count: usize) -> CalendarLoad {
    if event_count <= 2 {
        CalendarLoad::Light
    } else if event_count >= 6 {
        CalendarLoad::Heavy
    } else {
        CalendarLoad::Balanced
    }
}

/// `calendar_load` counts every stored event, not only today's.
pub fn daily_insights(
    tasks: &[Task],
    habits: &[Habit],
    events: &[CalendarEvent],
    now_ms: i64,
) -> DailyInsights {
    let overdue_tasks_count = tasks
        .iter()
        .filter(|t| !t.done && now_ms.saturating_sub(t.created_at_ms()) > OVERDUE_AFTER_MS)
        .count();

    let habits_at_risk = habits.iter().filter(|h| !h.done).count();

    let has_priority_today = tasks
        .iter()
        .any(|t| !t.done && now_ms.saturating_sub(t.created_at_ms()) <= PRIORITY_WINDOW_MS);

    DailyInsights {
        overdue_tasks_count,
        habits_at_risk,
        calendar_load: calendar_load(events.len()),
        has_priority_today,
    }
}

// ─── Lists ───

/// Tasks whose effective priority matches; no priority means essential.
pub fn filter_by_priority(tasks: &[Task], priority: Priority) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|t| t.effective_priority() == priority)
        .collect()
}

pub fn task_board(tasks: &[Task]) -> TaskBoard {
    let mut board = TaskBoard::default();
    for task in tasks {
        let bucket = if task.done {
            &mut board.done
        } else {
            match task.effective_priority() {
                Priority::Essential => &mut board.essential,
                Priority::Important => &mut board.important,
                Priority::Optional => &mut board.optional,
            }
        };
        bucket.push(task.clone());
    }
    board
}

pub fn habits_scheduled_on(habits: &[Habit], weekday: u8) -> Vec<&Habit> {
    habits.iter().filter(|h| h.is_scheduled_on(weekday)).collect()
}

/// Events with no date read as today; events with no energy read as `media`.
pub fn normalize_events(events: Vec<CalendarEvent>, today_key: &str) -> Vec<CalendarEvent> {
    events
        .into_iter()
        .map(|mut ev| {
            if ev.date.is_none() {
                ev.date = Some(today_key.to_string());
            }
            ev.energy = Some(ev.effective_energy());
            ev
        })
        .collect()
}

pub fn events_on<'a>(events: &'a [CalendarEvent], date_key: &str) -> Vec<&'a CalendarEvent> {
    events
        .iter()
        .filter(|ev| ev.date_or(date_key) == date_key)
        .collect()
}

// ─── Store-backed ───

pub fn load_life_context(store: &LocalStore, now: &DateTime<Local>) -> LifeResult<LifeContext> {
    let tasks = store.list_tasks()?;
    let habits = store.list_habits()?;
    let events = store.list_events()?;
    let (today_key, _, _) = today_bounds_local(now);
    Ok(life_context(
        &tasks,
        &habits,
        &events,
        now.timestamp_millis(),
        &today_key,
    ))
}

pub fn load_daily_insights(store: &LocalStore, now: &DateTime<Local>) -> LifeResult<DailyInsights> {
    let tasks = store.list_tasks()?;
    let habits = store.list_habits()?;
    let events = store.list_events()?;
    Ok(daily_insights(&tasks, &habits, &events, now.timestamp_millis()))
}

pub fn load_habits_for_today(store: &LocalStore, now: &DateTime<Local>) -> LifeResult<Vec<Habit>> {
    let habits = store.list_habits()?;
    let weekday = weekday_index(now);
    Ok(habits_scheduled_on(&habits, weekday)
        .into_iter()
        .cloned()
        .collect())
}
