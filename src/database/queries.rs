use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{LifeError, LifeResult};
use crate::models::{
    CalendarEvent, Energy, EventPatch, FinanceState, Frequency, Habit, HabitPatch, Priority,
    RoutineOrigin, RoutinePatch, RoutineRecord, Task, TaskPatch, FINANCE_STATE_ID,
};

// ─── Tasks ───

const TASK_COLUMNS: &str = "id, title, done, priority, created_at";

fn task_from_row(row: &Row) -> rusqlite::Result<Task> {
    let priority: Option<String> = row.get(3)?;
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        done: row.get(2)?,
        priority: priority.as_deref().and_then(Priority::parse),
        created_at: row.get(4)?,
    })
}

pub fn list_tasks(conn: &Connection) -> LifeResult<Vec<Task>> {
    let mut stmt = conn.prepare(&format!("SELECT {} FROM tasks ORDER BY id", TASK_COLUMNS))?;
    let tasks = stmt
        .query_map([], task_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

pub fn get_task(conn: &Connection, id: i64) -> LifeResult<Task> {
    conn.query_row(
        &format!("SELECT {} FROM tasks WHERE id = ?1", TASK_COLUMNS),
        [id],
        task_from_row,
    )
    .optional()?
    .ok_or(LifeError::NotFound { collection: "tasks", id })
}

pub fn insert_task(conn: &Connection, task: &Task) -> LifeResult<()> {
    conn.execute(
        "INSERT INTO tasks (id, title, done, priority, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            task.id,
            task.title,
            task.done,
            task.priority.map(|p| p.as_str()),
            task.created_at,
        ],
    )?;
    Ok(())
}

pub fn bulk_insert_tasks(conn: &Connection, tasks: &[Task]) -> LifeResult<()> {
    for task in tasks {
        insert_task(conn, task)?;
    }
    Ok(())
}

pub fn update_task(conn: &Connection, id: i64, patch: &TaskPatch) -> LifeResult<Task> {
    let mut task = get_task(conn, id)?;
    if let Some(title) = &patch.title {
        task.title = title.clone();
    }
    if let Some(done) = patch.done {
        task.done = done;
    }
    if let Some(priority) = patch.priority {
        task.priority = Some(priority);
    }
    conn.execute(
        "UPDATE tasks SET title = ?1, done = ?2, priority = ?3 WHERE id = ?4",
        params![task.title, task.done, task.priority.map(|p| p.as_str()), id],
    )?;
    Ok(task)
}

pub fn delete_task(conn: &Connection, id: i64) -> LifeResult<()> {
    let deleted = conn.execute("DELETE FROM tasks WHERE id = ?1", [id])?;
    if deleted == 0 {
        return Err(LifeError::NotFound { collection: "tasks", id });
    }
    Ok(())
}

// ─── Habits ───

const HABIT_COLUMNS: &str =
    "id, title, done, frequency, last_done_at, created_at, scheduled_weekday";

fn habit_from_row(row: &Row) -> rusqlite::Result<Habit> {
    let frequency: Option<String> = row.get(3)?;
    let weekday: Option<i64> = row.get(6)?;
    Ok(Habit {
        id: row.get(0)?,
        title: row.get(1)?,
        done: row.get(2)?,
        frequency: frequency.as_deref().and_then(Frequency::parse),
        last_done_at: row.get(4)?,
        created_at: row.get(5)?,
        scheduled_weekday: weekday.and_then(|d| u8::try_from(d).ok()).filter(|d| *d <= 6),
    })
}

pub fn list_habits(conn: &Connection) -> LifeResult<Vec<Habit>> {
    let mut stmt = conn.prepare(&format!("SELECT {} FROM habits ORDER BY id", HABIT_COLUMNS))?;
    let habits = stmt
        .query_map([], habit_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(habits)
}

pub fn get_habit(conn: &Connection, id: i64) -> LifeResult<Habit> {
    conn.query_row(
        &format!("SELECT {} FROM habits WHERE id = ?1", HABIT_COLUMNS),
        [id],
        habit_from_row,
    )
    .optional()?
    .ok_or(LifeError::NotFound { collection: "habits", id })
}

pub fn insert_habit(conn: &Connection, habit: &Habit) -> LifeResult<()> {
    conn.execute(
        "INSERT INTO habits (id, title, done, frequency, last_done_at, created_at, scheduled_weekday)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            habit.id,
            habit.title,
            habit.done,
            habit.frequency.map(|f| f.as_str()),
            habit.last_done_at,
            habit.created_at,
            habit.scheduled_weekday,
        ],
    )?;
    Ok(())
}

pub fn bulk_insert_habits(conn: &Connection, habits: &[Habit]) -> LifeResult<()> {
    for habit in habits {
        insert_habit(conn, habit)?;
    }
    Ok(())
}

pub fn update_habit(conn: &Connection, id: i64, patch: &HabitPatch) -> LifeResult<Habit> {
    let mut habit = get_habit(conn, id)?;
    if let Some(title) = &patch.title {
        habit.title = title.clone();
    }
    if let Some(done) = patch.done {
        habit.done = done;
    }
    if let Some(frequency) = patch.frequency {
        habit.frequency = Some(frequency);
    }
    if let Some(last_done_at) = patch.last_done_at {
        habit.last_done_at = last_done_at;
    }
    if let Some(weekday) = patch.scheduled_weekday {
        habit.scheduled_weekday = weekday;
    }
    conn.execute(
        "UPDATE habits SET title = ?1, done = ?2, frequency = ?3, last_done_at = ?4, scheduled_weekday = ?5
         WHERE id = ?6",
        params![
            habit.title,
            habit.done,
            habit.frequency.map(|f| f.as_str()),
            habit.last_done_at,
            habit.scheduled_weekday,
            id,
        ],
    )?;
    Ok(habit)
}

pub fn delete_habit(conn: &Connection, id: i64) -> LifeResult<()> {
    let deleted = conn.execute("DELETE FROM habits WHERE id = ?1", [id])?;
    if deleted == 0 {
        return Err(LifeError::NotFound { collection: "habits", id });
    }
    Ok(())
}

// ─── Calendar ───

const EVENT_COLUMNS: &str = "id, title, date, time, energy";

fn event_from_row(row: &Row) -> rusqlite::Result<CalendarEvent> {
    let energy: Option<String> = row.get(4)?;
    Ok(CalendarEvent {
        id: row.get(0)?,
        title: row.get(1)?,
        date: row.get(2)?,
        time: row.get(3)?,
        energy: energy.as_deref().and_then(Energy::parse),
    })
}

pub fn list_events(conn: &Connection) -> LifeResult<Vec<CalendarEvent>> {
    let mut stmt = conn.prepare(&format!("SELECT {} FROM calendar ORDER BY id", EVENT_COLUMNS))?;
    let events = stmt
        .query_map([], event_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(events)
}

pub fn get_event(conn: &Connection, id: i64) -> LifeResult<CalendarEvent> {
    conn.query_row(
        &format!("SELECT {} FROM calendar WHERE id = ?1", EVENT_COLUMNS),
        [id],
        event_from_row,
    )
    .optional()?
    .ok_or(LifeError::NotFound { collection: "calendar", id })
}

pub fn insert_event(conn: &Connection, event: &CalendarEvent) -> LifeResult<()> {
    conn.execute(
        "INSERT INTO calendar (id, title, date, time, energy) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            event.id,
            event.title,
            event.date,
            event.time,
            event.energy.map(|e| e.as_str()),
        ],
    )?;
    Ok(())
}

pub fn bulk_insert_events(conn: &Connection, events: &[CalendarEvent]) -> LifeResult<()> {
    for event in events {
        insert_event(conn, event)?;
    }
    Ok(())
}

pub fn update_event(conn: &Connection, id: i64, patch: &EventPatch) -> LifeResult<CalendarEvent> {
    let mut event = get_event(conn, id)?;
    if let Some(title) = &patch.title {
        event.title = title.clone();
    }
    if let Some(date) = &patch.date {
        event.date = Some(date.clone());
    }
    if let Some(time) = &patch.time {
        event.time = time.clone();
    }
    if let Some(energy) = patch.energy {
        event.energy = Some(energy);
    }
    conn.execute(
        "UPDATE calendar SET title = ?1, date = ?2, time = ?3, energy = ?4 WHERE id = ?5",
        params![
            event.title,
            event.date,
            event.time,
            event.energy.map(|e| e.as_str()),
            id,
        ],
    )?;
    Ok(event)
}

pub fn delete_event(conn: &Connection, id: i64) -> LifeResult<()> {
    let deleted = conn.execute("DELETE FROM calendar WHERE id = ?1", [id])?;
    if deleted == 0 {
        return Err(LifeError::NotFound { collection: "calendar", id });
    }
    Ok(())
}

// ─── Routines ───

const ROUTINE_COLUMNS: &str = "id, text, date, origin, confirmed";

fn routine_from_row(row: &Row) -> rusqlite::Result<RoutineRecord> {
    let origin: String = row.get(3)?;
    Ok(RoutineRecord {
        id: row.get(0)?,
        text: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        date: row.get(2)?,
        // An unreadable origin is treated as chat so it still needs confirmation.
        origin: RoutineOrigin::parse(&origin).unwrap_or(RoutineOrigin::Chat),
        confirmed: row.get(4)?,
    })
}

pub fn list_routines(conn: &Connection) -> LifeResult<Vec<RoutineRecord>> {
    let mut stmt = conn.prepare(&format!("SELECT {} FROM routines ORDER BY id", ROUTINE_COLUMNS))?;
    let routines = stmt
        .query_map([], routine_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(routines)
}

/// Records whose `date` lies in `[start, end]` (both inclusive, ms).
pub fn list_routines_between(
    conn: &Connection,
    start: i64,
    end: i64,
) -> LifeResult<Vec<RoutineRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM routines WHERE date >= ?1 AND date <= ?2 ORDER BY date",
        ROUTINE_COLUMNS
    ))?;
    let routines = stmt
        .query_map([start, end], routine_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(routines)
}

pub fn get_routine(conn: &Connection, id: i64) -> LifeResult<RoutineRecord> {
    conn.query_row(
        &format!("SELECT {} FROM routines WHERE id = ?1", ROUTINE_COLUMNS),
        [id],
        routine_from_row,
    )
    .optional()?
    .ok_or(LifeError::NotFound { collection: "routines", id })
}

pub fn insert_routine(conn: &Connection, routine: &RoutineRecord) -> LifeResult<()> {
    conn.execute(
        "INSERT INTO routines (id, text, date, origin, confirmed) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            routine.id,
            routine.text,
            routine.date,
            routine.origin.as_str(),
            routine.confirmed,
        ],
    )?;
    Ok(())
}

pub fn bulk_insert_routines(conn: &Connection, routines: &[RoutineRecord]) -> LifeResult<()> {
    for routine in routines {
        insert_routine(conn, routine)?;
    }
    Ok(())
}

pub fn update_routine(
    conn: &Connection,
    id: i64,
    patch: &RoutinePatch,
) -> LifeResult<RoutineRecord> {
    let mut routine = get_routine(conn, id)?;
    if let Some(text) = &patch.text {
        routine.text = text.clone();
    }
    if let Some(confirmed) = patch.confirmed {
        routine.confirmed = Some(confirmed);
    }
    conn.execute(
        "UPDATE routines SET text = ?1, confirmed = ?2 WHERE id = ?3",
        params![routine.text, routine.confirmed, id],
    )?;
    Ok(routine)
}

pub fn delete_routine(conn: &Connection, id: i64) -> LifeResult<()> {
    let deleted = conn.execute("DELETE FROM routines WHERE id = ?1", [id])?;
    if deleted == 0 {
        return Err(LifeError::NotFound { collection: "routines", id });
    }
    Ok(())
}

/// Deletes whichever of `ids` exist; returns how many rows went away.
pub fn delete_routines(conn: &Connection, ids: &[i64]) -> LifeResult<usize> {
    let mut deleted = 0;
    for id in ids {
        deleted += conn.execute("DELETE FROM routines WHERE id = ?1", [id])?;
    }
    Ok(deleted)
}

// ─── Finance ───

pub fn get_finance_state(conn: &Connection) -> LifeResult<Option<FinanceState>> {
    let state = conn
        .query_row(
            "SELECT fase_atual, total_divida, prazo_alvo_meses, ritmo_mensal, ritmo_diario,
                    foco_atual, ultima_atualizacao
             FROM finance_state WHERE id = ?1",
            [FINANCE_STATE_ID],
            |row| {
                Ok(FinanceState {
                    fase_atual: row.get(0)?,
                    total_divida: row.get(1)?,
                    prazo_alvo_meses: row.get(2)?,
                    ritmo_mensal: row.get(3)?,
                    ritmo_diario: row.get(4)?,
                    foco_atual: row.get(5)?,
                    ultima_atualizacao: row.get(6)?,
                })
            },
        )
        .optional()?;
    Ok(state)
}

pub fn put_finance_state(conn: &Connection, state: &FinanceState) -> LifeResult<()> {
    conn.execute(
        "INSERT INTO finance_state
            (id, fase_atual, total_divida, prazo_alvo_meses, ritmo_mensal, ritmo_diario,
             foco_atual, ultima_atualizacao)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(id) DO UPDATE SET
            fase_atual = excluded.fase_atual,
            total_divida = excluded.total_divida,
            prazo_alvo_meses = excluded.prazo_alvo_meses,
            ritmo_mensal = excluded.ritmo_mensal,
            ritmo_diario = excluded.ritmo_diario,
            foco_atual = excluded.foco_atual,
            ultima_atualizacao = excluded.ultima_atualizacao",
        params![
            FINANCE_STATE_ID,
            state.fase_atual,
            state.total_divida,
            state.prazo_alvo_meses,
            state.ritmo_mensal,
            state.ritmo_diario,
            state.foco_atual,
            state.ultima_atualizacao,
        ],
    )?;
    Ok(())
}

// ─── Stats ───

pub fn count_rows(conn: &Connection, table: &str) -> LifeResult<i64> {
    let count = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })?;
    Ok(count)
}
