use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use crate::error::LifeResult;
use crate::models::{
    CalendarEvent, EventPatch, FinanceState, Habit, HabitPatch, RoutinePatch, RoutineRecord,
    StorageStats, Task, TaskPatch,
};

pub mod queries;
pub mod schema;

pub const DB_FILE_NAME: &str = "lifeos.db";

pub fn init_database(db_path: &Path) -> LifeResult<Connection> {
    let conn = Connection::open(db_path)?;

    // Enable WAL mode
    conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;

    let version = schema::create_tables(&conn)?;
    log::debug!("opened store at {} (schema v{})", db_path.display(), version);

    Ok(conn)
}

/// Process-wide handle over the record store. Each call holds the connection
/// only for its own duration; the import replace is the one multi-table write.
pub struct LocalStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl LocalStore {
    pub fn open(db_path: &Path) -> LifeResult<Self> {
        let conn = init_database(db_path)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(db_path.to_path_buf()),
        })
    }

    pub fn open_in_memory() -> LifeResult<Self> {
        let conn = Connection::open_in_memory()?;
        schema::create_tables(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[cfg(test)]
    pub(crate) fn execute_batch(&self, sql: &str) -> LifeResult<()> {
        self.conn().execute_batch(sql)?;
        Ok(())
    }

    // Tasks

    pub fn list_tasks(&self) -> LifeResult<Vec<Task>> {
        queries::list_tasks(&self.conn())
    }

    pub fn insert_task(&self, task: &Task) -> LifeResult<()> {
        queries::insert_task(&self.conn(), task)
    }

    pub fn bulk_insert_tasks(&self, tasks: &[Task]) -> LifeResult<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        queries::bulk_insert_tasks(&tx, tasks)?;
        tx.commit()?;
        Ok(())
    }

    pub fn update_task(&self, id: i64, patch: &TaskPatch) -> LifeResult<Task> {
        queries::update_task(&self.conn(), id, patch)
    }

    pub fn delete_task(&self, id: i64) -> LifeResult<()> {
        queries::delete_task(&self.conn(), id)
    }

    // Habits

    pub fn list_habits(&self) -> LifeResult<Vec<Habit>> {
        queries::list_habits(&self.conn())
    }

    pub fn insert_habit(&self, habit: &Habit) -> LifeResult<()> {
        queries::insert_habit(&self.conn(), habit)
    }

    pub fn bulk_insert_habits(&self, habits: &[Habit]) -> LifeResult<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        queries::bulk_insert_habits(&tx, habits)?;
        tx.commit()?;
        Ok(())
    }

    pub fn update_habit(&self, id: i64, patch: &HabitPatch) -> LifeResult<Habit> {
        queries::update_habit(&self.conn(), id, patch)
    }

    pub fn delete_habit(&self, id: i64) -> LifeResult<()> {
        queries::delete_habit(&self.conn(), id)
    }

    // Calendar

    pub fn list_events(&self) -> LifeResult<Vec<CalendarEvent>> {
        queries::list_events(&self.conn())
    }

    pub fn insert_event(&self, event: &CalendarEvent) -> LifeResult<()> {
        queries::insert_event(&self.conn(), event)
    }

    pub fn bulk_insert_events(&self, events: &[CalendarEvent]) -> LifeResult<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        queries::bulk_insert_events(&tx, events)?;
        tx.commit()?;
        Ok(())
    }

    pub fn update_event(&self, id: i64, patch: &EventPatch) -> LifeResult<CalendarEvent> {
        queries::update_event(&self.conn(), id, patch)
    }

    pub fn delete_event(&self, id: i64) -> LifeResult<()> {
        queries::delete_event(&self.conn(), id)
    }

    // Routines

    pub fn list_routines(&self) -> LifeResult<Vec<RoutineRecord>> {
        queries::list_routines(&self.conn())
    }

    pub fn list_routines_between(&self, start: i64, end: i64) -> LifeResult<Vec<RoutineRecord>> {
        queries::list_routines_between(&self.conn(), start, end)
    }

    pub fn insert_routine(&self, routine: &RoutineRecord) -> LifeResult<()> {
        queries::insert_routine(&self.conn(), routine)
    }

    pub fn bulk_insert_routines(&self, routines: &[RoutineRecord]) -> LifeResult<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        queries::bulk_insert_routines(&tx, routines)?;
        tx.commit()?;
        Ok(())
    }

    pub fn update_routine(&self, id: i64, patch: &RoutinePatch) -> LifeResult<RoutineRecord> {
        queries::update_routine(&self.conn(), id, patch)
    }

    pub fn delete_routine(&self, id: i64) -> LifeResult<()> {
        queries::delete_routine(&self.conn(), id)
    }

    pub fn delete_routines(&self, ids: &[i64]) -> LifeResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        let deleted = queries::delete_routines(&tx, ids)?;
        tx.commit()?;
        Ok(deleted)
    }

    // Finance

    pub fn get_finance_state(&self) -> LifeResult<Option<FinanceState>> {
        queries::get_finance_state(&self.conn())
    }

    pub fn put_finance_state(&self, state: &FinanceState) -> LifeResult<()> {
        queries::put_finance_state(&self.conn(), state)
    }

    /// Clear and refill tasks, habits and calendar in one transaction.
    /// Any failure rolls all three back.
    pub fn replace_collections(
        &self,
        tasks: &[Task],
        habits: &[Habit],
        events: &[CalendarEvent],
    ) -> LifeResult<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM tasks", [])?;
        tx.execute("DELETE FROM habits", [])?;
        tx.execute("DELETE FROM calendar", [])?;
        queries::bulk_insert_tasks(&tx, tasks)?;
        queries::bulk_insert_habits(&tx, habits)?;
        queries::bulk_insert_events(&tx, events)?;
        tx.commit()?;
        Ok(())
    }

    pub fn stats(&self) -> LifeResult<StorageStats> {
        let conn = self.conn();
        // WAL mode keeps recent writes in a sidecar file until checkpoint.
        let total_size_bytes = self
            .path
            .as_ref()
            .map(|p| {
                let wal = PathBuf::from(format!("{}-wal", p.display()));
                [p.as_path(), wal.as_path()]
                    .iter()
                    .filter_map(|f| f.metadata().ok())
                    .map(|m| m.len() as i64)
                    .sum::<i64>()
            })
            .unwrap_or(0);

        Ok(StorageStats {
            total_size_bytes,
            schema_version: schema::current_version(&conn)?,
            tasks_count: queries::count_rows(&conn, "tasks")?,
            habits_count: queries::count_rows(&conn, "habits")?,
            calendar_count: queries::count_rows(&conn, "calendar")?,
            routines_count: queries::count_rows(&conn, "routines")?,
        })
    }
}
