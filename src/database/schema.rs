use rusqlite::Connection;

/// Latest schema version. Every step only adds tables or columns, so a store
/// written by an older client opens with its rows intact.
pub const SCHEMA_VERSION: i64 = 6;

const MIGRATIONS: &[(i64, &str)] = &[
    (
        1,
        "CREATE TABLE IF NOT EXISTS tasks (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            done INTEGER NOT NULL DEFAULT 0
        );
        CREATE TABLE IF NOT EXISTS habits (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            done INTEGER NOT NULL DEFAULT 0
        );
        CREATE TABLE IF NOT EXISTS calendar (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL
        );",
    ),
    (
        2,
        "ALTER TABLE tasks ADD COLUMN priority TEXT;
        ALTER TABLE habits ADD COLUMN frequency TEXT;
        ALTER TABLE habits ADD COLUMN last_done_at INTEGER;
        ALTER TABLE habits ADD COLUMN created_at INTEGER;
        ALTER TABLE habits ADD COLUMN scheduled_weekday INTEGER;",
    ),
    (
        3,
        "ALTER TABLE calendar ADD COLUMN date TEXT;
        ALTER TABLE calendar ADD COLUMN time TEXT;
        ALTER TABLE calendar ADD COLUMN energy TEXT;
        CREATE INDEX IF NOT EXISTS idx_calendar_date ON calendar(date);",
    ),
    (
        4,
        "CREATE TABLE IF NOT EXISTS routines (
            id INTEGER PRIMARY KEY,
            text TEXT NOT NULL,
            date INTEGER NOT NULL,
            origin TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_routines_date ON routines(date);",
    ),
    (5, "ALTER TABLE routines ADD COLUMN confirmed INTEGER;"),
    (
        6,
        "CREATE TABLE IF NOT EXISTS finance_state (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            fase_atual TEXT,
            total_divida REAL,
            prazo_alvo_meses INTEGER,
            ritmo_mensal REAL,
            ritmo_diario REAL,
            foco_atual TEXT,
            ultima_atualizacao INTEGER NOT NULL
        );
        ALTER TABLE tasks ADD COLUMN created_at INTEGER;",
    ),
];

pub fn current_version(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
}

/// Bring the store up to `target` (at most [`SCHEMA_VERSION`]).
/// Returns the version the store ends up at.
pub fn migrate_to(conn: &Connection, target: i64) -> rusqlite::Result<i64> {
    let mut version = current_version(conn)?;

    for (step, sql) in MIGRATIONS {
        if *step <= version || *step > target {
            continue;
        }
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", step)?;
        tx.commit()?;
        log::debug!("store schema upgraded to v{}", step);
        version = *step;
    }

    Ok(version)
}

pub fn create_tables(conn: &Connection) -> rusqlite::Result<i64> {
    migrate_to(conn, SCHEMA_VERSION)
}
