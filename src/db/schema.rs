//! SQL DDL for the password history table.

/// SQLite schema with:
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT, so ids never get reused
/// - `created_at` TEXT, RFC3339 UTC
/// - `policy` TEXT, JSON-encoded `GenerationPolicy`
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS passwords (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    value TEXT NOT NULL,
    created_at TEXT NOT NULL,
    policy TEXT NULL,
    website TEXT NULL,
    username TEXT NULL
);
"#;
