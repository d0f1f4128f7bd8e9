//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Deep-Mapsite database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Every discovered URL, at most one row per URL
CREATE TABLE IF NOT EXISTS discovered_urls (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL UNIQUE,
    category TEXT NOT NULL,
    phase TEXT NOT NULL,
    depth INTEGER NOT NULL,
    discovered_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_discovered_category ON discovered_urls(category);
CREATE INDEX IF NOT EXISTS idx_discovered_phase ON discovered_urls(phase);

-- One scrape result per fetched URL, keyed by SHA-256 of the URL
CREATE TABLE IF NOT EXISTS artifacts (
    key TEXT PRIMARY KEY,
    url TEXT NOT NULL,
    phase TEXT NOT NULL,
    depth INTEGER NOT NULL,
    category TEXT NOT NULL,
    fetched_at TEXT NOT NULL,
    content TEXT NOT NULL
);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
