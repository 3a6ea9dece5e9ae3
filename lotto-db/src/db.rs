use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

use crate::models::{NewUser, User};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    username  TEXT NOT NULL UNIQUE,
    password  TEXT NOT NULL,
    name      TEXT NOT NULL,
    age       INTEGER NOT NULL,
    gender    TEXT NOT NULL
);
";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("lotto.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create directory {:?}", parent))?;
        }
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Cannot open database {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Migration failed")?;
    Ok(())
}

/// Inserts the user unless the username is taken.
/// Returns the new row id, or `None` when the username already exists.
pub fn insert_user(conn: &Connection, user: &NewUser) -> Result<Option<i64>> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO users (username, password, name, age, gender)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            user.username,
            user.password_hash,
            user.name,
            user.age,
            user.gender,
        ],
    ).context("Insert failed")?;
    if changed == 0 {
        return Ok(None);
    }
    Ok(Some(conn.last_insert_rowid()))
}

pub fn find_user_by_username(conn: &Connection, username: &str) -> Result<Option<User>> {
    let user = conn
        .query_row(
            "SELECT id, username, password, name, age, gender FROM users WHERE username = ?1",
            [username],
            |row| {
                Ok(User {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    password_hash: row.get(2)?,
                    name: row.get(3)?,
                    age: row.get(4)?,
                    gender: row.get(5)?,
                })
            },
        )
        .optional()
        .with_context(|| format!("Lookup of user '{}' failed", username))?;
    Ok(user)
}

pub fn count_users(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
    Ok(count)
}
