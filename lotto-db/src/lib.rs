pub mod db;
pub mod history;
pub mod models;

pub use rusqlite;
