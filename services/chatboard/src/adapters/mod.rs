pub mod json_file;
pub mod sqlite;

pub use json_file::JsonFileStorage;
pub use sqlite::SqliteStorage;
