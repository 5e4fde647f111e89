use std::sync::Arc;

use rusqlite::Connection;

pub struct AppState {
    /// SQLite database connection, opened once per process
    pub db: Arc<std::sync::Mutex<Connection>>,
}

impl AppState {
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(std::sync::Mutex::new(conn)),
        }
    }
}

// Implement Clone manually so blocking tasks can share the connection
impl Clone for AppState {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
        }
    }
}
