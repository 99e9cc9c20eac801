pub mod database;
pub mod session_db;

pub use session_db::SessionDatabase;
