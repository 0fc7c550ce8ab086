// Paysweep Infrastructure - SQLite Adapter
// Implements: OrderStore

mod connection;
mod migration;
mod order_store;

pub use connection::create_pool;
pub use migration::run_migrations;
pub use order_store::SqliteOrderStore;

// Note: sqlx::Error conversion is handled by wrapping in helper functions
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
