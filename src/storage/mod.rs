//! Local SQLite store.
//!
//! Holds the named key-value slots the feed cache persists to. The store
//! outlives the process, so a cached feed survives a restart.

mod schema;
mod slots;
mod types;

pub use schema::Database;
pub use types::DatabaseError;
