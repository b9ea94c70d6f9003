//! Configuration loading, schema definitions and database discovery

mod database;
mod loader;
mod schema;

pub use database::{locate_database, open_database};
pub use loader::{Config, CONFIG_CANDIDATES};
pub use schema::*;
