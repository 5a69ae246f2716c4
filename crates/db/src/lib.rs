pub mod catalog;
pub mod connection;
pub mod fixtures;
pub mod migrations;

pub use catalog::{CatalogStats, SqlCatalog};
pub use connection::{connect, connect_with_settings, DbPool};
pub use fixtures::{ReferenceCatalog, SeedResult, VerificationResult};
