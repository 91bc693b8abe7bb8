//! Catalog service for Cafetería El Rincón Mexicano.
//!
//! Categories, products and desserts are stored in SQLite and keyed by
//! per-collection integer sequences minted by [`db::CounterRepository`].

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod server;

pub use catalog::Catalog;
pub use config::Config;
pub use error::{CatalogError, EntityKind};
