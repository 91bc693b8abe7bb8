//! Catalog operations that span more than one collection.
//!
//! [`Catalog`] bundles the repositories over one shared pool and adds
//! federated search, category relationships, statistics and seeding on top.

mod relations;
mod search;
mod seed;
mod stats;

pub use search::{DessertHit, ProductHit, SearchResults};
pub use seed::SeedReport;
pub use stats::{Statistics, Summary};

use sqlx::SqlitePool;

use crate::db::{CategoryRepository, CounterRepository, DessertRepository, ProductRepository};

#[derive(Clone)]
pub struct Catalog {
    pool: SqlitePool,
    pub counters: CounterRepository,
    pub categories: CategoryRepository,
    pub products: ProductRepository,
    pub desserts: DessertRepository,
}

impl Catalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            counters: CounterRepository::new(pool.clone()),
            categories: CategoryRepository::new(pool.clone()),
            products: ProductRepository::new(pool.clone()),
            desserts: DessertRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
