//! # Catalog
//!
//! Everything about nootropics and stacks that is not HTTP: the document shapes, the rating
//! aggregate, the browse filter, storage and the repositories on top of it.
//!
//! ## Collections
//! - `nootropics`: substance records, unique on `substanceName`
//! - `stacks`: combinations referencing nootropics by `_id`
//!
//! ## Seed Dataset
//! `data/seed.json` is compiled in. Reseeding clears `nootropics` and inserts it as-is.
use mongodb::bson::oid::ObjectId;

pub mod filter;
pub mod memory;
pub mod model;
pub mod mongo;
pub mod repository;
pub mod stack;
pub mod store;

pub use filter::{filter_nootropics, FilterCriteria};
pub use model::{Category, Nootropic};
pub use repository::{CatalogError, NootropicRepository, StackRepository};
pub use stack::{NewStack, ResolvedStack, StackPatch, StoredStack};
pub use store::{Store, StoreError};

const SEED_DATASET: &str = include_str!("../data/seed.json");

pub fn seed_dataset() -> Result<Vec<Nootropic>, serde_json::Error> {
    serde_json::from_str(SEED_DATASET)
}

/// Fresh document id, the hex form of a MongoDB ObjectId.
pub fn new_id() -> String {
    ObjectId::new().to_hex()
}
