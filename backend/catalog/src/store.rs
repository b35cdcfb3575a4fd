//! # Store
//!
//! The document database behind both repositories. Plain create/read/replace access, nothing
//! smarter: no transactions, no versioning. Two concurrent read-modify-replace cycles on the same
//! document race and the last write wins.
//!
//! Implementations:
//! - [`crate::mongo::MongoStore`]: the deployed MongoDB collections
//! - [`crate::memory::MemoryStore`]: process-local, used by tests and local runs
use async_trait::async_trait;
use thiserror::Error;

use crate::{model::Nootropic, stack::StoredStack};

pub const NOOTROPICS: &str = "nootropics";
pub const STACKS: &str = "stacks";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

#[async_trait]
pub trait Store: Send + Sync {
    /// All nootropics in storage order.
    async fn nootropics(&self) -> Result<Vec<Nootropic>, StoreError>;

    async fn nootropic_by_name(&self, name: &str) -> Result<Option<Nootropic>, StoreError>;

    async fn nootropic_by_id(&self, id: &str) -> Result<Option<Nootropic>, StoreError>;

    /// Fails with [`StoreError::DuplicateKey`] if the substance name is taken.
    async fn insert_nootropic(&self, nootropic: &Nootropic) -> Result<(), StoreError>;

    /// Clears the collection, then inserts `nootropics`. Returns how many were inserted.
    async fn reset_nootropics(&self, nootropics: &[Nootropic]) -> Result<usize, StoreError>;

    async fn stacks(&self) -> Result<Vec<StoredStack>, StoreError>;

    async fn stack_by_id(&self, id: &str) -> Result<Option<StoredStack>, StoreError>;

    async fn insert_stack(&self, stack: &StoredStack) -> Result<(), StoreError>;

    /// Overwrites the stack with the same `_id`. `false` if there was none.
    async fn replace_stack(&self, stack: &StoredStack) -> Result<bool, StoreError>;
}
