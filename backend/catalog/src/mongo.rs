//! # MongoDB
//!
//! Collections `nootropics` and `stacks`. Documents keep their `_id` as the hex string of an
//! ObjectId so the same serde shape serves BSON and JSON.
//!
//! ## Indexes
//! - `nootropics.substanceName`: unique, created on open if missing
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    error::{Error, ErrorKind, WriteFailure},
    options::IndexOptions,
    Collection, Database, IndexModel,
};
use tracing::info;

use crate::{
    model::Nootropic,
    stack::StoredStack,
    store::{Store, StoreError, NOOTROPICS, STACKS},
};

const DUPLICATE_KEY_CODE: i32 = 11000;

pub struct MongoStore {
    nootropics: Collection<Nootropic>,
    stacks: Collection<StoredStack>,
}

impl MongoStore {
    /// Binds to the two collections of `database`, creating indexes if missing.
    pub async fn open(database: &Database) -> Result<Self, StoreError> {
        let store = Self {
            nootropics: database.collection(NOOTROPICS),
            stacks: database.collection(STACKS),
        };

        store.ensure_indexes().await?;
        info!("Opened MongoDB database {}", database.name());

        Ok(store)
    }

    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let unique_name = IndexModel::builder()
            .keys(doc! { "substanceName": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.nootropics.create_index(unique_name, None).await?;

        Ok(())
    }
}

fn is_duplicate_key(error: &Error) -> bool {
    match *error.kind {
        ErrorKind::Write(WriteFailure::WriteError(ref write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        ErrorKind::BulkWrite(ref failure) => failure
            .write_errors
            .as_ref()
            .is_some_and(|errors| errors.iter().any(|e| e.code == DUPLICATE_KEY_CODE)),
        _ => false,
    }
}

fn duplicate_or(error: Error, key: &str) -> StoreError {
    if is_duplicate_key(&error) {
        StoreError::DuplicateKey(key.to_string())
    } else {
        StoreError::Database(error)
    }
}

#[async_trait]
impl Store for MongoStore {
    async fn nootropics(&self) -> Result<Vec<Nootropic>, StoreError> {
        let cursor = self.nootropics.find(None, None).await?;

        Ok(cursor.try_collect().await?)
    }

    async fn nootropic_by_name(&self, name: &str) -> Result<Option<Nootropic>, StoreError> {
        Ok(self
            .nootropics
            .find_one(doc! { "substanceName": name }, None)
            .await?)
    }

    async fn nootropic_by_id(&self, id: &str) -> Result<Option<Nootropic>, StoreError> {
        Ok(self.nootropics.find_one(doc! { "_id": id }, None).await?)
    }

    async fn insert_nootropic(&self, nootropic: &Nootropic) -> Result<(), StoreError> {
        self.nootropics
            .insert_one(nootropic, None)
            .await
            .map_err(|e| duplicate_or(e, &nootropic.substance_name))?;

        Ok(())
    }

    async fn reset_nootropics(&self, nootropics: &[Nootropic]) -> Result<usize, StoreError> {
        let deleted = self.nootropics.delete_many(doc! {}, None).await?;
        info!("Cleared {} nootropics", deleted.deleted_count);

        if nootropics.is_empty() {
            return Ok(0);
        }

        let inserted = self
            .nootropics
            .insert_many(nootropics, None)
            .await
            .map_err(|e| duplicate_or(e, "substanceName"))?;

        Ok(inserted.inserted_ids.len())
    }

    async fn stacks(&self) -> Result<Vec<StoredStack>, StoreError> {
        let cursor = self.stacks.find(None, None).await?;

        Ok(cursor.try_collect().await?)
    }

    async fn stack_by_id(&self, id: &str) -> Result<Option<StoredStack>, StoreError> {
        Ok(self.stacks.find_one(doc! { "_id": id }, None).await?)
    }

    async fn insert_stack(&self, stack: &StoredStack) -> Result<(), StoreError> {
        self.stacks.insert_one(stack, None).await?;

        Ok(())
    }

    async fn replace_stack(&self, stack: &StoredStack) -> Result<bool, StoreError> {
        let result = self
            .stacks
            .replace_one(doc! { "_id": stack.id.as_str() }, stack, None)
            .await?;

        Ok(result.matched_count > 0)
    }
}
