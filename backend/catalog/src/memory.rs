//! Process-local [`Store`]. Same contract as MongoDB, including the unique substance name.
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    model::Nootropic,
    stack::StoredStack,
    store::{Store, StoreError},
};

#[derive(Default)]
pub struct MemoryStore {
    nootropics: RwLock<Vec<Nootropic>>,
    stacks: RwLock<Vec<StoredStack>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn nootropics(&self) -> Result<Vec<Nootropic>, StoreError> {
        Ok(self.nootropics.read().await.clone())
    }

    async fn nootropic_by_name(&self, name: &str) -> Result<Option<Nootropic>, StoreError> {
        let nootropics = self.nootropics.read().await;

        Ok(nootropics
            .iter()
            .find(|n| n.substance_name == name)
            .cloned())
    }

    async fn nootropic_by_id(&self, id: &str) -> Result<Option<Nootropic>, StoreError> {
        let nootropics = self.nootropics.read().await;

        Ok(nootropics.iter().find(|n| n.id == id).cloned())
    }

    async fn insert_nootropic(&self, nootropic: &Nootropic) -> Result<(), StoreError> {
        let mut nootropics = self.nootropics.write().await;

        if nootropics
            .iter()
            .any(|n| n.substance_name == nootropic.substance_name)
        {
            return Err(StoreError::DuplicateKey(nootropic.substance_name.clone()));
        }

        nootropics.push(nootropic.clone());

        Ok(())
    }

    async fn reset_nootropics(&self, incoming: &[Nootropic]) -> Result<usize, StoreError> {
        let mut nootropics = self.nootropics.write().await;
        nootropics.clear();

        for nootropic in incoming {
            if nootropics
                .iter()
                .any(|n| n.substance_name == nootropic.substance_name)
            {
                return Err(StoreError::DuplicateKey(nootropic.substance_name.clone()));
            }

            nootropics.push(nootropic.clone());
        }

        Ok(nootropics.len())
    }

    async fn stacks(&self) -> Result<Vec<StoredStack>, StoreError> {
        Ok(self.stacks.read().await.clone())
    }

    async fn stack_by_id(&self, id: &str) -> Result<Option<StoredStack>, StoreError> {
        let stacks = self.stacks.read().await;

        Ok(stacks.iter().find(|s| s.id == id).cloned())
    }

    async fn insert_stack(&self, stack: &StoredStack) -> Result<(), StoreError> {
        self.stacks.write().await.push(stack.clone());

        Ok(())
    }

    async fn replace_stack(&self, stack: &StoredStack) -> Result<bool, StoreError> {
        let mut stacks = self.stacks.write().await;

        match stacks.iter_mut().find(|s| s.id == stack.id) {
            Some(slot) => {
                *slot = stack.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
