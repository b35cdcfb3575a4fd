//! # Repositories
//!
//! The two entry points the HTTP layer and the offline tools go through.
//!
//! ## Nootropics
//! Keyed by `substanceName`. Creation leans on the store's unique index for duplicates.
//!
//! ## Stacks
//! Components are weak references: an id plus a lookup, checked on create and update only.
//! Every stack handed out is resolved, each component id swapped for its nootropic.
//!
//! Lookup misses come back as `Ok(None)`. Callers decide what absence means.
use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use thiserror::Error;
use tracing::info;
use validator::{Validate, ValidationErrors};

use crate::{
    filter::{filter_nootropics, FilterCriteria},
    model::Nootropic,
    new_id,
    stack::{
        check_rating, Component, NewStack, RatingOutOfRange, ResolvedStack, StackPatch,
        StoredStack,
    },
    store::{Store, StoreError},
};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ValidationErrors> for CatalogError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("{field} is invalid"),
                })
            })
            .collect();
        messages.sort();

        CatalogError::Validation(messages.join("; "))
    }
}

impl From<RatingOutOfRange> for CatalogError {
    fn from(error: RatingOutOfRange) -> Self {
        CatalogError::Validation(error.to_string())
    }
}

#[derive(Clone)]
pub struct NootropicRepository {
    store: Arc<dyn Store>,
}

impl NootropicRepository {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list_all(&self) -> Result<Vec<Nootropic>, CatalogError> {
        Ok(self.store.nootropics().await?)
    }

    pub async fn search(&self, criteria: &FilterCriteria) -> Result<Vec<Nootropic>, CatalogError> {
        let all = self.list_all().await?;

        if criteria.is_empty() {
            return Ok(all);
        }

        Ok(filter_nootropics(&all, criteria).into_iter().cloned().collect())
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<Nootropic>, CatalogError> {
        Ok(self.store.nootropic_by_name(name).await?)
    }

    pub async fn create(&self, mut nootropic: Nootropic) -> Result<Nootropic, CatalogError> {
        nootropic.validate()?;
        nootropic.id = new_id();

        match self.store.insert_nootropic(&nootropic).await {
            Ok(()) => {}
            Err(StoreError::DuplicateKey(_)) => {
                return Err(CatalogError::Validation(format!(
                    "Nootropic with substanceName {} already exists",
                    nootropic.substance_name
                )));
            }
            Err(e) => return Err(e.into()),
        }

        info!("Created nootropic {}", nootropic.substance_name);

        Ok(nootropic)
    }

    /// Clears the collection and inserts `nootropics` with fresh ids.
    pub async fn replace_all(&self, mut nootropics: Vec<Nootropic>) -> Result<usize, CatalogError> {
        for nootropic in &mut nootropics {
            nootropic.id = new_id();
        }

        Ok(self.store.reset_nootropics(&nootropics).await?)
    }
}

#[derive(Clone)]
pub struct StackRepository {
    store: Arc<dyn Store>,
}

impl StackRepository {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list_all(&self) -> Result<Vec<ResolvedStack>, CatalogError> {
        let stacks = self.store.stacks().await?;
        let nootropics: HashMap<String, Nootropic> = self
            .store
            .nootropics()
            .await?
            .into_iter()
            .map(|n| (n.id.clone(), n))
            .collect();

        Ok(stacks
            .into_iter()
            .map(|stack| stack.resolve(&nootropics))
            .collect())
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<ResolvedStack>, CatalogError> {
        match self.store.stack_by_id(id).await? {
            Some(stack) => Ok(Some(self.resolve(stack).await?)),
            None => Ok(None),
        }
    }

    /// Every component must resolve before anything is written.
    pub async fn create(&self, draft: NewStack) -> Result<ResolvedStack, CatalogError> {
        draft.validate()?;
        let nootropics = self.check_components(&draft.components).await?;

        let stack = StoredStack::new(new_id(), draft, Utc::now());
        self.store.insert_stack(&stack).await?;

        info!("Created stack {} ({})", stack.name, stack.id);

        Ok(stack.resolve(&nootropics))
    }

    pub async fn update(
        &self,
        id: &str,
        patch: StackPatch,
    ) -> Result<Option<ResolvedStack>, CatalogError> {
        patch.validate()?;
        if let Some(components) = &patch.components {
            self.check_components(components).await?;
        }

        let Some(mut stack) = self.store.stack_by_id(id).await? else {
            return Ok(None);
        };

        stack.apply(patch, Utc::now());

        if !self.store.replace_stack(&stack).await? {
            return Ok(None);
        }

        Ok(Some(self.resolve(stack).await?))
    }

    /// Appends a rating and persists the recomputed aggregate. Read-modify-replace, unguarded.
    pub async fn rate(
        &self,
        id: &str,
        rating: i64,
        review: Option<String>,
    ) -> Result<Option<ResolvedStack>, CatalogError> {
        check_rating(rating)?;

        let Some(mut stack) = self.store.stack_by_id(id).await? else {
            return Ok(None);
        };

        stack.add_rating(rating, review, Utc::now())?;

        if !self.store.replace_stack(&stack).await? {
            return Ok(None);
        }

        info!(
            "Stack {} rated {rating}, average now {:.2} over {}",
            stack.id,
            stack.average_rating(),
            stack.total_ratings()
        );

        Ok(Some(self.resolve(stack).await?))
    }

    async fn check_components(
        &self,
        components: &[Component],
    ) -> Result<HashMap<String, Nootropic>, CatalogError> {
        let mut found = HashMap::new();

        for component in components {
            match self.store.nootropic_by_id(&component.nootropic).await? {
                Some(nootropic) => {
                    found.insert(nootropic.id.clone(), nootropic);
                }
                None => {
                    return Err(CatalogError::Validation(format!(
                        "Nootropic with ID {} not found",
                        component.nootropic
                    )));
                }
            }
        }

        Ok(found)
    }

    async fn resolve(&self, stack: StoredStack) -> Result<ResolvedStack, CatalogError> {
        let mut nootropics = HashMap::new();

        for component in &stack.components {
            if nootropics.contains_key(&component.nootropic) {
                continue;
            }
            if let Some(nootropic) = self.store.nootropic_by_id(&component.nootropic).await? {
                nootropics.insert(nootropic.id.clone(), nootropic);
            }
        }

        Ok(stack.resolve(&nootropics))
    }
}
