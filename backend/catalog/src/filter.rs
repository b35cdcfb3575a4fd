//! # Browse Filter
//!
//! Narrowing the nootropic list the way the browse page does: a free-text query plus a set of
//! selected categories. Pure and synchronous, rerun from scratch on every change.
//!
//! - Query: case-insensitive substring of the name, any category tag, or any benefit
//! - Categories: keep records tagged with at least one selected category
//! - Both active: both must hold
use std::collections::BTreeSet;

use crate::model::Nootropic;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    query: String,
    categories: BTreeSet<String>,
}

impl FilterCriteria {
    pub fn new<I, S>(query: &str, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            query: query.trim().to_lowercase(),
            categories: categories
                .into_iter()
                .map(Into::into)
                .filter(|c: &String| !c.trim().is_empty())
                .collect(),
        }
    }

    /// Builds criteria from a comma-separated category list, as sent in a query string.
    pub fn from_params(query: Option<&str>, categories: Option<&str>) -> Self {
        let categories = categories
            .map(|list| list.split(',').map(str::trim).collect::<Vec<_>>())
            .unwrap_or_default();

        Self::new(query.unwrap_or_default(), categories)
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && self.categories.is_empty()
    }

    pub fn matches(&self, nootropic: &Nootropic) -> bool {
        self.matches_query(nootropic) && self.matches_categories(nootropic)
    }

    fn matches_query(&self, nootropic: &Nootropic) -> bool {
        if self.query.is_empty() {
            return true;
        }

        let hit = |text: &str| text.to_lowercase().contains(&self.query);

        hit(&nootropic.substance_name)
            || nootropic.category.tags().iter().any(|tag| hit(tag))
            || nootropic.benefits.iter().any(|benefit| hit(benefit))
    }

    fn matches_categories(&self, nootropic: &Nootropic) -> bool {
        self.categories.is_empty()
            || nootropic
                .category
                .tags()
                .iter()
                .any(|tag| self.categories.contains(tag))
    }
}

pub fn filter_nootropics<'a>(
    nootropics: &'a [Nootropic],
    criteria: &FilterCriteria,
) -> Vec<&'a Nootropic> {
    nootropics
        .iter()
        .filter(|nootropic| criteria.matches(nootropic))
        .collect()
}
