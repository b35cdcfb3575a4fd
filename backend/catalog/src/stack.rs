//! # Stacks
//!
//! User-composed combinations of nootropics plus their community ratings.
//!
//! A stack is generic over what a component points at:
//! - [`StoredStack`]: components hold the `_id` of a nootropic, this is what the store keeps
//! - [`ResolvedStack`]: components hold the nootropic itself, or `null` if the id no longer resolves
//!
//! ## Ratings
//!
//! `ratings` only ever grows through [`Stack::add_rating`]. `totalRatings` and `averageRating`
//! are derived from the full list after every append, never updated incrementally and never
//! accepted from a payload.
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use crate::model::Nootropic;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

pub type StoredStack = Stack<String>;
pub type ResolvedStack = Stack<Option<Nootropic>>;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Rating must be between 1 and 5, got {0}")]
pub struct RatingOutOfRange(pub i64);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stack<N = String> {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub components: Vec<Component<N>>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    ratings: Vec<Rating>,
    #[serde(default)]
    total_ratings: u32,
    #[serde(default)]
    average_rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component<N = String> {
    pub nootropic: N,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosage: Option<ComponentDosage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timing: Option<String>,
}

/// Per-stack override of a component's dose.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComponentDosage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a stack. Ids, ratings and timestamps are assigned server-side.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewStack {
    #[serde(default)]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Whole-field replacement of whichever fields are present.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct StackPatch {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: Option<String>,
    pub components: Option<Vec<Component>>,
    pub benefits: Option<Vec<String>>,
    pub instructions: Option<String>,
    pub warnings: Option<Vec<String>>,
}

impl StoredStack {
    pub fn new(id: String, draft: NewStack, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            components: draft.components,
            benefits: draft.benefits,
            instructions: draft.instructions,
            warnings: draft.warnings,
            ratings: Vec::new(),
            total_ratings: 0,
            average_rating: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: StackPatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(components) = patch.components {
            self.components = components;
        }
        if let Some(benefits) = patch.benefits {
            self.benefits = benefits;
        }
        if let Some(instructions) = patch.instructions {
            self.instructions = Some(instructions);
        }
        if let Some(warnings) = patch.warnings {
            self.warnings = warnings;
        }

        self.updated_at = now;
    }

    /// Appends a rating and recomputes the aggregate from the whole list.
    pub fn add_rating(
        &mut self,
        rating: i64,
        review: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<(), RatingOutOfRange> {
        let rating = check_rating(rating)?;

        self.ratings.push(Rating {
            rating,
            review,
            created_at: now,
        });

        self.total_ratings = self.ratings.len() as u32;
        self.average_rating = mean(&self.ratings);
        self.updated_at = now;

        Ok(())
    }

    /// Swaps every component id for its nootropic. Ids missing from `nootropics` resolve to `None`.
    pub fn resolve(self, nootropics: &HashMap<String, Nootropic>) -> ResolvedStack {
        self.map_components(|id| nootropics.get(&id).cloned())
    }
}

impl<N> Stack<N> {
    pub fn ratings(&self) -> &[Rating] {
        &self.ratings
    }

    pub fn total_ratings(&self) -> u32 {
        self.total_ratings
    }

    pub fn average_rating(&self) -> f64 {
        self.average_rating
    }

    fn map_components<M>(self, mut f: impl FnMut(N) -> M) -> Stack<M> {
        Stack {
            id: self.id,
            name: self.name,
            description: self.description,
            components: self
                .components
                .into_iter()
                .map(|component| Component {
                    nootropic: f(component.nootropic),
                    dosage: component.dosage,
                    timing: component.timing,
                })
                .collect(),
            benefits: self.benefits,
            instructions: self.instructions,
            warnings: self.warnings,
            ratings: self.ratings,
            total_ratings: self.total_ratings,
            average_rating: self.average_rating,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

pub fn check_rating(rating: i64) -> Result<u8, RatingOutOfRange> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(rating as u8)
    } else {
        Err(RatingOutOfRange(rating))
    }
}

fn mean(ratings: &[Rating]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }

    let sum: u32 = ratings.iter().map(|r| u32::from(r.rating)).sum();
    f64::from(sum) / ratings.len() as f64
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn draft() -> NewStack {
        NewStack {
            name: "Morning Focus".into(),
            description: "Caffeine and theanine".into(),
            components: vec![Component {
                nootropic: "n1".into(),
                dosage: Some(ComponentDosage {
                    amount: Some(200.0),
                    unit: Some("mg".into()),
                }),
                timing: Some("morning".into()),
            }],
            benefits: vec!["Focus".into()],
            instructions: None,
            warnings: Vec::new(),
        }
    }

    fn stack() -> StoredStack {
        StoredStack::new("s1".into(), draft(), Utc::now())
    }

    #[test]
    fn test_average_is_mean_of_all_ratings() {
        let mut stack = stack();
        let sequence = [5, 3, 4, 1, 2, 5, 5];

        for (i, r) in sequence.iter().enumerate() {
            stack.add_rating(*r, None, Utc::now()).unwrap();

            let seen = &sequence[..=i];
            let expected = seen.iter().sum::<i64>() as f64 / seen.len() as f64;
            assert_eq!(stack.average_rating(), expected);
            assert_eq!(stack.total_ratings() as usize, seen.len());
        }
    }

    #[test]
    fn test_out_of_range_rating_leaves_stack_unchanged() {
        let mut stack = stack();
        stack.add_rating(4, Some("solid".into()), Utc::now()).unwrap();
        let before = stack.clone();

        assert_eq!(stack.add_rating(0, None, Utc::now()), Err(RatingOutOfRange(0)));
        assert_eq!(stack.add_rating(6, None, Utc::now()), Err(RatingOutOfRange(6)));
        assert_eq!(stack, before);
    }

    #[test]
    fn test_payload_cannot_set_aggregates() {
        let draft: NewStack = serde_json::from_value(json!({
            "name": "Sneaky",
            "description": "tries to preload ratings",
            "averageRating": 5.0,
            "totalRatings": 100,
            "ratings": [{ "rating": 5 }]
        }))
        .unwrap();

        let stack = StoredStack::new("s2".into(), draft, Utc::now());
        assert_eq!(stack.total_ratings(), 0);
        assert_eq!(stack.average_rating(), 0.0);
        assert!(stack.ratings().is_empty());
    }

    #[test]
    fn test_patch_replaces_only_present_fields() {
        let mut stack = stack();
        let patch: StackPatch =
            serde_json::from_value(json!({ "name": "Evening Calm", "warnings": ["drowsiness"] }))
                .unwrap();

        stack.apply(patch, Utc::now());

        assert_eq!(stack.name, "Evening Calm");
        assert_eq!(stack.description, "Caffeine and theanine");
        assert_eq!(stack.components.len(), 1);
        assert_eq!(stack.warnings, ["drowsiness".to_string()]);
    }

    #[test]
    fn test_resolve_embeds_nootropics_and_nulls_dangling_ids() {
        let mut stack = stack();
        stack.components.push(Component {
            nootropic: "gone".into(),
            dosage: None,
            timing: None,
        });

        let mut piracetam = Nootropic::named("Piracetam");
        piracetam.id = "n1".into();
        let nootropics = HashMap::from([("n1".to_string(), piracetam)]);

        let resolved = stack.resolve(&nootropics);
        let value = serde_json::to_value(&resolved).unwrap();

        assert_eq!(value["components"][0]["nootropic"]["substanceName"], "Piracetam");
        assert_eq!(value["components"][0]["timing"], "morning");
        assert!(value["components"][1]["nootropic"].is_null());
    }
}
