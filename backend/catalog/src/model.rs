//! # Nootropic Documents
//!
//! Substance records as they live in the `nootropics` collection and as they
//! travel over the wire. Field names are camelCase on both sides.
//!
//! ## Shape Variance
//!
//! Records arrive from two places: hand-written payloads (seed dataset, API
//! clients) and the spreadsheet import. The spreadsheet only carries free text
//! for some fields, so those fields accept either the structured form or the
//! flat one:
//! - `category`: one tag or a list of tags
//! - `doseTiming`: a schedule or a note
//! - `howToTake`: a guide or a yes/no flag
use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Nootropic {
    #[serde(rename = "_id", default)]
    pub id: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "substanceName is required"))]
    pub substance_name: String,

    #[serde(default)]
    #[validate(custom = "required_category")]
    pub category: Category,

    #[serde(default)]
    pub benefits: Vec<String>,

    #[serde(rename = "potentialIQBoost", default, skip_serializing_if = "Option::is_none")]
    pub potential_iq_boost: Option<IqBoost>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosage: Option<Dosage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dose_timing: Option<DoseTiming>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub how_to_take: Option<HowToTake>,

    #[serde(default)]
    pub drug_interactions: Vec<DrugInteraction>,

    #[serde(default)]
    pub side_effects: Vec<SideEffect>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub molecule_structure: Option<MoleculeStructure>,

    #[serde(default)]
    pub potential_stacks: Vec<SuggestedStack>,

    #[serde(default)]
    pub sources: Vec<Source>,

    #[serde(default)]
    pub references: Vec<Reference>,

    #[serde(default = "Utc::now")]
    pub last_updated: DateTime<Utc>,
}

impl Nootropic {
    /// Bare record with only the key set. Everything else takes its default.
    pub fn named(substance_name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            substance_name: substance_name.into(),
            category: Category::default(),
            benefits: Vec::new(),
            potential_iq_boost: None,
            dosage: None,
            dose_timing: None,
            how_to_take: None,
            drug_interactions: Vec::new(),
            side_effects: Vec::new(),
            molecule_structure: None,
            potential_stacks: Vec::new(),
            sources: Vec::new(),
            references: Vec::new(),
            last_updated: Utc::now(),
        }
    }
}

fn required_category(category: &Category) -> Result<(), ValidationError> {
    if category.tags().iter().any(|tag| !tag.trim().is_empty()) {
        return Ok(());
    }

    let mut error = ValidationError::new("required");
    error.message = Some(Cow::Borrowed("category is required"));

    Err(error)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Category {
    One(String),
    Many(Vec<String>),
}

impl Default for Category {
    fn default() -> Self {
        Category::Many(Vec::new())
    }
}

impl Category {
    pub fn tags(&self) -> &[String] {
        match self {
            Category::One(tag) => std::slice::from_ref(tag),
            Category::Many(tags) => tags,
        }
    }
}

impl From<Vec<String>> for Category {
    fn from(tags: Vec<String>) -> Self {
        Category::Many(tags)
    }
}

impl From<&str> for Category {
    fn from(tag: &str) -> Self {
        Category::One(tag.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IqBoost {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dosage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beginner_dose: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced_dose: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DoseTiming {
    Schedule(DoseSchedule),
    Note(String),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoseSchedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub times_per_day: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub with_food: Option<bool>,
    #[serde(default)]
    pub time_of_day: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub between_doses: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HowToTake {
    Guide(Guide),
    Flag(bool),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guide {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default)]
    pub special_considerations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DrugInteraction {
    pub substance: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SideEffect {
    pub effect: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoleculeStructure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Informal pairing suggestion. Not a [`crate::stack::Stack`] and never resolved.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SuggestedStack {
    pub name: String,
    #[serde(default)]
    pub components: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synergy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Source {
    pub vendor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reliability: Option<String>,
    #[serde(default)]
    pub region: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Reference {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use validator::Validate;

    use super::*;

    #[test]
    fn test_category_accepts_string_or_list() {
        let one: Nootropic =
            serde_json::from_value(json!({ "substanceName": "Piracetam", "category": "Racetams" }))
                .unwrap();
        assert_eq!(one.category, Category::One("Racetams".into()));
        assert_eq!(one.category.tags(), ["Racetams".to_string()]);

        let many: Nootropic = serde_json::from_value(
            json!({ "substanceName": "Noopept", "category": ["Racetams", "Peptides"] }),
        )
        .unwrap();
        assert_eq!(many.category.tags().len(), 2);
    }

    #[test]
    fn test_flat_fields_from_import() {
        let record: Nootropic = serde_json::from_value(json!({
            "substanceName": "Caffeine",
            "category": ["Stimulants"],
            "doseTiming": "Morning",
            "howToTake": true
        }))
        .unwrap();

        assert_eq!(record.dose_timing, Some(DoseTiming::Note("Morning".into())));
        assert_eq!(record.how_to_take, Some(HowToTake::Flag(true)));
    }

    #[test]
    fn test_missing_key_fields_fail_validation() {
        let record: Nootropic = serde_json::from_value(json!({})).unwrap();
        let errors = record.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("substance_name"));
        assert!(fields.contains_key("category"));
    }

    #[test]
    fn test_blank_category_list_is_rejected() {
        let mut record = Nootropic::named("Bacopa");
        record.category = Category::Many(vec!["  ".into()]);
        assert!(record.validate().is_err());

        record.category = "Adaptogens".into();
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_reference_kind_is_type_on_the_wire() {
        let reference = Reference {
            title: "Study".into(),
            url: None,
            kind: Some("study".into()),
        };
        assert_eq!(
            serde_json::to_value(reference).unwrap(),
            json!({ "title": "Study", "type": "study" })
        );
    }
}
