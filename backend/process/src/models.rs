use serde::Deserialize;

pub const DEFAULT_SHEET_PATH: &str = "data/Supplement Stack Info - Sheet1.csv";

/// One row of the supplement spreadsheet export, columns as titled in the sheet.
#[derive(Debug, Default, Deserialize)]
pub struct SheetRow {
    #[serde(rename = "Substance", default)]
    pub substance: Option<String>,

    #[serde(rename = "Category", default)]
    pub category: Option<String>,

    #[serde(rename = "Benefits", default)]
    pub benefits: Option<String>,

    #[serde(rename = "Potential IQ Boost", default)]
    pub potential_iq_boost: Option<String>,

    #[serde(rename = "Dosage", default)]
    pub dosage: Option<String>,

    #[serde(rename = "Dose Timing", default)]
    pub dose_timing: Option<String>,

    #[serde(rename = "How to take", default)]
    pub how_to_take: Option<String>,

    #[serde(rename = "Drug Interactions", default)]
    pub drug_interactions: Option<String>,

    #[serde(rename = "Side Effects", default)]
    pub side_effects: Option<String>,

    #[serde(rename = "Molecule Structure", default)]
    pub molecule_structure: Option<String>,

    #[serde(rename = "Potential Stack", default)]
    pub potential_stack: Option<String>,
}
