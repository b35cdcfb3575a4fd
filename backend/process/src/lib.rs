//! # Nootropic Processing
//!
//! Offline jobs that rewrite the `nootropics` collection wholesale. Neither runs while serving.
//!
//! ## Seed
//! Clears the collection and inserts the dataset compiled into the catalog crate.
//!
//! ## Spreadsheet Import
//! 1. Read the CSV export of the supplement sheet, header row first. Blank lines are skipped and
//!    every field is trimmed.
//!
//! 2. Skip rows without a substance name.
//!
//! 3. De-duplicate on substance name. First row wins, later rows with the same name are dropped
//!    entirely, not merged.
//!
//! 4. Normalize free text:
//! - `Category`, `Benefits`, `Side Effects`, `Potential Stack`: comma-separated lists
//! - `Drug Interactions`: semicolon-separated list
//! - `Potential IQ Boost`: percent sign dropped, `a-b` averaged, `n/a` ignored
//! - `Dosage`: `"<amount> <unit>"`, amount may be a range
//! - `How to take`: `Yes` is true, anything else false
//!
//! 5. Clear the collection, insert the result.
//!
//! ## Notes
//! - Ids are assigned fresh on every run. Stacks referencing the old records lose those
//!   components, which then resolve to `null`.
use std::{collections::HashSet, fs::File, io::Read, path::Path};

use anyhow::{Context, Result};
use catalog::{
    model::{
        Category, DoseTiming, DrugInteraction, HowToTake, IqBoost, MoleculeStructure, Nootropic,
        SideEffect, SuggestedStack,
    },
    seed_dataset, NootropicRepository,
};
use chrono::Utc;
use csv::{ReaderBuilder, Trim};
use server::{config::Config, database::init_mongo};

pub mod models;
pub mod utils;

use models::SheetRow;
use utils::{is_yes, non_empty, parse_dosage, parse_iq_boost, split_list};

pub async fn connect() -> Result<NootropicRepository> {
    let config = Config::load()?;
    let store = init_mongo(&config)
        .await
        .with_context(|| format!("Connecting to {}", config.mongodb_db))?;

    Ok(NootropicRepository::new(store))
}

pub async fn seed_nootropics(repository: &NootropicRepository) -> Result<usize> {
    let seed = seed_dataset().context("Parsing bundled seed dataset")?;
    println!("Loaded Seed Records: {}", seed.len());

    let inserted = repository.replace_all(seed).await?;
    println!("Seeded Nootropics: {inserted}");

    Ok(inserted)
}

pub async fn import_nootropics(repository: &NootropicRepository, path: &Path) -> Result<usize> {
    let file = File::open(path).with_context(|| format!("Opening {}", path.display()))?;
    let nootropics = parse_sheet(file)?;
    println!("Parsed Unique Substances: {}", nootropics.len());

    let inserted = repository.replace_all(nootropics).await?;
    println!("Imported Nootropics: {inserted}");

    Ok(inserted)
}

pub fn parse_sheet<R: Read>(reader: R) -> Result<Vec<Nootropic>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut seen = HashSet::new();
    let mut nootropics = Vec::new();
    let mut duplicates = 0;

    for (line, row) in reader.deserialize::<SheetRow>().enumerate() {
        let row = row.with_context(|| format!("Reading row {}", line + 1))?;

        let Some(name) = non_empty(row.substance.as_deref()) else {
            continue;
        };

        if !seen.insert(name.clone()) {
            duplicates += 1;
            continue;
        }

        nootropics.push(to_nootropic(name, row));
    }

    if duplicates > 0 {
        println!("Skipped Duplicate Rows: {duplicates}");
    }

    Ok(nootropics)
}

fn to_nootropic(substance_name: String, row: SheetRow) -> Nootropic {
    let potential_iq_boost =
        parse_iq_boost(row.potential_iq_boost.as_deref()).map(|value| IqBoost {
            minimum: Some(value),
            maximum: Some(value),
            description: None,
        });

    Nootropic {
        category: Category::Many(split_list(row.category.as_deref(), ',')),
        benefits: split_list(row.benefits.as_deref(), ','),
        potential_iq_boost,
        dosage: parse_dosage(row.dosage.as_deref()),
        dose_timing: non_empty(row.dose_timing.as_deref()).map(DoseTiming::Note),
        how_to_take: Some(HowToTake::Flag(is_yes(row.how_to_take.as_deref()))),
        drug_interactions: split_list(row.drug_interactions.as_deref(), ';')
            .into_iter()
            .map(|substance| DrugInteraction {
                substance,
                ..DrugInteraction::default()
            })
            .collect(),
        side_effects: split_list(row.side_effects.as_deref(), ',')
            .into_iter()
            .map(|effect| SideEffect {
                effect,
                ..SideEffect::default()
            })
            .collect(),
        molecule_structure: non_empty(row.molecule_structure.as_deref()).map(|formula| {
            MoleculeStructure {
                formula: Some(formula),
                ..MoleculeStructure::default()
            }
        }),
        potential_stacks: split_list(row.potential_stack.as_deref(), ',')
            .into_iter()
            .map(|name| SuggestedStack {
                name,
                ..SuggestedStack::default()
            })
            .collect(),
        last_updated: Utc::now(),
        ..Nootropic::named(substance_name)
    }
}
