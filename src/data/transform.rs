//! Conversion from raw ingested rows to canonical [`Record`]s.

use super::model::{RawRecord, Record};
use super::normalize::{
    normalize_diet, normalize_health_metric, normalize_island, normalize_life_stage,
    normalize_species, normalize_year,
};
use super::vocab::Sex;

/// Outcome counts of a transform pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransformCounts {
    pub input: usize,
    pub kept: usize,
    pub dropped: usize,
}

/// Transforms raw rows into canonical records.
///
/// Numeric sentinels (`0`, NaN, infinities) become absent. Empty or
/// unrecognized categorical values become absent, except species, island
/// and year: a row missing any of those cannot form a [`Record`] and is
/// dropped. Never fails.
pub fn transform_records(raw: &[RawRecord]) -> Vec<Record> {
    transform_records_with_counts(raw).0
}

/// Like [`transform_records`], also reporting how many rows were dropped.
pub fn transform_records_with_counts(raw: &[RawRecord]) -> (Vec<Record>, TransformCounts) {
    let records: Vec<Record> = raw.iter().filter_map(transform_record).collect();
    let counts = TransformCounts {
        input: raw.len(),
        kept: records.len(),
        dropped: raw.len() - records.len(),
    };

    tracing::debug!(
        input = counts.input,
        kept = counts.kept,
        dropped = counts.dropped,
        "transformed dataset rows"
    );

    (records, counts)
}

/// Transforms a single row, or `None` if it lacks species, island or year.
pub fn transform_record(raw: &RawRecord) -> Option<Record> {
    let species = normalize_species(raw.species.as_deref())?;
    let island = normalize_island(raw.island.as_deref())?;
    let year = raw.year.and_then(to_year)?;

    Some(Record {
        species,
        island,
        bill_length_mm: to_measurement(raw.bill_length_mm),
        bill_depth_mm: to_measurement(raw.bill_depth_mm),
        flipper_length_mm: to_measurement(raw.flipper_length_mm),
        body_mass_g: to_measurement(raw.body_mass_g),
        sex: to_sex(raw.sex.as_deref()),
        year: normalize_year(year),
        diet: normalize_diet(raw.diet.as_deref()),
        life_stage: normalize_life_stage(raw.life_stage.as_deref()),
        health_metrics: normalize_health_metric(raw.health_metrics.as_deref()),
    })
}

/// `0` is this dataset's "not measured" marker.
fn to_measurement(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v != 0.0)
}

fn to_year(value: f64) -> Option<i32> {
    if !value.is_finite() {
        return None;
    }
    let truncated = value.trunc();
    if truncated < i32::MIN as f64 || truncated > i32::MAX as f64 {
        return None;
    }
    Some(truncated as i32)
}

/// Sex is ingested leniently and never reported as unexpected.
fn to_sex(value: Option<&str>) -> Option<Sex> {
    let normalized = value?.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "male" | "m" => Some(Sex::Male),
        "female" | "f" => Some(Sex::Female),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::vocab::{Diet, Island, LifeStage, Species};

    fn raw(species: &str, island: &str) -> RawRecord {
        RawRecord {
            species: Some(species.into()),
            island: Some(island.into()),
            year: Some(2023.0),
            ..Default::default()
        }
    }

    #[test]
    fn zero_measurements_become_absent() {
        let mut row = raw("Adelie", "Dream");
        row.bill_length_mm = Some(0.0);
        row.bill_depth_mm = Some(18.7);
        row.flipper_length_mm = Some(f64::NAN);
        row.body_mass_g = None;

        let record = transform_record(&row).expect("row kept");
        assert_eq!(record.bill_length_mm, None);
        assert_eq!(record.bill_depth_mm, Some(18.7));
        assert_eq!(record.flipper_length_mm, None);
        assert_eq!(record.body_mass_g, None);
    }

    #[test]
    fn empty_categoricals_become_absent() {
        let mut row = raw("Gentoo", "Biscoe");
        row.sex = Some(String::new());
        row.diet = Some("".into());
        row.life_stage = Some("juvenile".into());

        let record = transform_record(&row).expect("row kept");
        assert_eq!(record.sex, None);
        assert_eq!(record.diet, None);
        assert_eq!(record.life_stage, Some(LifeStage::Juvenile));
    }

    #[test]
    fn sex_aliases_are_accepted() {
        let mut row = raw("Adelie", "Torgersen");
        row.sex = Some(" M ".into());
        assert_eq!(transform_record(&row).unwrap().sex, Some(Sex::Male));
        row.sex = Some("Female".into());
        assert_eq!(transform_record(&row).unwrap().sex, Some(Sex::Female));
        row.sex = Some(".".into());
        assert_eq!(transform_record(&row).unwrap().sex, None);
    }

    #[test]
    fn island_variants_and_case_are_normalized() {
        let record = transform_record(&raw("chinstrap", "Torgensen")).unwrap();
        assert_eq!(record.species, Species::Chinstrap);
        assert_eq!(record.island, Island::Torgersen);
    }

    #[test]
    fn rows_without_identity_are_dropped() {
        let mut no_year = raw("Adelie", "Dream");
        no_year.year = None;
        let rows = vec![
            raw("Adelie", "Dream"),
            raw("", "Dream"),
            raw("Adelie", "Atlantis-transform-test"),
            no_year,
        ];

        let (records, counts) = transform_records_with_counts(&rows);
        assert_eq!(records.len(), 1);
        assert_eq!(
            counts,
            TransformCounts {
                input: 4,
                kept: 1,
                dropped: 3
            }
        );
    }

    #[test]
    fn unknown_diet_is_absent_not_dropped() {
        let mut row = raw("Adelie", "Dream");
        row.diet = Some("plankton-transform-test".into());
        let record = transform_record(&row).expect("row kept");
        assert_eq!(record.diet, None);

        row.diet = Some("Squid".into());
        assert_eq!(transform_record(&row).unwrap().diet, Some(Diet::Squid));
    }
}
