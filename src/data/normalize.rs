//! Normalization of free-text categorical values.
//!
//! Raw values are matched against a closed [`Vocabulary`] in a fixed order:
//!
//! 1. exact lookup of the trimmed value in the variant table
//! 2. exact, case-sensitive membership in the canonical list
//! 3. case-insensitive variant lookup
//! 4. case-insensitive canonical lookup
//!
//! Anything else normalizes to `None` and is recorded in a
//! [`CategoryDiagnostics`] registry. The registry exists for reporting
//! only; nothing reads it to make decisions.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, OnceLock};

use super::vocab::{Diet, HealthMetric, Island, LifeStage, Sex, Species, Vocabulary, YEARS};

/// Registry of unrecognized raw values, keyed by field name.
#[derive(Debug, Default)]
pub struct CategoryDiagnostics {
    seen: Mutex<BTreeMap<&'static str, BTreeMap<String, usize>>>,
}

impl CategoryDiagnostics {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry used by the free normalization functions.
    pub fn global() -> &'static CategoryDiagnostics {
        static GLOBAL: OnceLock<CategoryDiagnostics> = OnceLock::new();
        GLOBAL.get_or_init(CategoryDiagnostics::new)
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<&'static str, BTreeMap<String, usize>>> {
        // A panic while holding the lock cannot leave the maps half-updated.
        self.seen.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Records an unrecognized value for `field`.
    ///
    /// Returns true the first time a given value is seen for that field.
    pub fn record(&self, field: &'static str, raw: &str) -> bool {
        let mut seen = self.lock();
        let count = seen
            .entry(field)
            .or_default()
            .entry(raw.to_string())
            .or_insert(0);
        *count += 1;
        *count == 1
    }

    /// Unrecognized values per field, sorted and deduplicated.
    pub fn summary(&self) -> BTreeMap<String, Vec<String>> {
        self.lock()
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(field, values)| (field.to_string(), values.keys().cloned().collect()))
            .collect()
    }

    /// How many times each unrecognized value was seen, per field.
    pub fn counts(&self) -> BTreeMap<String, BTreeMap<String, usize>> {
        self.lock()
            .iter()
            .map(|(field, values)| (field.to_string(), values.clone()))
            .collect()
    }

    /// Total number of distinct unrecognized values across all fields.
    pub fn distinct_total(&self) -> usize {
        self.lock().values().map(BTreeMap::len).sum()
    }

    /// Forgets everything recorded so far.
    pub fn reset(&self) {
        self.lock().clear();
    }
}

/// Normalizes `raw` against `V`, recording misses in the global registry.
pub fn normalize<V: Vocabulary>(raw: Option<&str>) -> Option<V> {
    normalize_with(raw, CategoryDiagnostics::global())
}

/// Normalizes `raw` against `V`, recording misses in `diagnostics`.
pub fn normalize_with<V: Vocabulary>(
    raw: Option<&str>,
    diagnostics: &CategoryDiagnostics,
) -> Option<V> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(value) = match_category::<V>(trimmed) {
        return Some(value);
    }

    if diagnostics.record(V::FIELD, trimmed) {
        tracing::warn!(
            field = V::FIELD,
            value = %trimmed,
            "unexpected categorical value"
        );
    }
    None
}

/// Pure matching step without any diagnostic side effect.
pub fn match_category<V: Vocabulary>(trimmed: &str) -> Option<V> {
    V::VARIANTS
        .iter()
        .find(|(variant, _)| *variant == trimmed)
        .map(|(_, value)| *value)
        .or_else(|| V::ALL.iter().copied().find(|v| v.as_str() == trimmed))
        .or_else(|| {
            V::VARIANTS
                .iter()
                .find(|(variant, _)| variant.eq_ignore_ascii_case(trimmed))
                .map(|(_, value)| *value)
        })
        .or_else(|| {
            V::ALL
                .iter()
                .copied()
                .find(|v| v.as_str().eq_ignore_ascii_case(trimmed))
        })
}

pub fn normalize_species(raw: Option<&str>) -> Option<Species> {
    normalize(raw)
}

pub fn normalize_island(raw: Option<&str>) -> Option<Island> {
    normalize(raw)
}

pub fn normalize_sex(raw: Option<&str>) -> Option<Sex> {
    normalize(raw)
}

pub fn normalize_diet(raw: Option<&str>) -> Option<Diet> {
    normalize(raw)
}

pub fn normalize_life_stage(raw: Option<&str>) -> Option<LifeStage> {
    normalize(raw)
}

pub fn normalize_health_metric(raw: Option<&str>) -> Option<HealthMetric> {
    normalize(raw)
}

/// Passes `year` through, recording it if it is outside the known years.
pub fn normalize_year(year: i32) -> i32 {
    normalize_year_with(year, CategoryDiagnostics::global())
}

pub fn normalize_year_with(year: i32, diagnostics: &CategoryDiagnostics) -> i32 {
    if !YEARS.contains(&year) && diagnostics.record("year", &year.to_string()) {
        tracing::warn!(field = "year", value = year, "unexpected year");
    }
    year
}

/// Summary of the global registry.
pub fn unexpected_category_summary() -> BTreeMap<String, Vec<String>> {
    CategoryDiagnostics::global().summary()
}

/// Clears the global registry.
pub fn reset_unexpected_category_summary() {
    CategoryDiagnostics::global().reset();
}

/// Fields that currently have at least one unrecognized value.
pub fn fields_with_unexpected_values() -> BTreeSet<String> {
    unexpected_category_summary().into_keys().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_known_island_variants() {
        let diag = CategoryDiagnostics::new();
        assert_eq!(
            normalize_with::<Island>(Some("Torgensen"), &diag),
            Some(Island::Torgersen)
        );
        assert_eq!(
            normalize_with::<Island>(Some("  Dream Island "), &diag),
            Some(Island::Dream)
        );
        assert_eq!(normalize_with::<Island>(Some("Dream"), &diag), Some(Island::Dream));
        assert_eq!(normalize_with::<Island>(Some(""), &diag), None);
        assert_eq!(normalize_with::<Island>(None, &diag), None);
        assert!(diag.summary().is_empty());
    }

    #[test]
    fn case_insensitive_fallbacks() {
        let diag = CategoryDiagnostics::new();
        assert_eq!(normalize_with::<Species>(Some("gentoo"), &diag), Some(Species::Gentoo));
        assert_eq!(normalize_with::<Island>(Some("torgesen"), &diag), Some(Island::Torgersen));
        assert_eq!(normalize_with::<Sex>(Some("F"), &diag), Some(Sex::Female));
        assert_eq!(normalize_with::<Diet>(Some("KRILL"), &diag), Some(Diet::Krill));
    }

    #[test]
    fn guards_and_records_unexpected_categories() {
        let diag = CategoryDiagnostics::new();
        assert_eq!(normalize_with::<Diet>(Some("krill"), &diag), Some(Diet::Krill));
        assert_eq!(normalize_with::<Diet>(Some("unknown"), &diag), None);
        assert_eq!(
            normalize_with::<HealthMetric>(Some("healthy"), &diag),
            Some(HealthMetric::Healthy)
        );
        assert_eq!(normalize_with::<LifeStage>(Some("hatchling"), &diag), None);
        assert_eq!(normalize_year_with(2026, &diag), 2026);
        assert_eq!(normalize_year_with(2023, &diag), 2023);

        let expected: BTreeMap<String, Vec<String>> = [
            ("diet".to_string(), vec!["unknown".to_string()]),
            ("life_stage".to_string(), vec!["hatchling".to_string()]),
            ("year".to_string(), vec!["2026".to_string()]),
        ]
        .into_iter()
        .collect();
        assert_eq!(diag.summary(), expected);
    }

    #[test]
    fn records_are_deduplicated_but_counted() {
        let diag = CategoryDiagnostics::new();
        assert!(diag.record("species", "Emperor"));
        assert!(!diag.record("species", "Emperor"));
        assert_eq!(diag.summary()["species"], vec!["Emperor".to_string()]);
        assert_eq!(diag.counts()["species"]["Emperor"], 2);
        assert_eq!(diag.distinct_total(), 1);

        diag.reset();
        assert!(diag.summary().is_empty());
    }

    #[test]
    fn global_registry_collects_misses() {
        assert_eq!(normalize_species(Some("Macaroni-global-test")), None);
        assert!(unexpected_category_summary()["species"]
            .contains(&"Macaroni-global-test".to_string()));
        assert!(fields_with_unexpected_values().contains("species"));
    }
}
