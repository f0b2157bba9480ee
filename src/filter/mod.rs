//! Record filtering.
//!
//! Six independent dimensions narrow a record collection: species set,
//! island, sex, diet set, life stage and year range. Each dimension is a
//! standalone function over `Vec<&Record>`, and no dimension looks at the
//! outcome of another, so they commute: any application order yields the
//! same records. [`filter_records`] applies all of them in
//! [`FilterDimension::PIPELINE`] order.
//!
//! An inactive dimension (everything selected) returns its input vector
//! untouched, without copying.

use serde::{Serialize, Serializer};
use std::fmt;

use crate::data::{
    Diet, Island, LifeStage, Record, Sex, Species, Vocabulary, MAX_YEAR, MIN_YEAR,
};

/// Either every value of a vocabulary, or exactly one of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Choice<T> {
    All,
    Only(T),
}

impl<T> Default for Choice<T> {
    fn default() -> Self {
        Choice::All
    }
}

impl<T: Vocabulary> Choice<T> {
    /// `"all"` or the canonical spelling of the chosen value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Choice::All => "all",
            Choice::Only(value) => value.as_str(),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Choice::All)
    }

    /// Whether a record value passes this choice. Absent never matches `Only`.
    pub fn admits(&self, value: Option<T>) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(wanted) => value == Some(*wanted),
        }
    }
}

impl<T: Vocabulary> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<T: Vocabulary> Serialize for Choice<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Inclusive range of observation years.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// The full span of the dataset.
    pub fn full() -> Self {
        Self::new(MIN_YEAR, MAX_YEAR)
    }

    pub fn is_full(&self) -> bool {
        *self == Self::full()
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self::full()
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// The complete filter selection.
///
/// `species` and `diet` are kept in canonical enumeration order; build them
/// with [`canonical_subset`] (or the `with_*` setters) so that two equal
/// selections always compare and serialize identically.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub species: Vec<Species>,
    pub island: Choice<Island>,
    pub sex: Choice<Sex>,
    pub diet: Vec<Diet>,
    pub life_stage: Choice<LifeStage>,
    pub year_range: YearRange,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            species: Species::ALL.to_vec(),
            island: Choice::All,
            sex: Choice::All,
            diet: Diet::ALL.to_vec(),
            life_stage: Choice::All,
            year_range: YearRange::full(),
        }
    }
}

impl FilterState {
    pub fn with_species(mut self, species: impl IntoIterator<Item = Species>) -> Self {
        self.species = canonical_subset(species);
        self
    }

    pub fn with_island(mut self, island: Choice<Island>) -> Self {
        self.island = island;
        self
    }

    pub fn with_sex(mut self, sex: Choice<Sex>) -> Self {
        self.sex = sex;
        self
    }

    pub fn with_diet(mut self, diet: impl IntoIterator<Item = Diet>) -> Self {
        self.diet = canonical_subset(diet);
        self
    }

    pub fn with_life_stage(mut self, life_stage: Choice<LifeStage>) -> Self {
        self.life_stage = life_stage;
        self
    }

    pub fn with_year_range(mut self, year_range: YearRange) -> Self {
        self.year_range = year_range;
        self
    }

    /// Whether a dimension currently narrows anything.
    pub fn is_active(&self, dimension: FilterDimension) -> bool {
        match dimension {
            FilterDimension::Species => !is_full_set(&self.species),
            FilterDimension::Island => !self.island.is_all(),
            FilterDimension::Sex => !self.sex.is_all(),
            FilterDimension::Diet => !is_full_set(&self.diet),
            FilterDimension::LifeStage => !self.life_stage.is_all(),
            FilterDimension::YearRange => !self.year_range.is_full(),
        }
    }

    /// Dimensions that currently narrow anything, in pipeline order.
    pub fn active_dimensions(&self) -> Vec<FilterDimension> {
        FilterDimension::PIPELINE
            .iter()
            .copied()
            .filter(|dimension| self.is_active(*dimension))
            .collect()
    }

    /// The current selection of one dimension, for display.
    pub fn describe(&self, dimension: FilterDimension) -> String {
        match dimension {
            FilterDimension::Species => join_values(&self.species),
            FilterDimension::Island => self.island.to_string(),
            FilterDimension::Sex => self.sex.to_string(),
            FilterDimension::Diet => join_values(&self.diet),
            FilterDimension::LifeStage => self.life_stage.to_string(),
            FilterDimension::YearRange => self.year_range.to_string(),
        }
    }

    /// Single-record form of [`filter_records`].
    pub fn matches(&self, record: &Record) -> bool {
        FilterDimension::PIPELINE
            .iter()
            .all(|dimension| self.admits(*dimension, record))
    }

    fn admits(&self, dimension: FilterDimension, record: &Record) -> bool {
        match dimension {
            FilterDimension::Species => admits_set(&self.species, Some(record.species)),
            FilterDimension::Island => self.island.admits(Some(record.island)),
            FilterDimension::Sex => self.sex.admits(record.sex),
            FilterDimension::Diet => admits_set(&self.diet, record.diet),
            FilterDimension::LifeStage => self.life_stage.admits(record.life_stage),
            FilterDimension::YearRange => {
                self.year_range.is_full() || self.year_range.contains(record.year)
            }
        }
    }
}

/// One filter dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterDimension {
    Species,
    Island,
    Sex,
    Diet,
    LifeStage,
    YearRange,
}

impl FilterDimension {
    /// Application order used by [`filter_records`]. Not semantically
    /// significant.
    pub const PIPELINE: [FilterDimension; 6] = [
        FilterDimension::Species,
        FilterDimension::Island,
        FilterDimension::Sex,
        FilterDimension::Diet,
        FilterDimension::LifeStage,
        FilterDimension::YearRange,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterDimension::Species => "species",
            FilterDimension::Island => "island",
            FilterDimension::Sex => "sex",
            FilterDimension::Diet => "diet",
            FilterDimension::LifeStage => "life_stage",
            FilterDimension::YearRange => "year_range",
        }
    }
}

impl fmt::Display for FilterDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical-order, deduplicated subset of a vocabulary.
pub fn canonical_subset<V: Vocabulary>(values: impl IntoIterator<Item = V>) -> Vec<V> {
    let picked: Vec<V> = values.into_iter().collect();
    V::ALL
        .iter()
        .copied()
        .filter(|value| picked.contains(value))
        .collect()
}

fn join_values<V: Vocabulary>(values: &[V]) -> String {
    values
        .iter()
        .map(|value| value.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

fn is_full_set<V: Vocabulary>(selected: &[V]) -> bool {
    V::ALL.iter().all(|value| selected.contains(value))
}

fn admits_set<V: Vocabulary>(selected: &[V], value: Option<V>) -> bool {
    if is_full_set(selected) {
        return true;
    }
    value.is_some_and(|v| selected.contains(&v))
}

/// Keeps records whose species is selected.
///
/// An empty selection keeps nothing; a full selection returns `records`
/// as is.
pub fn filter_by_species<'a>(mut records: Vec<&'a Record>, selected: &[Species]) -> Vec<&'a Record> {
    if selected.is_empty() {
        records.clear();
        return records;
    }
    if is_full_set(selected) {
        return records;
    }
    records.retain(|record| selected.contains(&record.species));
    records
}

pub fn filter_by_island<'a>(mut records: Vec<&'a Record>, island: Choice<Island>) -> Vec<&'a Record> {
    if island.is_all() {
        return records;
    }
    records.retain(|record| island.admits(Some(record.island)));
    records
}

/// Keeps records of the chosen sex. Records with absent sex only survive `All`.
pub fn filter_by_sex<'a>(mut records: Vec<&'a Record>, sex: Choice<Sex>) -> Vec<&'a Record> {
    if sex.is_all() {
        return records;
    }
    records.retain(|record| sex.admits(record.sex));
    records
}

/// Same shape as [`filter_by_species`]; records with absent diet only
/// survive a full selection.
pub fn filter_by_diet<'a>(mut records: Vec<&'a Record>, selected: &[Diet]) -> Vec<&'a Record> {
    if selected.is_empty() {
        records.clear();
        return records;
    }
    if is_full_set(selected) {
        return records;
    }
    records.retain(|record| record.diet.is_some_and(|diet| selected.contains(&diet)));
    records
}

pub fn filter_by_life_stage<'a>(
    mut records: Vec<&'a Record>,
    life_stage: Choice<LifeStage>,
) -> Vec<&'a Record> {
    if life_stage.is_all() {
        return records;
    }
    records.retain(|record| life_stage.admits(record.life_stage));
    records
}

/// Keeps records with `start <= year <= end`. The full dataset span is
/// treated as inactive.
pub fn filter_by_year_range<'a>(mut records: Vec<&'a Record>, range: YearRange) -> Vec<&'a Record> {
    if range.is_full() {
        return records;
    }
    records.retain(|record| range.contains(record.year));
    records
}

/// Applies a single dimension of `filters`.
pub fn apply_dimension<'a>(
    records: Vec<&'a Record>,
    filters: &FilterState,
    dimension: FilterDimension,
) -> Vec<&'a Record> {
    match dimension {
        FilterDimension::Species => filter_by_species(records, &filters.species),
        FilterDimension::Island => filter_by_island(records, filters.island),
        FilterDimension::Sex => filter_by_sex(records, filters.sex),
        FilterDimension::Diet => filter_by_diet(records, &filters.diet),
        FilterDimension::LifeStage => filter_by_life_stage(records, filters.life_stage),
        FilterDimension::YearRange => filter_by_year_range(records, filters.year_range),
    }
}

/// Applies every dimension of `filters` to `records`.
pub fn filter_records<'a>(records: &'a [Record], filters: &FilterState) -> Vec<&'a Record> {
    FilterDimension::PIPELINE
        .iter()
        .fold(records.iter().collect(), |current, dimension| {
            apply_dimension(current, filters, *dimension)
        })
}
