//! URL state: the query-string codec and the controller that keeps the
//! browser address bar in sync with chart and filter state.
//!
//! [`UrlStateCodec`] maps between a query string and [`UrlState`].
//! [`UrlSyncController`] drives a [`BrowserLocation`] and a set of
//! [`StateSetters`] supplied by the host.
//!
//! # Example
//!
//! ```
//! use penguinview::url_state::{decode_query, encode_query};
//!
//! let state = decode_query("?chart=box&field=body_mass_g&species=gentoo");
//! assert_eq!(encode_query(&state), "chart=box&field=body_mass_g&species=Gentoo");
//! ```

mod codec;
mod host;
mod sync;

pub use codec::{decode_query, encode_query, CodecOptions, UrlStateCodec};
#[cfg(feature = "fuzzing")]
pub use codec::fuzz_parse_int_prefix;
pub use host::{BrowserLocation, MemoryLocation, StateSetters};
pub use sync::{PendingWrite, SyncOptions, SyncPhase, UrlSyncController};

use serde::Serialize;
use std::fmt;
use url::Url;

use crate::chart::{ChartConfig, ChartUpdate};
use crate::data::{Diet, Island, LifeStage, Sex, Species};
use crate::error::PenguinviewError;
use crate::filter::{canonical_subset, Choice, FilterDimension, FilterState, YearRange};

/// Everything the address bar carries: the chart and the filters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UrlState {
    pub chart: ChartConfig,
    pub filters: FilterState,
}

impl fmt::Display for UrlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.chart {
            ChartConfig::Scatter { x, y } => {
                writeln!(f, "chart:       scatter (x={}, y={})", x, y)?;
            }
            ChartConfig::Histogram { field, bins } => {
                writeln!(f, "chart:       histogram (field={}, bins={})", field, bins)?;
            }
            ChartConfig::Box { field } => {
                writeln!(f, "chart:       box (field={})", field)?;
            }
        }
        for dimension in FilterDimension::PIPELINE {
            writeln!(
                f,
                "{:<12} {}",
                format!("{}:", dimension),
                self.filters.describe(dimension)
            )?;
        }
        Ok(())
    }
}

/// A plain in-memory host: setters write straight into the state.
impl StateSetters for UrlState {
    fn update_chart(&mut self, update: ChartUpdate) {
        self.chart = self.chart.apply(&update);
    }

    fn set_species(&mut self, species: Vec<Species>) {
        self.filters.species = canonical_subset(species);
    }

    fn set_island(&mut self, island: Choice<Island>) {
        self.filters.island = island;
    }

    fn set_sex(&mut self, sex: Choice<Sex>) {
        self.filters.sex = sex;
    }

    fn set_diet(&mut self, diet: Vec<Diet>) {
        self.filters.diet = canonical_subset(diet);
    }

    fn set_life_stage(&mut self, life_stage: Choice<LifeStage>) {
        self.filters.life_stage = life_stage;
    }

    fn set_year_range(&mut self, year_range: YearRange) {
        self.filters.year_range = year_range;
    }
}

/// Extracts the query string from either a full URL or a bare query.
///
/// A leading `?` on a bare query is dropped. Input that looks like an
/// absolute URL (contains `://`) must parse as one.
pub fn query_from_input(input: &str) -> Result<String, PenguinviewError> {
    let trimmed = input.trim();
    if trimmed.contains("://") {
        let url = Url::parse(trimmed).map_err(|source| PenguinviewError::InvalidUrl {
            input: trimmed.to_string(),
            source,
        })?;
        return Ok(url.query().unwrap_or_default().to_string());
    }
    Ok(trimmed.strip_prefix('?').unwrap_or(trimmed).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_from_url_and_bare_query() {
        assert_eq!(
            query_from_input("https://example.org/app/?chart=box#top").unwrap(),
            "chart=box"
        );
        assert_eq!(query_from_input("https://example.org/").unwrap(), "");
        assert_eq!(query_from_input("?sex=male").unwrap(), "sex=male");
        assert_eq!(query_from_input(" island=Dream ").unwrap(), "island=Dream");
    }

    #[test]
    fn display_lists_every_dimension() {
        let text = decode_query("chart=histogram&bins=18&island=Dream").to_string();
        assert!(text.contains("histogram (field=bill_length_mm, bins=18)"));
        assert!(text.contains("island:      Dream"));
        assert!(text.contains("year_range:  2021-2025"));
        assert!(text.contains("species:     Adelie,Chinstrap,Gentoo"));
    }

    #[test]
    fn malformed_url_is_an_error() {
        let err = query_from_input("http://[::1/?chart=box").unwrap_err();
        assert!(matches!(err, PenguinviewError::InvalidUrl { .. }));
    }

    #[test]
    fn in_memory_setters_canonicalize() {
        let mut state = UrlState::default();
        state.set_species(vec![Species::Gentoo, Species::Adelie, Species::Gentoo]);
        state.set_diet(vec![Diet::Squid, Diet::Fish]);
        assert_eq!(state.filters.species, vec![Species::Adelie, Species::Gentoo]);
        assert_eq!(state.filters.diet, vec![Diet::Fish, Diet::Squid]);

        state.update_chart(ChartUpdate::kind(crate::chart::ChartKind::Box));
        assert_eq!(state.chart.kind(), crate::chart::ChartKind::Box);
    }
}
