//! Interfaces the host environment provides to the sync controller.

use url::Url;

use crate::chart::ChartUpdate;
use crate::data::{Diet, Island, LifeStage, Sex, Species};
use crate::error::PenguinviewError;
use crate::filter::{Choice, YearRange};

/// The browser's current location and its history writer.
///
/// `search` and `hash` include their leading `?` / `#` when non-empty.
pub trait BrowserLocation {
    /// The full current URL.
    fn href(&self) -> String;
    fn origin(&self) -> String;
    fn pathname(&self) -> String;
    fn search(&self) -> String;
    fn hash(&self) -> String;

    /// Replaces the current history entry with `relative_url`
    /// (path, optional query, optional hash).
    fn replace_state(&mut self, relative_url: &str);
}

/// State setters owned by the host UI.
///
/// The controller calls a setter only when the decoded value differs from
/// the host's current value.
pub trait StateSetters {
    fn update_chart(&mut self, update: ChartUpdate);
    fn set_species(&mut self, species: Vec<Species>);
    fn set_island(&mut self, island: Choice<Island>);
    fn set_sex(&mut self, sex: Choice<Sex>);
    fn set_diet(&mut self, diet: Vec<Diet>);
    fn set_life_stage(&mut self, life_stage: Choice<LifeStage>);
    fn set_year_range(&mut self, year_range: YearRange);
}

/// A [`BrowserLocation`] backed by a parsed URL, recording every
/// `replace_state` call.
#[derive(Clone, Debug)]
pub struct MemoryLocation {
    url: Url,
    writes: Vec<String>,
}

impl MemoryLocation {
    pub fn parse(input: &str) -> Result<Self, PenguinviewError> {
        let url = Url::parse(input).map_err(|source| PenguinviewError::InvalidUrl {
            input: input.to_string(),
            source,
        })?;
        Ok(Self {
            url,
            writes: Vec::new(),
        })
    }

    /// Moves to `input` the way back/forward navigation would, without
    /// recording a history write.
    pub fn navigate(&mut self, input: &str) -> Result<(), PenguinviewError> {
        self.url = self.url.join(input).map_err(|source| PenguinviewError::InvalidUrl {
            input: input.to_string(),
            source,
        })?;
        Ok(())
    }

    /// Relative URLs passed to `replace_state`, oldest first.
    pub fn writes(&self) -> &[String] {
        &self.writes
    }
}

impl BrowserLocation for MemoryLocation {
    fn href(&self) -> String {
        self.url.as_str().to_string()
    }

    fn origin(&self) -> String {
        self.url.origin().ascii_serialization()
    }

    fn pathname(&self) -> String {
        self.url.path().to_string()
    }

    fn search(&self) -> String {
        match self.url.query() {
            Some(query) if !query.is_empty() => format!("?{}", query),
            _ => String::new(),
        }
    }

    fn hash(&self) -> String {
        match self.url.fragment() {
            Some(fragment) if !fragment.is_empty() => format!("#{}", fragment),
            _ => String::new(),
        }
    }

    fn replace_state(&mut self, relative_url: &str) {
        self.writes.push(relative_url.to_string());
        match self.url.join(relative_url) {
            Ok(next) => self.url = next,
            Err(err) => tracing::warn!(url = %relative_url, error = %err, "ignoring unparsable history write"),
        }
    }
}
