//! Chart configuration.
//!
//! [`ChartConfig`] carries only the fields its chart kind uses: axes for
//! scatter plots, a field and bin count for histograms, a field for box
//! plots. Partial edits arrive as a [`ChartUpdate`] and are merged with
//! [`ChartConfig::apply`], which fills anything unset from the defaults.

use serde::Serialize;
use std::fmt;

use crate::data::NumericField;

/// Default scatter x axis.
pub const DEFAULT_X: NumericField = NumericField::BillLengthMm;
/// Default scatter y axis.
pub const DEFAULT_Y: NumericField = NumericField::BodyMassG;
/// Default histogram / box plot field.
pub const DEFAULT_FIELD: NumericField = NumericField::BillLengthMm;
/// Default histogram bin count.
pub const DEFAULT_BINS: u32 = 12;
/// Largest histogram bin count accepted from a query string by default.
pub const MAX_BINS: u32 = 100;
/// Hard ceiling for any configured bin limit.
pub const BIN_LIMIT_CEILING: u32 = 1_000;

/// The kind of chart on display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Scatter,
    Histogram,
    Box,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Scatter, ChartKind::Histogram, ChartKind::Box];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Scatter => "scatter",
            ChartKind::Histogram => "histogram",
            ChartKind::Box => "box",
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.as_str() == key)
    }
}

impl Default for ChartKind {
    fn default() -> Self {
        ChartKind::Scatter
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The active chart and its field selections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChartConfig {
    Scatter { x: NumericField, y: NumericField },
    Histogram { field: NumericField, bins: u32 },
    Box { field: NumericField },
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self::for_kind(ChartKind::Scatter)
    }
}

impl ChartConfig {
    /// The default configuration for `kind`.
    pub fn for_kind(kind: ChartKind) -> Self {
        match kind {
            ChartKind::Scatter => ChartConfig::Scatter {
                x: DEFAULT_X,
                y: DEFAULT_Y,
            },
            ChartKind::Histogram => ChartConfig::Histogram {
                field: DEFAULT_FIELD,
                bins: DEFAULT_BINS,
            },
            ChartKind::Box => ChartConfig::Box {
                field: DEFAULT_FIELD,
            },
        }
    }

    pub fn kind(&self) -> ChartKind {
        match self {
            ChartConfig::Scatter { .. } => ChartKind::Scatter,
            ChartConfig::Histogram { .. } => ChartKind::Histogram,
            ChartConfig::Box { .. } => ChartKind::Box,
        }
    }

    pub fn x(&self) -> Option<NumericField> {
        match self {
            ChartConfig::Scatter { x, .. } => Some(*x),
            _ => None,
        }
    }

    pub fn y(&self) -> Option<NumericField> {
        match self {
            ChartConfig::Scatter { y, .. } => Some(*y),
            _ => None,
        }
    }

    pub fn field(&self) -> Option<NumericField> {
        match self {
            ChartConfig::Histogram { field, .. } | ChartConfig::Box { field } => Some(*field),
            ChartConfig::Scatter { .. } => None,
        }
    }

    pub fn bins(&self) -> Option<u32> {
        match self {
            ChartConfig::Histogram { bins, .. } => Some(*bins),
            _ => None,
        }
    }

    /// Merges `update` over this config and re-normalizes for the
    /// resulting kind.
    ///
    /// Fields the resulting kind does not use are dropped; fields it uses
    /// but neither side sets fall back to the defaults. A zero bin count
    /// means "use the default"; other counts are kept as given, since the
    /// upper bound belongs to whoever produced them (see
    /// [`CodecOptions`](crate::url_state::CodecOptions)).
    pub fn apply(&self, update: &ChartUpdate) -> ChartConfig {
        let kind = update.kind.unwrap_or_else(|| self.kind());
        match kind {
            ChartKind::Scatter => ChartConfig::Scatter {
                x: update.x.or(self.x()).unwrap_or(DEFAULT_X),
                y: update.y.or(self.y()).unwrap_or(DEFAULT_Y),
            },
            ChartKind::Histogram => ChartConfig::Histogram {
                field: update.field.or(self.field()).unwrap_or(DEFAULT_FIELD),
                bins: bins_or_default(update.bins.or(self.bins()).unwrap_or(DEFAULT_BINS)),
            },
            ChartKind::Box => ChartConfig::Box {
                field: update.field.or(self.field()).unwrap_or(DEFAULT_FIELD),
            },
        }
    }

    /// A full update that reproduces this config when applied to any other.
    pub fn to_update(&self) -> ChartUpdate {
        ChartUpdate {
            kind: Some(self.kind()),
            x: self.x(),
            y: self.y(),
            field: self.field(),
            bins: self.bins(),
        }
    }
}

fn bins_or_default(bins: u32) -> u32 {
    if bins == 0 {
        DEFAULT_BINS
    } else {
        bins
    }
}

/// A partial chart configuration edit. `None` leaves a field as it was.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChartUpdate {
    pub kind: Option<ChartKind>,
    pub x: Option<NumericField>,
    pub y: Option<NumericField>,
    pub field: Option<NumericField>,
    pub bins: Option<u32>,
}

impl ChartUpdate {
    pub fn kind(kind: ChartKind) -> Self {
        Self {
            kind: Some(kind),
            ..Default::default()
        }
    }

    pub fn with_x(mut self, x: NumericField) -> Self {
        self.x = Some(x);
        self
    }

    pub fn with_y(mut self, y: NumericField) -> Self {
        self.y = Some(y);
        self
    }

    pub fn with_field(mut self, field: NumericField) -> Self {
        self.field = Some(field);
        self
    }

    pub fn with_bins(mut self, bins: u32) -> Self {
        self.bins = Some(bins);
        self
    }
}
