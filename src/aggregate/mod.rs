//! Chart aggregations over filtered records.
//!
//! Every routine here is pure and total. Absent measurements are skipped,
//! never treated as zero; empty input yields empty output.

mod report;

pub use report::{
    format_numeric_value, format_value, ChartSummary, SpeciesCount, SummaryOptions, SummaryReport,
};

use std::collections::BTreeMap;

use serde::Serialize;

use crate::chart::ChartConfig;
use crate::data::{NumericField, Record, Species, Vocabulary};
use crate::filter::{filter_records, FilterState};

/// One equal-width histogram bin.
///
/// Bins are half-open `[start, end)` except the last, which also holds the
/// maximum observed value.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    /// Count per species, every species present (zero when empty).
    pub counts: BTreeMap<Species, usize>,
}

impl HistogramBin {
    fn empty(start: f64, end: f64) -> Self {
        Self {
            start,
            end,
            counts: Species::ALL.iter().map(|species| (*species, 0)).collect(),
        }
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

/// Five-number summary for one species.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BoxStats {
    pub species: Species,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// One scatter plot point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub species: Species,
}

fn present_values<'a>(
    records: &'a [&'a Record],
    field: NumericField,
) -> impl Iterator<Item = (Species, f64)> + 'a {
    records.iter().filter_map(move |record| {
        record
            .measurement(field)
            .filter(|value| value.is_finite())
            .map(|value| (record.species, value))
    })
}

/// Partitions the present values of `field` into `bins` equal-width bins
/// over the observed `[min, max]`, counting per species.
///
/// Returns no bins when nothing is present or `bins` is zero. When every
/// present value is identical the span is zero and a single bin
/// `[value, value]` holds them all.
pub fn histogram(records: &[&Record], field: NumericField, bins: u32) -> Vec<HistogramBin> {
    let values: Vec<(Species, f64)> = present_values(records, field).collect();
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let (min, max) = values.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, v)| {
        (lo.min(*v), hi.max(*v))
    });

    if min == max {
        let mut bin = HistogramBin::empty(min, max);
        for (species, _) in &values {
            *bin.counts.entry(*species).or_insert(0) += 1;
        }
        return vec![bin];
    }

    let n = bins as usize;
    let width = (max - min) / n as f64;
    let mut out: Vec<HistogramBin> = (0..n)
        .map(|i| {
            let start = min + width * i as f64;
            let end = if i + 1 == n { max } else { min + width * (i + 1) as f64 };
            HistogramBin::empty(start, end)
        })
        .collect();

    for (species, value) in values {
        let index = (((value - min) / width).floor() as usize).min(n - 1);
        *out[index].counts.entry(species).or_insert(0) += 1;
    }

    out
}

/// Quantile of an ascending slice by linear interpolation between the two
/// nearest ranks (position `(n - 1) * p`).
pub fn quantile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() || !p.is_finite() {
        return None;
    }
    let p = p.clamp(0.0, 1.0);
    let position = (sorted.len() - 1) as f64 * p;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Per-species box plot statistics for `field`, in canonical species
/// order. Species with no present values are left out.
pub fn box_plot_stats(records: &[&Record], field: NumericField) -> Vec<BoxStats> {
    let mut by_species: BTreeMap<Species, Vec<f64>> = BTreeMap::new();
    for (species, value) in present_values(records, field) {
        by_species.entry(species).or_default().push(value);
    }

    by_species
        .into_iter()
        .filter_map(|(species, mut values)| {
            values.sort_by(|a, b| a.total_cmp(b));
            Some(BoxStats {
                species,
                count: values.len(),
                min: *values.first()?,
                q1: quantile(&values, 0.25)?,
                median: quantile(&values, 0.5)?,
                q3: quantile(&values, 0.75)?,
                max: *values.last()?,
            })
        })
        .collect()
}

/// Points for records where both axes are present.
pub fn scatter_points(records: &[&Record], x: NumericField, y: NumericField) -> Vec<ScatterPoint> {
    records
        .iter()
        .filter_map(|record| {
            let px = record.measurement(x).filter(|v| v.is_finite())?;
            let py = record.measurement(y).filter(|v| v.is_finite())?;
            Some(ScatterPoint {
                x: px,
                y: py,
                species: record.species,
            })
        })
        .collect()
}

/// Filters `records` and aggregates them for `chart`.
pub fn summarize(
    records: &[Record],
    chart: &ChartConfig,
    filters: &FilterState,
    opts: &SummaryOptions,
) -> SummaryReport {
    let filtered = filter_records(records, filters);

    let species_counts = Species::ALL
        .iter()
        .map(|species| SpeciesCount {
            species: *species,
            count: filtered.iter().filter(|r| r.species == *species).count(),
        })
        .collect();

    let active_filters = filters
        .active_dimensions()
        .into_iter()
        .map(|dimension| (dimension.to_string(), filters.describe(dimension)))
        .collect();

    let aggregation = match *chart {
        ChartConfig::Scatter { x, y } => ChartSummary::Scatter {
            x,
            y,
            points: scatter_points(&filtered, x, y),
        },
        ChartConfig::Histogram { field, bins } => ChartSummary::Histogram {
            field,
            bins: histogram(&filtered, field, bins),
        },
        ChartConfig::Box { field } => ChartSummary::Box {
            field,
            stats: box_plot_stats(&filtered, field),
        },
    };

    SummaryReport {
        total_records: records.len(),
        filtered_records: filtered.len(),
        chart: *chart,
        active_filters,
        species_counts,
        aggregation,
        unexpected_values: BTreeMap::new(),
        bar_width: opts.bar_width,
        decimals: opts.decimals,
    }
}
