//! Summary report types and terminal formatting.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use super::{BoxStats, HistogramBin, ScatterPoint};
use crate::chart::ChartConfig;
use crate::data::{NumericField, Species};

const ABSENT: &str = "—";
const INNER_WIDTH: usize = 59;

/// Display options for [`SummaryReport`].
#[derive(Clone, Debug)]
pub struct SummaryOptions {
    /// Width of count bars (in characters).
    pub bar_width: usize,
    /// Decimal places for measurements.
    pub decimals: usize,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            bar_width: 20,
            decimals: 1,
        }
    }
}

/// Records remaining for one species after filtering.
#[derive(Clone, Debug, Serialize)]
pub struct SpeciesCount {
    pub species: Species,
    pub count: usize,
}

/// The aggregation backing the active chart.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChartSummary {
    Scatter {
        x: NumericField,
        y: NumericField,
        points: Vec<ScatterPoint>,
    },
    Histogram {
        field: NumericField,
        bins: Vec<HistogramBin>,
    },
    Box {
        field: NumericField,
        stats: Vec<BoxStats>,
    },
}

/// Filtered dataset summary for one URL state.
#[derive(Clone, Debug, Serialize)]
pub struct SummaryReport {
    /// Records in the dataset after transformation.
    pub total_records: usize,
    /// Records left after filtering.
    pub filtered_records: usize,
    pub chart: ChartConfig,
    /// `(dimension, selection)` for every dimension that narrows anything.
    pub active_filters: Vec<(String, String)>,
    pub species_counts: Vec<SpeciesCount>,
    pub aggregation: ChartSummary,
    /// Unrecognized raw category values seen during ingestion, per field.
    pub unexpected_values: BTreeMap<String, Vec<String>>,
    #[serde(skip)]
    pub(crate) bar_width: usize,
    #[serde(skip)]
    pub(crate) decimals: usize,
}

impl SummaryReport {
    pub fn with_unexpected_values(mut self, values: BTreeMap<String, Vec<String>>) -> Self {
        self.unexpected_values = values;
        self
    }
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(
            f,
            "╭─────────────────────────────────────────────────────────────╮"
        )?;
        writeln!(
            f,
            "│                🐧  Penguin Data Summary                     │"
        )?;
        writeln!(
            f,
            "╰─────────────────────────────────────────────────────────────╯"
        )?;
        writeln!(f)?;

        self.fmt_overview(f)?;
        writeln!(f)?;
        self.fmt_species(f)?;
        writeln!(f)?;
        self.fmt_chart(f)?;

        if !self.unexpected_values.is_empty() {
            writeln!(f)?;
            self.fmt_unexpected(f)?;
        }

        Ok(())
    }
}

impl SummaryReport {
    fn fmt_overview(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        section_header(f, "Summary")?;
        blank_line(f)?;
        boxed_line(
            f,
            &format!("  Records:       {:>8}", format_number(self.total_records)),
        )?;
        boxed_line(
            f,
            &format!(
                "  Shown:         {:>8} ({})",
                format_number(self.filtered_records),
                fmt_percent(self.filtered_records, self.total_records)
            ),
        )?;
        blank_line(f)?;

        if self.active_filters.is_empty() {
            boxed_line(f, "  Filters:       none")?;
        } else {
            boxed_line(f, "  Filters:")?;
            for (dimension, selection) in &self.active_filters {
                boxed_line(
                    f,
                    &format!("    {:<12} {}", dimension, truncate_label(selection, 38)),
                )?;
            }
        }

        blank_line(f)?;
        section_footer(f)
    }

    fn fmt_species(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        section_header(f, "Species")?;
        blank_line(f)?;

        let max_count = self
            .species_counts
            .iter()
            .map(|entry| entry.count)
            .max()
            .unwrap_or(0);

        for entry in &self.species_counts {
            let bar = render_bar(entry.count, max_count, self.bar_width);
            boxed_line(
                f,
                &format!(
                    "  {:<12} {:>7} {:>6}  {}",
                    entry.species.to_string(),
                    format_number(entry.count),
                    fmt_percent(entry.count, self.filtered_records),
                    bar
                ),
            )?;
        }

        blank_line(f)?;
        section_footer(f)
    }

    fn fmt_chart(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.aggregation {
            ChartSummary::Scatter { x, y, points } => {
                section_header(f, "Scatter")?;
                blank_line(f)?;
                boxed_line(f, &format!("  x: {}", x.label()))?;
                boxed_line(f, &format!("  y: {}", y.label()))?;
                boxed_line(
                    f,
                    &format!("  Points with both values: {}", format_number(points.len())),
                )?;
            }
            ChartSummary::Histogram { field, bins } => {
                section_header(f, &format!("Histogram: {}", field.label()))?;
                blank_line(f)?;
                if bins.is_empty() {
                    boxed_line(f, "  No values to bin.")?;
                } else {
                    let max_total = bins.iter().map(HistogramBin::total).max().unwrap_or(0);
                    for bin in bins {
                        let range = format!(
                            "{}..{}",
                            format_numeric_value(Some(bin.start), self.decimals),
                            format_numeric_value(Some(bin.end), self.decimals)
                        );
                        boxed_line(
                            f,
                            &format!(
                                "  {:<22} {:>6}  {}",
                                truncate_label(&range, 22),
                                format_number(bin.total()),
                                render_bar(bin.total(), max_total, self.bar_width)
                            ),
                        )?;
                    }
                }
            }
            ChartSummary::Box { field, stats } => {
                section_header(f, &format!("Box Plot: {}", field.label()))?;
                blank_line(f)?;
                if stats.is_empty() {
                    boxed_line(f, "  No values to summarize.")?;
                } else {
                    boxed_line(
                        f,
                        "  Species        n      min     q1    med     q3    max",
                    )?;
                    for s in stats {
                        boxed_line(
                            f,
                            &format!(
                                "  {:<10} {:>5} {:>8} {:>6} {:>6} {:>6} {:>6}",
                                s.species.to_string(),
                                format_number(s.count),
                                format_numeric_value(Some(s.min), self.decimals),
                                format_numeric_value(Some(s.q1), self.decimals),
                                format_numeric_value(Some(s.median), self.decimals),
                                format_numeric_value(Some(s.q3), self.decimals),
                                format_numeric_value(Some(s.max), self.decimals),
                            ),
                        )?;
                    }
                }
            }
        }

        blank_line(f)?;
        section_footer(f)
    }

    fn fmt_unexpected(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        section_header(f, "Unrecognized values")?;
        blank_line(f)?;
        for (field, values) in &self.unexpected_values {
            boxed_line(
                f,
                &format!("  {:<14} {}", field, truncate_label(&values.join(", "), 40)),
            )?;
        }
        blank_line(f)?;
        section_footer(f)
    }
}

/// Formats an optional measurement, rendering absent values as an em dash.
///
/// Present values use the shortest representation that round-trips.
pub fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => ABSENT.to_string(),
    }
}

/// Formats an optional measurement with a fixed number of decimals.
pub fn format_numeric_value(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => ABSENT.to_string(),
    }
}

fn section_header(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(
        f,
        "┌─ {} {}┐",
        title,
        "─".repeat((INNER_WIDTH - 2).saturating_sub(title.chars().count()))
    )
}

fn section_footer(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "└{}┘", "─".repeat(INNER_WIDTH))
}

fn blank_line(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    boxed_line(f, "")
}

/// Writes `content` inside the section border, padded to the inner width.
fn boxed_line(f: &mut fmt::Formatter<'_>, content: &str) -> fmt::Result {
    let padding = INNER_WIDTH.saturating_sub(content.chars().count() + 1);
    writeln!(f, "│ {}{}│", content, " ".repeat(padding))
}

/// Format a number with thousand separators.
fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a percentage, handling zero denominators.
fn fmt_percent(numerator: usize, denominator: usize) -> String {
    if denominator == 0 {
        "n/a".to_string()
    } else {
        format!("{:.1}%", (numerator as f64 / denominator as f64) * 100.0)
    }
}

/// Render a horizontal bar using Unicode block characters.
fn render_bar(count: usize, max_count: usize, width: usize) -> String {
    if max_count == 0 || width == 0 {
        return String::new();
    }

    let filled = ((count * width) / max_count).min(width);
    "█".repeat(filled) + &"░".repeat(width - filled)
}

fn truncate_label(label: &str, max_len: usize) -> String {
    if label.chars().count() <= max_len {
        label.to_string()
    } else {
        let kept: String = label.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}
