//! Query-string codec for [`UrlState`].
//!
//! # Parameters
//!
//! | key         | value                                   | default          |
//! |-------------|-----------------------------------------|------------------|
//! | `chart`     | `scatter`, `histogram`, `box`           | `scatter`        |
//! | `x`, `y`    | numeric field (scatter)                 | `bill_length_mm` / `body_mass_g` |
//! | `field`     | numeric field (histogram, box)          | `bill_length_mm` |
//! | `bins`      | positive integer, clamped (histogram)   | `12`             |
//! | `species`   | comma list, any case                    | all three        |
//! | `island`    | `all` or an island                      | `all`            |
//! | `sex`       | `all`, `male`, `female`                 | `all`            |
//! | `diet`      | comma list, any case                    | all four         |
//! | `lifeStage` | `all`, `adult`, `juvenile`, `chick`     | `all`            |
//! | `years`     | `START-END`                             | `2021-2025`      |
//!
//! Decoding never fails. Missing, malformed and out-of-range values fall
//! back to their defaults; the first occurrence of a repeated key wins.
//!
//! Encoding always writes `chart`, then only the keys whose value differs
//! from the default, in the order of the table above.

use std::collections::HashMap;

use url::form_urlencoded;

use super::UrlState;
use crate::chart::{
    ChartConfig, ChartKind, DEFAULT_BINS, DEFAULT_FIELD, DEFAULT_X, DEFAULT_Y, MAX_BINS,
};
use crate::data::normalize::{normalize_island, normalize_species};
use crate::data::{
    Diet, Island, LifeStage, NumericField, Sex, Species, Vocabulary, MAX_YEAR, MIN_YEAR,
};
use crate::filter::{canonical_subset, Choice, FilterState, YearRange};

/// Tunables for [`UrlStateCodec`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodecOptions {
    /// Bin count used when `bins` is missing or invalid, and omitted when
    /// encoding.
    pub default_bins: u32,
    /// Upper clamp for `bins`.
    pub max_bins: u32,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            default_bins: DEFAULT_BINS,
            max_bins: MAX_BINS,
        }
    }
}

/// Encodes and decodes [`UrlState`] as a query string.
#[derive(Clone, Debug, Default)]
pub struct UrlStateCodec {
    opts: CodecOptions,
}

impl UrlStateCodec {
    pub fn new(opts: CodecOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &CodecOptions {
        &self.opts
    }

    /// Decodes a query string, with or without its leading `?`.
    pub fn decode(&self, query: &str) -> UrlState {
        let params = Params::parse(query);

        let chart = match params.get("chart").and_then(ChartKind::from_key) {
            None | Some(ChartKind::Scatter) => ChartConfig::Scatter {
                x: numeric_field(params.get("x"), DEFAULT_X),
                y: numeric_field(params.get("y"), DEFAULT_Y),
            },
            Some(ChartKind::Histogram) => ChartConfig::Histogram {
                field: numeric_field(params.get("field"), DEFAULT_FIELD),
                bins: self.bins(params.get("bins")),
            },
            Some(ChartKind::Box) => ChartConfig::Box {
                field: numeric_field(params.get("field"), DEFAULT_FIELD),
            },
        };

        let filters = FilterState {
            species: species(params.get("species")),
            island: island(params.get("island")),
            sex: sex(params.get("sex")),
            diet: diet(params.get("diet")),
            life_stage: life_stage(params.get("lifeStage")),
            year_range: year_range(params.get("years")),
        };

        UrlState { chart, filters }
    }

    /// Encodes `state` as a canonical query string without a leading `?`.
    pub fn encode(&self, state: &UrlState) -> String {
        let mut out = QueryWriter::default();
        let chart = &state.chart;
        out.push("chart", chart.kind().as_str());

        match *chart {
            ChartConfig::Scatter { x, y } => {
                if x != DEFAULT_X {
                    out.push("x", x.as_str());
                }
                if y != DEFAULT_Y {
                    out.push("y", y.as_str());
                }
            }
            ChartConfig::Histogram { field, bins } => {
                out.push("field", field.as_str());
                if bins != self.opts.default_bins {
                    out.push("bins", &bins.to_string());
                }
            }
            ChartConfig::Box { field } => {
                out.push("field", field.as_str());
            }
        }

        let filters = &state.filters;
        if !is_default_set(&filters.species) {
            out.push_list("species", &canonical_subset(filters.species.iter().copied()));
        }
        if let Choice::Only(island) = filters.island {
            out.push("island", island.as_str());
        }
        if let Choice::Only(sex) = filters.sex {
            out.push("sex", sex.as_str());
        }
        if !is_default_set(&filters.diet) {
            out.push_list("diet", &canonical_subset(filters.diet.iter().copied()));
        }
        if let Choice::Only(stage) = filters.life_stage {
            out.push("lifeStage", stage.as_str());
        }
        if !filters.year_range.is_full() {
            let range = filters.year_range;
            out.push_raw("years", &format!("{}-{}", range.start, range.end));
        }

        out.finish()
    }

    fn bins(&self, raw: Option<&str>) -> u32 {
        match raw.and_then(parse_int_prefix) {
            Some(n) if n > 0 => {
                let clamped = n.min(i64::from(self.opts.max_bins));
                u32::try_from(clamped).unwrap_or(self.opts.max_bins)
            }
            _ => self.opts.default_bins,
        }
    }
}

/// Decodes with the default [`CodecOptions`].
pub fn decode_query(query: &str) -> UrlState {
    UrlStateCodec::default().decode(query)
}

/// Encodes with the default [`CodecOptions`].
pub fn encode_query(state: &UrlState) -> String {
    UrlStateCodec::default().encode(state)
}

/// First-occurrence view over decoded query pairs.
struct Params {
    values: HashMap<String, String>,
}

impl Params {
    fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut values = HashMap::new();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            values
                .entry(key.into_owned())
                .or_insert_with(|| value.into_owned());
        }
        Self { values }
    }

    /// The value for `key`, treating an empty value as missing.
    fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

#[derive(Default)]
struct QueryWriter {
    pairs: Vec<String>,
}

impl QueryWriter {
    fn push(&mut self, key: &str, value: &str) {
        self.push_raw(key, &encode_component(value));
    }

    /// Comma-joins the values, escaping each one but not the separators.
    fn push_list<V: Vocabulary>(&mut self, key: &str, values: &[V]) {
        let joined = values
            .iter()
            .map(|value| encode_component(value.as_str()))
            .collect::<Vec<_>>()
            .join(",");
        self.push_raw(key, &joined);
    }

    fn push_raw(&mut self, key: &str, encoded_value: &str) {
        self.pairs
            .push(format!("{}={}", encode_component(key), encoded_value));
    }

    fn finish(self) -> String {
        self.pairs.join("&")
    }
}

fn encode_component(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

fn is_default_set<V: Vocabulary>(selected: &[V]) -> bool {
    selected.is_empty() || V::ALL.iter().all(|value| selected.contains(value))
}

fn numeric_field(raw: Option<&str>, fallback: NumericField) -> NumericField {
    raw.and_then(NumericField::from_key).unwrap_or(fallback)
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|token| !token.is_empty())
}

fn species(raw: Option<&str>) -> Vec<Species> {
    let picked = raw
        .map(|raw| canonical_subset(split_list(raw).filter_map(|t| normalize_species(Some(t)))))
        .unwrap_or_default();
    if picked.is_empty() {
        Species::ALL.to_vec()
    } else {
        picked
    }
}

fn island(raw: Option<&str>) -> Choice<Island> {
    match raw {
        None => Choice::All,
        Some(raw) if raw.eq_ignore_ascii_case("all") => Choice::All,
        Some(raw) => normalize_island(Some(raw)).map_or(Choice::All, Choice::Only),
    }
}

fn sex(raw: Option<&str>) -> Choice<Sex> {
    raw.and_then(|raw| {
        Sex::ALL
            .iter()
            .copied()
            .find(|sex| sex.as_str().eq_ignore_ascii_case(raw))
    })
    .map_or(Choice::All, Choice::Only)
}

fn diet(raw: Option<&str>) -> Vec<Diet> {
    let picked = raw
        .map(|raw| {
            let tokens: Vec<String> = split_list(raw).map(str::to_lowercase).collect();
            Diet::ALL
                .iter()
                .copied()
                .filter(|diet| tokens.iter().any(|t| t == diet.as_str()))
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    if picked.is_empty() {
        Diet::ALL.to_vec()
    } else {
        picked
    }
}

fn life_stage(raw: Option<&str>) -> Choice<LifeStage> {
    raw.map(str::trim)
        .and_then(|raw| {
            LifeStage::ALL
                .iter()
                .copied()
                .find(|stage| stage.as_str().eq_ignore_ascii_case(raw))
        })
        .map_or(Choice::All, Choice::Only)
}

fn year_range(raw: Option<&str>) -> YearRange {
    let Some(raw) = raw else {
        return YearRange::full();
    };
    let parts: Vec<Option<i64>> = raw.split('-').map(parse_int_prefix).collect();
    let (mut start, mut end) = match parts.as_slice() {
        [Some(start), Some(end)] => (*start, *end),
        _ => return YearRange::full(),
    };
    if start > end {
        std::mem::swap(&mut start, &mut end);
    }

    let (min, max) = (i64::from(MIN_YEAR), i64::from(MAX_YEAR));
    let start = start.clamp(min, max);
    let end = end.clamp(start, max);

    match (i32::try_from(start), i32::try_from(end)) {
        (Ok(start), Ok(end)) => YearRange::new(start, end),
        _ => YearRange::full(),
    }
}

/// Fuzz-only entrypoint for the leading-integer parser used by `bins` and
/// `years`.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_int_prefix(input: &str) -> Option<i64> {
    parse_int_prefix(input)
}

/// Leading-integer parse: optional whitespace, optional sign, then as many
/// decimal digits as are present. Trailing garbage is ignored. Values that
/// overflow saturate.
fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits: &str = &digits[..digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len())];
    if digits.is_empty() {
        return None;
    }

    let magnitude = digits.bytes().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });
    Some(if negative { -magnitude } else { magnitude })
}
