#![allow(dead_code)]

use penguinview::chart::{ChartConfig, MAX_BINS};
use penguinview::data::{
    Diet, Island, LifeStage, NumericField, Record, Sex, Species, Vocabulary, MAX_YEAR, MIN_YEAR,
};
use penguinview::filter::{canonical_subset, Choice, FilterState, YearRange};
use penguinview::url_state::UrlState;
use proptest::prelude::*;
use proptest::sample::{select, subsequence};
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

pub fn arb_vocab<V: Vocabulary + std::fmt::Debug + 'static>() -> BoxedStrategy<V> {
    select(V::ALL.to_vec()).boxed()
}

pub fn arb_choice<V: Vocabulary + std::fmt::Debug + 'static>() -> BoxedStrategy<Choice<V>> {
    prop_oneof![
        Just(Choice::All),
        arb_vocab::<V>().prop_map(Choice::Only),
    ]
    .boxed()
}

/// Non-empty canonical-order subset; the only selections a URL can carry.
pub fn arb_selection<V: Vocabulary + std::fmt::Debug + 'static>() -> BoxedStrategy<Vec<V>> {
    let all = V::ALL.to_vec();
    let len = all.len();
    subsequence(all, 1..=len)
        .prop_map(|picked| canonical_subset(picked))
        .boxed()
}

/// Any subset, including the empty one.
pub fn arb_any_selection<V: Vocabulary + std::fmt::Debug + 'static>() -> BoxedStrategy<Vec<V>> {
    let all = V::ALL.to_vec();
    let len = all.len();
    subsequence(all, 0..=len).boxed()
}

pub fn arb_year_range() -> BoxedStrategy<YearRange> {
    (MIN_YEAR..=MAX_YEAR, MIN_YEAR..=MAX_YEAR)
        .prop_map(|(a, b)| YearRange::new(a.min(b), a.max(b)))
        .boxed()
}

pub fn arb_chart() -> BoxedStrategy<ChartConfig> {
    prop_oneof![
        (arb_vocab::<NumericField>(), arb_vocab::<NumericField>())
            .prop_map(|(x, y)| ChartConfig::Scatter { x, y }),
        (arb_vocab::<NumericField>(), 1..=MAX_BINS)
            .prop_map(|(field, bins)| ChartConfig::Histogram { field, bins }),
        arb_vocab::<NumericField>().prop_map(|field| ChartConfig::Box { field }),
    ]
    .boxed()
}

pub fn arb_filters() -> BoxedStrategy<FilterState> {
    (
        arb_selection::<Species>(),
        arb_choice::<Island>(),
        arb_choice::<Sex>(),
        arb_selection::<Diet>(),
        arb_choice::<LifeStage>(),
        arb_year_range(),
    )
        .prop_map(|(species, island, sex, diet, life_stage, year_range)| FilterState {
            species,
            island,
            sex,
            diet,
            life_stage,
            year_range,
        })
        .boxed()
}

/// Filters that may also hold empty selections, for pipeline tests.
pub fn arb_any_filters() -> BoxedStrategy<FilterState> {
    (
        arb_any_selection::<Species>(),
        arb_choice::<Island>(),
        arb_choice::<Sex>(),
        arb_any_selection::<Diet>(),
        arb_choice::<LifeStage>(),
        arb_year_range(),
    )
        .prop_map(|(species, island, sex, diet, life_stage, year_range)| FilterState {
            species,
            island,
            sex,
            diet,
            life_stage,
            year_range,
        })
        .boxed()
}

/// A state reachable through the UI and representable in a URL.
pub fn arb_url_state() -> BoxedStrategy<UrlState> {
    (arb_chart(), arb_filters())
        .prop_map(|(chart, filters)| UrlState { chart, filters })
        .boxed()
}

fn arb_measurement(lo: f64, hi: f64) -> BoxedStrategy<Option<f64>> {
    proptest::option::of(lo..hi).boxed()
}

pub fn arb_record() -> BoxedStrategy<Record> {
    (
        (
            arb_vocab::<Species>(),
            arb_vocab::<Island>(),
            MIN_YEAR - 1..=MAX_YEAR + 1,
        ),
        (
            arb_measurement(30.0, 60.0),
            arb_measurement(13.0, 22.0),
            arb_measurement(170.0, 235.0),
            arb_measurement(2500.0, 6500.0),
        ),
        (
            proptest::option::of(arb_vocab::<Sex>()),
            proptest::option::of(arb_vocab::<Diet>()),
            proptest::option::of(arb_vocab::<LifeStage>()),
        ),
    )
        .prop_map(
            |((species, island, year), (bill_len, bill_depth, flipper, mass), (sex, diet, stage))| {
                let mut record = Record::new(species, island, year);
                record.bill_length_mm = bill_len;
                record.bill_depth_mm = bill_depth;
                record.flipper_length_mm = flipper;
                record.body_mass_g = mass;
                record.sex = sex;
                record.diet = diet;
                record.life_stage = stage;
                record
            },
        )
        .boxed()
}

pub fn arb_records(max: usize) -> BoxedStrategy<Vec<Record>> {
    prop::collection::vec(arb_record(), 0..=max).boxed()
}
