//! Closed vocabularies for the penguin dataset.
//!
//! Every categorical column of the dataset draws from one of the enums in
//! this module. Variant declaration order is the canonical enumeration
//! order: it is what `Ord` compares, what `ALL` lists, and the order in
//! which multi-valued selections are stored and serialized.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A closed set of canonical values for one categorical field.
pub trait Vocabulary: Copy + Eq + Ord + fmt::Debug + 'static {
    /// Field name used for diagnostics (matches the dataset column).
    const FIELD: &'static str;

    /// All canonical values, in enumeration order.
    const ALL: &'static [Self];

    /// Known spelling variants mapped onto canonical values.
    const VARIANTS: &'static [(&'static str, Self)] = &[];

    /// The canonical spelling of this value.
    fn as_str(&self) -> &'static str;
}

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident, field = $field:literal {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
        $(variants { $($alias:literal => $target:ident),* $(,)? })?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $text)] $variant),+
        }

        impl Vocabulary for $name {
            const FIELD: &'static str = $field;
            const ALL: &'static [Self] = &[$($name::$variant),+];
            $(const VARIANTS: &'static [(&'static str, Self)] = &[$(($alias, $name::$target)),*];)?

            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

vocabulary! {
    /// Penguin species.
    Species, field = "species" {
        Adelie => "Adelie",
        Chinstrap => "Chinstrap",
        Gentoo => "Gentoo",
    }
}

vocabulary! {
    /// Island in the Palmer Archipelago where the penguin was observed.
    Island, field = "island" {
        Biscoe => "Biscoe",
        Dream => "Dream",
        Torgersen => "Torgersen",
    }
    variants {
        "Torgensen" => Torgersen,
        "Torgesen" => Torgersen,
        "Biscoe Island" => Biscoe,
        "Dream Island" => Dream,
    }
}

vocabulary! {
    /// Recorded sex of the penguin.
    Sex, field = "sex" {
        Male => "male",
        Female => "female",
    }
    variants {
        "m" => Male,
        "f" => Female,
    }
}

vocabulary! {
    /// Primary diet.
    Diet, field = "diet" {
        Fish => "fish",
        Krill => "krill",
        Squid => "squid",
        Parental => "parental",
    }
}

vocabulary! {
    /// Life stage at observation time.
    LifeStage, field = "life_stage" {
        Adult => "adult",
        Juvenile => "juvenile",
        Chick => "chick",
    }
}

vocabulary! {
    /// Coarse health classification.
    HealthMetric, field = "health_metrics" {
        Healthy => "healthy",
        Overweight => "overweight",
        Underweight => "underweight",
    }
}

vocabulary! {
    /// A numeric measurement column that charts can plot.
    NumericField, field = "numeric_field" {
        BillLengthMm => "bill_length_mm",
        BillDepthMm => "bill_depth_mm",
        FlipperLengthMm => "flipper_length_mm",
        BodyMassG => "body_mass_g",
    }
}

impl NumericField {
    /// Looks up a field by its exact column name.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.as_str() == key)
    }

    /// Human-readable label, e.g. `Bill Length Mm`.
    pub fn label(&self) -> String {
        field_label(self.as_str())
    }
}

/// Years present in the dataset, ascending.
pub const YEARS: [i32; 5] = [2021, 2022, 2023, 2024, 2025];

/// First year covered by the dataset.
pub const MIN_YEAR: i32 = YEARS[0];

/// Last year covered by the dataset.
pub const MAX_YEAR: i32 = YEARS[YEARS.len() - 1];

/// Turns a snake_case column name into a title-cased label.
pub fn field_label(field: &str) -> String {
    field
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
