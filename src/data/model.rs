//! Record types for the penguin dataset.
//!
//! [`RawRecord`] mirrors one object of the ingested JSON asset (or one CSV
//! row) exactly as found. [`Record`] is the canonical typed shape the rest
//! of the crate works with; `None` in a `Record` means the value is absent,
//! which is distinct from a measured zero or an empty string.

use serde::{Deserialize, Serialize};

use super::vocab::{Diet, HealthMetric, Island, LifeStage, NumericField, Sex, Species};

/// One dataset row before normalization.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub species: Option<String>,
    #[serde(default)]
    pub island: Option<String>,
    #[serde(default)]
    pub bill_length_mm: Option<f64>,
    #[serde(default)]
    pub bill_depth_mm: Option<f64>,
    #[serde(default)]
    pub flipper_length_mm: Option<f64>,
    #[serde(default)]
    pub body_mass_g: Option<f64>,
    #[serde(default)]
    pub sex: Option<String>,
    #[serde(default)]
    pub diet: Option<String>,
    #[serde(default)]
    pub life_stage: Option<String>,
    #[serde(default)]
    pub health_metrics: Option<String>,
    #[serde(default)]
    pub year: Option<f64>,
}

/// One canonical dataset row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub species: Species,
    pub island: Island,
    pub bill_length_mm: Option<f64>,
    pub bill_depth_mm: Option<f64>,
    pub flipper_length_mm: Option<f64>,
    pub body_mass_g: Option<f64>,
    pub sex: Option<Sex>,
    pub year: i32,
    pub diet: Option<Diet>,
    pub life_stage: Option<LifeStage>,
    pub health_metrics: Option<HealthMetric>,
}

impl Record {
    /// Creates a record with every optional field absent.
    pub fn new(species: Species, island: Island, year: i32) -> Self {
        Self {
            species,
            island,
            bill_length_mm: None,
            bill_depth_mm: None,
            flipper_length_mm: None,
            body_mass_g: None,
            sex: None,
            year,
            diet: None,
            life_stage: None,
            health_metrics: None,
        }
    }

    /// Reads a numeric measurement.
    pub fn measurement(&self, field: NumericField) -> Option<f64> {
        match field {
            NumericField::BillLengthMm => self.bill_length_mm,
            NumericField::BillDepthMm => self.bill_depth_mm,
            NumericField::FlipperLengthMm => self.flipper_length_mm,
            NumericField::BodyMassG => self.body_mass_g,
        }
    }

    /// Sets a numeric measurement.
    pub fn with_measurement(mut self, field: NumericField, value: f64) -> Self {
        let slot = match field {
            NumericField::BillLengthMm => &mut self.bill_length_mm,
            NumericField::BillDepthMm => &mut self.bill_depth_mm,
            NumericField::FlipperLengthMm => &mut self.flipper_length_mm,
            NumericField::BodyMassG => &mut self.body_mass_g,
        };
        *slot = Some(value);
        self
    }

    pub fn with_sex(mut self, sex: Sex) -> Self {
        self.sex = Some(sex);
        self
    }

    pub fn with_diet(mut self, diet: Diet) -> Self {
        self.diet = Some(diet);
        self
    }

    pub fn with_life_stage(mut self, life_stage: LifeStage) -> Self {
        self.life_stage = Some(life_stage);
        self
    }

    pub fn with_health_metric(mut self, health: HealthMetric) -> Self {
        self.health_metrics = Some(health);
        self
    }
}
