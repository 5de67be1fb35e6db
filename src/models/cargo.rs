use std::fmt;

use serde::{Deserialize, Serialize};

/// Representative cargo figures for a request: metres and kilograms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Cargo {
    pub weight: f64,
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl Cargo {
    pub fn new(length: f64, width: f64, height: f64, weight: f64) -> Self {
        Self {
            weight,
            length,
            width,
            height,
        }
    }

    pub fn volume(&self) -> f64 {
        self.length * self.width * self.height
    }

    /// Names of the fields that are not finite, strictly positive numbers.
    pub fn non_positive_fields(&self) -> Vec<&'static str> {
        [
            ("weight", self.weight),
            ("length", self.length),
            ("width", self.width),
            ("height", self.height),
        ]
        .into_iter()
        .filter(|(_, value)| !(value.is_finite() && *value > 0.0))
        .map(|(name, _)| name)
        .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CargoMetric {
    Weight,
    Volume,
    Length,
    Width,
    Height,
}

impl CargoMetric {
    pub fn unit(&self) -> &'static str {
        match self {
            CargoMetric::Weight => "kg",
            CargoMetric::Volume => "m3",
            CargoMetric::Length | CargoMetric::Width | CargoMetric::Height => "m",
        }
    }
}

impl fmt::Display for CargoMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CargoMetric::Weight => "weight",
            CargoMetric::Volume => "volume",
            CargoMetric::Length => "length",
            CargoMetric::Width => "width",
            CargoMetric::Height => "height",
        };
        f.write_str(name)
    }
}

/// Cargo exceeding one cap of a specific service offering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintViolation {
    pub service_id: u32,
    pub service_name: String,
    pub metric: CargoMetric,
    pub actual: f64,
    pub limit: f64,
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cargo {} {} {} exceeds the {} limit of {} {}",
            self.metric,
            self.actual,
            self.metric.unit(),
            self.service_name,
            self.limit,
            self.metric.unit()
        )
    }
}
