use serde::Serialize;

use crate::engine::profiles::{profile_for, TransportProfile};
use crate::error::AppError;
use crate::geo::distance_km;
use crate::models::cargo::{Cargo, CargoMetric, ConstraintViolation};
use crate::models::service::ServiceOffering;

const VOLUME_DAY_STEP_M3: f64 = 20.0;
const WEIGHT_DAY_STEP_KG: f64 = 1_000.0;

const VOLUME_SURCHARGE_THRESHOLD_M3: f64 = 10.0;
const VOLUME_SURCHARGE_PER_STEP: f64 = 0.10;
const WEIGHT_SURCHARGE_THRESHOLD_KG: f64 = 500.0;
const WEIGHT_SURCHARGE_PER_STEP: f64 = 0.05;
const AIR_FREIGHT_FACTOR: f64 = 1.2;
const MAX_COMPLEXITY_MULTIPLIER: f64 = 2.0;

/// Quote for moving one cargo with one service offering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimate {
    pub delivery_days: u32,
    pub total_cost: f64,
    pub distance_km: f64,
    pub volume_m3: f64,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violation: Option<ConstraintViolation>,
}

impl Estimate {
    fn rejected(violation: ConstraintViolation) -> Self {
        Self {
            delivery_days: 0,
            total_cost: 0.0,
            distance_km: 0.0,
            volume_m3: 0.0,
            valid: false,
            error_message: Some(violation.to_string()),
            violation: Some(violation),
        }
    }

    /// Turns an invalid estimate into the constraint error it carries.
    pub fn into_result(self) -> Result<Self, AppError> {
        match self.violation {
            Some(violation) => Err(AppError::Constraint(violation)),
            None => Ok(self),
        }
    }
}

/// Rejects cargo with missing, zero, negative or non-finite measurements.
pub fn validate_cargo(cargo: &Cargo) -> Result<(), AppError> {
    let bad = cargo.non_positive_fields();
    if bad.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "{} must be greater than 0",
            bad.join(", ")
        )))
    }
}

pub fn estimate_delivery(
    service: &ServiceOffering,
    from_city: &str,
    to_city: &str,
    cargo: &Cargo,
) -> Estimate {
    let profile = profile_for(service.id);

    if let Some(violation) = check_constraints(service, profile, cargo) {
        return Estimate::rejected(violation);
    }

    let volume = cargo.volume();
    let distance = distance_km(from_city, to_city);

    Estimate {
        delivery_days: delivery_days(service, profile, distance, volume, cargo.weight),
        total_cost: delivery_cost(service, profile, distance, volume, cargo.weight),
        distance_km: distance,
        volume_m3: volume,
        valid: true,
        error_message: None,
        violation: None,
    }
}

fn check_constraints(
    service: &ServiceOffering,
    profile: &TransportProfile,
    cargo: &Cargo,
) -> Option<ConstraintViolation> {
    let checks = [
        (CargoMetric::Weight, cargo.weight, service.max_weight),
        (CargoMetric::Volume, cargo.volume(), service.max_volume),
        (CargoMetric::Length, cargo.length, profile.max_length),
        (CargoMetric::Width, cargo.width, profile.max_width),
        (CargoMetric::Height, cargo.height, profile.max_height),
    ];

    checks
        .into_iter()
        .find(|(_, actual, limit)| actual > limit)
        .map(|(metric, actual, limit)| ConstraintViolation {
            service_id: service.id,
            service_name: service.name.clone(),
            metric,
            actual,
            limit,
        })
}

fn delivery_days(
    service: &ServiceOffering,
    profile: &TransportProfile,
    distance: f64,
    volume: f64,
    weight: f64,
) -> u32 {
    let travel_days = (distance / profile.distance_per_day).ceil() as u32;
    let total = service
        .delivery_days
        .saturating_add(travel_days)
        .saturating_add(complexity_days(profile, volume, weight));
    total.max(profile.min_days)
}

fn complexity_days(profile: &TransportProfile, volume: f64, weight: f64) -> u32 {
    let mut volume_days = if volume > VOLUME_DAY_STEP_M3 {
        (volume / VOLUME_DAY_STEP_M3).floor() as u32
    } else {
        0
    };
    let mut weight_days = if weight > WEIGHT_DAY_STEP_KG {
        (weight / WEIGHT_DAY_STEP_KG).floor() as u32
    } else {
        0
    };

    if profile.air_freight {
        volume_days /= 2;
        weight_days /= 2;
    }

    volume_days.saturating_add(weight_days)
}

fn delivery_cost(
    service: &ServiceOffering,
    profile: &TransportProfile,
    distance: f64,
    volume: f64,
    weight: f64,
) -> f64 {
    let base = service.price;
    let raw = base
        + distance * profile.distance_rate
        + weight * profile.weight_rate
        + volume * profile.volume_rate;

    let total = (raw * complexity_multiplier(profile, volume, weight)).max(base);
    round_cents(total)
}

pub(crate) fn complexity_multiplier(profile: &TransportProfile, volume: f64, weight: f64) -> f64 {
    let mut multiplier = 1.0;

    if volume > VOLUME_SURCHARGE_THRESHOLD_M3 {
        multiplier += (volume / VOLUME_SURCHARGE_THRESHOLD_M3) * VOLUME_SURCHARGE_PER_STEP;
    }
    if weight > WEIGHT_SURCHARGE_THRESHOLD_KG {
        multiplier += (weight / WEIGHT_SURCHARGE_THRESHOLD_KG) * WEIGHT_SURCHARGE_PER_STEP;
    }
    if profile.air_freight {
        multiplier *= AIR_FREIGHT_FACTOR;
    }

    multiplier.min(MAX_COMPLEXITY_MULTIPLIER)
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
