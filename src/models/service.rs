use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A transport type offered to customers (truck, air, rail, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceOffering {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub delivery_days: u32,
    pub max_weight: f64,
    pub max_volume: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl ServiceOffering {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Editable fields of an offering, used for both creation and full updates.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub delivery_days: u32,
    pub max_weight: f64,
    pub max_volume: f64,
}

impl ServiceSpec {
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.name.trim().is_empty() {
            problems.push("name cannot be empty".to_string());
        }
        for (field, value) in [
            ("price", self.price),
            ("max_weight", self.max_weight),
            ("max_volume", self.max_volume),
        ] {
            if !(value.is_finite() && value > 0.0) {
                problems.push(format!("{field} must be greater than 0"));
            }
        }
        problems
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceFilter {
    pub search: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl ServiceFilter {
    pub fn matches(&self, service: &ServiceOffering) -> bool {
        let name_matches = match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => service
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            _ => true,
        };

        name_matches
            && self.min_price.is_none_or(|min| service.price >= min)
            && self.max_price.is_none_or(|max| service.price <= max)
    }
}

/// The offerings every fresh deployment starts with. Ids line up with the
/// transport profile table.
pub fn seed_catalog() -> Vec<ServiceSpec> {
    let spec = |name: &str, description: &str, price, delivery_days, max_weight, max_volume| {
        ServiceSpec {
            name: name.to_string(),
            description: description.to_string(),
            price,
            delivery_days,
            max_weight,
            max_volume,
        }
    };

    vec![
        spec(
            "Truck",
            "Semi-trailer for bulky freight: furniture, building materials and other heavy loads.",
            150.0,
            2,
            20_000.0,
            80.0,
        ),
        spec(
            "Small truck",
            "Light truck for small loads within and between cities, with city-centre access.",
            80.0,
            1,
            3_000.0,
            15.0,
        ),
        spec(
            "Air freight",
            "Fastest delivery for urgent and valuable cargo.",
            500.0,
            1,
            1_000.0,
            5.0,
        ),
        spec(
            "Rail",
            "Rail transport for large consignments; economical for big volumes.",
            120.0,
            3,
            50_000.0,
            120.0,
        ),
        spec(
            "Ship",
            "Sea freight for international and container shipments.",
            200.0,
            7,
            100_000.0,
            500.0,
        ),
        spec(
            "Multimodal",
            "Combined transport over several modes for complex routes.",
            300.0,
            5,
            30_000.0,
            100.0,
        ),
    ]
}
