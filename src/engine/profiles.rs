/// Per-transport-type coefficients used by the delivery calculator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransportProfile {
    /// Kilometres covered per day.
    pub distance_per_day: f64,
    /// Cost per kilometre.
    pub distance_rate: f64,
    /// Cost per kilogram.
    pub weight_rate: f64,
    /// Cost per cubic metre.
    pub volume_rate: f64,
    pub min_days: u32,
    pub max_length: f64,
    pub max_width: f64,
    pub max_height: f64,
    /// Air freight halves complexity days and inflates the cost multiplier.
    pub air_freight: bool,
}

/// Small-truck figures, used for any offering without its own entry.
pub const DEFAULT_PROFILE: TransportProfile = TransportProfile {
    distance_per_day: 600.0,
    distance_rate: 12.0,
    weight_rate: 2.0,
    volume_rate: 50.0,
    min_days: 1,
    max_length: 6.0,
    max_width: 2.0,
    max_height: 2.2,
    air_freight: false,
};

const PROFILES: &[(u32, TransportProfile)] = &[
    // truck
    (
        1,
        TransportProfile {
            distance_per_day: 800.0,
            distance_rate: 15.0,
            weight_rate: 2.0,
            volume_rate: 50.0,
            min_days: 1,
            max_length: 13.6,
            max_width: 2.5,
            max_height: 2.7,
            air_freight: false,
        },
    ),
    // small truck
    (
        2,
        TransportProfile {
            distance_per_day: 600.0,
            distance_rate: 12.0,
            weight_rate: 3.0,
            volume_rate: 60.0,
            min_days: 1,
            max_length: 6.0,
            max_width: 2.0,
            max_height: 2.2,
            air_freight: false,
        },
    ),
    // air
    (
        3,
        TransportProfile {
            distance_per_day: 2000.0,
            distance_rate: 25.0,
            weight_rate: 8.0,
            volume_rate: 200.0,
            min_days: 1,
            max_length: 3.0,
            max_width: 1.5,
            max_height: 1.5,
            air_freight: true,
        },
    ),
    // rail
    (
        4,
        TransportProfile {
            distance_per_day: 1200.0,
            distance_rate: 8.0,
            weight_rate: 1.0,
            volume_rate: 30.0,
            min_days: 2,
            max_length: 20.0,
            max_width: 3.0,
            max_height: 3.0,
            air_freight: false,
        },
    ),
    // ship
    (
        5,
        TransportProfile {
            distance_per_day: 500.0,
            distance_rate: 5.0,
            weight_rate: 0.5,
            volume_rate: 20.0,
            min_days: 3,
            max_length: 40.0,
            max_width: 8.0,
            max_height: 8.0,
            air_freight: false,
        },
    ),
    // multimodal
    (
        6,
        TransportProfile {
            distance_per_day: 700.0,
            distance_rate: 18.0,
            weight_rate: 2.5,
            volume_rate: 80.0,
            min_days: 2,
            max_length: 13.6,
            max_width: 2.5,
            max_height: 2.7,
            air_freight: false,
        },
    ),
];

pub fn profile_for(service_id: u32) -> &'static TransportProfile {
    PROFILES
        .iter()
        .find(|(id, _)| *id == service_id)
        .map(|(_, profile)| profile)
        .unwrap_or(&DEFAULT_PROFILE)
}

#[cfg(test)]
mod tests {
    use super::{profile_for, DEFAULT_PROFILE, PROFILES};
    use crate::models::service::seed_catalog;

    #[test]
    fn every_seeded_offering_has_a_profile() {
        let seeded = seed_catalog().len() as u32;
        for id in 1..=seeded {
            assert!(
                PROFILES.iter().any(|(profile_id, _)| *profile_id == id),
                "missing profile for service {id}"
            );
        }
    }

    #[test]
    fn unknown_id_falls_back_to_small_truck() {
        assert_eq!(*profile_for(0), DEFAULT_PROFILE);
        assert_eq!(*profile_for(42), DEFAULT_PROFILE);
        assert_eq!(profile_for(2).max_length, DEFAULT_PROFILE.max_length);
    }

    #[test]
    fn only_air_is_flagged_as_air_freight() {
        let air: Vec<u32> = PROFILES
            .iter()
            .filter(|(_, profile)| profile.air_freight)
            .map(|(id, _)| *id)
            .collect();
        assert_eq!(air, vec![3]);
    }

    #[test]
    fn rates_are_positive() {
        for (id, profile) in PROFILES {
            assert!(profile.distance_per_day > 0.0, "service {id}");
            assert!(profile.min_days >= 1, "service {id}");
        }
    }
}
