//! Corridor knowledge base and geometric route estimation.
//!
//! Lookup order: exact corridor match (tried in both directions), geometric
//! estimation from the city gazetteer, and finally a conservative hard-coded
//! fallback when either endpoint is unknown. Resolution never fails; the
//! quality of the answer is flagged instead (`is_estimated` / `is_fallback`).

use tracing::debug;

use crate::domain::restriction::AlertSeverity;
use crate::domain::route::{RiskFactor, RiskKind, RouteComplexity, RouteFacts};

/// Great-circle distance multiplied by this factor approximates real road
/// distance across the European network (empirical).
const ROAD_CORRECTION_FACTOR: f64 = 1.25;
/// Distance a long-haul truck covers per driving day.
const DAILY_DISTANCE_KM: f64 = 650.0;
/// Average long-haul speed used to derive duration from distance.
const AVERAGE_SPEED_KMH: f64 = 65.0;

const EARTH_RADIUS_KM: f64 = 6371.0;

struct Corridor {
    endpoints: (&'static str, &'static str),
    distance_km: u32,
    duration_hours: u32,
    jurisdictions: &'static [&'static str],
    main_highways: &'static [&'static str],
    border_crossings: &'static [&'static str],
    transit_days: u32,
}

/// Verified corridors for the lanes the business actually runs. Everything
/// else goes through geometric estimation.
const CORRIDORS: &[Corridor] = &[
    Corridor {
        endpoints: ("Madrid", "Paris"),
        distance_km: 1270,
        duration_hours: 18,
        jurisdictions: &["ES", "FR"],
        main_highways: &["AP-2", "A-9", "A-6"],
        border_crossings: &["La Jonquera"],
        transit_days: 2,
    },
    Corridor {
        endpoints: ("Barcelona", "Paris"),
        distance_km: 833,
        duration_hours: 12,
        jurisdictions: &["ES", "FR"],
        main_highways: &["AP-2", "A-9"],
        border_crossings: &["La Jonquera"],
        transit_days: 2,
    },
    Corridor {
        endpoints: ("Valencia", "Rome"),
        distance_km: 1245,
        duration_hours: 17,
        jurisdictions: &["ES", "FR", "IT"],
        main_highways: &["AP-7", "A-8", "A-12"],
        border_crossings: &["La Jonquera", "Ventimiglia"],
        transit_days: 2,
    },
    Corridor {
        endpoints: ("Barcelona", "Milan"),
        distance_km: 725,
        duration_hours: 11,
        jurisdictions: &["ES", "FR", "IT"],
        main_highways: &["AP-2", "A-8", "A-4"],
        border_crossings: &["La Jonquera", "Ventimiglia"],
        transit_days: 2,
    },
    Corridor {
        endpoints: ("Madrid", "Berlin"),
        distance_km: 1870,
        duration_hours: 26,
        jurisdictions: &["ES", "FR", "DE"],
        main_highways: &["AP-2", "A-6", "A-4"],
        border_crossings: &["La Jonquera", "Kehl"],
        transit_days: 3,
    },
    Corridor {
        endpoints: ("Barcelona", "Munich"),
        distance_km: 1050,
        duration_hours: 15,
        jurisdictions: &["ES", "FR", "DE"],
        main_highways: &["AP-2", "A-6", "A-8"],
        border_crossings: &["La Jonquera", "Kehl"],
        transit_days: 2,
    },
    Corridor {
        endpoints: ("Madrid", "Warsaw"),
        distance_km: 2447,
        duration_hours: 34,
        jurisdictions: &["ES", "FR", "DE", "PL"],
        main_highways: &["AP-2", "A-6", "A-4", "A-2"],
        border_crossings: &["La Jonquera", "Kehl", "Frankfurt Oder"],
        transit_days: 4,
    },
    Corridor {
        endpoints: ("Madrid", "Barcelona"),
        distance_km: 625,
        duration_hours: 9,
        jurisdictions: &["ES"],
        main_highways: &["AP-2"],
        border_crossings: &[],
        transit_days: 1,
    },
    Corridor {
        endpoints: ("Madrid", "Valencia"),
        distance_km: 355,
        duration_hours: 5,
        jurisdictions: &["ES"],
        main_highways: &["A-3"],
        border_crossings: &[],
        transit_days: 1,
    },
];

/// (city, latitude, longitude, country) for geometric estimation.
const GAZETTEER: &[(&str, f64, f64, &str)] = &[
    ("Madrid", 40.4168, -3.7038, "ES"),
    ("Barcelona", 41.3851, 2.1734, "ES"),
    ("Valencia", 39.4699, -0.3763, "ES"),
    ("Seville", 37.3886, -5.9823, "ES"),
    ("Paris", 48.8566, 2.3522, "FR"),
    ("Lyon", 45.7640, 4.8357, "FR"),
    ("Milan", 45.4642, 9.1900, "IT"),
    ("Rome", 41.9028, 12.4964, "IT"),
    ("Berlin", 52.5200, 13.4050, "DE"),
    ("Munich", 48.1351, 11.5820, "DE"),
    ("Warsaw", 52.2297, 21.0122, "PL"),
];

/// Resolves distance, transit time, transited jurisdictions, and a
/// complexity/risk classification for an origin/destination pair.
#[derive(Clone, Debug, Default)]
pub struct RouteAdvisor;

impl RouteAdvisor {
    pub fn new() -> Self {
        Self
    }

    pub fn advise(&self, origin: &str, destination: &str) -> RouteFacts {
        let mut facts = self
            .corridor_facts(origin, destination)
            .or_else(|| self.estimated_facts(origin, destination))
            .unwrap_or_else(|| fallback_facts(origin, destination));

        facts.complexity = classify_complexity(&facts);
        facts.risk_factors = identify_risk_factors(&facts);

        debug!(
            event_name = "route.resolved",
            origin,
            destination,
            distance_km = facts.distance_km,
            transit_days = facts.transit_days,
            complexity = facts.complexity.label(),
            estimated = facts.is_estimated,
            fallback = facts.is_fallback,
            "route facts resolved"
        );

        facts
    }

    fn corridor_facts(&self, origin: &str, destination: &str) -> Option<RouteFacts> {
        let corridor = CORRIDORS.iter().find(|corridor| {
            let (a, b) = corridor.endpoints;
            (city_eq(a, origin) && city_eq(b, destination))
                || (city_eq(b, origin) && city_eq(a, destination))
        })?;

        Some(RouteFacts {
            origin: origin.trim().to_string(),
            destination: destination.trim().to_string(),
            distance_km: corridor.distance_km,
            duration_hours: corridor.duration_hours,
            jurisdictions: to_owned_list(corridor.jurisdictions),
            main_highways: to_owned_list(corridor.main_highways),
            border_crossings: to_owned_list(corridor.border_crossings),
            transit_days: corridor.transit_days,
            complexity: RouteComplexity::Low,
            risk_factors: Vec::new(),
            is_estimated: false,
            is_fallback: false,
        })
    }

    fn estimated_facts(&self, origin: &str, destination: &str) -> Option<RouteFacts> {
        let (origin_lat, origin_lon, origin_country) = gazetteer_entry(origin)?;
        let (dest_lat, dest_lon, dest_country) = gazetteer_entry(destination)?;

        let great_circle = haversine_km(origin_lat, origin_lon, dest_lat, dest_lon);
        let distance_km = (great_circle * ROAD_CORRECTION_FACTOR).round() as u32;

        Some(RouteFacts {
            origin: origin.trim().to_string(),
            destination: destination.trim().to_string(),
            distance_km,
            duration_hours: (f64::from(distance_km) / AVERAGE_SPEED_KMH).round() as u32,
            jurisdictions: estimate_jurisdictions(origin_country, dest_country),
            main_highways: Vec::new(),
            border_crossings: Vec::new(),
            transit_days: (f64::from(distance_km) / DAILY_DISTANCE_KM).ceil().max(1.0) as u32,
            complexity: RouteComplexity::Low,
            risk_factors: Vec::new(),
            is_estimated: true,
            is_fallback: false,
        })
    }
}

/// Conservative route used when either city is unknown to the gazetteer. A
/// plausible mid-length cross-border lane rather than an error.
fn fallback_facts(origin: &str, destination: &str) -> RouteFacts {
    RouteFacts {
        origin: origin.trim().to_string(),
        destination: destination.trim().to_string(),
        distance_km: 1200,
        duration_hours: 18,
        jurisdictions: vec!["ES".to_string(), "FR".to_string()],
        main_highways: Vec::new(),
        border_crossings: Vec::new(),
        transit_days: 2,
        complexity: RouteComplexity::Low,
        risk_factors: Vec::new(),
        is_estimated: true,
        is_fallback: true,
    }
}

fn classify_complexity(facts: &RouteFacts) -> RouteComplexity {
    let jurisdictions = facts.jurisdictions.len();
    if jurisdictions >= 4 || facts.distance_km > 2000 {
        RouteComplexity::High
    } else if jurisdictions >= 3 || facts.distance_km > 1000 || facts.border_crossings.len() >= 2 {
        RouteComplexity::Medium
    } else {
        RouteComplexity::Low
    }
}

fn identify_risk_factors(facts: &RouteFacts) -> Vec<RiskFactor> {
    let mut risks = Vec::new();

    if facts.jurisdictions.len() >= 3 {
        risks.push(RiskFactor {
            kind: RiskKind::MultipleBorders,
            severity: AlertSeverity::Medium,
            description: "Multiple border crossings, complete CMR documentation is critical"
                .to_string(),
        });
    }
    if facts.distance_km > 2000 {
        risks.push(RiskFactor {
            kind: RiskKind::LongDistance,
            severity: AlertSeverity::Medium,
            description: "Long-distance lane, increased exposure to delays".to_string(),
        });
    }
    if facts.jurisdictions.iter().any(|country| country == "DE" || country == "PL") {
        risks.push(RiskFactor {
            kind: RiskKind::EasternCorridor,
            severity: AlertSeverity::Low,
            description: "Eastern corridor transit, country-specific tolling applies".to_string(),
        });
    }

    risks
}

fn estimate_jurisdictions(origin_country: &str, dest_country: &str) -> Vec<String> {
    if origin_country == dest_country {
        return vec![origin_country.to_string()];
    }

    // Transit chains for the lanes this gazetteer covers, tried in both
    // directions so a reversed pair yields the reversed chain.
    const TRANSIT_CHAINS: &[(&str, &str, &[&str])] = &[
        ("ES", "FR", &["ES", "FR"]),
        ("ES", "IT", &["ES", "FR", "IT"]),
        ("ES", "DE", &["ES", "FR", "DE"]),
        ("ES", "PL", &["ES", "FR", "DE", "PL"]),
        ("FR", "IT", &["FR", "IT"]),
        ("FR", "DE", &["FR", "DE"]),
        ("FR", "PL", &["FR", "DE", "PL"]),
        ("IT", "DE", &["IT", "DE"]),
        ("DE", "PL", &["DE", "PL"]),
    ];

    for (from, to, chain) in TRANSIT_CHAINS {
        if *from == origin_country && *to == dest_country {
            return to_owned_list(chain);
        }
        if *to == origin_country && *from == dest_country {
            let mut reversed = to_owned_list(chain);
            reversed.reverse();
            return reversed;
        }
    }

    vec![origin_country.to_string(), dest_country.to_string()]
}

fn gazetteer_entry(city: &str) -> Option<(f64, f64, &'static str)> {
    GAZETTEER
        .iter()
        .find(|(name, _, _, _)| city_eq(name, city))
        .map(|(_, lat, lon, country)| (*lat, *lon, *country))
}

fn city_eq(known: &str, requested: &str) -> bool {
    known.eq_ignore_ascii_case(requested.trim())
}

fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_string()).collect()
}
