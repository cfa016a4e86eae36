use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// A priced-transport request as received from the calling application.
///
/// Immutable once created; every downstream component borrows it read-only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub route: RequestedRoute,
    pub cargo: CargoDetails,
    pub service: ServicePreferences,
    /// Free-form client reference carried through to the final quote.
    pub client_reference: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RequestedRoute {
    pub origin: String,
    pub destination: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CargoDetails {
    pub cargo_type: CargoType,
    pub weight_kg: f64,
    pub volume_m3: Option<f64>,
    pub hazardous: bool,
}

/// Cargo categories carried by the pricing model. Each maps to a distinct
/// per-kilometer market rate in the simulated sources.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CargoType {
    Forestry,
    Chemical,
    Refrigerated,
    Machinery,
    General,
}

impl CargoType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Forestry => "timber and forestry products",
            Self::Chemical => "chemical products",
            Self::Refrigerated => "refrigerated goods",
            Self::Machinery => "industrial machinery",
            Self::General => "general cargo",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ServicePreferences {
    pub pickup_date: Option<NaiveDate>,
    pub delivery_date: Option<NaiveDate>,
    pub additional_services: Vec<String>,
}

impl QuoteRequest {
    /// Reject fundamentally unusable requests before any component runs.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.route.origin.trim().is_empty() {
            return Err(ValidationError::MissingOrigin);
        }
        if self.route.destination.trim().is_empty() {
            return Err(ValidationError::MissingDestination);
        }
        if !(self.cargo.weight_kg > 0.0) {
            return Err(ValidationError::NonPositiveWeight { weight_kg: self.cargo.weight_kg });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{CargoDetails, CargoType, QuoteRequest, RequestedRoute, ServicePreferences};
    use crate::errors::ValidationError;

    fn request(origin: &str, destination: &str, weight_kg: f64) -> QuoteRequest {
        QuoteRequest {
            route: RequestedRoute {
                origin: origin.to_string(),
                destination: destination.to_string(),
            },
            cargo: CargoDetails {
                cargo_type: CargoType::General,
                weight_kg,
                volume_m3: Some(40.0),
                hazardous: false,
            },
            service: ServicePreferences::default(),
            client_reference: None,
        }
    }

    #[test]
    fn complete_request_passes_validation() {
        assert_eq!(request("Madrid", "Paris", 15_000.0).validate(), Ok(()));
    }

    #[test]
    fn blank_origin_is_rejected() {
        assert_eq!(
            request("  ", "Paris", 15_000.0).validate(),
            Err(ValidationError::MissingOrigin)
        );
    }

    #[test]
    fn blank_destination_is_rejected() {
        assert_eq!(
            request("Madrid", "", 15_000.0).validate(),
            Err(ValidationError::MissingDestination)
        );
    }

    #[test]
    fn non_positive_weight_is_rejected() {
        assert_eq!(
            request("Madrid", "Paris", 0.0).validate(),
            Err(ValidationError::NonPositiveWeight { weight_kg: 0.0 })
        );
        assert!(request("Madrid", "Paris", f64::NAN).validate().is_err());
    }
}
