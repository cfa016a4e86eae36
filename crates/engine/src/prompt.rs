//! Prompt construction for the reasoning service.
//!
//! The arbitration prompt summarizes the collected offers, the verified
//! route, and the detected restrictions, then pins the expected answer shape
//! with a labeled-field template so the extractor has stable anchors to scan
//! for.

use std::fmt::Write;

use freightwise_core::{CargoDetails, Offer, QuoteRequest, RestrictionAlert, RouteFacts};

pub fn build_arbitration_prompt(
    request: &QuoteRequest,
    offers: &[Offer],
    route: &RouteFacts,
    restrictions: &[RestrictionAlert],
) -> String {
    let mut prompt = String::with_capacity(2048);

    prompt.push_str(
        "As an expert in European road freight market analysis, evaluate these \
         carrier offers and recommend a single priced option.\n\n",
    );

    let _ = writeln!(prompt, "TRANSPORT REQUEST:");
    let _ = writeln!(
        prompt,
        "- Route: {} -> {} ({}km, {} transit days)",
        route.origin, route.destination, route.distance_km, route.transit_days
    );
    let _ = writeln!(
        prompt,
        "- Cargo: {}kg of {}{}",
        request.cargo.weight_kg,
        request.cargo.cargo_type.label(),
        if request.cargo.hazardous { " (hazardous, ADR)" } else { "" }
    );
    if let Some(volume) = request.cargo.volume_m3 {
        let _ = writeln!(prompt, "- Volume: {volume}m3");
    }
    if let Some(pickup) = request.service.pickup_date {
        let _ = writeln!(prompt, "- Pickup date: {pickup}");
    }
    if !request.service.additional_services.is_empty() {
        let _ = writeln!(
            prompt,
            "- Additional services: {}",
            request.service.additional_services.join(", ")
        );
    }

    prompt.push_str("\nOFFERS RECEIVED:\n");
    if offers.is_empty() {
        prompt.push_str("- none\n");
    }
    for offer in offers {
        let _ = writeln!(prompt, "SOURCE: {}", offer.source.to_uppercase());
        let _ = writeln!(prompt, "- Offered price (all inclusive): {}", offer.price);
        let _ = writeln!(prompt, "- Source confidence: {}%", offer.confidence.unwrap_or(85));
        if let Some(level) = &offer.metadata.service_level {
            let _ = writeln!(prompt, "- Service level: {level}");
        }
        if let Some(carriers) = offer.metadata.available_carriers {
            let _ = writeln!(prompt, "- Available carriers: {carriers}");
        }
    }

    prompt.push_str("\nVERIFIED ROUTE:\n");
    let _ = writeln!(prompt, "- Distance: {}km", route.distance_km);
    let _ = writeln!(prompt, "- Estimated duration: {} hours", route.duration_hours);
    let _ = writeln!(prompt, "- Transit countries: {}", route.jurisdictions.join(" -> "));
    if !route.main_highways.is_empty() {
        let _ = writeln!(prompt, "- Main highways: {}", route.main_highways.join(", "));
    }
    let _ = writeln!(prompt, "- Complexity: {}", route.complexity.label());
    for risk in &route.risk_factors {
        let _ = writeln!(prompt, "- Risk factor ({}): {}", risk.severity.label(), risk.description);
    }

    prompt.push_str("\nDETECTED RESTRICTIONS:\n");
    if restrictions.is_empty() {
        prompt.push_str("- no critical restrictions detected\n");
    }
    for alert in restrictions {
        let _ = writeln!(prompt, "- [{}] {}", alert.severity.label(), alert.message);
    }

    prompt.push_str(
        "\nConsider the reasonable price range for this corridor and cargo, \
         suspiciously low offers, premium pricing justified by restrictions, and \
         the target intermediary margin of 15-25% over carrier cost.\n\
         \n\
         Analyze step by step and finish with exactly these labeled lines:\n\
         RECOMMENDED_SOURCE: [source identifier]\n\
         BASE_PRICE: [amount]\n\
         MARGIN_PCT: [percent]%\n\
         FINAL_PRICE: [amount]\n\
         CONFIDENCE_PCT: [percent]%\n\
         SERVICE_LEVEL: [Economy/Standard/Express/Premium]\n\
         RESTRICTIONS_IMPACT: [Low/Medium/High]\n\
         CRITICAL_ALERTS: [list of important alerts]\n\
         SPECIAL_RECOMMENDATIONS: [actions required by detected restrictions]\n\
         JUSTIFICATION: [full explanation]\n",
    );

    prompt
}

pub fn build_restrictions_prompt(
    route: &RouteFacts,
    pickup_date: Option<chrono::NaiveDate>,
    cargo: &CargoDetails,
) -> String {
    let mut prompt = String::with_capacity(512);

    prompt.push_str("Analyze road-transport restrictions for this specific route:\n\n");
    let _ = writeln!(prompt, "ROUTE: {} -> {}", route.origin, route.destination);
    let _ = writeln!(prompt, "DISTANCE: {}km", route.distance_km);
    let _ = writeln!(prompt, "TRANSIT COUNTRIES: {}", route.jurisdictions.join(" -> "));
    match pickup_date {
        Some(date) => {
            let _ = writeln!(prompt, "DEPARTURE DATE: {date}");
        }
        None => prompt.push_str("DEPARTURE DATE: not fixed\n"),
    }
    let _ = writeln!(
        prompt,
        "CARGO: {}kg, {}",
        cargo.weight_kg,
        cargo.cargo_type.label()
    );
    let _ = writeln!(
        prompt,
        "HAZARDOUS GOODS: {}",
        if cargo.hazardous { "YES (ADR)" } else { "NO" }
    );

    let notes: Vec<&str> = route
        .jurisdictions
        .iter()
        .filter_map(|country| weekend_ban_note(country))
        .collect();
    if !notes.is_empty() {
        prompt.push_str("\nKNOWN DRIVING BAN WINDOWS:\n");
        for note in notes {
            let _ = writeln!(prompt, "- {note}");
        }
    }

    prompt.push_str(
        "\nCheck specifically for:\n\
         1. Sunday and public-holiday driving bans in transit countries\n\
         2. Weight and dimension limits on the main highways\n\
         3. Required documentation (CMR, ADR, special permits)\n\
         4. Special tolls or vignettes required\n\
         5. Seasonal or temporary restrictions\n\
         \n\
         Reply ONLY with alerts critical enough to impact the operation, as a \
         list with a criticality level per line.\n",
    );

    prompt
}

/// Standing heavy-vehicle ban windows per transit country, stated in the
/// prompt so the reasoning service reconciles them with the departure date.
fn weekend_ban_note(country: &str) -> Option<&'static str> {
    match country {
        "FR" => Some("FR: heavy vehicles banned Saturday 22:00 to Sunday 22:00"),
        "DE" => Some("DE: heavy vehicles banned Sundays and public holidays 00:00 to 22:00"),
        "AT" => Some("AT: heavy vehicles banned Saturday 15:00 to Sunday 22:00"),
        "IT" => Some("IT: heavy vehicles banned Sundays, extended windows in summer"),
        "PL" => Some("PL: heavy vehicles banned on public holidays 08:00 to 22:00"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use freightwise_core::{
        AlertCategory, AlertSeverity, CargoDetails, CargoType, Offer, OfferMetadata, QuoteRequest,
        RequestedRoute, RestrictionAlert, RouteAdvisor, ServicePreferences,
    };

    use super::{build_arbitration_prompt, build_restrictions_prompt};

    fn request() -> QuoteRequest {
        QuoteRequest {
            route: RequestedRoute {
                origin: "Madrid".to_string(),
                destination: "Paris".to_string(),
            },
            cargo: CargoDetails {
                cargo_type: CargoType::Forestry,
                weight_kg: 18_000.0,
                volume_m3: Some(60.0),
                hazardous: false,
            },
            service: ServicePreferences::default(),
            client_reference: None,
        }
    }

    fn offer(source: &str, price: f64) -> Offer {
        Offer {
            source: source.to_string(),
            source_name: source.to_string(),
            price,
            confidence: Some(90),
            response_time_ms: 420,
            metadata: OfferMetadata::default(),
        }
    }

    #[test]
    fn arbitration_prompt_summarizes_offers_route_and_restrictions() {
        let request = request();
        let route = RouteAdvisor::new().advise("Madrid", "Paris");
        let offers = vec![offer("timocom", 3450.0), offer("sennder", 3180.0)];
        let alerts = vec![RestrictionAlert::new(
            AlertSeverity::High,
            AlertCategory::WeekendBan,
            "Weekend driving restrictions detected on route",
        )];

        let prompt = build_arbitration_prompt(&request, &offers, &route, &alerts);

        assert!(prompt.contains("Madrid -> Paris (1270km"));
        assert!(prompt.contains("SOURCE: TIMOCOM"));
        assert!(prompt.contains("SOURCE: SENNDER"));
        assert!(prompt.contains("[high] Weekend driving restrictions"));
        assert!(prompt.contains("RECOMMENDED_SOURCE:"));
        assert!(prompt.contains("JUSTIFICATION:"));
    }

    #[test]
    fn arbitration_prompt_handles_the_empty_offer_list() {
        let request = request();
        let route = RouteAdvisor::new().advise("Madrid", "Paris");
        let prompt = build_arbitration_prompt(&request, &[], &route, &[]);

        assert!(prompt.contains("OFFERS RECEIVED:\n- none"));
        assert!(prompt.contains("no critical restrictions detected"));
    }

    #[test]
    fn restrictions_prompt_flags_hazardous_cargo() {
        let route = RouteAdvisor::new().advise("Madrid", "Berlin");
        let cargo = CargoDetails {
            cargo_type: CargoType::Chemical,
            weight_kg: 22_000.0,
            volume_m3: None,
            hazardous: true,
        };

        let prompt = build_restrictions_prompt(&route, None, &cargo);

        assert!(prompt.contains("HAZARDOUS GOODS: YES (ADR)"));
        assert!(prompt.contains("ES -> FR -> DE"));
        assert!(prompt.contains("DEPARTURE DATE: not fixed"));
    }
}
