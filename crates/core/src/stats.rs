//! Price statistics over a set of offers: median-deviation outlier
//! detection, confidence-weighted averaging, and range summaries.
//!
//! All functions are pure over the offer slice. Outlier diagnostics are
//! informational and never change which offer gets recommended.

use crate::domain::analysis::{OutlierDirection, OutlierRisk, PriceOutlier, PriceRange};
use crate::domain::offer::Offer;

/// Offers below this count carry too little signal for median analysis.
const MIN_OFFERS_FOR_OUTLIERS: usize = 3;
/// Relative deviation from the median above which an offer is flagged.
const OUTLIER_DEVIATION_THRESHOLD: f64 = 0.25;
/// Relative deviation above which a flagged outlier is elevated risk.
const OUTLIER_HIGH_RISK_THRESHOLD: f64 = 0.5;
/// Weight applied to offers that assert no confidence value.
pub const DEFAULT_CONFIDENCE_WEIGHT: u8 = 85;

/// Flag offers whose price deviates from the median by more than 25%.
/// Requires at least three offers; returns an empty list otherwise.
pub fn detect_outliers(offers: &[Offer]) -> Vec<PriceOutlier> {
    if offers.len() < MIN_OFFERS_FOR_OUTLIERS {
        return Vec::new();
    }

    let mut sorted: Vec<f64> = offers.iter().map(|offer| offer.price).collect();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let median = sorted[sorted.len() / 2];
    if median <= 0.0 {
        return Vec::new();
    }

    offers
        .iter()
        .filter_map(|offer| {
            let deviation = (offer.price - median).abs() / median;
            if deviation <= OUTLIER_DEVIATION_THRESHOLD {
                return None;
            }
            Some(PriceOutlier {
                source: offer.source.clone(),
                price: offer.price,
                deviation_pct: (deviation * 100.0).round() as u32,
                direction: if offer.price > median {
                    OutlierDirection::High
                } else {
                    OutlierDirection::Low
                },
                risk: if deviation > OUTLIER_HIGH_RISK_THRESHOLD {
                    OutlierRisk::High
                } else {
                    OutlierRisk::Medium
                },
            })
        })
        .collect()
}

/// Confidence-weighted average of offer prices, rounded to a whole amount.
/// Offers without a confidence value weigh in at [`DEFAULT_CONFIDENCE_WEIGHT`].
/// Returns `None` for an empty offer list.
pub fn weighted_average_price(offers: &[Offer]) -> Option<f64> {
    if offers.is_empty() {
        return None;
    }

    let mut weight_total = 0.0;
    let mut weighted_sum = 0.0;
    for offer in offers {
        let weight = f64::from(offer.confidence.unwrap_or(DEFAULT_CONFIDENCE_WEIGHT));
        weight_total += weight;
        weighted_sum += offer.price * weight;
    }

    Some((weighted_sum / weight_total).round())
}

/// Min/max/average summary across the offer list. Average is the plain
/// (unweighted) mean, rounded.
pub fn price_range(offers: &[Offer]) -> Option<PriceRange> {
    if offers.is_empty() {
        return None;
    }

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    for offer in offers {
        min = min.min(offer.price);
        max = max.max(offer.price);
        sum += offer.price;
    }

    Some(PriceRange { min, max, average: (sum / offers.len() as f64).round() })
}

/// The offer with the highest asserted confidence, first-seen order breaking
/// ties. Missing confidence ranks as zero here (unlike price weighting).
pub fn highest_confidence_offer(offers: &[Offer]) -> Option<&Offer> {
    let mut best: Option<&Offer> = None;
    for offer in offers {
        let is_better = match best {
            Some(current) => offer.confidence.unwrap_or(0) > current.confidence.unwrap_or(0),
            None => true,
        };
        if is_better {
            best = Some(offer);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::{
        detect_outliers, highest_confidence_offer, price_range, weighted_average_price,
    };
    use crate::domain::analysis::{OutlierDirection, OutlierRisk};
    use crate::domain::offer::{Offer, OfferMetadata};

    fn offer(source: &str, price: f64, confidence: Option<u8>) -> Offer {
        Offer {
            source: source.to_string(),
            source_name: source.to_string(),
            price,
            confidence,
            response_time_ms: 0,
            metadata: OfferMetadata::default(),
        }
    }

    #[test]
    fn median_deviation_flags_the_expensive_offer() {
        let offers = vec![
            offer("a", 100.0, Some(90)),
            offer("b", 100.0, Some(90)),
            offer("c", 250.0, Some(90)),
        ];

        let outliers = detect_outliers(&offers);
        assert_eq!(outliers.len(), 1);
        assert_eq!(outliers[0].source, "c");
        assert_eq!(outliers[0].deviation_pct, 150);
        assert_eq!(outliers[0].direction, OutlierDirection::High);
        assert_eq!(outliers[0].risk, OutlierRisk::High);
    }

    #[test]
    fn mild_deviation_is_medium_risk() {
        let offers = vec![
            offer("a", 100.0, None),
            offer("b", 100.0, None),
            offer("c", 135.0, None),
        ];

        let outliers = detect_outliers(&offers);
        assert_eq!(outliers.len(), 1);
        assert_eq!(outliers[0].deviation_pct, 35);
        assert_eq!(outliers[0].risk, OutlierRisk::Medium);
    }

    #[test]
    fn cheap_offers_flag_low_direction() {
        let offers = vec![
            offer("a", 1000.0, None),
            offer("b", 1000.0, None),
            offer("c", 400.0, None),
        ];

        let outliers = detect_outliers(&offers);
        assert_eq!(outliers[0].direction, OutlierDirection::Low);
    }

    #[test]
    fn fewer_than_three_offers_yields_no_outliers() {
        let offers = vec![offer("a", 100.0, None), offer("b", 900.0, None)];
        assert!(detect_outliers(&offers).is_empty());
    }

    #[test]
    fn weighted_average_uses_asserted_confidence() {
        let offers = vec![
            offer("timocom", 3450.0, Some(92)),
            offer("cargopedia", 3180.0, Some(80)),
            offer("sennder", 3620.0, Some(88)),
        ];

        let expected: f64 =
            ((3450.0_f64 * 92.0 + 3180.0 * 80.0 + 3620.0 * 88.0) / (92.0 + 80.0 + 88.0)).round();
        assert_eq!(weighted_average_price(&offers), Some(expected));
    }

    #[test]
    fn missing_confidence_weighs_at_default() {
        let offers = vec![offer("a", 1000.0, None), offer("b", 2000.0, Some(85))];
        // Equal weights, so the plain mean.
        assert_eq!(weighted_average_price(&offers), Some(1500.0));
    }

    #[test]
    fn empty_offer_list_has_no_average_or_range() {
        assert_eq!(weighted_average_price(&[]), None);
        assert_eq!(price_range(&[]), None);
        assert!(highest_confidence_offer(&[]).is_none());
    }

    #[test]
    fn price_range_summarizes_min_max_mean() {
        let offers = vec![
            offer("a", 3450.0, None),
            offer("b", 3180.0, None),
            offer("c", 3620.0, None),
        ];

        let range = price_range(&offers).unwrap();
        assert_eq!(range.min, 3180.0);
        assert_eq!(range.max, 3620.0);
        assert_eq!(range.average, 3417.0);
    }

    #[test]
    fn highest_confidence_breaks_ties_by_first_seen() {
        let offers = vec![
            offer("first", 3450.0, Some(92)),
            offer("second", 3180.0, Some(92)),
            offer("third", 3620.0, Some(88)),
        ];

        assert_eq!(highest_confidence_offer(&offers).unwrap().source, "first");
    }
}
