//! Label-anchored extraction of structured decision fields from the
//! reasoning service's free-text output.
//!
//! Free-text extraction is inherently fragile, so it sits behind the
//! [`DecisionExtractor`] trait with an explicit default per field: the engine
//! control flow never changes when the extraction strategy does, and a field
//! the scanner cannot find simply stays `None` for the engine to default.

use freightwise_core::{AlertCategory, AlertSeverity, ImpactLevel, RestrictionAlert};

/// Defaults applied by the engine when a field is missing. The margin
/// default lives in `PricingConfig` since it is operator-tunable.
pub const DEFAULT_CONFIDENCE_PCT: u8 = 80;
pub const DEFAULT_SERVICE_LEVEL: &str = "Standard";

/// Every label the arbitration prompt instructs the service to emit. Also
/// used as block terminators when capturing multi-line fields.
const LABELS: &[&str] = &[
    "RECOMMENDED_SOURCE:",
    "BASE_PRICE:",
    "MARGIN_PCT:",
    "FINAL_PRICE:",
    "CONFIDENCE_PCT:",
    "SERVICE_LEVEL:",
    "RESTRICTIONS_IMPACT:",
    "CRITICAL_ALERTS:",
    "SPECIAL_RECOMMENDATIONS:",
    "JUSTIFICATION:",
];

/// Decision fields recovered from one reasoning response. `None` means the
/// field was absent or unparsable and the engine default applies.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExtractedDecision {
    pub recommended_source: Option<String>,
    pub base_price: Option<f64>,
    pub margin_pct: Option<u8>,
    pub final_price: Option<f64>,
    pub confidence_pct: Option<u8>,
    pub service_level: Option<String>,
    pub restrictions_impact: Option<ImpactLevel>,
    pub critical_alerts: Vec<RestrictionAlert>,
    pub special_recommendations: Vec<String>,
}

pub trait DecisionExtractor: Send + Sync {
    fn extract(&self, response_text: &str) -> ExtractedDecision;
}

/// Default extraction strategy: scan for the labeled lines the prompt
/// template pins down.
#[derive(Clone, Debug, Default)]
pub struct LabeledFieldExtractor;

impl DecisionExtractor for LabeledFieldExtractor {
    fn extract(&self, response_text: &str) -> ExtractedDecision {
        ExtractedDecision {
            recommended_source: labeled_line(response_text, "RECOMMENDED_SOURCE:")
                .map(|value| value.trim_matches(['[', ']']).to_ascii_lowercase()),
            base_price: labeled_line(response_text, "BASE_PRICE:").and_then(parse_amount),
            margin_pct: labeled_line(response_text, "MARGIN_PCT:").and_then(parse_percent),
            final_price: labeled_line(response_text, "FINAL_PRICE:").and_then(parse_amount),
            confidence_pct: labeled_line(response_text, "CONFIDENCE_PCT:").and_then(parse_percent),
            service_level: labeled_line(response_text, "SERVICE_LEVEL:")
                .map(|value| value.trim_matches(['[', ']']).to_string())
                .filter(|value| !value.is_empty()),
            restrictions_impact: labeled_line(response_text, "RESTRICTIONS_IMPACT:")
                .and_then(parse_impact),
            critical_alerts: parse_alerts(&labeled_block(response_text, "CRITICAL_ALERTS:")),
            special_recommendations: parse_recommendations(&labeled_block(
                response_text,
                "SPECIAL_RECOMMENDATIONS:",
            )),
        }
    }
}

/// Value on the same line as `label`, matched case-insensitively at line
/// start (ignoring leading whitespace).
fn labeled_line<'a>(text: &'a str, label: &str) -> Option<&'a str> {
    text.lines().find_map(|line| {
        let value = strip_label(line.trim_start(), label)?.trim();
        (!value.is_empty()).then_some(value)
    })
}

/// Multi-line value starting after `label` and running until the next known
/// label or end of text.
fn labeled_block(text: &str, label: &str) -> String {
    let mut capturing = false;
    let mut block = String::new();

    for line in text.lines() {
        let trimmed = line.trim_start();
        if capturing && is_label_line(trimmed) {
            break;
        }
        if capturing {
            block.push_str(line);
            block.push('\n');
            continue;
        }
        if let Some(rest) = strip_label(trimmed, label) {
            capturing = true;
            let inline = rest.trim();
            if !inline.is_empty() {
                block.push_str(inline);
                block.push('\n');
            }
        }
    }

    block
}

fn is_label_line(trimmed_line: &str) -> bool {
    LABELS.iter().any(|label| strip_label(trimmed_line, label).is_some())
}

/// The remainder of `line` after a case-insensitive `label` prefix, if the
/// prefix is present. Checked slicing: response lines can contain multibyte
/// characters at arbitrary positions.
fn strip_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let prefix = line.get(..label.len())?;
    prefix.eq_ignore_ascii_case(label).then(|| &line[label.len()..])
}

/// Parse a money amount, tolerating currency symbols, brackets, and thousands
/// separators ("€3,450", "[3450]", "3450.50").
fn parse_amount(value: &str) -> Option<f64> {
    let cleaned: String = value
        .chars()
        .filter(|character| character.is_ascii_digit() || *character == '.')
        .collect();
    let amount: f64 = cleaned.parse().ok()?;
    (amount > 0.0).then_some(amount)
}

/// Fractional percents ("18.5%") truncate to their integral part rather
/// than concatenating digits into an out-of-range value.
fn parse_percent(value: &str) -> Option<u8> {
    let integral = value.split('.').next().unwrap_or(value);
    let cleaned: String =
        integral.chars().filter(|character| character.is_ascii_digit()).collect();
    let percent: u16 = cleaned.parse().ok()?;
    (percent <= 100).then_some(percent as u8)
}

fn parse_impact(value: &str) -> Option<ImpactLevel> {
    let normalized = value.trim_matches(['[', ']']).trim().to_ascii_lowercase();
    match normalized.as_str() {
        "low" => Some(ImpactLevel::Low),
        "medium" => Some(ImpactLevel::Medium),
        "high" => Some(ImpactLevel::High),
        _ => None,
    }
}

/// One alert per non-trivial line, severity and category inferred from the
/// wording. Placeholder lines ("none", bullets shorter than a few words)
/// are dropped.
fn parse_alerts(block: &str) -> Vec<RestrictionAlert> {
    block
        .lines()
        .map(strip_bullet)
        .filter(|line| line.len() > 5 && !line.eq_ignore_ascii_case("none"))
        .map(|line| {
            let lowered = line.to_ascii_lowercase();
            let severity = if lowered.contains("critical") {
                AlertSeverity::Critical
            } else if lowered.contains("urgent") {
                AlertSeverity::High
            } else {
                AlertSeverity::Medium
            };
            RestrictionAlert::new(severity, categorize_alert(&lowered), line)
        })
        .collect()
}

fn parse_recommendations(block: &str) -> Vec<String> {
    block
        .lines()
        .map(strip_bullet)
        .filter(|line| line.len() > 5)
        .map(|line| line.to_string())
        .collect()
}

fn categorize_alert(lowered: &str) -> AlertCategory {
    if lowered.contains("adr") || lowered.contains("hazard") || lowered.contains("dangerous") {
        AlertCategory::HazardousCargo
    } else if lowered.contains("weekend") || lowered.contains("sunday") || lowered.contains("holiday")
    {
        AlertCategory::WeekendBan
    } else if lowered.contains("toll") || lowered.contains("vignette") {
        AlertCategory::Tolls
    } else if lowered.contains("weight") || lowered.contains("dimension") {
        AlertCategory::WeightLimit
    } else {
        AlertCategory::System
    }
}

fn strip_bullet(line: &str) -> &str {
    line.trim().trim_start_matches(['-', '*', '•']).trim()
}
