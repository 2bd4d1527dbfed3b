use crate::error::Result;
use crate::report::Report;

/// Render the full report as pretty-printed JSON. Non-ASCII text is kept as-is.
pub fn render(report: &Report) -> Result<String> {
    let json = serde_json::to_string_pretty(report)?;
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RiskTier;

    #[test]
    fn round_trips_and_keeps_unicode() {
        let mut report = Report::default();
        report.metadata.apk_name = "Взлом.apk".into();
        report.security_assessment.risk_level = RiskTier::High;
        report.recommendations = vec!["⚠️ DO NOT INSTALL!".into()];

        let json = render(&report).unwrap();
        assert!(json.contains("Взлом.apk"));
        assert!(json.contains("⚠️"));
        assert!(json.contains("\"risk_level\": \"high\""));

        let back: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
