use serde_json::Value;
use tracing::debug;

use super::normalize::normalize;
use super::types::{AnalysisResult, HeaderEntry, HeaderInput};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::mime::HeaderParser;

/// Marker searched (case-insensitively) in SPF/DKIM header values.
/// The trailing space is significant.
const PASS_MARKER: &str = "pass ";

const AUTHENTICATION_RESULTS: &str = "authentication-results";

/// Header authentication analyzer
///
/// Holds only the parser settings; every call is independent.
#[derive(Debug, Clone, Default)]
pub struct HeaderAnalyzer {
    parser: HeaderParser,
}

impl HeaderAnalyzer {
    pub fn new(config: &AnalysisConfig) -> Self {
        HeaderAnalyzer {
            parser: HeaderParser::new(config),
        }
    }

    pub fn parser(&self) -> &HeaderParser {
        &self.parser
    }

    pub fn normalize(&self, input: HeaderInput) -> Result<Vec<HeaderEntry>> {
        normalize(input, &self.parser)
    }

    pub fn analyze(&self, input: HeaderInput) -> Result<AnalysisResult> {
        let entries = self.normalize(input)?;
        Ok(analyze_entries(&entries))
    }

    pub fn analyze_value(&self, value: Value) -> Result<AnalysisResult> {
        self.analyze(HeaderInput::from_value(value)?)
    }

    pub fn analyze_raw(&self, raw: &str) -> Result<AnalysisResult> {
        self.analyze(HeaderInput::Raw(raw.to_string()))
    }
}

/// Derive authentication flags from normalized entries
pub fn analyze_entries(entries: &[HeaderEntry]) -> AnalysisResult {
    let mut result = AnalysisResult::new();

    for entry in entries {
        let key = entry.key.to_lowercase();
        let value_lower = entry.value.to_lowercase();

        if key.contains("spf") && value_lower.contains(PASS_MARKER) {
            result.spf = true;
        }

        if key.contains("dkim") && value_lower.contains(PASS_MARKER) {
            result.dkim = true;
        }

        if key.contains("dmarc") {
            debug!(key = %key, "DMARC header present");
        }

        if key == AUTHENTICATION_RESULTS {
            apply_authentication_results(&entry.value, &mut result);
        }

        if key == "from" {
            // TODO: set `spoofed` once a From/Reply-To domain comparison rule is agreed on
            let reply_to = entries
                .iter()
                .find(|candidate| candidate.key.eq_ignore_ascii_case("reply-to"));
            debug!(
                from = %entry.value,
                reply_to = ?reply_to.map(|e| e.value.as_str()),
                "Sender headers located"
            );
        }
    }

    debug!(
        spf = result.spf,
        dkim = result.dkim,
        dmarc = result.dmarc,
        "Header analysis complete"
    );

    result
}

/// Exact-case `method=pass` lookups; the only source of the DMARC flag
fn apply_authentication_results(value: &str, result: &mut AnalysisResult) {
    if value.contains("spf=pass") {
        result.spf = true;
    }
    if value.contains("dkim=pass") {
        result.dkim = true;
    }
    if value.contains("dmarc=pass") {
        result.dmarc = true;
    }
}
