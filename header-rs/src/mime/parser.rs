use mail_parser::{Address, MessageParser};
use tracing::debug;

use super::types::{HeaderBlock, HeaderFields, ParsedHeaders};
use crate::config::AnalysisConfig;
use crate::error::{HeaderError, Result};

/// Raw header text parser
#[derive(Debug, Clone)]
pub struct HeaderParser {
    max_bytes: usize,
}

impl HeaderParser {
    pub fn new(config: &AnalysisConfig) -> Self {
        HeaderParser {
            max_bytes: config.max_header_bytes,
        }
    }

    /// Parse a raw header block (a full message is accepted too; only its
    /// top-level headers are kept)
    pub fn parse(&self, raw: &str) -> Result<ParsedHeaders> {
        if raw.trim().is_empty() {
            return Err(HeaderError::Parse("Header text is empty".to_string()));
        }

        if raw.len() > self.max_bytes {
            return Err(HeaderError::Parse(format!(
                "Header text is {} bytes, limit is {}",
                raw.len(),
                self.max_bytes
            )));
        }

        let bytes = raw.as_bytes();
        let message = MessageParser::default()
            .parse(bytes)
            .ok_or_else(|| HeaderError::Parse("Unable to parse header block".to_string()))?;

        let mut fields = HeaderFields::new();
        for header in message.headers() {
            let start = header.offset_start as usize;
            let end = header.offset_end as usize;
            let value = bytes
                .get(start..end)
                .map(String::from_utf8_lossy)
                .unwrap_or_default();
            fields.push(header.name(), Self::unfold(&value));
        }

        if fields.is_empty() {
            return Err(HeaderError::Parse("No header fields found".to_string()));
        }

        debug!("Parsed {} distinct header fields", fields.len());

        let from = message
            .from()
            .and_then(|addresses| Self::addresses(addresses).into_iter().next());

        let to = message.to().map(Self::addresses).unwrap_or_default();

        let date = message
            .date()
            .and_then(|d| chrono::DateTime::from_timestamp(d.to_timestamp(), 0))
            .map(|d| d.to_rfc3339());

        Ok(ParsedHeaders {
            header: HeaderBlock {
                header: fields,
                subject: message.subject().map(|s| s.to_string()),
                from,
                to,
                date,
            },
        })
    }

    /// Join folded continuation lines into a single line
    fn unfold(value: &str) -> String {
        value
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn addresses(address: &Address) -> Vec<String> {
        match address {
            Address::List(list) => list
                .iter()
                .filter_map(|addr| addr.address().map(|s| s.to_string()))
                .collect(),
            Address::Group(groups) => groups
                .iter()
                .flat_map(|group| group.addresses.iter())
                .filter_map(|addr| addr.address().map(|s| s.to_string()))
                .collect(),
        }
    }
}

impl Default for HeaderParser {
    fn default() -> Self {
        HeaderParser::new(&AnalysisConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Received: from mx.example.com (mx.example.com [192.0.2.10])\r\n\
        \tby mail.example.org with ESMTPS; Tue, 1 Oct 2024 10:00:00 +0000\r\n\
        Received-SPF: Pass (mail.example.org: domain of sender@example.com designates 192.0.2.10 as permitted sender)\r\n\
        Authentication-Results: mail.example.org;\r\n\
        \tspf=pass smtp.mailfrom=example.com;\r\n\
        \tdkim=pass header.d=example.com\r\n\
        From: Sender <sender@example.com>\r\n\
        To: Alice <alice@example.org>, bob@example.org\r\n\
        Subject: Quarterly report\r\n\
        Date: Tue, 1 Oct 2024 10:00:00 +0000\r\n\
        Received: from relay.example.net by mx.example.com\r\n\
        \r\n";

    #[test]
    fn test_parse_collects_fields_in_order() {
        let parsed = HeaderParser::default().parse(SAMPLE).unwrap();
        let names: Vec<&str> = parsed.fields().iter().map(|(name, _)| name).collect();

        assert_eq!(
            names,
            vec![
                "received",
                "received-spf",
                "authentication-results",
                "from",
                "to",
                "subject",
                "date"
            ]
        );
        assert_eq!(parsed.fields().get("received").unwrap().len(), 2);
    }

    #[test]
    fn test_parse_unfolds_values() {
        let parsed = HeaderParser::default().parse(SAMPLE).unwrap();
        let auth = &parsed.fields().get("authentication-results").unwrap()[0];

        assert_eq!(
            auth,
            "mail.example.org; spf=pass smtp.mailfrom=example.com; dkim=pass header.d=example.com"
        );
        assert!(!auth.contains('\n'));
    }

    #[test]
    fn test_parse_convenience_fields() {
        let parsed = HeaderParser::default().parse(SAMPLE).unwrap();

        assert_eq!(parsed.header.subject.as_deref(), Some("Quarterly report"));
        assert_eq!(parsed.header.from.as_deref(), Some("sender@example.com"));
        assert_eq!(
            parsed.header.to,
            vec!["alice@example.org".to_string(), "bob@example.org".to_string()]
        );
        assert_eq!(
            parsed.header.date.as_deref(),
            Some("2024-10-01T10:00:00+00:00")
        );
    }

    #[test]
    fn test_parse_keeps_encoded_words_raw() {
        let raw = "From: a@example.com\r\nSubject: =?utf-8?q?caf=C3=A9?=\r\n\r\n";
        let parsed = HeaderParser::default().parse(raw).unwrap();

        assert_eq!(
            parsed.fields().get("subject").unwrap(),
            &["=?utf-8?q?caf=C3=A9?=".to_string()]
        );
        assert_eq!(parsed.header.subject.as_deref(), Some("café"));
    }

    #[test]
    fn test_parse_lf_only_input() {
        let raw = "From: a@example.com\nReply-To: b@example.net\nSubject: hi\n";
        let parsed = HeaderParser::default().parse(raw).unwrap();

        assert_eq!(
            parsed.fields().get("reply-to").unwrap(),
            &["b@example.net".to_string()]
        );
    }

    #[test]
    fn test_parse_empty_input() {
        let result = HeaderParser::default().parse("  \r\n ");
        assert!(matches!(result, Err(HeaderError::Parse(_))));
    }

    #[test]
    fn test_parse_respects_size_limit() {
        let parser = HeaderParser::new(&AnalysisConfig {
            max_header_bytes: 16,
        });
        let result = parser.parse("Subject: this header block is too long\r\n");
        assert!(matches!(result, Err(HeaderError::Parse(_))));
    }
}
