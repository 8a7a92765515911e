/// Channel identifier shared by the extension and the queue service
///
/// A channel identifier is the two-character prefix `UC` followed by exactly
/// 22 characters from the URL-safe base64 alphabet (`A-Z a-z 0-9 _ -`).
/// Both sides validate with [`is_channel_id`], so anything the extractor
/// accepts is accepted by the service and vice versa.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed two-character prefix
pub const PREFIX: &str = "UC";

/// Number of characters after the prefix
pub const BODY_LEN: usize = 22;

/// Total length of a valid identifier
pub const LEN: usize = PREFIX.len() + BODY_LEN;

/// Regex fragment matching one identifier, for embedding in larger patterns
pub const PATTERN: &str = "UC[A-Za-z0-9_-]{22}";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("channel id is empty")]
    Empty,
    #[error("channel id must start with \"UC\"")]
    MissingPrefix,
    #[error("channel id must be {LEN} characters, got {0}")]
    BadLength(usize),
    #[error("channel id contains invalid character {0:?}")]
    BadCharacter(char),
}

/// A validated channel identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChannelId(String);

impl ChannelId {
    pub fn parse(raw: &str) -> Result<ChannelId, ParseError> {
        validate(raw)?;
        Ok(ChannelId(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

fn is_body_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn validate(raw: &str) -> Result<(), ParseError> {
    if raw.is_empty() {
        return Err(ParseError::Empty);
    }
    let Some(body) = raw.strip_prefix(PREFIX) else {
        return Err(ParseError::MissingPrefix);
    };
    // Count chars, not bytes, so multi-byte input reports a sensible length
    let len = raw.chars().count();
    if len != LEN {
        return Err(ParseError::BadLength(len));
    }
    match body.chars().find(|c| !is_body_char(*c)) {
        Some(bad) => Err(ParseError::BadCharacter(bad)),
        None => Ok(()),
    }
}

/// The single format predicate used on both sides of the wire
pub fn is_channel_id(raw: &str) -> bool {
    validate(raw).is_ok()
}

impl FromStr for ChannelId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChannelId::parse(s)
    }
}

impl TryFrom<String> for ChannelId {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate(&value)?;
        Ok(ChannelId(value))
    }
}

impl From<ChannelId> for String {
    fn from(id: ChannelId) -> String {
        id.0
    }
}

impl AsRef<str> for ChannelId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "UC1234567890123456789012";

    #[test]
    fn test_parse_valid() {
        let id = ChannelId::parse(VALID).unwrap();
        assert_eq!(id.as_str(), VALID);
        assert_eq!(id.to_string(), VALID);
        assert!(is_channel_id("UC_x5XG1OV2P6uZZ5FSM9Ttw"));
        assert!(is_channel_id("UC-abcdefghijklmnopqrstu"));
    }

    #[test]
    fn test_parse_rejects_missing_prefix() {
        assert_eq!(ChannelId::parse("XX1234567890123456789012"), Err(ParseError::MissingPrefix));
        assert_eq!(ChannelId::parse("uc1234567890123456789012"), Err(ParseError::MissingPrefix));
        assert_eq!(ChannelId::parse(""), Err(ParseError::Empty));
    }

    #[test]
    fn test_parse_rejects_bad_length() {
        assert_eq!(ChannelId::parse("UC123"), Err(ParseError::BadLength(5)));
        assert_eq!(
            ChannelId::parse("UC12345678901234567890123"),
            Err(ParseError::BadLength(25))
        );
        assert_eq!(ChannelId::parse("UC"), Err(ParseError::BadLength(2)));
    }

    #[test]
    fn test_parse_rejects_bad_characters() {
        assert_eq!(
            ChannelId::parse("UC12345678901234567890.2"),
            Err(ParseError::BadCharacter('.'))
        );
        assert_eq!(
            ChannelId::parse("UC1234567890123456789 12"),
            Err(ParseError::BadCharacter(' '))
        );
    }

    #[test]
    fn test_pattern_matches_length_constant() {
        assert_eq!(LEN, 24);
        assert!(PATTERN.starts_with(PREFIX));
        assert!(PATTERN.ends_with(&format!("{{{}}}", BODY_LEN)));
    }

    #[test]
    fn test_serde_validates() {
        let id: ChannelId = serde_json::from_str(&format!("\"{}\"", VALID)).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), format!("\"{}\"", VALID));
        assert!(serde_json::from_str::<ChannelId>("\"UCshort\"").is_err());
    }
}
