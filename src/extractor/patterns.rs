/// Text-level matchers for channel ids embedded in URLs and serialized JSON
use std::sync::LazyLock;

use channel_id::{ChannelId, PATTERN};
use regex::Regex;

/// `/channel/<ID>` not followed by another id character
static CHANNEL_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"/channel/({})(?:[^A-Za-z0-9_-]|$)", PATTERN))
        .expect("channel path pattern is valid")
});

static CHANNEL_ID_LITERAL: LazyLock<Regex> = LazyLock::new(|| literal_regex("channelId"));
static VIDEO_OWNER_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| literal_regex("videoOwnerChannelId"));
static BROWSE_ID_LITERAL: LazyLock<Regex> = LazyLock::new(|| literal_regex("browseId"));

fn literal_regex(key: &str) -> Regex {
    Regex::new(&format!(r#""{}":"({})""#, regex::escape(key), PATTERN))
        .expect("literal pattern is valid")
}

/// JSON keys whose string value is scanned for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKey {
    ChannelId,
    VideoOwnerChannelId,
    BrowseId,
}

impl LiteralKey {
    pub fn name(self) -> &'static str {
        match self {
            LiteralKey::ChannelId => "channelId",
            LiteralKey::VideoOwnerChannelId => "videoOwnerChannelId",
            LiteralKey::BrowseId => "browseId",
        }
    }

    fn regex(self) -> &'static Regex {
        match self {
            LiteralKey::ChannelId => &CHANNEL_ID_LITERAL,
            LiteralKey::VideoOwnerChannelId => &VIDEO_OWNER_LITERAL,
            LiteralKey::BrowseId => &BROWSE_ID_LITERAL,
        }
    }
}

fn first_valid(re: &Regex, text: &str) -> Option<ChannelId> {
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .find_map(|m| ChannelId::parse(m.as_str()).ok())
}

/// Channel id from a `/channel/<ID>` URL segment
pub fn channel_in_url(url: &str) -> Option<ChannelId> {
    first_valid(&CHANNEL_PATH, url)
}

/// First `"key":"<ID>"` occurrence in serialized text
pub fn literal_value(text: &str, key: LiteralKey) -> Option<ChannelId> {
    // Skip the regex on payloads that cannot match
    let needle = format!("\"{}\":\"UC", key.name());
    if !text.contains(&needle) {
        return None;
    }
    first_valid(key.regex(), text)
}

/// `"<handle>" ... "externalId":"<ID>"` within one JSON object
pub fn handle_external_id(text: &str, handle: &str) -> Option<ChannelId> {
    if !text.contains(handle) || !text.contains("externalId") {
        return None;
    }
    let re = Regex::new(&format!(
        r#""{}"[^}}]*?"externalId":"({})""#,
        regex::escape(handle),
        PATTERN
    ))
    .ok()?;
    first_valid(&re, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "UCabcdefghijklmnopqrstuv";

    #[test]
    fn test_channel_in_url() {
        let url = format!("https://www.youtube.com/channel/{}", ID);
        assert_eq!(channel_in_url(&url).unwrap().as_str(), ID);

        let about = format!("/channel/{}/about", ID);
        assert_eq!(channel_in_url(&about).unwrap().as_str(), ID);
    }

    #[test]
    fn test_channel_in_url_rejects_overlong_ids() {
        let url = format!("https://www.youtube.com/channel/{}X", ID);
        assert_eq!(channel_in_url(&url), None);
        assert_eq!(channel_in_url("https://www.youtube.com/channel/UCshort"), None);
        assert_eq!(channel_in_url("https://www.youtube.com/@handle"), None);
    }

    #[test]
    fn test_literal_value() {
        let text = format!(r#"var ytInitialData = {{"foo":1,"channelId":"{}","bar":2}};"#, ID);
        assert_eq!(literal_value(&text, LiteralKey::ChannelId).unwrap().as_str(), ID);
        assert_eq!(literal_value(&text, LiteralKey::VideoOwnerChannelId), None);
    }

    #[test]
    fn test_literal_value_skips_short_values() {
        let text = format!(r#""channelId":"UCshort","channelId":"{}""#, ID);
        assert_eq!(literal_value(&text, LiteralKey::ChannelId).unwrap().as_str(), ID);
    }

    #[test]
    fn test_literal_key_is_exact() {
        let text = format!(r#""videoOwnerChannelId":"{}""#, ID);
        // "ChannelId" inside a longer key must not count as "channelId"
        assert_eq!(literal_value(&text, LiteralKey::ChannelId), None);
        assert_eq!(
            literal_value(&text, LiteralKey::VideoOwnerChannelId).unwrap().as_str(),
            ID
        );
    }

    #[test]
    fn test_handle_external_id() {
        let text = format!(
            r#"{{"vanityChannelUrl":"http://www.youtube.com/@rustlang","title":"Rust","externalId":"{}"}}"#,
            ID
        );
        // The handle must appear as a full JSON string to count
        assert_eq!(handle_external_id(&text, "rustlang"), None);

        let text = format!(r#"{{"handle":"rustlang","externalId":"{}"}}"#, ID);
        assert_eq!(handle_external_id(&text, "rustlang").unwrap().as_str(), ID);
    }

    #[test]
    fn test_handle_external_id_stays_inside_object() {
        let text = format!(r#"{{"handle":"rustlang"}},{{"externalId":"{}"}}"#, ID);
        assert_eq!(handle_external_id(&text, "rustlang"), None);
    }

    #[test]
    fn test_handle_is_escaped() {
        // "." in a handle is literal, not a wildcard
        let text = format!(r#"{{"aXb":"x","externalId":"{}"}} a.b"#, ID);
        assert_eq!(handle_external_id(&text, "a.b"), None);
    }
}
