/// Structured lookups into the host page's initial-data objects
use channel_id::ChannelId;
use serde_json::Value;

use super::patterns::{LiteralKey, literal_value};

/// Global holding the server-rendered page state
pub const INITIAL_DATA: &str = "ytInitialData";

/// Secondary page-data global present on some page types
pub const PAGE_DATA: &str = "ytPageData";

const METADATA_PATHS: [&str; 2] = [
    "/metadata/channelMetadataRenderer/externalId",
    "/header/c4TabbedHeaderRenderer/channelId",
];

const WATCH_CONTENTS: &str = "/contents/twoColumnWatchNextResults/results/results/contents";

const OWNER_RENDERERS: [&str; 2] = ["videoSecondaryInfoRenderer", "videoPrimaryInfoRenderer"];

const OWNER_BROWSE_ID: &str = "/owner/videoOwnerRenderer/navigationEndpoint/browseEndpoint/browseId";

fn id_at(value: &Value, pointer: &str) -> Option<ChannelId> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .and_then(|raw| ChannelId::parse(raw).ok())
}

/// Channel page metadata: `externalId`, then the tabbed header's `channelId`
pub fn metadata_channel(initial_data: &Value) -> Option<ChannelId> {
    METADATA_PATHS
        .iter()
        .find_map(|pointer| id_at(initial_data, pointer))
}

/// `ytPageData.data.channelId`
pub fn page_data_channel(page_data: &Value) -> Option<ChannelId> {
    id_at(page_data, "/data/channelId")
}

/// Owner of the video on a watch page, from the ordered content blocks
///
/// Each block is checked under the secondary-info renderer first, then the
/// primary-info renderer.
pub fn watch_owner(initial_data: &Value) -> Option<ChannelId> {
    let blocks = initial_data.pointer(WATCH_CONTENTS)?.as_array()?;
    blocks.iter().find_map(|block| {
        OWNER_RENDERERS.iter().find_map(|renderer| {
            block
                .get(renderer)
                .and_then(|r| id_at(r, OWNER_BROWSE_ID))
        })
    })
}

/// Raw-text fallback for watch pages: `"videoOwnerChannelId":"<ID>"` anywhere
/// in the serialized `contents` tree
pub fn video_owner_in_contents(initial_data: &Value) -> Option<ChannelId> {
    let contents = initial_data.get("contents")?;
    let text = serde_json::to_string(contents).ok()?;
    literal_value(&text, LiteralKey::VideoOwnerChannelId)
}

/// What the page-context observer publishes after a page-data update
pub fn observed_channel(initial_data: &Value, watch_page: bool) -> Option<ChannelId> {
    metadata_channel(initial_data).or_else(|| {
        if watch_page {
            watch_owner(initial_data).or_else(|| video_owner_in_contents(initial_data))
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ID: &str = "UC_x5XG1OV2P6uZZ5FSM9Ttw";
    const OTHER: &str = "UCBR8-60-B28hp2BmDPdntcQ";

    fn owner_block(renderer: &str, browse_id: &str) -> Value {
        json!({
            renderer: {
                "owner": {
                    "videoOwnerRenderer": {
                        "navigationEndpoint": {
                            "browseEndpoint": { "browseId": browse_id }
                        }
                    }
                }
            }
        })
    }

    fn watch_data(blocks: Vec<Value>) -> Value {
        json!({
            "contents": {
                "twoColumnWatchNextResults": {
                    "results": { "results": { "contents": blocks } }
                }
            }
        })
    }

    #[test]
    fn test_metadata_channel_prefers_external_id() {
        let data = json!({
            "metadata": { "channelMetadataRenderer": { "externalId": ID } },
            "header": { "c4TabbedHeaderRenderer": { "channelId": OTHER } }
        });
        assert_eq!(metadata_channel(&data).unwrap().as_str(), ID);
    }

    #[test]
    fn test_metadata_channel_falls_back_to_header() {
        let data = json!({
            "metadata": { "channelMetadataRenderer": { "externalId": "not-an-id" } },
            "header": { "c4TabbedHeaderRenderer": { "channelId": OTHER } }
        });
        assert_eq!(metadata_channel(&data).unwrap().as_str(), OTHER);
        assert_eq!(metadata_channel(&json!({})), None);
    }

    #[test]
    fn test_page_data_channel() {
        assert_eq!(
            page_data_channel(&json!({ "data": { "channelId": ID } })).unwrap().as_str(),
            ID
        );
        assert_eq!(page_data_channel(&json!({ "data": {} })), None);
    }

    #[test]
    fn test_watch_owner_secondary_renderer() {
        let data = watch_data(vec![
            json!({ "videoPrimaryInfoRenderer": { "title": "x" } }),
            owner_block("videoSecondaryInfoRenderer", ID),
        ]);
        assert_eq!(watch_owner(&data).unwrap().as_str(), ID);
    }

    #[test]
    fn test_watch_owner_primary_renderer() {
        let data = watch_data(vec![owner_block("videoPrimaryInfoRenderer", OTHER)]);
        assert_eq!(watch_owner(&data).unwrap().as_str(), OTHER);
    }

    #[test]
    fn test_watch_owner_skips_invalid_browse_ids() {
        let data = watch_data(vec![
            owner_block("videoSecondaryInfoRenderer", "FEwhat_to_watch"),
            owner_block("videoSecondaryInfoRenderer", ID),
        ]);
        assert_eq!(watch_owner(&data).unwrap().as_str(), ID);
        assert_eq!(watch_owner(&json!({ "contents": {} })), None);
    }

    #[test]
    fn test_video_owner_in_contents() {
        let data = json!({
            "contents": { "playlist": [ { "videoOwnerChannelId": ID } ] },
            "other": { "videoOwnerChannelId": OTHER }
        });
        assert_eq!(video_owner_in_contents(&data).unwrap().as_str(), ID);
    }

    #[test]
    fn test_observed_channel() {
        let watch = watch_data(vec![owner_block("videoSecondaryInfoRenderer", ID)]);
        assert_eq!(observed_channel(&watch, true).unwrap().as_str(), ID);
        // Owner renderers are only consulted on watch pages
        assert_eq!(observed_channel(&watch, false), None);
    }
}
