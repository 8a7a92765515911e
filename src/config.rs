/// Fixed names and timings shared by the page-context and content-script halves

/// Runtime settings for the extension
#[derive(Debug, Clone, PartialEq)]
pub struct ExtensionConfig {
    /// Queue service intake endpoint
    pub endpoint: String,
    /// Local storage key holding the last resolved channel id
    pub storage_key: String,
    /// Custom event carrying the page-context payload to the content script
    pub bridge_event: String,
    /// Event the host page fires after client-side navigation
    pub page_update_event: String,
    /// Navigation polling interval
    pub poll_interval_ms: i32,
    /// Delay before re-inserting controls after a URL change
    pub navigation_settle_ms: i32,
    /// Delay before re-inserting controls after a page data update
    pub page_update_settle_ms: i32,
}

pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/api/add-channel";
pub const DEFAULT_STORAGE_KEY: &str = "yt-extension-channel-id";
pub const DEFAULT_BRIDGE_EVENT: &str = "yt-channel-data-ready";
pub const DEFAULT_PAGE_UPDATE_EVENT: &str = "yt-page-data-updated";

impl Default for ExtensionConfig {
    fn default() -> Self {
        ExtensionConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            bridge_event: DEFAULT_BRIDGE_EVENT.to_string(),
            page_update_event: DEFAULT_PAGE_UPDATE_EVENT.to_string(),
            poll_interval_ms: 500,
            navigation_settle_ms: 1000,
            page_update_settle_ms: 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExtensionConfig::default();
        assert_eq!(config.endpoint, "http://localhost:3000/api/add-channel");
        assert_eq!(config.storage_key, "yt-extension-channel-id");
        assert_eq!(config.bridge_event, "yt-channel-data-ready");
        assert!(config.poll_interval_ms < 1000);
    }
}
