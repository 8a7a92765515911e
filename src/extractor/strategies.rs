/// The individual lookups making up the standard extraction chain
use channel_id::ChannelId;

use super::page_state::{
    INITIAL_DATA, PAGE_DATA, metadata_channel, page_data_channel, video_owner_in_contents,
    watch_owner,
};
use super::patterns::{LiteralKey, channel_in_url, handle_external_id, literal_value};
use super::{ExtractError, Probe, Provenance, Strategy};
use crate::page::{handle_from_location, is_watch_page};

const META_CHANNEL_ID: &str = "meta[itemprop=\"channelId\"]";
const CANONICAL_LINK: &str = "link[rel=\"canonical\"]";
const OWNER_LINK: &str = "#owner a[href*=\"channel/\"]";
const ABOUT_LINK: &str =
    "a[href*=\"/channel/\"][href*=\"/about\"], a.yt-spec-button-shape-next[href*=\"/channel/\"]";

/// Watch pages: the about link outranks the cache, which may still name the
/// previous video's owner after client-side navigation
pub fn watch_chain() -> Vec<Box<dyn Strategy>> {
    let mut chain: Vec<Box<dyn Strategy>> = vec![Box::new(AboutLink)];
    chain.extend(standard_chain());
    chain
}

/// The chain in confidence order
pub fn standard_chain() -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(CachedId),
        Box::new(MetaTag),
        Box::new(CanonicalLink),
        Box::new(NavigationUrl),
        Box::new(InlineScript),
        Box::new(PageMetadata),
        Box::new(PageStateScan),
        Box::new(HandleLookup),
        Box::new(WatchOwner),
        Box::new(WatchLinks),
    ]
}

/// Id stored by the content bridge or an earlier lookup
pub struct CachedId;

impl Strategy for CachedId {
    fn provenance(&self) -> Provenance {
        Provenance::SessionCache
    }

    fn try_extract(&self, probe: &Probe<'_>) -> Result<Option<ChannelId>, ExtractError> {
        Ok(probe
            .cache
            .get(probe.storage_key)
            .and_then(|raw| ChannelId::parse(&raw).ok()))
    }
}

pub struct MetaTag;

impl Strategy for MetaTag {
    fn provenance(&self) -> Provenance {
        Provenance::MetaTag
    }

    fn try_extract(&self, probe: &Probe<'_>) -> Result<Option<ChannelId>, ExtractError> {
        Ok(probe
            .page
            .attribute(META_CHANNEL_ID, "content")?
            .and_then(|raw| ChannelId::parse(raw.trim()).ok()))
    }
}

pub struct CanonicalLink;

impl Strategy for CanonicalLink {
    fn provenance(&self) -> Provenance {
        Provenance::CanonicalLink
    }

    fn try_extract(&self, probe: &Probe<'_>) -> Result<Option<ChannelId>, ExtractError> {
        Ok(probe
            .page
            .attribute(CANONICAL_LINK, "href")?
            .and_then(|href| channel_in_url(&href)))
    }
}

pub struct NavigationUrl;

impl Strategy for NavigationUrl {
    fn provenance(&self) -> Provenance {
        Provenance::NavigationUrl
    }

    fn try_extract(&self, probe: &Probe<'_>) -> Result<Option<ChannelId>, ExtractError> {
        Ok(channel_in_url(&probe.page.location()))
    }
}

/// `"channelId":"<ID>"` in any inline script
pub struct InlineScript;

impl Strategy for InlineScript {
    fn provenance(&self) -> Provenance {
        Provenance::InlineScript
    }

    fn try_extract(&self, probe: &Probe<'_>) -> Result<Option<ChannelId>, ExtractError> {
        Ok(probe
            .page
            .script_texts()
            .iter()
            .find_map(|text| literal_value(text, LiteralKey::ChannelId)))
    }
}

/// Structured channel metadata in the page-state globals
pub struct PageMetadata;

impl Strategy for PageMetadata {
    fn provenance(&self) -> Provenance {
        Provenance::PageMetadata
    }

    fn try_extract(&self, probe: &Probe<'_>) -> Result<Option<ChannelId>, ExtractError> {
        let initial = probe.page.global_json(INITIAL_DATA);
        if let Ok(Some(data)) = &initial {
            if let Some(id) = metadata_channel(data) {
                return Ok(Some(id));
            }
        }
        match probe.page.global_json(PAGE_DATA)? {
            Some(data) => Ok(page_data_channel(&data)),
            // Surface the initial-data failure only when nothing else was found
            None => initial.map(|_| None),
        }
    }
}

/// Serialized page state scanned for the `channelId` literal
pub struct PageStateScan;

impl Strategy for PageStateScan {
    fn provenance(&self) -> Provenance {
        Provenance::PageStateScan
    }

    fn try_extract(&self, probe: &Probe<'_>) -> Result<Option<ChannelId>, ExtractError> {
        Ok(probe
            .page
            .global_text(INITIAL_DATA)?
            .and_then(|text| literal_value(&text, LiteralKey::ChannelId)))
    }
}

/// `/@handle` pages: the handle collocated with `externalId`, then any `browseId`
pub struct HandleLookup;

impl Strategy for HandleLookup {
    fn provenance(&self) -> Provenance {
        Provenance::HandleLookup
    }

    fn try_extract(&self, probe: &Probe<'_>) -> Result<Option<ChannelId>, ExtractError> {
        let Some(handle) = handle_from_location(&probe.page.location()) else {
            return Ok(None);
        };
        let scripts = probe.page.script_texts();
        Ok(scripts
            .iter()
            .find_map(|text| handle_external_id(text, &handle))
            .or_else(|| {
                scripts
                    .iter()
                    .find_map(|text| literal_value(text, LiteralKey::BrowseId))
            }))
    }
}

/// Watch pages: the video owner from page state, then from inline scripts
pub struct WatchOwner;

impl Strategy for WatchOwner {
    fn provenance(&self) -> Provenance {
        Provenance::WatchOwner
    }

    fn try_extract(&self, probe: &Probe<'_>) -> Result<Option<ChannelId>, ExtractError> {
        if !is_watch_page(&probe.page.location()) {
            return Ok(None);
        }
        let state = probe.page.global_json(INITIAL_DATA);
        if let Ok(Some(data)) = &state {
            if let Some(id) = watch_owner(data).or_else(|| video_owner_in_contents(data)) {
                return Ok(Some(id));
            }
        }
        let from_scripts = probe
            .page
            .script_texts()
            .iter()
            .find_map(|text| literal_value(text, LiteralKey::VideoOwnerChannelId));
        match from_scripts {
            Some(id) => Ok(Some(id)),
            None => state.map(|_| None),
        }
    }
}

/// Watch pages: the rendered owner link
pub struct WatchLinks;

impl Strategy for WatchLinks {
    fn provenance(&self) -> Provenance {
        Provenance::WatchLinks
    }

    fn try_extract(&self, probe: &Probe<'_>) -> Result<Option<ChannelId>, ExtractError> {
        if !is_watch_page(&probe.page.location()) {
            return Ok(None);
        }
        Ok(probe
            .page
            .attribute(OWNER_LINK, "href")?
            .and_then(|href| channel_in_url(&href)))
    }
}

/// Watch pages: the channel's about link; a hit overwrites the cached id
pub struct AboutLink;

impl Strategy for AboutLink {
    fn provenance(&self) -> Provenance {
        Provenance::AboutLink
    }

    fn try_extract(&self, probe: &Probe<'_>) -> Result<Option<ChannelId>, ExtractError> {
        if !is_watch_page(&probe.page.location()) {
            return Ok(None);
        }
        let Some(id) = probe
            .page
            .attribute(ABOUT_LINK, "href")?
            .and_then(|href| channel_in_url(&href))
        else {
            return Ok(None);
        };
        if probe.cache.get(probe.storage_key).as_deref() != Some(id.as_str()) {
            if let Err(e) = probe.cache.set(probe.storage_key, id.as_str()) {
                log::debug!("could not refresh cached channel id: {}", e);
            }
        }
        Ok(Some(id))
    }
}
