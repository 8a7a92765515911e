/// Channel id extraction: an ordered chain of fallback strategies
///
/// The chain runs cheapest and most reliable lookups first. A strategy that
/// fails is logged and skipped; total failure yields a result without an id.
pub mod page_state;
pub mod patterns;
pub mod strategies;

#[cfg(test)]
pub(crate) mod fixture;

use channel_id::ChannelId;
use serde::Serialize;
use thiserror::Error;

use crate::cache::{self, SessionCache};
use crate::page::{LiveDocument, PageSurface, is_watch_page};

pub use strategies::{standard_chain, watch_chain};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("DOM lookup failed: {0}")]
    Dom(String),
    #[error("page state is not valid JSON: {0}")]
    Json(String),
}

/// Which lookup produced an id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
    SessionCache,
    MetaTag,
    CanonicalLink,
    NavigationUrl,
    InlineScript,
    PageMetadata,
    PageStateScan,
    HandleLookup,
    WatchOwner,
    WatchLinks,
    AboutLink,
}

/// Outcome of one extraction pass
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub channel_id: Option<ChannelId>,
    pub provenance: Option<Provenance>,
}

impl ExtractionResult {
    pub fn found(channel_id: ChannelId, provenance: Provenance) -> Self {
        ExtractionResult {
            channel_id: Some(channel_id),
            provenance: Some(provenance),
        }
    }

    pub fn not_found() -> Self {
        ExtractionResult {
            channel_id: None,
            provenance: None,
        }
    }
}

/// What a strategy gets to look at
pub struct Probe<'a> {
    pub page: &'a dyn PageSurface,
    pub cache: &'a dyn SessionCache,
    pub storage_key: &'a str,
}

/// One heuristic in the chain
pub trait Strategy {
    fn provenance(&self) -> Provenance;

    /// `Ok(None)` means "not here, try the next one"
    fn try_extract(&self, probe: &Probe<'_>) -> Result<Option<ChannelId>, ExtractError>;
}

pub struct Extractor {
    strategies: Vec<Box<dyn Strategy>>,
}

impl Extractor {
    pub fn new(strategies: Vec<Box<dyn Strategy>>) -> Self {
        Extractor { strategies }
    }

    pub fn standard() -> Self {
        Extractor::new(standard_chain())
    }

    /// The chain suited to the page at `location`
    pub fn for_location(location: &str) -> Self {
        if is_watch_page(location) {
            Extractor::new(watch_chain())
        } else {
            Extractor::standard()
        }
    }

    pub fn provenances(&self) -> Vec<Provenance> {
        self.strategies.iter().map(|s| s.provenance()).collect()
    }

    /// Run the chain; first strategy to produce an id wins
    pub fn resolve(&self, probe: &Probe<'_>) -> ExtractionResult {
        for strategy in &self.strategies {
            match strategy.try_extract(probe) {
                Ok(Some(id)) => {
                    log::debug!("channel id {} via {:?}", id, strategy.provenance());
                    return ExtractionResult::found(id, strategy.provenance());
                }
                Ok(None) => {}
                Err(e) => {
                    log::debug!("{:?} lookup failed: {}", strategy.provenance(), e);
                }
            }
        }
        ExtractionResult::not_found()
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::standard()
    }
}

/// Run the chain for the current page against the live document and the
/// session cache
pub fn locate_on_page(storage_key: &str) -> ExtractionResult {
    let Some(page) = LiveDocument::current() else {
        return ExtractionResult::not_found();
    };
    let cache = cache::open();
    let probe = Probe {
        page: &page,
        cache: cache.as_ref(),
        storage_key,
    };
    Extractor::for_location(&page.location()).resolve(&probe)
}
