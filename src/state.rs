use std::sync::Arc;

use reqwest::Client;

use crate::cache::PreviewCache;
use crate::config::Config;
use crate::enrich::ImageEnricher;
use crate::extract::Extractor;
use crate::fetch::PageFetcher;

/// Shared application state passed to all handlers.
/// The cache is the only piece mutated across requests.
#[derive(Clone)]
pub struct AppState {
    pub cache: PreviewCache,
    pub fetcher: PageFetcher,
    pub extractor: Arc<Extractor>,
    pub enricher: ImageEnricher,
    /// Client used by the proxy endpoint.
    pub http_client: Client,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(AppState {
            cache: PreviewCache::new(config.cache_ttl),
            fetcher: PageFetcher::new(config.fetch.clone())?,
            extractor: Arc::new(Extractor::default()),
            enricher: ImageEnricher::new(config.enrich_timeout)?,
            http_client: Client::builder()
                .connect_timeout(config.fetch.timeout)
                .user_agent(config.fetch.user_agent.as_str())
                .build()?,
        })
    }
}
