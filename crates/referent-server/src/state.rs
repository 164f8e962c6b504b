use std::sync::Arc;

use referent_client::{ChatClientFactory, ImageClient, ReqwestFetcher, SelectorExtractor};
use referent_core::AppConfig;
use referent_core::error::AppError;

/// Shared application state, available to all route handlers via `State<Arc<AppState>>`.
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub fetcher: ReqwestFetcher,
    pub extractor: SelectorExtractor,
    pub chat: ChatClientFactory,
    pub images: ImageClient,
    /// Bearer token guarding the API (None = open).
    pub api_key: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig, api_key: Option<String>) -> Result<Self, AppError> {
        let config = Arc::new(config);

        let fetcher = ReqwestFetcher::new()?;
        let fetcher = if config.allow_private_urls {
            fetcher.allow_private_urls()
        } else {
            fetcher
        };

        Ok(Self {
            chat: ChatClientFactory::new(Arc::clone(&config))?,
            images: ImageClient::new(Arc::clone(&config))?,
            extractor: SelectorExtractor::new(),
            fetcher,
            config,
            api_key,
        })
    }
}
