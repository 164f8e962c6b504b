//! Process configuration and provider resolution.
//!
//! [`AppConfig`] is read once at start-up and then passed by reference to
//! everything that talks to a provider. Nothing reads the environment after
//! that point.

use std::collections::HashMap;

use crate::error::AppError;
use crate::models::Provider;

pub const DEFAULT_APP_URL: &str = "http://localhost:3000";
pub const DEFAULT_TARGET_LANGUAGE: &str = "Russian";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://router.huggingface.co/hf-inference/models";
pub const DEFAULT_IMAGE_MODEL: &str = "stabilityai/stable-diffusion-xl-base-1.0";

/// Hardcoded per-provider defaults.
#[derive(Debug)]
pub struct ProviderDefaults {
    pub env_prefix: &'static str,
    pub base_url: &'static str,
    pub model: &'static str,
}

static PROVIDER_DEFAULTS: [ProviderDefaults; 3] = [
    ProviderDefaults {
        env_prefix: "OPENAI",
        base_url: "https://api.openai.com/v1",
        model: "gpt-4.1-mini",
    },
    ProviderDefaults {
        env_prefix: "PERPLEXITY",
        base_url: "https://api.perplexity.ai",
        model: "sonar-pro",
    },
    ProviderDefaults {
        env_prefix: "OPENROUTER",
        base_url: "https://openrouter.ai/api/v1",
        model: "deepseek/deepseek-chat",
    },
];

impl Provider {
    pub fn defaults(self) -> &'static ProviderDefaults {
        match self {
            Provider::OpenAi => &PROVIDER_DEFAULTS[0],
            Provider::Perplexity => &PROVIDER_DEFAULTS[1],
            Provider::OpenRouter => &PROVIDER_DEFAULTS[2],
        }
    }

    /// Only OpenRouter wants the calling application's URL as a referer.
    fn sends_referer(self) -> bool {
        matches!(self, Provider::OpenRouter)
    }
}

/// Key, base URL and model configured for one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl ProviderSettings {
    pub fn defaults_for(provider: Provider) -> Self {
        let defaults = provider.defaults();
        Self {
            api_key: None,
            base_url: defaults.base_url.to_string(),
            model: defaults.model.to_string(),
        }
    }
}

/// Settings for the image-generation provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            model: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }
}

/// A fully resolved chat endpoint, ready to be called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoint {
    pub provider: Provider,
    pub api_key: String,
    /// Base URL without a trailing slash.
    pub base_url: String,
    pub model: String,
    pub referer: Option<String>,
}

impl ProviderEndpoint {
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

/// A fully resolved image endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEndpoint {
    pub api_key: String,
    pub url: String,
    pub model: String,
}

/// Application configuration, constructed once at process start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub providers: HashMap<Provider, ProviderSettings>,
    pub image: ImageSettings,
    /// Sent as `HTTP-Referer` to providers that ask for it.
    pub app_url: String,
    /// Language that translations, summaries, theses and posts are written in.
    pub target_language: String,
    /// Disable the fetcher's private-address guard.
    pub allow_private_urls: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            providers: Provider::ALL
                .into_iter()
                .map(|p| (p, ProviderSettings::defaults_for(p)))
                .collect(),
            image: ImageSettings::default(),
            app_url: DEFAULT_APP_URL.to_string(),
            target_language: DEFAULT_TARGET_LANGUAGE.to_string(),
            allow_private_urls: false,
        }
    }
}

impl AppConfig {
    /// Read configuration from environment variables.
    ///
    /// For each provider: `<PREFIX>_API_KEY`, `<PREFIX>_BASE_URL`, `<PREFIX>_MODEL`
    /// with prefixes `OPENAI`, `PERPLEXITY`, `OPENROUTER`. Image generation reads
    /// `HUGGINGFACE_API_KEY`, `HUGGINGFACE_BASE_URL`, `HUGGINGFACE_MODEL`.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let providers = Provider::ALL
            .into_iter()
            .map(|provider| {
                let defaults = provider.defaults();
                let prefix = defaults.env_prefix;
                let settings = ProviderSettings {
                    api_key: get(&format!("{prefix}_API_KEY")),
                    base_url: get(&format!("{prefix}_BASE_URL"))
                        .unwrap_or_else(|| defaults.base_url.to_string()),
                    model: get(&format!("{prefix}_MODEL"))
                        .unwrap_or_else(|| defaults.model.to_string()),
                };
                (provider, settings)
            })
            .collect();

        let image = ImageSettings {
            api_key: get("HUGGINGFACE_API_KEY"),
            base_url: get("HUGGINGFACE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_IMAGE_BASE_URL.to_string()),
            model: get("HUGGINGFACE_MODEL").unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
        };

        let allow_private_urls = match get("REFERENT_ALLOW_PRIVATE_URLS") {
            None => false,
            Some(raw) => match raw.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(AppError::ConfigError(format!(
                        "Invalid REFERENT_ALLOW_PRIVATE_URLS '{raw}': expected true or false"
                    )));
                }
            },
        };

        Ok(Self {
            providers,
            image,
            app_url: get("REFERENT_APP_URL").unwrap_or_else(|| DEFAULT_APP_URL.to_string()),
            target_language: get("REFERENT_TARGET_LANGUAGE")
                .unwrap_or_else(|| DEFAULT_TARGET_LANGUAGE.to_string()),
            allow_private_urls,
        })
    }

    /// Replace the settings of one provider.
    pub fn with_provider(mut self, provider: Provider, settings: ProviderSettings) -> Self {
        self.providers.insert(provider, settings);
        self
    }

    pub fn with_image(mut self, image: ImageSettings) -> Self {
        self.image = image;
        self
    }

    pub fn is_configured(&self, provider: Provider) -> bool {
        self.providers
            .get(&provider)
            .is_some_and(|s| s.api_key.is_some())
    }

    /// Resolve key, base URL and model for a provider.
    ///
    /// A missing key is terminal: it is never defaulted.
    pub fn resolve(&self, provider: Provider) -> Result<ProviderEndpoint, AppError> {
        let fallback;
        let settings = match self.providers.get(&provider) {
            Some(settings) => settings,
            None => {
                fallback = ProviderSettings::defaults_for(provider);
                &fallback
            }
        };

        let api_key = settings.api_key.clone().ok_or_else(|| {
            AppError::ConfigError(format!("{} API key not configured", provider.display_name()))
        })?;

        Ok(ProviderEndpoint {
            provider,
            api_key,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            referer: provider.sends_referer().then(|| self.app_url.clone()),
        })
    }

    pub fn resolve_image(&self) -> Result<ImageEndpoint, AppError> {
        let api_key = self.image.api_key.clone().ok_or_else(|| {
            AppError::ConfigError("Hugging Face API key not configured".to_string())
        })?;

        Ok(ImageEndpoint {
            api_key,
            url: format!(
                "{}/{}",
                self.image.base_url.trim_end_matches('/'),
                self.image.model
            ),
            model: self.image.model.clone(),
        })
    }
}
