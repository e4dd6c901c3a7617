pub mod batch;
pub mod request;
pub mod response;
pub mod transport;

pub use batch::parse_string_list;
pub use request::{build_request, Method, TranslateRequest, MAX_GET_URL_LEN};
pub use response::{parse_response, DetectedLanguage, SourceInfo, SourceText, TranslationResult};
pub use transport::{HttpTransport, Transport};

use crate::cache::TtlCache;
use crate::config::Config;
use crate::error::{Result, TransloaderError};
use crate::languages;
use crate::token::{HttpSeedSource, SeedPair, SeedSource, StaticSeedSource, TokenGenerator};
use tracing::debug;

/// Source language used when none is given.
pub const AUTO_DETECT: &str = "auto";

/// Per-call options; unset languages fall back to auto-detect and the configured target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslateOptions {
    pub from: Option<String>,
    pub to: Option<String>,
    pub raw: bool,
}

impl TranslateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from(mut self, lang: impl Into<String>) -> Self {
        self.from = Some(lang.into());
        self
    }

    pub fn to(mut self, lang: impl Into<String>) -> Self {
        self.to = Some(lang.into());
        self
    }

    /// Keep the endpoint's raw body on the result.
    pub fn raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }
}

pub fn cache_key(from: &str, to: &str, text: &str) -> String {
    format!("{}-{}-{}", from, to, text)
}

fn resolve(code: &str) -> Result<&'static str> {
    languages::iso_code(code).ok_or_else(|| TransloaderError::UnsupportedLanguage(code.to_string()))
}

/// Client for the translate endpoint with a result cache.
pub struct Translator {
    transport: Box<dyn Transport>,
    tokens: TokenGenerator,
    cache: TtlCache<TranslationResult>,
    base_url: String,
    default_target: String,
}

impl Translator {
    pub fn new(transport: Box<dyn Transport>, tokens: TokenGenerator, config: &Config) -> Self {
        Self {
            transport,
            tokens,
            cache: TtlCache::new(config.cache_ttl()),
            base_url: config.base_url.clone(),
            default_target: config.default_target.clone(),
        }
    }

    /// Build an HTTP-backed translator from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = HttpTransport::new(config.request_timeout())?;

        let source: Box<dyn SeedSource> = if config.fetch_seed {
            Box::new(HttpSeedSource::new(
                config.seed_url.clone(),
                config.request_timeout(),
            )?)
        } else {
            Box::new(StaticSeedSource::new(SeedPair::FALLBACK))
        };

        Ok(Self::new(
            Box::new(transport),
            TokenGenerator::new(source),
            config,
        ))
    }

    pub fn cache(&self) -> &TtlCache<TranslationResult> {
        &self.cache
    }

    pub fn default_target(&self) -> &str {
        &self.default_target
    }

    /// Translate `text`, serving repeated `(from, to, text)` triples from the cache.
    pub async fn translate(&self, text: &str, options: &TranslateOptions) -> Result<TranslationResult> {
        let from = options.from.as_deref().filter(|l| !l.is_empty());
        let to = options.to.as_deref().filter(|l| !l.is_empty());

        for lang in [from, to].into_iter().flatten() {
            if !languages::is_supported(lang) {
                return Err(TransloaderError::UnsupportedLanguage(lang.to_string()));
            }
        }

        let from = from.unwrap_or(AUTO_DETECT);
        let to = to.unwrap_or(self.default_target.as_str());

        let key = cache_key(from, to, text);
        if let Some(cached) = self.cache.get(&key) {
            debug!("Cache hit for {}", key);
            return Ok(cached);
        }

        let sl = resolve(from)?;
        let tl = resolve(to)?;

        let token = self.tokens.generate(text).await;
        let request = build_request(&self.base_url, sl, tl, text, &token)?;
        debug!(
            "Translating {} chars {} -> {} via {} ({} byte URL)",
            text.chars().count(),
            sl,
            tl,
            request.method,
            request.url.len()
        );

        let body = self.transport.send(&request).await?;
        let result = parse_response(body, options.raw)?;

        self.cache.set(key, result.clone());
        Ok(result)
    }
}
