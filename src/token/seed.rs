use crate::error::{Result, TransloaderError};
use crate::token::SeedPair;
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Side channel providing the current seed pair.
#[async_trait]
pub trait SeedSource: Send + Sync {
    async fn fetch(&self) -> Result<SeedPair>;
    fn name(&self) -> &'static str;
}

/// Always returns the same pair.
pub struct StaticSeedSource {
    seed: SeedPair,
}

impl StaticSeedSource {
    pub fn new(seed: SeedPair) -> Self {
        Self { seed }
    }
}

#[async_trait]
impl SeedSource for StaticSeedSource {
    async fn fetch(&self) -> Result<SeedPair> {
        Ok(self.seed)
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// Scrapes the seed pair embedded in the translate front page.
pub struct HttpSeedSource {
    client: Client,
    url: String,
    pattern: Regex,
}

impl HttpSeedSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            pattern: seed_pattern(),
        })
    }
}

#[async_trait]
impl SeedSource for HttpSeedSource {
    async fn fetch(&self) -> Result<SeedPair> {
        debug!("Fetching seed page {}", self.url);

        let body = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        extract_seed(&self.pattern, &body)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Matches `tkk:'<a>.<b>'` and the older `TKK='<a>.<b>'`.
pub fn seed_pattern() -> Regex {
    Regex::new(r#"(?i)tkk\s*[:=]\s*['"](-?\d+)\.(-?\d+)['"]"#).expect("Invalid regex")
}

/// Find the seed pair in a page body using [`seed_pattern`].
pub fn extract_seed(pattern: &Regex, page: &str) -> Result<SeedPair> {
    let caps = pattern
        .captures(page)
        .ok_or_else(|| TransloaderError::Seed("no tkk value found on page".to_string()))?;

    format!("{}.{}", &caps[1], &caps[2]).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_seed_current_format() {
        let page = r#"<script>window.WIZ_global_data = {};c._ = {tkk:'448487.932609646',x:1};</script>"#;
        assert_eq!(extract_seed(&seed_pattern(), page).unwrap(), SeedPair::new(448487, 932609646));
    }

    #[test]
    fn test_extract_seed_legacy_format() {
        let page = "var a = 1; TKK='406398.2087938574'; var b = 2;";
        assert_eq!(extract_seed(&seed_pattern(), page).unwrap(), SeedPair::FALLBACK);
    }

    #[test]
    fn test_extract_seed_missing() {
        let result = extract_seed(&seed_pattern(), "<html><body>nothing here</body></html>");
        assert!(matches!(result, Err(TransloaderError::Seed(_))));
    }

    #[test]
    fn test_http_source_compiles_pattern_once() {
        let source = HttpSeedSource::new("http://localhost/", Duration::from_secs(1)).unwrap();
        assert_eq!(source.pattern.as_str(), seed_pattern().as_str());

        // The stored pattern serves repeated extractions.
        for page in ["tkk:'1.2'", "TKK = \"3.4\""] {
            assert!(extract_seed(&source.pattern, page).is_ok());
        }
        assert_eq!(
            extract_seed(&source.pattern, "TKK = \"3.4\"").unwrap(),
            SeedPair::new(3, 4)
        );
    }

    #[test]
    fn test_static_source() {
        let source = StaticSeedSource::new(SeedPair::new(1, 2));
        let seed = tokio_test::block_on(source.fetch()).unwrap();
        assert_eq!(seed, SeedPair::new(1, 2));
        assert_eq!(source.name(), "static");
    }
}
