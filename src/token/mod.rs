//! Request-signing token for the translate endpoint.
//!
//! The token is a pure function of the input text and a seed pair. The seed
//! pair is owned by [`TokenGenerator`] and refreshed once per hour from an
//! injected [`SeedSource`].

pub mod seed;

pub use seed::{HttpSeedSource, SeedSource, StaticSeedSource};

use crate::error::{Result, TransloaderError};
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// Query parameter carrying the token.
pub const TOKEN_PARAM: &str = "tk";

/// Bump together with the pinned vectors whenever the mixing steps change.
pub const ALGORITHM_VERSION: u32 = 1;

/// Mixing steps applied after each code point.
const CHAR_MIX: &str = "+-a^+6";

/// Mixing steps applied once to the final accumulator.
const FINAL_MIX: &str = "+-3^+b+-f";

const TOKEN_MODULUS: i64 = 1_000_000;

const BUCKET_SECS: u64 = 3600;

/// The two integers parameterizing the token algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedPair {
    pub a: i64,
    pub b: i64,
}

impl SeedPair {
    /// Used whenever the seed source cannot provide a pair.
    pub const FALLBACK: SeedPair = SeedPair {
        a: 406398,
        b: 2087938574,
    };

    pub fn new(a: i64, b: i64) -> Self {
        Self { a, b }
    }
}

impl Default for SeedPair {
    fn default() -> Self {
        Self::FALLBACK
    }
}

impl std::fmt::Display for SeedPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.a, self.b)
    }
}

impl FromStr for SeedPair {
    type Err = TransloaderError;

    fn from_str(s: &str) -> Result<Self> {
        let (a, b) = s
            .trim()
            .split_once('.')
            .ok_or_else(|| TransloaderError::Seed(format!("malformed seed pair: {}", s)))?;

        let parse = |part: &str| {
            part.parse::<i64>()
                .map_err(|e| TransloaderError::Seed(format!("malformed seed pair {}: {}", s, e)))
        };

        Ok(Self::new(parse(a)?, parse(b)?))
    }
}

/// A signing token: parameter name plus numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub name: &'static str,
    pub value: u32,
}

impl Token {
    pub fn query_pair(&self) -> (String, String) {
        (self.name.to_string(), self.value.to_string())
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// Apply a mixing program to the accumulator.
///
/// `ops` is read in triples: operation (`+` add, else xor), direction
/// (`+` unsigned right shift, else left shift) and a hex shift amount.
/// Every step wraps to 32 bits.
fn mix(value: i64, ops: &str) -> i32 {
    let mut acc = value;

    for step in ops.as_bytes().chunks_exact(3) {
        let amount = match step[2] {
            c @ b'a'..=b'f' => u32::from(c - b'a' + 10),
            c => u32::from(c - b'0'),
        };

        let shifted = if step[1] == b'+' {
            i64::from((acc as u32) >> amount)
        } else {
            i64::from((acc as i32).wrapping_shl(amount))
        };

        acc = if step[0] == b'+' {
            i64::from(acc.wrapping_add(shifted) as i32)
        } else {
            i64::from((acc as i32) ^ (shifted as i32))
        };
    }

    acc as i32
}

/// Compute the token value for `text` under `seed`.
pub fn compute(text: &str, seed: SeedPair) -> u32 {
    // Only the low 32 bits of `a` take part, so scraped values cannot overflow.
    let mut acc = i64::from(seed.a as i32);
    for c in text.chars() {
        acc = i64::from(mix(acc + i64::from(u32::from(c)), CHAR_MIX));
    }

    let folded = mix(acc, FINAL_MIX) ^ (seed.b as i32);
    let unsigned = if folded < 0 {
        i64::from(folded & 0x7FFF_FFFF) + 0x8000_0000
    } else {
        i64::from(folded)
    };

    (unsigned % TOKEN_MODULUS) as u32
}

fn current_bucket() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() / BUCKET_SECS)
        .unwrap_or(0)
}

struct BucketedSeed {
    bucket: u64,
    seed: SeedPair,
}

/// Generates tokens, keeping the seed pair fresh per hour bucket.
pub struct TokenGenerator {
    source: Box<dyn SeedSource>,
    state: Mutex<Option<BucketedSeed>>,
}

impl TokenGenerator {
    pub fn new(source: Box<dyn SeedSource>) -> Self {
        Self {
            source,
            state: Mutex::new(None),
        }
    }

    /// Generator pinned to [`SeedPair::FALLBACK`].
    pub fn with_fallback_seed() -> Self {
        Self::new(Box::new(StaticSeedSource::new(SeedPair::FALLBACK)))
    }

    pub async fn generate(&self, text: &str) -> Token {
        self.generate_in_bucket(text, current_bucket()).await
    }

    /// The seed pair for the current hour.
    pub async fn seed(&self) -> SeedPair {
        self.seed_for_bucket(current_bucket()).await
    }

    async fn generate_in_bucket(&self, text: &str, bucket: u64) -> Token {
        let seed = self.seed_for_bucket(bucket).await;
        Token {
            name: TOKEN_PARAM,
            value: compute(text, seed),
        }
    }

    async fn seed_for_bucket(&self, bucket: u64) -> SeedPair {
        if let Some(cached) = self.lock().as_ref() {
            if cached.bucket == bucket {
                return cached.seed;
            }
        }

        // Two callers racing here both fetch; the later write wins and both are valid.
        let seed = match self.source.fetch().await {
            Ok(seed) => {
                debug!("Refreshed seed from {}: {}", self.source.name(), seed);
                seed
            }
            Err(e) => {
                warn!(
                    "Seed source {} unavailable ({}), using fallback {}",
                    self.source.name(),
                    e,
                    SeedPair::FALLBACK
                );
                SeedPair::FALLBACK
            }
        };

        *self.lock() = Some(BucketedSeed { bucket, seed });
        seed
    }

    fn lock(&self) -> MutexGuard<'_, Option<BucketedSeed>> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingSource {
        calls: Arc<AtomicUsize>,
        result: Option<SeedPair>,
    }

    #[async_trait]
    impl SeedSource for CountingSource {
        async fn fetch(&self) -> Result<SeedPair> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result
                .ok_or_else(|| TransloaderError::Seed("offline".to_string()))
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    #[test]
    fn test_pinned_vectors() {
        let seed = SeedPair::FALLBACK;
        assert_eq!(compute("hello", seed), 338590);
        assert_eq!(compute("", seed), 263193);
        assert_eq!(compute("Hello, world!", seed), 91438);
        assert_eq!(compute("a", seed), 347446);
    }

    #[test]
    fn test_multibyte_uses_code_points() {
        let seed = SeedPair::FALLBACK;
        assert_eq!(compute("héllo", seed), 389807);
        // One astral code point, not two surrogate halves.
        assert_eq!(compute("😀", seed), 273264);
    }

    #[test]
    fn test_out_of_range_seed_uses_low_32_bits() {
        let huge = seed::extract_seed(&seed::seed_pattern(), "tkk:'9223372036854775807.1'").unwrap();
        assert_eq!(huge.a, i64::MAX);
        assert_eq!(compute("a", huge), compute("a", SeedPair::new(-1, 1)));
        assert!(compute("a", huge) < 1_000_000);

        let wrapped = SeedPair::new(406398 + (1 << 32), 2087938574);
        assert_eq!(compute("hello", wrapped), 338590);
    }

    #[test]
    fn test_zero_seed() {
        assert_eq!(compute("", SeedPair::new(0, 0)), 0);
        assert_eq!(compute("hello", SeedPair::new(0, 0)), 29979);
    }

    #[test]
    fn test_compute_is_pure() {
        let seed = SeedPair::new(431039, 1368950254);
        let text = "Le renard brun rapide saute par-dessus le chien paresseux";
        assert_eq!(compute(text, seed), compute(text, seed));
    }

    #[test]
    fn test_value_always_in_range() {
        let seeds = [
            SeedPair::FALLBACK,
            SeedPair::new(0, 0),
            SeedPair::new(-1, -1),
            SeedPair::new(i64::from(i32::MAX), 4_294_967_295),
        ];
        for seed in seeds {
            for text in ["", "x", "ünïcödé", "日本語のテキスト", "\u{10FFFF}"] {
                assert!(compute(text, seed) < 1_000_000);
            }
        }
    }

    #[test]
    fn test_mix_wraps_to_32_bits() {
        assert_eq!(mix(0, CHAR_MIX), 0);
        assert_eq!(mix(1, "+-1"), 3);
        assert_eq!(mix(1, "^+1"), 1);
        assert_eq!(mix(-1, "^+4"), -1 ^ 0x0FFF_FFFF);
        assert_eq!(mix(i64::from(i32::MIN), "+-0"), 0);
    }

    #[test]
    fn test_seed_pair_parsing() {
        let seed: SeedPair = "406398.2087938574".parse().unwrap();
        assert_eq!(seed, SeedPair::FALLBACK);
        assert_eq!(seed.to_string(), "406398.2087938574");

        assert!("406398".parse::<SeedPair>().is_err());
        assert!("a.b".parse::<SeedPair>().is_err());
    }

    #[test]
    fn test_token_display() {
        let token = Token {
            name: TOKEN_PARAM,
            value: 338590,
        };
        assert_eq!(token.to_string(), "tk=338590");
        assert_eq!(token.query_pair(), ("tk".to_string(), "338590".to_string()));
    }

    #[test]
    fn test_generator_with_fallback_matches_compute() {
        let generator = TokenGenerator::with_fallback_seed();
        let token = tokio_test::block_on(generator.generate("hello"));
        assert_eq!(token.name, "tk");
        assert_eq!(token.value, 338590);
    }

    #[test]
    fn test_seed_fetched_once_per_bucket() {
        let calls = Arc::new(AtomicUsize::new(0));
        let generator = TokenGenerator::new(Box::new(CountingSource {
            calls: calls.clone(),
            result: Some(SeedPair::new(0, 0)),
        }));

        tokio_test::block_on(async {
            assert_eq!(generator.generate_in_bucket("", 10).await.value, 0);
            generator.generate_in_bucket("hello", 10).await;
            assert_eq!(calls.load(Ordering::SeqCst), 1);

            generator.generate_in_bucket("hello", 11).await;
            assert_eq!(calls.load(Ordering::SeqCst), 2);
        });
    }

    #[test]
    fn test_seed_failure_falls_back() {
        let calls = Arc::new(AtomicUsize::new(0));
        let generator = TokenGenerator::new(Box::new(CountingSource {
            calls: calls.clone(),
            result: None,
        }));

        let token = tokio_test::block_on(generator.generate_in_bucket("hello", 5));
        assert_eq!(token.value, 338590);

        // The fallback is kept for the rest of the bucket.
        tokio_test::block_on(generator.generate_in_bucket("hello", 5));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
