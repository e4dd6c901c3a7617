pub mod cache;
pub mod config;
pub mod error;
pub mod interactive;
pub mod languages;
pub mod loader;
pub mod token;
pub mod translate;

pub use config::Config;
pub use error::{Result, TransloaderError};
pub use loader::{load, CommandDefinition, CommandRegistry};
pub use token::{SeedPair, Token, TokenGenerator};
pub use translate::{TranslateOptions, TranslationResult, Translator};
