use crate::error::{Result, TransloaderError};
use crate::languages;
use crate::translate::{TranslateOptions, Translator};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::info;

/// Translations keyed by language, then by source word.
pub type LoadedLanguages = BTreeMap<String, BTreeMap<String, String>>;

impl Translator {
    /// Pre-warm the cache with every word translated into every language.
    ///
    /// Runs sequentially. An unsupported language stops the whole batch.
    pub async fn load_languages(&self, targets: &[String], words: &[String]) -> Result<LoadedLanguages> {
        self.load_languages_with(targets, words, |_, _| {}).await
    }

    /// Like [`Translator::load_languages`], calling `on_item(lang, word)` after each word.
    pub async fn load_languages_with<F>(
        &self,
        targets: &[String],
        words: &[String],
        mut on_item: F,
    ) -> Result<LoadedLanguages>
    where
        F: FnMut(&str, &str) + Send,
    {
        let mut translations = LoadedLanguages::new();
        let mut loaded = Vec::with_capacity(targets.len());

        for lang in targets {
            if !languages::is_supported(lang) {
                return Err(TransloaderError::UnsupportedLanguage(lang.clone()));
            }

            let options = TranslateOptions::new().to(lang.clone());
            let mut per_word = BTreeMap::new();
            for word in words {
                let result = self.translate(word, &options).await?;
                per_word.insert(word.clone(), result.text);
                on_item(lang, word);
            }

            translations.insert(lang.clone(), per_word);
            loaded.push(lang.as_str());
        }

        info!(
            "The languages \"{}\" have been loaded successfully.",
            loaded.join(", ")
        );
        Ok(translations)
    }
}

/// Read a JSON array of strings, rejecting anything that is not an array.
pub fn parse_string_list(value: &Value) -> Result<Vec<String>> {
    let items = value
        .as_array()
        .ok_or_else(|| TransloaderError::InvalidArgument("Parameters must be arrays".to_string()))?;

    items
        .iter()
        .map(|item| match item {
            Value::String(s) => Ok(s.clone()),
            other => Err(TransloaderError::InvalidArgument(format!(
                "Expected a string, found {}",
                other
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_string_list() {
        let words = parse_string_list(&json!(["hello", "goodbye"])).unwrap();
        assert_eq!(words, vec!["hello".to_string(), "goodbye".to_string()]);

        assert!(parse_string_list(&json!([])).unwrap().is_empty());
    }

    #[test]
    fn test_parse_string_list_rejects_non_arrays() {
        let err = parse_string_list(&json!({"words": ["hello"]})).unwrap_err();
        assert_eq!(err.to_string(), "Invalid argument: Parameters must be arrays");

        assert!(parse_string_list(&json!("hello")).is_err());
        assert!(parse_string_list(&json!(["hello", 3])).is_err());
    }
}
