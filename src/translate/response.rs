//! Parsing of the nested-array body returned by `translate_a/single`.
//!
//! Positions used: `[0]` translated segments, `[2]` detected source language,
//! `[7]` spelling correction, `[8]` alternate detected-language info.

use crate::error::{Result, TransloaderError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedLanguage {
    /// The endpoint's best guess differs from the language it reported.
    pub did_you_mean: bool,
    pub iso: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceText {
    pub auto_corrected: bool,
    /// Corrected input with changed words wrapped in `[` `]`.
    pub value: String,
    pub did_you_mean: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub language: DetectedLanguage,
    pub text: SourceText,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub text: String,
    pub from: SourceInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn strip_markup(suggestion: &str) -> String {
    suggestion.replace("<b><i>", "[").replace("</i></b>", "]")
}

pub fn parse_response(body: Value, keep_raw: bool) -> Result<TranslationResult> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TransloaderError::Parse("missing translated segments at [0]".to_string()))?;

    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    let alternate = body
        .get(8)
        .and_then(|v| v.get(0))
        .and_then(|v| v.get(0))
        .ok_or_else(|| TransloaderError::Parse("missing detected language at [8][0][0]".to_string()))?;

    // When both agree the iso is the same either way.
    let language = DetectedLanguage {
        did_you_mean: body.get(2) != Some(alternate),
        iso: as_text(alternate),
    };

    let mut source_text = SourceText::default();
    let correction = body.get(7);
    if let Some(suggestion) = correction
        .and_then(|v| v.get(0))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
    {
        source_text.value = strip_markup(suggestion);
        if correction.and_then(|v| v.get(5)) == Some(&Value::Bool(true)) {
            source_text.auto_corrected = true;
        } else {
            source_text.did_you_mean = true;
        }
    }

    Ok(TranslationResult {
        text,
        from: SourceInfo {
            language,
            text: source_text,
        },
        raw: keep_raw.then_some(body),
    })
}
