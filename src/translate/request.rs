use crate::error::{Result, TransloaderError};
use crate::token::Token;
use reqwest::Url;

/// Longest URL sent as a GET; anything longer moves `q` into a POST body.
pub const MAX_GET_URL_LEN: usize = 2048;

/// Data sections requested from the endpoint.
const DATA_TYPES: [&str; 10] = ["at", "bd", "ex", "ld", "md", "qca", "rw", "rm", "ss", "t"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// A fully assembled call to the translate endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateRequest {
    pub method: Method,
    pub url: String,
    /// Form fields sent as the body of a POST.
    pub form: Option<Vec<(String, String)>>,
}

fn query_params(sl: &str, tl: &str, text: Option<&str>, token: &Token) -> Vec<(String, String)> {
    let mut params = vec![
        ("client".to_string(), "gtx".to_string()),
        ("sl".to_string(), sl.to_string()),
        ("tl".to_string(), tl.to_string()),
        ("hl".to_string(), tl.to_string()),
    ];

    for dt in DATA_TYPES {
        params.push(("dt".to_string(), dt.to_string()));
    }

    for (key, value) in [
        ("ie", "UTF-8"),
        ("oe", "UTF-8"),
        ("otf", "1"),
        ("ssel", "0"),
        ("tsel", "0"),
        ("kc", "7"),
    ] {
        params.push((key.to_string(), value.to_string()));
    }

    if let Some(text) = text {
        params.push(("q".to_string(), text.to_string()));
    }

    params.push(token.query_pair());
    params
}

fn build_url(base_url: &str, params: &[(String, String)]) -> Result<Url> {
    Url::parse_with_params(base_url, params)
        .map_err(|e| TransloaderError::Config(format!("Invalid base URL {}: {}", base_url, e)))
}

/// Build the request for `text`, switching to POST when the GET URL would be too long.
pub fn build_request(
    base_url: &str,
    sl: &str,
    tl: &str,
    text: &str,
    token: &Token,
) -> Result<TranslateRequest> {
    let url = build_url(base_url, &query_params(sl, tl, Some(text), token))?;

    if url.as_str().len() <= MAX_GET_URL_LEN {
        return Ok(TranslateRequest {
            method: Method::Get,
            url: url.into(),
            form: None,
        });
    }

    let url = build_url(base_url, &query_params(sl, tl, None, token))?;
    Ok(TranslateRequest {
        method: Method::Post,
        url: url.into(),
        form: Some(vec![("q".to_string(), text.to_string())]),
    })
}
