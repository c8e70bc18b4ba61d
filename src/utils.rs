//!
//! Utility functions shared by the configuration and request layers.
//!
//! This module provides:
//! - [`replace_handlebars_with_env`] - Template substitution for environment variables
//! - [`decode_base64`] - Lenient base64 decoding for request bodies
//!

use {
    base64::{
        Engine,
        alphabet,
        engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    },
    regex::{Captures, Regex},
    std::{env, sync::LazyLock},
};

/// Regular expression pattern for matching handlebars-style environment variable references.
/// Matches patterns like `{{ VAR_NAME }}` with optional whitespace around the variable name.
/// Variable names must be uppercase letters, digits, or underscores (standard env var naming).
static HANDLEBAR_REGEXP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Z0-9_]+)\s*\}\}").unwrap());

/// Standard alphabet engine that accepts payloads with or without trailing padding.
/// Edge platforms are not consistent about padding request bodies.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Replaces handlebars-style environment variable references with their values.
///
/// Scans the input string for patterns like `{{ VAR_NAME }}` and replaces them
/// with the value of the corresponding environment variable. Missing variables
/// are replaced with an empty string and a warning is logged.
///
/// # Examples
///
/// ```
/// use edge_router::replace_handlebars_with_env;
///
/// unsafe { std::env::set_var("ROUTER_PREFIX", "/api"); }
/// let result = replace_handlebars_with_env("prefix = \"{{ ROUTER_PREFIX }}\"");
/// assert_eq!(result, "prefix = \"/api\"");
///
/// let result = replace_handlebars_with_env("Value: {{ MISSING_VAR }}");
/// assert_eq!(result, "Value: ");
/// ```
pub fn replace_handlebars_with_env(input: &str) -> String {
    HANDLEBAR_REGEXP
        .replace_all(input, |caps: &Captures| {
            let var_name = &caps[1];
            env::var(var_name).unwrap_or_else(|_| {
                tracing::warn!(
                    variable = %var_name,
                    "Environment variable not found, substituting with empty string"
                );
                String::new()
            })
        })
        .to_string()
}

/// Decodes a base64 payload, ignoring any surplus `=` padding at the end.
///
/// Returns `None` when the payload is not valid base64.
///
/// ```
/// use edge_router::decode_base64;
///
/// assert_eq!(decode_base64("Zm9vPWJhcg==").as_deref(), Some(&b"foo=bar"[..]));
/// assert_eq!(decode_base64("Zm9vPWJhcg").as_deref(), Some(&b"foo=bar"[..]));
/// assert!(decode_base64("not base64!").is_none());
/// ```
pub fn decode_base64(data: &str) -> Option<Vec<u8>> {
    LENIENT_BASE64
        .decode(data.trim().trim_end_matches('='))
        .ok()
}

/// Encodes bytes with the standard padded base64 alphabet.
pub fn encode_base64(data: impl AsRef<[u8]>) -> String {
    base64::engine::general_purpose::STANDARD.encode(data)
}
