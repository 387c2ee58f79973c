// SPDX-FileCopyrightText: 2026 Picreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge with fuzzy match suggestions.
//!
//! Converts Figment deserialization errors into miette diagnostics with
//! source spans, the list of valid keys, and "did you mean?" suggestions
//! based on Jaro-Winkler similarity.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity score to suggest a correction.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Name given to inline TOML passed to `load_and_validate_str`.
pub const INLINE_SOURCE: &str = "<inline>";

/// A configuration error with rich diagnostic information.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key that `picreg.toml` or the environment set but no section defines.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(picreg::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys, env_var.as_deref()))
    )]
    UnknownKey {
        /// The unrecognized key as written.
        key: String,
        /// Closest valid key, if one is similar enough.
        suggestion: Option<String>,
        /// Comma-separated keys accepted at this level.
        valid_keys: String,
        /// Variable the key came from, when it was set through the environment.
        env_var: Option<String>,
        /// Location of the key in the config file.
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        /// The config file the key was found in.
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value that does not deserialize into the key's type.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(
        code(picreg::config::invalid_type),
        help("{}", invalid_type_help(expected, env_var.as_deref()))
    )]
    InvalidType {
        /// Dotted path of the key, e.g. `fetch.timeout_secs`.
        key: String,
        /// What figment found versus what it expected.
        detail: String,
        /// The expected type, e.g. `u64`.
        expected: String,
        /// Variable the value came from, when it was set through the environment.
        env_var: Option<String>,
        /// Location of the value's key in the config file.
        #[label("wrong type here")]
        span: Option<SourceSpan>,
        /// The config file the value was found in.
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value of the right type that fails a range or membership check.
    #[error("validation error: {message}")]
    #[diagnostic(code(picreg::config::validation))]
    Validation {
        /// Names the key and the accepted values.
        message: String,
    },

    /// Catch-all for other configuration errors.
    #[error("configuration error: {0}")]
    #[diagnostic(code(picreg::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str, env_var: Option<&str>) -> String {
    let base = match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    };
    match env_var {
        Some(var) => format!("{base}\nset by environment variable {var}"),
        None => base,
    }
}

fn invalid_type_help(expected: &str, env_var: Option<&str>) -> String {
    match env_var {
        Some(var) => format!("expected {expected}; check environment variable {var}"),
        None => format!("expected {expected}"),
    }
}

/// Where a failing value was read from.
enum Origin {
    Env,
    File(String),
    Inline,
}

fn origin_of(error: &figment::error::Error) -> Option<Origin> {
    let metadata = error.metadata.as_ref()?;
    if metadata.name.contains("environment variable") {
        return Some(Origin::Env);
    }
    match metadata.source.as_ref() {
        Some(figment::Source::File(path)) => Some(Origin::File(path.display().to_string())),
        _ => Some(Origin::Inline),
    }
}

/// Convert a `figment::Error` (which may hold several errors) into diagnostics.
///
/// `toml_sources` pairs each config file path (or [`INLINE_SOURCE`]) with its
/// text so keys can be located for labelled spans.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    let mut errors = Vec::new();

    for error in err {
        let origin = origin_of(&error);
        let section: Vec<String> = error.path.iter().map(|s| s.to_string()).collect();

        let config_error = match &error.kind {
            Kind::UnknownField(field, expected) => {
                let valid_keys: Vec<&str> = expected.to_vec();
                let suggestion = suggest_key(field, &valid_keys);
                let (span, src) = locate(origin.as_ref(), &section, field, toml_sources);
                let env_var = matches!(origin, Some(Origin::Env)).then(|| {
                    let mut full = section.clone();
                    full.push(field.clone());
                    crate::loader::env_var_name(&full.join("."))
                });

                ConfigError::UnknownKey {
                    key: field.clone(),
                    suggestion,
                    valid_keys: valid_keys.join(", "),
                    env_var,
                    span,
                    src,
                }
            }
            Kind::InvalidType(actual, expected) => {
                let key = section.join(".");
                let (parent, field) = match section.split_last() {
                    Some((field, parent)) => (parent, field.as_str()),
                    None => (&section[..], ""),
                };
                let (span, src) = locate(origin.as_ref(), parent, field, toml_sources);
                let env_var = matches!(origin, Some(Origin::Env))
                    .then(|| crate::loader::env_var_name(&key));

                ConfigError::InvalidType {
                    key,
                    detail: format!("found {actual}, expected {expected}"),
                    expected: expected.to_string(),
                    env_var,
                    span,
                    src,
                }
            }
            _ => ConfigError::Other(format!("{error}")),
        };

        errors.push(config_error);
    }

    errors
}

fn locate(
    origin: Option<&Origin>,
    section: &[String],
    field: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let wanted = match origin {
        Some(Origin::File(path)) => path.as_str(),
        Some(Origin::Inline) => INLINE_SOURCE,
        Some(Origin::Env) | None => return (None, None),
    };
    if field.is_empty() {
        return (None, None);
    }

    let source = toml_sources
        .iter()
        .find(|(p, _)| p == wanted || std::path::Path::new(wanted).ends_with(p));

    if let Some((path, content)) = source {
        if let Some(offset) = find_key_offset(content, section, field) {
            let span = SourceSpan::new(offset.into(), field.len());
            let named = NamedSource::new(path, content.clone());
            return (Some(span), Some(named));
        }
    }

    (None, None)
}

/// Find the byte offset of `field` in TOML content, after the section header
/// named by `path[0]` (or from the start for top-level keys).
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let search_start = match path.first() {
        None => 0,
        Some(section) => {
            let header = format!("[{section}]");
            content.find(&header).map(|pos| pos + header.len())?
        }
    };

    let remaining = &content[search_start..];
    let mut byte_offset = 0;
    for line in remaining.lines() {
        let trimmed = line.trim_start();
        if let Some(after) = trimmed.strip_prefix(field) {
            if after.starts_with(' ') || after.starts_with('=') || after.starts_with('\t') {
                let field_start_in_line = line.len() - trimmed.len();
                return Some(search_start + byte_offset + field_start_in_line);
            }
        }
        byte_offset += line.len() + 1;
    }

    None
}

/// Suggest the closest valid key above the similarity threshold.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    let mut best_score = SUGGESTION_THRESHOLD;
    let mut best_match = None;

    for &key in valid_keys {
        let score = strsim::jaro_winkler(unknown, key);
        if score > best_score {
            best_score = score;
            best_match = Some(key.to_string());
        }
    }

    best_match
}

/// Render config errors to stderr using miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        let diagnostic: &dyn Diagnostic = error;
        if handler.render_report(&mut buf, diagnostic).is_ok() {
            eprint!("{buf}");
        } else {
            eprintln!("Error: {error}");
        }
    }
}
