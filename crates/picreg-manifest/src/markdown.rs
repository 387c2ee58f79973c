// SPDX-FileCopyrightText: 2026 Picreg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Markdown rendering used to detect raw HTML in long descriptions.
//!
//! Long descriptions must be plain markdown. comrak renders in safe mode,
//! which replaces every raw HTML block or inline tag with a fixed comment, so
//! the presence of that comment in the output means the author wrote HTML.

use comrak::{Options, markdown_to_html};

/// Comment comrak emits in place of raw HTML when rendering safely.
pub const RAW_HTML_PLACEHOLDER: &str = "<!-- raw HTML omitted -->";

/// Renders markdown text to HTML.
pub trait MarkdownRenderer: Send + Sync {
    fn render(&self, text: &str) -> String;
}

/// CommonMark renderer backed by comrak with default (safe) options.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComrakRenderer;

impl MarkdownRenderer for ComrakRenderer {
    fn render(&self, text: &str) -> String {
        markdown_to_html(text, &Options::default())
    }
}

/// Returns true if rendering dropped raw HTML from the source.
pub fn contains_raw_html(html: &str) -> bool {
    html.contains(RAW_HTML_PLACEHOLDER)
}
