//! Markdown conversion capability.
//!
//! Body fields flagged as Markdown are converted to HTML through an
//! injected [`MarkdownConverter`] rather than a runtime environment probe.
//! When conversion is disabled ([`Passthrough`]) the raw value is inserted
//! unmodified, matching the degraded behavior of a page whose converter
//! never loaded.

use pulldown_cmark::{Options, Parser, html};

/// Converts a Markdown body field into HTML.
pub trait MarkdownConverter: Send + Sync {
    fn to_html(&self, input: &str) -> String;
}

/// CommonMark conversion via pulldown-cmark.
pub struct CommonMark;

impl MarkdownConverter for CommonMark {
    fn to_html(&self, input: &str) -> String {
        let parser = Parser::new_ext(input, Options::empty());
        let mut out = String::with_capacity(input.len() * 3 / 2);
        html::push_html(&mut out, parser);
        out
    }
}

/// Identity conversion, used when the Markdown capability is disabled.
pub struct Passthrough;

impl MarkdownConverter for Passthrough {
    fn to_html(&self, input: &str) -> String {
        input.to_string()
    }
}

/// Pick the converter implementation from the `[data] markdown` switch.
pub fn converter(enabled: bool) -> Box<dyn MarkdownConverter> {
    if enabled { Box::new(CommonMark) } else { Box::new(Passthrough) }
}
