//! Shared site content: navigation entries, site name, footer text.

use serde::Deserialize;

/// A single navigation entry.
///
/// `href` is assumed unique across the document but never enforced;
/// input order is display order.
#[derive(Debug, Clone, Deserialize)]
pub struct NavEntry {
    /// Link target, e.g. `"chi-siamo.html"`
    pub href: String,
    /// Visible label
    pub text: String,
}

/// The shared document loaded on every page view (`_data/common.json`).
///
/// Owned transiently while the navigation and footer writes are produced,
/// then dropped. Never cached between page loads.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonContent {
    pub site_name: String,
    pub footer_text: String,
    pub nav: Vec<NavEntry>,
}
