//! Pure renderers: content documents in, mount writes out.
//!
//! A renderer never touches the template. It produces a list of
//! [`MountWrite`]s - (mount identifier, HTML-or-attribute) pairs - that the
//! hydration engine later applies wherever the template actually declares
//! the mount point. This keeps the field-to-element mapping testable
//! without parsing any HTML.

pub mod common;
pub mod page;

/// One update destined for a mount point.
///
/// Writes targeting an identifier the template does not declare are
/// silently dropped at apply time; the template owns which mount points
/// exist on a given page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountWrite {
    /// Replace the element's content with raw HTML.
    Html { id: String, html: String },
    /// Set one attribute on the element.
    Attr {
        id: String,
        name: String,
        value: String,
    },
}

impl MountWrite {
    /// The mount point identifier this write targets.
    pub fn id(&self) -> &str {
        match self {
            Self::Html { id, .. } | Self::Attr { id, .. } => id,
        }
    }
}

/// `set_content` primitive: replace `id`'s content, optionally converting
/// the value from Markdown first.
fn set_content(
    writes: &mut Vec<MountWrite>,
    id: &str,
    value: &str,
    markdown: bool,
    converter: &dyn crate::markdown::MarkdownConverter,
) {
    let html = if markdown {
        converter.to_html(value)
    } else {
        value.to_string()
    };
    writes.push(MountWrite::Html { id: id.to_string(), html });
}

/// `set_attr` primitive: set one attribute on `id`.
fn set_attr(writes: &mut Vec<MountWrite>, id: &str, name: &str, value: &str) {
    writes.push(MountWrite::Attr {
        id: id.to_string(),
        name: name.to_string(),
        value: value.to_string(),
    });
}
