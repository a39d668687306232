//! Template hydration: applying mount writes to an HTML page template.
//!
//! The template is rewritten as an event stream (quick-xml reader feeding
//! a writer). Two passes:
//!
//! - `scan_template` extracts the page identifier (`data-page` on `<body>`)
//!   and checks whether the static markup already carries a `menu-toggle`
//!   control and a `nav-links` container.
//! - `apply_writes` streams the document through, rewriting elements whose
//!   `id` is targeted by a write: attribute writes are merged into the
//!   start tag, an HTML write replaces the element's children wholesale.
//!   The `</body>` end tag is the injection point for the menu-toggle
//!   script.
//!
//! Templates must be XML-well-formed: every element closed, void elements
//! in self-closing form. Untouched events stream through unchanged, so a
//! template without matching mount points survives hydration intact.
//!
//! [`hydrate_page`] is the per-page entry point and owns the error policy:
//! fetch and parse failures are logged and swallowed (the static fallback
//! markup wins), while a malformed template is a real error.

use crate::content::{PageContent, PageId};
use crate::fetch::DataSource;
use crate::log;
use crate::markdown::MarkdownConverter;
use crate::render::common::render_common;
use crate::render::page::render_page;
use crate::render::MountWrite;
use anyhow::Result;
use quick_xml::{
    Reader, Writer,
    events::{BytesEnd, BytesStart, BytesText, Event},
};
use std::collections::HashMap;
use std::io::Cursor;

/// Class-flip wiring for the mobile menu: a click on the toggle flips the
/// `open` class on the navigation-links container. Injected before
/// `</body>` only when both elements exist in the hydrated document.
const MENU_TOGGLE_SCRIPT: &str = "<script>(function(){\
var toggle=document.querySelector(\".menu-toggle\");\
var links=document.querySelector(\".nav-links\");\
if(toggle&&links){toggle.addEventListener(\"click\",function(){links.classList.toggle(\"open\");});}\
})();</script>";

/// What a scan pass learned about a template.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TemplateInfo {
    /// `data-page` attribute of `<body>`, if declared.
    pub page_id: Option<String>,
    /// Static markup already contains a `menu-toggle` control.
    pub has_menu_toggle: bool,
    /// Static markup already contains a `nav-links` container.
    pub has_nav_links: bool,
}

/// Hydrate one page template against a data source.
///
/// Stage order matches the original page lifecycle: common data first
/// (navigation/footer), then the page document if the template declares an
/// identifier, then menu-toggle wiring. A failure in either fetch stage is
/// logged and swallowed - that stage simply contributes no writes and the
/// template's static fallback content remains.
pub fn hydrate_page(
    template: &[u8],
    source: &DataSource,
    md: &dyn MarkdownConverter,
) -> Result<Vec<u8>> {
    let info = scan_template(template)?;
    let page_id = info.page_id.as_deref();

    let mut writes = Vec::new();
    let mut nav_rendered = false;

    match source.fetch_common() {
        Ok(common) => {
            writes.extend(render_common(&common, page_id));
            nav_rendered = true;
        }
        Err(err) => {
            log!("fetch"; "common data unavailable: {:#}", anyhow::Error::new(err));
        }
    }

    if let Some(raw_id) = page_id {
        match source.fetch_page(raw_id) {
            Ok(raw) => match PageId::parse(raw_id) {
                Some(id) => match PageContent::from_json(id, &raw) {
                    Ok(content) => writes.extend(render_page(&content, md)),
                    Err(err) => {
                        log!("fetch"; "rejected `{raw_id}` document: {err}");
                    }
                },
                // Fetch succeeded, but no rendering routine matches.
                None => log!("hydrate"; "no rendering routine for page `{raw_id}`"),
            },
            Err(err) => {
                log!("fetch"; "data for `{raw_id}` unavailable: {:#}", anyhow::Error::new(err));
            }
        }
    }

    // The rebuilt navigation carries both the toggle and the links
    // container, so rendering it guarantees the wiring targets exist.
    let wire_menu = nav_rendered || (info.has_menu_toggle && info.has_nav_links);

    apply_writes(template, &writes, wire_menu)
}

/// Extract the page identifier and menu markers from a template.
pub fn scan_template(template: &[u8]) -> Result<TemplateInfo> {
    let mut reader = create_reader(template);
    let mut info = TemplateInfo::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(elem) | Event::Empty(elem)) => {
                if elem.name().as_ref() == b"body" {
                    info.page_id = attr_value(&elem, b"data-page");
                }
                if let Some(class) = attr_value(&elem, b"class") {
                    let mut tokens = class.split_whitespace();
                    if tokens.clone().any(|t| t == "menu-toggle") {
                        info.has_menu_toggle = true;
                    }
                    if tokens.any(|t| t == "nav-links") {
                        info.has_nav_links = true;
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => anyhow::bail!(
                "template parse error at position {}: {:?}",
                reader.error_position(),
                e
            ),
        }
    }

    Ok(info)
}

/// Collected writes for one mount point.
#[derive(Debug, Default)]
struct MountOps {
    html: Option<String>,
    attrs: Vec<(String, String)>,
}

/// Apply mount writes to a template, optionally injecting the menu-toggle
/// script before `</body>`.
///
/// Writes whose identifier matches no element are dropped silently; the
/// template decides which mount points exist.
pub fn apply_writes(
    template: &[u8],
    writes: &[MountWrite],
    wire_menu: bool,
) -> Result<Vec<u8>> {
    let ops = group_writes(writes);

    let mut reader = create_reader(template);
    let mut writer = Writer::new(Cursor::new(Vec::with_capacity(template.len())));

    loop {
        match reader.read_event() {
            Ok(Event::Start(elem)) => {
                match ops_for(&ops, &elem) {
                    Some(op) => {
                        let new_elem = apply_attr_ops(&elem, &op.attrs);
                        writer.write_event(Event::Start(new_elem))?;
                        if let Some(html) = &op.html {
                            // Drop the placeholder children, emit the
                            // rendered HTML raw in their place.
                            reader.read_to_end(elem.name())?;
                            writer.write_event(Event::Text(BytesText::from_escaped(
                                html.as_str(),
                            )))?;
                            let tag =
                                String::from_utf8_lossy(elem.name().as_ref()).into_owned();
                            writer.write_event(Event::End(BytesEnd::new(tag)))?;
                        }
                    }
                    None => writer.write_event(Event::Start(elem))?,
                }
            }
            Ok(Event::Empty(elem)) => {
                match ops_for(&ops, &elem) {
                    Some(op) => {
                        let new_elem = apply_attr_ops(&elem, &op.attrs);
                        if let Some(html) = &op.html {
                            // A self-closed mount point gains children.
                            let tag =
                                String::from_utf8_lossy(elem.name().as_ref()).into_owned();
                            writer.write_event(Event::Start(new_elem))?;
                            writer.write_event(Event::Text(BytesText::from_escaped(
                                html.as_str(),
                            )))?;
                            writer.write_event(Event::End(BytesEnd::new(tag)))?;
                        } else {
                            writer.write_event(Event::Empty(new_elem))?;
                        }
                    }
                    None => writer.write_event(Event::Empty(elem))?,
                }
            }
            Ok(Event::End(elem)) => {
                if wire_menu && elem.name().as_ref() == b"body" {
                    writer.write_event(Event::Text(BytesText::from_escaped(
                        MENU_TOGGLE_SCRIPT,
                    )))?;
                }
                writer.write_event(Event::End(elem))?;
            }
            Ok(Event::Eof) => break,
            Ok(event) => writer.write_event(event)?,
            Err(e) => anyhow::bail!(
                "template parse error at position {}: {:?}",
                reader.error_position(),
                e
            ),
        }
    }

    Ok(writer.into_inner().into_inner())
}

fn create_reader(content: &[u8]) -> Reader<&[u8]> {
    let mut reader = Reader::from_reader(content);
    reader.config_mut().trim_text(false);
    reader.config_mut().enable_all_checks(false);
    reader
}

/// Look up the write set targeting an element, by `id` attribute.
fn ops_for<'o>(ops: &'o HashMap<String, MountOps>, elem: &BytesStart<'_>) -> Option<&'o MountOps> {
    if ops.is_empty() {
        return None;
    }
    attr_value(elem, b"id").and_then(|id| ops.get(&id))
}

fn group_writes(writes: &[MountWrite]) -> HashMap<String, MountOps> {
    let mut ops: HashMap<String, MountOps> = HashMap::new();
    for write in writes {
        let entry = ops.entry(write.id().to_string()).or_default();
        match write {
            MountWrite::Html { html, .. } => entry.html = Some(html.clone()),
            MountWrite::Attr { name, value, .. } => {
                entry.attrs.push((name.clone(), value.clone()));
            }
        }
    }
    ops
}

/// Get an attribute value as an owned string.
fn attr_value(elem: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    elem.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == name)
        .map(|attr| String::from_utf8_lossy(attr.value.as_ref()).into_owned())
}

/// Rebuild an element with attribute writes applied: existing attributes
/// are overwritten in place, new ones appended.
fn apply_attr_ops(elem: &BytesStart<'_>, attrs: &[(String, String)]) -> BytesStart<'static> {
    let tag = String::from_utf8_lossy(elem.name().as_ref()).into_owned();
    let mut new_elem = BytesStart::new(tag);
    let mut applied = vec![false; attrs.len()];

    for attr in elem.attributes().flatten() {
        let key = attr.key.as_ref();
        match attrs.iter().position(|(name, _)| name.as_bytes() == key) {
            Some(i) => {
                new_elem.push_attribute((key, attrs[i].1.as_bytes()));
                applied[i] = true;
            }
            None => new_elem.push_attribute((key, attr.value.as_ref())),
        }
    }

    for (i, (name, value)) in attrs.iter().enumerate() {
        if !applied[i] {
            new_elem.push_attribute((name.as_str(), value.as_str()));
        }
    }

    new_elem
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::CommonMark;
    use std::fs;
    use tempfile::TempDir;

    const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Chi Siamo</title></head>
<body data-page="chi-siamo">
<nav id="main-nav"><a href="index.html">static fallback</a></nav>
<h1 id="page-title">Placeholder title</h1>
<div id="story-body"><p>Placeholder story</p></div>
<h2 id="assoc-title">Placeholder</h2>
<ul id="assoc-list"></ul>
<footer id="main-footer">static footer</footer>
</body>
</html>"#;

    fn data_dir(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(format!("{name}.json")), content).unwrap();
        }
        dir
    }

    fn local(dir: &TempDir) -> DataSource {
        DataSource::Local {
            dir: dir.path().to_path_buf(),
        }
    }

    const COMMON_JSON: &str = r#"{
        "siteName": "X",
        "footerText": "Y",
        "nav": [
            { "href": "index.html", "text": "Home" },
            { "href": "chi-siamo.html", "text": "About" }
        ]
    }"#;

    #[test]
    fn test_scan_extracts_page_id() {
        let info = scan_template(TEMPLATE.as_bytes()).unwrap();
        assert_eq!(info.page_id.as_deref(), Some("chi-siamo"));
        assert!(!info.has_menu_toggle);
        assert!(!info.has_nav_links);
    }

    #[test]
    fn test_scan_detects_menu_markers() {
        let html = br#"<body><div class="menu-toggle">x</div><ul class="nav-links open"></ul></body>"#;
        let info = scan_template(html).unwrap();
        assert!(info.page_id.is_none());
        assert!(info.has_menu_toggle);
        assert!(info.has_nav_links);
    }

    #[test]
    fn test_apply_html_write_replaces_children() {
        let writes = vec![MountWrite::Html {
            id: "page-title".to_string(),
            html: "Nuovo titolo".to_string(),
        }];
        let out = apply_writes(TEMPLATE.as_bytes(), &writes, false).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains(r#"<h1 id="page-title">Nuovo titolo</h1>"#));
        assert!(!out.contains("Placeholder title"));
        // Untouched mount points keep their placeholder content.
        assert!(out.contains("<p>Placeholder story</p>"));
    }

    #[test]
    fn test_apply_attr_write_overwrites_existing() {
        let html = br#"<body><a id="hero-cta" href="old.html" class="btn">Go</a></body>"#;
        let writes = vec![MountWrite::Attr {
            id: "hero-cta".to_string(),
            name: "href".to_string(),
            value: "servizi.html".to_string(),
        }];
        let out = String::from_utf8(apply_writes(html, &writes, false).unwrap()).unwrap();

        assert!(out.contains(r#"href="servizi.html""#));
        assert!(out.contains(r#"class="btn""#));
        assert!(!out.contains("old.html"));
        assert!(out.contains(">Go</a>"));
    }

    #[test]
    fn test_apply_attr_write_appends_missing() {
        let html = br#"<body><a id="contact-email-link">mail</a></body>"#;
        let writes = vec![MountWrite::Attr {
            id: "contact-email-link".to_string(),
            name: "href".to_string(),
            value: "mailto:e@x.it".to_string(),
        }];
        let out = String::from_utf8(apply_writes(html, &writes, false).unwrap()).unwrap();
        assert!(out.contains(r#"<a id="contact-email-link" href="mailto:e@x.it">mail</a>"#));
    }

    #[test]
    fn test_apply_to_self_closed_mount_point() {
        let html = br#"<body><div id="services-list"/></body>"#;
        let writes = vec![MountWrite::Html {
            id: "services-list".to_string(),
            html: "<p>card</p>".to_string(),
        }];
        let out = String::from_utf8(apply_writes(html, &writes, false).unwrap()).unwrap();
        assert!(out.contains(r#"<div id="services-list"><p>card</p></div>"#));
    }

    #[test]
    fn test_raw_html_is_not_escaped() {
        let writes = vec![MountWrite::Html {
            id: "story-body".to_string(),
            html: "<p>converted &rarr;</p>".to_string(),
        }];
        let out =
            String::from_utf8(apply_writes(TEMPLATE.as_bytes(), &writes, false).unwrap()).unwrap();
        assert!(out.contains("<p>converted &rarr;</p>"));
        assert!(!out.contains("&lt;p&gt;"));
    }

    #[test]
    fn test_menu_script_injected_before_body_end() {
        let out =
            String::from_utf8(apply_writes(TEMPLATE.as_bytes(), &[], true).unwrap()).unwrap();
        let script = out.find("menu-toggle").unwrap();
        let body_end = out.find("</body>").unwrap();
        assert!(script < body_end);
        assert!(out.contains(r#"classList.toggle("open")"#));
    }

    #[test]
    fn test_menu_script_not_injected_without_wiring_targets() {
        let out =
            String::from_utf8(apply_writes(TEMPLATE.as_bytes(), &[], false).unwrap()).unwrap();
        assert!(!out.contains("<script>"));
    }

    #[test]
    fn test_hydrate_end_to_end_chi_siamo() {
        let dir = data_dir(&[
            ("common", COMMON_JSON),
            (
                "chi-siamo",
                r#"{
                    "title": "Chi Siamo",
                    "story": "La **storia**",
                    "association": { "title": "ASD", "items": ["Uno", "Due"] }
                }"#,
            ),
        ]);

        let out = hydrate_page(TEMPLATE.as_bytes(), &local(&dir), &CommonMark).unwrap();
        let out = String::from_utf8(out).unwrap();

        // Footer embeds fetched site name and footer text.
        assert!(out.contains("<h4>X</h4>"));
        assert!(out.contains(">Y</div>"));
        // "About" is active, "Home" is not.
        assert!(out.contains(r#"<a href="chi-siamo.html" class="active">About</a>"#));
        assert!(out.contains(r#"<li><a href="index.html">Home</a></li>"#));
        // Page fields landed, Markdown converted.
        assert!(out.contains(r#"<h1 id="page-title">Chi Siamo</h1>"#));
        assert!(out.contains("<strong>storia</strong>"));
        assert!(out.contains("<li>Uno</li><li>Due</li>"));
        // Nav was rebuilt, so the wiring script is present.
        assert!(out.contains("classList.toggle"));
        assert!(!out.contains("static fallback"));
    }

    #[test]
    fn test_hydrate_page_fetch_failure_leaves_mounts_untouched() {
        // Common document present, page document missing.
        let dir = data_dir(&[("common", COMMON_JSON)]);

        let out = hydrate_page(TEMPLATE.as_bytes(), &local(&dir), &CommonMark).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("Placeholder title"));
        assert!(out.contains("<p>Placeholder story</p>"));
        // Common stage still rendered.
        assert!(out.contains("<h4>X</h4>"));
    }

    #[test]
    fn test_hydrate_everything_unavailable_keeps_static_fallback() {
        let dir = data_dir(&[]);

        let out = hydrate_page(TEMPLATE.as_bytes(), &local(&dir), &CommonMark).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("static fallback"));
        assert!(out.contains("static footer"));
        assert!(out.contains("Placeholder title"));
        // No wiring targets exist, so no script.
        assert!(!out.contains("<script>"));
    }

    #[test]
    fn test_hydrate_unrecognized_page_id_mutates_nothing_page_side() {
        let template = br#"<html><body data-page="galleria">
<h1 id="page-title">Static</h1>
</body></html>"#;
        // The galleria document exists and is fetched, but no routine matches.
        let dir = data_dir(&[("galleria", r#"{ "title": "Galleria" }"#)]);

        let out = hydrate_page(template, &local(&dir), &CommonMark).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains(r#"<h1 id="page-title">Static</h1>"#));
    }

    #[test]
    fn test_hydrate_malformed_page_document_is_atomic() {
        let template = br#"<html><body data-page="eventi">
<h2 id="grest-title">G</h2><div id="grest-body">gb</div>
<h2 id="party-title">P</h2>
</body></html>"#;
        // `party` section missing: the whole document is rejected, no
        // mount point is touched.
        let dir = data_dir(&[(
            "eventi",
            r#"{ "grest": { "title": "Grest 2025", "body": "x" }, "gita": { "title": "G", "body": "y" } }"#,
        )]);

        let out = hydrate_page(template, &local(&dir), &CommonMark).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains(r#"<h2 id="grest-title">G</h2>"#));
        assert!(!out.contains("Grest 2025"));
    }

    #[test]
    fn test_template_without_page_id_skips_page_stage() {
        let template = br#"<html><body><footer id="main-footer">old</footer></body></html>"#;
        let dir = data_dir(&[("common", COMMON_JSON)]);

        let out = hydrate_page(template, &local(&dir), &CommonMark).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("<h4>X</h4>"));
        assert!(!out.contains(">old<"));
    }
}
