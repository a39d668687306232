//! Navigation and footer rendering from the shared content document.

use super::MountWrite;
use crate::content::CommonContent;
use std::fmt::Write;

/// Mount point replaced with the rebuilt navigation.
pub const NAV_MOUNT: &str = "main-nav";
/// Mount point replaced with the footer layout.
pub const FOOTER_MOUNT: &str = "main-footer";

// Contact block constants. These are baked into the renderer, not sourced
// from the shared document.
const CONTACT_EMAIL: &str = "passioneassoluta@hotmail.com";
const CONTACT_PHONE_DISPLAY: &str = "+39 348 6980406";
const CONTACT_PHONE_TEL: &str = "+393486980406";
const FOOTER_TAGLINE: &str = "Eccellenza e passione nel cuore della natura.";

const LOGO_SRC: &str = "assets/logo.png";
const LOGO_ALT: &str = "CI Passione Assoluta";

/// Render the shared document into navigation and footer writes.
///
/// `page_id` is the raw `data-page` value of the current template (possibly
/// unrecognized - active-link marking works off the string, not the typed
/// page set).
pub fn render_common(data: &CommonContent, page_id: Option<&str>) -> Vec<MountWrite> {
    vec![
        MountWrite::Html {
            id: NAV_MOUNT.to_string(),
            html: nav_html(data, page_id),
        },
        MountWrite::Html {
            id: FOOTER_MOUNT.to_string(),
            html: footer_html(data),
        },
    ]
}

/// Active-link rule, exactly two cases:
/// the page identifier equals the target with a trailing `.html` stripped,
/// or the page is `home` and the target is the site root document.
fn is_active(page_id: Option<&str>, href: &str) -> bool {
    let Some(page_id) = page_id else {
        return false;
    };
    page_id == href.strip_suffix(".html").unwrap_or(href)
        || (page_id == "home" && href == "index.html")
}

fn nav_html(data: &CommonContent, page_id: Option<&str>) -> String {
    let mut html = String::new();

    write!(
        html,
        r#"<a href="index.html" class="logo"><img src="{LOGO_SRC}" alt="{LOGO_ALT}" class="logo-img"/></a>"#
    )
    .ok();

    html.push_str(r#"<ul class="nav-links">"#);
    for entry in &data.nav {
        let class = if is_active(page_id, &entry.href) {
            r#" class="active""#
        } else {
            ""
        };
        write!(
            html,
            r#"<li><a href="{}"{class}>{}</a></li>"#,
            entry.href, entry.text
        )
        .ok();
    }
    html.push_str("</ul>");

    html.push_str(r#"<div class="menu-toggle">&#9776;</div>"#);
    html
}

fn footer_html(data: &CommonContent) -> String {
    format!(
        r#"<div class="container">
    <div class="footer-content">
        <div class="footer-col">
            <h4>{site_name}</h4>
            <p>{FOOTER_TAGLINE}</p>
        </div>
        <div class="footer-col">
            <h4>Contatti</h4>
            <p>Email: <a href="mailto:{CONTACT_EMAIL}">{CONTACT_EMAIL}</a></p>
            <p>Tel: <a href="tel:{CONTACT_PHONE_TEL}">{CONTACT_PHONE_DISPLAY}</a></p>
        </div>
    </div>
    <div class="text-center footer-note">{footer_text}</div>
</div>"#,
        site_name = data.site_name,
        footer_text = data.footer_text,
    )
}
