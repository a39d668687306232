//! Per-page rendering routines.
//!
//! One routine per [`PageContent`] variant, dispatched by an exhaustive
//! `match`. Each routine copies specific document fields into specific
//! mount points through the `set_content`/`set_attr` primitives; list
//! fields become one inline-template fragment per element, joined with no
//! separator, in input order.

use super::{MountWrite, set_attr, set_content};
use crate::content::{
    Association, ContactInfo, HeroSection, PageContent, PensioneSection, Section, ServiceCard,
    TeamMember,
};
use crate::markdown::MarkdownConverter;
use std::fmt::Write;

/// Render a parsed page document into its mount writes.
pub fn render_page(content: &PageContent, md: &dyn MarkdownConverter) -> Vec<MountWrite> {
    let mut writes = Vec::new();
    match content {
        PageContent::Home { hero, mission, services } => {
            render_home(&mut writes, hero, mission, services.as_deref(), md);
        }
        PageContent::ChiSiamo { title, story, association } => {
            render_chi_siamo(&mut writes, title, story, association, md);
        }
        PageContent::Istruttori { title, list } => {
            render_istruttori(&mut writes, title, list.as_deref(), md);
        }
        PageContent::ScuolaDressage { base, dressage, pony } => {
            render_section(&mut writes, "base", base, md);
            render_section(&mut writes, "dressage", dressage, md);
            render_section(&mut writes, "pony", pony, md);
        }
        PageContent::Servizi { pensione, commerciale } => {
            render_servizi(&mut writes, pensione, commerciale, md);
        }
        PageContent::Eventi { grest, party, gita } => {
            render_section(&mut writes, "grest", grest, md);
            render_section(&mut writes, "party", party, md);
            render_section(&mut writes, "gita", gita, md);
        }
        PageContent::Contatti { info } => {
            render_contatti(&mut writes, info, md);
        }
    }
    writes
}

fn render_home(
    writes: &mut Vec<MountWrite>,
    hero: &HeroSection,
    mission: &Section,
    services: Option<&[ServiceCard]>,
    md: &dyn MarkdownConverter,
) {
    set_content(writes, "hero-title", &hero.title, false, md);
    set_content(writes, "hero-subtitle", &hero.subtitle, false, md);
    set_content(writes, "hero-cta", &hero.cta, false, md);
    set_attr(writes, "hero-cta", "href", &hero.cta_link);

    set_content(writes, "mission-title", &mission.title, false, md);
    set_content(writes, "mission-body", &mission.body, true, md);

    if let Some(services) = services {
        let html = services.iter().fold(String::new(), |mut html, s| {
            write!(
                html,
                r#"<div class="card text-center"><h3>{}</h3><p>{}</p><br/><a href="{}" class="card-link">Scopri di più &rarr;</a></div>"#,
                s.title, s.desc, s.link
            )
            .ok();
            html
        });
        writes.push(MountWrite::Html { id: "services-list".to_string(), html });
    }
}

fn render_chi_siamo(
    writes: &mut Vec<MountWrite>,
    title: &str,
    story: &str,
    association: &Association,
    md: &dyn MarkdownConverter,
) {
    set_content(writes, "page-title", title, false, md);
    set_content(writes, "story-body", story, true, md);
    set_content(writes, "assoc-title", &association.title, false, md);

    if let Some(items) = &association.items {
        let html = items.iter().fold(String::new(), |mut html, item| {
            write!(html, "<li>{item}</li>").ok();
            html
        });
        writes.push(MountWrite::Html { id: "assoc-list".to_string(), html });
    }
}

fn render_istruttori(
    writes: &mut Vec<MountWrite>,
    title: &str,
    list: Option<&[TeamMember]>,
    md: &dyn MarkdownConverter,
) {
    set_content(writes, "page-title", title, false, md);

    if let Some(list) = list {
        let html = list.iter().fold(String::new(), |mut html, member| {
            write!(
                html,
                r#"<div class="card"><h3>{}</h3><h4 class="member-role">{}</h4><p class="justify">{}</p></div>"#,
                member.name, member.role, member.desc
            )
            .ok();
            html
        });
        writes.push(MountWrite::Html { id: "team-list".to_string(), html });
    }
}

fn render_servizi(
    writes: &mut Vec<MountWrite>,
    pensione: &PensioneSection,
    commerciale: &Section,
    md: &dyn MarkdownConverter,
) {
    set_content(writes, "pensione-title", &pensione.title, false, md);
    set_content(writes, "pensione-body", &pensione.body, true, md);

    if let Some(features) = &pensione.features {
        let html = features.iter().fold(String::new(), |mut html, feature| {
            write!(html, r#"<li class="feature-item">✓ {feature}</li>"#).ok();
            html
        });
        writes.push(MountWrite::Html { id: "pensione-features".to_string(), html });
    }

    set_content(writes, "commerciale-title", &commerciale.title, false, md);
    set_content(writes, "commerciale-body", &commerciale.body, true, md);
}

/// Render a paired title/Markdown-body block under `{prefix}-title` and
/// `{prefix}-body` (scuola-dressage and eventi pages).
fn render_section(
    writes: &mut Vec<MountWrite>,
    prefix: &str,
    section: &Section,
    md: &dyn MarkdownConverter,
) {
    set_content(writes, &format!("{prefix}-title"), &section.title, false, md);
    set_content(writes, &format!("{prefix}-body"), &section.body, true, md);
}

fn render_contatti(writes: &mut Vec<MountWrite>, info: &ContactInfo, md: &dyn MarkdownConverter) {
    set_content(writes, "contact-address", &info.address, false, md);

    // Display variant falls back to the raw phone value.
    let phone_display = info.phone_display.as_deref().unwrap_or(&info.phone);
    set_content(writes, "contact-phone", phone_display, false, md);
    set_attr(writes, "contact-phone-link", "href", &info.phone);

    set_content(writes, "contact-email", &info.email, false, md);
    set_attr(writes, "contact-email-link", "href", &format!("mailto:{}", info.email));
}
