//! Page-specific content documents.
//!
//! Each recognized page identifier has its own payload shape; there is no
//! schema shared across pages. [`PageContent`] carries one variant per
//! identifier so the renderer's dispatch is an exhaustive `match` - adding
//! a page kind without a rendering routine is a compile error, not a
//! silent no-op.

use serde::Deserialize;
use std::fmt;

/// The set of page identifiers with a rendering routine.
///
/// A template declares its identifier via `data-page` on `<body>`.
/// Identifiers outside this set still get their document fetched, but
/// produce no writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageId {
    Home,
    ChiSiamo,
    Istruttori,
    ScuolaDressage,
    Servizi,
    Eventi,
    Contatti,
}

impl PageId {
    /// Parse a `data-page` value. Returns `None` for unrecognized identifiers.
    pub fn parse(id: &str) -> Option<Self> {
        match id {
            "home" => Some(Self::Home),
            "chi-siamo" => Some(Self::ChiSiamo),
            "istruttori" => Some(Self::Istruttori),
            "scuola-dressage" => Some(Self::ScuolaDressage),
            "servizi" => Some(Self::Servizi),
            "eventi" => Some(Self::Eventi),
            "contatti" => Some(Self::Contatti),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::ChiSiamo => "chi-siamo",
            Self::Istruttori => "istruttori",
            Self::ScuolaDressage => "scuola-dressage",
            Self::Servizi => "servizi",
            Self::Eventi => "eventi",
            Self::Contatti => "contatti",
        }
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hero block on the home page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroSection {
    pub title: String,
    pub subtitle: String,
    /// Call-to-action label
    pub cta: String,
    /// Call-to-action link target
    pub cta_link: String,
}

/// A generic titled block with a Markdown body.
#[derive(Debug, Clone, Deserialize)]
pub struct Section {
    pub title: String,
    pub body: String,
}

/// One service card on the home page.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceCard {
    pub title: String,
    pub desc: String,
    pub link: String,
}

/// Association block on the chi-siamo page.
#[derive(Debug, Clone, Deserialize)]
pub struct Association {
    pub title: String,
    /// Absent list -> the list mount point is left untouched.
    #[serde(default)]
    pub items: Option<Vec<String>>,
}

/// One team member card on the istruttori page.
#[derive(Debug, Clone, Deserialize)]
pub struct TeamMember {
    pub name: String,
    pub role: String,
    pub desc: String,
}

/// Pensione block on the servizi page: a section plus a feature list.
#[derive(Debug, Clone, Deserialize)]
pub struct PensioneSection {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub features: Option<Vec<String>>,
}

/// Contact details on the contatti page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub address: String,
    /// Raw phone value, also used as the `tel:` link target.
    pub phone: String,
    /// Pretty-printed phone; falls back to `phone` when absent.
    #[serde(default)]
    pub phone_display: Option<String>,
    pub email: String,
}

/// A page-specific content document, one variant per recognized page.
///
/// Deserialization validates the full payload up front, so rendering a
/// successfully parsed document cannot fail partway through.
#[derive(Debug, Clone)]
pub enum PageContent {
    Home {
        hero: HeroSection,
        mission: Section,
        services: Option<Vec<ServiceCard>>,
    },
    ChiSiamo {
        title: String,
        story: String,
        association: Association,
    },
    Istruttori {
        title: String,
        list: Option<Vec<TeamMember>>,
    },
    ScuolaDressage {
        base: Section,
        dressage: Section,
        pony: Section,
    },
    Servizi {
        pensione: PensioneSection,
        commerciale: Section,
    },
    Eventi {
        grest: Section,
        party: Section,
        gita: Section,
    },
    Contatti {
        info: ContactInfo,
    },
}

impl PageContent {
    /// Parse a raw JSON document as the payload shape for `id`.
    pub fn from_json(id: PageId, raw: &str) -> Result<Self, serde_json::Error> {
        // Intermediate shapes mirroring the JSON layout of each document.
        #[derive(Deserialize)]
        struct HomeDoc {
            hero: HeroSection,
            mission: Section,
            #[serde(default)]
            services: Option<Vec<ServiceCard>>,
        }
        #[derive(Deserialize)]
        struct ChiSiamoDoc {
            title: String,
            story: String,
            association: Association,
        }
        #[derive(Deserialize)]
        struct IstruttoriDoc {
            title: String,
            #[serde(default)]
            list: Option<Vec<TeamMember>>,
        }
        #[derive(Deserialize)]
        struct ScuolaDoc {
            base: Section,
            dressage: Section,
            pony: Section,
        }
        #[derive(Deserialize)]
        struct ServiziDoc {
            pensione: PensioneSection,
            commerciale: Section,
        }
        #[derive(Deserialize)]
        struct EventiDoc {
            grest: Section,
            party: Section,
            gita: Section,
        }
        #[derive(Deserialize)]
        struct ContattiDoc {
            info: ContactInfo,
        }

        Ok(match id {
            PageId::Home => {
                let doc: HomeDoc = serde_json::from_str(raw)?;
                Self::Home { hero: doc.hero, mission: doc.mission, services: doc.services }
            }
            PageId::ChiSiamo => {
                let doc: ChiSiamoDoc = serde_json::from_str(raw)?;
                Self::ChiSiamo { title: doc.title, story: doc.story, association: doc.association }
            }
            PageId::Istruttori => {
                let doc: IstruttoriDoc = serde_json::from_str(raw)?;
                Self::Istruttori { title: doc.title, list: doc.list }
            }
            PageId::ScuolaDressage => {
                let doc: ScuolaDoc = serde_json::from_str(raw)?;
                Self::ScuolaDressage { base: doc.base, dressage: doc.dressage, pony: doc.pony }
            }
            PageId::Servizi => {
                let doc: ServiziDoc = serde_json::from_str(raw)?;
                Self::Servizi { pensione: doc.pensione, commerciale: doc.commerciale }
            }
            PageId::Eventi => {
                let doc: EventiDoc = serde_json::from_str(raw)?;
                Self::Eventi { grest: doc.grest, party: doc.party, gita: doc.gita }
            }
            PageId::Contatti => {
                let doc: ContattiDoc = serde_json::from_str(raw)?;
                Self::Contatti { info: doc.info }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_id_round_trip() {
        for id in [
            PageId::Home,
            PageId::ChiSiamo,
            PageId::Istruttori,
            PageId::ScuolaDressage,
            PageId::Servizi,
            PageId::Eventi,
            PageId::Contatti,
        ] {
            assert_eq!(PageId::parse(id.as_str()), Some(id));
        }
    }

    #[test]
    fn test_page_id_unrecognized() {
        assert_eq!(PageId::parse("galleria"), None);
        assert_eq!(PageId::parse(""), None);
        assert_eq!(PageId::parse("Home"), None);
    }

    #[test]
    fn test_parse_home_document() {
        let json = r#"{
            "hero": {
                "title": "Benvenuti",
                "subtitle": "Equitazione per tutti",
                "cta": "Scopri",
                "ctaLink": "servizi.html"
            },
            "mission": { "title": "La nostra missione", "body": "**Passione** e natura" },
            "services": [
                { "title": "Scuola", "desc": "Lezioni", "link": "scuola-dressage.html" }
            ]
        }"#;
        let content = PageContent::from_json(PageId::Home, json).unwrap();
        let PageContent::Home { hero, mission, services } = content else {
            panic!("wrong variant");
        };

        assert_eq!(hero.cta_link, "servizi.html");
        assert_eq!(mission.title, "La nostra missione");
        assert_eq!(services.unwrap().len(), 1);
    }

    #[test]
    fn test_parse_home_without_services() {
        let json = r#"{
            "hero": { "title": "T", "subtitle": "S", "cta": "C", "ctaLink": "l.html" },
            "mission": { "title": "M", "body": "B" }
        }"#;
        let content = PageContent::from_json(PageId::Home, json).unwrap();
        let PageContent::Home { services, .. } = content else {
            panic!("wrong variant");
        };
        assert!(services.is_none());
    }

    #[test]
    fn test_parse_contatti_phone_display_optional() {
        let json = r#"{
            "info": {
                "address": "Via Roma 1",
                "phone": "+393486980406",
                "email": "info@example.com"
            }
        }"#;
        let PageContent::Contatti { info } =
            PageContent::from_json(PageId::Contatti, json).unwrap()
        else {
            panic!("wrong variant");
        };
        assert!(info.phone_display.is_none());
        assert_eq!(info.phone, "+393486980406");
    }

    #[test]
    fn test_missing_nested_field_rejects_whole_document() {
        // hero present but mission absent: the document parses as a whole
        // or not at all, there is no partially usable payload.
        let json = r#"{
            "hero": { "title": "T", "subtitle": "S", "cta": "C", "ctaLink": "l.html" }
        }"#;
        assert!(PageContent::from_json(PageId::Home, json).is_err());
    }
}
