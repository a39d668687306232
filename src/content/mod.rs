//! Typed content documents.
//!
//! Every page load consumes two JSON documents: a shared one (navigation,
//! site name, footer text) and a page-specific one whose shape depends on
//! the page identifier. Both are deserialized into the types here before
//! any rendering happens, so a malformed document is rejected as a whole
//! instead of failing halfway through a render.
//!
//! | Document | Type |
//! |----------|------|
//! | `_data/common.json` | [`CommonContent`] |
//! | `_data/<page>.json` | [`PageContent`] (variant selected by [`PageId`]) |

mod common;
mod page;

pub use common::{CommonContent, NavEntry};
pub use page::{
    Association, ContactInfo, HeroSection, PageContent, PageId, PensioneSection, Section,
    ServiceCard, TeamMember,
};
