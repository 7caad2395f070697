//! Page schemas: one document or record type per admin page.
//!
//! Field names serialize to the camelCase JSON the public site reads.

use serde::{Deserialize, Serialize};

use crate::manage::Completion;

pub mod antithesis;
pub mod authority;
pub mod faq;
pub mod footer;
pub mod header;
pub mod hero;
pub mod highlights;
pub mod news;
pub mod sectors;
pub mod services;
pub mod showcase;
pub mod strategic;

pub use antithesis::{AntithesisDocument, Phrase};
pub use authority::{AuthorityDocument, StatItem};
pub use faq::FaqItem;
pub use footer::{FooterDocument, FooterLink};
pub use header::{HeaderDocument, NavItem};
pub use hero::HeroDocument;
pub use highlights::HighlightItem;
pub use news::NewsItem;
pub use sectors::SectorItem;
pub use services::{ServiceItem, ServicesDocument};
pub use showcase::ShowcaseDocument;
pub use strategic::{Step, StrategicDocument};

/// Call-to-action button.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cta {
    pub text: String,
    pub link: String,
}

impl Cta {
    pub fn count_fields(&self, c: &mut Completion) {
        c.texts([self.text.as_str(), self.link.as_str()]);
    }
}

/// An image reference with its alt text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageRef {
    pub src: String,
    pub alt: String,
}

impl ImageRef {
    pub fn count_fields(&self, c: &mut Completion) {
        c.texts([self.src.as_str(), self.alt.as_str()]);
    }
}

/// Shared by record types whose blank form is their `Default`.
macro_rules! default_from_blank {
    ($($t:ty),+) => {
        $(impl Default for $t {
            fn default() -> Self {
                <$t as $crate::manage::Record>::blank(0)
            }
        })+
    };
}
pub(crate) use default_from_blank;
