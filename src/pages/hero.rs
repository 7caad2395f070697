use serde::{Deserialize, Serialize};

use super::Cta;
use crate::manage::{Completable, Completion, Document};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Headline {
    pub text_normal: String,
    pub text_accent: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Hero {
    pub badge: String,
    pub headline: Headline,
    pub subheadline: String,
    pub primary_cta: Cta,
    pub secondary_cta: Cta,
    pub trust_badge: String,
}

/// Landing hero: badge, two-tone headline and two CTAs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroDocument {
    pub hero: Hero,
}

impl Document for HeroDocument {
    const TYPE: &'static str = "headline";
}

impl Completable for HeroDocument {
    fn count_fields(&self, c: &mut Completion) {
        let h = &self.hero;
        c.text(&h.badge);
        c.texts([h.headline.text_normal.as_str(), h.headline.text_accent.as_str()]);
        c.text(&h.subheadline);
        h.primary_cta.count_fields(c);
        h.secondary_cta.count_fields(c);
        c.text(&h.trust_badge);
    }
}
