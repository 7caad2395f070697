use serde::{Deserialize, Serialize};

use super::default_from_blank;
use crate::manage::records::is_blank;
use crate::manage::{Completable, Completion, Document, PlanLimits, Record, RecordList};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FooterCta {
    pub badge: String,
    pub headline_main: String,
    pub headline_italic: String,
    pub headline_end: String,
    pub button_text: String,
    pub whatsapp_link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterLink {
    pub label: String,
    pub href: String,
}

default_from_blank!(FooterLink);

impl Record for FooterLink {
    const KIND: &'static str = "links";
    const LIMITS: PlanLimits = PlanLimits::new(4, 6);

    fn blank(_position: usize) -> Self {
        FooterLink {
            label: String::new(),
            href: String::new(),
        }
    }

    fn is_complete(&self, _has_upload: bool) -> bool {
        !is_blank(&self.label) && !is_blank(&self.href)
    }

    fn has_content(&self) -> bool {
        !is_blank(&self.label) || !is_blank(&self.href)
    }

    fn count_fields(&self, c: &mut Completion) {
        c.texts([self.label.as_str(), self.href.as_str()]);
    }

    fn label(&self) -> String {
        self.label.clone()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterNavigation {
    pub title: String,
    pub links: RecordList<FooterLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FooterInfo {
    pub title: String,
    pub address: String,
    pub service_area: String,
    pub founded_text: String,
    pub copyright: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Footer {
    pub cta: FooterCta,
    pub navigation: FooterNavigation,
    pub info: FooterInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterDocument {
    pub footer: Footer,
}

impl Document for FooterDocument {
    const TYPE: &'static str = "footer";
}

impl Completable for FooterDocument {
    fn count_fields(&self, c: &mut Completion) {
        let f = &self.footer;
        c.texts([
            f.cta.badge.as_str(),
            f.cta.headline_main.as_str(),
            f.cta.headline_italic.as_str(),
            f.cta.headline_end.as_str(),
            f.cta.button_text.as_str(),
            f.cta.whatsapp_link.as_str(),
        ]);
        c.text(&f.navigation.title);
        f.navigation.links.count_fields(c);
        c.texts([
            f.info.title.as_str(),
            f.info.address.as_str(),
            f.info.service_area.as_str(),
            f.info.founded_text.as_str(),
            f.info.copyright.as_str(),
        ]);
    }
}
