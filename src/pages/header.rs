use serde::{Deserialize, Serialize};

use super::default_from_blank;
use crate::manage::records::is_blank;
use crate::manage::{Completable, Completion, Document, PlanLimits, Record, RecordList};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Logo {
    pub text_first: String,
    pub text_second: String,
    pub accent_color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavItem {
    pub label: String,
    pub section_id: String,
    pub is_external: bool,
}

default_from_blank!(NavItem);

impl Record for NavItem {
    const KIND: &'static str = "navigation";
    const LIMITS: PlanLimits = PlanLimits::new(6, 10);

    fn blank(_position: usize) -> Self {
        NavItem {
            label: String::new(),
            section_id: String::new(),
            is_external: false,
        }
    }

    fn is_complete(&self, _has_upload: bool) -> bool {
        !is_blank(&self.label) && !is_blank(&self.section_id)
    }

    fn has_content(&self) -> bool {
        !is_blank(&self.label) || !is_blank(&self.section_id)
    }

    // the external flag always has a value, so it always counts as filled
    fn count_fields(&self, c: &mut Completion) {
        c.texts([self.label.as_str(), self.section_id.as_str()]);
        c.field(true);
    }

    fn label(&self) -> String {
        self.label.clone()
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.label.as_str(), self.section_id.as_str()]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    pub button_text: String,
    pub whatsapp_number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderDocument {
    pub logo: Logo,
    pub navigation: RecordList<NavItem>,
    pub contact: Contact,
}

impl Document for HeaderDocument {
    const TYPE: &'static str = "header";
}

impl Completable for HeaderDocument {
    fn count_fields(&self, c: &mut Completion) {
        c.texts([
            self.logo.text_first.as_str(),
            self.logo.text_second.as_str(),
            self.logo.accent_color.as_str(),
        ]);
        self.navigation.count_fields(c);
        c.texts([
            self.contact.button_text.as_str(),
            self.contact.whatsapp_number.as_str(),
        ]);
    }
}
