use serde::{Deserialize, Serialize};

use super::default_from_blank;
use crate::manage::records::is_blank;
use crate::manage::{Completable, Completion, Document, PlanLimits, Record, RecordList};

/// A numbered service card; `id` is its two-digit position ("01", "02", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceItem {
    pub id: String,
    pub title: String,
    pub desc: String,
    pub icon: String,
}

default_from_blank!(ServiceItem);

fn number(position: usize) -> String {
    format!("{:02}", position + 1)
}

impl Record for ServiceItem {
    const KIND: &'static str = "services";
    const LIMITS: PlanLimits = PlanLimits::new(6, 8);
    const NUMBERED: bool = true;

    fn blank(position: usize) -> Self {
        let icon = if position == 0 {
            "ph:chart-line-up-bold"
        } else {
            "ph:star-bold"
        };
        ServiceItem {
            id: number(position),
            title: String::new(),
            desc: String::new(),
            icon: icon.to_string(),
        }
    }

    fn is_complete(&self, _has_upload: bool) -> bool {
        !is_blank(&self.title) && !is_blank(&self.desc) && !is_blank(&self.icon)
    }

    fn has_content(&self) -> bool {
        !is_blank(&self.title) || !is_blank(&self.desc)
    }

    fn count_fields(&self, c: &mut Completion) {
        c.texts([self.title.as_str(), self.desc.as_str(), self.icon.as_str()]);
    }

    fn label(&self) -> String {
        self.title.clone()
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.desc.as_str()]
    }

    fn id(&self) -> Option<&str> {
        Some(&self.id)
    }

    fn renumber(&mut self, position: usize) {
        self.id = number(position);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesTitle {
    pub main: String,
    pub highlight: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServicesArsenal {
    pub badge: String,
    pub title: ServicesTitle,
    pub services: RecordList<ServiceItem>,
    pub cta_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServicesDocument {
    pub services_arsenal: ServicesArsenal,
}

impl Document for ServicesDocument {
    const TYPE: &'static str = "services";
}

impl Completable for ServicesDocument {
    fn count_fields(&self, c: &mut Completion) {
        let s = &self.services_arsenal;
        c.text(&s.badge);
        c.texts([s.title.main.as_str(), s.title.highlight.as_str()]);
        s.services.count_fields(c);
        c.text(&s.cta_text);
    }
}
