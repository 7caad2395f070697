use serde::{Deserialize, Serialize};

use super::default_from_blank;
use crate::manage::records::is_blank;
use crate::manage::{Completable, Completion, Document, PlanLimits, Record, RecordList};

/// One phase of the method. The tag is editable, so it is seeded from the
/// position on creation but not renumbered afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Step {
    pub tag: String,
    pub title: String,
    pub desc: String,
}

default_from_blank!(Step);

impl Record for Step {
    const KIND: &'static str = "steps";
    const LIMITS: PlanLimits = PlanLimits::new(4, 8);

    fn blank(position: usize) -> Self {
        Step {
            tag: format!("FASE {:02}", position + 1),
            title: String::new(),
            desc: String::new(),
        }
    }

    fn is_complete(&self, _has_upload: bool) -> bool {
        !is_blank(&self.tag) && !is_blank(&self.title) && !is_blank(&self.desc)
    }

    fn has_content(&self) -> bool {
        !is_blank(&self.title) || !is_blank(&self.desc)
    }

    fn count_fields(&self, c: &mut Completion) {
        c.texts([self.tag.as_str(), self.title.as_str(), self.desc.as_str()]);
    }

    fn label(&self) -> String {
        if is_blank(&self.title) {
            self.tag.clone()
        } else {
            format!("{}: {}", self.tag, self.title)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategicTitle {
    pub text: String,
    pub highlight: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Strategic {
    pub badge: String,
    pub main_title: StrategicTitle,
    pub description: String,
    pub steps: RecordList<Step>,
    pub coordinates: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategicDocument {
    pub strategic: Strategic,
}

impl Document for StrategicDocument {
    const TYPE: &'static str = "strategic";
}

impl Completable for StrategicDocument {
    fn count_fields(&self, c: &mut Completion) {
        let s = &self.strategic;
        c.text(&s.badge);
        c.texts([s.main_title.text.as_str(), s.main_title.highlight.as_str()]);
        c.text(&s.description);
        s.steps.count_fields(c);
        c.text(&s.coordinates);
    }
}
