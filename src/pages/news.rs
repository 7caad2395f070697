use serde::{Deserialize, Serialize};

use super::default_from_blank;
use crate::manage::records::is_blank;
use crate::manage::{Completion, PlanLimits, Record, UploadSlot};

/// A press/newsletter card. `fallback` is the text shown while the image loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsItem {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub fallback: String,
    pub title: String,
    pub image: String,
    pub link: String,
}

default_from_blank!(NewsItem);

impl Record for NewsItem {
    const KIND: &'static str = "news";
    const LIMITS: PlanLimits = PlanLimits::new(5, 10);
    const UPLOAD: Option<UploadSlot> = Some(UploadSlot::Image);

    fn blank(_position: usize) -> Self {
        NewsItem {
            id: String::new(),
            fallback: String::new(),
            title: String::new(),
            image: String::new(),
            link: String::new(),
        }
    }

    fn is_complete(&self, _has_upload: bool) -> bool {
        !is_blank(&self.title) && !is_blank(&self.fallback)
    }

    fn has_content(&self) -> bool {
        [&self.title, &self.fallback, &self.link, &self.image]
            .iter()
            .any(|s| !is_blank(s))
    }

    fn count_fields(&self, c: &mut Completion) {
        c.texts([
            self.title.as_str(),
            self.fallback.as_str(),
            self.link.as_str(),
            self.image.as_str(),
        ]);
    }

    fn label(&self) -> String {
        self.title.clone()
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.fallback.as_str()]
    }

    fn id(&self) -> Option<&str> {
        Some(&self.id)
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}
