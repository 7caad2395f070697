use serde::{Deserialize, Serialize};

use super::default_from_blank;
use crate::manage::records::is_blank;
use crate::manage::{Completion, PlanLimits, Record, UploadSlot};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectorItem {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: String,
}

default_from_blank!(SectorItem);

impl Record for SectorItem {
    const KIND: &'static str = "sectors";
    const LIMITS: PlanLimits = PlanLimits::new(5, 10);
    const UPLOAD: Option<UploadSlot> = Some(UploadSlot::Image);

    fn blank(_position: usize) -> Self {
        SectorItem {
            id: String::new(),
            title: String::new(),
            description: String::new(),
            image: String::new(),
        }
    }

    fn is_complete(&self, _has_upload: bool) -> bool {
        !is_blank(&self.title) && !is_blank(&self.description)
    }

    fn has_content(&self) -> bool {
        !is_blank(&self.title) || !is_blank(&self.description) || !is_blank(&self.image)
    }

    fn count_fields(&self, c: &mut Completion) {
        c.texts([
            self.title.as_str(),
            self.description.as_str(),
            self.image.as_str(),
        ]);
    }

    fn label(&self) -> String {
        self.title.clone()
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.description.as_str()]
    }

    fn id(&self) -> Option<&str> {
        Some(&self.id)
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}
