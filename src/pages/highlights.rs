use serde::{Deserialize, Serialize};

use super::default_from_blank;
use crate::manage::records::is_blank;
use crate::manage::{Completion, PlanLimits, Record, UploadSlot};

/// A short video with caption lines. The video URL is filled by the server
/// from the `video{i}` upload field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HighlightItem {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub text_lists: Vec<String>,
    pub video: String,
    pub video_duration: i64,
}

default_from_blank!(HighlightItem);

impl HighlightItem {
    pub fn add_text(&mut self) {
        self.text_lists.push(String::new());
    }

    /// Drop one caption line; the last line is cleared instead.
    pub fn remove_text(&mut self, index: usize) -> bool {
        if index >= self.text_lists.len() {
            return false;
        }
        if self.text_lists.len() == 1 {
            self.text_lists[0].clear();
        } else {
            self.text_lists.remove(index);
        }
        true
    }

    fn has_text(&self) -> bool {
        self.text_lists.iter().any(|t| !is_blank(t))
    }
}

impl Record for HighlightItem {
    const KIND: &'static str = "highlights";
    const LIMITS: PlanLimits = PlanLimits::new(5, 10);
    const UPLOAD: Option<UploadSlot> = Some(UploadSlot::Video);

    fn blank(_position: usize) -> Self {
        HighlightItem {
            id: String::new(),
            text_lists: vec![String::new()],
            video: String::new(),
            video_duration: 0,
        }
    }

    fn is_complete(&self, has_upload: bool) -> bool {
        self.has_text() && (!is_blank(&self.video) || has_upload)
    }

    fn has_content(&self) -> bool {
        self.has_text() || !is_blank(&self.video)
    }

    // one count per caption line, plus video and duration
    fn count_fields(&self, c: &mut Completion) {
        c.texts(self.text_lists.iter().map(|t| t.as_str()));
        c.text(&self.video);
        c.field(self.video_duration > 0);
    }

    fn label(&self) -> String {
        self.text_lists
            .iter()
            .find(|t| !is_blank(t))
            .cloned()
            .unwrap_or_default()
    }

    fn search_text(&self) -> Vec<&str> {
        self.text_lists.iter().map(|t| t.as_str()).collect()
    }

    fn id(&self) -> Option<&str> {
        Some(&self.id)
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}
