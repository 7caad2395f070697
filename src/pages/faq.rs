use serde::{Deserialize, Serialize};

use super::default_from_blank;
use crate::manage::records::is_blank;
use crate::manage::{Completion, PlanLimits, Record};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaqItem {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub question: String,
    pub answer: String,
}

default_from_blank!(FaqItem);

impl FaqItem {
    pub fn new(question: &str, answer: &str) -> Self {
        FaqItem {
            id: String::new(),
            question: question.to_string(),
            answer: answer.to_string(),
        }
    }
}

impl Record for FaqItem {
    const KIND: &'static str = "faq";
    const LIMITS: PlanLimits = PlanLimits::new(8, 12);

    fn blank(_position: usize) -> Self {
        FaqItem::new("", "")
    }

    fn is_complete(&self, _has_upload: bool) -> bool {
        !is_blank(&self.question) && !is_blank(&self.answer)
    }

    fn has_content(&self) -> bool {
        !is_blank(&self.question) || !is_blank(&self.answer)
    }

    fn count_fields(&self, c: &mut Completion) {
        c.texts([self.question.as_str(), self.answer.as_str()]);
    }

    fn label(&self) -> String {
        self.question.clone()
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.question.as_str(), self.answer.as_str()]
    }

    fn id(&self) -> Option<&str> {
        Some(&self.id)
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}
