use serde::{Deserialize, Serialize};

use super::Cta;
use crate::manage::records::is_blank;
use crate::manage::{Completable, Completion, Document, PlanLimits, Record, RecordList};

/// One rotating phrase; stored as a bare string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Phrase(pub String);

impl Record for Phrase {
    const KIND: &'static str = "phrases";
    const LIMITS: PlanLimits = PlanLimits::new(6, 10);

    fn blank(_position: usize) -> Self {
        Phrase(String::new())
    }

    fn is_complete(&self, _has_upload: bool) -> bool {
        !is_blank(&self.0)
    }

    fn has_content(&self) -> bool {
        self.is_complete(false)
    }

    fn count_fields(&self, c: &mut Completion) {
        c.text(&self.0);
    }

    fn label(&self) -> String {
        self.0.clone()
    }

    fn search_text(&self) -> Vec<&str> {
        vec![self.0.as_str()]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MainTitle {
    pub light: String,
    pub italic: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AntithesisFooter {
    pub headline: String,
    pub accent: String,
    pub subtext: String,
    pub cta: Cta,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Antithesis {
    pub badge: String,
    pub main_title: MainTitle,
    pub phrases: RecordList<Phrase>,
    pub footer: AntithesisFooter,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AntithesisDocument {
    pub antithesis: Antithesis,
}

impl Document for AntithesisDocument {
    const TYPE: &'static str = "antithesis";
}

impl Completable for AntithesisDocument {
    fn count_fields(&self, c: &mut Completion) {
        let a = &self.antithesis;
        c.text(&a.badge);
        c.texts([a.main_title.light.as_str(), a.main_title.italic.as_str()]);
        a.phrases.count_fields(c);
        c.texts([
            a.footer.headline.as_str(),
            a.footer.accent.as_str(),
            a.footer.subtext.as_str(),
        ]);
        a.footer.cta.count_fields(c);
    }
}
