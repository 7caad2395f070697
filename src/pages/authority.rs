use serde::{Deserialize, Serialize};

use super::{default_from_blank, ImageRef};
use crate::manage::records::is_blank;
use crate::manage::{Completable, Completion, Document, PlanLimits, Record, RecordList};

pub const DEFAULT_STAT_ICON: &str = "ph:graduation-cap-bold";
pub const NEW_STAT_ICON: &str = "ph:star-bold";

/// A credential tile. Older documents used `title` for the label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredStat")]
pub struct StatItem {
    pub label: String,
    pub desc: String,
    pub icon: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct StoredStat {
    label: String,
    title: String,
    desc: String,
    icon: Option<String>,
}

impl From<StoredStat> for StatItem {
    fn from(s: StoredStat) -> Self {
        StatItem {
            label: if is_blank(&s.label) { s.title } else { s.label },
            desc: s.desc,
            icon: s.icon.unwrap_or_else(|| DEFAULT_STAT_ICON.to_string()),
        }
    }
}

default_from_blank!(StatItem);

impl Record for StatItem {
    const KIND: &'static str = "stats";
    const LIMITS: PlanLimits = PlanLimits::new(4, 6);

    fn blank(position: usize) -> Self {
        let icon = if position == 0 {
            DEFAULT_STAT_ICON
        } else {
            NEW_STAT_ICON
        };
        StatItem {
            label: String::new(),
            desc: String::new(),
            icon: icon.to_string(),
        }
    }

    fn is_complete(&self, _has_upload: bool) -> bool {
        !is_blank(&self.label) && !is_blank(&self.desc) && !is_blank(&self.icon)
    }

    fn has_content(&self) -> bool {
        !is_blank(&self.label) || !is_blank(&self.desc)
    }

    fn count_fields(&self, c: &mut Completion) {
        c.texts([self.label.as_str(), self.desc.as_str(), self.icon.as_str()]);
    }

    fn label(&self) -> String {
        self.label.clone()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorityTitle {
    pub main: String,
    pub italic: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Social {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Authority {
    pub badge: String,
    pub title: AuthorityTitle,
    pub bio: String,
    pub experience_years: String,
    pub stats: RecordList<StatItem>,
    pub social: Social,
    pub image: ImageRef,
}

/// Founder/credentials section with a portrait.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorityDocument {
    pub authority: Authority,
}

impl Document for AuthorityDocument {
    const TYPE: &'static str = "authority";
}

impl Completable for AuthorityDocument {
    fn count_fields(&self, c: &mut Completion) {
        let a = &self.authority;
        c.text(&a.badge);
        c.texts([a.title.main.as_str(), a.title.italic.as_str()]);
        c.text(&a.bio);
        c.text(&a.experience_years);
        a.stats.count_fields(c);
        c.texts([a.social.label.as_str(), a.social.url.as_str()]);
        a.image.count_fields(c);
    }
}
