use serde::{Deserialize, Serialize};

use super::ImageRef;
use crate::manage::{Completable, Completion, Document};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoRef {
    pub src: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShowcaseHeadline {
    pub text_normal: String,
    pub text_italic: String,
    pub text_end: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowcaseContent {
    pub badge: String,
    pub headline: ShowcaseHeadline,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Showcase {
    pub background_image: ImageRef,
    pub video: VideoRef,
    pub content: ShowcaseContent,
}

/// Full-bleed video section over a background image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowcaseDocument {
    pub showcase: Showcase,
}

impl Document for ShowcaseDocument {
    const TYPE: &'static str = "video";
}

impl Completable for ShowcaseDocument {
    fn count_fields(&self, c: &mut Completion) {
        let s = &self.showcase;
        c.text(&s.content.badge);
        c.texts([
            s.content.headline.text_normal.as_str(),
            s.content.headline.text_italic.as_str(),
            s.content.headline.text_end.as_str(),
        ]);
        s.background_image.count_fields(c);
        c.text(&s.video.src);
    }
}
