use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::completion::{Completable, Completion};
use super::plan::PlanLimits;
use super::reorder::move_item;

/// Which multipart field carries a record's pending file, and which record field
/// receives the resulting URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadSlot {
    Image,
    Video,
}

impl UploadSlot {
    pub fn field_prefix(&self) -> &'static str {
        match self {
            UploadSlot::Image => "file",
            UploadSlot::Video => "video",
        }
    }

    pub fn field_name(&self, index: usize) -> String {
        format!("{}{}", self.field_prefix(), index)
    }
}

pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// One element of an ordered collection (FAQ, service, stat, link, ...).
pub trait Record: Clone + Debug + Serialize + DeserializeOwned {
    /// Collection type name; also the prefix of generated ids.
    const KIND: &'static str;
    const LIMITS: PlanLimits;
    const UPLOAD: Option<UploadSlot> = None;
    /// Records carrying a positional number that must follow list order.
    const NUMBERED: bool = false;

    /// A freshly defaulted record about to occupy `position`.
    fn blank(position: usize) -> Self;

    /// Required fields are all filled. `has_upload` is true when a file is waiting
    /// to be uploaded into the record's URL field.
    fn is_complete(&self, has_upload: bool) -> bool;

    /// Any field filled at all.
    fn has_content(&self) -> bool;

    fn count_fields(&self, c: &mut Completion);

    /// Human-readable name for confirmation prompts.
    fn label(&self) -> String;

    fn search_text(&self) -> Vec<&str> {
        Vec::new()
    }

    fn id(&self) -> Option<&str> {
        None
    }

    fn set_id(&mut self, _id: String) {}

    fn renumber(&mut self, _position: usize) {}
}

static NEXT_RENDER_KEY: AtomicU64 = AtomicU64::new(1);

fn next_render_key() -> u64 {
    NEXT_RENDER_KEY.fetch_add(1, Ordering::Relaxed)
}

/// An ordered, never-empty collection of records.
///
/// Each element carries a render key assigned when it enters the list. Keys move
/// with their element on reorder, so identity stays stable for records without an id.
#[derive(Debug, Clone)]
pub struct RecordList<R> {
    items: Vec<R>,
    keys: Vec<u64>,
}

impl<R: Record> RecordList<R> {
    pub fn new(items: Vec<R>) -> Self {
        let mut list = RecordList {
            keys: items.iter().map(|_| next_render_key()).collect(),
            items,
        };
        if list.items.is_empty() {
            list.items.push(R::blank(0));
            list.keys.push(next_render_key());
        }
        list.renumber();
        list
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&R> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.items.iter()
    }

    /// Internal slot identity of the element at `index`.
    pub fn slot(&self, index: usize) -> Option<u64> {
        self.keys.get(index).copied()
    }

    pub fn index_of_slot(&self, slot: u64) -> Option<usize> {
        self.keys.iter().position(|k| *k == slot)
    }

    /// Stable key for rendering: the record's own id when it has one, else a
    /// synthesized `<kind>-<n>` fixed when the element entered the list.
    /// Positional ids of numbered kinds are not identities.
    pub fn render_key(&self, index: usize) -> Option<String> {
        let item = self.items.get(index)?;
        match item.id().filter(|id| !R::NUMBERED && !is_blank(id)) {
            Some(id) => Some(id.to_string()),
            None => Some(format!("{}-{}", R::KIND, self.keys[index])),
        }
    }

    /// Append a blank record unless the list already holds `limit` records.
    /// Returns the new record's index.
    pub fn push_blank(&mut self, limit: usize) -> Option<usize> {
        if self.items.len() >= limit {
            return None;
        }
        let position = self.items.len();
        self.items.push(R::blank(position));
        self.keys.push(next_render_key());
        self.renumber();
        Some(position)
    }

    pub fn update(&mut self, index: usize, patch: impl FnOnce(&mut R)) -> bool {
        match self.items.get_mut(index) {
            Some(item) => {
                patch(item);
                true
            }
            None => false,
        }
    }

    /// Remove the record at `index`. The sole remaining record is replaced by a
    /// fresh blank one instead.
    pub fn remove(&mut self, index: usize) -> bool {
        if index >= self.items.len() {
            return false;
        }
        if self.items.len() == 1 {
            self.items = vec![R::blank(0)];
            self.keys = vec![next_render_key()];
        } else {
            self.items.remove(index);
            self.keys.remove(index);
        }
        self.renumber();
        true
    }

    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        if !move_item(&mut self.items, from, to) {
            return false;
        }
        move_item(&mut self.keys, from, to);
        self.renumber();
        true
    }

    pub fn renumber(&mut self) {
        if R::NUMBERED {
            for (position, item) in self.items.iter_mut().enumerate() {
                item.renumber(position);
            }
        }
    }

    pub fn is_limit_reached(&self, limit: usize) -> bool {
        self.items.len() >= limit
    }

    /// Indices (into this list) of records whose search text contains `term`,
    /// case-insensitively. A blank term matches everything.
    pub fn search(&self, term: &str) -> Vec<usize> {
        let term = term.trim().to_lowercase();
        self.items
            .iter()
            .enumerate()
            .filter(|(_, r)| {
                term.is_empty()
                    || r.search_text()
                        .iter()
                        .any(|t| t.to_lowercase().contains(&term))
            })
            .map(|(i, _)| i)
            .collect()
    }
}

impl<R: Record> Default for RecordList<R> {
    fn default() -> Self {
        RecordList::new(Vec::new())
    }
}

impl<R: Record> PartialEq for RecordList<R>
where
    R: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<R: Record> From<Vec<R>> for RecordList<R> {
    fn from(items: Vec<R>) -> Self {
        RecordList::new(items)
    }
}

impl<R: Record> Completable for RecordList<R> {
    fn count_fields(&self, c: &mut Completion) {
        for item in &self.items {
            item.count_fields(c);
        }
    }
}

impl<R: Record> Serialize for RecordList<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.items)
    }
}

impl<'de, R: Record> Deserialize<'de> for RecordList<R> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<R>::deserialize(deserializer).map(RecordList::new)
    }
}
