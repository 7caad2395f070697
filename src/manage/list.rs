use std::collections::HashMap;
use std::time::{Duration, Instant};

use log::{error, info};
use serde_json::Value;

use super::api::{ContentApi, FileField, PendingFile, WriteMode};
use super::completion::{Completable, Completion};
use super::merge::parse_records;
use super::modal::{DeleteModal, DeleteTarget};
use super::plan::{PlanType, SiteContext};
use super::records::{is_blank, Record, RecordList};
use super::reorder::DragState;
use super::status::Status;
use super::ManageError;
use crate::models::form_data::{FormRecord, RecordKey, Shape};

/// Delay between adding a record and scrolling it into view.
pub const SCROLL_DELAY: Duration = Duration::from_millis(100);

pub const NOTHING_TO_SAVE: &str = "Complete at least one item before saving";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollRequest {
    pub render_key: String,
    pub due: Instant,
}

/// Edits one stored collection (`/api/<subtype>/form/<kind>`).
pub struct ListManager<R: Record, A: ContentApi> {
    api: A,
    key: RecordKey,
    plan: PlanType,
    list: RecordList<R>,
    exists: Option<FormRecord>,
    status: Status,
    modal: DeleteModal,
    drag: DragState,
    // keyed by list slot so attachments follow their record through reorders
    uploads: HashMap<u64, PendingFile>,
    scroll: Option<ScrollRequest>,
}

impl<R: Record, A: ContentApi> ListManager<R, A> {
    pub fn new(api: A, site: &SiteContext) -> Self {
        ListManager {
            api,
            key: RecordKey::new(R::KIND, &site.subtype),
            plan: site.plan,
            list: RecordList::default(),
            exists: None,
            status: Status::default(),
            modal: DeleteModal::default(),
            drag: DragState::default(),
            uploads: HashMap::new(),
            scroll: None,
        }
    }

    // ── Accessors ───────────────────────────────────────────

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn key(&self) -> &RecordKey {
        &self.key
    }

    pub fn list(&self) -> &RecordList<R> {
        &self.list
    }

    pub fn items(&self) -> &[R] {
        self.list.items()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn exists(&self) -> Option<&FormRecord> {
        self.exists.as_ref()
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn modal(&self) -> &DeleteModal {
        &self.modal
    }

    pub fn plan(&self) -> PlanType {
        self.plan
    }

    pub fn set_plan(&mut self, plan: PlanType) {
        self.plan = plan;
    }

    pub fn dismiss_error(&mut self) {
        self.status.dismiss_error();
    }

    pub fn tick(&mut self, now: Instant) {
        self.status.tick(now);
    }

    // ── Load ────────────────────────────────────────────────

    /// Fetch the stored collection. On failure the form keeps one blank record
    /// and the status carries the error.
    pub fn load(&mut self) -> Result<(), ManageError> {
        self.status = Status::default();
        self.uploads.clear();
        self.drag.end();
        match self.api.fetch(Shape::List, &self.key) {
            Ok(Some(record)) => {
                self.list = RecordList::new(parse_records(&record.values));
                self.exists = Some(record);
                self.status.loaded();
                Ok(())
            }
            Ok(None) => {
                self.list = RecordList::default();
                self.exists = None;
                self.status.loaded();
                Ok(())
            }
            Err(e) => {
                error!("Loading {} failed: {}", self.key, e);
                self.list = RecordList::default();
                self.exists = None;
                self.status.fail(e.message.clone());
                Err(ManageError::Load(e.message))
            }
        }
    }

    // ── Limits & completion ─────────────────────────────────

    pub fn limit(&self) -> usize {
        R::LIMITS.for_plan(self.plan)
    }

    pub fn is_limit_reached(&self) -> bool {
        self.list.is_limit_reached(self.limit())
    }

    fn limit_error(&self) -> ManageError {
        ManageError::LimitReached {
            kind: R::KIND,
            limit: self.limit(),
            plan: self.plan,
        }
    }

    /// Inline warning shown for as long as the collection is at its ceiling.
    pub fn limit_warning(&self) -> Option<String> {
        self.is_limit_reached()
            .then(|| self.limit_error().to_string())
    }

    pub fn completion(&self) -> Completion {
        self.list.completion()
    }

    pub fn complete_count(&self) -> usize {
        (0..self.list.len())
            .filter(|&i| self.is_item_complete(i))
            .count()
    }

    pub fn is_item_complete(&self, index: usize) -> bool {
        self.list
            .get(index)
            .map(|r| r.is_complete(self.has_pending_upload(index)))
            .unwrap_or(false)
    }

    /// The last record is flagged once a submit attempt showed validation and it
    /// is still incomplete.
    pub fn highlight_incomplete(&self, index: usize) -> bool {
        self.status.show_validation()
            && index + 1 == self.list.len()
            && !self.is_item_complete(index)
    }

    // ── Editing ─────────────────────────────────────────────

    /// Append a blank record and schedule scrolling to it.
    pub fn add_item(&mut self) -> Result<usize, ManageError> {
        let limit = self.limit();
        let index = self.list.push_blank(limit).ok_or_else(|| self.limit_error())?;
        if let Some(render_key) = self.list.render_key(index) {
            self.scroll = Some(ScrollRequest {
                render_key,
                due: Instant::now() + SCROLL_DELAY,
            });
        }
        Ok(index)
    }

    /// Hand out the pending scroll request once its delay has passed.
    pub fn take_scroll_target(&mut self, now: Instant) -> Option<String> {
        match &self.scroll {
            Some(req) if now >= req.due => self.scroll.take().map(|r| r.render_key),
            _ => None,
        }
    }

    pub fn update_item(&mut self, index: usize, patch: impl FnOnce(&mut R)) -> bool {
        self.list.update(index, patch)
    }

    pub fn remove_item(&mut self, index: usize) -> bool {
        let Some(slot) = self.list.slot(index) else {
            return false;
        };
        self.uploads.remove(&slot);
        self.drag.end();
        self.list.remove(index)
    }

    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        self.list.reorder(from, to)
    }

    pub fn drag_start(&mut self, index: usize) {
        if index < self.list.len() {
            self.drag.start(index);
        }
    }

    /// Live reorder while hovering over `target`.
    pub fn drag_over(&mut self, target: usize) -> bool {
        if target >= self.list.len() {
            return false;
        }
        match self.drag.over(target) {
            Some((from, to)) => self.list.reorder(from, to),
            None => false,
        }
    }

    pub fn drag_end(&mut self) {
        self.drag.end();
    }

    pub fn dragging(&self) -> Option<usize> {
        self.drag.dragging()
    }

    /// Indices into the canonical list; mutations keep using these.
    pub fn search(&self, term: &str) -> Vec<usize> {
        self.list.search(term)
    }

    // ── Uploads ─────────────────────────────────────────────

    pub fn attach_file(&mut self, index: usize, file: PendingFile) -> Result<(), ManageError> {
        if R::UPLOAD.is_none() {
            return Err(ManageError::Validation(format!(
                "{} items do not take uploads",
                R::KIND
            )));
        }
        let slot = self
            .list
            .slot(index)
            .ok_or(ManageError::IndexOutOfRange(index))?;
        self.uploads.insert(slot, file);
        Ok(())
    }

    pub fn detach_file(&mut self, index: usize) -> Option<PendingFile> {
        let slot = self.list.slot(index)?;
        self.uploads.remove(&slot)
    }

    pub fn has_pending_upload(&self, index: usize) -> bool {
        self.list
            .slot(index)
            .map(|slot| self.uploads.contains_key(&slot))
            .unwrap_or(false)
    }

    pub fn pending_upload(&self, index: usize) -> Option<&PendingFile> {
        self.uploads.get(&self.list.slot(index)?)
    }

    // ── Submit ──────────────────────────────────────────────

    /// Persist every complete record as the new collection. Incomplete records
    /// are left out; nothing complete at all is a validation error and sends nothing.
    pub fn submit(&mut self) -> Result<(), ManageError> {
        if self.status.is_loading() {
            return Err(ManageError::Busy);
        }
        self.status.set_show_validation(true);

        let kept: Vec<usize> = (0..self.list.len())
            .filter(|&i| self.is_item_complete(i))
            .collect();
        if kept.is_empty() {
            self.status.fail(NOTHING_TO_SAVE);
            return Err(ManageError::Validation(NOTHING_TO_SAVE.to_string()));
        }

        let millis = chrono::Utc::now().timestamp_millis();
        let mut records = Vec::with_capacity(kept.len());
        let mut files = Vec::new();
        for (position, &index) in kept.iter().enumerate() {
            let mut record = self.list.items()[index].clone();
            if record.id().map(is_blank).unwrap_or(true) {
                record.set_id(format!("{}-{}-{}", R::KIND, millis, position));
            }
            if R::NUMBERED {
                record.renumber(position);
            }
            if let (Some(slot), Some(file)) = (R::UPLOAD, self.pending_upload(index)) {
                files.push(FileField {
                    index: position,
                    slot,
                    file: file.clone(),
                });
            }
            records.push(record);
        }
        let values = serde_json::to_value(&records)
            .map_err(|e| ManageError::Validation(e.to_string()))?;
        let mode = WriteMode::for_existing(self.exists.is_some());

        self.status.begin_saving()?;
        match self.api.upsert(Shape::List, &self.key, &values, &files, mode) {
            Ok(record) => {
                info!("Saved {} ({} items)", self.key, records.len());
                self.list = RecordList::new(parse_records(&record.values));
                self.exists = Some(record);
                self.uploads.clear();
                self.status.set_show_validation(false);
                self.status.succeed(Instant::now());
                Ok(())
            }
            Err(e) => {
                error!("Saving {} failed: {}", self.key, e);
                self.status.fail(e.message.clone());
                Err(e.into())
            }
        }
    }

    // ── Delete ──────────────────────────────────────────────

    pub fn request_delete_single(&mut self, index: usize) -> Result<(), ManageError> {
        let record = self
            .list
            .get(index)
            .ok_or(ManageError::IndexOutOfRange(index))?;
        let label = record.label();
        let title = if is_blank(&label) {
            format!("item {}", index + 1)
        } else {
            label
        };
        self.modal.open_single(index, title);
        Ok(())
    }

    pub fn request_delete_all(&mut self) {
        self.modal.open_all(format!("all {} items", R::KIND));
    }

    pub fn cancel_delete(&mut self) {
        self.modal.close();
    }

    /// Carry out whatever the open prompt targets. A no-op when nothing is open.
    pub fn confirm_delete(&mut self) -> Result<(), ManageError> {
        match self.modal.take() {
            None => Ok(()),
            Some(DeleteTarget::Single(index)) => self.delete_single(index),
            Some(DeleteTarget::All) => self.delete_all(),
        }
    }

    fn delete_single(&mut self, index: usize) -> Result<(), ManageError> {
        if index >= self.list.len() {
            return Err(ManageError::IndexOutOfRange(index));
        }
        if self.exists.is_none() {
            self.remove_item(index);
            return Ok(());
        }

        let mut next = self.list.clone();
        next.remove(index);
        let values = Value::Array(
            next.iter()
                .filter(|r| r.has_content())
                .filter_map(|r| serde_json::to_value(r).ok())
                .collect(),
        );

        self.status.begin_saving()?;
        match self
            .api
            .upsert(Shape::List, &self.key, &values, &[], WriteMode::Replace)
        {
            Ok(record) => {
                info!("Removed item {} from {}", index + 1, self.key);
                self.remove_item(index);
                self.exists = Some(record);
                self.status.succeed(Instant::now());
                Ok(())
            }
            Err(e) => {
                error!("Removing item from {} failed: {}", self.key, e);
                self.status.fail(e.message.clone());
                Err(e.into())
            }
        }
    }

    fn delete_all(&mut self) -> Result<(), ManageError> {
        if self.exists.is_some() {
            self.status.begin_saving()?;
            match self.api.delete(Shape::List, &self.key) {
                Ok(()) => info!("Deleted {}", self.key),
                // already gone on the server
                Err(e) if e.status == Some(404) => {}
                Err(e) => {
                    error!("Deleting {} failed: {}", self.key, e);
                    self.status.fail(e.message.clone());
                    return Err(e.into());
                }
            }
            self.status.succeed(Instant::now());
        }
        self.list = RecordList::default();
        self.exists = None;
        self.uploads.clear();
        self.drag.end();
        Ok(())
    }
}
