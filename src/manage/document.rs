use std::time::Instant;

use log::{error, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::api::{ContentApi, PendingFile, WriteMode};
use super::completion::{Completable, Completion};
use super::lens::Field;
use super::merge::merge_with_defaults;
use super::modal::{DeleteModal, DeleteTarget};
use super::plan::{PlanType, SiteContext};
use super::records::{Record, RecordList};
use super::reorder::DragState;
use super::status::Status;
use super::ManageError;
use crate::models::form_data::{FormRecord, RecordKey, Shape};

/// One page section stored as a single nested JSON object.
/// `Default` is the empty form: every leaf present, lists holding one blank record.
pub trait Document: Clone + Default + Serialize + DeserializeOwned + Completable {
    /// Record type under `/api/<subtype>/json/<TYPE>`.
    const TYPE: &'static str;

    /// Decode stored values, filling every missing or null leaf from the defaults.
    fn from_stored(values: &Value) -> Result<Self, serde_json::Error> {
        let defaults = serde_json::to_value(Self::default())?;
        serde_json::from_value(merge_with_defaults(values, &defaults))
    }
}

pub struct DocumentManager<D: Document, A: ContentApi> {
    api: A,
    key: RecordKey,
    plan: PlanType,
    doc: D,
    exists: Option<FormRecord>,
    status: Status,
    modal: DeleteModal,
    drag: DragState,
    drag_path: Option<&'static str>,
    attachments: Vec<(Field<D, String>, PendingFile)>,
}

impl<D: Document, A: ContentApi> DocumentManager<D, A> {
    pub fn new(api: A, site: &SiteContext) -> Self {
        DocumentManager {
            api,
            key: RecordKey::new(D::TYPE, &site.subtype),
            plan: site.plan,
            doc: D::default(),
            exists: None,
            status: Status::default(),
            modal: DeleteModal::default(),
            drag: DragState::default(),
            drag_path: None,
            attachments: Vec::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn key(&self) -> &RecordKey {
        &self.key
    }

    pub fn doc(&self) -> &D {
        &self.doc
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

    pub fn dismiss_error(&mut self) {
        self.status.dismiss_error();
    }

    pub fn tick(&mut self, now: Instant) {
        self.status.tick(now);
    }

    pub fn completion(&self) -> Completion {
        self.doc.completion()
    }

    pub fn load(&mut self) -> Result<(), ManageError> {
        self.status = Status::default();
        self.attachments.clear();
        let result = self
            .api
            .fetch(Shape::Document, &self.key)
            .map_err(|e| e.message)
            .and_then(|found| match found {
                Some(record) => D::from_stored(&record.values)
                    .map(|doc| (doc, Some(record)))
                    .map_err(|e| e.to_string()),
                None => Ok((D::default(), None)),
            });
        match result {
            Ok((doc, exists)) => {
                self.doc = doc;
                self.exists = exists;
                self.status.loaded();
                Ok(())
            }
            Err(msg) => {
                error!("Loading {} failed: {}", self.key, msg);
                self.doc = D::default();
                self.exists = None;
                self.status.fail(msg.clone());
                Err(ManageError::Load(msg))
            }
        }
    }

    // ── Editing ─────────────────────────────────────────────

    pub fn update_field<T>(&mut self, field: Field<D, T>, value: T) {
        field.set(&mut self.doc, value);
    }

    pub fn update(&mut self, patch: impl FnOnce(&mut D)) {
        patch(&mut self.doc);
    }

    /// Queue a file whose uploaded URL goes into `field` on the next save.
    pub fn attach(&mut self, field: Field<D, String>, file: PendingFile) {
        self.detach(field);
        self.attachments.push((field, file));
    }

    pub fn detach(&mut self, field: Field<D, String>) -> Option<PendingFile> {
        let pos = self
            .attachments
            .iter()
            .position(|(f, _)| f.path() == field.path())?;
        Some(self.attachments.remove(pos).1)
    }

    pub fn pending_attachments(&self) -> usize {
        self.attachments.len()
    }

    // ── Nested lists ────────────────────────────────────────

    pub fn record_limit<R: Record>(&self) -> usize {
        R::LIMITS.for_plan(self.plan)
    }

    pub fn is_record_limit_reached<R: Record>(&self, field: Field<D, RecordList<R>>) -> bool {
        field.get(&self.doc).is_limit_reached(self.record_limit::<R>())
    }

    pub fn add_record<R: Record>(
        &mut self,
        field: Field<D, RecordList<R>>,
    ) -> Result<usize, ManageError> {
        let limit = self.record_limit::<R>();
        field
            .get_mut(&mut self.doc)
            .push_blank(limit)
            .ok_or(ManageError::LimitReached {
                kind: R::KIND,
                limit,
                plan: self.plan,
            })
    }

    pub fn update_record<R: Record>(
        &mut self,
        field: Field<D, RecordList<R>>,
        index: usize,
        patch: impl FnOnce(&mut R),
    ) -> bool {
        field.get_mut(&mut self.doc).update(index, patch)
    }

    pub fn remove_record<R: Record>(&mut self, field: Field<D, RecordList<R>>, index: usize) -> bool {
        self.drag_end();
        field.get_mut(&mut self.doc).remove(index)
    }

    pub fn reorder_records<R: Record>(
        &mut self,
        field: Field<D, RecordList<R>>,
        from: usize,
        to: usize,
    ) -> bool {
        field.get_mut(&mut self.doc).reorder(from, to)
    }

    pub fn drag_start<R: Record>(&mut self, field: Field<D, RecordList<R>>, index: usize) {
        if index < field.get(&self.doc).len() {
            self.drag.start(index);
            self.drag_path = Some(field.path());
        }
    }

    /// Live reorder while hovering; ignored unless the drag started in the same list.
    pub fn drag_over<R: Record>(&mut self, field: Field<D, RecordList<R>>, target: usize) -> bool {
        if self.drag_path != Some(field.path()) || target >= field.get(&self.doc).len() {
            return false;
        }
        match self.drag.over(target) {
            Some((from, to)) => field.get_mut(&mut self.doc).reorder(from, to),
            None => false,
        }
    }

    pub fn drag_end(&mut self) {
        self.drag.end();
        self.drag_path = None;
    }

    // ── Save & delete ───────────────────────────────────────

    /// Upload attachments, then persist the whole document. On any failure the
    /// local document and its attachments stay as they were.
    pub fn save(&mut self) -> Result<(), ManageError> {
        self.status.begin_saving()?;

        let mut outgoing = self.doc.clone();
        for (field, file) in &self.attachments {
            match self.api.upload(file) {
                Ok(url) => field.set(&mut outgoing, url),
                Err(e) => {
                    error!("Upload for {} ({}) failed: {}", self.key, field.path(), e);
                    self.status.fail(e.message.clone());
                    return Err(e.into());
                }
            }
        }

        let values = match serde_json::to_value(&outgoing) {
            Ok(v) => v,
            Err(e) => {
                self.status.fail(e.to_string());
                return Err(ManageError::Validation(e.to_string()));
            }
        };
        let mode = WriteMode::for_existing(self.exists.is_some());
        match self.api.upsert(Shape::Document, &self.key, &values, &[], mode) {
            Ok(record) => {
                info!("Saved {}", self.key);
                self.doc = D::from_stored(&record.values).unwrap_or(outgoing);
                self.exists = Some(record);
                self.attachments.clear();
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

    pub fn request_delete_all(&mut self) {
        self.modal.open_all(format!("the {} section", D::TYPE));
    }

    pub fn cancel_delete(&mut self) {
        self.modal.close();
    }

    pub fn confirm_delete(&mut self) -> Result<(), ManageError> {
        match self.modal.take() {
            Some(DeleteTarget::All) => self.delete_all(),
            Some(DeleteTarget::Single(_)) | None => Ok(()),
        }
    }

    fn delete_all(&mut self) -> Result<(), ManageError> {
        if self.exists.is_some() {
            self.status.begin_saving()?;
            match self.api.delete(Shape::Document, &self.key) {
                Ok(()) => info!("Deleted {}", self.key),
                Err(e) if e.status == Some(404) => {}
                Err(e) => {
                    error!("Deleting {} failed: {}", self.key, e);
                    self.status.fail(e.message.clone());
                    return Err(e.into());
                }
            }
            self.status.succeed(Instant::now());
        }
        self.doc = D::default();
        self.exists = None;
        self.attachments.clear();
        Ok(())
    }
}
