#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTarget {
    Single(usize),
    All,
}

/// Delete-confirmation prompt. Opened by a delete request, consumed by confirm or cancel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteModal {
    target: Option<DeleteTarget>,
    title: String,
}

impl DeleteModal {
    pub fn open_single(&mut self, index: usize, title: impl Into<String>) {
        self.target = Some(DeleteTarget::Single(index));
        self.title = title.into();
    }

    pub fn open_all(&mut self, title: impl Into<String>) {
        self.target = Some(DeleteTarget::All);
        self.title = title.into();
    }

    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<DeleteTarget> {
        self.target
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Close the prompt and hand back what was to be deleted.
    pub fn take(&mut self) -> Option<DeleteTarget> {
        self.title.clear();
        self.target.take()
    }

    pub fn close(&mut self) {
        self.take();
    }
}
