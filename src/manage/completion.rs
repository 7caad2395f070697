use serde::Serialize;

/// How many countable fields of a page are filled in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub completed: usize,
    pub total: usize,
}

impl Completion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one field, filled when `filled` holds.
    pub fn field(&mut self, filled: bool) {
        self.total += 1;
        if filled {
            self.completed += 1;
        }
    }

    /// Count one text field; whitespace-only is blank.
    pub fn text(&mut self, value: &str) {
        self.field(!value.trim().is_empty());
    }

    pub fn texts<'a>(&mut self, values: impl IntoIterator<Item = &'a str>) {
        for v in values {
            self.text(v);
        }
    }

    /// Rounded down; an empty page counts as 0%.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed * 100) / self.total) as u8
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

/// Anything whose completion can be counted. Implementations walk their fields
/// from scratch on every call; nothing is cached.
pub trait Completable {
    fn count_fields(&self, c: &mut Completion);

    fn completion(&self) -> Completion {
        let mut c = Completion::new();
        self.count_fields(&mut c);
        c
    }
}
