//! Collaborators shared by the tree rewriting passes.

/// Notified every time a pass changes the tree.
pub trait CodeChangeHandler {
    fn report_code_change(&mut self);
}

/// Counts reported changes
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ChangeTracker {
    pub changes: usize,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_changed(&self) -> bool {
        self.changes > 0
    }
}

impl CodeChangeHandler for ChangeTracker {
    fn report_code_change(&mut self) {
        self.changes += 1;
    }
}

/// Hands out ids for new variable names.
/// Ids must never repeat for the lifetime of the supplier.
pub trait NameIdSupplier {
    fn next_id(&mut self) -> String;
}

/// Yields "0", "1", "2", ...
#[derive(Debug, Default, Clone)]
pub struct UniqueNameIdSupplier {
    next: u64,
}

impl UniqueNameIdSupplier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NameIdSupplier for UniqueNameIdSupplier {
    fn next_id(&mut self) -> String {
        let id = self.next;
        self.next += 1;
        id.to_string()
    }
}
