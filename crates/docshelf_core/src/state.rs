use crate::view_model::{doc_row, AppViewModel, ChipView, ModalView};

/// Monotonic counter distinguishing list refreshes so late responses can be
/// told apart from the newest one.
pub type Generation = u64;

/// Reserved filter sentinel meaning "no tag restriction". Never a real tag.
pub const ALL_FILTER: &str = "All";

/// The active tag filter. Not persisted; a fresh state starts unfiltered.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Tag(String),
}

impl Filter {
    /// Parse a chip selection: the sentinel maps to `All`, anything else is a tag.
    pub fn from_selection(name: &str) -> Self {
        if name == ALL_FILTER {
            Filter::All
        } else {
            Filter::Tag(name.to_string())
        }
    }

    /// The value sent as the `tag` query parameter of a list request.
    pub fn query_value(&self) -> &str {
        match self {
            Filter::All => ALL_FILTER,
            Filter::Tag(name) => name,
        }
    }

    /// Chip-highlight equality: string comparison against an option label.
    pub fn matches(&self, label: &str) -> bool {
        self.query_value() == label
    }
}

/// One document as the client sees it. Immutable apart from `tag`, which is
/// the only field the client can change (empty string = untagged).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub filename: String,
    pub ext: String,
    pub size: u64,
    pub updated_at: i64,
    pub tag: String,
}

/// Tag-reassignment modal. Exists only between an edit click and a cancel or
/// a successful update; a failed update leaves it open so the same edit can
/// be retried as-is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Open { doc_id: String, selected: String },
}

/// Local upload feedback. `Queued` entries are optimistic placeholders, not
/// confirmed server state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UploadDisplay {
    #[default]
    Empty,
    Queued(Vec<String>),
    Uploaded(usize),
}

/// Whole-application state. Fields are private; `update` mutates through the
/// crate-internal accessors below, so ownership of every transition is
/// explicit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    registry: Vec<String>,
    filter: Filter,
    docs: Vec<Document>,
    modal: ModalState,
    upload: UploadDisplay,
    tag_input: String,
    list_generation: Generation,
    resync_list_pending: bool,
    booting: bool,
    alert: Option<String>,
    boot_diagnostic: Option<String>,
    removed_docs: Vec<(usize, Document)>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the render-ready view of the current state. Pure; rendering
    /// layers consume this and never touch the state directly.
    pub fn view(&self) -> AppViewModel {
        let options = self.tag_options();
        let chips = options
            .iter()
            .map(|label| ChipView {
                label: label.clone(),
                active: self.filter.matches(label),
            })
            .collect();
        let modal = match &self.modal {
            ModalState::Closed => None,
            ModalState::Open { doc_id, selected } => Some(ModalView {
                doc_id: doc_id.clone(),
                options: options.clone(),
                selected: selected.clone(),
            }),
        };
        AppViewModel {
            chips,
            rows: self.docs.iter().map(doc_row).collect(),
            modal,
            upload: self.upload.clone(),
            tag_input: self.tag_input.clone(),
            tag_actions_enabled: !self.tag_input.trim().is_empty(),
            dirty: self.dirty,
        }
    }

    /// The single option derivation shared by the chip bar and the modal
    /// dropdown: the sentinel first, then the registry in display order.
    pub fn tag_options(&self) -> Vec<String> {
        std::iter::once(ALL_FILTER.to_string())
            .chain(self.registry.iter().cloned())
            .collect()
    }

    pub fn registry(&self) -> &[String] {
        &self.registry
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn documents(&self) -> &[Document] {
        &self.docs
    }

    pub fn document(&self, doc_id: &str) -> Option<&Document> {
        self.docs.iter().find(|doc| doc.id == doc_id)
    }

    pub fn modal(&self) -> &ModalState {
        &self.modal
    }

    pub fn tag_input(&self) -> &str {
        &self.tag_input
    }

    pub fn list_generation(&self) -> Generation {
        self.list_generation
    }

    /// True while the initial boot resync is still settling; its failures are
    /// recorded instead of alerted.
    pub fn is_booting(&self) -> bool {
        self.booting
    }

    /// Diagnostic left behind by a swallowed boot failure, if any.
    pub fn boot_diagnostic(&self) -> Option<&str> {
        self.boot_diagnostic.as_deref()
    }

    /// Returns and clears the render-needed flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Returns and clears the pending user-visible error, if any.
    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn raise_alert(&mut self, message: String) {
        self.alert = Some(message);
        self.mark_dirty();
    }

    pub(crate) fn record_boot_failure(&mut self, message: String) {
        self.boot_diagnostic = Some(message);
    }

    pub(crate) fn set_tag_input(&mut self, text: String) {
        self.tag_input = text;
        self.mark_dirty();
    }

    pub(crate) fn clear_tag_input(&mut self) {
        self.tag_input.clear();
        self.mark_dirty();
    }

    /// Begin a registry-then-list resync. The list half stays pending until
    /// the registry reload lands (registry strictly first).
    pub(crate) fn begin_resync(&mut self, boot: bool) {
        self.resync_list_pending = true;
        if boot {
            self.booting = true;
        }
    }

    pub(crate) fn take_resync_list_pending(&mut self) -> bool {
        std::mem::take(&mut self.resync_list_pending)
    }

    pub(crate) fn finish_boot(&mut self) {
        self.booting = false;
    }

    /// Replace the registry atomically. If the active filter's tag no longer
    /// exists, fall back to unfiltered so the filter always names a live tag.
    pub(crate) fn replace_registry(&mut self, tags: Vec<String>) {
        self.registry = tags;
        let filter_gone = match &self.filter {
            Filter::Tag(name) => !self.registry.iter().any(|tag| tag == name),
            Filter::All => false,
        };
        if filter_gone {
            self.filter = Filter::All;
        }
        self.mark_dirty();
    }

    pub(crate) fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
        self.mark_dirty();
    }

    /// Full replace: the rendered collection becomes exactly the latest
    /// server response. Forgotten delete snapshots die with the old list.
    pub(crate) fn replace_documents(&mut self, docs: Vec<Document>) {
        self.docs = docs;
        self.removed_docs.clear();
        self.mark_dirty();
    }

    /// Claim the next refresh generation. Issued before the request leaves,
    /// so any response carrying an older number is stale by definition.
    pub(crate) fn next_generation(&mut self) -> Generation {
        self.list_generation += 1;
        self.list_generation
    }

    pub(crate) fn open_modal(&mut self, doc_id: String, selected: String) {
        self.modal = ModalState::Open { doc_id, selected };
        self.mark_dirty();
    }

    pub(crate) fn close_modal(&mut self) {
        self.modal = ModalState::Closed;
        self.mark_dirty();
    }

    /// Close the modal only if it is still editing `doc_id`.
    pub(crate) fn close_modal_for(&mut self, doc_id: &str) {
        if matches!(&self.modal, ModalState::Open { doc_id: open_id, .. } if open_id == doc_id) {
            self.close_modal();
        }
    }

    pub(crate) fn select_modal_tag(&mut self, tag: String) {
        if let ModalState::Open { selected, .. } = &mut self.modal {
            *selected = tag;
            self.dirty = true;
        }
    }

    pub(crate) fn queue_uploads(&mut self, names: Vec<String>) {
        self.upload = UploadDisplay::Queued(names);
        self.mark_dirty();
    }

    pub(crate) fn queued_upload_count(&self) -> usize {
        match &self.upload {
            UploadDisplay::Queued(names) => names.len(),
            _ => 0,
        }
    }

    pub(crate) fn complete_uploads(&mut self, count: usize) {
        self.upload = UploadDisplay::Uploaded(count);
        self.mark_dirty();
    }

    /// Roll the optimistic placeholders back; the upload never happened as
    /// far as the display is concerned.
    pub(crate) fn rollback_uploads(&mut self) {
        self.upload = UploadDisplay::Empty;
        self.mark_dirty();
    }

    /// Optimistically drop a row, keeping a positioned snapshot so a failed
    /// delete can put it back. Returns false for an unknown id.
    pub(crate) fn remove_document(&mut self, doc_id: &str) -> bool {
        match self.docs.iter().position(|doc| doc.id == doc_id) {
            Some(index) => {
                let doc = self.docs.remove(index);
                self.removed_docs.push((index, doc));
                self.mark_dirty();
                true
            }
            None => false,
        }
    }

    /// Restore a previously removed row at its original index.
    pub(crate) fn restore_document(&mut self, doc_id: &str) {
        if let Some(pos) = self
            .removed_docs
            .iter()
            .position(|(_, doc)| doc.id == doc_id)
        {
            let (index, doc) = self.removed_docs.remove(pos);
            let index = index.min(self.docs.len());
            self.docs.insert(index, doc);
            self.mark_dirty();
        }
    }

    pub(crate) fn drop_delete_snapshot(&mut self, doc_id: &str) {
        self.removed_docs.retain(|(_, doc)| doc.id != doc_id);
    }
}
