use crate::state::{Document, UploadDisplay};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    /// Filter chips in display order: the sentinel first, then the registry.
    pub chips: Vec<ChipView>,
    /// Rendered document rows, exactly the latest completed list response.
    pub rows: Vec<DocRowView>,
    /// Present while the tag-edit modal is open.
    pub modal: Option<ModalView>,
    pub upload: UploadDisplay,
    pub tag_input: String,
    /// False while the trimmed tag input is empty; gates add and delete.
    pub tag_actions_enabled: bool,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipView {
    pub label: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocRowView {
    pub id: String,
    pub title: String,
    pub filename: String,
    pub icon: DocIcon,
    /// Size in KB, rounded to one decimal.
    pub size_kb: String,
    /// Unix timestamp; the shell formats it for local display.
    pub updated_at: i64,
    /// Tag label, only when the document carries one.
    pub tag: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocIcon {
    Pdf,
    Markdown,
    Text,
    Generic,
}

impl DocIcon {
    /// Fixed extension-to-icon mapping; anything unknown gets the generic one.
    pub fn for_ext(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            ".pdf" => DocIcon::Pdf,
            ".md" => DocIcon::Markdown,
            ".txt" => DocIcon::Text,
            _ => DocIcon::Generic,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalView {
    pub doc_id: String,
    /// Dropdown options, shared derivation with the chip labels.
    pub options: Vec<String>,
    pub selected: String,
}

/// Derive one rendered row from a document. Pure.
pub fn doc_row(doc: &Document) -> DocRowView {
    DocRowView {
        id: doc.id.clone(),
        title: doc.title.clone(),
        filename: doc.filename.clone(),
        icon: DocIcon::for_ext(&doc.ext),
        size_kb: format_size_kb(doc.size),
        updated_at: doc.updated_at,
        tag: if doc.tag.is_empty() {
            None
        } else {
            Some(doc.tag.clone())
        },
    }
}

/// Byte count as KB with one decimal, e.g. 1536 -> "1.5".
pub fn format_size_kb(size: u64) -> String {
    format!("{:.1}", size as f64 / 1024.0)
}
