use crate::state::{Document, Generation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Startup: load the registry, then the list. Failures are swallowed.
    BootRequested,
    /// Resynchronize everything (registry, then list), alerting on failure.
    ResyncRequested,
    /// User edited the tag name input box.
    TagInputChanged(String),
    /// User asked to add the entered tag to the registry.
    AddTagClicked,
    /// User asked to delete the entered tag from the registry.
    DeleteTagClicked,
    /// User selected a filter chip ("All" or a tag name).
    FilterSelected(String),
    /// User clicked a row's edit action; opens the tag modal.
    EditClicked { doc_id: String },
    /// User picked an option in the modal dropdown.
    ModalTagSelected(String),
    /// User dismissed the modal; the edit is discarded.
    ModalCancelClicked,
    /// User confirmed the modal's tag selection.
    ModalUpdateClicked,
    /// User clicked a row's delete action; asks for confirmation first.
    DeleteClicked { doc_id: String },
    /// User confirmed deletion of a document.
    DeleteConfirmed { doc_id: String },
    /// User declined deletion; nothing happens.
    DeleteDeclined { doc_id: String },
    /// User selected files for upload (display names, in selection order).
    FilesSelected { names: Vec<String> },
    /// Registry fetch completed.
    RegistryLoaded { result: Result<Vec<String>, String> },
    /// List fetch completed for the given refresh generation.
    DocsLoaded {
        generation: Generation,
        result: Result<Vec<Document>, String>,
    },
    /// Tag addition completed.
    TagAdded { result: Result<(), String> },
    /// Tag deletion completed.
    TagDeleted {
        name: String,
        result: Result<(), String>,
    },
    /// Per-document tag reassignment completed.
    TagAssigned {
        doc_id: String,
        result: Result<(), String>,
    },
    /// Document deletion completed.
    DocDeleted {
        doc_id: String,
        result: Result<(), String>,
    },
    /// Upload batch completed.
    UploadFinished { result: Result<(), String> },
}
