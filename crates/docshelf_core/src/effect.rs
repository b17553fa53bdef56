use crate::state::Generation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch the tag registry.
    LoadRegistry,
    /// Fetch the document list for `filter` ("All" = unfiltered). The
    /// generation ties the eventual response to this request.
    LoadDocuments { generation: Generation, filter: String },
    /// Add a tag to the registry.
    AddTag { name: String },
    /// Delete a tag from the registry.
    DeleteTag { name: String },
    /// Reassign one document's tag ("All" clears it, per server contract).
    AssignTag { doc_id: String, tag: String },
    /// Ask the user to confirm deleting a document (interactive, no network).
    ConfirmDelete { doc_id: String },
    /// Delete a document.
    DeleteDocument { doc_id: String },
    /// Post all selected files as one multipart batch.
    UploadBatch { names: Vec<String> },
    /// Reset the file-selection affordance (interactive, no network).
    ClearFileSelection,
}
