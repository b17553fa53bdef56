use crate::{AppState, Effect, Filter, ModalState, Msg, ALL_FILTER};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::BootRequested => {
            state.begin_resync(true);
            vec![Effect::LoadRegistry]
        }
        Msg::ResyncRequested => {
            state.begin_resync(false);
            vec![Effect::LoadRegistry]
        }
        Msg::TagInputChanged(text) => {
            state.set_tag_input(text);
            Vec::new()
        }
        Msg::AddTagClicked => {
            // Precondition mirrored from the disabled action: empty names
            // never reach the backend.
            let name = state.tag_input().trim().to_string();
            if name.is_empty() {
                return (state, Vec::new());
            }
            vec![Effect::AddTag { name }]
        }
        Msg::DeleteTagClicked => {
            // No existence check; the backend owns that answer.
            let name = state.tag_input().trim().to_string();
            if name.is_empty() {
                return (state, Vec::new());
            }
            vec![Effect::DeleteTag { name }]
        }
        Msg::FilterSelected(label) => {
            // Chip highlight flips now; the list catches up when the fetch
            // lands.
            state.set_filter(Filter::from_selection(&label));
            list_refresh(&mut state)
        }
        Msg::EditClicked { doc_id } => {
            let selected = state.document(&doc_id).map(|doc| {
                if doc.tag.is_empty() {
                    ALL_FILTER.to_string()
                } else {
                    doc.tag.clone()
                }
            });
            if let Some(selected) = selected {
                state.open_modal(doc_id, selected);
            }
            Vec::new()
        }
        Msg::ModalTagSelected(tag) => {
            state.select_modal_tag(tag);
            Vec::new()
        }
        Msg::ModalCancelClicked => {
            state.close_modal();
            Vec::new()
        }
        Msg::ModalUpdateClicked => match state.modal() {
            ModalState::Open { doc_id, selected } => vec![Effect::AssignTag {
                doc_id: doc_id.clone(),
                tag: selected.clone(),
            }],
            ModalState::Closed => Vec::new(),
        },
        Msg::DeleteClicked { doc_id } => {
            if state.document(&doc_id).is_some() {
                vec![Effect::ConfirmDelete { doc_id }]
            } else {
                Vec::new()
            }
        }
        Msg::DeleteConfirmed { doc_id } => {
            // Remove the row up front; a snapshot is kept so a failed delete
            // can put it back.
            if state.remove_document(&doc_id) {
                vec![Effect::DeleteDocument { doc_id }]
            } else {
                Vec::new()
            }
        }
        Msg::DeleteDeclined { .. } => Vec::new(),
        Msg::FilesSelected { names } => {
            if names.is_empty() {
                return (state, Vec::new());
            }
            state.queue_uploads(names.clone());
            vec![Effect::UploadBatch { names }]
        }
        Msg::RegistryLoaded { result } => match result {
            Ok(tags) => {
                state.replace_registry(tags);
                if state.take_resync_list_pending() {
                    // Registry landed; now the list half of the resync may go
                    // out, queried with a filter that is known to exist.
                    list_refresh(&mut state)
                } else {
                    Vec::new()
                }
            }
            Err(message) => {
                state.take_resync_list_pending();
                if state.is_booting() {
                    state.record_boot_failure(message);
                    state.finish_boot();
                } else {
                    state.raise_alert(message);
                }
                Vec::new()
            }
        },
        Msg::DocsLoaded { generation, result } => {
            if generation != state.list_generation() {
                // A newer refresh has been issued since; this response is
                // stale and must not reach the screen.
                return (state, Vec::new());
            }
            match result {
                Ok(docs) => {
                    state.replace_documents(docs);
                    state.finish_boot();
                }
                Err(message) => {
                    if state.is_booting() {
                        state.record_boot_failure(message);
                        state.finish_boot();
                    } else {
                        state.raise_alert(message);
                    }
                }
            }
            Vec::new()
        }
        Msg::TagAdded { result } => match result {
            Ok(()) => {
                // No optimistic insert: the chip set changes only once the
                // reload returns.
                state.clear_tag_input();
                vec![Effect::LoadRegistry]
            }
            Err(message) => {
                state.raise_alert(message);
                Vec::new()
            }
        },
        Msg::TagDeleted { name, result } => match result {
            Ok(()) => {
                // Reset before the refresh goes out, so the list is never
                // queried with a tag that no longer exists.
                if state.filter().matches(&name) {
                    state.set_filter(Filter::All);
                }
                state.clear_tag_input();
                state.begin_resync(false);
                vec![Effect::LoadRegistry]
            }
            Err(message) => {
                state.raise_alert(message);
                Vec::new()
            }
        },
        Msg::TagAssigned { doc_id, result } => match result {
            Ok(()) => {
                state.close_modal_for(&doc_id);
                list_refresh(&mut state)
            }
            Err(message) => {
                // Modal stays open with the same target and selection, so the
                // user can retry the identical update.
                state.raise_alert(message);
                Vec::new()
            }
        },
        Msg::DocDeleted { doc_id, result } => match result {
            Ok(()) => {
                state.drop_delete_snapshot(&doc_id);
                list_refresh(&mut state)
            }
            Err(message) => {
                state.restore_document(&doc_id);
                state.raise_alert(message);
                Vec::new()
            }
        },
        Msg::UploadFinished { result } => {
            match result {
                Ok(()) => {
                    let count = state.queued_upload_count();
                    state.complete_uploads(count);
                }
                Err(message) => {
                    state.rollback_uploads();
                    state.raise_alert(message);
                }
            }
            // Finalization is unconditional: a failure response does not
            // prove nothing was persisted, so the selection is cleared and
            // the list reconciled either way.
            let mut effects = vec![Effect::ClearFileSelection];
            effects.extend(list_refresh(&mut state));
            effects
        }
    };

    (state, effects)
}

fn list_refresh(state: &mut AppState) -> Vec<Effect> {
    let generation = state.next_generation();
    vec![Effect::LoadDocuments {
        generation,
        filter: state.filter().query_value().to_string(),
    }]
}
