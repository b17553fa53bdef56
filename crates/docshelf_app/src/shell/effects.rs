use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use client_logging::{client_info, client_warn};
use docshelf_client::{
    ApiError, ClientCommand, ClientEvent, ClientHandle, ClientSettings, DocumentRecord,
};
use docshelf_core::{Document, Effect, Msg};

/// Bridges the pure core and the store worker: network effects become client
/// commands, completion events come back as messages. Interactive effects
/// (delete confirmation, selection clearing) never reach this type; the shell
/// loop intercepts them.
pub struct EffectRunner {
    handle: ClientHandle,
}

impl EffectRunner {
    pub fn new(base_url: String, msg_tx: mpsc::Sender<Msg>) -> Result<Self, ApiError> {
        let settings = ClientSettings {
            base_url,
            ..ClientSettings::default()
        };
        let handle = ClientHandle::new(settings)?;
        let runner = Self { handle };
        runner.spawn_event_loop(msg_tx);
        Ok(runner)
    }

    /// Submit the network half of a core effect. `paths` backs an
    /// `UploadBatch` with the files the shell recorded at selection time.
    pub fn enqueue(&self, effect: Effect, paths: &[PathBuf]) {
        match effect {
            Effect::LoadRegistry => self.handle.submit(ClientCommand::LoadRegistry),
            Effect::LoadDocuments { generation, filter } => {
                client_info!("refresh generation={} filter={}", generation, filter);
                self.handle
                    .submit(ClientCommand::LoadDocuments { generation, filter });
            }
            Effect::AddTag { name } => self.handle.submit(ClientCommand::AddTag { name }),
            Effect::DeleteTag { name } => self.handle.submit(ClientCommand::DeleteTag { name }),
            Effect::AssignTag { doc_id, tag } => {
                self.handle.submit(ClientCommand::AssignTag { doc_id, tag });
            }
            Effect::DeleteDocument { doc_id } => {
                self.handle.submit(ClientCommand::DeleteDocument { doc_id });
            }
            Effect::UploadBatch { names } => {
                client_info!("upload batch of {} file(s)", names.len());
                self.handle.submit(ClientCommand::UploadBatch {
                    paths: paths.to_vec(),
                });
            }
            Effect::ConfirmDelete { .. } | Effect::ClearFileSelection => {
                // Interactive; the shell loop owns these.
            }
        }
    }

    pub fn reindex(&self) {
        self.handle.submit(ClientCommand::Reindex);
    }

    pub fn backup(&self, dest: PathBuf) {
        self.handle.submit(ClientCommand::Backup { dest });
    }

    pub fn restore(&self, path: PathBuf) {
        self.handle.submit(ClientCommand::Restore { path });
    }

    fn spawn_event_loop(&self, msg_tx: mpsc::Sender<Msg>) {
        let handle = self.handle.clone();
        thread::spawn(move || loop {
            if let Some(event) = handle.try_recv() {
                match map_event(event) {
                    Mapped::Core(msg) => {
                        if msg_tx.send(msg).is_err() {
                            return;
                        }
                    }
                    Mapped::Notice(text) => println!("{text}"),
                    Mapped::NoticeThenResync(text) => {
                        println!("{text}");
                        if msg_tx.send(Msg::ResyncRequested).is_err() {
                            return;
                        }
                    }
                }
            } else {
                thread::sleep(Duration::from_millis(20));
            }
        });
    }
}

enum Mapped {
    Core(Msg),
    Notice(String),
    NoticeThenResync(String),
}

/// Core completions become messages; the peripheral operations (reindex,
/// backup, restore) stay outside the state machine and surface as notices,
/// except that a successful restore invalidates everything and forces a
/// resync.
fn map_event(event: ClientEvent) -> Mapped {
    match event {
        ClientEvent::RegistryLoaded { result } => Mapped::Core(Msg::RegistryLoaded {
            result: result.map_err(|err| err.message),
        }),
        ClientEvent::DocsLoaded { generation, result } => Mapped::Core(Msg::DocsLoaded {
            generation,
            result: result
                .map(|records| records.into_iter().map(map_document).collect())
                .map_err(|err| err.message),
        }),
        ClientEvent::TagAdded { result, .. } => Mapped::Core(Msg::TagAdded {
            result: result.map_err(|err| err.message),
        }),
        ClientEvent::TagDeleted { name, result } => Mapped::Core(Msg::TagDeleted {
            name,
            result: result.map_err(|err| err.message),
        }),
        ClientEvent::TagAssigned { doc_id, result } => Mapped::Core(Msg::TagAssigned {
            doc_id,
            result: result.map_err(|err| err.message),
        }),
        ClientEvent::DocDeleted { doc_id, result } => Mapped::Core(Msg::DocDeleted {
            doc_id,
            result: result.map_err(|err| err.message),
        }),
        ClientEvent::UploadCompleted { count, result } => {
            if let Err(err) = &result {
                client_warn!("upload of {} file(s) failed: {}", count, err);
            }
            Mapped::Core(Msg::UploadFinished {
                result: result.map_err(|err| err.message),
            })
        }
        ClientEvent::ReindexCompleted { result } => Mapped::Notice(match result {
            Ok(count) => format!("Reindexed {count} docs."),
            Err(err) => format!("error: {err}"),
        }),
        ClientEvent::BackupSaved { result } => Mapped::Notice(match result {
            Ok(dest) => format!("Backup saved to {}.", dest.display()),
            Err(err) => format!("error: {err}"),
        }),
        ClientEvent::RestoreCompleted { result } => match result {
            Ok(()) => Mapped::NoticeThenResync("Restored.".to_string()),
            Err(err) => Mapped::Notice(format!("error: {err}")),
        },
    }
}

fn map_document(record: DocumentRecord) -> Document {
    Document {
        id: record.id,
        title: record.title,
        filename: record.filename,
        ext: record.ext,
        size: record.size,
        updated_at: record.updated_at,
        tag: record.tags,
    }
}
