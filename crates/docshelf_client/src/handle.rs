use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use client_logging::client_debug;

use crate::api::{ClientSettings, DocStore, ReqwestDocStore};
use crate::{ApiError, ClientEvent, FailureKind, UploadFile};

/// One queued call against the document store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    LoadRegistry,
    LoadDocuments { generation: u64, filter: String },
    AddTag { name: String },
    DeleteTag { name: String },
    AssignTag { doc_id: String, tag: String },
    DeleteDocument { doc_id: String },
    UploadBatch { paths: Vec<PathBuf> },
    Reindex,
    Backup { dest: PathBuf },
    Restore { path: PathBuf },
}

/// Channel front of the store worker. Commands go in, completion events come
/// out; the worker owns a tokio runtime on its own thread and spawns each
/// command independently, so completions arrive in whatever order the server
/// answers.
#[derive(Clone)]
pub struct ClientHandle {
    cmd_tx: mpsc::Sender<ClientCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<ClientEvent>>>,
}

impl ClientHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let store = Arc::new(ReqwestDocStore::new(settings)?);
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                let store = store.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    let event = handle_command(store.as_ref(), command).await;
                    let _ = event_tx.send(event);
                });
            }
        });

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    pub fn submit(&self, command: ClientCommand) {
        client_debug!("submit {:?}", command);
        let _ = self.cmd_tx.send(command);
    }

    pub fn try_recv(&self) -> Option<ClientEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }
}

async fn handle_command(store: &dyn DocStore, command: ClientCommand) -> ClientEvent {
    match command {
        ClientCommand::LoadRegistry => ClientEvent::RegistryLoaded {
            result: store.registry().await,
        },
        ClientCommand::LoadDocuments { generation, filter } => ClientEvent::DocsLoaded {
            generation,
            result: store.list_docs(&filter).await,
        },
        ClientCommand::AddTag { name } => {
            let result = store.add_tag(&name).await;
            ClientEvent::TagAdded { name, result }
        }
        ClientCommand::DeleteTag { name } => {
            let result = store.delete_tag(&name).await;
            ClientEvent::TagDeleted { name, result }
        }
        ClientCommand::AssignTag { doc_id, tag } => {
            let result = store.assign_tag(&doc_id, &tag).await;
            ClientEvent::TagAssigned { doc_id, result }
        }
        ClientCommand::DeleteDocument { doc_id } => {
            let result = store.delete_doc(&doc_id).await;
            ClientEvent::DocDeleted { doc_id, result }
        }
        ClientCommand::UploadBatch { paths } => {
            let count = paths.len();
            let result = match read_files(&paths) {
                Ok(files) => store.upload(files).await,
                Err(err) => Err(err),
            };
            ClientEvent::UploadCompleted { count, result }
        }
        ClientCommand::Reindex => ClientEvent::ReindexCompleted {
            result: store.reindex().await,
        },
        ClientCommand::Backup { dest } => {
            let result = match store.backup().await {
                Ok(payload) => std::fs::write(&dest, &payload)
                    .map(|()| dest)
                    .map_err(|err| ApiError::new(FailureKind::Io, err.to_string())),
                Err(err) => Err(err),
            };
            ClientEvent::BackupSaved { result }
        }
        ClientCommand::Restore { path } => {
            let result = match read_file(&path) {
                Ok(file) => store.restore(file).await,
                Err(err) => Err(err),
            };
            ClientEvent::RestoreCompleted { result }
        }
    }
}

fn read_file(path: &Path) -> Result<UploadFile, ApiError> {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string());
    let bytes = std::fs::read(path)
        .map_err(|err| ApiError::new(FailureKind::Io, format!("{}: {err}", path.display())))?;
    Ok(UploadFile { name, bytes })
}

fn read_files(paths: &[PathBuf]) -> Result<Vec<UploadFile>, ApiError> {
    paths.iter().map(|path| read_file(path)).collect()
}
