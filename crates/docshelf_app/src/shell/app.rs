use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use client_logging::{client_error, client_info, client_warn};
use docshelf_core::{update, AppState, Effect, Msg};

use super::effects::EffectRunner;
use super::logging::{self, LogDestination};
use super::render;

pub fn run_app() {
    logging::initialize(LogDestination::File);

    let base_url = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("DOCSHELF_URL").ok())
        .unwrap_or_else(|| "http://127.0.0.1:8000".to_string());
    client_info!("docshelf_app starting against {}", base_url);

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = match EffectRunner::new(base_url.clone(), msg_tx) {
        Ok(runner) => runner,
        Err(err) => {
            eprintln!("error: {err}");
            client_error!("client setup failed: {}", err);
            return;
        }
    };

    let line_rx = spawn_line_reader();
    let mut shell = Shell {
        state: AppState::new(),
        runner,
        selection: Vec::new(),
        pending_confirm: None,
        logged_boot_diagnostic: false,
    };

    println!("docshelf — type \"help\" for commands");
    shell.dispatch(Msg::BootRequested);

    loop {
        while let Ok(msg) = msg_rx.try_recv() {
            shell.dispatch(msg);
        }
        shell.render_if_dirty();
        match line_rx.recv_timeout(Duration::from_millis(50)) {
            Ok(line) => {
                if !shell.handle_line(line.trim()) {
                    break;
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }
}

fn spawn_line_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        let mut line = String::new();
        loop {
            line.clear();
            match stdin.read_line(&mut line) {
                Ok(0) | Err(_) => return,
                Ok(_) => {
                    if tx.send(line.clone()).is_err() {
                        return;
                    }
                }
            }
        }
    });
    rx
}

struct Shell {
    state: AppState,
    runner: EffectRunner,
    /// Files recorded by the last `up` command; cleared by the core's
    /// unconditional upload finalization.
    selection: Vec<PathBuf>,
    /// Document awaiting the user's yes/no before anything is sent.
    pending_confirm: Option<String>,
    logged_boot_diagnostic: bool,
}

impl Shell {
    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if let Some(alert) = state.take_alert() {
            client_warn!("action failed: {}", alert);
            println!("error: {alert}");
        }
        if !self.logged_boot_diagnostic {
            if let Some(diagnostic) = state.boot_diagnostic() {
                client_warn!("boot sync incomplete: {}", diagnostic);
                self.logged_boot_diagnostic = true;
            }
        }
        self.state = state;
        self.run_effects(effects);
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ConfirmDelete { doc_id } => {
                    println!("Delete document {doc_id}? [y/N]");
                    self.pending_confirm = Some(doc_id);
                }
                Effect::ClearFileSelection => self.selection.clear(),
                other => self.runner.enqueue(other, &self.selection),
            }
        }
    }

    fn render_if_dirty(&mut self) {
        if self.state.consume_dirty() {
            render::render(&self.state.view());
        }
    }

    /// Interpret one input line. Returns false to quit.
    fn handle_line(&mut self, line: &str) -> bool {
        if line.is_empty() {
            return true;
        }

        if let Some(doc_id) = self.pending_confirm.take() {
            let msg = if matches!(line.to_ascii_lowercase().as_str(), "y" | "yes") {
                Msg::DeleteConfirmed { doc_id }
            } else {
                Msg::DeleteDeclined { doc_id }
            };
            self.dispatch(msg);
            return true;
        }

        // While the modal is open it captures all input.
        if self.state.view().modal.is_some() {
            match line {
                "cancel" => self.dispatch(Msg::ModalCancelClicked),
                "ok" | "update" => self.dispatch(Msg::ModalUpdateClicked),
                other => self.dispatch(Msg::ModalTagSelected(other.to_string())),
            }
            return true;
        }

        match parse_command(line) {
            Command::Quit => return false,
            Command::Help => print_help(),
            Command::List => render::render(&self.state.view()),
            Command::Refresh => self.dispatch(Msg::ResyncRequested),
            Command::Filter(name) => self.dispatch(Msg::FilterSelected(name)),
            Command::Add(name) => {
                self.dispatch(Msg::TagInputChanged(name));
                self.dispatch(Msg::AddTagClicked);
            }
            Command::Del(name) => {
                self.dispatch(Msg::TagInputChanged(name));
                self.dispatch(Msg::DeleteTagClicked);
            }
            Command::Edit(doc_id) => self.dispatch(Msg::EditClicked { doc_id }),
            Command::Remove(doc_id) => self.dispatch(Msg::DeleteClicked { doc_id }),
            Command::Upload(paths) => {
                let names = paths
                    .iter()
                    .map(|path| {
                        path.file_name()
                            .map(|name| name.to_string_lossy().into_owned())
                            .unwrap_or_else(|| path.display().to_string())
                    })
                    .collect();
                self.selection = paths;
                self.dispatch(Msg::FilesSelected { names });
            }
            Command::Reindex => self.runner.reindex(),
            Command::Backup(dest) => self.runner.backup(dest),
            Command::Restore(path) => self.runner.restore(path),
            Command::Unknown(text) => println!("unknown command: {text} (try \"help\")"),
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Refresh,
    Filter(String),
    Add(String),
    Del(String),
    Edit(String),
    Remove(String),
    Upload(Vec<PathBuf>),
    Reindex,
    Backup(PathBuf),
    Restore(PathBuf),
    List,
    Help,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let mut parts = line.split_whitespace();
    let head = parts.next().unwrap_or_default();
    let rest: Vec<&str> = parts.collect();

    match (head, rest.as_slice()) {
        ("quit" | "exit", []) => Command::Quit,
        ("help", []) => Command::Help,
        ("list", []) => Command::List,
        ("refresh", []) => Command::Refresh,
        ("reindex", []) => Command::Reindex,
        ("filter", [name]) => Command::Filter((*name).to_string()),
        ("add", [name]) => Command::Add((*name).to_string()),
        ("del", [name]) => Command::Del((*name).to_string()),
        ("tag", [doc_id]) => Command::Edit((*doc_id).to_string()),
        ("rm", [doc_id]) => Command::Remove((*doc_id).to_string()),
        ("up", paths) if !paths.is_empty() => {
            Command::Upload(paths.iter().map(PathBuf::from).collect())
        }
        ("backup", [dest]) => Command::Backup(PathBuf::from(dest)),
        ("restore", [path]) => Command::Restore(PathBuf::from(path)),
        _ => Command::Unknown(line.to_string()),
    }
}

fn print_help() {
    println!("commands:");
    println!("  filter <name|All>      switch the tag filter");
    println!("  add <name>             add a tag to the registry");
    println!("  del <name>             delete a tag from the registry");
    println!("  tag <doc_id>           change a document's tag");
    println!("  rm <doc_id>            delete a document");
    println!("  up <file> [file...]    upload files as one batch");
    println!("  refresh                reload registry and list");
    println!("  reindex                rebuild the server search index");
    println!("  backup <dest>          download a backup archive");
    println!("  restore <file>         restore from a backup archive");
    println!("  list                   redraw the current view");
    println!("  quit                   exit");
}
