//! Docshelf core: pure state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{AppState, Document, Filter, Generation, ModalState, UploadDisplay, ALL_FILTER};
pub use update::update;
pub use view_model::{doc_row, format_size_kb, AppViewModel, ChipView, DocIcon, DocRowView, ModalView};
