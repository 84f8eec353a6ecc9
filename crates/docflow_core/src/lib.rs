//! Docflow core: pure state machine for the document-generation flow.
//!
//! Holds the session state (one live job at a time), the message and effect
//! vocabulary, and the `update` function that folds inbound messages into
//! state. All IO lives in `docflow_engine`; timestamps arrive inside
//! messages so this crate stays clock-free.
mod effect;
mod frame;
mod msg;
mod packages;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use frame::UpdateFrame;
pub use msg::Msg;
pub use packages::{builtin_template_files, is_builtin_package, GSOP_2003, GSOP_2028};
pub use state::{
    AppState, FileStatus, GeneratedFile, JobPhase, LocalFile, LogEntry, LogSeverity, TaskId,
};
pub use update::{update, MISSING_PACKAGE_ERROR, SUBMIT_FAILED_MESSAGE, WORKFLOW_FILES_ERROR};
pub use view_model::{AppViewModel, GeneratedFileRow};
