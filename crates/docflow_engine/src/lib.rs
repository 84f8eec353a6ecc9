//! Docflow engine: API client, update channel, and effect execution.
mod api;
mod channel;
mod encode;
mod engine;
mod save;
mod types;

pub use api::{ApiSettings, DocflowApi, BASE_URL_ENV};
pub use channel::{run_progress_channel, EventSink, SenderSink};
pub use encode::{build_process_flow, is_image_file};
pub use engine::{EngineConfig, EngineHandle};
pub use save::{ensure_output_dir, write_file_bytes, PersistError};
pub use types::{
    ClientError, EngineEvent, FillRequest, FillResponse, TemplateFileInfo, TemplateListing,
    UpdateFrame,
};
