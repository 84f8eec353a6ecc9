use crate::{FileStatus, JobPhase, LogEntry, TaskId};

/// Render-ready projection of the application state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: JobPhase,
    pub package_name: String,
    pub prompt: String,
    pub workflow_files: Vec<String>,
    pub content_files: Vec<String>,
    pub available_templates: Vec<String>,
    pub selected_templates: Vec<String>,
    pub response: String,
    pub logs: Vec<LogEntry>,
    pub generated_files: Vec<GeneratedFileRow>,
    pub task_id: Option<TaskId>,
    pub uploading: bool,
    pub validation_error: Option<String>,
    pub workflow_error: Option<String>,
    pub template_error: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFileRow {
    pub file_name: String,
    pub status: FileStatus,
    pub downloadable: bool,
}
