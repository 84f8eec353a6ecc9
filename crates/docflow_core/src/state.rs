use crate::packages;
use crate::view_model::{AppViewModel, GeneratedFileRow};

/// Server-issued correlation identifier for one submitted job.
pub type TaskId = String;

/// Aggregate phase of the single in-flight job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobPhase {
    #[default]
    Idle,
    Submitting,
    AwaitingUpdates,
    Completed,
    SubmitFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogSeverity {
    #[default]
    Info,
    Success,
    Error,
}

impl LogSeverity {
    /// Maps a frame's `logType` tag; absent or unknown tags default to info.
    pub fn parse(tag: Option<&str>) -> Self {
        match tag {
            Some("success") => LogSeverity::Success,
            Some("error") => LogSeverity::Error,
            _ => LogSeverity::Info,
        }
    }
}

/// One incremental progress message, timestamped client-side on arrival.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: String,
    pub service: String,
    pub message: String,
    pub severity: LogSeverity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    Done,
    Error,
    Other(String),
}

impl FileStatus {
    pub fn parse(tag: Option<&str>) -> Self {
        match tag {
            Some("done") => FileStatus::Done,
            Some("error") => FileStatus::Error,
            other => FileStatus::Other(other.unwrap_or_default().to_string()),
        }
    }
}

/// One output artifact reported over the update channel.
///
/// Entries are unique by filename; a repeated filename in a later frame is a
/// no-op, not an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub file_name: String,
    pub status: FileStatus,
    pub download_url: String,
}

/// A user-provided file reference. Paths are opaque to the core; the engine
/// reads them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub name: String,
    pub path: String,
}

/// User input backing one submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct FormState {
    pub(crate) package_name: String,
    pub(crate) prompt: String,
    pub(crate) workflow_files: Vec<LocalFile>,
    pub(crate) content_files: Vec<LocalFile>,
    pub(crate) selected_templates: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    form: FormState,
    phase: JobPhase,
    task_id: Option<TaskId>,
    channel_open: bool,
    response: String,
    logs: Vec<LogEntry>,
    files: Vec<GeneratedFile>,
    available_templates: Vec<String>,
    uploading: bool,
    validation_error: Option<String>,
    workflow_error: Option<String>,
    template_error: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            phase: self.phase,
            package_name: self.form.package_name.clone(),
            prompt: self.form.prompt.clone(),
            workflow_files: self.form.workflow_files.iter().map(|f| f.name.clone()).collect(),
            content_files: self.form.content_files.iter().map(|f| f.name.clone()).collect(),
            available_templates: self.available_templates.clone(),
            selected_templates: self.form.selected_templates.clone(),
            response: self.response.clone(),
            logs: self.logs.clone(),
            generated_files: self
                .files
                .iter()
                .map(|f| GeneratedFileRow {
                    file_name: f.file_name.clone(),
                    status: f.status.clone(),
                    downloadable: !f.download_url.is_empty(),
                })
                .collect(),
            task_id: self.task_id.clone(),
            uploading: self.uploading,
            validation_error: self.validation_error.clone(),
            workflow_error: self.workflow_error.clone(),
            template_error: self.template_error.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns and clears the render-dirty flag.
    pub fn consume_dirty(&mut self) -> bool {
        let was = self.dirty;
        self.dirty = false;
        was
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn phase(&self) -> JobPhase {
        self.phase
    }

    pub(crate) fn channel_open(&self) -> bool {
        self.channel_open
    }

    pub(crate) fn form(&self) -> &FormState {
        &self.form
    }

    pub(crate) fn files(&self) -> &[GeneratedFile] {
        &self.files
    }

    // -- form edits ---------------------------------------------------------

    /// Selects a package and resets the template selection. Returns true when
    /// the package is a built-in whose file list was resolved locally.
    pub(crate) fn select_package(&mut self, name: String) -> bool {
        self.form.selected_templates.clear();
        self.validation_error = None;
        self.template_error = None;
        let builtin = packages::builtin_template_files(&name);
        self.available_templates = builtin
            .map(|files| files.iter().map(|f| f.to_string()).collect())
            .unwrap_or_default();
        self.form.package_name = name;
        self.mark_dirty();
        builtin.is_some()
    }

    pub(crate) fn set_prompt(&mut self, prompt: String) {
        self.form.prompt = prompt;
        self.mark_dirty();
    }

    pub(crate) fn push_workflow_files(&mut self, files: Vec<LocalFile>) {
        self.workflow_error = None;
        self.form.workflow_files.extend(files);
        self.mark_dirty();
    }

    pub(crate) fn set_workflow_error(&mut self, message: String) {
        self.workflow_error = Some(message);
        self.mark_dirty();
    }

    pub(crate) fn remove_workflow_file(&mut self, index: usize) {
        if index < self.form.workflow_files.len() {
            self.form.workflow_files.remove(index);
            self.mark_dirty();
        }
    }

    pub(crate) fn push_content_files(&mut self, files: Vec<LocalFile>) {
        self.form.content_files.extend(files);
        self.mark_dirty();
    }

    pub(crate) fn remove_content_file(&mut self, index: usize) {
        if index < self.form.content_files.len() {
            self.form.content_files.remove(index);
            self.mark_dirty();
        }
    }

    pub(crate) fn set_selected_templates(&mut self, selected: Vec<String>) {
        self.form.selected_templates = selected;
        self.mark_dirty();
    }

    pub(crate) fn set_available_templates(&mut self, files: Vec<String>) {
        self.template_error = None;
        self.available_templates = files;
        self.mark_dirty();
    }

    pub(crate) fn set_template_error(&mut self, message: String) {
        self.template_error = Some(message);
        self.mark_dirty();
    }

    // -- submission ---------------------------------------------------------

    pub(crate) fn set_validation_error(&mut self, message: String) {
        self.validation_error = Some(message);
        self.mark_dirty();
    }

    pub(crate) fn begin_submit(&mut self) {
        self.phase = JobPhase::Submitting;
        self.validation_error = None;
        self.response.clear();
        self.files.clear();
        self.mark_dirty();
    }

    pub(crate) fn submit_succeeded(&mut self, task_id: TaskId) {
        self.phase = JobPhase::AwaitingUpdates;
        self.task_id = Some(task_id);
        self.response.clear();
        self.logs.clear();
        self.reset_form();
        self.mark_dirty();
    }

    pub(crate) fn submit_failed(&mut self, message: String) {
        self.phase = JobPhase::SubmitFailed;
        self.task_id = None;
        self.response = message;
        self.reset_form();
        self.mark_dirty();
    }

    // Runs on every terminal submit transition, success or failure; see
    // DESIGN.md for the note on failure resets.
    fn reset_form(&mut self) {
        self.form = FormState::default();
        self.workflow_error = None;
    }

    // -- update-channel folding ---------------------------------------------

    pub(crate) fn set_channel_open(&mut self, open: bool) {
        if self.channel_open != open {
            self.channel_open = open;
            self.mark_dirty();
        }
    }

    pub(crate) fn push_log(&mut self, entry: LogEntry) {
        self.logs.push(entry);
        self.mark_dirty();
    }

    /// Terminal transition: replaces the response text, stops loading, and
    /// clears accumulated logs.
    pub(crate) fn complete(&mut self, message: String) {
        self.response = message;
        self.logs.clear();
        if self.phase == JobPhase::AwaitingUpdates {
            self.phase = JobPhase::Completed;
        }
        self.mark_dirty();
    }

    /// Registers a generated file, deduplicating by filename. Returns true
    /// only when the file was newly recorded.
    pub(crate) fn record_file(
        &mut self,
        file_name: String,
        status: FileStatus,
        download_url: String,
    ) -> bool {
        if self.files.iter().any(|f| f.file_name == file_name) {
            return false;
        }
        self.files.push(GeneratedFile {
            file_name,
            status,
            download_url,
        });
        self.mark_dirty();
        true
    }

    // -- content upload -----------------------------------------------------

    pub(crate) fn begin_upload(&mut self) {
        self.uploading = true;
        self.mark_dirty();
    }

    pub(crate) fn upload_succeeded(&mut self, body: String) {
        self.uploading = false;
        self.response = body;
        self.form.content_files.clear();
        self.mark_dirty();
    }

    pub(crate) fn upload_failed(&mut self, message: String) {
        self.uploading = false;
        self.response = message;
        self.mark_dirty();
    }
}
