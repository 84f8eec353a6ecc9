use crate::{LocalFile, UpdateFrame};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked a package from the dropdown.
    PackageSelected(String),
    /// User edited the free-text instruction box.
    PromptChanged(String),
    /// User attached process/workflow files.
    WorkflowFilesAdded(Vec<LocalFile>),
    /// User removed one attached workflow file.
    WorkflowFileRemoved(usize),
    /// User attached supporting content files.
    ContentFilesAdded(Vec<LocalFile>),
    /// User removed one attached content file.
    ContentFileRemoved(usize),
    /// User changed the explicit template-file selection.
    TemplateFilesSelected(Vec<String>),
    /// Template listing for a non-built-in package arrived.
    TemplateListLoaded(Vec<String>),
    TemplateListFailed(String),
    /// User submitted the form.
    SubmitClicked,
    /// Job-creation request returned a task id.
    SubmitSucceeded { task_id: String },
    /// Job-creation request failed (transport, HTTP, or file read).
    SubmitFailed,
    /// Update channel reported itself live.
    ChannelOpened,
    /// Update channel closed, from any cause.
    ChannelClosed,
    /// One frame arrived over the update channel, stamped with the client
    /// time at arrival.
    FrameReceived {
        frame: UpdateFrame,
        received_at: String,
    },
    /// User asked to upload the pending content files.
    UploadContentClicked,
    UploadSucceeded { body: String },
    UploadFailed { message: String },
    /// User asked to download one generated file.
    DownloadFileClicked { file_name: String },
    /// User asked to download every generated file with a download path.
    DownloadAllClicked,
    DownloadFinished {
        file_name: String,
        success: bool,
        received_at: String,
    },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
