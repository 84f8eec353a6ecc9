use crate::LocalFile;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Build and POST the job-creation request. `workflow_file` is the first
    /// attached workflow file, if any; the engine inlines it only when it is
    /// an image. `selected_files: None` means "use all files for this
    /// package".
    SubmitJob {
        folder_name: String,
        user_prompt: String,
        workflow_file: Option<LocalFile>,
        selected_files: Option<Vec<String>>,
    },
    /// Open the update channel for a task. At most one channel may be live.
    OpenChannel { task_id: String },
    /// Tear down the live update channel, if any. Idempotent.
    CloseChannel,
    /// Fetch the template listing for a non-built-in package.
    ListTemplates { folder_name: String },
    /// Upload pending content files.
    UploadContent { files: Vec<LocalFile> },
    /// Resolve and download one generated file.
    DownloadFile {
        file_name: String,
        download_url: String,
    },
    /// Surface a success notification for a newly generated file.
    NotifyFileDone { file_name: String },
}
