use crate::{AppState, Effect, FileStatus, JobPhase, LogEntry, LogSeverity, Msg};

/// Fixed user-visible message for any failed submission.
pub const SUBMIT_FAILED_MESSAGE: &str =
    "Something went wrong while starting template processing.";

/// Inline validation message when no package is selected.
pub const MISSING_PACKAGE_ERROR: &str = "Select a package";

/// Inline validation message for unsupported workflow file types.
pub const WORKFLOW_FILES_ERROR: &str =
    "Only .png, .svg, .jpg, .jpeg, .pdf files are supported.";

const WORKFLOW_EXTENSIONS: [&str; 5] = [".png", ".svg", ".jpg", ".jpeg", ".pdf"];

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::PackageSelected(name) => {
            if state.select_package(name.clone()) || name.is_empty() {
                Vec::new()
            } else {
                vec![Effect::ListTemplates { folder_name: name }]
            }
        }
        Msg::PromptChanged(prompt) => {
            state.set_prompt(prompt);
            Vec::new()
        }
        Msg::WorkflowFilesAdded(files) => {
            if files.iter().all(|f| is_supported_workflow_file(&f.name)) {
                state.push_workflow_files(files);
            } else {
                state.set_workflow_error(WORKFLOW_FILES_ERROR.to_string());
            }
            Vec::new()
        }
        Msg::WorkflowFileRemoved(index) => {
            state.remove_workflow_file(index);
            Vec::new()
        }
        Msg::ContentFilesAdded(files) => {
            state.push_content_files(files);
            Vec::new()
        }
        Msg::ContentFileRemoved(index) => {
            state.remove_content_file(index);
            Vec::new()
        }
        Msg::TemplateFilesSelected(selected) => {
            state.set_selected_templates(selected);
            Vec::new()
        }
        Msg::TemplateListLoaded(files) => {
            state.set_available_templates(files);
            Vec::new()
        }
        Msg::TemplateListFailed(message) => {
            state.set_template_error(message);
            Vec::new()
        }
        Msg::SubmitClicked => submit(&mut state),
        Msg::SubmitSucceeded { task_id } => {
            let mut effects = Vec::with_capacity(2);
            // A new task never reuses an existing channel.
            if state.channel_open() {
                effects.push(Effect::CloseChannel);
            }
            effects.push(Effect::OpenChannel {
                task_id: task_id.clone(),
            });
            state.submit_succeeded(task_id);
            effects
        }
        Msg::SubmitFailed => {
            if state.phase() == JobPhase::Submitting {
                state.submit_failed(SUBMIT_FAILED_MESSAGE.to_string());
            }
            Vec::new()
        }
        Msg::ChannelOpened => {
            state.set_channel_open(true);
            Vec::new()
        }
        Msg::ChannelClosed => {
            state.set_channel_open(false);
            Vec::new()
        }
        Msg::FrameReceived { frame, received_at } => {
            let mut effects = Vec::new();
            match frame.kind.as_deref() {
                Some("call_log") => {
                    state.push_log(LogEntry {
                        timestamp: received_at,
                        service: frame.service.clone().unwrap_or_default(),
                        message: frame.message.clone().unwrap_or_default(),
                        severity: LogSeverity::parse(frame.log_type.as_deref()),
                    });
                }
                Some("final_response") => {
                    state.complete(frame.message.clone().unwrap_or_default());
                    effects.push(Effect::CloseChannel);
                }
                // Unrecognized discriminants are ignored without error.
                _ => {}
            }
            // Overlay rule: any frame carrying a filename and download path
            // registers a generated file, regardless of its discriminant.
            if let (Some(file_name), Some(download_url)) =
                (frame.file_name.as_ref(), frame.download_url.as_ref())
            {
                let status = FileStatus::parse(frame.status.as_deref());
                let done = status == FileStatus::Done;
                let newly_seen =
                    state.record_file(file_name.clone(), status, download_url.clone());
                if newly_seen && done {
                    effects.push(Effect::NotifyFileDone {
                        file_name: file_name.clone(),
                    });
                }
            }
            effects
        }
        Msg::UploadContentClicked => {
            let files = state.form().content_files.clone();
            if files.is_empty() {
                Vec::new()
            } else {
                state.begin_upload();
                vec![Effect::UploadContent { files }]
            }
        }
        Msg::UploadSucceeded { body } => {
            state.upload_succeeded(body);
            Vec::new()
        }
        Msg::UploadFailed { message } => {
            state.upload_failed(message);
            Vec::new()
        }
        Msg::DownloadFileClicked { file_name } => state
            .files()
            .iter()
            .find(|f| f.file_name == file_name && !f.download_url.is_empty())
            .map(|f| {
                vec![Effect::DownloadFile {
                    file_name: f.file_name.clone(),
                    download_url: f.download_url.clone(),
                }]
            })
            .unwrap_or_default(),
        Msg::DownloadAllClicked => state
            .files()
            .iter()
            .filter(|f| !f.download_url.is_empty())
            .map(|f| Effect::DownloadFile {
                file_name: f.file_name.clone(),
                download_url: f.download_url.clone(),
            })
            .collect(),
        Msg::DownloadFinished {
            file_name,
            success,
            received_at,
        } => {
            let (severity, message) = if success {
                (LogSeverity::Success, format!("Downloaded {file_name}"))
            } else {
                (LogSeverity::Error, format!("Download failed for {file_name}"))
            };
            state.push_log(LogEntry {
                timestamp: received_at,
                service: "download".to_string(),
                message,
                severity,
            });
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn submit(state: &mut AppState) -> Vec<Effect> {
    // A submission is already in flight; the form is disabled until it
    // resolves.
    if matches!(
        state.phase(),
        JobPhase::Submitting | JobPhase::AwaitingUpdates
    ) {
        return Vec::new();
    }
    if state.form().package_name.is_empty() {
        state.set_validation_error(MISSING_PACKAGE_ERROR.to_string());
        return Vec::new();
    }

    let form = state.form();
    let folder_name = form.package_name.clone();
    let user_prompt = form.prompt.clone();
    // Only the first workflow file is considered for inlining.
    let workflow_file = form.workflow_files.first().cloned();
    // An empty explicit selection means "use all files for this package".
    let selected_files = if form.selected_templates.is_empty() {
        None
    } else {
        Some(form.selected_templates.clone())
    };

    state.begin_submit();
    vec![Effect::SubmitJob {
        folder_name,
        user_prompt,
        workflow_file,
        selected_files,
    }]
}

fn is_supported_workflow_file(name: &str) -> bool {
    let lowered = name.to_ascii_lowercase();
    WORKFLOW_EXTENSIONS.iter().any(|ext| lowered.ends_with(ext))
}
