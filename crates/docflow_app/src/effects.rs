use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use docflow_core::{Effect, LocalFile, Msg, UpdateFrame};
use docflow_engine::{EngineEvent, EngineHandle, UpdateFrame as WireFrame};
use docflow_logging::{flow_info, flow_warn};

const EVENT_POLL: Duration = Duration::from_millis(20);

/// Hands core effects to the engine worker.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn enqueue(&self, effect: Effect) {
        match effect {
            Effect::SubmitJob {
                folder_name,
                user_prompt,
                workflow_file,
                selected_files,
            } => {
                self.engine.submit(
                    folder_name,
                    user_prompt,
                    workflow_file.map(to_engine_file),
                    selected_files,
                );
            }
            Effect::OpenChannel { task_id } => self.engine.open_channel(task_id),
            Effect::CloseChannel => self.engine.close_channel(),
            Effect::ListTemplates { folder_name } => self.engine.list_templates(folder_name),
            Effect::UploadContent { files } => self
                .engine
                .upload_content(files.into_iter().map(to_engine_file).collect()),
            Effect::DownloadFile {
                file_name,
                download_url,
            } => self.engine.download_file(file_name, download_url),
            Effect::NotifyFileDone { file_name } => {
                flow_info!("File generated: {}", file_name);
                println!("Generated: {file_name}");
            }
        }
    }
}

/// Polls engine events on a dedicated thread and forwards them as messages.
/// Exits once the receiving side hangs up.
pub fn spawn_event_loop(engine: EngineHandle, tx: Sender<Msg>) {
    thread::spawn(move || loop {
        match engine.try_recv() {
            Some(event) => {
                if tx.send(map_event(event)).is_err() {
                    break;
                }
            }
            None => thread::sleep(EVENT_POLL),
        }
    });
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::SubmitFinished { result } => match result {
            Ok(task_id) => {
                flow_info!("Job accepted with task id {}", task_id);
                Msg::SubmitSucceeded { task_id }
            }
            Err(err) => {
                flow_warn!("Job submission failed: {}", err);
                Msg::SubmitFailed
            }
        },
        EngineEvent::ChannelOpened { task_id } => {
            flow_info!("Update channel open for task {}", task_id);
            Msg::ChannelOpened
        }
        EngineEvent::FrameReceived { frame } => Msg::FrameReceived {
            frame: map_frame(frame),
            received_at: now_stamp(),
        },
        EngineEvent::ChannelClosed => Msg::ChannelClosed,
        EngineEvent::ChannelError { message } => {
            flow_warn!("Update channel error: {}", message);
            Msg::NoOp
        }
        EngineEvent::ListingFinished { result } => match result {
            Ok(listing) => Msg::TemplateListLoaded(
                listing.files.into_iter().map(|f| f.filename).collect(),
            ),
            Err(err) => Msg::TemplateListFailed(err.to_string()),
        },
        EngineEvent::UploadFinished { result } => match result {
            Ok(body) => Msg::UploadSucceeded { body },
            Err(docflow_engine::ClientError::Upload(message)) => Msg::UploadFailed { message },
            Err(err) => Msg::UploadFailed {
                message: err.to_string(),
            },
        },
        EngineEvent::DownloadFinished { file_name, result } => match result {
            Ok(path) => {
                flow_info!("Saved {} to {}", file_name, path.display());
                Msg::DownloadFinished {
                    file_name,
                    success: true,
                    received_at: now_stamp(),
                }
            }
            Err(err) => {
                flow_warn!("Download of {} failed: {}", file_name, err);
                Msg::DownloadFinished {
                    file_name,
                    success: false,
                    received_at: now_stamp(),
                }
            }
        },
    }
}

fn map_frame(frame: WireFrame) -> UpdateFrame {
    UpdateFrame {
        kind: frame.kind,
        service: frame.service,
        message: frame.message,
        log_type: frame.log_type,
        file_name: frame.file_name,
        status: frame.status,
        download_url: frame.download_url,
    }
}

fn to_engine_file(file: LocalFile) -> (String, PathBuf) {
    (file.name, PathBuf::from(file.path))
}

/// Client-side arrival timestamp shown next to progress log lines.
fn now_stamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}
