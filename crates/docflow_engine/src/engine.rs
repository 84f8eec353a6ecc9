use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use docflow_logging::{flow_error, flow_warn};
use tokio::sync::oneshot;

use crate::api::{ApiSettings, DocflowApi};
use crate::channel::{run_progress_channel, SenderSink};
use crate::encode::build_process_flow;
use crate::types::{ClientError, EngineEvent, FillRequest};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub api: ApiSettings,
    pub output_dir: PathBuf,
}

impl EngineConfig {
    pub fn default_with_output(output_dir: PathBuf) -> Self {
        Self {
            api: ApiSettings::from_env(),
            output_dir,
        }
    }
}

enum EngineCommand {
    Submit {
        folder_name: String,
        user_prompt: String,
        workflow_file: Option<(String, PathBuf)>,
        selected_files: Option<Vec<String>>,
    },
    OpenChannel {
        task_id: String,
    },
    CloseChannel,
    ListTemplates {
        folder_name: String,
    },
    UploadContent {
        files: Vec<(String, PathBuf)>,
    },
    DownloadFile {
        file_name: String,
        download_url: String,
    },
}

/// The single live update channel, guarded so a new task can never reuse an
/// existing one. Entries are (generation, shutdown handle); the generation
/// lets a finished channel clear only its own slot.
#[derive(Default)]
struct ChannelSlot {
    generation: u64,
    active: Option<(u64, oneshot::Sender<()>)>,
}

type SharedSlot = Arc<Mutex<ChannelSlot>>;

/// Handle to the engine worker thread: commands in, events out.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel::<EngineEvent>();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    flow_error!("Could not start engine runtime: {}", err);
                    return;
                }
            };
            let api = match DocflowApi::new(&config.api) {
                Ok(api) => Arc::new(api),
                Err(err) => {
                    flow_error!("Could not build API client: {}", err);
                    return;
                }
            };
            let slot: SharedSlot = Arc::new(Mutex::new(ChannelSlot::default()));

            while let Ok(command) = cmd_rx.recv() {
                handle_command(&runtime, &api, &config, &event_tx, &slot, command);
            }
        });

        Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        }
    }

    pub fn submit(
        &self,
        folder_name: String,
        user_prompt: String,
        workflow_file: Option<(String, PathBuf)>,
        selected_files: Option<Vec<String>>,
    ) {
        let _ = self.cmd_tx.send(EngineCommand::Submit {
            folder_name,
            user_prompt,
            workflow_file,
            selected_files,
        });
    }

    pub fn open_channel(&self, task_id: String) {
        let _ = self.cmd_tx.send(EngineCommand::OpenChannel { task_id });
    }

    pub fn close_channel(&self) {
        let _ = self.cmd_tx.send(EngineCommand::CloseChannel);
    }

    pub fn list_templates(&self, folder_name: String) {
        let _ = self
            .cmd_tx
            .send(EngineCommand::ListTemplates { folder_name });
    }

    pub fn upload_content(&self, files: Vec<(String, PathBuf)>) {
        let _ = self.cmd_tx.send(EngineCommand::UploadContent { files });
    }

    pub fn download_file(&self, file_name: String, download_url: String) {
        let _ = self.cmd_tx.send(EngineCommand::DownloadFile {
            file_name,
            download_url,
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }
}

fn handle_command(
    runtime: &tokio::runtime::Runtime,
    api: &Arc<DocflowApi>,
    config: &EngineConfig,
    event_tx: &mpsc::Sender<EngineEvent>,
    slot: &SharedSlot,
    command: EngineCommand,
) {
    match command {
        EngineCommand::Submit {
            folder_name,
            user_prompt,
            workflow_file,
            selected_files,
        } => {
            let api = api.clone();
            let event_tx = event_tx.clone();
            runtime.spawn(async move {
                let result = submit_job(
                    &api,
                    folder_name,
                    user_prompt,
                    workflow_file,
                    selected_files,
                )
                .await;
                let _ = event_tx.send(EngineEvent::SubmitFinished { result });
            });
        }
        EngineCommand::OpenChannel { task_id } => {
            open_channel(runtime, api, event_tx, slot, task_id);
        }
        EngineCommand::CloseChannel => {
            // Idempotent: closing an absent channel is a no-op.
            if let Ok(mut guard) = slot.lock() {
                if let Some((_, shutdown)) = guard.active.take() {
                    let _ = shutdown.send(());
                }
            }
        }
        EngineCommand::ListTemplates { folder_name } => {
            let api = api.clone();
            let event_tx = event_tx.clone();
            runtime.spawn(async move {
                let result = api.list_templates(&folder_name).await;
                let _ = event_tx.send(EngineEvent::ListingFinished { result });
            });
        }
        EngineCommand::UploadContent { files } => {
            let api = api.clone();
            let event_tx = event_tx.clone();
            runtime.spawn(async move {
                let result = api.upload_content(&files).await;
                let _ = event_tx.send(EngineEvent::UploadFinished { result });
            });
        }
        EngineCommand::DownloadFile {
            file_name,
            download_url,
        } => {
            let api = api.clone();
            let event_tx = event_tx.clone();
            let output_dir = config.output_dir.clone();
            runtime.spawn(async move {
                let result = api
                    .download_file(&file_name, &download_url, &output_dir)
                    .await;
                let _ = event_tx.send(EngineEvent::DownloadFinished { file_name, result });
            });
        }
    }
}

async fn submit_job(
    api: &DocflowApi,
    folder_name: String,
    user_prompt: String,
    workflow_file: Option<(String, PathBuf)>,
    selected_files: Option<Vec<String>>,
) -> Result<String, ClientError> {
    let process_flow = build_process_flow(workflow_file.as_ref()).await?;
    let request = FillRequest {
        folder_name,
        user_prompt,
        process_flow,
        selected_files,
    };
    api.submit_job(&request).await
}

fn open_channel(
    runtime: &tokio::runtime::Runtime,
    api: &Arc<DocflowApi>,
    event_tx: &mpsc::Sender<EngineEvent>,
    slot: &SharedSlot,
    task_id: String,
) {
    let url = match api.progress_channel_url(&task_id) {
        Ok(url) => url,
        Err(err) => {
            let _ = event_tx.send(EngineEvent::ChannelError {
                message: err.to_string(),
            });
            return;
        }
    };

    let Ok(mut guard) = slot.lock() else {
        return;
    };
    if guard.active.is_some() {
        flow_warn!(
            "Update channel already open; refusing a second one for task {}",
            task_id
        );
        return;
    }
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    guard.generation += 1;
    let generation = guard.generation;
    guard.active = Some((generation, shutdown_tx));
    drop(guard);

    let event_tx = event_tx.clone();
    let slot = slot.clone();
    runtime.spawn(async move {
        let sink = SenderSink::new(event_tx);
        run_progress_channel(url, task_id, &sink, shutdown_rx).await;
        // Release the slot so a future task can open a fresh channel, unless
        // a newer channel already owns it.
        if let Ok(mut guard) = slot.lock() {
            if guard.active.as_ref().map(|(gen, _)| *gen) == Some(generation) {
                guard.active = None;
            }
        }
    });
}
