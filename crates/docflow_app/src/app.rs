use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use clap::{Parser, ValueEnum};
use docflow_core::{
    is_builtin_package, update, AppState, Effect, JobPhase, LocalFile, LogSeverity, Msg,
};
use docflow_engine::{ensure_output_dir, ApiSettings, EngineConfig, EngineHandle};
use docflow_logging::{flow_info, LogDestination};

use crate::effects::{self, EffectRunner};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Command-line client for the document-generation backend.
#[derive(Debug, Parser)]
#[command(name = "docflow", version, about = "Submit document-generation jobs and download the results")]
pub struct Cli {
    /// Template package to generate from (for example GSOP_2028).
    #[arg(long)]
    pub package: Option<String>,

    /// Free-text instruction forwarded to the backend.
    #[arg(long, default_value = "")]
    pub prompt: String,

    /// Process/workflow files. Only the first one is inlined into the
    /// request, and only when it is an image.
    #[arg(long = "workflow", value_name = "PATH")]
    pub workflow_files: Vec<PathBuf>,

    /// Supporting content files, uploaded with --upload-only.
    #[arg(long = "content", value_name = "PATH")]
    pub content_files: Vec<PathBuf>,

    /// Explicit template files to fill; omit to use every file in the
    /// package.
    #[arg(long = "select", value_name = "FILE")]
    pub selected_templates: Vec<String>,

    /// API origin; overrides the DOCFLOW_API_URL environment variable.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Directory generated files are saved into.
    #[arg(long, default_value = "generated")]
    pub output_dir: PathBuf,

    /// Print the template listing for --package and exit.
    #[arg(long)]
    pub list_templates: bool,

    /// Upload --content files and exit without submitting a job.
    #[arg(long)]
    pub upload_only: bool,

    /// Where log output goes.
    #[arg(long, value_enum, default_value_t = LogArg::Terminal)]
    pub log: LogArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogArg {
    Terminal,
    File,
    Both,
}

impl Cli {
    pub fn log_destination(&self) -> LogDestination {
        match self.log {
            LogArg::Terminal => LogDestination::Terminal,
            LogArg::File => LogDestination::File,
            LogArg::Both => LogDestination::Both,
        }
    }
}

pub fn run(cli: Cli) -> Result<(), String> {
    let mut api = ApiSettings::from_env();
    if let Some(base_url) = &cli.base_url {
        api.base_url = base_url.clone();
    }
    flow_info!("Using API at {}", api.base_url);

    let config = EngineConfig {
        api,
        output_dir: cli.output_dir.clone(),
    };
    ensure_output_dir(&config.output_dir).map_err(|err| err.to_string())?;

    let engine = EngineHandle::new(config);
    let (msg_tx, msg_rx) = mpsc::channel();
    effects::spawn_event_loop(engine.clone(), msg_tx);
    let mut driver = Driver::new(EffectRunner::new(engine));

    if cli.upload_only {
        driver.run_upload(&cli, &msg_rx)
    } else if cli.list_templates {
        driver.run_listing(&cli, &msg_rx)
    } else {
        driver.run_job(&cli, &msg_rx)
    }
}

/// Owns the application state and pumps messages through the update loop.
struct Driver {
    state: AppState,
    runner: EffectRunner,
    printed_logs: usize,
    pending_downloads: usize,
}

impl Driver {
    fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
            printed_logs: 0,
            pending_downloads: 0,
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        for effect in effects {
            if matches!(effect, Effect::DownloadFile { .. }) {
                self.pending_downloads += 1;
            }
            self.runner.enqueue(effect);
        }
        if self.state.consume_dirty() {
            self.render();
        }
    }

    /// Prints progress log lines as they accumulate. The log is cleared on
    /// completion, so a shrinking log restarts the cursor.
    fn render(&mut self) {
        let vm = self.state.view();
        if vm.logs.len() < self.printed_logs {
            self.printed_logs = 0;
        }
        for entry in &vm.logs[self.printed_logs..] {
            let tag = match entry.severity {
                LogSeverity::Info => "info",
                LogSeverity::Success => "ok",
                LogSeverity::Error => "err",
            };
            println!("[{}] {:>4} {}: {}", entry.timestamp, tag, entry.service, entry.message);
        }
        self.printed_logs = vm.logs.len();
    }

    /// Submits one job, follows its update channel, and downloads every
    /// generated file before returning.
    fn run_job(&mut self, cli: &Cli, msgs: &Receiver<Msg>) -> Result<(), String> {
        let package = cli
            .package
            .clone()
            .ok_or_else(|| "--package is required to submit a job".to_string())?;
        self.dispatch(Msg::PackageSelected(package));
        self.dispatch(Msg::PromptChanged(cli.prompt.clone()));
        if !cli.workflow_files.is_empty() {
            self.dispatch(Msg::WorkflowFilesAdded(local_files(&cli.workflow_files)?));
        }
        if !cli.content_files.is_empty() {
            self.dispatch(Msg::ContentFilesAdded(local_files(&cli.content_files)?));
        }
        if !cli.selected_templates.is_empty() {
            self.dispatch(Msg::TemplateFilesSelected(cli.selected_templates.clone()));
        }
        self.dispatch(Msg::SubmitClicked);

        let vm = self.state.view();
        if let Some(message) = vm.workflow_error {
            return Err(message);
        }
        if let Some(message) = vm.validation_error {
            return Err(message);
        }
        if vm.phase != JobPhase::Submitting {
            return Err("submission was not accepted".to_string());
        }

        let mut downloads_requested = false;
        loop {
            match msgs.recv_timeout(POLL_INTERVAL) {
                Ok(msg) => {
                    let finished_download = matches!(msg, Msg::DownloadFinished { .. });
                    self.dispatch(msg);
                    if finished_download {
                        self.pending_downloads -= 1;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    return Err("engine stopped unexpectedly".to_string());
                }
            }

            let vm = self.state.view();
            match vm.phase {
                JobPhase::SubmitFailed => return Err(vm.response),
                JobPhase::Completed => {
                    if !downloads_requested {
                        self.dispatch(Msg::DownloadAllClicked);
                        downloads_requested = true;
                    }
                    if self.pending_downloads == 0 {
                        if !vm.response.is_empty() {
                            println!("{}", vm.response);
                        }
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
    }

    /// Prints the template listing for a package and exits.
    fn run_listing(&mut self, cli: &Cli, msgs: &Receiver<Msg>) -> Result<(), String> {
        let package = cli
            .package
            .clone()
            .ok_or_else(|| "--package is required to list templates".to_string())?;
        self.dispatch(Msg::PackageSelected(package.clone()));

        // Built-in packages resolve locally without a listing request.
        if is_builtin_package(&package) {
            print_listing(&package, &self.state.view().available_templates);
            return Ok(());
        }

        loop {
            match msgs.recv_timeout(POLL_INTERVAL) {
                Ok(msg) => {
                    let loaded = matches!(msg, Msg::TemplateListLoaded(_));
                    self.dispatch(msg);
                    let vm = self.state.view();
                    if let Some(message) = vm.template_error {
                        return Err(message);
                    }
                    if loaded {
                        print_listing(&package, &vm.available_templates);
                        return Ok(());
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    return Err("engine stopped unexpectedly".to_string());
                }
            }
        }
    }

    /// Uploads the given content files and exits.
    fn run_upload(&mut self, cli: &Cli, msgs: &Receiver<Msg>) -> Result<(), String> {
        if cli.content_files.is_empty() {
            return Err("--upload-only needs at least one --content file".to_string());
        }
        self.dispatch(Msg::ContentFilesAdded(local_files(&cli.content_files)?));
        self.dispatch(Msg::UploadContentClicked);

        loop {
            match msgs.recv_timeout(POLL_INTERVAL) {
                Ok(msg) => {
                    let outcome = match &msg {
                        Msg::UploadSucceeded { .. } => Some(true),
                        Msg::UploadFailed { .. } => Some(false),
                        _ => None,
                    };
                    self.dispatch(msg);
                    if let Some(success) = outcome {
                        let vm = self.state.view();
                        println!("{}", vm.response);
                        return if success {
                            Ok(())
                        } else {
                            Err("upload failed".to_string())
                        };
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    return Err("engine stopped unexpectedly".to_string());
                }
            }
        }
    }
}

fn print_listing(package: &str, files: &[String]) {
    println!("Templates in {package}:");
    for file in files {
        println!("  {file}");
    }
}

fn local_files(paths: &[PathBuf]) -> Result<Vec<LocalFile>, String> {
    paths
        .iter()
        .map(|path| {
            if !path.is_file() {
                return Err(format!("not a readable file: {}", path.display()));
            }
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| format!("path has no filename: {}", path.display()))?;
            Ok(LocalFile {
                name,
                path: path.to_string_lossy().into_owned(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_files_carry_name_and_full_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("flow.png");
        std::fs::write(&path, b"png").unwrap();

        let files = local_files(&[path.clone()]).expect("conversion ok");
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "flow.png");
        assert_eq!(files[0].path, path.to_string_lossy());
    }

    #[test]
    fn missing_local_file_is_rejected_up_front() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("gone.png");

        let err = local_files(&[path]).unwrap_err();
        assert!(err.starts_with("not a readable file"));
    }

    #[test]
    fn cli_log_flag_selects_destination() {
        let cli = Cli::parse_from(["docflow", "--package", "GSOP_2028", "--log", "both"]);
        assert!(matches!(cli.log_destination(), LogDestination::Both));
    }

    #[test]
    fn cli_defaults_cover_a_plain_submission() {
        let cli = Cli::parse_from(["docflow", "--package", "GSOP_2028"]);
        assert_eq!(cli.prompt, "");
        assert_eq!(cli.output_dir, PathBuf::from("generated"));
        assert!(cli.workflow_files.is_empty());
        assert!(!cli.list_templates);
        assert!(!cli.upload_only);
    }
}
