use std::sync::Once;

use docflow_core::{update, AppState, Effect, LogSeverity, Msg, UpdateFrame, GSOP_2028};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(docflow_logging::initialize_for_tests);
}

fn state_with_files(files: &[(&str, &str)]) -> AppState {
    let state = AppState::new();
    let (state, _) = update(state, Msg::PackageSelected(GSOP_2028.to_string()));
    let (state, _) = update(state, Msg::SubmitClicked);
    let (state, _) = update(
        state,
        Msg::SubmitSucceeded {
            task_id: "task-1".to_string(),
        },
    );
    files.iter().fold(state, |state, (name, url)| {
        let frame = UpdateFrame {
            file_name: Some(name.to_string()),
            status: Some("done".to_string()),
            download_url: Some(url.to_string()),
            ..Default::default()
        };
        update(
            state,
            Msg::FrameReceived {
                frame,
                received_at: "10:00:00".to_string(),
            },
        )
        .0
    })
}

#[test]
fn download_all_follows_insertion_order() {
    init_logging();
    let state = state_with_files(&[
        ("b.docx", "/out/b.docx"),
        ("a.docx", "/out/a.docx"),
        ("c.docx", "/out/c.docx"),
    ]);

    let (_next, effects) = update(state, Msg::DownloadAllClicked);

    let names: Vec<_> = effects
        .iter()
        .map(|e| match e {
            Effect::DownloadFile { file_name, .. } => file_name.as_str(),
            other => panic!("unexpected effect: {other:?}"),
        })
        .collect();
    assert_eq!(names, vec!["b.docx", "a.docx", "c.docx"]);
}

#[test]
fn download_all_skips_files_without_a_path() {
    init_logging();
    let state = state_with_files(&[("a.docx", "/out/a.docx"), ("b.docx", "")]);

    let (_next, effects) = update(state, Msg::DownloadAllClicked);

    assert_eq!(
        effects,
        vec![Effect::DownloadFile {
            file_name: "a.docx".to_string(),
            download_url: "/out/a.docx".to_string(),
        }]
    );
}

#[test]
fn download_single_file_by_name() {
    init_logging();
    let state = state_with_files(&[("a.docx", "/out/a.docx")]);

    let (state, effects) = update(
        state,
        Msg::DownloadFileClicked {
            file_name: "a.docx".to_string(),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::DownloadFile {
            file_name: "a.docx".to_string(),
            download_url: "/out/a.docx".to_string(),
        }]
    );

    let (_next, effects) = update(
        state,
        Msg::DownloadFileClicked {
            file_name: "missing.docx".to_string(),
        },
    );
    assert!(effects.is_empty());
}

#[test]
fn download_completion_is_logged() {
    init_logging();
    let state = state_with_files(&[("a.docx", "/out/a.docx")]);

    let (state, _) = update(
        state,
        Msg::DownloadFinished {
            file_name: "a.docx".to_string(),
            success: true,
            received_at: "10:00:05".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::DownloadFinished {
            file_name: "b.docx".to_string(),
            success: false,
            received_at: "10:00:06".to_string(),
        },
    );

    let logs = state.view().logs;
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].severity, LogSeverity::Success);
    assert_eq!(logs[1].severity, LogSeverity::Error);
    assert!(logs[1].message.contains("b.docx"));
}
