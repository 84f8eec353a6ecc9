use std::sync::Once;

use docflow_core::{
    update, AppState, Effect, JobPhase, LocalFile, Msg, GSOP_2028, MISSING_PACKAGE_ERROR,
    SUBMIT_FAILED_MESSAGE, WORKFLOW_FILES_ERROR,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(docflow_logging::initialize_for_tests);
}

fn filled_form(package: &str, prompt: &str) -> AppState {
    let state = AppState::new();
    let (state, _) = update(state, Msg::PackageSelected(package.to_string()));
    let (state, _) = update(state, Msg::PromptChanged(prompt.to_string()));
    state
}

#[test]
fn submit_without_package_never_issues_request() {
    init_logging();
    let state = AppState::new();

    let (mut next, effects) = update(state, Msg::SubmitClicked);
    let view = next.view();

    assert!(effects.is_empty());
    assert_eq!(view.phase, JobPhase::Idle);
    assert_eq!(view.task_id, None);
    assert_eq!(
        view.validation_error.as_deref(),
        Some(MISSING_PACKAGE_ERROR)
    );
    assert!(next.consume_dirty());
}

#[test]
fn submit_builds_request_from_form() {
    init_logging();
    let state = filled_form(GSOP_2028, "add a cover page");

    let (next, effects) = update(state, Msg::SubmitClicked);

    assert_eq!(next.view().phase, JobPhase::Submitting);
    assert_eq!(
        effects,
        vec![Effect::SubmitJob {
            folder_name: GSOP_2028.to_string(),
            user_prompt: "add a cover page".to_string(),
            workflow_file: None,
            selected_files: None,
        }]
    );
}

#[test]
fn explicit_template_selection_is_forwarded() {
    init_logging();
    let state = filled_form(GSOP_2028, "");
    let selection = vec!["Template 4 - Process Flow Template.docx".to_string()];
    let (state, _) = update(state, Msg::TemplateFilesSelected(selection.clone()));

    let (_next, effects) = update(state, Msg::SubmitClicked);

    match &effects[..] {
        [Effect::SubmitJob { selected_files, .. }] => {
            assert_eq!(selected_files.as_ref(), Some(&selection));
        }
        other => panic!("unexpected effects: {other:?}"),
    }
}

#[test]
fn only_first_workflow_file_is_submitted() {
    init_logging();
    let state = filled_form(GSOP_2028, "");
    let files = vec![
        LocalFile {
            name: "flow.png".to_string(),
            path: "/tmp/flow.png".to_string(),
        },
        LocalFile {
            name: "extra.svg".to_string(),
            path: "/tmp/extra.svg".to_string(),
        },
    ];
    let (state, _) = update(state, Msg::WorkflowFilesAdded(files.clone()));

    let (_next, effects) = update(state, Msg::SubmitClicked);

    match &effects[..] {
        [Effect::SubmitJob { workflow_file, .. }] => {
            assert_eq!(workflow_file.as_ref(), Some(&files[0]));
        }
        other => panic!("unexpected effects: {other:?}"),
    }
}

#[test]
fn unsupported_workflow_extension_is_rejected() {
    init_logging();
    let state = filled_form(GSOP_2028, "");
    let (next, effects) = update(
        state,
        Msg::WorkflowFilesAdded(vec![LocalFile {
            name: "diagram.exe".to_string(),
            path: "/tmp/diagram.exe".to_string(),
        }]),
    );

    assert!(effects.is_empty());
    let view = next.view();
    assert!(view.workflow_files.is_empty());
    assert_eq!(view.workflow_error.as_deref(), Some(WORKFLOW_FILES_ERROR));
}

#[test]
fn pdf_workflow_file_is_accepted() {
    init_logging();
    let state = filled_form(GSOP_2028, "");

    let (next, effects) = update(
        state,
        Msg::WorkflowFilesAdded(vec![LocalFile {
            name: "process.pdf".to_string(),
            path: "/tmp/process.pdf".to_string(),
        }]),
    );

    assert!(effects.is_empty());
    let view = next.view();
    assert_eq!(view.workflow_files, vec!["process.pdf".to_string()]);
    assert_eq!(view.workflow_error, None);
}

#[test]
fn submit_success_opens_channel_and_resets_form() {
    init_logging();
    let state = filled_form(GSOP_2028, "add a cover page");
    let (state, _) = update(state, Msg::SubmitClicked);

    let (next, effects) = update(
        state,
        Msg::SubmitSucceeded {
            task_id: "abc123".to_string(),
        },
    );
    let view = next.view();

    assert_eq!(
        effects,
        vec![Effect::OpenChannel {
            task_id: "abc123".to_string(),
        }]
    );
    assert_eq!(view.phase, JobPhase::AwaitingUpdates);
    assert_eq!(view.task_id.as_deref(), Some("abc123"));
    // Form reset is unconditional on completion.
    assert_eq!(view.package_name, "");
    assert_eq!(view.prompt, "");
    assert!(view.workflow_files.is_empty());
    assert!(view.selected_templates.is_empty());
    assert!(view.logs.is_empty());
}

#[test]
fn submit_failure_sets_fixed_message_and_no_task() {
    init_logging();
    let state = filled_form(GSOP_2028, "keep my work");
    let (state, _) = update(state, Msg::SubmitClicked);

    let (next, effects) = update(state, Msg::SubmitFailed);
    let view = next.view();

    assert!(effects.is_empty());
    assert_eq!(view.phase, JobPhase::SubmitFailed);
    assert_eq!(view.task_id, None);
    assert_eq!(view.response, SUBMIT_FAILED_MESSAGE);
    assert_eq!(view.package_name, "");
}

#[test]
fn new_task_never_reuses_an_open_channel() {
    init_logging();
    let state = filled_form(GSOP_2028, "");
    let (state, _) = update(state, Msg::SubmitClicked);
    let (state, _) = update(
        state,
        Msg::SubmitSucceeded {
            task_id: "first".to_string(),
        },
    );
    let (state, _) = update(state, Msg::ChannelOpened);

    // Second job finishes submitting while the first channel is still live.
    let (state, _) = update(state, Msg::PackageSelected(GSOP_2028.to_string()));
    let frame = docflow_core::UpdateFrame {
        kind: Some("final_response".to_string()),
        message: Some("done".to_string()),
        ..Default::default()
    };
    let (state, _) = update(
        state,
        Msg::FrameReceived {
            frame,
            received_at: "10:00:00".to_string(),
        },
    );
    let (state, _) = update(state, Msg::SubmitClicked);
    let (_next, effects) = update(
        state,
        Msg::SubmitSucceeded {
            task_id: "second".to_string(),
        },
    );

    assert_eq!(
        effects,
        vec![
            Effect::CloseChannel,
            Effect::OpenChannel {
                task_id: "second".to_string(),
            },
        ]
    );
}

#[test]
fn submit_is_ignored_while_a_job_is_in_flight() {
    init_logging();
    let state = filled_form(GSOP_2028, "");
    let (state, _) = update(state, Msg::SubmitClicked);

    let (next, effects) = update(state, Msg::SubmitClicked);

    assert!(effects.is_empty());
    assert_eq!(next.view().phase, JobPhase::Submitting);
}

#[test]
fn builtin_package_skips_listing_request() {
    init_logging();
    let state = AppState::new();

    let (next, effects) = update(state, Msg::PackageSelected(GSOP_2028.to_string()));

    assert!(effects.is_empty());
    assert_eq!(next.view().available_templates.len(), 5);
}

#[test]
fn unknown_package_requests_listing() {
    init_logging();
    let state = AppState::new();

    let (next, effects) = update(state, Msg::PackageSelected("CUSTOM_SET".to_string()));

    assert_eq!(
        effects,
        vec![Effect::ListTemplates {
            folder_name: "CUSTOM_SET".to_string(),
        }]
    );
    assert!(next.view().available_templates.is_empty());

    let (next, effects) = update(
        next,
        Msg::TemplateListLoaded(vec!["a.docx".to_string(), "b.docx".to_string()]),
    );
    assert!(effects.is_empty());
    assert_eq!(next.view().available_templates.len(), 2);
}

#[test]
fn package_change_resets_template_selection() {
    init_logging();
    let state = filled_form(GSOP_2028, "");
    let (state, _) = update(
        state,
        Msg::TemplateFilesSelected(vec!["GSOP 2003 Template 1.docx".to_string()]),
    );

    let (next, _) = update(state, Msg::PackageSelected("GSOP_2003".to_string()));

    assert!(next.view().selected_templates.is_empty());
    assert_eq!(next.view().available_templates.len(), 4);
}
