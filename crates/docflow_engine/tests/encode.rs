use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use docflow_engine::{build_process_flow, is_image_file, ClientError};
use pretty_assertions::assert_eq;

#[test]
fn image_detection_is_case_insensitive() {
    assert!(is_image_file("diagram.png"));
    assert!(is_image_file("DIAGRAM.PNG"));
    assert!(is_image_file("flow.svg"));
    assert!(is_image_file("photo.JpEg"));
    assert!(!is_image_file("workflow.pdf"));
    assert!(!is_image_file("archive.png.zip"));
}

#[tokio::test]
async fn image_workflow_file_is_inlined_as_base64() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("flow.png");
    std::fs::write(&path, b"fake png bytes").unwrap();

    let payload = build_process_flow(Some(&("flow.png".to_string(), path)))
        .await
        .expect("encode ok");
    assert_eq!(payload, STANDARD.encode(b"fake png bytes"));
}

#[tokio::test]
async fn non_image_workflow_file_yields_empty_payload() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("flow.pdf");
    std::fs::write(&path, b"%PDF-1.7").unwrap();

    let payload = build_process_flow(Some(&("flow.pdf".to_string(), path)))
        .await
        .expect("encode ok");
    assert_eq!(payload, "");
}

#[tokio::test]
async fn missing_workflow_file_yields_empty_payload() {
    let payload = build_process_flow(None).await.expect("encode ok");
    assert_eq!(payload, "");
}

#[tokio::test]
async fn unreadable_image_rejects_the_submission() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("gone.png");

    let err = build_process_flow(Some(&("gone.png".to_string(), path)))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::FileRead(_)));
}
