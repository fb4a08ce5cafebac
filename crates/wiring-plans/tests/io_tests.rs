mod common;

use common::*;
use tempfile::NamedTempFile;
use wiring_plans::*;

#[tokio::test]
async fn test_load_pdf() {
    let mut doc = create_marked_pdf(&["a", "b", "c", "d", "e"]);
    let temp = NamedTempFile::new().unwrap();

    let mut writer = Vec::new();
    doc.save_to(&mut writer).unwrap();
    std::fs::write(temp.path(), writer).unwrap();

    let loaded = load_pdf(temp.path()).await.unwrap();
    assert_eq!(loaded.get_pages().len(), 5);
}

#[tokio::test]
async fn test_save_then_load_keeps_page_order() {
    let temp = NamedTempFile::new().unwrap();
    save_pdf(create_marked_pdf(&["a", "b", "c"]), temp.path())
        .await
        .unwrap();

    let loaded = load_pdf(temp.path()).await.unwrap();
    assert_eq!(page_labels(&loaded), vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_parse_pdf_rejects_garbage() {
    let result = parse_pdf(b"not a pdf".to_vec()).await;
    assert!(matches!(result, Err(PlanError::Pdf(_))));
}

#[tokio::test]
async fn test_load_missing_file() {
    let result = load_pdf("/nonexistent/plan.pdf").await;
    assert!(matches!(result, Err(PlanError::Io(_))));
}
