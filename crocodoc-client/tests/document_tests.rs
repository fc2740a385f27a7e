//! Integration tests for uploads and document operations.

mod common;

use std::time::Duration;

use common::{client, client_with_threshold, json, raw, status, StubTransport, STUB_UUID, TOKEN};
use crocodoc_client::{
    AnnotationFilter, ApiError, ConversionStatus, CoreError, HttpMethod,
};
use serde_json::json;
use tempfile::TempDir;

fn stub_status(stub: &StubTransport, status: &str, viewable: bool) {
    let status = status.to_string();
    stub.route(HttpMethod::Get, "document/status", move |_| {
        json(json!([{"uuid": STUB_UUID, "status": status, "viewable": viewable}]))
    });
}

#[tokio::test]
async fn test_upload_file() {
    let stub = StubTransport::new();
    stub.reply(HttpMethod::Post, "document/upload", json(json!({"uuid": STUB_UUID})));
    let client = client(&stub);

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.pdf");
    std::fs::write(&path, b"%PDF-1.4").unwrap();

    let document = client.upload_file(&path).await.unwrap();
    assert_eq!(document.id(), STUB_UUID);

    let sent = stub.requests_to("document/upload");
    assert_eq!(sent.len(), 1);
    let file = sent[0].file.as_ref().unwrap();
    assert_eq!(file.field, "file");
    assert_eq!(file.file_name, "report.pdf");
    assert_eq!(file.mime, "application/pdf");
    assert_eq!(&file.contents[..], b"%PDF-1.4");
    assert_eq!(sent[0].form_value("token"), Some(TOKEN));
}

#[tokio::test]
async fn test_uploaded_document_converts() {
    let stub = StubTransport::new();
    stub.reply(HttpMethod::Post, "document/upload", json(json!({"uuid": STUB_UUID})));
    stub_status(&stub, "DONE", true);
    let client = client(&stub);

    let mut document = client.upload_url("https://example.com/doc.pdf").await.unwrap();
    assert_eq!(document.id(), STUB_UUID);
    assert!(document.is_converted().await.unwrap());
    assert!(document.viewable().await.unwrap());
    assert_eq!(stub.requests_to("document/status").len(), 1);
}

#[tokio::test]
async fn test_upload_missing_file_sends_nothing() {
    let stub = StubTransport::new();
    let client = client(&stub);

    let result = client.upload_file("/no/such/file.docx").await;
    assert!(matches!(result, Err(ApiError::FileNotFound(_))));
    assert_eq!(stub.request_count(), 0);
}

#[tokio::test]
async fn test_upload_url() {
    let stub = StubTransport::new();
    stub.reply(HttpMethod::Post, "document/upload", json(json!({"uuid": STUB_UUID})));
    let client = client(&stub);

    let document = client.upload_url("https://example.com/doc.pdf").await.unwrap();
    assert_eq!(document.id(), STUB_UUID);
    assert_eq!(
        stub.requests()[0].form_value("url"),
        Some("https://example.com/doc.pdf")
    );
}

#[tokio::test]
async fn test_upload_invalid_url_is_usage_error() {
    let stub = StubTransport::new();
    let client = client(&stub);

    let err = client.upload_url("not a url").await.unwrap_err();
    assert!(err.is_usage_error());
    assert_eq!(stub.request_count(), 0);
}

#[tokio::test]
async fn test_upload_refused_by_service() {
    let stub = StubTransport::new();
    stub.reply(
        HttpMethod::Post,
        "document/upload",
        json(json!({"error": "invalid file type"})),
    );
    let client = client(&stub);

    let result = client.upload_url("https://example.com/doc.exe").await;
    assert!(matches!(result, Err(ApiError::Rejected(msg)) if msg == "invalid file type"));
}

#[tokio::test]
async fn test_status_is_memoized_within_threshold() {
    let stub = StubTransport::new();
    stub_status(&stub, "DONE", true);
    let client = client(&stub);
    let mut document = client.document(STUB_UUID).unwrap();

    let first = document.status(false).await.unwrap();
    let second = document.status(false).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.status, ConversionStatus::Done);
    assert_eq!(stub.requests_to("document/status").len(), 1);
    assert_eq!(
        stub.requests()[0].query_value("uuids"),
        Some(STUB_UUID)
    );
}

#[tokio::test]
async fn test_force_refresh_bypasses_memo() {
    let stub = StubTransport::new();
    stub_status(&stub, "QUEUED", false);
    let client = client(&stub);
    let mut document = client.document(STUB_UUID).unwrap();

    document.status(false).await.unwrap();
    document.status(true).await.unwrap();
    assert_eq!(stub.requests_to("document/status").len(), 2);
}

#[tokio::test]
async fn test_status_refreshes_after_threshold() {
    let stub = StubTransport::new();
    stub_status(&stub, "QUEUED", false);
    let client = client_with_threshold(&stub, Duration::from_millis(50));
    let mut document = client.document(STUB_UUID).unwrap();

    let first = document.status(false).await.unwrap();
    assert_eq!(first.status, ConversionStatus::Queued);

    stub_status(&stub, "DONE", true);
    tokio::time::sleep(Duration::from_millis(80)).await;

    let second = document.status(false).await.unwrap();
    assert_eq!(second.status, ConversionStatus::Done);
    assert_ne!(first.refreshed_at, second.refreshed_at);
    assert_eq!(stub.requests_to("document/status").len(), 2);
}

#[tokio::test]
async fn test_status_accessors() {
    let stub = StubTransport::new();
    stub.reply(
        HttpMethod::Get,
        "document/status",
        json(json!([{
            "uuid": STUB_UUID,
            "status": "ERROR",
            "viewable": false,
            "error": "password protected"
        }])),
    );
    let client = client(&stub);
    let mut document = client.document(STUB_UUID).unwrap();
    assert!(document.cached_status().is_unfetched());

    assert!(!document.viewable().await.unwrap());
    assert_eq!(document.error().await.unwrap().as_deref(), Some("password protected"));
    assert!(!document.is_converted().await.unwrap());
    assert_eq!(document.cached_status().status, ConversionStatus::Error);
    assert_eq!(stub.request_count(), 1);
}

#[tokio::test]
async fn test_delete() {
    let stub = StubTransport::new();
    stub.reply(HttpMethod::Post, "document/delete", raw("text/plain", "true"));
    let client = client(&stub);
    let document = client.document(STUB_UUID).unwrap();

    assert!(document.delete().await.unwrap());
    let sent = stub.requests_to("document/delete");
    assert_eq!(sent[0].form_value("uuid"), Some(STUB_UUID));
    assert_eq!(sent[0].form_value("token"), Some(TOKEN));
}

#[tokio::test]
async fn test_delete_unknown_document() {
    let stub = StubTransport::new();
    stub.reply(HttpMethod::Post, "document/delete", status(400, "invalid uuid"));
    let client = client(&stub);
    let document = client.document("missing").unwrap();

    let err = document.delete().await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidArgument(msg) if msg == "invalid uuid"));
}

#[tokio::test]
async fn test_download_thumbnail() {
    let stub = StubTransport::new();
    stub.reply(
        HttpMethod::Get,
        "download/thumbnail",
        raw("image/png", vec![0x89, b'P', b'N', b'G']),
    );
    let client = client(&stub);
    let document = client.document(STUB_UUID).unwrap();

    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("thumb.png");
    document.download_thumbnail(&dest, 100, 150).await.unwrap();

    assert_eq!(std::fs::read(&dest).unwrap(), vec![0x89, b'P', b'N', b'G']);
    assert_eq!(stub.requests()[0].query_value("size"), Some("100x150"));
}

#[tokio::test]
async fn test_thumbnail_size_out_of_range() {
    let stub = StubTransport::new();
    let client = client(&stub);
    let document = client.document(STUB_UUID).unwrap();
    let dir = TempDir::new().unwrap();

    for (w, h) in [(0, 100), (100, 301)] {
        let err = document
            .download_thumbnail(dir.path().join("t.png"), w, h)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Core(CoreError::InvalidArgument(_))));
    }
    assert_eq!(stub.request_count(), 0);
}

#[tokio::test]
async fn test_download_original_and_pdf() {
    let stub = StubTransport::new();
    stub.route(HttpMethod::Get, "download/document", |request| {
        let body = if request.query_value("pdf") == Some("true") {
            "pdf bytes"
        } else {
            "original bytes"
        };
        raw("application/octet-stream", body)
    });
    let client = client(&stub);
    let document = client.document(STUB_UUID).unwrap();
    let dir = TempDir::new().unwrap();

    let original = dir.path().join("original.docx");
    document.download_original(&original).await.unwrap();
    assert_eq!(std::fs::read_to_string(&original).unwrap(), "original bytes");

    let pdf = dir.path().join("annotated.pdf");
    document
        .download_pdf(&pdf, &AnnotationFilter::users([1000, 42]))
        .await
        .unwrap();
    assert_eq!(std::fs::read_to_string(&pdf).unwrap(), "pdf bytes");

    let sent = stub.requests_to("download/document");
    assert_eq!(sent[0].query_value("pdf"), Some("false"));
    assert_eq!(sent[0].query_value("annotated"), Some("false"));
    assert_eq!(sent[1].query_value("annotated"), Some("true"));
    assert_eq!(sent[1].query_value("filter"), Some("42,1000"));
}

#[tokio::test]
async fn test_download_pdf_without_annotations() {
    let stub = StubTransport::new();
    stub.reply(HttpMethod::Get, "download/document", raw("application/pdf", "pdf"));
    let client = client(&stub);
    let document = client.document(STUB_UUID).unwrap();
    let dir = TempDir::new().unwrap();

    document
        .download_pdf(dir.path().join("plain.pdf"), &AnnotationFilter::default())
        .await
        .unwrap();

    let sent = stub.requests_to("download/document");
    assert_eq!(sent[0].query_value("annotated"), Some("false"));
    assert_eq!(sent[0].query_value("filter"), None);
}

#[tokio::test]
async fn test_extracted_text_splits_pages() {
    let stub = StubTransport::new();
    stub.reply(
        HttpMethod::Get,
        "download/text",
        raw("text/plain", "Page one\u{c}Page two\u{c}"),
    );
    let client = client(&stub);
    let document = client.document(STUB_UUID).unwrap();

    let pages = document.extracted_text().await.unwrap();
    assert_eq!(pages, vec!["Page one", "Page two"]);
}

#[tokio::test]
async fn test_error_statuses_are_classified() {
    let stub = StubTransport::new();
    stub.reply(HttpMethod::Get, "document/status", status(401, "bad token"));
    stub.reply(HttpMethod::Get, "download/text", status(503, "down"));
    let client = client(&stub);
    let mut document = client.document(STUB_UUID).unwrap();

    assert!(matches!(document.status(false).await, Err(ApiError::InvalidToken)));
    assert!(matches!(
        document.extracted_text().await,
        Err(ApiError::Server { status: 503 })
    ));
    assert!(matches!(
        document.download_original("/tmp/never-written").await,
        Err(ApiError::NotFound)
    ));
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_status() {
    let stub = StubTransport::new();
    stub_status(&stub, "DONE", true);
    let client = client(&stub);
    let mut document = client.document(STUB_UUID).unwrap();
    document.status(false).await.unwrap();

    stub.reply(HttpMethod::Get, "document/status", status(500, "boom"));
    assert!(document.status(true).await.is_err());
    assert_eq!(document.cached_status().status, ConversionStatus::Done);
}
