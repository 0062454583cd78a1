//! Document download and print behavior.

use super::test_helpers::*;
use uuid::Uuid;

fn document_id(order: &serde_json::Value, index: usize) -> String {
    order["order"]["documents"][index]["id"]
        .as_str()
        .expect("document id")
        .to_string()
}

/// Two files with the same name in one upload are stored separately and
/// each is retrievable by its own id.
#[actix_rt::test]
async fn test_same_name_uploads_are_independently_retrievable() {
    let ctx = TestContext::new().await;
    let app = create_test_app(&ctx).await;

    let created = create_order_with_files(
        &app,
        &[
            ("photo.jpg", "image/jpeg", &b"front of box"[..]),
            ("photo.jpg", "image/jpeg", &b"back of box"[..]),
        ],
    )
    .await;

    let documents = created["order"]["documents"].as_array().unwrap();
    assert_eq!(documents.len(), 2);
    assert_eq!(created["files_failed"].as_array().unwrap().len(), 0);

    let first = document_id(&created, 0);
    let second = document_id(&created, 1);
    assert_ne!(first, second);

    let first_path = ctx
        .pool
        .get_document(Uuid::parse_str(&first).unwrap())
        .await
        .unwrap()
        .unwrap()
        .file_path;
    let second_path = ctx
        .pool
        .get_document(Uuid::parse_str(&second).unwrap())
        .await
        .unwrap()
        .unwrap()
        .file_path;
    assert_ne!(first_path, second_path);

    let (status, _, _, body) = get_raw(&app, &format!("/api/v1/documents/{}/download", first)).await;
    assert_eq!(status, 200);
    assert_eq!(body, b"front of box");

    let (status, _, _, body) = get_raw(&app, &format!("/api/v1/documents/{}/download", second)).await;
    assert_eq!(status, 200);
    assert_eq!(body, b"back of box");
}

#[actix_rt::test]
async fn test_download_unknown_document_returns_404() {
    let ctx = TestContext::new().await;
    let app = create_test_app(&ctx).await;

    let uri = format!("/api/v1/documents/{}/download", Uuid::new_v4());
    let (status, _, _, body) = get_raw(&app, &uri).await;

    assert_eq!(status, 404);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "Document not found");
}

#[actix_rt::test]
async fn test_print_unknown_document_returns_404() {
    let ctx = TestContext::new().await;
    let app = create_test_app(&ctx).await;

    let uri = format!("/api/v1/documents/{}/print", Uuid::new_v4());
    let (status, _, _, body) = get_raw(&app, &uri).await;

    assert_eq!(status, 404);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "Document not found");
}

#[actix_rt::test]
async fn test_download_and_print_differ_only_in_disposition() {
    let ctx = TestContext::new().await;
    let app = create_test_app(&ctx).await;

    let created =
        create_order_with_files(&app, &[("invoice.pdf", "application/pdf", &b"%PDF-1.7 invoice"[..])])
            .await;
    let id = document_id(&created, 0);

    let (status, download_type, download_disposition, download_body) =
        get_raw(&app, &format!("/api/v1/documents/{}/download", id)).await;
    assert_eq!(status, 200);

    let (status, print_type, print_disposition, print_body) =
        get_raw(&app, &format!("/api/v1/documents/{}/print", id)).await;
    assert_eq!(status, 200);

    assert_eq!(download_body, print_body);
    assert_eq!(download_type.as_deref(), Some("application/pdf"));
    assert_eq!(download_type, print_type);
    assert_eq!(
        download_disposition.as_deref(),
        Some("attachment; filename=\"invoice.pdf\"")
    );
    assert_eq!(
        print_disposition.as_deref(),
        Some("inline; filename=\"invoice.pdf\"")
    );
}

#[actix_rt::test]
async fn test_repeated_download_is_identical() {
    let ctx = TestContext::new().await;
    let app = create_test_app(&ctx).await;

    let created =
        create_order_with_files(&app, &[("notes.txt", "text/plain", &b"serials: A1, A2"[..])]).await;
    let uri = format!("/api/v1/documents/{}/download", document_id(&created, 0));

    let first = get_raw(&app, &uri).await;
    let second = get_raw(&app, &uri).await;

    assert_eq!(first, second);
}

/// Metadata row present but file deleted from disk.
#[actix_rt::test]
async fn test_missing_file_returns_distinct_404() {
    let ctx = TestContext::new().await;
    let app = create_test_app(&ctx).await;

    let created =
        create_order_with_files(&app, &[("quote.pdf", "application/pdf", &b"%PDF quote"[..])]).await;
    let id = document_id(&created, 0);

    let document = ctx
        .pool
        .get_document(Uuid::parse_str(&id).unwrap())
        .await
        .unwrap()
        .unwrap();
    std::fs::remove_file(&document.file_path).unwrap();

    for route in ["download", "print"] {
        let (status, _, _, body) =
            get_raw(&app, &format!("/api/v1/documents/{}/{}", id, route)).await;
        assert_eq!(status, 404);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "File not found on disk");
    }
}

#[actix_rt::test]
async fn test_malformed_document_id_returns_400() {
    let ctx = TestContext::new().await;
    let app = create_test_app(&ctx).await;

    let (status, _, _, _) = get_raw(&app, "/api/v1/documents/not-a-uuid/download").await;
    assert_eq!(status, 400);
}

/// A file part without a declared type is stored and served as octet-stream.
#[actix_rt::test]
async fn test_untyped_upload_defaults_to_octet_stream() {
    let ctx = TestContext::new().await;
    let app = create_test_app(&ctx).await;

    let body = MultipartBody::new()
        .text("order_number", "PO-7")
        .untyped_file("blob.bin", b"\x00\x01\x02");
    let (status, created) = post_multipart(&app, "/api/v1/orders", body).await;
    assert_eq!(status, 201);
    assert_eq!(
        created["order"]["documents"][0]["mime_type"],
        "application/octet-stream"
    );

    let (_, content_type, _, bytes) = get_raw(
        &app,
        &format!("/api/v1/documents/{}/download", document_id(&created, 0)),
    )
    .await;
    assert_eq!(content_type.as_deref(), Some("application/octet-stream"));
    assert_eq!(bytes, b"\x00\x01\x02");
}

/// Client names and content types longer than any fixed column width are
/// recorded in full and the file is not left orphaned.
#[actix_rt::test]
async fn test_long_file_name_and_type_are_recorded() {
    let ctx = TestContext::new().await;
    let app = create_test_app(&ctx).await;

    let long_name = format!("{}.pdf", "a".repeat(600));
    let long_type = format!("application/vnd.{}", "x".repeat(300));
    let body = MultipartBody::new()
        .text("order_number", "PO-LONG")
        .file(&long_name, &long_type, b"%PDF long");
    let (status, created) = post_multipart(&app, "/api/v1/orders", body).await;

    assert_eq!(status, 201);
    assert_eq!(created["files_failed"].as_array().unwrap().len(), 0);
    assert_eq!(created["order"]["documents"][0]["file_name"], long_name.as_str());
    assert_eq!(created["order"]["documents"][0]["mime_type"], long_type.as_str());

    let (status, content_type, disposition, bytes) = get_raw(
        &app,
        &format!("/api/v1/documents/{}/download", document_id(&created, 0)),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(content_type.as_deref(), Some(long_type.as_str()));
    assert_eq!(
        disposition,
        Some(format!("attachment; filename=\"{}\"", long_name))
    );
    assert_eq!(bytes, b"%PDF long");
}

/// Name, path and type columns carry no width limit.
#[actix_rt::test]
async fn test_document_text_columns_are_unbounded() {
    use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

    let ctx = TestContext::new().await;
    let rows = ctx
        .pool
        .connection()
        .query_all_raw(Statement::from_string(
            DatabaseBackend::Sqlite,
            "PRAGMA table_info(order_documents)".to_owned(),
        ))
        .await
        .unwrap();

    for column in ["file_name", "file_path", "mime_type"] {
        let declared = rows
            .iter()
            .find(|row| row.try_get::<String>("", "name").unwrap() == column)
            .map(|row| row.try_get::<String>("", "type").unwrap())
            .unwrap_or_else(|| panic!("column {} missing", column));
        assert!(
            declared.eq_ignore_ascii_case("text"),
            "{} declared as {}",
            column,
            declared
        );
    }
}
