//! Integration tests for upload, listing and signed retrieval.

mod common;

use std::time::Duration;

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use cheddit_storage::ObjectStore;
use common::{
    body_bytes, body_json, build_test_app, get, local_path_of, signup, upload_file, upload_pdf,
};

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

#[tokio::test]
async fn faculty_upload_stores_blob_and_record() {
    let app = build_test_app();
    let prof = signup(&app.router, "Prof", "prof@campus.edu", true).await;

    let response = upload_file(
        &app.router,
        "Week 1/report.pdf",
        "application/pdf",
        b"%PDF-1.7 body",
        Some(&prof.token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["message"], "Upload successful");
    assert_eq!(json["record"]["owner_id"], prof.id.as_str());
    let path = json["record"]["storage_path"].as_str().unwrap();
    assert!(path.starts_with("pdf/"));
    assert!(path.ends_with("_report.pdf"));

    assert_eq!(app.objects.download(path).await.unwrap(), b"%PDF-1.7 body");
}

#[tokio::test]
async fn upload_requires_faculty_session() {
    let app = build_test_app();
    let student = signup(&app.router, "Stu", "stu@campus.edu", false).await;

    let response = upload_file(
        &app.router,
        "notes.pdf",
        "application/pdf",
        b"%PDF",
        Some(&student.token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = upload_file(&app.router, "notes.pdf", "application/pdf", b"%PDF", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_pdf_upload_is_rejected() {
    let app = build_test_app();
    let prof = signup(&app.router, "Prof", "prof@campus.edu", true).await;

    let response = upload_file(
        &app.router,
        "notes.txt",
        "text/plain",
        b"hello",
        Some(&prof.token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "UNSUPPORTED_MEDIA_TYPE");
    assert!(app.objects.list("pdf").await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn listing_shows_only_pdfs() {
    let app = build_test_app();
    let prof = signup(&app.router, "Prof", "prof@campus.edu", true).await;
    let path = upload_pdf(&app.router, &prof, "report.pdf").await;
    app.objects
        .upload("pdf/stray.txt", b"x".to_vec(), "text/plain")
        .await
        .unwrap();

    let response = get(&app.router, "/api/pdfs", Some(&prof.token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let pdfs = json["pdfs"].as_array().unwrap();
    assert_eq!(pdfs.len(), 1);
    assert_eq!(pdfs[0]["key"], path.as_str());
    assert_eq!(pdfs[0]["displayUrl"], format!("/api/pdf/{path}"));
    assert!(pdfs[0]["name"].as_str().unwrap().ends_with("_report.pdf"));

    let response = get(&app.router, "/api/pdfs", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Retrieval
// ---------------------------------------------------------------------------

#[tokio::test]
async fn signed_url_round_trip() {
    let app = build_test_app();
    let prof = signup(&app.router, "Prof", "prof@campus.edu", true).await;
    let student = signup(&app.router, "Stu", "stu@campus.edu", false).await;
    let path = upload_pdf(&app.router, &prof, "report.pdf").await;

    let response = get(&app.router, &format!("/api/pdf/{path}"), Some(&student.token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let url = body_json(response).await["url"].as_str().unwrap().to_string();
    assert!(url.starts_with("http://localhost:3000/api/objects/pdf/"));

    // The signed URL itself is the credential: no session needed.
    let response = get(&app.router, &local_path_of(&url), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "application/pdf");
    assert_eq!(body_bytes(response).await, b"%PDF-1.7 test document");
}

#[tokio::test]
async fn direct_path_guessing_and_tampering_are_refused() {
    let app = build_test_app();
    let prof = signup(&app.router, "Prof", "prof@campus.edu", true).await;
    let path = upload_pdf(&app.router, &prof, "report.pdf").await;

    let response = get(&app.router, &format!("/api/objects/{path}"), None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");

    let url = app
        .objects
        .create_signed_url(&path, Duration::from_secs(30))
        .await
        .unwrap();
    let tampered = local_path_of(&url).replace("signature=", "signature=00");
    let response = get(&app.router, &tampered, None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "INVALID_SIGNATURE");
}

#[tokio::test]
async fn signed_url_is_refused_after_ttl() {
    let app = build_test_app();
    let prof = signup(&app.router, "Prof", "prof@campus.edu", true).await;
    let path = upload_pdf(&app.router, &prof, "report.pdf").await;

    let issued = chrono::Utc::now() - chrono::Duration::seconds(31);
    let url = app
        .objects
        .signed_url_at(&path, Duration::from_secs(30), issued)
        .unwrap();

    let response = get(&app.router, &local_path_of(&url), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "SIGNED_URL_EXPIRED");
}

#[tokio::test]
async fn inline_variant_streams_bytes() {
    let app = build_test_app();
    let prof = signup(&app.router, "Prof", "prof@campus.edu", true).await;
    let path = upload_pdf(&app.router, &prof, "report.pdf").await;

    let response = get(
        &app.router,
        &format!("/api/pdf/{path}?inline=true"),
        Some(&prof.token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "application/pdf");
    assert!(response.headers()[CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .starts_with("inline"));
    assert_eq!(body_bytes(response).await, b"%PDF-1.7 test document");
}

#[tokio::test]
async fn missing_document_is_404() {
    let app = build_test_app();
    let student = signup(&app.router, "Stu", "stu@campus.edu", false).await;

    let response = get(&app.router, "/api/pdf/pdf/nope.pdf", Some(&student.token)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(&app.router, "/api/pdf/pdf/nope.pdf", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
