//! Integration tests for mail submission and delivery.

use http::StatusCode;

use docmail_entity::audit::EMAIL_SENT;
use docmail_entity::permission::Permission;

use crate::helpers::{FROM, TestApp, form, sender_email};

const SENDER: i64 = 7;

#[tokio::test]
async fn test_single_document_is_sent_and_audited() {
    let app = TestApp::new();
    let mailer = app.add_mailer();
    let doc = app.entities.add_document("Quarterly report");
    app.entities.add_file(doc.id, "report.pdf", "docs/report.pdf");
    app.storage.put("docs/report.pdf", b"%PDF-1.4".to_vec());
    app.grant(SENDER, "document", doc.id.get(), Permission::SendDocumentAttachment).await;
    app.grant(SENDER, "user_mailer", mailer.id.get(), Permission::UserMailerUse).await;

    let path = format!("/api/documents/{}/mail?next=/documents/{}", doc.id, doc.id);
    let response = app
        .request("POST", &path, Some(form("alice@example.com")), Some(&app.token(SENDER)))
        .await;

    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location, Some(format!("/documents/{}", doc.id)));
    assert_eq!(response.body["queued"], 1);
    assert_eq!(response.body["message"], "1 document queued for email delivery");

    let report = app.drain().await;
    assert_eq!(report.completed, 1);
    assert_eq!(report.failed, 0);

    let sent = app.outbox.messages().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, vec!["alice@example.com".to_string()]);
    assert_eq!(sent[0].from.as_deref(), Some(FROM));
    assert_eq!(sent[0].subject, "Quarterly report");
    assert!(sent[0].body.contains("Quarterly report"));
    assert!(sent[0].attachments.is_empty());

    let events = app.audit.all().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].verb, EMAIL_SENT);
    assert_eq!(events[0].actor, sender_email(SENDER));
    assert_eq!(events[0].target_type, "user_mailer");
    assert_eq!(events[0].target_id, mailer.id.get());
    assert_eq!(events[0].action_object_type.as_deref(), Some("document"));
    assert_eq!(events[0].action_object_id, Some(doc.id.get()));
}

#[tokio::test]
async fn test_document_file_is_sent_as_attachment() {
    let app = TestApp::new();
    let mailer = app.add_mailer();
    let doc = app.entities.add_document("Quarterly report");
    let file = app.entities.add_file(doc.id, "report.pdf", "docs/report.pdf");
    app.storage.put("docs/report.pdf", b"%PDF-1.4".to_vec());
    app.grant(SENDER, "document", doc.id.get(), Permission::SendDocumentFileAttachment).await;
    app.grant(SENDER, "user_mailer", mailer.id.get(), Permission::UserMailerUse).await;

    let path = format!("/api/document-files/{}/mail", file.id);
    let response = app
        .request("POST", &path, Some(form("alice@example.com")), Some(&app.token(SENDER)))
        .await;
    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location.as_deref(), Some("/"));
    assert_eq!(response.body["message"], "1 document file queued for email delivery");

    assert_eq!(app.drain().await.completed, 1);
    let sent = app.outbox.messages().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].attachments.len(), 1);
    assert_eq!(sent[0].attachments[0].filename, "report.pdf");

    let events = app.audit.all().await;
    assert_eq!(events[0].actor, sender_email(SENDER));
    assert_eq!(events[0].action_object_type.as_deref(), Some("document_file"));
    assert_eq!(events[0].action_object_id, Some(file.id.get()));
}

#[tokio::test]
async fn test_document_without_permission_is_not_found() {
    let app = TestApp::new();
    let mailer = app.add_mailer();
    let doc = app.entities.add_document("Private");
    app.grant(SENDER, "user_mailer", mailer.id.get(), Permission::UserMailerUse).await;

    let path = format!("/api/documents/{}/mail", doc.id);
    let response = app
        .request("POST", &path, Some(form("alice@example.com")), Some(&app.token(SENDER)))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(app.drain().await.completed, 0);
    assert!(app.outbox.is_empty().await);
    assert!(app.audit.all().await.is_empty());
}

#[tokio::test]
async fn test_trashed_document_is_not_found() {
    let app = TestApp::new();
    let mailer = app.add_mailer();
    let doc = app.entities.add_document("Old");
    app.grant(SENDER, "document", doc.id.get(), Permission::SendDocumentAttachment).await;
    app.grant(SENDER, "user_mailer", mailer.id.get(), Permission::UserMailerUse).await;
    app.entities.trash_document(doc.id);

    let path = format!("/api/documents/{}/mail", doc.id);
    let response = app
        .request("POST", &path, Some(form("alice@example.com")), Some(&app.token(SENDER)))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(app.drain().await.completed, 0);
    assert!(app.outbox.is_empty().await);
    assert!(app.audit.all().await.is_empty());
}

#[tokio::test]
async fn test_batch_link_queues_only_permitted_files() {
    let app = TestApp::new();
    let mailer = app.add_mailer();
    app.grant(SENDER, "user_mailer", mailer.id.get(), Permission::UserMailerUse).await;

    let mut file_ids = Vec::new();
    for i in 0..3 {
        let doc = app.entities.add_document(&format!("Doc {i}"));
        let file = app.entities.add_file(doc.id, &format!("f{i}.txt"), &format!("f{i}.txt"));
        if i < 2 {
            app.grant(SENDER, "document", doc.id.get(), Permission::SendDocumentFileLink).await;
        }
        file_ids.push(file.id.get());
    }

    let query = file_ids
        .iter()
        .map(|id| format!("id={id}"))
        .collect::<Vec<_>>()
        .join("&");
    let path = format!("/api/document-files/mail-link?{query}");
    let response = app
        .request("POST", &path, Some(form("bob@example.com")), Some(&app.token(SENDER)))
        .await;

    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location.as_deref(), Some("/"));
    assert_eq!(response.body["queued"], 2);
    assert_eq!(
        response.body["message"],
        "2 document file links queued for email delivery"
    );

    let report = app.drain().await;
    assert_eq!(report.completed, 2);

    let sent = app.outbox.messages().await;
    assert_eq!(sent.len(), 2);
    for email in &sent {
        assert!(email.attachments.is_empty());
        assert!(email.body.contains("http://dms.test/documents/documents/files/"));
    }
    assert!(
        !sent
            .iter()
            .any(|e| e.body.contains(&format!("/files/{}/preview/", file_ids[2])))
    );
}

#[tokio::test]
async fn test_mailer_use_denied_is_forbidden() {
    let app = TestApp::new();
    app.add_mailer();
    let doc = app.entities.add_document("Doc");
    app.grant(SENDER, "document", doc.id.get(), Permission::SendDocumentLink).await;

    let path = format!("/api/documents/{}/mail-link", doc.id);
    let response = app
        .request("POST", &path, Some(form("alice@example.com")), Some(&app.token(SENDER)))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error"], "FORBIDDEN");
    let report = app.drain().await;
    assert_eq!(report.completed + report.failed, 0);
    assert!(app.outbox.is_empty().await);
}

#[tokio::test]
async fn test_link_permission_does_not_allow_attachment() {
    let app = TestApp::new();
    let mailer = app.add_mailer();
    let doc = app.entities.add_document("Doc");
    let version = app.entities.add_version(doc.id, Some("v.pdf"));
    app.grant(SENDER, "document", doc.id.get(), Permission::SendDocumentVersionLink).await;
    app.grant(SENDER, "user_mailer", mailer.id.get(), Permission::UserMailerUse).await;
    let token = app.token(SENDER);

    let attach = app
        .request(
            "POST",
            &format!("/api/document-versions/{}/mail", version.id),
            Some(form("alice@example.com")),
            Some(&token),
        )
        .await;
    assert_eq!(attach.status, StatusCode::NOT_FOUND);

    let link = app
        .request(
            "POST",
            &format!("/api/document-versions/{}/mail-link", version.id),
            Some(form("alice@example.com")),
            Some(&token),
        )
        .await;
    assert_eq!(link.status, StatusCode::FOUND);
    assert_eq!(
        link.body["message"],
        "1 document version link queued for email delivery"
    );
}

#[tokio::test]
async fn test_entity_removed_after_enqueue_still_sends() {
    let app = TestApp::new();
    let mailer = app.add_mailer();
    let doc = app.entities.add_document("Ephemeral");
    app.grant(SENDER, "document", doc.id.get(), Permission::SendDocumentLink).await;
    app.grant(SENDER, "user_mailer", mailer.id.get(), Permission::UserMailerUse).await;

    let path = format!("/api/documents/{}/mail-link", doc.id);
    let response = app
        .request("POST", &path, Some(form("alice@example.com")), Some(&app.token(SENDER)))
        .await;
    assert_eq!(response.status, StatusCode::FOUND);

    app.entities.delete_document(doc.id);

    let report = app.drain().await;
    assert_eq!(report.completed, 1);

    let sent = app.outbox.messages().await;
    assert_eq!(sent.len(), 1);
    assert!(sent[0].attachments.is_empty());

    let events = app.audit.all().await;
    assert_eq!(events.len(), 1);
    assert!(events[0].action_object().is_none());
}

#[tokio::test]
async fn test_mailer_removed_before_execution_fails_job() {
    let app = TestApp::new();
    let mailer = app.add_mailer();
    let doc = app.entities.add_document("Doc");
    app.grant(SENDER, "document", doc.id.get(), Permission::SendDocumentLink).await;
    app.grant(SENDER, "user_mailer", mailer.id.get(), Permission::UserMailerUse).await;

    let path = format!("/api/documents/{}/mail-link", doc.id);
    let response = app
        .request("POST", &path, Some(form("alice@example.com")), Some(&app.token(SENDER)))
        .await;
    assert_eq!(response.status, StatusCode::FOUND);

    app.mailers.remove(mailer.id);

    let report = app.drain().await;
    assert_eq!(report.completed, 0);
    assert_eq!(report.failed, 1);
    assert!(app.outbox.is_empty().await);
    assert!(app.audit.all().await.is_empty());
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = TestApp::new();
    let response = app
        .request("POST", "/api/documents/1/mail", Some(form("alice@example.com")), None)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_invalid_token_is_unauthorized() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/api/documents/1/mail",
            Some(form("alice@example.com")),
            Some("not-a-token"),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_recipient_is_bad_request() {
    let app = TestApp::new();
    let mailer = app.add_mailer();
    let doc = app.entities.add_document("Doc");
    app.grant(SENDER, "document", doc.id.get(), Permission::SendDocumentAttachment).await;
    app.grant(SENDER, "user_mailer", mailer.id.get(), Permission::UserMailerUse).await;

    let path = format!("/api/documents/{}/mail", doc.id);
    let response = app
        .request("POST", &path, Some(form("not an address")), Some(&app.token(SENDER)))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
    assert_eq!(app.drain().await.completed, 0);
}

#[tokio::test]
async fn test_disabled_mailer_is_bad_request() {
    let app = TestApp::new();
    let mailer = app.add_mailer();
    app.mailers.set_enabled(mailer.id, false);
    let doc = app.entities.add_document("Doc");

    let path = format!("/api/documents/{}/mail", doc.id);
    let response = app
        .request(
            "POST",
            &path,
            Some(serde_json::json!({
                "recipient": "alice@example.com",
                "user_mailer_id": mailer.id.get(),
            })),
            Some(&app.token(SENDER)),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unusable_next_redirects_home() {
    let app = TestApp::new();
    let mailer = app.add_mailer();
    let doc = app.entities.add_document("Notes");
    app.grant(SENDER, "document", doc.id.get(), Permission::SendDocumentLink).await;
    app.grant(SENDER, "user_mailer", mailer.id.get(), Permission::UserMailerUse).await;
    let token = app.token(SENDER);

    for next in ["/a%0Ab", "/%5Cevil.example", "//evil.example"] {
        let path = format!("/api/documents/{}/mail-link?next={next}", doc.id);
        let response = app
            .request("POST", &path, Some(form("alice@example.com")), Some(&token))
            .await;
        assert_eq!(response.status, StatusCode::FOUND, "next={next}");
        assert_eq!(response.location.as_deref(), Some("/"), "next={next}");
        assert_eq!(response.body["queued"], 1);
    }
    assert_eq!(app.drain().await.completed, 3);
}
