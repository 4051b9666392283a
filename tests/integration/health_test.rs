//! Integration tests for the health check.

use http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_health_without_database() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["database"], "memory");
    assert_eq!(response.body["storage"], "available");
}
