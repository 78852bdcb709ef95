//! Integration tests for bulk enrollment

mod support;

use openedx_domain::{EnrollmentAction, EnrollmentRequest};
use openedx_infra::ApiError;
use serde_json::json;
use support::{client_for, grant_count, mount_token};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BULK_ENROLL: &str = "/api/bulk_enroll/v1/bulk_enroll/";
const COURSE: &str = "course-v1:edX+DemoX+2024";

fn identifier_result(email: &str) -> serde_json::Value {
    json!({
        "identifier": email,
        "before": {"enrollment": false, "allowed": false, "user": true, "auto_enroll": false},
        "after": {"enrollment": true, "allowed": false, "user": true, "auto_enroll": false}
    })
}

/// Validates an enroll call for two emails in one course.
///
/// # Test Steps
/// 1. Expect the comma-joined bulk enroll body
/// 2. Enroll two emails
/// 3. Verify the answer is keyed by the course id with two results
#[tokio::test(flavor = "multi_thread")]
async fn test_change_enrollment_enrolls_two_emails() {
    let server = MockServer::start().await;
    mount_token(&server, "abcd", 3600).await;
    Mock::given(method("POST"))
        .and(path(BULK_ENROLL))
        .and(header("Authorization", "Bearer abcd"))
        .and(body_json(json!({
            "auto_enroll": true,
            "email_students": true,
            "action": "enroll",
            "courses": COURSE,
            "identifiers": "ada@example.com,grace@example.com"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "action": "enroll",
            "auto_enroll": true,
            "email_students": true,
            "courses": {
                COURSE: {
                    "action": "enroll",
                    "auto_enroll": true,
                    "results": [
                        identifier_result("ada@example.com"),
                        identifier_result("grace@example.com")
                    ]
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = EnrollmentRequest::new(["ada@example.com", "grace@example.com"], [COURSE]);
    let result = client_for(&server).change_enrollment(&request).await.unwrap();

    let results = result["courses"][COURSE]["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    for entry in results {
        assert_eq!(entry["before"]["enrollment"], false);
        assert_eq!(entry["after"]["enrollment"], true);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unenroll_with_cohorts_and_site_override() {
    let lms = MockServer::start().await;
    let site = MockServer::start().await;
    mount_token(&lms, "abcd", 3600).await;
    Mock::given(method("POST"))
        .and(path(BULK_ENROLL))
        .and(body_json(json!({
            "auto_enroll": false,
            "email_students": false,
            "action": "unenroll",
            "courses": COURSE,
            "identifiers": "ada@example.com",
            "cohorts": "alpha"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"action": "unenroll"})))
        .expect(1)
        .mount(&site)
        .await;

    let request = EnrollmentRequest::new(["ada@example.com"], [COURSE])
        .action(EnrollmentAction::Unenroll)
        .auto_enroll(false)
        .email_students(false)
        .cohorts(["alpha"])
        .url(site.uri());

    let result = client_for(&lms).change_enrollment(&request).await.unwrap();
    assert_eq!(result["action"], "unenroll");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_empty_emails_rejected_before_any_request() {
    let server = MockServer::start().await;
    mount_token(&server, "abcd", 3600).await;

    let request = EnrollmentRequest::new(Vec::<String>::new(), [COURSE]);
    let err = client_for(&server).change_enrollment(&request).await.unwrap_err();

    assert!(matches!(err, ApiError::InvalidInput(_)), "got {err:?}");
    assert_eq!(grant_count(&server).await, 0);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_bad_request_is_http_error() {
    let server = MockServer::start().await;
    mount_token(&server, "abcd", 3600).await;
    Mock::given(method("POST"))
        .and(path(BULK_ENROLL))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"courses": ["Invalid course id"]})),
        )
        .mount(&server)
        .await;

    let request = EnrollmentRequest::new(["ada@example.com"], ["not-a-course"]);
    let err = client_for(&server).change_enrollment(&request).await.unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(err.body().unwrap()["courses"][0], "Invalid course id");
}
