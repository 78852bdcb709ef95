//! Integration tests for course listing and pagination

mod support;

use openedx_infra::ApiError;
use serde_json::json;
use support::{client_for, mount_token};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COURSES: &str = "/api/courses/v1/courses";

fn course(id: &str, org: &str) -> serde_json::Value {
    json!({"id": id, "course_id": id, "org": org, "name": format!("Course {id}")})
}

/// Validates that all pages are concatenated in arrival order.
///
/// # Test Steps
/// 1. Mount page 1 linking to page 2 through `pagination.next`
/// 2. List courses
/// 3. Verify three courses in order
#[tokio::test(flavor = "multi_thread")]
async fn test_list_all_courses_follows_pagination() {
    let server = MockServer::start().await;
    mount_token(&server, "abcd", 3600).await;

    let next = format!("{}{COURSES}?page=2", server.uri());
    Mock::given(method("GET"))
        .and(path(COURSES))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [course("course-v1:edX+C3+2024", "edX")],
            "pagination": {"next": null, "previous": null, "count": 3, "num_pages": 2}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(COURSES))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [course("course-v1:edX+C1+2024", "edX"), course("course-v1:MITx+C2+2024", "MITx")],
            "pagination": {"next": next, "previous": null, "count": 3, "num_pages": 2}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let courses = client_for(&server).list_all_courses(None).await.unwrap();

    let ids: Vec<_> = courses.iter().map(|c| c["id"].as_str().unwrap()).collect();
    assert_eq!(ids, ["course-v1:edX+C1+2024", "course-v1:MITx+C2+2024", "course-v1:edX+C3+2024"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_all_courses_filters_by_org() {
    let server = MockServer::start().await;
    mount_token(&server, "abcd", 3600).await;

    let next = format!("{}{COURSES}?org=edX&page=2", server.uri());
    Mock::given(method("GET"))
        .and(path(COURSES))
        .and(query_param("org", "edX"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [course("course-v1:edX+C3+2024", "edX")],
            "pagination": {"next": null}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(COURSES))
        .and(query_param("org", "edX"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [course("course-v1:edX+C1+2024", "edX")],
            "pagination": {"next": next}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let courses = client_for(&server).list_all_courses(Some("edX")).await.unwrap();

    assert_eq!(courses.len(), 2);
    assert!(courses.iter().all(|c| c["org"] == "edX"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_plain_list_response_is_single_page() {
    let server = MockServer::start().await;
    mount_token(&server, "abcd", 3600).await;
    Mock::given(method("GET"))
        .and(path(COURSES))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([course("c1", "edX")])))
        .mount(&server)
        .await;

    let courses = client_for(&server).list_all_courses(None).await.unwrap();
    assert_eq!(courses, vec![course("c1", "edX")]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_page_fails_whole_listing() {
    let server = MockServer::start().await;
    mount_token(&server, "abcd", 3600).await;

    let next = format!("{}{COURSES}?page=2", server.uri());
    Mock::given(method("GET"))
        .and(path(COURSES))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(COURSES))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [course("c1", "edX")],
            "pagination": {"next": next}
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).list_all_courses(None).await.unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 500, .. }), "got {err:?}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_self_referencing_next_is_rejected() {
    let server = MockServer::start().await;
    mount_token(&server, "abcd", 3600).await;

    let next = format!("{}{COURSES}", server.uri());
    Mock::given(method("GET"))
        .and(path(COURSES))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [],
            "pagination": {"next": next}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server).list_all_courses(None).await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)), "got {err:?}");
}
