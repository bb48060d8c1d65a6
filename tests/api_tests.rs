//! Integration tests for the GitLab client against a mock server.

use futures::StreamExt;
use integrations_gitlab::services::issues::ListIssuesParams;
use integrations_gitlab::services::projects::ListProjectsParams;
use integrations_gitlab::{
    AuthMethod, GitLabClient, GitLabErrorKind, Issue, Project, RequestOptions,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> GitLabClient {
    GitLabClient::builder()
        .base_url(server.uri())
        .auth(AuthMethod::private_token("glpat-test"))
        .no_retry()
        .build()
        .unwrap()
}

fn project_fixture(id: u64, path_with_namespace: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": "Example",
        "path": "example",
        "path_with_namespace": path_with_namespace,
        "description": null,
        "visibility": "private",
        "default_branch": "main",
        "web_url": format!("https://gitlab.example.com/{}", path_with_namespace),
        "star_count": 3,
        "forks_count": 1,
        "archived": false
    })
}

fn issue_fixture(iid: u64) -> serde_json::Value {
    json!({
        "id": iid + 1000,
        "iid": iid,
        "project_id": 42,
        "title": format!("Issue {}", iid),
        "state": "opened"
    })
}

#[tokio::test]
async fn get_project_decodes_fixture_and_sends_private_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/gitlab-org%2Fgitlab"))
        .and(header("PRIVATE-TOKEN", "glpat-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(project_fixture(
            278964,
            "gitlab-org/gitlab",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let project: Project = client.projects().get("gitlab-org/gitlab").await.unwrap();

    assert_eq!(project.id, 278964);
    assert_eq!(project.path_with_namespace, "gitlab-org/gitlab");
    assert_eq!(project.default_branch.as_deref(), Some("main"));
}

#[tokio::test]
async fn numeric_project_id_is_used_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/42"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(project_fixture(42, "acme/app")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let project = client.projects().get(42u64).await.unwrap();
    assert_eq!(project.id, 42);
}

#[tokio::test]
async fn api_error_body_is_decoded_into_typed_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/999"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"message": "404 Project Not Found"}))
                .insert_header("x-request-id", "req-abc"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.projects().get(999u64).await.unwrap_err();

    assert_eq!(*err.kind(), GitLabErrorKind::NotFound);
    assert_eq!(err.status_code(), Some(404));
    assert_eq!(err.message(), "404 Project Not Found");
    assert_eq!(err.request_id(), Some("req-abc"));
}

#[tokio::test]
async fn sudo_option_sets_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects"))
        .and(header("Sudo", "other-user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let options = RequestOptions::new().sudo("other-user");
    let projects: Vec<Project> = client
        .get_with_options("projects", &ListProjectsParams::default(), &options)
        .await
        .unwrap();

    assert!(projects.is_empty());
}

#[tokio::test]
async fn offset_pagination_aggregates_pages_in_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/42/issues"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([issue_fixture(3), issue_fixture(4)]))
                .insert_header("x-page", "2")
                .insert_header("x-next-page", "3"),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/projects/42/issues"))
        .and(query_param("page", "3"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([issue_fixture(5)]))
                .insert_header("x-page", "3")
                .insert_header("x-next-page", ""),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/projects/42/issues"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([issue_fixture(1), issue_fixture(2)]))
                .insert_header("x-page", "1")
                .insert_header("x-next-page", "2"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let issues: Vec<Issue> = client
        .issues()
        .list_for_project_paginated(42u64, ListIssuesParams::default())
        .collect_all()
        .await
        .unwrap();

    let iids: Vec<u64> = issues.iter().map(|i| i.iid).collect();
    assert_eq!(iids, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn keyset_pagination_follows_link_header() {
    let server = MockServer::start().await;
    let next_url = format!("{}/projects?id_after=2", server.uri());

    Mock::given(method("GET"))
        .and(path("/projects"))
        .and(query_param("id_after", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([project_fixture(3, "acme/three")])),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([
                    project_fixture(1, "acme/one"),
                    project_fixture(2, "acme/two")
                ]))
                .insert_header("link", format!(r#"<{}>; rel="next""#, next_url).as_str()),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let projects = client
        .projects()
        .list_paginated(ListProjectsParams::default())
        .collect_all()
        .await
        .unwrap();

    let ids: Vec<u64> = projects.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn lazy_stream_yields_error_then_resumes() {
    let server = MockServer::start().await;

    // First hit fails, every later hit succeeds with a single page.
    Mock::given(method("GET"))
        .and(path("/projects/42/issues"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({"message": "temporarily down"})),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/projects/42/issues"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([issue_fixture(1), issue_fixture(2)]))
                .insert_header("x-next-page", ""),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let results: Vec<_> = client
        .issues()
        .list_for_project_paginated(42u64, ListIssuesParams::default())
        .into_stream()
        .collect()
        .await;

    assert_eq!(results.len(), 3);
    assert_eq!(
        *results[0].as_ref().unwrap_err().kind(),
        GitLabErrorKind::ServiceUnavailable
    );
    assert_eq!(results[1].as_ref().unwrap().iid, 1);
    assert_eq!(results[2].as_ref().unwrap().iid, 2);
}

#[tokio::test]
async fn create_issue_posts_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/projects/42/issues"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(201).set_body_json(issue_fixture(9)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = integrations_gitlab::services::issues::CreateIssueRequest {
        title: "Issue 9".to_string(),
        description: None,
        labels: None,
        assignee_ids: None,
        milestone_id: None,
        confidential: None,
    };

    let issue = client.issues().create(42u64, &request).await.unwrap();
    assert_eq!(issue.iid, 9);
}

#[tokio::test]
async fn delete_returns_unit_on_no_content() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/projects/42/variables/DEPLOY_KEY"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .variables()
        .delete_for_project(42u64, "DEPLOY_KEY")
        .await
        .unwrap();
}
