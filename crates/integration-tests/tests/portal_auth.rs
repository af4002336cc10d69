//! Integration tests for portal signup, login and the route guard.
//!
//! These tests require:
//! - A running `PostgreSQL` database, migrated with `civic-cli migrate` and
//!   seeded with `civic-cli seed` (officer `sanitation1@oi.com`)
//! - The portal running (cargo run -p civic-portal)
//!
//! Run with: cargo test -p civic-integration-tests -- --ignored

use reqwest::{Client, StatusCode, redirect::Policy};
use serde_json::{Value, json};

/// Base URL for the portal (configurable via environment).
fn portal_base_url() -> String {
    std::env::var("PORTAL_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Client that keeps the session cookie and does not follow redirects.
fn session_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// Address unique to this run so signups never collide.
fn unique_email(domain: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("it{nanos}@{domain}")
}

async fn signup(client: &Client, role: &str, email: &str, password: &str) -> reqwest::Response {
    client
        .post(format!("{}/auth/{role}/signup", portal_base_url()))
        .json(&json!({
            "email": email,
            "password": password,
            "confirm_password": password,
        }))
        .send()
        .await
        .expect("Failed to send signup")
}

async fn login(client: &Client, email: &str, password: &str, from: Option<&str>) -> reqwest::Response {
    client
        .post(format!("{}/auth/login", portal_base_url()))
        .json(&json!({ "email": email, "password": password, "from": from }))
        .send()
        .await
        .expect("Failed to send login")
}

#[tokio::test]
#[ignore = "Requires running portal and database"]
async fn test_citizen_signup_login_logout() {
    let client = session_client();
    let email = unique_email("ui.com");

    let resp = signup(&client, "citizen", &email, "secret1").await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(body["redirect"], "/citizen/login");

    let resp = login(&client, &email, "secret1", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(body["redirect"], "/citizen/dashboard");
    assert_eq!(body["user"]["role"], "citizen");

    let session: Value = client
        .get(format!("{}/auth/session", portal_base_url()))
        .send()
        .await
        .expect("Failed to get session")
        .json()
        .await
        .expect("Invalid JSON");
    assert_eq!(session["authenticated"], true);
    assert_eq!(session["user"]["email"], email.as_str());

    let resp = client
        .get(format!("{}/citizen/dashboard", portal_base_url()))
        .send()
        .await
        .expect("Failed to get dashboard");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .post(format!("{}/auth/logout", portal_base_url()))
        .send()
        .await
        .expect("Failed to log out");
    assert_eq!(resp.status(), StatusCode::OK);

    let session: Value = client
        .get(format!("{}/auth/session", portal_base_url()))
        .send()
        .await
        .expect("Failed to get session")
        .json()
        .await
        .expect("Invalid JSON");
    assert_eq!(session["authenticated"], false);
}

#[tokio::test]
#[ignore = "Requires running portal and database"]
async fn test_signup_rejects_wrong_domain_and_mismatch() {
    let client = session_client();

    let resp = signup(&client, "officer", &unique_email("ui.com"), "secret1").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Invalid JSON");
    assert!(
        body["error"]
            .as_str()
            .is_some_and(|e| e.contains("@oi.com")),
        "unexpected body: {body}"
    );

    let resp = client
        .post(format!("{}/auth/citizen/signup", portal_base_url()))
        .json(&json!({
            "email": unique_email("ui.com"),
            "password": "secret1",
            "confirm_password": "secret2",
        }))
        .send()
        .await
        .expect("Failed to send signup");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running portal and database"]
async fn test_guard_redirects() {
    let client = session_client();

    let resp = client
        .get(format!("{}/admin/dashboard", portal_base_url()))
        .send()
        .await
        .expect("Failed to get dashboard");
    assert!(resp.status().is_redirection());
    assert_eq!(
        resp.headers().get("location").and_then(|v| v.to_str().ok()),
        Some("/?from=%2Fadmin%2Fdashboard")
    );

    let resp = client
        .get(format!("{}/api/admin/issues", portal_base_url()))
        .send()
        .await
        .expect("Failed to list issues");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let email = unique_email("ui.com");
    signup(&client, "citizen", &email, "secret1").await;
    let resp = login(&client, &email, "secret1", Some("/citizen/dashboard")).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{}/admin/dashboard", portal_base_url()))
        .send()
        .await
        .expect("Failed to get dashboard");
    assert!(resp.status().is_redirection());
    assert_eq!(
        resp.headers().get("location").and_then(|v| v.to_str().ok()),
        Some("/citizen/login?from=%2Fadmin%2Fdashboard")
    );

    let resp = client
        .get(format!("{}/api/admin/issues", portal_base_url()))
        .send()
        .await
        .expect("Failed to list issues");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires running portal and database"]
async fn test_citizen_files_and_lists_complaint() {
    let client = session_client();
    let email = unique_email("ui.com");
    signup(&client, "citizen", &email, "secret1").await;
    login(&client, &email, "secret1", None).await;

    let resp = client
        .post(format!("{}/api/citizen/issues", portal_base_url()))
        .json(&json!({
            "subject": "Streetlight out",
            "details": "Dark since Monday",
            "area": "Elm Street",
            "department": "electricity",
        }))
        .send()
        .await
        .expect("Failed to file complaint");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let issues: Value = client
        .get(format!("{}/api/citizen/issues", portal_base_url()))
        .send()
        .await
        .expect("Failed to list complaints")
        .json()
        .await
        .expect("Invalid JSON");
    let issues = issues.as_array().expect("expected array");
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["status"], "pending");
}

// ============================================================================
// Officer, department and message scoping
// ============================================================================

const SEEDED_OFFICER: &str = "sanitation1@oi.com";

/// Password used for the seeded officer's portal account.
fn officer_password() -> String {
    std::env::var("OFFICER_PASSWORD").unwrap_or_else(|_| "officer-pass".to_string())
}

/// Client logged in as the seeded Sanitation officer.
async fn sanitation_officer() -> Client {
    let client = session_client();
    let password = officer_password();
    let resp = signup(&client, "officer", SEEDED_OFFICER, &password).await;
    assert!(
        resp.status() == StatusCode::CREATED || resp.status() == StatusCode::CONFLICT,
        "unexpected signup status {}",
        resp.status()
    );
    let resp = login(&client, SEEDED_OFFICER, &password, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    client
}

/// Client logged in as a fresh account of `role` on `domain`.
async fn fresh_user(role: &str, domain: &str) -> Client {
    let client = session_client();
    let email = unique_email(domain);
    let resp = signup(&client, role, &email, "secret1").await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let resp = login(&client, &email, "secret1", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    client
}

/// File a complaint for `department` and return its id.
async fn file_complaint(citizen: &Client, department: &str) -> i64 {
    let resp = citizen
        .post(format!("{}/api/citizen/issues", portal_base_url()))
        .json(&json!({
            "subject": "Broken bench",
            "details": "Slats missing",
            "area": "Riverside Park",
            "department": department,
        }))
        .send()
        .await
        .expect("Failed to file complaint");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("Invalid JSON");
    body["issue"]["id"].as_i64().expect("issue id")
}

async fn officer_action(officer: &Client, id: i64, action: &str) -> reqwest::Response {
    let request = officer.post(format!(
        "{}/api/officer/issues/{id}/{action}",
        portal_base_url()
    ));
    let request = if action == "assign" {
        request.json(&json!({ "worker": "Ravi" }))
    } else {
        request
    };
    request.send().await.expect("Failed to send officer action")
}

#[tokio::test]
#[ignore = "Requires running portal and seeded database"]
async fn test_officer_cannot_act_on_other_department() {
    let citizen = fresh_user("citizen", "ui.com").await;
    let officer = sanitation_officer().await;

    let id = file_complaint(&citizen, "electricity").await;

    for action in ["start", "resolve", "assign"] {
        let resp = officer_action(&officer, id, action).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{action}");
        let body: Value = resp.json().await.expect("Invalid JSON");
        assert_eq!(body["error"], "Issue not found.");
    }

    let issues: Value = officer
        .get(format!("{}/api/officer/issues", portal_base_url()))
        .send()
        .await
        .expect("Failed to list department issues")
        .json()
        .await
        .expect("Invalid JSON");
    let issues = issues.as_array().expect("expected array");
    assert!(issues.iter().all(|i| i["department"] == "sanitation"));
    assert!(issues.iter().all(|i| i["id"].as_i64() != Some(id)));
}

#[tokio::test]
#[ignore = "Requires running portal and seeded database"]
async fn test_officer_without_department_gets_banner() {
    let officer = fresh_user("officer", "oi.com").await;

    for path in ["/api/officer/issues", "/api/officer/reports", "/api/messages"] {
        let resp = officer
            .get(format!("{}{path}", portal_base_url()))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(resp.status(), StatusCode::CONFLICT, "{path}");
        let body: Value = resp.json().await.expect("Invalid JSON");
        assert_eq!(
            body["error"],
            "Department information not found. Please contact administrator to assign your department."
        );
    }
}

#[tokio::test]
#[ignore = "Requires running portal and seeded database"]
async fn test_message_channels_are_partitioned() {
    let officer = sanitation_officer().await;
    let admin = fresh_user("admin", "ad.com").await;
    let citizen = fresh_user("citizen", "ui.com").await;

    let officer_text = unique_email("sanitation-note");
    let admin_text = unique_email("admin-note");

    let resp = officer
        .post(format!("{}/api/messages", portal_base_url()))
        .json(&json!({ "text": officer_text }))
        .send()
        .await
        .expect("Failed to post message");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let posted: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(posted["channel"], "sanitation");

    let resp = admin
        .post(format!("{}/api/messages", portal_base_url()))
        .json(&json!({ "text": admin_text }))
        .send()
        .await
        .expect("Failed to post message");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let posted: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(posted["channel"], "admin");

    let seen_by_officer: Vec<Value> = officer
        .get(format!("{}/api/messages", portal_base_url()))
        .send()
        .await
        .expect("Failed to list messages")
        .json()
        .await
        .expect("Invalid JSON");
    assert!(seen_by_officer.iter().all(|m| m["channel"] == "sanitation"));
    assert!(seen_by_officer.iter().any(|m| m["text"] == officer_text.as_str()));
    assert!(seen_by_officer.iter().all(|m| m["text"] != admin_text.as_str()));

    let seen_by_admin: Vec<Value> = admin
        .get(format!("{}/api/messages", portal_base_url()))
        .send()
        .await
        .expect("Failed to list messages")
        .json()
        .await
        .expect("Invalid JSON");
    assert!(seen_by_admin.iter().any(|m| m["text"] == officer_text.as_str()));
    assert!(seen_by_admin.iter().any(|m| m["text"] == admin_text.as_str()));

    let resp = citizen
        .get(format!("{}/api/messages", portal_base_url()))
        .send()
        .await
        .expect("Failed to list messages");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires running portal and seeded database"]
async fn test_racing_transitions_never_reopen_resolved_issue() {
    let citizen = fresh_user("citizen", "ui.com").await;
    let officer = sanitation_officer().await;

    for _ in 0..5 {
        let id = file_complaint(&citizen, "sanitation").await;
        let resp = officer_action(&officer, id, "assign").await;
        assert_eq!(resp.status(), StatusCode::OK);

        let (started, resolved) = tokio::join!(
            officer_action(&officer, id, "start"),
            officer_action(&officer, id, "resolve"),
        );
        for status in [started.status(), resolved.status()] {
            assert!(
                status == StatusCode::OK || status == StatusCode::CONFLICT,
                "unexpected status {status}"
            );
        }

        let issues: Vec<Value> = officer
            .get(format!("{}/api/officer/issues", portal_base_url()))
            .send()
            .await
            .expect("Failed to list department issues")
            .json()
            .await
            .expect("Invalid JSON");
        let issue = issues
            .iter()
            .find(|i| i["id"].as_i64() == Some(id))
            .expect("issue listed");

        if resolved.status() == StatusCode::OK {
            assert_eq!(issue["status"], "resolved", "issue {id} reopened");
        }
    }
}

#[tokio::test]
#[ignore = "Requires running portal and database"]
async fn test_malformed_json_gets_banner() {
    let citizen = fresh_user("citizen", "ui.com").await;

    let resp = citizen
        .post(format!("{}/api/citizen/issues", portal_base_url()))
        .header("content-type", "application/json")
        .body("{\"subject\":")
        .send()
        .await
        .expect("Failed to send complaint");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Invalid JSON");
    assert!(body["error"].is_string());
}
