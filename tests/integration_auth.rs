mod common;

use common::TestApp;
use reqwest::StatusCode;
use reqwest::header::SET_COOKIE;
use serde_json::{Value, json};
use std::sync::atomic::Ordering;

fn set_cookies(response: &reqwest::Response) -> Vec<String> {
    response.headers().get_all(SET_COOKIE).iter().map(|v| v.to_str().unwrap().to_string()).collect()
}

fn cookie<'a>(cookies: &'a [String], name: &str) -> &'a str {
    cookies
        .iter()
        .find(|c| c.starts_with(&format!("{name}=")))
        .map(String::as_str)
        .unwrap_or_else(|| panic!("missing {name} cookie in {cookies:?}"))
}

#[tokio::test]
async fn login_sets_the_session_cookies_as_a_unit() {
    let app = TestApp::spawn().await;

    let response = app.login(&app.client, "alice@example.com").await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 3, "expected all three session cookies: {cookies:?}");

    let access = cookie(&cookies, "access_token");
    assert!(access.starts_with("access_token=A1"));
    assert!(access.contains("HttpOnly"));
    assert!(access.contains("SameSite=Strict"));
    assert!(access.contains("Path=/"));
    assert!(access.contains("Max-Age=86400"));
    assert!(!access.contains("Secure"), "Secure must be off outside production: {access}");

    let refresh = cookie(&cookies, "refresh_token");
    assert!(refresh.starts_with("refresh_token=R1"));
    assert!(refresh.contains("HttpOnly"));
    assert!(refresh.contains("Max-Age=604800"));

    let role = cookie(&cookies, "user_role");
    assert!(role.starts_with("user_role=customer"));
    assert!(role.contains("Max-Age=86400"));

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["userRole"], "customer");
}

#[tokio::test]
async fn failed_login_sets_no_cookies() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(format!("{}/api/auth/login", app.server_url))
        .json(&json!({ "email": "alice@example.com", "password": "wrong" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookies(&response).is_empty());

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Unauthorized");
}

#[tokio::test]
async fn refresh_rotates_every_cookie() {
    let app = TestApp::spawn().await;
    app.login(&app.client, "alice@example.com").await;

    let response = app.client.post(format!("{}/api/auth/refresh-token", app.server_url)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookies = set_cookies(&response);
    assert!(cookie(&cookies, "access_token").starts_with("access_token=A2"));
    assert!(cookie(&cookies, "refresh_token").starts_with("refresh_token=R2"));
    cookie(&cookies, "user_role");

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["accessToken"], "A2");
    assert_eq!(body["refreshToken"], "R2");
    assert_eq!(app.upstream.state.refresh_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn refresh_without_a_session_is_unauthorized() {
    let app = TestApp::spawn().await;

    let response = app.client.post(format!("{}/api/auth/refresh-token", app.server_url)).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(app.upstream.state.refresh_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn forced_logout_clears_cookies_even_when_the_upstream_fails() {
    let app = TestApp::spawn().await;
    app.login(&app.client, "alice@example.com").await;
    app.upstream.state.fail_logout.store(true, Ordering::SeqCst);

    let response = app
        .client
        .post(format!("{}/api/auth/logout", app.server_url))
        .json(&json!({ "force": true }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.upstream.state.logout_calls.load(Ordering::SeqCst), 1);

    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 3);
    for name in ["access_token", "refresh_token", "user_role"] {
        let c = cookie(&cookies, name);
        assert!(c.contains("Max-Age=0"), "{name} should be expired: {c}");
    }
}

#[tokio::test]
async fn plain_logout_surfaces_the_upstream_failure_and_keeps_the_session() {
    let app = TestApp::spawn().await;
    app.login(&app.client, "alice@example.com").await;
    app.upstream.state.fail_logout.store(true, Ordering::SeqCst);

    let response = app
        .client
        .post(format!("{}/api/auth/logout", app.server_url))
        .json(&json!({ "force": false }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(set_cookies(&response).is_empty(), "cookies must survive a failed plain logout");

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "session store offline");
}

#[tokio::test]
async fn otp_flow_issues_a_session() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(format!("{}/api/auth/request-otp", app.server_url))
        .json(&json!({ "email": "alice@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let response = app
        .client
        .post(format!("{}/api/auth/verify-otp", app.server_url))
        .json(&json!({ "email": "alice@example.com", "code": "123456" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(set_cookies(&response).len(), 3);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["userRole"], "customer");
}

#[tokio::test]
async fn otp_verify_with_a_bad_code_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(format!("{}/api/auth/verify-otp", app.server_url))
        .json(&json!({ "email": "alice@example.com", "code": "000000" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookies(&response).is_empty());
}
