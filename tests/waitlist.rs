//! End-to-end waitlist signup: the API client through a running
//! instance, and the server-rendered form.

mod common;

use std::time::Duration;

use launchpad::client::{ProxyClient, WaitlistApi};
use launchpad::error::ClientError;
use launchpad::form::{self, FormOutcome, Submission};
use launchpad::server::build_http_client;

use common::{start_backend, start_launchpad, TAKEN_EMAIL};

fn client(addr: std::net::SocketAddr) -> ProxyClient {
    ProxyClient::new(
        build_http_client(),
        &format!("http://{addr}"),
        Duration::from_secs(5),
    )
}

#[tokio::test]
async fn client_joins_through_the_proxy() {
    let (backend, seen) = start_backend().await;
    let (addr, shutdown) = start_launchpad(&format!("http://{backend}")).await;

    client(addr).join_waitlist("new@example.com").await.unwrap();
    assert_eq!(seen.lock().unwrap().bodies.len(), 1);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn client_surfaces_backend_detail() {
    let (backend, _) = start_backend().await;
    let (addr, shutdown) = start_launchpad(&format!("http://{backend}")).await;

    let err = client(addr).join_waitlist(TAKEN_EMAIL).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Rejected { status: 400, ref message } if message == "Email already registered"
    ));

    let err = client(addr).join_waitlist("not-an-email").await.unwrap_err();
    assert_eq!(err.to_string(), "value is not a valid email address");

    let _ = shutdown.send(());
}

#[tokio::test]
async fn form_rewrites_already_registered() {
    let (backend, _) = start_backend().await;
    let (addr, shutdown) = start_launchpad(&format!("http://{backend}")).await;

    let submission = Submission {
        email: TAKEN_EMAIL.into(),
        consent: true,
    };
    let outcome = form::submit(&client(addr), &submission).await;
    assert_eq!(outcome, FormOutcome::Failed(form::ALREADY_ON_WAITLIST.into()));

    let _ = shutdown.send(());
}

#[tokio::test]
async fn unreachable_instance_is_generic_failure() {
    let addr = common::closed_port().await;
    let submission = Submission {
        email: "a@example.com".into(),
        consent: true,
    };
    let outcome = form::submit(&client(addr), &submission).await;
    assert_eq!(outcome, FormOutcome::Failed(form::GENERIC_FAILURE.into()));
}

#[tokio::test]
async fn backend_health_via_proxy() {
    let (backend, _) = start_backend().await;
    let (addr, shutdown) = start_launchpad(&format!("http://{backend}")).await;

    let report = client(addr).backend_health().await.unwrap();
    assert_eq!(report.status, 200);
    assert!(report.ok);
    assert_eq!(report.backend_url, format!("http://{backend}/health"));
    assert_eq!(report.data, serde_json::json!({ "status": "ok" }));
    assert!(!report.timestamp.is_empty());

    let _ = shutdown.send(());
}

#[tokio::test]
async fn backend_health_reports_proxy_details_on_failure() {
    let backend = common::closed_port().await;
    let (addr, shutdown) = start_launchpad(&format!("http://{backend}")).await;

    let err = client(addr).backend_health().await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Rejected { status: 503, ref message }
            if message.starts_with("Backend health check failed: ")
    ));

    let _ = shutdown.send(());
}

async fn post_form(addr: std::net::SocketAddr, form: &[(&str, &str)]) -> String {
    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/waitlist"))
        .form(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    resp.text().await.unwrap()
}

#[tokio::test]
async fn form_without_consent_is_not_sent() {
    let (backend, seen) = start_backend().await;
    let (addr, shutdown) = start_launchpad(&format!("http://{backend}")).await;

    let html = post_form(addr, &[("email", "a@example.com")]).await;
    assert!(html.contains(form::CONSENT_REQUIRED));
    assert!(html.contains("value=\"a@example.com\""));
    assert!(seen.lock().unwrap().bodies.is_empty());

    let _ = shutdown.send(());
}

#[tokio::test]
async fn form_signup_shows_success_and_counts() {
    let (backend, seen) = start_backend().await;
    let (addr, shutdown) = start_launchpad(&format!("http://{backend}")).await;

    let html = post_form(addr, &[("email", "form@example.com"), ("consent", "on")]).await;
    assert!(html.contains("You're on the list!"));
    assert!(!html.contains("<form"));
    assert_eq!(
        seen.lock().unwrap().bodies[0],
        serde_json::json!({ "email": "form@example.com" })
    );

    let health: serde_json::Value = reqwest::get(format!("http://{addr}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["stats"]["waitlist_signups"], 1);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn form_shows_already_on_waitlist() {
    let (backend, _) = start_backend().await;
    let (addr, shutdown) = start_launchpad(&format!("http://{backend}")).await;

    let html = post_form(addr, &[("email", TAKEN_EMAIL), ("consent", "on")]).await;
    assert!(html.contains("This email is already on the waitlist!"));

    let _ = shutdown.send(());
}
