//! End-to-end tests against a spawned Axum server, driving the confirmation
//! flow the way a browser and an admin screen would.

use axum::Router;
use confirm_gate::handlers::{
    ADMIN_CONFIRM_PATH, ADMIN_CONFIRMATIONS_PATH, CONFIRM_EMAIL_PATH, CONFIRM_EMAIL_SEND_PATH,
};
use confirm_gate::testing::{MemoryStore, RecordingNotifier};
use confirm_gate::{ConfirmConfig, ConfirmGate, ConfirmStatus};
use reqwest::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

/// Spawn the gate on an ephemeral port; emailed links point back at it.
async fn spawn_app() -> (String, reqwest::Client, MemoryStore, RecordingNotifier) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    let base_url = format!("http://{addr}");

    let store = MemoryStore::new();
    let outbox = RecordingNotifier::new();
    let config = ConfirmConfig {
        link_base_url: base_url.clone(),
        site_name: "Example Academy".to_string(),
        ..Default::default()
    };
    let gate = ConfirmGate::new(config, store.clone())
        .expect("gate config")
        .with_notifier(outbox.clone());

    let app: Router = Router::new().merge(gate.routes()).merge(gate.admin_routes());
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    (base_url, reqwest::Client::new(), store, outbox)
}

fn link_from_mail_body(body: &str) -> String {
    body.lines()
        .find(|line| line.contains("token="))
        .expect("mail body contains confirmation link")
        .trim()
        .to_string()
}

#[tokio::test]
async fn emailed_link_confirms_the_account() {
    let (base_url, client, store, outbox) = spawn_app().await;
    let user = store.user_insert("alice@example.com");

    let response = client
        .post(format!("{base_url}{CONFIRM_EMAIL_SEND_PATH}"))
        .json(&json!({ "email": "alice@example.com" }))
        .send()
        .await
        .expect("send request");
    assert_eq!(response.status(), StatusCode::OK);

    let sent = outbox.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "alice@example.com");

    let link = link_from_mail_body(&sent[0].body);
    let confirm = client.get(&link).send().await.expect("confirm request");
    assert_eq!(confirm.status(), StatusCode::OK);

    let stored = store.user_get(user.id).expect("user exists");
    assert_eq!(stored.status, ConfirmStatus::Confirmed);
    assert!(stored.token_hash.is_none());
}

#[tokio::test]
async fn emailed_link_is_single_use() {
    let (base_url, client, store, outbox) = spawn_app().await;
    store.user_insert("alice@example.com");

    client
        .post(format!("{base_url}{CONFIRM_EMAIL_SEND_PATH}"))
        .json(&json!({ "email": "alice@example.com" }))
        .send()
        .await
        .expect("send request");

    let link = link_from_mail_body(&outbox.sent()[0].body);

    let first = client.get(&link).send().await.expect("first confirm");
    assert_eq!(first.status(), StatusCode::OK);

    let second = client.get(&link).send().await.expect("second confirm");
    assert_eq!(second.status(), StatusCode::UNAUTHORIZED);
    let payload: Value = second.json().await.expect("error payload");
    assert_eq!(payload["error"], "Invalid confirmation token");
}

#[tokio::test]
async fn wrong_token_is_rejected_and_state_unchanged() {
    let (base_url, client, store, _outbox) = spawn_app().await;
    let user = store.user_insert("alice@example.com");

    client
        .post(format!("{base_url}{CONFIRM_EMAIL_SEND_PATH}"))
        .json(&json!({ "email": "alice@example.com" }))
        .send()
        .await
        .expect("send request");

    let response = client
        .get(format!(
            "{base_url}{CONFIRM_EMAIL_PATH}?user={}&token=not-the-issued-token",
            user.id
        ))
        .send()
        .await
        .expect("confirm request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let stored = store.user_get(user.id).expect("user exists");
    assert_eq!(stored.status, ConfirmStatus::Unconfirmed);
    assert!(stored.token_hash.is_some(), "pending token must survive");
}

#[tokio::test]
async fn link_for_unknown_user_returns_not_found() {
    let (base_url, client, _store, _outbox) = spawn_app().await;

    let response = client
        .get(format!(
            "{base_url}{CONFIRM_EMAIL_PATH}?user={}&token=abc123",
            Uuid::new_v4()
        ))
        .send()
        .await
        .expect("confirm request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn resend_invalidates_the_prior_link() {
    let (base_url, client, store, outbox) = spawn_app().await;
    store.user_insert("alice@example.com");

    for _ in 0..2 {
        client
            .post(format!("{base_url}{CONFIRM_EMAIL_SEND_PATH}"))
            .json(&json!({ "email": "alice@example.com" }))
            .send()
            .await
            .expect("send request");
    }

    let sent = outbox.sent();
    assert_eq!(sent.len(), 2);
    let first_link = link_from_mail_body(&sent[0].body);
    let second_link = link_from_mail_body(&sent[1].body);
    assert_ne!(first_link, second_link);

    let stale = client.get(&first_link).send().await.expect("stale confirm");
    assert_eq!(stale.status(), StatusCode::UNAUTHORIZED);

    let fresh = client
        .get(&second_link)
        .send()
        .await
        .expect("fresh confirm");
    assert_eq!(fresh.status(), StatusCode::OK);
}

#[tokio::test]
async fn send_does_not_leak_account_existence() {
    let (base_url, client, _store, outbox) = spawn_app().await;

    let response = client
        .post(format!("{base_url}{CONFIRM_EMAIL_SEND_PATH}"))
        .json(&json!({ "email": "nobody@example.com" }))
        .send()
        .await
        .expect("send request");

    assert_eq!(response.status(), StatusCode::OK);
    let payload: Value = response.json().await.expect("response payload");
    assert_eq!(
        payload["message"],
        "If an account exists with that email, a confirmation link has been sent.",
    );
    assert!(outbox.sent().is_empty(), "no mail for unknown accounts");
}

#[tokio::test]
async fn send_rejects_malformed_email() {
    let (base_url, client, _store, outbox) = spawn_app().await;

    let response = client
        .post(format!("{base_url}{CONFIRM_EMAIL_SEND_PATH}"))
        .json(&json!({ "email": "not-an-email" }))
        .send()
        .await
        .expect("send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(outbox.sent().is_empty());
}

#[tokio::test]
async fn admin_listing_reflects_confirmation_transitions() {
    let (base_url, client, store, _outbox) = spawn_app().await;
    let alice = store.user_insert("alice@example.com");
    store.user_insert("bob@example.com");

    let confirm = client
        .post(format!("{base_url}{ADMIN_CONFIRM_PATH}"))
        .json(&json!({ "user": alice.id }))
        .send()
        .await
        .expect("admin confirm request");
    assert_eq!(confirm.status(), StatusCode::OK);

    let response = client
        .get(format!("{base_url}{ADMIN_CONFIRMATIONS_PATH}"))
        .send()
        .await
        .expect("admin list request");
    assert_eq!(response.status(), StatusCode::OK);

    let rows: Value = response.json().await.expect("listing payload");
    let rows = rows.as_array().expect("array of rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["email"], "alice@example.com");
    assert_eq!(rows[0]["status"], "confirmed");
    assert_eq!(rows[1]["email"], "bob@example.com");
    assert_eq!(rows[1]["status"], "unconfirmed");
}

#[tokio::test]
async fn admin_confirm_is_idempotent_and_kills_pending_link() {
    let (base_url, client, store, outbox) = spawn_app().await;
    let user = store.user_insert("alice@example.com");

    client
        .post(format!("{base_url}{CONFIRM_EMAIL_SEND_PATH}"))
        .json(&json!({ "email": "alice@example.com" }))
        .send()
        .await
        .expect("send request");
    let link = link_from_mail_body(&outbox.sent()[0].body);

    for _ in 0..2 {
        let response = client
            .post(format!("{base_url}{ADMIN_CONFIRM_PATH}"))
            .json(&json!({ "user": user.id }))
            .send()
            .await
            .expect("admin confirm request");
        assert_eq!(response.status(), StatusCode::OK);
    }

    let stored = store.user_get(user.id).expect("user exists");
    assert_eq!(stored.status, ConfirmStatus::Confirmed);
    assert!(stored.token_hash.is_none());

    // The emailed link died with the override.
    let stale = client.get(&link).send().await.expect("stale confirm");
    assert_eq!(stale.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_confirm_unknown_user_returns_not_found() {
    let (base_url, client, _store, _outbox) = spawn_app().await;

    let response = client
        .post(format!("{base_url}{ADMIN_CONFIRM_PATH}"))
        .json(&json!({ "user": Uuid::new_v4() }))
        .send()
        .await
        .expect("admin confirm request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
