//! Integration tests for the local OAuth callback listener.
//!
//! Each test binds its own fixed localhost port so the tests can run in
//! parallel without colliding.

use std::time::Duration;

use shopify_gateway::auth::oauth::{await_callback, CallbackParams, OAuthError};

/// Polls the listener port until it accepts connections.
async fn wait_until_listening(port: u16) {
    for _ in 0..50 {
        if tokio::net::TcpStream::connect(("127.0.0.1", port))
            .await
            .is_ok()
        {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("callback listener never came up on port {port}");
}

#[tokio::test]
async fn test_valid_callback_resolves_with_params() {
    let port = 43571;
    let listener = tokio::spawn(await_callback(
        "expected-state",
        port,
        Duration::from_secs(10),
    ));
    wait_until_listening(port).await;

    let response = reqwest::get(format!(
        "http://127.0.0.1:{port}/callback?code=auth-code-123&shop=test-shop.myshopify.com&state=expected-state"
    ))
    .await
    .unwrap();
    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("Authorization complete"));

    let result = listener.await.unwrap();
    let CallbackParams { code, shop } = result.unwrap();
    assert_eq!(code, "auth-code-123");
    assert_eq!(shop, "test-shop.myshopify.com");
}

#[tokio::test]
async fn test_state_mismatch_rejects_and_closes_listener() {
    let port = 43572;
    let listener = tokio::spawn(await_callback(
        "expected-state",
        port,
        Duration::from_secs(10),
    ));
    wait_until_listening(port).await;

    let response = reqwest::get(format!(
        "http://127.0.0.1:{port}/callback?code=auth-code&shop=test-shop.myshopify.com&state=forged-state"
    ))
    .await
    .unwrap();
    assert_eq!(response.status(), 400);

    let result = listener.await.unwrap();
    match result {
        Err(OAuthError::StateMismatch { expected, received }) => {
            assert_eq!(expected, "expected-state");
            assert_eq!(received, "forged-state");
        }
        other => panic!("expected state mismatch, got {other:?}"),
    }

    // The one-shot listener must release the port after resolving.
    for _ in 0..50 {
        if tokio::net::TcpStream::connect(("127.0.0.1", port))
            .await
            .is_err()
        {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("listener still accepting connections after resolving");
}

#[tokio::test]
async fn test_missing_code_is_malformed_callback() {
    let port = 43573;
    let listener = tokio::spawn(await_callback(
        "expected-state",
        port,
        Duration::from_secs(10),
    ));
    wait_until_listening(port).await;

    let response = reqwest::get(format!(
        "http://127.0.0.1:{port}/callback?shop=test-shop.myshopify.com&state=expected-state"
    ))
    .await
    .unwrap();
    assert_eq!(response.status(), 400);

    let result = listener.await.unwrap();
    assert!(matches!(result, Err(OAuthError::InvalidCallback { .. })));
}

#[tokio::test]
async fn test_missing_state_is_malformed_callback() {
    let port = 43574;
    let listener = tokio::spawn(await_callback(
        "expected-state",
        port,
        Duration::from_secs(10),
    ));
    wait_until_listening(port).await;

    let response = reqwest::get(format!(
        "http://127.0.0.1:{port}/callback?code=auth-code&shop=test-shop.myshopify.com"
    ))
    .await
    .unwrap();
    assert_eq!(response.status(), 400);

    let result = listener.await.unwrap();
    assert!(matches!(result, Err(OAuthError::InvalidCallback { .. })));
}

#[tokio::test]
async fn test_timeout_when_no_callback_arrives() {
    let port = 43575;
    let result = await_callback("expected-state", port, Duration::from_millis(200)).await;

    match result {
        Err(OAuthError::Timeout { seconds }) => assert_eq!(seconds, 0),
        other => panic!("expected timeout, got {other:?}"),
    }
}
