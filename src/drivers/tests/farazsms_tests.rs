use std::sync::Arc;

use serde_json::json;

use super::harness;
use crate::config::DriverSettings;
use crate::drivers::{FarazsmsDriver, SmsDriver};
use crate::error::SmsError;
use crate::http::{HttpBody, HttpMethod, HttpTransport};

fn driver(h: &super::Harness) -> FarazsmsDriver {
    FarazsmsDriver::new(
        &DriverSettings::new().with("api_key", "secret-key"),
        h.recorder.clone(),
        Arc::clone(&h.transport) as Arc<dyn HttpTransport>,
    )
    .unwrap()
}

#[tokio::test]
async fn send_returns_message_id_and_logs_redacted_body() {
    let h = harness();
    h.transport
        .push_ok(
            200,
            &json!({ "status": "OK", "data": { "message_id": 52700851 } }).to_string(),
        )
        .await;

    let id = driver(&h)
        .send("+989121234567", "Your code is 1234", "5000")
        .await
        .unwrap();
    assert_eq!(id, "52700851");

    let requests = h.transport.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, HttpMethod::Post);
    assert!(requests[0].url.ends_with("/sms/send/webservice/single"));
    assert_eq!(requests[0].header_value("apiKey"), Some("secret-key"));
    match &requests[0].body {
        HttpBody::Json(body) => {
            assert_eq!(body["sender"], "5000");
            assert_eq!(body["recipient"], json!(["+989121234567"]));
        }
        other => panic!("unexpected body: {other:?}"),
    }

    let entry = h.store.find("52700851").await.unwrap();
    assert_eq!(entry.provider_name, "farazsms");
    assert_eq!(entry.status, 0);
    assert_eq!(entry.message.as_deref(), Some("Your code is ****"));
    assert_eq!(entry.from.as_deref(), Some("5000"));
}

#[tokio::test]
async fn send_with_failing_payload_is_a_provider_error() {
    let h = harness();
    h.transport
        .push_ok(200, r#"{"status":"ERROR","data":null}"#)
        .await;

    let err = driver(&h).send("+15550001", "hi", "5000").await.unwrap_err();
    assert!(matches!(err, SmsError::Provider(_)));
    assert!(err.to_string().contains("unsuccessful"));
    assert!(h.store.records().await.is_empty());
}

#[tokio::test]
async fn send_with_unexpected_http_status_names_the_status() {
    let h = harness();
    h.transport.push_ok(503, "busy").await;

    let err = driver(&h).send("+15550001", "hi", "5000").await.unwrap_err();
    assert!(err.to_string().contains("HTTP 503"));
}

#[tokio::test]
async fn send_with_transport_failure_keeps_the_cause() {
    let h = harness();
    h.transport.push_err("connection refused").await;

    let err = driver(&h).send("+15550001", "hi", "5000").await.unwrap_err();
    assert!(err.to_string().contains("transport failure"));
    assert!(err.to_string().contains("connection refused"));
}

#[tokio::test]
async fn delivery_status_titles_the_code_and_updates_the_record() {
    let h = harness();
    h.transport
        .push_ok(
            200,
            &json!({ "status": "OK", "data": { "message_id": 9 } }).to_string(),
        )
        .await;
    h.transport
        .push_ok(
            200,
            &json!({ "status": "OK", "data": { "deliveries": [ { "status": 2 } ] } }).to_string(),
        )
        .await;

    let d = driver(&h);
    d.send("+15550001", "hi", "5000").await.unwrap();

    let title = d.get_delivery_status("9").await.unwrap();
    assert_eq!(title, "Delivered");
    assert_eq!(h.store.find("9").await.unwrap().status, 2);
}

#[tokio::test]
async fn missing_delivery_entry_falls_back_to_unknown() {
    let h = harness();
    h.transport
        .push_ok(
            200,
            &json!({ "status": "OK", "data": { "deliveries": [] } }).to_string(),
        )
        .await;

    let title = driver(&h).get_delivery_status("9").await.unwrap();
    assert_eq!(title, "Unknown");
}

#[tokio::test]
async fn credit_defaults_to_zero_when_field_is_missing() {
    let h = harness();
    h.transport
        .push_ok(
            200,
            &json!({ "status": "OK", "data": { "credit": 1250.5 } }).to_string(),
        )
        .await;
    h.transport
        .push_ok(200, &json!({ "status": "OK", "data": {} }).to_string())
        .await;

    let d = driver(&h);
    assert_eq!(d.get_credit_balance().await.unwrap(), 1250.5);
    assert_eq!(d.get_credit_balance().await.unwrap(), 0.0);
}

#[tokio::test]
async fn patterned_send_uses_the_shared_line_and_logs_the_template() {
    let h = harness();
    h.transport
        .push_ok(
            200,
            &json!({ "status": "OK", "data": { "message_id": "p-1" } }).to_string(),
        )
        .await;

    let id = driver(&h)
        .send_patterned(
            "+15550001",
            "login-code",
            &[("code".to_string(), "1234".to_string())],
        )
        .await
        .unwrap();
    assert_eq!(id, "p-1");

    let requests = h.transport.requests().await;
    assert!(requests[0].url.ends_with("/sms/pattern/normal/send"));
    match &requests[0].body {
        HttpBody::Json(body) => {
            assert_eq!(body["sender"], "3000505");
            assert_eq!(body["code"], "login-code");
            assert_eq!(body["variable"]["code"], "1234");
        }
        other => panic!("unexpected body: {other:?}"),
    }

    let entry = h.store.find("p-1").await.unwrap();
    assert_eq!(entry.status, 8);
    assert_eq!(entry.template_id.as_deref(), Some("login-code"));
    assert!(entry.message.is_none());
}
