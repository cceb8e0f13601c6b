use std::sync::Arc;

use serde_json::json;

use super::harness;
use crate::config::DriverSettings;
use crate::drivers::{SmsDriver, TwilioDriver};
use crate::error::SmsError;
use crate::http::{HttpBody, HttpMethod, HttpTransport};

fn driver(h: &super::Harness) -> TwilioDriver {
    TwilioDriver::new(
        &DriverSettings::new()
            .with("account_sid", "AC123")
            .with("auth_token", "tok"),
        h.recorder.clone(),
        Arc::clone(&h.transport) as Arc<dyn HttpTransport>,
    )
    .unwrap()
}

#[tokio::test]
async fn missing_credentials_are_a_configuration_error() {
    let h = harness();
    let err = TwilioDriver::new(
        &DriverSettings::new().with("account_sid", "AC123"),
        h.recorder.clone(),
        Arc::clone(&h.transport) as Arc<dyn HttpTransport>,
    )
    .unwrap_err();
    assert!(matches!(err, SmsError::Configuration(_)));
    assert!(err.to_string().contains("auth_token"));
}

#[tokio::test]
async fn send_persists_the_numeric_status_code() {
    let h = harness();
    h.transport
        .push_ok(
            201,
            &json!({ "sid": "SM900", "status": "queued" }).to_string(),
        )
        .await;

    let id = driver(&h)
        .send("+15550001", "hello there", "+15557777")
        .await
        .unwrap();
    assert_eq!(id, "SM900");

    let requests = h.transport.requests().await;
    assert_eq!(requests[0].method, HttpMethod::Post);
    assert!(requests[0]
        .url
        .ends_with("/Accounts/AC123/Messages.json"));
    assert_eq!(
        requests[0].basic_auth,
        Some(("AC123".to_string(), "tok".to_string()))
    );
    match &requests[0].body {
        HttpBody::Form(fields) => {
            assert!(fields.contains(&("From".to_string(), "+15557777".to_string())));
            assert!(fields.contains(&("To".to_string(), "+15550001".to_string())));
            assert!(fields.contains(&("Body".to_string(), "hello there".to_string())));
        }
        other => panic!("unexpected body: {other:?}"),
    }

    // "queued" persists as its numeric code.
    assert_eq!(h.store.find("SM900").await.unwrap().status, 1);
}

#[tokio::test]
async fn send_rejects_non_created_http_status() {
    let h = harness();
    h.transport
        .push_ok(200, &json!({ "sid": "SM900" }).to_string())
        .await;

    let err = driver(&h)
        .send("+15550001", "hi", "+15557777")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("HTTP 200"));
    assert!(h.store.records().await.is_empty());
}

#[tokio::test]
async fn send_without_sid_is_a_provider_error() {
    let h = harness();
    h.transport
        .push_ok(201, &json!({ "status": "queued" }).to_string())
        .await;

    let err = driver(&h)
        .send("+15550001", "hi", "+15557777")
        .await
        .unwrap_err();
    assert!(matches!(err, SmsError::Provider(_)));
    assert!(err.to_string().contains("unsuccessful"));
}

#[tokio::test]
async fn delivery_status_returns_the_title_and_updates_the_record() {
    let h = harness();
    h.transport
        .push_ok(
            201,
            &json!({ "sid": "SM1", "status": "queued" }).to_string(),
        )
        .await;
    h.transport
        .push_ok(200, &json!({ "status": "delivered" }).to_string())
        .await;

    let d = driver(&h);
    d.send("+15550001", "hi", "+15557777").await.unwrap();

    let title = d.get_delivery_status("SM1").await.unwrap();
    assert_eq!(title, "Delivered");
    assert_eq!(h.store.find("SM1").await.unwrap().status, 5);

    let requests = h.transport.requests().await;
    assert!(requests[1]
        .url
        .ends_with("/Accounts/AC123/Messages/SM1.json"));
}

#[tokio::test]
async fn unrecognized_status_string_titles_as_unknown() {
    let h = harness();
    h.transport
        .push_ok(200, &json!({ "status": "warming_up" }).to_string())
        .await;

    let title = driver(&h).get_delivery_status("SM1").await.unwrap();
    assert_eq!(title, "Unknown");
}

#[tokio::test]
async fn credit_parses_the_decimal_string_balance() {
    let h = harness();
    h.transport
        .push_ok(
            200,
            &json!({ "balance": "12.34", "currency": "USD" }).to_string(),
        )
        .await;

    assert_eq!(driver(&h).get_credit_balance().await.unwrap(), 12.34);
}

#[tokio::test]
async fn credit_without_balance_field_is_a_provider_error() {
    let h = harness();
    h.transport
        .push_ok(200, &json!({ "currency": "USD" }).to_string())
        .await;

    let err = driver(&h).get_credit_balance().await.unwrap_err();
    assert!(matches!(err, SmsError::Provider(_)));
}

#[tokio::test]
async fn patterned_send_is_unsupported() {
    let h = harness();
    let err = driver(&h)
        .send_patterned("+15550001", "tpl", &[])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SmsError::Unsupported {
            driver: "twilio",
            operation: "patterned send"
        }
    ));
    assert_eq!(h.transport.calls().await, 0);
}
