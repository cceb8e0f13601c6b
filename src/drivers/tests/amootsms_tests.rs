use std::sync::Arc;

use serde_json::json;

use super::harness;
use crate::config::DriverSettings;
use crate::drivers::{AmootsmsDriver, SmsDriver};
use crate::error::SmsError;
use crate::http::{HttpBody, HttpMethod, HttpTransport};

fn driver(h: &super::Harness) -> AmootsmsDriver {
    AmootsmsDriver::new(
        &DriverSettings::new().with("token", "amoot-token"),
        h.recorder.clone(),
        Arc::clone(&h.transport) as Arc<dyn HttpTransport>,
    )
    .unwrap()
}

#[tokio::test]
async fn send_puts_everything_in_the_query_string() {
    let h = harness();
    h.transport
        .push_ok(
            200,
            &json!({ "Status": "Success", "Data": [ { "MessageID": 2077350 } ] }).to_string(),
        )
        .await;

    let id = driver(&h)
        .send("+989121234567", "hi", "public")
        .await
        .unwrap();
    assert_eq!(id, "2077350");

    let requests = h.transport.requests().await;
    assert_eq!(requests[0].method, HttpMethod::Get);
    assert!(requests[0].url.ends_with("/SendSimple"));
    assert!(matches!(requests[0].body, HttpBody::Empty));
    assert_eq!(requests[0].query_value("Token"), Some("amoot-token"));
    assert_eq!(requests[0].query_value("SMSMessageText"), Some("hi"));
    assert_eq!(requests[0].query_value("LineNumber"), Some("public"));
    assert_eq!(requests[0].query_value("Mobiles"), Some("+989121234567"));
    assert!(requests[0].query_value("SendDateTime").is_some());

    let entry = h.store.find("2077350").await.unwrap();
    assert_eq!(entry.provider_name, "amootsms");
    assert_eq!(entry.status, 100);
}

#[tokio::test]
async fn send_with_failing_status_is_a_provider_error() {
    let h = harness();
    h.transport
        .push_ok(200, r#"{"Status":"InvalidToken"}"#)
        .await;

    let err = driver(&h).send("+15550001", "hi", "public").await.unwrap_err();
    assert!(matches!(err, SmsError::Provider(_)));
    assert!(h.store.records().await.is_empty());
}

#[tokio::test]
async fn delivery_status_titles_the_type_and_updates_the_record() {
    let h = harness();
    h.transport
        .push_ok(
            200,
            &json!({ "Status": "Success", "Data": [ { "MessageID": 5 } ] }).to_string(),
        )
        .await;
    h.transport
        .push_ok(
            200,
            &json!({ "Status": "Success", "Data": { "DeliveryType": 1 } }).to_string(),
        )
        .await;

    let d = driver(&h);
    d.send("+15550001", "hi", "public").await.unwrap();

    let title = d.get_delivery_status("5").await.unwrap();
    assert_eq!(title, "Received by phone");
    assert_eq!(h.store.find("5").await.unwrap().status, 1);

    let requests = h.transport.requests().await;
    assert!(requests[1].url.ends_with("/GetDelivery"));
    assert_eq!(requests[1].query_value("MessageID"), Some("5"));
}

#[tokio::test]
async fn missing_delivery_type_falls_back_to_unknown() {
    let h = harness();
    h.transport
        .push_ok(200, &json!({ "Status": "Success", "Data": {} }).to_string())
        .await;

    let title = driver(&h).get_delivery_status("5").await.unwrap();
    assert_eq!(title, "Unknown");
}

#[tokio::test]
async fn credit_defaults_to_zero_when_field_is_missing() {
    let h = harness();
    h.transport
        .push_ok(
            200,
            &json!({ "Status": "Success", "RemaindCredit": 417.0 }).to_string(),
        )
        .await;
    h.transport
        .push_ok(200, &json!({ "Status": "Success" }).to_string())
        .await;

    let d = driver(&h);
    assert_eq!(d.get_credit_balance().await.unwrap(), 417.0);
    assert_eq!(d.get_credit_balance().await.unwrap(), 0.0);
}

#[tokio::test]
async fn patterned_send_joins_values_positionally() {
    let h = harness();
    h.transport
        .push_ok(
            200,
            &json!({ "Status": "Success", "Data": [ { "MessageID": "pt-3" } ] }).to_string(),
        )
        .await;

    let id = driver(&h)
        .send_patterned(
            "+15550001",
            "3012",
            &[
                ("code".to_string(), "8714".to_string()),
                ("name".to_string(), "Sam".to_string()),
            ],
        )
        .await
        .unwrap();
    assert_eq!(id, "pt-3");

    let requests = h.transport.requests().await;
    assert!(requests[0].url.ends_with("/SendWithPattern"));
    assert_eq!(requests[0].query_value("PatternCodeID"), Some("3012"));
    // Names are dropped; only the values travel, in order.
    assert_eq!(requests[0].query_value("PatternValues"), Some("8714,Sam"));

    let entry = h.store.find("pt-3").await.unwrap();
    assert_eq!(entry.template_id.as_deref(), Some("3012"));
    assert_eq!(entry.status, 100);
}
