use crate::core::{LookupOutcome, LookupRequest, OrderLookup};
use crate::domain::model::{Locale, Store};
use crate::utils::error::{LookupError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

pub const DEFAULT_ENDPOINT: &str = "https://data.smartagent.io/v1/jdsports/track-my-order";

/// The `fascia` value the tracking service expects for a store and locale.
///
/// Two UK combinations do not follow the plain concatenation rule and are
/// listed explicitly.
pub fn composite_store_id(store: Store, locale: Locale) -> String {
    match (store, locale) {
        (Store::Footpatrol, Locale::Uk) => "footpatrolgb".to_string(),
        (Store::Size, Locale::Uk) => "size".to_string(),
        (store, locale) => format!("{}{}", store.code(), locale.code()),
    }
}

/// Pulls `message.text` out of a tracking response body.
///
/// A missing `message` or `text` yields an empty string; any other shape is
/// a parse failure.
pub fn extract_status_text(body: &str) -> std::result::Result<String, LookupError> {
    let root: Value =
        serde_json::from_str(body).map_err(|e| LookupError::Parse(e.to_string()))?;

    let Value::Object(root) = root else {
        return Err(LookupError::Parse("response is not a JSON object".to_string()));
    };

    let message = match root.get("message") {
        None | Some(Value::Null) => return Ok(String::new()),
        Some(Value::Object(message)) => message,
        Some(_) => return Err(LookupError::Parse("`message` is not an object".to_string())),
    };

    match message.get("text") {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(_) => Err(LookupError::Parse("`message.text` is not a string".to_string())),
    }
}

/// `OrderLookup` backed by the public tracking endpoint.
///
/// Requests are never retried and carry no timeout of their own; a stalled
/// request is bounded only by the transport defaults.
#[derive(Debug, Clone)]
pub struct HttpOrderLookup {
    client: Client,
    endpoint: String,
}

impl HttpOrderLookup {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, endpoint))
    }

    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn fetch(&self, request: &LookupRequest) -> std::result::Result<String, LookupError> {
        let fascia = composite_store_id(request.store, request.locale);

        tracing::debug!(
            order_id = %request.order_id,
            fascia = %fascia,
            "Requesting order status from {}",
            self.endpoint
        );

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("orderNumber", request.order_id.as_str()),
                ("fascia", fascia.as_str()),
                ("postcode", request.postal_code.as_str()),
            ])
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let status = response.status();
        tracing::debug!(order_id = %request.order_id, "Tracking response status: {}", status);

        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        extract_status_text(&body)
    }
}

#[async_trait]
impl OrderLookup for HttpOrderLookup {
    async fn lookup(&self, request: &LookupRequest) -> LookupOutcome {
        match self.fetch(request).await {
            Ok(raw_text) => LookupOutcome::Success { raw_text },
            Err(cause) => {
                tracing::warn!(order_id = %request.order_id, "Lookup failed: {}", cause);
                LookupOutcome::Failure { cause }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn request(order_id: &str) -> LookupRequest {
        LookupRequest::new(Store::Footpatrol, Locale::Uk, "M11AA", order_id)
    }

    #[test]
    fn test_composite_store_id_table() {
        for store in Store::ALL {
            for locale in Locale::ALL {
                let expected = match (store, locale) {
                    (Store::Footpatrol, Locale::Uk) => "footpatrolgb".to_string(),
                    (Store::Size, Locale::Uk) => "size".to_string(),
                    _ => format!("{}{}", store.code(), locale.code()),
                };
                assert_eq!(
                    composite_store_id(store, locale),
                    expected,
                    "{} / {}",
                    store,
                    locale
                );
            }
        }
    }

    #[test]
    fn test_composite_store_id_examples() {
        assert_eq!(composite_store_id(Store::JdSports, Locale::Uk), "jdsportsuk");
        assert_eq!(composite_store_id(Store::Size, Locale::Nl), "sizenl");
        assert_eq!(composite_store_id(Store::Footpatrol, Locale::Fr), "footpatrolfr");
    }

    #[test]
    fn test_extract_status_text_shapes() {
        assert_eq!(
            extract_status_text(r#"{"message":{"text":"Your order has been placed."}}"#).unwrap(),
            "Your order has been placed."
        );
        assert_eq!(extract_status_text("{}").unwrap(), "");
        assert_eq!(extract_status_text(r#"{"message":null}"#).unwrap(), "");
        assert_eq!(extract_status_text(r#"{"message":{}}"#).unwrap(), "");
        assert_eq!(
            extract_status_text(r#"{"message":{"text":null},"extra":1}"#).unwrap(),
            ""
        );

        assert!(matches!(extract_status_text("not json"), Err(LookupError::Parse(_))));
        assert!(matches!(extract_status_text("[]"), Err(LookupError::Parse(_))));
        assert!(matches!(
            extract_status_text(r#"{"message":"placed"}"#),
            Err(LookupError::Parse(_))
        ));
        assert!(matches!(
            extract_status_text(r#"{"message":{"text":42}}"#),
            Err(LookupError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_lookup_sends_query_parameters() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/track-my-order")
                .query_param("orderNumber", "A1")
                .query_param("fascia", "footpatrolgb")
                .query_param("postcode", "M11AA");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "message": {"text": "Your order has been despatched."}
                }));
        });

        let client = HttpOrderLookup::new(server.url("/track-my-order")).unwrap();
        assert_eq!(client.endpoint(), server.url("/track-my-order"));
        let outcome = client.lookup(&request("A1")).await;

        api_mock.assert();
        assert_eq!(
            outcome,
            LookupOutcome::Success {
                raw_text: "Your order has been despatched.".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_lookup_missing_text_is_empty_success() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/track");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"message": {}}));
        });

        let client = HttpOrderLookup::new(server.url("/track")).unwrap();
        let outcome = client.lookup(&request("A2")).await;

        api_mock.assert();
        assert_eq!(
            outcome,
            LookupOutcome::Success {
                raw_text: String::new()
            }
        );
    }

    #[tokio::test]
    async fn test_lookup_non_success_status_is_failure() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/track");
            then.status(404)
                .json_body(serde_json::json!({"message": {"text": "Your order has been placed."}}));
        });

        let client = HttpOrderLookup::new(server.url("/track")).unwrap();
        let outcome = client.lookup(&request("A3")).await;

        api_mock.assert();
        assert_eq!(
            outcome,
            LookupOutcome::Failure {
                cause: LookupError::Status(404)
            }
        );
    }

    #[tokio::test]
    async fn test_lookup_invalid_body_is_parse_failure() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/track");
            then.status(200).body("<html>maintenance</html>");
        });

        let client = HttpOrderLookup::new(server.url("/track")).unwrap();
        let outcome = client.lookup(&request("A4")).await;

        api_mock.assert();
        assert!(matches!(
            outcome,
            LookupOutcome::Failure {
                cause: LookupError::Parse(_)
            }
        ));
    }

    #[tokio::test]
    async fn test_lookup_connection_refused_is_transport_failure() {
        // bind then drop to get a port nothing listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = HttpOrderLookup::new(format!("http://127.0.0.1:{}/track", port)).unwrap();
        let outcome = client.lookup(&request("A5")).await;

        assert!(matches!(
            outcome,
            LookupOutcome::Failure {
                cause: LookupError::Transport(_)
            }
        ));
    }
}
