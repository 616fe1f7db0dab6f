//! Wire types for incoming GitHub webhook deliveries.

use axum::body::Bytes;
use axum::http::HeaderMap;
use serde::Deserialize;

/// Header carrying the HMAC-SHA256 signature of the raw body.
pub const SIGNATURE_HEADER: &str = "X-Hub-Signature-256";
/// Header naming the event type, e.g. `push` or `ping`.
pub const EVENT_HEADER: &str = "X-GitHub-Event";
/// Header carrying GitHub's unique id for this delivery.
pub const DELIVERY_HEADER: &str = "X-GitHub-Delivery";
/// Every delivery from GitHub identifies itself with this User-Agent prefix.
pub const HOOKSHOT_UA_PREFIX: &str = "GitHub-Hookshot/";

/// A raw delivery as received: untouched body bytes plus the headers the
/// handler cares about. Parsing the body is deferred until the signature
/// has been verified.
#[derive(Debug)]
pub struct WebhookRequest {
    pub body: Bytes,
    pub signature: Option<String>,
    pub event: Option<String>,
    pub user_agent: Option<String>,
    pub delivery: Option<String>,
}

impl WebhookRequest {
    pub fn from_parts(headers: &HeaderMap, body: Bytes) -> Self {
        Self {
            body,
            signature: header_string(headers, SIGNATURE_HEADER),
            event: header_string(headers, EVENT_HEADER),
            user_agent: header_string(headers, "User-Agent"),
            delivery: header_string(headers, DELIVERY_HEADER),
        }
    }
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

/// The slice of a `push` event payload this server acts on. Everything else
/// in GitHub's payload is ignored by serde.
#[derive(Debug, Deserialize)]
pub struct PushEvent {
    pub repository: Repository,
}

#[derive(Debug, Deserialize)]
pub struct Repository {
    pub name: String,
    pub owner: Owner,
}

#[derive(Debug, Deserialize)]
pub struct Owner {
    pub login: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn from_parts_extracts_the_relevant_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(SIGNATURE_HEADER, HeaderValue::from_static("sha256=abc"));
        headers.insert(EVENT_HEADER, HeaderValue::from_static("push"));
        headers.insert("User-Agent", HeaderValue::from_static("GitHub-Hookshot/f05835d"));
        headers.insert(DELIVERY_HEADER, HeaderValue::from_static("72d3162e-cc78-11e3"));

        let request = WebhookRequest::from_parts(&headers, Bytes::from_static(b"{}"));
        assert_eq!(request.signature.as_deref(), Some("sha256=abc"));
        assert_eq!(request.event.as_deref(), Some("push"));
        assert_eq!(request.user_agent.as_deref(), Some("GitHub-Hookshot/f05835d"));
        assert_eq!(request.delivery.as_deref(), Some("72d3162e-cc78-11e3"));
        assert_eq!(&request.body[..], b"{}");
    }

    #[test]
    fn from_parts_tolerates_missing_headers() {
        let request = WebhookRequest::from_parts(&HeaderMap::new(), Bytes::new());
        assert!(request.signature.is_none());
        assert!(request.event.is_none());
        assert!(request.user_agent.is_none());
        assert!(request.delivery.is_none());
    }

    #[test]
    fn push_event_parses_the_fields_we_need() {
        let body = r#"{
            "ref": "refs/heads/main",
            "repository": {
                "name": "demo",
                "full_name": "alice/demo",
                "owner": {"login": "alice", "id": 1}
            },
            "pusher": {"name": "alice"}
        }"#;
        let event: PushEvent = serde_json::from_str(body).unwrap();
        assert_eq!(event.repository.name, "demo");
        assert_eq!(event.repository.owner.login, "alice");
    }

    #[test]
    fn push_event_without_an_owner_fails_to_parse() {
        let body = r#"{"repository": {"name": "demo"}}"#;
        assert!(serde_json::from_str::<PushEvent>(body).is_err());
    }
}
