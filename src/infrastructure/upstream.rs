//! # Upstream HTTP Adapter
//!
//! Concrete implementations of the stream and posting capabilities against
//! the upstream's HTTP API. The stream endpoint delivers newline-delimited
//! JSON; blank lines are keep-alives.

use async_stream::try_stream;
use async_trait::async_trait;
use bytes::BytesMut;
use futures::StreamExt;
use serde_json::{Value, json};

use crate::application::relay::classify::post_from_value;
use crate::domain::config::RelayConfig;
use crate::domain::error::UpstreamError;
use crate::domain::traits::{MessageStream, Microblog, StreamSource};
use crate::domain::types::Post;

/// Long-lived connection to the upstream push stream.
pub struct HttpStreamSource {
    http: reqwest::Client,
    stream_url: String,
    token: String,
}

impl HttpStreamSource {
    pub fn new(http: reqwest::Client, config: &RelayConfig) -> Self {
        Self {
            http,
            stream_url: config.stream_url.clone(),
            token: config.token.clone(),
        }
    }
}

#[async_trait]
impl StreamSource for HttpStreamSource {
    async fn open(&self) -> Result<MessageStream, UpstreamError> {
        let response = self
            .http
            .get(&self.stream_url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(UpstreamError::transport)?
            .error_for_status()
            .map_err(UpstreamError::transport)?;

        tracing::info!("Upstream stream connection opened");
        let mut body = response.bytes_stream();

        let stream = try_stream! {
            let mut buf = BytesMut::new();
            while let Some(chunk) = body.next().await {
                let chunk = chunk.map_err(UpstreamError::transport)?;
                buf.extend_from_slice(&chunk);

                while let Some(pos) = buf.iter().position(|b| *b == b'\n') {
                    let line = buf.split_to(pos + 1);
                    let line = String::from_utf8_lossy(&line[..pos]);
                    let line = line.trim();
                    if line.is_empty() {
                        // Keep-alive: connection healthy, nothing new.
                        yield Value::Null;
                    } else {
                        let value: Value = serde_json::from_str(line).map_err(|e| {
                            UpstreamError::Transport(format!("undecodable stream line: {e}"))
                        })?;
                        yield value;
                    }
                }
            }
        };
        Ok(Box::pin(stream))
    }
}

/// REST client for the posting capability.
pub struct HttpMicroblog {
    http: reqwest::Client,
    api_base: String,
    token: String,
}

impl HttpMicroblog {
    pub fn new(http: reqwest::Client, config: &RelayConfig) -> Self {
        Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, UpstreamError> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(UpstreamError::transport)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body: Value = response.json().await.unwrap_or(Value::Null);
        Err(rejection_from(status, &body))
    }
}

#[async_trait]
impl Microblog for HttpMicroblog {
    async fn post(&self, text: &str, reply_to: Option<&str>) -> Result<(), UpstreamError> {
        let mut payload = json!({ "status": text });
        if let Some(id) = reply_to {
            payload["in_reply_to_status_id"] = json!(id);
        }
        self.send(self.http.post(self.url("statuses/update.json")).json(&payload))
            .await
            .map(|_| ())
    }

    async fn lookup(&self, id: &str) -> Result<Post, UpstreamError> {
        let response = self
            .http
            .get(self.url(&format!("statuses/show/{id}.json")))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(UpstreamError::transport)?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(UpstreamError::NotFound(id.to_string()));
        }
        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            return Err(rejection_from(status, &body));
        }
        let value: Value = response.json().await.map_err(UpstreamError::transport)?;
        post_from_value(&value)
            .ok_or_else(|| UpstreamError::Transport("malformed status payload".to_string()))
    }

    async fn repost(&self, id: &str) -> Result<(), UpstreamError> {
        self.send(self.http.post(self.url(&format!("statuses/retweet/{id}.json"))))
            .await
            .map(|_| ())
    }

    async fn follow(&self, user: &str) -> Result<(), UpstreamError> {
        let payload = json!({ "screen_name": user, "follow": true });
        self.send(self.http.post(self.url("friendships/create.json")).json(&payload))
            .await
            .map(|_| ())
    }

    async fn unfollow(&self, user: &str) -> Result<(), UpstreamError> {
        let payload = json!({ "screen_name": user });
        self.send(self.http.post(self.url("friendships/destroy.json")).json(&payload))
            .await
            .map(|_| ())
    }
}

/// Map a non-success response to the error taxonomy: a structured `errors`
/// list becomes a rejection, anything else a transport failure.
fn rejection_from(status: reqwest::StatusCode, body: &Value) -> UpstreamError {
    if let Some(list) = body.get("errors").and_then(Value::as_array) {
        let errors: Vec<String> = list
            .iter()
            .filter_map(|e| e.get("message").and_then(Value::as_str).map(str::to_string))
            .collect();
        if !errors.is_empty() {
            return UpstreamError::Rejected { errors };
        }
    }
    UpstreamError::Transport(format!("upstream returned {status}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_errors_become_rejections() {
        let body = json!({"errors": [
            {"message": "Status is a duplicate.", "code": 187},
            {"message": "Rate limit exceeded.", "code": 88}
        ]});
        let err = rejection_from(reqwest::StatusCode::FORBIDDEN, &body);
        let UpstreamError::Rejected { errors } = err else {
            panic!("expected a rejection");
        };
        assert_eq!(
            errors,
            vec!["Status is a duplicate.", "Rate limit exceeded."]
        );
    }

    #[test]
    fn test_unstructured_failure_is_transport() {
        let err = rejection_from(reqwest::StatusCode::BAD_GATEWAY, &Value::Null);
        assert!(matches!(err, UpstreamError::Transport(_)));
    }
}
