use std::time::Duration;

use reqwest::Client;
use tokio::time::timeout;

use super::error::SubmitError;
use super::types::{FormsResponse, Reply, Submission};

/// Default endpoint of the form-processing service.
pub const FORMS_URL: &str = "https://api.web3forms.com/submit";

/// Default deadline for one submission.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Anything able to deliver a [`Submission`] and hand back the service's reply.
///
/// Implementations must issue at most one request per call.
pub trait FormSender {
    async fn send(&self, submission: &Submission) -> Result<Reply, SubmitError>;
}

/// HTTP sender with an enforced deadline around the whole exchange.
pub struct FormsClient {
    client: Client,
    endpoint: String,
    deadline: Duration,
}

impl FormsClient {
    /// Create a client posting to `endpoint`, normally [`FORMS_URL`].
    pub fn with_endpoint(endpoint: String, deadline: Duration) -> Result<Self, SubmitError> {
        let client = Client::builder()
            .connect_timeout(deadline)
            .user_agent(concat!("waitlist/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint,
            deadline,
        })
    }

    async fn exchange(&self, submission: &Submission) -> Result<Reply, SubmitError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("accept", "application/json")
            .json(submission)
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        let body = serde_json::from_str::<FormsResponse>(&text)
            .map_err(|source| SubmitError::Parse { status, source })?;

        Ok(Reply { status, body })
    }
}

impl FormSender for FormsClient {
    async fn send(&self, submission: &Submission) -> Result<Reply, SubmitError> {
        tracing::debug!(endpoint = %self.endpoint, deadline_ms = self.deadline.as_millis() as u64, "posting submission");

        // Dropping the exchange future on expiry aborts the in-flight request.
        match timeout(self.deadline, self.exchange(submission)).await {
            Ok(Err(SubmitError::Transport(e))) if e.is_timeout() => {
                Err(SubmitError::Timeout(self.deadline))
            }
            Ok(result) => result,
            Err(_) => Err(SubmitError::Timeout(self.deadline)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn submission() -> Submission {
        Submission {
            access_key: "test-key".into(),
            email: "a@b.co".into(),
            subject: None,
            from_name: None,
            source: Some("waitlist_form".into()),
            botcheck: Some(String::new()),
        }
    }

    fn client_for(server: &MockServer, deadline: Duration) -> FormsClient {
        FormsClient::with_endpoint(format!("{}/submit", server.uri()), deadline).unwrap()
    }

    #[tokio::test]
    async fn posts_json_and_parses_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/submit"))
            .and(body_partial_json(json!({
                "access_key": "test-key",
                "email": "a@b.co",
                "botcheck": ""
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": true, "message": "Email sent"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let reply = client_for(&server, DEFAULT_TIMEOUT)
            .send(&submission())
            .await
            .unwrap();
        assert_eq!(reply.status, 200);
        assert!(reply.is_success());
    }

    #[tokio::test]
    async fn non_2xx_is_returned_as_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"success": false, "message": "Spam detected"})),
            )
            .mount(&server)
            .await;

        let reply = client_for(&server, DEFAULT_TIMEOUT)
            .send(&submission())
            .await
            .unwrap();
        assert_eq!(reply.status, 400);
        assert!(!reply.is_success());
        assert_eq!(reply.body.message.as_deref(), Some("Spam detected"));
    }

    #[tokio::test]
    async fn slow_server_reports_timeout_after_one_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": true}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let deadline = Duration::from_millis(150);
        let err = client_for(&server, deadline)
            .send(&submission())
            .await
            .unwrap_err();
        assert!(matches!(err, SubmitError::Timeout(d) if d == deadline));

        let received = server.received_requests().await.unwrap();
        assert_eq!(received.len(), 1);
    }

    #[tokio::test]
    async fn html_body_reports_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server, DEFAULT_TIMEOUT)
            .send(&submission())
            .await
            .unwrap_err();
        assert!(matches!(err, SubmitError::Parse { status: 502, .. }));
    }

    #[tokio::test]
    async fn refused_connection_reports_transport_error() {
        // Port 1 is reserved and nothing listens there.
        let client =
            FormsClient::with_endpoint("http://127.0.0.1:1/submit".into(), DEFAULT_TIMEOUT)
                .unwrap();
        let err = client.send(&submission()).await.unwrap_err();
        assert!(matches!(err, SubmitError::Transport(_)));
    }
}
