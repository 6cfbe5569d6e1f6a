use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use tracing::{debug, info, warn};

use crate::api::types::{
    ErrorDetail, InspectionResult, ScheduleRequest, ScheduleResponse, SignupRequest,
    TokenResponse, UserProfile,
};
use crate::error::ApiError;

// Seam between the line orchestrator and the remote service, so cycles can be
// driven by a stub in tests.
#[async_trait]
pub trait InspectionBackend: Send + Sync {
    async fn inspect(
        &self,
        token: Option<String>,
        frame: Vec<u8>,
    ) -> Result<InspectionResult, ApiError>;
}

// Client for the remote visual-inspection service. One shared HTTP client,
// single attempt per call, no retries and no client-side timeout; the backend
// is the sole source of truth for timeout behavior.
pub struct InspectionApi {
    base_url: String,
    http: reqwest::Client,
}

impl InspectionApi {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    // Submits one captured frame. A 401 surfaces as SessionExpired so the
    // caller can purge the credential; every other failure is downgraded to a
    // synthetic error result, never an error the UI has to handle.
    pub async fn inspect(
        &self,
        token: Option<String>,
        frame: Vec<u8>,
    ) -> Result<InspectionResult, ApiError> {
        let part = Part::bytes(frame)
            .file_name("inspection_capture.jpg")
            .mime_str("image/jpeg")?;
        let form = Form::new().part("file", part);

        let mut request = self
            .http
            .post(format!("{}/inspect", self.base_url))
            .multipart(form);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "inspection request failed");
                return Ok(InspectionResult::error_placeholder());
            }
        };

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(ApiError::SessionExpired);
        }
        if !response.status().is_success() {
            warn!(status = %response.status(), "inspection service rejected the request");
            return Ok(InspectionResult::error_placeholder());
        }

        match response.json::<InspectionResult>().await {
            Ok(result) => {
                debug!(status = ?result.status, detections = result.detections.len(), "inspection response");
                Ok(result)
            }
            Err(err) => {
                warn!(error = %err, "inspection response body was malformed");
                Ok(InspectionResult::error_placeholder())
            }
        }
    }

    // Form-encoded credential exchange; the access_token field becomes the
    // bearer token for all authenticated calls.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let params = [("username", username), ("password", password)];
        let response = self
            .http
            .post(format!("{}/token", self.base_url))
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Login(error_detail(response).await));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|err| ApiError::Login(err.to_string()))?;
        match token.access_token {
            Some(token) => {
                info!("login succeeded");
                Ok(token)
            }
            None => Err(ApiError::Login("no token received".to_string())),
        }
    }

    pub async fn signup(&self, request: &SignupRequest) -> Result<(), ApiError> {
        let response = self
            .http
            .post(format!("{}/users/", self.base_url))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Signup(error_detail(response).await));
        }
        info!(email = %request.email, "account created");
        Ok(())
    }

    // Validates a persisted token before entering the dashboard.
    pub async fn current_user(&self, token: &str) -> Result<UserProfile, ApiError> {
        let response = self
            .http
            .get(format!("{}/users/me/", self.base_url))
            .bearer_auth(token)
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(ApiError::SessionExpired);
        }
        if !response.status().is_success() {
            return Err(ApiError::UnexpectedResponse(error_detail(response).await));
        }
        response
            .json::<UserProfile>()
            .await
            .map_err(|err| ApiError::UnexpectedResponse(err.to_string()))
    }

    // Public call, no bearer token.
    pub async fn schedule_demo(&self, request: &ScheduleRequest) -> Result<String, ApiError> {
        let response = self
            .http
            .post(format!("{}/schedule-demo", self.base_url))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::UnexpectedResponse(error_detail(response).await));
        }
        let confirmation: ScheduleResponse = response
            .json()
            .await
            .map_err(|err| ApiError::UnexpectedResponse(err.to_string()))?;
        Ok(confirmation.message)
    }
}

#[async_trait]
impl InspectionBackend for InspectionApi {
    async fn inspect(
        &self,
        token: Option<String>,
        frame: Vec<u8>,
    ) -> Result<InspectionResult, ApiError> {
        InspectionApi::inspect(self, token, frame).await
    }
}

// Error bodies carry a human-readable detail field; fall back to the status.
async fn error_detail(response: reqwest::Response) -> String {
    let status = response.status();
    match response.bytes().await {
        Ok(bytes) => serde_json::from_slice::<ErrorDetail>(&bytes)
            .map(|d| d.detail)
            .unwrap_or_else(|_| status.to_string()),
        Err(_) => status.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{CompanyDescriptor, InspectionStatus, ERROR_PLACEHOLDER_CLASS};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    // Serves exactly one request: drains it fully (headers plus the
    // advertised body), answers with the canned response, then closes.
    async fn spawn_one_shot_server(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 8192];
            let header_end = loop {
                let n = stream.read(&mut chunk).await.unwrap();
                if n == 0 {
                    return;
                }
                request.extend_from_slice(&chunk[..n]);
                if let Some(pos) = find_subsequence(&request, b"\r\n\r\n") {
                    break pos + 4;
                }
            };
            let headers = String::from_utf8_lossy(&request[..header_end]).to_string();
            let content_length = headers
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    if name.eq_ignore_ascii_case("content-length") {
                        value.trim().parse::<usize>().ok()
                    } else {
                        None
                    }
                })
                .unwrap_or(0);
            let mut body_read = request.len() - header_end;
            while body_read < content_length {
                let n = stream.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                body_read += n;
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn jpeg_stub() -> Vec<u8> {
        vec![0xFF, 0xD8, 0xFF, 0xD9]
    }

    #[tokio::test]
    async fn inspect_parses_a_successful_response() {
        let base = spawn_one_shot_server(
            "200 OK",
            r#"{"status": "accepted", "detections": [{"prediction": "polished_casting", "confidence": 0.95, "box": [0.1, 0.1, 0.4, 0.4]}]}"#,
        )
        .await;
        let api = InspectionApi::new(base);

        let result = api
            .inspect(Some("token".to_string()), jpeg_stub())
            .await
            .unwrap();
        assert_eq!(result.status, InspectionStatus::Accepted);
        assert_eq!(result.detections.len(), 1);
        assert_eq!(result.detections[0].prediction, "polished_casting");
    }

    #[tokio::test]
    async fn inspect_maps_401_to_session_expired() {
        let base = spawn_one_shot_server("401 Unauthorized", r#"{"detail": "Could not validate credentials"}"#).await;
        let api = InspectionApi::new(base);

        let result = api.inspect(Some("stale".to_string()), jpeg_stub()).await;
        assert!(matches!(result, Err(ApiError::SessionExpired)));
    }

    #[tokio::test]
    async fn inspect_downgrades_a_server_error_to_a_placeholder() {
        let base = spawn_one_shot_server("500 Internal Server Error", r#"{"detail": "boom"}"#).await;
        let api = InspectionApi::new(base);

        let result = api
            .inspect(Some("token".to_string()), jpeg_stub())
            .await
            .unwrap();
        assert_eq!(result.status, InspectionStatus::Error);
        assert_eq!(result.detections[0].prediction, ERROR_PLACEHOLDER_CLASS);
    }

    #[tokio::test]
    async fn inspect_downgrades_an_unreachable_backend() {
        let api = InspectionApi::new("http://127.0.0.1:9".to_string());
        let result = api.inspect(None, jpeg_stub()).await.unwrap();
        assert_eq!(result.status, InspectionStatus::Error);
    }

    #[tokio::test]
    async fn inspect_downgrades_a_malformed_body() {
        let base = spawn_one_shot_server("200 OK", "not json at all").await;
        let api = InspectionApi::new(base);

        let result = api
            .inspect(Some("token".to_string()), jpeg_stub())
            .await
            .unwrap();
        assert_eq!(result.status, InspectionStatus::Error);
    }

    #[tokio::test]
    async fn login_returns_the_access_token() {
        let base = spawn_one_shot_server(
            "200 OK",
            r#"{"access_token": "jwt-token", "token_type": "bearer"}"#,
        )
        .await;
        let api = InspectionApi::new(base);

        let token = api.login("ops@example.com", "secret").await.unwrap();
        assert_eq!(token, "jwt-token");
    }

    #[tokio::test]
    async fn login_without_a_token_field_fails() {
        let base = spawn_one_shot_server("200 OK", r#"{"token_type": "bearer"}"#).await;
        let api = InspectionApi::new(base);

        let result = api.login("ops@example.com", "secret").await;
        assert!(matches!(result, Err(ApiError::Login(_))));
    }

    #[tokio::test]
    async fn login_surfaces_the_rejection_detail() {
        let base =
            spawn_one_shot_server("401 Unauthorized", r#"{"detail": "Incorrect email or password"}"#)
                .await;
        let api = InspectionApi::new(base);

        match api.login("ops@example.com", "wrong").await {
            Err(ApiError::Login(detail)) => assert_eq!(detail, "Incorrect email or password"),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn signup_surfaces_the_conflict_detail() {
        let base =
            spawn_one_shot_server("400 Bad Request", r#"{"detail": "Email already registered"}"#)
                .await;
        let api = InspectionApi::new(base);

        let request = SignupRequest {
            email: "ops@example.com".to_string(),
            password: "secret".to_string(),
            company: CompanyDescriptor {
                name: "Acme Castings".to_string(),
                established_date: "2001-05-01".to_string(),
            },
        };
        match api.signup(&request).await {
            Err(ApiError::Signup(detail)) => assert_eq!(detail, "Email already registered"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn current_user_maps_401_to_session_expired() {
        let base = spawn_one_shot_server("401 Unauthorized", r#"{"detail": "expired"}"#).await;
        let api = InspectionApi::new(base);

        let result = api.current_user("stale").await;
        assert!(matches!(result, Err(ApiError::SessionExpired)));
    }

    #[tokio::test]
    async fn schedule_demo_returns_the_confirmation_message() {
        let base = spawn_one_shot_server(
            "200 OK",
            r#"{"message": "Demo scheduled for 2026-09-01 at 10 min."}"#,
        )
        .await;
        let api = InspectionApi::new(base);

        let request = ScheduleRequest {
            email: "demo-requests@visionline.example".to_string(),
            date: "2026-09-01".to_string(),
            time_slot: "10 min".to_string(),
        };
        let message = api.schedule_demo(&request).await.unwrap();
        assert!(message.contains("2026-09-01"));
    }
}
