//! Session client for the Warframe mobile API.
//!
//! The service is stateful: login issues a session (account id + nonce)
//! that every further call must present, and logout invalidates it. This
//! module owns that lifecycle and the mapping of the service's ad hoc
//! login failures into [`ApiError`].

use chrono::Utc;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::auth::{Credentials, SessionState};

use super::error::ApiError;
use super::transport::{HttpTransport, RequestBody, Transport};

// ============================================================================
// Constants
// ============================================================================

/// Base URL for the mobile API endpoints. The service exposes exactly one
/// host; nothing here is configurable.
const API_BASE_URL: &str = "https://api.warframe.com/API/PHP";

/// Client version the login endpoint checks against. Taken from the
/// Android app; logins with an older version are rejected with 400.
const APP_VERSION: &str = "4.1.2.4";

/// Placeholder for the device-identifier field. The service requires the
/// field but does not appear to use the value; the Android app derives it
/// from the phone's device ID.
const DEVICE_ID_PLACEHOLDER: u64 = 9_999_999_999_999_999;

#[derive(Debug, Deserialize)]
struct LoginResponse {
    id: String,
    #[serde(rename = "Nonce")]
    nonce: String,
}

/// Client owning one session against the mobile API.
///
/// Mutating operations take `&mut self`, so one client instance never has
/// two requests in flight; share a client across tasks only behind external
/// synchronization.
pub struct SessionClient<T = HttpTransport> {
    transport: T,
    credentials: Credentials,
    session: Option<SessionState>,
}

impl SessionClient<HttpTransport> {
    /// Create a client with the production HTTP transport.
    ///
    /// Hashes the password once; no network I/O happens here. The client
    /// starts logged out.
    pub fn new(email: impl Into<String>, password: &str) -> Result<Self, ApiError> {
        Ok(Self::with_transport(HttpTransport::new()?, email, password))
    }
}

impl<T: Transport> SessionClient<T> {
    /// Create a client over a caller-supplied transport.
    pub fn with_transport(transport: T, email: impl Into<String>, password: &str) -> Self {
        Self {
            transport,
            credentials: Credentials::new(email, password),
            session: None,
        }
    }

    pub fn email(&self) -> &str {
        self.credentials.email()
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    /// Current session, if logged in.
    pub fn session(&self) -> Option<&SessionState> {
        self.session.as_ref()
    }

    /// Gate for session-required operations. Runs before any request is
    /// built, so a logged-out call performs no I/O at all.
    fn require_session(&self) -> Result<&SessionState, ApiError> {
        self.session.as_ref().ok_or(ApiError::NotLoggedIn)
    }

    /// Authenticate and store the issued session.
    ///
    /// There is no local already-logged-in check: the service answers 409
    /// when a session is active for these credentials, and that response is
    /// the source of truth. On any failure the local state is untouched.
    pub async fn login(&mut self) -> Result<(), ApiError> {
        let url = format!("{}/login.php", API_BASE_URL);

        // The login endpoint is the only one taking JSON, and it insists on
        // the compact encoding; `Value::to_string` emits exactly that.
        // `mobile: true` keeps the service from clobbering an active game
        // session for the same account.
        let payload = serde_json::json!({
            "email": self.credentials.email(),
            "password": self.credentials.password_digest(),
            "time": Utc::now().timestamp(),
            "date": DEVICE_ID_PLACEHOLDER,
            "mobile": true,
            "appVersion": APP_VERSION,
        });

        debug!(email = self.credentials.email(), "Logging in");
        let text = self
            .transport
            .post(&url, RequestBody::Json(payload.to_string()))
            .await
            .map_err(|err| {
                let classified = ApiError::classify_login(err);
                warn!(error = %classified, "Login rejected");
                classified
            })?;

        let response: LoginResponse = serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("bad login response: {e}")))?;

        self.session = Some(SessionState {
            mobile: true,
            account_id: response.id,
            nonce: response.nonce,
        });
        debug!("Login succeeded");
        Ok(())
    }

    /// Log out and clear the local session.
    ///
    /// The session record itself is the form body. Local state is cleared
    /// only once the call returns without error; a failed logout leaves the
    /// client logged in.
    pub async fn logout(&mut self) -> Result<(), ApiError> {
        let form = self.require_session()?.to_form();
        let url = format!("{}/logout.php", API_BASE_URL);
        self.transport.post(&url, RequestBody::Form(form)).await?;
        self.session = None;
        debug!("Logged out");
        Ok(())
    }

    /// Fetch the account inventory.
    ///
    /// The service returns one large JSON object; it is passed through as-is
    /// beyond the JSON layer.
    pub async fn get_inventory(&self) -> Result<Map<String, Value>, ApiError> {
        let form = self.require_session()?.to_form();
        let url = format!("{}/inventory.php", API_BASE_URL);
        let text = self.transport.post(&url, RequestBody::Form(form)).await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("bad inventory response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::api::error::TransportError;

    /// Scripted transport: hands out canned results in order and records
    /// every call it sees.
    struct MockTransport {
        calls: RefCell<Vec<(String, RequestBody)>>,
        responses: RefCell<Vec<Result<String, TransportError>>>,
    }

    impl MockTransport {
        fn new(responses: Vec<Result<String, TransportError>>) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                responses: RefCell::new(responses),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    impl Transport for MockTransport {
        async fn post(&self, url: &str, body: RequestBody) -> Result<String, TransportError> {
            self.calls.borrow_mut().push((url.to_string(), body));
            self.responses.borrow_mut().remove(0)
        }
    }

    const LOGIN_OK: &str = r#"{"id":"A123","Nonce":"N456"}"#;

    fn status(status: u16, body: &str) -> TransportError {
        TransportError::Status {
            status,
            body: body.to_string(),
        }
    }

    fn client(responses: Vec<Result<String, TransportError>>) -> SessionClient<MockTransport> {
        SessionClient::with_transport(MockTransport::new(responses), "tenno@example.com", "hunter2")
    }

    #[tokio::test]
    async fn test_logout_while_logged_out_sends_nothing() {
        let mut client = client(vec![]);
        let err = client.logout().await.unwrap_err();
        assert!(matches!(err, ApiError::NotLoggedIn));
        assert_eq!(client.transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_inventory_while_logged_out_sends_nothing() {
        let client = client(vec![]);
        let err = client.get_inventory().await.unwrap_err();
        assert!(matches!(err, ApiError::NotLoggedIn));
        assert_eq!(client.transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_login_stores_issued_session() {
        let mut client = client(vec![Ok(LOGIN_OK.to_string())]);
        client.login().await.unwrap();

        assert!(client.is_logged_in());
        assert_eq!(
            client.session(),
            Some(&SessionState {
                mobile: true,
                account_id: "A123".to_string(),
                nonce: "N456".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_login_conflict_leaves_client_logged_out() {
        let mut client = client(vec![Err(status(409, "Conflict"))]);
        let err = client.login().await.unwrap_err();
        assert!(matches!(err, ApiError::AlreadyLoggedIn));
        assert!(!client.is_logged_in());
    }

    #[tokio::test]
    async fn test_login_version_rejection() {
        let mut client = client(vec![Err(status(400, "mobile version out of date"))]);
        let err = client.login().await.unwrap_err();
        assert!(matches!(err, ApiError::VersionOutOfDate));
        assert!(!client.is_logged_in());
    }

    #[tokio::test]
    async fn test_login_other_rejection_keeps_body_and_status() {
        let mut client = client(vec![Err(status(400, "invalid email"))]);
        match client.login().await.unwrap_err() {
            ApiError::LoginFailed { message, status } => {
                assert_eq!(message, "invalid email");
                assert_eq!(status, 400);
            }
            other => panic!("expected LoginFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_login_garbage_body_is_invalid_response() {
        let mut client = client(vec![Ok("not json".to_string())]);
        let err = client.login().await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
        assert!(!client.is_logged_in());
    }

    #[tokio::test]
    async fn test_login_payload_has_exactly_the_expected_fields() {
        let mut client = client(vec![Ok(LOGIN_OK.to_string())]);
        client.login().await.unwrap();

        let calls = client.transport.calls.borrow();
        let (url, body) = &calls[0];
        assert_eq!(url, "https://api.warframe.com/API/PHP/login.php");

        let RequestBody::Json(raw) = body else {
            panic!("login must send a JSON body");
        };
        // Compact encoding: the service chokes on pretty-printed JSON
        assert!(!raw.contains(' ') && !raw.contains('\n'));

        let decoded: Map<String, Value> = serde_json::from_str(raw).unwrap();
        let mut keys: Vec<&str> = decoded.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["appVersion", "date", "email", "mobile", "password", "time"]
        );

        assert_eq!(decoded["email"], "tenno@example.com");
        assert_eq!(decoded["mobile"], true);
        assert_eq!(decoded["appVersion"], "4.1.2.4");
        assert_eq!(decoded["date"].as_u64(), Some(9_999_999_999_999_999));
        let password = decoded["password"].as_str().unwrap();
        assert_eq!(password.len(), 128);
        assert!(password.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(decoded["time"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_logout_sends_session_as_form() {
        let mut client = client(vec![Ok(LOGIN_OK.to_string()), Ok("{}".to_string())]);
        client.login().await.unwrap();
        client.logout().await.unwrap();

        assert!(!client.is_logged_in());
        let calls = client.transport.calls.borrow();
        let (url, body) = &calls[1];
        assert_eq!(url, "https://api.warframe.com/API/PHP/logout.php");
        assert_eq!(
            body,
            &RequestBody::Form(vec![
                ("mobile", "true".to_string()),
                ("accountId", "A123".to_string()),
                ("nonce", "N456".to_string()),
            ])
        );
    }

    #[tokio::test]
    async fn test_failed_logout_keeps_session() {
        let mut client = client(vec![
            Ok(LOGIN_OK.to_string()),
            Err(status(500, "server error")),
        ]);
        client.login().await.unwrap();

        let err = client.logout().await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::Transport(TransportError::Status { status: 500, .. })
        ));
        assert!(client.is_logged_in());
    }

    #[tokio::test]
    async fn test_inventory_after_logout_is_not_logged_in() {
        let mut client = client(vec![Ok(LOGIN_OK.to_string()), Ok("{}".to_string())]);
        client.login().await.unwrap();
        client.logout().await.unwrap();

        let err = client.get_inventory().await.unwrap_err();
        assert!(matches!(err, ApiError::NotLoggedIn));
        // Only login and logout ever hit the wire
        assert_eq!(client.transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_inventory_returns_decoded_object() {
        let mut client = client(vec![
            Ok(LOGIN_OK.to_string()),
            Ok(r#"{"RegularCredits":12345,"Suits":[{"ItemType":"Excalibur"}]}"#.to_string()),
        ]);
        client.login().await.unwrap();

        let inventory = client.get_inventory().await.unwrap();
        assert_eq!(inventory["RegularCredits"], 12345);
        assert_eq!(inventory["Suits"][0]["ItemType"], "Excalibur");

        let calls = client.transport.calls.borrow();
        let (url, body) = &calls[1];
        assert_eq!(url, "https://api.warframe.com/API/PHP/inventory.php");
        assert!(matches!(body, RequestBody::Form(_)));
    }

    #[tokio::test]
    async fn test_inventory_failure_is_not_classified() {
        // 409 outside the login path stays a raw transport error
        let mut client = client(vec![
            Ok(LOGIN_OK.to_string()),
            Err(status(409, "Conflict")),
        ]);
        client.login().await.unwrap();

        let err = client.get_inventory().await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::Transport(TransportError::Status { status: 409, .. })
        ));
    }
}
