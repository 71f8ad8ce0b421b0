/// Session issued by the login endpoint.
///
/// All fields are required: a session exists in full or not at all. The
/// client holds an `Option<SessionState>`, so a partially populated session
/// is unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Mirrors the `mobile` flag sent at login, which tells the service not
    /// to invalidate a concurrently active game session for the account.
    pub mobile: bool,
    /// Account id from the login response's `id` field.
    pub account_id: String,
    /// Per-login nonce from the response's `Nonce` field.
    pub nonce: String,
}

impl SessionState {
    /// Form fields for the session-backed endpoints (logout, inventory).
    /// The session record itself is the request body for those calls.
    pub fn to_form(&self) -> Vec<(&'static str, String)> {
        vec![
            ("mobile", self.mobile.to_string()),
            ("accountId", self.account_id.clone()),
            ("nonce", self.nonce.clone()),
        ]
    }
}
