use whirlpool::{Digest, Whirlpool};

/// Account credentials for the mobile API.
///
/// The service never sees the plaintext password: it expects the Whirlpool
/// digest of the password as a lowercase hex string. The digest is computed
/// once at construction and the plaintext is not retained.
#[derive(Debug, Clone)]
pub struct Credentials {
    email: String,
    password_digest: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: &str) -> Self {
        Self {
            email: email.into(),
            password_digest: digest_password(password),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Hex digest sent in place of the password on the wire.
    pub fn password_digest(&self) -> &str {
        &self.password_digest
    }
}

/// Whirlpool is fixed by the service protocol. 512-bit output, 128 hex chars.
fn digest_password(password: &str) -> String {
    let mut hasher = Whirlpool::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
