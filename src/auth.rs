//! Admin credential check.
//!
//! Basic-Auth credentials are verified on every request against the
//! configured admin pair. There are no sessions, lockouts or rate limits.

use subtle::ConstantTimeEq;

/// Realm sent in the `WWW-Authenticate` challenge.
pub const REALM: &str = "Access";

/// Configured admin credentials.
#[derive(Clone)]
pub struct AdminCredentials {
    username: String,
    password: String,
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// `true` only when Basic-Auth was presented and both fields match.
    ///
    /// Both fields are compared in constant time and both comparisons always
    /// run, so the response time does not reveal which field was wrong or
    /// how long a matching prefix was.
    pub fn check_credentials(&self, username: &str, password: &str, presented: bool) -> bool {
        if !presented {
            return false;
        }

        let user_ok = self.username.as_bytes().ct_eq(username.as_bytes());
        let pass_ok = self.password.as_bytes().ct_eq(password.as_bytes());

        bool::from(user_ok & pass_ok)
    }
}

#[cfg(test)]
mod tests;
