use chrono::{DateTime, Utc};
use serde::Serialize;

/// Checks a sign-in attempt. Implementations decide where the directory lives.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, email: &str, password: &str) -> bool;
}

/// Fixed in-process user list.
///
/// This is a stand-in for a real identity provider: passwords are compared in plain text and
/// the list ships with the binary. Do not put real accounts in it.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    users: Vec<(String, String)>,
}

impl StaticCredentials {
    pub fn new<I, E, P>(users: I) -> Self
    where
        I: IntoIterator<Item = (E, P)>,
        E: Into<String>,
        P: Into<String>,
    {
        Self {
            users: users
                .into_iter()
                .map(|(email, password)| (email.into(), password.into()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, email: &str, password: &str) -> bool {
        self.users
            .iter()
            .any(|(known_email, known_password)| known_email == email && known_password == password)
    }
}

/// Signed-in user. Lives only as long as the portal that created it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub email: String,
    pub signed_in_at: DateTime<Utc>,
}

impl Session {
    pub fn start(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            signed_in_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_credentials_require_exact_pair() {
        let directory = StaticCredentials::new([("recruiter@example.com", "Hunter#2024")]);

        assert!(directory.verify("recruiter@example.com", "Hunter#2024"));
        assert!(!directory.verify("recruiter@example.com", "hunter#2024"));
        assert!(!directory.verify("Recruiter@example.com", "Hunter#2024"));
        assert!(!directory.verify("", ""));
    }

    #[test]
    fn empty_directory_rejects_everyone() {
        let directory = StaticCredentials::default();
        assert!(directory.is_empty());
        assert!(!directory.verify("anyone@example.com", "password"));
    }
}
