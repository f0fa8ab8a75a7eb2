// SPDX-FileCopyrightText: 2026 Ticketdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Argon2id credential table.
//!
//! Passwords are stored only as PHC strings. Plaintext entries from the
//! config are hashed once when the table is built.

use std::collections::HashMap;

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use ring::rand::{SecureRandom, SystemRandom};
use secrecy::{ExposeSecret, SecretString};
use ticketdesk_config::model::UserConfig;
use ticketdesk_core::{CredentialVerifier, Identity, TicketdeskError};
use tracing::{debug, info};

/// Generate a random 16-byte salt.
fn generate_salt() -> Result<[u8; 16], TicketdeskError> {
    let rng = SystemRandom::new();
    let mut salt = [0u8; 16];
    rng.fill(&mut salt)
        .map_err(|_| TicketdeskError::Credential("failed to generate random salt".to_string()))?;
    Ok(salt)
}

/// Hash a password into an Argon2id PHC string with a random salt.
pub fn hash_password(password: &SecretString) -> Result<String, TicketdeskError> {
    let salt = generate_salt()?;
    let salt = SaltString::encode_b64(&salt)
        .map_err(|e| TicketdeskError::Credential(format!("invalid salt: {e}")))?;
    Argon2::default()
        .hash_password(password.expose_secret().as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| TicketdeskError::Credential(format!("Argon2id hashing failed: {e}")))
}

/// Check that a string parses as a PHC hash.
pub fn validate_hash(phc: &str) -> Result<(), TicketdeskError> {
    PasswordHash::new(phc)
        .map(|_| ())
        .map_err(|e| TicketdeskError::Credential(format!("malformed password hash: {e}")))
}

fn verify_against(phc: &str, password: &str) -> bool {
    match PasswordHash::new(phc) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

struct Credential {
    identity: Identity,
    phc: String,
}

/// The fixed table of known accounts, keyed by lowercased email.
pub struct CredentialTable {
    entries: HashMap<String, Credential>,
    /// Hash checked for unknown emails so both failure paths cost the same.
    decoy_phc: String,
}

impl std::fmt::Debug for CredentialTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialTable")
            .field("accounts", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl CredentialTable {
    /// Build the table from config entries, hashing plaintext passwords.
    pub fn from_config(users: &[UserConfig]) -> Result<Self, TicketdeskError> {
        let mut entries = HashMap::with_capacity(users.len());

        for user in users {
            let email = user.email.trim().to_string();
            let phc = match (&user.password_hash, &user.password) {
                (Some(hash), _) => {
                    validate_hash(hash).map_err(|e| {
                        TicketdeskError::Config(format!("user `{email}`: {e}"))
                    })?;
                    hash.clone()
                }
                (None, Some(plain)) => hash_password(&SecretString::from(plain.clone()))?,
                (None, None) => {
                    return Err(TicketdeskError::Config(format!(
                        "user `{email}` has no password configured"
                    )));
                }
            };

            let name = if user.name.trim().is_empty() {
                email.clone()
            } else {
                user.name.trim().to_string()
            };

            debug!(email = %email, "credential registered");
            entries.insert(
                email.to_ascii_lowercase(),
                Credential {
                    identity: Identity { email, name },
                    phc,
                },
            );
        }

        let decoy_phc = hash_password(&SecretString::from("decoy".to_string()))?;
        info!(accounts = entries.len(), "credential table ready");
        Ok(Self { entries, decoy_phc })
    }
}

impl CredentialVerifier for CredentialTable {
    fn verify(&self, email: &str, password: &str) -> Result<Identity, TicketdeskError> {
        let key = email.trim().to_ascii_lowercase();
        let password = password.trim();

        match self.entries.get(&key) {
            Some(credential) if verify_against(&credential.phc, password) => {
                Ok(credential.identity.clone())
            }
            Some(_) => Err(TicketdeskError::InvalidCredentials),
            None => {
                let _ = verify_against(&self.decoy_phc, password);
                Err(TicketdeskError::InvalidCredentials)
            }
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use ticketdesk_config::TicketdeskConfig;

    use super::*;

    fn demo_table() -> CredentialTable {
        CredentialTable::from_config(&TicketdeskConfig::default().users).unwrap()
    }

    #[test]
    fn demo_user_authenticates() {
        let identity = demo_table()
            .verify("test@ticketapp.dev", "Password123!")
            .unwrap();
        assert_eq!(identity.email, "test@ticketapp.dev");
        assert_eq!(identity.name, "Test User");
    }

    #[test]
    fn wrong_password_is_invalid_credentials() {
        let err = demo_table()
            .verify("test@ticketapp.dev", "wrong")
            .unwrap_err();
        assert!(matches!(err, TicketdeskError::InvalidCredentials));
    }

    #[test]
    fn unknown_email_is_invalid_credentials() {
        let err = demo_table()
            .verify("nobody@ticketapp.dev", "Password123!")
            .unwrap_err();
        assert!(matches!(err, TicketdeskError::InvalidCredentials));
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert!(
            demo_table()
                .verify("  test@ticketapp.dev ", " Password123! ")
                .is_ok()
        );
    }

    #[test]
    fn preset_hash_is_accepted() {
        let phc = hash_password(&SecretString::from("s3cret".to_string())).unwrap();
        assert!(phc.starts_with("$argon2id$"));
        let table = CredentialTable::from_config(&[UserConfig {
            email: "agent@example.com".into(),
            name: String::new(),
            password: None,
            password_hash: Some(phc),
        }])
        .unwrap();
        let identity = table.verify("agent@example.com", "s3cret").unwrap();
        assert_eq!(identity.name, "agent@example.com");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn malformed_hash_is_config_error() {
        let result = CredentialTable::from_config(&[UserConfig {
            email: "agent@example.com".into(),
            name: String::new(),
            password: None,
            password_hash: Some("not-a-hash".into()),
        }]);
        assert!(matches!(result, Err(TicketdeskError::Config(_))));
    }

    #[test]
    fn hashes_are_salted() {
        let password = SecretString::from("same".to_string());
        assert_ne!(
            hash_password(&password).unwrap(),
            hash_password(&password).unwrap()
        );
    }
}
