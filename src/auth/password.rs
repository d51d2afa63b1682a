/// Password Hashing and Verification
///
/// Salted bcrypt. No strength policy is applied: any password content hashes.

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::AuthError;

#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a password using bcrypt
    ///
    /// # Errors
    /// Returns `Hashing` only if bcrypt itself fails (bad cost, entropy)
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        hash(password, self.cost).map_err(|e| AuthError::Hashing(e.to_string()))
    }

    /// Verify a password against its hash
    ///
    /// A mismatch is `Ok(false)`. Only a hash that bcrypt cannot parse is an
    /// error.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        verify(password, hash).map_err(|e| AuthError::Hashing(e.to_string()))
    }
}
