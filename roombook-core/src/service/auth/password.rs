use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, ParamsBuilder, Version,
};
use tokio::task;

use crate::{Error, Result};

/// Argon2id password hashing service
///
/// Hashing is CPU-intensive, so both operations run on a blocking thread.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Recommended parameters: 64 MB memory, 3 iterations, 4 lanes, 32 byte output
    pub fn new() -> Result<Self> {
        Self::with_params(65536, 3, 4)
    }

    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self> {
        let params = ParamsBuilder::new()
            .m_cost(m_cost)
            .t_cost(t_cost)
            .p_cost(p_cost)
            .output_len(32)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build Argon2 params: {e}")))?;
        Ok(Self { params })
    }

    fn argon2(params: Params) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    }

    /// Hash a password into a PHC string
    pub async fn hash(&self, password: &str) -> Result<String> {
        let password = password.to_string();
        let params = self.params.clone();

        task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Self::argon2(params)
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| Error::Internal(format!("Failed to hash password: {e}")))
        })
        .await
        .map_err(|e| Error::Internal(format!("Password hashing task failed: {e}")))?
    }

    /// Verify a password against a stored PHC hash.
    ///
    /// The parameters embedded in the hash are used, so hashes created with
    /// older settings keep verifying.
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        let password = password.to_string();
        let hash = hash.to_string();

        task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&hash)
                .map_err(|e| Error::Internal(format!("Invalid password hash format: {e}")))?;

            match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
                Ok(()) => Ok(true),
                Err(argon2::password_hash::Error::Password) => Ok(false),
                Err(e) => Err(Error::Internal(format!("Password verification failed: {e}"))),
            }
        })
        .await
        .map_err(|e| Error::Internal(format!("Password verification task failed: {e}")))?
    }
}
