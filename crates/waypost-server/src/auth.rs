//! Password verification for the login endpoint.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use rand_core::OsRng;
use serde::Deserialize;

use crate::error::Error;

/// Credentials accepted as valid for this server instance.
#[derive(Clone)]
pub struct AuthConfig {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Body of `POST /sessions/{id}/login`.
#[derive(Deserialize)]
pub struct Credentials {
  pub username: String,
  pub password: String,
}

/// Check `creds` against the configured user.
pub fn verify_credentials(
  creds: &Credentials,
  config: &AuthConfig,
) -> Result<(), Error> {
  if creds.username != config.username {
    return Err(Error::Unauthorized);
  }

  let parsed_hash = PasswordHash::new(&config.password_hash)
    .map_err(|_| Error::Unauthorized)?;

  Argon2::default()
    .verify_password(creds.password.as_bytes(), &parsed_hash)
    .map_err(|_| Error::Unauthorized)
}

/// Produce an argon2 PHC string for `password` with a fresh salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
  let salt = SaltString::generate(&mut OsRng);
  Ok(Argon2::default().hash_password(password.as_bytes(), &salt)?.to_string())
}
