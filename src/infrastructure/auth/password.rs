use argon2::{
    password_hash::{
        rand_core::OsRng,
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString, Error as Argon2Error
    },
    Argon2, Algorithm, Params, Version
};

use crate::errors::PasswordError;

/// Hashes with argon2id. `fast` selects the minimum cost parameters and is
/// meant for the testing profile only.
pub fn hash_password(password: &str, fast: bool) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let params = if fast {
        Params::new(Params::MIN_M_COST, Params::MIN_T_COST, 1, None)
    } else {
        Params::new(15_000, 2, 1, None)
    }
    .map_err(|e| PasswordError::HashingError(e.to_string()))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashingError(e.to_string()))
        .map(|hash| hash.to_string())
}

pub fn verify_password(
    password: &str,
    hashed: &str,
) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hashed)
        .map_err(|e| PasswordError::InvalidHashFormat(e.to_string()))?;

    match Argon2::default().verify_password(
        password.as_bytes(),
        &parsed_hash,
    ) {
        Ok(()) => Ok(true),
        Err(Argon2Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerificationError(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_its_own_hashes() {
        let hash = hash_password("Portfolio#2024", true).unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("Portfolio#2024", &hash).unwrap());
        assert!(!verify_password("portfolio#2024", &hash).unwrap());
    }

    #[test]
    fn rejects_malformed_hashes() {
        assert!(matches!(
            verify_password("anything", "not-a-hash"),
            Err(PasswordError::InvalidHashFormat(_))
        ));
    }
}
