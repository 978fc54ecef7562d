//! JWT claims and verification shared by the services
//!
//! The auth service signs tokens with its RSA private key; anything holding
//! the public key can check them through [`TokenVerifier`].

use anyhow::Result;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::role::Role;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// Role at the time the token was issued
    pub role: Role,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
    /// Token type (access or refresh)
    pub token_type: TokenType,
    /// Unique token id, so tokens issued within the same second differ
    pub jti: Uuid,
}

/// Token type enum
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    /// Access token
    Access,
    /// Refresh token
    Refresh,
}

/// Redis key under which a revoked token is remembered.
pub fn blacklist_key(token: &str) -> String {
    format!("blacklisted_token:{}", token)
}

/// Read a PEM value that is either inline or a path to a file.
///
/// Relative paths are tried against the working directory first, then
/// against `base_dir`.
pub fn load_pem(value: &str, base_dir: &str) -> Result<String> {
    if value.starts_with("-----BEGIN") {
        return Ok(value.to_string());
    }

    let pem = std::fs::read_to_string(value)
        .or_else(|_| {
            let mut path = std::path::PathBuf::from(base_dir);
            path.push(value);
            std::fs::read_to_string(path)
        })
        .map_err(|e| anyhow::anyhow!("Failed to read key file {}: {}", value, e))?;

    Ok(pem.trim().to_string())
}

/// Verifies RS256 tokens against a public key.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn from_rsa_pem(public_key: &str) -> Result<Self> {
        let decoding_key = DecodingKey::from_rsa_pem(public_key.as_bytes())?;
        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Decode and check a token without looking at its type.
    pub fn decode(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }

    /// Decode a token and require it to be of `expected` type.
    pub fn verify(&self, token: &str, expected: TokenType) -> Result<Claims> {
        let claims = self.decode(token)?;
        if claims.token_type != expected {
            anyhow::bail!("Expected {:?} token, got {:?}", expected, claims.token_type);
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUBLIC_KEY: &str = include_str!("../../../test-keys/jwt_public.pem");

    #[test]
    fn inline_pem_is_returned_verbatim() {
        let pem = load_pem(PUBLIC_KEY, env!("CARGO_MANIFEST_DIR")).unwrap();
        assert_eq!(pem, PUBLIC_KEY);
    }

    #[test]
    fn pem_path_is_resolved_against_base_dir() {
        let pem = load_pem("../../test-keys/jwt_public.pem", env!("CARGO_MANIFEST_DIR")).unwrap();
        assert_eq!(pem, PUBLIC_KEY.trim());
    }

    #[test]
    fn missing_key_file_is_an_error() {
        assert!(load_pem("does/not/exist.pem", env!("CARGO_MANIFEST_DIR")).is_err());
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        let verifier = TokenVerifier::from_rsa_pem(PUBLIC_KEY).unwrap();
        assert!(verifier.decode("not.a.token").is_err());
        assert!(verifier.verify("", TokenType::Access).is_err());
    }
}
