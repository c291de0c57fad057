use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use serde::{Deserialize, de::DeserializeOwned};
use std::{collections::HashSet, error::Error as StdError, fmt};
use uuid::Uuid;

use crate::services::scoping::ScopePattern;

// Errors returned by the local claims decode.
#[derive(Debug)]
pub enum ClaimsError {
    /// Not a structurally valid JWT (segments / base64 / header).
    Malformed(jsonwebtoken::errors::Error),
    /// Well-formed token whose claims are missing or mistyped.
    Claims(jsonwebtoken::errors::Error),
}

impl fmt::Display for ClaimsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(e) => write!(f, "cannot parse token: {}", e),
            Self::Claims(e) => write!(f, "cannot process token claims: {}", e),
        }
    }
}

impl StdError for ClaimsError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Malformed(e) | Self::Claims(e) => Some(e),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for ClaimsError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::Json(_) => Self::Claims(e),
            _ => Self::Malformed(e),
        }
    }
}

/// Claims carried by tokens on self-service routes.
///
/// Every field is required; a token lacking one fails the decode as a whole.
#[derive(Debug, Clone, Deserialize)]
pub struct ScopedClaims {
    pub scope_permissions: Vec<ScopePattern>,
    pub scoped_fields: Vec<ScopePattern>,
    pub user_id: Uuid,
    pub account_id: Uuid,
    pub owner: bool,
}

/// Voice-assistant tokens only have to identify the user.
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceClaims {
    pub user_id: Uuid,
}

/// Local, unverified decode of bearer token claims.
///
/// Tokens reach this decoder only after the remote validator accepted them,
/// so signature and expiry are not re-checked here.
#[derive(Clone)]
pub struct ClaimsDecoder {
    key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for ClaimsDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClaimsDecoder").finish_non_exhaustive()
    }
}

impl Default for ClaimsDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimsDecoder {
    pub fn new() -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();

        Self {
            key: DecodingKey::from_secret(&[]),
            validation,
        }
    }

    pub fn decode<T>(&self, token: &str) -> Result<T, ClaimsError>
    where
        T: DeserializeOwned + Clone,
    {
        let data = jsonwebtoken::decode::<T>(token, &self.key, &self.validation)?;
        Ok(data.claims)
    }
}
