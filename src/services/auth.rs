use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Claims carried by access tokens issued by the platform's auth service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub exp: usize,
    #[serde(rename = "tokenType", default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

/// Validates HS256 bearer tokens; issuance happens elsewhere
pub struct JwtValidator {
    key: DecodingKey,
    validation: Validation,
}

impl JwtValidator {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Decode and verify an access token
    ///
    /// Refresh tokens are rejected.
    pub fn validate(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let claims = decode::<Claims>(token, &self.key, &self.validation)?.claims;

        if claims.token_type.as_deref() == Some("refresh") {
            return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
        }

        Ok(claims)
    }
}
