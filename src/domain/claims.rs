use serde::{Deserialize, Serialize};

/// Discriminator carried in the `type` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Claim set carried by every token this service signs.
///
/// Field order matters: serde_json serializes struct fields in declaration
/// order, and the payload segment is specified as `sub, iat, exp, jti, type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String, // Subject (principal ID)
    pub iat: i64,    // Issued at (unix seconds)
    pub exp: i64,    // Expiration time (unix seconds)
    pub jti: String, // Token ID (UUID v4, unique per issuance)
    #[serde(rename = "type")]
    pub token_type: TokenType,
}
