use uuid::Uuid;

/// Access + refresh pair handed back to the caller after issuance or
/// rotation. The token strings are opaque compact JWS.
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub subject: String,
    pub family_id: Uuid,
    pub access_token: String,
    pub refresh_token: String,
}
