#[derive(Debug, PartialEq, Eq)]
pub enum CredentialStoreErr {
    Unavailable,
}
