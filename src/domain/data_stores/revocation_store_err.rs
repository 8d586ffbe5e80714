#[derive(Debug, PartialEq, Eq)]
pub enum RevocationStoreErr {
    Unavailable,
}
