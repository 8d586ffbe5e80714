pub mod credential_verifier;
pub mod data_stores;
pub mod refresh_coordinator;
pub mod token_service;
pub mod token_signer;
pub mod token_validator;

pub use credential_verifier::*;
pub use data_stores::*;
pub use refresh_coordinator::*;
pub use token_service::*;
pub use token_signer::*;
pub use token_validator::*;
