pub mod hashmap_credential_store;
pub mod hashmap_revocation_store;
pub mod hashmap_rotation_store;

pub use hashmap_credential_store::*;
pub use hashmap_revocation_store::*;
pub use hashmap_rotation_store::*;
