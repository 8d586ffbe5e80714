pub mod credential_store;
pub mod credential_store_err;
pub mod jwt_key_store;
pub mod revocation_store;
pub mod revocation_store_err;
pub mod rotation_record;
pub mod rotation_store;

pub use credential_store::*;
pub use credential_store_err::*;
pub use jwt_key_store::*;
pub use revocation_store::*;
pub use revocation_store_err::*;
pub use rotation_record::*;
pub use rotation_store::*;
