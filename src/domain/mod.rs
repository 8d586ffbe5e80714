pub mod claims;
pub mod data_stores;
pub mod issued_tokens;
pub mod subject;

pub use claims::*;
pub use data_stores::*;
pub use issued_tokens::*;
pub use subject::*;
