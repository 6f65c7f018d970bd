pub mod error;
pub mod types;

pub use error::CardError;
pub use types::{CardContext, CardRecord};
