pub mod document;
pub mod error;
pub mod expression;
pub mod query;

pub use error::{SporkError, SporkResult};
