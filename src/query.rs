//! Query assembly from rendered expression fragments.

pub mod dataset;
pub mod entity;
pub mod join;
pub mod selection;
pub mod statement;

pub use dataset::Dataset;
pub use entity::Entity;
pub use join::{Join, JoinKind, JoinTarget};
pub use selection::Selection;
pub use statement::Query;
