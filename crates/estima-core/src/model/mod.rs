//! Leaf data structures of the estimate sheet.

pub mod role;
pub mod stage;

pub use role::{RateTable, Role};
pub use stage::StageList;
