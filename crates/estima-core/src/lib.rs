//! estima-core: the estimate-sheet data model and its derived views.
//!
//! The sheet (stages × roles → hours, with rates, risk coefficients, and a
//! user-edit tracker) is plain single-owner mutable state; [`totals`] is a
//! pure recomputation over it, and [`reconcile`] seeds it once per workflow
//! instance from server suggestions.

pub mod config;
pub mod error;
pub mod matching;
pub mod model;
pub mod money;
pub mod reconcile;
pub mod session;
pub mod sheet;
pub mod totals;

pub use error::ErrorCode;
pub use money::{Money, Risk};
pub use reconcile::SuggestedEstimate;
pub use session::{Session, WorkflowStatus};
pub use sheet::EstimateSheet;
pub use totals::Totals;
