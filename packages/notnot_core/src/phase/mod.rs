//! Game phase graph.
//!
//! Only the phase bookkeeping lives here; the work each phase performs is done
//! by [`GameController`](crate::controller::GameController).

pub mod engine;
pub mod events;
mod machine;
pub mod types;

pub use engine::{PhaseApplyResult, PhaseApplyStatus, PhaseEngine};
pub use events::PhaseCommand;
pub use types::{GamePhase, PhaseSnapshot, TutorialPhase};
