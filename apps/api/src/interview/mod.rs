// Interview station: candidate identity, question set, the session state
// machine, per-question timers, the fullscreen monitor and the orchestrator
// actor that ties them together.

pub mod error;
pub mod handlers;
pub mod identity;
pub mod integrity;
pub mod orchestrator;
pub mod questions;
pub mod session;
pub mod station;
pub mod timer;
