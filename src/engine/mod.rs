// src/engine/mod.rs

//! Orchestration engine for autobuild.
//!
//! - [`core`]: pure poll-loop state machine (baseline snapshot, states,
//!   commands).
//! - [`runtime`]: async shell that drives the core: timers, snapshots,
//!   builds, output.
//! - [`pipeline`]: build → report/publish chain.
//! - [`once`]: the one-shot runner.
//! - [`shutdown`]: cancellation signal shared by the loops.

pub mod core;
pub mod once;
pub mod pipeline;
pub mod runtime;
pub mod shutdown;

pub use self::core::{CoreCommand, PollCore, PollState};
pub use once::run_once;
pub use pipeline::BuildPipeline;
pub use runtime::{PollLoop, TickOutcome};
pub use shutdown::{shutdown_channel, ShutdownHandle, ShutdownSignal};
