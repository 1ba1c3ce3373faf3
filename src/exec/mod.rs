// src/exec/mod.rs

//! Playbook execution layer.
//!
//! - [`engine`] defines the `AutomationEngine` trait, its request/event types
//!   and the no-op engine.
//! - [`process`] implements the engine on top of `tokio::process::Command`.
//! - [`job_runner`] runs an engine in the background and hands the output to
//!   exactly one consumer as a `JobStream`.

pub mod engine;
pub mod job_runner;
pub mod process;

pub use engine::{
    AutomationEngine, EngineEvent, EngineExit, EngineFuture, EngineRequest, NoopEngine,
    engine_from_config,
};
pub use job_runner::{JobEvent, JobOutcome, JobRunner, JobStream};
pub use process::ProcessEngine;
