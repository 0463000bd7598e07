//! This crate provides the core logic for a nondeterministic Turing machine simulator.
//! It includes modules for loading machine definitions, exploring every computation path
//! breadth-first, tracing each explored configuration, and running batches of machine/input pairs.

pub mod batch;
pub mod diagnostics;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod programs;
pub mod table;
pub mod tape;
pub mod trace;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the batch driver types.
pub use batch::{Batch, Job, JobResult, MachineSource};
/// Re-exports the configuration tree used for branching diagnostics.
pub use diagnostics::ConfigurationTree;
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the breadth-first simulation.
pub use machine::{simulate, Simulation};
/// Re-exports the `parse` function from the parser module.
pub use parser::parse;
/// Re-exports `ProgramInfo`, `ProgramManager`, and `PROGRAMS` from the programs module.
pub use programs::{ProgramInfo, ProgramManager, PROGRAMS};
/// Re-exports the transition table.
pub use table::{TransitionRow, TransitionTable};
/// Re-exports the trace events and sinks.
pub use trace::{Tee, TraceEvent, TraceSink, TraceWriter};
/// Re-exports the core types of the simulator.
pub use types::{
    Configuration, Direction, Machine, NtmError, Rejection, SimulationOptions, Step, Summary,
    Transition, Verdict, BLANK_SYMBOL,
};
