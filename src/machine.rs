//! This module defines the `Simulation` struct, which explores every computation path of a
//! nondeterministic Turing machine breadth-first, one level per step, until the input is
//! accepted, every branch dies, or the depth bound is hit.

use crate::diagnostics::ConfigurationTree;
use crate::tape;
use crate::trace::{TraceEvent, TraceSink};
use crate::types::{
    Configuration, Machine, NtmError, Rejection, SimulationOptions, Step, Summary, Verdict,
};
use std::collections::HashSet;
use tracing::{debug, info};

/// A single breadth-first run of a machine over one input.
///
/// All run state (the tree, the visited set, the counter) lives here and is dropped with the
/// run, so two simulations never share anything but the immutable machine.
pub struct Simulation<'a> {
    machine: &'a Machine,
    options: SimulationOptions,
    input: String,
    tree: ConfigurationTree,
    visited: HashSet<Configuration>,
    transitions: usize,
    depth: usize,
    verdict: Option<Verdict>,
}

impl<'a> Simulation<'a> {
    /// Creates a simulation of `machine` on `input`, ready at depth 0.
    ///
    /// Empty (or whitespace-only) input is rejected up front and never explored.
    pub fn new(machine: &'a Machine, input: &str, options: SimulationOptions) -> Self {
        let (tree, verdict) = Self::initial(machine, input);

        Self {
            machine,
            options,
            input: input.to_string(),
            tree,
            visited: HashSet::new(),
            transitions: 0,
            depth: 0,
            verdict,
        }
    }

    fn initial(machine: &Machine, input: &str) -> (ConfigurationTree, Option<Verdict>) {
        if input.trim().is_empty() {
            (
                ConfigurationTree::default(),
                Some(Verdict::Rejected(Rejection::EmptyInput)),
            )
        } else {
            (
                ConfigurationTree::new(Configuration::initial(&machine.start_state, input)),
                None,
            )
        }
    }

    /// Expands the current frontier by one level.
    ///
    /// Every configuration in the frontier is traced and counted, even ones already visited.
    /// Unvisited ones are marked and then either accept, die in the reject state, or contribute
    /// their unvisited successors to the next level.
    pub fn step<S: TraceSink + ?Sized>(&mut self, sink: &mut S) -> Result<Step, NtmError> {
        if let Some(verdict) = self.verdict {
            return Ok(Step::Halt(verdict));
        }

        if self.depth >= self.options.max_depth {
            return Ok(self.halt(Verdict::DepthExceeded));
        }

        let machine = self.machine;
        let blank = machine.blank;

        sink.record(&TraceEvent::Depth(self.depth))?;
        debug!(
            depth = self.depth,
            frontier = self.tree.frontier().len(),
            "expanding level"
        );

        let mut next = Vec::new();
        let mut accepting = None;

        for config in self.tree.frontier() {
            self.transitions += 1;
            sink.record(&TraceEvent::Configuration(config.clone()))?;

            if !self.visited.insert(config.clone()) {
                continue;
            }

            if config.state == machine.accept_state && config.is_tape_exhausted(blank) {
                accepting = Some(config.clone());
                break;
            }

            if config.state == machine.reject_state {
                sink.record(&TraceEvent::RejectState(config.state.clone()))?;
                continue;
            }

            let symbol = config.head_symbol(blank);
            for transition in machine.transitions.lookup(&config.state, symbol) {
                let successor = tape::apply(config, transition, blank);
                if !self.visited.contains(&successor) {
                    next.push(successor);
                }
            }
        }

        self.depth += 1;

        if let Some(config) = accepting {
            self.tree.push_level(vec![config]);
            return Ok(self.halt(Verdict::Accepted));
        }

        if next.is_empty() {
            return Ok(self.halt(Verdict::Rejected(Rejection::DeadFrontier)));
        }

        self.tree.push_level(next);
        Ok(Step::Continue)
    }

    /// Steps until a verdict is reached, then records the summary.
    pub fn run<S: TraceSink + ?Sized>(&mut self, sink: &mut S) -> Result<Summary, NtmError> {
        sink.record(&TraceEvent::Start {
            machine: self.machine.name.clone(),
            input: self.input.clone(),
        })?;

        if self.verdict == Some(Verdict::Rejected(Rejection::EmptyInput)) {
            sink.record(&TraceEvent::EmptyInput)?;
        }

        let verdict = loop {
            if let Step::Halt(verdict) = self.step(sink)? {
                break verdict;
            }
        };

        let summary = self.summary(verdict);
        info!(
            machine = %self.machine.name,
            input = %self.input,
            verdict = %summary.verdict,
            depth = summary.depth,
            transitions = summary.transitions,
            "run halted"
        );
        sink.record(&TraceEvent::Halted(summary.clone()))?;

        Ok(summary)
    }

    /// Restores the simulation to its initial configuration, discarding all run state.
    pub fn reset(&mut self) {
        let (tree, verdict) = Self::initial(self.machine, &self.input);
        self.tree = tree;
        self.verdict = verdict;
        self.visited.clear();
        self.transitions = 0;
        self.depth = 0;
    }

    fn halt(&mut self, verdict: Verdict) -> Step {
        self.verdict = Some(verdict);
        Step::Halt(verdict)
    }

    fn summary(&self, verdict: Verdict) -> Summary {
        Summary {
            verdict,
            depth: self.depth,
            transitions: self.transitions,
            nondeterminism: self.tree.nondeterminism_degree(),
        }
    }

    /// The terminal verdict, once reached.
    pub fn verdict(&self) -> Option<Verdict> {
        self.verdict
    }

    /// Number of levels fully expanded so far.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Configurations inspected so far, revisits included.
    pub fn transitions(&self) -> usize {
        self.transitions
    }

    /// Number of distinct configurations expanded so far.
    pub fn visited(&self) -> usize {
        self.visited.len()
    }

    pub fn tree(&self) -> &ConfigurationTree {
        &self.tree
    }
}

/// Runs `machine` on `input` to completion, tracing into `sink`.
pub fn simulate<S: TraceSink + ?Sized>(
    machine: &Machine,
    input: &str,
    options: SimulationOptions,
    sink: &mut S,
) -> Result<Summary, NtmError> {
    Simulation::new(machine, input, options).run(sink)
}
