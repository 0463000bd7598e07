//! This module defines the trace events a simulation run emits and the sinks that consume them.
//!
//! Runs never touch the filesystem themselves: the caller hands each run a [`TraceSink`], and
//! [`TraceWriter`] turns events into the line-oriented log format.

use crate::types::{Configuration, NtmError, Summary, Verdict};
use std::io::Write;

/// A single step of the human-readable trace, in emission order.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceEvent {
    /// Which definition is being processed. Emitted by drivers, not by the engine.
    Source { source: String, input: String },
    /// The run has started.
    Start { machine: String, input: String },
    /// The input was empty, so the explorer was never entered.
    EmptyInput,
    /// A new breadth-first level is about to be inspected.
    Depth(usize),
    /// A configuration of the current level was inspected.
    Configuration(Configuration),
    /// A branch reached the reject state and died.
    RejectState(String),
    /// The run halted.
    Halted(Summary),
    /// A definition could not be loaded. Emitted by drivers.
    LoadFailed(String),
    /// Separates consecutive runs in a shared log.
    EndOfRun,
}

/// Receives trace events from a run.
pub trait TraceSink {
    fn record(&mut self, event: &TraceEvent) -> Result<(), NtmError>;
}

impl<S: TraceSink + ?Sized> TraceSink for &mut S {
    fn record(&mut self, event: &TraceEvent) -> Result<(), NtmError> {
        (**self).record(event)
    }
}

/// Collects events in memory.
impl TraceSink for Vec<TraceEvent> {
    fn record(&mut self, event: &TraceEvent) -> Result<(), NtmError> {
        self.push(event.clone());
        Ok(())
    }
}

/// Forwards every event to two sinks, first `A` then `B`.
pub struct Tee<A, B>(pub A, pub B);

impl<A: TraceSink, B: TraceSink> TraceSink for Tee<A, B> {
    fn record(&mut self, event: &TraceEvent) -> Result<(), NtmError> {
        self.0.record(event)?;
        self.1.record(event)
    }
}

/// Formats events as trace lines and writes them to `W`.
pub struct TraceWriter<W: Write> {
    writer: W,
}

impl<W: Write> TraceWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TraceSink for TraceWriter<W> {
    fn record(&mut self, event: &TraceEvent) -> Result<(), NtmError> {
        for line in format_event(event) {
            writeln!(self.writer, "{line}").map_err(|e| NtmError::TraceError(e.to_string()))?;
        }
        self.writer
            .flush()
            .map_err(|e| NtmError::TraceError(e.to_string()))
    }
}

/// Renders an event as the lines it contributes to the log.
pub fn format_event(event: &TraceEvent) -> Vec<String> {
    match event {
        TraceEvent::Source { source, input } => {
            vec![format!("{source} is being processed with input: {input}")]
        }
        TraceEvent::Start { machine, input } => vec![
            format!("machine being used is, {machine}"),
            format!("input string is, {input}"),
        ],
        TraceEvent::EmptyInput => {
            vec!["string rejected, input is empty, does not satisfy language".to_string()]
        }
        TraceEvent::Depth(depth) => vec![String::new(), format!("depth {depth}:")],
        TraceEvent::Configuration(config) => vec![config.to_string()],
        TraceEvent::RejectState(state) => vec![format!("string rejected at state, {state}.")],
        TraceEvent::Halted(summary) => format_summary(summary),
        TraceEvent::LoadFailed(message) => vec![format!("error: {message}")],
        TraceEvent::EndOfRun => vec![String::new(), String::new()],
    }
}

/// Statistics lines of a halted run. A depth-exhausted run announces the stop before its
/// statistics; accepted and rejected runs state their verdict last.
fn format_summary(summary: &Summary) -> Vec<String> {
    let mut lines = vec![
        format!("depth of config tree: {}", summary.depth),
        format!("total transitions simulated: {}", summary.transitions),
        format!("degree of ndm: {:.2}", summary.nondeterminism),
    ];

    match summary.verdict {
        Verdict::Accepted => {
            lines.push(format!("string accepted in {} transitions", summary.depth))
        }
        Verdict::Rejected(_) => lines.push("string rejected.".to_string()),
        Verdict::DepthExceeded => lines.insert(0, summary.verdict.to_string()),
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rejection;

    fn summary(verdict: Verdict) -> Summary {
        Summary {
            verdict,
            depth: 4,
            transitions: 9,
            nondeterminism: 10.0 / 6.0,
        }
    }

    #[test]
    fn test_configuration_line() {
        let lines = format_event(&TraceEvent::Configuration(Configuration::new(
            "ab", "q1", "c",
        )));
        assert_eq!(lines, vec!["[ab] (q1) [c]"]);
    }

    #[test]
    fn test_summary_lines() {
        let lines = format_event(&TraceEvent::Halted(summary(Verdict::Accepted)));
        assert_eq!(
            lines,
            vec![
                "depth of config tree: 4",
                "total transitions simulated: 9",
                "degree of ndm: 1.67",
                "string accepted in 4 transitions",
            ]
        );

        let lines = format_event(&TraceEvent::Halted(summary(Verdict::Rejected(
            Rejection::DeadFrontier,
        ))));
        assert_eq!(lines[3], "string rejected.");

        let lines = format_event(&TraceEvent::Halted(summary(Verdict::DepthExceeded)));
        assert_eq!(
            lines,
            vec![
                "execution stopped, hit max depth",
                "depth of config tree: 4",
                "total transitions simulated: 9",
                "degree of ndm: 1.67",
            ]
        );
    }

    #[test]
    fn test_writer_output() {
        let mut writer = TraceWriter::new(Vec::<u8>::new());
        writer
            .record(&TraceEvent::Start {
                machine: "a plus".to_string(),
                input: "aa".to_string(),
            })
            .unwrap();
        writer.record(&TraceEvent::Depth(0)).unwrap();

        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(
            text,
            "machine being used is, a plus\ninput string is, aa\n\ndepth 0:\n"
        );
    }

    #[test]
    fn test_tee_forwards_to_both() {
        let mut first: Vec<TraceEvent> = Vec::new();
        let mut second: Vec<TraceEvent> = Vec::new();
        {
            let mut tee = Tee(&mut first, &mut second);
            tee.record(&TraceEvent::EmptyInput).unwrap();
        }
        assert_eq!(first, vec![TraceEvent::EmptyInput]);
        assert_eq!(second, vec![TraceEvent::EmptyInput]);
    }
}
