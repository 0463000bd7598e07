//! Sequential batch driver: runs a list of (machine, input) jobs against one shared trace log.

use crate::loader::ProgramLoader;
use crate::machine::simulate;
use crate::programs::ProgramManager;
use crate::trace::{Tee, TraceEvent, TraceSink, TraceWriter};
use crate::types::{Machine, NtmError, SimulationOptions, Summary};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const BUILTIN_PREFIX: &str = "builtin:";

/// Where a job's machine definition comes from.
///
/// Serialized as a plain string: `builtin:<name>` selects an embedded machine, anything else is
/// a file path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MachineSource {
    Path(PathBuf),
    Builtin(String),
}

impl MachineSource {
    pub fn load(&self) -> Result<Machine, NtmError> {
        match self {
            MachineSource::Path(path) => ProgramLoader::load_machine(path),
            MachineSource::Builtin(name) => ProgramManager::get_program_by_name(name),
        }
    }
}

impl From<String> for MachineSource {
    fn from(source: String) -> Self {
        match source.strip_prefix(BUILTIN_PREFIX) {
            Some(name) => MachineSource::Builtin(name.to_string()),
            None => MachineSource::Path(PathBuf::from(source)),
        }
    }
}

impl From<&str> for MachineSource {
    fn from(source: &str) -> Self {
        source.to_string().into()
    }
}

impl From<MachineSource> for String {
    fn from(source: MachineSource) -> Self {
        source.to_string()
    }
}

impl fmt::Display for MachineSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MachineSource::Path(path) => write!(f, "{}", path.display()),
            MachineSource::Builtin(name) => write!(f, "{BUILTIN_PREFIX}{name}"),
        }
    }
}

/// One machine/input pair of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub machine: MachineSource,
    pub input: String,
}

impl Job {
    pub fn new(machine: impl Into<MachineSource>, input: impl Into<String>) -> Self {
        Self {
            machine: machine.into(),
            input: input.into(),
        }
    }
}

/// The outcome of one job: its summary, or the error that stopped its definition from loading.
pub type JobResult = Result<Summary, NtmError>;

/// An ordered list of jobs, run strictly one after another.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Batch {
    jobs: Vec<Job>,
}

impl Batch {
    pub fn new(jobs: Vec<Job>) -> Self {
        Self { jobs }
    }

    /// The built-in demonstration batch.
    pub fn builtin() -> Self {
        Self::new(vec![
            Job::new("builtin:abc_star", "abcabab"),
            Job::new("builtin:abc_star", "abc"),
            Job::new("builtin:a_plus", "y"),
            Job::new("builtin:a_plus", "aaaaa"),
        ])
    }

    /// Reads a JSON manifest: `[{"machine": "...", "input": "..."}, ...]`.
    pub fn from_manifest(path: &Path) -> Result<Self, NtmError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            NtmError::FileError(format!("Failed to read manifest {}: {}", path.display(), e))
        })?;
        Self::from_manifest_str(&content)
    }

    pub fn from_manifest_str(content: &str) -> Result<Self, NtmError> {
        serde_json::from_str(content).map_err(|e| NtmError::ManifestError(e.to_string()))
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// Runs every job into `sink`.
    ///
    /// A job whose definition fails to load is traced and reported in its slot; the batch goes
    /// on. Only a failing sink aborts the batch.
    pub fn run_with_sink<S: TraceSink + ?Sized>(
        &self,
        options: SimulationOptions,
        sink: &mut S,
    ) -> Result<Vec<JobResult>, NtmError> {
        let mut results = Vec::with_capacity(self.jobs.len());
        for job in &self.jobs {
            results.push(run_job(job, options, &mut *sink)?);
        }
        Ok(results)
    }

    /// Runs every job, writing the trace to `log`.
    ///
    /// The log is truncated once before the first job and only appended to afterwards. With
    /// `echo`, every trace line is also printed to stdout.
    pub fn run(
        &self,
        log: &Path,
        options: SimulationOptions,
        echo: bool,
    ) -> Result<Vec<JobResult>, NtmError> {
        File::create(log).map_err(|e| {
            NtmError::FileError(format!("Failed to create log {}: {}", log.display(), e))
        })?;
        info!(log = %log.display(), jobs = self.jobs.len(), "starting batch");

        let mut results = Vec::with_capacity(self.jobs.len());
        for job in &self.jobs {
            let file = OpenOptions::new().append(true).open(log).map_err(|e| {
                NtmError::FileError(format!("Failed to open log {}: {}", log.display(), e))
            })?;
            let mut writer = TraceWriter::new(BufWriter::new(file));

            let result = if echo {
                run_job(
                    job,
                    options,
                    &mut Tee(&mut writer, TraceWriter::new(io::stdout())),
                )?
            } else {
                run_job(job, options, &mut writer)?
            };
            results.push(result);
        }

        Ok(results)
    }
}

fn run_job<S: TraceSink + ?Sized>(
    job: &Job,
    options: SimulationOptions,
    sink: &mut S,
) -> Result<JobResult, NtmError> {
    sink.record(&TraceEvent::Source {
        source: job.machine.to_string(),
        input: job.input.clone(),
    })?;

    let result = match job.machine.load() {
        Ok(machine) => Ok(simulate(&machine, &job.input, options, sink)?),
        Err(e) => {
            warn!(source = %job.machine, error = %e, "failed to load machine");
            sink.record(&TraceEvent::LoadFailed(e.to_string()))?;
            Err(e)
        }
    };

    sink.record(&TraceEvent::EndOfRun)?;
    Ok(result)
}
