use {
    serde::Serialize,
    std::{
        collections::BTreeMap,
        fmt,
        path::{Path, PathBuf},
        time::Duration,
    },
};

/// Final classification of one run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunOutcome {
    Satisfiable,
    Unsatisfiable,
    Unknown,
    Timeout,
    DecompressError,
    LaunchError,
}

impl RunOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunOutcome::Satisfiable => "SATISFIABLE",
            RunOutcome::Unsatisfiable => "UNSATISFIABLE",
            RunOutcome::Unknown => "UNKNOWN",
            RunOutcome::Timeout => "TIMEOUT",
            RunOutcome::DecompressError => "DECOMPRESS_ERROR",
            RunOutcome::LaunchError => "LAUNCH_ERROR",
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const CONFLICTS: &str = "conflicts";
pub const DECISIONS: &str = "decisions";
pub const PROPAGATIONS: &str = "propagations";
pub const CPU_TIME_SOLVER: &str = "cpu_time_solver";

/// Solver statistics as reported, kept verbatim as text.
/// A missing key means the solver never printed it, which is not the same as zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SolverMetrics(BTreeMap<String, String>);

impl SolverMetrics {
    pub fn new() -> SolverMetrics {
        SolverMetrics::default()
    }
    /// Later values replace earlier ones.
    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.0.insert(key.into(), value.into());
    }
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SolverMetrics {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut m = SolverMetrics::new();
        for (k, v) in iter {
            m.insert(k, v);
        }
        m
    }
}

/// Everything known about one instance after its run. Built once, never changed.
#[derive(Clone, Debug, PartialEq)]
pub struct RunRecord {
    instance: PathBuf,
    outcome: RunOutcome,
    elapsed_seconds: f64,
    metrics: SolverMetrics,
    timeout_seconds: u64,
    log_path: PathBuf,
    output_path: PathBuf,
}

impl RunRecord {
    pub fn new(
        instance: PathBuf,
        outcome: RunOutcome,
        elapsed: Duration,
        metrics: SolverMetrics,
        timeout_seconds: u64,
        log_path: PathBuf,
        output_path: PathBuf,
    ) -> RunRecord {
        RunRecord {
            instance,
            outcome,
            // microsecond resolution is plenty for wall-clock comparisons
            elapsed_seconds: (elapsed.as_secs_f64() * 1e6).round() / 1e6,
            metrics,
            timeout_seconds,
            log_path,
            output_path,
        }
    }
    pub fn instance(&self) -> &Path {
        &self.instance
    }
    pub fn outcome(&self) -> RunOutcome {
        self.outcome
    }
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }
    pub fn metrics(&self) -> &SolverMetrics {
        &self.metrics
    }
    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
    /// CPU time as printed by the solver, empty if it never said.
    pub fn cpu_time_solver(&self) -> &str {
        self.metrics.get(CPU_TIME_SOLVER).unwrap_or("")
    }
}
