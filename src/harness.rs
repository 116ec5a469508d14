//! One record per instance, one instance at a time.
use {
    crate::{
        LOG_SUFFIX, OUTPUT_SUFFIX,
        classify::classify,
        instance::{BenchmarkInstance, distinct_names},
        record::{RunOutcome, RunRecord, SolverMetrics},
        resolve::resolve,
        runner::SolverCommand,
    },
    log::{error, info, warn},
    std::{
        fs,
        io::{Write, stdout},
        path::{Path, PathBuf},
        time::{Duration, Instant},
    },
};

/// Appended to the log of a run that was killed at the deadline.
pub const TIMEOUT_MARKER: &str = "\n\n--- PROCESS TERMINATED (TIMEOUT) ---";
pub const CLEAR: &str = "\x1B[1G\x1B[0K";

#[derive(Clone, Debug)]
pub struct Harness {
    solver: SolverCommand,
    timeout: u64,
    outdir: PathBuf,
    scratch_dir: PathBuf,
    progress: bool,
}

impl Harness {
    /// `timeout` is in seconds and must be positive.
    pub fn new<P: Into<PathBuf>>(solver: SolverCommand, timeout: u64, outdir: P) -> Harness {
        let outdir = outdir.into();
        Harness {
            solver,
            timeout,
            scratch_dir: outdir.join("scratch"),
            outdir,
            progress: false,
        }
    }
    pub fn with_scratch_dir<P: Into<PathBuf>>(mut self, dir: P) -> Harness {
        self.scratch_dir = dir.into();
        self
    }
    /// show a transient "Running on ..." line while each instance runs
    pub fn with_progress(mut self, progress: bool) -> Harness {
        self.progress = progress;
        self
    }
    pub fn solver(&self) -> &SolverCommand {
        &self.solver
    }
    pub fn timeout(&self) -> u64 {
        self.timeout
    }
    pub fn outdir(&self) -> &Path {
        &self.outdir
    }
    pub fn log_path(&self, instance: &BenchmarkInstance) -> PathBuf {
        self.outdir.join(format!("{}{}", instance.name(), LOG_SUFFIX))
    }
    pub fn output_path(&self, instance: &BenchmarkInstance) -> PathBuf {
        self.outdir.join(format!("{}{}", instance.name(), OUTPUT_SUFFIX))
    }

    /// Resolve, run, classify and log one instance.
    /// Every failure ends up in the outcome; nothing escapes to the caller.
    pub async fn run_instance(&self, instance: &BenchmarkInstance) -> RunRecord {
        let start = Instant::now();
        let log_path = self.log_path(instance);
        let output_path = self.output_path(instance);
        let resolved = match resolve(instance, &self.scratch_dir) {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!("{}", e);
                let elapsed = start.elapsed();
                self.write_log(&log_path, &e.to_string());
                let (outcome, metrics) = classify("", Some(RunOutcome::DecompressError));
                return self.record(instance, outcome, elapsed, metrics, log_path, output_path);
            }
        };
        let limit = Duration::from_secs(self.timeout);
        let (outcome, metrics, elapsed) = match self
            .solver
            .run(resolved.path(), &output_path, limit)
            .await
        {
            Ok(execution) => {
                let mut text = execution.combined();
                let forced = execution.timed_out.then_some(RunOutcome::Timeout);
                let (outcome, metrics) = classify(&text, forced);
                if execution.timed_out {
                    text.push_str(TIMEOUT_MARKER);
                }
                self.write_log(&log_path, &text);
                (outcome, metrics, execution.elapsed)
            }
            Err(e) => {
                let elapsed = start.elapsed();
                self.write_log(&log_path, &e.to_string());
                (RunOutcome::LaunchError, SolverMetrics::new(), elapsed)
            }
        };
        drop(resolved);
        self.record(instance, outcome, elapsed, metrics, log_path, output_path)
    }

    /// Run every instance in order, printing a status line as each one finishes.
    /// Instances sharing a name are renamed first so no two runs share a file.
    pub async fn run_all(&self, instances: &[BenchmarkInstance]) -> Vec<RunRecord> {
        info!(
            "running {} on {} instances, timeout {}s",
            self.solver.program().display(),
            instances.len(),
            self.timeout
        );
        let mut records = Vec::with_capacity(instances.len());
        for instance in &distinct_names(instances) {
            let name = file_name(instance.path());
            if self.progress {
                print!("{}\x1B[032mRunning on {}...\x1B[000m", CLEAR, name);
                let _ = stdout().flush();
            }
            let record = self.run_instance(instance).await;
            println!(
                "{}-> {} ... {} ({:.2}s)",
                if self.progress { CLEAR } else { "" },
                name,
                record.outcome(),
                record.elapsed_seconds()
            );
            records.push(record);
        }
        info!("finished {} instances", records.len());
        records
    }

    fn record(
        &self,
        instance: &BenchmarkInstance,
        outcome: RunOutcome,
        elapsed: Duration,
        metrics: SolverMetrics,
        log_path: PathBuf,
        output_path: PathBuf,
    ) -> RunRecord {
        RunRecord::new(
            instance.path().to_path_buf(),
            outcome,
            elapsed,
            metrics,
            self.timeout,
            log_path,
            output_path,
        )
    }

    fn write_log(&self, path: &Path, text: &str) {
        if let Err(e) = fs::write(path, text) {
            error!("failed to write log {}: {}", path.display(), e);
        }
    }
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
