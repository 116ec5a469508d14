use {
    anyhow::{Context, Result},
    clap::Parser,
    std::path::PathBuf,
};

/// Configuration built from command line options
#[derive(Clone, Debug, Parser)]
#[command(
    name = "cnf-bench",
    version,
    about = "Run a SAT solver over a set of CNF instances (raw, .xz or .gz)"
)]
pub struct Config {
    /// CNF files or directories to search
    #[arg(long = "bench", short = 'b', required = true, num_args = 1..)]
    pub bench: Vec<PathBuf>,
    /// time out in seconds per instance
    #[arg(long = "timeout", short = 't', default_value = "5000",
          value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,
    /// solver name (looked up in PATH) or path
    #[arg(long = "solver", short = 's', default_value = "minisat")]
    pub solver: String,
    /// arguments passed to the solver; a leading '\' is dropped from each
    #[arg(long = "options", short = 'O', default_value = "-verb=2", allow_hyphen_values = true)]
    pub solver_options: String,
    /// directory for logs, solver outputs and reports
    #[arg(long = "outdir", short = 'o', default_value = "results_minisat")]
    pub outdir: PathBuf,
    /// where decompressed instances go [default: <outdir>/scratch]
    #[arg(long = "scratch-dir")]
    pub scratch_dir: Option<PathBuf>,
    /// disable the transient progress line
    #[arg(long = "no-report", short = 'Q')]
    pub no_report: bool,
}

impl Config {
    /// Absolute path of the solver executable.
    pub fn solver_path(&self) -> Result<PathBuf> {
        which::which(&self.solver).with_context(|| {
            format!(
                "solver '{}' not found; install it or pass its path with --solver",
                self.solver
            )
        })
    }
    pub fn scratch_dir(&self) -> PathBuf {
        self.scratch_dir
            .clone()
            .unwrap_or_else(|| self.outdir.join("scratch"))
    }
}
