//! Run the solver on one instance under a wall-clock deadline.
use {
    crate::error::LaunchError,
    futures::future,
    log::{debug, error, warn},
    std::{
        path::{Path, PathBuf},
        process::Stdio,
        sync::{Arc, Mutex},
        time::{Duration, Instant},
    },
    tokio::{
        io::{AsyncRead, AsyncReadExt},
        process::Command,
        task::JoinHandle,
        time,
    },
};

/// How long the pipe readers may keep going once the solver itself is gone.
pub const DRAIN_GRACE: Duration = Duration::from_millis(200);

/// What a single solver invocation left behind.
#[derive(Clone, Debug, Default)]
pub struct Execution {
    pub stdout: String,
    pub stderr: String,
    /// `None` when killed by a signal, including our own timeout kill
    pub exit_code: Option<i32>,
    pub elapsed: Duration,
    pub timed_out: bool,
}

impl Execution {
    /// stdout, then stderr, separated by a newline
    pub fn combined(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// The solver executable with its fixed flags.
#[derive(Clone, Debug)]
pub struct SolverCommand {
    program: PathBuf,
    flags: Vec<String>,
}

impl SolverCommand {
    pub fn new<P: Into<PathBuf>>(program: P) -> SolverCommand {
        SolverCommand {
            program: program.into(),
            flags: Vec::new(),
        }
    }
    /// Append whitespace-separated flags. A leading backslash is dropped so that
    /// `"\-verb=1"` survives shells and argument parsers.
    pub fn with_options(mut self, options: &str) -> SolverCommand {
        for opt in options.split_whitespace() {
            self.flags.push(opt[opt.starts_with('\\') as usize..].to_string());
        }
        self
    }
    pub fn program(&self) -> &Path {
        &self.program
    }
    pub fn flags(&self) -> &[String] {
        &self.flags
    }
    /// `program flags... instance output`
    pub fn command(&self, instance: &Path, output: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.flags).arg(instance).arg(output);
        command
    }

    /// Run to completion or until `limit` elapses, whichever comes first.
    /// Output produced before a forced kill is still returned.
    pub async fn run(
        &self,
        instance: &Path,
        output: &Path,
        limit: Duration,
    ) -> Result<Execution, LaunchError> {
        let mut command = self.command(instance, output);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        // the solver leads its own group so that its descendants die with it
        #[cfg(unix)]
        command.process_group(0);
        debug!("spawn {:?}", command.as_std());
        let start = Instant::now();
        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                error!("failed to launch {}: {}", self.program.display(), e);
                return Err(LaunchError {
                    program: self.program.clone(),
                    source: e,
                });
            }
        };
        let group = child.id();
        let (stdout, stdout_reader) = drain(child.stdout.take());
        let (stderr, stderr_reader) = drain(child.stderr.take());
        let waited = time::timeout(limit, child.wait()).await;
        let (exit_code, timed_out) = match waited {
            Ok(Ok(status)) => (status.code(), false),
            Ok(Err(e)) => {
                warn!("lost track of {}: {}", self.program.display(), e);
                (None, false)
            }
            Err(_) => {
                warn!(
                    "{} exceeded {}s on {}, killing",
                    self.program.display(),
                    limit.as_secs(),
                    instance.display()
                );
                if let Err(e) = child.kill().await {
                    warn!("failed to kill {}: {}", self.program.display(), e);
                }
                (None, true)
            }
        };
        let elapsed = start.elapsed();
        // descendants must not outlive the run, whether it timed out or not
        kill_group(group);
        let readers = [stdout_reader.abort_handle(), stderr_reader.abort_handle()];
        let both = future::join(stdout_reader, stderr_reader);
        if time::timeout(DRAIN_GRACE, both).await.is_err() {
            debug!("gave up draining pipes of {}", instance.display());
        }
        for reader in readers {
            reader.abort();
        }
        Ok(Execution {
            stdout: take(&stdout),
            stderr: take(&stderr),
            exit_code,
            elapsed,
            timed_out,
        })
    }
}

/// SIGKILL every process in the group led by the solver. A group that is
/// already gone is not an error.
#[cfg(unix)]
fn kill_group(group: Option<u32>) {
    use nix::{
        errno::Errno,
        sys::signal::{Signal, killpg},
        unistd::Pid,
    };

    let Some(pid) = group else {
        return;
    };
    match killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
        Ok(()) | Err(Errno::ESRCH) => (),
        Err(e) => warn!("failed to kill process group {}: {}", pid, e),
    }
}

#[cfg(not(unix))]
fn kill_group(_: Option<u32>) {}

type Captured = Arc<Mutex<Vec<u8>>>;

/// Copy a pipe into a shared buffer as bytes arrive, so a partial read is
/// visible even if the reader never reaches EOF.
fn drain<R>(pipe: Option<R>) -> (Captured, JoinHandle<()>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let buffer: Captured = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&buffer);
    let reader = tokio::spawn(async move {
        let Some(mut pipe) = pipe else {
            return;
        };
        let mut chunk = [0u8; 8192];
        loop {
            match pipe.read(&mut chunk).await {
                Ok(0) | Err(_) => return,
                Ok(n) => {
                    if let Ok(mut buf) = sink.lock() {
                        buf.extend_from_slice(&chunk[..n]);
                    }
                }
            }
        }
    });
    (buffer, reader)
}

fn take(captured: &Captured) -> String {
    captured
        .lock()
        .map(|buf| String::from_utf8_lossy(&buf).into_owned())
        .unwrap_or_default()
}
