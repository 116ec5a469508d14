pub mod classify;
pub mod config;
pub mod discover;
pub mod error;
pub mod harness;
pub mod instance;
pub mod record;
pub mod report;
pub mod resolve;
pub mod runner;
pub mod utils;

/// Suffix of the per-instance log holding the captured solver output.
pub const LOG_SUFFIX: &str = ".log.txt";
/// Suffix of the model/proof file the solver writes by itself.
pub const OUTPUT_SUFFIX: &str = ".out";

#[macro_export]
macro_rules! regex {
    ($re:literal $(,)?) => {{
        static RE: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
        RE.get_or_init(|| regex::Regex::new($re).unwrap())
    }};
}
