//! Turn captured solver text into a verdict and a set of statistics.
//!
//! Everything here is a pure function of its input.
use crate::{
    regex,
    record::{CPU_TIME_SOLVER, RunOutcome, SolverMetrics},
};

/// Classify combined output. A `forced` outcome (timeout, decompression failure)
/// wins over anything found in the text, but metrics are still collected.
pub fn classify(text: &str, forced: Option<RunOutcome>) -> (RunOutcome, SolverMetrics) {
    match forced {
        // nothing ran, so there is nothing worth reading
        Some(RunOutcome::DecompressError) => (RunOutcome::DecompressError, SolverMetrics::new()),
        Some(outcome) => (outcome, parse_metrics(text)),
        None => (verdict(text), parse_metrics(text)),
    }
}

/// `UNSATISFIABLE` is checked first so it wins if both somehow appear.
pub fn verdict(text: &str) -> RunOutcome {
    if regex!(r"\bUNSATISFIABLE\b").is_match(text) {
        RunOutcome::Unsatisfiable
    } else if regex!(r"\bSATISFIABLE\b").is_match(text) {
        RunOutcome::Satisfiable
    } else {
        RunOutcome::Unknown
    }
}

pub fn parse_metrics(text: &str) -> SolverMetrics {
    let number = regex!(r"[0-9]+(?:\.[0-9]+)?");
    let counter = regex!(r"^(conflicts|decisions|propagations)\s*:\s*([0-9]+)");
    let mut metrics = SolverMetrics::new();
    for line in text.lines() {
        if line.contains("CPU time") {
            if let Some(m) = number.find(line) {
                metrics.insert(CPU_TIME_SOLVER, m.as_str());
            }
        } else if let Some(c) = counter.captures(line.trim_start()) {
            metrics.insert(&c[1], &c[2]);
        }
    }
    metrics
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::record::{CONFLICTS, DECISIONS, PROPAGATIONS},
        pretty_assertions::assert_eq,
    };

    const MINISAT: &str = "\
============================[ Problem Statistics ]=============================
|  Number of variables:           250                                         |
|  Number of clauses:            1065                                         |
===============================================================================
restarts              : 12
conflicts             : 10439          (43312 /sec)
decisions             : 12073          (0.00 % random) (50095 /sec)
propagations          : 2632214        (10921635 /sec)
conflict literals     : 191026         (27.71 % deleted)
Memory used           : 8.00 MB
CPU time              : 0.241 s

UNSATISFIABLE
";

    #[test]
    fn minisat_transcript() {
        let (outcome, metrics) = classify(MINISAT, None);
        assert_eq!(outcome, RunOutcome::Unsatisfiable);
        let expected: SolverMetrics = [
            (CONFLICTS, "10439"),
            (DECISIONS, "12073"),
            (PROPAGATIONS, "2632214"),
            (CPU_TIME_SOLVER, "0.241"),
        ]
        .into_iter()
        .collect();
        assert_eq!(metrics, expected);
    }

    #[test]
    fn satisfiable_with_conflicts() {
        let (outcome, metrics) = classify("SATISFIABLE\nconflicts: 42\n", None);
        assert_eq!(outcome, RunOutcome::Satisfiable);
        assert_eq!(metrics, [(CONFLICTS, "42")].into_iter().collect());
    }

    #[test]
    fn unsat_takes_precedence() {
        assert_eq!(verdict("SATISFIABLE\nUNSATISFIABLE\n"), RunOutcome::Unsatisfiable);
        assert_eq!(verdict("s UNSATISFIABLE"), RunOutcome::Unsatisfiable);
        assert_eq!(verdict("INDETERMINATE"), RunOutcome::Unknown);
        assert_eq!(verdict(""), RunOutcome::Unknown);
    }

    #[test]
    fn last_duplicate_wins() {
        let m = parse_metrics("conflicts: 1\nconflicts: 2\n  conflicts : 3\n");
        assert_eq!(m.get(CONFLICTS), Some("3"));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn metric_names_are_anchored_and_case_sensitive() {
        let m = parse_metrics("c conflicts: 5\nConflicts: 6\nconflicts: x\n");
        assert!(m.is_empty());
    }

    #[test]
    fn cpu_time_takes_first_number() {
        let m = parse_metrics("c CPU time              : 12.5 s (3 threads)\n");
        assert_eq!(m.get(CPU_TIME_SOLVER), Some("12.5"));
        let m = parse_metrics("CPU time : 7 s\n");
        assert_eq!(m.get(CPU_TIME_SOLVER), Some("7"));
        let m = parse_metrics("[2] CPU time : 0.5 s\n");
        assert_eq!(m.get(CPU_TIME_SOLVER), Some("2"));
        let m = parse_metrics("CPU time : n/a\n");
        assert_eq!(m.get(CPU_TIME_SOLVER), None);
    }

    #[test]
    fn forced_outcome_keeps_metrics() {
        let (outcome, metrics) = classify("SATISFIABLE\ndecisions: 9\n", Some(RunOutcome::Timeout));
        assert_eq!(outcome, RunOutcome::Timeout);
        assert_eq!(metrics.get(DECISIONS), Some("9"));
        let (outcome, metrics) = classify("conflicts: 1", Some(RunOutcome::DecompressError));
        assert_eq!(outcome, RunOutcome::DecompressError);
        assert!(metrics.is_empty());
    }

    #[test]
    fn garbage_is_unknown() {
        let (outcome, metrics) = classify("\u{fffd}\u{0}::: : :\n\n", None);
        assert_eq!(outcome, RunOutcome::Unknown);
        assert!(metrics.is_empty());
    }

    #[test]
    fn idempotent() {
        assert_eq!(classify(MINISAT, None), classify(MINISAT, None));
    }
}
