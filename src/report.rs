//! Dump the collected records as JSON, CSV and a markdown summary.
use {
    crate::{
        harness::file_name,
        record::{RunOutcome, RunRecord, SolverMetrics},
    },
    anyhow::{Context, Result},
    serde::Serialize,
    std::{
        collections::BTreeMap,
        fs::File,
        io::{self, BufWriter, Write},
        path::Path,
    },
    tabled::{Table, Tabled, settings::Style},
};

pub const JSON_FILE: &str = "results.json";
pub const CSV_FILE: &str = "results.csv";
pub const SUMMARY_FILE: &str = "SUMMARY.md";

const CSV_HEADER: &str = "benchmark,status,time_seconds,cpu_time_solver,timeout_seconds";

#[derive(Serialize)]
struct JsonRecord<'a> {
    benchmark: &'a Path,
    status: RunOutcome,
    time_seconds: f64,
    cpu_time_solver: &'a str,
    stats: &'a SolverMetrics,
    timeout_seconds: u64,
    log_path: &'a Path,
    output_file: &'a Path,
}

impl<'a> From<&'a RunRecord> for JsonRecord<'a> {
    fn from(r: &'a RunRecord) -> Self {
        JsonRecord {
            benchmark: r.instance(),
            status: r.outcome(),
            time_seconds: r.elapsed_seconds(),
            cpu_time_solver: r.cpu_time_solver(),
            stats: r.metrics(),
            timeout_seconds: r.timeout_seconds(),
            log_path: r.log_path(),
            output_file: r.output_path(),
        }
    }
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Benchmark")]
    benchmark: String,
    #[tabled(rename = "Status")]
    status: RunOutcome,
    #[tabled(rename = "Total time [s]")]
    time: String,
    #[tabled(rename = "Solver CPU [s]")]
    cpu: String,
}

impl From<&RunRecord> for SummaryRow {
    fn from(r: &RunRecord) -> Self {
        SummaryRow {
            benchmark: file_name(r.instance()),
            status: r.outcome(),
            time: format!("{:.3}", r.elapsed_seconds()),
            cpu: r.cpu_time_solver().to_string(),
        }
    }
}

/// Write all three report files into `outdir`.
pub fn write_reports(records: &[RunRecord], outdir: &Path) -> Result<()> {
    dump(&outdir.join(JSON_FILE), |out| write_json(records, out))?;
    dump(&outdir.join(CSV_FILE), |out| write_csv(records, out))?;
    dump(&outdir.join(SUMMARY_FILE), |out| write_markdown(records, out))
}

fn dump<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write(&mut out)
        .and_then(|()| out.flush())
        .with_context(|| format!("write {}", path.display()))
}

pub fn write_json(records: &[RunRecord], out: &mut dyn Write) -> io::Result<()> {
    let rows: Vec<JsonRecord> = records.iter().map(JsonRecord::from).collect();
    serde_json::to_writer_pretty(&mut *out, &rows)?;
    writeln!(out)
}

pub fn write_csv(records: &[RunRecord], out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "{}", CSV_HEADER)?;
    for r in records {
        writeln!(
            out,
            "{},{},{},{},{}",
            csv_field(&r.instance().to_string_lossy()),
            r.outcome(),
            r.elapsed_seconds(),
            csv_field(r.cpu_time_solver()),
            r.timeout_seconds(),
        )?;
    }
    Ok(())
}

pub fn write_markdown(records: &[RunRecord], out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "# SAT benchmark results\n")?;
    let mut table = summary_table(records);
    table.with(Style::markdown());
    writeln!(out, "{}", table)
}

/// The condensed table and per-outcome counts, for the terminal.
pub fn print_summary(records: &[RunRecord]) {
    let mut table = summary_table(records);
    table.with(Style::modern());
    println!("\n{}", table);
    let counts = tally(records);
    let line = counts
        .iter()
        .map(|(outcome, n)| format!("{}: {}", outcome, n))
        .collect::<Vec<_>>()
        .join(", ");
    println!("# {} instances; {}", records.len(), line);
}

pub fn tally(records: &[RunRecord]) -> BTreeMap<RunOutcome, usize> {
    let mut counts = BTreeMap::new();
    for r in records {
        *counts.entry(r.outcome()).or_insert(0) += 1;
    }
    counts
}

fn summary_table(records: &[RunRecord]) -> Table {
    Table::new(records.iter().map(SummaryRow::from))
}

fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::record::{CONFLICTS, CPU_TIME_SOLVER},
        pretty_assertions::assert_eq,
        std::{path::PathBuf, time::Duration},
        tempfile::TempDir,
    };

    fn sample() -> Vec<RunRecord> {
        let metrics: SolverMetrics = [(CONFLICTS, "42"), (CPU_TIME_SOLVER, "0.5")]
            .into_iter()
            .collect();
        vec![
            RunRecord::new(
                PathBuf::from("bench/a.cnf"),
                RunOutcome::Satisfiable,
                Duration::from_millis(1500),
                metrics,
                60,
                PathBuf::from("out/a.log.txt"),
                PathBuf::from("out/a.out"),
            ),
            RunRecord::new(
                PathBuf::from("bench/b,c.cnf.xz"),
                RunOutcome::DecompressError,
                Duration::from_millis(2),
                SolverMetrics::new(),
                60,
                PathBuf::from("out/b,c.log.txt"),
                PathBuf::from("out/b,c.out"),
            ),
        ]
    }

    #[test]
    fn csv_rows() {
        let mut buf = Vec::new();
        write_csv(&sample(), &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "benchmark,status,time_seconds,cpu_time_solver,timeout_seconds\n\
             bench/a.cnf,SATISFIABLE,1.5,0.5,60\n\
             \"bench/b,c.cnf.xz\",DECOMPRESS_ERROR,0.002,,60\n"
        );
    }

    #[test]
    fn json_fields() {
        let mut buf = Vec::new();
        write_json(&sample(), &mut buf).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(v[0]["benchmark"], "bench/a.cnf");
        assert_eq!(v[0]["status"], "SATISFIABLE");
        assert_eq!(v[0]["time_seconds"], 1.5);
        assert_eq!(v[0]["cpu_time_solver"], "0.5");
        assert_eq!(v[0]["stats"]["conflicts"], "42");
        assert_eq!(v[0]["output_file"], "out/a.out");
        assert_eq!(v[1]["status"], "DECOMPRESS_ERROR");
        assert_eq!(v[1]["cpu_time_solver"], "");
        assert!(v[1]["stats"].as_object().unwrap().is_empty());
    }

    #[test]
    fn markdown_uses_file_names() {
        let mut buf = Vec::new();
        write_markdown(&sample(), &mut buf).unwrap();
        let md = String::from_utf8(buf).unwrap();
        assert!(md.starts_with("# SAT benchmark results"));
        assert!(md.contains("Total time [s]"));
        let row = md.lines().find(|l| l.contains("a.cnf")).unwrap();
        assert!(!row.contains("bench/"));
        assert!(row.contains("SATISFIABLE"));
        assert!(row.contains("1.500"));
    }

    #[test]
    fn all_files_are_written() {
        let dir = TempDir::new().unwrap();
        write_reports(&sample(), dir.path()).unwrap();
        for name in [JSON_FILE, CSV_FILE, SUMMARY_FILE] {
            assert!(dir.path().join(name).is_file(), "{name}");
        }
        let counts = tally(&sample());
        assert_eq!(counts[&RunOutcome::Satisfiable], 1);
        assert_eq!(counts[&RunOutcome::DecompressError], 1);
    }
}
