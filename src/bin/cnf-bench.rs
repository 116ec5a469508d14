/// A SAT benchmark harness
/// Usage: cnf-bench --bench <PATH>... [OPTIONS]
/// # Examples:
/// - cnf-bench -b SAT2025/                          # every .cnf, .cnf.xz and .cnf.gz below
/// - cnf-bench -b a.cnf b.cnf.xz -t 60              # 60 seconds per instance
/// - cnf-bench -b SAT2025/ -s glucose -O "-verb=0"  # another solver and its options
use {
    anyhow::{Context, bail},
    clap::Parser,
    cnf_bench::{
        config::Config,
        discover::discover,
        harness::Harness,
        report::{SUMMARY_FILE, print_summary, write_reports},
        runner::SolverCommand,
        utils::{current_date_time, host_name, modified, timestamp},
    },
    std::fs,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = Config::parse();
    let solver = config.solver_path()?;
    println!(
        "# cnf-bench {}, timeout:{} on {} @ {}",
        VERSION,
        config.timeout,
        host_name(),
        timestamp(&current_date_time()),
    );
    match modified(&solver) {
        Some(t) => println!("# {} @ {}", solver.display(), timestamp(&t)),
        None => println!("# {}", solver.display()),
    }
    fs::create_dir_all(&config.outdir)
        .with_context(|| format!("cannot create output directory {}", config.outdir.display()))?;
    let outdir = config
        .outdir
        .canonicalize()
        .with_context(|| format!("cannot resolve {}", config.outdir.display()))?;
    let instances = discover(&config.bench);
    if instances.is_empty() {
        bail!("no CNF instances found in {:?}", config.bench);
    }
    println!("# {} instances", instances.len());
    let harness = Harness::new(
        SolverCommand::new(solver).with_options(&config.solver_options),
        config.timeout,
        &outdir,
    )
    .with_scratch_dir(config.scratch_dir())
    .with_progress(!config.no_report);
    let records = harness.run_all(&instances).await;
    write_reports(&records, &outdir)?;
    print_summary(&records);
    println!("Results saved in {}", outdir.join(SUMMARY_FILE).display());
    Ok(())
}
