mod error;
mod study;

use clap::{Parser, Subcommand};
use error::{CliError, CliResult};
use std::path::{Path, PathBuf};
use study::StudyConfig;
use sv_explore::{Explorer, pareto_front};
use sv_pipeline::{DesignVector, Pipeline, PipelineConfig, StageEvent};
use sv_results::{CaseRecord, StudyManifest, StudyStore};
use sv_solver::{DesignRatios, ResolveStrategy};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sv-cli")]
#[command(about = "Parametric small vessel design evaluation and exploration", long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct DesignArgs {
    /// Block coefficient
    #[arg(long)]
    cb: f64,
    /// Length/beam ratio
    #[arg(long)]
    lb: Option<f64>,
    /// Beam/draft ratio
    #[arg(long)]
    bt: Option<f64>,
    /// Draft/length ratio
    #[arg(long)]
    tl: Option<f64>,
    /// Waterline length, m
    #[arg(long)]
    length: Option<f64>,
    /// Beam, m
    #[arg(long)]
    beam: Option<f64>,
    /// Draft, m
    #[arg(long)]
    draft: Option<f64>,
    /// Flywheel storage capacity, MJ
    #[arg(long)]
    storage: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one design and print the result as JSON
    Evaluate {
        #[command(flatten)]
        design: DesignArgs,
        /// Pipeline configuration (YAML or JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print stage progress to stderr
        #[arg(long)]
        progress: bool,
    },
    /// Resolve hull ratios into dimensions
    Resolve {
        #[arg(long)]
        cb: f64,
        #[arg(long)]
        lb: f64,
        #[arg(long)]
        bt: f64,
        #[arg(long)]
        tl: f64,
        /// sweep or newton
        #[arg(long, value_parser = parse_strategy)]
        strategy: Option<ResolveStrategy>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Run a study file and store its cases
    Explore {
        /// Path to the study YAML file
        study_path: PathBuf,
        /// Overrides the study's output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List stored studies
    Studies {
        /// Study store directory
        dir: PathBuf,
    },
    /// Show a stored study
    Show {
        /// Study store directory
        dir: PathBuf,
        /// Study ID to display
        study_id: String,
        /// Only list feasible cases
        #[arg(long)]
        feasible: bool,
        /// Maximum number of cases to list
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Evaluate {
            design,
            config,
            progress,
        } => cmd_evaluate(&design, config.as_deref(), progress),
        Commands::Resolve {
            cb,
            lb,
            bt,
            tl,
            strategy,
            config,
        } => cmd_resolve(cb, DesignRatios::new(lb, bt, tl), strategy, config.as_deref()),
        Commands::Explore { study_path, output } => cmd_explore(&study_path, output),
        Commands::Studies { dir } => cmd_studies(&dir),
        Commands::Show {
            dir,
            study_id,
            feasible,
            limit,
        } => cmd_show(&dir, &study_id, feasible, limit),
    }
}

fn parse_strategy(s: &str) -> Result<ResolveStrategy, String> {
    match s {
        "sweep" => Ok(ResolveStrategy::Sweep),
        "newton" => Ok(ResolveStrategy::Newton),
        _ => Err(format!("unknown strategy '{s}' (expected sweep or newton)")),
    }
}

fn load_config(path: Option<&Path>) -> CliResult<PipelineConfig> {
    match path {
        Some(path) => Ok(sv_pipeline::config::load(path)?),
        None => Ok(PipelineConfig::default()),
    }
}

fn design_vector(args: &DesignArgs) -> CliResult<DesignVector> {
    let design = match (args.lb, args.bt, args.tl, args.length, args.beam, args.draft) {
        (Some(lb), Some(bt), Some(tl), None, None, None) => {
            DesignVector::from_ratios(args.cb, lb, bt, tl)
        }
        (None, None, None, Some(l), Some(b), Some(t)) => {
            DesignVector::from_dimensions(args.cb, l, b, t)
        }
        _ => {
            return Err(CliError::Usage(
                "give either --lb --bt --tl or --length --beam --draft".to_string(),
            ));
        }
    };
    Ok(match args.storage {
        Some(mj) => design.with_storage(mj),
        None => design,
    })
}

fn cmd_evaluate(args: &DesignArgs, config: Option<&Path>, progress: bool) -> CliResult<()> {
    let pipeline = Pipeline::new(load_config(config)?)?;
    let design = design_vector(args)?;

    let result = if progress {
        pipeline.evaluate_with_progress(
            &design,
            Some(&mut |event: StageEvent| {
                eprintln!(
                    "  {:<20} {:?}  {:.3} ms{}",
                    event.stage,
                    event.outcome,
                    event.elapsed_wall_s * 1e3,
                    event
                        .message
                        .map(|m| format!("  {m}"))
                        .unwrap_or_default()
                );
            }),
        )
    } else {
        pipeline.evaluate(&design)
    };

    println!("{}", serde_json::to_string_pretty(&result)?);
    if !result.feasible {
        for reason in &result.reasons {
            eprintln!("✗ {reason}");
        }
    }
    Ok(())
}

fn cmd_resolve(
    cb: f64,
    ratios: DesignRatios,
    strategy: Option<ResolveStrategy>,
    config: Option<&Path>,
) -> CliResult<()> {
    let mut config = load_config(config)?;
    if let Some(strategy) = strategy {
        config.resolver.strategy = strategy;
    }
    let pipeline = Pipeline::new(config)?;
    let resolved = pipeline.resolver().resolve(cb, &ratios)?;

    println!("{}", serde_json::to_string_pretty(&resolved)?);
    if !resolved.converged {
        eprintln!(
            "✗ No balanced hull within bounds after {} iterations",
            resolved.iterations
        );
    }
    Ok(())
}

fn cmd_explore(study_path: &Path, output: Option<PathBuf>) -> CliResult<()> {
    let study = StudyConfig::load(study_path)?;
    let output_dir = output.unwrap_or_else(|| study.output_dir.clone());
    println!("Running study: {}", study.name);

    let explorer =
        Explorer::new(Pipeline::new(study.pipeline.clone())?).with_batch_size(study.batch_size)?;
    let mut sampler = study.sampler.build(&study.space)?;
    let exploration = explorer.run(sampler.as_mut(), study.max_cases);

    let manifest = StudyManifest::new(
        study.name.clone(),
        &study.pipeline,
        &study.space,
        &study.sampler,
        &exploration,
    );
    let records: Vec<CaseRecord> = exploration.cases.iter().map(CaseRecord::from_case).collect();

    let store = StudyStore::new(output_dir)?;
    store.save_study(&manifest, &records)?;
    info!(study_id = %manifest.study_id, dir = %store.root_dir().display(), "study saved");

    println!("✓ Study saved: {}", manifest.study_id);
    print_manifest(&manifest);

    let front = pareto_front(&exploration.cases, &study.objectives);
    if !front.is_empty() {
        let names: Vec<String> = study.objectives.iter().map(ToString::to_string).collect();
        println!("\nPareto front ({}): {} cases", names.join(", "), front.len());
        print_case_header();
        for i in front {
            print_case(&records[i]);
        }
    }
    Ok(())
}

fn cmd_studies(dir: &Path) -> CliResult<()> {
    let store = StudyStore::new(dir.to_path_buf())?;
    let studies = store.list_studies()?;

    if studies.is_empty() {
        println!("No studies found in {}", dir.display());
    } else {
        println!("Studies in {}:", dir.display());
        for m in studies {
            println!(
                "  {} - {} ({}, {} cases, {} feasible) {}",
                m.study_id, m.name, m.sampler_name, m.evaluated, m.feasible, m.timestamp
            );
        }
    }
    Ok(())
}

fn cmd_show(dir: &Path, study_id: &str, feasible_only: bool, limit: usize) -> CliResult<()> {
    let store = StudyStore::new(dir.to_path_buf())?;
    let manifest = store.load_manifest(study_id)?;
    let cases = store.load_cases(study_id)?;

    println!("Study: {} ({})", manifest.study_id, manifest.name);
    print_manifest(&manifest);

    println!();
    print_case_header();
    for case in cases
        .iter()
        .filter(|c| c.feasible || !feasible_only)
        .take(limit)
    {
        print_case(case);
    }
    Ok(())
}

fn print_manifest(m: &StudyManifest) {
    println!("  Timestamp: {}", m.timestamp);
    println!("  Sampler:   {}", m.sampler_name);
    if let Some(max_cases) = m.max_cases {
        println!("  Max cases: {}", max_cases);
    }
    println!("  Evaluated: {}", m.evaluated);
    println!("  Feasible:  {}", m.feasible);
    println!("  Elapsed:   {:.3}s", m.elapsed_s);
    if !m.reason_counts.is_empty() {
        println!("  Infeasibility reasons:");
        for (kind, count) in &m.reason_counts {
            println!("    {kind:<28} {count}");
        }
    }
}

fn print_case_header() {
    println!(
        "  {:>5} {:>5} {:>7} {:>6} {:>6} {:>8} {:>8} {:>8} {:>7} {:>8}  reasons",
        "case", "Cb", "L", "B", "T", "disp_t", "fuel_t", "mcr_kw", "gmt_m", "p_fail"
    );
}

fn print_case(c: &CaseRecord) {
    let num = |v: Option<f64>, prec: usize| match v {
        Some(v) => format!("{v:.prec$}"),
        None => "-".to_string(),
    };
    println!(
        "  {:>5} {:>5.3} {:>7} {:>6} {:>6} {:>8} {:>8} {:>8} {:>7} {:>8}  {}",
        c.index,
        c.cb,
        num(c.length_m, 2),
        num(c.beam_m, 2),
        num(c.draft_m, 2),
        num(c.displacement_t, 1),
        num(c.fuel_t, 1),
        num(c.mcr_kw, 0),
        num(c.gmt_m, 3),
        num(c.failure_probability, 4),
        c.reasons
    );
}
