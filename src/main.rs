use anyhow::{Context, Result};
use clap::Parser;
use perftuner::bench;
use perftuner::cli::{threshold_option, Cli, CommandKind};
use perftuner::output::{self, OutputFormat};
use perftuner::pattern::DiagnosticPattern;
use perftuner::scanner;
use perftuner::toolchain::{BuildConfig, Toolchain};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
///
/// Classifier advisories ("needs more samples") are emitted at warn level,
/// so they stay visible without --debug.
fn init_tracing(debug: bool) {
    let default_level = if debug { "trace" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Run one scanner pattern over every requested package, strictly in order
///
/// A failed target is reported against its identifier and never aborts the
/// remaining targets.
fn run_scan(
    pattern: &DiagnosticPattern,
    packages: Vec<String>,
    config: &BuildConfig,
    format: OutputFormat,
) -> Result<()> {
    let toolchain = Toolchain::default();
    let packages = if packages.is_empty() {
        vec![".".to_string()]
    } else {
        packages
    };

    let mut stdout = std::io::stdout();
    for pkg in &packages {
        match toolchain.build(pattern.kind().gcflags(), config, pkg) {
            Ok(out) => {
                let records = scanner::scan(&out.text, pattern);
                output::write_records(&mut stdout, &records, format)?;
                if let Some(status) = out.failure {
                    tracing::warn!("{}: go build exited with {}", pkg, status);
                }
            }
            Err(err) => {
                tracing::error!("{}: {}", pkg, err);
            }
        }
    }
    Ok(())
}

fn run_benchstat(
    files: &[String],
    geomean: bool,
    split: &str,
    sort: &str,
    no_color: bool,
    json: bool,
) -> Result<()> {
    let (order, reverse) = bench::parse_order(sort)?;
    let split_by: Vec<String> = if split.is_empty() {
        Vec::new()
    } else {
        split.split(',').map(str::to_string).collect()
    };

    let mut collection = bench::Collection::new(split_by, geomean, order, reverse);
    for file in files {
        let text = std::fs::read_to_string(file).with_context(|| format!("reading {}", file))?;
        collection.add_file(file, bench::parse(&text));
    }

    let mut tables = collection.tables();
    bench::classify_tables(&mut tables);

    if json {
        output::write_json(&mut std::io::stdout(), &tables)?;
    } else {
        print!("{}", bench::format_tables(&tables, !no_color));
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.debug);

    let build_config = BuildConfig {
        module_mode: args.module_mode.clone(),
        tags: args.tags.clone(),
    };
    let format = OutputFormat::from_json_flag(args.json);

    match args.command {
        CommandKind::AlmostInlined {
            threshold,
            packages,
        } => {
            let pattern = DiagnosticPattern::almost_inlined(threshold_option(threshold))?;
            run_scan(&pattern, packages, &build_config, format)?;
        }
        CommandKind::EscapedVars { packages } => {
            let pattern = DiagnosticPattern::escaped_var()?;
            run_scan(&pattern, packages, &build_config, format)?;
        }
        CommandKind::BoundChecks { packages } => {
            let pattern = DiagnosticPattern::bound_check()?;
            run_scan(&pattern, packages, &build_config, format)?;
        }
        CommandKind::FuncSize { filter, packages } => {
            let pattern = DiagnosticPattern::func_size(filter.as_deref())?;
            run_scan(&pattern, packages, &build_config, format)?;
        }
        CommandKind::Benchstat {
            geomean,
            split,
            sort,
            no_color,
            files,
        } => {
            run_benchstat(&files, geomean, &split, &sort, no_color, args.json)?;
        }
    }

    Ok(())
}
