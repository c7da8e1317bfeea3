// Mon Oct 19 2026 - Alex

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use pattern_scanner::{
    config::{ScanConfig, Signature},
    cpu::{self, CpuTier},
    memory::{Address, ModuleImage, Segment},
    output::{JsonSerializer, ReportGenerator, ScanReport},
    pattern::NamedPattern,
    scan::{ScanHit, SegmentScanner, Strategy},
    utils::{format_bytes, format_duration, LoggingUtils},
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author = "Alex")]
#[command(version)]
#[command(about = "Byte signature scanner with SIMD acceleration", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the vector instruction tier of this CPU
    Cpu,

    /// Scan the executable sections of a binary on disk
    Scan {
        file: PathBuf,

        /// Load address to relocate segments to (hex)
        #[arg(long, value_parser = parse_address)]
        base: Option<Address>,

        #[command(flatten)]
        opts: ScanOpts,
    },

    /// Scan the executable mappings of a running process (Linux)
    Process {
        pid: u32,

        #[command(flatten)]
        opts: ScanOpts,
    },
}

#[derive(Args, Debug)]
struct ScanOpts {
    /// Signature to search for, `name=PATTERN` or just `PATTERN`
    #[arg(short, long = "pattern", value_name = "SIG")]
    patterns: Vec<String>,

    /// JSON config with signatures and scan settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long, value_parser = parse_strategy)]
    strategy: Option<Strategy>,

    #[arg(long)]
    delimiter: Option<char>,

    #[arg(long)]
    wildcard: Option<char>,

    /// Scan signatures one at a time
    #[arg(long)]
    sequential: bool,

    /// Write a JSON report to this path
    #[arg(long, value_name = "OUT")]
    json: Option<PathBuf>,

    #[arg(long)]
    no_progress: bool,
}

fn parse_address(s: &str) -> Result<Address, String> {
    Address::parse_hex(s).ok_or_else(|| format!("invalid hex address '{}'", s))
}

fn parse_strategy(s: &str) -> Result<Strategy, String> {
    s.parse()
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    LoggingUtils::init(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "[!]".red(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Cpu => {
            let tier = cpu::tier();
            println!("{} {}", "CPU tier:".bold(), tier.to_string().cyan());
            for strategy in Strategy::all() {
                let mark = if tier.supports(strategy) { "yes".green() } else { "no".red() };
                println!("  {:<12} {}", strategy.name(), mark);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Scan { file, base, opts } => {
            let config = build_config(&opts, base)?;
            let Some(patterns) = compile_all(&config) else {
                return Ok(ExitCode::FAILURE);
            };

            println!("{} Loading {}", "[*]".blue(), file.display());
            let image = ModuleImage::load(&file, config.base_address)
                .with_context(|| format!("failed to load {}", file.display()))?;
            println!(
                "{} {} image at {} ({})",
                "[+]".green(),
                image.format(),
                image.base(),
                format_bytes(image.size())
            );

            let segments = image.segments();
            scan_and_report(&image.display_name(), &segments, &patterns, &config, &opts)
        }
        Command::Process { pid, opts } => scan_process(pid, &opts),
    }
}

#[cfg(target_os = "linux")]
fn scan_process(pid: u32, opts: &ScanOpts) -> Result<ExitCode> {
    use pattern_scanner::memory::ProcessMemory;

    let config = build_config(opts, None)?;
    let Some(patterns) = compile_all(&config) else {
        return Ok(ExitCode::FAILURE);
    };

    let process = ProcessMemory::attach(pid).with_context(|| format!("failed to attach to {}", pid))?;
    let owned = process
        .read_segments()
        .with_context(|| format!("failed to read memory of {}", pid))?;
    println!("{} Read {} executable mappings from pid {}", "[+]".green(), owned.len(), pid);

    let segments: Vec<Segment<'_>> = owned.iter().map(|s| s.as_segment()).collect();
    scan_and_report(&format!("pid {}", pid), &segments, &patterns, &config, opts)
}

#[cfg(not(target_os = "linux"))]
fn scan_process(pid: u32, _opts: &ScanOpts) -> Result<ExitCode> {
    bail!("scanning process {} is only supported on Linux", pid)
}

/// Config file first, then command-line flags on top.
fn build_config(opts: &ScanOpts, base: Option<Address>) -> Result<ScanConfig> {
    let mut config = match &opts.config {
        Some(path) => ScanConfig::load(path).with_context(|| format!("failed to load config {}", path.display()))?,
        None => ScanConfig::new(),
    };

    if let Some(strategy) = opts.strategy {
        config = config.with_strategy(strategy);
    }
    if let Some(delimiter) = opts.delimiter {
        config = config.with_delimiter(delimiter);
    }
    if let Some(wildcard) = opts.wildcard {
        config = config.with_wildcard(wildcard);
    }
    if let Some(base) = base {
        config = config.with_base_address(base);
    }
    if opts.sequential {
        config = config.with_parallel(false);
    }

    for (i, arg) in opts.patterns.iter().enumerate() {
        let signature = match arg.split_once('=') {
            Some((name, pattern)) => Signature::new(name.trim(), pattern.trim()),
            None => Signature::new(&format!("pattern_{}", i), arg),
        };
        config.signatures.push(signature);
    }

    config.validate()?;
    if config.signatures.is_empty() {
        bail!("no signatures given; use --pattern or --config");
    }

    rayon::ThreadPoolBuilder::new()
        .num_threads(config.max_threads)
        .build_global()
        .context("failed to size the thread pool")?;

    Ok(config)
}

/// Reports every invalid signature; `None` means at least one failed.
fn compile_all(config: &ScanConfig) -> Option<Vec<NamedPattern>> {
    match config.compile_signatures() {
        Ok(patterns) => Some(patterns),
        Err(failures) => {
            for (signature, error) in failures {
                eprintln!(
                    "{} {} \"{}\": {}",
                    "[!]".red(),
                    signature.name.bold(),
                    signature.pattern,
                    error
                );
            }
            None
        }
    }
}

fn scan_and_report(
    target: &str,
    segments: &[Segment<'_>],
    patterns: &[NamedPattern],
    config: &ScanConfig,
    opts: &ScanOpts,
) -> Result<ExitCode> {
    if segments.is_empty() {
        bail!("{} has no executable segments", target);
    }

    let scanned: usize = segments.iter().map(|s| s.size()).sum();
    println!(
        "{} Scanning {} in {} segments for {} signatures",
        "[*]".blue(),
        format_bytes(scanned as u64),
        segments.len(),
        patterns.len()
    );

    let progress = if opts.no_progress {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(patterns.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("#>-"),
        );
        pb
    };

    let started = Instant::now();
    let scanner = SegmentScanner::new()
        .with_strategy(config.strategy)
        .set_parallel(config.parallel);
    let hits: Vec<ScanHit> = scanner.scan_all_with(segments, patterns, |hit| {
        progress.set_message(hit.name.clone());
        progress.inc(1);
    });
    progress.finish_and_clear();

    let tier: CpuTier = cpu::tier();
    let report = ScanReport::new(target, tier, config.strategy, segments, &hits);

    println!();
    let color = atty::is(atty::Stream::Stdout);
    println!("{}", ReportGenerator::new().with_color(color).generate(&report));
    println!("{} Finished in {}", "[+]".green(), format_duration(started.elapsed()));

    if let Some(path) = &opts.json {
        JsonSerializer::new()
            .serialize_to_file(&report, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("{} Report saved to {}", "[+]".green(), path.display());
    }

    Ok(ExitCode::SUCCESS)
}
