use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use symcheck_cli::{parse_backgrounds, parse_report_format, parse_sample_mode, resolve_flag_override};
use symcheck_cli::{expand_inputs, process_single_image};
use symcheck_core::models::{AnalyzeOptions, BackgroundSpec};
use symcheck_core::report::{render, FileRecord};
use symcheck_core::{config, contrast_ratio, parse_color, verbose_println};

#[derive(Parser)]
#[command(name = "symcheck")]
#[command(version, about = "Contrast auditor for symbol artwork", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit image(s) for contrast against candidate backgrounds
    Check {
        /// Input files and/or directories
        #[arg(value_name = "INPUT", required = true)]
        inputs: Vec<PathBuf>,

        /// Candidate backgrounds, ';'-separated (default: white;black)
        #[arg(short, long, value_name = "COLORS")]
        backgrounds: Option<String>,

        /// Segmentation reference color (default: white)
        #[arg(long, value_name = "COLOR")]
        seg_background: Option<String>,

        /// Near-background RGB distance (default: 160)
        #[arg(long, value_name = "FLOAT")]
        distance: Option<f64>,

        /// Edge band radius in pixels (default: 2)
        #[arg(long, value_name = "N")]
        band_radius: Option<usize>,

        /// Minimum contrast ratio (default: 3)
        #[arg(short, long, value_name = "FLOAT")]
        threshold: Option<f64>,

        /// Max percentage of pixels allowed below the threshold (default: 2)
        #[arg(long, value_name = "PERCENT")]
        max_below: Option<f64>,

        /// Percentile fraction for the pass metric (default: 0.05)
        #[arg(long, value_name = "FRACTION")]
        percentile: Option<f64>,

        /// Alpha at or below which a pixel is background (default: 10)
        #[arg(long, value_name = "0-255")]
        alpha_cutoff: Option<u8>,

        /// Alpha below which a pixel is never sampled (default: 0)
        #[arg(long, value_name = "0-255")]
        min_alpha: Option<u8>,

        /// Sampling mode: band, all, or stroke (default: band)
        #[arg(long, value_name = "MODE")]
        mode: Option<String>,

        /// Luminance ceiling for stroke mode (default: 0.3)
        #[arg(long, value_name = "0-1")]
        stroke_max: Option<f64>,

        /// Require every background to pass instead of any one
        #[arg(long, overrides_with = "no_require_all")]
        require_all: bool,

        /// Accept a pass against any one background, even when the
        /// defaults file says otherwise
        #[arg(long, overrides_with = "require_all")]
        no_require_all: bool,

        /// Report format: table, csv, or json
        #[arg(short, long, value_name = "FORMAT", default_value = "table")]
        format: String,

        /// Write the report to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,

        /// Save diagnostic mask PNGs under this directory
        #[arg(long, value_name = "DIR")]
        debug_masks: Option<PathBuf>,

        /// Scan directories recursively
        #[arg(short, long)]
        recursive: bool,

        /// Number of parallel threads
        #[arg(short = 'j', long, value_name = "N")]
        threads: Option<usize>,

        /// Defaults file (default: ./symcheck.yml if present)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Print progress and diagnostics to stderr
        #[arg(short, long)]
        verbose: bool,
    },

    /// Compute the WCAG contrast ratio between two colors
    Ratio {
        /// Foreground color
        #[arg(value_name = "FOREGROUND")]
        foreground: String,

        /// Background color
        #[arg(value_name = "BACKGROUND")]
        background: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            inputs,
            backgrounds,
            seg_background,
            distance,
            band_radius,
            threshold,
            max_below,
            percentile,
            alpha_cutoff,
            min_alpha,
            mode,
            stroke_max,
            require_all,
            no_require_all,
            format,
            out,
            debug_masks,
            recursive,
            threads,
            config,
            verbose,
        } => cmd_check(
            inputs,
            backgrounds,
            seg_background,
            distance,
            band_radius,
            threshold,
            max_below,
            percentile,
            alpha_cutoff,
            min_alpha,
            mode,
            stroke_max,
            require_all,
            no_require_all,
            format,
            out,
            debug_masks,
            recursive,
            threads,
            config,
            verbose,
        ),

        Commands::Ratio {
            foreground,
            background,
        } => cmd_ratio(foreground, background),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_check(
    inputs: Vec<PathBuf>,
    backgrounds: Option<String>,
    seg_background: Option<String>,
    distance: Option<f64>,
    band_radius: Option<usize>,
    threshold: Option<f64>,
    max_below: Option<f64>,
    percentile: Option<f64>,
    alpha_cutoff: Option<u8>,
    min_alpha: Option<u8>,
    mode: Option<String>,
    stroke_max: Option<f64>,
    require_all: bool,
    no_require_all: bool,
    format: String,
    out: Option<PathBuf>,
    debug_masks: Option<PathBuf>,
    recursive: bool,
    threads: Option<usize>,
    config_path: Option<PathBuf>,
    verbose: bool,
) -> Result<(), String> {
    config::set_verbose(verbose);

    // All configuration is resolved and validated before any image is
    // read, so a bad option aborts the whole run up front.
    let handle = match &config_path {
        Some(path) => config::load_defaults(Some(path)),
        None => config::defaults().clone(),
    };
    for warning in &handle.warnings {
        eprintln!("Warning: {}", warning);
    }
    if let Some(source) = &handle.source {
        verbose_println!("Using defaults from {}", source.display());
    }
    let defaults = &handle.defaults;

    let evaluation_backgrounds = match &backgrounds {
        Some(spec) => parse_backgrounds(spec)?,
        None => defaults
            .backgrounds
            .iter()
            .map(|s| parse_color(s))
            .collect::<Result<Vec<_>, _>>()?,
    };
    let segmentation_background = match seg_background
        .as_deref()
        .or(defaults.segmentation_background.as_deref())
    {
        Some(spec) => parse_color(spec)?,
        None => BackgroundSpec::white(),
    };
    let sample_mode = match &mode {
        Some(m) => parse_sample_mode(m)?,
        None => Default::default(),
    };

    let options = AnalyzeOptions {
        near_bg_distance: distance.unwrap_or(defaults.near_bg_distance),
        alpha_background_cutoff: alpha_cutoff.unwrap_or(defaults.alpha_background_cutoff),
        band_radius: band_radius.unwrap_or(defaults.band_radius),
        segmentation_background,
        evaluation_backgrounds,
        contrast_threshold: threshold.unwrap_or(defaults.contrast_threshold),
        max_percent_below_threshold: max_below.unwrap_or(defaults.max_percent_below_threshold),
        percentile: percentile.unwrap_or(defaults.percentile),
        minimum_alpha: min_alpha.unwrap_or(defaults.minimum_alpha),
        sample_mode,
        stroke_luminance_max: stroke_max.unwrap_or(defaults.stroke_luminance_max),
        require_all_backgrounds_to_pass: resolve_flag_override(
            require_all,
            no_require_all,
            defaults.require_all_backgrounds_to_pass,
        ),
    };
    options.validate()?;
    let report_format = parse_report_format(&format)?;

    let files = expand_inputs(&inputs, recursive)?;
    if files.is_empty() {
        return Err("No supported image files found".to_string());
    }

    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| format!("Failed to configure thread pool: {}", e))?;
        verbose_println!("Using {} threads for parallel processing", num_threads);
    }

    verbose_println!("Auditing {} file(s)...", files.len());

    // Images are independent; one bad file never blocks the rest.
    let processed_count = AtomicUsize::new(0);
    let total_files = files.len();

    let records: Vec<FileRecord> = files
        .par_iter()
        .map(|path| {
            let record = match process_single_image(path, &options, debug_masks.as_deref()) {
                Ok(result) => FileRecord::ok(path.display().to_string(), result),
                Err(e) => FileRecord::err(path.display().to_string(), e),
            };
            let count = processed_count.fetch_add(1, Ordering::SeqCst) + 1;
            verbose_println!("[{}/{}] {}", count, total_files, path.display());
            record
        })
        .collect();

    let rendered = render(&records, report_format)?;
    match &out {
        Some(path) => {
            std::fs::write(path, &rendered)
                .map_err(|e| format!("Failed to write report to {}: {}", path.display(), e))?;
            println!("Report written to {}", path.display());
        }
        None => {
            print!("{}", rendered);
            if !rendered.ends_with('\n') {
                println!();
            }
        }
    }

    let errors = records.iter().filter(|r| r.error.is_some()).count();
    let failed = records
        .iter()
        .filter(|r| r.result.as_ref().is_some_and(|res| !res.overall_pass))
        .count();

    if errors + failed > 0 {
        Err(format!(
            "{} of {} images did not pass ({} could not be processed)",
            errors + failed,
            total_files,
            errors
        ))
    } else {
        Ok(())
    }
}

fn cmd_ratio(foreground: String, background: String) -> Result<(), String> {
    let fg = parse_color(&foreground)?;
    let bg = parse_color(&background)?;
    let ratio = contrast_ratio(fg.rgb, bg.rgb);

    println!("{} vs {}: {:.2}:1", fg.label, bg.label, ratio);
    println!(
        "  3.0:1 (non-text, large text): {}",
        if ratio >= 3.0 { "pass" } else { "fail" }
    );
    println!(
        "  4.5:1 (normal text):          {}",
        if ratio >= 4.5 { "pass" } else { "fail" }
    );
    Ok(())
}
