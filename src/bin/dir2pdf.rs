//! CLI binary for dir2pdf.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `BatchConfig` and prints results.

use anyhow::{bail, Context, Result};
use clap::Parser;
use dir2pdf::{
    convert_batch, scan_batch, BatchConfig, BatchProgressCallback, BatchSummary, FolderOutcome,
    FolderReport, ImageEntry, NameCollision, PageSize, ProgressCallback, SkipReason,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar over folders, plus a log line per
/// folder and per failed image.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Print the ordered image list of every folder.
    list_images: bool,
    image_errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new(list_images: bool) -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} folders  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Converting");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            list_images,
            image_errors: AtomicUsize::new(0),
        })
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_folders: usize) {
        self.bar.set_length(total_folders as u64);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Found {total_folders} subfolders"))
        ));
    }

    fn on_folder_start(&self, name: &str, _index: usize, _total: usize) {
        self.bar.set_message(name.to_string());
    }

    fn on_images_collected(&self, folder: &str, images: &[ImageEntry]) {
        self.bar
            .println(format!("  {} {}: {} images", cyan("•"), folder, images.len()));
        if self.list_images {
            for (i, img) in images.iter().enumerate() {
                self.bar
                    .println(dim(&format!("      {:>3}. {}", i + 1, img.file_name)));
            }
        }
    }

    fn on_image_complete(&self, folder: &str, index: usize, total: usize, _file_name: &str) {
        self.bar.set_message(format!("{folder}  {index}/{total}"));
    }

    fn on_image_error(&self, _folder: &str, _index: usize, _total: usize, error: &str) {
        self.image_errors.fetch_add(1, Ordering::SeqCst);

        // Truncate very long error messages to keep output tidy.
        let msg = if error.chars().count() > 100 {
            let cut: String = error.chars().take(99).collect();
            format!("{cut}\u{2026}")
        } else {
            error.to_string()
        };
        self.bar.println(format!("      {} {}", red("✗"), red(&msg)));
    }

    fn on_folder_complete(&self, report: &FolderReport) {
        self.bar.println(folder_line(report));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, _summary: &BatchSummary) {
        self.bar.finish_and_clear();
    }
}

/// One human-readable line for a finished folder.
fn folder_line(report: &FolderReport) -> String {
    let found = report.images_found;
    match &report.outcome {
        FolderOutcome::Created { path, pages } => format!(
            "  {} {}  {}",
            green("✓"),
            report.name,
            dim(&format!(
                "found {found} images, {pages} pages → {}",
                path.display()
            ))
        ),
        FolderOutcome::Skipped {
            reason: SkipReason::NoImages,
        } => format!(
            "  {} {}  {}",
            dim("–"),
            report.name,
            dim("no image files, skipped")
        ),
        FolderOutcome::Skipped {
            reason: SkipReason::Unreadable { detail },
        } => format!("  {} {}  {}", dim("–"), report.name, dim(detail)),
        FolderOutcome::Failed { error } => format!(
            "  {} {}  {}  {}",
            red("✗"),
            report.name,
            dim(&format!("found {found} images")),
            red(error)
        ),
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Every subfolder of ./scans becomes ./scans/<subfolder>.pdf
  dir2pdf -i scans

  # Write PDFs elsewhere, US Letter pages
  dir2pdf -i scans -o pdfs --size letter

  # Show the page order of each folder without writing anything
  dir2pdf -i scans --dry-run

  # Machine-readable summary
  dir2pdf -i scans --json > summary.json

LAYOUT:
  One image per page, scaled to 90% of the page and centred.
  Pages follow natural file-name order: img1, img2, img10.
  Recognised extensions: jpg jpeg png bmp gif tiff webp

ENVIRONMENT VARIABLES:
  DIR2PDF_INPUT           Input folder
  DIR2PDF_OUTPUT          Output folder
  DIR2PDF_SIZE            Page size (a4, letter)
  RUST_LOG                Override the log filter (e.g. dir2pdf=debug)
"#;

/// Convert each subfolder of images into a PDF.
#[derive(Parser, Debug)]
#[command(
    name = "dir2pdf",
    version,
    about = "Convert each subfolder of images into a PDF",
    long_about = "Convert each subfolder of an input folder into one PDF. Images are placed \
one per page, scaled and centred, in natural file-name order.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Folder containing one subfolder of images per document.
    /// Prompted for on stdin when omitted.
    #[arg(short, long, env = "DIR2PDF_INPUT")]
    input: Option<PathBuf>,

    /// Folder for the generated PDFs (default: the input folder).
    #[arg(short, long, env = "DIR2PDF_OUTPUT")]
    output: Option<PathBuf>,

    /// Page size for the PDF.
    #[arg(short, long, env = "DIR2PDF_SIZE", value_enum, default_value = "a4")]
    size: SizeArg,

    /// Print the ordered image list of every folder and DEBUG-level logs.
    #[arg(short, long, env = "DIR2PDF_DEBUG")]
    debug: bool,

    /// List what would be converted; write nothing.
    #[arg(long)]
    dry_run: bool,

    /// Print the summary as JSON on stdout.
    #[arg(long, env = "DIR2PDF_JSON")]
    json: bool,

    /// Let later folders overwrite an earlier PDF with the same name
    /// instead of appending " (2)", " (3)", ….
    #[arg(long, env = "DIR2PDF_OVERWRITE_COLLISIONS")]
    overwrite_collisions: bool,

    /// Disable progress bar.
    #[arg(long, env = "DIR2PDF_NO_PROGRESS")]
    no_progress: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "DIR2PDF_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum SizeArg {
    A4,
    Letter,
}

impl From<SizeArg> for PageSize {
    fn from(v: SizeArg) -> Self {
        match v {
            SizeArg::A4 => PageSize::A4,
            SizeArg::Letter => PageSize::Letter,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // With the progress bar active, INFO logs would duplicate its lines.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.dry_run;
    let filter = if cli.debug {
        "debug"
    } else if cli.quiet || show_progress || cli.json {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Resolve input ────────────────────────────────────────────────────
    let input = match cli.input.clone() {
        Some(p) => p,
        None => prompt_for_input()?,
    };

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new(cli.debug);
        Some(cb as Arc<dyn BatchProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Dry run ──────────────────────────────────────────────────────────
    if cli.dry_run {
        let plans = scan_batch(&input, &config)
            .with_context(|| format!("Cannot scan '{}'", input.display()))?;
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&plans).context("Failed to serialise plan")?
            );
            return Ok(());
        }
        for plan in &plans {
            if let Some(ref e) = plan.error {
                println!("{}  {}", plan.name, red(e));
            } else if let Some(ref output) = plan.output {
                println!(
                    "{}  {} images → {}",
                    bold(&plan.name),
                    plan.images.len(),
                    output.display()
                );
                for (i, img) in plan.images.iter().enumerate() {
                    println!("  {:>3}. {}", i + 1, img.file_name);
                }
            } else {
                println!("{}  {}", plan.name, dim("no image files, skipped"));
            }
        }
        return Ok(());
    }

    // ── Run batch ────────────────────────────────────────────────────────
    let summary = convert_batch(&input, &config)
        .with_context(|| format!("Cannot convert '{}'", input.display()))?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?
        );
        return Ok(());
    }

    if !cli.quiet {
        // Without the bar the folder lines have not been printed yet.
        if !show_progress {
            for report in &summary.folders {
                eprintln!("{}", folder_line(report));
                for err in &report.image_errors {
                    eprintln!("      {} {}", red("✗"), err);
                }
            }
        }
        let all_ok = summary.failed().next().is_none();
        eprintln!(
            "\n{} Processed {} folders, created {} PDFs.",
            if all_ok { green("✔") } else { cyan("⚠") },
            bold(&summary.folders_processed.to_string()),
            bold(&summary.pdfs_created.to_string()),
        );
    }

    Ok(())
}

/// Map CLI args to `BatchConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<BatchConfig> {
    let mut builder = BatchConfig::builder()
        .page_size(cli.size.into())
        .debug(cli.debug)
        .name_collision(if cli.overwrite_collisions {
            NameCollision::Overwrite
        } else {
            NameCollision::Disambiguate
        });

    if let Some(ref out) = cli.output {
        builder = builder.output_dir(out.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Ask for the input folder on stdin.
fn prompt_for_input() -> Result<PathBuf> {
    eprint!("Enter the folder containing subfolders with images: ");
    io::stderr().flush().ok();

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read input folder from stdin")?;

    let trimmed = line.trim();
    if trimmed.is_empty() {
        bail!("No input folder given");
    }
    Ok(PathBuf::from(trimmed))
}
