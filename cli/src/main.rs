//! curriculum-pdf CLI - curriculum PDF to JSON extraction tool

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use curriculum_pdf::render::{self, JsonFormat};
use curriculum_pdf::{BlockSource, CurriculumExtractor, Layout, ParseOptions, PdfSource, Vocabulary};

#[derive(Parser)]
#[command(name = "curriculum-pdf")]
#[command(version)]
#[command(about = "Extract curriculum structure from PDF documents to JSON", long_about = None)]
struct Cli {
    /// Document layout: cc, si or ec
    #[arg(value_name = "LAYOUT")]
    layout: Option<String>,

    /// Input PDF file
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output JSON file
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Output compact JSON
    #[arg(long)]
    compact: bool,

    /// JSON file overriding marker tokens
    #[arg(long, value_name = "FILE", env = "CURRICULUM_PDF_VOCABULARY")]
    vocabulary: Option<PathBuf>,

    /// Log extraction details
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let (Some(layout), Some(input), Some(output)) = (&cli.layout, &cli.input, &cli.output) else {
        print_usage();
        return;
    };

    let format = if cli.compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let result = load_options(layout, cli.vocabulary.as_deref())
        .and_then(|options| cmd_convert(input, output, options, format));

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        "{}",
        "Usage: curriculum-pdf <LAYOUT> <INPUT> <OUTPUT>".yellow()
    );
    println!("       LAYOUT is one of: cc, si, ec");
    println!("       curriculum-pdf --help for more information");
}

/// Build parse options from the layout alias and an optional vocabulary file.
fn load_options(
    alias: &str,
    vocabulary: Option<&Path>,
) -> Result<ParseOptions, Box<dyn std::error::Error>> {
    let layout = Layout::from_alias(alias)
        .ok_or_else(|| format!("Unknown layout '{}' (expected cc, si or ec)", alias))?;

    let mut options = ParseOptions::new().with_layout(layout);
    if let Some(path) = vocabulary {
        let json = fs::read_to_string(path)?;
        options = options.with_vocabulary(Vocabulary::from_json(&json)?);
        log::debug!("Loaded vocabulary from {}", path.display());
    }

    Ok(options)
}

fn cmd_convert(
    input: &Path,
    output: &Path,
    options: ParseOptions,
    format: JsonFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));

    pb.set_message("Reading PDF...");
    let source = match PdfSource::open(input) {
        Ok(source) => source,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e.into());
        }
    };

    pb.set_message(format!("Extracting {} pages...", source.page_count()));
    let curriculum = match CurriculumExtractor::new(options).extract(&source) {
        Ok(curriculum) => curriculum,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e.into());
        }
    };

    pb.set_message("Writing JSON...");
    if let Err(e) = render::write_json(&curriculum, output, format) {
        pb.finish_and_clear();
        return Err(e.into());
    }

    pb.finish_with_message("Done!");

    let summary = &curriculum.summary;
    println!(
        "\n{} {}",
        "Course:".green().bold(),
        if summary.course.is_empty() {
            "-"
        } else {
            summary.course.as_str()
        }
    );
    println!(
        "  {} {} disciplines ({} obligatory)",
        "├─".dimmed(),
        curriculum.disciplines.len(),
        curriculum.obligatory_count()
    );
    println!("  {} {} semesters", "├─".dimmed(), summary.semesters);
    println!("  {} {} hours", "├─".dimmed(), summary.total_hours);
    println!("  {} {}", "└─".dimmed(), output.display());

    Ok(())
}
