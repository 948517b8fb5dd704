use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use showcase::catalog::{self, CatalogFilter, CategoryFilter, GameCard};
use showcase::constants::DEFAULT_CLICK_CHANCE;
use showcase::contact::{self, ContactForm};
use showcase::headless::{self, HeadlessOptions};
use showcase::manifest::Manifest;
use showcase::Showcase;

#[derive(Parser)]
#[command(
    name = "showcase",
    version,
    about = "Game showcase carousel with catalog and contact form tools"
)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the auto-rotating showcase from a JSON manifest or an image directory
    Run {
        source: PathBuf,
        /// Step the showcase without opening a window
        #[arg(long)]
        headless: bool,
        /// Headless run length
        #[arg(long, default_value_t = 30.0)]
        seconds: f32,
        /// Headless: chance per frame of a simulated thumbnail click
        #[arg(long, default_value_t = DEFAULT_CLICK_CHANCE, value_parser = parse_chance)]
        click_chance: f64,
        /// Headless: seed for simulated clicks
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Filter a JSON list of game cards by category and name
    Catalog {
        cards: PathBuf,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Check a contact form submission
    Contact {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        subject: String,
        #[arg(long, default_value = "")]
        message: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    match cli.command {
        Command::Run { source, headless, seconds, click_chance, seed } => {
            let manifest = load_manifest(&source)?;
            tracing::info!(
                source = %source.display(),
                slides = manifest.slides.len(),
                "manifest loaded"
            );
            let options = HeadlessOptions { seconds, click_chance, seed };
            run_showcase(manifest, headless, options)
        }
        Command::Catalog { cards, category, search } => {
            let text = fs::read_to_string(&cards)
                .with_context(|| format!("reading {}", cards.display()))?;
            let cards: Vec<GameCard> = serde_json::from_str(&text).context("parsing game cards")?;
            let filter = CatalogFilter::new(CategoryFilter::parse(category.as_deref()), search);

            let visible = filter.visible(&cards);
            for &i in &visible {
                println!("{}", cards[i].name);
            }
            println!("{}", catalog::results_label(visible.len()));
            for suggestion in catalog::suggestions(&cards, filter.search.trim()) {
                println!("  suggestion: {suggestion}");
            }
            Ok(())
        }
        Command::Contact { name, email, subject, message } => {
            println!("{}", contact::message_counter(message.chars().count()));
            let form = ContactForm { name, email, subject, message };
            match contact::validate(&form) {
                Ok(()) => {
                    println!("Message envoyé ! Nous vous répondrons dans les plus brefs délais.");
                    Ok(())
                }
                Err(errors) => {
                    println!("Erreur de validation");
                    for error in &errors {
                        println!("  • {error}");
                    }
                    bail!("{} invalid field(s)", errors.len())
                }
            }
        }
    }
}

fn parse_chance(arg: &str) -> std::result::Result<f64, String> {
    let chance: f64 = arg.parse().map_err(|e| format!("{e}"))?;
    if (0.0..=1.0).contains(&chance) {
        Ok(chance)
    } else {
        Err(format!("{arg} is not a probability between 0 and 1"))
    }
}

fn load_manifest(source: &Path) -> Result<Manifest> {
    let manifest = if source.is_dir() {
        Manifest::from_directory(source)
    } else {
        Manifest::load(source)
    };
    manifest.with_context(|| format!("loading showcase from {}", source.display()))
}

#[cfg(feature = "window")]
fn run_showcase(manifest: Manifest, headless: bool, options: HeadlessOptions) -> Result<()> {
    use showcase::window::{self, ImageLoader};

    if headless {
        return run_headless(manifest, options);
    }
    let mut showcase = Showcase::new(ImageLoader, manifest.timing);
    showcase.initialize(manifest.slides, manifest.display).context("showcase did not start")?;
    window::run(showcase)
}

#[cfg(not(feature = "window"))]
fn run_showcase(manifest: Manifest, headless: bool, options: HeadlessOptions) -> Result<()> {
    if !headless {
        tracing::info!("built without the `window` feature, running headless");
    }
    run_headless(manifest, options)
}

fn run_headless(manifest: Manifest, options: HeadlessOptions) -> Result<()> {
    use showcase::asset::FileProbe;

    let mut showcase = Showcase::new(FileProbe, manifest.timing);
    showcase.initialize(manifest.slides, manifest.display).context("showcase did not start")?;
    let summary = headless::run(&mut showcase, options);
    showcase.teardown();

    println!(
        "{} frames, {} auto advances, {} clicks, {} slides shown, {} skipped",
        summary.frames, summary.advances, summary.selections, summary.swaps, summary.failed_assets
    );
    Ok(())
}
