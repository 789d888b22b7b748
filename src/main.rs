use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod access_log;
mod agenda;
mod asset;
mod config;
mod constants;
mod render;
mod slide;

use crate::access_log::{AccessRecord, record_access, resolve_user};
use crate::asset::{AssetId, ResolveAsset, SourceKind};
use crate::config::Config;
use crate::constants::OUTPUT_FILE;
use crate::render::render_document;
use crate::slide::build_deck;

#[derive(Parser)]
#[command(name = "agenda-deck", version, about = "Render the new-hire onboarding agenda as a carousel page")]
struct Cli {
    /// TOML config file; built-in defaults are used when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the agenda page. The access is recorded only once the agenda is valid
    Render {
        #[arg(long, default_value = OUTPUT_FILE)]
        out: PathBuf,
        /// Identifier recorded in the access log
        #[arg(long)]
        user: Option<String>,
        /// Skip the access log
        #[arg(long)]
        no_log: bool,
    },

    /// Print the slides and where each image comes from
    Check,
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Ok(Config::load_from(path)?),
        None => Ok(Config::default()),
    }
}

fn source_label(source: SourceKind) -> &'static str {
    match source {
        SourceKind::LocalFile => "file",
        SourceKind::Fallback => "placeholder",
    }
}

/// Builds the deck, records the access, then writes the page.
///
/// The access log is only touched once the agenda has produced a deck.
fn render_page(config: &Config, out: &Path, user: Option<&str>, no_log: bool) -> Result<usize> {
    let resolver = config.resolver();
    let logo = resolver.resolve(&AssetId::logo());
    let slides = build_deck(&config.agenda()?, &resolver)?;

    if !no_log {
        let record = AccessRecord::now(resolve_user(user));
        if let Some(message) = record_access(config.log.sink().as_ref(), &record) {
            eprintln!("{message}");
        }
    }

    let html = render_document(&logo, &slides, &config.page);
    fs::write(out, &html).with_context(|| format!("write {}", out.display()))?;
    info!(path = %out.display(), slides = slides.len(), bytes = html.len(), "agenda page written");
    Ok(slides.len())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.cmd {
        Command::Render { out, user, no_log } => {
            let slides = render_page(&config, &out, user.as_deref(), no_log)?;
            println!("Wrote {slides} slides to {}", out.display());
        }
        Command::Check => {
            let resolver = config.resolver();
            println!("assets: {}", resolver.base_dir().display());
            let logo = resolver.resolve(&AssetId::logo());
            println!("logo: {} ({})", source_label(logo.source), logo.media_type);

            let slides = build_deck(&config.agenda()?, &resolver)?;
            for (i, slide) in slides.iter().enumerate() {
                println!(
                    "{:>2}. {:<9} {:<28} {:<12} {} ({})",
                    i + 1,
                    slide.item.time(),
                    slide.item.title(),
                    slide.duration_label,
                    source_label(slide.image.source),
                    slide.image.media_type,
                );
            }
        }
    }

    Ok(())
}
