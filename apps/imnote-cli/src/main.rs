//! imnote - BibTeX to Markdown notes
//!
//! Renders bibliography entries through a citation style and the user's
//! note templates, either printed for insertion or created as vault files.

mod cli;

use std::io::Read;

use clap::Parser;
use imnote_core::{CiteprocFactory, FsVault, Generator, Settings};
use imnote_providers::{resolve_input, HttpClient};
use tracing_subscriber::EnvFilter;

use cli::{BatchArgs, Cli, Commands};

const USER_AGENT: &str = concat!("imnote/", env!("CARGO_PKG_VERSION"));

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::load_default()?,
    };

    match cli.command {
        Commands::Config { path } => {
            if path {
                match Settings::default_path() {
                    Some(path) => println!("{}", path.display()),
                    None => return Err("no configuration directory on this platform".into()),
                }
            } else {
                print!("{}", settings.to_toml()?);
            }
        }
        Commands::Resolve { input } => {
            let http = HttpClient::new(USER_AGENT)?;
            match resolve_input(&input, &http).await? {
                Some(bibtex) => println!("{}", bibtex),
                None => return Err(format!("'{}' is not an arXiv reference or ISBN", input).into()),
            }
        }
        Commands::Insert(args) => {
            let generator = generator(&cli.vault, cli.active.clone(), settings)?;
            let text = generator.prepare(&read_input(&args)?).await?;
            let report = generator.insert(&text, args.template.as_deref()).await?;

            for notice in &report.notices {
                eprintln!("notice: {}", notice);
            }
            print!("{}", report.text());
        }
        Commands::Create(args) => {
            let generator = generator(&cli.vault, cli.active.clone(), settings)?;
            let text = generator.prepare(&read_input(&args)?).await?;
            let report = generator.create(&text, args.template.as_deref()).await?;

            for notice in &report.notices {
                eprintln!("notice: {}", notice);
            }
            for path in &report.created {
                println!("{}", path);
            }
            if !report.failures.is_empty() {
                return Err(format!("{} note(s) could not be created", report.failures.len()).into());
            }
        }
    }

    Ok(())
}

fn generator(
    root: &std::path::Path,
    active: Option<String>,
    settings: Settings,
) -> Result<Generator<FsVault, HttpClient>, Box<dyn std::error::Error>> {
    let mut vault = FsVault::new(root);
    if let Some(active) = active {
        vault = vault.with_active(active);
    }

    let factory = CiteprocFactory::new(settings.processor.clone());
    Ok(Generator::new(vault, HttpClient::new(USER_AGENT)?, factory, settings))
}

fn read_input(args: &BatchArgs) -> std::io::Result<String> {
    if let Some(path) = &args.file {
        return std::fs::read_to_string(path);
    }

    match args.input.as_deref() {
        Some(input) if input != "-" => Ok(input.to_string()),
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}
