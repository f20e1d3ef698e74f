//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod encode;
pub mod settings;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::encode::encode_to_data_url;
use crate::cli::settings::{set_value, unset_value};
use crate::core::app::SessionContext;
use crate::core::config::Config;
use crate::core::constants::API_KEY_ENV;
use crate::ui::app_loop::run_app;
use crate::utils::logging::init_tracing;

#[derive(Parser)]
#[command(name = "imagewand")]
#[command(about = "Generate and edit images from the terminal")]
#[command(
    long_about = "ImageWand is a full-screen terminal front end for an image generation \
service. Describe an image to generate it, or drop a PNG or JPEG onto the upload panel \
and describe how to edit it. Results can be downloaded and refined further.\n\n\
Configuration:\n\
  imagewand set endpoint <url>       Generation service URL\n\
  imagewand set download-dir <dir>   Where downloaded images are saved\n\n\
Environment Variables:\n\
  IMAGEWAND_API_KEY   Bearer token sent to the generation endpoint (optional)\n\
  RUST_LOG            Log filter used with --log\n\n\
Controls:\n\
  Tab               Move between the upload, prompt, and result panels\n\
  Paste a path      Drop an image onto the upload panel\n\
  Ctrl+O            Enter an image path\n\
  Delete / Ctrl+X   Remove the current image\n\
  Enter             Submit the prompt\n\
  d / h / r         Download, toggle history, start over (result panel)\n\
  Ctrl+C            Quit the application"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Image to load into the upload panel at startup
    #[arg(short = 'i', long, value_name = "PATH")]
    pub image: Option<PathBuf>,

    /// Write debug logs to the specified file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Generation endpoint, overriding the configured one
    #[arg(short = 'e', long, value_name = "URL")]
    pub endpoint: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive interface (default)
    Run,
    /// Validate an image and print it as a data URL
    Encode {
        /// PNG or JPEG file, at most 10 MB
        path: PathBuf,
    },
    /// Set configuration values, or print them when no key is given
    Set {
        /// Configuration key to set (endpoint, download-dir)
        key: Option<String>,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_tracing(args.log.as_deref())?;

    match args.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let config = Config::load()?;
            let session = SessionContext::from_config(&config, args.endpoint);
            if session.generator.is_none() {
                eprintln!("⚠️  No generation endpoint configured; prompts cannot be submitted.");
                eprintln!("Example: imagewand set endpoint https://example.com/api/image");
            } else if std::env::var_os(API_KEY_ENV).is_none() {
                tracing::debug!("{API_KEY_ENV} not set; sending requests without a bearer token");
            }
            run_app(session, args.image).await
        }
        Commands::Encode { path } => match encode_to_data_url(&path).await {
            Ok(data_url) => {
                println!("{data_url}");
                Ok(())
            }
            Err(e) => {
                eprintln!("❌ {e}");
                std::process::exit(1);
            }
        },
        Commands::Set { key, value } => {
            let mut config = Config::load()?;
            let Some(key) = key else {
                config.print_all();
                return Ok(());
            };
            if value.is_empty() {
                config.print_all();
                return Ok(());
            }
            match set_value(&mut config, &key, &value) {
                Ok(message) => {
                    config.save()?;
                    println!("{message}");
                    Ok(())
                }
                Err(e) => {
                    e.print();
                    std::process::exit(1);
                }
            }
        }
        Commands::Unset { key } => {
            let mut config = Config::load()?;
            match unset_value(&mut config, &key) {
                Ok(message) => {
                    config.save()?;
                    println!("{message}");
                    Ok(())
                }
                Err(e) => {
                    e.print();
                    std::process::exit(1);
                }
            }
        }
    }
}
