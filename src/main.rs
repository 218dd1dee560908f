//! # bonqr CLI
//!
//! Command-line interface for payment-code QR generation.
//!
//! ## Usage
//!
//! ```bash
//! # Serve the form UI
//! bonqr serve --listen 127.0.0.1:8080 --locations locations.json
//!
//! # List known locations
//! bonqr locations
//!
//! # Generate a payload for a known location, 15 minutes ahead
//! bonqr generate --location "Main Street" --amount 12.5 --offset 15
//!
//! # Generate for custom codes, save the QR and copy the payload
//! bonqr generate --bon 123 --operator 456 --png qr.png --copy
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use bonqr::{
    BonqrError, Controller,
    clipboard::{CommandClipboard, CopyOutcome},
    controller::{LOAD_FAILED_NOTE, SubmitForm},
    error::RenderError,
    locations::LocationSource,
    render::{PngQrRenderer, QrOptions, parse_color},
    selection::CUSTOM_MARKER,
    server::{self, ServerConfig},
};

/// bonqr - Payment-code QR generator
#[derive(Parser, Debug)]
#[command(name = "bonqr")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, env = "BONQR_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command.
#[derive(Args, Debug)]
struct CommonArgs {
    /// Location list: a JSON file path or an http(s) URL
    #[arg(long, env = "BONQR_LOCATIONS", default_value = "locations.json")]
    locations: String,

    /// Program receiving copied text on stdin (defaults to pbcopy on macOS,
    /// xclip elsewhere)
    #[arg(long, env = "BONQR_CLIPBOARD_COMMAND")]
    clipboard_command: Option<String>,

    /// QR image width in pixels
    #[arg(long, default_value = "240")]
    qr_width: u32,

    /// QR quiet zone in modules
    #[arg(long, default_value = "1")]
    qr_margin: u32,

    /// Dark module color
    #[arg(long, default_value = "#000000", value_parser = parse_color)]
    qr_dark: [u8; 4],

    /// Light module color
    #[arg(long, default_value = "#ffffff", value_parser = parse_color)]
    qr_light: [u8; 4],
}

impl CommonArgs {
    fn source(&self) -> LocationSource {
        LocationSource::parse(&self.locations)
    }

    fn clipboard_command(&self) -> String {
        self.clipboard_command
            .clone()
            .unwrap_or_else(|| CommandClipboard::platform_default().to_string())
    }

    fn qr_options(&self) -> QrOptions {
        QrOptions {
            width: self.qr_width,
            margin: self.qr_margin,
            dark: self.qr_dark,
            light: self.qr_light,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the form UI over HTTP
    Serve {
        /// Address to listen on
        #[arg(long, env = "BONQR_LISTEN", default_value = "127.0.0.1:8080")]
        listen: String,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// List known locations
    Locations {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Generate one payload and QR image
    Generate {
        /// Known location name (omit for custom codes)
        #[arg(long)]
        location: Option<String>,

        /// BON code (custom entry only)
        #[arg(long, default_value = "")]
        bon: String,

        /// Operator code (custom entry only)
        #[arg(long, default_value = "")]
        operator: String,

        /// Amount
        #[arg(long, default_value = "")]
        amount: String,

        /// Minutes added to the current time
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        offset: String,

        /// Save the QR image as PNG
        #[arg(long, value_name = "FILE")]
        png: Option<PathBuf>,

        /// Copy the payload to the clipboard
        #[arg(long)]
        copy: bool,

        #[command(flatten)]
        common: CommonArgs,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), BonqrError> {
    let cli = Cli::parse();

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .map_err(|e| BonqrError::InvalidInput(format!("Invalid log level: {}", e)))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Serve { listen, common } => {
            server::serve(ServerConfig {
                listen_addr: listen,
                locations: common.source(),
                clipboard_command: common.clipboard_command(),
                qr: common.qr_options(),
            })
            .await
        }
        Commands::Locations { common } => {
            let controller = start(&common).await?;
            print_locations(&controller);
            Ok(())
        }
        Commands::Generate {
            location,
            bon,
            operator,
            amount,
            offset,
            png,
            copy,
            common,
        } => {
            let controller = start(&common).await?;

            match location.as_deref() {
                Some(name) => {
                    if controller.registry().find(name).is_none() {
                        tracing::warn!(location = name, "unknown location, using custom codes");
                    }
                    controller.select_location(name).await;
                }
                None => {
                    controller.select_location(CUSTOM_MARKER).await;
                }
            }

            let submission = controller
                .submit(SubmitForm {
                    bon,
                    operator,
                    amount,
                    offset,
                })
                .await
                .ok_or_else(|| {
                    BonqrError::InvalidInput(
                        "BON and operator are required (use --location or --bon/--operator)"
                            .to_string(),
                    )
                })?;

            println!("{}", submission.result.payload);

            if let Some(png_path) = png {
                let image = submission.display.image.ok_or_else(|| {
                    RenderError::Image("QR image was not rendered".to_string())
                })?;
                std::fs::write(&png_path, &image.png)?;
                eprintln!("Saved to {}", png_path.display());
            }

            if copy && controller.copy().await == CopyOutcome::Copied {
                eprintln!("Copied to clipboard");
            }

            Ok(())
        }
    }
}

async fn start(common: &CommonArgs) -> Result<Controller, BonqrError> {
    let clipboard = CommandClipboard::parse(&common.clipboard_command())?;
    Ok(Controller::start(
        &common.source(),
        Arc::new(PngQrRenderer),
        common.qr_options(),
        Arc::new(clipboard),
    )
    .await)
}

/// Print location cards
fn print_locations(controller: &Controller) {
    if controller.load_failed() {
        println!("{}", LOAD_FAILED_NOTE);
        return;
    }

    let cards = controller.cards();
    if let Some(message) = cards.empty_message {
        println!("{}", message);
        return;
    }

    println!("Known locations:");
    for location in &cards.locations {
        println!("  {}", location.name);
        println!("    BON:      {}", location.bon);
        println!("    Operator: {}", location.operator);
        println!("    Map:      {}", location.maps);
    }
}
