use clap::{Parser, Subcommand};
use linkedgan::context::RequestContext;
use linkedgan::http::ReqwestTransport;
use linkedgan::imaging::{RustBackend, process_file};
use linkedgan::publish::Publisher;
use linkedgan::secrets::{Secrets, open_store};
use linkedgan::{config, output};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "linkedgan")]
#[command(about = "Replace your profile picture with a branded GAN face")]
#[command(long_about = "\
Replace your profile picture with a branded GAN face

One run: fetch a generated face, resize it to a square, paste the overlay,
register and upload it as both the original and display picture, then point
the profile at the new images.

Secrets (names configurable under [secrets]):

  linkedGAN_linkedin_profile_page   Profile page URL, sent as Referer
  linkedGAN_encoded_profile_urn     HTML-encoded profile urn
  linkedGAN_cookies                 JSON object of session cookies,
                                    including a double-quoted JSESSIONID

Run 'linkedgan gen-config' to generate a documented linkedgan.toml.")]
#[command(version)]
struct Cli {
    /// Config file (missing file = stock defaults)
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch, brand, upload and set a new profile picture
    Run,
    /// Brand a local image without touching the network
    Process {
        /// Source image (square, or it will be stretched)
        #[arg(long)]
        input: PathBuf,
        /// Where to write the JPEG
        #[arg(long, default_value = "branded.jpg")]
        output: PathBuf,
    },
    /// Load config and secrets and build the request context, without calling out
    Check,
    /// Print a stock linkedgan.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Run => {
            let config = config::load_config(&cli.config)?;
            let store = open_store(&config.secrets)?;
            let transport = ReqwestTransport::new(config.http.timeout())?;
            let backend = RustBackend::new();

            info!("==> Publishing new profile picture");
            match Publisher::new(&config, &transport, &backend).run(&*store) {
                Ok(report) => {
                    output::print_run_report(&report);
                    info!("==> Profile picture updated");
                }
                Err(failure) => {
                    warn!(kind = ?failure.error.kind(), state = %failure.state, "run halted");
                    output::print_failure(&failure);
                    return Err(failure.into());
                }
            }
        }
        Command::Process { input, output: out } => {
            let config = config::load_config(&cli.config)?;
            let bytes = process_file(&RustBackend::new(), &input, &out, &config.image)?;
            output::print_process_output(&input, &out, bytes);
        }
        Command::Check => {
            let config = config::load_config(&cli.config)?;
            let store = open_store(&config.secrets)?;
            let secrets = Secrets::load(&*store, &config.secrets)?;
            let ctx = RequestContext::build(&secrets, &config)?;
            output::print_check_output(&config, &ctx);
            info!("==> Configuration is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
