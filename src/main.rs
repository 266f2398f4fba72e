use anyhow::Result;
use asciicam::{
    AsciicamConfig, EventBus, KeyboardInputHandler, NullLandmarkProvider, Session, TerminalSink,
    TestPatternSource,
};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "asciicam")]
#[command(about = "Gesture-controlled ASCII art webcam viewer")]
#[command(version)]
#[command(long_about = "Converts a camera feed to live ASCII art in the terminal. \
Hand gestures reported by an external landmark detector adjust brightness and \
display settings: thumbs up/down changes brightness, a peace sign toggles the \
hand overlay, and a fist resets everything.")]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        default_value = "asciicam.toml",
        help = "Path to TOML configuration file"
    )]
    config: String,

    /// Enable debug logging (most verbose)
    #[arg(short, long, help = "Enable debug level logging")]
    debug: bool,

    /// Enable verbose logging (info level)
    #[arg(short, long, help = "Enable verbose info level logging")]
    verbose: bool,

    /// Enable quiet mode (errors only)
    #[arg(short, long, help = "Enable quiet mode - only log errors")]
    quiet: bool,

    /// Validate configuration and exit
    #[arg(long, help = "Validate configuration file and exit without starting")]
    validate_config: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in TOML format and exit")]
    print_config: bool,

    /// Dry run mode - initialize but don't start the session
    #[arg(long, help = "Perform dry run - initialize components but don't run")]
    dry_run: bool,

    /// Disable the keyboard handler (useful when stdin is not a terminal)
    #[arg(long, help = "Disable keyboard input handling")]
    no_keyboard: bool,

    /// Override log format (json, pretty, compact)
    #[arg(long, value_name = "FORMAT", help = "Log output format: json, pretty, or compact")]
    log_format: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_config {
        print_default_config()?;
        return Ok(());
    }

    init_logging(&args)?;

    info!("Starting asciicam v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration file: {}", args.config);

    let config = match AsciicamConfig::load_from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if args.validate_config {
        match config.validate() {
            Ok(()) => {
                println!("Configuration is valid");
                return Ok(());
            }
            Err(e) => {
                error!("Configuration validation failed: {}", e);
                eprintln!("Configuration validation failed: {}", e);
                std::process::exit(1);
            }
        }
    }

    config.validate()?;

    let event_bus = Arc::new(EventBus::new(config.system.event_bus_capacity));
    let mut session = Session::new(&config, Arc::clone(&event_bus))?;

    if args.dry_run {
        info!("Dry run mode - session initialized but not started");
        println!("Dry run completed successfully");
        return Ok(());
    }

    // Frame and landmark providers. The synthetic source stands in until
    // a camera backend is wired to this binary; the library seams accept
    // any FrameSource / LandmarkProvider implementation.
    let source = Box::new(TestPatternSource::new(&config.camera));
    let provider = Box::new(NullLandmarkProvider);
    let mut sink = TerminalSink::new();

    let (keyboard, key_actions) = KeyboardInputHandler::new();
    if !args.no_keyboard {
        keyboard.start()?;
    }

    // Ctrl+C cancels the session cooperatively
    let cancellation_token = session.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received SIGINT signal (Ctrl+C)");
            cancellation_token.cancel();
        }
    });

    let end = session.run(source, provider, &mut sink, key_actions).await;

    keyboard.stop().await;

    match end {
        Ok(end) => {
            info!("Session finished: {:?}", end);
            Ok(())
        }
        Err(e) => {
            error!("Session error: {}", e);
            Err(e.into())
        }
    }
}

fn init_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let log_level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else if args.quiet {
        "error"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("asciicam={}", log_level)));

    let fmt_layer = match args.log_format.as_deref() {
        Some("json") => fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        Some("compact") => fmt::layer()
            .compact()
            .with_target(false)
            .boxed(),
        Some("pretty") | None => fmt::layer()
            .pretty()
            .with_target(true)
            .with_file(args.debug)
            .with_line_number(args.debug)
            .boxed(),
        Some(format) => {
            eprintln!("Warning: Unknown log format '{}', using default", format);
            fmt::layer().with_target(true).boxed()
        }
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .init();

    Ok(())
}

/// Print default configuration in TOML format
fn print_default_config() -> Result<()> {
    let config = AsciicamConfig::default();
    println!("# Asciicam configuration file");
    println!("# Default configuration with all available options");
    println!();
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
