mod build;
mod cargo;
mod commands;
mod core;
mod ui;

use clap::{ArgAction, Parser, Subcommand};
use crate::core::error::{ShipError, print_error};
use crate::core::version::BumpPart;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Bump, build, tag and push a release
#[derive(Parser)]
#[command(name = "ship")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Increase log verbosity (-v debug, -vv trace); SHIP_LOG overrides
  #[arg(short, long, action = ArgAction::Count, global = true)]
  verbose: u8,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build the release artifact, push it to the deploy branch and tag it
  Deploy {
    /// Version to release (must be newer than the recorded one)
    #[arg(value_name = "VERSION", required_unless_present = "bump", conflicts_with = "bump")]
    target: Option<String>,
    /// Derive the version by bumping the recorded one
    #[arg(long, value_enum)]
    bump: Option<BumpPart>,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
    /// Show the plan without running it
    #[arg(long)]
    dry_run: bool,
    /// Output the plan in JSON format
    #[arg(long, requires = "dry_run")]
    json: bool,
  },

  /// Print the recorded version
  Current {
    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Print the version a bump would produce
  Next {
    /// Component to bump
    #[arg(value_enum)]
    part: BumpPart,
  },

  /// Create ship.toml and the version file
  Init {
    /// Version to record (default: 0.0.0)
    #[arg(long, value_name = "VERSION")]
    start: Option<String>,
    /// Overwrite an existing ship.toml
    #[arg(long)]
    force: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn init_logging(verbose: u8) {
  let level = match verbose {
    0 => "warn",
    1 => "debug",
    _ => "trace",
  };

  tracing_subscriber::registry()
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false))
    .with(EnvFilter::try_from_env("SHIP_LOG").unwrap_or_else(|_| EnvFilter::new(level)))
    .init();
}

fn main() {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  let result = match cli.command {
    Commands::Deploy {
      target,
      bump,
      yes,
      dry_run,
      json,
    } => commands::run_deploy(target, bump, yes, dry_run, json),
    Commands::Current { json } => commands::run_current(json),
    Commands::Next { part } => commands::run_next(part),
    Commands::Init { start, force } => commands::run_init(start, force),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: ShipError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
