use std::io::{self, IsTerminal, Read};
use std::process::ExitCode;

use clap::Parser;
use tracing::subscriber::SetGlobalDefaultError;
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use deets::DeetsError;
use deets::cli::Cli;
use deets::file::{Paths, home_dir};
use deets::ops::{Context, Outcome, handle};
use deets::settings::Settings;
use deets::types::{Action, OutputFormat, ValueSource};

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !e.is_silent() {
                eprintln!("Error: {e}");
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<(), DeetsError> {
    let settings = Settings::load()?;
    init_logging(cli.verbose, &settings.log);
    debug!(?settings, "loaded settings");

    let is_tty = io::stdout().is_terminal();
    let format = OutputFormat::resolve(cli.format, settings.default_format()?, is_tty);

    let home = home_dir()?;
    let cwd = std::env::current_dir().map_err(|e| DeetsError::IoError {
        path: ".".into(),
        source: e,
    })?;

    let ctx = Context {
        paths: Paths::resolve(&home, &cwd, settings.dir.as_deref()),
        format,
        explicit_format: cli.format.is_some(),
        quiet: cli.quiet,
        local: cli.local,
        editor: editor(),
    };

    let action = read_stdin_value(cli.into_action())?;
    let outcome = handle(&ctx, &action)?;
    print_outcome(&outcome);
    Ok(())
}

fn init_logging(verbose: bool, directive: &str) {
    let parsed = EnvFilter::try_new(directive);
    let invalid = parsed.is_err();
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        parsed.unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    if let Err(e) = install_subscriber(filter) {
        eprintln!("Warning: logging disabled: {e}");
        return;
    }
    if invalid {
        warn!(directive, "invalid log filter, falling back to warn");
    }
}

fn install_subscriber(filter: EnvFilter) -> Result<(), SetGlobalDefaultError> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
}

/// `$EDITOR`, then `$VISUAL`, then `vi`.
fn editor() -> String {
    ["EDITOR", "VISUAL"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| "vi".to_string())
}

/// Replace a stdin value source with what was piped in. Refuses to block on
/// an interactive terminal.
fn read_stdin_value(action: Action) -> Result<Action, DeetsError> {
    let path = match action {
        Action::Set {
            path,
            value: ValueSource::Stdin,
        } => path,
        other => return Ok(other),
    };

    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Err(DeetsError::InvalidValue {
            key: path,
            reason: "value argument required (or pipe from stdin)".into(),
        });
    }

    let mut buf = String::new();
    stdin
        .lock()
        .read_to_string(&mut buf)
        .map_err(|e| DeetsError::IoError {
            path: "<stdin>".into(),
            source: e,
        })?;
    let value = buf.trim_end_matches('\n').to_string();
    Ok(Action::Set {
        path,
        value: ValueSource::Literal(value),
    })
}

fn print_outcome(outcome: &Outcome) {
    let text = outcome.to_string();
    if text.is_empty() {
        return;
    }
    if text.ends_with('\n') {
        print!("{text}");
    } else {
        println!("{text}");
    }
}
