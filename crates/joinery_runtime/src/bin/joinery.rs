//! Joinery CLI entry point.

use std::env;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;

use joinery_runtime::{LineEditor, ReadResult, Repl, Session};
use tracing_subscriber::EnvFilter;

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    config: Option<PathBuf>,
    batch_mode: bool,
    lenient: bool,
    show_help: bool,
    show_version: bool,
}

fn main() -> ExitCode {
    init_logging();
    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("JOINERY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn parse_args(args: Vec<String>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();

    for arg in args.into_iter().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "-b" | "--batch" => config.batch_mode = true,
            "--lenient" => config.lenient = true,
            option if option.starts_with('-') => {
                return Err(format!("unknown option: {option}").into());
            }
            path => {
                if config.config.is_some() {
                    return Err("only one configuration file may be given".into());
                }
                config.config = Some(PathBuf::from(path));
            }
        }
    }

    Ok(config)
}

fn run(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = parse_args(args)?;

    if config.show_help {
        print_help();
        return Ok(());
    }

    if config.show_version {
        println!("joinery {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let Some(path) = config.config else {
        print_help();
        return Err("missing configuration file".into());
    };
    let session = Session::load(&path, config.lenient)?;

    if config.batch_mode {
        return run_batch(session);
    }

    let mut repl = Repl::new(session)?;
    repl.run()?;
    Ok(())
}

fn run_batch(session: Session) -> Result<(), Box<dyn std::error::Error>> {
    let mut repl = Repl::with_editor(StdinEditor(io::stdin().lock()), session)
        .without_banner()
        .with_prompt("");
    repl.run()?;
    Ok(())
}

/// Feeds stdin lines to the REPL without a terminal.
struct StdinEditor<R>(R);

impl<R: BufRead> LineEditor for StdinEditor<R> {
    fn read_line(&mut self, _prompt: &str) -> joinery_foundation::Result<ReadResult> {
        let mut line = String::new();
        if self.0.read_line(&mut line)? == 0 {
            return Ok(ReadResult::Eof);
        }
        Ok(ReadResult::Line(line))
    }

    fn add_history(&mut self, _line: &str) {}

    fn set_keywords(&mut self, _keywords: Vec<String>) {}
}

fn print_help() {
    println!(
        "\x1b[1mJoinery\x1b[0m - Federated queries over composed datasources

\x1b[1mUSAGE:\x1b[0m
    joinery [OPTIONS] <CONFIG>

\x1b[1mARGUMENTS:\x1b[0m
    <CONFIG>      YAML file defining datasources and search templates

\x1b[1mOPTIONS:\x1b[0m
    -h, --help         Print help information
    -V, --version      Print version information
    -b, --batch        Read searches and commands from stdin, one per line
        --lenient      Skip datasources that fail to build

\x1b[1mENVIRONMENT:\x1b[0m
    JOINERY_LOG        Log filter, e.g. debug or joinery_sources=debug (default: warn)

\x1b[1mREPL COMMANDS:\x1b[0m
    <words>                          Search with the configured strategy
    :sources                         List datasources
    :schema <source>                 Show the columns of a datasource
    :find <source> <col>=<pattern>   Query a datasource directly
    :key <source> <key>              Fetch a row by key
    :contents <source>               List every row of a datasource
    Ctrl+D                           Exit REPL"
    );
}
