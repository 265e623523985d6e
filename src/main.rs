//! `yastjson` command-line tool.
//!
//! Parses a JSON document from a file or stdin and prints one of its stages:
//! the token list, the syntax-tree outline or the materialized value.

use clap::Parser;
use std::fmt;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use yastjson::{materialize, tokenize, JsonValue, ParseError, ParseOptions, TreeBuilder};

#[derive(Parser)]
#[command(name = "yastjson")]
#[command(about = "Parse JSON through a syntax tree and inspect each stage", long_about = None)]
#[command(version)]
struct Cli {
    /// Input file; reads stdin when omitted
    file: Option<PathBuf>,

    /// Print the token list instead of the value
    #[arg(long, conflicts_with = "tree")]
    tokens: bool,

    /// Print the syntax-tree outline instead of the value
    #[arg(long)]
    tree: bool,

    /// Indent the printed value
    #[arg(long)]
    pretty: bool,

    /// Maximum container nesting
    #[arg(long, default_value_t = yastjson::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Anything that fails after the input has been read.
#[derive(Error, Debug)]
enum CliError {
    #[error("{} error: {0}", .0.stage())]
    Parse(#[from] ParseError),
    #[error("render error: value has no JSON representation")]
    Render(#[from] fmt::Error),
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_input(file: Option<&PathBuf>) -> io::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}

fn render(value: &JsonValue, pretty: bool) -> Result<String, CliError> {
    let mut rendered = if pretty {
        value.stringify_pretty()?
    } else {
        value.stringify()?
    };
    rendered.push('\n');
    Ok(rendered)
}

fn run(cli: &Cli, input: &str) -> Result<String, CliError> {
    let options = ParseOptions {
        max_depth: cli.max_depth,
        ..ParseOptions::default()
    };
    options.check_size(input)?;

    let tokens = tokenize(input).map_err(ParseError::from)?;
    if cli.tokens {
        return Ok(tokens.iter().map(|t| format!("{}\n", t)).collect());
    }

    let tree = TreeBuilder::with_max_depth(options.max_depth)
        .build(&tokens)
        .map_err(ParseError::from)?;
    if cli.tree {
        return Ok(tree.to_string());
    }

    let value = materialize(&tree).map_err(ParseError::from)?;
    render(&value, cli.pretty)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let input = match read_input(cli.file.as_ref()) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("yastjson: {}", e);
            return ExitCode::from(2);
        }
    };

    match run(&cli, &input) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("yastjson: {}", e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("yastjson").chain(args.iter().copied()))
    }

    #[test]
    fn test_run_prints_value() {
        assert_eq!(run(&cli(&[]), r#"{"a": [1, true]}"#).unwrap(), "{\"a\":[1,true]}\n");
        assert_eq!(run(&cli(&["--pretty"]), "[]").unwrap(), "[]\n");
    }

    #[test]
    fn test_run_prints_stages() {
        let tokens = run(&cli(&["--tokens"]), "[1]").unwrap();
        assert_eq!(tokens.lines().count(), 3);
        assert!(tokens.starts_with("left bracket `[` at line 1, column 0"));

        let tree = run(&cli(&["--tree"]), "[1]").unwrap();
        assert_eq!(tree, "json\n  array\n    value\n      number 1\n");
    }

    #[test]
    fn test_run_reports_parse_errors() {
        let err = run(&cli(&["--max-depth", "1"]), "[[1]]").unwrap_err();
        assert!(matches!(err, CliError::Parse(ParseError::Syntax(_))));
        assert!(err.to_string().starts_with("build error: "));
    }

    #[test]
    fn test_render_failure_is_an_error() {
        let err = render(&JsonValue::Array(vec![JsonValue::Number(f64::NAN)]), false).unwrap_err();
        assert!(matches!(err, CliError::Render(_)));
        assert!(render(&JsonValue::Number(f64::INFINITY), true).is_err());
    }
}
