use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use woke::{Consent, Error, EvalConfig, RunOptions, SourceFile};

/// Run WokeLang programs: a gentle, consent-aware scripting language.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Program file to run.
    #[arg(required_unless_present = "eval", conflicts_with = "eval")]
    file: Option<PathBuf>,

    /// Run the given source text instead of a file.
    #[arg(short, long, value_name = "SOURCE")]
    eval: Option<String>,

    /// Print the token stream and stop.
    #[arg(long, conflicts_with = "ast")]
    tokens: bool,

    /// Print the syntax tree as JSON and stop.
    #[arg(long)]
    ast: bool,

    /// Report errors as JSON on stderr.
    #[arg(long)]
    json: bool,

    /// Refuse every permission requested with `only if okay`.
    #[arg(long, conflicts_with = "ask_consent")]
    deny_consent: bool,

    /// Ask before granting each permission requested with `only if okay`.
    #[arg(long)]
    ask_consent: bool,

    /// Deepest allowed chain of nested function calls.
    #[arg(long, value_name = "N", default_value_t = EvalConfig::default().max_call_depth)]
    max_call_depth: usize,

    /// More diagnostic logging on stderr (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Why the driver stopped early.
#[derive(Debug, thiserror::Error)]
enum Failure {
    /// The program itself failed to lex, parse or run.
    #[error(transparent)]
    Program(#[from] Error),
    #[error("failed to serialize syntax tree: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Failure {
    /// 1 when the program is at fault, 2 when the driver is.
    fn status(&self) -> u8 {
        match self {
            Self::Program(_) => 1,
            Self::Serialize(_) => 2,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let (name, source) = match (&args.eval, &args.file) {
        (Some(source), _) => ("<eval>".to_string(), source.clone()),
        (None, Some(path)) => match fs::read_to_string(path) {
            Ok(source) => (path.display().to_string(), source),
            Err(err) => {
                eprintln!("Failed to read '{}': {err}", path.display());
                return ExitCode::from(2);
            }
        },
        // clap rejects this combination
        (None, None) => return ExitCode::from(2),
    };

    let result = if args.tokens {
        dump_tokens(&name, &source)
    } else if args.ast {
        dump_ast(&name, &source)
    } else {
        let options = RunOptions {
            config: EvalConfig {
                echo: true,
                max_call_depth: args.max_call_depth,
            },
            consent: consent_mode(&args),
        };
        woke::run_source(&name, &source, &options)
            .map(|_| ())
            .map_err(Failure::from)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            match &failure {
                Failure::Program(err) => report(err, args.json),
                Failure::Serialize(_) => eprintln!("{failure}"),
            }
            ExitCode::from(failure.status())
        }
    }
}

fn consent_mode(args: &Args) -> Consent {
    if args.deny_consent {
        Consent::Deny
    } else if args.ask_consent {
        Consent::Ask
    } else {
        Consent::Grant
    }
}

fn dump_tokens(name: &str, source: &str) -> Result<(), Failure> {
    let source_file = SourceFile::new(name, source);
    for token in woke::tokens(&source_file)? {
        println!("{}\t{}", token.span, token.kind);
    }
    Ok(())
}

fn dump_ast(name: &str, source: &str) -> Result<(), Failure> {
    let source_file = SourceFile::new(name, source);
    let program = woke::parse(&source_file)?;
    println!("{}", serde_json::to_string_pretty(&program)?);
    Ok(())
}

fn report(err: &Error, json: bool) {
    if json {
        match serde_json::to_string(err) {
            Ok(line) => {
                eprintln!("{line}");
                return;
            }
            Err(ser) => tracing::debug!(error = %ser, "falling back to plain error output"),
        }
    }
    eprintln!("{err}");
    if let Error::Lex(diag) | Error::Parse(diag) = err {
        if !diag.source_line.is_empty() {
            eprintln!("    {}", diag.source_line);
        }
        if let Some(suggestion) = &diag.suggestion {
            eprintln!("    help: {suggestion}");
        }
    }
}

/// Logs go to stderr so they never mix with program output. `RUST_LOG`
/// overrides the level picked from `-v`.
fn init_tracing(verbosity: u8) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default_level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .with(filter)
        .init();
}
