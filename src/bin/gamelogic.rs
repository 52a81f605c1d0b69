use std::{
    fs::File,
    io::{BufReader, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use gamelogic::Attributes as _;

#[derive(Parser, Debug)]
#[command(name = "gamelogic", version)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate an expression and print the result as JSON.
    Eval(EvalArgs),
    /// Replay a scripted sequence of mouse frames and print what the facade reports.
    Mouse(MouseArgs),
    /// List the mouse facade's attributes and methods.
    Attrs,
}

#[derive(Parser, Debug)]
struct EvalArgs {
    /// Expression source, e.g. `speed * 2 > 10`.
    expr: String,

    /// Session config JSON providing the identifier context.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Extra binding `NAME=JSON` (repeatable); overrides the config context.
    #[arg(long = "var", value_parser = parse_var)]
    vars: Vec<(String, serde_json::Value)>,
}

#[derive(Parser, Debug)]
struct MouseArgs {
    /// Mouse script JSON.
    #[arg(long)]
    script: PathBuf,

    /// Session config JSON (canvas size, cursor, context).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Eval(args) => cmd_eval(args),
        Command::Mouse(args) => cmd_mouse(args),
        Command::Attrs => cmd_attrs(),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_var(s: &str) -> Result<(String, serde_json::Value), String> {
    let (name, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=JSON, got '{s}'"))?;
    // Bare words that are not JSON are taken as strings.
    let value = serde_json::from_str(raw)
        .unwrap_or_else(|_| serde_json::Value::String(raw.to_owned()));
    Ok((name.to_owned(), value))
}

fn read_config(path: Option<&Path>) -> anyhow::Result<gamelogic::SessionConfig> {
    match path {
        Some(p) => gamelogic::SessionConfig::from_path(p)
            .with_context(|| format!("load session config '{}'", p.display())),
        None => Ok(gamelogic::SessionConfig::default()),
    }
}

fn cmd_eval(args: EvalArgs) -> anyhow::Result<()> {
    let mut config = read_config(args.config.as_deref())?;
    config.context.extend(args.vars);
    let session = gamelogic::LogicSession::new(&config)?;

    let value = session
        .eval(&args.expr)
        .with_context(|| format!("evaluate '{}'", args.expr))?;
    println!("{}", serde_json::to_string(&value)?);
    Ok(())
}

fn cmd_mouse(args: MouseArgs) -> anyhow::Result<()> {
    let config = read_config(args.config.as_deref())?;
    let session = gamelogic::LogicSession::new(&config)?;

    let f = File::open(&args.script)
        .with_context(|| format!("open mouse script '{}'", args.script.display()))?;
    let script = gamelogic::MouseScript::from_reader(BufReader::new(f))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for (i, frame) in script.frames.iter().enumerate() {
        let report = session
            .run_frame(frame)
            .with_context(|| format!("script frame {i}"))?;
        serde_json::to_writer(&mut out, &report)?;
        writeln!(out)?;
    }
    Ok(())
}

fn cmd_attrs() -> anyhow::Result<()> {
    for p in gamelogic::MouseFacade::properties() {
        let mode = if p.is_writable() { "rw" } else { "r " };
        println!("{mode} {:<14} {}", p.name, p.doc);
    }
    for m in gamelogic::MouseFacade::methods() {
        println!("fn {:<14} {}", m.name, m.doc);
    }
    Ok(())
}
