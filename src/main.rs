// steptrace: execution tracer with expression highlights

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use steptrace::interpreter::constants::{DEFAULT_MAX_CALL_DEPTH, DEFAULT_MAX_STEPS};
use steptrace::output::{render_text, Marking};
use steptrace::ui::App;
use steptrace::{trace_source, Trace, TraceConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Program to trace
    file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Replay the trace in an interactive terminal viewer
    #[arg(long)]
    tui: bool,

    /// Abort once the trace would grow past this many steps
    #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
    max_steps: usize,

    /// Deepest allowed nesting of user function calls
    #[arg(long, default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    max_call_depth: usize,

    /// Log more (-v info, -vv debug, -vvv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_tui(trace: Trace, source: String) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(trace, source);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.context("terminal replay failed")
}

fn run(cli: Cli) -> Result<()> {
    let source = fs::read_to_string(&cli.file)
        .with_context(|| format!("failed to read {}", cli.file.display()))?;

    let config = TraceConfig::default()
        .with_max_steps(cli.max_steps)
        .with_max_call_depth(cli.max_call_depth);
    debug!(?config, "trace configuration");

    info!(file = %cli.file.display(), "tracing");
    let trace = trace_source(&source, config)
        .with_context(|| format!("failed to trace {}", cli.file.display()))?;
    info!(steps = trace.len(), ids = trace.sources.len(), "trace complete");

    if cli.tui {
        return run_tui(trace, source);
    }

    let mut stdout = io::stdout().lock();
    match cli.format {
        Format::Json => {
            serde_json::to_writer_pretty(&mut stdout, &trace)
                .context("failed to serialize trace")?;
            writeln!(stdout)?;
        }
        Format::Text => {
            let marking = if stdout.is_terminal() {
                Marking::Styled
            } else {
                Marking::Brackets
            };
            stdout.write_all(render_text(&trace, marking).as_bytes())?;
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
