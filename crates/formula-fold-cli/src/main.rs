use std::io::{Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use formula_fold::{
    auto_format_with_options, detect_mode, fold_with_options, switch_mode_with_options, unfold,
    FoldOptions, Mode,
};

#[derive(Debug, Parser)]
#[command(name = "formula-fold")]
#[command(about = "Fold Excel formulas into indented, highlightable text and unfold them back.")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fold a single-line formula.
    Fold(FoldArgs),
    /// Unfold folded text back to a single-line formula.
    Unfold(UnfoldArgs),
    /// Fold a single-line formula, unfold multi-line input, pass other text through.
    Auto(FoldArgs),
    /// Re-fold text from one mode into another.
    Switch(SwitchArgs),
    /// Print the id of the mode that produced the input.
    Detect(DetectArgs),
    /// List the available modes.
    Modes,
}

#[derive(Debug, Parser)]
struct FoldArgs {
    /// Mode id or alias (`j`, `a`, `p`, `c`, `py`, `css`).
    #[arg(long)]
    mode: String,

    /// Optional input file path. If omitted, reads from stdin.
    #[arg(long)]
    input: Option<PathBuf>,

    /// JSON file with layout options (e.g. `{"inlineWidth": 60}`).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Parser)]
struct UnfoldArgs {
    /// Mode id or alias the input was folded in.
    #[arg(long)]
    mode: String,

    /// Optional input file path. If omitted, reads from stdin.
    #[arg(long)]
    input: Option<PathBuf>,
}

#[derive(Debug, Parser)]
struct SwitchArgs {
    /// Mode the input is currently folded in.
    #[arg(long)]
    from: String,

    /// Mode to re-fold into.
    #[arg(long)]
    to: String,

    /// Optional input file path. If omitted, reads from stdin.
    #[arg(long)]
    input: Option<PathBuf>,

    /// JSON file with layout options.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Parser)]
struct DetectArgs {
    /// Optional input file path. If omitted, reads from stdin.
    #[arg(long)]
    input: Option<PathBuf>,
}

fn read_all_input(input: &Option<PathBuf>) -> Result<String> {
    if let Some(path) = input {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    } else {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        Ok(buf)
    }
}

fn load_options(config: &Option<PathBuf>) -> Result<FoldOptions> {
    let Some(path) = config else {
        return Ok(FoldOptions::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid config {}", path.display()))
}

fn modes_listing() -> String {
    Mode::all()
        .iter()
        .map(|mode| {
            let mut line = format!("{:<4}{}", mode.id(), mode.display_name());
            if !mode.aliases().is_empty() {
                line.push_str(&format!(" (aliases: {})", mode.aliases().join(", ")));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write `text` and a trailing newline to stdout. A closed pipe (`formula-fold ... | head`) is not
/// an error.
fn write_output(text: &str) -> Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    match writeln!(handle, "{text}").and_then(|()| handle.flush()) {
        Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
        other => other.context("failed to write to stdout"),
    }
}

fn run(cli: Cli) -> Result<String> {
    let output = match cli.command {
        Command::Fold(args) => {
            let options = load_options(&args.config)?;
            let formula = read_all_input(&args.input)?;
            fold_with_options(&args.mode, &formula, &options)?
        }
        Command::Unfold(args) => {
            let text = read_all_input(&args.input)?;
            unfold(&args.mode, &text)?
        }
        Command::Auto(args) => {
            let options = load_options(&args.config)?;
            let text = read_all_input(&args.input)?;
            auto_format_with_options(&args.mode, &text, &options)?
        }
        Command::Switch(args) => {
            let options = load_options(&args.config)?;
            let text = read_all_input(&args.input)?;
            switch_mode_with_options(&text, &args.from, &args.to, &options)?
        }
        Command::Detect(args) => {
            let text = read_all_input(&args.input)?;
            match detect_mode(&text) {
                Some(mode) => mode.id().to_string(),
                None => anyhow::bail!("could not detect the mode of the input"),
            }
        }
        Command::Modes => modes_listing(),
    };
    Ok(output)
}

fn main() -> Result<()> {
    let output = run(Cli::parse())?;
    write_output(&output)
}
