mod render;

use std::fs;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use sidediff::{
    compare, CompareConfig, CompareMode, CompareStatus, DocSide, NoProgress, Section, TextBuffer,
};

#[derive(Parser)]
#[command(name = "sidediff")]
#[command(about = "Compare two text files and show differences side by side")]
#[command(version)]
pub struct Cli {
    #[arg(help = "Path to the old/base file")]
    old: String,
    #[arg(help = "Path to the new/changed file")]
    new: String,
    #[arg(long, short, value_enum, default_value = "text", help = "Output format")]
    format: OutputFormat,
    #[arg(long, help = "Only mark lines unique to one side, ignoring order")]
    unique: bool,
    #[arg(long, help = "Ignore ASCII case when comparing")]
    ignore_case: bool,
    #[arg(long, help = "Ignore spaces and tabs when comparing")]
    ignore_whitespace: bool,
    #[arg(long, help = "Disable move detection")]
    no_moves: bool,
    #[arg(long, short, help = "Quiet mode: only report the result")]
    quiet: bool,
}

#[derive(Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let old_bytes = fs::read(&cli.old).with_context(|| format!("reading {}", cli.old))?;
    let new_bytes = fs::read(&cli.new).with_context(|| format!("reading {}", cli.new))?;

    let mut old = TextBuffer::new(old_bytes);
    let mut new = TextBuffer::new(new_bytes);

    let config = CompareConfig {
        ignore_case: cli.ignore_case,
        ignore_whitespace: cli.ignore_whitespace,
        detect_moves: !cli.no_moves,
        old_side: DocSide::A,
        ..Default::default()
    };
    let mode = if cli.unique {
        CompareMode::FindUnique
    } else {
        CompareMode::Full
    };

    let cmp = compare(
        &mut old,
        Section::all(),
        &mut new,
        Section::all(),
        mode,
        &config,
        &mut NoProgress,
        "sidediff",
    )?;

    match cli.format {
        OutputFormat::Json => {
            println!("{}", render::to_json(&cmp, &old, &new)?);
        }
        OutputFormat::Text => match cmp.status {
            CompareStatus::Match => {
                if !cli.quiet {
                    println!("Files match.");
                }
            }
            CompareStatus::Mismatch => {
                if !cli.quiet {
                    print!("{}", render::side_by_side(&old, &new, &cmp.alignment));
                }
            }
            CompareStatus::Cancelled => {}
        },
    }

    Ok(match cmp.status {
        CompareStatus::Match => ExitCode::SUCCESS,
        _ => ExitCode::from(1),
    })
}
