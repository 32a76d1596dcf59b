//! adoc-highlight - classify and highlight AsciiDoc-style markup

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use adoc_highlight::{
    render, span_dump, Classifier, GrammarConfig, RenderOptions, Result,
};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let mut file: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut dump_spans = false;
    let mut options = RenderOptions::default();

    let mut index = 1;
    while index < args.len() {
        match args[index].as_str() {
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            "--version" | "-V" => {
                print_version();
                return Ok(());
            }
            "--spans" => dump_spans = true,
            "--no-color" => options.color = false,
            "--line-numbers" => options.line_numbers = true,
            "--config" => {
                index += 1;
                match args.get(index) {
                    Some(path) => config_path = Some(PathBuf::from(path)),
                    None => {
                        eprintln!("--config needs a path");
                        process::exit(2);
                    }
                }
            }
            arg if arg.starts_with('-') => {
                eprintln!("Unknown option: {}", arg);
                print_usage();
                process::exit(2);
            }
            arg => file = Some(PathBuf::from(arg)),
        }
        index += 1;
    }

    let config = match &config_path {
        Some(path) => GrammarConfig::load_from(path)?,
        None => GrammarConfig::load()?,
    };

    let text = match &file {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let classifier = Classifier::new(&config)?;
    let classification = classifier.classify_all(&text);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if dump_spans {
        out.write_all(span_dump(&text, &classification).as_bytes())?;
    } else {
        render(&mut out, &text, &classification, &options)?;
    }

    Ok(())
}

fn print_usage() {
    println!(
        "adoc-highlight {} - AsciiDoc-style markup highlighter",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("Usage: adoc-highlight [OPTIONS] [FILE]");
    println!();
    println!("Reads FILE (or standard input) and writes it back with ANSI");
    println!("styling per classified span.");
    println!();
    println!("Options:");
    println!("  -h, --help      Show this help message");
    println!("  -V, --version   Show version information");
    println!("      --spans     Dump classified spans instead of rendering");
    println!("      --no-color  Render without ANSI colors");
    println!("      --line-numbers  Prefix lines with their numbers");
    println!("      --config PATH   Load grammar configuration from PATH");
}

fn print_version() {
    println!("adoc-highlight {}", env!("CARGO_PKG_VERSION"));
}
