use clap::{Parser, Subcommand};
use smartscript_lexer::{TokenKind, Tokenizer};
use smartscript_parser::Document;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "smartscript")]
#[command(about = "SmartScript template parser and source reconstructor")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check a template for errors
    Check {
        /// Input template file
        path: String,
    },

    /// Print the canonical reconstruction of a template
    Fmt {
        /// Input template file
        path: String,

        /// Write the result to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Reparse the result and fail if the tree changed
        #[arg(long)]
        verify: bool,
    },

    /// Print the parsed tree as an indented outline
    Tree {
        /// Input template file
        path: String,
    },

    /// Print the token stream, one token per line
    Tokens {
        /// Input template file
        path: String,

        /// Emit whitespace inside tags as tokens
        #[arg(long)]
        keep_whitespace: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Check { path } => cmd_check(&path),
        Command::Fmt {
            path,
            output,
            verify,
        } => cmd_fmt(&path, output.as_deref(), verify),
        Command::Tree { path } => cmd_tree(&path),
        Command::Tokens {
            path,
            keep_whitespace,
        } => cmd_tokens(&path, keep_whitespace),
    }
}

fn read_source(path: &str) -> String {
    let p = Path::new(path);
    if !p.exists() {
        eprintln!("Error: file not found: {path}");
        std::process::exit(1);
    }
    match std::fs::read_to_string(p) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading {path}: {e}");
            std::process::exit(1);
        }
    }
}

fn parse_or_exit(source: &str) -> Document {
    match smartscript_parser::Parser::parse(source) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

fn cmd_check(path: &str) {
    let source = read_source(path);
    parse_or_exit(&source);
    eprintln!("OK: {path}");
}

fn cmd_fmt(path: &str, output: Option<&Path>, verify: bool) {
    let source = read_source(path);
    let doc = parse_or_exit(&source);
    let rebuilt = smartscript_codegen::reconstruct(&doc);

    if verify {
        match smartscript_parser::Parser::parse(&rebuilt) {
            Ok(reparsed) if reparsed == doc => {}
            Ok(_) => {
                eprintln!("Error: reconstructed source of {path} parses to a different tree");
                std::process::exit(1);
            }
            Err(e) => {
                eprintln!("Error: reconstructed source of {path} does not parse: {e}");
                std::process::exit(1);
            }
        }
    }

    match output {
        Some(out) => {
            if let Err(e) = std::fs::write(out, &rebuilt) {
                eprintln!("Error writing {}: {e}", out.display());
                std::process::exit(1);
            }
            eprintln!("Wrote: {}", out.display());
        }
        None => print!("{rebuilt}"),
    }
}

fn cmd_tree(path: &str) {
    let source = read_source(path);
    let doc = parse_or_exit(&source);
    println!("{}", smartscript_codegen::print_tree(&doc));
}

fn cmd_tokens(path: &str, keep_whitespace: bool) {
    let source = read_source(path);
    let mut tokenizer = Tokenizer::new(&source).keep_whitespace(keep_whitespace);

    loop {
        let token = match tokenizer.next_token() {
            Ok(token) => token,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        };
        println!(
            "{}:{}\t{:?}",
            token.span.line, token.span.column, token.kind
        );
        if token.kind == TokenKind::Eof {
            break;
        }
    }
}
