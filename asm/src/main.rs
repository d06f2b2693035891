use std::collections::HashMap;
use std::process::ExitCode;

use clap::Parser;
use color_print::cprintln;
use tracing_subscriber::EnvFilter;

use dkasm::{
    assembler,
    label::Labels,
    msg::Msg,
    parser::{Line, Source, Stmt},
    util,
};

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {author}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input file
    #[clap(default_value = "main.dk")]
    input: String,

    /// Dump assembly listing
    #[clap(short, long)]
    dump: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    println!("DK8 Assembler");

    println!("1. Read File and Parse Lines");
    println!("  < {}", args.input);
    let text = match std::fs::read_to_string(&args.input) {
        Ok(text) => text,
        Err(err) => {
            Msg::Error(format!("Failed to open file `{}`: {}", args.input, err)).print();
            return ExitCode::FAILURE;
        }
    };
    let src = Source::parse(&args.input, &text);

    let mut failed = false;
    for (line, err) in src.errors() {
        Msg::Error(err.to_string()).diag(line.info(&src.path));
        failed = true;
    }

    // Collect label definitions for redefinition warnings
    let mut defined: HashMap<&str, &Line> = HashMap::new();
    for line in &src.lines {
        for stmt in line.stmts.iter().flatten() {
            if let Stmt::Label(key) = stmt {
                if let Some(prev) = defined.insert(key, line) {
                    Msg::Warn(format!("Re-defined label: `{}`", key)).diag(line.info(&src.path));
                    Msg::Note("Already defined here. The later definition wins.".to_string())
                        .diag(prev.info(&src.path));
                }
            }
        }
    }

    println!("2. Resolve Labels");
    let stmts = src.stmts();
    let labels = Labels::collect(&stmts);
    let program = match assembler::resolve(&stmts, &labels) {
        Ok(program) => Some(program),
        Err(err) => {
            Msg::Error(err.to_string()).print();
            failed = true;
            None
        }
    };

    if args.dump {
        util::print_dump(&src, &labels);
    }

    match program {
        Some(program) if !failed => {
            cprintln!(
                "<g,s>Assembled</> {} word(s), {} label(s)",
                program.len(),
                labels.len()
            );
            ExitCode::SUCCESS
        }
        _ => ExitCode::FAILURE,
    }
}
