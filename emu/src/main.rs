use std::process::ExitCode;

use clap::Parser;
use color_print::cprintln;
use tracing_subscriber::EnvFilter;

use dkasm::{assembler, msg::Msg, parser::Source};
use dkemu::{
    error::RuntimeError,
    hooks::{dump::Dump, serial::Serial, Hook},
    model::Machine,
    xxd::xxd,
};

#[derive(Parser, Debug)]
#[clap(
    name = "DK8 Emulator",
    author,
    version,
    about = "Emulator for the DK8 desk computer"
)]
struct Args {
    /// Assembly source
    #[arg(default_value = "main.dk")]
    input_file: String,

    /// Runtime input text read by `in`
    #[arg(short, long, conflicts_with = "input_path")]
    input: Option<String>,

    /// Read runtime input from a file
    #[arg(short = 'f', long = "input-file")]
    input_path: Option<String>,

    /// Maximum number of steps
    #[arg(short = 't', long)]
    tmax: Option<u64>,

    /// YAML file: pc -> { regs, memory }
    #[arg(short, long)]
    dump_cfg: Option<String>,

    /// Dump registers after every step
    #[arg(short = 'a', long)]
    dump_all: bool,

    /// Styled serial output
    #[arg(short, long)]
    style: bool,

    /// Print the final state as YAML
    #[arg(short, long)]
    yaml: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    println!("DK8 Emulator");

    println!("+-----------------------------------------------+");
    println!("| {:<45} |", args.input_file);
    println!("+-----------------------------------------------+");

    // ------------------------------------------------------------------------
    // Assemble
    let text = match std::fs::read_to_string(&args.input_file) {
        Ok(text) => text,
        Err(err) => {
            Msg::Error(format!("Failed to open file `{}`: {}", args.input_file, err)).print();
            return ExitCode::FAILURE;
        }
    };
    let src = Source::parse(&args.input_file, &text);
    if src.has_error() {
        for (line, err) in src.errors() {
            Msg::Error(err.to_string()).diag(line.info(&src.path));
        }
        return ExitCode::FAILURE;
    }
    let program = match assembler::assemble(&src.stmts()) {
        Ok(program) => program,
        Err(err) => {
            Msg::Error(err.to_string()).print();
            return ExitCode::FAILURE;
        }
    };

    let input = match (&args.input, &args.input_path) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                Msg::Error(format!("Failed to open file `{}`: {}", path, err)).print();
                return ExitCode::FAILURE;
            }
        },
        (None, None) => String::new(),
    };

    // ------------------------------------------------------------------------
    // Initialize machine
    let mut machine = Machine::new();
    machine.reset(&program, &input);

    // ------------------------------------------------------------------------
    // Initialize hooks
    println!("[INIT]");
    let dump = match Dump::arg(args.dump_cfg, args.dump_all) {
        Ok(dump) => dump,
        Err(err) => {
            Msg::Error(err.to_string()).print();
            return ExitCode::FAILURE;
        }
    };
    let mut hooks: Vec<Box<dyn Hook>> = vec![Box::new(dump), Box::new(Serial::arg(args.style))];
    for hook in hooks.iter_mut() {
        hook.init(&machine);
    }

    // ------------------------------------------------------------------------
    // Main loop
    println!("[RUN]");
    let mut code = ExitCode::SUCCESS;
    for time in 0..args.tmax.unwrap_or(u64::MAX) {
        match machine.step() {
            Ok((pc, word)) => {
                for hook in hooks.iter_mut() {
                    hook.exec(time, pc, word, &machine);
                }
            }
            // running off the end is how a program stops
            Err(err @ RuntimeError::OutOfProgram { .. }) => {
                println!();
                Msg::Note(format!("{} after {} step(s)", err, time)).print();
                break;
            }
            Err(err) => {
                println!();
                Msg::Error(err.to_string()).print();
                code = ExitCode::FAILURE;
                break;
            }
        }
    }

    // ------------------------------------------------------------------------
    // Exit
    println!("=================================================");
    cprintln!("<s>output</> ({} byte(s))", machine.output().len());
    print!("{}", xxd(machine.output()));

    if args.yaml {
        match serde_yaml::to_string(&machine.snapshot()) {
            Ok(yaml) => print!("{}", yaml),
            Err(err) => {
                Msg::Error(err.to_string()).print();
                code = ExitCode::FAILURE;
            }
        }
    }
    code
}
