//! Monkey CLI: run scripts, evaluate one-liners, benchmark the engines, or
//! start the REPL.

use std::env;
use std::fs;
use std::process;
use std::time::Instant;

use colored::Colorize;

use monkey_lang::{repl, ExecutionMode};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The reference benchmark workload: naive recursive fibonacci.
const BENCHMARK_PROGRAM: &str = "
let fibonacci = fn(x) {
    if (x == 0) {
        0
    } else {
        if (x == 1) {
            return 1;
        } else {
            fibonacci(x - 1) + fibonacci(x - 2);
        }
    }
};
fibonacci(35);
";

/// CLI command to execute.
enum Command {
    /// Start the REPL.
    Repl,
    /// Run a script file.
    Run { file: String },
    /// Evaluate a string.
    Eval { code: String },
    /// Time the built-in workload on one engine.
    Benchmark,
}

/// CLI options parsed from arguments.
struct Options {
    command: Command,
    engine: ExecutionMode,
    disassemble: bool,
}

fn print_usage() {
    eprintln!("Monkey {} - The Monkey programming language", VERSION);
    eprintln!();
    eprintln!("Usage: monkey [options] [script]");
    eprintln!("       monkey -e <code>");
    eprintln!("       monkey benchmark [-engine=vm|eval]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  benchmark       Run the built-in fibonacci workload and report timing");
    eprintln!("  -e <code>       Evaluate code and print the result");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -engine=vm|eval Select the execution engine (default: vm)");
    eprintln!("  --disassemble   Print the compiled bytecode before running");
    eprintln!("  --help, -h      Show this help message");
    eprintln!();
    eprintln!("With no arguments, monkey starts an interactive REPL.");
}

fn parse_args() -> Options {
    let mut command = None;
    let mut engine = ExecutionMode::Bytecode;
    let mut disassemble = false;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            "-engine=vm" | "--engine=vm" => engine = ExecutionMode::Bytecode,
            "-engine=eval" | "--engine=eval" => engine = ExecutionMode::TreeWalk,
            "--disassemble" => disassemble = true,
            "-e" => {
                let Some(code) = args.next() else {
                    eprintln!("error: -e requires an argument");
                    process::exit(1);
                };
                command = Some(Command::Eval { code });
            }
            "benchmark" => command = Some(Command::Benchmark),
            _ if arg.starts_with('-') => {
                eprintln!("error: unknown option '{}'", arg);
                print_usage();
                process::exit(1);
            }
            _ => command = Some(Command::Run { file: arg }),
        }
    }

    Options {
        command: command.unwrap_or(Command::Repl),
        engine,
        disassemble,
    }
}

fn main() {
    let options = parse_args();

    match &options.command {
        Command::Repl => {
            if let Err(err) = repl::start() {
                eprintln!("{} {}", "repl error:".red(), err);
                process::exit(1);
            }
        }
        Command::Run { file } => {
            let source = fs::read_to_string(file).unwrap_or_else(|err| {
                eprintln!("error: could not read '{}': {}", file, err);
                process::exit(1);
            });
            run_source(&source, &options);
        }
        Command::Eval { code } => run_source(code, &options),
        Command::Benchmark => benchmark(options.engine),
    }
}

fn run_source(source: &str, options: &Options) {
    if options.disassemble {
        match monkey_lang::disassemble(source) {
            Ok(listing) => {
                println!("{}", listing);
                println!("---");
            }
            Err(err) => {
                eprintln!("{}", err.to_string().red());
                process::exit(1);
            }
        }
    }

    match monkey_lang::execute(source, options.engine) {
        Ok(result) => println!("{}", result),
        Err(err) => {
            eprintln!("{}", err.to_string().red());
            process::exit(1);
        }
    }
}

/// Time only the execution phase, the way the reference harness does:
/// parsing and compilation happen before the clock starts.
fn benchmark(engine: ExecutionMode) {
    let engine_name = match engine {
        ExecutionMode::Bytecode => "vm",
        ExecutionMode::TreeWalk => "eval",
    };

    let program = match monkey_lang::parse(BENCHMARK_PROGRAM) {
        Ok(program) => program,
        Err(errors) => {
            for err in errors {
                eprintln!("{}", err);
            }
            process::exit(1);
        }
    };

    let (result, duration) = match engine {
        ExecutionMode::Bytecode => {
            let mut compiler = monkey_lang::compiler::Compiler::new();
            if let Err(err) = compiler.compile(&program) {
                eprintln!("compiler error: {}", err);
                process::exit(1);
            }
            let mut vm = monkey_lang::vm::Vm::new(compiler.bytecode());

            let start = Instant::now();
            match vm.run() {
                Ok(result) => (result, start.elapsed()),
                Err(err) => {
                    eprintln!("vm error: {}", err);
                    process::exit(1);
                }
            }
        }
        ExecutionMode::TreeWalk => {
            let mut interpreter = monkey_lang::interpreter::Interpreter::new();

            let start = Instant::now();
            match interpreter.interpret(&program) {
                Ok(result) => (result, start.elapsed()),
                Err(err) => {
                    eprintln!("runtime error: {}", err);
                    process::exit(1);
                }
            }
        }
    };

    println!(
        "engine={}, result={}, duration={:?}",
        engine_name, result, duration
    );
}
