//! Interactive read-eval-print loop.
//!
//! Each submission is compiled and run on the VM. The symbol table,
//! constant pool, and globals thread across submissions, so definitions
//! from earlier lines stay visible. Parse errors print with a banner and
//! the session continues.

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::compiler::Compiler;
use crate::error::ParserError;
use crate::interpreter::Value;
use crate::parser::Parser;
use crate::vm::{Vm, GLOBALS_SIZE};

const PROMPT: &str = ">> ";
const HISTORY_FILE: &str = ".monkey_history";

pub fn start() -> rustyline::Result<()> {
    let mut rl = DefaultEditor::new()?;
    let history_path = dirs::home_dir().map(|home| home.join(HISTORY_FILE));
    if let Some(path) = &history_path {
        let _ = rl.load_history(path);
    }

    println!("{}", "Monkey programming language".bold());
    println!("Type in commands; press Ctrl-D to exit.\n");

    // State threaded across submissions.
    let (mut symbol_table, mut constants) = Compiler::new().into_state();
    let mut globals = vec![Value::Null; GLOBALS_SIZE];

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());

                let mut parser = Parser::from_source(&line);
                let program = parser.parse();
                if !parser.errors().is_empty() {
                    print_parser_errors(parser.errors());
                    continue;
                }

                let mut compiler = Compiler::with_state(symbol_table, constants);
                if let Err(err) = compiler.compile(&program) {
                    eprintln!("{} {}", "compile error:".red(), err);
                    (symbol_table, constants) = compiler.into_state();
                    continue;
                }

                let bytecode = compiler.bytecode();
                (symbol_table, constants) = compiler.into_state();

                let mut vm = Vm::with_globals(bytecode, globals);
                let outcome = vm.run();
                globals = vm.into_globals();

                match outcome {
                    Ok(result) => println!("{}", result),
                    Err(err) => eprintln!("{} {}", "runtime error:".red(), err),
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("readline error: {}", err);
                break;
            }
        }
    }

    if let Some(path) = &history_path {
        let _ = rl.save_history(path);
    }

    Ok(())
}

fn print_parser_errors(errors: &[ParserError]) {
    eprintln!("{}", "Woops! Parsing failed:".red().bold());
    for err in errors {
        eprintln!("  {}", err);
    }
}
