use exprc::diagnostics;
use exprc::interpreter::Value;
use exprc::ir;

use ariadne::{Color, Fmt};
use yansi::Paint;

use std::env;
use std::fs;
use std::io;
use std::process::ExitCode;

const USAGE: &str = "usage: exprc <file> [--run]";

fn main() -> ExitCode {
    let mut run = false;
    let mut filepath = None;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--run" => run = true,
            _ if filepath.is_none() => filepath = Some(arg),
            _ => {
                eprintln!("{USAGE}");
                return ExitCode::FAILURE;
            }
        }
    }
    let Some(filepath) = filepath else {
        eprintln!("{USAGE}");
        return ExitCode::FAILURE;
    };

    let contents = match fs::read_to_string(&filepath) {
        Ok(contents) => contents,
        Err(err) => {
            eprintln!(
                "{} could not read {}: {}",
                Fmt::fg("error:", Color::Red).bold(),
                filepath,
                err
            );
            return ExitCode::FAILURE;
        }
    };

    let result = if run {
        exprc::run(&contents, &mut io::stdout()).map(|value| {
            if value != Value::Unit {
                println!("{value}");
            }
        })
    } else {
        exprc::compile(&contents).map(|compiled| print!("{}", ir::listing(&compiled.instructions)))
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let report = err.to_report(&filepath, &contents);
            if diagnostics::eprint(&report, &filepath, &contents).is_err() {
                eprintln!("{err}");
            }
            ExitCode::FAILURE
        }
    }
}
