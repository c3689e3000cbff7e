//! sldlog CLI: an interactive shell and a compiler to the raw format.

use std::error::Error;
use std::fs::{self, File};
use std::io::BufWriter;

use sldlog::parser::parse_file;
use sldlog::raw;
use sldlog::repl::Repl;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: sldlog [--log-level <filter>] [shell [files...] | compile <input> [-o <output>]]";

fn main() {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let log_level = take_option(&mut args, &["--log-level", "-l"]);
    init_logging(log_level);

    let result = match args.first().map(String::as_str) {
        None => shell(&[]),
        Some("shell" | "s") => shell(&args[1..]),
        Some("compile" | "c") => compile(&mut args[1..].to_vec()),
        Some("-h" | "--help" | "help") => {
            println!("{}", USAGE);
            Ok(())
        }
        Some(other) => Err(format!("unknown command: {}\n{}", other, USAGE).into()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(filter: Option<String>) {
    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Remove `name value` from `args`, returning the value.
fn take_option(args: &mut Vec<String>, names: &[&str]) -> Option<String> {
    let pos = args.iter().position(|a| names.contains(&a.as_str()))?;
    args.remove(pos);
    (pos < args.len()).then(|| args.remove(pos))
}

fn shell(files: &[String]) -> Result<(), Box<dyn Error>> {
    let mut repl = Repl::new();
    for path in files {
        repl.load_file(path)?;
    }
    repl.run()?;
    Ok(())
}

fn compile(args: &mut Vec<String>) -> Result<(), Box<dyn Error>> {
    let output = take_option(args, &["-o", "--outfile"]).unwrap_or_else(|| "out.P".to_string());
    let input = args.first().ok_or_else(|| format!("compile needs an input file\n{}", USAGE))?;

    let source = fs::read_to_string(input).map_err(|e| format!("cannot read {}: {}", input, e))?;
    let statements = parse_file(&source)?;
    let file = File::create(&output).map_err(|e| format!("cannot create {}: {}", output, e))?;
    raw::serialize(&statements, BufWriter::new(file))?;
    tracing::info!("compiled {} statements from {} to {}", statements.len(), input, output);
    Ok(())
}
