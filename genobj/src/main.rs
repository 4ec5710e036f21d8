mod script;

use clap::Parser as ClapParser;
use std::{
    fs,
    io::{self, Write},
    process,
};

use genobj::{CachePolicy, RegistryCreateInfo};

use script::{Session, format_result};

#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Scripts to execute in order
    #[arg(required = false, help = "The scripts to execute")]
    files: Vec<String>,

    /// Start REPL after executing files (default if no files)
    #[arg(long, help = "Force REPL mode after file execution")]
    repl: bool,

    /// Re-check the allow-list every time a cached accessor runs
    #[arg(long, help = "Revalidate cached accessors against allow-lists")]
    revalidate: bool,

    /// -v for debug, -vv for trace. RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cache_policy = if cli.revalidate {
        CachePolicy::Revalidate
    } else {
        CachePolicy::Permanent
    };
    let mut session = Session::new(RegistryCreateInfo {
        cache_policy,
        ..Default::default()
    });

    for filename in &cli.files {
        let source = match fs::read_to_string(filename) {
            Ok(content) => content,
            Err(err) => {
                eprintln!("Error reading file '{}': {}", filename, err);
                process::exit(1);
            }
        };

        match session.execute_source(&source) {
            Ok(results) => {
                for value in &results {
                    println!("{}", format_result(value));
                }
            }
            Err(err) => {
                eprintln!("Error executing {}: {}", filename, err);
                process::exit(1);
            }
        }
    }

    if cli.repl || cli.files.is_empty() {
        run_repl(&mut session);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(level),
    )
    .init();
}

fn run_repl(session: &mut Session) {
    println!("genobj REPL");
    println!("Type 'exit' to quit.");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut input_buffer = String::new();

    loop {
        print!("> ");
        if let Err(err) = stdout.flush() {
            eprintln!("Error flushing stdout: {}", err);
            break;
        }

        input_buffer.clear();
        match stdin.read_line(&mut input_buffer) {
            Ok(0) => break,
            Ok(_) => {
                let input = input_buffer.trim();
                if input == "exit" {
                    break;
                }
                match session.execute_line(input) {
                    Ok(Some(value)) => println!("{}", format_result(&value)),
                    Ok(None) => {}
                    Err(err) => eprintln!("Error: {}", err),
                }
            }
            Err(err) => {
                eprintln!("Error reading input: {}", err);
                break;
            }
        }
    }
}
