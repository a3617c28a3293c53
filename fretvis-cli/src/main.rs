mod commands;
mod render;

use std::fs::File;
use std::process::ExitCode;

fn init_logging(verbose: bool, to_stderr: bool) {
    use simplelog::*;

    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    if to_stderr {
        if let Err(e) = TermLogger::init(log_level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto) {
            eprintln!("fretvis: logging disabled: {}", e);
        }
        return;
    }

    let log_path = dirs::config_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("fretvis")
        .join("fretvis.log");

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = match File::create(&log_path).or_else(|_| File::create(std::env::temp_dir().join("fretvis.log"))) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("fretvis: cannot create log file: {}", e);
            return;
        }
    };

    if let Err(e) = WriteLogger::init(log_level, Config::default(), log_file) {
        eprintln!("fretvis: logging disabled: {}", e);
        return;
    }

    log::info!("fretvis starting (log level: {:?})", log_level);
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    let to_stderr = args.iter().any(|a| a == "--log-stderr");
    init_logging(verbose, to_stderr);

    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{}", commands::USAGE);
        return ExitCode::SUCCESS;
    }

    let config = fretvis_core::config::Config::load();
    match commands::run(&args, &config) {
        Ok(out) => {
            print!("{}", out);
            if !out.ends_with('\n') {
                println!();
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::warn!("command failed: {}", e);
            eprintln!("fretvis: {}", e);
            ExitCode::FAILURE
        }
    }
}
