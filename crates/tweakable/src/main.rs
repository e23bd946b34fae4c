//! `tweak`: inspect and follow annotated literals in source files.

mod commands;

use std::process::ExitCode;
use std::time::Duration;

use tweakable::TweakableConfig;

fn print_usage() {
    eprintln!("Usage: tweak <command> [options] <file>...");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  scan     Print the macro alias and every annotated literal");
    eprintln!("  watch    Rescan files whenever they change");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --sentinel=<NAME>   Annotation macro name (default: $TWEAKABLE_SENTINEL or TWEAKABLE)");
    eprintln!("  --interval=<MS>     Poll interval for watch (default: 250)");
}

fn main() -> ExitCode {
    tweakable::init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        return ExitCode::FAILURE;
    }
    if matches!(args[1].as_str(), "help" | "--help" | "-h") {
        print_usage();
        return ExitCode::SUCCESS;
    }

    let mut config = TweakableConfig::from_env();
    let mut interval = Duration::from_millis(250);
    let mut files = Vec::new();
    for arg in args.iter().skip(2) {
        if let Some(name) = arg.strip_prefix("--sentinel=") {
            config = config.with_sentinel(name);
        } else if let Some(ms) = arg.strip_prefix("--interval=") {
            let Ok(ms) = ms.parse() else {
                eprintln!("error: invalid interval '{ms}'");
                return ExitCode::FAILURE;
            };
            interval = Duration::from_millis(ms);
        } else if arg.starts_with('-') {
            eprintln!("error: unknown option '{arg}'");
            return ExitCode::FAILURE;
        } else {
            files.push(arg.as_str());
        }
    }

    if files.is_empty() {
        eprintln!("error: missing file path");
        print_usage();
        return ExitCode::FAILURE;
    }

    match args[1].as_str() {
        "scan" => commands::scan_files(&files, &config),
        "watch" => commands::watch_files(&files, &config, interval),
        other => {
            eprintln!("error: unknown command '{other}'");
            print_usage();
            ExitCode::FAILURE
        }
    }
}
