//! The `scan` and `watch` commands.

use std::fs;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use tracing::debug;
use tweak_scan::{find_alias, CallSiteScanner, ScanError, SourceBuffer};
use tweak_watch::FileWatcher;
use tweakable::TweakableConfig;

/// Lines printed for one file: the macro name in use, then one line per
/// call-site.
pub fn report(file: &str, source: &str, sentinel: &str) -> Result<Vec<String>, ScanError> {
    let alias = find_alias(source, sentinel);
    let name = alias.unwrap_or(sentinel);
    let mut lines = vec![match alias {
        Some(alias) => format!("{file}: {alias} aliases {sentinel}"),
        None => format!("{file}: no alias, looking for {sentinel}"),
    }];

    let buffer = SourceBuffer::new(source);
    for site in CallSiteScanner::new(&buffer, name, file) {
        let site = site?;
        lines.push(format!("{file}:{}: {}", site.line, site.text));
    }
    Ok(lines)
}

/// Print the report of one file. Returns `false` on a read or scan error.
fn scan_file(file: &str, sentinel: &str) -> bool {
    let source = match fs::read(file) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(err) => {
            eprintln!("error: can't read {file}: {err}");
            return false;
        }
    };
    match report(file, &source, sentinel) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
            true
        }
        Err(err) => {
            eprintln!("error: {err}");
            false
        }
    }
}

pub fn scan_files(files: &[&str], config: &TweakableConfig) -> ExitCode {
    let mut ok = true;
    for file in files {
        ok &= scan_file(file, config.sentinel());
    }
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Scan every file once, then rescan each one whenever its watcher reports
/// a change. Runs until interrupted.
pub fn watch_files(files: &[&str], config: &TweakableConfig, interval: Duration) -> ExitCode {
    let mut watchers: Vec<(&str, FileWatcher)> = files
        .iter()
        .map(|&file| (file, FileWatcher::new(file, config.watch_flags())))
        .collect();

    for &(file, _) in &watchers {
        scan_file(file, config.sentinel());
    }

    loop {
        thread::sleep(interval);
        for (file, watcher) in &mut watchers {
            if watcher.has_changed() {
                debug!("{file} changed");
                scan_file(file, config.sentinel());
            }
        }
    }
}
