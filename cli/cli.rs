use comms_core::{
    BackupStore, CliArgs, Command as CoreCommand, CommsArgs, Config, FileStatus, PreserveSet,
    ProcessOptions, ScanStats, create_demo_files, find_files, process_files,
};
mod interaction;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use console::style;
use std::io;
use std::process::ExitCode;

fn print_completions_cli(shell: clap_complete::Shell) {
    let mut cmd = CliArgs::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
}

fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{size:.1}{unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.1}TB")
}

fn main() -> Result<ExitCode> {
    let cli: CliArgs = CliArgs::parse();

    if let Some(command) = cli.command {
        match command {
            CoreCommand::Completion(args) => {
                print_completions_cli(args.shell);
                return Ok(ExitCode::SUCCESS);
            }
        }
    }

    let opts = cli.main_opts;

    let config = match Config::load(&opts.path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", style(format!("Setup error: {}", e)).red());
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut user_patterns = config.preserve_patterns.clone();
    user_patterns.extend(opts.preserve.iter().cloned());
    let preserve = match PreserveSet::build(
        &user_patterns,
        opts.override_defaults || config.override_defaults,
    ) {
        Ok(preserve) => preserve,
        Err(e) => {
            eprintln!("{}", style(format!("Setup error: {}", e)).red());
            return Ok(ExitCode::FAILURE);
        }
    };

    let backup_override = opts.backup_dir.clone().or_else(|| config.backup_dir.clone());
    let store = match BackupStore::open(&opts.path, backup_override.as_deref()) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("{}", style(format!("Backup store error: {}", e)).red());
            return Ok(ExitCode::FAILURE);
        }
    };

    if opts.show_config {
        return Ok(show_config(&preserve, &store));
    }
    if opts.demo {
        return Ok(run_demo(&opts));
    }
    if opts.undo {
        return run_undo(store, &opts);
    }
    run_scan(&opts, store, &preserve)
}

fn show_config(preserve: &PreserveSet, store: &BackupStore) -> ExitCode {
    println!("Preserve patterns ({}):", preserve.patterns().len());
    for pattern in preserve.patterns() {
        println!(
            "  {} {}",
            style(format!("{}:", pattern.description)).cyan(),
            pattern.regex.as_str()
        );
    }
    println!("Backup store: {}", style(store.root().display()).dim());
    println!("Extra patterns load from {} next to the target.", comms_core::config::CONFIG_FILE_NAME);
    ExitCode::SUCCESS
}

fn run_demo(opts: &CommsArgs) -> ExitCode {
    if !opts.path.exists() {
        eprintln!(
            "{}",
            style(format!("Path not found: {}", opts.path.display())).red()
        );
        return ExitCode::FAILURE;
    }
    match create_demo_files(&opts.path) {
        Ok(demo_dir) => {
            println!("Demo files created in: {}", style(demo_dir.display()).green());
            println!("Run 'comms {}' to try the tool.", demo_dir.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", style(format!("Error creating demo files: {}", e)).red());
            ExitCode::FAILURE
        }
    }
}

fn run_undo(mut store: BackupStore, opts: &CommsArgs) -> Result<ExitCode> {
    let count = store.backup_count();
    if count == 0 {
        println!("No backups found at {}. Nothing to restore.", store.root().display());
        return Ok(ExitCode::SUCCESS);
    }
    println!(
        "Found backup store: {} ({} {})",
        style(store.root().display()).dim(),
        count,
        if count == 1 { "file" } else { "files" }
    );
    if !interaction::confirm(
        &format!("Restore {} files from backup?", count),
        opts.no_confirm,
        true,
    )? {
        println!("Aborted by user.");
        return Ok(ExitCode::SUCCESS);
    }

    let summary = match store.restore_all() {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("{}", style(format!("Error during restore: {}", e)).red());
            return Ok(ExitCode::FAILURE);
        }
    };
    println!(
        "Restored {} {} from backup.",
        style(summary.restored).green(),
        if summary.restored == 1 { "file" } else { "files" }
    );
    if summary.skipped > 0 {
        println!(
            "{} entries skipped (no backup data present).",
            style(summary.skipped).yellow()
        );
    }

    if interaction::confirm("Remove the backup store directory?", opts.no_confirm, false)? {
        store.delete()?;
        println!("Backup store removed.");
    }
    Ok(ExitCode::SUCCESS)
}

fn run_scan(opts: &CommsArgs, mut store: BackupStore, preserve: &PreserveSet) -> Result<ExitCode> {
    let found = match find_files(opts, store.root()) {
        Ok(found) => found,
        Err(e) => {
            eprintln!("{}", style(format!("Error finding files: {}", e)).red());
            return Ok(ExitCode::FAILURE);
        }
    };

    if found.supported.is_empty() {
        println!("No supported files found under {}.", opts.path.display());
        if found.unsupported > 0 {
            println!("{} files skipped (unsupported file types).", found.unsupported);
        }
        return Ok(ExitCode::SUCCESS);
    }

    println!("Found {} files:", found.supported.len());
    for file in found.supported.iter().take(10) {
        println!("  {}", style(file.display()).dim());
    }
    if found.supported.len() > 10 {
        println!("  ... and {} more.", found.supported.len() - 10);
    }

    if opts.dry_run {
        println!("Dry run: no files will be changed.");
    } else {
        match interaction::confirm_processing(found.supported.len(), opts.no_confirm) {
            Ok(true) => {}
            Ok(false) => return Ok(ExitCode::SUCCESS),
            Err(e) => {
                eprintln!("{}", style(format!("Error during confirmation: {}", e)).red());
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    let (stats, reports) = process_files(
        &found.supported,
        found.unsupported,
        &mut store,
        preserve,
        ProcessOptions {
            dry_run: opts.dry_run,
        },
    );

    let mut failure_count = 0;
    for report in &reports {
        if let FileStatus::Skipped(reason) = &report.status {
            eprintln!(
                "  {} Skipped: {} ({})",
                style("⚠️").yellow(),
                style(report.path.display()).dim(),
                reason
            );
        }
        if report.unterminated {
            eprintln!(
                "  {} {}: block comment never closes; content stripped to end of file",
                style("⚠️").yellow(),
                style(report.path.display()).dim()
            );
        }
        if let FileStatus::Failed(message) = &report.status {
            eprintln!(
                "  {} Failed: {} - {}",
                style("⚠️").yellow(),
                style(report.path.display()).dim(),
                style(message).red()
            );
            failure_count += 1;
        }
    }

    print_summary(&stats, opts.dry_run, &store);

    if failure_count > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn print_summary(stats: &ScanStats, dry_run: bool, store: &BackupStore) {
    println!("\nProcessing complete.");
    if dry_run {
        println!(
            "Dry run: {} of {} files would change, removing {} comments ({}).",
            style(stats.files_modified).green(),
            stats.files_scanned,
            stats.comments_removed,
            format_size(stats.bytes_saved)
        );
    } else {
        println!(
            "Result: {} files scanned, {} modified, {} skipped, {} failed.",
            stats.files_scanned,
            style(stats.files_modified).green(),
            style(stats.files_skipped).yellow(),
            style(stats.files_failed).red()
        );
        println!(
            "Removed {} comments, saved {}.",
            stats.comments_removed,
            format_size(stats.bytes_saved)
        );
    }
    println!("Elapsed: {:.2?}", stats.elapsed);
    if stats.files_modified > 0 && !dry_run {
        println!("Backup created: {}", style(store.root().display()).dim());
        println!("Run 'comms --undo' to restore.");
    }
}
