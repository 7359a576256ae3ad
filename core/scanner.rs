use crate::language;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser, Clone)]
#[clap(
    version = "0.1.0",
    about = "Comment removal tool (main arguments)",
    long_about = "These are the main arguments for scanning, restoring and demo generation."
)]
pub struct CommsArgs {
    #[clap(help = "File or directory to process", default_value = ".")]
    pub path: PathBuf,

    #[clap(
        long,
        help = "Restore every file from the backup store and exit",
        group = "mode"
    )]
    pub undo: bool,

    #[clap(
        long,
        help = "Generate sample files for each supported language into the target",
        group = "mode"
    )]
    pub demo: bool,

    #[clap(
        long = "show-config",
        help = "Print the resolved preserve patterns and backup location",
        group = "mode"
    )]
    pub show_config: bool,

    #[clap(long, help = "Report what would change without writing or backing up")]
    pub dry_run: bool,

    #[clap( long, value_name = "REGEX", help = "Extra preserve pattern; matching text survives stripping [multiple allowed]", action = clap::ArgAction::Append )]
    pub preserve: Vec<String>,

    #[clap(long, help = "Replace the default preserve patterns instead of extending them")]
    pub override_defaults: bool,

    #[clap(long, value_name = "DIR", help = "Backup store location override")]
    pub backup_dir: Option<PathBuf>,

    #[clap( long, value_name = "LANG", help = "Restrict to specific languages [multiple allowed]", action = clap::ArgAction::Append )]
    pub lang: Vec<String>,
    #[clap( long, value_name = "PATTERN", help = "Glob pattern for files to include [multiple allowed]", action = clap::ArgAction::Append )]
    pub include: Vec<String>,
    #[clap( long, value_name = "PATTERN", help = "Glob pattern for files/directories to exclude [multiple allowed]", action = clap::ArgAction::Append )]
    pub exclude: Vec<String>,
    #[clap(long, help = "Skip the confirmation prompts")]
    pub no_confirm: bool,
}

impl Default for CommsArgs {
    fn default() -> Self {
        CommsArgs {
            path: PathBuf::from("."),
            undo: false,
            demo: false,
            show_config: false,
            dry_run: false,
            preserve: Vec::new(),
            override_defaults: false,
            backup_dir: None,
            lang: Vec::new(),
            include: Vec::new(),
            exclude: Vec::new(),
            no_confirm: false,
        }
    }
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    #[clap(about = "Generate shell completion scripts")]
    Completion(CompletionArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct CompletionArgs {
    #[clap(value_parser = clap::value_parser!(clap_complete::Shell))]
    pub shell: clap_complete::Shell,
}

#[derive(Debug, Parser, Clone)]
#[clap(
    name = "comms",
    version = "0.1.0",
    about = "Strip comments from source trees, with automatic backup and restore",
    long_about = "Removes comments across 20+ languages while preserving color codes, URLs,\nshebangs and preprocessor directives, and keeps a backup store so every run\ncan be undone with --undo.",
    propagate_version = true
)]
pub struct CliArgs {
    #[clap(subcommand)]
    pub command: Option<Command>,

    #[clap(flatten)]
    pub main_opts: CommsArgs,
}

/// What a walk produced: the files the catalog understands, and a tally of
/// the ones it does not (reported as skipped, never touched).
#[derive(Debug, Default)]
pub struct FoundFiles {
    pub supported: Vec<PathBuf>,
    pub unsupported: usize,
}

pub fn find_files(args: &CommsArgs, backup_root: &Path) -> Result<FoundFiles> {
    let root = &args.path;
    if !root.exists() {
        anyhow::bail!("Path not found: {}", root.display());
    }
    let selected = resolve_language_filter(&args.lang)?;

    let mut walker = WalkBuilder::new(root);
    walker.standard_filters(true);
    let mut overrides = OverrideBuilder::new(root);
    for pattern in &args.exclude {
        let negated = format!("!{}", pattern);
        overrides
            .add(&negated)
            .with_context(|| format!("Exclude: {}", pattern))?;
    }
    for pattern in &args.include {
        overrides
            .add(pattern)
            .with_context(|| format!("Include: {}", pattern))?;
    }
    walker.overrides(overrides.build().context("Overrides")?);

    let mut found = FoundFiles::default();
    for entry in walker.build() {
        match entry {
            Ok(entry) => {
                if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                    continue;
                }
                if entry.path().starts_with(backup_root) {
                    continue;
                }
                match language::profile_for_path(entry.path()) {
                    Some(profile)
                        if selected
                            .as_ref()
                            .is_none_or(|set| set.contains(profile.id)) =>
                    {
                        found.supported.push(entry.into_path());
                    }
                    _ => found.unsupported += 1,
                }
            }
            Err(err) => {
                eprintln!("Warn: {}", err);
            }
        }
    }
    found.supported.sort();
    Ok(found)
}

/// Empty filter means every cataloged language. Unknown names are warned
/// about; a filter that names nothing valid is an error.
fn resolve_language_filter(langs: &[String]) -> Result<Option<HashSet<&'static str>>> {
    if langs.is_empty() {
        return Ok(None);
    }
    let mut selected = HashSet::new();
    for name in langs {
        match language::profile_by_id(name.as_str()) {
            Some(profile) => {
                selected.insert(profile.id);
            }
            None => eprintln!("Warning: Unsupported language specified, skipping: {}", name),
        }
    }
    if selected.is_empty() {
        anyhow::bail!("No valid languages specified: {:?}", langs);
    }
    Ok(Some(selected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn args_for(path: &Path) -> CommsArgs {
        CommsArgs {
            path: path.to_path_buf(),
            ..CommsArgs::default()
        }
    }

    #[test]
    fn classifies_supported_and_unsupported_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.py"), "# c\n").unwrap();
        fs::write(dir.path().join("b.txt"), "plain\n").unwrap();

        let found = find_files(&args_for(dir.path()), Path::new("/nonexistent")).unwrap();
        assert_eq!(found.supported.len(), 1);
        assert!(found.supported[0].ends_with("a.py"));
        assert_eq!(found.unsupported, 1);
    }

    #[test]
    fn missing_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("missing");
        assert!(find_files(&args_for(&gone), Path::new("/nonexistent")).is_err());
    }

    #[test]
    fn backup_store_is_never_scanned() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("store");
        fs::create_dir_all(&store).unwrap();
        fs::write(store.join("a.py"), "# backed up\n").unwrap();
        fs::write(dir.path().join("b.py"), "# live\n").unwrap();

        let found = find_files(&args_for(dir.path()), &store).unwrap();
        assert_eq!(found.supported.len(), 1);
        assert!(found.supported[0].ends_with("b.py"));
    }

    #[test]
    fn hidden_directories_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let hidden = dir.path().join(".cache");
        fs::create_dir_all(&hidden).unwrap();
        fs::write(hidden.join("a.py"), "# hidden\n").unwrap();
        fs::write(dir.path().join("b.py"), "# visible\n").unwrap();

        let found = find_files(&args_for(dir.path()), Path::new("/nonexistent")).unwrap();
        assert_eq!(found.supported.len(), 1);
        assert!(found.supported[0].ends_with("b.py"));
    }

    #[test]
    fn language_filter_restricts_results() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.py"), "# c\n").unwrap();
        fs::write(dir.path().join("b.sh"), "# c\n").unwrap();

        let mut args = args_for(dir.path());
        args.lang = vec!["python".to_string()];
        let found = find_files(&args, Path::new("/nonexistent")).unwrap();
        assert_eq!(found.supported.len(), 1);
        assert!(found.supported[0].ends_with("a.py"));
        assert_eq!(found.unsupported, 1);
    }

    #[test]
    fn single_file_target_is_supported() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("only.rb");
        fs::write(&file, "# c\n").unwrap();

        let found = find_files(&args_for(&file), Path::new("/nonexistent")).unwrap();
        assert_eq!(found.supported, vec![file]);
    }
}
