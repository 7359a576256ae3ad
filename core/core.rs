pub mod backup;
pub mod config;
pub mod demo;
pub mod language;
pub mod preserve;
pub mod processor;
pub mod scanner;
pub mod stripper;

pub use backup::{BackupEntry, BackupStore, RestoreStatus, RestoreSummary};
pub use config::Config;
pub use demo::create_demo_files;
pub use language::{Grammar, LanguageProfile, profile_for_path};
pub use preserve::{PreservePattern, PreserveSet};
pub use processor::{
    FileReport, FileStatus, ProcessOptions, ScanStats, SkipReason, process_files,
};
pub use scanner::{CliArgs, Command, CommsArgs, CompletionArgs, FoundFiles, find_files};
pub use stripper::{CommentMatch, LanguageScan, StripError, StripOutcome, strip};

#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File processing error in {path}: {message}")]
    Processing { path: String, message: String },

    #[error("Backup store error: {0}")]
    Backup(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
