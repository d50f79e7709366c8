//! Upload sessions: the two user-facing flows.
//!
//! - [`run_interactive`] asks for a glob, source, date and dry-run choice once, then tags
//!   and a title per file, and names keys in [`KeyMode::Interactive`] layout.
//! - [`run_inference`] takes date and title from each file name and names keys in
//!   [`KeyMode::FilenameInference`] layout.
//!
//! Files are handled one at a time in glob order. An upload failure ends the session
//! with an error; uploads that already completed stay in place. When the session's
//! cancellation token fires, the current upload is aborted, no further file is started
//! and the report is marked interrupted.

use anyhow::{bail, Result};
use dockit_core::config::Config;
use dockit_core::contract::{NoProgress, ObjectStore, ObjectTarget, ProgressObserver};
use dockit_core::date::extract_date;
use dockit_core::naming::{
    build_key, file_stem, infer_title, parse_tags, KeyMode, StorageKey, UploadRequest,
    DOCUMENT_CONTENT_TYPE,
};
use dockit_core::tagger::Tagger;
use dockit_core::uploader::{UploadError, Uploader};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::progress::ProgressBarObserver;
use crate::prompt::{ask_date, ask_required, Prompter};

pub const GLOB_PROMPT: &str = "Enter file paths or globs (e.g. scans/*.pdf):";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    Bar,
    Hidden,
}

/// What a session needs besides the prompter.
pub struct SessionContext<'a, S: ObjectStore + ?Sized> {
    pub config: &'a Config,
    pub store: &'a S,
    pub tagger: Tagger,
    pub uploader: Uploader,
    pub progress: ProgressMode,
    pub cancel: CancellationToken,
}

impl<'a, S: ObjectStore + ?Sized> SessionContext<'a, S> {
    pub fn new(config: &'a Config, store: &'a S) -> Self {
        let cancel = CancellationToken::new();
        Self {
            config,
            store,
            tagger: Tagger::default(),
            uploader: Uploader::default().with_cancellation(cancel.clone()),
            progress: ProgressMode::Bar,
            cancel,
        }
    }

    /// Share `cancel` with the uploader so an interrupt also stops the file in flight.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.uploader = self.uploader.with_cancellation(cancel.clone());
        self.cancel = cancel;
        self
    }

    fn interrupted(&self) -> bool {
        if self.cancel.is_cancelled() {
            warn!("Interrupted, not starting further files");
            return true;
        }
        false
    }

    pub fn with_progress(mut self, progress: ProgressMode) -> Self {
        self.progress = progress;
        self
    }

    fn observer_for(&self, path: &Path) -> Box<dyn ProgressObserver> {
        match self.progress {
            ProgressMode::Bar => Box::new(ProgressBarObserver::new(&path.display().to_string())),
            ProgressMode::Hidden => Box::new(NoProgress),
        }
    }

    /// Prints the preview line, then uploads unless `dry_run`.
    async fn dispatch(&self, path: &Path, key: &StorageKey, dry_run: bool) -> Result<Outcome> {
        println!(
            "📄 {} → s3://{}/{}",
            path.display(),
            self.config.default_bucket,
            key
        );
        if dry_run {
            info!(path = %path.display(), key = %key, "Dry run, skipping upload");
            println!("⚠️  Dry run — not uploaded\n");
            return Ok(Outcome::DryRun);
        }

        let target = ObjectTarget::new(
            self.config.default_bucket.clone(),
            key.as_str(),
            DOCUMENT_CONTENT_TYPE,
        );
        let observer = self.observer_for(path);
        match self
            .uploader
            .upload(self.store, &target, path, observer.as_ref())
            .await
        {
            Ok(receipt) => {
                println!("✓ Upload complete\n");
                Ok(Outcome::Uploaded {
                    bytes: receipt.bytes,
                })
            }
            Err(UploadError::Cancelled { .. }) => {
                println!("⚠️  Interrupted, upload aborted\n");
                Ok(Outcome::Interrupted)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Uploaded { bytes: u64 },
    DryRun,
    Skipped(String),
    /// The upload was stopped by an interrupt and nothing was kept.
    Interrupted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub file: PathBuf,
    pub key: Option<StorageKey>,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionReport {
    pub matched: usize,
    pub files: Vec<FileReport>,
    /// Set when an interrupt ended the session early.
    pub interrupted: bool,
}

impl SessionReport {
    pub fn uploaded(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, Outcome::Uploaded { .. }))
            .count()
    }
}

/// Expands glob patterns into regular files, first match first, without duplicates.
///
/// Each entry is one pattern; spaces inside it are part of the path.
pub fn expand_patterns<T: AsRef<str>>(patterns: &[T]) -> Result<Vec<PathBuf>, glob::PatternError> {
    let mut files: Vec<PathBuf> = Vec::new();
    for pattern in patterns.iter().map(|p| p.as_ref().trim()).filter(|p| !p.is_empty()) {
        for entry in glob::glob(pattern)? {
            match entry {
                Ok(path) if path.is_file() => {
                    if !files.contains(&path) {
                        files.push(path);
                    }
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, pattern, "Skipping unreadable glob entry"),
            }
        }
    }
    Ok(files)
}

/// Asks for patterns until they parse, then expands them.
fn ask_files<P: Prompter + ?Sized>(prompter: &mut P) -> Result<Vec<PathBuf>> {
    loop {
        let input = prompter.text(GLOB_PROMPT, None)?;
        match expand_patterns(&[input.as_str()]) {
            Ok(files) => return Ok(files),
            Err(e) => prompter.warn(&format!("Invalid glob pattern: {e}")),
        }
    }
}

fn join_tags(tags: &BTreeSet<String>) -> String {
    tags.iter().map(String::as_str).collect::<Vec<_>>().join(",")
}

fn no_files_matched() -> SessionReport {
    println!("No files matched.");
    info!("No files matched, ending session");
    SessionReport::default()
}

/// The prompt-driven flow: one source/date/dry-run answer for the batch, tags and title per file.
pub async fn run_interactive<S, P>(ctx: &SessionContext<'_, S>, prompter: &mut P) -> Result<SessionReport>
where
    S: ObjectStore + ?Sized,
    P: Prompter + ?Sized,
{
    let files = ask_files(prompter)?;
    if files.is_empty() {
        return Ok(no_files_matched());
    }
    info!(count = files.len(), "Matched files");

    let source = ask_required(prompter, "Document source (e.g. bank):", "Source is required")?;
    let received_date = ask_date(prompter, "Date received (YYYY-MM-DD):")?;
    let dry_run = prompter.confirm("Dry run? (preview only)", ctx.config.dry_run_default)?;

    let mut report = SessionReport {
        matched: files.len(),
        files: Vec::with_capacity(files.len()),
        interrupted: false,
    };

    for path in files {
        if ctx.interrupted() {
            break;
        }
        let base = file_stem(&path);
        let suggested = ctx.tagger.tag(&base, ctx.config.enable_nlp_tagging);
        let tags = prompter.text(
            &format!("Tags for {base} (comma-separated):"),
            Some(join_tags(&suggested).as_str()),
        )?;
        let title = prompter.text("Short title:", Some(base.as_str()))?;

        let request = UploadRequest {
            file_path: path.clone(),
            source: source.clone(),
            received_date,
            tags: parse_tags(&tags),
            title,
            mode: KeyMode::Interactive,
        };
        let key = build_key(&request);
        info!(path = %path.display(), key = %key, "Built storage key");

        let outcome = ctx.dispatch(&path, &key, dry_run).await?;
        report.files.push(FileReport {
            file: path,
            key: Some(key),
            outcome,
        });
    }

    report.interrupted = ctx.cancel.is_cancelled();
    info!(
        matched = report.matched,
        uploaded = report.uploaded(),
        interrupted = report.interrupted,
        "Interactive session finished"
    );
    Ok(report)
}

/// Options for the filename-inference flow.
#[derive(Debug, Clone, Default)]
pub struct InferenceOptions {
    pub patterns: Vec<String>,
    /// Forces a dry run regardless of config.
    pub dry_run: bool,
    /// Accept every default without asking.
    pub assume_yes: bool,
}

/// The `upload` flow: dates and titles come from file names, keys omit source and tags.
pub async fn run_inference<S, P>(
    ctx: &SessionContext<'_, S>,
    prompter: &mut P,
    options: &InferenceOptions,
) -> Result<SessionReport>
where
    S: ObjectStore + ?Sized,
    P: Prompter + ?Sized,
{
    let files = if options.patterns.is_empty() {
        if options.assume_yes {
            bail!("No file patterns given; pass them as arguments when using --yes");
        }
        ask_files(prompter)?
    } else {
        expand_patterns(&options.patterns)?
    };
    if files.is_empty() {
        return Ok(no_files_matched());
    }
    info!(count = files.len(), "Matched files");

    let dry_run = if options.dry_run {
        true
    } else if options.assume_yes {
        ctx.config.dry_run_default
    } else {
        prompter.confirm("Dry run? (preview only)", ctx.config.dry_run_default)?
    };

    let mut report = SessionReport {
        matched: files.len(),
        files: Vec::with_capacity(files.len()),
        interrupted: false,
    };

    for path in files {
        if ctx.interrupted() {
            break;
        }
        let base = file_stem(&path);

        let received_date = match extract_date(&base) {
            Some(date) => date,
            None if options.assume_yes => {
                warn!(path = %path.display(), "No date in file name, skipping");
                println!("⚠️  No date in {}, skipped\n", path.display());
                report.files.push(FileReport {
                    file: path,
                    key: None,
                    outcome: Outcome::Skipped("no date in file name".to_string()),
                });
                continue;
            }
            None => ask_date(
                prompter,
                &format!("No date found in {base}. Date (YYYY-MM-DD):"),
            )?,
        };

        let inferred_title = infer_title(&path);
        let title = if options.assume_yes {
            inferred_title
        } else {
            prompter.text("Short title:", Some(inferred_title.as_str()))?
        };

        // Shown for reference only; this layout has no tag segment.
        let tags = ctx.tagger.tag(&base, true);
        if !tags.is_empty() {
            println!("🏷  {}", join_tags(&tags));
        }

        let request = UploadRequest {
            file_path: path.clone(),
            source: String::new(),
            received_date,
            tags: tags.into_iter().collect(),
            title,
            mode: KeyMode::FilenameInference,
        };
        let key = build_key(&request);
        info!(path = %path.display(), key = %key, "Built storage key");

        if !dry_run
            && !options.assume_yes
            && !prompter.confirm(&format!("Upload {} to {key}?", path.display()), true)?
        {
            println!("Skipped {}\n", path.display());
            report.files.push(FileReport {
                file: path,
                key: Some(key),
                outcome: Outcome::Skipped("declined".to_string()),
            });
            continue;
        }

        let outcome = ctx.dispatch(&path, &key, dry_run).await?;
        report.files.push(FileReport {
            file: path,
            key: Some(key),
            outcome,
        });
    }

    report.interrupted = ctx.cancel.is_cancelled();
    info!(
        matched = report.matched,
        uploaded = report.uploaded(),
        interrupted = report.interrupted,
        "Upload session finished"
    );
    Ok(report)
}
