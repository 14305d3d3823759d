//! Export: a pure planner that names every categorized photo, plus the
//! directory cleaner and file copier that carry the plan out.
//!
//! Output names are `{number:04}.{ext}` for the first photo of a category and
//! `{number:04}-{position:02}.{ext}` for the rest. Empty categories produce
//! nothing.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use crate::categories::Category;
use crate::error::{ExportError, ExportResult};
use crate::photo::Rotation;
use crate::settings::EXPORT_BATCH_SIZE;
use crate::thumbnail::apply_rotation;

#[derive(Debug, Clone, PartialEq)]
pub struct ExportEntry {
    pub source_path: PathBuf,
    pub target_name: String,
    pub rotation: Rotation,
    pub category_number: u32,
    /// 1-based position inside the category.
    pub position: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportPlan {
    entries: Vec<ExportEntry>,
}

impl ExportPlan {
    pub fn entries(&self) -> &[ExportEntry] {
        &self.entries
    }

    pub fn photo_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// File name for the photo at 1-based `position` of category `number`.
pub fn target_name(number: u32, position: usize, extension: &str) -> String {
    let base = if position == 1 {
        format!("{number:04}")
    } else {
        format!("{number:04}-{position:02}")
    };
    if extension.is_empty() {
        base
    } else {
        format!("{base}.{extension}")
    }
}

/// Plans the copy in store order, then photo order within each category.
pub fn plan(categories: &[Category]) -> ExportPlan {
    let entries = categories
        .iter()
        .filter(|c| !c.is_empty())
        .flat_map(|category| {
            category.photos.iter().enumerate().map(move |(i, photo)| ExportEntry {
                source_path: photo.source_path.clone(),
                target_name: target_name(category.number, i + 1, &photo.extension()),
                rotation: photo.rotation,
                category_number: category.number,
                position: i + 1,
            })
        })
        .collect();
    ExportPlan { entries }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanReport {
    pub deleted: usize,
    pub errors: Vec<String>,
}

/// Deletes the regular files directly inside `dir`. Subdirectories are left
/// alone and a failed deletion does not stop the rest.
pub fn clean_directory(dir: &Path) -> ExportResult<CleanReport> {
    let entries = std::fs::read_dir(dir).map_err(|source| ExportError::TargetDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut report = CleanReport::default();
    for entry in entries.flatten() {
        let is_file = entry.file_type().is_ok_and(|t| t.is_file());
        if !is_file {
            continue;
        }
        let path = entry.path();
        match std::fs::remove_file(&path) {
            Ok(()) => report.deleted += 1,
            Err(source) => {
                let err = ExportError::Delete { path, source };
                log::warn!("{err}");
                report.errors.push(err.to_string());
            }
        }
    }
    Ok(report)
}

/// Creates the target directory if needed and empties it.
pub fn prepare_target(dir: &Path) -> ExportResult<CleanReport> {
    std::fs::create_dir_all(dir).map_err(|source| ExportError::TargetDir {
        path: dir.to_path_buf(),
        source,
    })?;
    clean_directory(dir)
}

/// Copies one planned photo, overwriting whatever has the same name. A
/// rotated photo is decoded, turned and re-encoded in its own format.
pub fn copy_entry(entry: &ExportEntry, dir: &Path) -> ExportResult<PathBuf> {
    if !entry.source_path.is_file() {
        return Err(ExportError::SourceMissing(entry.source_path.clone()));
    }
    let target = dir.join(&entry.target_name);

    if !entry.rotation.is_none() {
        if let Ok(format) = image::ImageFormat::from_path(&entry.source_path) {
            let rotate_err = |source| ExportError::Rotate {
                from: entry.source_path.clone(),
                source,
            };
            let img = image::open(&entry.source_path).map_err(rotate_err)?;
            apply_rotation(img, entry.rotation)
                .save_with_format(&target, format)
                .map_err(rotate_err)?;
            return Ok(target);
        }
        log::warn!(
            "Unknown image format for {}, copying without rotation",
            entry.source_path.display()
        );
    }

    std::fs::copy(&entry.source_path, &target).map_err(|source| ExportError::Copy {
        from: entry.source_path.clone(),
        to: target.clone(),
        source,
    })?;
    Ok(target)
}

#[derive(Debug, Clone, PartialEq)]
pub enum CopyOutcome {
    Copied(PathBuf),
    Failed(String),
    /// Not started because the export was cancelled.
    Skipped,
}

/// Copies a batch in parallel. Once `cancel` is set no further copy starts.
pub fn copy_batch(entries: &[ExportEntry], dir: &Path, cancel: &AtomicBool) -> Vec<CopyOutcome> {
    entries
        .par_iter()
        .map(|entry| {
            if cancel.load(Ordering::Relaxed) {
                return CopyOutcome::Skipped;
            }
            match copy_entry(entry, dir) {
                Ok(path) => CopyOutcome::Copied(path),
                Err(e) => {
                    log::warn!("{e}");
                    CopyOutcome::Failed(e.to_string())
                }
            }
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportReport {
    pub photos_copied: usize,
    pub files_deleted: usize,
    pub errors: Vec<String>,
    pub cancelled: bool,
}

impl ExportReport {
    /// Partial success still counts as failure.
    pub fn succeeded(&self) -> bool {
        self.errors.is_empty() && !self.cancelled
    }

    pub fn record_clean(&mut self, clean: CleanReport) {
        self.files_deleted += clean.deleted;
        self.errors.extend(clean.errors);
    }

    pub fn record(&mut self, outcomes: impl IntoIterator<Item = CopyOutcome>) {
        for outcome in outcomes {
            match outcome {
                CopyOutcome::Copied(_) => self.photos_copied += 1,
                CopyOutcome::Failed(message) => self.errors.push(message),
                CopyOutcome::Skipped => self.cancelled = true,
            }
        }
    }

    pub fn summary(&self) -> String {
        let mut text = format!("{} photos exported", self.photos_copied);
        if self.files_deleted > 0 {
            text.push_str(&format!(", {} old files removed", self.files_deleted));
        }
        if self.cancelled {
            text.push_str(", cancelled");
        }
        if !self.errors.is_empty() {
            text.push_str(&format!(", {} errors", self.errors.len()));
        }
        text
    }
}

/// An export carried out one batch at a time, so a caller can run each batch
/// off its own thread and report progress in between. [`execute`] drives it
/// to completion in one go.
#[derive(Debug)]
pub struct ExportRun {
    dir: PathBuf,
    pending: Vec<ExportEntry>,
    total: usize,
    report: ExportReport,
    cancel: Arc<AtomicBool>,
}

impl ExportRun {
    pub fn new(plan: &ExportPlan, dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            pending: plan.entries().to_vec(),
            total: plan.photo_count(),
            report: ExportReport::default(),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Photos handed out in batches so far.
    pub fn done(&self) -> usize {
        self.total - self.pending.len()
    }

    /// Shared flag checked before every copy.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn is_cancelled(&self) -> bool {
        self.report.cancelled
    }

    /// Records how preparing the target directory went. When it failed there
    /// is nowhere to copy to, so nothing more is handed out.
    pub fn prepared(&mut self, result: Result<CleanReport, String>) {
        match result {
            Ok(clean) => self.report.record_clean(clean),
            Err(e) => {
                self.report.errors.push(e);
                self.pending.clear();
            }
        }
    }

    /// Next batch to copy, or `None` once everything was handed out or the
    /// run was cancelled.
    pub fn next_batch(&mut self) -> Option<Vec<ExportEntry>> {
        if self.cancel.load(Ordering::Relaxed) {
            self.report.cancelled = true;
            self.pending.clear();
        }
        if self.pending.is_empty() {
            return None;
        }
        let count = EXPORT_BATCH_SIZE.min(self.pending.len());
        Some(self.pending.drain(..count).collect())
    }

    pub fn record(&mut self, outcomes: impl IntoIterator<Item = CopyOutcome>) {
        self.report.record(outcomes);
    }

    /// Stops handing out batches. Copies already running finish; files
    /// already written stay.
    pub fn cancel(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        self.report.cancelled = true;
        self.pending.clear();
    }

    pub fn finish(self) -> ExportReport {
        log::info!(
            "Export to {} finished: {}",
            self.dir.display(),
            self.report.summary()
        );
        for error in &self.report.errors {
            log::warn!("{}", error);
        }
        self.report
    }
}

/// Runs a whole export synchronously: prepare the directory, then copy in
/// batches, calling `on_progress(done, total)` after each one.
pub fn execute(mut run: ExportRun, mut on_progress: impl FnMut(usize, usize)) -> ExportReport {
    run.prepared(prepare_target(run.dir()).map_err(|e| e.to_string()));
    let cancel = run.cancel_flag();
    while let Some(batch) = run.next_batch() {
        run.record(copy_batch(&batch, run.dir(), &cancel));
        on_progress(run.done(), run.total());
    }
    run.finish()
}
