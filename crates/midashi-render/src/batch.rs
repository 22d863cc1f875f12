// this_file: crates/midashi-render/src/batch.rs

//! Batch generation: the same request rendered and saved several times, each
//! with its own random font draw.

use crate::compositor::Compositor;
use crate::export::export;
use log::{info, warn};
use midashi_core::types::BATCH_SIZE;
use midashi_core::{
    BatchTarget, ExportKind, FontRasterizer, MidashiError, RenderRequest, Result,
};
use rand::Rng;
use std::path::PathBuf;

/// Where and how a batch is saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPlan {
    pub folder: PathBuf,
    pub base_name: String,
    pub kind: ExportKind,
    pub count: usize,
}

impl BatchPlan {
    pub fn new(folder: impl Into<PathBuf>, base_name: impl Into<String>, kind: ExportKind) -> Self {
        Self {
            folder: folder.into(),
            base_name: base_name.into(),
            kind,
            count: BATCH_SIZE,
        }
    }

    /// Build a plan from dialog output, keeping only the stem of the picked name.
    pub fn from_target(target: &BatchTarget, kind: ExportKind) -> Result<Self> {
        let base_name = target
            .name
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| {
                MidashiError::invalid_request(format!(
                    "no usable base name in '{}'",
                    target.name.display()
                ))
            })?;
        Ok(Self::new(target.folder.clone(), base_name, kind))
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// `{folder}/{base}_{index}.{ext}`, index starting at 1.
    pub fn path_for(&self, index: usize) -> PathBuf {
        self.folder.join(format!(
            "{}_{}.{}",
            self.base_name,
            index,
            self.kind.extension()
        ))
    }
}

/// One iteration that did not produce a file.
#[derive(Debug)]
pub struct BatchFailure {
    pub index: usize,
    pub path: PathBuf,
    pub error: MidashiError,
}

/// Outcome of a batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub saved: Vec<PathBuf>,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn saved_count(&self) -> usize {
        self.saved.len()
    }
}

/// Sequential batch runner.
pub struct BatchRenderer<'a, R> {
    compositor: &'a Compositor<R>,
}

impl<'a, R: FontRasterizer> BatchRenderer<'a, R> {
    pub fn new(compositor: &'a Compositor<R>) -> Self {
        Self { compositor }
    }

    /// Render and export `plan.count` times.
    ///
    /// An invalid request fails the whole batch up front. After that, a failed
    /// iteration is recorded in the report and the batch carries on.
    pub fn run<G: Rng + ?Sized>(
        &self,
        request: &RenderRequest,
        plan: &BatchPlan,
        rng: &mut G,
    ) -> Result<BatchReport> {
        request.validate()?;
        info!(
            "Starting batch of {} into {} (base={}, format={})",
            plan.count,
            plan.folder.display(),
            plan.base_name,
            plan.kind
        );

        let mut report = BatchReport::default();
        for index in 1..=plan.count {
            let path = plan.path_for(index);
            let outcome = self
                .compositor
                .render(request, rng)
                .and_then(|image| export(&image, plan.kind, &path));

            match outcome {
                Ok(()) => report.saved.push(path),
                Err(error) => {
                    warn!("Batch item {} skipped: {}", index, error);
                    report.failures.push(BatchFailure { index, path, error });
                }
            }
        }

        info!(
            "Batch complete ({}/{} saved)",
            report.saved_count(),
            plan.count
        );
        Ok(report)
    }
}
