//! Generation and removal orchestrators.
//!
//! A run is a fixed sequence of steps for one target stack. Every step reports
//! individually; a declined overwrite or a missing splice anchor fails only
//! its own step, while a filesystem or template error stops the rest of the
//! run. Nothing already written is rolled back.

pub mod php;
pub mod remove;
pub mod web;

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use strum::Display;

use crate::error::{ScaffoldError, ScaffoldResult};
use crate::prompt::OverwritePrompt;
use crate::schema::{ClassifiedTable, EntityNames, diagnostics};
use crate::source::ColumnSource;
use crate::splice::{AggregateFile, AnchorSpec};
use crate::template::{RenderContext, Renderer};
use crate::writer::{ArtifactWriter, content_hash};

pub use php::PhpPaths;
pub use web::WebPaths;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Target {
    /// Laravel controller, requests, resource, model, service and route.
    Php,
    /// Vue API module, list view, menu entry and router entry.
    Web,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    Generate,
    Remove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StepStatus {
    Generated,
    Updated,
    Removed,
    Declined,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepResult {
    pub step_number: u8,
    pub step: String,
    /// Relative to the workspace root.
    pub path: PathBuf,
    pub status: StepStatus,
    pub duration_ms: u64,
    pub details: String,
    pub content_hash: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RunStatus {
    /// Every step generated, updated or removed its artifact.
    Success,
    /// Some steps were declined or failed without stopping the run.
    Partial,
    /// A fatal error stopped the run.
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub operation: Operation,
    pub target: Target,
    pub model: String,
    pub status: RunStatus,
    pub steps: Vec<StepResult>,
    /// Columns whose type had no mapping.
    pub diagnostics: Vec<String>,
    pub error: Option<String>,
    pub duration_ms: u64,
}

impl GenerationReport {
    pub fn is_failed(&self) -> bool {
        self.status == RunStatus::Failed
    }

    pub fn step(&self, name: &str) -> Option<&StepResult> {
        self.steps.iter().find(|step| step.step == name)
    }

    /// One line per step, for the terminal.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} {} {}: {} ({} steps, {} ms)",
            self.operation,
            self.target,
            self.model,
            self.status,
            self.steps.len(),
            self.duration_ms
        );
        for diagnostic in &self.diagnostics {
            let _ = writeln!(out, "  ! {diagnostic}");
        }
        for step in &self.steps {
            let mark = match step.status {
                StepStatus::Generated | StepStatus::Updated | StepStatus::Removed => '✔',
                StepStatus::Declined | StepStatus::Failed => '✘',
            };
            let _ = write!(out, "  {mark} {:<9} {}", step.status, step.path.display());
            if !step.details.is_empty() {
                let _ = write!(out, "  {}", step.details);
            }
            out.push('\n');
        }
        if let Some(error) = &self.error {
            let _ = writeln!(out, "  aborted: {error}");
        }
        out
    }
}

const SLOW_RUN_MS: u64 = 2_000;

/// Collects step results for one run.
pub(crate) struct RunLog {
    operation: Operation,
    target: Target,
    model: String,
    started: Instant,
    steps: Vec<StepResult>,
    diagnostics: Vec<String>,
}

/// Timing and identity of a step in progress.
pub(crate) struct StepTimer {
    name: &'static str,
    path: PathBuf,
    started: Instant,
}

impl RunLog {
    pub(crate) fn new(operation: Operation, target: Target, entity: &EntityNames) -> Self {
        Self {
            operation,
            target,
            model: entity.model.clone(),
            started: Instant::now(),
            steps: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn with_diagnostics(mut self, diagnostics: Vec<String>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub(crate) fn start(&self, name: &'static str, path: impl Into<PathBuf>) -> StepTimer {
        StepTimer {
            name,
            path: path.into(),
            started: Instant::now(),
        }
    }

    pub(crate) fn record(
        &mut self,
        timer: StepTimer,
        status: StepStatus,
        details: impl Into<String>,
        content_hash: Option<String>,
    ) {
        let step = StepResult {
            step_number: (self.steps.len() + 1) as u8,
            step: timer.name.to_string(),
            path: timer.path,
            status,
            duration_ms: timer.started.elapsed().as_millis() as u64,
            details: details.into(),
            content_hash,
        };
        match step.status {
            StepStatus::Failed => tracing::warn!(
                step = %step.step,
                path = %step.path.display(),
                details = %step.details,
                "step failed"
            ),
            _ => tracing::info!(
                step = %step.step,
                path = %step.path.display(),
                status = %step.status,
                "step finished"
            ),
        }
        self.steps.push(step);
    }

    /// Records `err` against the step. Non-fatal errors are absorbed; fatal
    /// ones are handed back so the caller stops the run.
    pub(crate) fn fail(&mut self, timer: StepTimer, err: ScaffoldError) -> ScaffoldResult<()> {
        let status = match &err {
            ScaffoldError::OverwriteDeclined { .. } => StepStatus::Declined,
            _ => StepStatus::Failed,
        };
        self.record(timer, status, err.to_string(), None);
        if err.is_fatal() { Err(err) } else { Ok(()) }
    }

    pub(crate) fn finish(self, outcome: ScaffoldResult<()>) -> GenerationReport {
        let all_done = self.steps.iter().all(|step| {
            matches!(
                step.status,
                StepStatus::Generated | StepStatus::Updated | StepStatus::Removed
            )
        });
        let (status, error) = match outcome {
            Err(err) => {
                tracing::error!(
                    category = %err.category(),
                    error = %err,
                    "run aborted"
                );
                (RunStatus::Failed, Some(err.to_string()))
            }
            Ok(()) if all_done => (RunStatus::Success, None),
            Ok(()) => (RunStatus::Partial, None),
        };
        let elapsed = self.started.elapsed();
        crate::log_slow_operation!(
            elapsed,
            SLOW_RUN_MS,
            model = %self.model,
            status = %status,
            "run finished"
        );
        GenerationReport {
            operation: self.operation,
            target: self.target,
            model: self.model,
            status,
            steps: self.steps,
            diagnostics: self.diagnostics,
            error,
            duration_ms: elapsed.as_millis() as u64,
        }
    }
}

/// Inputs of a generate run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub target: Target,
    pub model: String,
    pub title: String,
}

static MODEL_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("model name pattern is valid"));

/// Model names become class names and path segments, so only identifiers
/// are accepted.
pub fn validate_model_name(model: &str) -> ScaffoldResult<()> {
    if MODEL_NAME.is_match(model) {
        Ok(())
    } else {
        Err(ScaffoldError::config(format!(
            "invalid model name {model:?}: expected a letter followed by letters, digits or underscores"
        )))
    }
}

/// Runs generation and removal against one workspace.
#[derive(Clone)]
pub struct Generator {
    writer: ArtifactWriter,
    renderer: Arc<dyn Renderer>,
    prompt: Arc<dyn OverwritePrompt>,
    force: bool,
}

impl Generator {
    pub fn new(
        writer: ArtifactWriter,
        renderer: Arc<dyn Renderer>,
        prompt: Arc<dyn OverwritePrompt>,
    ) -> Self {
        Self {
            writer,
            renderer,
            prompt,
            force: false,
        }
    }

    /// Overwrite existing artifacts without asking.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn writer(&self) -> &ArtifactWriter {
        &self.writer
    }

    /// Loads the table's columns, classifies them and runs the target's
    /// generation steps. Column source failures abort before any step.
    pub async fn generate(
        &self,
        request: &GenerateRequest,
        source: &dyn ColumnSource,
    ) -> ScaffoldResult<GenerationReport> {
        validate_model_name(&request.model)?;
        let entity = EntityNames::new(request.model.as_str());
        let records = source.columns(entity.table_name()).await?;
        let table = ClassifiedTable::new(entity, records);

        let notes: Vec<String> = diagnostics(&table.columns)
            .into_iter()
            .map(|diagnostic| {
                tracing::warn!(error = %diagnostic, "column type has no mapping");
                diagnostic.to_string()
            })
            .collect();

        let report = match request.target {
            Target::Php => self.generate_php(&table, &request.title, notes).await,
            Target::Web => self.generate_web(&table, &request.title, notes).await,
        };
        Ok(report)
    }

    /// Asks before replacing `path` unless forced. A decline surfaces as
    /// `OverwriteDeclined`.
    pub(crate) async fn confirm_overwrite(&self, relative: &Path) -> ScaffoldResult<()> {
        if self.force || !self.writer.exists(relative).await? {
            return Ok(());
        }
        let resolved = self.writer.resolve(relative)?;
        if self.prompt.confirm_overwrite(&resolved).await? {
            Ok(())
        } else {
            Err(ScaffoldError::OverwriteDeclined {
                path: relative.to_path_buf(),
            })
        }
    }

    /// Step: render one dedicated artifact and write it after the overwrite
    /// check.
    pub(crate) async fn file_step(
        &self,
        log: &mut RunLog,
        name: &'static str,
        relative: PathBuf,
        template_id: &str,
        context: RenderContext,
    ) -> ScaffoldResult<()> {
        let timer = log.start(name, relative.clone());
        if let Err(err) = self.confirm_overwrite(&relative).await {
            return log.fail(timer, err);
        }
        match self.render_and_write(&relative, template_id, &context).await {
            Ok((details, hash)) => {
                log.record(timer, StepStatus::Generated, details, Some(hash));
                Ok(())
            }
            Err(err) => log.fail(timer, err),
        }
    }

    /// Step: render several files into one directory, asking once for the
    /// directory as a whole. Files are written one after another in the
    /// given order.
    pub(crate) async fn directory_step(
        &self,
        log: &mut RunLog,
        name: &'static str,
        directory: PathBuf,
        files: Vec<(String, String, RenderContext)>,
    ) -> ScaffoldResult<()> {
        let timer = log.start(name, directory.clone());
        if let Err(err) = self.confirm_overwrite(&directory).await {
            return log.fail(timer, err);
        }

        let mut hashes = String::new();
        let mut written = Vec::with_capacity(files.len());
        for (file_name, template_id, context) in &files {
            let relative = directory.join(file_name);
            match self.render_and_write(&relative, template_id, context).await {
                Ok((_, hash)) => {
                    hashes.push_str(&hash);
                    written.push(file_name.as_str());
                }
                Err(err) => return log.fail(timer, err),
            }
        }
        let details = format!("{} files: {}", written.len(), written.join(", "));
        log.record(timer, StepStatus::Generated, details, Some(content_hash(&hashes)));
        Ok(())
    }

    /// Step: render a fragment and splice it into an aggregate file.
    pub(crate) async fn splice_step(
        &self,
        log: &mut RunLog,
        name: &'static str,
        relative: PathBuf,
        anchor: &AnchorSpec,
        template_id: &str,
        context: RenderContext,
    ) -> ScaffoldResult<()> {
        let timer = log.start(name, relative.clone());
        let fragment = match self.renderer.render(template_id, &context) {
            Ok(fragment) => fragment,
            Err(err) => return log.fail(timer, err),
        };
        let file = match self.writer.resolve(&relative) {
            Ok(path) => AggregateFile::new(path),
            Err(err) => return log.fail(timer, err),
        };
        match file.splice(anchor, &fragment).await {
            Ok(outcome) => {
                let details = format!(
                    "inserted {} bytes at offset {}",
                    outcome.inserted_bytes, outcome.offset
                );
                log.record(timer, StepStatus::Updated, details, Some(outcome.content_hash));
                Ok(())
            }
            Err(err) => log.fail(timer, err.at_path(&relative)),
        }
    }

    /// Step: delete a generated file or directory.
    pub(crate) async fn remove_step(
        &self,
        log: &mut RunLog,
        name: &'static str,
        relative: PathBuf,
    ) -> ScaffoldResult<()> {
        let timer = log.start(name, relative.clone());
        match self.writer.exists(&relative).await {
            Ok(true) => {}
            Ok(false) => {
                log.record(timer, StepStatus::Failed, "not found", None);
                return Ok(());
            }
            Err(err) => return log.fail(timer, err),
        }
        match self.writer.remove(&relative).await {
            Ok(_) => {
                log.record(timer, StepStatus::Removed, "", None);
                Ok(())
            }
            Err(err) => log.fail(timer, err),
        }
    }

    async fn render_and_write(
        &self,
        relative: &Path,
        template_id: &str,
        context: &RenderContext,
    ) -> ScaffoldResult<(String, String)> {
        let content = self.renderer.render(template_id, context)?;
        let written = self.writer.write(relative, content).await?;
        let details = if written.replaced {
            format!("replaced, {} bytes", written.bytes)
        } else {
            format!("{} bytes", written.bytes)
        };
        Ok((details, written.content_hash))
    }
}
