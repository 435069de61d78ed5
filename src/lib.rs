pub mod config;
pub mod derive;
pub mod error;
pub mod generate;
pub mod inflect;
pub mod logging;
pub mod prompt;
pub mod schema;
pub mod source;
pub mod splice;
pub mod template;
pub mod writer;

pub use config::{Action, CliArgs, GeneratorConfig, ReportFormat};
pub use error::{ErrorCategory, ScaffoldError, ScaffoldResult};
pub use generate::{GenerateRequest, GenerationReport, Generator, RunStatus, Target};
pub use logging::{LoggingConfig, init_logging};

use anyhow::{Context, Result};
use prompt::{AssumeNo, AssumeYes, OverwritePrompt, StdinPrompt};
use source::JsonColumnSource;
use std::sync::Arc;
use template::{Renderer, TeraRenderer};
use tracing::Instrument;
use writer::ArtifactWriter;

/// Builds the generator a configuration describes: workspace writer,
/// renderer with optional overrides, and the overwrite policy.
pub fn build_generator(config: &GeneratorConfig) -> Result<Generator> {
    let renderer: Arc<dyn Renderer> = match config.template_dir.as_ref() {
        Some(dir) => Arc::new(
            TeraRenderer::with_overrides(dir)
                .with_context(|| format!("failed to load templates from {:?}", dir))?,
        ),
        None => Arc::new(TeraRenderer::builtin().context("failed to load built-in templates")?),
    };
    let prompt: Arc<dyn OverwritePrompt> = if config.force {
        Arc::new(AssumeYes)
    } else if config.no_input {
        Arc::new(AssumeNo)
    } else {
        Arc::new(StdinPrompt::new())
    };

    Ok(Generator::new(
        ArtifactWriter::new(config.workspace_root.clone()),
        renderer,
        prompt,
    )
    .force(config.force))
}

pub async fn run(config: GeneratorConfig) -> Result<GenerationReport> {
    config.ensure_workspace_root()?;
    let generator = build_generator(&config)?;

    let report = match &config.action {
        Action::Generate { request, columns } => {
            let span = logging::run_span("generate", &request.target.to_string(), &request.model);
            let source = JsonColumnSource::new(columns.clone());
            generator
                .generate(request, &source)
                .instrument(span)
                .await
                .with_context(|| format!("cannot generate {}", request.model))?
        }
        Action::Remove { target, model } => {
            let span = logging::run_span("remove", &target.to_string(), model);
            generator
                .remove(*target, model)
                .instrument(span)
                .await
                .with_context(|| format!("cannot remove {model}"))?
        }
    };
    Ok(report)
}
