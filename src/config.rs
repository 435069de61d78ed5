use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::generate::{GenerateRequest, Target, validate_model_name};

/// Display title used for php artifacts when none is given.
pub const DEFAULT_TITLE: &str = "数据";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// One line per step.
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Generate {
        request: GenerateRequest,
        columns: PathBuf,
    },
    Remove {
        target: Target,
        model: String,
    },
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub workspace_root: PathBuf,
    pub template_dir: Option<PathBuf>,
    pub force: bool,
    /// Decline every overwrite instead of asking on the terminal.
    pub no_input: bool,
    pub report_format: ReportFormat,
    pub action: Action,
}

impl GeneratorConfig {
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let CliArgs {
            config,
            workspace_root: cli_workspace_root,
            template_dir: cli_template_dir,
            report_format: cli_report_format,
            command,
        } = args;

        let file_config = if let Some(path) = config.as_ref() {
            load_config_file(path)?
        } else {
            PartialConfig::default()
        };

        let PartialConfig {
            workspace_root: file_workspace_root,
            template_dir: file_template_dir,
            force: file_force,
            default_title: file_default_title,
            report_format: file_report_format,
        } = file_config;

        let workspace_root = cli_workspace_root
            .or(file_workspace_root)
            .unwrap_or_else(|| PathBuf::from("."));

        let template_dir = cli_template_dir.or(file_template_dir).map(|dir| {
            if dir.is_absolute() {
                dir
            } else {
                workspace_root.join(dir)
            }
        });

        let report_format = cli_report_format
            .or(file_report_format)
            .unwrap_or_default();

        let (action, force, no_input) = match command {
            Command::Generate(GenerateArgs {
                target,
                model,
                columns,
                title,
                force,
                no_input,
            }) => {
                validate_model_name(&model)?;
                let title = match (title, target) {
                    (Some(title), _) if !title.trim().is_empty() => title.trim().to_string(),
                    (_, Target::Web) => anyhow::bail!("the web target needs a non-empty --title"),
                    (_, Target::Php) => file_default_title
                        .filter(|title| !title.trim().is_empty())
                        .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
                };
                let action = Action::Generate {
                    request: GenerateRequest {
                        target,
                        model,
                        title,
                    },
                    columns,
                };
                (action, force || file_force.unwrap_or(false), no_input)
            }
            Command::Remove(RemoveArgs { target, model }) => {
                validate_model_name(&model)?;
                (Action::Remove { target, model }, false, false)
            }
        };

        Ok(Self {
            workspace_root,
            template_dir,
            force,
            no_input,
            report_format,
            action,
        })
    }

    /// The workspace root, and the template directory when one is set, must
    /// be existing directories.
    pub fn ensure_workspace_root(&self) -> Result<()> {
        let dirs = std::iter::once(("workspace root", &self.workspace_root))
            .chain(self.template_dir.iter().map(|dir| ("template directory", dir)));
        for (label, dir) in dirs {
            anyhow::ensure!(dir.is_dir(), "{label} {:?} is not an existing directory", dir);
        }
        Ok(())
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "lemoe-crud",
    about = "Scaffold Laravel and Vue CRUD code from table column metadata",
    version
)]
pub struct CliArgs {
    #[arg(
        long,
        value_name = "FILE",
        help = "Path to a configuration file (YAML, JSON or TOML)",
        global = true
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        env = "LEMOE_CRUD_WORKSPACE",
        value_name = "DIR",
        help = "Project root the generated paths are relative to",
        global = true
    )]
    pub workspace_root: Option<PathBuf>,

    #[arg(
        long,
        env = "LEMOE_CRUD_TEMPLATE_DIR",
        value_name = "DIR",
        help = "Directory of <id>.tera files overriding built-in templates",
        global = true
    )]
    pub template_dir: Option<PathBuf>,

    #[arg(
        long = "format",
        env = "LEMOE_CRUD_FORMAT",
        value_enum,
        value_name = "FORMAT",
        help = "How the run report is printed",
        global = true
    )]
    pub report_format: Option<ReportFormat>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate the artifacts of one model.
    #[command(alias = "g")]
    Generate(GenerateArgs),
    /// Remove the dedicated artifacts of one model.
    #[command(alias = "r")]
    Remove(RemoveArgs),
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(long, value_enum, help = "Stack to generate for")]
    pub target: Target,

    #[arg(long, help = "Model name, e.g. productCategory")]
    pub model: String,

    #[arg(
        long,
        env = "LEMOE_CRUD_COLUMNS",
        value_name = "FILE",
        help = "JSON export of SHOW FULL COLUMNS for the model's table"
    )]
    pub columns: PathBuf,

    #[arg(long, help = "Display title; required for the web target")]
    pub title: Option<String>,

    #[arg(short = 'f', long, help = "Overwrite existing artifacts without asking")]
    pub force: bool,

    #[arg(long, help = "Never prompt; existing artifacts are left alone")]
    pub no_input: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RemoveArgs {
    #[arg(long, value_enum, help = "Stack to remove from")]
    pub target: Target,

    #[arg(long, help = "Model name")]
    pub model: String,
}

#[derive(Debug, Default, Deserialize)]
struct PartialConfig {
    workspace_root: Option<PathBuf>,
    template_dir: Option<PathBuf>,
    force: Option<bool>,
    default_title: Option<String>,
    report_format: Option<ReportFormat>,
}

fn load_config_file(path: &Path) -> Result<PartialConfig> {
    let format = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let contents =
        fs::read_to_string(path).with_context(|| format!("cannot read config file {:?}", path))?;

    let parsed = match format.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&contents).map_err(anyhow::Error::from),
        "json" => serde_json::from_str(&contents).map_err(anyhow::Error::from),
        "toml" => toml::from_str(&contents).map_err(anyhow::Error::from),
        other => anyhow::bail!("unsupported config extension {other:?} for {:?}", path),
    };
    parsed.with_context(|| format!("invalid {format} config {:?}", path))
}
