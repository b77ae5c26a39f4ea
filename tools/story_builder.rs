/// Story Builder: compiles a directory of Markdown scenes into story data.
///
/// Usage:
///   story_builder build [--root <dir>] [--config <file.ron>] [--scenes <dir>] [--output <file>] [--format js|json]
///   story_builder inspect <scene.md>

use clap::{Args, Parser, Subcommand, ValueEnum};
use scene_weaver::core::config::BuildConfig;
use scene_weaver::core::output::{write_story, OutputFormat};
use scene_weaver::core::story::build_story;
use scene_weaver::schema::scene::Scene;
use std::path::PathBuf;
use std::process;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "story_builder")]
#[command(about = "Builds story data from Markdown scene files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse every scene file and write the story data file
    Build(BuildArgs),
    /// Parse a single scene file and print it as JSON
    Inspect {
        /// Path to the scene file
        path: PathBuf,
    },
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// Project root that relative paths are resolved against
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// RON build configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scenes directory (overrides the config)
    #[arg(long)]
    scenes: Option<PathBuf>,

    /// Output file (overrides the config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (overrides the config)
    #[arg(long, value_enum)]
    format: Option<FormatArg>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Js,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Js => OutputFormat::Js,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let code = match cli.command {
        Command::Build(args) => run_build(args),
        Command::Inspect { path } => run_inspect(path),
    };
    process::exit(code);
}

fn run_build(args: BuildArgs) -> i32 {
    let mut config = match &args.config {
        Some(path) => match BuildConfig::load_from_ron(path) {
            Ok(config) => config,
            Err(e) => {
                error!(path = %path.display(), "failed to load config: {}", e);
                return 1;
            }
        },
        None => BuildConfig::default(),
    };
    if let Some(scenes) = args.scenes {
        config.scenes_dir = scenes;
    }
    if let Some(output) = args.output {
        config.output_file = output;
    }
    if let Some(format) = args.format {
        config.format = format.into();
    }
    let config = config.rooted_at(&args.root);

    info!(scenes = %config.scenes_dir.display(), "building story");
    let report = match build_story(&config) {
        Ok(report) => report,
        Err(e) => {
            error!("{}", e);
            return 1;
        }
    };

    if let Err(e) = write_story(
        &report.story,
        &config.output_file,
        config.format,
        &config.variable_name,
    ) {
        error!(path = %config.output_file.display(), "failed to write story: {}", e);
        return 1;
    }

    if !report.failures.is_empty() {
        warn!(count = report.failures.len(), "some scene files could not be parsed");
    }
    info!(
        "Built {} scenes -> {}",
        report.parsed,
        config.output_file.display()
    );
    0
}

fn run_inspect(path: PathBuf) -> i32 {
    let scene = match Scene::load_from_file(&path) {
        Ok(scene) => scene,
        Err(e) => {
            error!(path = %path.display(), "failed to read scene: {}", e);
            return 1;
        }
    };
    match serde_json::to_string_pretty(&scene) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            error!("failed to serialize scene: {}", e);
            1
        }
    }
}
