use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use nova_apt::{
    check_subclassable, AptProgressEvent, FsFiler, ImmutableWrapperProcessor, ProgressReporter,
    Round, RoundReport,
};
use nova_config::{load_for_workspace, NovaConfig};
use nova_framework::{MemoryTypeProvider, TypeProvider};
use nova_framework_immutable::{resolve, GenerationContext, MethodKind};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nova", version, about = "Nova CLI (immutable wrapper generation)")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate wrappers for every annotated class in a type model
    Generate(GenerateArgs),
    /// Print the wrapper source for a single class without writing it
    Render(RenderArgs),
    /// Show the resolved method set of a class
    Methods(MethodsArgs),
    /// Inspect `nova.toml`
    Config(ConfigArgs),
}

#[derive(Args)]
struct ModelArgs {
    /// JSON type model describing the classes to process
    #[arg(long)]
    model: PathBuf,
    /// Workspace root used for config discovery and relative output paths
    #[arg(long, default_value = ".")]
    root: PathBuf,
    /// Explicit config file (skips discovery)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct GenerateArgs {
    #[command(flatten)]
    model: ModelArgs,
    /// Output directory (overrides `generated_sources.output_dir`)
    #[arg(long)]
    out: Option<PathBuf>,
    /// Emit JSON suitable for CI
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct RenderArgs {
    #[command(flatten)]
    model: ModelArgs,
    /// Fully qualified class name
    class: String,
}

#[derive(Args)]
struct MethodsArgs {
    #[command(flatten)]
    model: ModelArgs,
    /// Fully qualified class name
    class: String,
    /// Emit JSON suitable for CI
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the JSON schema for `nova.toml`
    Schema,
}

fn main() {
    let cli = Cli::parse();
    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            2
        }
    };

    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Command::Generate(args) => {
            let (config, db) = open(&args.model)?;
            let out = match args.out {
                Some(out) => out,
                None => config.generated_sources.resolve(&args.model.root),
            };

            let processor = ImmutableWrapperProcessor::new(config.immutable.wrapper_options())
                .with_annotation(config.immutable.annotation.clone());
            let mut filer = FsFiler::new(out);
            let report = processor.process(
                &db,
                Round::default(),
                &mut filer,
                &mut TracingProgressReporter,
            );

            let exit = if report.has_errors() { 1 } else { 0 };
            print_report(&report, args.json)?;
            Ok(exit)
        }
        Command::Render(args) => {
            let (config, db) = open(&args.model)?;
            let root = lookup(&db, &args.class)?;
            let class = db.class(root);
            if let Some(diagnostic) = check_subclassable(class, &config.immutable.annotation) {
                eprintln!("{diagnostic}");
                return Ok(1);
            }
            let ctx = GenerationContext::new(&db, root, config.immutable.wrapper_options());
            print!("{}", nova_framework_immutable::render(&ctx));
            Ok(0)
        }
        Command::Methods(args) => {
            let (_config, db) = open(&args.model)?;
            let root = lookup(&db, &args.class)?;
            let methods = resolve(&db, root);
            let rows: Vec<MethodRow> = methods
                .mutating()
                .chain(methods.other())
                .map(|m| MethodRow {
                    signature: m.signature(),
                    owner: db.class(m.owner).name.clone(),
                    kind: match m.kind {
                        MethodKind::Mutating => "mutating",
                        MethodKind::Forwarding => "forwarding",
                    },
                })
                .collect();
            print_methods(&rows, args.json)?;
            Ok(0)
        }
        Command::Config(args) => match args.command {
            ConfigCommand::Schema => {
                let schema = nova_config::json_schema();
                println!("{}", serde_json::to_string_pretty(&schema)?);
                Ok(0)
            }
        },
    }
}

/// Load config (explicit or discovered), install logging and read the model.
fn open(args: &ModelArgs) -> Result<(NovaConfig, MemoryTypeProvider)> {
    let config = match &args.config {
        Some(path) => NovaConfig::load_from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => {
            load_for_workspace(&args.root)
                .with_context(|| format!("failed to load config for {}", args.root.display()))?
                .0
        }
    };
    nova_config::init_tracing(&config.logging);

    let db = MemoryTypeProvider::load_from_path(&args.model)?;
    tracing::debug!(target: "nova.cli", classes = db.len(), "type model ready");
    Ok((config, db))
}

fn lookup(db: &MemoryTypeProvider, class: &str) -> Result<nova_types::ClassId> {
    db.lookup_class(class)
        .with_context(|| format!("class `{class}` is not in the type model"))
}

struct TracingProgressReporter;

impl ProgressReporter for TracingProgressReporter {
    fn event(&mut self, event: AptProgressEvent) {
        tracing::debug!(
            target: "nova.cli",
            kind = ?event.kind,
            class = event.class_name.as_deref().unwrap_or(""),
            "{}",
            event.message
        );
    }
}

#[derive(Serialize)]
struct MethodRow {
    signature: String,
    owner: String,
    kind: &'static str,
}

fn print_report(report: &RoundReport, json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(report)?;
        println!("{out}");
        return Ok(());
    }

    for generated in &report.generated {
        println!(
            "generated: {} -> {} ({} immutable, {} forwarded)",
            generated.target,
            generated.path.display(),
            generated.mutating,
            generated.forwarding
        );
    }
    for diagnostic in &report.diagnostics {
        println!("{diagnostic}");
    }
    println!(
        "summary: {} generated, {} errors",
        report.generated.len(),
        report.error_count()
    );
    Ok(())
}

fn print_methods(rows: &[MethodRow], json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(rows)?;
        println!("{out}");
        return Ok(());
    }

    for row in rows {
        println!("{:<10} {} ({})", row.kind, row.signature, row.owner);
    }
    Ok(())
}
