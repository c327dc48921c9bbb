//! notifytpl command-line tool
//!
//! Previews message templates and reconciles template imports against a
//! store file, outside the management console.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use notifytpl::{EngineConfig, ImportPolicy, Interpreter};
use tracing::{error, info};

mod commands;
mod error;

use error::Result;

#[derive(Parser)]
#[command(name = "notifytpl")]
#[command(about = "Preview notification templates and reconcile template imports")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a template with sample data
    Preview {
        /// Template record (JSON), or a bare body with --raw
        template: PathBuf,

        /// JSON object with preview data
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Treat the template file as a bare template body
        #[arg(long)]
        raw: bool,
    },

    /// Show what an import would do without writing anything
    Plan {
        #[command(flatten)]
        source: ImportSource,

        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// Import a template bundle into a store file
    Import {
        #[command(flatten)]
        source: ImportSource,

        #[command(flatten)]
        policy: PolicyArgs,

        /// Write the updated store here instead of in place
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export a store file as a shareable bundle
    Export {
        /// Store file (JSON object of id -> template)
        #[arg(short, long)]
        store: PathBuf,

        /// Bundle destination, stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct ImportSource {
    /// Bundle with `exportType: templates`
    #[arg(short, long)]
    payload: PathBuf,

    /// Store file (JSON object of id -> template)
    #[arg(short, long)]
    store: PathBuf,
}

#[derive(Args)]
struct PolicyArgs {
    /// Replace templates whose id already exists
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    overwrite: Option<bool>,

    /// Store conflicting templates under a generated id
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    generate_new_ids: Option<bool>,
}

impl PolicyArgs {
    fn resolve(&self, defaults: ImportPolicy) -> ImportPolicy {
        ImportPolicy {
            overwrite: self.overwrite.unwrap_or(defaults.overwrite),
            generate_new_ids: self.generate_new_ids.unwrap_or(defaults.generate_new_ids),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "notifytpl=info,notifytpl_cli=info".to_string()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String> {
    let config = EngineConfig::from_env()?;
    info!(
        version = notifytpl::version(),
        max_template_bytes = config.max_template_bytes,
        "notifytpl starting"
    );

    match cli.command {
        Command::Preview {
            template,
            data,
            raw,
        } => commands::preview(
            &Interpreter::from_config(&config),
            &template,
            data.as_deref(),
            raw,
        ),
        Command::Plan { source, policy } => commands::plan(
            &source.payload,
            &source.store,
            policy.resolve(config.default_policy),
        ),
        Command::Import {
            source,
            policy,
            output,
        } => {
            commands::import(
                &source.payload,
                &source.store,
                output.as_deref(),
                policy.resolve(config.default_policy),
            )
            .await
        }
        Command::Export { store, output } => commands::export(&store, output.as_deref()),
    }
}
