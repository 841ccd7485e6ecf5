use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use capi_advisor::commands::analyze::{self, AnalyzeOptions, OutputFormat};
use capi_advisor::commands::discovery::DiscoveryScope;
use capi_advisor::commands::kubeconfig::ClusterTarget;
use capi_advisor::commands::{doctor, tree};

/// Cluster API and Metal3 health advisor
#[derive(Parser)]
#[command(name = "capi-advisor", version)]
#[command(about = "Diagnose Cluster API / Metal3 deployments from their conditions", long_about = None)]
struct Cli {
    /// Kubeconfig file (default: $KUBECONFIG, then ~/.kube)
    #[arg(long, global = true)]
    kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use
    #[arg(long, global = true, env = "CAPI_ADVISOR_CONTEXT")]
    context: Option<String>,

    /// Disable coloured output
    #[arg(long, global = true)]
    no_color: bool,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze every component and print a health report
    Analyze {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Report)]
        output: OutputFormat,

        /// Print the dependency tree before the report
        #[arg(long)]
        tree: bool,
    },

    /// Print only the issues that need attention
    Doctor {
        /// Namespace to inspect (default: all namespaces)
        #[arg(short, long, env = "CAPI_ADVISOR_NAMESPACE")]
        namespace: Option<String>,
    },

    /// Print the dependency tree
    Tree {
        #[command(flatten)]
        scope: ScopeArgs,
    },
}

#[derive(Args)]
struct ScopeArgs {
    /// Namespace to inspect (default: all namespaces)
    #[arg(short, long, env = "CAPI_ADVISOR_NAMESPACE")]
    namespace: Option<String>,

    /// Only include resources of this cluster
    #[arg(short, long, env = "CAPI_ADVISOR_CLUSTER")]
    cluster: Option<String>,
}

impl From<ScopeArgs> for DiscoveryScope {
    fn from(args: ScopeArgs) -> Self {
        DiscoveryScope {
            namespace: args.namespace,
            cluster: args.cluster,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,capi_advisor={level}")));

    // `init` also installs the `log` bridge, so library `log::` records show up here
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let color = !cli.no_color && std::io::stdout().is_terminal();
    let target = ClusterTarget {
        kubeconfig: cli.kubeconfig,
        context: cli.context,
    };

    match cli.command {
        Commands::Analyze {
            scope,
            output,
            tree: show_tree,
        } => {
            let options = AnalyzeOptions {
                format: output,
                tree: show_tree,
                color,
            };
            analyze::run(&target, &scope.into(), options)
                .await
                .context("analysis failed")?;
        }
        Commands::Doctor { namespace } => {
            let scope = DiscoveryScope {
                namespace,
                cluster: None,
            };
            doctor::run(&target, &scope, color)
                .await
                .context("diagnostics failed")?;
        }
        Commands::Tree { scope } => {
            tree::run(&target, &scope.into(), color)
                .await
                .context("could not build the dependency tree")?;
        }
    }
    Ok(())
}
