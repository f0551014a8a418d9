use blogql::error::Result;
use clap::{Parser, Subcommand};

mod cli;

#[derive(Parser)]
#[command(name = "blogql")]
#[command(version = "0.1.0")]
#[command(about = "Query blog posts and authors with GraphQL", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a GraphQL query and print the JSON response
    Query {
        /// Query text (defaults to listing every post)
        query: Option<String>,

        /// Read the query from a file instead
        #[arg(long, conflicts_with = "query")]
        file: Option<String>,

        /// Variables as a JSON object
        #[arg(long)]
        variables: Option<String>,

        /// Operation to run when the document defines several
        #[arg(long)]
        operation: Option<String>,

        /// Config file path (uses the sample blog if not specified)
        #[arg(long)]
        config: Option<String>,

        /// Pretty-print the response
        #[arg(long)]
        pretty: bool,
    },

    /// Print the schema in GraphQL SDL
    Schema {
        /// Config file path (uses the sample blog if not specified)
        #[arg(long)]
        config: Option<String>,
    },

    /// Generate an example configuration
    Init {
        /// Output config file path (if not specified, outputs to stdout)
        #[arg(long)]
        output: Option<String>,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the response
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Query {
            query,
            file,
            variables,
            operation,
            config,
            pretty,
        } => {
            cli::query::run(query, file, variables, operation, config, pretty)?;
        }
        Commands::Schema { config } => {
            cli::schema::run(config)?;
        }
        Commands::Init { output } => {
            cli::init::run(output)?;
        }
    }

    Ok(())
}
