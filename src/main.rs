use chunkvault::config::{CoordinatorArgs, NodeArgs};
use chunkvault::{coordinator, node};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "chunkvault", version, about = "Chunked, replicated file storage")]
struct Cli {
    #[command(subcommand)]
    role: Role,
}

#[derive(Subcommand)]
enum Role {
    /// Run the coordinator: file API, placement and metadata
    Coordinator(CoordinatorArgs),
    /// Run a storage node that registers with a coordinator
    Node(NodeArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        // .with_max_level(tracing::Level::DEBUG)
        .with_max_level(tracing::Level::INFO)
        .init();

    let cli = Cli::parse();

    match cli.role {
        Role::Coordinator(args) => {
            tracing::info!("Starting coordinator on {}", args.bind);
            coordinator::service::run(args.into()).await
        }
        Role::Node(args) => {
            tracing::info!("Starting storage node on {}", args.bind);
            node::service::run(args.into()).await
        }
    }
}
