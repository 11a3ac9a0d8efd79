//! CLI entry point for the Lattice knowledge-graph client.
//!
//! Thin wrapper over `lattice-client`: one subcommand per API operation,
//! JSON results on stdout, diagnostics on stderr. Mutation payloads are
//! read as JSON from stdin for easy scripting.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use lattice_client::{
    ApiConfig, GraphApiClient, GraphSearchRequest, RetrieveGraphRequest,
};
use lattice_core::{
    EntityId, EntityUpdate, KnowledgeBaseId, RelationshipId, RelationshipUpdate,
    SynopsisEntityCreate,
};

#[derive(Parser)]
#[command(name = "lattice")]
#[command(about = "Client for the Lattice knowledge-graph admin API")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Knowledge base to operate on.
    #[arg(long, global = true, default_value_t = 1)]
    kb: i64,

    /// Config file prefix (default: lattice).
    #[arg(short, long, default_value = "lattice", global = true)]
    config: String,
}

#[derive(Subcommand)]
enum Command {
    /// Entity lookups and mutations.
    Entity {
        #[command(subcommand)]
        command: EntityCommand,
    },
    /// Relationship lookups and mutations.
    Relationship {
        #[command(subcommand)]
        command: RelationshipCommand,
    },
    /// Create a synopsis entity (reads a SynopsisEntityCreate JSON from stdin).
    Synopsis,
    /// One-shot graph retrieval for a query.
    Retrieve {
        #[arg(long)]
        query: String,
        #[arg(long, default_value_t = 10)]
        top_k: u32,
    },
    /// Legacy graph search against older servers.
    Search {
        #[arg(long)]
        query: String,
        #[arg(long, default_value_t = 10)]
        top_k: u32,
        #[arg(long, default_value_t = 0.5)]
        similarity_threshold: f64,
    },
    /// Stream the graph for a query, printing the accumulated result.
    Stream {
        #[arg(long)]
        query: String,
    },
}

#[derive(Subcommand)]
enum EntityCommand {
    /// Get one entity by id.
    Get {
        #[arg(long)]
        id: i64,
    },
    /// Search entities by free-text query.
    Search {
        #[arg(long)]
        query: String,
        #[arg(long, default_value_t = 10)]
        top_k: u32,
    },
    /// Update an entity (reads an EntityUpdate JSON from stdin).
    Update {
        #[arg(long)]
        id: i64,
    },
    /// Get the subgraph around an entity.
    Subgraph {
        #[arg(long)]
        id: i64,
    },
}

#[derive(Subcommand)]
enum RelationshipCommand {
    /// Get one relationship by id.
    Get {
        #[arg(long)]
        id: i64,
    },
    /// Update a relationship (reads a RelationshipUpdate JSON from stdin).
    Update {
        #[arg(long)]
        id: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let client = GraphApiClient::new(load_api_config(&cli.config))?;
    let kb = KnowledgeBaseId(cli.kb);

    match cli.command {
        Command::Entity { command } => match command {
            EntityCommand::Get { id } => {
                print_json(&client.get_entity(kb, EntityId(id)).await?)?;
            }
            EntityCommand::Search { query, top_k } => {
                print_json(&client.search_entities(kb, &query, top_k).await?)?;
            }
            EntityCommand::Update { id } => {
                let update: EntityUpdate = read_stdin_json()?;
                print_json(&client.update_entity(kb, EntityId(id), &update).await?)?;
            }
            EntityCommand::Subgraph { id } => {
                print_json(&client.get_entity_subgraph(kb, EntityId(id)).await?)?;
            }
        },
        Command::Relationship { command } => match command {
            RelationshipCommand::Get { id } => {
                print_json(&client.get_relationship(kb, RelationshipId(id)).await?)?;
            }
            RelationshipCommand::Update { id } => {
                let update: RelationshipUpdate = read_stdin_json()?;
                print_json(
                    &client
                        .update_relationship(kb, RelationshipId(id), &update)
                        .await?,
                )?;
            }
        },
        Command::Synopsis => {
            let request: SynopsisEntityCreate = read_stdin_json()?;
            print_json(&client.create_synopsis_entity(kb, &request).await?)?;
        }
        Command::Retrieve { query, top_k } => {
            let request = RetrieveGraphRequest { query, top_k };
            print_json(&client.retrieve_graph(kb, &request).await?)?;
        }
        Command::Search {
            query,
            top_k,
            similarity_threshold,
        } => {
            let request = GraphSearchRequest {
                query,
                top_k,
                similarity_threshold,
            };
            print_json(&client.search_graph(kb, &request).await?)?;
        }
        Command::Stream { query } => {
            let result = client.stream_knowledge_graph(kb, &query).await?;
            tracing::info!(
                end = ?result.end,
                entities = result.graph.entities.len(),
                relationships = result.graph.relationships.len(),
                "stream finished"
            );
            print_json(&result.graph)?;
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_stdin_json<T: serde::de::DeserializeOwned>() -> anyhow::Result<T> {
    let input = std::io::read_to_string(std::io::stdin())?;
    Ok(serde_json::from_str(&input)?)
}

fn load_api_config(file_prefix: &str) -> ApiConfig {
    let defaults = ApiConfig::default();
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix("LATTICE")
                .separator("__")
                .try_parsing(true),
        )
        .build();

    match cfg {
        Ok(c) => api_config_from(&c, defaults),
        Err(_) => defaults,
    }
}

fn api_config_from(c: &config::Config, defaults: ApiConfig) -> ApiConfig {
    ApiConfig {
        base_url: c
            .get_string("api.base_url")
            .unwrap_or(defaults.base_url),
        api_key: c.get_string("api.api_key").unwrap_or_default(),
        // Negative values are not a usable timeout; fall back to the default.
        timeout_secs: c
            .get_int("api.timeout_secs")
            .ok()
            .and_then(|v| u64::try_from(v).ok())
            .unwrap_or(defaults.timeout_secs),
    }
}
