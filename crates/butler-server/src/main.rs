//! homebutler — home butler assistant server and CLI.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

mod routes;
mod state;

use butler_chat::{LlmClient, LlmConfig, ToolRegistry};
use butler_core::ButlerConfig;
use butler_home::{HaClient, HaConfig};
use butler_store::{CalendarStore, Database, InventoryStore};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "chat" => {
                if args.len() < 3 {
                    eprintln!("Please provide a message to send.");
                    std::process::exit(1);
                }
                return run_chat(&args[2]).await;
            }
            "db" => {
                return run_db_example(args.get(2).map(String::as_str));
            }
            "version" | "--version" => {
                println!("homebutler {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("homebutler — home butler assistant");
                println!();
                println!("Usage: homebutler [command]");
                println!();
                println!("Commands:");
                println!("  (none)            Start the server");
                println!("  chat <message>    Send one message to the butler");
                println!("  db [path]         Exercise the key-value/query store");
                println!("  version           Print the version");
                println!("  help              Show this help message");
                return Ok(());
            }
            other => {
                eprintln!("Unknown command: {}. Use 'homebutler help' for usage.", other);
                std::process::exit(1);
            }
        }
    }

    serve().await
}

async fn serve() -> anyhow::Result<()> {
    let config = ButlerConfig::from_env()?;

    let inventory = Arc::new(
        InventoryStore::open(&config.db_path)
            .map_err(|e| anyhow::anyhow!("Failed to open inventory store: {}", e))?,
    );
    let calendar = Arc::new(
        CalendarStore::open(&config.db_path)
            .map_err(|e| anyhow::anyhow!("Failed to open calendar store: {}", e))?,
    );

    let ha_config = HaConfig::from_env();
    let home = HaClient::new(ha_config.clone()).map(Arc::new);
    if home.is_none() {
        info!("HA_TOKEN not set; Home Assistant integration disabled");
    }

    let tools = ToolRegistry::new(inventory.clone(), home.clone());
    let llm = LlmClient::new(LlmConfig::from_env(), tools);
    info!("LLM endpoint: {}", llm.config().url);

    let state = Arc::new(AppState::new(
        config, ha_config, inventory, calendar, llm, home,
    ));
    let addr = format!("0.0.0.0:{}", state.config.port);
    let app = routes::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("homebutler server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// One-shot chat through the same client the server uses.
async fn run_chat(message: &str) -> anyhow::Result<()> {
    let config = ButlerConfig::from_env()?;
    let inventory = Arc::new(
        InventoryStore::open(&config.db_path)
            .map_err(|e| anyhow::anyhow!("Failed to open inventory store: {}", e))?,
    );
    let home = HaClient::new(HaConfig::from_env()).map(Arc::new);

    let context = match &home {
        Some(home) => home.context().await.ok().filter(|c| !c.is_empty()),
        None => None,
    };

    let tools = ToolRegistry::new(inventory, home);
    let llm = LlmClient::new(LlmConfig::from_env(), tools);

    match llm.chat(message, context.as_deref()).await {
        Ok(reply) => println!("{}", reply.content.trim_end()),
        Err(e) => {
            eprintln!("Error sending message: {}", e);
            println!("I'm sorry, I couldn't process your request. Please try again later.");
        }
    }
    Ok(())
}

/// Exercise the dual-backend store end to end against a scratch file.
fn run_db_example(path: Option<&str>) -> anyhow::Result<()> {
    let path = path.unwrap_or("example.db").to_string();

    Database::with(&path, |db| {
        db.set("key1", "value1")?;
        println!("From kv:    {:?}", db.get("key1")?);
        db.query("CREATE TABLE IF NOT EXISTS test (id INTEGER PRIMARY KEY, value TEXT)")?;
        db.query("INSERT INTO test (value) VALUES ('test_value')")?;
        println!("From query: {:?}", db.query("SELECT * FROM test")?);
        Ok(())
    })
    .map_err(|e| anyhow::anyhow!("Error interacting with the database: {}", e))?;

    std::fs::remove_file(&path)?;
    Ok(())
}
