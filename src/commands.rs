use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use crate::embeddings::OllamaClient;
use crate::engine::RagEngine;
use crate::generation::GenerationClient;
use crate::index::VectorStore;
use crate::server::run_server;

/// Show the effective configuration, writing the file first when requested.
#[inline]
pub fn show_config(init: bool) -> Result<()> {
    let config = Config::load_default().context("Failed to load configuration")?;

    if init {
        config.save().context("Failed to write config file")?;
        println!("Wrote {}", config.config_file_path().display());
    }

    println!("Base directory: {}", config.base_dir.display());
    println!();
    print!(
        "{}",
        toml::to_string_pretty(&config).context("Failed to render configuration")?
    );

    Ok(())
}

/// Seed topic records and build the knowledge base from scratch.
#[inline]
pub async fn build_knowledge_base() -> Result<()> {
    let config = Config::load_default().context("Failed to load configuration")?;
    let engine = RagEngine::new(config)
        .await
        .context("Failed to initialize engine")?;

    info!("Starting knowledge base build");

    if engine.initialize().await {
        println!(
            "✅ Knowledge base built ({} chunks indexed)",
            engine.entry_count().await
        );
    } else {
        println!("❌ Knowledge base build failed");
        println!("Check that the embedding backend is running ('campus-qa status').");
    }

    Ok(())
}

/// Answer a single question from the command line.
#[inline]
pub async fn ask_question(question: &str, top_k: usize) -> Result<()> {
    let config = Config::load_default().context("Failed to load configuration")?;
    let engine = RagEngine::new(config)
        .await
        .context("Failed to initialize engine")?;

    if !engine.is_ready() {
        println!("⚠️  Retrieval unavailable, answering from the canned fallback table");
        println!();
    }

    let answer = engine.query(question, top_k).await;

    println!("{}", answer.answer);
    println!();
    if answer.sources.is_empty() {
        println!("Sources: none");
    } else {
        println!("Sources: {}", answer.sources.join(", "));
    }

    Ok(())
}

/// Show connectivity and knowledge-base state.
#[inline]
pub async fn show_status() -> Result<()> {
    let config = Config::load_default().unwrap_or_else(|_| Config {
        ollama: Default::default(),
        generation: Default::default(),
        chunking: Default::default(),
        base_dir: std::path::PathBuf::new(),
    });

    println!("📊 Campus-QA Status Report");
    println!("{}", "=".repeat(50));
    println!();

    println!("🤖 Embedding Backend:");
    match OllamaClient::new(&config.ollama) {
        Ok(client) => match client.health_check() {
            Ok(()) => {
                println!(
                    "   ✅ Ollama: Connected ({}:{})",
                    config.ollama.host, config.ollama.port
                );
                println!("   📋 Model: {}", config.ollama.model);
                println!("   🔢 Batch Size: {}", config.ollama.batch_size);
            }
            Err(e) => {
                println!("   ⚠️  Ollama: Unhealthy - {:#}", e);
            }
        },
        Err(e) => {
            println!("   ❌ Ollama: Misconfigured - {:#}", e);
        }
    }

    println!("🔍 Vector Collection:");
    match VectorStore::open(&config.vector_db_path(), config.ollama.embedding_dimension).await {
        Ok(store) => match store.is_built().await {
            Ok(true) => {
                let count = store.count_entries().await.unwrap_or(0);
                println!("   ✅ Built with {} entries", count);
            }
            Ok(false) => {
                println!("   📭 Not built yet (run 'campus-qa build')");
            }
            Err(e) => {
                println!("   ⚠️  Unreadable - {}", e);
            }
        },
        Err(e) => {
            println!("   ❌ Failed to open - {}", e);
        }
    }

    println!("💬 Generation Service:");
    let generation = GenerationClient::new(&config.generation);
    if generation.is_configured() {
        println!("   ✅ Credential present, generation enabled");
    } else {
        println!("   💤 No credential, answers are composed locally");
    }

    println!();
    println!("💡 Next Steps:");
    println!("   • Use 'campus-qa build' to (re)build the knowledge base");
    println!("   • Use 'campus-qa ask \"<question>\"' for a one-off answer");
    println!("   • Use 'campus-qa serve' to start the HTTP API");

    Ok(())
}

/// Start the HTTP API, building the knowledge base first when needed.
#[inline]
pub async fn serve_http(port: u16) -> Result<()> {
    let config = Config::load_default().context("Failed to load configuration")?;
    let engine = RagEngine::new(config)
        .await
        .context("Failed to initialize engine")?;

    if engine.is_built().await {
        info!("Knowledge base already built, serving existing collection");
    } else {
        println!("📚 Knowledge base not found, building...");
        if engine.initialize().await {
            println!("✅ Knowledge base ready");
        } else {
            warn!("Knowledge base build failed, serving fallback answers only");
            println!("⚠️  Build failed; the API will serve fallback answers");
        }
    }

    let bind_addr = format!("0.0.0.0:{}", port);
    run_server(Arc::new(engine), &bind_addr).await
}
