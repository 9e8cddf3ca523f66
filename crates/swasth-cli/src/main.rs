//! Swasth - conversational meal-planning assistant
//!
//! A terminal chat loop over the core orchestrator:
//! - One-time profile setup with derived health metrics
//! - `swasth seed` to load a recipe JSON file into the local database
//! - Responses rendered per type (plan, recipe details, web recipe, text)

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use swasth_core::profile::ProfileStore;
use swasth_core::retrieval::{insert_recipe, open_recipe_db, RecipeDocument};
use swasth_core::translate::translate_text;
use swasth_core::{Capabilities, Orchestrator};

mod render;
mod setup;

/// Swasth - your friendly AI nutritionist
#[derive(Parser)]
#[command(name = "swasth")]
#[command(about = "Conversational meal planning with a local recipe database", long_about = None)]
struct Cli {
    /// Path to the local database (defaults to the platform data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Generation model override
    #[arg(long, global = true)]
    model: Option<String>,

    /// Profile to chat as
    #[arg(long, global = true, default_value = "default")]
    user: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the chat loop (the default)
    Chat,

    /// Load recipes from a JSON file into the local database
    Seed {
        /// Path to a JSON array of recipe documents
        file: PathBuf,
    },

    /// Print the stored profile summary
    Profile,
}

fn default_db_path() -> Result<PathBuf> {
    let dir = dirs::data_dir()
        .context("could not determine the platform data directory")?
        .join("swasth");
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create data directory at {}", dir.display()))?;
    Ok(dir.join("swasth.db"))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with chat output on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let db_path = match &cli.db {
        Some(path) => path.clone(),
        None => default_db_path()?,
    };

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Seed { file } => seed(&db_path, &file),
        Commands::Profile => show_profile(&db_path, &cli.user),
        Commands::Chat => chat(&db_path, cli.model.as_deref(), &cli.user).await,
    }
}

fn seed(db_path: &PathBuf, file: &PathBuf) -> Result<()> {
    let data = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read seed file {}", file.display()))?;
    let documents: Vec<RecipeDocument> = serde_json::from_str(&data)
        .with_context(|| format!("seed file {} is not a JSON array of recipes", file.display()))?;

    let conn = open_recipe_db(db_path)?;
    for doc in &documents {
        insert_recipe(&conn, doc)?;
    }

    println!("Loaded {} recipes into {}", documents.len(), db_path.display());
    Ok(())
}

fn show_profile(db_path: &PathBuf, user: &str) -> Result<()> {
    let store = ProfileStore::new(db_path.clone());
    match store.load(user)? {
        Some(profile) => println!("{}", profile.summary()),
        None => println!("No profile yet. Run `swasth` to set one up."),
    }
    Ok(())
}

async fn chat(db_path: &PathBuf, model: Option<&str>, user: &str) -> Result<()> {
    let store = ProfileStore::new(db_path.clone());

    let mut profile = match store.load(user)? {
        Some(profile) if profile.is_complete() => profile,
        _ => {
            println!("Let's set up your profile first.\n");
            let profile = setup::collect_profile()?;
            store.save(user, &profile)?;
            println!("\n{}\n", profile.summary());
            profile
        }
    };

    if store.needs_weight_update(user)? {
        if let Some(weight) = setup::ask_weight_update()? {
            profile.weight_kg = Some(weight);
        }
        // Saving refreshes the timestamp either way, so the prompt won't
        // repeat every session after a decline.
        store.save(user, &profile)?;
    }

    let capabilities = Capabilities::from_env(db_path, model);
    let orchestrator = Orchestrator::new(capabilities.clone()).await;

    let greeting = translate_text(
        capabilities.generation.as_ref(),
        "Namaste! I'm Swa-Swa, your food buddy. Ask me for a meal plan or about any dish.",
        &profile.language,
    )
    .await;
    println!("{greeting}");
    println!("(type 'exit' to quit)\n");

    let mut messages = Vec::new();
    let stdin = std::io::stdin();
    loop {
        print!("You: ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        let (updated, response) = orchestrator.route(messages, line, &profile).await;
        messages = updated;

        let rendered = render::render(&response);
        let rendered = translate_text(
            capabilities.generation.as_ref(),
            &rendered,
            &profile.language,
        )
        .await;
        println!("\nSwa-Swa: {rendered}\n");
    }

    Ok(())
}
