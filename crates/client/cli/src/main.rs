//! Terminal client entry point.
mod app;
mod config;
mod input;
mod presentation;

use std::path::PathBuf;

use anyhow::Result;
use app::CliApp;
use config::CliConfig;
use playground_content::{BlueprintCatalog, populate, standard_setup};
use playground_core::{AbilityRegistry, GameEngine};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = CliConfig::from_env();
    setup_logging(&config)?;

    println!("Starting Chess Playground CLI...");

    let catalog = match &config.blueprint_dir {
        Some(dir) => BlueprintCatalog::load_dir(dir)?,
        None => BlueprintCatalog::builtin()?,
    };
    for name in catalog.names() {
        println!("Loaded blueprint: {name}");
    }

    let registry = AbilityRegistry::with_builtins();
    catalog.validate(&registry, &config.game)?;

    let mut engine = GameEngine::with_config(&registry, config.game.clone());
    populate(&mut engine, &catalog, &standard_setup())?;
    engine.start_game()?;

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    CliApp::new(engine).run(stdin.lock(), &mut stdout)
}

/// Setup logging to a session log file; the terminal is left to the prompt.
fn setup_logging(config: &CliConfig) -> Result<()> {
    use std::time::{SystemTime, UNIX_EPOCH};

    let log_dir = config.log_dir.clone().unwrap_or_else(get_log_directory);

    let session_id = config.session_id.clone().unwrap_or_else(|| {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        format!("session_{}", timestamp)
    });

    let session_log_dir = log_dir.join(&session_id);
    std::fs::create_dir_all(&session_log_dir)?;

    let file_appender = tracing_appender::rolling::never(&session_log_dir, "playground.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    // Keep the writer alive for the whole process.
    std::mem::forget(guard);

    tracing::info!("Logging initialized: session={}", session_id);
    tracing::info!("Log file: {}/playground.log", session_log_dir.display());

    Ok(())
}

/// Get the platform-specific log directory
fn get_log_directory() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let mut path = PathBuf::from(home);
            path.push("Library");
            path.push("Caches");
            path.push("chess-playground");
            path.push("logs");
            return path;
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Some(xdg_cache) = std::env::var_os("XDG_CACHE_HOME") {
            let mut path = PathBuf::from(xdg_cache);
            path.push("chess-playground");
            path.push("logs");
            return path;
        } else if let Some(home) = std::env::var_os("HOME") {
            let mut path = PathBuf::from(home);
            path.push(".cache");
            path.push("chess-playground");
            path.push("logs");
            return path;
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(local_appdata) = std::env::var_os("LOCALAPPDATA") {
            let mut path = PathBuf::from(local_appdata);
            path.push("chess-playground");
            path.push("logs");
            return path;
        }
    }

    // Fallback
    std::env::temp_dir().join("chess-playground").join("logs")
}
