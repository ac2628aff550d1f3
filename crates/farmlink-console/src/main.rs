//! FarmLink voice console: type what you would say to the microphone.

use farmlink_console::config;
use farmlink_console::shell::{ConsoleCommand, HELP};
use farmlink_console::{Console, Flow};
use std::io::Write;
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

fn resolve_config_path() -> (Option<String>, &'static str) {
    if let Some(path) = std::env::args()
        .nth(1)
        .filter(|value| !value.trim().is_empty())
    {
        return (Some(path), "cli-arg");
    }

    if let Ok(path) = std::env::var("FARMLINK_CONFIG_PATH") {
        if !path.trim().is_empty() {
            return (Some(path), "env-var");
        }
    }

    (None, "default")
}

#[tokio::main]
async fn main() -> ExitCode {
    let (resolved_config_path, config_source) = resolve_config_path();
    let selected_config_path = resolved_config_path.as_deref().or(Some("farmlink.toml"));

    let config = match config::load_config(selected_config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("farmlink-console: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Logs go to stderr so they never interleave with the console transcript.
    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("warn"));
    if config.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    tracing::info!(
        source = config_source,
        path = selected_config_path.unwrap_or("<none>"),
        "resolved startup configuration path"
    );

    let console = match Console::from_config(&config) {
        Ok(console) => console,
        Err(e) => {
            tracing::error!(error = %e, "failed to start voice console");
            return ExitCode::FAILURE;
        }
    };

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{}", console.prompt());
        // A failed flush only delays the prompt.
        let _ = std::io::stdout().flush();

        let line = tokio::select! {
            line = lines.next_line() => line,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("received SIGINT, shutting down");
                break;
            }
        };

        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "failed to read stdin");
                return ExitCode::FAILURE;
            }
        };

        match ConsoleCommand::parse(&line) {
            Ok(command) => {
                if console.run(command).await == Flow::Quit {
                    break;
                }
            }
            Err(message) => println!("{message}"),
        }
    }

    console.navigator().shutdown();
    tracing::info!("farmlink console shut down");
    ExitCode::SUCCESS
}
