use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use buddy_chat::cli::commands::{chat, configure, history, models, providers};
use buddy_chat::cli::{Args, Command};

/// Log filter variable checked before `RUST_LOG`.
const LOG_ENV: &str = "BUDDY_LOG";

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    match args.command {
        None => {
            chat::run_chat(chat::ChatOptions {
                provider: args.provider,
                model: args.model,
                new: false,
                resume: None,
            })
            .await?;
        }
        Some(Command::Chat { new, resume }) => {
            chat::run_chat(chat::ChatOptions {
                provider: args.provider,
                model: args.model,
                new,
                resume,
            })
            .await?;
        }
        Some(Command::History { all }) => history::print_history(all)?,
        Some(Command::Show { id }) => history::show_chat(id)?,
        Some(Command::Export { id, output, format }) => history::export_chat(id, output, format)?,
        Some(Command::Import { file }) => history::import_chat(file.as_deref())?,
        Some(Command::Delete { id, yes }) => history::delete_chat(&id, yes)?,
        Some(Command::ClearHistory { yes }) => history::clear_history(yes)?,
        Some(Command::Models { command }) => models::run_models(command)?,
        Some(Command::Providers { provider }) => providers::print_providers(provider.as_deref())?,
        Some(Command::Configure { show }) => configure::run_configure(show)?,
    }

    Ok(())
}

/// Initialize tracing subscriber with environment filter.
///
/// Logs go to stderr so they never mix with chat output.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("buddy_chat=warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
