//! apm CLI

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use apm_cli::cmd;
use apm_cli::{Cli, Commands};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr so command output on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Add {
            name,
            method,
            unstable,
            exact,
            yes,
            flathub_url,
        } => {
            let method = method.resolve()?;
            cmd::add::add(&name, method, unstable, exact, yes, &flathub_url).await
        }
        Commands::Remove { name, method, yes } => {
            let method = method.resolve()?;
            cmd::remove::remove(&name, method, yes)
        }
        Commands::List { method } => cmd::list::list(method.resolve()?),
        Commands::Search {
            query,
            method,
            flathub_url,
        } => {
            let method = method.resolve()?;
            cmd::search::search(&query, method, &flathub_url).await
        }
        Commands::SetLocation { path } => cmd::location::set_location(&path),
        Commands::Makecache => cmd::cache::makecache(),
        Commands::Removecache => cmd::cache::removecache(),
        Commands::AddInput { name, url, yes } => cmd::inputs::add_input(&name, url.as_deref(), yes),
        Commands::ListInputs => cmd::inputs::list_inputs(),
        Commands::ListModules => cmd::inputs::list_modules(),
        Commands::ShowVersion => cmd::version::show_version(),
        Commands::UpdateVersion { yes } => cmd::version::update_version(yes).await,
        Commands::Update => cmd::system::update(),
        Commands::RebuildSystem => cmd::system::rebuild(),
    }
}
