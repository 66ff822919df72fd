//! Layers command - list the feature types a server offers.

use geoprox::wfs::fetch_layers;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the layers command.
pub async fn run(runner: &CliRunner, server: Option<String>) -> Result<(), CliError> {
    runner.log_startup("layers");
    let server = runner.resolve_server(server.as_deref())?;
    let http = runner.http_client()?;

    println!("Fetching capabilities of {} ({})...", server.id, server.url);
    let layers = fetch_layers(http.as_ref(), &server.url)
        .await
        .map_err(CliError::Layers)?;

    println!();
    for layer in &layers {
        if server.layers.contains(layer) {
            println!("  {} *", layer);
        } else {
            println!("  {}", layer);
        }
    }
    println!();
    println!("{} layers (* = listed in the configuration)", layers.len());

    Ok(())
}
