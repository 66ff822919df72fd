//! Ask command - run a search described in plain language.

use geoprox::assist::extract_parameters;
use tracing::info;

use super::{output, search};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the ask command.
pub async fn run(
    runner: &CliRunner,
    instruction: &str,
    json: bool,
    check: Option<&str>,
) -> Result<(), CliError> {
    runner.log_startup("ask");
    let config = runner.config();
    let http = runner.http_client()?;
    let chat = runner.chat_client(http.clone())?;

    if !json {
        println!("Extracting search parameters with {}...", chat.config().model());
    }
    let params = extract_parameters(&chat, instruction, &config.servers).await?;
    info!(layer = %params.layer, server = %params.server_url, "Running extracted search");

    if !json {
        println!("  Point:    {}", params.reference);
        println!("  Distance: {}", output::format_distance(params.max_distance_m));
        println!("  Layer:    {}", params.layer);
        println!("  Server:   {}", params.server_url);
        if let Some(reasoning) = &params.reasoning {
            println!("  Reason:   {}", reasoning);
        }
        println!();
    }

    let request = params.into_request(&config.servers, config.search.page_size)?;
    search::execute(runner, http, request, json, check).await
}
