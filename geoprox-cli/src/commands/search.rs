//! Search command - distance search around a point.

use geoprox::assist::{check_compliance, ComplianceAssessment, ComplianceSummary};
use geoprox::coord::Coordinate;
use geoprox::search::{
    aggregate, PagedSearch, SearchOutcome, SearchRequest, SearchResult, SearchSession,
};
use geoprox::wfs::AsyncReqwestClient;
use std::sync::Arc;
use tracing::info;

use super::output;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Longest excerpt of an empty first page shown to the user.
const EMPTY_PAGE_PREVIEW_CHARS: usize = 400;

/// Arguments for the search command.
pub struct SearchArgs {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub distance: Option<f64>,
    pub server: Option<String>,
    pub layer: Option<String>,
    pub page_size: Option<usize>,
    pub json: bool,
    pub check: Option<String>,
}

/// Run the search command.
pub async fn run(runner: &CliRunner, args: SearchArgs) -> Result<(), CliError> {
    runner.log_startup("search");
    let config = runner.config();
    let server = runner.resolve_server(args.server.as_deref())?;

    let layer = match args.layer {
        Some(layer) => layer,
        None if server.id == config.search.default_server => config.search.default_layer.clone(),
        None => server.layers.first().cloned().ok_or_else(|| {
            CliError::Config(format!(
                "Server '{}' has no default layer; pass --layer (see 'geoprox layers --server {}')",
                server.id, server.id
            ))
        })?,
    };

    let reference = Coordinate::new(
        args.lon.unwrap_or(config.search.default_lon),
        args.lat.unwrap_or(config.search.default_lat),
    );
    let request = SearchRequest::new(server.url.clone(), layer, reference, server.dialect)
        .with_max_distance(args.distance.unwrap_or(config.search.max_distance))
        .with_page_size(args.page_size.unwrap_or(config.search.page_size))
        .with_output_format(server.output_format.clone());

    let http = runner.http_client()?;
    execute(runner, http, request, args.json, args.check.as_deref()).await
}

/// Run a search, print its progress and result, and optionally assess it.
///
/// Shared by `search` and `ask`.
pub async fn execute(
    runner: &CliRunner,
    http: Arc<AsyncReqwestClient>,
    request: SearchRequest,
    json: bool,
    check: Option<&str>,
) -> Result<(), CliError> {
    if !json {
        println!(
            "Searching {} in {} within {} of {}",
            request.layer,
            request.server_url,
            output::format_distance(request.max_distance_m),
            request.reference
        );
        println!();
    }

    let search = PagedSearch::new(Arc::clone(&http), runner.config().search_settings());
    let mut session = SearchSession::new(search);
    let mut handle = session.start(request.clone());
    let mut pages = 0;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            progress = handle.next_progress() => {
                let Some(progress) = progress else {
                    break;
                };
                pages = progress.page;
                if json {
                    continue;
                }
                if let Some(raw) = &progress.empty_page_raw {
                    let preview: String = raw.chars().take(EMPTY_PAGE_PREVIEW_CHARS).collect();
                    eprintln!("Warning: the first page contained no geometry. Server response:");
                    eprintln!("{}", preview.trim());
                    eprintln!();
                }
                print!("{}", output::progress_text(&progress));
            }
            _ = &mut ctrl_c, if !handle.cancellation_token().is_cancelled() => {
                eprintln!("Cancelling search...");
                handle.cancel();
            }
        }
    }

    let outcome = match session.finish(handle).await {
        Ok(outcome) => outcome,
        Err(failure) => {
            if !json && !failure.partial.features.is_empty() {
                println!();
                println!("Partial results before the search stopped:");
                print!("{}", output::progress_text(&failure.partial));
            }
            return Err(failure.error.into());
        }
    };

    // Nothing in range is still a valid input for rules like
    // "no station within 1 km"
    let checked = match check {
        Some(rule) => {
            let result = match &outcome {
                SearchOutcome::Completed(result) => result.clone(),
                SearchOutcome::NoFeaturesInRange { total_seen, .. } => {
                    aggregate::summarize(&request, Vec::new(), *total_seen, pages)
                }
            };
            Some((rule, result))
        }
        None => None,
    };

    if json {
        let mut value = serde_json::json!({
            "request": request,
            "result": outcome,
            "assessment": null,
        });
        if let Some((rule, result)) = &checked {
            match assess(runner, http, rule, result).await {
                Ok(assessment) => value["assessment"] = serde_json::json!(assessment),
                Err(e) => {
                    value["assessment_error"] = serde_json::json!(e.to_string());
                    e.report();
                }
            }
        }
        let text =
            serde_json::to_string_pretty(&value).map_err(|e| CliError::Output(e.to_string()))?;
        println!("{}", text);
        return Ok(());
    }

    println!();
    match &outcome {
        SearchOutcome::Completed(result) => print!("{}", output::result_table(result)),
        SearchOutcome::NoFeaturesInRange {
            total_seen,
            max_distance_m,
        } => println!(
            "No features within {} ({} features read)",
            output::format_distance(*max_distance_m),
            total_seen
        ),
    }

    // A failed check leaves the search results standing
    if let Some((rule, result)) = &checked {
        match assess(runner, http, rule, result).await {
            Ok(assessment) => {
                println!();
                print!("{}", output::assessment_text(rule, &assessment));
            }
            Err(e) => {
                eprintln!();
                eprintln!("Compliance check skipped.");
                e.report();
            }
        }
    }

    Ok(())
}

async fn assess(
    runner: &CliRunner,
    http: Arc<AsyncReqwestClient>,
    rule: &str,
    result: &SearchResult,
) -> Result<ComplianceAssessment, CliError> {
    let chat = runner.chat_client(http)?;
    let summary = ComplianceSummary::from_result(result);
    info!(rule = %rule, features = summary.total_features_found, "Checking compliance");
    Ok(check_compliance(&chat, rule, &summary).await?)
}
