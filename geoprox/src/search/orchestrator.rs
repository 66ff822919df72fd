//! Paged WFS search.
//!
//! Pages are fetched strictly one after another. Each page is validated,
//! decoded and scored, and a cumulative [`SearchProgress`] snapshot goes
//! out before the next page is requested. The search ends on a short or
//! empty page, on the first error, or when its cancellation token fires.
//!
//! # Example
//!
//! ```ignore
//! let search = PagedSearch::new(Arc::new(AsyncReqwestClient::new()?), SearchSettings::default());
//! let mut handle = search.spawn(request);
//! while let Some(progress) = handle.next_progress().await {
//!     println!("page {}: {} features so far", progress.page, progress.features.len());
//! }
//! let outcome = handle.join().await?;
//! ```

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::aggregate;
use super::error::{SearchError, SearchFailure};
use super::settings::SearchSettings;
use super::types::{ScoredFeature, SearchOutcome, SearchProgress, SearchRequest, SearchState};
use crate::coord::search_bbox;
use crate::decode::decode;
use crate::wfs::{check_response, get_feature_url, AsyncHttpClient, GetFeature, WfsError};

/// Sequential, cancellable paged search over one WFS layer.
pub struct PagedSearch<C> {
    client: Arc<C>,
    settings: SearchSettings,
}

impl<C> Clone for PagedSearch<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            settings: self.settings,
        }
    }
}

impl<C: AsyncHttpClient + 'static> PagedSearch<C> {
    pub fn new(client: Arc<C>, settings: SearchSettings) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    /// Runs a search to completion on the current task.
    ///
    /// Progress snapshots are sent through `progress_tx` after every page.
    /// Snapshots are cumulative, so when the channel is full a snapshot is
    /// dropped rather than stalling the search.
    pub async fn run(
        &self,
        request: &SearchRequest,
        progress_tx: mpsc::Sender<SearchProgress>,
        cancellation: CancellationToken,
    ) -> Result<SearchOutcome, SearchFailure> {
        let (state_tx, _state_rx) = watch::channel(SearchState::Idle);
        self.run_tracked(request, &progress_tx, &cancellation, &state_tx)
            .await
    }

    /// Runs a search on a new task with a fresh cancellation token.
    pub fn spawn(&self, request: SearchRequest) -> SearchHandle {
        self.spawn_with(request, CancellationToken::new())
    }

    /// Runs a search on a new task, cancelled through `cancellation`.
    pub fn spawn_with(&self, request: SearchRequest, cancellation: CancellationToken) -> SearchHandle {
        let (progress_tx, progress_rx) = mpsc::channel(self.settings.progress_capacity());
        let (state_tx, state_rx) = watch::channel(SearchState::Idle);

        let search = self.clone();
        let token = cancellation.clone();
        let task = tokio::spawn(async move {
            search
                .run_tracked(&request, &progress_tx, &token, &state_tx)
                .await
        });

        SearchHandle {
            progress: progress_rx,
            state: state_rx,
            cancellation,
            task,
        }
    }

    async fn run_tracked(
        &self,
        request: &SearchRequest,
        progress_tx: &mpsc::Sender<SearchProgress>,
        cancellation: &CancellationToken,
        state_tx: &watch::Sender<SearchState>,
    ) -> Result<SearchOutcome, SearchFailure> {
        let outcome = self
            .run_pages(request, progress_tx, cancellation, state_tx)
            .await;

        let final_state = match &outcome {
            Ok(_) => SearchState::Completed,
            Err(failure) if failure.is_cancelled() => {
                info!(layer = %request.layer, "Search cancelled");
                SearchState::Cancelled
            }
            Err(failure) => {
                warn!(layer = %request.layer, error = %failure.error, "Search failed");
                SearchState::Failed
            }
        };
        state_tx.send_replace(final_state);
        outcome
    }

    async fn run_pages(
        &self,
        request: &SearchRequest,
        progress_tx: &mpsc::Sender<SearchProgress>,
        cancellation: &CancellationToken,
        state_tx: &watch::Sender<SearchState>,
    ) -> Result<SearchOutcome, SearchFailure> {
        request
            .validate()
            .map_err(|e| SearchFailure::new(e, SearchProgress::default()))?;

        let dialect = request.dialect;
        let bbox = if dialect.profile().bbox_filter {
            let bbox = search_bbox(&request.reference, request.max_distance_m).map_err(|e| {
                SearchFailure::new(
                    SearchError::InvalidRequest(e.to_string()),
                    SearchProgress::default(),
                )
            })?;
            Some(bbox)
        } else {
            None
        };
        let output_format = dialect.output_format(request.output_format.as_deref());

        info!(
            server = %request.server_url,
            layer = %request.layer,
            lat = request.reference.lat,
            lon = request.reference.lon,
            max_distance_m = request.max_distance_m,
            dialect = %dialect,
            "Starting WFS search"
        );

        let mut accepted: Vec<Arc<ScoredFeature>> = Vec::new();
        let mut partial = SearchProgress::default();
        let mut total_seen = 0;
        let mut start_index = 0;
        let mut page = 0;

        loop {
            if cancellation.is_cancelled() {
                return Err(SearchFailure::new(SearchError::Cancelled, partial));
            }

            page += 1;
            state_tx.send_replace(SearchState::FetchingPage { page });

            let url = get_feature_url(
                &request.server_url,
                &GetFeature {
                    layer: &request.layer,
                    count: request.page_size,
                    start_index,
                    bbox,
                    output_format,
                },
            )
            .map_err(|e| SearchFailure::new(e.into(), partial.clone()))?;
            debug!(page = page, start_index = start_index, url = %url, "Requesting page");

            let response = tokio::select! {
                biased;
                _ = cancellation.cancelled() => {
                    return Err(SearchFailure::new(SearchError::Cancelled, partial));
                }
                response = self.client.get(url.as_str()) => response,
            };

            let body = response
                .map_err(WfsError::from)
                .and_then(|r| check_response(r, dialect))
                .map_err(|e| SearchFailure::new(e.into(), partial.clone()))?;

            let features = decode(&body, dialect).map_err(|e| {
                SearchFailure::new(SearchError::from_decode(e, &body), partial.clone())
            })?;

            let page_features = features.len();
            total_seen += page_features;
            let before = accepted.len();
            accepted.extend(
                features
                    .into_iter()
                    .filter_map(|f| ScoredFeature::score(&request.reference, f))
                    .filter(|f| f.distance_m <= request.max_distance_m)
                    .map(Arc::new),
            );
            debug!(
                page = page,
                page_features = page_features,
                accepted = accepted.len() - before,
                "Page processed"
            );

            let mut progress = SearchProgress::snapshot(&accepted, total_seen, page, page_features);
            if page == 1 && page_features == 0 {
                warn!(layer = %request.layer, "No geometry found in first page");
                progress.empty_page_raw = Some(body);
            }

            if cancellation.is_cancelled() {
                return Err(SearchFailure::new(SearchError::Cancelled, progress));
            }
            let _ = progress_tx.try_send(progress.clone());
            partial = progress;

            if page_features == 0 || page_features < request.page_size {
                break;
            }
            start_index += request.page_size;

            let delay = self.settings.page_delay();
            if !delay.is_zero() {
                tokio::select! {
                    biased;
                    _ = cancellation.cancelled() => {
                        return Err(SearchFailure::new(SearchError::Cancelled, partial));
                    }
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        }

        state_tx.send_replace(SearchState::Aggregating);

        if accepted.is_empty() {
            info!(
                total_seen = total_seen,
                max_distance_m = request.max_distance_m,
                "No features within search distance"
            );
            return Ok(SearchOutcome::NoFeaturesInRange {
                total_seen,
                max_distance_m: request.max_distance_m,
            });
        }

        // Snapshots still held by a consumer keep their own copy
        let accepted = accepted
            .into_iter()
            .map(|f| Arc::try_unwrap(f).unwrap_or_else(|shared| (*shared).clone()))
            .collect();
        let result = aggregate::summarize(request, accepted, total_seen, page);
        info!(
            containing = result.containing,
            nearby = result.nearby,
            total_seen = total_seen,
            pages = page,
            "Search complete"
        );
        Ok(SearchOutcome::Completed(result))
    }
}

/// A search running on its own task.
pub struct SearchHandle {
    progress: mpsc::Receiver<SearchProgress>,
    state: watch::Receiver<SearchState>,
    cancellation: CancellationToken,
    task: JoinHandle<Result<SearchOutcome, SearchFailure>>,
}

impl SearchHandle {
    /// Next progress snapshot; `None` once the search has ended.
    pub async fn next_progress(&mut self) -> Option<SearchProgress> {
        self.progress.recv().await
    }

    /// Requests cancellation. The task stops before its next page.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    pub fn state(&self) -> SearchState {
        *self.state.borrow()
    }

    pub fn state_receiver(&self) -> watch::Receiver<SearchState> {
        self.state.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the search to end.
    pub async fn join(self) -> Result<SearchOutcome, SearchFailure> {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) if e.is_panic() => {
                warn!(error = %e, "Search task panicked");
                Err(SearchFailure::new(
                    SearchError::TaskFailed(e.to_string()),
                    SearchProgress::default(),
                ))
            }
            Err(e) => {
                debug!(error = %e, "Search task aborted");
                Err(SearchFailure::new(
                    SearchError::Cancelled,
                    SearchProgress::default(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Coordinate;
    use crate::dialect::ServerDialect;
    use crate::wfs::{HttpError, HttpResponse, MockAsyncHttpClient};
    use std::time::Duration;

    const JSON: &str = "application/json";

    fn point_feature(name: &str, lon: f64, lat: f64) -> String {
        format!(
            r#"{{"type":"Feature","geometry":{{"type":"Point","coordinates":[{lon},{lat}]}},"properties":{{"NAME":"{name}"}}}}"#
        )
    }

    fn page(features: &[String]) -> String {
        format!(
            r#"{{"type":"FeatureCollection","features":[{}]}}"#,
            features.join(",")
        )
    }

    fn request(page_size: usize) -> SearchRequest {
        SearchRequest::new(
            "https://example.org/wfs",
            "app:points",
            Coordinate::new(13.8713, 51.0036),
            ServerDialect::GeoJson,
        )
        .with_page_size(page_size)
    }

    fn search(client: &MockAsyncHttpClient) -> PagedSearch<MockAsyncHttpClient> {
        PagedSearch::new(Arc::new(client.clone()), SearchSettings::default())
    }

    fn start_index(url: &str) -> String {
        reqwest::Url::parse(url)
            .unwrap()
            .query_pairs()
            .find(|(k, _)| k == "startIndex")
            .map(|(_, v)| v.into_owned())
            .unwrap()
    }

    #[tokio::test]
    async fn test_full_page_requests_next_offset() {
        let client = MockAsyncHttpClient::new();
        client.push_ok(
            JSON,
            &page(&[
                point_feature("A", 13.8713, 51.0040),
                point_feature("B", 13.8713, 51.0045),
            ]),
        );
        client.push_ok(JSON, &page(&[point_feature("C", 13.8713, 51.0050)]));

        let (tx, mut rx) = mpsc::channel(8);
        let outcome = search(&client)
            .run(&request(2), tx, CancellationToken::new())
            .await
            .unwrap();

        let urls = client.urls();
        assert_eq!(urls.len(), 2);
        assert_eq!(start_index(&urls[0]), "0");
        assert_eq!(start_index(&urls[1]), "2");

        let first = rx.recv().await.unwrap();
        assert_eq!((first.page, first.page_features, first.features.len()), (1, 2, 2));
        let second = rx.recv().await.unwrap();
        assert_eq!((second.page, second.total_seen, second.features.len()), (2, 3, 3));
        // Later snapshots share the features of earlier ones
        assert!(Arc::ptr_eq(&first.features[0], &second.features[0]));

        let result = outcome.result().unwrap();
        assert_eq!(result.pages, 2);
        assert_eq!(result.features[0].display_name, "A");
    }

    #[tokio::test]
    async fn test_empty_page_stops() {
        let client = MockAsyncHttpClient::new();
        client.push_ok(
            JSON,
            &page(&[
                point_feature("A", 13.8713, 51.0040),
                point_feature("B", 13.8713, 51.0045),
            ]),
        );
        client.push_ok(JSON, &page(&[]));

        let (tx, _rx) = mpsc::channel(8);
        let outcome = search(&client)
            .run(&request(2), tx, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(client.urls().len(), 2);
        assert_eq!(outcome.result().unwrap().total_seen, 2);
    }

    #[tokio::test]
    async fn test_far_features_filtered() {
        let client = MockAsyncHttpClient::new();
        client.push_ok(JSON, &page(&[point_feature("Far", 14.5, 51.5)]));

        let (tx, _rx) = mpsc::channel(8);
        let outcome = search(&client)
            .run(&request(10), tx, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            SearchOutcome::NoFeaturesInRange {
                total_seen: 1,
                max_distance_m: 1000.0
            }
        );
    }

    #[tokio::test]
    async fn test_error_keeps_partial_results() {
        let client = MockAsyncHttpClient::new();
        client.push_ok(
            JSON,
            &page(&[
                point_feature("A", 13.8713, 51.0040),
                point_feature("B", 13.8713, 51.0045),
            ]),
        );
        client.push(Ok(HttpResponse::new(500, Some("text/plain"), "boom")));

        let (tx, _rx) = mpsc::channel(8);
        let failure = search(&client)
            .run(&request(2), tx, CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(failure.error.to_string(), "Server error: HTTP 500");
        assert_eq!(failure.error.raw_response(), Some("boom"));
        assert_eq!(failure.partial.features.len(), 2);
    }

    #[tokio::test]
    async fn test_network_error() {
        let client = MockAsyncHttpClient::new();
        client.push(Err(HttpError::Timeout {
            url: "https://example.org/wfs".to_string(),
        }));

        let (tx, _rx) = mpsc::channel(8);
        let failure = search(&client)
            .run(&request(2), tx, CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(failure.error, SearchError::Network { .. }));
        assert!(failure.partial.features.is_empty());
    }

    #[tokio::test]
    async fn test_content_type_mismatch() {
        let client = MockAsyncHttpClient::new();
        client.push_ok("text/html", "<html/>");

        let (tx, _rx) = mpsc::channel(8);
        let failure = search(&client)
            .run(&request(2), tx, CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(failure.error, SearchError::ContentTypeMismatch { .. }));
    }

    #[tokio::test]
    async fn test_invalid_request_sends_nothing() {
        let client = MockAsyncHttpClient::new();
        let (tx, _rx) = mpsc::channel(8);
        let failure = search(&client)
            .run(&request(2).with_max_distance(-5.0), tx, CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(failure.error, SearchError::InvalidRequest(_)));
        assert!(client.urls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_first_page_records_payload() {
        let client = MockAsyncHttpClient::new();
        let body = page(&[]);
        client.push_ok(JSON, &body);

        let (tx, mut rx) = mpsc::channel(8);
        search(&client)
            .run(&request(2), tx, CancellationToken::new())
            .await
            .unwrap();

        let progress = rx.recv().await.unwrap();
        assert_eq!(progress.empty_page_raw.as_deref(), Some(body.as_str()));
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let client = MockAsyncHttpClient::new();
        let token = CancellationToken::new();
        token.cancel();

        let (tx, mut rx) = mpsc::channel(8);
        let failure = search(&client).run(&request(2), tx, token).await.unwrap_err();

        assert!(failure.is_cancelled());
        assert!(client.urls().is_empty());
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_in_flight_request() {
        let client = MockAsyncHttpClient::new().with_delay(Duration::from_secs(60));
        client.push_ok(JSON, &page(&[point_feature("A", 13.8713, 51.0040)]));

        let mut handle = search(&client).spawn(request(2));
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(handle.state(), SearchState::FetchingPage { page: 1 });

        handle.cancel();
        assert!(handle.next_progress().await.is_none());
        let failure = handle.join().await.unwrap_err();
        assert!(failure.is_cancelled());
    }

    #[tokio::test]
    async fn test_spawned_search_reports_completion() {
        let client = MockAsyncHttpClient::new();
        client.push_ok(JSON, &page(&[point_feature("A", 13.8713, 51.0040)]));

        let mut handle = search(&client).spawn(request(10));
        let progress = handle.next_progress().await.unwrap();
        assert_eq!(progress.features.len(), 1);

        let state = handle.state_receiver();
        let outcome = handle.join().await.unwrap();
        assert!(outcome.result().is_some());
        assert_eq!(*state.borrow(), SearchState::Completed);
    }

    /// Client whose requests bring down the search task.
    struct PanickingClient;

    impl AsyncHttpClient for PanickingClient {
        fn get(&self, url: &str) -> impl std::future::Future<Output = Result<HttpResponse, HttpError>> + Send {
            let url = url.to_string();
            async move {
                if url.is_empty() {
                    return Err::<HttpResponse, HttpError>(HttpError::Timeout { url });
                }
                panic!("connection pool corrupted")
            }
        }

        fn post_json(
            &self,
            url: &str,
            _json_body: &str,
            _bearer_token: Option<&str>,
        ) -> impl std::future::Future<Output = Result<HttpResponse, HttpError>> + Send {
            self.get(url)
        }
    }

    #[tokio::test]
    async fn test_panicked_task_is_not_a_cancellation() {
        let search = PagedSearch::new(Arc::new(PanickingClient), SearchSettings::default());

        let failure = search.spawn(request(10)).join().await.unwrap_err();
        assert!(!failure.is_cancelled());
        assert!(matches!(failure.error, SearchError::TaskFailed(_)));
    }
}
