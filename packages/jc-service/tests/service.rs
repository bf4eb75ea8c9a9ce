use std::sync::{
	Arc, Mutex,
	atomic::{AtomicUsize, Ordering},
};

use serde_json::Map;
use time::{OffsetDateTime, macros::datetime};

use jc_config::{
	ApifyProviderConfig, Cleanup, Config, Crawl, EmbeddingProviderConfig, Providers, Qdrant,
	Ranking, Search, Security, Service, Storage, ZyteProviderConfig,
};
use jc_domain::{JobDocument, JobSource};
use jc_service::{
	BoxFuture, EmbeddingProvider, Error, JobService, JobStore, LinkProbe, LinkStatus, MatchStage,
	Result, ScoredJob, ScrapeProvider, ScrollPage, SearchRequest, SearchResponse,
};

const DIM: u32 = 4;
const NOW: OffsetDateTime = datetime!(2026-03-20 12:00 UTC);

fn test_config() -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:8000".to_string(),
			admin_bind: "127.0.0.1:8001".to_string(),
			log_level: "info".to_string(),
		},
		storage: Storage {
			qdrant: Qdrant {
				url: "http://127.0.0.1:6334".to_string(),
				collection: "jobs_test".to_string(),
				vector_dim: DIM,
			},
		},
		providers: Providers {
			embedding: EmbeddingProviderConfig {
				provider_id: "test".to_string(),
				api_base: "http://localhost".to_string(),
				api_key: "test-key".to_string(),
				path: "/v1/embeddings".to_string(),
				model: "test-embed".to_string(),
				dimensions: DIM,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
			apify: ApifyProviderConfig {
				api_base: "http://localhost".to_string(),
				api_token: "apify-token".to_string(),
				actor_id: "test/linkedin".to_string(),
				timeout_ms: 1_000,
				default_location: "Germany".to_string(),
				date_posted: "r604800".to_string(),
			},
			zyte: ZyteProviderConfig {
				api_base: "http://localhost".to_string(),
				api_key: String::new(),
				search_url: "https://de.indeed.com/jobs".to_string(),
				timeout_ms: 1_000,
			},
		},
		search: Search::default(),
		ranking: Ranking::default(),
		crawl: Crawl {
			linkedin_queries: vec!["engineer".to_string(), "boom".to_string(), "nurse".to_string()],
			indeed_queries: vec!["software".to_string()],
			jobs_per_query: 2,
			query_delay_ms: 0,
			..Crawl::default()
		},
		cleanup: Cleanup { batch_size: 2, ..Cleanup::default() },
		security: Security { bind_localhost_only: true, admin_auth_token: None },
	}
}

fn job(id: &str, title: &str, location: &str, description: &str) -> JobDocument {
	let mut job = JobDocument::new(id, title, "Acme", location, description, JobSource::LinkedIn);

	job.url = Some(format!("https://jobs.test/{id}"));
	job.created_at = Some(NOW);

	job
}

/// In-memory store whose nearest-neighbor order comes from a fixed per-job distance.
#[derive(Default)]
struct ScriptedStore {
	entries: Mutex<Vec<(JobDocument, f32)>>,
	unavailable: bool,
	inserts: AtomicUsize,
}
impl ScriptedStore {
	fn with_jobs(jobs: Vec<(JobDocument, f32)>) -> Self {
		Self { entries: Mutex::new(jobs), ..Self::default() }
	}

	fn ids(&self) -> Vec<String> {
		let entries = self.entries.lock().expect("Store lock poisoned.");

		entries.iter().map(|(job, _)| job.id.clone()).collect()
	}

	fn unavailable_error() -> Error {
		Error::Qdrant { message: "connection refused".to_string() }
	}
}
impl JobStore for ScriptedStore {
	fn collection(&self) -> &str {
		"jobs_test"
	}

	fn count(&self) -> BoxFuture<'_, Result<u64>> {
		let result = if self.unavailable {
			Err(Self::unavailable_error())
		} else {
			Ok(self.entries.lock().expect("Store lock poisoned.").len() as u64)
		};

		Box::pin(async move { result })
	}

	fn nearest(&self, _vector: Vec<f32>, k: u32) -> BoxFuture<'_, Result<Vec<ScoredJob>>> {
		let mut hits = self
			.entries
			.lock()
			.expect("Store lock poisoned.")
			.iter()
			.map(|(job, distance)| ScoredJob { job: job.clone(), distance: *distance })
			.collect::<Vec<_>>();

		hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
		hits.truncate(k as usize);

		Box::pin(async move { Ok(hits) })
	}

	fn get<'a>(&'a self, ids: &'a [String]) -> BoxFuture<'a, Result<Vec<JobDocument>>> {
		let found = self
			.entries
			.lock()
			.expect("Store lock poisoned.")
			.iter()
			.filter(|(job, _)| ids.contains(&job.id))
			.map(|(job, _)| job.clone())
			.collect();

		Box::pin(async move { Ok(found) })
	}

	fn scroll<'a>(
		&'a self,
		limit: u32,
		offset: Option<&'a str>,
	) -> BoxFuture<'a, Result<ScrollPage>> {
		let entries = self.entries.lock().expect("Store lock poisoned.");
		let start = offset.and_then(|offset| offset.parse::<usize>().ok()).unwrap_or(0);
		let end = (start + limit as usize).min(entries.len());
		let jobs = entries[start.min(end)..end].iter().map(|(job, _)| job.clone()).collect();
		let next_offset = (end < entries.len()).then(|| end.to_string());

		Box::pin(async move { Ok(ScrollPage { jobs, next_offset }) })
	}

	fn insert<'a>(
		&'a self,
		job: &'a JobDocument,
		_vector: Vec<f32>,
		embedding_model: &'a str,
	) -> BoxFuture<'a, Result<()>> {
		assert_eq!(embedding_model, "test:test-embed:4");

		self.inserts.fetch_add(1, Ordering::SeqCst);
		self.entries.lock().expect("Store lock poisoned.").push((job.clone(), 1.0));

		Box::pin(async move { Ok(()) })
	}

	fn delete<'a>(&'a self, ids: &'a [String]) -> BoxFuture<'a, Result<()>> {
		let mut entries = self.entries.lock().expect("Store lock poisoned.");

		entries.retain(|(job, _)| !ids.contains(&job.id));

		Box::pin(async move { Ok(()) })
	}
}

/// Constant vectors; any text containing `fail_on` is rejected.
struct StubEmbedding {
	fail_on: Option<&'static str>,
}
impl EmbeddingProvider for StubEmbedding {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		let failing = self
			.fail_on
			.is_some_and(|needle| texts.iter().any(|text| text.contains(needle)));
		let vectors = texts.iter().map(|_| vec![0.5; cfg.dimensions as usize]).collect();

		Box::pin(async move {
			if failing {
				return Err(Error::Provider { message: "embedding quota exceeded".to_string() });
			}

			Ok(vectors)
		})
	}
}

#[derive(Default)]
struct StubScrape {
	indeed_calls: AtomicUsize,
}
impl ScrapeProvider for StubScrape {
	fn linkedin<'a>(
		&'a self,
		_cfg: &'a ApifyProviderConfig,
		title: &'a str,
		_location: Option<&'a str>,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<JobDocument>>> {
		Box::pin(async move {
			if title == "boom" {
				return Err(Error::Provider { message: "actor run failed".to_string() });
			}

			// "shared" shows up under every query and must only be stored once.
			let mut jobs = vec![job("linkedin_shared", "Shared Posting", "Berlin", "")];

			jobs.extend((1..limit).map(|idx| {
				job(&format!("linkedin_{title}_{idx}"), &format!("{title} {idx}"), "Berlin", "")
			}));

			Ok(jobs)
		})
	}

	fn indeed<'a>(
		&'a self,
		_cfg: &'a ZyteProviderConfig,
		_title: &'a str,
		_location: Option<&'a str>,
		_limit: u32,
	) -> BoxFuture<'a, Result<Vec<JobDocument>>> {
		self.indeed_calls.fetch_add(1, Ordering::SeqCst);

		Box::pin(async move { Ok(Vec::new()) })
	}
}

/// "gone" URLs are 404, "flaky" URLs fail at the transport level.
struct StubLinks;
impl LinkProbe for StubLinks {
	fn probe<'a>(&'a self, url: &'a str, _timeout_ms: u64) -> BoxFuture<'a, Result<LinkStatus>> {
		Box::pin(async move {
			if url.contains("flaky") {
				return Err(Error::Provider { message: "connection reset".to_string() });
			}
			if url.contains("gone") {
				return Ok(LinkStatus::NotFound);
			}

			Ok(LinkStatus::Alive(200))
		})
	}
}

fn service_with(store: Arc<ScriptedStore>, embedding: StubEmbedding) -> JobService {
	service_with_scrape(store, embedding, Arc::new(StubScrape::default()))
}

fn service_with_scrape(
	store: Arc<ScriptedStore>,
	embedding: StubEmbedding,
	scrape: Arc<StubScrape>,
) -> JobService {
	let providers =
		jc_service::Providers::new(Arc::new(embedding), scrape, Arc::new(StubLinks));

	JobService::with_providers(test_config(), store, providers)
}

fn service(store: Arc<ScriptedStore>) -> JobService {
	service_with(store, StubEmbedding { fail_on: None })
}

fn request(job_title: &str, location: Option<&str>, limit: u32) -> SearchRequest {
	SearchRequest {
		job_title: job_title.to_string(),
		location: location.map(str::to_string),
		limit: Some(limit),
	}
}

async fn ranked(service: &JobService, req: SearchRequest) -> SearchResponse {
	service.search(req).await.expect("Search failed.")
}

fn mixed_store(size: usize) -> ScriptedStore {
	ScriptedStore::with_jobs(
		(0..size)
			.map(|idx| {
				let title = if idx % 2 == 0 { "Python Developer" } else { "Warehouse Associate" };

				(job(&format!("job_{idx}"), title, "Berlin", "Team."), 0.2 + idx as f32 * 0.1)
			})
			.collect(),
	)
}

#[tokio::test]
async fn search_is_deterministic() {
	let service = service(Arc::new(mixed_store(30)));
	let first = ranked(&service, request("python developer", Some("Berlin"), 20)).await;
	let second = ranked(&service, request("python developer", Some("Berlin"), 20)).await;
	let summary = |jobs: &[jc_service::RankedJob]| {
		jobs.iter().map(|item| (item.job.id.clone(), item.score)).collect::<Vec<_>>()
	};

	assert_eq!(first.query_plan, second.query_plan);
	assert_eq!(summary(&first.jobs), summary(&second.jobs));
}

#[tokio::test]
async fn search_returns_exactly_limit_with_unique_ids() {
	let service = service(Arc::new(mixed_store(30)));
	let response = ranked(&service, request("python developer", None, 25)).await;
	let mut ids = response.jobs.iter().map(|item| item.job.id.clone()).collect::<Vec<_>>();

	assert_eq!(response.jobs.len(), 25);

	ids.sort();
	ids.dedup();

	assert_eq!(ids.len(), 25);
}

#[tokio::test]
async fn search_returns_whole_store_when_smaller_than_limit() {
	let service = service(Arc::new(mixed_store(3)));
	let response = ranked(&service, request("python developer", None, 10)).await;

	assert_eq!(response.jobs.len(), 3);
}

#[tokio::test]
async fn empty_store_returns_empty_result() {
	let service = service(Arc::new(ScriptedStore::default()));
	let response = ranked(&service, request("nurse", None, 10)).await;

	assert!(response.jobs.is_empty());
	assert_eq!(response.query_plan[0], "nurse");
}

#[tokio::test]
async fn title_matches_outrank_description_matches() {
	let store = ScriptedStore::with_jobs(vec![
		(job("desc", "Backend Engineer", "", "We need a python developer."), 0.5),
		(job("title", "Python Developer", "", "Backend work."), 0.5),
	]);
	let service = service(Arc::new(store));
	let response = ranked(&service, request("python developer", None, 2)).await;

	assert_eq!(response.jobs[0].job.id, "title");
	assert_eq!(response.jobs[1].job.id, "desc");
}

#[tokio::test]
async fn management_titles_sink_for_technical_queries() {
	let store = ScriptedStore::with_jobs(vec![
		(job("sales", "Sales Manager", "", "Quota ownership."), 0.2),
		(job("python", "Senior Python Developer", "", "Python services."), 0.3),
	]);
	let service = service(Arc::new(store));
	let response = ranked(&service, request("python developer", None, 2)).await;

	assert_eq!(response.jobs[0].job.id, "python");
	assert_eq!(response.jobs[1].job.id, "sales");
	assert_eq!(response.jobs[1].score, service.cfg.ranking.blend.min_score);
	assert!(response.jobs.iter().all(|item| item.stage == MatchStage::Scored));
}

#[tokio::test]
async fn hits_from_several_variants_merge_into_one_result() {
	let store =
		ScriptedStore::with_jobs(vec![(job("only", "Krankenschwester", "Berlin", ""), 0.4)]);
	let service = service(Arc::new(store));
	let response = ranked(&service, request("nurse", None, 1)).await;

	assert_eq!(response.jobs.len(), 1);
	assert_eq!(response.jobs[0].match_count as usize, response.query_plan.len());
}

#[tokio::test]
async fn query_plan_is_bounded() {
	let store = Arc::new(mixed_store(5));
	let service = service(store);
	let response =
		ranked(&service, request("senior python developer", Some("Frankfurt am Main"), 5)).await;

	assert!(response.query_plan.len() <= 15);
	assert_eq!(response.query_plan[0], "senior python developer");
}

#[tokio::test]
async fn sparse_results_are_topped_up_in_stage_order() {
	let mut jobs = Vec::new();

	for idx in 0..5 {
		jobs.push((job(&format!("pflege_{idx}"), "Krankenschwester", "Berlin", "Station."), 0.4));
	}
	for idx in 0..10 {
		jobs.push((job(&format!("relaxed_{idx}"), "Lagerhelfer", "Hamburg", ""), 2.2));
	}
	for idx in 0..10 {
		jobs.push((job(&format!("filler_{idx}"), "Koch", "München", ""), 2.8));
	}

	let service = service(Arc::new(ScriptedStore::with_jobs(jobs)));
	let response = ranked(&service, request("nurse", Some("Berlin"), 25)).await;
	let stages = response.jobs.iter().map(|item| item.stage).collect::<Vec<_>>();

	assert_eq!(response.jobs.len(), 25);
	assert!(response.jobs[..5].iter().all(|item| item.job.id.starts_with("pflege_")));
	assert!(stages[..5].iter().all(|stage| *stage == MatchStage::Scored));
	assert!(stages[5..15].iter().all(|stage| *stage == MatchStage::Relaxed));
	assert!(stages[15..].iter().all(|stage| *stage == MatchStage::Filler));
	assert!(response.jobs[0].score > 1.0);
	assert!(response.jobs[15..].iter().all(|item| item.score == 0.1 && item.match_count == 0));
	assert!(response.jobs.windows(2).all(|pair| pair[0].score >= pair[1].score));
}

#[tokio::test]
async fn failed_variants_are_skipped() {
	let store = ScriptedStore::with_jobs(vec![(job("only", "Krankenschwester", "", ""), 0.4)]);
	let service = service_with(Arc::new(store), StubEmbedding { fail_on: Some("job position") });
	let response = ranked(&service, request("nurse", None, 1)).await;
	let failing = response.query_plan.iter().filter(|query| query.contains("job position")).count();

	assert!(failing > 0);
	assert_eq!(response.jobs[0].match_count as usize, response.query_plan.len() - failing);
}

#[tokio::test]
async fn unreachable_store_is_reported() {
	let store = ScriptedStore { unavailable: true, ..ScriptedStore::default() };
	let err = service(Arc::new(store))
		.search(request("nurse", None, 5))
		.await
		.expect_err("Expected an unavailable store.");

	assert!(matches!(err, Error::StoreUnavailable { .. }));
}

#[tokio::test]
async fn invalid_requests_are_rejected() {
	let service = service(Arc::new(mixed_store(3)));

	for req in [request("   ", None, 5), request("nurse", None, 0), request("nurse", None, 101)] {
		let err = service.search(req).await.expect_err("Expected an invalid request.");

		assert!(matches!(err, Error::InvalidRequest { .. }));
	}
}

#[tokio::test]
async fn storing_jobs_is_idempotent() {
	let store = Arc::new(ScriptedStore::default());
	let service = service(store.clone());
	let batch = vec![
		job("a", "Nurse", "Berlin", ""),
		job("b", "Cook", "Berlin", ""),
		job("a", "Nurse (repost)", "Berlin", ""),
	];
	let first = service.store_jobs(batch.clone(), NOW).await.expect("Store failed.");
	let second = service.store_jobs(batch, NOW).await.expect("Store failed.");

	assert_eq!((first.stored, first.skipped, first.failed), (2, 1, 0));
	assert_eq!((second.stored, second.skipped, second.failed), (0, 3, 0));
	assert_eq!(store.inserts.load(Ordering::SeqCst), 2);
	assert_eq!(store.ids(), vec!["a".to_string(), "b".to_string()]);
}

#[tokio::test]
async fn embedding_failures_skip_single_jobs() {
	let store = Arc::new(ScriptedStore::default());
	let service = service_with(store.clone(), StubEmbedding { fail_on: Some("BROKEN") });
	let report = service
		.store_jobs(vec![job("ok", "Nurse", "", ""), job("bad", "Nurse", "", "BROKEN text")], NOW)
		.await
		.expect("Store failed.");

	assert_eq!((report.stored, report.failed), (1, 1));
	assert_eq!(store.ids(), vec!["ok".to_string()]);
}

#[tokio::test]
async fn cleanup_removes_stale_and_dead_postings() {
	let mut old = job("old", "Nurse", "", "");
	let mut no_url = job("no_url", "Nurse", "", "");
	let mut bad_url = job("bad_url", "Nurse", "", "");
	let mut gone = job("gone", "Nurse", "", "");
	let alive = job("alive", "Nurse", "", "");
	let mut flaky = job("flaky", "Nurse", "", "");
	let mut undated = job("undated", "Nurse", "", "");

	old.created_at = Some(datetime!(2026-03-01 12:00 UTC));
	no_url.url = None;
	bad_url.url = Some("jobs.test/bad".to_string());
	gone.url = Some("https://jobs.test/gone".to_string());
	flaky.url = Some("https://jobs.test/flaky".to_string());
	undated.created_at = None;

	let store = Arc::new(ScriptedStore::with_jobs(
		[old, no_url, bad_url, gone, alive, flaky, undated]
			.into_iter()
			.map(|job| (job, 1.0))
			.collect(),
	));
	let report = service(store.clone()).cleanup(NOW).await.expect("Cleanup failed.");

	assert_eq!(report.checked, 7);
	assert_eq!(report.removed, 4);
	assert_eq!(
		(report.age_expired, report.empty_url, report.invalid_url, report.url_404),
		(1, 1, 1, 1)
	);
	assert_eq!(report.probe_errors, 1);
	assert_eq!(store.ids(), vec!["alive".to_string(), "flaky".to_string(), "undated".to_string()]);
}

#[tokio::test]
async fn crawl_skips_sources_without_credentials() {
	let store = Arc::new(ScriptedStore::default());
	let scrape = Arc::new(StubScrape::default());
	let service =
		service_with_scrape(store.clone(), StubEmbedding { fail_on: None }, scrape.clone());
	let report = service.crawl(NOW).await.expect("Crawl failed.");

	assert!(report.linkedin.enabled);
	assert_eq!(report.linkedin.queries, 3);
	assert_eq!(report.linkedin.failed_queries, 1);
	assert_eq!(report.linkedin.fetched, 4);
	assert!(!report.indeed.enabled);
	assert_eq!(report.indeed.queries, 0);
	assert_eq!(scrape.indeed_calls.load(Ordering::SeqCst), 0);
	// The shared posting is fetched twice but stored once.
	assert_eq!((report.store.stored, report.store.skipped), (3, 1));
}

#[tokio::test]
async fn stats_and_keyword_scan_cover_the_store() {
	let store = Arc::new(ScriptedStore::with_jobs(vec![
		(job("a", "Software Engineer", "Berlin", "Rust services."), 1.0),
		(job("b", "Nurse", "Berlin", "Night shifts."), 1.0),
		(job("c", "Cook", "Hamburg", "Rust-free kitchen."), 1.0),
	]));
	let service = service(store);
	let stats = service.stats().await.expect("Stats failed.");
	let matches = service.keyword_matches("RUST").await.expect("Keyword scan failed.");

	assert_eq!(stats.total_jobs, 3);
	assert_eq!(stats.sample_titles.len(), 3);
	assert_eq!(stats.software_titles_in_sample, 1);
	assert_eq!(matches.total_jobs, 3);
	assert_eq!(matches.matching_count, 2);
	assert_eq!(
		matches.matches.iter().map(|item| item.id.as_str()).collect::<Vec<_>>(),
		vec!["a", "c"]
	);
}
