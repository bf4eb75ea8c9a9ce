pub mod cleanup;
pub mod crawl;
pub mod ingest;
pub mod search;
pub mod stats;
pub mod store;

mod error;

pub use cleanup::CleanupReport;
pub use crawl::CrawlReport;
pub use error::{Error, Result};
pub use ingest::StoreReport;
pub use jc_providers::link::LinkStatus;
pub use search::{MatchStage, RankedJob, SearchRequest, SearchResponse};
pub use stats::{KeywordMatch, KeywordMatches, StoreStats};
pub use store::{JobStore, ScoredJob, ScrollPage};

use std::{future::Future, pin::Pin, sync::Arc};

use jc_config::{ApifyProviderConfig, Config, EmbeddingProviderConfig, ZyteProviderConfig};
use jc_domain::JobDocument;
use jc_providers::{embedding, indeed, link, linkedin};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>>;
}

/// Upstream job boards. Each call returns at most `limit` postings.
pub trait ScrapeProvider
where
	Self: Send + Sync,
{
	fn linkedin<'a>(
		&'a self,
		cfg: &'a ApifyProviderConfig,
		title: &'a str,
		location: Option<&'a str>,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<JobDocument>>>;

	fn indeed<'a>(
		&'a self,
		cfg: &'a ZyteProviderConfig,
		title: &'a str,
		location: Option<&'a str>,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<JobDocument>>>;
}

pub trait LinkProbe
where
	Self: Send + Sync,
{
	fn probe<'a>(&'a self, url: &'a str, timeout_ms: u64) -> BoxFuture<'a, Result<LinkStatus>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub scrape: Arc<dyn ScrapeProvider>,
	pub link: Arc<dyn LinkProbe>,
}
impl Providers {
	pub fn new(
		embedding: Arc<dyn EmbeddingProvider>,
		scrape: Arc<dyn ScrapeProvider>,
		link: Arc<dyn LinkProbe>,
	) -> Self {
		Self { embedding, scrape, link }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { embedding: provider.clone(), scrape: provider.clone(), link: provider }
	}
}

pub struct JobService {
	pub cfg: Config,
	pub store: Arc<dyn JobStore>,
	pub providers: Providers,
}
impl JobService {
	pub fn new(cfg: Config, store: Arc<dyn JobStore>) -> Self {
		Self { cfg, store, providers: Providers::default() }
	}

	pub fn with_providers(cfg: Config, store: Arc<dyn JobStore>, providers: Providers) -> Self {
		Self { cfg, store, providers }
	}
}

struct DefaultProviders;
impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		Box::pin(async move { Ok(embedding::embed(cfg, texts).await?) })
	}
}
impl ScrapeProvider for DefaultProviders {
	fn linkedin<'a>(
		&'a self,
		cfg: &'a ApifyProviderConfig,
		title: &'a str,
		location: Option<&'a str>,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<JobDocument>>> {
		Box::pin(async move { Ok(linkedin::search_jobs(cfg, title, location, limit).await?) })
	}

	fn indeed<'a>(
		&'a self,
		cfg: &'a ZyteProviderConfig,
		title: &'a str,
		location: Option<&'a str>,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<JobDocument>>> {
		Box::pin(async move {
			let page = indeed::search_jobs(cfg, title, location, limit).await?;

			if page.skipped > 0 {
				tracing::warn!(
					query = title,
					fetched = page.jobs.len(),
					skipped = page.skipped,
					"Some Indeed detail pages could not be extracted."
				);
			}

			Ok(page.jobs)
		})
	}
}
impl LinkProbe for DefaultProviders {
	fn probe<'a>(&'a self, url: &'a str, timeout_ms: u64) -> BoxFuture<'a, Result<LinkStatus>> {
		Box::pin(async move { Ok(link::probe(url, timeout_ms).await?) })
	}
}

/// Value stored next to each vector so re-embedding with another model can be detected.
pub(crate) fn embedding_version(cfg: &Config) -> String {
	format!(
		"{}:{}:{}",
		cfg.providers.embedding.provider_id,
		cfg.providers.embedding.model,
		cfg.storage.qdrant.vector_dim
	)
}
