use std::time::Duration;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use jc_domain::{JobDocument, JobSource};

use crate::{JobService, Result, StoreReport};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceReport {
	pub source: JobSource,
	/// `false` when the source has no credentials configured.
	pub enabled: bool,
	pub queries: u32,
	pub failed_queries: u32,
	pub fetched: u32,
}
impl SourceReport {
	fn new(source: JobSource, enabled: bool) -> Self {
		Self { source, enabled, queries: 0, failed_queries: 0, fetched: 0 }
	}
}

#[derive(Clone, Copy)]
enum Board {
	LinkedIn,
	Indeed,
}
impl Board {
	fn source(self) -> JobSource {
		match self {
			Self::LinkedIn => JobSource::LinkedIn,
			Self::Indeed => JobSource::Indeed,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlReport {
	pub linkedin: SourceReport,
	pub indeed: SourceReport,
	pub store: StoreReport,
}

impl JobService {
	/// Scrapes the configured title list from every enabled source and stores new postings.
	///
	/// A failing query is logged and counted; it never aborts the crawl.
	pub async fn crawl(&self, now: OffsetDateTime) -> Result<CrawlReport> {
		let ((linkedin_jobs, linkedin), (indeed_jobs, indeed)) =
			tokio::join!(self.crawl_board(Board::LinkedIn), self.crawl_board(Board::Indeed));
		let mut jobs = linkedin_jobs;

		jobs.extend(indeed_jobs);

		let store = self.store_jobs(jobs, now).await?;

		tracing::info!(
			linkedin_fetched = linkedin.fetched,
			indeed_fetched = indeed.fetched,
			stored = store.stored,
			skipped = store.skipped,
			failed = store.failed,
			"Crawl finished."
		);

		Ok(CrawlReport { linkedin, indeed, store })
	}

	async fn crawl_board(&self, board: Board) -> (Vec<JobDocument>, SourceReport) {
		let crawl = &self.cfg.crawl;
		let providers = &self.cfg.providers;
		let source = board.source();
		let (enabled, queries) = match board {
			Board::LinkedIn =>
				(!providers.apify.api_token.trim().is_empty(), &crawl.linkedin_queries),
			Board::Indeed => (!providers.zyte.api_key.trim().is_empty(), &crawl.indeed_queries),
		};
		let mut report = SourceReport::new(source, enabled);
		let mut jobs = Vec::new();

		if !enabled {
			tracing::info!(source = source.as_str(), "Source has no credentials; skipping.");

			return (jobs, report);
		}

		for (idx, query) in queries.iter().enumerate() {
			if idx > 0 && crawl.query_delay_ms > 0 {
				tokio::time::sleep(Duration::from_millis(crawl.query_delay_ms)).await;
			}

			report.queries += 1;

			let scrape = &self.providers.scrape;
			let result = match board {
				Board::LinkedIn =>
					scrape.linkedin(&providers.apify, query, None, crawl.jobs_per_query).await,
				Board::Indeed =>
					scrape.indeed(&providers.zyte, query, None, crawl.jobs_per_query).await,
			};

			match result {
				Ok(found) => {
					tracing::info!(
						source = source.as_str(),
						query = %query,
						fetched = found.len(),
						"Scraped query."
					);

					report.fetched += found.len() as u32;
					jobs.extend(found);
				},
				Err(err) => {
					tracing::warn!(
						source = source.as_str(),
						query = %query,
						error = %err,
						"Scrape failed; continuing."
					);

					report.failed_queries += 1;
				},
			}
		}

		(jobs, report)
	}
}
