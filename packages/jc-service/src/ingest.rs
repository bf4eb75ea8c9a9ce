use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use jc_domain::JobDocument;

use crate::{JobService, Result};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreReport {
	pub stored: u32,
	pub skipped: u32,
	pub failed: u32,
}

impl JobService {
	/// Embeds and stores jobs whose ids are not stored yet.
	///
	/// Ids already in the store, or repeated earlier in `jobs`, are skipped. A job whose embedding
	/// or insert fails is counted as failed and the batch continues. Only the existence lookup can
	/// fail the whole call.
	pub async fn store_jobs(
		&self,
		jobs: Vec<JobDocument>,
		now: OffsetDateTime,
	) -> Result<StoreReport> {
		let ids = jobs.iter().map(|job| job.id.clone()).collect::<Vec<_>>();
		let mut seen = self
			.store
			.get(&ids)
			.await?
			.into_iter()
			.map(|job| job.id)
			.collect::<HashSet<_>>();
		let embedding_model = crate::embedding_version(&self.cfg);
		let mut report = StoreReport::default();

		for mut job in jobs {
			if !seen.insert(job.id.clone()) {
				report.skipped += 1;

				continue;
			}

			job.created_at = Some(now);

			let text = job.embedding_text();
			let vector = match self.embed_text(&text).await {
				Ok(vector) => vector,
				Err(err) => {
					tracing::warn!(
						job_id = %job.id,
						error = %err,
						"Failed to embed job; skipping."
					);

					report.failed += 1;

					continue;
				},
			};

			match self.store.insert(&job, vector, &embedding_model).await {
				Ok(()) => report.stored += 1,
				Err(err) => {
					tracing::warn!(job_id = %job.id, error = %err, "Failed to store job.");

					report.failed += 1;
				},
			}
		}

		tracing::info!(
			stored = report.stored,
			skipped = report.skipped,
			failed = report.failed,
			"Stored job batch."
		);

		Ok(report)
	}
}
