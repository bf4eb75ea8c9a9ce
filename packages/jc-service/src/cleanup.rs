use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use jc_domain::JobDocument;

use crate::{JobService, LinkStatus, Result};

const PROGRESS_EVERY: u32 = 50;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupReport {
	pub checked: u32,
	pub removed: u32,
	pub age_expired: u32,
	pub empty_url: u32,
	pub invalid_url: u32,
	pub url_404: u32,
	/// Probes that failed at the transport level. Those jobs are kept.
	pub probe_errors: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemovalReason {
	AgeExpired,
	EmptyUrl,
	InvalidUrl,
	Url404,
}
impl RemovalReason {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::AgeExpired => "age_expired",
			Self::EmptyUrl => "empty_url",
			Self::InvalidUrl => "invalid_url",
			Self::Url404 => "url_404",
		}
	}
}

/// Removal reason decidable without the network, checked in priority order.
pub fn offline_reason(
	job: &JobDocument,
	now: OffsetDateTime,
	max_age_days: i64,
) -> Option<RemovalReason> {
	// Age counts whole elapsed days only.
	if job.created_at.is_some_and(|created_at| (now - created_at).whole_days() > max_age_days) {
		return Some(RemovalReason::AgeExpired);
	}

	let url = job.url.as_deref().map(str::trim).unwrap_or_default();

	if url.is_empty() {
		return Some(RemovalReason::EmptyUrl);
	}
	if !(url.starts_with("http://") || url.starts_with("https://")) {
		return Some(RemovalReason::InvalidUrl);
	}

	None
}

impl JobService {
	/// Removes expired postings and postings whose link is gone.
	///
	/// Every stored job is inspected in store order; deletions happen after the scan so paging is
	/// not disturbed. Jobs without a readable timestamp are never age-expired.
	pub async fn cleanup(&self, now: OffsetDateTime) -> Result<CleanupReport> {
		let cfg = &self.cfg.cleanup;
		let mut report = CleanupReport::default();
		let mut doomed = Vec::new();
		let mut offset: Option<String> = None;

		loop {
			let page = self.store.scroll(cfg.batch_size, offset.as_deref()).await?;

			for job in page.jobs {
				report.checked += 1;

				let reason = match offline_reason(&job, now, cfg.max_age_days) {
					Some(reason) => Some(reason),
					None if cfg.probe_urls => self.probe_reason(&job, &mut report).await,
					None => None,
				};

				if let Some(reason) = reason {
					match reason {
						RemovalReason::AgeExpired => report.age_expired += 1,
						RemovalReason::EmptyUrl => report.empty_url += 1,
						RemovalReason::InvalidUrl => report.invalid_url += 1,
						RemovalReason::Url404 => report.url_404 += 1,
					}

					tracing::debug!(
						job_id = %job.id,
						reason = reason.as_str(),
						"Job marked for removal."
					);

					doomed.push(job.id);
				}
				if report.checked % PROGRESS_EVERY == 0 {
					tracing::info!(
						checked = report.checked,
						marked = doomed.len(),
						"Cleanup progress."
					);
				}
			}

			match page.next_offset {
				Some(next) => offset = Some(next),
				None => break,
			}
		}

		for batch in doomed.chunks(cfg.batch_size as usize) {
			self.store.delete(batch).await?;

			report.removed += batch.len() as u32;
		}

		tracing::info!(
			checked = report.checked,
			removed = report.removed,
			age_expired = report.age_expired,
			empty_url = report.empty_url,
			invalid_url = report.invalid_url,
			url_404 = report.url_404,
			probe_errors = report.probe_errors,
			"Cleanup finished."
		);

		Ok(report)
	}

	async fn probe_reason(
		&self,
		job: &JobDocument,
		report: &mut CleanupReport,
	) -> Option<RemovalReason> {
		let url = job.url.as_deref()?.trim();

		match self.providers.link.probe(url, self.cfg.cleanup.probe_timeout_ms).await {
			Ok(LinkStatus::NotFound) => Some(RemovalReason::Url404),
			Ok(LinkStatus::Alive(_)) => None,
			Err(err) => {
				tracing::warn!(job_id = %job.id, error = %err, "Link probe failed; keeping job.");

				report.probe_errors += 1;

				None
			},
		}
	}
}
