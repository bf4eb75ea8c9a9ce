use std::time::Duration as StdDuration;

use clap::ValueEnum;
use time::{Duration, OffsetDateTime};

use jc_service::JobService;

use crate::schedule::Schedule;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Job {
	Crawl,
	Cleanup,
}
impl Job {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Crawl => "crawl",
			Self::Cleanup => "cleanup",
		}
	}
}

/// Runs one job now and logs its report.
pub async fn run_job(service: &JobService, job: Job) -> color_eyre::Result<()> {
	let now = OffsetDateTime::now_utc();

	match job {
		Job::Crawl => {
			let report = service.crawl(now).await?;

			tracing::info!(
				linkedin_fetched = report.linkedin.fetched,
				indeed_fetched = report.indeed.fetched,
				stored = report.store.stored,
				skipped = report.store.skipped,
				failed = report.store.failed,
				"Scheduled crawl finished."
			);
		},
		Job::Cleanup => {
			let report = service.cleanup(now).await?;

			tracing::info!(
				checked = report.checked,
				removed = report.removed,
				probe_errors = report.probe_errors,
				"Scheduled cleanup finished."
			);
		},
	}

	Ok(())
}

/// Sleeps until the next due job, runs it, and repeats. A failed run never stops the loop.
pub async fn run_worker(service: &JobService, schedule: &Schedule) -> color_eyre::Result<()> {
	loop {
		let now = OffsetDateTime::now_utc();
		let (job, due_at) = schedule.next_due(now);

		tracing::info!(job = job.as_str(), %due_at, "Waiting for the next scheduled job.");

		tokio::time::sleep(to_std_duration(due_at - now)).await;

		if let Err(err) = run_job(service, job).await {
			tracing::error!(job = job.as_str(), error = %err, "Scheduled job failed.");
		}
	}
}

fn to_std_duration(duration: Duration) -> StdDuration {
	let millis = duration.whole_milliseconds();

	if millis <= 0 {
		return StdDuration::from_millis(0);
	}

	StdDuration::from_millis(millis as u64)
}
