//! Daily wall-clock schedule in a fixed UTC offset.

use time::{Duration, OffsetDateTime, Time, UtcOffset};

use jc_config::Config;

use crate::worker::Job;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Schedule {
	crawl_at: Time,
	cleanup_at: Time,
	offset: UtcOffset,
}
impl Schedule {
	pub fn from_config(cfg: &Config) -> color_eyre::Result<Self> {
		let (crawl_hour, crawl_minute) =
			jc_config::parse_daily_at("crawl.daily_at", &cfg.crawl.daily_at)?;
		let (cleanup_hour, cleanup_minute) =
			jc_config::parse_daily_at("cleanup.daily_at", &cfg.cleanup.daily_at)?;

		Ok(Self {
			crawl_at: Time::from_hms(crawl_hour, crawl_minute, 0)?,
			cleanup_at: Time::from_hms(cleanup_hour, cleanup_minute, 0)?,
			offset: UtcOffset::from_whole_seconds(cfg.crawl.utc_offset_minutes * 60)?,
		})
	}

	/// The job that fires first after `now`. Crawl wins a tie.
	pub fn next_due(&self, now: OffsetDateTime) -> (Job, OffsetDateTime) {
		let crawl = next_occurrence(now, self.crawl_at, self.offset);
		let cleanup = next_occurrence(now, self.cleanup_at, self.offset);

		if cleanup < crawl { (Job::Cleanup, cleanup) } else { (Job::Crawl, crawl) }
	}
}

/// First instant strictly after `now` whose wall clock in `offset` reads `at`.
pub fn next_occurrence(now: OffsetDateTime, at: Time, offset: UtcOffset) -> OffsetDateTime {
	let local = now.to_offset(offset);
	let candidate = local.replace_time(at);

	if candidate > local { candidate } else { candidate + Duration::days(1) }
}
