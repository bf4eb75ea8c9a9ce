use serde::{Deserialize, Serialize};

use jc_domain::{JobDocument, text::contains_any, vocabulary};

use crate::{JobService, Result};

const SAMPLE_TITLES: u32 = 10;
const MAX_KEYWORD_MATCHES: usize = 20;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
	pub collection: String,
	pub total_jobs: u64,
	pub sample_titles: Vec<String>,
	pub software_titles_in_sample: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordMatch {
	pub id: String,
	pub title: String,
	pub company_name: String,
	pub location: String,
	pub description_preview: String,
}
impl From<&JobDocument> for KeywordMatch {
	fn from(job: &JobDocument) -> Self {
		Self {
			id: job.id.clone(),
			title: job.title.clone(),
			company_name: job.company_name.clone(),
			location: job.location.clone(),
			description_preview: job.description_preview().to_string(),
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordMatches {
	pub keyword: String,
	pub total_jobs: u64,
	/// Number of matching jobs before the response cap is applied.
	pub matching_count: u32,
	pub matches: Vec<KeywordMatch>,
}

impl JobService {
	pub async fn stats(&self) -> Result<StoreStats> {
		let total_jobs = self.store.count().await?;
		let sample = self.store.scroll(SAMPLE_TITLES, None).await?;
		let sample_titles = sample.jobs.into_iter().map(|job| job.title).collect::<Vec<_>>();
		let software_titles_in_sample = sample_titles
			.iter()
			.filter(|title| {
				contains_any(&title.to_lowercase(), vocabulary::SOFTWARE_TITLE_KEYWORDS)
			})
			.count() as u32;

		Ok(StoreStats {
			collection: self.store.collection().to_string(),
			total_jobs,
			sample_titles,
			software_titles_in_sample,
		})
	}

	/// Case-insensitive substring scan of title, description and company over the whole store.
	pub async fn keyword_matches(&self, keyword: &str) -> Result<KeywordMatches> {
		let needle = keyword.trim().to_lowercase();
		let total_jobs = self.store.count().await?;
		let mut matching_count = 0;
		let mut matches = Vec::new();
		let mut offset: Option<String> = None;

		loop {
			let page = self.store.scroll(self.cfg.cleanup.batch_size, offset.as_deref()).await?;

			for job in &page.jobs {
				if !job_mentions(job, &needle) {
					continue;
				}

				matching_count += 1;

				if matches.len() < MAX_KEYWORD_MATCHES {
					matches.push(KeywordMatch::from(job));
				}
			}

			match page.next_offset {
				Some(next) => offset = Some(next),
				None => break,
			}
		}

		Ok(KeywordMatches { keyword: keyword.to_string(), total_jobs, matching_count, matches })
	}
}

fn job_mentions(job: &JobDocument, needle: &str) -> bool {
	if needle.is_empty() {
		return false;
	}

	[&job.title, &job.description, &job.company_name]
		.into_iter()
		.any(|field| field.to_lowercase().contains(needle))
}
