//! LinkedIn postings through an Apify actor's synchronous dataset endpoint.

use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde_json::Value;

use jc_config::ApifyProviderConfig;
use jc_domain::{ExperienceLevel, JobDocument, JobSource, WorkType};

use crate::json_text;

const ID_PREFIX: &str = "linkedin_";

pub async fn search_jobs(
	cfg: &ApifyProviderConfig,
	title: &str,
	location: Option<&str>,
	limit: u32,
) -> Result<Vec<JobDocument>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	// Actor ids use "owner/name" but the REST path expects "owner~name".
	let actor = cfg.actor_id.trim().replace('/', "~");
	let url = format!(
		"{}/v2/acts/{actor}/run-sync-get-dataset-items",
		cfg.api_base.trim_end_matches('/')
	);
	let location = location
		.map(str::trim)
		.filter(|location| !location.is_empty())
		.unwrap_or(cfg.default_location.as_str());
	let body = serde_json::json!({
		"title": title,
		"location": location,
		"limit": limit,
		"datePosted": cfg.date_posted,
		"proxy": {
			"useApifyProxy": true,
			"apifyProxyGroups": ["RESIDENTIAL"],
		},
	});
	let res = client
		.post(url)
		.query(&[("token", cfg.api_token.as_str())])
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_dataset(json)
}

/// Parses the dataset items, dropping items that lack required fields.
pub fn parse_dataset(json: Value) -> Result<Vec<JobDocument>> {
	let items =
		json.as_array().ok_or_else(|| eyre::eyre!("Apify dataset response must be an array."))?;

	Ok(items.iter().filter_map(parse_item).collect())
}

pub fn parse_item(item: &Value) -> Option<JobDocument> {
	let id = json_text(item, "id")?;
	let title = json_text(item, "title")?;
	let company_name = json_text(item, "companyName")?;
	let url = json_text(item, "url")?;
	let contract_type = json_text(item, "contractType");
	let work_type = contract_type
		.as_deref()
		.and_then(WorkType::parse)
		.filter(|kind| {
			matches!(
				kind,
				WorkType::FullTime | WorkType::PartTime | WorkType::Contract | WorkType::Internship
			)
		})
		.or_else(|| {
			json_text(item, "workType").as_deref().and_then(WorkType::parse).filter(|kind| {
				matches!(kind, WorkType::Remote | WorkType::Hybrid | WorkType::OnSite)
			})
		});
	let mut job = JobDocument::new(
		format!("{ID_PREFIX}{id}"),
		title,
		company_name,
		json_text(item, "location").unwrap_or_default(),
		json_text(item, "description").unwrap_or_default(),
		JobSource::LinkedIn,
	);

	job.work_type = work_type;
	job.contract_type = contract_type;
	job.experience_level =
		json_text(item, "experienceLevel").as_deref().and_then(ExperienceLevel::parse);
	job.sector = json_text(item, "sector");
	job.salary = json_text(item, "salary");
	job.url = Some(url);
	job.apply_url = json_text(item, "applyUrl");
	job.posted_time_ago = json_text(item, "postedTimeAgo");
	job.applications_count = json_text(item, "applicationsCount");

	Some(job)
}
