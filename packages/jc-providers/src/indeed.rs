//! Indeed postings through the Zyte extraction API: one navigation call for the result page,
//! then one job-posting extraction per detail link.

use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::{Client, Url};
use serde_json::Value;

use jc_config::ZyteProviderConfig;
use jc_domain::{JobDocument, JobSource, WorkType};

use crate::json_text;

const ID_PREFIX: &str = "indeed_";
const ID_HASH_CHARS: usize = 16;
const DETAIL_DELAY_MS: u64 = 1_000;
const FALLBACK_LOCATION: &str = "Germany";

/// Postings extracted from one result page.
#[derive(Debug, Default)]
pub struct ResultPage {
	pub jobs: Vec<JobDocument>,
	/// Detail pages that failed to extract or lacked a title or company.
	pub skipped: u32,
}
impl ResultPage {
	/// Records one detail extraction; a failed call or an incomplete posting counts as skipped.
	pub fn push_detail(&mut self, link: &str, detail: Result<Value>) {
		let job = detail.ok().and_then(|detail| {
			detail.get("jobPosting").and_then(|posting| parse_posting(posting, link))
		});

		match job {
			Some(job) => self.jobs.push(job),
			None => self.skipped += 1,
		}
	}
}

pub async fn search_jobs(
	cfg: &ZyteProviderConfig,
	title: &str,
	location: Option<&str>,
	limit: u32,
) -> Result<ResultPage> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let search_url = search_url(&cfg.search_url, title, location)?;
	let navigation = extract(
		&client,
		cfg,
		serde_json::json!({
			"url": search_url.as_str(),
			"jobPostingNavigation": true,
			"jobPostingNavigationOptions": { "extractFrom": "httpResponseBody" },
		}),
	)
	.await?;
	let links = parse_navigation(&navigation);
	let mut page = ResultPage::default();

	for (idx, link) in links.iter().take(limit as usize).enumerate() {
		if idx > 0 {
			tokio::time::sleep(Duration::from_millis(DETAIL_DELAY_MS)).await;
		}

		let detail = extract(
			&client,
			cfg,
			serde_json::json!({
				"url": link,
				"jobPosting": true,
				"jobPostingOptions": { "extractFrom": "httpResponseBody" },
			}),
		)
		.await;

		page.push_detail(link, detail);
	}

	Ok(page)
}

pub fn search_url(base: &str, title: &str, location: Option<&str>) -> Result<Url> {
	let location = location.map(str::trim).unwrap_or_default();

	Url::parse_with_params(base, &[("q", title.trim()), ("l", location)])
		.map_err(|err| eyre::eyre!("Invalid Indeed search URL {base:?}: {err}."))
}

pub fn parse_navigation(json: &Value) -> Vec<String> {
	json.get("jobPostingNavigation")
		.and_then(|nav| nav.get("items"))
		.and_then(Value::as_array)
		.map(|items| items.iter().filter_map(|item| json_text(item, "url")).collect())
		.unwrap_or_default()
}

/// Builds a job from an extracted `jobPosting` object. Title and company are required.
pub fn parse_posting(posting: &Value, url: &str) -> Option<JobDocument> {
	let title = json_text(posting, "jobTitle")?;
	let company_name = match posting.get("hiringOrganization")? {
		Value::Object(_) => json_text(posting.get("hiringOrganization")?, "name")?,
		Value::String(name) if !name.trim().is_empty() => name.trim().to_string(),
		_ => return None,
	};
	let location = posting
		.get("jobLocation")
		.and_then(parse_location)
		.unwrap_or_else(|| FALLBACK_LOCATION.to_string());
	let mut job = JobDocument::new(
		posting_id(url),
		title,
		company_name,
		location,
		json_text(posting, "description").unwrap_or_default(),
		JobSource::Indeed,
	);

	job.work_type = Some(
		match posting.get("employmentType").and_then(Value::as_str).unwrap_or_default() {
			"PART_TIME" => WorkType::PartTime,
			"CONTRACT" | "TEMPORARY" => WorkType::Contract,
			_ => WorkType::FullTime,
		},
	);
	job.url = Some(url.to_string());

	Some(job)
}

/// Stable id derived from the posting URL.
pub fn posting_id(url: &str) -> String {
	let hash = blake3::hash(url.as_bytes()).to_hex();

	format!("{ID_PREFIX}{}", &hash.as_str()[..ID_HASH_CHARS])
}

async fn extract(client: &Client, cfg: &ZyteProviderConfig, body: Value) -> Result<Value> {
	let url = format!("{}/v1/extract", cfg.api_base.trim_end_matches('/'));
	let res = client.post(url).basic_auth(&cfg.api_key, Some("")).json(&body).send().await?;

	Ok(res.error_for_status()?.json().await?)
}

fn parse_location(location: &Value) -> Option<String> {
	match location {
		Value::String(raw) => Some(raw.trim().to_string()).filter(|raw| !raw.is_empty()),
		Value::Object(_) => json_text(location, "raw").or_else(|| match location.get("address")? {
			Value::String(address) => Some(address.trim().to_string()).filter(|a| !a.is_empty()),
			address @ Value::Object(_) => json_text(address, "addressLocality"),
			_ => None,
		}),
		_ => None,
	}
}
