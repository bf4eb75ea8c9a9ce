//! Job records as flat Qdrant payloads.
//!
//! Every key is always present. Absent optional values are stored as `""`, except
//! `applications_count`, which falls back to `"0"`.

use std::collections::HashMap;

use qdrant_client::qdrant::{Value, value::Kind};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use jc_domain::{ExperienceLevel, JobDocument, JobSource, WorkType};

use crate::{Error, Result};

pub const KEY_ID: &str = "id";
pub const KEY_TITLE: &str = "title";
pub const KEY_COMPANY_NAME: &str = "company_name";
pub const KEY_LOCATION: &str = "location";
pub const KEY_DESCRIPTION: &str = "description";
pub const KEY_FULL_DESCRIPTION: &str = "full_description";
pub const KEY_DESCRIPTION_PREVIEW: &str = "description_preview";
pub const KEY_WORK_TYPE: &str = "work_type";
pub const KEY_CONTRACT_TYPE: &str = "contract_type";
pub const KEY_EXPERIENCE_LEVEL: &str = "experience_level";
pub const KEY_SECTOR: &str = "sector";
pub const KEY_SALARY: &str = "salary";
pub const KEY_SOURCE: &str = "source";
pub const KEY_URL: &str = "url";
pub const KEY_APPLY_URL: &str = "apply_url";
pub const KEY_POSTED_TIME_AGO: &str = "posted_time_ago";
pub const KEY_APPLICATIONS_COUNT: &str = "applications_count";
pub const KEY_CREATED_AT: &str = "created_at";
pub const KEY_EMBEDDING_MODEL: &str = "embedding_model";

const EMPTY_APPLICATIONS_COUNT: &str = "0";

pub fn encode(job: &JobDocument, embedding_model: &str) -> Result<HashMap<String, Value>> {
	let created_at = match job.created_at {
		Some(ts) => ts.format(&Rfc3339).map_err(|err| {
			Error::InvalidArgument(format!("created_at of job {:?} is not RFC 3339: {err}.", job.id))
		})?,
		None => String::new(),
	};
	let optional = |value: &Option<String>| value.clone().unwrap_or_default();
	let fields = [
		(KEY_ID, job.id.clone()),
		(KEY_TITLE, job.title.clone()),
		(KEY_COMPANY_NAME, job.company_name.clone()),
		(KEY_LOCATION, job.location.clone()),
		(KEY_DESCRIPTION, job.description.clone()),
		(KEY_FULL_DESCRIPTION, job.description.clone()),
		(KEY_DESCRIPTION_PREVIEW, job.description_preview().to_string()),
		(KEY_WORK_TYPE, job.work_type.map(WorkType::as_str).unwrap_or_default().to_string()),
		(KEY_CONTRACT_TYPE, optional(&job.contract_type)),
		(
			KEY_EXPERIENCE_LEVEL,
			job.experience_level.map(ExperienceLevel::as_str).unwrap_or_default().to_string(),
		),
		(KEY_SECTOR, optional(&job.sector)),
		(KEY_SALARY, optional(&job.salary)),
		(KEY_SOURCE, job.source.as_str().to_string()),
		(KEY_URL, optional(&job.url)),
		(KEY_APPLY_URL, optional(&job.apply_url)),
		(KEY_POSTED_TIME_AGO, optional(&job.posted_time_ago)),
		(
			KEY_APPLICATIONS_COUNT,
			job.applications_count.clone().unwrap_or_else(|| EMPTY_APPLICATIONS_COUNT.to_string()),
		),
		(KEY_CREATED_AT, created_at),
		(KEY_EMBEDDING_MODEL, embedding_model.to_string()),
	];

	Ok(fields.into_iter().map(|(key, value)| (key.to_string(), Value::from(value))).collect())
}

/// Rebuilds a job from a stored payload. Only the id and title are mandatory.
pub fn decode(payload: &HashMap<String, Value>) -> Result<JobDocument> {
	let id = text(payload, KEY_ID).ok_or_else(|| Error::InvalidPayload {
		point: "<unknown>".to_string(),
		message: "missing job id".to_string(),
	})?;
	let title = text(payload, KEY_TITLE).ok_or_else(|| Error::InvalidPayload {
		point: id.clone(),
		message: "missing title".to_string(),
	})?;
	let description = text(payload, KEY_FULL_DESCRIPTION)
		.or_else(|| text(payload, KEY_DESCRIPTION))
		.unwrap_or_default();
	let source = text(payload, KEY_SOURCE).as_deref().and_then(JobSource::parse).unwrap_or_default();
	let mut job = JobDocument::new(
		id,
		title,
		text(payload, KEY_COMPANY_NAME).unwrap_or_default(),
		text(payload, KEY_LOCATION).unwrap_or_default(),
		description,
		source,
	);

	job.work_type = text(payload, KEY_WORK_TYPE).as_deref().and_then(WorkType::parse);
	job.contract_type = text(payload, KEY_CONTRACT_TYPE);
	job.experience_level =
		text(payload, KEY_EXPERIENCE_LEVEL).as_deref().and_then(ExperienceLevel::parse);
	job.sector = text(payload, KEY_SECTOR);
	job.salary = text(payload, KEY_SALARY);
	job.url = text(payload, KEY_URL);
	job.apply_url = text(payload, KEY_APPLY_URL);
	job.posted_time_ago = text(payload, KEY_POSTED_TIME_AGO);
	job.applications_count =
		text(payload, KEY_APPLICATIONS_COUNT).filter(|count| count != EMPTY_APPLICATIONS_COUNT);
	// An unparseable timestamp decodes as unknown rather than failing the whole record.
	job.created_at = text(payload, KEY_CREATED_AT)
		.and_then(|raw| OffsetDateTime::parse(&raw, &Rfc3339).ok());

	Ok(job)
}

/// Non-blank string value under `key`. Numbers are accepted for counters written by hand.
fn text(payload: &HashMap<String, Value>, key: &str) -> Option<String> {
	match &payload.get(key)?.kind {
		Some(Kind::StringValue(raw)) => (!raw.trim().is_empty()).then(|| raw.clone()),
		Some(Kind::IntegerValue(value)) => Some(value.to_string()),
		_ => None,
	}
}
