use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::text;

/// Characters of the description that take part in the embedding projection.
pub const EMBEDDING_DESCRIPTION_CHARS: usize = 500;
/// Characters kept in the stored description preview.
pub const DESCRIPTION_PREVIEW_CHARS: usize = 200;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkType {
	#[serde(rename = "Full-time")]
	FullTime,
	#[serde(rename = "Part-time")]
	PartTime,
	#[serde(rename = "Contract")]
	Contract,
	#[serde(rename = "Internship")]
	Internship,
	#[serde(rename = "Remote")]
	Remote,
	#[serde(rename = "Hybrid")]
	Hybrid,
	#[serde(rename = "On-site")]
	OnSite,
}
impl WorkType {
	pub const ALL: [Self; 7] = [
		Self::FullTime,
		Self::PartTime,
		Self::Contract,
		Self::Internship,
		Self::Remote,
		Self::Hybrid,
		Self::OnSite,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::FullTime => "Full-time",
			Self::PartTime => "Part-time",
			Self::Contract => "Contract",
			Self::Internship => "Internship",
			Self::Remote => "Remote",
			Self::Hybrid => "Hybrid",
			Self::OnSite => "On-site",
		}
	}

	/// Case-insensitive lookup by display label. Unknown labels yield `None`.
	pub fn parse(raw: &str) -> Option<Self> {
		let raw = raw.trim();

		Self::ALL.into_iter().find(|kind| kind.as_str().eq_ignore_ascii_case(raw))
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExperienceLevel {
	#[serde(rename = "Entry level")]
	EntryLevel,
	#[serde(rename = "Mid-Senior level")]
	MidSeniorLevel,
	#[serde(rename = "Senior level")]
	SeniorLevel,
	#[serde(rename = "Executive")]
	Executive,
	#[serde(rename = "Internship")]
	Internship,
}
impl ExperienceLevel {
	pub const ALL: [Self; 5] = [
		Self::EntryLevel,
		Self::MidSeniorLevel,
		Self::SeniorLevel,
		Self::Executive,
		Self::Internship,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::EntryLevel => "Entry level",
			Self::MidSeniorLevel => "Mid-Senior level",
			Self::SeniorLevel => "Senior level",
			Self::Executive => "Executive",
			Self::Internship => "Internship",
		}
	}

	pub fn parse(raw: &str) -> Option<Self> {
		let raw = raw.trim();

		Self::ALL.into_iter().find(|level| level.as_str().eq_ignore_ascii_case(raw))
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobSource {
	#[default]
	LinkedIn,
	Indeed,
	StepStone,
}
impl JobSource {
	pub const ALL: [Self; 3] = [Self::LinkedIn, Self::Indeed, Self::StepStone];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::LinkedIn => "LinkedIn",
			Self::Indeed => "Indeed",
			Self::StepStone => "StepStone",
		}
	}

	pub fn parse(raw: &str) -> Option<Self> {
		let raw = raw.trim();

		Self::ALL.into_iter().find(|source| source.as_str().eq_ignore_ascii_case(raw))
	}
}

/// A job posting as stored in the vector index.
///
/// `id` is stable across re-crawls of the same posting; storing an id that already exists is a
/// no-op.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JobDocument {
	pub id: String,
	pub title: String,
	pub company_name: String,
	pub location: String,
	pub description: String,
	pub work_type: Option<WorkType>,
	pub contract_type: Option<String>,
	pub experience_level: Option<ExperienceLevel>,
	pub sector: Option<String>,
	pub salary: Option<String>,
	pub source: JobSource,
	pub url: Option<String>,
	pub apply_url: Option<String>,
	pub posted_time_ago: Option<String>,
	pub applications_count: Option<String>,
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub created_at: Option<OffsetDateTime>,
}
impl JobDocument {
	pub fn new(
		id: impl Into<String>,
		title: impl Into<String>,
		company_name: impl Into<String>,
		location: impl Into<String>,
		description: impl Into<String>,
		source: JobSource,
	) -> Self {
		Self {
			id: id.into(),
			title: title.into(),
			company_name: company_name.into(),
			location: location.into(),
			description: description.into(),
			work_type: None,
			contract_type: None,
			experience_level: None,
			sector: None,
			salary: None,
			source,
			url: None,
			apply_url: None,
			posted_time_ago: None,
			applications_count: None,
			created_at: None,
		}
	}

	/// Text that is embedded once at ingestion.
	pub fn embedding_text(&self) -> String {
		format!(
			"Job: {} Company: {} Location: {} Description: {}",
			self.title,
			self.company_name,
			self.location,
			text::truncate_chars(&self.description, EMBEDDING_DESCRIPTION_CHARS),
		)
	}

	pub fn description_preview(&self) -> &str {
		text::truncate_chars(&self.description, DESCRIPTION_PREVIEW_CHARS)
	}
}
