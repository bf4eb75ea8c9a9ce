use std::collections::HashSet;

use jc_domain::{
	ExperienceLevel, JobDocument, JobSource, WorkType,
	vocabulary::{self, Domain},
};

fn sample_job() -> JobDocument {
	let mut job = JobDocument::new(
		"linkedin_42",
		"Senior Python Developer",
		"Acme GmbH",
		"Berlin, Germany",
		"x".repeat(800),
		JobSource::LinkedIn,
	);

	job.work_type = Some(WorkType::Hybrid);

	job
}

#[test]
fn embedding_text_uses_description_prefix() {
	let job = sample_job();
	let text = job.embedding_text();

	assert!(text.starts_with(
		"Job: Senior Python Developer Company: Acme GmbH Location: Berlin, Germany Description: "
	));
	assert_eq!(text.matches('x').count(), 500);
	assert_eq!(job.description_preview().len(), 200);
}

#[test]
fn enums_parse_display_labels_case_insensitively() {
	assert_eq!(WorkType::parse("full-time"), Some(WorkType::FullTime));
	assert_eq!(WorkType::parse("On-site"), Some(WorkType::OnSite));
	assert_eq!(WorkType::parse("Temporary"), None);
	assert_eq!(ExperienceLevel::parse("Mid-Senior level"), Some(ExperienceLevel::MidSeniorLevel));
	assert_eq!(JobSource::parse("indeed"), Some(JobSource::Indeed));
	assert_eq!(JobSource::parse(""), None);
}

#[test]
fn job_document_serializes_enums_as_labels() {
	let job = sample_job();
	let json = serde_json::to_value(&job).expect("Failed to serialize job.");

	assert_eq!(json["work_type"], "Hybrid");
	assert_eq!(json["source"], "LinkedIn");
	assert!(json["created_at"].is_null());

	let back: JobDocument = serde_json::from_value(json).expect("Failed to deserialize job.");

	assert_eq!(back, job);
}

#[test]
fn translation_lookup_is_first_match_in_table_order() {
	let entry = vocabulary::find_translation("senior python developer")
		.expect("Expected a translation entry.");

	// "developer" precedes "python" and "senior" in the table.
	assert_eq!(entry.term, "developer");
	assert!(vocabulary::find_translation("trainee").is_some_and(|entry| entry.term == "trainee"));
	assert!(vocabulary::find_translation("gärtner").is_none());
}

#[test]
fn translation_terms_are_unique() {
	let mut seen = HashSet::new();

	for entry in vocabulary::TRANSLATIONS {
		assert!(seen.insert(entry.term), "Duplicate translation term {:?}.", entry.term);
		assert!(!entry.variants.is_empty());
	}
}

#[test]
fn domain_classification_follows_priority_order() {
	let classify = |query: &str| vocabulary::classify_domain(query).map(|domain| domain.domain);

	assert_eq!(classify("data engineer"), Some(Domain::Software));
	assert_eq!(classify("data analyst"), Some(Domain::Data));
	assert_eq!(classify("nurse"), Some(Domain::Nursing));
	assert_eq!(classify("sales manager"), Some(Domain::Management));
	assert_eq!(classify("vertrieb"), Some(Domain::Sales));
	assert_eq!(classify("gärtner"), None);

	for domain in vocabulary::DOMAIN_EXPANSIONS {
		assert!((4..=6).contains(&domain.phrases.len()));
	}
}
