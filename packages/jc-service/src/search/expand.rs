//! Query plan construction: one raw query becomes a bounded list of related variants.

use std::collections::HashSet;

use jc_config::Search;
use jc_domain::vocabulary;

const TRANSLATION_SUFFIX: &str = "job position";

/// Ordered, case-insensitively unique query variants. The raw query always comes first.
pub fn expand(cfg: &Search, job_title: &str, location: Option<&str>) -> Vec<String> {
	let query_lower = job_title.to_lowercase();
	let mut pool = vec![job_title.to_string()];

	if let Some(entry) = vocabulary::find_translation(&query_lower) {
		for variant in entry.variants {
			pool.push((*variant).to_string());
			pool.push(format!("{variant} {TRANSLATION_SUFFIX}"));
		}
	}

	match vocabulary::classify_domain(&query_lower) {
		Some(domain) => pool.extend(domain.phrases.iter().map(|phrase| (*phrase).to_string())),
		None => pool.extend(
			vocabulary::GENERIC_SUFFIXES.iter().map(|suffix| format!("{job_title} {suffix}")),
		),
	}

	if let Some(location) = location {
		let located = pool
			.iter()
			.take(cfg.location_variant_sources as usize)
			.flat_map(|query| [format!("{query} {location}"), format!("{query} in {location}")])
			.collect::<Vec<_>>();

		pool.extend(located);
	}

	let mut seen = HashSet::new();
	let mut plan = pool
		.into_iter()
		.filter(|query| seen.insert(query.to_lowercase()))
		.collect::<Vec<_>>();

	plan.truncate(cfg.max_queries as usize);

	plan
}
