//! Heuristic relevance scoring for retrieved candidates.
//!
//! All weights come from `[ranking]`; the term tables live in `jc_domain::vocabulary`.

use jc_config::{Ranking, RankingPenalties};
use jc_domain::{
	JobDocument,
	text::{self, contains_any, contains_term},
	vocabulary::{self, Translation},
};

use crate::search::aggregate::Candidate;

/// Raw tokens this short are ignored by keyword scoring.
const MIN_KEYWORD_CHARS: usize = 3;

/// Query features computed once per search and shared by every candidate.
#[derive(Debug)]
pub struct QueryContext {
	keywords: Vec<String>,
	translations: Vec<&'static Translation>,
	location: Option<String>,
	location_words: Vec<String>,
	tech: bool,
	data_science: bool,
	nursing: bool,
	ai: bool,
	internship: bool,
}
impl QueryContext {
	pub fn new(job_title: &str, location: Option<&str>) -> Self {
		let query_lower = job_title.to_lowercase();
		let tokens = text::query_tokens(job_title);
		let keywords = tokens
			.iter()
			.filter(|token| token.chars().count() >= MIN_KEYWORD_CHARS)
			.cloned()
			.collect();
		let translations =
			tokens.iter().filter_map(|token| vocabulary::translation_for_token(token)).collect();
		let location = location.map(str::to_lowercase);
		let location_words = location
			.as_deref()
			.map(|location| {
				location
					.split_whitespace()
					.filter(|word| word.chars().count() >= MIN_KEYWORD_CHARS)
					.map(str::to_string)
					.collect()
			})
			.unwrap_or_default();

		Self {
			keywords,
			translations,
			location,
			location_words,
			tech: contains_any(&query_lower, vocabulary::TECH_QUERY_TERMS),
			data_science: contains_any(&query_lower, vocabulary::DATA_SCIENCE_QUERY_TERMS),
			nursing: contains_any(&query_lower, vocabulary::NURSING_QUERY_TERMS),
			ai: contains_any(&query_lower, vocabulary::AI_QUERY_TERMS),
			internship: contains_any(&query_lower, vocabulary::INTERNSHIP_QUERY_TERMS),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Penalty {
	DataScience,
	TechVsManagement,
	NursingVsTech,
	AiVsManagement,
}
impl Penalty {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::DataScience => "data_science",
			Self::TechVsManagement => "tech_vs_management",
			Self::NursingVsTech => "nursing_vs_tech",
			Self::AiVsManagement => "ai_vs_management",
		}
	}

	fn weight(self, cfg: &RankingPenalties) -> f32 {
		match self {
			Self::DataScience => cfg.data_science,
			Self::TechVsManagement => cfg.tech_vs_management,
			Self::NursingVsTech => cfg.nursing_vs_tech,
			Self::AiVsManagement => cfg.ai_vs_management,
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScoreBreakdown {
	pub base: f32,
	pub match_bonus: f32,
	pub keyword: f32,
	pub title_matched: bool,
	pub tech_stack: f32,
	pub location: f32,
	pub work_type: f32,
	pub penalty: Option<Penalty>,
	pub penalty_weight: f32,
	pub final_score: f32,
}

pub fn score(cfg: &Ranking, ctx: &QueryContext, candidate: &Candidate) -> ScoreBreakdown {
	let job = &candidate.job;
	let title = job.title.to_lowercase();
	let description = job.description.to_lowercase();
	let company = job.company_name.to_lowercase();
	let blend = &cfg.blend;
	let base = (2.0 - candidate.avg_distance()).max(0.0);
	let match_bonus =
		(candidate.match_count() as f32 * blend.match_bonus_step).min(blend.match_bonus_cap);
	let (keyword, title_matched) = keyword_score(cfg, ctx, &title, &description, &company);
	let tech_stack = vocabulary::TECH_STACK
		.iter()
		.filter(|tech| title.contains(**tech) && description.contains(**tech))
		.count() as f32
		* cfg.bonuses.tech_stack;
	let location = location_score(cfg, ctx, &job.location.to_lowercase());
	let work_type = if ctx.internship
		&& job.work_type.is_some_and(|kind| {
			kind.as_str().to_lowercase().contains(vocabulary::INTERNSHIP_WORK_TYPE)
		}) {
		cfg.bonuses.work_type
	} else {
		0.0
	};
	let penalty = detect_penalty(ctx, &title);
	let penalty_weight = penalty.map(|penalty| penalty.weight(&cfg.penalties)).unwrap_or(0.0);
	let final_score = (base * blend.base_weight
		+ match_bonus * blend.match_bonus_weight
		+ keyword * blend.keyword_weight
		+ tech_stack * blend.tech_stack_weight
		+ location * blend.location_weight
		+ work_type * blend.work_type_weight
		+ penalty_weight)
		.max(blend.min_score);

	ScoreBreakdown {
		base,
		match_bonus,
		keyword,
		title_matched,
		tech_stack,
		location,
		work_type,
		penalty,
		penalty_weight,
		final_score,
	}
}

/// Score for candidates found only by the widened retrieval pass.
pub fn relaxed_score(cfg: &Ranking, ctx: &QueryContext, job: &JobDocument, distance: f32) -> f32 {
	let relaxed = &cfg.relaxed;
	let title = job.title.to_lowercase();
	let description = job.description.to_lowercase();
	let base = (relaxed.base_ceiling - distance).max(relaxed.base_floor);
	let keyword = ctx
		.keywords
		.iter()
		.map(|token| {
			if contains_term(&title, token) {
				relaxed.title
			} else if contains_term(&description, token) {
				relaxed.description
			} else {
				0.0
			}
		})
		.sum::<f32>();

	base * relaxed.base_weight + keyword * relaxed.keyword_weight
}

/// Domain conflict between the query and the candidate title.
///
/// A data science query is judged only against its own denylist. Otherwise the rules are tried
/// in priority order and the AI denylist applies only when no earlier rule fired.
pub fn detect_penalty(ctx: &QueryContext, title_lower: &str) -> Option<Penalty> {
	if ctx.data_science {
		return contains_any(title_lower, vocabulary::DATA_SCIENCE_DENYLIST)
			.then_some(Penalty::DataScience);
	}

	let rules = [
		(ctx.tech, vocabulary::MANAGEMENT_TITLES, Penalty::TechVsManagement),
		(ctx.nursing, vocabulary::TECH_TITLE_TERMS, Penalty::NursingVsTech),
		(ctx.ai, vocabulary::AI_DENYLIST, Penalty::AiVsManagement),
	];

	rules
		.into_iter()
		.find(|(applies, titles, _)| *applies && contains_any(title_lower, titles))
		.map(|(_, _, penalty)| penalty)
}

fn keyword_score(
	cfg: &Ranking,
	ctx: &QueryContext,
	title: &str,
	description: &str,
	company: &str,
) -> (f32, bool) {
	let weights = &cfg.keywords;
	let mut score = 0.0;
	let mut title_matched = false;

	for token in &ctx.keywords {
		if contains_term(title, token) {
			score += weights.title;
			title_matched = true;
		} else if contains_term(description, token) {
			score += weights.description;
		} else if contains_term(company, token) {
			score += weights.company;
		}
	}

	for variant in ctx.translations.iter().flat_map(|entry| entry.variants) {
		if contains_term(title, variant) {
			score += weights.translated_title;
			title_matched = true;
		} else if contains_term(description, variant) {
			score += weights.translated_description;
		}
	}

	if !title_matched {
		score *= weights.title_gate_factor;
	}

	(score, title_matched)
}

fn location_score(cfg: &Ranking, ctx: &QueryContext, candidate_location: &str) -> f32 {
	let Some(query_location) = ctx.location.as_deref() else {
		return 0.0;
	};

	// An empty candidate location is contained in every query location.
	if candidate_location.contains(query_location) || query_location.contains(candidate_location)
	{
		return cfg.bonuses.location_exact;
	}
	if ctx.location_words.iter().any(|word| candidate_location.contains(word.as_str())) {
		return cfg.bonuses.location_partial;
	}

	0.0
}

#[cfg(test)]
mod tests {
	use jc_domain::{JobSource, WorkType};

	use super::*;

	fn candidate(title: &str, description: &str, location: &str, distances: &[f32]) -> Candidate {
		Candidate {
			job: JobDocument::new("id", title, "Acme", location, description, JobSource::LinkedIn),
			distances: distances.to_vec(),
			matched_queries: vec!["q".to_string(); distances.len()],
		}
	}

	#[test]
	fn title_gate_discounts_description_only_matches() {
		let cfg = Ranking::default();
		let ctx = QueryContext::new("gärtner", None);
		let in_title = score(&cfg, &ctx, &candidate("Gärtner", "Gärtner gesucht", "", &[1.0]));
		let in_description =
			score(&cfg, &ctx, &candidate("Landschaftsbau", "Gärtner gesucht", "", &[1.0]));

		assert!(in_title.title_matched);
		assert!(!in_description.title_matched);
		assert!((in_description.keyword - 0.4 * 0.3).abs() < 1e-6);
		assert!(in_title.final_score > in_description.final_score);
	}

	#[test]
	fn translated_variants_count_as_title_matches() {
		let cfg = Ranking::default();
		let ctx = QueryContext::new("nurse", Some("Berlin"));
		let breakdown = score(&cfg, &ctx, &candidate("Krankenschwester", "", "Berlin", &[0.4]));

		// "krankenschwester" and "schwester" both occur in the title.
		assert!(breakdown.title_matched);
		assert!((breakdown.keyword - 1.4).abs() < 1e-6);
		assert!((breakdown.location - 0.15).abs() < 1e-6);
	}

	#[test]
	fn technical_query_penalizes_management_titles() {
		let cfg = Ranking::default();
		let ctx = QueryContext::new("python developer", None);
		let sales = score(&cfg, &ctx, &candidate("Sales Manager", "Quota.", "", &[0.2]));
		let python =
			score(&cfg, &ctx, &candidate("Senior Python Developer", "Python.", "", &[0.3]));

		assert_eq!(sales.penalty, Some(Penalty::TechVsManagement));
		assert_eq!(sales.final_score, cfg.blend.min_score);
		assert!(python.final_score > sales.final_score);
	}

	#[test]
	fn penalties_use_the_first_matching_rule() {
		let ctx = QueryContext::new("data scientist", None);

		assert_eq!(detect_penalty(&ctx, "senior manager operations"), Some(Penalty::DataScience));
		// Also a management title, but the data science rule wins.
		assert_eq!(detect_penalty(&ctx, "strategy director"), Some(Penalty::DataScience));
		assert_eq!(detect_penalty(&ctx, "data scientist"), None);

		let nurse = QueryContext::new("Nurse", None);

		assert_eq!(detect_penalty(&nurse, "software engineer"), Some(Penalty::NursingVsTech));

		let ai = QueryContext::new("AI", None);

		assert_eq!(detect_penalty(&ai, "facilities manager"), Some(Penalty::TechVsManagement));
		assert_eq!(detect_penalty(&ai, "senior manager"), Some(Penalty::AiVsManagement));

		let trainee = QueryContext::new("trainee retail", None);

		assert_eq!(detect_penalty(&trainee, "sales manager"), None);
	}

	#[test]
	fn query_context_debug_lists_matched_translations() {
		let rendered = format!("{:?}", QueryContext::new("nurse", None));

		assert!(rendered.contains("krankenschwester"));
	}

	#[test]
	fn data_science_queries_only_use_their_own_denylist() {
		let ctx = QueryContext::new("data scientist", None);

		// A management title outside the data science denylist is not penalized at all.
		assert_eq!(detect_penalty(&ctx, "sales manager"), None);
		assert_eq!(detect_penalty(&ctx, "account manager"), None);
		assert_eq!(detect_penalty(&ctx, "strategy consultant"), Some(Penalty::DataScience));

		let science = QueryContext::new("data science lead", None);

		assert_eq!(detect_penalty(&science, "it administrator"), Some(Penalty::DataScience));
	}

	#[test]
	fn location_bonus_uses_containment_in_either_direction() {
		let cfg = Ranking::default();
		let ctx = QueryContext::new("nurse", Some("Berlin Mitte"));

		assert_eq!(location_score(&cfg, &ctx, ""), 0.15);
		assert_eq!(location_score(&cfg, &ctx, "mitte"), 0.15);
		assert_eq!(location_score(&cfg, &ctx, "berlin mitte, germany"), 0.15);
		assert_eq!(location_score(&cfg, &ctx, "berlin, germany"), 0.08);
		assert_eq!(location_score(&cfg, &ctx, "hamburg"), 0.0);
		assert_eq!(location_score(&cfg, &QueryContext::new("nurse", None), "berlin"), 0.0);
	}

	#[test]
	fn internship_intent_rewards_internship_work_type() {
		let cfg = Ranking::default();
		let ctx = QueryContext::new("Praktikum Marketing", None);
		let mut intern = candidate("Marketing Praktikum", "", "", &[1.0]);

		intern.job.work_type = Some(WorkType::Internship);

		let regular = candidate("Marketing Praktikum", "", "", &[1.0]);

		assert_eq!(score(&cfg, &ctx, &intern).work_type, 0.1);
		assert_eq!(score(&cfg, &ctx, &regular).work_type, 0.0);
	}

	#[test]
	fn tech_stack_requires_title_and_description() {
		let cfg = Ranking::default();
		let ctx = QueryContext::new("developer", None);
		let both = score(&cfg, &ctx, &candidate("React Developer", "react and docker", "", &[1.0]));

		assert!((both.tech_stack - 0.15).abs() < 1e-6);
	}

	#[test]
	fn relaxed_score_blends_floor_and_keywords() {
		let cfg = Ranking::default();
		let ctx = QueryContext::new("nurse", None);
		let job = JobDocument::new("r", "Night Nurse", "", "", "", JobSource::Indeed);

		assert!((relaxed_score(&cfg, &ctx, &job, 2.2) - (0.8 * 0.7 + 0.2 * 0.3)).abs() < 1e-6);
		assert!((relaxed_score(&cfg, &ctx, &job, 2.95) - (0.1 * 0.7 + 0.2 * 0.3)).abs() < 1e-6);
	}
}
