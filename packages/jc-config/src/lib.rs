mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	ApifyProviderConfig, Cleanup, Config, Crawl, EmbeddingProviderConfig, Providers, Qdrant,
	Ranking, RankingBlend, RankingBonuses, RankingKeywords, RankingPenalties, RankingRelaxed,
	Search, Security, Service, Storage, ZyteProviderConfig,
};

use std::{fs, path::Path};

const MAX_QUERY_PLAN: u32 = 64;
const MAX_UTC_OFFSET_MINUTES: i32 = 18 * 60;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	for (label, value) in [
		("service.http_bind", &cfg.service.http_bind),
		("service.admin_bind", &cfg.service.admin_bind),
		("storage.qdrant.url", &cfg.storage.qdrant.url),
		("storage.qdrant.collection", &cfg.storage.qdrant.collection),
		("providers.embedding.api_key", &cfg.providers.embedding.api_key),
		("providers.embedding.model", &cfg.providers.embedding.model),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions != cfg.storage.qdrant.vector_dim {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must match storage.qdrant.vector_dim."
				.to_string(),
		});
	}
	if !cfg.providers.apify.api_token.trim().is_empty()
		&& cfg.providers.apify.actor_id.trim().is_empty()
	{
		return Err(Error::Validation {
			message: "providers.apify.actor_id must be non-empty when api_token is set."
				.to_string(),
		});
	}

	validate_search(&cfg.search)?;
	validate_ranking(&cfg.ranking)?;

	parse_daily_at("crawl.daily_at", &cfg.crawl.daily_at)?;
	parse_daily_at("cleanup.daily_at", &cfg.cleanup.daily_at)?;

	if cfg.crawl.utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
		return Err(Error::Validation {
			message: "crawl.utc_offset_minutes must be within 18 hours of UTC.".to_string(),
		});
	}
	if cfg.crawl.jobs_per_query == 0 {
		return Err(Error::Validation {
			message: "crawl.jobs_per_query must be greater than zero.".to_string(),
		});
	}
	if cfg.cleanup.max_age_days <= 0 {
		return Err(Error::Validation {
			message: "cleanup.max_age_days must be greater than zero.".to_string(),
		});
	}
	if cfg.cleanup.batch_size == 0 {
		return Err(Error::Validation {
			message: "cleanup.batch_size must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

/// Parses an `HH:MM` wall-clock time into `(hour, minute)`.
pub fn parse_daily_at(key: &'static str, value: &str) -> Result<(u8, u8)> {
	let invalid = || Error::DailyTime { key, value: value.to_string() };
	let (hour, minute) = value.trim().split_once(':').ok_or_else(invalid)?;

	if hour.len() != 2 || minute.len() != 2 {
		return Err(invalid());
	}

	let hour: u8 = hour.parse().map_err(|_| invalid())?;
	let minute: u8 = minute.parse().map_err(|_| invalid())?;

	if hour > 23 || minute > 59 {
		return Err(invalid());
	}

	Ok((hour, minute))
}

fn validate_search(search: &Search) -> Result<()> {
	for (label, value) in [
		("search.default_limit", search.default_limit),
		("search.max_limit", search.max_limit),
		("search.max_queries", search.max_queries),
		("search.candidate_multiplier", search.candidate_multiplier),
		("search.max_candidates", search.max_candidates),
		("search.relaxed_multiplier", search.relaxed_multiplier),
		("search.relaxed_max_candidates", search.relaxed_max_candidates),
		("search.fill_page_size", search.fill_page_size),
	] {
		if value == 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	if search.default_limit > search.max_limit {
		return Err(Error::Validation {
			message: "search.default_limit must not exceed search.max_limit.".to_string(),
		});
	}
	if search.max_queries > MAX_QUERY_PLAN {
		return Err(Error::Validation {
			message: format!("search.max_queries must be {MAX_QUERY_PLAN} or less."),
		});
	}

	for (label, value) in [
		("search.max_distance", search.max_distance),
		("search.relaxed_max_distance", search.relaxed_max_distance),
	] {
		if !value.is_finite() || value <= 0.0 {
			return Err(Error::Validation {
				message: format!("{label} must be a positive finite number."),
			});
		}
	}

	if search.relaxed_max_distance < search.max_distance {
		return Err(Error::Validation {
			message: "search.relaxed_max_distance must be at least search.max_distance."
				.to_string(),
		});
	}

	Ok(())
}

fn validate_ranking(ranking: &Ranking) -> Result<()> {
	let blend = &ranking.blend;
	let keywords = &ranking.keywords;
	let bonuses = &ranking.bonuses;
	let relaxed = &ranking.relaxed;
	let non_negative = [
		("ranking.blend.base_weight", blend.base_weight),
		("ranking.blend.match_bonus_weight", blend.match_bonus_weight),
		("ranking.blend.keyword_weight", blend.keyword_weight),
		("ranking.blend.tech_stack_weight", blend.tech_stack_weight),
		("ranking.blend.location_weight", blend.location_weight),
		("ranking.blend.work_type_weight", blend.work_type_weight),
		("ranking.blend.match_bonus_step", blend.match_bonus_step),
		("ranking.blend.match_bonus_cap", blend.match_bonus_cap),
		("ranking.blend.min_score", blend.min_score),
		("ranking.keywords.title", keywords.title),
		("ranking.keywords.description", keywords.description),
		("ranking.keywords.company", keywords.company),
		("ranking.keywords.translated_title", keywords.translated_title),
		("ranking.keywords.translated_description", keywords.translated_description),
		("ranking.keywords.title_gate_factor", keywords.title_gate_factor),
		("ranking.bonuses.tech_stack", bonuses.tech_stack),
		("ranking.bonuses.location_exact", bonuses.location_exact),
		("ranking.bonuses.location_partial", bonuses.location_partial),
		("ranking.bonuses.work_type", bonuses.work_type),
		("ranking.relaxed.base_floor", relaxed.base_floor),
		("ranking.relaxed.base_ceiling", relaxed.base_ceiling),
		("ranking.relaxed.base_weight", relaxed.base_weight),
		("ranking.relaxed.keyword_weight", relaxed.keyword_weight),
		("ranking.relaxed.title", relaxed.title),
		("ranking.relaxed.description", relaxed.description),
		("ranking.relaxed.filler_score", relaxed.filler_score),
	];

	for (label, value) in non_negative {
		if !value.is_finite() {
			return Err(Error::Validation { message: format!("{label} must be a finite number.") });
		}
		if value < 0.0 {
			return Err(Error::Validation { message: format!("{label} must be zero or greater.") });
		}
	}

	let penalties = &ranking.penalties;

	for (label, value) in [
		("ranking.penalties.data_science", penalties.data_science),
		("ranking.penalties.tech_vs_management", penalties.tech_vs_management),
		("ranking.penalties.nursing_vs_tech", penalties.nursing_vs_tech),
		("ranking.penalties.ai_vs_management", penalties.ai_vs_management),
	] {
		if !value.is_finite() {
			return Err(Error::Validation { message: format!("{label} must be a finite number.") });
		}
		if value > 0.0 {
			return Err(Error::Validation { message: format!("{label} must be zero or less.") });
		}
	}

	if keywords.title_gate_factor > 1.0 {
		return Err(Error::Validation {
			message: "ranking.keywords.title_gate_factor must be 1.0 or less.".to_string(),
		});
	}
	if blend.min_score <= 0.0 {
		return Err(Error::Validation {
			message: "ranking.blend.min_score must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.security.admin_auth_token.as_deref().map(|token| token.trim().is_empty()).unwrap_or(false)
	{
		cfg.security.admin_auth_token = None;
	}

	cfg.crawl.linkedin_queries.retain(|query| !query.trim().is_empty());
	cfg.crawl.indeed_queries.retain(|query| !query.trim().is_empty());
}
