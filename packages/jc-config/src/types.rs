use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub ranking: Ranking,
	#[serde(default)]
	pub crawl: Crawl,
	#[serde(default)]
	pub cleanup: Cleanup,
	pub security: Security,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub qdrant: Qdrant,
}

#[derive(Debug, Deserialize)]
pub struct Qdrant {
	pub url: String,
	pub collection: String,
	pub vector_dim: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub apify: ApifyProviderConfig,
	pub zyte: ZyteProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	pub default_headers: Map<String, Value>,
}

/// LinkedIn scraping through an Apify actor. A blank `api_token` disables the source.
#[derive(Debug, Deserialize)]
pub struct ApifyProviderConfig {
	pub api_base: String,
	pub api_token: String,
	pub actor_id: String,
	pub timeout_ms: u64,
	#[serde(default = "default_location")]
	pub default_location: String,
	/// Actor filter for posting age, e.g. "r604800" for the last seven days.
	#[serde(default = "default_date_posted")]
	pub date_posted: String,
}

/// Indeed scraping through the Zyte extraction API. A blank `api_key` disables the source.
#[derive(Debug, Deserialize)]
pub struct ZyteProviderConfig {
	pub api_base: String,
	pub api_key: String,
	pub search_url: String,
	pub timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Search {
	pub default_limit: u32,
	pub max_limit: u32,
	pub max_queries: u32,
	pub location_variant_sources: u32,
	pub candidate_multiplier: u32,
	pub max_candidates: u32,
	pub max_distance: f32,
	pub relaxed_queries: u32,
	pub relaxed_multiplier: u32,
	pub relaxed_max_candidates: u32,
	pub relaxed_max_distance: f32,
	pub fill_page_size: u32,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			default_limit: 25,
			max_limit: 100,
			max_queries: 15,
			location_variant_sources: 8,
			candidate_multiplier: 2,
			max_candidates: 80,
			max_distance: 1.8,
			relaxed_queries: 5,
			relaxed_multiplier: 4,
			relaxed_max_candidates: 150,
			relaxed_max_distance: 2.5,
			fill_page_size: 64,
		}
	}
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Ranking {
	pub blend: RankingBlend,
	pub keywords: RankingKeywords,
	pub bonuses: RankingBonuses,
	pub penalties: RankingPenalties,
	pub relaxed: RankingRelaxed,
}

/// Linear weights of the final score.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RankingBlend {
	pub base_weight: f32,
	pub match_bonus_weight: f32,
	pub keyword_weight: f32,
	pub tech_stack_weight: f32,
	pub location_weight: f32,
	pub work_type_weight: f32,
	pub match_bonus_step: f32,
	pub match_bonus_cap: f32,
	pub min_score: f32,
}
impl Default for RankingBlend {
	fn default() -> Self {
		Self {
			base_weight: 0.15,
			match_bonus_weight: 0.10,
			keyword_weight: 0.60,
			tech_stack_weight: 0.08,
			location_weight: 0.04,
			work_type_weight: 0.03,
			match_bonus_step: 0.15,
			match_bonus_cap: 0.4,
			min_score: 0.01,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RankingKeywords {
	pub title: f32,
	pub description: f32,
	pub company: f32,
	pub translated_title: f32,
	pub translated_description: f32,
	pub title_gate_factor: f32,
}
impl Default for RankingKeywords {
	fn default() -> Self {
		Self {
			title: 0.8,
			description: 0.4,
			company: 0.1,
			translated_title: 0.7,
			translated_description: 0.35,
			title_gate_factor: 0.3,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RankingBonuses {
	pub tech_stack: f32,
	pub location_exact: f32,
	pub location_partial: f32,
	pub work_type: f32,
}
impl Default for RankingBonuses {
	fn default() -> Self {
		Self { tech_stack: 0.15, location_exact: 0.15, location_partial: 0.08, work_type: 0.1 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RankingPenalties {
	pub data_science: f32,
	pub tech_vs_management: f32,
	pub nursing_vs_tech: f32,
	pub ai_vs_management: f32,
}
impl Default for RankingPenalties {
	fn default() -> Self {
		Self {
			data_science: -2.5,
			tech_vs_management: -2.0,
			nursing_vs_tech: -2.0,
			ai_vs_management: -1.8,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RankingRelaxed {
	pub base_floor: f32,
	pub base_ceiling: f32,
	pub base_weight: f32,
	pub keyword_weight: f32,
	pub title: f32,
	pub description: f32,
	pub filler_score: f32,
}
impl Default for RankingRelaxed {
	fn default() -> Self {
		Self {
			base_floor: 0.1,
			base_ceiling: 3.0,
			base_weight: 0.7,
			keyword_weight: 0.3,
			title: 0.2,
			description: 0.1,
			filler_score: 0.1,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Crawl {
	pub linkedin_queries: Vec<String>,
	pub indeed_queries: Vec<String>,
	pub jobs_per_query: u32,
	pub query_delay_ms: u64,
	pub daily_at: String,
	/// Fixed offset of the scheduling wall clock, in minutes east of UTC.
	pub utc_offset_minutes: i32,
}
impl Default for Crawl {
	fn default() -> Self {
		Self {
			linkedin_queries: [
				"engineer",
				"manager",
				"IT",
				"Finance",
				"Sales",
				"Nurse",
				"Consultant",
				"software developer",
			]
			.into_iter()
			.map(String::from)
			.collect(),
			indeed_queries: ["Web", "cloud", "AI", "Data", "software"]
				.into_iter()
				.map(String::from)
				.collect(),
			jobs_per_query: 25,
			query_delay_ms: 2_000,
			daily_at: "20:00".to_string(),
			utc_offset_minutes: 60,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Cleanup {
	pub max_age_days: i64,
	pub probe_urls: bool,
	pub probe_timeout_ms: u64,
	pub daily_at: String,
	pub batch_size: u32,
}
impl Default for Cleanup {
	fn default() -> Self {
		Self {
			max_age_days: 14,
			probe_urls: true,
			probe_timeout_ms: 15_000,
			daily_at: "21:00".to_string(),
			batch_size: 256,
		}
	}
}

#[derive(Debug, Deserialize)]
pub struct Security {
	pub bind_localhost_only: bool,
	pub admin_auth_token: Option<String>,
}

fn default_location() -> String {
	"Germany".to_string()
}

fn default_date_posted() -> String {
	"r604800".to_string()
}
