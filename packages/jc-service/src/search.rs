pub mod aggregate;
pub mod expand;
pub mod scoring;

use std::{
	cmp::Ordering,
	collections::{HashMap, HashSet},
};

use serde::{Deserialize, Serialize};

use jc_domain::JobDocument;

use crate::{
	Error, JobService, Result,
	search::{
		aggregate::Aggregator,
		scoring::{QueryContext, ScoreBreakdown},
	},
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchRequest {
	pub job_title: String,
	pub location: Option<String>,
	pub limit: Option<u32>,
}

/// Pipeline stage that admitted a result. Only `Scored` results are ranked recommendations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStage {
	Scored,
	Relaxed,
	Filler,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RankedJob {
	#[serde(flatten)]
	pub job: JobDocument,
	pub score: f32,
	pub match_count: u32,
	pub stage: MatchStage,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchResponse {
	pub query: String,
	pub location: Option<String>,
	pub query_plan: Vec<String>,
	pub jobs: Vec<RankedJob>,
}

struct PlannedQuery {
	text: String,
	vector: Option<Vec<f32>>,
}

impl JobService {
	/// Ranked jobs for a title query.
	///
	/// Returns exactly `limit` jobs unless the store holds fewer. Only an unreachable store or an
	/// invalid request fails; per-variant embedding or retrieval failures are logged and skipped.
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		let search_cfg = &self.cfg.search;
		let job_title = req.job_title.trim();

		if job_title.is_empty() {
			return Err(Error::InvalidRequest {
				message: "job_title must not be empty.".to_string(),
			});
		}

		let limit = req.limit.unwrap_or(search_cfg.default_limit);

		if limit == 0 || limit > search_cfg.max_limit {
			return Err(Error::InvalidRequest {
				message: format!("limit must be between 1 and {}.", search_cfg.max_limit),
			});
		}

		let location =
			req.location.as_deref().map(str::trim).filter(|location| !location.is_empty());
		let stored = self
			.store
			.count()
			.await
			.map_err(|err| Error::StoreUnavailable { message: err.to_string() })?;
		let query_plan = expand::expand(search_cfg, job_title, location);

		tracing::info!(
			query = job_title,
			location = location.unwrap_or_default(),
			variants = query_plan.len(),
			stored,
			"Search planned."
		);

		if stored == 0 {
			return Ok(SearchResponse {
				query: job_title.to_string(),
				location: location.map(str::to_string),
				query_plan,
				jobs: Vec::new(),
			});
		}

		let limit = limit as usize;
		let ctx = QueryContext::new(job_title, location);
		let mut planned = query_plan
			.iter()
			.map(|text| PlannedQuery { text: text.clone(), vector: None })
			.collect::<Vec<_>>();
		let aggregator = self.retrieve_primary(&mut planned, limit).await;
		let mut ranked = aggregator
			.into_candidates()
			.into_iter()
			.map(|candidate| {
				let breakdown = scoring::score(&self.cfg.ranking, &ctx, &candidate);

				log_penalty(&candidate.job, &breakdown);

				RankedJob {
					score: breakdown.final_score,
					match_count: candidate.match_count() as u32,
					stage: MatchStage::Scored,
					job: candidate.job,
				}
			})
			.collect::<Vec<_>>();

		if ranked.len() < limit {
			tracing::info!(found = ranked.len(), limit, "Widening retrieval for a short result.");

			let relaxed = self.retrieve_relaxed(&mut planned, &ranked, &ctx, limit).await;

			ranked.extend(relaxed);
		}
		if ranked.len() < limit {
			tracing::info!(found = ranked.len(), limit, "Filling the result from stored jobs.");

			self.fill_from_store(&mut ranked, limit).await;
		}

		sort_ranked(&mut ranked);
		ranked.truncate(limit);

		tracing::info!(query = job_title, returned = ranked.len(), "Search finished.");

		Ok(SearchResponse {
			query: job_title.to_string(),
			location: location.map(str::to_string),
			query_plan,
			jobs: ranked,
		})
	}

	async fn retrieve_primary(&self, planned: &mut [PlannedQuery], limit: usize) -> Aggregator {
		let search_cfg = &self.cfg.search;
		let k = (limit as u32)
			.saturating_mul(search_cfg.candidate_multiplier)
			.min(search_cfg.max_candidates);
		let mut aggregator = Aggregator::default();

		for query in planned.iter_mut() {
			let Some(vector) = self.query_vector(query).await else {
				continue;
			};

			match self.store.nearest(vector, k).await {
				Ok(hits) =>
					for hit in hits {
						if hit.distance <= search_cfg.max_distance {
							aggregator.add(hit.job, hit.distance, &query.text);
						}
					},
				Err(err) => {
					tracing::warn!(
						variant = %query.text,
						error = %err,
						"Retrieval failed; skipping variant."
					);
				},
			}
		}

		aggregator
	}

	/// Wider pass over the leading variants; only ids absent from `ranked` are admitted.
	async fn retrieve_relaxed(
		&self,
		planned: &mut [PlannedQuery],
		ranked: &[RankedJob],
		ctx: &QueryContext,
		limit: usize,
	) -> Vec<RankedJob> {
		let search_cfg = &self.cfg.search;
		let k = (limit as u32)
			.saturating_mul(search_cfg.relaxed_multiplier)
			.min(search_cfg.relaxed_max_candidates);
		let known = ranked.iter().map(|item| item.job.id.as_str()).collect::<HashSet<_>>();
		let mut found: Vec<(JobDocument, f32)> = Vec::new();
		let mut index = HashMap::new();

		for query in planned.iter_mut().take(search_cfg.relaxed_queries as usize) {
			let Some(vector) = self.query_vector(query).await else {
				continue;
			};
			let hits = match self.store.nearest(vector, k).await {
				Ok(hits) => hits,
				Err(err) => {
					tracing::warn!(
						variant = %query.text,
						error = %err,
						"Relaxed retrieval failed; skipping variant."
					);

					continue;
				},
			};

			for hit in hits {
				if hit.distance > search_cfg.relaxed_max_distance
					|| known.contains(hit.job.id.as_str())
				{
					continue;
				}

				// A later hit overwrites the distance but keeps the first-seen position.
				if let Some(&idx) = index.get(&hit.job.id) {
					found[idx] = (hit.job, hit.distance);

					continue;
				}

				index.insert(hit.job.id.clone(), found.len());
				found.push((hit.job, hit.distance));
			}
		}

		found
			.into_iter()
			.map(|(job, distance)| RankedJob {
				score: scoring::relaxed_score(&self.cfg.ranking, ctx, &job, distance),
				match_count: 1,
				stage: MatchStage::Relaxed,
				job,
			})
			.collect()
	}

	/// Appends unranked stored jobs until `limit` is reached or the store runs out.
	async fn fill_from_store(&self, ranked: &mut Vec<RankedJob>, limit: usize) {
		let page_size = self.cfg.search.fill_page_size;
		let filler_score = self.cfg.ranking.relaxed.filler_score;
		let mut seen = ranked.iter().map(|item| item.job.id.clone()).collect::<HashSet<_>>();
		let mut offset: Option<String> = None;

		while ranked.len() < limit {
			let page = match self.store.scroll(page_size, offset.as_deref()).await {
				Ok(page) => page,
				Err(err) => {
					tracing::warn!(error = %err, "Store scroll failed; returning a short result.");

					return;
				},
			};

			for job in page.jobs {
				if ranked.len() >= limit {
					break;
				}
				if seen.insert(job.id.clone()) {
					ranked.push(RankedJob {
						job,
						score: filler_score,
						match_count: 0,
						stage: MatchStage::Filler,
					});
				}
			}

			match page.next_offset {
				Some(next) => offset = Some(next),
				None => return,
			}
		}
	}

	/// Embeds a variant once per search. Failures are logged and leave the variant without a
	/// vector, so later stages retry it.
	async fn query_vector(&self, query: &mut PlannedQuery) -> Option<Vec<f32>> {
		if let Some(vector) = &query.vector {
			return Some(vector.clone());
		}

		match self.embed_text(&query.text).await {
			Ok(vector) => {
				query.vector = Some(vector.clone());

				Some(vector)
			},
			Err(err) => {
				tracing::warn!(
					variant = %query.text,
					error = %err,
					"Embedding failed; skipping variant."
				);

				None
			},
		}
	}

	/// Embeds one text and checks the vector against the collection dimension.
	pub(crate) async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
		let embeddings = self
			.providers
			.embedding
			.embed(&self.cfg.providers.embedding, std::slice::from_ref(&text.to_string()))
			.await?;
		let vector = embeddings.into_iter().next().ok_or_else(|| Error::Provider {
			message: "Embedding provider returned no vectors.".to_string(),
		})?;

		if vector.len() != self.cfg.storage.qdrant.vector_dim as usize {
			return Err(Error::Provider {
				message: "Embedding vector dimension mismatch.".to_string(),
			});
		}

		Ok(vector)
	}
}

/// Descending by score; equal scores keep their insertion order.
fn sort_ranked(ranked: &mut [RankedJob]) {
	ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
}

fn log_penalty(job: &JobDocument, breakdown: &ScoreBreakdown) {
	if let Some(penalty) = breakdown.penalty {
		tracing::debug!(
			job_id = %job.id,
			title = %job.title,
			penalty = penalty.as_str(),
			weight = breakdown.penalty_weight,
			"Relevance penalty applied."
		);
	}
}
