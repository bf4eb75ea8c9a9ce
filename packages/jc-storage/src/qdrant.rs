use std::collections::HashMap;

use qdrant_client::{
	Qdrant,
	qdrant::{
		CountPointsBuilder, CreateCollectionBuilder, DeletePointsBuilder, Distance,
		GetPointsBuilder, PointId, PointStruct, PointsIdsList, Query, QueryPointsBuilder,
		ScrollPointsBuilder, UpsertPointsBuilder, Value, VectorParamsBuilder,
		point_id::PointIdOptions,
	},
};
use uuid::Uuid;

use jc_domain::JobDocument;

use crate::{Error, Result, payload};

/// A stored job together with its squared Euclidean distance on unit vectors (range `0..=4`).
#[derive(Clone, Debug)]
pub struct ScoredJob {
	pub job: JobDocument,
	pub distance: f32,
}

/// One page of stored jobs in store order. `next_offset` is `None` on the last page.
#[derive(Clone, Debug, Default)]
pub struct ScrollPage {
	pub jobs: Vec<JobDocument>,
	pub next_offset: Option<String>,
}

pub struct QdrantStore {
	pub client: Qdrant,
	pub collection: String,
	pub vector_dim: u32,
}
impl QdrantStore {
	pub fn new(cfg: &jc_config::Qdrant) -> Result<Self> {
		let client = Qdrant::from_url(&cfg.url).build()?;

		Ok(Self { client, collection: cfg.collection.clone(), vector_dim: cfg.vector_dim })
	}

	/// Creates the cosine collection when it does not exist yet. Returns whether it was created.
	pub async fn ensure_collection(&self) -> Result<bool> {
		if self.client.collection_exists(self.collection.clone()).await? {
			return Ok(false);
		}

		self.client
			.create_collection(
				CreateCollectionBuilder::new(self.collection.clone()).vectors_config(
					VectorParamsBuilder::new(self.vector_dim.into(), Distance::Cosine),
				),
			)
			.await?;

		tracing::info!(
			collection = %self.collection,
			dim = self.vector_dim,
			"Created job collection."
		);

		Ok(true)
	}

	pub async fn count(&self) -> Result<u64> {
		let res =
			self.client.count(CountPointsBuilder::new(self.collection.clone()).exact(true)).await?;

		Ok(res.result.map(|result| result.count).unwrap_or(0))
	}

	pub async fn nearest(&self, vector: Vec<f32>, k: u32) -> Result<Vec<ScoredJob>> {
		self.check_dim(&vector)?;

		let res = self
			.client
			.query(
				QueryPointsBuilder::new(self.collection.clone())
					.query(Query::new_nearest(vector))
					.limit(u64::from(k))
					.with_payload(true),
			)
			.await?;

		Ok(res
			.result
			.into_iter()
			.filter_map(|point| {
				decode_point(point.id.as_ref(), &point.payload)
					.map(|job| ScoredJob { job, distance: similarity_to_distance(point.score) })
			})
			.collect())
	}

	/// Jobs with the given ids, in store order. Unknown ids are ignored.
	pub async fn get(&self, ids: &[String]) -> Result<Vec<JobDocument>> {
		if ids.is_empty() {
			return Ok(Vec::new());
		}

		let res = self
			.client
			.get_points(
				GetPointsBuilder::new(self.collection.clone(), point_ids(ids)).with_payload(true),
			)
			.await?;

		Ok(res
			.result
			.into_iter()
			.filter_map(|point| decode_point(point.id.as_ref(), &point.payload))
			.collect())
	}

	pub async fn scroll(&self, limit: u32, offset: Option<&str>) -> Result<ScrollPage> {
		let mut builder =
			ScrollPointsBuilder::new(self.collection.clone()).limit(limit).with_payload(true);

		if let Some(offset) = offset {
			builder = builder.offset(PointId::from(offset.to_string()));
		}

		let res = self.client.scroll(builder).await?;
		let jobs = res
			.result
			.into_iter()
			.filter_map(|point| decode_point(point.id.as_ref(), &point.payload))
			.collect();
		let next_offset = res.next_page_offset.as_ref().and_then(point_id_text);

		Ok(ScrollPage { jobs, next_offset })
	}

	pub async fn upsert(
		&self,
		job: &JobDocument,
		vector: Vec<f32>,
		embedding_model: &str,
	) -> Result<()> {
		self.check_dim(&vector)?;

		let payload = payload::encode(job, embedding_model)?;
		let point = PointStruct::new(point_id(&job.id).to_string(), vector, payload);

		self.client
			.upsert_points(UpsertPointsBuilder::new(self.collection.clone(), vec![point]).wait(true))
			.await?;

		Ok(())
	}

	pub async fn delete(&self, ids: &[String]) -> Result<()> {
		if ids.is_empty() {
			return Ok(());
		}

		self.client
			.delete_points(
				DeletePointsBuilder::new(self.collection.clone())
					.points(PointsIdsList { ids: point_ids(ids) })
					.wait(true),
			)
			.await?;

		Ok(())
	}

	fn check_dim(&self, vector: &[f32]) -> Result<()> {
		if vector.len() != self.vector_dim as usize {
			return Err(Error::InvalidArgument(format!(
				"Vector dimension mismatch: expected {}, got {}.",
				self.vector_dim,
				vector.len()
			)));
		}

		Ok(())
	}
}

/// Maps a cosine similarity to the squared L2 distance between the normalized vectors,
/// `2 * (1 - similarity)`. The search ceilings are calibrated on this scale.
pub fn similarity_to_distance(similarity: f32) -> f32 {
	2.0 * (1.0 - similarity)
}

/// Deterministic point id for a job id.
pub fn point_id(job_id: &str) -> Uuid {
	Uuid::new_v5(&Uuid::NAMESPACE_OID, job_id.as_bytes())
}

fn point_ids(job_ids: &[String]) -> Vec<PointId> {
	job_ids.iter().map(|id| PointId::from(point_id(id).to_string())).collect()
}

fn point_id_text(id: &PointId) -> Option<String> {
	match id.point_id_options.as_ref()? {
		PointIdOptions::Uuid(uuid) => Some(uuid.clone()),
		PointIdOptions::Num(num) => Some(num.to_string()),
	}
}

fn decode_point(id: Option<&PointId>, payload: &HashMap<String, Value>) -> Option<JobDocument> {
	match payload::decode(payload) {
		Ok(job) => Some(job),
		Err(err) => {
			let point = id.and_then(point_id_text).unwrap_or_default();

			tracing::warn!(point = %point, error = %err, "Skipping undecodable job point.");

			None
		},
	}
}
