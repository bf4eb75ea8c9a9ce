use jc_domain::JobDocument;
use jc_storage::qdrant::QdrantStore;

pub use jc_storage::qdrant::{ScoredJob, ScrollPage};

use crate::{BoxFuture, Result};

/// The vector store as seen by the service.
///
/// Distances are squared Euclidean distances between normalized vectors: `0` is identical, `2`
/// is orthogonal and `4` is opposite.
pub trait JobStore
where
	Self: Send + Sync,
{
	fn collection(&self) -> &str;

	fn count(&self) -> BoxFuture<'_, Result<u64>>;

	fn nearest(&self, vector: Vec<f32>, k: u32) -> BoxFuture<'_, Result<Vec<ScoredJob>>>;

	fn get<'a>(&'a self, ids: &'a [String]) -> BoxFuture<'a, Result<Vec<JobDocument>>>;

	/// Pages through all jobs in store order. Pass the previous page's `next_offset` to continue.
	fn scroll<'a>(
		&'a self,
		limit: u32,
		offset: Option<&'a str>,
	) -> BoxFuture<'a, Result<ScrollPage>>;

	fn insert<'a>(
		&'a self,
		job: &'a JobDocument,
		vector: Vec<f32>,
		embedding_model: &'a str,
	) -> BoxFuture<'a, Result<()>>;

	fn delete<'a>(&'a self, ids: &'a [String]) -> BoxFuture<'a, Result<()>>;
}

impl JobStore for QdrantStore {
	fn collection(&self) -> &str {
		&self.collection
	}

	fn count(&self) -> BoxFuture<'_, Result<u64>> {
		Box::pin(async move { Ok(QdrantStore::count(self).await?) })
	}

	fn nearest(&self, vector: Vec<f32>, k: u32) -> BoxFuture<'_, Result<Vec<ScoredJob>>> {
		Box::pin(async move { Ok(QdrantStore::nearest(self, vector, k).await?) })
	}

	fn get<'a>(&'a self, ids: &'a [String]) -> BoxFuture<'a, Result<Vec<JobDocument>>> {
		Box::pin(async move { Ok(QdrantStore::get(self, ids).await?) })
	}

	fn scroll<'a>(
		&'a self,
		limit: u32,
		offset: Option<&'a str>,
	) -> BoxFuture<'a, Result<ScrollPage>> {
		Box::pin(async move { Ok(QdrantStore::scroll(self, limit, offset).await?) })
	}

	fn insert<'a>(
		&'a self,
		job: &'a JobDocument,
		vector: Vec<f32>,
		embedding_model: &'a str,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move { Ok(QdrantStore::upsert(self, job, vector, embedding_model).await?) })
	}

	fn delete<'a>(&'a self, ids: &'a [String]) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move { Ok(QdrantStore::delete(self, ids).await?) })
	}
}
