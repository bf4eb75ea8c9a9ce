use std::sync::Arc;

use jc_service::JobService;
use jc_storage::qdrant::QdrantStore;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<JobService>,
}
impl AppState {
	/// Connects to Qdrant and creates the job collection when it is missing.
	pub async fn new(config: jc_config::Config) -> color_eyre::Result<Self> {
		let qdrant = QdrantStore::new(&config.storage.qdrant)?;

		qdrant.ensure_collection().await?;

		Ok(Self::from_service(JobService::new(config, Arc::new(qdrant))))
	}

	pub fn from_service(service: JobService) -> Self {
		Self { service: Arc::new(service) }
	}
}
