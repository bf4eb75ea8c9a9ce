pub mod schedule;
pub mod worker;

use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use jc_service::JobService;
use jc_storage::qdrant::QdrantStore;

use crate::{schedule::Schedule, worker::Job};

#[derive(Debug, Parser)]
#[command(
	version = jc_cli::VERSION,
	rename_all = "kebab",
	styles = jc_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// Run one job immediately and exit instead of following the daily schedule.
	#[arg(long, value_enum, value_name = "JOB")]
	pub run_once: Option<Job>,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = jc_config::load(&args.config)?;
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();

	let schedule = Schedule::from_config(&config)?;
	let qdrant = QdrantStore::new(&config.storage.qdrant)?;

	qdrant.ensure_collection().await?;

	let service = JobService::new(config, Arc::new(qdrant));

	match args.run_once {
		Some(job) => worker::run_job(&service, job).await,
		None => worker::run_worker(&service, &schedule).await,
	}
}
