//! Disposable Qdrant collections for integration tests.

mod error;

pub use error::{Error, Result};

use std::{env, future::Future, thread, time::Duration};

use qdrant_client::Qdrant;
use tokio::{runtime::Builder, time};
use uuid::Uuid;

const QDRANT_URL_ENV: &str = "JC_QDRANT_URL";
const MAX_DELETE_ATTEMPTS: u32 = 6;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A uniquely named collection that is deleted on [`TestCollection::cleanup`] or drop.
pub struct TestCollection {
	url: String,
	name: String,
	cleaned: bool,
}
impl TestCollection {
	pub fn new(url: &str, prefix: &str) -> Self {
		let name = format!("{prefix}_{}", Uuid::new_v4().simple());

		Self { url: url.to_string(), name, cleaned: false }
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn url(&self) -> &str {
		&self.url
	}

	pub async fn cleanup(mut self) -> Result<()> {
		self.cleanup_inner().await
	}

	async fn cleanup_inner(&mut self) -> Result<()> {
		if self.cleaned {
			return Ok(());
		}

		delete_collection(&self.url, &self.name).await?;

		self.cleaned = true;

		Ok(())
	}
}
impl Drop for TestCollection {
	fn drop(&mut self) {
		if self.cleaned {
			return;
		}

		let url = self.url.clone();
		let name = self.name.clone();
		// Drop may run inside a runtime, so cleanup gets its own thread and runtime.
		let cleanup_thread = thread::spawn(move || {
			let runtime = match Builder::new_current_thread().enable_all().build() {
				Ok(runtime) => runtime,
				Err(err) => {
					eprintln!("Test collection cleanup failed: {err}.");

					return;
				},
			};

			if let Err(err) = runtime.block_on(delete_collection(&url, &name)) {
				eprintln!("Test collection cleanup failed: {err}.");
			}
		});
		let _ = cleanup_thread.join();
	}
}

pub fn env_qdrant_url() -> Option<String> {
	env::var(QDRANT_URL_ENV).ok().filter(|url| !url.trim().is_empty())
}

/// Runs `f` against a fresh collection name and removes the collection afterwards.
pub async fn with_test_collection<F, Fut, T>(url: &str, prefix: &str, f: F) -> Result<T>
where
	F: FnOnce(&TestCollection) -> Fut,
	Fut: Future<Output = Result<T>>,
{
	let mut collection = TestCollection::new(url, prefix);
	let result = f(&collection).await;

	if let Err(err) = collection.cleanup_inner().await {
		eprintln!("Test collection cleanup warning: {err}.");

		if result.is_ok() {
			return Err(err);
		}
	}

	result
}

async fn delete_collection(url: &str, name: &str) -> Result<()> {
	let client = Qdrant::from_url(url)
		.build()
		.map_err(|err| Error::Message(format!("Failed to build Qdrant client: {err}.")))?;
	let mut backoff = Duration::from_millis(100);

	for attempt in 1..=MAX_DELETE_ATTEMPTS {
		let exists = time::timeout(REQUEST_TIMEOUT, client.collection_exists(name.to_string()))
			.await
			.map_err(|_| Error::Message("Qdrant collection_exists timed out.".to_string()))??;

		if !exists {
			return Ok(());
		}

		match time::timeout(REQUEST_TIMEOUT, client.delete_collection(name.to_string())).await {
			Ok(Ok(_)) => return Ok(()),
			Ok(Err(err)) =>
				if attempt == MAX_DELETE_ATTEMPTS {
					return Err(Error::Message(format!(
						"Failed to delete Qdrant collection {name:?} after {attempt} attempts: {err}."
					)));
				},
			Err(_) =>
				if attempt == MAX_DELETE_ATTEMPTS {
					return Err(Error::Message(format!(
						"Timed out deleting Qdrant collection {name:?} after {attempt} attempts."
					)));
				},
		}

		time::sleep(backoff).await;

		backoff = backoff.saturating_mul(2).min(Duration::from_secs(2));
	}

	Ok(())
}
