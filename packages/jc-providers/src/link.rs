use std::time::Duration;

use color_eyre::Result;
use reqwest::{Client, StatusCode, redirect::Policy};

/// Outcome of probing a posting URL after following redirects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkStatus {
	Alive(u16),
	NotFound,
}
impl LinkStatus {
	pub fn from_status(status: StatusCode) -> Self {
		if status == StatusCode::NOT_FOUND { Self::NotFound } else { Self::Alive(status.as_u16()) }
	}
}

/// Issues a GET against `url`. Transport failures surface as errors; any HTTP status other than
/// 404 counts as alive.
pub async fn probe(url: &str, timeout_ms: u64) -> Result<LinkStatus> {
	let client = Client::builder()
		.timeout(Duration::from_millis(timeout_ms))
		.redirect(Policy::limited(10))
		.build()?;
	let res = client.get(url).send().await?;

	Ok(LinkStatus::from_status(res.status()))
}
