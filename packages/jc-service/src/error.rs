pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Job store unavailable: {message}")]
	StoreUnavailable { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error("Qdrant error: {message}")]
	Qdrant { message: String },
}
impl From<jc_storage::Error> for Error {
	fn from(err: jc_storage::Error) -> Self {
		match err {
			jc_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			err @ jc_storage::Error::InvalidPayload { .. } =>
				Self::Storage { message: err.to_string() },
			jc_storage::Error::Qdrant(inner) => Self::Qdrant { message: inner.to_string() },
		}
	}
}
impl From<color_eyre::Report> for Error {
	fn from(err: color_eyre::Report) -> Self {
		Self::Provider { message: err.to_string() }
	}
}
