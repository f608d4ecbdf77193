use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
	#[error("failed to parse graph config: {0}")]
	Parse(#[from] serde_json::Error),
	#[error("invalid graph config: `{field}` {reason}")]
	InvalidConfig {
		field: &'static str,
		reason: &'static str,
	},
	#[error("canvas unavailable: {0}")]
	Canvas(String),
}

pub type Result<T, E = GraphError> = std::result::Result<T, E>;
