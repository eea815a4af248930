//! Library error type.

pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum Error {
	#[error("IO error: {0}")]
	IO(#[from] std::io::Error),
	#[error("JSON error: {0}")]
	SerdeJSON(#[from] serde_json::Error),
	#[error("parsing error: {0}")]
	Parse(String),
	#[error("validation error: {0}")]
	Validation(#[from] ValidationError),
	/// Requirements that resolve to nothing, reported when the caller did not opt in to hiding the offenders.
	#[error("{} unsatisfiable requirement(s) in the registry", .0.len())]
	UnsatisfiedRequirements(Vec<ValidationError>),
	/// The scheduler could not place some pending products.
	///
	/// This means validation was skipped or the statuses were changed into an impossible combination.
	#[error("cannot schedule products: {}", .pending.join(", "))]
	SchedulingInconsistency {
		pending: Vec<String>,
	},
	#[error("target component {uid}/{version} not found")]
	TargetComponentNotFound {
		uid: String,
		version: String,
	},
	#[error("node not found")]
	NodeNotFound,
	#[error("invalid tree operation: {0}")]
	InvalidTreeOperation(String),
	#[error("installation of {product} is corrupted: {message}")]
	CorruptedInstallation {
		product: String,
		message: String,
		/// Products that would have to go along with it.
		dependents: Vec<String>,
	},
}
