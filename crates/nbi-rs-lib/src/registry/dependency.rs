use serde::*;
use super::*;

pub type ProductVersionBounds = VersionBounds<Version>;

/// An edge from a product to the products named by `uid`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Dependency {
	/// At least one product with `uid` inside `version` must be present.
	Requirement {
		uid: String,
		#[serde(default)]
		version: ProductVersionBounds,
		/// When known, the exact version that was picked for this requirement.
		#[serde(default, skip_serializing_if = "Option::is_none")]
		resolved: Option<Version>,
	},
	/// Products with `uid` inside `version` must not be present at the same time.
	Conflict {
		uid: String,
		#[serde(default)]
		version: ProductVersionBounds,
	},
	/// Ordering only, any product with `uid` is installed first.
	InstallAfter {
		uid: String,
	},
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyKind {
	Requirement,
	Conflict,
	InstallAfter,
}

impl Dependency {
	pub fn requirement(uid: impl Into<String>, version: ProductVersionBounds) -> Self {
		Dependency::Requirement { uid: uid.into(), version, resolved: None }
	}

	pub fn conflict(uid: impl Into<String>, version: ProductVersionBounds) -> Self {
		Dependency::Conflict { uid: uid.into(), version }
	}

	pub fn install_after(uid: impl Into<String>) -> Self {
		Dependency::InstallAfter { uid: uid.into() }
	}

	pub fn uid(&self) -> &str {
		match self {
			Dependency::Requirement { uid, .. }
			| Dependency::Conflict { uid, .. }
			| Dependency::InstallAfter { uid } => uid,
		}
	}

	pub fn kind(&self) -> DependencyKind {
		match self {
			Dependency::Requirement { .. } => DependencyKind::Requirement,
			Dependency::Conflict { .. } => DependencyKind::Conflict,
			Dependency::InstallAfter { .. } => DependencyKind::InstallAfter,
		}
	}

	/// Checks if a product with the given identity matches the edge, platforms are not considered.
	pub fn is_satisfied_by(&self, uid: &str, version: &Version) -> bool {
		if self.uid() != uid {
			return false
		}
		match self {
			Dependency::Requirement { resolved: Some(resolved), .. } => resolved == version,
			Dependency::Requirement { version: bounds, .. }
			| Dependency::Conflict { version: bounds, .. } => bounds.is_version_within(version),
			Dependency::InstallAfter { .. } => true,
		}
	}
}

impl std::fmt::Display for Dependency {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Dependency::Requirement { uid, version, resolved } => {
				write!(f, "{}/{}", uid, version)?;
				if let Some(resolved) = resolved {
					write!(f, " [{}]", resolved)?;
				}
				Ok(())
			},
			Dependency::Conflict { uid, version } => write!(f, "!{}/{}", uid, version),
			Dependency::InstallAfter { uid } => write!(f, "after {}", uid),
		}
	}
}
