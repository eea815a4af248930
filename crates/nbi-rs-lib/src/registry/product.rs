use std::collections::BTreeMap;

use serde::*;
use super::*;

/// Lifecycle of a product inside one installer session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
	#[default] NotInstalled,
	ToBeInstalled,
	Installed,
	ToBeUninstalled,
}

impl Status {
	/// The product is on disk or will be once the pending installs run.
	pub fn is_present_or_pending(&self) -> bool {
		matches!(self, Status::Installed | Status::ToBeInstalled)
	}
}

impl std::fmt::Display for Status {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let s = match self {
			Status::NotInstalled => "not-installed",
			Status::ToBeInstalled => "to-be-installed",
			Status::Installed => "installed",
			Status::ToBeUninstalled => "to-be-uninstalled",
		};
		write!(f, "{}", s)
	}
}

/// The installable payload of a product node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
	pub version: Version,
	pub platforms: Vec<Platform>,
	#[serde(default)]
	pub status: Status,
	#[serde(default)]
	pub dependencies: Vec<Dependency>,
	/// Free form properties carried through the state file.
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub properties: BTreeMap<String, String>,
}

impl Product {
	/// A not installed product for every platform with no dependencies.
	pub fn new(version: Version) -> Self {
		Self {
			version,
			platforms: vec![Platform::generic()],
			status: Status::NotInstalled,
			dependencies: Default::default(),
			properties: Default::default(),
		}
	}

	pub fn platforms(mut self, platforms: impl IntoIterator<Item = Platform>) -> Self {
		self.platforms = platforms.into_iter().collect();
		self
	}

	pub fn status(mut self, status: Status) -> Self {
		self.status = status;
		self
	}

	pub fn depends(mut self, dependency: Dependency) -> Self {
		self.dependencies.push(dependency);
		self
	}

	/// Dependencies of the given kinds in declaration order.
	pub fn dependencies_of<'a>(&'a self, kinds: &'a [DependencyKind]) -> impl Iterator<Item = &'a Dependency> + 'a {
		self.dependencies.iter().filter(move |d| kinds.contains(&d.kind()))
	}

	pub fn requirements(&self) -> impl Iterator<Item = &Dependency> {
		self.dependencies_of(&[DependencyKind::Requirement])
	}

	pub fn conflicts(&self) -> impl Iterator<Item = &Dependency> {
		self.dependencies_of(&[DependencyKind::Conflict])
	}

	pub fn install_afters(&self) -> impl Iterator<Item = &Dependency> {
		self.dependencies_of(&[DependencyKind::InstallAfter])
	}

	/// Checks if any of the product's platforms can be installed on `target`.
	pub fn supports(&self, target: &Platform) -> bool {
		self.platforms.iter().any(|p| target.is_compatible_with(p))
	}
}
