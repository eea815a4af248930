use serde::*;

use crate::registry::Platform;
use crate::validation::UnsatisfiablePolicy;
pub use crate::filter::{LinkedUninstall, MissingTargetPolicy, TargetComponent};

/// Settings for one registry session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryOptions {
	target_platform: Platform,
	target_component: Option<TargetComponent>,
	suggest_install: bool,
	force_install: bool,
	suggest_uninstall: bool,
	force_uninstall: bool,
	missing_target: MissingTargetPolicy,
	unsatisfiable: UnsatisfiablePolicy,
	remove_corrupted_silently: bool,
	linked_uninstalls: Vec<LinkedUninstall>,
}

impl Default for RegistryOptions {
	fn default() -> Self {
		Self {
			target_platform: Platform::current(),
			target_component: None,
			suggest_install: false,
			force_install: false,
			suggest_uninstall: false,
			force_uninstall: false,
			missing_target: Default::default(),
			unsatisfiable: Default::default(),
			remove_corrupted_silently: false,
			/* The base IDE takes its nested runtime with it */
			linked_uninstalls: vec![LinkedUninstall::new("nb-base", "jre-nested")],
		}
	}
}

impl RegistryOptions {
	/// Reads options from a JSON file, missing fields keep their defaults.
	pub fn load_from_disk(path: &std::path::Path) -> crate::Result<Self> {
		let file = std::fs::File::open(path)?;
		Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
	}

	pub fn target_platform(&self) -> &Platform {
		&self.target_platform
	}
	pub fn set_target_platform(&mut self, target_platform: Platform) {
		self.target_platform = target_platform;
	}

	pub fn target_component(&self) -> Option<&TargetComponent> {
		self.target_component.as_ref()
	}
	pub fn set_target_component(&mut self, target_component: Option<TargetComponent>) {
		self.target_component = target_component;
	}

	pub fn suggest_install(&self) -> bool {
		self.suggest_install
	}
	pub fn set_suggest_install(&mut self, suggest_install: bool) {
		self.suggest_install = suggest_install;
	}

	pub fn force_install(&self) -> bool {
		self.force_install
	}
	pub fn set_force_install(&mut self, force_install: bool) {
		self.force_install = force_install;
	}

	pub fn suggest_uninstall(&self) -> bool {
		self.suggest_uninstall
	}
	pub fn set_suggest_uninstall(&mut self, suggest_uninstall: bool) {
		self.suggest_uninstall = suggest_uninstall;
	}

	pub fn force_uninstall(&self) -> bool {
		self.force_uninstall
	}
	pub fn set_force_uninstall(&mut self, force_uninstall: bool) {
		self.force_uninstall = force_uninstall;
	}

	/// Not installed products should be installed.
	pub fn install_intent(&self) -> bool {
		self.suggest_install || self.force_install
	}

	/// Installed products should be uninstalled.
	pub fn uninstall_intent(&self) -> bool {
		self.suggest_uninstall || self.force_uninstall
	}

	pub fn missing_target(&self) -> MissingTargetPolicy {
		self.missing_target
	}
	pub fn set_missing_target(&mut self, missing_target: MissingTargetPolicy) {
		self.missing_target = missing_target;
	}

	pub fn unsatisfiable(&self) -> UnsatisfiablePolicy {
		self.unsatisfiable
	}
	pub fn set_unsatisfiable(&mut self, unsatisfiable: UnsatisfiablePolicy) {
		self.unsatisfiable = unsatisfiable;
	}

	pub fn remove_corrupted_silently(&self) -> bool {
		self.remove_corrupted_silently
	}
	pub fn set_remove_corrupted_silently(&mut self, remove_corrupted_silently: bool) {
		self.remove_corrupted_silently = remove_corrupted_silently;
	}

	pub fn linked_uninstalls(&self) -> &[LinkedUninstall] {
		&self.linked_uninstalls
	}
	pub fn set_linked_uninstalls(&mut self, linked_uninstalls: Vec<LinkedUninstall>) {
		self.linked_uninstalls = linked_uninstalls;
	}
}
