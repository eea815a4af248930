//! Bringing a merged registry into a schedulable state.

use crate::registry::*;
use crate::document::RegistryDocument;
use crate::installation::InstallationCheck;
use crate::state::StateFile;
use crate::validation::ValidationError;
use crate::RegistryOptions;

impl Registry {
	/// Builds a registry for `options` out of documents merged in the given order.
	///
	/// Callers pass the local document first, then the bundled one, then the remote ones.
	/// When `check` is given, installed products are validated after every merge, see
	/// [`Registry::validate_installations`].
	pub fn from_documents<'a>(
		options: &RegistryOptions,
		documents: impl IntoIterator<Item = (&'a RegistryDocument, RegistryType)>,
		check: Option<&dyn InstallationCheck>,
	) -> crate::Result<Self> {
		let mut registry = Registry::new(options.target_platform().clone());
		for (document, registry_type) in documents {
			registry.merge_document(document, registry_type)?;
			if let Some(check) = check {
				registry.validate_installations(check, options.remove_corrupted_silently())?;
			}
		}
		Ok(registry)
	}

	/// Validates, replays `state` if given, filters and applies the intent in `options`.
	///
	/// Returns the unsatisfiable requirements that were downgraded to warnings.
	/// Intent from `options` is ignored when a state file drives the session.
	pub fn initialize(&mut self, options: &RegistryOptions, state: Option<&StateFile>) -> crate::Result<Vec<ValidationError>> {
		log::info!("Initializing registry for {}", options.target_platform());

		self.set_target_platform(options.target_platform().clone());

		let findings = self.load(options.unsatisfiable())?;

		if let Some(state) = state {
			self.apply_state_file(state)?;
		}

		self.apply_filters(options.target_component(), options.missing_target())?;

		if state.is_none() {
			self.change_statuses(options.install_intent(), options.uninstall_intent(), options.linked_uninstalls())?;
		}

		log::info!("Registry initialization complete");
		Ok(findings)
	}
}
