//! Checking that installed products are still intact on disk.

use crate::registry::*;

/// Inspects the on-disk installation of a product.
pub trait InstallationCheck {
	/// Returns a problem description when the installation is damaged.
	///
	/// An error means the product's configuration logic could not be obtained at all.
	fn validate_installation(&self, node: &RegistryNode) -> crate::Result<Option<String>>;
}

impl<F> InstallationCheck for F
where
	F: Fn(&RegistryNode) -> crate::Result<Option<String>>,
{
	fn validate_installation(&self, node: &RegistryNode) -> crate::Result<Option<String>> {
		self(node)
	}
}

impl Registry {
	/// Runs `check` on every visible installed product.
	///
	/// Products whose logic is unavailable are hidden together with their unavoidable dependents.
	/// Damaged products are forgotten with their unavoidable dependents when `remove_silently` is set,
	/// otherwise the first one is reported as [`crate::Error::CorruptedInstallation`].
	pub fn validate_installations(&mut self, check: &dyn InstallationCheck, remove_silently: bool) -> crate::Result<()> {
		log::info!("Validating previous installations");

		for product in self.products() {
			let node = self.get(product);
			if !node.is_visible() || self.status(product) != Some(Status::Installed) {
				continue;
			}

			let message = match check.validate_installation(node) {
				Ok(None) => continue,
				Ok(Some(message)) => message,
				Err(e) => {
					log::warn!("Cannot load configuration logic for {}, hiding it: {}", self.key(product), e);
					self.get_mut(product).set_visible(false);
					for dependent in self.unavoidable_dependents_ordered(product) {
						log::warn!("Also hiding dependent {}", self.key(dependent));
						self.get_mut(dependent).set_visible(false);
					}
					continue;
				},
			};

			let dependents = self.unavoidable_dependents_ordered(product);
			log::warn!("Installation of {} is damaged: {}", self.key(product), message);

			if !remove_silently {
				return Err(crate::Error::CorruptedInstallation {
					product: self.key(product),
					message,
					dependents: dependents.iter().map(|d| self.key(*d)).collect(),
				})
			}

			for id in std::iter::once(product).chain(dependents) {
				log::info!("Removing {} from the registry", self.key(id));
				self.set_status(id, Status::NotInstalled)?;
				self.remove_child(id)?;
			}
		}

		Ok(())
	}
}
