//! Visibility filtering and the initial status changes driven by the installer's intent.

use std::collections::HashSet;

use serde::*;

use crate::registry::*;

/// A single product the session is narrowed down to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetComponent {
	pub uid: String,
	pub version: Version,
}

impl TargetComponent {
	pub fn new(uid: impl Into<String>, version: Version) -> Self {
		Self { uid: uid.into(), version }
	}
}

/// What to do when the target component is not in the registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingTargetPolicy {
	#[default] Abort,
	/// Hide every product and carry on with nothing to show.
	HideAll,
}

/// When a product with uid `primary` is marked for uninstallation, installed products
/// with uid `companion` and the same version go with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedUninstall {
	pub primary: String,
	pub companion: String,
}

impl LinkedUninstall {
	pub fn new(primary: impl Into<String>, companion: impl Into<String>) -> Self {
		Self { primary: primary.into(), companion: companion.into() }
	}
}

impl Registry {
	/// Hides the products the session should not deal with.
	///
	/// Runs target isolation, then the platform filter, then hides groups left without a visible product.
	pub fn apply_filters(&mut self, target: Option<&TargetComponent>, policy: MissingTargetPolicy) -> crate::Result<()> {
		if let Some(target) = target {
			self.isolate_target(target, policy)?;
		}

		/* Platform filter runs second so an incompatible target is still hidden */
		for product in self.products() {
			let supported = self.product_data(product).is_some_and(|p| p.supports(self.target_platform()));
			if !supported {
				log::debug!("Hiding {}, it does not support {}", self.key(product), self.target_platform());
				self.get_mut(product).set_visible(false);
			}
		}

		for group in self.groups() {
			if !self.has_visible_products(group) {
				log::debug!("Hiding empty group {}", self.key(group));
				self.get_mut(group).set_visible(false);
			}
		}

		Ok(())
	}

	fn isolate_target(&mut self, target: &TargetComponent, policy: MissingTargetPolicy) -> crate::Result<()> {
		let found = self.products().into_iter().find(|id| {
			let node = self.get(*id);
			node.uid() == target.uid && node.as_product().is_some_and(|p| p.version == target.version)
		});

		let Some(found) = found else {
			return match policy {
				MissingTargetPolicy::Abort => Err(crate::Error::TargetComponentNotFound {
					uid: target.uid.clone(),
					version: target.version.to_string(),
				}),
				MissingTargetPolicy::HideAll => {
					log::warn!("Target component {}/{} not found, hiding every product", target.uid, target.version);
					for product in self.products() {
						self.get_mut(product).set_visible(false);
					}
					Ok(())
				},
			}
		};

		log::info!("Narrowing the registry down to {}", self.key(found));

		let mut kept: HashSet<NodeId> = self.unavoidable_dependents(found);
		kept.insert(found);
		let ancestors: HashSet<NodeId> = kept.iter().flat_map(|k| self.ancestors(*k)).collect();

		for product in self.products() {
			if !kept.contains(&product) && !ancestors.contains(&product) {
				log::debug!("Hiding {}, it is not needed by the target component", self.key(product));
				self.get_mut(product).set_visible(false);
			}
		}

		Ok(())
	}

	/// Checks if some visible product lives below `node`.
	pub fn has_visible_products(&self, node: NodeId) -> bool {
		let Some(node) = self.node(node) else { return false };
		node.children().iter().any(|c| {
			let child = self.get(*c);
			(!child.is_group() && child.is_visible()) || self.has_visible_products(*c)
		})
	}

	/// Advances statuses of visible products according to the installer's intent.
	///
	/// Installing turns not installed products into pending installs, uninstalling turns
	/// installed products into pending uninstalls and drags along their `linked` companions.
	pub fn change_statuses(&mut self, install: bool, uninstall: bool, linked: &[LinkedUninstall]) -> crate::Result<()> {
		if install {
			for product in self.products_with_status(Status::NotInstalled) {
				if self.get(product).is_visible() {
					self.set_status(product, Status::ToBeInstalled)?;
				}
			}
		}

		if uninstall {
			let mut primaries = Vec::new();
			for product in self.products_with_status(Status::Installed) {
				let node = self.get(product);
				if !node.is_visible() { continue }

				if let Some(data) = node.as_product() {
					for link in linked.iter().filter(|l| l.primary == node.uid()) {
						primaries.push((link.companion.clone(), data.version.clone()));
					}
				}
				self.set_status(product, Status::ToBeUninstalled)?;
			}

			for (companion, version) in primaries {
				for product in self.products_by_uid(&companion) {
					let matches = self.product_data(product).is_some_and(|p| p.version == version && p.status == Status::Installed);
					if matches {
						log::debug!("Uninstalling {} along with its primary product", self.key(product));
						self.set_status(product, Status::ToBeUninstalled)?;
					}
				}
			}
		}

		Ok(())
	}
}
