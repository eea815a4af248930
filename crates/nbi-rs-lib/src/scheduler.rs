//! Install and uninstall ordering.
//!
//! Both schedulers only read statuses. They repeatedly scan the products in document order,
//! append the first one that can go next and start over, so the result is deterministic for a given tree.
//! A pending product that can never be placed is an error, never skipped.

use std::collections::HashSet;

use crate::registry::*;

impl Registry {
	/// Checks that every requirement of `product` has a present or pending requiree and no conflict does.
	pub fn check_dependencies_for_install(&self, product: NodeId) -> bool {
		let Some(data) = self.product_data(product) else { return false };
		let present = |id: &NodeId| self.status(*id).is_some_and(|s| s.is_present_or_pending());

		data.requirements().all(|r| self.resolve(r).iter().any(present))
			&& data.conflicts().all(|c| !self.resolve(c).iter().any(present))
	}

	/// Checks if `product` can be appended to an install order that already holds `selected`.
	pub fn can_install_next(&self, product: NodeId, selected: &[NodeId]) -> bool {
		let Some(data) = self.product_data(product) else { return false };
		if data.status != Status::ToBeInstalled || selected.contains(&product) {
			return false
		}
		if !self.check_dependencies_for_install(product) {
			return false
		}

		data.requirements().chain(data.install_afters())
			.flat_map(|d| self.resolve(d))
			.all(|dependee| self.status(dependee) != Some(Status::ToBeInstalled) || selected.contains(&dependee))
	}

	/// Products pending installation, every one after the pending products it requires or installs after.
	pub fn products_to_install(&self) -> crate::Result<Vec<NodeId>> {
		let mut selected = Vec::new();

		while let Some(next) = self.products().into_iter().find(|p| self.can_install_next(*p, &selected)) {
			log::debug!("Scheduling installation of {}", self.key(next));
			selected.push(next);
		}

		self.check_all_placed(Status::ToBeInstalled, &selected)?;
		Ok(selected)
	}

	/// Registry-wide gate consulted before placing any uninstall.
	///
	/// Every candidate is admitted, the per product check is done by [`Registry::can_uninstall_next`].
	pub fn check_dependencies_for_uninstall(&self) -> bool {
		true
	}

	/// Checks if `product` satisfies a requirement of `dependent`, directly or through the requirees of its requirees.
	pub fn satisfies_requirement(&self, product: NodeId, dependent: NodeId) -> bool {
		let mut visited = HashSet::new();
		self.satisfies_requirement_inner(product, dependent, &mut visited)
	}

	fn satisfies_requirement_inner(&self, product: NodeId, dependent: NodeId, visited: &mut HashSet<NodeId>) -> bool {
		if !visited.insert(dependent) { return false }
		let Some(data) = self.product_data(dependent) else { return false };

		data.requirements()
			.flat_map(|r| self.resolve(r))
			.any(|requiree| requiree == product || self.satisfies_requirement_inner(product, requiree, visited))
	}

	/// Checks if `product` can be appended to an uninstall order that already holds `selected`.
	///
	/// A product is held back while some product that is still there and not yet selected depends on it.
	pub fn can_uninstall_next(&self, product: NodeId, selected: &[NodeId]) -> bool {
		if self.status(product) != Some(Status::ToBeUninstalled) || selected.contains(&product) {
			return false
		}
		if !self.check_dependencies_for_uninstall() {
			return false
		}

		!self.products().into_iter().any(|dependent| {
			let remains = !matches!(self.status(dependent), Some(Status::NotInstalled | Status::ToBeInstalled) | None);
			remains && !selected.contains(&dependent) && self.satisfies_requirement(product, dependent)
		})
	}

	/// Products pending uninstallation, dependents first.
	///
	/// Fails when a product pending uninstallation is still needed by one that stays, see [`Registry::mark_for_uninstall`].
	pub fn products_to_uninstall(&self) -> crate::Result<Vec<NodeId>> {
		let mut selected = Vec::new();

		while let Some(next) = self.products().into_iter().find(|p| self.can_uninstall_next(*p, &selected)) {
			log::debug!("Scheduling uninstallation of {}", self.key(next));
			selected.push(next);
		}

		self.check_all_placed(Status::ToBeUninstalled, &selected)?;
		Ok(selected)
	}

	fn check_all_placed(&self, status: Status, selected: &[NodeId]) -> crate::Result<()> {
		let pending = self.products().into_iter()
			.filter(|p| self.status(*p) == Some(status) && !selected.contains(p))
			.map(|p| self.key(p))
			.collect::<Vec<_>>();

		if pending.is_empty() {
			Ok(())
		} else {
			log::error!("Could not schedule {} product(s): {}", status, pending.join(", "));
			Err(crate::Error::SchedulingInconsistency { pending })
		}
	}
}
