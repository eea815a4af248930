//! Reverse dependency closure: the products that can't stay without a given one.

use std::collections::HashSet;

use crate::registry::*;

impl Registry {
	/// Products having a requirement that `product` alone satisfies.
	///
	/// When the candidate is installed only installed requirees count as satisfying its requirements.
	pub fn sole_dependents(&self, product: NodeId) -> Vec<NodeId> {
		self.products().into_iter()
			.filter(|candidate| *candidate != product)
			.filter(|candidate| {
				let Some(data) = self.product_data(*candidate) else { return false };
				let installed = data.status == Status::Installed;

				data.requirements().any(|requirement| {
					let mut requirees = self.resolve(requirement);
					if installed {
						requirees.retain(|r| self.status(*r) == Some(Status::Installed));
					}
					requirees == [product]
				})
			})
			.collect()
	}

	/// Every product that would lose a requirement if `product` went away, directly or through another dependent.
	///
	/// `product` itself is never part of the result.
	pub fn unavoidable_dependents(&self, product: NodeId) -> HashSet<NodeId> {
		let mut dependents = HashSet::new();
		let mut queue = vec![product];

		while let Some(target) = queue.pop() {
			for dependent in self.sole_dependents(target) {
				if dependent != product && dependents.insert(dependent) {
					log::trace!("{} can't stay without {}", self.key(dependent), self.key(target));
					queue.push(dependent);
				}
			}
		}

		dependents
	}

	/// [`Registry::unavoidable_dependents`] in document order.
	pub fn unavoidable_dependents_ordered(&self, product: NodeId) -> Vec<NodeId> {
		let dependents = self.unavoidable_dependents(product);
		self.products().into_iter().filter(|p| dependents.contains(p)).collect()
	}

	/// Marks `product` and its installed unavoidable dependents for uninstallation.
	///
	/// Returns the products whose status changed.
	pub fn mark_for_uninstall(&mut self, product: NodeId) -> crate::Result<Vec<NodeId>> {
		if self.status(product).is_none() {
			return Err(crate::Error::NodeNotFound)
		}

		let mut marked = Vec::new();
		let candidates = std::iter::once(product).chain(self.unavoidable_dependents_ordered(product));
		for id in candidates.collect::<Vec<_>>() {
			if self.status(id) == Some(Status::Installed) {
				self.set_status(id, Status::ToBeUninstalled)?;
				marked.push(id);
			}
		}

		log::debug!("Marked {} product(s) for uninstallation starting from {}", marked.len(), self.key(product));
		Ok(marked)
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn v(s: &str) -> Version { Version::new(s).unwrap() }

	fn add(r: &mut Registry, uid: &str, product: Product) -> NodeId {
		let root = r.root();
		r.add_node(root, RegistryNode::product(uid, product)).unwrap()
	}

	fn requires(uid: &str) -> Dependency {
		Dependency::requirement(uid, VersionBounds::Any)
	}

	#[test]
	fn closure_follows_chains() {
		let mut r = Registry::new(Platform::generic());
		let jre = add(&mut r, "jre", Product::new(v("1.8")));
		let ide = add(&mut r, "ide", Product::new(v("1.0")).depends(requires("jre")));
		let plugin = add(&mut r, "plugin", Product::new(v("1.0")).depends(requires("ide")));
		assert_eq!(r.unavoidable_dependents(jre), HashSet::from([ide, plugin]));
	}

	#[test]
	fn closure_skips_products_with_alternatives() {
		let mut r = Registry::new(Platform::generic());
		let jre8 = add(&mut r, "jre", Product::new(v("1.8")));
		add(&mut r, "jre", Product::new(v("11")));
		add(&mut r, "ide", Product::new(v("1.0")).depends(requires("jre")));
		assert!(r.unavoidable_dependents(jre8).is_empty());
	}

	#[test]
	fn closure_of_installed_ignores_uninstalled_alternatives() {
		let mut r = Registry::new(Platform::generic());
		let jre8 = add(&mut r, "jre", Product::new(v("1.8")).status(Status::Installed));
		add(&mut r, "jre", Product::new(v("11")));
		let ide = add(&mut r, "ide", Product::new(v("1.0")).status(Status::Installed).depends(requires("jre")));
		assert_eq!(r.unavoidable_dependents(jre8), HashSet::from([ide]));
	}

	#[test]
	fn closure_terminates_on_diamonds() {
		let mut r = Registry::new(Platform::generic());
		let base = add(&mut r, "base", Product::new(v("1.0")));
		let left = add(&mut r, "left", Product::new(v("1.0")).depends(requires("base")));
		let right = add(&mut r, "right", Product::new(v("1.0")).depends(requires("base")));
		let top = add(&mut r, "top", Product::new(v("1.0")).depends(requires("left")).depends(requires("right")));
		assert_eq!(r.unavoidable_dependents(base), HashSet::from([left, right, top]));
	}

	#[test]
	fn mark_for_uninstall_cascades_to_installed_dependents() {
		let mut r = Registry::new(Platform::generic());
		let jre = add(&mut r, "jre", Product::new(v("1.8")).status(Status::Installed));
		let ide = add(&mut r, "ide", Product::new(v("1.0")).status(Status::Installed).depends(requires("jre")));
		assert_eq!(r.mark_for_uninstall(jre).unwrap(), vec![jre, ide]);
		assert_eq!(r.status(ide), Some(Status::ToBeUninstalled));
	}
}
