//! Dependency validation run once over a freshly loaded registry.
//!
//! Cycle detection does not use a global visited set. Every requiree is checked against the
//! product being validated plus the path of products that led to it (the `prohibited` path),
//! so the same product is legitimately revisited when it is reachable along different paths.
//! A validation call therefore costs roughly depth × fan-out and results must not be cached
//! between different paths.

use crate::registry::*;

/// A problem found in the dependency graph of the registry.
///
/// Products are named `uid/version`, dependencies as they are displayed by [`Dependency`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
	/// No product satisfies the requirement.
	#[error("requirement {requirement} of {product} can't be satisfied")]
	UnsatisfiableRequirement {
		product: String,
		requirement: String,
	},
	/// `product` is reachable again through its own requirement or install-after chain.
	#[error("cyclic dependency between {product} and {dependency}")]
	CyclicDependency {
		product: String,
		dependency: String,
	},
	/// A product satisfying the requirement is also matched by a conflict of the same product.
	#[error("{product} requires {requirement} but conflicts with {conflict}")]
	ConflictingRequirement {
		product: String,
		requirement: String,
		conflict: String,
	},
}

impl ValidationError {
	/// The product the finding is attached to.
	pub fn product(&self) -> &str {
		match self {
			ValidationError::UnsatisfiableRequirement { product, .. }
			| ValidationError::CyclicDependency { product, .. }
			| ValidationError::ConflictingRequirement { product, .. } => product,
		}
	}
}

/// What to do with requirements that resolve to nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnsatisfiablePolicy {
	/// Fail the load.
	#[default] Abort,
	/// Hide the offending products and carry on.
	HideProduct,
}

const REQUIREMENT: &[DependencyKind] = &[DependencyKind::Requirement];
const ORDERING: &[DependencyKind] = &[DependencyKind::Requirement, DependencyKind::InstallAfter];

impl Registry {
	/// Validates every product and applies `policy` to unsatisfiable requirements.
	///
	/// Cyclic and conflicting dependencies always fail. With [`UnsatisfiablePolicy::HideProduct`]
	/// the products owning unsatisfiable requirements are hidden and returned as findings.
	pub fn load(&mut self, policy: UnsatisfiablePolicy) -> crate::Result<Vec<ValidationError>> {
		log::info!("Validating dependencies of {} products", self.products().len());

		let findings = self.validate()?;

		if findings.is_empty() {
			log::info!("Registry dependencies are valid");
			return Ok(findings)
		}

		match policy {
			UnsatisfiablePolicy::Abort => {
				for f in &findings {
					log::error!("{}", f);
				}
				Err(crate::Error::UnsatisfiedRequirements(findings))
			},
			UnsatisfiablePolicy::HideProduct => {
				for f in &findings {
					log::warn!("{}, hiding it", f);
					let offenders = self.products().into_iter()
						.filter(|id| self.key(*id) == f.product())
						.collect::<Vec<_>>();
					for id in offenders {
						self.get_mut(id).set_visible(false);
					}
				}
				Ok(findings)
			},
		}
	}

	/// Validates every product in document order.
	///
	/// Returns the unsatisfiable requirements found, the first fatal problem is returned as an error.
	pub fn validate(&self) -> Result<Vec<ValidationError>, ValidationError> {
		let mut findings = Vec::new();
		for product in self.products() {
			self.validate_product(product, &mut findings)?;
		}
		Ok(findings)
	}

	/// Runs the requirement, conflict and install-after checks on a single product.
	pub fn validate_product(&self, product: NodeId, findings: &mut Vec<ValidationError>) -> Result<(), ValidationError> {
		log::trace!("Validating {}", self.key(product));
		self.validate_requirements(product, findings)?;
		self.validate_conflicts(product)?;
		self.validate_install_afters(product)?;
		Ok(())
	}

	/// Checks that every requirement of `product` resolves and that no requirement chain leads back to it.
	pub fn validate_requirements(&self, product: NodeId, findings: &mut Vec<ValidationError>) -> Result<(), ValidationError> {
		let mut prohibited = Vec::new();
		self.check_chain(product, REQUIREMENT, &mut prohibited, &mut Some(findings))
	}

	/// Checks that no product satisfying a requirement of `product` is matched by one of its conflicts.
	pub fn validate_conflicts(&self, product: NodeId) -> Result<(), ValidationError> {
		let Some(data) = self.product_data(product) else { return Ok(()) };

		for requirement in data.requirements() {
			let requirees = self.resolve(requirement);
			for conflict in data.conflicts() {
				let conflictees = self.resolve(conflict);
				if requirees.iter().any(|r| conflictees.contains(r)) {
					return Err(ValidationError::ConflictingRequirement {
						product: self.key(product),
						requirement: requirement.to_string(),
						conflict: conflict.to_string(),
					})
				}
			}
		}

		Ok(())
	}

	/// Like [`Registry::validate_requirements`] but follows and inspects requirement and install-after edges together.
	pub fn validate_install_afters(&self, product: NodeId) -> Result<(), ValidationError> {
		let mut prohibited = Vec::new();
		self.check_chain(product, ORDERING, &mut prohibited, &mut None)
	}

	/// Walks `kinds` edges out of `product`.
	///
	/// Every dependency of a reached product (restricted to `kinds` unless only requirements are walked)
	/// must not be satisfied by `product` or anything on the `prohibited` path.
	/// Unsatisfiable requirements are recorded into `findings` when it is present.
	fn check_chain(&self, product: NodeId, kinds: &[DependencyKind], prohibited: &mut Vec<NodeId>, findings: &mut Option<&mut Vec<ValidationError>>) -> Result<(), ValidationError> {
		let Some(data) = self.product_data(product) else { return Ok(()) };

		for edge in data.dependencies_of(kinds) {
			let requirees = self.resolve(edge);

			if requirees.is_empty() {
				if let (Dependency::Requirement { .. }, Some(findings)) = (edge, findings.as_deref_mut()) {
					let finding = ValidationError::UnsatisfiableRequirement {
						product: self.key(product),
						requirement: edge.to_string(),
					};
					log::debug!("{}", finding);
					if !findings.contains(&finding) {
						findings.push(finding);
					}
				}
				continue;
			}

			for requiree in requirees {
				log::trace!("Checking {} reached from {} through {}", self.key(requiree), self.key(product), edge);

				let Some(requiree_data) = self.product_data(requiree) else { continue };
				/* The requirement walk inspects every dependency of the requiree, conflicts included */
				let inspected: Box<dyn Iterator<Item = &Dependency> + '_> = if kinds == REQUIREMENT {
					Box::new(requiree_data.dependencies.iter())
				} else {
					Box::new(requiree_data.dependencies_of(kinds))
				};

				for dependency in inspected {
					if self.get(product).satisfies(dependency) {
						return Err(ValidationError::CyclicDependency {
							product: self.key(product),
							dependency: dependency.uid().to_string(),
						})
					}

					if let Some(p) = prohibited.iter().find(|p| self.get(**p).satisfies(dependency)) {
						return Err(ValidationError::CyclicDependency {
							product: self.key(*p),
							dependency: dependency.uid().to_string(),
						})
					}
				}

				prohibited.push(product);
				let result = self.check_chain(requiree, kinds, prohibited, findings);
				prohibited.pop();
				result?;
			}
		}

		Ok(())
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn v(s: &str) -> Version { Version::new(s).unwrap() }

	fn exactly(uid: &str, version: &str) -> Dependency {
		Dependency::requirement(uid, VersionBounds::Explicit(v(version)))
	}

	fn add(r: &mut Registry, uid: &str, product: Product) -> NodeId {
		let root = r.root();
		r.add_node(root, RegistryNode::product(uid, product)).unwrap()
	}

	fn registry() -> Registry {
		Registry::new(Platform::generic())
	}

	#[test]
	fn self_requirement_is_cyclic() {
		let mut r = registry();
		let a = add(&mut r, "a", Product::new(v("1.0")).depends(exactly("a", "1.0")));
		let mut findings = Vec::new();
		assert!(matches!(r.validate_requirements(a, &mut findings), Err(ValidationError::CyclicDependency { .. })));
	}

	#[test]
	fn missing_requiree_is_recorded_not_raised() {
		let mut r = registry();
		let a = add(&mut r, "a", Product::new(v("1.0")).depends(exactly("ghost", "1.0")));
		let mut findings = Vec::new();
		r.validate_requirements(a, &mut findings).unwrap();
		assert_eq!(findings, vec![ValidationError::UnsatisfiableRequirement { product: "a/1.0".into(), requirement: "ghost/1.0".into() }]);
	}

	#[test]
	fn diamond_is_not_a_cycle() {
		let mut r = registry();
		add(&mut r, "top", Product::new(v("1.0")).depends(exactly("left", "1.0")).depends(exactly("right", "1.0")));
		add(&mut r, "left", Product::new(v("1.0")).depends(exactly("bottom", "1.0")));
		add(&mut r, "right", Product::new(v("1.0")).depends(exactly("bottom", "1.0")));
		add(&mut r, "bottom", Product::new(v("1.0")));
		assert_eq!(r.validate(), Ok(vec![]));
	}

	#[test]
	fn install_after_back_edge_is_cyclic() {
		let mut r = registry();
		add(&mut r, "a", Product::new(v("1.0")).depends(exactly("b", "1.0")));
		add(&mut r, "b", Product::new(v("1.0")).depends(Dependency::install_after("a")));
		assert!(matches!(r.validate(), Err(ValidationError::CyclicDependency { .. })));
	}

	#[test]
	fn install_after_chain_through_requirement_is_cyclic() {
		let mut r = registry();
		let a = add(&mut r, "a", Product::new(v("1.0")).depends(Dependency::install_after("b")));
		add(&mut r, "b", Product::new(v("1.0")).depends(exactly("c", "1.0")));
		add(&mut r, "c", Product::new(v("1.0")).depends(Dependency::install_after("a")));
		assert!(matches!(r.validate_install_afters(a), Err(ValidationError::CyclicDependency { .. })));
	}

	#[test]
	fn install_after_to_missing_product_is_fine() {
		let mut r = registry();
		let a = add(&mut r, "a", Product::new(v("1.0")).depends(Dependency::install_after("nothing")));
		assert_eq!(r.validate_install_afters(a), Ok(()));
	}

	#[test]
	fn conflicting_requirement_is_reported() {
		let mut r = registry();
		let a = add(&mut r, "a", Product::new(v("1.0"))
			.depends(Dependency::requirement("lib", VersionBounds::Any))
			.depends(Dependency::conflict("lib", VersionBounds::from_range(Some(v("2.0")), None))));
		add(&mut r, "lib", Product::new(v("1.0")));
		assert_eq!(r.validate_conflicts(a), Ok(()));

		add(&mut r, "lib", Product::new(v("2.0")));
		assert!(matches!(r.validate_conflicts(a), Err(ValidationError::ConflictingRequirement { .. })));
	}

	#[test]
	fn load_hides_products_with_unsatisfiable_requirements() {
		let mut r = registry();
		let a = add(&mut r, "a", Product::new(v("1.0")).depends(exactly("ghost", "1.0")));
		let b = add(&mut r, "b", Product::new(v("1.0")));

		let findings = r.load(UnsatisfiablePolicy::HideProduct).unwrap();
		assert_eq!(findings.len(), 1);
		assert!(!r.get(a).is_visible());
		assert!(r.get(b).is_visible());
	}

	#[test]
	fn load_aborts_on_unsatisfiable_by_default() {
		let mut r = registry();
		add(&mut r, "a", Product::new(v("1.0")).depends(exactly("ghost", "1.0")));
		assert!(matches!(r.load(UnsatisfiablePolicy::default()), Err(crate::Error::UnsatisfiedRequirements(f)) if f.len() == 1));
	}
}
