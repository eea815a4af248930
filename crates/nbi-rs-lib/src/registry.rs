//! The registry tree of groups and products.
//!
//! Nodes live in an arena owned by [`Registry`] and are addressed by [`NodeId`].
//! The tree shape only changes through [`Registry::add_node`], [`Registry::add_child`] and [`Registry::remove_child`],
//! which keep every node under exactly one parent and refuse to create containment cycles.
//!
//! All the "document order" queries walk the tree breadth first from the root,
//! visiting children in the order of their offsets.

use std::collections::{BTreeMap, VecDeque};

mod version;
pub use version::Version;

mod version_bounds;
pub use version_bounds::VersionBounds;

mod platform;
pub use platform::Platform;

mod dependency;
pub use dependency::Dependency;
pub use dependency::DependencyKind;
pub use dependency::ProductVersionBounds;

mod product;
pub use product::Product;
pub use product::Status;

mod node;
pub use node::NodeId;
pub use node::NodeKind;
pub use node::RegistryNode;
pub use node::RegistryType;

/// One registry session.
///
/// Holds the tree and the target platform every query is evaluated against.
#[derive(Debug, Clone)]
pub struct Registry {
	nodes: Vec<RegistryNode>,
	root: NodeId,
	target_platform: Platform,
	properties: BTreeMap<String, String>,
}

impl Default for Registry {
	fn default() -> Self {
		Self::new(Platform::current())
	}
}

impl Registry {
	pub fn new(target_platform: Platform) -> Self {
		Self {
			nodes: vec![RegistryNode::group("")],
			root: NodeId(0),
			target_platform,
			properties: Default::default(),
		}
	}

	pub fn root(&self) -> NodeId {
		self.root
	}

	pub fn target_platform(&self) -> &Platform {
		&self.target_platform
	}

	pub fn set_target_platform(&mut self, target_platform: Platform) {
		log::debug!("Target platform set to {}", target_platform);
		self.target_platform = target_platform;
	}

	pub fn properties(&self) -> &BTreeMap<String, String> {
		&self.properties
	}

	pub fn properties_mut(&mut self) -> &mut BTreeMap<String, String> {
		&mut self.properties
	}

	/* Nodes */

	pub fn node(&self, id: NodeId) -> Option<&RegistryNode> {
		self.nodes.get(id.0)
	}

	pub fn node_mut(&mut self, id: NodeId) -> Option<&mut RegistryNode> {
		self.nodes.get_mut(id.0)
	}

	/// Node lookup for ids this registry handed out.
	pub fn get(&self, id: NodeId) -> &RegistryNode {
		&self.nodes[id.0]
	}

	pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut RegistryNode {
		&mut self.nodes[id.0]
	}

	/// Product payload of `id`, `None` for groups and unknown ids.
	pub fn product_data(&self, id: NodeId) -> Option<&Product> {
		self.node(id)?.as_product()
	}

	pub fn product_data_mut(&mut self, id: NodeId) -> Option<&mut Product> {
		self.node_mut(id)?.as_product_mut()
	}

	pub fn status(&self, id: NodeId) -> Option<Status> {
		self.product_data(id).map(|p| p.status)
	}

	pub fn set_status(&mut self, id: NodeId, status: Status) -> crate::Result<()> {
		let key = self.node(id).ok_or(crate::Error::NodeNotFound)?.key();
		let product = self.product_data_mut(id).ok_or_else(|| crate::Error::InvalidTreeOperation(format!("{} is not a product", key)))?;
		log::trace!("Status of {} changed from {} to {}", key, product.status, status);
		product.status = status;
		Ok(())
	}

	/// `uid/version` of a product, `uid` of a group.
	pub fn key(&self, id: NodeId) -> String {
		self.node(id).map(|n| n.key()).unwrap_or_default()
	}

	/* Tree mutation */

	/// Adds a freshly built node under `parent`.
	pub fn add_node(&mut self, parent: NodeId, node: RegistryNode) -> crate::Result<NodeId> {
		if self.node(parent).is_none() {
			return Err(crate::Error::NodeNotFound)
		}
		let id = NodeId(self.nodes.len());
		self.nodes.push(node);
		self.insert_child(parent, id);
		Ok(id)
	}

	/// Attaches `child` under `parent`, detaching it from its current parent first.
	pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> crate::Result<()> {
		if self.node(parent).is_none() || self.node(child).is_none() {
			return Err(crate::Error::NodeNotFound)
		}
		if child == self.root {
			return Err(crate::Error::InvalidTreeOperation("the root can't be reparented".to_string()))
		}
		if child == parent || self.is_ancestor_of(child, parent) {
			return Err(crate::Error::InvalidTreeOperation(format!("{} can't be placed inside itself", self.key(child))))
		}

		self.detach(child);
		self.insert_child(parent, child);
		Ok(())
	}

	/// Detaches `child` from its parent, it stays addressable but is no longer part of the tree.
	pub fn remove_child(&mut self, child: NodeId) -> crate::Result<()> {
		if self.node(child).is_none() {
			return Err(crate::Error::NodeNotFound)
		}
		if child == self.root {
			return Err(crate::Error::InvalidTreeOperation("the root can't be removed".to_string()))
		}
		self.detach(child);
		Ok(())
	}

	fn detach(&mut self, child: NodeId) {
		if let Some(old_parent) = self.get_mut(child).parent.take() {
			self.get_mut(old_parent).children.retain(|c| *c != child);
		}
	}

	/// Inserts after every sibling with an offset lower or equal to the child's.
	fn insert_child(&mut self, parent: NodeId, child: NodeId) {
		let offset = self.get(child).offset();
		let position = self.get(parent).children.iter()
			.position(|c| self.get(*c).offset() > offset)
			.unwrap_or(self.get(parent).children.len());

		self.get_mut(parent).children.insert(position, child);
		self.get_mut(child).parent = Some(parent);
	}

	/* Tree queries */

	/// Checks if `ancestor` contains `node`, directly or further up.
	pub fn is_ancestor_of(&self, ancestor: NodeId, node: NodeId) -> bool {
		let mut current = self.node(node).and_then(|n| n.parent());
		while let Some(p) = current {
			if p == ancestor { return true }
			current = self.get(p).parent();
		}
		false
	}

	/// Parents of `node` from the closest up to the root.
	pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
		let mut ancestors = Vec::new();
		let mut current = self.node(node).and_then(|n| n.parent());
		while let Some(p) = current {
			ancestors.push(p);
			current = self.get(p).parent();
		}
		ancestors
	}

	/// Every node reachable from the root, breadth first.
	pub fn nodes(&self) -> Vec<NodeId> {
		let mut matches = Vec::with_capacity(self.nodes.len());
		let mut queue = VecDeque::<NodeId>::new();

		queue.push_back(self.root);
		while let Some(id) = queue.pop_front() {
			matches.push(id);
			queue.extend(self.get(id).children().iter().copied());
		}

		matches
	}

	pub fn products(&self) -> Vec<NodeId> {
		self.nodes().into_iter().filter(|id| !self.get(*id).is_group()).collect()
	}

	/// Every group except the root.
	pub fn groups(&self) -> Vec<NodeId> {
		self.nodes().into_iter().filter(|id| *id != self.root && self.get(*id).is_group()).collect()
	}

	pub fn nodes_of_type(&self, registry_type: RegistryType) -> Vec<NodeId> {
		self.nodes().into_iter().filter(|id| self.get(*id).registry_type() == registry_type).collect()
	}

	/// Products supporting the target platform, matched by `filter`.
	fn compatible_products(&self, filter: impl Fn(&RegistryNode, &Product) -> bool) -> Vec<NodeId> {
		self.products().into_iter()
			.filter(|id| {
				let node = self.get(*id);
				node.as_product().is_some_and(|p| p.supports(&self.target_platform) && filter(node, p))
			})
			.collect()
	}

	pub fn products_with_status(&self, status: Status) -> Vec<NodeId> {
		self.compatible_products(|_, p| p.status == status)
	}

	pub fn products_by_uid(&self, uid: &str) -> Vec<NodeId> {
		self.compatible_products(|n, _| n.uid() == uid)
	}

	/// First product in document order with exactly this uid and version.
	pub fn product(&self, uid: &str, version: &Version) -> Option<NodeId> {
		self.compatible_products(|n, p| n.uid() == uid && &p.version == version).into_iter().next()
	}

	pub fn group(&self, uid: &str) -> Option<NodeId> {
		self.groups().into_iter().find(|id| self.get(*id).uid() == uid)
	}

	/// Every product supporting the target platform that matches `dependency`, in document order.
	pub fn resolve(&self, dependency: &Dependency) -> Vec<NodeId> {
		self.compatible_products(|n, _| n.satisfies(dependency))
	}

	/// Checks if any product below `node` is installed.
	pub fn has_installed_children(&self, node: NodeId) -> bool {
		let Some(node) = self.node(node) else { return false };
		node.children().iter().any(|c| {
			self.status(*c) == Some(Status::Installed) || self.has_installed_children(*c)
		})
	}
}
