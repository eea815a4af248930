use serde::*;
use super::*;

/// Index of a node inside its [`Registry`].
///
/// Ids are only meaningful for the registry that handed them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(super) usize);

/// Where a node was first loaded from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegistryType {
	#[default] Local,
	Bundled,
	Remote,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
	/// A pure container.
	Group,
	Product(Product),
}

/// A group or product in the registry tree.
#[derive(Debug, Clone)]
pub struct RegistryNode {
	uid: String,
	pub display_name: String,
	pub description: String,
	offset: i64,
	visible: bool,
	registry_type: RegistryType,
	pub(super) parent: Option<NodeId>,
	pub(super) children: Vec<NodeId>,
	kind: NodeKind,
}

impl RegistryNode {
	fn new(uid: impl Into<String>, kind: NodeKind) -> Self {
		let uid = uid.into();
		Self {
			display_name: uid.clone(),
			uid,
			description: Default::default(),
			offset: 0,
			visible: true,
			registry_type: Default::default(),
			parent: None,
			children: Default::default(),
			kind,
		}
	}

	pub fn group(uid: impl Into<String>) -> Self {
		Self::new(uid, NodeKind::Group)
	}

	pub fn product(uid: impl Into<String>, product: Product) -> Self {
		Self::new(uid, NodeKind::Product(product))
	}

	/// Nodes with a lower offset sort before their siblings.
	pub fn with_offset(mut self, offset: i64) -> Self {
		self.offset = offset;
		self
	}

	pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
		self.display_name = display_name.into();
		self
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = description.into();
		self
	}

	pub fn with_registry_type(mut self, registry_type: RegistryType) -> Self {
		self.registry_type = registry_type;
		self
	}

	pub fn uid(&self) -> &str {
		&self.uid
	}

	pub fn offset(&self) -> i64 {
		self.offset
	}

	pub fn is_visible(&self) -> bool {
		self.visible
	}

	pub fn set_visible(&mut self, visible: bool) {
		self.visible = visible;
	}

	pub fn registry_type(&self) -> RegistryType {
		self.registry_type
	}

	pub fn parent(&self) -> Option<NodeId> {
		self.parent
	}

	pub fn children(&self) -> &[NodeId] {
		&self.children
	}

	pub fn kind(&self) -> &NodeKind {
		&self.kind
	}

	pub fn is_group(&self) -> bool {
		matches!(self.kind, NodeKind::Group)
	}

	pub fn as_product(&self) -> Option<&Product> {
		match &self.kind {
			NodeKind::Product(p) => Some(p),
			NodeKind::Group => None,
		}
	}

	pub fn as_product_mut(&mut self) -> Option<&mut Product> {
		match &mut self.kind {
			NodeKind::Product(p) => Some(p),
			NodeKind::Group => None,
		}
	}

	/// Checks if this node is a product matching `dependency`.
	pub fn satisfies(&self, dependency: &Dependency) -> bool {
		self.as_product().is_some_and(|p| dependency.is_satisfied_by(&self.uid, &p.version))
	}

	/// `uid/version` for products, `uid` for groups.
	pub fn key(&self) -> String {
		match &self.kind {
			NodeKind::Product(p) => format!("{}/{}", self.uid, p.version),
			NodeKind::Group => self.uid.clone(),
		}
	}
}
