//! Registry documents: the serialized form registries are shipped and merged in.

use std::collections::BTreeMap;

use serde::*;

use crate::registry::*;

/// A tree of components plus registry wide properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryDocument {
	#[serde(default)]
	pub properties: BTreeMap<String, String>,
	#[serde(default)]
	pub components: Vec<ComponentEntry>,
}

/// A group, or a product when `product` is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentEntry {
	pub uid: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub display_name: Option<String>,
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub description: String,
	#[serde(default)]
	pub offset: i64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub product: Option<Product>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub children: Vec<ComponentEntry>,
}

impl ComponentEntry {
	pub fn group(uid: impl Into<String>) -> Self {
		Self {
			uid: uid.into(),
			display_name: None,
			description: Default::default(),
			offset: 0,
			product: None,
			children: Default::default(),
		}
	}

	pub fn product(uid: impl Into<String>, product: Product) -> Self {
		Self { product: Some(product), ..Self::group(uid) }
	}

	pub fn with_children(mut self, children: Vec<ComponentEntry>) -> Self {
		self.children = children;
		self
	}

	fn to_node(&self, registry_type: RegistryType) -> RegistryNode {
		let node = match &self.product {
			Some(product) => RegistryNode::product(&self.uid, product.clone()),
			None => RegistryNode::group(&self.uid),
		};
		let display_name = self.display_name.clone().unwrap_or_else(|| self.uid.clone());
		node.with_offset(self.offset)
			.with_display_name(display_name)
			.with_description(self.description.clone())
			.with_registry_type(registry_type)
	}
}

impl RegistryDocument {
	/// Loads a document from a JSON file.
	///
	/// # Errors
	/// - [`IO`](crate::error::Error::IO) when opening or reading from the file.
	/// - [`SerdeJSON`](crate::error::Error::SerdeJSON) when deserializing the file.
	pub fn load_from_disk(path: &std::path::Path) -> crate::Result<Self> {
		let file = std::fs::File::open(path)?;
		Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
	}

	/// Saves the document to a JSON file.
	///
	/// # Errors
	/// - [`IO`](crate::error::Error::IO) when creating or writing to the file.
	/// - [`SerdeJSON`](crate::error::Error::SerdeJSON) when serializing the file.
	pub fn save_to_disk(&self, path: &std::path::Path) -> crate::Result<()> {
		let file = std::fs::File::create(path)?;
		serde_json::to_writer_pretty(std::io::BufWriter::new(file), self)?;
		Ok(())
	}
}

impl Registry {
	/// Merges a document into the tree.
	///
	/// Products already present with the same uid and version and an intersecting platform are kept
	/// and moved under the document's parent. Groups are matched by uid and keep their place, the
	/// document's children are merged into them. Everything else is added.
	/// Returns the nodes that were added.
	pub fn merge_document(&mut self, document: &RegistryDocument, registry_type: RegistryType) -> crate::Result<Vec<NodeId>> {
		log::info!("Merging {:?} registry document with {} top level components", registry_type, document.components.len());

		self.properties_mut().extend(document.properties.iter().map(|(k, v)| (k.clone(), v.clone())));

		let mut added = Vec::new();
		let root = self.root();
		self.merge_entries(root, &document.components, registry_type, &mut added)?;
		Ok(added)
	}

	/// Reads a document from disk and merges it, see [`Registry::merge_document`].
	pub fn load_document(&mut self, path: &std::path::Path, registry_type: RegistryType) -> crate::Result<Vec<NodeId>> {
		let document = RegistryDocument::load_from_disk(path)?;
		self.merge_document(&document, registry_type)
	}

	fn merge_entries(&mut self, parent: NodeId, entries: &[ComponentEntry], registry_type: RegistryType, added: &mut Vec<NodeId>) -> crate::Result<()> {
		for entry in entries {
			/* Looked up per entry so a repeated entry merges into the node added for the first one */
			let id = match self.find_existing(entry) {
				Some(id) => {
					/* Existing groups stay where they are, only products follow the document */
					if entry.product.is_some() && self.get(id).parent() != Some(parent) {
						log::debug!("Moving {} under {}", self.key(id), self.key(parent));
						self.add_child(parent, id)?;
					}
					id
				},
				None => {
					let id = self.add_node(parent, entry.to_node(registry_type))?;
					log::trace!("Added {}", self.key(id));
					added.push(id);
					id
				},
			};

			self.merge_entries(id, &entry.children, registry_type, added)?;
		}

		Ok(())
	}

	fn find_existing(&self, entry: &ComponentEntry) -> Option<NodeId> {
		match &entry.product {
			Some(product) => self.products().into_iter().find(|id| {
				let node = self.get(*id);
				node.uid() == entry.uid && node.as_product().is_some_and(|existing| {
					existing.version == product.version
						&& existing.platforms.iter().any(|e| product.platforms.iter().any(|p| Platform::intersects(e, p)))
				})
			}),
			None => self.group(&entry.uid),
		}
	}

	/// Exports the nodes matching `predicate`, along with the groups and products holding them.
	pub fn to_document(&self, predicate: impl Fn(&RegistryNode) -> bool) -> RegistryDocument {
		RegistryDocument {
			properties: self.properties().clone(),
			components: self.export_children(self.root(), &predicate),
		}
	}

	fn export_children(&self, parent: NodeId, predicate: &impl Fn(&RegistryNode) -> bool) -> Vec<ComponentEntry> {
		self.get(parent).children().iter().filter_map(|id| {
			let node = self.get(*id);
			let children = self.export_children(*id, predicate);
			let selected = !node.is_group() && predicate(node);
			if !selected && children.is_empty() {
				return None
			}

			Some(ComponentEntry {
				uid: node.uid().to_string(),
				display_name: Some(node.display_name.clone()),
				description: node.description.clone(),
				offset: node.offset(),
				product: node.as_product().cloned(),
				children,
			})
		}).collect()
	}
}
