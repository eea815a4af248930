//! State files record the outcome of a session so it can be replayed on another machine.

use std::collections::BTreeMap;

use serde::*;

use crate::registry::*;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateFile {
	#[serde(default)]
	pub properties: BTreeMap<String, String>,
	#[serde(default)]
	pub components: Vec<StateEntry>,
}

/// The wanted status of one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateEntry {
	pub uid: String,
	pub version: Version,
	pub platforms: Vec<Platform>,
	pub status: Status,
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub properties: BTreeMap<String, String>,
}

impl StateFile {
	/// Loads a state file from a JSON file.
	///
	/// # Errors
	/// - [`IO`](crate::error::Error::IO) when opening or reading from the file.
	/// - [`SerdeJSON`](crate::error::Error::SerdeJSON) when deserializing the file.
	pub fn load_from_disk(path: &std::path::Path) -> crate::Result<Self> {
		let file = std::fs::File::open(path)?;
		Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
	}

	/// Saves the state file to a JSON file.
	///
	/// # Errors
	/// - [`IO`](crate::error::Error::IO) when creating or writing to the file.
	/// - [`SerdeJSON`](crate::error::Error::SerdeJSON) when serializing the file.
	pub fn save_to_disk(&self, path: &std::path::Path) -> crate::Result<()> {
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		let file = std::fs::File::create(path)?;
		serde_json::to_writer_pretty(std::io::BufWriter::new(file), self)?;
		Ok(())
	}
}

impl Registry {
	/// Applies the statuses and properties recorded in `state`.
	///
	/// Only pending statuses are replayed: an install is ignored for installed products and
	/// an uninstall for products that are not installed. Entries for other platforms or unknown
	/// products are skipped.
	pub fn apply_state_file(&mut self, state: &StateFile) -> crate::Result<()> {
		log::info!("Applying state file with {} components", state.components.len());

		self.properties_mut().extend(state.properties.iter().map(|(k, v)| (k.clone(), v.clone())));

		for entry in &state.components {
			if !entry.platforms.iter().any(|p| self.target_platform().is_compatible_with(p)) {
				log::trace!("Skipping {}/{}, not for {}", entry.uid, entry.version, self.target_platform());
				continue;
			}
			let Some(product) = self.product(&entry.uid, &entry.version) else {
				log::debug!("Skipping {}/{}, no such product", entry.uid, entry.version);
				continue;
			};
			let Some(current) = self.status(product) else { continue };

			let applies = match entry.status {
				Status::ToBeInstalled => current != Status::Installed,
				Status::ToBeUninstalled => current != Status::NotInstalled,
				Status::Installed | Status::NotInstalled => false,
			};
			if !applies { continue }

			self.set_status(product, entry.status)?;
			if let Some(data) = self.product_data_mut(product) {
				data.properties.extend(entry.properties.iter().map(|(k, v)| (k.clone(), v.clone())));
			}
		}

		Ok(())
	}

	/// Records the installed and not installed products as the operations that recreate them.
	pub fn state_file(&self) -> StateFile {
		let components = self.products().into_iter()
			.filter_map(|id| {
				let node = self.get(id);
				let product = node.as_product()?;
				if !product.supports(self.target_platform()) { return None }

				let status = match product.status {
					Status::Installed => Status::ToBeInstalled,
					Status::NotInstalled => Status::ToBeUninstalled,
					Status::ToBeInstalled | Status::ToBeUninstalled => return None,
				};
				Some(StateEntry {
					uid: node.uid().to_string(),
					version: product.version.clone(),
					platforms: product.platforms.clone(),
					status,
					properties: product.properties.clone(),
				})
			})
			.collect();

		StateFile {
			properties: self.properties().clone(),
			components,
		}
	}
}
