//! Fixtures and helpers shared by the integration tests
//!
//! functions in this module should use results and not use any panics to avoid confusion in callers

use nbi_rs::registry::*;

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
	#[error("registry error: {0}")]
	Registry(#[from] nbi_rs::Error),
	#[error("IO error: {0}")]
	IO(#[from] std::io::Error),
	#[error("no product `{0}` in the fixture")]
	MissingProduct(String),
}

pub type Result<T> = std::result::Result<T, FixtureError>;

/// Routes `log` output through the test harness, safe to call from every test.
pub fn init_logging() {
	let _ = env_logger::builder().is_test(true).try_init();
}

pub fn version(s: &str) -> Result<Version> {
	Ok(Version::new(s)?)
}

/// A requirement on exactly `version` of `uid`.
pub fn requires_exactly(uid: &str, version: &str) -> Result<Dependency> {
	let v = self::version(version)?;
	Ok(Dependency::requirement(uid, VersionBounds::from_range(Some(v.clone()), Some(v))))
}

pub fn requires_any(uid: &str) -> Dependency {
	Dependency::requirement(uid, VersionBounds::Any)
}

/// First product with `uid` in document order.
pub fn find(registry: &Registry, uid: &str) -> Result<NodeId> {
	registry.products().into_iter()
		.find(|id| registry.node(*id).is_some_and(|n| n.uid() == uid))
		.ok_or_else(|| FixtureError::MissingProduct(uid.to_string()))
}

/// Uids of the given nodes, in order.
pub fn uids(registry: &Registry, ids: &[NodeId]) -> Vec<String> {
	ids.iter().filter_map(|id| registry.node(*id)).map(|n| n.uid().to_string()).collect()
}

/// Group `IDE` holding `base` 1.0 and `plugin` 2.0 requiring exactly base 1.0, both pending installation.
///
/// `plugin` is declared first so document order alone would schedule it wrong.
pub fn ide_registry() -> Result<Registry> {
	let mut registry = Registry::new(Platform::generic());
	let root = registry.root();
	let ide = registry.add_node(root, RegistryNode::group("IDE"))?;

	let plugin = Product::new(version("2.0")?)
		.status(Status::ToBeInstalled)
		.depends(requires_exactly("base", "1.0")?);
	registry.add_node(ide, RegistryNode::product("plugin", plugin))?;

	let base = Product::new(version("1.0")?).status(Status::ToBeInstalled);
	registry.add_node(ide, RegistryNode::product("base", base))?;

	Ok(registry)
}

/// Installed `jre` 1.8 that alone satisfies the requirement of installed `ide` 1.0.
pub fn jre_registry() -> Result<Registry> {
	let mut registry = Registry::new(Platform::generic());
	let root = registry.root();

	let jre = Product::new(version("1.8")?).status(Status::Installed);
	registry.add_node(root, RegistryNode::product("jre", jre))?;

	let ide = Product::new(version("1.0")?)
		.status(Status::Installed)
		.depends(requires_any("jre"));
	registry.add_node(root, RegistryNode::product("ide", ide))?;

	Ok(registry)
}

/// A registry where each `(uid, requirements)` is a generic product at version 1.0 requiring any version of the listed uids.
pub fn requirement_graph(products: &[(&str, &[&str])]) -> Result<Registry> {
	let mut registry = Registry::new(Platform::generic());
	let root = registry.root();

	for (uid, requirements) in products {
		let mut product = Product::new(version("1.0")?);
		for r in *requirements {
			product = product.depends(requires_any(r));
		}
		registry.add_node(root, RegistryNode::product(*uid, product))?;
	}

	Ok(registry)
}

/// A temporary directory removed when dropped.
pub fn temp_dir() -> Result<tempfile::TempDir> {
	Ok(tempfile::tempdir()?)
}

/// Writes `contents` to `name` inside `dir`, returning the full path.
pub fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> Result<std::path::PathBuf> {
	let path = dir.path().join(name);
	std::fs::write(&path, contents)?;
	Ok(path)
}
