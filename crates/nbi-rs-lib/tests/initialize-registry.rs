use nbi_rs::config::*;
use nbi_rs::document::*;
use nbi_rs::registry::*;
use nbi_rs::state::*;
use nbi_rs::validation::*;
use nbi_rs::RegistryOptions;
use nbi_rs_test_utils::*;

fn options() -> Result<RegistryOptions> {
	let mut options = RegistryOptions::default();
	options.set_target_platform(Platform::new("linux-x64")?);
	Ok(options)
}

fn documents() -> Result<(RegistryDocument, RegistryDocument)> {
	let local = RegistryDocument {
		properties: Default::default(),
		components: vec![
			ComponentEntry::product("jre", Product::new(version("1.8")?).platforms([Platform::new("linux")?]).status(Status::Installed)),
		],
	};
	let remote = RegistryDocument {
		properties: Default::default(),
		components: vec![
			ComponentEntry::product("jre", Product::new(version("1.8")?).platforms([Platform::new("linux-x64")?])),
			ComponentEntry::product("ide", Product::new(version("1.0")?).depends(requires_any("jre"))),
			ComponentEntry::product("win-tool", Product::new(version("1.0")?).platforms([Platform::new("windows")?])),
		],
	};
	Ok((local, remote))
}

#[test]
fn initialize_applies_install_intent_to_visible_products() -> Result<()> {
	init_logging();
	let mut options = options()?;
	options.set_suggest_install(true);
	let (local, remote) = documents()?;

	let mut registry = Registry::from_documents(&options, [(&local, RegistryType::Local), (&remote, RegistryType::Remote)], None)?;
	assert_eq!(registry.products().len(), 3);

	let findings = registry.initialize(&options, None)?;
	assert!(findings.is_empty());

	assert_eq!(registry.status(find(&registry, "jre")?), Some(Status::Installed));
	assert_eq!(registry.status(find(&registry, "ide")?), Some(Status::ToBeInstalled));
	assert_eq!(registry.status(find(&registry, "win-tool")?), Some(Status::NotInstalled));
	assert_eq!(uids(&registry, &registry.products_to_install()?), vec!["ide"]);
	Ok(())
}

#[test]
fn initialize_with_state_file_ignores_intent() -> Result<()> {
	let mut options = options()?;
	options.set_force_install(true);
	let (local, remote) = documents()?;
	let mut registry = Registry::from_documents(&options, [(&local, RegistryType::Local), (&remote, RegistryType::Remote)], None)?;

	let state = StateFile {
		properties: Default::default(),
		components: vec![StateEntry {
			uid: "jre".to_string(),
			version: version("1.8")?,
			platforms: vec![Platform::new("linux")?],
			status: Status::ToBeUninstalled,
			properties: Default::default(),
		}],
	};
	registry.initialize(&options, Some(&state))?;

	assert_eq!(registry.status(find(&registry, "jre")?), Some(Status::ToBeUninstalled));
	assert_eq!(registry.status(find(&registry, "ide")?), Some(Status::NotInstalled));
	Ok(())
}

#[test]
fn initialize_honours_unsatisfiable_policy() -> Result<()> {
	let mut options = options()?;
	let broken = RegistryDocument {
		properties: Default::default(),
		components: vec![ComponentEntry::product("ide", Product::new(version("1.0")?).depends(requires_any("jre")))],
	};

	let mut registry = Registry::from_documents(&options, [(&broken, RegistryType::Bundled)], None)?;
	assert!(matches!(registry.initialize(&options, None), Err(nbi_rs::Error::UnsatisfiedRequirements(f)) if f.len() == 1));

	options.set_unsatisfiable(UnsatisfiablePolicy::HideProduct);
	options.set_suggest_install(true);
	let findings = registry.initialize(&options, None)?;
	assert_eq!(findings.len(), 1);

	let ide = find(&registry, "ide")?;
	assert!(!registry.node(ide).is_some_and(|n| n.is_visible()));
	assert_eq!(registry.status(ide), Some(Status::NotInstalled));
	Ok(())
}

#[test]
fn initialize_narrows_to_target_component() -> Result<()> {
	let mut options = options()?;
	options.set_target_component(Some(TargetComponent::new("jre", version("1.8")?)));
	options.set_suggest_uninstall(true);
	let (local, remote) = documents()?;
	let mut registry = Registry::from_documents(&options, [(&local, RegistryType::Local), (&remote, RegistryType::Remote)], None)?;

	registry.initialize(&options, None)?;
	let jre = find(&registry, "jre")?;
	assert_eq!(registry.status(jre), Some(Status::ToBeUninstalled));
	assert_eq!(registry.products_to_uninstall()?, vec![jre]);
	Ok(())
}

fn broken_jre(node: &RegistryNode) -> nbi_rs::Result<Option<String>> {
	Ok((node.uid() == "jre").then(|| "bin/java is missing".to_string()))
}

#[test]
fn loading_reports_damaged_installation() -> Result<()> {
	let options = options()?;
	let (local, remote) = documents()?;

	let loaded = Registry::from_documents(&options, [(&local, RegistryType::Local), (&remote, RegistryType::Remote)], Some(&broken_jre));
	assert!(matches!(loaded, Err(nbi_rs::Error::CorruptedInstallation { product, .. }) if product == "jre/1.8"));
	Ok(())
}

#[test]
fn loading_forgets_damaged_installation_when_silent() -> Result<()> {
	let mut options = options()?;
	options.set_remove_corrupted_silently(true);
	let (local, remote) = documents()?;

	let registry = Registry::from_documents(&options, [(&local, RegistryType::Local), (&remote, RegistryType::Remote)], Some(&broken_jre))?;
	/* The local copy is dropped before the remote one is merged, which then comes in fresh */
	let jre = find(&registry, "jre")?;
	assert_eq!(registry.status(jre), Some(Status::NotInstalled));
	assert_eq!(registry.get(jre).registry_type(), RegistryType::Remote);
	assert_eq!(registry.products().len(), 3);
	Ok(())
}

#[test]
fn options_load_from_disk() -> Result<()> {
	let dir = temp_dir()?;
	let path = write_file(&dir, "options.json", r#"{ "target_platform": "windows-x86", "suggest_uninstall": true, "missing_target": "hide-all" }"#)?;

	let options = RegistryOptions::load_from_disk(&path)?;
	assert_eq!(options.target_platform().to_string(), "windows-x86");
	assert!(options.uninstall_intent());
	assert_eq!(options.missing_target(), MissingTargetPolicy::HideAll);
	assert!(options.target_component().is_none());
	Ok(())
}
