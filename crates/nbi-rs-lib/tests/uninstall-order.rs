use nbi_rs::registry::*;
use nbi_rs_test_utils::*;

#[test]
fn closure_of_runtime_holds_ide() -> Result<()> {
	let registry = jre_registry()?;
	let jre = find(&registry, "jre")?;
	let ide = find(&registry, "ide")?;

	let closure = registry.unavoidable_dependents(jre);
	assert!(closure.contains(&ide));
	assert_eq!(closure, registry.unavoidable_dependents(jre));
	Ok(())
}

#[test]
fn uninstall_refuses_runtime_still_needed() -> Result<()> {
	init_logging();
	let mut registry = jre_registry()?;
	let jre = find(&registry, "jre")?;
	registry.set_status(jre, Status::ToBeUninstalled)?;

	let ide = find(&registry, "ide")?;
	assert!(!registry.can_uninstall_next(jre, &[]));
	assert!(matches!(
		registry.products_to_uninstall(),
		Err(nbi_rs::Error::SchedulingInconsistency { pending }) if pending == vec!["jre/1.8".to_string()]
	));
	assert_eq!(registry.status(ide), Some(Status::Installed));
	Ok(())
}

#[test]
fn uninstall_cascade_removes_dependents_first() -> Result<()> {
	init_logging();
	let mut registry = jre_registry()?;
	let jre = find(&registry, "jre")?;

	registry.mark_for_uninstall(jre)?;
	let order = registry.products_to_uninstall()?;
	assert_eq!(uids(&registry, &order), vec!["ide", "jre"]);
	Ok(())
}

#[test]
fn uninstall_ignores_dependents_not_installed() -> Result<()> {
	let mut registry = jre_registry()?;
	let jre = find(&registry, "jre")?;
	let ide = find(&registry, "ide")?;
	registry.set_status(ide, Status::NotInstalled)?;
	registry.set_status(jre, Status::ToBeUninstalled)?;

	assert_eq!(registry.products_to_uninstall()?, vec![jre]);
	Ok(())
}

#[test]
fn uninstall_gate_admits_every_candidate() -> Result<()> {
	let mut registry = jre_registry()?;
	assert!(registry.check_dependencies_for_uninstall());

	for id in registry.products() {
		registry.set_status(id, Status::ToBeUninstalled)?;
	}
	assert!(registry.check_dependencies_for_uninstall());
	assert_eq!(registry.products_to_uninstall()?.len(), 2);
	Ok(())
}

#[test]
fn uninstall_order_is_deterministic() -> Result<()> {
	let mut registry = requirement_graph(&[("a", &["b"]), ("b", &["c"]), ("c", &[]), ("d", &["c"])])?;
	for id in registry.products() {
		registry.set_status(id, Status::ToBeUninstalled)?;
	}

	let order = registry.products_to_uninstall()?;
	assert_eq!(uids(&registry, &order), vec!["a", "b", "d", "c"]);
	assert_eq!(order, registry.products_to_uninstall()?);
	Ok(())
}
