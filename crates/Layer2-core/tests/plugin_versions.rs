//! 플러그인 스키마 버전별 동작 통합 테스트
//!
//! `cargo test -p hostfacts-core --test plugin_versions`

use hostfacts_core::{
    nameify, Diagnostic, PluginFragment, PluginInstance, PluginRegistry, SchemaVersion, System,
    DEFAULT_PLATFORM,
};
use hostfacts_foundation::{Error, FixedPlatform, ScriptedRunner};
use serde_json::json;
use std::sync::Arc;

fn system(registry: &Arc<PluginRegistry>, platform: &str) -> System {
    System::builder()
        .registry(Arc::clone(registry))
        .platform(Arc::new(FixedPlatform::new(platform)))
        .shell(Arc::new(ScriptedRunner::new()))
        .build()
        .expect("system build failed")
}

fn unsupported(system: &System, operation: &str) -> usize {
    system
        .diagnostics()
        .iter()
        .filter(|d| {
            matches!(d, Diagnostic::UnsupportedOperation { operation: op, .. } if op == operation)
        })
        .count()
}

// ============================================================================
// nameify
// ============================================================================

#[test]
fn test_nameify_keeps_identifiers() {
    assert_eq!(nameify("Name").unwrap(), "Name");
    assert_eq!(nameify("plugin/name").unwrap(), "PluginName");
    assert!(matches!(nameify("::"), Err(Error::InvalidName(_))));
}

// ============================================================================
// version6 (legacy)
// ============================================================================

#[test]
fn test_v6_version() {
    let registry = Arc::new(PluginRegistry::new());
    let definition = registry.load("Test", PluginFragment::v6()).unwrap();
    assert_eq!(definition.version(), SchemaVersion::Version6);
}

#[test]
fn test_v6_provides_registers_instance() {
    let registry = Arc::new(PluginRegistry::new());
    let definition = registry
        .load(
            "Test",
            PluginFragment::v6().collect_contents(|ctx| {
                ctx.provides(&["attr"]);
                Ok(())
            }),
        )
        .unwrap();

    let mut system = system(&registry, "linux");
    let plugin = PluginInstance::new(definition, "");
    plugin.run_plugin(&mut system).unwrap();

    assert!(system.tree().has("attr"));
    assert!(system.tree().providers("attr").contains(plugin.id()));
}

#[test]
fn test_v6_provides_each_instance() {
    let registry = Arc::new(PluginRegistry::new());
    let definition = registry
        .load(
            "Test",
            PluginFragment::v6().collect_contents(|ctx| {
                ctx.provides(&["attr"]);
                Ok(())
            }),
        )
        .unwrap();

    let mut system = system(&registry, "linux");
    let plugin1 = PluginInstance::new(Arc::clone(&definition), "");
    let plugin2 = PluginInstance::new(definition, "");
    plugin1.run_plugin(&mut system).unwrap();
    plugin2.run_plugin(&mut system).unwrap();

    let providers = system.tree().providers("attr");
    assert!(providers.contains(plugin1.id()));
    assert!(providers.contains(plugin2.id()));
}

#[test]
fn test_v6_provides_multi_level() {
    let registry = Arc::new(PluginRegistry::new());
    let definition = registry
        .load(
            "Test",
            PluginFragment::v6().collect_contents(|ctx| {
                ctx.provides(&["attr/subattr"]);
                Ok(())
            }),
        )
        .unwrap();

    let mut system = system(&registry, "linux");
    let plugin = PluginInstance::new(definition, "");
    plugin.run_plugin(&mut system).unwrap();

    assert!(system.tree().has("attr"));
    assert!(system.tree().has("attr/subattr"));
    assert!(system.tree().providers("attr/subattr").contains(plugin.id()));
}

#[test]
fn test_v6_require_plugin_in_order() {
    let registry = Arc::new(PluginRegistry::new());
    for name in ["Some", "Other", "Plugin"] {
        registry
            .load(name, PluginFragment::v6().collect_contents(|_| Ok(())))
            .unwrap();
    }
    registry
        .load(
            "Test",
            PluginFragment::v6().collect_contents(|ctx| {
                ctx.require_plugin(&["some", "other", "plugin"]);
                ctx.set_attribute("after", true);
                Ok(())
            }),
        )
        .unwrap();

    let mut system = system(&registry, "linux");
    system.ensure_plugin("Test");

    assert_eq!(system.run_order(), &["Some", "Other", "Plugin", "Test"]);
    assert_eq!(system.tree().get("after"), Some(json!(true)));
}

#[test]
fn test_v6_redeclaration_logged_once_each() {
    let registry = PluginRegistry::new();
    registry.load("Test", PluginFragment::v6()).unwrap();
    registry.load("Test", PluginFragment::v6()).unwrap();
    assert_eq!(registry.diagnostics().len(), 1);

    registry.load("Test", PluginFragment::v7()).unwrap();
    let duplicates = registry
        .diagnostics()
        .iter()
        .filter(|d| d.is_duplicate_definition())
        .count();
    assert_eq!(duplicates, 2);
}

// ============================================================================
// version7 (current)
// ============================================================================

#[test]
fn test_v7_static_declarations() {
    let registry = PluginRegistry::new();
    let definition = registry
        .load(
            "Test",
            PluginFragment::v7()
                .provides(["attr1"])
                .provides(["attr2", "attr3"])
                .depends(["dep1", "dep2"])
                .collect_data_for(["darwin"], |_| Ok(()))
                .collect_data(|_| Ok(()))
                .collect_data_for(["windows", "aix"], |_| Ok(())),
        )
        .unwrap();

    assert_eq!(definition.version(), SchemaVersion::Version7);
    assert_eq!(definition.provides(), &["attr1", "attr2", "attr3"]);
    assert_eq!(definition.depends(), &["dep1", "dep2"]);
    for platform in ["darwin", DEFAULT_PLATFORM, "windows", "aix"] {
        assert!(definition.has_collector(platform), "missing {}", platform);
    }
}

#[test]
fn test_v7_across_fragments() {
    let registry = PluginRegistry::new();
    registry
        .load(
            "Test",
            PluginFragment::v7()
                .provides(["one"])
                .depends(["one"])
                .collect_data_for(["ubuntu"], |_| Ok(())),
        )
        .unwrap();
    let definition = registry
        .load(
            "Test",
            PluginFragment::v7()
                .provides(["two"])
                .depends(["two"])
                .collect_data_for(["darwin"], |_| Ok(())),
        )
        .unwrap();

    assert_eq!(definition.provides().len(), 2);
    assert_eq!(definition.depends(), &["one", "two"]);
    assert_eq!(definition.platforms().collect::<Vec<_>>(), vec!["darwin", "ubuntu"]);
}

#[test]
fn test_v7_platform_specific_collector() {
    let registry = Arc::new(PluginRegistry::new());
    let definition = registry
        .load(
            "Test",
            PluginFragment::v7()
                .provides(["attr"])
                .collect_data_for(["ubuntu"], |ctx| {
                    ctx.set_attribute("attr", json!({}));
                    Ok(())
                }),
        )
        .unwrap();

    let mut system = system(&registry, "ubuntu");
    PluginInstance::new(definition, "plugin").run_plugin(&mut system).unwrap();
    assert_eq!(system.tree().get("attr"), Some(json!({})));
}

#[test]
fn test_v7_default_collector_fallback() {
    let registry = Arc::new(PluginRegistry::new());
    let definition = registry
        .load(
            "Test",
            PluginFragment::v7()
                .provides(["attr"])
                .collect_data(|ctx| {
                    ctx.set_attribute("attr", "default");
                    Ok(())
                })
                .collect_data_for(["ubuntu"], |ctx| {
                    ctx.set_attribute("attr", "ubuntu");
                    Ok(())
                }),
        )
        .unwrap();

    let mut ubuntu = system(&registry, "ubuntu");
    PluginInstance::new(Arc::clone(&definition), "plugin")
        .run_plugin(&mut ubuntu)
        .unwrap();
    assert_eq!(ubuntu.tree().get("attr"), Some(json!("ubuntu")));

    let mut darwin = system(&registry, "darwin");
    PluginInstance::new(definition, "plugin").run_plugin(&mut darwin).unwrap();
    assert_eq!(darwin.tree().get("attr"), Some(json!("default")));
}

#[test]
fn test_v7_no_matching_collector_writes_nothing() {
    let registry = Arc::new(PluginRegistry::new());
    let definition = registry
        .load(
            "Test",
            PluginFragment::v7()
                .provides(["attr"])
                .collect_data_for(["ubuntu"], |ctx| {
                    ctx.set_attribute("attr", "ubuntu");
                    Ok(())
                }),
        )
        .unwrap();

    let mut system = system(&registry, "darwin");
    PluginInstance::new(definition, "plugin").run_plugin(&mut system).unwrap();
    assert!(system.tree().is_empty());
}

#[test]
fn test_v7_static_provides_provenance() {
    let registry = Arc::new(PluginRegistry::new());
    let definition = registry
        .load(
            "Test",
            PluginFragment::v7()
                .provides(["attr/subattr", "unset"])
                .collect_data(|ctx| {
                    ctx.set_attribute("attr/subattr", "value");
                    Ok(())
                }),
        )
        .unwrap();

    let mut system = system(&registry, "linux");
    let plugin1 = PluginInstance::new(Arc::clone(&definition), "");
    let plugin2 = PluginInstance::new(definition, "");
    plugin1.run_plugin(&mut system).unwrap();
    plugin2.run_plugin(&mut system).unwrap();

    let providers = system.tree().providers("attr/subattr");
    assert!(providers.contains(plugin1.id()));
    assert!(providers.contains(plugin2.id()));
    assert!(!system.tree().has("unset"));
}

#[test]
fn test_v7_provides_only_warns() {
    let registry = Arc::new(PluginRegistry::new());
    let definition = registry
        .load(
            "Test",
            PluginFragment::v7().collect_data(|ctx| {
                ctx.provides(&["attr"]);
                Ok(())
            }),
        )
        .unwrap();

    let mut system = system(&registry, "linux");
    PluginInstance::new(definition, "").run_plugin(&mut system).unwrap();

    assert!(system.tree().is_empty());
    assert_eq!(unsupported(&system, "provides"), 1);
}

#[test]
fn test_v7_require_plugin_only_warns() {
    let registry = Arc::new(PluginRegistry::new());
    registry
        .load(
            "Other",
            PluginFragment::v7().collect_data(|ctx| {
                ctx.set_attribute("other", true);
                Ok(())
            }),
        )
        .unwrap();
    let definition = registry
        .load(
            "Test",
            PluginFragment::v7().collect_data(|ctx| {
                ctx.require_plugin(&["other"]);
                Ok(())
            }),
        )
        .unwrap();

    let mut system = system(&registry, "linux");
    PluginInstance::new(definition, "").run_plugin(&mut system).unwrap();

    assert!(system.tree().is_empty());
    assert!(system.run_order().is_empty());
    assert_eq!(unsupported(&system, "require_plugin"), 1);
}

// ============================================================================
// 공통 (두 버전 모두)
// ============================================================================

#[test]
fn test_instance_common_behavior() {
    for fragment in [PluginFragment::v6(), PluginFragment::v7()] {
        let registry = Arc::new(PluginRegistry::new());
        let fragment = fragment.collect_data(|ctx| {
            ctx.set_attribute("guns_n_roses", "chinese democracy");
            ctx.set_attribute("tea", "is soothing");
            Ok(())
        });
        let definition = registry.load("Test", fragment).unwrap();

        let mut system = system(&registry, "linux");
        let mut plugin = PluginInstance::new(definition, "/tmp/plugins/test");
        assert_eq!(plugin.source(), "/tmp/plugins/test");
        assert!(!plugin.has_run());

        plugin.run(&mut system).unwrap();
        assert!(plugin.has_run());
        assert_eq!(
            system.tree().get("guns_n_roses"),
            Some(json!("chinese democracy"))
        );
        assert_eq!(system.tree().get("tea"), Some(json!("is soothing")));
        assert!(!system.tree().has("alice in chains"));
    }
}
