//! Integration tests for load_plugins

use glp_logger::DebugLog;
use gulp_load_plugins::{
    load_plugins, Entry, LoadError, LoadOptions, Namespace, PackageManifest,
};
use std::path::Path;
use std::sync::{Arc, Mutex};

type Calls = Arc<Mutex<Vec<String>>>;

/// Options over an in-memory manifest with a loader recording every load
fn options_for(manifest: PackageManifest) -> (LoadOptions<String>, Calls) {
    let calls: Calls = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&calls);
    let loader = move |name: &str, _base: &Path| -> anyhow::Result<String> {
        if let Ok(mut guard) = recorded.lock() {
            guard.push(name.to_string());
        }
        if name.contains("broken") {
            anyhow::bail!("Cannot find module '{}'", name);
        }
        Ok(format!("module:{}", name))
    };
    (LoadOptions::new(loader).with_manifest(manifest), calls)
}

fn load_count(calls: &Calls) -> usize {
    calls.lock().map(|c| c.len()).unwrap_or(usize::MAX)
}

fn deps(names: &[&str]) -> PackageManifest {
    names.iter().fold(PackageManifest::default(), |m, name| {
        m.with_dependency("dependencies", *name, "1.0.0")
    })
}

fn standard_manifest() -> PackageManifest {
    deps(&["gulp-rename", "gulp-concat", "@foo/gulp-bar"])
}

fn loaded(options: LoadOptions<String>) -> Namespace<String> {
    match load_plugins(options) {
        Ok(namespace) => namespace,
        Err(e) => panic!("load_plugins failed: {}", e),
    }
}

#[test]
fn test_default_end_to_end() {
    let (options, calls) = options_for(standard_manifest());
    let plugins = loaded(options);

    assert_eq!(plugins.keys().collect::<Vec<_>>(), vec!["concat", "foo", "rename"]);
    assert_eq!(plugins.require_names(), vec!["concat", "foo.bar", "rename"]);
    assert!(matches!(plugins.get("foo"), Some(Entry::Scope(_))));
    assert!(plugins.binding("concat").is_some_and(|b| b.is_lazy()));
    assert_eq!(load_count(&calls), 0);

    assert_eq!(
        plugins.resolve("foo.bar").map(String::as_str),
        Ok("module:@foo/gulp-bar")
    );
    assert_eq!(
        plugins.plugin("rename").map(String::as_str),
        Ok("module:gulp-rename")
    );
}

#[test]
fn test_explicit_rename() {
    let (options, _) = options_for(standard_manifest());
    let plugins = loaded(options.with_rename("gulp-concat", "merge"));

    assert!(plugins.contains("merge"));
    assert!(!plugins.contains("concat"));
    assert_eq!(
        plugins.plugin("merge").map(String::as_str),
        Ok("module:gulp-concat")
    );
}

#[test]
fn test_dash_and_dot_variants_collide() {
    let (options, calls) = options_for(deps(&["gulp-foo", "gulp.foo"]));
    let result = load_plugins(options);

    match result {
        Err(LoadError::Collision {
            require_name, name, ..
        }) => {
            assert_eq!(require_name, "foo");
            assert_eq!(name, "gulp.foo");
        }
        Err(other) => panic!("expected collision, got {}", other),
        Ok(_) => panic!("expected collision, got a namespace"),
    }
    assert_eq!(load_count(&calls), 0);
}

#[test]
fn test_collision_in_eager_mode_fails_whole_call() {
    let (options, _) = options_for(deps(&["gulp-foo", "gulp.foo"]));
    let result = load_plugins(options.with_lazy(false));
    assert!(matches!(result, Err(LoadError::Collision { .. })));
}

#[test]
fn test_scoped_plugin_with_and_without_scope() {
    let manifest = deps(&["@foo/gulp-bar-baz"]);

    let (options, _) = options_for(manifest.clone());
    let scoped = loaded(options);
    assert!(scoped.scope("foo").is_some_and(|foo| foo.contains("barBaz")));
    assert!(!scoped.contains("barBaz"));

    let (options, _) = options_for(manifest);
    let flat = loaded(options.with_maintain_scope(false));
    assert!(flat.contains("barBaz"));
    assert!(flat.scope("foo").is_none());
}

#[test]
fn test_cross_scope_collision_without_maintain_scope() {
    let (options, _) = options_for(deps(&["gulp-bar", "@foo/gulp-bar"]));
    let result = load_plugins(options.with_maintain_scope(false));

    let Err(err) = result else {
        panic!("expected collision");
    };
    assert!(err.to_string().contains("another scope"), "{}", err);
}

#[test]
fn test_same_name_in_different_scopes_is_fine_with_maintain_scope() {
    let (options, _) = options_for(deps(&["gulp-bar", "@foo/gulp-bar"]));
    let plugins = loaded(options);
    assert_eq!(plugins.require_names(), vec!["bar", "foo.bar"]);
}

#[test]
fn test_scope_name_clashing_with_plugin() {
    // scope object created first, plugin second
    let (options, _) = options_for(deps(&["@foo/gulp-bar", "gulp-foo"]));
    assert!(matches!(
        load_plugins(options),
        Err(LoadError::Collision { ref require_name, .. }) if require_name == "foo"
    ));

    // plugin bound first, scope second
    let manifest = PackageManifest::default()
        .with_dependency("dependencies", "gulp-foo", "1.0.0")
        .with_dependency("devDependencies", "@foo/gulp-bar", "1.0.0");
    let (options, _) = options_for(manifest);
    assert!(matches!(
        load_plugins(options),
        Err(LoadError::Collision { ref require_name, .. }) if require_name == "foo"
    ));
}

#[test]
fn test_lazy_loads_once_on_first_read() {
    let transforms = Arc::new(Mutex::new(0_usize));
    let counted = Arc::clone(&transforms);

    let (options, calls) = options_for(standard_manifest());
    let options = options.with_transform("concat", move |m: String| -> anyhow::Result<String> {
        if let Ok(mut count) = counted.lock() {
            *count += 1;
        }
        Ok(format!("wrapped({})", m))
    });
    let plugins = loaded(options);

    assert_eq!(load_count(&calls), 0);
    assert!(!plugins.is_loaded("concat"));

    let first = plugins.plugin("concat").map(String::clone);
    let second = plugins.plugin("concat").map(String::clone);

    assert_eq!(first, Ok("wrapped(module:gulp-concat)".to_string()));
    assert_eq!(first, second);
    assert!(plugins.is_loaded("concat"));
    assert_eq!(load_count(&calls), 1);
    assert_eq!(transforms.lock().map(|c| *c).unwrap_or(0), 1);
}

#[test]
fn test_eager_loads_everything_up_front() {
    let (options, calls) = options_for(standard_manifest());
    let plugins = loaded(
        options
            .with_lazy(false)
            .with_transform("rename", |m: String| -> anyhow::Result<String> {
                Ok(m.to_uppercase())
            }),
    );

    assert_eq!(load_count(&calls), 3);
    assert!(plugins.binding("concat").is_some_and(|b| !b.is_lazy()));
    assert_eq!(
        plugins.plugin("rename").map(String::as_str),
        Ok("MODULE:GULP-RENAME")
    );
    assert_eq!(load_count(&calls), 3);
}

#[test]
fn test_eager_load_failure_fails_call() {
    let (options, _) = options_for(deps(&["gulp-ok", "gulp-broken"]));
    let result = load_plugins(options.with_lazy(false));
    assert!(matches!(
        result,
        Err(LoadError::ModuleLoad { ref name, .. }) if name == "gulp-broken"
    ));
}

#[test]
fn test_lazy_load_failure_is_deferred_and_cached() {
    let (options, calls) = options_for(deps(&["gulp-ok", "gulp-broken"]));
    let plugins = loaded(options);

    assert_eq!(load_count(&calls), 0);
    assert_eq!(plugins.plugin("ok").map(String::as_str), Ok("module:gulp-ok"));

    let first = plugins.plugin("broken").map(String::clone);
    let second = plugins.plugin("broken").map(String::clone);
    assert!(matches!(first, Err(LoadError::ModuleLoad { .. })));
    assert_eq!(first, second);
    assert_eq!(load_count(&calls), 2);

    let Err(err) = plugins.load_all() else {
        panic!("load_all should report the broken plugin");
    };
    assert!(err.to_string().contains("gulp-broken"));
}

#[test]
fn test_transform_error_surfaces_on_read() {
    let (options, _) = options_for(standard_manifest());
    let plugins = loaded(options.with_transform(
        "concat",
        |_: String| -> anyhow::Result<String> { anyhow::bail!("not a stream factory") },
    ));

    assert_eq!(
        plugins.plugin("concat").map(String::clone),
        Err(LoadError::Transform {
            require_name: "concat".to_string(),
            message: "not a stream factory".to_string(),
        })
    );
    assert!(plugins.plugin("rename").is_ok());
}

#[test]
fn test_pattern_override_and_append() {
    let manifest = deps(&["gulp-concat", "my-plugin-fast", "lodash"]);

    let (options, _) = options_for(manifest.clone());
    let overridden = loaded(options.with_pattern(["my-plugin-*"]));
    assert_eq!(overridden.require_names(), vec!["myPluginFast"]);

    let (options, _) = options_for(manifest);
    let appended = loaded(
        options
            .with_pattern(["my-plugin-*"])
            .with_override_pattern(false),
    );
    assert_eq!(appended.require_names(), vec!["concat", "myPluginFast"]);
}

#[test]
fn test_custom_replace_string_and_prefix() {
    let manifest = deps(&["grunt-contrib-copy", "gulp-concat"]);
    let (options, _) = options_for(manifest);
    let plugins = loaded(options.with_prefix("grunt"));
    assert_eq!(plugins.require_names(), vec!["contribCopy"]);
}

#[test]
fn test_self_is_never_bound() {
    let (options, _) = options_for(deps(&["gulp-load-plugins", "gulp-concat", "lodash"]));
    let plugins = loaded(options.with_pattern(["*"]));

    assert_eq!(plugins.require_names(), vec!["concat", "lodash"]);
    assert!(!plugins.contains("loadPlugins"));
}

#[test]
fn test_scope_option_limits_categories() {
    let manifest = PackageManifest::default()
        .with_dependency("dependencies", "gulp-a", "1.0.0")
        .with_dependency("devDependencies", "gulp-b", "1.0.0")
        .with_dependency("optionalDependencies", "gulp-c", "1.0.0");

    let (options, _) = options_for(manifest.clone());
    assert_eq!(loaded(options).require_names(), vec!["a", "b"]);

    let (options, _) = options_for(manifest);
    let plugins = loaded(options.with_scope(["optionalDependencies"]));
    assert_eq!(plugins.require_names(), vec!["c"]);
}

#[test]
fn test_missing_manifest_aborts_before_binding() {
    let Ok(temp_dir) = tempfile::TempDir::new() else {
        return;
    };
    let (options, calls) = options_for(PackageManifest::default());
    let result = load_plugins(
        options
            .with_base_dir(temp_dir.path())
            .with_config_path("missing/package.json")
            .with_lazy(false),
    );

    assert!(matches!(result, Err(LoadError::MissingManifest(_))));
    assert_eq!(load_count(&calls), 0);
}

#[test]
fn test_invocations_are_independent() {
    let (options, calls) = options_for(standard_manifest());
    let first = loaded(options);
    let (options, _) = options_for(standard_manifest());
    let second = loaded(options.with_rename("gulp-rename", "mv"));

    assert!(first.contains("rename"));
    assert!(second.contains("mv"));
    assert!(first.plugin("concat").is_ok());
    assert!(!second.is_loaded("concat"));
    assert_eq!(load_count(&calls), 1);
}

#[test]
fn test_debug_log_reports_steps() {
    let lines = Arc::new(Mutex::new(Vec::<String>::new()));
    let captured = Arc::clone(&lines);
    let log = DebugLog::disabled().without_stderr().with_sink(move |line| {
        if let Ok(mut guard) = captured.lock() {
            guard.push(line.to_string());
        }
    });

    let (options, _) = options_for(standard_manifest());
    let plugins = loaded(options.with_debug(true).with_log(log));
    assert!(plugins.plugin("concat").is_ok());

    let lines = lines.lock().map(|l| l.clone()).unwrap_or_default();
    let has = |needle: &str| lines.iter().any(|l| l.contains(needle));
    assert!(lines.iter().all(|l| l.starts_with("gulp-load-plugins: ")));
    assert!(has("Debug enabled with options"));
    assert!(has("3 plugin(s) found: @foo/gulp-bar gulp-concat gulp-rename"));
    assert!(has("renaming gulp-concat to concat"));
    assert!(has("lazyload: adding property concat"));
    assert!(has("lazyload: requiring gulp-concat..."));
}

#[test]
fn test_debug_disabled_logs_nothing() {
    let lines = Arc::new(Mutex::new(0_usize));
    let counter = Arc::clone(&lines);
    let log = DebugLog::new(true).without_stderr().with_sink(move |_| {
        if let Ok(mut count) = counter.lock() {
            *count += 1;
        }
    });

    let (options, _) = options_for(standard_manifest());
    let plugins = loaded(options.with_log(log));
    assert!(plugins.plugin("concat").is_ok());
    assert_eq!(lines.lock().map(|c| *c).unwrap_or(usize::MAX), 0);
}
