//! Scenario tests for template assertions

use std::{fs, path::PathBuf};

use serde_json::Value;
use tempfile::TempDir;
use tmplassert_engine::{AssertionError, HarnessConfig, Supplemental, TemplateAssertion};
use tmplassert_model::{CollectionResolver, ModelError, ResolverRegistry};

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn file(&self, name: &str, text: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, text).unwrap();
        path
    }
}

fn assertion() -> TemplateAssertion {
    let registry = ResolverRegistry::new()
        .with(CollectionResolver::<Value>::new("services"))
        .with(CollectionResolver::<Value>::new("datasources"));
    let config = HarnessConfig::default().with_project_model_file(None);
    TemplateAssertion::with_config(registry, config).unwrap()
}

#[test]
fn test_exact_match_passes() {
    let fixture = Fixture::new();
    let model = fixture.file("model.yml", "services:\n  - name: Orders\n");
    let template = fixture.file("service.hbs", "service: {{services.0.name}}\n");
    let expected = fixture.file("expected.txt", "service: Orders\n");

    let mut assertion = assertion();
    assertion.with_model([model]).unwrap().with_template(template);

    assertion.assert_same_content(&expected);
}

#[test]
fn test_exact_match_failure_names_both_values() {
    let fixture = Fixture::new();
    let model = fixture.file("model.yml", "services:\n  - name: Orders\n");
    let template = fixture.file("service.hbs", "service: {{services.0.name}}\n");
    let expected = fixture.file("expected.txt", "service: Users\n");

    let mut assertion = assertion();
    assertion.with_model([model]).unwrap().with_template(template);

    let err = assertion
        .check_same_content(&expected, |_| Supplemental::new())
        .unwrap_err();
    assert!(err.is_assertion_failure());
    let message = err.to_string();
    assert!(message.contains("Orders"));
    assert!(message.contains("Users"));
}

#[test]
fn test_exact_match_ignores_doc_comments() {
    let fixture = Fixture::new();
    let template = fixture.file(
        "service.hbs",
        "/**\n * Generated service.\n */\nclass {{services.[0].name}} {}\n",
    );
    let expected = fixture.file(
        "expected.txt",
        "/** Hand-written description */\nclass Orders {}\n\n",
    );

    let mut assertion = assertion();
    assertion
        .with_model_text("services:\n  - name: Orders\n")
        .unwrap()
        .with_template(template);

    assertion.assert_same_content(&expected);
}

#[test]
fn test_containment_ignores_indentation() {
    let fixture = Fixture::new();
    let template = fixture.file("lines.hbs", "  line1\n    line2\n");

    let mut assertion = assertion();
    assertion.with_model_text("{}").unwrap().with_template(template);

    assertion.assert_contains("line1\nline2");
    let err = assertion
        .check_contains("line2\nline1", |_| Supplemental::new())
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("should be included in the following generated code"));
    assert!(message.contains("line1"));
}

#[test]
fn test_missing_model_file_is_load_error() {
    let fixture = Fixture::new();
    let missing = fixture.dir.path().join("absent.yml");

    let mut assertion = assertion();
    let err = assertion.with_model([missing.clone()]).unwrap_err();
    match err {
        AssertionError::Model(ref model_err) => {
            assert!(model_err.is_load_error());
            assert_eq!(model_err.path(), Some(missing.as_path()));
        }
        ref other => panic!("expected load error, got {:?}", other),
    }
    assert!(err.to_string().contains("absent.yml"));

    let after = assertion.model().unwrap_err();
    assert!(matches!(
        after,
        AssertionError::Model(ModelError::BuildSequence(_))
    ));
}

#[test]
fn test_missing_collection_renders_empty() {
    let fixture = Fixture::new();
    let template = fixture.file(
        "datasources.hbs",
        "{{#each datasources}}datasource {{name}}\n{{/each}}",
    );
    let expected = fixture.file("expected.txt", "");

    let mut assertion = assertion();
    assertion
        .with_model_text("services:\n  - name: Orders\n")
        .unwrap()
        .with_template(template);

    let model = assertion.model().unwrap();
    assert_eq!(model.value("datasources"), Some(&Value::Array(Vec::new())));
    assertion.assert_same_content(&expected);
}

#[test]
fn test_supplemental_shadows_model_for_one_call() {
    let fixture = Fixture::new();
    let template = fixture.file("service.hbs", "service: {{services.[0].name}}\n");

    let mut assertion = assertion();
    assertion
        .with_model_text("services:\n  - name: Orders\n")
        .unwrap()
        .with_template(template);

    assertion.assert_contains_with("service: Users", |_| {
        Supplemental::new().with("services", serde_json::json!([{"name": "Users"}]))
    });
    // The next call sees the model again
    assertion.assert_contains("service: Orders");
}

#[test]
fn test_scratch_file_removed_on_drop() {
    let mut assertion = assertion();
    assertion.with_model_text("services: []\n").unwrap();
    let scratch = assertion.context().unwrap().model_files()[0].clone();
    assert!(scratch.exists());
    let name = scratch.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("tmplassert-model-"));
    assert!(name.ends_with(".yml"));

    drop(assertion);
    assert!(!scratch.exists());
}

#[test]
fn test_malformed_model_reports_path() {
    let fixture = Fixture::new();
    let model = fixture.file("bad.yml", "services: [unclosed\n");

    let mut assertion = assertion();
    let err = assertion.with_model([model]).unwrap_err();
    assert!(matches!(
        err,
        AssertionError::Model(ModelError::Malformed { .. })
    ));
    assert!(err.to_string().contains("bad.yml"));
}
