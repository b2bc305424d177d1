//! End-to-end heal flow against local git repositories and stubbed model
//! components.

use std::path::{Path, PathBuf};
use std::process::Command;

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use autoheal_core::api::{ApiResult, CompletionProvider, Embedder};
use autoheal_core::{Config, Pipeline, Prompt};

/// Stub provider returning a canned suggestion.
struct FixedProvider(&'static str);

#[async_trait]
impl CompletionProvider for FixedProvider {
    async fn complete(&self, _prompt: &Prompt) -> ApiResult<String> {
        Ok(self.0.to_string())
    }
}

/// Deterministic embedder: byte-fold into a small fixed-size vector.
struct HashEmbedder;

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, texts: &[String]) -> ApiResult<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|text| {
                let mut v = vec![0.0f32; 8];
                for (i, b) in text.bytes().enumerate() {
                    v[i % 8] += f32::from(b) / 255.0;
                }
                v
            })
            .collect())
    }
}

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .expect("spawn git");
    assert!(status.success(), "git {args:?} failed in {}", dir.display());
}

fn init_repo(path: &Path) {
    std::fs::create_dir_all(path).expect("create repo dir");
    git(path, &["init", "-q", "-b", "main"]);
    git(path, &["config", "user.email", "test@example.com"]);
    git(path, &["config", "user.name", "Test"]);
}

fn commit_file(repo: &Path, name: &str, contents: &str, message: &str) {
    std::fs::write(repo.join(name), contents).expect("write file");
    git(repo, &["add", name]);
    git(repo, &["commit", "-q", "-m", message]);
}

/// Builds the three input YAML files, an app-code origin with a commit
/// matching the history keyword, and an automation origin to publish to.
fn setup_workspace(root: &Path) -> Config {
    let mappings_file = root.join("mappings-ios.yaml");
    std::fs::write(
        &mappings_file,
        "- name: us.mappings.item.verifySelectLensesCTA\n  identifier: \"//OldPath\"\n",
    )
    .expect("write mappings");
    let functions_file = root.join("functions.yaml");
    std::fs::write(&functions_file, "- function: tapSelectLenses\n").expect("write functions");
    let test_flow_file = root.join("flow.yaml");
    std::fs::write(&test_flow_file, "- step: verifySelectLensesCTA\n").expect("write flow");

    let app_origin = root.join("app-origin");
    init_repo(&app_origin);
    commit_file(
        &app_origin,
        "LensesView.swift",
        "let title = \"Select lenses\"\n",
        "rename Select lenses CTA",
    );

    let automation_origin = root.join("automation-origin");
    init_repo(&automation_origin);
    commit_file(
        &automation_origin,
        "mappings-ios.yaml",
        "- name: us.mappings.item.verifySelectLensesCTA\n  identifier: \"//OldPath\"\n",
        "seed mappings",
    );

    // Pre-clone both repos so commits made by the pipeline pick up a local
    // committer identity instead of relying on ambient git config.
    let app_clone = root.join("app-clone");
    let automation_clone = root.join("automation-clone");
    for (origin, clone) in [(&app_origin, &app_clone), (&automation_origin, &automation_clone)] {
        git(
            root,
            &[
                "clone",
                "-q",
                &origin.to_string_lossy(),
                &clone.to_string_lossy(),
            ],
        );
        git(clone, &["config", "user.email", "test@example.com"]);
        git(clone, &["config", "user.name", "Test"]);
    }

    Config {
        openai_api_key: "unused".to_string(),
        app_repo_url: app_origin.to_string_lossy().into_owned(),
        app_repo_path: app_clone,
        automation_repo_url: automation_origin.to_string_lossy().into_owned(),
        automation_repo_path: automation_clone,
        mappings_file,
        functions_file,
        test_flow_file,
        ..Config::default()
    }
}

fn rev_parse_ok(repo: &Path, rev: &str) -> bool {
    Command::new("git")
        .args(["rev-parse", "--verify", "--quiet", rev])
        .current_dir(repo)
        .status()
        .expect("spawn git")
        .success()
}

#[tokio::test]
async fn heal_applies_suggested_locator_and_publishes_branch() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config = setup_workspace(tmp.path());

    let pipeline = Pipeline::with_components(
        &config,
        Box::new(FixedProvider("Use //XCUIElementTypeButton[@name='Lenses']")),
        Box::new(HashEmbedder),
    );
    let outcome = pipeline
        .heal("us.mappings.item.verifySelectLensesCTA", None)
        .await
        .expect("heal");

    assert_eq!(outcome.old_identifier.as_deref(), Some("//OldPath"));
    assert_eq!(
        outcome.new_identifier.as_deref(),
        Some("//XCUIElementTypeButton[@name='Lenses']")
    );
    assert!(outcome.applied);
    assert_eq!(outcome.branch, "auto-fix-verifySelectLensesCTA");

    // The local mappings file was rewritten.
    let rewritten = std::fs::read_to_string(&config.mappings_file).expect("read mappings");
    assert!(rewritten.contains("//XCUIElementTypeButton[@name='Lenses']"));
    assert!(!rewritten.contains("//OldPath"));

    // The fix landed on the review branch of the automation origin.
    let origin = PathBuf::from(&config.automation_repo_url);
    assert!(rev_parse_ok(&origin, "auto-fix-verifySelectLensesCTA"));
}

#[tokio::test]
async fn heal_keeps_prior_identifier_when_no_locator_matches() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config = setup_workspace(tmp.path());

    let pipeline = Pipeline::with_components(
        &config,
        Box::new(FixedProvider("Sorry, I could not find a better selector.")),
        Box::new(HashEmbedder),
    );
    let outcome = pipeline
        .heal("us.mappings.item.verifySelectLensesCTA", None)
        .await
        .expect("heal");

    assert!(!outcome.applied);
    assert_eq!(outcome.new_identifier.as_deref(), Some("//OldPath"));
    let kept = std::fs::read_to_string(&config.mappings_file).expect("read mappings");
    assert!(kept.contains("//OldPath"));
}

#[tokio::test]
async fn heal_is_a_noop_for_unknown_mapping_names() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config = setup_workspace(tmp.path());

    let pipeline = Pipeline::with_components(
        &config,
        Box::new(FixedProvider("Use //XCUIElementTypeButton[@name='Lenses']")),
        Box::new(HashEmbedder),
    );
    let outcome = pipeline.heal("us.mappings.item.unknown", None).await.expect("heal");

    assert_eq!(outcome.old_identifier, None);
    // A locator was suggested but there was no record to rewrite.
    assert!(!outcome.applied);
    let unchanged = std::fs::read_to_string(&config.mappings_file).expect("read mappings");
    assert!(unchanged.contains("//OldPath"));
}

#[tokio::test]
async fn rerunning_heal_fails_on_the_existing_branch() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config = setup_workspace(tmp.path());
    let suggestion = "Use //XCUIElementTypeButton[@name='Lenses']";

    let first = Pipeline::with_components(
        &config,
        Box::new(FixedProvider(suggestion)),
        Box::new(HashEmbedder),
    );
    first
        .heal("us.mappings.item.verifySelectLensesCTA", None)
        .await
        .expect("first heal");

    // Branch creation is not idempotent: the second run hits the branch
    // left behind by the first and fails.
    let second = Pipeline::with_components(
        &config,
        Box::new(FixedProvider(suggestion)),
        Box::new(HashEmbedder),
    );
    let err = second
        .heal("us.mappings.item.verifySelectLensesCTA", None)
        .await
        .expect_err("second heal must fail");
    assert!(err.to_string().contains("already exists"), "{err}");
}

#[tokio::test]
async fn validate_runs_generated_patch_under_the_runner() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let mut config = setup_workspace(tmp.path());
    // `cat` echoes the patch file back, standing in for a test runner.
    config.sandbox_runner = "cat".to_string();

    let pipeline = Pipeline::with_components(
        &config,
        Box::new(FixedProvider("def test_login():\n    assert True\n")),
        Box::new(HashEmbedder),
    );
    let outcome = pipeline
        .validate(
            "Test failed on login screen",
            &[
                "Selector changed on login button".to_string(),
                "API schema mismatch on user profile".to_string(),
            ],
        )
        .await
        .expect("validate");

    assert_eq!(outcome.patch, "def test_login():\n    assert True\n");
    assert!(outcome.validation.stdout.contains("def test_login"));
    assert_eq!(outcome.validation.exit_code, Some(0));
}
