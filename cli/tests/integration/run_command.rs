//! Integration tests for `autoinit run` — end-to-end against real files,
//! scripts and the staged state directory, fully sandboxed through the
//! `AUTOINIT_*` environment overrides.

#![allow(clippy::expect_used)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

struct Sandbox {
    _dir: tempfile::TempDir,
    root: PathBuf,
}

impl Sandbox {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path().to_path_buf();
        Self { _dir: dir, root }
    }

    fn state(&self) -> PathBuf {
        self.root.join("state")
    }

    fn autoinit(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("autoinit"));
        cmd.env("NO_COLOR", "1");
        cmd.env("AUTOINIT_DIR", self.state());
        cmd.env("AUTOINIT_INSTALL_INF", self.root.join("install.inf"));
        cmd.env("AUTOINIT_HOOKS", self.root.join("hooks"));
        cmd.env("AUTOINIT_PRODUCTS", self.root.join("products.yaml"));
        cmd
    }

    fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(&path, content).expect("write fixture");
        path
    }
}

fn file_uri(path: &Path) -> String {
    format!("file://{}", path.display())
}

#[test]
fn run_prepares_the_system_end_to_end() {
    let sandbox = Sandbox::new();
    let profile = sandbox.write(
        "profile.yaml",
        "general: {}\nsoftware:\n  products:\n    - orchid\n",
    );
    sandbox.write("products.yaml", "- name: orchid\n  display_name: Orchid Linux\n");

    sandbox
        .autoinit()
        .args(["run", "--yes", "--profile", &file_uri(&profile)])
        .assert()
        .success()
        .stdout(predicate::str::contains("system prepared"));

    assert!(sandbox.state().join("staged.yaml").exists());
    // The validated profile is published for operator inspection.
    assert!(sandbox.state().join("autoinst.yaml").exists());
}

#[test]
fn run_converges_after_a_pre_script_rewrite() {
    let sandbox = Sandbox::new();
    let marker = sandbox.state().join("marker");
    let modified = sandbox.state().join("modified.yaml");
    // The pre-script rewrites the profile exactly once, then stabilizes.
    let profile_text = format!(
        "software:\n  products:\n    - orchid\n\
scripts:\n  pre-scripts:\n    - filename: rewrite.sh\n      source: |\n        \
if [ ! -f {marker} ]; then\n          \
touch {marker}\n          \
printf 'networking: {{}}\\nsoftware:\\n  products:\\n    - orchid\\n' > {modified}\n        \
fi\n",
        marker = marker.display(),
        modified = modified.display()
    );
    let profile = sandbox.write("profile.yaml", &profile_text);
    sandbox.write("products.yaml", "- name: orchid\n");

    sandbox
        .autoinit()
        .args(["run", "--yes", "--profile", &file_uri(&profile)])
        .assert()
        .success();

    let staged = std::fs::read_to_string(sandbox.state().join("staged.yaml"))
        .expect("staged profile");
    assert!(staged.contains("networking"), "rewrite was adopted: {staged}");
    // The adopted rewrite was consumed, not left behind.
    assert!(!modified.exists());
}

#[test]
fn run_substitutes_ask_defaults_in_non_interactive_mode() {
    let sandbox = Sandbox::new();
    let profile = sandbox.write(
        "profile.yaml",
        "general:\n  ask-list:\n    - question: 'Which product?'\n      type: text\n      default: bramble\n      path: 'software,products,0'\nsoftware:\n  products:\n    - orchid\n",
    );
    sandbox.write("products.yaml", "- name: bramble\n");

    sandbox
        .autoinit()
        .args(["run", "--yes", "--profile", &file_uri(&profile)])
        .assert()
        .success();

    let staged = std::fs::read_to_string(sandbox.state().join("staged.yaml"))
        .expect("staged profile");
    assert!(staged.contains("bramble"), "default was substituted: {staged}");
}

#[test]
fn run_honors_the_restart_sentinel() {
    let sandbox = Sandbox::new();
    let profile = sandbox.write(
        "profile.yaml",
        "general: {}\nsoftware:\n  products:\n    - orchid\n",
    );
    sandbox.write("products.yaml", "- name: orchid\n");
    sandbox.write("state/restart", "");

    sandbox
        .autoinit()
        .args(["run", "--yes", "--profile", &file_uri(&profile)])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("restart requested"));
}

#[test]
fn run_without_a_base_product_aborts_with_the_catalog() {
    let sandbox = Sandbox::new();
    let profile = sandbox.write("profile.yaml", "general: {}\n");
    // No products.yaml: the media offers nothing.

    sandbox
        .autoinit()
        .args(["run", "--yes", "--profile", &file_uri(&profile)])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No installable base product"))
        .stderr(predicate::str::contains("(none)"));
}

#[test]
fn run_with_an_invalid_profile_aborts() {
    let sandbox = Sandbox::new();
    let profile = sandbox.write("profile.yaml", "a: [unclosed\n");

    sandbox
        .autoinit()
        .args(["run", "--yes", "--profile", &file_uri(&profile)])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("parsing the profile"));
}

#[test]
fn run_without_any_profile_source_gives_up_non_interactively() {
    let sandbox = Sandbox::new();

    sandbox
        .autoinit()
        .args(["run", "--yes"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("could not retrieve the profile"));
}

#[test]
fn run_picks_up_the_boot_record_address() {
    let sandbox = Sandbox::new();
    let profile = sandbox.write(
        "profile.yaml",
        "general: {}\nsoftware:\n  products:\n    - orchid\n",
    );
    sandbox.write("products.yaml", "- name: orchid\n");
    sandbox.write(
        "install.inf",
        &format!("Keyboard: us\nAutoProfile: {}\n", file_uri(&profile)),
    );

    sandbox.autoinit().args(["run", "--yes"]).assert().success();
}
