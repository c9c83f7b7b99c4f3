//! End-to-end tests running the `kowo-gen` binary.
#![allow(
    unfulfilled_lint_expectations,
    reason = "clippy::expect_used is denied globally; tests may not hit those branches"
)]
#![expect(clippy::expect_used, reason = "test panics are acceptable")]

use assert_cmd::Command;
use rstest::{fixture, rstest};
use test_helpers::fs::TempWorkspace;
use test_helpers::symbols::{nested_model, self_nesting_model};

#[fixture]
fn workspace() -> TempWorkspace {
    TempWorkspace::new().expect("create workspace")
}

fn kowo_gen(workspace: &TempWorkspace) -> Command {
    #[expect(deprecated, reason = "cargo_bin is the standard assert_cmd API")]
    let mut cmd = Command::cargo_bin("kowo-gen").expect("binary should exist");
    cmd.current_dir(workspace.root());
    cmd.env("RUST_BACKTRACE", "0");
    cmd.env_remove("RUST_LOG");
    cmd
}

#[rstest]
fn generates_wrapper_from_symbol_dump(workspace: TempWorkspace) -> anyhow::Result<()> {
    workspace.write("symbols.json", &nested_model())?;
    kowo_gen(&workspace)
        .args(["--symbols", "symbols.json", "--out-dir", "gen"])
        .assert()
        .success();
    let source = workspace.read("gen/kotlin/dev/example/ModelConfig.kt")?;
    assert!(source.contains("inner class Sub(private val parentKey: Option.Key)"));
    assert!(workspace.path("gen/deps/dev.example.ModelConfig.json").is_file());
    Ok(())
}

#[rstest]
fn config_file_supplies_defaults(workspace: TempWorkspace) -> anyhow::Result<()> {
    workspace.write("model/symbols.json", &nested_model())?;
    workspace.write(
        "kowo-gen.toml",
        "symbols = \"model/symbols.json\"\nsources_dir = \"src-gen\"\n",
    )?;
    kowo_gen(&workspace).assert().success();
    assert!(workspace.path("src-gen/dev/example/ModelConfig.kt").is_file());
    Ok(())
}

#[rstest]
fn error_diagnostics_fail_the_run_after_writing(workspace: TempWorkspace) -> anyhow::Result<()> {
    workspace.write("symbols.json", &self_nesting_model())?;
    let output = kowo_gen(&workspace)
        .args(["--symbols", "symbols.json", "--out-dir", "gen"])
        .output()?;
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("illegal-self-reference"));
    assert!(stderr.contains("1 error diagnostic(s) reported"));
    assert!(workspace.path("gen/kotlin/dev/example/AConfig.kt").is_file());

    kowo_gen(&workspace)
        .args(["--symbols", "symbols.json", "--out-dir", "gen", "--allow-errors"])
        .assert()
        .success();
    Ok(())
}

#[rstest]
fn environment_overrides_config_file(workspace: TempWorkspace) -> anyhow::Result<()> {
    workspace.write("symbols.json", &nested_model())?;
    workspace.write("kowo-gen.toml", "symbols = \"symbols.json\"\nout_dir = \"from-file\"\n")?;
    kowo_gen(&workspace)
        .env("KOWO_GEN_OUT_DIR", "from-env")
        .assert()
        .success();
    assert!(workspace.path("from-env/kotlin/dev/example/ModelConfig.kt").is_file());
    assert!(!workspace.path("from-file").exists());
    Ok(())
}

#[rstest]
fn missing_symbols_is_a_usage_error(workspace: TempWorkspace) {
    kowo_gen(&workspace).assert().failure();
}
