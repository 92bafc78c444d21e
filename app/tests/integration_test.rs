use std::fs;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;

fn tmppy_cmd() -> Command {
    let mut cmd = cargo_bin_cmd!("tmppy-opt");
    cmd.env("TMPPY_COLORIZE", "never");
    cmd
}

/// Check that "tmppy-opt --version" works correctly
#[test]
fn version_command() {
    let assert = tmppy_cmd().arg("--version").assert();
    assert.success().stdout("tmppy 0.1.0\n");
}

/// Check that pack specializations are evaluated
#[test]
fn match_front() {
    let assert = tmppy_cmd().args(["match", "../test/suites/match/front.toml"]).assert();
    assert.success().stdout(
        "Front<List<int, float, double>>::type = int\n\
         Front<List<>>::type: cannot decide, no specialization certainly matches\n",
    );
}

/// Check that the most specific specialization is selected
#[test]
fn match_is_same() {
    let assert = tmppy_cmd().args(["match", "../test/suites/match/is_same.toml"]).assert();
    assert.success().stdout(
        "IsSame<int, int>::value = true\n\
         IsSame<int, int*>::value = false\n\
         IsSame<U, int>::value: cannot decide, a specialization might match\n",
    );
}

/// Check that the step budget of the case file is respected
#[test]
fn match_budget() {
    let assert = tmppy_cmd().args(["match", "../test/suites/match/budget.toml"]).assert();
    assert.success().stdout(
        "Identity<U>::type selects the main definition with {T = U}\n\
         Identity<int>::type: cannot decide, the step budget is exhausted\n\
         Unknown<int>::type: cannot decide, the step budget is exhausted\n",
    );
}

/// Check that "--max-steps" overrides the case file
#[test]
fn match_max_steps_flag() {
    let assert = tmppy_cmd()
        .args(["match", "../test/suites/match/budget.toml", "--max-steps", "5"])
        .assert();
    assert.success().stdout(
        "Identity<U>::type selects the main definition with {T = U}\n\
         Identity<int>::type = int\n\
         Unknown<int>::type: cannot decide, the template is not known\n",
    );
}

#[test]
fn unify_pointer() {
    let assert = tmppy_cmd().args(["unify", "../test/suites/unify/pointer.toml"]).assert();
    assert.success().stdout("Certain {T = int, U = float}\n");
}

#[test]
fn unify_pack() {
    let assert = tmppy_cmd().args(["unify", "../test/suites/unify/pack.toml"]).assert();
    assert.success().stdout("Certain {T = int, Ts... = [float, double]}\n");
}

#[test]
fn unify_reference() {
    let assert = tmppy_cmd().args(["unify", "../test/suites/unify/reference.toml"]).assert();
    assert.success().stdout("Impossible\n");
}

#[test]
fn unify_alias() {
    let assert = tmppy_cmd().args(["unify", "../test/suites/unify/alias.toml"]).assert();
    assert.success().stdout("Possible\n");
}

/// Check that a case file written on the fly is accepted
#[test]
fn unify_temporary_case() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("case.toml");
    fs::write(
        &path,
        r#"
        exprs = [{ local = "X" }]
        patterns = [{ const = { local = "T" } }]
        locals = { X = { const = { type = "char" } } }
        pattern_variables = ["T"]
        "#,
    )
    .unwrap();
    let assert = tmppy_cmd().arg("unify").arg(&path).assert();
    assert.success().stdout("Certain {T = char}\n");
}

/// Check that malformed case files are reported
#[test]
fn malformed_case() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("case.toml");
    fs::write(&path, "exprs = [{ pointer = 1 }]\npatterns = []\n").unwrap();
    tmppy_cmd().arg("unify").arg(&path).assert().failure();
}
