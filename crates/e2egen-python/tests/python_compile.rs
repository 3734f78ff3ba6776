use std::process::Command;

use e2egen_core::config::SuiteVersion;
use e2egen_core::{ParsedApi, parse};
use e2egen_python::{GenerateOptions, generate};

const BILLING: &str = include_str!("../../e2egen-core/tests/fixtures/billing.yaml");
const UNTAGGED: &str = include_str!("../../e2egen-core/tests/fixtures/untagged.yaml");

fn compile_python(yaml: &str, service: &str, suite: SuiteVersion, async_mode: bool) {
    let api = ParsedApi::from_spec(service, &parse::from_yaml(yaml).unwrap());
    let options = GenerateOptions {
        fixtures: true,
        tests: true,
        readme: true,
        suite,
        async_mode,
        ..GenerateOptions::default()
    };

    let tmp = tempfile::tempdir().unwrap();
    generate(&api, &options, tmp.path()).unwrap();

    let output = Command::new("python3")
        .args(["-m", "compileall", "-q", "."])
        .current_dir(tmp.path())
        .output()
        .expect("failed to run python3");
    if !output.status.success() {
        panic!(
            "compileall failed:\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

#[test]
#[ignore] // Requires Python 3
fn generated_billing_v2_compiles() {
    compile_python(BILLING, "billing", SuiteVersion::V2, false);
}

#[test]
#[ignore] // Requires Python 3
fn generated_billing_v1_async_compiles() {
    compile_python(BILLING, "billing", SuiteVersion::V1, true);
}

#[test]
#[ignore] // Requires Python 3
fn generated_untagged_compiles() {
    compile_python(UNTAGGED, "status", SuiteVersion::V2, false);
}
