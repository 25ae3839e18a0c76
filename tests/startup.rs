use std::process::{Command, Output};

const STRIPPED_VARS: &[&str] = &[
    "OPENAI_API_KEY",
    "OPENAI_BASE_URL",
    "PORT",
    "TLS_CERT_PATH",
    "TLS_KEY_PATH",
    "UPSTREAM_TIMEOUT_SECS",
];

fn run_gateway(vars: &[(&str, &str)]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_gateway"));
    // Keep any developer `.env` out of reach
    command.current_dir(std::env::temp_dir());
    for name in STRIPPED_VARS {
        command.env_remove(name);
    }
    command.envs(vars.iter().copied());
    command.output().expect("failed to run gateway binary")
}

#[test]
fn exits_without_api_key() {
    let output = run_gateway(&[]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("OPENAI_API_KEY"), "unexpected stderr: {stderr}");
}

#[test]
fn exits_when_tls_files_are_missing() {
    let output = run_gateway(&[
        ("OPENAI_API_KEY", "sk-test"),
        ("TLS_CERT_PATH", "/nonexistent/gateway.crt"),
        ("TLS_KEY_PATH", "/nonexistent/gateway.key"),
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("TLS"), "unexpected stderr: {stderr}");
}
