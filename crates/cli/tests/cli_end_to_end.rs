//! End-to-end tests that run the `artisync` binary.

use std::io::Write;
use std::process::{Command, Output, Stdio};

use anyhow::{Context, Result};
use artisync_test_utils::TestFixture;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Runs the binary with a scrubbed environment and HOME pointed at `home`.
fn artisync(home: &std::path::Path, args: &[&str], stdin: Option<&str>) -> Result<Output> {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_artisync"));
    cmd.env_clear()
        .env("HOME", home)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });

    let mut child = cmd.spawn().context("failed to spawn artisync")?;
    if let Some(input) = stdin {
        let mut pipe = child.stdin.take().context("stdin not piped")?;
        pipe.write_all(input.as_bytes())?;
    }
    Ok(child.wait_with_output()?)
}

#[test]
fn given_unknown_auth_type_then_exits_non_zero_before_connecting() -> Result<()> {
    let fixture = TestFixture::new()?;
    let desired = fixture.write_file("repos.yaml", "- key: a\n  rclass: local\n  packageType: maven\n")?;

    // Port 9 would fail to connect; validation must fail first.
    let output = artisync(
        fixture.home_path(),
        &[
            "repositories",
            desired.to_str().context("utf-8 path")?,
            "--base-url",
            "http://127.0.0.1:9",
            "--auth-type",
            "kerberos",
            "--auth-string",
            "x",
        ],
        None,
    )?;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("auth_type must be"), "stderr: {stderr}");
    Ok(())
}

#[test]
fn given_missing_base_url_then_names_the_setting() -> Result<()> {
    let fixture = TestFixture::new()?;
    let output = artisync(
        fixture.home_path(),
        &["ldap-settings", "-", "--auth-string", "admin:pw"],
        Some("[]"),
    )?;

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("\"base_url\" is a required argument"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn given_config_file_and_check_mode_then_reports_json_without_mutating() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/artifactory/api/repositories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"key": "stale", "type": "LOCAL"}
        ])))
        .mount(&server)
        .await;
    for verb in ["PUT", "POST", "DELETE"] {
        Mock::given(method(verb))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
    }

    let fixture = TestFixture::new()?;
    fixture.write_file(
        ".artisync/config.toml",
        &format!(
            "[artifactory]\nbase_url = \"{}\"\nauth_type = \"AccessToken\"\nauth_string = \"tok\"\n",
            server.uri()
        ),
    )?;
    let desired = fixture.write_file(
        "repos.json",
        r#"[{"key": "fresh", "rclass": "local", "packageType": "generic"}]"#,
    )?;

    let home = fixture.home_path().to_path_buf();
    let file = desired.to_string_lossy().into_owned();
    let output = tokio::task::spawn_blocking(move || {
        artisync(
            &home,
            &["repositories", &file, "--state", "prune", "--check", "--format", "json"],
            None,
        )
    })
    .await??;

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let report: Value = serde_json::from_str(&stdout)?;
    assert_eq!(report["changed"], true);
    assert_eq!(report["added_count"], 1);
    assert_eq!(report["deleted_count"], 1);
    assert_eq!(
        report["message"],
        "[check mode] 1 repositories were added\n0 repositories were updated\n1 repositories were deleted"
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn given_stdin_records_when_present_then_creates_and_prints_summary() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/artifactory/api/repositories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/artifactory/api/repositories/libs"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let fixture = TestFixture::new()?;
    let home = fixture.home_path().to_path_buf();
    let uri = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        artisync(
            &home,
            &[
                "repositories",
                "-",
                "--base-url",
                &uri,
                "--auth-string",
                "admin:password",
            ],
            Some("- key: libs\n  rclass: local\n  packageType: maven\n"),
        )
    })
    .await??;

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim_end(),
        "1 repositories were added\n0 repositories were updated\n0 repositories were deleted"
    );
    Ok(())
}
