//! Runs the built `geoweather` binary and checks how failures surface.

use std::{
    fs,
    net::TcpListener,
    path::PathBuf,
    process::{Command, Output},
};

fn config_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("geoweather-{}-{name}.toml", std::process::id()));
    fs::write(&path, contents).expect("temp config should be writable");
    path
}

/// Settings pointing both endpoints at a port nothing listens on.
fn unreachable_config(name: &str) -> PathBuf {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    config_file(
        name,
        &format!(
            "progress = false\n\
             [endpoints]\n\
             geocode = \"http://{addr}/geocode\"\n\
             weather = \"http://{addr}/forecast\"\n\
             [http]\n\
             timeout_secs = 2\n"
        ),
    )
}

fn geoweather(args: &[&str], api_key: Option<&str>) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_geoweather"));
    cmd.args(args).env_remove("RUST_LOG");
    match api_key {
        Some(key) => cmd.env("GEOAPIFY_API_KEY", key),
        None => cmd.env_remove("GEOAPIFY_API_KEY"),
    };
    cmd.output().expect("binary should start")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn missing_place_is_a_usage_error() {
    let output = geoweather(&[], Some("KEY"));
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn help_succeeds() {
    let output = geoweather(&["--help"], None);
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Usage"));
}

#[test]
fn unset_api_key_fails_before_any_request() {
    let config = unreachable_config("unset-key");
    let output = geoweather(&["--config", config.to_str().unwrap(), "Paris"], None);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("GEOAPIFY_API_KEY"));
    let _ = fs::remove_file(config);
}

#[test]
fn empty_api_key_fails_before_any_request() {
    let config = unreachable_config("empty-key");
    let output = geoweather(&["--config", config.to_str().unwrap(), "Paris"], Some(""));

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stderr(&output).lines().count(), 1);
    let _ = fs::remove_file(config);
}

#[test]
fn malformed_config_is_a_config_error() {
    let config = config_file("malformed", "[http\ntimeout_secs =");
    let output = geoweather(&["--config", config.to_str().unwrap(), "Paris"], Some("KEY"));

    assert_eq!(output.status.code(), Some(2));
    let stderr = stderr(&output);
    assert!(stderr.contains("configuration error"), "{stderr}");
    assert_eq!(stderr.lines().count(), 1);
    let _ = fs::remove_file(config);
}

#[test]
fn missing_config_file_is_a_config_error() {
    let output = geoweather(&["--config", "/nonexistent/geoweather.toml", "Paris"], Some("KEY"));
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn unreachable_geocoder_is_a_geocode_transport_failure() {
    let config = unreachable_config("unreachable");
    let output = geoweather(&["--config", config.to_str().unwrap(), "New", "York"], Some("KEY"));

    assert_eq!(output.status.code(), Some(3));
    let stderr = stderr(&output);
    assert!(stderr.contains("failed to fetch geocoding data"), "{stderr}");
    assert_eq!(stderr.lines().count(), 1);
    assert!(!String::from_utf8_lossy(&output.stdout).contains("Weather report"));
    let _ = fs::remove_file(config);
}
