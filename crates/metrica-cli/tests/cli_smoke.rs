use serde_json::Value;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

/// A file under the temp dir, removed on drop.
struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    fn absent(name: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        let path = std::env::temp_dir().join(format!(
            "metrica-{}-{nanos}-{name}",
            std::process::id()
        ));
        Self { path }
    }

    fn with_contents(name: &str, contents: &str) -> Self {
        let file = Self::absent(name);
        fs::write(&file.path, contents).expect("scratch file should be written");
        file
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

/// One finished `metrica` invocation.
struct Run(Output);

impl Run {
    fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.0.stdout).into_owned()
    }

    fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.0.stderr).into_owned()
    }

    /// Panics with both streams unless the process exited with `code`.
    fn exits(&self, code: i32) -> &Self {
        assert_eq!(
            self.0.status.code(),
            Some(code),
            "unexpected exit status\nstdout:\n{}\nstderr:\n{}",
            self.stdout(),
            self.stderr(),
        );
        self
    }

    fn json(&self) -> Value {
        serde_json::from_slice(&self.0.stdout)
            .unwrap_or_else(|e| panic!("stdout is not JSON ({e}):\n{}", self.stdout()))
    }
}

fn metrica<I, S>(args: I) -> Run
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = Command::new(env!("CARGO_BIN_EXE_metrica"))
        .args(args)
        .env_remove("METRICA_LOG")
        .output()
        .expect("metrica should start");
    Run(output)
}

#[test]
fn list_json_reports_catalog() {
    let payload = metrica(["list", "--json"]).exits(0).json();
    assert_eq!(payload["registryKind"], "metrica.catalog.v1");
    let ids: Vec<&str> = payload["systems"]
        .as_array()
        .expect("systems array")
        .iter()
        .filter_map(|row| row["id"].as_str())
        .collect();
    assert_eq!(
        ids,
        vec![
            "polar",
            "parabolic",
            "bipolar",
            "2-sphere",
            "cylindrical",
            "spherical",
            "elliptic"
        ]
    );
}

#[test]
fn list_text_marks_slow_systems() {
    let text = metrica(["list"]).exits(0).stdout();
    assert!(text.contains("metrica catalog"));
    let bipolar = text
        .lines()
        .find(|line| line.trim_start().starts_with("bipolar"))
        .expect("bipolar row");
    assert!(bipolar.contains("(slow)"));
}

#[test]
fn derive_polar_text_prints_second_derivatives() {
    let text = metrica(["derive", "polar"]).exits(0).stdout();
    assert!(text.contains("  x = r*cos(t)"));
    assert!(text.contains("  ds^2 = dr^2 + dt^2*r^2"));
    assert!(text.contains("Second derivative components:"));
    assert!(text.contains("  ddr = dt^2*r"));
    assert!(text.contains("  ddt = -2*dr*dt/r"));
}

#[test]
fn derive_json_reports_geodesics() {
    let payload = metrica(["derive", "2-sphere", "--json"]).exits(0).json();
    assert_eq!(payload["reportKind"], "metrica.derivation.v1");
    let derivation = &payload["derivation"];
    assert_eq!(derivation["system"], "2-sphere");
    assert_eq!(derivation["metric"][1][1], "sin(f)^2");
    assert_eq!(derivation["geodesics"][0]["equation"], "ddf - dt^2*sin(f)*cos(f)");
    assert_eq!(derivation["fingerprint"].as_str().map(str::len), Some(64));
}

#[test]
fn derive_unknown_system_fails() {
    let stderr = metrica(["derive", "toroidal"]).exits(1).stderr();
    assert!(stderr.contains("unknown coordinate system `toroidal`"));
}

#[test]
fn custom_system_runs_inline_embedding() {
    let payload = metrica([
        "custom",
        "--coords",
        "u,v",
        "--embed",
        "u^2 - v^2",
        "--embed",
        "2*u*v",
        "--json",
    ])
    .exits(0)
    .json();
    let derivation = &payload["derivation"];
    assert_eq!(derivation["metric"][0][0], "4*u^2 + 4*v^2");
    assert_eq!(derivation["transformation"][1], "y = 2*u*v");
}

#[test]
fn custom_accepts_exponentials() {
    let text = metrica([
        "custom",
        "--coords",
        "u,v",
        "--embed",
        "exp(u)*cos(v)",
        "--embed",
        "exp(u)*sin(v)",
    ])
    .exits(0)
    .stdout();
    assert!(text.contains("  ds^2 = du^2*exp(u)^2 + dv^2*exp(u)^2"), "{text}");
}

#[test]
fn custom_rejects_reserved_names_with_json_error() {
    let payload = metrica(["custom", "--coords", "x,t", "--embed", "x", "--embed", "t", "--json"])
        .exits(1)
        .json();
    assert_eq!(payload["error"]["stage"], "registry");
    assert!(
        payload["error"]["message"]
            .as_str()
            .is_some_and(|m| m.contains("reserved"))
    );
}

#[test]
fn custom_singular_metric_fails() {
    let stderr = metrica(["custom", "--coords", "u,v", "--embed", "u + v", "--embed", "u + v"])
        .exits(1)
        .stderr();
    assert!(stderr.contains("singular metric"));
}

#[test]
fn zero_timeout_cancels_derivation() {
    let payload = metrica(["derive", "spherical", "--timeout-ms", "0", "--json"])
        .exits(1)
        .json();
    assert_eq!(payload["error"]["stage"], "christoffel");
}

#[test]
fn file_command_runs_every_definition() {
    let file = ScratchFile::with_contents(
        "systems.toml",
        r#"
[[system]]
name = "plane"
coordinates = ["u", "v"]
embedding = ["u", "v"]

[[system]]
name = "elliptic"
coordinates = ["m", "n"]
embedding = ["cosh(m)*cos(n)", "sinh(m)*sin(n)"]
"#,
    );

    let payload = metrica([OsStr::new("file"), file.path().as_os_str(), OsStr::new("--json")])
        .exits(0)
        .json();
    assert_eq!(payload["reportKind"], "metrica.derivation_set.v1");
    let names: Vec<&str> = payload["derivations"]
        .as_array()
        .expect("derivations array")
        .iter()
        .filter_map(|d| d["system"].as_str())
        .collect();
    assert_eq!(names, vec!["plane", "elliptic"]);

    let text = metrica([
        OsStr::new("file"),
        file.path().as_os_str(),
        OsStr::new("--name"),
        OsStr::new("plane"),
    ])
    .exits(0)
    .stdout();
    assert!(text.starts_with("plane (u, v)"));
    assert!(text.contains("(all zero)"));
    assert!(text.contains("  ddu = 0"));
}

#[test]
fn file_command_reports_missing_file() {
    let file = ScratchFile::absent("absent.toml");
    let stderr = metrica([OsStr::new("file"), file.path().as_os_str()])
        .exits(1)
        .stderr();
    assert!(stderr.contains("invalid system definition"));
}

#[test]
fn verbose_logs_pipeline_stages_to_stderr() {
    let stderr = metrica(["--verbose", "derive", "polar"]).exits(0).stderr();
    assert!(stderr.contains("christoffel symbols computed"));
}
