//! CLI subprocess integration tests.
//!
//! These tests invoke the `wheelhouse` binary as a subprocess from a scratch
//! working directory and verify exit codes, stdout content, and JSON output.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const COWSAY_WHEEL: &str = "cowsay-6.0-py2.py3-none-any.whl";
const COWSAY_HASH: &str = "57110dbf8893c1480a88d904193f5a14f310756e561694600c890f4311ca09ea";
const SOURCE_HASH: &str = "8eb170f8d0d61825e09a95b38be068299ddeda82f35e96c3301a8a5e7604cb83";
/// SHA-256 of "hello\n".
const HELLO_HASH: &str = "5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03";

fn wheelhouse_bin(cwd: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_wheelhouse"));
    cmd.current_dir(cwd)
        .env_remove("WHEELHOUSE_LOG")
        .env_remove("WHEELS_BUCKET_BASE_URL")
        .env_remove("PKG_GITREF");
    cmd
}

fn run(cwd: &Path, args: &[&str]) -> Output {
    wheelhouse_bin(cwd).args(args).output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../wheelhouse-core/tests/fixtures")
        .join(name)
}

fn fixture_str(name: &str) -> String {
    fixture(name).display().to_string()
}

/// A hash sums file with its detached signature next to it.
fn write_signed_sums(dir: &Path, content: &str) -> PathBuf {
    let sums = dir.join("sha256sums.txt");
    fs::write(&sums, content).unwrap();
    fs::write(dir.join("sha256sums.txt.asc"), "signature").unwrap();
    sums
}

#[test]
fn cli_version_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), &["--version"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("wheelhouse"));
}

#[test]
fn cli_help_lists_commands() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), &["--help"]);
    assert!(output.status.success());
    let out = stdout(&output);
    for cmd in [
        "requirements",
        "update-requirements",
        "clean-nightlies",
        "update-index",
        "download-urls",
        "reprotest",
    ] {
        assert!(out.contains(cmd), "help must list '{cmd}'");
    }
}

#[test]
fn requirements_prints_main_dependencies_only() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(
        dir.path(),
        &[
            "requirements",
            "--pyproject",
            &fixture_str("pyproject.toml"),
            "--lock",
            &fixture_str("poetry.lock"),
        ],
    );
    assert!(output.status.success(), "{}", stderr(&output));
    let out = stdout(&output);
    let names: Vec<&str> = out
        .lines()
        .filter_map(|l| l.split("==").next())
        .collect();
    assert_eq!(names, vec!["beautifulsoup4", "colorama", "cowsay", "soupsieve"]);
    assert!(out.contains(&format!("cowsay==6.0 --hash=sha256:{COWSAY_HASH}")));
    assert!(!out.contains("pytest"));
}

#[test]
fn requirements_json_is_an_array_of_entries() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(
        dir.path(),
        &[
            "--json",
            "requirements",
            "--pyproject",
            &fixture_str("pyproject.toml"),
            "--lock",
            &fixture_str("poetry.lock"),
        ],
    );
    assert!(output.status.success(), "{}", stderr(&output));
    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let entries = parsed.as_array().unwrap();
    assert_eq!(entries.len(), 4);
    assert_eq!(entries[2]["name"], "cowsay");
    assert_eq!(entries[2]["hashes"][0], COWSAY_HASH);
}

#[test]
fn requirements_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("requirements.txt");
    let output = run(
        dir.path(),
        &[
            "requirements",
            "--pyproject",
            &fixture_str("pyproject.toml"),
            "--lock",
            &fixture_str("poetry.lock"),
            "--output",
            out_path.to_str().unwrap(),
        ],
    );
    assert!(output.status.success(), "{}", stderr(&output));
    let written = fs::read_to_string(&out_path).unwrap();
    assert_eq!(written.lines().count(), 4);
    assert!(written.ends_with('\n'));
}

#[test]
fn requirements_missing_lockfile_is_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(
        dir.path(),
        &[
            "requirements",
            "--pyproject",
            &fixture_str("pyproject.toml"),
            "--lock",
            "missing.lock",
        ],
    );
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("configuration error:"));
}

#[test]
fn update_requirements_pins_wheel_hashes() {
    let dir = tempfile::tempdir().unwrap();
    let sums = write_signed_sums(
        dir.path(),
        &format!("{COWSAY_HASH}  {COWSAY_WHEEL}\n{SOURCE_HASH}  cowsay-6.0.tar.gz\n"),
    );
    fs::write(dir.path().join("in.txt"), "cowsay==6.0\n").unwrap();
    let output = run(
        dir.path(),
        &[
            "update-requirements",
            "--requirements",
            "in.txt",
            "--sums",
            sums.to_str().unwrap(),
            "--output",
            "out.txt",
        ],
    );
    assert!(output.status.success(), "{}", stderr(&output));
    let written = fs::read_to_string(dir.path().join("out.txt")).unwrap();
    assert_eq!(written, format!("cowsay==6.0 --hash=sha256:{COWSAY_HASH}\n"));
}

#[test]
fn update_requirements_reports_missing_wheels_with_hint() {
    let dir = tempfile::tempdir().unwrap();
    let sums = write_signed_sums(dir.path(), "");
    fs::write(dir.path().join("in.txt"), "cowsay==6.0\n").unwrap();
    let output = run(
        dir.path(),
        &[
            "update-requirements",
            "--requirements",
            "in.txt",
            "--sums",
            sums.to_str().unwrap(),
            "--output",
            "out.txt",
            "--pkg-dir",
            "client",
        ],
    );
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("no hashes found for: cowsay==6.0"), "{err}");
    assert!(err.contains("hint:"), "{err}");
    assert!(err.contains("--pkg-dir client"), "{err}");
    assert!(!dir.path().join("out.txt").exists());
}

#[test]
fn update_requirements_requires_sums_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("in.txt"), "cowsay==6.0\n").unwrap();
    let output = run(
        dir.path(),
        &[
            "update-requirements",
            "--requirements",
            "in.txt",
            "--output",
            "out.txt",
        ],
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("hash sums file not found"));
}

#[test]
fn update_requirements_requires_signature() {
    let dir = tempfile::tempdir().unwrap();
    let sums = dir.path().join("sha256sums.txt");
    fs::write(&sums, format!("{COWSAY_HASH}  {COWSAY_WHEEL}\n")).unwrap();
    fs::write(dir.path().join("in.txt"), "cowsay==6.0\n").unwrap();
    let output = run(
        dir.path(),
        &[
            "update-requirements",
            "--requirements",
            "in.txt",
            "--sums",
            sums.to_str().unwrap(),
            "--output",
            "out.txt",
        ],
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("signature file not found"));
}

const BS4_HASH: &str = "8b0e12e62c15a06c86f5781abf5dc05b03961d95a2c33f4e0172d382c2fe6c87";
const COLORAMA_HASH: &str = "208069887db23a02dbe15fff64d1f83781cc1392ca53d5f72c32f2f8c753d3b5";
const SOUPSIEVE_HASH: &str = "7c8dae71e8b5048b97bc4bb3cb8736b01cf828db23289fb1b5130af93b5a8834";

#[test]
fn update_requirements_pins_poetry_project() {
    let dir = tempfile::tempdir().unwrap();
    let sums = write_signed_sums(
        dir.path(),
        &format!(
            "{BS4_HASH}  beautifulsoup4-4.12.2-py3-none-any.whl\n\
             {COLORAMA_HASH}  colorama-0.4.6-py2.py3-none-any.whl\n\
             {COWSAY_HASH}  {COWSAY_WHEEL}\n\
             {SOURCE_HASH}  cowsay-6.0.tar.gz\n\
             {SOUPSIEVE_HASH}  soupsieve-2.5-py3-none-any.whl\n"
        ),
    );
    let output = run(
        dir.path(),
        &[
            "update-requirements",
            "--pyproject",
            &fixture_str("pyproject.toml"),
            "--lock",
            &fixture_str("poetry.lock"),
            "--sums",
            sums.to_str().unwrap(),
            "--output",
            "out.txt",
        ],
    );
    assert!(output.status.success(), "{}", stderr(&output));
    let written = fs::read_to_string(dir.path().join("out.txt")).unwrap();
    assert_eq!(
        written,
        format!(
            "beautifulsoup4==4.12.2 --hash=sha256:{BS4_HASH}\n\
             colorama==0.4.6 --hash=sha256:{COLORAMA_HASH}\n\
             cowsay==6.0 --hash=sha256:{COWSAY_HASH}\n\
             soupsieve==2.5 --hash=sha256:{SOUPSIEVE_HASH}\n"
        )
    );
}

#[test]
fn update_requirements_rejects_poetry_dependency_missing_from_lockfile() {
    let dir = tempfile::tempdir().unwrap();
    let sums = write_signed_sums(dir.path(), &format!("{COWSAY_HASH}  {COWSAY_WHEEL}\n"));
    fs::write(
        dir.path().join("pyproject.toml"),
        "[tool.poetry.dependencies]\npython = \"^3.9\"\ncowsay = \"^6.0\"\nrequests = \"^2\"\n",
    )
    .unwrap();
    let output = run(
        dir.path(),
        &[
            "update-requirements",
            "--pyproject",
            "pyproject.toml",
            "--lock",
            &fixture_str("poetry.lock"),
            "--sums",
            sums.to_str().unwrap(),
            "--output",
            "out.txt",
        ],
    );
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("no hashes found for: requests"), "{err}");
    assert!(!dir.path().join("out.txt").exists());
}

#[test]
fn missing_wheels_hint_names_configured_build_script() {
    let dir = tempfile::tempdir().unwrap();
    let sums = write_signed_sums(dir.path(), &format!("{SOURCE_HASH}  cowsay-6.0.tar.gz\n"));
    fs::write(dir.path().join("in.txt"), "cowsay==6.0\n").unwrap();
    fs::write(
        dir.path().join("wheelhouse.toml"),
        "build_script = \"make wheels\"\n",
    )
    .unwrap();
    let output = run(
        dir.path(),
        &[
            "update-requirements",
            "--requirements",
            "in.txt",
            "--sums",
            sums.to_str().unwrap(),
            "--output",
            "out.txt",
            "--pkg-dir",
            "client",
        ],
    );
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(
        err.contains("hint: build the missing wheels first: make wheels --pkg-dir client"),
        "{err}"
    );
}

#[test]
fn check_hashes_accepts_hashed_fixture() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(
        dir.path(),
        &["check-hashes", &fixture_str("requirements.txt")],
    );
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("4 requirements"));
}

#[test]
fn check_hashes_rejects_unhashed_requirements() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("r.txt"), "cowsay==6.0\ncolorama==0.4.6\n").unwrap();
    let output = run(dir.path(), &["check-hashes", "r.txt"]);
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("cowsay==6.0"), "{err}");
    assert!(err.contains("colorama==0.4.6"), "{err}");
}

#[test]
fn verify_artifacts_detects_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let wheels = dir.path().join("localwheels");
    fs::create_dir(&wheels).unwrap();
    fs::write(wheels.join("good-1.0-py3-none-any.whl"), "hello\n").unwrap();
    fs::write(wheels.join("bad-1.0-py3-none-any.whl"), "tampered\n").unwrap();

    fs::write(
        dir.path().join("sha256sums.txt"),
        format!("{HELLO_HASH}  good-1.0-py3-none-any.whl\n"),
    )
    .unwrap();
    let output = run(dir.path(), &["verify-artifacts"]);
    assert!(output.status.success(), "{}", stderr(&output));

    fs::write(
        dir.path().join("sha256sums.txt"),
        format!(
            "{HELLO_HASH}  good-1.0-py3-none-any.whl\n{HELLO_HASH}  bad-1.0-py3-none-any.whl\n"
        ),
    )
    .unwrap();
    let output = run(dir.path(), &["verify-artifacts"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("bad-1.0-py3-none-any.whl"));
}

#[test]
fn clean_nightlies_deletes_only_expired_packages() {
    let dir = tempfile::tempdir().unwrap();
    let today = chrono::Local::now().format("%Y%m%d").to_string();
    let old = "securedrop-client-dev-20230101-abc123.deb";
    let fresh = format!("securedrop-client-dev-{today}-abc123.deb");
    fs::write(dir.path().join(old), b"").unwrap();
    fs::write(dir.path().join(&fresh), b"").unwrap();

    let output = run(dir.path(), &["clean-nightlies", ".", "--dry-run"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains(&format!("would delete {old}")));
    assert!(dir.path().join(old).exists());

    let output = run(dir.path(), &["clean-nightlies", ".", "--days", "14"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(!dir.path().join(old).exists());
    assert!(dir.path().join(&fresh).exists());
}

#[test]
fn clean_nightlies_missing_directory_is_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), &["clean-nightlies", "does-not-exist"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn update_index_lists_project_directories() {
    let dir = tempfile::tempdir().unwrap();
    let simple = dir.path().join("simple");
    fs::create_dir_all(simple.join("zope")).unwrap();
    fs::create_dir_all(simple.join("attrs")).unwrap();

    let output = run(dir.path(), &["--json", "update-index"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(parsed["projects"], serde_json::json!(["attrs", "zope"]));

    let html = fs::read_to_string(simple.join("index.html")).unwrap();
    let attrs = html.find("attrs").unwrap();
    let zope = html.find("zope").unwrap();
    assert!(attrs < zope);
}

#[test]
fn create_dirs_fills_template() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("simple")).unwrap();
    let template = dir.path().join("template.html");
    fs::write(&template, "<a href=\"PROJECT\">PROJECT</a>\n").unwrap();
    fs::write(dir.path().join("r.txt"), "cowsay==6.0\n").unwrap();

    let output = run(
        dir.path(),
        &["create-dirs", "r.txt", "--template", "template.html"],
    );
    assert!(output.status.success(), "{}", stderr(&output));
    let page = fs::read_to_string(dir.path().join("simple/cowsay/index.html")).unwrap();
    assert_eq!(page, "<a href=\"cowsay\">cowsay</a>\n");
}

#[test]
fn create_dirs_missing_template_is_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("r.txt"), "cowsay==6.0\n").unwrap();
    let output = run(
        dir.path(),
        &["create-dirs", "r.txt", "--template", "missing.html"],
    );
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn download_urls_are_unique_and_sorted() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("sha256sums.txt"),
        format!(
            "{COWSAY_HASH}  {COWSAY_WHEEL}\nnot a hash line\n{SOURCE_HASH}  attrs-23.1.0.tar.gz\n{COWSAY_HASH}  {COWSAY_WHEEL}\n"
        ),
    )
    .unwrap();
    let output = run(
        dir.path(),
        &["download-urls", "--base-url", "https://example.org/wheels/"],
    );
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        stdout(&output),
        format!(
            "https://example.org/wheels/attrs-23.1.0.tar.gz\nhttps://example.org/wheels/{COWSAY_WHEEL}\n"
        )
    );
    let err = stderr(&output);
    assert_eq!(err.matches("wrong line 2: not a hash line").count(), 1, "{err}");
}

#[test]
fn download_urls_reads_base_url_from_environment() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("sha256sums.txt"),
        format!("{COWSAY_HASH}  {COWSAY_WHEEL}\n"),
    )
    .unwrap();
    let output = wheelhouse_bin(dir.path())
        .env("WHEELS_BUCKET_BASE_URL", "https://mirror.example.org")
        .arg("download-urls")
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        stdout(&output),
        format!("https://mirror.example.org/{COWSAY_WHEEL}\n")
    );
}

#[test]
fn settings_file_supplies_repo_paths() {
    let dir = tempfile::tempdir().unwrap();
    let repo = dir.path().join("repo");
    fs::create_dir(&repo).unwrap();
    fs::write(
        repo.join("sha256sums.txt"),
        format!("{COWSAY_HASH}  {COWSAY_WHEEL}\n"),
    )
    .unwrap();
    fs::write(
        dir.path().join("wheelhouse.toml"),
        "repo_root = \"repo\"\nwheels_base_url = \"https://settings.example.org\"\n",
    )
    .unwrap();

    let output = run(dir.path(), &["download-urls"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        stdout(&output),
        format!("https://settings.example.org/{COWSAY_WHEEL}\n")
    );
}

#[test]
fn invalid_settings_file_is_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("wheelhouse.toml"), "retention = 3\n").unwrap();
    let output = run(dir.path(), &["download-urls"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("configuration error:"));

    let output = run(
        dir.path(),
        &["--config", "missing.toml", "project-name"],
    );
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn project_name_reads_setup_py() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("setup.py"),
        "import setuptools\n\nsetuptools.setup(\n    name=\"securedrop-export\",\n    version=\"0.3.0\",\n)\n",
    )
    .unwrap();
    let output = run(dir.path(), &["project-name"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "securedrop-export\n");
}

#[test]
fn project_name_without_setup_py_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), &["project-name"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("setup.py"));
}

#[test]
fn completions_and_man_pages_render() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), &["completions", "bash"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("wheelhouse"));

    let output = run(dir.path(), &["man-pages", "man"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(dir.path().join("man/wheelhouse.1").is_file());
    assert!(dir.path().join("man/wheelhouse-clean-nightlies.1").is_file());
}
