// tests/config_loading.rs

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use clap::error::ErrorKind;
use tempfile::NamedTempFile;

use pkgdag::cli::{CliArgs, EmitFormat};
use pkgdag::config::{ConfigFile, DEFAULT_CONFIG_FILE, load_and_validate, load_from_path};
use pkgdag::errors::PkgdagError;
use pkgdag::types::{NvrSource, UnresolvedRequires};
use pkgdag::apply_overrides;
use pkgdag_test_utils::{ConfigFileBuilder, PackageConfigBuilder};

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

fn expect_config_error(result: Result<ConfigFile, PkgdagError>, needle: &str) {
    match result {
        Err(PkgdagError::ConfigError(msg)) => {
            assert!(msg.contains(needle), "message {msg:?} lacks {needle:?}");
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn full_config_parses_with_package_order_preserved() {
    let file = write_config(
        r#"
[config]
arch = "armhfp"
distro = "23"
repository = "repository/main/armhfp"
unresolved_requires = "error"
nvr_resolver = "filename"

[helpers]
needs_rebuild = "/usr/libexec/pkgdag/needs-rebuild"

[steps]
resultdir = "/srv/results"

[[package]]
manifest = "libfoo/work/libfoo.spec"
source = "https://example.org/libfoo.git"

[[package]]
name = "bar"
version = "1.0"
release = "1"
requires = ["libfoo >= 1.0"]
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.config.arch, "armhfp");
    assert_eq!(cfg.config.repository, PathBuf::from("repository/main/armhfp"));
    assert_eq!(cfg.config.unresolved_requires, UnresolvedRequires::Error);
    assert_eq!(cfg.config.nvr_resolver, NvrSource::Filename);
    assert_eq!(
        cfg.helpers.needs_rebuild,
        PathBuf::from("/usr/libexec/pkgdag/needs-rebuild")
    );
    assert_eq!(cfg.helpers.spec_nvr, PathBuf::from("helpers/spec-nvr"));
    assert_eq!(cfg.steps.resultdir, "/srv/results");
    assert_eq!(cfg.steps.root_prefix, "fedora");

    assert_eq!(cfg.packages.len(), 2);
    assert_eq!(cfg.packages[0].label(), "libfoo/work/libfoo.spec");
    let bar = cfg.packages[1].inline_metadata().unwrap();
    assert_eq!(bar.name, "bar");
    assert!(bar.requires.contains("libfoo"));
}

#[test]
fn defaults_apply_when_sections_are_missing() {
    let file = write_config(
        r#"
[config]
distro = "23"

[[package]]
manifest = "a.spec"
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.config.arch, "x86_64");
    assert_eq!(cfg.config.unresolved_requires, UnresolvedRequires::System);
    assert_eq!(cfg.config.nvr_resolver, NvrSource::Helper);
    assert_eq!(cfg.config.artifact_suffix, ".src.rpm");
    assert_eq!(cfg.steps.resultdir, "../results");
}

#[test]
fn config_without_packages_is_rejected() {
    let file = write_config("[config]\ndistro = \"23\"\n");
    expect_config_error(load_and_validate(file.path()), "at least one");
}

#[test]
fn missing_distro_is_rejected() {
    let file = write_config("[[package]]\nmanifest = \"a.spec\"\n");
    expect_config_error(load_and_validate(file.path()), "distro");
}

#[test]
fn incomplete_inline_package_is_rejected() {
    let file = write_config(
        r#"
[config]
distro = "23"

[[package]]
name = "bar"
version = "1.0"
"#,
    );
    expect_config_error(load_and_validate(file.path()), "release");
}

#[test]
fn manifest_package_cannot_pin_a_version() {
    let raw = ConfigFileBuilder::new()
        .with_package(PackageConfigBuilder::manifest("bar.spec").version("2.0").build())
        .build_raw();

    expect_config_error(ConfigFile::try_from(raw), "manifest");
}

#[test]
fn duplicate_inline_names_are_rejected() {
    let raw = ConfigFileBuilder::new()
        .with_package(PackageConfigBuilder::inline("bar").build())
        .with_package(PackageConfigBuilder::inline("bar").version("2.0").build())
        .build_raw();

    match ConfigFile::try_from(raw) {
        Err(PkgdagError::DuplicatePackage(name)) => assert_eq!(name, "bar"),
        other => panic!("Expected DuplicatePackage, got: {:?}", other.map(|_| ())),
    }
}

#[test]
fn srpm_pattern_must_compile_and_capture() {
    let no_group = ConfigFileBuilder::new()
        .with_package(PackageConfigBuilder::inline("bar").build())
        .srpm_pattern(r"Wrote: .*\.src\.rpm")
        .build_raw();
    expect_config_error(ConfigFile::try_from(no_group), "capture group");

    let broken = ConfigFileBuilder::new()
        .with_package(PackageConfigBuilder::inline("bar").build())
        .srpm_pattern("Wrote: (")
        .build_raw();
    expect_config_error(ConfigFile::try_from(broken), "not a valid regex");
}

#[test]
fn empty_step_template_is_rejected() {
    let raw = ConfigFileBuilder::new()
        .with_package(PackageConfigBuilder::inline("bar").build())
        .build_binary("  ")
        .build_raw();
    expect_config_error(ConfigFile::try_from(raw), "build_binary");
}

#[test]
fn invalid_toml_is_a_toml_error() {
    let file = write_config("[[package]\nmanifest = ");
    assert!(matches!(
        load_from_path(file.path()),
        Err(PkgdagError::TomlError(_))
    ));
}

#[test]
fn unknown_policy_value_is_a_toml_error() {
    let file = write_config(
        "[config]\ndistro = \"23\"\nunresolved_requires = \"ignore\"\n[[package]]\nmanifest = \"a.spec\"\n",
    );
    assert!(matches!(
        load_and_validate(file.path()),
        Err(PkgdagError::TomlError(_))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    assert!(matches!(
        load_from_path("/nonexistent/Pkgdag.toml"),
        Err(PkgdagError::IoError(_))
    ));
}

#[test]
fn command_line_overrides_fill_in_the_target() {
    let file = write_config("[[package]]\nmanifest = \"a.spec\"\n");
    let raw = load_from_path(file.path()).unwrap();
    let args = CliArgs {
        config: file.path().display().to_string(),
        arch: Some("i686".to_string()),
        distro: Some("24".to_string()),
        repository: Some(PathBuf::from("/srv/repo")),
        log_level: None,
        dry_run: true,
        emit: None,
    };

    let cfg = ConfigFile::try_from(apply_overrides(raw, &args)).unwrap();

    assert_eq!(cfg.config.arch, "i686");
    assert_eq!(cfg.config.distro, "24");
    assert_eq!(cfg.config.repository, PathBuf::from("/srv/repo"));
}

#[test]
fn cli_defaults_to_config_in_working_directory() {
    let args = CliArgs::try_parse_from(["pkgdag", "--emit", "json"]).unwrap();

    assert_eq!(args.config, DEFAULT_CONFIG_FILE);
    assert!(!args.dry_run);
    assert!(matches!(args.emit, Some(EmitFormat::Json)));
}

#[test]
fn cli_rejects_dry_run_together_with_emit() {
    let err = CliArgs::try_parse_from(["pkgdag", "--dry-run", "--emit", "text"]).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
}
