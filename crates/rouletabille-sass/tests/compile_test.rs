//! Integration tests compiling style sources from disk.
//!
//! Covers:
//! - A unit using a sibling partial (output and recorded dependency)
//! - Partials being skipped by `compile_file`
//! - Shared include directory as secondary load path
//! - Missing files reported as I/O errors

use rouletabille_sass::{SassError, StyleCompiler, StyleSourceKind, classify};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_unit_using_partial() {
    let dir = TempDir::new().unwrap();
    let unit = write(&dir, "a.scss", "@use \"_b\";\n");
    let partial = write(&dir, "_b.scss", ".x{color:red}");

    let compiler = StyleCompiler::default();
    let style = compiler.compile_file(&unit).unwrap().expect("unit compiles");

    insta::assert_snapshot!(style.css, @r"
    .x {
      color: red;
    }
    ");
    assert!(style.loaded_files.contains(&partial));
    assert_eq!(style.loaded_files.len(), 1);
}

#[test]
fn test_partial_is_never_compiled() {
    let dir = TempDir::new().unwrap();
    let partial = write(&dir, "_b.scss", ".x{color:red}");

    assert_eq!(classify(&partial), StyleSourceKind::Partial);
    let compiler = StyleCompiler::default();
    assert!(compiler.compile_file(&partial).unwrap().is_none());
}

#[test]
fn test_include_directory_is_searched() {
    let dir = TempDir::new().unwrap();
    let includes = dir.path().join("_includes");
    let unit = write(&dir, "css/main.scss", "@use \"theme\";\n.main { color: theme.$fg; }");
    let theme = write(&dir, "_includes/_theme.scss", "$fg: #333;");

    let compiler = StyleCompiler::new([includes.clone()]);
    assert_eq!(
        compiler.load_paths_for(&unit).as_slice(),
        &[dir.path().join("css"), includes]
    );

    let style = compiler.compile_file(&unit).unwrap().unwrap();
    assert!(style.css.contains(".main"));
    assert!(style.css.contains("#333"));
    assert!(style.loaded_files.contains(&theme));
}

#[test]
fn test_missing_unit_is_io_error() {
    let dir = TempDir::new().unwrap();
    let compiler = StyleCompiler::default();
    let err = compiler
        .compile_file(&dir.path().join("nope.scss"))
        .unwrap_err();
    assert!(matches!(err, SassError::Io { .. }));
}

#[test]
fn test_unresolved_reference_on_disk() {
    let dir = TempDir::new().unwrap();
    let includes = dir.path().join("_includes");
    fs::create_dir_all(&includes).unwrap();
    let unit = write(&dir, "a.scss", "@import \"gone\";\n");

    let compiler = StyleCompiler::new([includes.clone()]);
    let err = compiler.compile_file(&unit).unwrap_err();

    match err {
        SassError::UnresolvedReference { searched, .. } => {
            assert_eq!(searched, vec![dir.path().to_path_buf(), includes]);
        }
        other => panic!("expected UnresolvedReference, got {other:?}"),
    }
}
