#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
};

static NEXT_DIR_ID: AtomicUsize = AtomicUsize::new(1);

fn test_temp_dir_path() -> PathBuf {
    let tmpdir = std::env::temp_dir();
    let pid = std::process::id();

    loop {
        let val = NEXT_DIR_ID.fetch_add(1, Ordering::SeqCst);
        let path = tmpdir.join(format!("stmtload-test-{pid}-{val}"));
        if !path.exists() {
            return path;
        }
    }
}

/// A fresh path under the system temp dir, removed (with everything in it)
/// on drop. The directory itself is only created by `create`.
pub struct NonAutoCreatingTestDir {
    pub path: PathBuf,
}

impl NonAutoCreatingTestDir {
    pub fn new() -> NonAutoCreatingTestDir {
        NonAutoCreatingTestDir { path: test_temp_dir_path() }
    }

    pub fn create(self) -> Self {
        fs::create_dir_all(&self.path).unwrap();
        self
    }

    /// Writes `contents` to `rel_path` under the dir, creating any
    /// subdirectories on the way.
    pub fn write_file(&self, rel_path: &str, contents: &str) -> PathBuf {
        let path = self.path.join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    /// Copies a file from tests/fixtures into the dir, under the same name.
    pub fn copy_fixture(&self, file_name: &str) -> PathBuf {
        let dest = self.path.join(file_name);
        fs::copy(fixtures_dir().join(file_name), &dest).unwrap();
        dest
    }
}

fn cleanup_test_dir(path: &Path) {
    if path.exists() {
        let skip_env_var = "SKIP_TEMP_DIR_CLEANUP_ON_FAIL";
        let skip_del_on_fail = stmtload::util::sys::env_var_non_empty(skip_env_var);

        if std::thread::panicking() && skip_del_on_fail {
            println!("cleanup_test_dir: panicking. Skipping remove of {}", path.display());
        } else {
            println!(
                "cleanup_test_dir: removing {}. To skip cleanup, set {}",
                path.display(),
                skip_env_var
            );
            let _ = fs::remove_dir_all(path);
        }
    } else {
        println!("cleanup_test_dir: {} did not exist", path.display());
    }
}

impl Drop for NonAutoCreatingTestDir {
    fn drop(&mut self) {
        cleanup_test_dir(&self.path);
    }
}

pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

pub fn ignorable_fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("ignorable_fixtures")
}
