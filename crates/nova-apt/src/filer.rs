//! Output sinks for generated compilation units.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::AptError;

/// Creates the compilation unit for a generated type and persists its text.
pub trait Filer {
    /// Write `source` as the compilation unit of `qualified_name` and return
    /// where it ended up.
    fn write_source(&mut self, qualified_name: &str, source: &str) -> Result<PathBuf, AptError>;
}

/// `com.example.Foo` -> `com/example/Foo.java`
pub fn source_file_path(qualified_name: &str) -> PathBuf {
    let mut path: PathBuf = qualified_name.split('.').collect();
    path.set_extension("java");
    path
}

/// Writes sources below a generated-sources root.
///
/// Each file is written to a unique temporary sibling and renamed into
/// place, so a failed write never leaves a truncated `.java` file behind.
#[derive(Debug, Clone)]
pub struct FsFiler {
    root: PathBuf,
}

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

impl FsFiler {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Filer for FsFiler {
    fn write_source(&mut self, qualified_name: &str, source: &str) -> Result<PathBuf, AptError> {
        let dest = self.root.join(source_file_path(qualified_name));
        let create_err = |source: io::Error| AptError::CreateFile {
            target: qualified_name.to_string(),
            source,
        };
        let write_err = |source: io::Error| AptError::WriteFile {
            target: qualified_name.to_string(),
            source,
        };

        let parent = dest
            .parent()
            .ok_or_else(|| create_err(io::Error::new(io::ErrorKind::Other, "no parent directory")))?;
        std::fs::create_dir_all(parent).map_err(create_err)?;
        let (tmp_path, mut file) = open_unique_tmp_file(&dest, parent).map_err(create_err)?;

        let write_result = (|| -> io::Result<()> {
            file.write_all(source.as_bytes())?;
            file.sync_all()?;
            Ok(())
        })();
        drop(file);
        if let Err(err) = write_result {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(write_err(err));
        }

        if let Err(err) = rename_overwrite(&tmp_path, &dest) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(write_err(err));
        }

        Ok(dest)
    }
}

fn open_unique_tmp_file(dest: &Path, parent: &Path) -> io::Result<(PathBuf, std::fs::File)> {
    let file_name = dest
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "destination path has no file name"))?;
    let pid = std::process::id();

    loop {
        let counter = TMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut tmp_name = file_name.to_os_string();
        tmp_name.push(format!(".tmp.{pid}.{counter}"));
        let tmp_path = parent.join(tmp_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)
        {
            Ok(file) => return Ok((tmp_path, file)),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(err) => return Err(err),
        }
    }
}

fn rename_overwrite(src: &Path, dest: &Path) -> io::Result<()> {
    const MAX_RENAME_ATTEMPTS: usize = 1024;
    let mut attempts = 0usize;

    loop {
        match std::fs::rename(src, dest) {
            Ok(()) => return Ok(()),
            Err(err)
                if cfg!(windows)
                    && (err.kind() == io::ErrorKind::AlreadyExists || dest.exists()) =>
            {
                match std::fs::remove_file(dest) {
                    Ok(()) => {}
                    Err(remove_err) if remove_err.kind() == io::ErrorKind::NotFound => {}
                    Err(remove_err) => return Err(remove_err),
                }

                attempts += 1;
                if attempts >= MAX_RENAME_ATTEMPTS {
                    return Err(err);
                }
                continue;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Keeps generated sources in memory, keyed by qualified name.
#[derive(Debug, Default)]
pub struct MemoryFiler {
    pub files: BTreeMap<String, String>,
}

impl MemoryFiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, qualified_name: &str) -> Option<&str> {
        self.files.get(qualified_name).map(String::as_str)
    }
}

impl Filer for MemoryFiler {
    fn write_source(&mut self, qualified_name: &str, source: &str) -> Result<PathBuf, AptError> {
        self.files
            .insert(qualified_name.to_string(), source.to_string());
        Ok(source_file_path(qualified_name))
    }
}
