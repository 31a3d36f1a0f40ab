//! Atomic file writes.
//!
//! Contents go to a hidden temporary file in the target directory, which is
//! then renamed over the target so readers never observe a partial write.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use camino::{Utf8Component, Utf8Path};
use cap_std::fs::{Dir, OpenOptions};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Write `contents` to `path` (a bare file name inside `dir`) atomically.
///
/// # Errors
/// Returns [`io::ErrorKind::InvalidInput`] when `path` is not a single file
/// name, and the underlying I/O error when writing or renaming fails.
pub(crate) fn write_atomic(dir: &Dir, path: &Utf8Path, contents: &[u8]) -> io::Result<()> {
    let file_name = single_file_name(path)?;
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    let tmp_name = format!(
        ".{}.tmp.{}.{}.{}",
        file_name,
        std::process::id(),
        suffix,
        counter
    );

    write_to_temp_file(dir, &tmp_name, contents)?;
    if let Err(err) = dir.rename(&tmp_name, dir, file_name) {
        drop(dir.remove_file(&tmp_name));
        return Err(err);
    }
    sync_directory(dir);
    Ok(())
}

/// Reject anything but a plain file name so keys cannot escape the directory.
pub(crate) fn single_file_name(path: &Utf8Path) -> io::Result<&str> {
    let mut components = path.components();
    match (components.next(), components.next()) {
        (Some(Utf8Component::Normal(name)), None) => Ok(name),
        _ => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{path} must be a plain file name"),
        )),
    }
}

fn write_to_temp_file(dir: &Dir, tmp_name: &str, contents: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(tmp_name, &options)?;

    let written = file.write_all(contents).and_then(|()| file.sync_all());
    if let Err(err) = written {
        drop(file);
        drop(dir.remove_file(tmp_name));
        return Err(err);
    }
    Ok(())
}

fn sync_directory(dir: &Dir) {
    // Best effort; a failed directory sync does not undo the rename.
    if dir.open(".").and_then(|handle| handle.sync_all()).is_err() {
        tracing::debug!("directory sync after atomic write failed");
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use cap_std::ambient_authority;
    use rstest::rstest;

    fn temp_dir() -> (tempfile::TempDir, Dir) {
        let tmp = tempfile::tempdir().expect("temp dir");
        let dir = Dir::open_ambient_dir(tmp.path(), ambient_authority()).expect("open temp dir");
        (tmp, dir)
    }

    #[rstest]
    fn replaces_existing_contents() {
        let (_tmp, dir) = temp_dir();
        let path = Utf8Path::new("user");
        write_atomic(&dir, path, b"first").expect("first write");
        write_atomic(&dir, path, b"second").expect("second write");
        assert_eq!(dir.read_to_string(path).expect("read"), "second");
    }

    #[rstest]
    fn leaves_no_temporary_files_behind() {
        let (_tmp, dir) = temp_dir();
        write_atomic(&dir, Utf8Path::new("sessionToken"), b"tok").expect("write");
        let names: Vec<String> = dir
            .entries()
            .expect("list")
            .filter_map(Result::ok)
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        assert_eq!(names, vec!["sessionToken".to_owned()]);
    }

    #[rstest]
    #[case("../escape")]
    #[case("nested/key")]
    #[case("")]
    fn rejects_paths_that_are_not_plain_names(#[case] raw: &str) {
        let (_tmp, dir) = temp_dir();
        let err = write_atomic(&dir, Utf8Path::new(raw), b"x").expect_err("must reject");
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
