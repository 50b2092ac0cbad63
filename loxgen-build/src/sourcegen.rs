//! Writing generated sources to disk.

use std::{
  fs::{self, File},
  io::{self, Write},
  path::{Path, PathBuf},
};

pub const EXTENSION: &str = "hpp";

/// The file a grammar named `base_name` is generated into.
pub fn output_file(out_dir: &Path, base_name: &str) -> PathBuf {
  out_dir.join(format!("{}.{EXTENSION}", base_name.to_lowercase()))
}

/// Writes `contents` to `file`, unless it already holds exactly that text.
///
/// Returns `true` if the file was written.
pub fn ensure_file_contents(file: &Path, contents: &str) -> io::Result<bool> {
  if let Ok(old_contents) = fs::read_to_string(file) {
    if old_contents == contents {
      info!("{} is up to date", file.display());
      return Ok(false);
    }
  }

  info!("updating {}", file.display());

  let mut out = File::create(file)?;
  out.write_all(contents.as_bytes())?;
  out.flush()?;
  Ok(true)
}
