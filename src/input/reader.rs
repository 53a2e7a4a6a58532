use anyhow::{Context, Result, bail};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Largest chat file accepted for import.
pub const MAX_IMPORT_SIZE: usize = 10 * 1024 * 1024;

/// Reads an exported chat from a file, or from stdin when `path` is `None`
/// or `-`.
pub fn read_chat_file(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => read_file(p),
        _ => read_stdin(),
    }
}

fn read_file(path: &Path) -> Result<String> {
    let metadata = fs::metadata(path)
        .with_context(|| format!("Failed to access file: {}", path.display()))?;

    let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
    if size > MAX_IMPORT_SIZE {
        bail!(too_large(size));
    }

    fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
}

#[allow(clippy::significant_drop_tightening)]
fn read_stdin() -> Result<String> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 8192];
    let mut stdin = io::stdin().lock();

    loop {
        let bytes_read = stdin
            .read(&mut chunk)
            .context("Failed to read from stdin")?;
        if bytes_read == 0 {
            break;
        }

        buffer.extend_from_slice(&chunk[..bytes_read]);
        if buffer.len() > MAX_IMPORT_SIZE {
            bail!(too_large(buffer.len()));
        }
    }

    String::from_utf8(buffer).context("Chat file is not valid UTF-8")
}

fn too_large(size: usize) -> String {
    format!(
        "Chat file ({:.1} MB) exceeds maximum allowed size ({} MB)",
        size as f64 / 1024.0 / 1024.0,
        MAX_IMPORT_SIZE / 1024 / 1024
    )
}
