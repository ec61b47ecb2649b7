//! Bounded-memory streaming of a response body to disk

use crate::core::error::{DorkyError, Result};
use std::io::{self, Read, Write};
use std::path::Path;
use tempfile::Builder;

/// Which side of a chunked copy failed
#[derive(Debug)]
pub enum CopyError {
    Read(io::Error),
    Write(io::Error),
}

/// Copy `reader` into `writer` one chunk at a time
///
/// Holds at most `chunk_size` bytes in memory and issues exactly one
/// `write_all` per successful read. `on_progress` receives the running total
/// after each chunk.
pub fn copy_chunked<R, W, F>(
    reader: &mut R,
    writer: &mut W,
    chunk_size: usize,
    mut on_progress: F,
) -> std::result::Result<u64, CopyError>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
    F: FnMut(u64),
{
    let mut buffer = vec![0u8; chunk_size.max(1)];
    let mut total = 0u64;

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(CopyError::Read(e)),
        };

        writer
            .write_all(&buffer[..bytes_read])
            .map_err(CopyError::Write)?;
        total += bytes_read as u64;
        on_progress(total);
    }

    writer.flush().map_err(CopyError::Write)?;
    Ok(total)
}

/// Stream `reader` into `dest_path`, replacing it only once complete
///
/// Missing parent directories are created. Data goes to a hidden temporary
/// file next to the destination which is renamed over `dest_path` after the
/// last chunk; if anything fails the temporary file is removed and
/// `dest_path` is left as it was.
pub fn write_atomically<R, F>(
    reader: &mut R,
    dest_path: &Path,
    chunk_size: usize,
    on_progress: F,
) -> Result<u64>
where
    R: Read + ?Sized,
    F: FnMut(u64),
{
    let parent = match dest_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(|e| DorkyError::file_system(parent, e))?;

    let mut builder = Builder::new();
    builder.prefix(".dorky-").suffix(".part");
    // Created like a plain file (0666 minus umask), not tempfile's 0600
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let mut temp = builder
        .tempfile_in(parent)
        .map_err(|e| DorkyError::file_system(parent, e))?;

    let written = copy_chunked(reader, temp.as_file_mut(), chunk_size, on_progress).map_err(
        |e| match e {
            CopyError::Read(err) => body_read_error(err),
            CopyError::Write(err) => DorkyError::file_system(temp.path(), err),
        },
    )?;

    // Replacing a file keeps its mode
    if let Ok(existing) = std::fs::metadata(dest_path) {
        if existing.is_file() {
            temp.as_file()
                .set_permissions(existing.permissions())
                .map_err(|e| DorkyError::file_system(temp.path(), e))?;
        }
    }

    temp.as_file()
        .sync_all()
        .map_err(|e| DorkyError::file_system(dest_path, e))?;
    temp.persist(dest_path)
        .map_err(|e| DorkyError::file_system(dest_path, e.error))?;

    Ok(written)
}

/// Recover the transport error hidden inside a body read failure
fn body_read_error(err: io::Error) -> DorkyError {
    let kind = err.kind();
    match err.into_inner() {
        Some(inner) => match inner.downcast::<reqwest::Error>() {
            Ok(transport) => DorkyError::Transport(*transport),
            Err(other) => DorkyError::BodyRead(io::Error::new(kind, other)),
        },
        None => DorkyError::BodyRead(io::Error::from(kind)),
    }
}
