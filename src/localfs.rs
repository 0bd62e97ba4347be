//! Local filesystem access for the served directory.
//!
//! Reading goes through the `dav_server` filesystem layer. What is here is
//! used by uploads and startup.

#[cfg(unix)]
use std::os::unix::fs::DirBuilderExt;
use std::path::Path;

use bytes::Bytes;
use futures_util::{pin_mut, Stream, StreamExt};
use tokio::io::AsyncWriteExt;

use crate::errors::{SwebError, SwebResult};

/// Create `path` and its parents if missing, with mode 0755.
pub(crate) fn prepare_dir(path: &Path) -> SwebResult<()> {
    if path.is_dir() {
        return Ok(());
    }
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(0o755);
    builder.create(path).map_err(|source| SwebError::CreateDir {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("created directory {}", path.display());
    Ok(())
}

/// Accept a client supplied file name only if it names a plain file
/// directly inside the target directory.
pub(crate) fn sanitize_filename(name: &str) -> SwebResult<&str> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0', ':']);
    if bad {
        return Err(SwebError::InvalidFilename(name.to_string()));
    }
    Ok(name)
}

/// Write a stream of chunks to `path`, replacing a regular file that was
/// there. A symlink at `path` is refused, never followed.
///
/// On failure the partially written file is removed.
pub(crate) async fn write_stream<S, E>(path: &Path, chunks: S) -> SwebResult<u64>
where
    S: Stream<Item = Result<Bytes, E>>,
    SwebError: From<E>,
{
    if let Ok(meta) = tokio::fs::symlink_metadata(path).await {
        if meta.file_type().is_symlink() {
            return Err(SwebError::Symlink(path.to_path_buf()));
        }
    }
    let mut file = tokio::fs::File::create(path).await?;
    pin_mut!(chunks);
    let mut written = 0u64;
    let result = async {
        while let Some(chunk) = chunks.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        Ok::<(), SwebError>(())
    }
    .await;
    if let Err(err) = result {
        drop(file);
        if let Err(e) = tokio::fs::remove_file(path).await {
            warn!("cannot remove partial upload {}: {}", path.display(), e);
        }
        return Err(err);
    }
    Ok(written)
}
