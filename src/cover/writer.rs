//! Writing fetched covers to their stub paths.
//!
//! Target directories are never created: a missing directory means the
//! library layout does not match the configured templates, and writing
//! anywhere else would just hide that.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::{CoverStream, FetchedCover};
use crate::enrichment::EnrichmentError;
use crate::paths::with_extension;

/// Cover write errors
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("Directory does not exist: {0}")]
    MissingDirectory(PathBuf),

    #[error("Failed to write {0}: {1}")]
    Io(PathBuf, std::io::Error),

    #[error("Cover download failed: {0}")]
    Stream(#[from] EnrichmentError),
}

/// Write `cover` to `<stub>.<ext>` for every stub in `targets`.
///
/// The parent directory of every target is checked before anything is
/// written; if one is missing, no file is created at all. The body is
/// streamed into the first target and copied to the others. Each file goes
/// through a `.part` sibling that is renamed into place, so an interrupted
/// write never leaves a truncated cover behind. Existing covers at the exact
/// target path are replaced.
///
/// Returns the written paths.
pub async fn write_cover(
    cover: FetchedCover,
    targets: &[PathBuf],
) -> Result<Vec<PathBuf>, WriteError> {
    for stub in targets {
        match stub.parent() {
            Some(dir) if dir.is_dir() => {}
            Some(dir) => return Err(WriteError::MissingDirectory(dir.to_path_buf())),
            None => return Err(WriteError::MissingDirectory(stub.clone())),
        }
    }

    let Some((first, rest)) = targets.split_first() else {
        return Ok(Vec::new());
    };

    let ext = cover.format.extension();
    let first_path = with_extension(first, ext);
    debug!("Saving cover at {:?}", first_path);
    stream_to_file(cover.body, &first_path).await?;

    let mut written = vec![first_path];
    for stub in rest {
        let path = with_extension(stub, ext);
        debug!("Saving cover at {:?}", path);
        copy_into_place(&written[0], &path).await?;
        written.push(path);
    }

    Ok(written)
}

fn partial_path(path: &Path) -> PathBuf {
    with_extension(path, "part")
}

async fn stream_to_file(body: CoverStream, path: &Path) -> Result<(), WriteError> {
    let temp = partial_path(path);
    if let Err(e) = write_stream(body, &temp).await {
        let _ = fs::remove_file(&temp).await;
        return Err(e);
    }

    rename_into_place(&temp, path).await
}

async fn write_stream(mut body: CoverStream, temp: &Path) -> Result<(), WriteError> {
    let io_err = |e| WriteError::Io(temp.to_path_buf(), e);

    let mut file = File::create(temp).await.map_err(io_err)?;
    while let Some(chunk) = body.next().await {
        file.write_all(&chunk?).await.map_err(io_err)?;
    }
    file.flush().await.map_err(io_err)?;
    Ok(())
}

async fn copy_into_place(source: &Path, path: &Path) -> Result<(), WriteError> {
    let temp = partial_path(path);
    if let Err(e) = fs::copy(source, &temp).await {
        let _ = fs::remove_file(&temp).await;
        return Err(WriteError::Io(path.to_path_buf(), e));
    }

    rename_into_place(&temp, path).await
}

async fn rename_into_place(temp: &Path, path: &Path) -> Result<(), WriteError> {
    if let Err(e) = fs::rename(temp, path).await {
        let _ = fs::remove_file(temp).await;
        return Err(WriteError::Io(path.to_path_buf(), e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cover::ImageFormat;
    use futures::stream;
    use tempfile::TempDir;

    fn png(data: &[u8]) -> FetchedCover {
        FetchedCover::from_bytes(ImageFormat::Png, data.to_vec(), "http://img/a.png")
    }

    #[tokio::test]
    async fn test_writes_every_target() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("one")).unwrap();
        std::fs::create_dir(temp.path().join("two")).unwrap();
        let targets = vec![temp.path().join("one/Foo"), temp.path().join("two/Foo")];

        let written = write_cover(png(b"image"), &targets).await.unwrap();

        assert_eq!(
            written,
            vec![temp.path().join("one/Foo.png"), temp.path().join("two/Foo.png")]
        );
        for path in &written {
            assert_eq!(std::fs::read(path).unwrap(), b"image");
        }
        assert!(!temp.path().join("one/Foo.png.part").exists());
    }

    #[tokio::test]
    async fn test_missing_directory_writes_nothing() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("exists")).unwrap();
        let targets = vec![temp.path().join("exists/Foo"), temp.path().join("absent/Foo")];

        let err = write_cover(png(b"image"), &targets).await.unwrap_err();

        assert!(matches!(err, WriteError::MissingDirectory(ref dir) if dir.ends_with("absent")));
        assert_eq!(std::fs::read_dir(temp.path().join("exists")).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_overwrites_existing_cover() {
        let temp = TempDir::new().unwrap();
        let stub = temp.path().join("Foo");
        std::fs::write(temp.path().join("Foo.png"), b"old").unwrap();

        write_cover(png(b"new"), &[stub]).await.unwrap();
        assert_eq!(std::fs::read(temp.path().join("Foo.png")).unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_jpeg_extension_and_dotted_names() {
        let temp = TempDir::new().unwrap();
        let stub = temp.path().join("Mr. Oizo");
        let cover = FetchedCover::from_bytes(ImageFormat::Jpeg, b"jpg".to_vec(), "http://img/a.jpg");

        let written = write_cover(cover, &[stub]).await.unwrap();
        assert_eq!(written, vec![temp.path().join("Mr. Oizo.jpg")]);
    }

    #[tokio::test]
    async fn test_chunks_are_concatenated() {
        let temp = TempDir::new().unwrap();
        let cover = FetchedCover {
            format: ImageFormat::Png,
            body: stream::iter(vec![Ok(b"ab".to_vec()), Ok(b"cd".to_vec())]).boxed(),
            source_url: "http://img/a.png".to_string(),
        };

        write_cover(cover, &[temp.path().join("x")]).await.unwrap();
        assert_eq!(std::fs::read(temp.path().join("x.png")).unwrap(), b"abcd");
    }

    #[tokio::test]
    async fn test_broken_stream_leaves_no_file() {
        let temp = TempDir::new().unwrap();
        let cover = FetchedCover {
            format: ImageFormat::Png,
            body: stream::iter(vec![
                Ok(b"ab".to_vec()),
                Err(EnrichmentError::Network("connection reset".into())),
            ])
            .boxed(),
            source_url: "http://img/a.png".to_string(),
        };

        let err = write_cover(cover, &[temp.path().join("x")]).await.unwrap_err();
        assert!(matches!(err, WriteError::Stream(_)));
        assert!(!temp.path().join("x.png").exists());
        assert!(!temp.path().join("x.png.part").exists());
    }

    #[tokio::test]
    async fn test_failed_rename_removes_part_file() {
        let temp = TempDir::new().unwrap();
        // A non-empty directory where the cover should go cannot be replaced
        std::fs::create_dir(temp.path().join("Foo.png")).unwrap();
        std::fs::write(temp.path().join("Foo.png/keep"), b"x").unwrap();

        let err = write_cover(png(b"image"), &[temp.path().join("Foo")])
            .await
            .unwrap_err();

        assert!(matches!(err, WriteError::Io(ref p, _) if p.ends_with("Foo.png")));
        assert!(!temp.path().join("Foo.png.part").exists());
    }

    #[tokio::test]
    async fn test_failed_copy_rename_removes_part_file() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("one")).unwrap();
        std::fs::create_dir_all(temp.path().join("two/Foo.png")).unwrap();
        std::fs::write(temp.path().join("two/Foo.png/keep"), b"x").unwrap();
        let targets = vec![temp.path().join("one/Foo"), temp.path().join("two/Foo")];

        let err = write_cover(png(b"image"), &targets).await.unwrap_err();

        assert!(matches!(err, WriteError::Io(ref p, _) if p.ends_with("two/Foo.png")));
        assert!(!temp.path().join("two/Foo.png.part").exists());
    }

    #[tokio::test]
    async fn test_no_targets() {
        assert!(write_cover(png(b"x"), &[]).await.unwrap().is_empty());
    }
}
