//! Asynchronous image loading.
//!
//! Loads are expressed as `'static` futures so a caller can start several,
//! release its borrows, and join them all before applying the results.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use arena_common::AssetLoadError;
use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::debug;

use crate::raster::Raster;

/// Fetches images by URI.
pub trait ImageLoader: Send + Sync {
    /// Starts loading `uri`. The future resolves to the decoded image or a
    /// load failure.
    fn load(&self, uri: &str) -> BoxFuture<'static, Result<Raster, AssetLoadError>>;
}

/// Loads images from a directory on disk.
///
/// URIs are treated as paths relative to `root`; a leading `/` is ignored,
/// so `/assets/backgrounds/dojo-bg.png` resolves to
/// `<root>/assets/backgrounds/dojo-bg.png`.
#[derive(Debug, Clone)]
pub struct FsImageLoader {
    root: PathBuf,
}

impl FsImageLoader {
    /// Creates a loader rooted at `root`.
    #[must_use]
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Filesystem path a URI maps to.
    #[must_use]
    pub fn resolve(&self, uri: &str) -> PathBuf {
        self.root.join(uri.trim_start_matches('/'))
    }
}

impl ImageLoader for FsImageLoader {
    fn load(&self, uri: &str) -> BoxFuture<'static, Result<Raster, AssetLoadError>> {
        let path = self.resolve(uri);
        let uri = uri.to_string();
        async move {
            let bytes = match tokio::fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    return Err(AssetLoadError::Missing(uri));
                },
                Err(source) => return Err(AssetLoadError::Io { uri, source }),
            };
            let decoded = image::load_from_memory(&bytes).map_err(|e| AssetLoadError::Decode {
                uri: uri.clone(),
                reason: e.to_string(),
            })?;
            let rgba = decoded.to_rgba8();
            debug!("Loaded {} ({}x{})", uri, rgba.width(), rgba.height());
            Ok(Raster::new(rgba))
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use arena_common::Color;

    #[test]
    fn test_resolve_strips_leading_slash() {
        let loader = FsImageLoader::new("/srv/game");
        assert_eq!(
            loader.resolve("/assets/backgrounds/dojo-bg.png"),
            PathBuf::from("/srv/game/assets/backgrounds/dojo-bg.png")
        );
    }

    #[tokio::test]
    async fn test_load_png() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut canvas = Canvas::new(4, 2);
        canvas.clear(Color::rgb(1, 2, 3));
        canvas
            .save_png(dir.path().join("bg.png"))
            .expect("write png");

        let loader = FsImageLoader::new(dir.path());
        let raster = loader.load("/bg.png").await.expect("load");
        assert_eq!((raster.width(), raster.height()), (4, 2));
        assert_eq!(raster.color_at(0, 0), Color::rgb(1, 2, 3));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let loader = FsImageLoader::new(dir.path());
        let err = loader.load("nope.png").await.expect_err("should fail");
        assert!(matches!(err, AssetLoadError::Missing(uri) if uri == "nope.png"));
    }

    #[tokio::test]
    async fn test_garbage_fails_to_decode() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("bad.png"), b"not an image").expect("write");
        let loader = FsImageLoader::new(dir.path());
        let err = loader.load("bad.png").await.expect_err("should fail");
        assert!(matches!(err, AssetLoadError::Decode { .. }));
    }
}
