use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use futures::channel::oneshot;
use image::RgbaImage;
use log::{debug, warn};
use parking_lot::RwLock;
use thiserror::Error;
use uuid::Uuid;

use crate::id_generator::ElementId;
use crate::state::DesignState;

pub const BLOB_PREFIX: &str = "blob:";
const FILE_URL_PREFIX: &str = "file://";

#[derive(Debug, Error)]
pub enum ImageLoadError {
    #[error("Failed to read {reference}: {source}")]
    Fetch {
        reference: String,
        #[source]
        source: std::io::Error,
    },
    #[error("No blob registered for {0}")]
    UnknownBlob(String),
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Image load was cancelled")]
    Cancelled,
}

pub type LoadResult = Result<RgbaImage, ImageLoadError>;

/// Resolves an image reference to encoded bytes
pub trait ImageSource: Send + Sync {
    fn handles(&self, _reference: &str) -> bool {
        true
    }

    fn fetch(&self, reference: &str) -> Result<Vec<u8>, ImageLoadError>;
}

/// Filesystem paths and `file://` URLs; relative paths resolve against `root`
#[derive(Debug, Clone, Default)]
pub struct FsImageSource {
    root: Option<PathBuf>,
}

impl FsImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, reference: &str) -> PathBuf {
        let path = PathBuf::from(reference.strip_prefix(FILE_URL_PREFIX).unwrap_or(reference));
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path,
        }
    }
}

impl ImageSource for FsImageSource {
    fn handles(&self, reference: &str) -> bool {
        !reference.starts_with(BLOB_PREFIX)
    }

    fn fetch(&self, reference: &str) -> Result<Vec<u8>, ImageLoadError> {
        std::fs::read(self.resolve(reference)).map_err(|source| ImageLoadError::Fetch {
            reference: reference.to_owned(),
            source,
        })
    }
}

/// In-memory bytes for uploads and dropped files, addressed as `blob:<uuid>`
#[derive(Debug, Clone, Default)]
pub struct BlobStore {
    blobs: Arc<RwLock<HashMap<Uuid, Arc<Vec<u8>>>>>,
}

impl BlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `bytes` and return the reference to put in an element
    pub fn register(&self, bytes: Vec<u8>) -> String {
        let key = Uuid::new_v4();
        self.blobs.write().insert(key, Arc::new(bytes));
        format!("{BLOB_PREFIX}{key}")
    }

    pub fn remove(&self, reference: &str) -> bool {
        parse_blob(reference).is_some_and(|key| self.blobs.write().remove(&key).is_some())
    }

    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }
}

fn parse_blob(reference: &str) -> Option<Uuid> {
    reference
        .strip_prefix(BLOB_PREFIX)
        .and_then(|key| Uuid::parse_str(key).ok())
}

impl ImageSource for BlobStore {
    fn handles(&self, reference: &str) -> bool {
        reference.starts_with(BLOB_PREFIX)
    }

    fn fetch(&self, reference: &str) -> Result<Vec<u8>, ImageLoadError> {
        parse_blob(reference)
            .and_then(|key| self.blobs.read().get(&key).cloned())
            .map(|bytes| Vec::clone(&bytes))
            .ok_or_else(|| ImageLoadError::UnknownBlob(reference.to_owned()))
    }
}

/// Tries each source that claims the reference, in order
#[derive(Clone, Default)]
pub struct ChainedSource {
    sources: Vec<Arc<dyn ImageSource>>,
}

impl ChainedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: impl ImageSource + 'static) -> Self {
        self.sources.push(Arc::new(source));
        self
    }
}

impl ImageSource for ChainedSource {
    fn handles(&self, reference: &str) -> bool {
        self.sources.iter().any(|source| source.handles(reference))
    }

    fn fetch(&self, reference: &str) -> Result<Vec<u8>, ImageLoadError> {
        let mut last_error = None;
        for source in self.sources.iter().filter(|source| source.handles(reference)) {
            match source.fetch(reference) {
                Ok(bytes) => return Ok(bytes),
                Err(err) => last_error = Some(err),
            }
        }
        Err(last_error.unwrap_or_else(|| ImageLoadError::UnknownBlob(reference.to_owned())))
    }
}

fn fetch_and_decode(source: &dyn ImageSource, reference: &str) -> LoadResult {
    let bytes = source.fetch(reference)?;
    Ok(image::load_from_memory(&bytes)?.to_rgba8())
}

/// Runs fetch + decode off the UI thread; one oneshot per request
#[derive(Clone)]
pub struct ImageLoader {
    source: Arc<dyn ImageSource>,
}

impl ImageLoader {
    pub fn new(source: impl ImageSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    /// Dropping the returned receiver cancels the load
    pub fn load(&self, reference: String) -> oneshot::Receiver<LoadResult> {
        let (sender, receiver) = oneshot::channel();
        let source = Arc::clone(&self.source);
        let job = move || {
            if sender.is_canceled() {
                return;
            }
            let result = fetch_and_decode(source.as_ref(), &reference);
            // The receiver may be gone; that is a cancellation
            let _ = sender.send(result);
        };

        #[cfg(not(target_arch = "wasm32"))]
        if let Err(err) = std::thread::Builder::new()
            .name("image-loader".to_owned())
            .spawn(job)
        {
            warn!("Failed to spawn image loader thread: {err}");
        }

        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(async move { job() });

        receiver
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageStatus {
    Loading,
    Ready,
    Failed,
}

struct ImageEntry {
    reference: String,
    status: ImageStatus,
    pending: Option<oneshot::Receiver<LoadResult>>,
    bitmap: Option<Arc<RgbaImage>>,
    version: u64,
}

/// Tracks one bitmap load per image element
pub struct ImageStore {
    loader: ImageLoader,
    entries: HashMap<ElementId, ImageEntry>,
}

impl ImageStore {
    pub fn new(loader: ImageLoader) -> Self {
        Self {
            loader,
            entries: HashMap::new(),
        }
    }

    /// Start loads for new image elements, cancel loads for removed ones
    pub fn sync(&mut self, design: &DesignState) {
        self.entries.retain(|id, _| {
            let keep = design.contains(*id);
            if !keep {
                debug!("Cancelling image load for removed {id}");
            }
            keep
        });

        for (_, element) in design.iter_all().filter(|(_, e)| e.is_image()) {
            let id = element.id();
            let reference = element.content();
            match self.entries.get_mut(&id) {
                Some(entry) if entry.reference == reference => {}
                Some(entry) => {
                    debug!("Reference of {id} changed, reloading");
                    entry.reference = reference.to_owned();
                    entry.status = ImageStatus::Loading;
                    entry.pending = Some(self.loader.load(reference.to_owned()));
                }
                None => {
                    debug!("Loading image {reference} for {id}");
                    self.entries.insert(
                        id,
                        ImageEntry {
                            reference: reference.to_owned(),
                            status: ImageStatus::Loading,
                            pending: Some(self.loader.load(reference.to_owned())),
                            bitmap: None,
                            version: 0,
                        },
                    );
                }
            }
        }
    }

    /// Apply finished loads whose element still exists. Returns how many were applied.
    pub fn poll(&mut self, design: &DesignState) -> usize {
        let mut applied = 0;
        let mut orphaned = Vec::new();

        for (id, entry) in self.entries.iter_mut() {
            let Some(receiver) = entry.pending.as_mut() else {
                continue;
            };
            let outcome = match receiver.try_recv() {
                Ok(None) => continue,
                Ok(Some(result)) => result,
                Err(oneshot::Canceled) => Err(ImageLoadError::Cancelled),
            };
            entry.pending = None;

            if !design.contains(*id) {
                debug!("Discarding image result for deleted {id}");
                orphaned.push(*id);
                continue;
            }

            match outcome {
                Ok(bitmap) => {
                    debug!("Image for {id} ready ({}x{})", bitmap.width(), bitmap.height());
                    entry.bitmap = Some(Arc::new(bitmap));
                    entry.version += 1;
                    entry.status = ImageStatus::Ready;
                    applied += 1;
                }
                Err(err) => {
                    warn!("Image {} for {id} failed: {err}", entry.reference);
                    entry.status = ImageStatus::Failed;
                }
            }
        }

        for id in orphaned {
            self.entries.remove(&id);
        }
        applied
    }

    pub fn status(&self, id: ElementId) -> Option<ImageStatus> {
        self.entries.get(&id).map(|entry| entry.status)
    }

    pub fn bitmap(&self, id: ElementId) -> Option<&RgbaImage> {
        self.entries.get(&id)?.bitmap.as_deref()
    }

    /// Bumped each time a new bitmap is applied; part of the texture key
    pub fn bitmap_version(&self, id: ElementId) -> u64 {
        self.entries.get(&id).map_or(0, |entry| entry.version)
    }

    pub fn has_pending(&self) -> bool {
        self.entries.values().any(|entry| entry.pending.is_some())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Poll until nothing is pending or `timeout` passes
    #[cfg(not(target_arch = "wasm32"))]
    pub fn wait_for_loads(&mut self, design: &DesignState, timeout: std::time::Duration) -> bool {
        let start = std::time::Instant::now();
        loop {
            self.poll(design);
            if !self.has_pending() {
                return true;
            }
            if start.elapsed() > timeout {
                return false;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::time::Duration;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, image::Rgba([200, 10, 10, 255]));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_blob_round_trip() {
        let blobs = BlobStore::new();
        let reference = blobs.register(vec![1, 2, 3]);
        assert!(reference.starts_with(BLOB_PREFIX));
        assert_eq!(blobs.fetch(&reference).unwrap(), vec![1, 2, 3]);
        assert!(blobs.remove(&reference));
        assert!(matches!(blobs.fetch(&reference), Err(ImageLoadError::UnknownBlob(_))));
    }

    #[test]
    fn test_chained_source_routes_by_prefix() {
        let blobs = BlobStore::new();
        let reference = blobs.register(png_bytes(2, 2));
        let chain = ChainedSource::new().with(blobs).with(FsImageSource::new());

        assert!(chain.fetch(&reference).is_ok());
        assert!(matches!(
            chain.fetch("/definitely/missing.png"),
            Err(ImageLoadError::Fetch { .. })
        ));
    }

    #[test]
    fn test_load_applies_and_bumps_version() {
        let blobs = BlobStore::new();
        let reference = blobs.register(png_bytes(8, 4));
        let mut design = DesignState::new();
        let id = design.add_image(&reference);

        let mut store = ImageStore::new(ImageLoader::new(blobs));
        store.sync(&design);
        assert_eq!(store.status(id), Some(ImageStatus::Loading));
        assert!(store.wait_for_loads(&design, Duration::from_secs(5)));

        assert_eq!(store.status(id), Some(ImageStatus::Ready));
        assert_eq!(store.bitmap_version(id), 1);
        assert_eq!(store.bitmap(id).map(|b| b.dimensions()), Some((8, 4)));
    }

    #[test]
    fn test_decode_failure_marks_failed() {
        let blobs = BlobStore::new();
        let reference = blobs.register(b"not an image".to_vec());
        let mut design = DesignState::new();
        let id = design.add_image(&reference);

        let mut store = ImageStore::new(ImageLoader::new(blobs));
        store.sync(&design);
        assert!(store.wait_for_loads(&design, Duration::from_secs(5)));
        assert_eq!(store.status(id), Some(ImageStatus::Failed));
        assert!(store.bitmap(id).is_none());
    }

    #[test]
    fn test_late_result_for_deleted_element_is_ignored() {
        let blobs = BlobStore::new();
        let reference = blobs.register(png_bytes(4, 4));
        let mut design = DesignState::new();
        let id = design.add_image(&reference);

        let mut store = ImageStore::new(ImageLoader::new(blobs));
        store.sync(&design);
        design.delete_element(id);

        assert!(store.wait_for_loads(&design, Duration::from_secs(5)));
        assert!(store.bitmap(id).is_none());
        assert_eq!(store.bitmap_version(id), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_sync_cancels_removed() {
        let blobs = BlobStore::new();
        let reference = blobs.register(png_bytes(4, 4));
        let mut design = DesignState::new();
        let id = design.add_image(&reference);

        let mut store = ImageStore::new(ImageLoader::new(blobs));
        store.sync(&design);
        design.delete_element(id);
        store.sync(&design);
        assert!(store.is_empty());
        assert!(!store.has_pending());
    }
}
