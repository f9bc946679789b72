use std::{collections::HashMap, io::ErrorKind, path::PathBuf, sync::Arc};

use async_trait::async_trait;

use crate::{error::AssetError, font::Font, model::ModelData, texture::TextureData};

/// Where resource bytes come from. Implementors only provide `fetch`;
/// decoding happens in the provided methods on the blocking pool.
#[async_trait]
pub trait ResourceLoader: Send + Sync + 'static {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError>;

    /// Maps a font face name (e.g. `helvetiker_regular`) to a url.
    fn font_url(&self, name: &str) -> String {
        format!("fonts/{name}.typeface.json")
    }

    async fn load_text(&self, url: &str) -> Result<String, AssetError> {
        let bytes = self.fetch(url).await?;
        String::from_utf8(bytes).map_err(|source| AssetError::Utf8 {
            url: url.to_owned(),
            source,
        })
    }

    async fn load_image(&self, url: &str) -> Result<TextureData, AssetError> {
        let bytes = self.fetch(url).await?;
        let name = url.to_owned();

        tokio::task::spawn_blocking(move || {
            TextureData::decode(&name, &bytes).map_err(|source| AssetError::Image { url: name, source })
        })
        .await
        .map_err(|source| AssetError::Join {
            url: url.to_owned(),
            source,
        })?
    }

    async fn load_model(&self, url: &str) -> Result<ModelData, AssetError> {
        let bytes = self.fetch(url).await?;
        let name = url.to_owned();

        tokio::task::spawn_blocking(move || {
            ModelData::parse_obj(&bytes).map_err(|source| AssetError::Obj { url: name, source })
        })
        .await
        .map_err(|source| AssetError::Join {
            url: url.to_owned(),
            source,
        })?
    }

    async fn load_font(&self, name: &str) -> Result<Font, AssetError> {
        let url = self.font_url(name);
        let bytes = self.fetch(&url).await?;
        Font::from_typeface_json(&bytes).map_err(|source| AssetError::Font { url, source })
    }
}

/// Reads resources from disk, relative to `root`.
#[derive(Clone, Debug)]
pub struct FileLoader {
    root: PathBuf,
    font_dir: String,
}

impl FileLoader {
    pub fn new(root: impl Into<PathBuf>, font_dir: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            font_dir: font_dir.into(),
        }
    }
}

#[async_trait]
impl ResourceLoader for FileLoader {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        let path = self.root.join(url);
        log::trace!("reading {}", path.display());

        tokio::fs::read(&path).await.map_err(|source| match source.kind() {
            ErrorKind::NotFound => AssetError::NotFound {
                url: url.to_owned(),
            },
            _ => AssetError::Io {
                url: url.to_owned(),
                source,
            },
        })
    }

    fn font_url(&self, name: &str) -> String {
        format!("{}/{name}.typeface.json", self.font_dir)
    }
}

/// Serves resources from memory. Handy for embedding scenes in a binary
/// and for tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryLoader {
    files: HashMap<String, Arc<[u8]>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: impl Into<String>, bytes: impl Into<Vec<u8>>) -> &mut Self {
        let bytes: Vec<u8> = bytes.into();
        self.files.insert(url.into(), Arc::from(bytes));
        self
    }

    pub fn with(mut self, url: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(url, bytes);
        self
    }
}

#[async_trait]
impl ResourceLoader for MemoryLoader {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        self.files
            .get(url)
            .map(|bytes| bytes.to_vec())
            .ok_or_else(|| AssetError::NotFound {
                url: url.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_loader_serves_and_misses() {
        let loader = MemoryLoader::new().with("scene.json", "{}");
        assert_eq!(loader.load_text("scene.json").await.unwrap(), "{}");
        assert!(matches!(
            loader.fetch("nope.json").await,
            Err(AssetError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn file_loader_reports_missing_files() {
        let loader = FileLoader::new(std::env::temp_dir(), "fonts");
        let err = loader.fetch("prism-definitely-missing.obj").await.unwrap_err();
        assert_eq!(err.url(), "prism-definitely-missing.obj");
        assert_eq!(loader.font_url("optimer_bold"), "fonts/optimer_bold.typeface.json");
    }

    #[tokio::test]
    async fn model_errors_carry_url() {
        let loader = MemoryLoader::new().with("bad.obj", "v 1 two 3\n");
        let err = loader.load_model("bad.obj").await.unwrap_err();
        assert_eq!(err.url(), "bad.obj");
    }
}
