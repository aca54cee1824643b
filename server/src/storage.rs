use std::path::PathBuf;

use async_trait::async_trait;

use crate::state::StoredShape;

const SHAPE_FILE_MAGIC: [u8; 4] = *b"SPSH";
const SHAPE_FILE_VERSION: u32 = 1;
const SHAPE_HEADER_LEN: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid shape file format")]
    InvalidData,
    #[error("unsupported shape file version: {0}")]
    UnsupportedVersion(u32),
    #[error("failed to encode shape: {0}")]
    Encode(String),
}

#[async_trait]
pub trait Storage: Send + Sync {
    async fn load_shapes(&self) -> Result<Vec<StoredShape>, StorageError>;
    async fn save_shape(&self, shape: &StoredShape) -> Result<(), StorageError>;
}

pub struct FileStorage {
    shape_dir: PathBuf,
}

impl FileStorage {
    pub fn new(shape_dir: PathBuf) -> Self {
        Self { shape_dir }
    }

    fn shape_path(&self, shape_id: &str) -> PathBuf {
        self.shape_dir.join(format!("{shape_id}.bin"))
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn load_shapes(&self) -> Result<Vec<StoredShape>, StorageError> {
        let mut entries =
            tokio::fs::read_dir(&self.shape_dir)
                .await
                .map_err(|source| StorageError::Io {
                    path: self.shape_dir.clone(),
                    source,
                })?;
        let mut shapes = Vec::new();
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(source) => {
                    return Err(StorageError::Io {
                        path: self.shape_dir.clone(),
                        source,
                    })
                }
            };
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("bin") {
                continue;
            }
            let payload = match tokio::fs::read(&path).await {
                Ok(payload) => payload,
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "skipping unreadable shape file");
                    continue;
                }
            };
            match decode_shape(&payload) {
                Ok(shape) => shapes.push(shape),
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "skipping corrupt shape file");
                }
            }
        }
        Ok(shapes)
    }

    async fn save_shape(&self, shape: &StoredShape) -> Result<(), StorageError> {
        let path = self.shape_path(&shape.id);
        let payload = encode_shape(shape)?;
        tokio::fs::write(&path, payload)
            .await
            .map_err(|source| StorageError::Io { path, source })
    }
}

pub fn encode_shape(shape: &StoredShape) -> Result<Vec<u8>, StorageError> {
    let body = bincode::encode_to_vec(shape, bincode::config::standard())
        .map_err(|error| StorageError::Encode(error.to_string()))?;
    let mut payload = Vec::with_capacity(SHAPE_HEADER_LEN + body.len());
    payload.extend_from_slice(&SHAPE_FILE_MAGIC);
    payload.extend_from_slice(&SHAPE_FILE_VERSION.to_le_bytes());
    payload.extend_from_slice(&body);
    Ok(payload)
}

pub fn decode_shape(payload: &[u8]) -> Result<StoredShape, StorageError> {
    if !(payload.starts_with(&SHAPE_FILE_MAGIC) && payload.len() >= SHAPE_HEADER_LEN) {
        return Err(StorageError::InvalidData);
    }
    let version = u32::from_le_bytes(
        payload[4..SHAPE_HEADER_LEN]
            .try_into()
            .map_err(|_| StorageError::InvalidData)?,
    );
    let body = &payload[SHAPE_HEADER_LEN..];
    match version {
        1 => bincode::decode_from_slice(body, bincode::config::standard())
            .map(|(shape, _)| shape)
            .map_err(|_| StorageError::InvalidData),
        _ => Err(StorageError::UnsupportedVersion(version)),
    }
}
