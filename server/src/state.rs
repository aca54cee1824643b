use std::collections::HashMap;
use std::sync::Arc;

use bincode::{Decode, Encode};
use shapepad_shared::Stroke;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::storage::Storage;

pub const MAX_SHAPES: usize = 10_000;

#[derive(Clone)]
pub struct AppState {
    pub shapes: Arc<RwLock<HashMap<Uuid, RegisteredShape>>>,
    pub storage: Arc<dyn Storage>,
    /// Held across a registry change and its disk write so files land in
    /// the same order as the in-memory updates.
    pub writes: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            shapes: Arc::new(RwLock::new(HashMap::new())),
            storage,
            writes: Arc::new(Mutex::new(())),
        }
    }
}

/// A shape known to the lookup service. Strokes are stored normalized.
#[derive(Clone, Debug)]
pub struct RegisteredShape {
    pub id: Uuid,
    pub strokes: Vec<Stroke>,
    pub password: Option<String>,
    pub is_locked: bool,
}

/// On-disk form of a [`RegisteredShape`].
#[derive(Clone, Debug, Default, Encode, Decode)]
pub struct StoredShape {
    pub id: String,
    pub strokes: Vec<Stroke>,
    pub password: Option<String>,
    pub is_locked: bool,
}

impl RegisteredShape {
    pub fn to_stored(&self) -> StoredShape {
        StoredShape {
            id: self.id.to_string(),
            strokes: self.strokes.clone(),
            password: self.password.clone(),
            is_locked: self.is_locked,
        }
    }

    pub fn from_stored(stored: StoredShape) -> Option<Self> {
        let id = Uuid::parse_str(&stored.id).ok()?;
        Some(Self {
            id,
            strokes: stored.strokes,
            password: stored.password,
            is_locked: stored.is_locked,
        })
    }
}
