//! Sentence-transformer embeddings through fastembed (ONNX runtime)

use crate::embedder::Embedder;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use parking_lot::Mutex;
use std::path::PathBuf;
use tracing::{debug, info};
use vendorank_core::{Error, Result, Vector};

/// Output dimension of all-MiniLM-L6-v2
pub const MINILM_DIM: usize = 384;

const MODEL_NAME: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// all-MiniLM-L6-v2 sentence embedder.
///
/// The ONNX session keeps per-call scratch state, so inference is serialized
/// behind a mutex; concurrent requests queue on it.
pub struct SentenceEmbedder {
    model: Mutex<TextEmbedding>,
    batch_size: Option<usize>,
}

impl SentenceEmbedder {
    /// Load the model, downloading it into `cache_dir` on first use
    pub fn new(cache_dir: Option<PathBuf>) -> Result<Self> {
        let mut options = InitOptions::new(EmbeddingModel::AllMiniLML6V2)
            .with_show_download_progress(false);
        if let Some(dir) = cache_dir {
            options = options.with_cache_dir(dir);
        }

        info!("Loading embedding model {}", MODEL_NAME);
        let model = TextEmbedding::try_new(options).map_err(|e| Error::Embedding(e.to_string()))?;

        Ok(Self {
            model: Mutex::new(model),
            batch_size: None,
        })
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size.max(1));
        self
    }
}

impl Embedder for SentenceEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vector>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        debug!("Embedding {} texts", texts.len());

        let embeddings = self
            .model
            .lock()
            .embed(texts.to_vec(), self.batch_size)
            .map_err(|e| Error::Embedding(e.to_string()))?;

        Ok(embeddings.into_iter().map(Vector::new).collect())
    }

    fn dimension(&self) -> usize {
        MINILM_DIM
    }

    fn model_name(&self) -> &str {
        MODEL_NAME
    }
}
