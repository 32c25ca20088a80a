//! Text embedders
//!
//! The similarity engine only sees the [`Embedder`] trait, so the ONNX
//! sentence-transformer, the lexical hash embedder and test stubs are
//! interchangeable.

use ahash::RandomState;
use std::collections::HashSet;
use std::hash::{BuildHasher, Hash};
use vendorank_core::{Result, Vector};

/// Default dimension for hashed embeddings
pub const DEFAULT_HASH_DIM: usize = 256;

// Fixed so that vectors are reproducible across processes and restarts
const HASH_SEEDS: [u64; 4] = [
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
];

/// Maps texts into a shared fixed-dimension vector space.
///
/// Implementations are shared between concurrent requests and must be safe
/// to call from several threads at once, serializing internally if the
/// backend needs it.
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, one vector per input in input order.
    /// The empty string is a valid input.
    fn embed(&self, texts: &[String]) -> Result<Vec<Vector>>;

    /// Embed a single text
    fn embed_one(&self, text: &str) -> Result<Vector> {
        let mut vectors = self.embed(&[text.to_string()])?;
        vectors
            .pop()
            .ok_or_else(|| vendorank_core::Error::Embedding("embedder returned no vector".into()))
    }

    fn dimension(&self) -> usize;

    fn model_name(&self) -> &str;
}

/// Deterministic lexical embedder.
///
/// Character trigrams and whole words are hashed into a fixed number of
/// buckets and the result is L2-normalized. It captures spelling overlap, not
/// meaning: "email campaigns" and "email marketing" only match on "email".
/// Empty text embeds to the zero vector.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dim: usize,
    hasher: RandomState,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        let [k0, k1, k2, k3] = HASH_SEEDS;
        Self {
            dim: dim.max(1),
            hasher: RandomState::with_seeds(k0, k1, k2, k3),
        }
    }

    pub fn embed_text(&self, text: &str) -> Vector {
        let mut vector = vec![0.0f32; self.dim];
        let normalized = text.to_lowercase();
        if normalized.trim().is_empty() {
            return Vector::new(vector);
        }

        for trigram in generate_trigrams(&normalized) {
            vector[self.bucket(&trigram)] += 1.0;
        }

        // Words contribute more than trigrams
        for word in normalized.split_whitespace() {
            vector[self.bucket(word)] += 2.0;
        }

        let mut vector = Vector::new(vector);
        vector.normalize();
        vector
    }

    fn bucket<T: Hash + ?Sized>(&self, token: &T) -> usize {
        (self.hasher.hash_one(token) % self.dim as u64) as usize
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_HASH_DIM)
    }
}

impl Embedder for HashEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vector>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn model_name(&self) -> &str {
        "trigram-hash"
    }
}

/// Bag-of-words embedder over a fixed vocabulary.
///
/// Every vocabulary term owns one axis; a text's vector counts the
/// vocabulary words it contains and ignores everything else. Scores are
/// fully predictable, which makes it the stub of choice for ranking tests
/// and benchmarks.
#[derive(Debug, Clone)]
pub struct VocabularyEmbedder {
    vocabulary: Vec<String>,
}

impl VocabularyEmbedder {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            vocabulary: terms.into_iter().map(|t| t.into().to_lowercase()).collect(),
        }
    }

    pub fn embed_text(&self, text: &str) -> Vector {
        let mut vector = vec![0.0f32; self.vocabulary.len()];
        for word in text.to_lowercase().split_whitespace() {
            if let Some(axis) = self.vocabulary.iter().position(|t| t == word) {
                vector[axis] += 1.0;
            }
        }
        Vector::new(vector)
    }
}

impl Embedder for VocabularyEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vector>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.vocabulary.len()
    }

    fn model_name(&self) -> &str {
        "vocabulary"
    }
}

/// Character trigrams of a string padded with two spaces on each side
fn generate_trigrams(s: &str) -> HashSet<String> {
    let padded = format!("  {}  ", s);
    let chars: Vec<char> = padded.chars().collect();

    chars
        .windows(3)
        .map(|w| w.iter().collect::<String>())
        .collect()
}
