// Mon Oct 19 2026 - Alex

use crate::pattern::{CompiledPattern, PatternCompiler, PatternError};
use ahash::AHashMap;
use parking_lot::RwLock;
use std::sync::Arc;

pub struct PatternCache {
    compiler: PatternCompiler,
    cache: RwLock<AHashMap<String, Arc<CompiledPattern>>>,
    max_size: usize,
}

impl PatternCache {
    pub fn new(max_size: usize) -> Self {
        Self::with_compiler(PatternCompiler::new(), max_size)
    }

    pub fn with_compiler(compiler: PatternCompiler, max_size: usize) -> Self {
        Self {
            compiler,
            cache: RwLock::new(AHashMap::new()),
            max_size,
        }
    }

    pub fn get(&self, text: &str) -> Option<Arc<CompiledPattern>> {
        self.cache.read().get(text).cloned()
    }

    pub fn get_or_compile(&self, text: &str) -> Result<Arc<CompiledPattern>, PatternError> {
        if let Some(pattern) = self.get(text) {
            return Ok(pattern);
        }

        let pattern = Arc::new(self.compiler.compile(text)?);

        let mut cache = self.cache.write();
        if cache.len() >= self.max_size {
            cache.clear();
        }
        Ok(cache
            .entry(text.to_string())
            .or_insert(pattern)
            .clone())
    }

    pub fn clear(&self) {
        self.cache.write().clear();
    }

    pub fn size(&self) -> usize {
        self.cache.read().len()
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new(1024)
    }
}
