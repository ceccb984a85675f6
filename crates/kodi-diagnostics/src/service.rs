//! The editor-facing diagnostics service.
//!
//! Wraps the lazy engine handle and keeps the latest published diagnostics
//! per buffer. Results computed for an older version of a buffer are
//! dropped when a newer validation or a clear has started since.

use std::collections::HashMap;

use kodi_types::{Diagnostic, Marker};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::analysis::diagnose;
use crate::config::DiagnosticsConfig;
use crate::engine::{BuiltinEngineLoader, EngineHandle, EngineLoader};

#[derive(Debug, Default)]
struct BufferState {
    /// Bumped by every validate and clear.
    generation: u64,
    published: Vec<Diagnostic>,
}

pub struct DiagnosticsService<L: EngineLoader> {
    engine: EngineHandle<L>,
    config: DiagnosticsConfig,
    buffers: Mutex<HashMap<String, BufferState>>,
}

impl DiagnosticsService<BuiltinEngineLoader> {
    /// A service backed by the bundled KodiScript engine.
    pub fn builtin(config: DiagnosticsConfig) -> Self {
        Self::new(BuiltinEngineLoader, config)
    }
}

impl<L: EngineLoader> DiagnosticsService<L> {
    pub fn new(loader: L, config: DiagnosticsConfig) -> Self {
        Self {
            engine: EngineHandle::new(loader),
            config,
            buffers: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &DiagnosticsConfig {
        &self.config
    }

    pub fn engine(&self) -> &EngineHandle<L> {
        &self.engine
    }

    /// Diagnostics for `text`: syntax first, then undefined names.
    ///
    /// Loads the engine on first use. When the engine cannot be loaded the
    /// result is empty; this never fails.
    pub async fn produce_diagnostics(&self, text: &str) -> Vec<Diagnostic> {
        match self.engine.get().await {
            Ok(engine) => diagnose(&*engine, text, &self.config),
            Err(err) => {
                warn!(error = %err, "script engine not available, skipping validation");
                Vec::new()
            }
        }
    }

    /// Validate `text` as the new content of `buffer` and publish the result.
    ///
    /// Returns `None` when a later validate or clear for the same buffer
    /// started while this one ran; its result is then discarded and the
    /// published list is left alone.
    pub async fn validate(&self, buffer: &str, text: &str) -> Option<Vec<Diagnostic>> {
        let generation = {
            let mut buffers = self.buffers.lock().await;
            let state = buffers.entry(buffer.to_string()).or_default();
            state.generation += 1;
            state.generation
        };

        let diagnostics = self.produce_diagnostics(text).await;

        let mut buffers = self.buffers.lock().await;
        let state = buffers.entry(buffer.to_string()).or_default();
        if state.generation != generation {
            debug!(buffer, generation, latest = state.generation, "discarding stale diagnostics");
            return None;
        }
        state.published = diagnostics.clone();
        Some(diagnostics)
    }

    /// Drop everything published for `buffer` and void in-flight validations.
    pub async fn clear_diagnostics(&self, buffer: &str) {
        let mut buffers = self.buffers.lock().await;
        let state = buffers.entry(buffer.to_string()).or_default();
        state.generation += 1;
        state.published.clear();
        debug!(buffer, "diagnostics cleared");
    }

    /// The diagnostics currently published for `buffer`.
    pub async fn published(&self, buffer: &str) -> Vec<Diagnostic> {
        let buffers = self.buffers.lock().await;
        buffers
            .get(buffer)
            .map(|state| state.published.clone())
            .unwrap_or_default()
    }

    /// Published diagnostics as editor markers.
    pub async fn markers(&self, buffer: &str) -> Vec<Marker> {
        self.published(buffer)
            .await
            .iter()
            .map(|d| d.to_marker(self.config.marker_width, &self.config.source))
            .collect()
    }
}
