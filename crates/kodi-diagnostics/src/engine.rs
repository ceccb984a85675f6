//! The script engine seam and its lazily loaded handle.
//!
//! Diagnostics only need two things from an engine: tokenize and parse,
//! each failing with a message. The engine itself may be expensive or
//! impossible to load, so it sits behind an [`EngineLoader`] and an
//! [`EngineHandle`] that loads it at most once per process, no matter how
//! many validations ask for it at the same time.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// A syntax failure reported by an engine.
///
/// Carries only text. Any position is embedded in the message, if at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct EngineFailure {
    message: String,
}

impl EngineFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<kodi_script::SyntaxError> for EngineFailure {
    fn from(err: kodi_script::SyntaxError) -> Self {
        Self::new(err.to_string())
    }
}

/// Lexer and parser for the script language.
pub trait ScriptEngine: Send + Sync {
    type Tokens;
    type Ast;

    fn tokenize(&self, source: &str) -> Result<Self::Tokens, EngineFailure>;

    fn parse(&self, tokens: Self::Tokens) -> Result<Self::Ast, EngineFailure>;
}

impl ScriptEngine for kodi_script::Engine {
    type Tokens = kodi_script::TokenStream;
    type Ast = kodi_script::ast::Program;

    fn tokenize(&self, source: &str) -> Result<Self::Tokens, EngineFailure> {
        Ok(kodi_script::Engine::tokenize(self, source)?)
    }

    fn parse(&self, tokens: Self::Tokens) -> Result<Self::Ast, EngineFailure> {
        Ok(kodi_script::Engine::parse(self, tokens)?)
    }
}

/// Why an engine could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("script engine unavailable: {0}")]
    Unavailable(String),

    #[error("script engine failed to initialize: {0}")]
    Init(String),
}

/// Produces an engine. Called at most once per [`EngineHandle`].
#[async_trait]
pub trait EngineLoader: Send + Sync {
    type Engine: ScriptEngine + 'static;

    async fn load(&self) -> Result<Self::Engine, LoadError>;
}

/// Loads the bundled KodiScript engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinEngineLoader;

#[async_trait]
impl EngineLoader for BuiltinEngineLoader {
    type Engine = kodi_script::Engine;

    async fn load(&self) -> Result<Self::Engine, LoadError> {
        Ok(kodi_script::Engine::new())
    }
}

/// A lazily loaded, shared engine.
///
/// The first caller of [`get`](Self::get) runs the loader; callers arriving
/// while it runs wait for the same load. The outcome is kept for good,
/// failures included.
pub struct EngineHandle<L: EngineLoader> {
    loader: L,
    cell: OnceCell<Result<Arc<L::Engine>, LoadError>>,
}

impl<L: EngineLoader> EngineHandle<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            cell: OnceCell::new(),
        }
    }

    /// The engine, loading it on first use.
    pub async fn get(&self) -> Result<Arc<L::Engine>, LoadError> {
        self.cell
            .get_or_init(|| async {
                debug!("loading script engine");
                match self.loader.load().await {
                    Ok(engine) => {
                        info!("script engine loaded");
                        Ok(Arc::new(engine))
                    }
                    Err(err) => {
                        warn!(error = %err, "script engine failed to load");
                        Err(err)
                    }
                }
            })
            .await
            .clone()
    }

    /// Whether a load has finished, successfully or not.
    pub fn is_resolved(&self) -> bool {
        self.cell.initialized()
    }

    /// The load error, if loading finished and failed.
    pub fn load_error(&self) -> Option<&LoadError> {
        self.cell.get().and_then(|r| r.as_ref().err())
    }
}

impl Default for EngineHandle<BuiltinEngineLoader> {
    fn default() -> Self {
        Self::new(BuiltinEngineLoader)
    }
}
