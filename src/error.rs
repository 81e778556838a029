pub type SkimmerResult<T> = Result<T, SkimmerError>;

#[derive(thiserror::Error, Debug)]
pub enum SkimmerError {
    #[error("surface not ready: {0}")]
    SurfaceNotReady(String),

    #[error("drawing context error: {0}")]
    Context(String),

    #[error("settings error: {0}")]
    Settings(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl SkimmerError {
    pub fn surface_not_ready(msg: impl Into<String>) -> Self {
        Self::SurfaceNotReady(msg.into())
    }

    pub fn context(msg: impl Into<String>) -> Self {
        Self::Context(msg.into())
    }

    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }
}
