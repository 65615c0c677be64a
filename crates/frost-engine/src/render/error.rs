use thiserror::Error;

/// Fatal start-up failures. The effect is disabled for the rest of the
/// session when one occurs; nothing is retried.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("no GPU context available: {0}")]
    ContextUnavailable(String),

    #[error("blur shader failed to compile: {0}")]
    ShaderCompile(String),

    #[error("blur program failed to link: {0}")]
    ProgramLink(String),

    #[error("failed to create GPU resource `{0}`")]
    Resource(&'static str),
}

/// Failures while a frame is being produced.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A draw was issued outside `begin_frame`/`end_frame`.
    #[error("draw issued outside of a frame")]
    NoActiveFrame,

    /// GPU resources the pipeline owns are gone.
    #[error("render resources missing: {0}")]
    ResourcesMissing(&'static str),

    #[error("GPU backend failure: {0}")]
    Backend(String),
}
