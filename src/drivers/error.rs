use thiserror::Error;
#[derive(Debug, Error)]
pub enum SpectrogramError {
    #[error("resolution must be a positive number of cm per sample, got {0}")]
    InvalidResolution(f64),
    #[error("unknown colormap `{0}`")]
    UnknownColormap(String),
    #[error("malformed stream message: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("stream transport failed: {0}")]
    Transport(String),
    #[error("stream closed by peer")]
    StreamClosed,
    #[error("failed to render plot: {0}")]
    Plot(String),
}
impl SpectrogramError {
    /// Errors after which the source is unusable and must be dropped.
    pub fn is_fatal_to_stream(&self) -> bool {
        matches!(
            self,
            SpectrogramError::Transport(_) | SpectrogramError::StreamClosed
        )
    }
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for SpectrogramError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        SpectrogramError::Plot(format!("{value:?}"))
    }
}
impl From<image::ImageError> for SpectrogramError {
    fn from(value: image::ImageError) -> Self {
        SpectrogramError::Plot(value.to_string())
    }
}
impl From<tungstenite::Error> for SpectrogramError {
    fn from(value: tungstenite::Error) -> Self {
        match value {
            tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
                SpectrogramError::StreamClosed
            }
            other => SpectrogramError::Transport(other.to_string()),
        }
    }
}
