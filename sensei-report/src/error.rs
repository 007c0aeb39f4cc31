use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },

    #[error("Failed to build report SVG: {0}")]
    Svg(#[from] usvg::Error),

    #[error("Failed to encode PNG: {0}")]
    Encode(String),

    #[error("Failed to write report image to {}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, RenderError>;
