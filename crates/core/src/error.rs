use gowalk_go::ParseError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GowalkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parsing error: {0}")]
    Parsing(#[from] ParseError),
    #[error("cannot load package {import_path}: {source}")]
    Load {
        import_path: String,
        #[source]
        source: Box<GowalkError>,
    },
    #[error("Formatter error: {0}")]
    Format(String),
    #[error("file {0} does not belong to any loaded package")]
    UnknownFile(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GowalkError {
    pub fn load(import_path: impl Into<String>, source: GowalkError) -> Self {
        GowalkError::Load {
            import_path: import_path.into(),
            source: Box::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, GowalkError>;
