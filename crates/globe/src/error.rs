use formats::DatasetError;
use runtime::Lifecycle;

#[derive(Debug)]
pub enum GlobeError {
    /// The world dataset could not be loaded; the globe never runs.
    Setup(DatasetError),
    Config(String),
    NotRunning(Lifecycle),
    MissingLayer(&'static str),
}

impl std::fmt::Display for GlobeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GlobeError::Setup(e) => write!(f, "globe setup failed: {e}"),
            GlobeError::Config(msg) => write!(f, "invalid globe config: {msg}"),
            GlobeError::NotRunning(state) => write!(f, "globe is not running ({})", state.name()),
            GlobeError::MissingLayer(role) => write!(f, "layer stack has no {role} layer"),
        }
    }
}

impl std::error::Error for GlobeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GlobeError::Setup(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DatasetError> for GlobeError {
    fn from(e: DatasetError) -> Self {
        GlobeError::Setup(e)
    }
}
