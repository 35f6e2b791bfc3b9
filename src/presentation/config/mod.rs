mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    DynamicQuerySettings, ExtractionSettings, OpenRouterSettings, ServerSettings, Settings,
};
