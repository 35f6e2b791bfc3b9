mod completion_client;
mod file_loader;

pub use completion_client::{
    ChatOutcome, ChatRequest, CompletionClient, CompletionError, FinishReason,
};
pub use file_loader::{FileLoader, FileLoaderError};
