pub mod export;
pub mod handlers;
pub mod prompts;
pub mod render;
pub mod suggestions;
pub mod templates;
pub mod upload;
