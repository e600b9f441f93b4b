// Workspace UI state: builder and dashboard stores, kept per signed-in user.

pub mod handlers;
pub mod registry;
pub mod state;

pub use registry::UiStateRegistry;
