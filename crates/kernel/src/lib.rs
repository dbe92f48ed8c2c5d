//! Shared plumbing for libris: layered settings, the injected application
//! state, the view contract and the module registry.

pub mod module;
pub mod registry;
pub mod settings;
pub mod state;
pub mod views;

pub use module::{InitCtx, Module};
pub use registry::ModuleRegistry;
pub use settings::Settings;
pub use state::AppState;
pub use views::Views;
