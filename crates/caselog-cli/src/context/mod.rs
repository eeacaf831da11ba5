pub mod app_context;
mod project_root;

pub use app_context::AppContext;
pub use project_root::resolve_project_root;
