//! Interactive execution: selection, compositing, history and the editor
//! session tying them together.

pub mod cache;
pub mod compositor;
pub mod history;
pub mod selection;
pub mod session;

pub use cache::{CacheKey, CacheStats, RenderCache};
pub use compositor::render;
pub use history::History;
pub use selection::FilterSelection;
pub use session::EditorSession;
