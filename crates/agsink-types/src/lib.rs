pub mod event;
pub mod identity;
pub mod source;
pub mod tool;

pub use event::*;
pub use identity::Identity;
pub use source::AgentSource;
pub use tool::{CanonicalTool, FileAction};
