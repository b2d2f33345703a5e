//! Content rules shared by the API handlers.

pub mod content_path;
pub mod publishing;
pub mod section_schema;
pub mod slug;
