//! Embassy tasks

pub mod link;

pub use link::{link_task, LinkResources};
