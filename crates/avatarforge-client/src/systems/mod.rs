//! Client systems for the avatar pipeline

pub mod avatar_loader;
pub mod pipeline_worker;
pub mod upload_ui;

pub use avatar_loader::*;
pub use pipeline_worker::*;
pub use upload_ui::*;
