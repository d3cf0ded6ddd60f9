//! # Client Plugins
//!
//! ## Usage
//! ```rust,ignore
//! app.add_plugins(ViewportPlugin)
//!    .add_plugins(AvatarPlugin { config });
//! ```

pub mod avatar_plugin;
pub mod viewport_plugin;

pub use avatar_plugin::AvatarPlugin;
pub use viewport_plugin::ViewportPlugin;
