//! Tabvault Remote - remote store adapters
//!
//! Implements the `RemoteStore` port for the supported backends:
//! - [`gist`] - gist APIs on github.com and gitee.com
//! - [`webdav`] - any WebDAV endpoint with basic auth
//!
//! Adapters translate provider responses onto the shared `RemoteError`
//! taxonomy; the sync orchestrator never sees provider-specific shapes.

pub mod gist;
pub mod webdav;

pub use gist::{GistClient, GistHost};
pub use webdav::WebDavClient;
