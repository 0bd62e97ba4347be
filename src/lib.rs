//! ## Small local file server
//!
//! `sweb` serves a directory over HTTP. Two extra features sit behind
//! command line switches, and both are off unless asked for:
//!
//! - **uploads**: `/upload` shows a form and stores the posted file in the
//!   served directory.
//! - **WebDAV**: `/webdav` exposes a directory (the served one, or another)
//!   to WebDAV clients, in read-write or read-only mode. The protocol itself is
//!   handled by the [`dav_server`] crate.
//!
//! Everything else is plain GET/HEAD static file serving, through a
//! read-only [`dav_server::DavHandler`] with `index.html` support and
//! directory listings.
//!
//! `/api/upload-status` (also reachable as `/api/status`) reports which features
//! are enabled, as JSON. The landing page that is generated when the served
//! directory has no index file polls it.
//!
//! ## Routing.
//!
//! The [`ServerConfig`] is built once at startup and never changes afterwards.
//! The [`Router`] owns an `Arc` of it and consults it for every request, see
//! [`Router::route`] for the table.
//!
//! ## Example.
//!
//! ```no_run
//! use sweb::{server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sweb::SwebError> {
//!     let config = ServerConfig::new("./web")
//!         .upload(true)
//!         .webdav(true)
//!         .webdav_dir("/srv/share")
//!         .webdav_readonly(true)
//!         .port(8080);
//!
//!     server::prepare(&config)?;
//!     server::serve(config).await
//! }
//! ```

#[macro_use]
extern crate log;

mod errors;
mod localfs;

pub mod body;
pub mod config;
pub mod pages;
pub mod router;
pub mod server;

pub use crate::config::{Cli, ServerConfig, WebdavMode};
pub use crate::errors::{SwebError, SwebResult};
pub use crate::router::{Route, Router};
