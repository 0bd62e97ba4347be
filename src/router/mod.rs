//
// This module contains the main entry point of the library,
// the feature gated Router.
//
use std::sync::Arc;

use dav_server::{localfs::LocalFs, memls::MemLs, DavHandler, DavMethod, DavMethodSet};
use http::header::{HeaderValue, ALLOW, CONTENT_TYPE};
use http::{Method, Request, Response, StatusCode};

use crate::body::Body;
use crate::config::{ServerConfig, WebdavMode};
use crate::errors::SwebError;
use crate::pages::{self, INDEX_FILES};

pub mod handle_static;
pub mod handle_status;
pub mod handle_upload;
pub mod handle_webdav;

/// Path of the status endpoint. The generated landing page polls it.
pub const STATUS_PATH: &str = "/api/upload-status";
/// Shorter alias of [`STATUS_PATH`].
pub const STATUS_ALIAS_PATH: &str = "/api/status";
pub const UPLOAD_PATH: &str = "/upload";
pub const WEBDAV_PATH: &str = "/webdav";

const HTML: &str = "text/html; charset=utf-8";
const TEXT: &str = "text/plain; charset=utf-8";

// `Allow` header for the read-only WebDAV refusal, same methods as
// `DavMethodSet::WEBDAV_RO`.
const WEBDAV_RO_ALLOW: &str = "GET, HEAD, OPTIONS, PROPFIND";

/// What a request resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// JSON status document.
    Status,
    /// Upload form (GET or HEAD `/upload`).
    UploadForm,
    /// Store an uploaded file (POST `/upload`).
    UploadSave,
    /// Uploads are enabled, but not for this method.
    UploadMethodNotAllowed,
    /// Uploads are disabled.
    UploadDisabled,
    /// Forward to the WebDAV handler.
    Webdav,
    /// WebDAV is read-only and this method could modify something.
    WebdavReadOnly,
    /// WebDAV is disabled.
    WebdavDisabled,
    /// Everything else: a file from the served directory.
    Static,
    /// Static path, but not GET or HEAD.
    StaticMethodNotAllowed,
}

/// The request router.
///
/// Holds the immutable [`ServerConfig`], a read-only handler for the
/// served directory and, if WebDAV is enabled, the WebDAV handler bound
/// to the WebDAV directory. Cheap to clone.
#[derive(Clone)]
pub struct Router {
    pub(crate) config: Arc<ServerConfig>,
    pub(crate) files: DavHandler,
    pub(crate) dav: Option<DavHandler>,
}

// `/upload` matches `/upload` and `/upload/...`, but not `/uploads`.
fn under(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

impl Router {
    pub fn new(config: Arc<ServerConfig>) -> Router {
        // plain GET/HEAD file server, with index file and listings.
        let files = DavHandler::builder()
            .filesystem(LocalFs::new(&config.served_dir, false, false, false))
            .methods(DavMethodSet::HTTP_RO)
            .autoindex(true)
            .indexfile(INDEX_FILES[0].to_string())
            .build_handler();

        let dav = if config.webdav_enabled {
            let builder = DavHandler::builder()
                .filesystem(LocalFs::new(&config.webdav_dir, true, false, false))
                .strip_prefix(WEBDAV_PATH)
                .autoindex(true);
            // a read-only share must not advertise write methods or locking.
            let builder = if config.webdav_readonly {
                builder.methods(DavMethodSet::WEBDAV_RO)
            } else {
                builder.locksystem(MemLs::new())
            };
            Some(builder.build_handler())
        } else {
            None
        };
        Router { config, files, dav }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Decide what to do with a request.
    ///
    /// | path                             | gate                  | route                  |
    /// |----------------------------------|-----------------------|------------------------|
    /// | `/api/upload-status`, `/api/status` | always             | `Status`               |
    /// | `/upload`, `/upload/*`           | uploads disabled      | `UploadDisabled`       |
    /// |                                  | GET, HEAD / POST / other | `UploadForm` / `UploadSave` / `UploadMethodNotAllowed` |
    /// | `/webdav`, `/webdav/*`           | WebDAV disabled       | `WebdavDisabled`       |
    /// |                                  | read-write            | `Webdav`               |
    /// |                                  | read-only, safe method | `Webdav`              |
    /// |                                  | read-only, other      | `WebdavReadOnly`       |
    /// | anything else                    | GET, HEAD             | `Static`               |
    /// |                                  | other                 | `StaticMethodNotAllowed` |
    pub fn route(&self, method: &Method, path: &str) -> Route {
        if path == STATUS_PATH || path == STATUS_ALIAS_PATH {
            return Route::Status;
        }
        if under(path, UPLOAD_PATH) {
            if !self.config.upload_enabled {
                return Route::UploadDisabled;
            }
            return match *method {
                Method::GET | Method::HEAD => Route::UploadForm,
                Method::POST => Route::UploadSave,
                _ => Route::UploadMethodNotAllowed,
            };
        }
        if under(path, WEBDAV_PATH) {
            return match self.config.webdav_mode() {
                WebdavMode::Disabled => Route::WebdavDisabled,
                WebdavMode::ReadWrite => Route::Webdav,
                WebdavMode::ReadOnly => {
                    let safe = DavMethod::try_from(method)
                        .map(|m| DavMethodSet::WEBDAV_RO.contains(m))
                        .unwrap_or(false);
                    if safe {
                        Route::Webdav
                    } else {
                        Route::WebdavReadOnly
                    }
                }
            };
        }
        match *method {
            Method::GET | Method::HEAD => Route::Static,
            _ => Route::StaticMethodNotAllowed,
        }
    }

    /// Handle a request.
    pub async fn handle(&self, req: Request<hyper::Body>) -> Response<Body> {
        let route = self.route(req.method(), req.uri().path());
        debug!("{} {} -> {:?}", req.method(), req.uri().path(), route);

        match route {
            Route::Status => self.handle_status(),
            Route::UploadForm => {
                if req.method() == Method::HEAD {
                    html_response(StatusCode::OK, Body::empty())
                } else {
                    html_response(StatusCode::OK, pages::upload_form())
                }
            }
            Route::UploadSave => self.handle_upload(req).await,
            Route::UploadMethodNotAllowed => {
                method_not_allowed("GET, HEAD, POST", "method not allowed")
            }
            Route::UploadDisabled => html_response(StatusCode::FORBIDDEN, pages::upload_disabled()),
            Route::Webdav => self.handle_webdav(req).await,
            Route::WebdavReadOnly => {
                method_not_allowed(WEBDAV_RO_ALLOW, "WebDAV service is in read-only mode")
            }
            Route::WebdavDisabled => html_response(StatusCode::FORBIDDEN, pages::webdav_disabled()),
            Route::Static => self.handle_static(req).await,
            Route::StaticMethodNotAllowed => method_not_allowed("GET, HEAD", "method not allowed"),
        }
    }
}

// helpers shared by the handlers.

pub(crate) fn html_response(status: StatusCode, html: impl Into<Body>) -> Response<Body> {
    let mut res = Response::new(html.into());
    *res.status_mut() = status;
    res.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static(HTML));
    res
}

pub(crate) fn text_response(status: StatusCode, text: impl Into<String>) -> Response<Body> {
    let mut text = text.into();
    text.push('\n');
    let mut res = Response::new(Body::from(text));
    *res.status_mut() = status;
    res.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static(TEXT));
    res.headers_mut().insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );
    res
}

pub(crate) fn method_not_allowed(allow: &str, text: &str) -> Response<Body> {
    let mut res = text_response(StatusCode::METHOD_NOT_ALLOWED, text);
    if let Ok(allow) = HeaderValue::from_str(allow) {
        res.headers_mut().insert(ALLOW, allow);
    }
    res
}

pub(crate) fn error_response(err: &SwebError) -> Response<Body> {
    text_response(err.statuscode(), err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router(config: ServerConfig) -> Router {
        Router::new(Arc::new(config))
    }

    fn propfind() -> Method {
        Method::from_bytes(b"PROPFIND").unwrap()
    }

    #[test]
    fn status_is_always_routed() {
        let r = router(ServerConfig::new("web"));
        assert_eq!(r.route(&Method::GET, "/api/upload-status"), Route::Status);
        assert_eq!(r.route(&Method::GET, "/api/status"), Route::Status);
        assert_eq!(r.route(&Method::POST, "/api/status"), Route::Status);
    }

    #[test]
    fn upload_gate() {
        let off = router(ServerConfig::new("web"));
        assert_eq!(off.route(&Method::GET, "/upload"), Route::UploadDisabled);
        assert_eq!(off.route(&Method::POST, "/upload"), Route::UploadDisabled);
        assert_eq!(off.route(&Method::PUT, "/upload/x"), Route::UploadDisabled);

        let on = router(ServerConfig::new("web").upload(true));
        assert_eq!(on.route(&Method::GET, "/upload"), Route::UploadForm);
        assert_eq!(on.route(&Method::HEAD, "/upload"), Route::UploadForm);
        assert_eq!(on.route(&Method::POST, "/upload"), Route::UploadSave);
        assert_eq!(on.route(&Method::POST, "/upload/"), Route::UploadSave);
        assert_eq!(
            on.route(&Method::DELETE, "/upload"),
            Route::UploadMethodNotAllowed
        );
    }

    #[test]
    fn prefix_match_needs_a_segment_boundary() {
        let r = router(ServerConfig::new("web"));
        assert_eq!(r.route(&Method::GET, "/uploads.txt"), Route::Static);
        assert_eq!(r.route(&Method::GET, "/webdavx"), Route::Static);
        assert_eq!(r.route(&Method::GET, "/"), Route::Static);
    }

    #[test]
    fn static_paths_are_get_and_head_only() {
        let r = router(ServerConfig::new("web"));
        assert_eq!(r.route(&Method::HEAD, "/a.txt"), Route::Static);
        assert_eq!(r.route(&Method::POST, "/a.txt"), Route::StaticMethodNotAllowed);
        assert_eq!(r.route(&Method::PUT, "/a.txt"), Route::StaticMethodNotAllowed);
        assert_eq!(r.route(&propfind(), "/"), Route::StaticMethodNotAllowed);
    }

    #[test]
    fn webdav_gate() {
        let off = router(ServerConfig::new("web"));
        assert_eq!(off.route(&propfind(), "/webdav/"), Route::WebdavDisabled);
        assert_eq!(off.route(&Method::GET, "/webdav"), Route::WebdavDisabled);

        let rw = router(ServerConfig::new("web").webdav(true));
        assert_eq!(rw.route(&Method::DELETE, "/webdav/a"), Route::Webdav);
        assert_eq!(rw.route(&Method::PUT, "/webdav"), Route::Webdav);
    }

    #[test]
    fn webdav_readonly_allows_safe_methods_only() {
        let ro = router(ServerConfig::new("web").webdav(true).webdav_readonly(true));
        for m in [Method::GET, Method::HEAD, Method::OPTIONS, propfind()] {
            assert_eq!(ro.route(&m, "/webdav/a"), Route::Webdav, "{}", m);
        }
        for m in ["PUT", "DELETE", "MKCOL", "MOVE", "COPY", "LOCK", "PROPPATCH", "POST"] {
            let m = Method::from_bytes(m.as_bytes()).unwrap();
            assert_eq!(ro.route(&m, "/webdav/a"), Route::WebdavReadOnly, "{}", m);
        }
    }

    #[test]
    fn readonly_allow_header_matches_method_set() {
        for name in WEBDAV_RO_ALLOW.split(", ") {
            let m = DavMethod::try_from(&Method::from_bytes(name.as_bytes()).unwrap()).unwrap();
            assert!(DavMethodSet::WEBDAV_RO.contains(m), "{}", name);
        }
        for name in ["PUT", "DELETE", "MKCOL", "LOCK"] {
            let m = DavMethod::try_from(&Method::from_bytes(name.as_bytes()).unwrap()).unwrap();
            assert!(!DavMethodSet::WEBDAV_RO.contains(m), "{}", name);
        }
    }

    #[test]
    fn webdav_handler_only_built_when_enabled() {
        assert!(router(ServerConfig::new("web")).dav.is_none());
        assert!(router(ServerConfig::new("web").webdav(true)).dav.is_some());
    }
}
