use http::{Method, Request, Response, StatusCode};
use log::Level;

use crate::body::Body;

use super::text_response;

impl super::Router {
    pub(crate) async fn handle_webdav(&self, req: Request<hyper::Body>) -> Response<Body> {
        let dav = match self.dav {
            Some(ref dav) => dav,
            None => {
                // route() never sends us here without a handler.
                error!("WebDAV request without a WebDAV handler");
                return text_response(StatusCode::INTERNAL_SERVER_ERROR, "WebDAV not configured");
            }
        };

        let method = req.method().clone();
        let path = req.uri().path().to_string();
        let res = dav.handle(req).await;
        if let Some(level) = outcome_level(&method, res.status()) {
            log!(level, "WebDAV {} {} - {}", method, path, res.status());
        }
        res.map(Body::from)
    }
}

// A PROPFIND on a missing resource is how clients check whether something
// exists before they create it, so it is not worth a log line.
fn outcome_level(method: &Method, status: StatusCode) -> Option<Level> {
    if status.is_server_error() {
        Some(Level::Error)
    } else if status == StatusCode::NOT_FOUND && method.as_str() == "PROPFIND" {
        Some(Level::Trace)
    } else if status.is_client_error() {
        Some(Level::Debug)
    } else {
        None
    }
}
