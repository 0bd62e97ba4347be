use http::header::{HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, CONTENT_TYPE};
use http::{Response, StatusCode};
use serde::Serialize;

use crate::body::Body;
use crate::config::ServerConfig;

use super::text_response;

/// The JSON document served by the status endpoint.
#[derive(Debug, Serialize)]
pub struct StatusDocument {
    pub upload: UploadStatus,
    pub webdav: WebdavStatus,
}

#[derive(Debug, Serialize)]
pub struct UploadStatus {
    pub enabled: bool,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct WebdavStatus {
    pub enabled: bool,
    pub readonly: bool,
    pub directory: String,
    pub status: &'static str,
}

impl From<&ServerConfig> for StatusDocument {
    fn from(config: &ServerConfig) -> Self {
        StatusDocument {
            upload: UploadStatus {
                enabled: config.upload_enabled,
                status: if config.upload_enabled {
                    "enabled"
                } else {
                    "disabled"
                },
            },
            webdav: WebdavStatus {
                enabled: config.webdav_enabled,
                readonly: config.webdav_readonly,
                directory: config.webdav_dir.to_string_lossy().into_owned(),
                status: config.webdav_mode().as_str(),
            },
        }
    }
}

impl super::Router {
    pub(crate) fn handle_status(&self) -> Response<Body> {
        let doc = StatusDocument::from(self.config());
        let json = match serde_json::to_vec(&doc) {
            Ok(json) => json,
            Err(e) => {
                error!("cannot serialize status: {}", e);
                return text_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
            }
        };

        let mut res = Response::new(Body::from(json));
        let h = res.headers_mut();
        h.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        h.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        h.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        res
    }
}
