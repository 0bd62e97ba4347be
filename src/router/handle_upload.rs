use http::header::CONTENT_TYPE;
use http::{Request, Response, StatusCode};

use crate::body::Body;
use crate::errors::{SwebError, SwebResult};
use crate::localfs;
use crate::pages;

use super::{error_response, html_response};

// Name of the multipart field that carries the file.
const FILE_FIELD: &str = "file";

impl super::Router {
    pub(crate) async fn handle_upload(&self, req: Request<hyper::Body>) -> Response<Body> {
        match self.save_upload(req).await {
            Ok((name, size)) => {
                info!("uploaded {} ({} bytes)", name, size);
                html_response(StatusCode::OK, pages::upload_success(&name, size))
            }
            Err(err) => {
                warn!("upload failed: {}", err);
                error_response(&err)
            }
        }
    }

    // Store the first `file` field of a multipart body in the served directory.
    async fn save_upload(&self, req: Request<hyper::Body>) -> SwebResult<(String, u64)> {
        let boundary = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .and_then(|ct| multer::parse_boundary(ct).ok())
            .ok_or(SwebError::BadContentType)?;

        let mut multipart = multer::Multipart::new(req.into_body(), boundary);
        while let Some(field) = multipart.next_field().await? {
            if field.name() != Some(FILE_FIELD) {
                continue;
            }
            let name = localfs::sanitize_filename(field.file_name().unwrap_or_default())?;
            let name = name.to_string();
            let path = self.config.served_dir.join(&name);
            let size = localfs::write_stream(&path, field).await?;
            return Ok((name, size));
        }
        Err(SwebError::MissingFileField)
    }
}
