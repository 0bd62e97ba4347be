use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum SwebError {
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("cannot decode upload: {0}")]
    Multipart(#[from] multer::Error),
    #[error("expected a multipart/form-data request body")]
    BadContentType,
    #[error("form field `file` is missing")]
    MissingFileField,
    #[error("invalid file name {0:?}")]
    InvalidFilename(String),
    #[error("refusing to write through symlink {}", .0.display())]
    Symlink(PathBuf),
    #[error("cannot create directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("cannot listen on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: hyper::Error,
    },
    #[error("server error: {0}")]
    Server(#[source] hyper::Error),
}

pub type SwebResult<T> = Result<T, SwebError>;

impl SwebError {
    /// Status code to answer with when this error ends a request.
    pub fn statuscode(&self) -> StatusCode {
        match self {
            SwebError::Multipart(_)
            | SwebError::BadContentType
            | SwebError::MissingFileField
            | SwebError::InvalidFilename(_)
            | SwebError::Symlink(_) => StatusCode::BAD_REQUEST,
            SwebError::Io(e) => match e.kind() {
                io::ErrorKind::NotFound => StatusCode::NOT_FOUND,
                io::ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            SwebError::CreateDir { .. } | SwebError::Bind { .. } | SwebError::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_bad_request() {
        assert_eq!(
            SwebError::MissingFileField.statuscode(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            SwebError::InvalidFilename("../x".into()).statuscode(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn io_errors_map_by_kind() {
        let e = SwebError::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert_eq!(e.statuscode(), StatusCode::NOT_FOUND);
        let e = SwebError::from(io::Error::new(io::ErrorKind::Other, "disk full"));
        assert_eq!(e.statuscode(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.to_string(), "disk full");
    }
}
