//! Definitions for the response body.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::stream::{BoxStream, Stream};
use http::header::HeaderMap;
use http_body::Body as HttpBody;

/// Body is returned by the router, and implements both `Stream`
/// and `http_body::Body`.
///
/// Fixed pages are held in memory. Files and WebDAV responses are
/// streamed.
pub struct Body {
    pub(crate) inner: BodyType,
}

pub(crate) enum BodyType {
    Bytes(Option<Bytes>),
    Stream(BoxStream<'static, Result<Bytes, io::Error>>),
}

impl Body {
    /// Return an empty body.
    pub fn empty() -> Body {
        Body {
            inner: BodyType::Bytes(None),
        }
    }
    /// Create a body from a stream.
    pub fn stream(stream: impl Stream<Item = Result<Bytes, io::Error>> + Send + 'static) -> Body {
        Body {
            inner: BodyType::Stream(Box::pin(stream)),
        }
    }
}

impl Stream for Body {
    type Item = io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context) -> Poll<Option<Self::Item>> {
        match &mut self.inner {
            BodyType::Bytes(bytes) => Poll::Ready(bytes.take().map(Ok)),
            BodyType::Stream(stream) => stream.as_mut().poll_next(cx),
        }
    }
}

impl HttpBody for Body {
    type Data = Bytes;
    type Error = io::Error;

    fn poll_data(
        self: Pin<&mut Self>,
        cx: &mut Context,
    ) -> Poll<Option<Result<Self::Data, Self::Error>>> {
        self.poll_next(cx)
    }

    fn poll_trailers(
        self: Pin<&mut Self>,
        _cx: &mut Context,
    ) -> Poll<Result<Option<HeaderMap>, Self::Error>> {
        Poll::Ready(Ok(None))
    }

    fn is_end_stream(&self) -> bool {
        matches!(self.inner, BodyType::Bytes(None))
    }
}

impl From<String> for Body {
    fn from(t: String) -> Body {
        Body {
            inner: BodyType::Bytes(Some(Bytes::from(t))),
        }
    }
}

impl From<&'static str> for Body {
    fn from(t: &'static str) -> Body {
        Body {
            inner: BodyType::Bytes(Some(Bytes::from_static(t.as_bytes()))),
        }
    }
}

impl From<Bytes> for Body {
    fn from(t: Bytes) -> Body {
        Body {
            inner: BodyType::Bytes(Some(t)),
        }
    }
}

impl From<Vec<u8>> for Body {
    fn from(t: Vec<u8>) -> Body {
        Body {
            inner: BodyType::Bytes(Some(Bytes::from(t))),
        }
    }
}

// Responses from the WebDAV handler are passed through as a stream.
impl From<dav_server::body::Body> for Body {
    fn from(t: dav_server::body::Body) -> Body {
        Body::stream(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    #[tokio::test]
    async fn bytes_body_yields_once() {
        let mut body = Body::from("hello");
        assert!(!body.is_end_stream());
        assert_eq!(body.next().await.unwrap().unwrap(), Bytes::from("hello"));
        assert!(body.next().await.is_none());
        assert!(body.is_end_stream());
    }

    #[tokio::test]
    async fn stream_body_is_collected() {
        let chunks = futures_util::stream::iter(vec![
            Ok(Bytes::from("he")),
            Ok(Bytes::from("llo")),
        ]);
        let body = Body::stream(chunks);
        let data = hyper::body::to_bytes(body).await.unwrap();
        assert_eq!(&data[..], b"hello");
    }
}
