use http::{Request, Response};

use crate::body::Body;

impl super::Router {
    // GET/HEAD on the served directory. Index files, directory redirects,
    // listings and content types come from the read-only file handler.
    pub(crate) async fn handle_static(&self, req: Request<hyper::Body>) -> Response<Body> {
        let path = req.uri().path().to_string();
        let res = self.files.handle(req).await;
        if res.status().is_server_error() {
            error!("{} - {}", path, res.status());
        }
        res.map(Body::from)
    }
}
