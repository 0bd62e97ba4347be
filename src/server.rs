//! Startup and the hyper listener.

use std::convert::Infallible;
use std::sync::Arc;

use hyper::service::{make_service_fn, service_fn};

use crate::config::ServerConfig;
use crate::errors::{SwebError, SwebResult};
use crate::localfs;
use crate::pages;
use crate::router::Router;

/// Get the filesystem ready before anything is served.
///
/// Creates the served directory, and the WebDAV directory if WebDAV is
/// enabled. Failing that is fatal. Then writes the landing page into the
/// served directory if it has no index file. Failing that is only logged.
pub fn prepare(config: &ServerConfig) -> SwebResult<()> {
    localfs::prepare_dir(&config.served_dir)?;
    if config.webdav_enabled {
        localfs::prepare_dir(&config.webdav_dir)?;
    }

    match pages::ensure_index_page(&config.served_dir) {
        Ok(true) => info!(
            "created default page {}",
            config.served_dir.join(pages::INDEX_FILES[0]).display()
        ),
        Ok(false) => {}
        Err(e) => warn!("cannot create default page: {}", e),
    }
    Ok(())
}

/// Serve `config` until the process gets ctrl-c.
pub async fn serve(config: ServerConfig) -> SwebResult<()> {
    let addr = config.listen_addr();
    let router = Router::new(Arc::new(config));

    let make_service = make_service_fn(move |_| {
        let router = router.clone();
        async move {
            let func = move |req| {
                let router = router.clone();
                async move { Ok::<_, Infallible>(router.handle(req).await) }
            };
            Ok::<_, Infallible>(service_fn(func))
        }
    });

    let server = hyper::Server::try_bind(&addr)
        .map_err(|source| SwebError::Bind { addr, source })?
        .serve(make_service)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("cannot listen for ctrl-c: {}", e);
                std::future::pending::<()>().await;
            }
            info!("shutting down");
        });

    println!("Serving on http://{}", server_url(&addr));
    server.await.map_err(SwebError::Server)
}

// A clickable URL for the startup message.
fn server_url(addr: &std::net::SocketAddr) -> String {
    if addr.ip().is_unspecified() {
        format!("localhost:{}", addr.port())
    } else {
        addr.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_creates_directories_and_page() {
        let tmp = tempfile::tempdir().unwrap();
        let served = tmp.path().join("web");
        let dav = tmp.path().join("share/dav");
        let config = ServerConfig::new(&served).webdav(true).webdav_dir(&dav);
        prepare(&config).unwrap();
        assert!(served.join("index.html").is_file());
        assert!(dav.is_dir());
    }

    #[test]
    fn prepare_skips_webdav_dir_when_disabled() {
        let tmp = tempfile::tempdir().unwrap();
        let dav = tmp.path().join("dav");
        let config = ServerConfig::new(tmp.path().join("web")).webdav_dir(&dav);
        prepare(&config).unwrap();
        assert!(!dav.exists());
    }

    #[test]
    fn prepare_fails_when_dir_cannot_be_created() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("plain-file");
        std::fs::write(&file, "x").unwrap();
        let config = ServerConfig::new(file.join("web"));
        let err = prepare(&config).unwrap_err();
        assert!(matches!(err, SwebError::CreateDir { .. }));
    }

    #[test]
    fn prepare_fails_when_webdav_dir_cannot_be_created() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("plain-file");
        std::fs::write(&file, "x").unwrap();
        let config = ServerConfig::new(tmp.path().join("web"))
            .webdav(true)
            .webdav_dir(file.join("dav"));
        match prepare(&config) {
            Err(SwebError::CreateDir { path, .. }) => assert_eq!(path, file.join("dav")),
            other => panic!("expected CreateDir, got {:?}", other),
        }
    }

    #[test]
    fn url_for_unspecified_address() {
        assert_eq!(server_url(&"0.0.0.0:8080".parse().unwrap()), "localhost:8080");
        assert_eq!(server_url(&"127.0.0.1:9000".parse().unwrap()), "127.0.0.1:9000");
    }
}
