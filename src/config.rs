//! Command line parsing and the process-wide server configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

const AFTER_HELP: &str = "\
Examples:
  sweb                                  serve ./web, static files only
  sweb --upload                         also accept uploads on /upload
  sweb --webdav                         also serve WebDAV on /webdav
  sweb --webdav --webdav-readonly       read-only WebDAV
  sweb --webdav --webdav-dir /data      WebDAV over /data
  sweb --upload --webdav -p 9000        everything, on port 9000

WebDAV:
  Connect to http://localhost:8080/webdav with any WebDAV client, for
  example the Windows file explorer, macOS Finder or davfs2.

Security:
  Uploads and WebDAV are disabled by default. Only enable them when needed.
";

// Command line arguments.
#[derive(Debug, Clone, clap::Parser)]
#[command(name = "sweb", about, version, after_help = AFTER_HELP)]
pub struct Cli {
    /// enable file uploads on /upload
    #[arg(short, long, visible_alias = "enable-upload")]
    pub upload: bool,
    /// enable the WebDAV service on /webdav
    #[arg(short, long, visible_alias = "enable-webdav")]
    pub webdav: bool,
    /// root directory of the WebDAV service
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub webdav_dir: PathBuf,
    /// only allow GET, HEAD, OPTIONS and PROPFIND on /webdav
    #[arg(long)]
    pub webdav_readonly: bool,
    /// port to listen on
    #[arg(short, long, default_value_t = 8080, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: u16,
    /// directory to serve, uploads are stored here too
    #[arg(short, long, value_name = "DIR", default_value = "./web")]
    pub dir: PathBuf,
    /// address to listen on
    #[arg(short, long, value_name = "ADDR", default_value = "0.0.0.0")]
    pub bind: IpAddr,
}

/// How `/webdav` is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebdavMode {
    Disabled,
    ReadOnly,
    ReadWrite,
}

impl WebdavMode {
    /// Status string, as reported by the status endpoint.
    pub fn as_str(self) -> &'static str {
        match self {
            WebdavMode::Disabled => "disabled",
            WebdavMode::ReadOnly => "enabled-readonly",
            WebdavMode::ReadWrite => "enabled-readwrite",
        }
    }
}

/// Server configuration.
///
/// Built once before the first request is served, then shared read-only
/// by every handler.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `/upload` accepts POST.
    pub upload_enabled: bool,
    /// `/webdav` is routed to the WebDAV handler.
    pub webdav_enabled: bool,
    /// Restrict WebDAV to safe methods. Only meaningful if `webdav_enabled`.
    pub webdav_readonly: bool,
    /// Root directory of the WebDAV service.
    pub webdav_dir: PathBuf,
    pub port: u16,
    pub bind: IpAddr,
    /// Root directory for static files and uploads.
    pub served_dir: PathBuf,
}

impl ServerConfig {
    /// Configuration serving `served_dir` on 0.0.0.0:8080, with uploads and
    /// WebDAV disabled.
    pub fn new(served_dir: impl Into<PathBuf>) -> ServerConfig {
        ServerConfig {
            upload_enabled: false,
            webdav_enabled: false,
            webdav_readonly: false,
            webdav_dir: PathBuf::from("."),
            port: 8080,
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            served_dir: served_dir.into(),
        }
    }

    /// Enable or disable uploads.
    pub fn upload(self, enabled: bool) -> Self {
        let mut this = self;
        this.upload_enabled = enabled;
        this
    }

    /// Enable or disable the WebDAV service.
    pub fn webdav(self, enabled: bool) -> Self {
        let mut this = self;
        this.webdav_enabled = enabled;
        this
    }

    /// Root directory of the WebDAV service.
    pub fn webdav_dir(self, dir: impl Into<PathBuf>) -> Self {
        let mut this = self;
        this.webdav_dir = dir.into();
        this
    }

    /// Serve WebDAV read-only.
    pub fn webdav_readonly(self, readonly: bool) -> Self {
        let mut this = self;
        this.webdav_readonly = readonly;
        this
    }

    pub fn port(self, port: u16) -> Self {
        let mut this = self;
        this.port = port;
        this
    }

    pub fn bind(self, bind: IpAddr) -> Self {
        let mut this = self;
        this.bind = bind;
        this
    }

    pub fn webdav_mode(&self) -> WebdavMode {
        match (self.webdav_enabled, self.webdav_readonly) {
            (false, _) => WebdavMode::Disabled,
            (true, true) => WebdavMode::ReadOnly,
            (true, false) => WebdavMode::ReadWrite,
        }
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    pub fn served_dir(&self) -> &Path {
        &self.served_dir
    }

    /// Log which features are on, once at startup.
    pub fn log_features(&self) {
        if self.upload_enabled {
            info!("file uploads enabled, stored in {}", self.served_dir.display());
        } else {
            info!("file uploads disabled (enable with --upload)");
        }
        match self.webdav_mode() {
            WebdavMode::Disabled => info!("WebDAV disabled (enable with --webdav)"),
            WebdavMode::ReadOnly => {
                info!("WebDAV enabled (read-only), directory: {}", self.webdav_dir.display())
            }
            WebdavMode::ReadWrite => {
                info!("WebDAV enabled (read-write), directory: {}", self.webdav_dir.display())
            }
        }
    }
}

impl From<Cli> for ServerConfig {
    fn from(cli: Cli) -> Self {
        ServerConfig::new(cli.dir)
            .upload(cli.upload)
            .webdav(cli.webdav)
            .webdav_dir(cli.webdav_dir)
            .webdav_readonly(cli.webdav_readonly)
            .port(cli.port)
            .bind(cli.bind)
    }
}
