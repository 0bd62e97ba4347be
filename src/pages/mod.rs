//! HTML pages served by the router, and the generated landing page.

use std::io;
use std::path::Path;

use htmlescape::encode_minimal;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Index file names. The first one is served for a directory and is the
/// name of the generated landing page.
pub const INDEX_FILES: [&str; 2] = ["index.html", "index.htm"];

// Characters escaped when a file name is used as a path segment in a link.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'\'')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

const INDEX_PAGE: &str = include_str!("index.html");

const STYLE: &str = r#"
    body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
           max-width: 720px; margin: 50px auto; padding: 20px; background: #f8f9fa; }
    .container { background: white; padding: 32px 40px; border-radius: 10px;
                 box-shadow: 0 2px 10px rgba(0,0,0,0.1); }
    .container.denied { border-left: 5px solid #dc3545; text-align: center; }
    .denied h1 { color: #dc3545; }
    .icon { font-size: 64px; margin-bottom: 12px; }
    .command { background: #f8f9fa; padding: 10px; border-radius: 5px; margin: 10px 0;
               font-family: 'Courier New', monospace; border: 1px solid #dee2e6; }
    a.button { display: inline-block; background: #007acc; color: white; padding: 10px 20px;
               text-decoration: none; border-radius: 5px; margin-top: 20px; }
    a.button:hover { background: #005a9e; }
"#;

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>{title}</title>\n\
         <style>{STYLE}</style>\n\
         </head>\n\
         <body>\n\
         {body}\n\
         </body>\n\
         </html>\n",
        title = encode_minimal(title),
    )
}

// Human readable file size.
fn format_size(len: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];
    if len < 1024 {
        return format!("{} B", len);
    }
    let mut size = len as f64 / 1024.0;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", size, UNITS[unit])
}

/// Encode a file name for use as one path segment of a link.
pub fn encode_segment(name: &str) -> String {
    utf8_percent_encode(name, SEGMENT).to_string()
}

/// The form shown on GET `/upload`.
pub fn upload_form() -> String {
    page(
        "File upload",
        r#"<div class="container">
<h2>File upload</h2>
<form method="post" action="/upload" enctype="multipart/form-data">
  <input type="file" name="file" required>
  <input type="submit" value="Upload">
</form>
<p><a href="/">Back to the home page</a></p>
</div>"#,
    )
}

/// Confirmation after a successful upload.
pub fn upload_success(name: &str, size: u64) -> String {
    let body = format!(
        r#"<div class="container">
<h2>Upload complete</h2>
<p>File name: {name}</p>
<p>Size: {size}</p>
<p><a href="/{link}">View the file</a></p>
<p><a href="/upload">Upload another file</a></p>
</div>"#,
        name = encode_minimal(name),
        size = format_size(size),
        link = encode_segment(name),
    );
    page("Upload complete", &body)
}

// Shared layout of the "feature disabled" pages.
fn feature_disabled(title: &str, what: &str, commands: &[&str]) -> String {
    let commands = commands
        .iter()
        .map(|c| format!("<div class=\"command\">{}</div>", encode_minimal(c)))
        .collect::<Vec<_>>()
        .join("\n");
    let body = format!(
        r#"<div class="container denied">
<div class="icon">&#128274;</div>
<h1>{title}</h1>
<p>{what} is disabled by default, to keep the server safe.</p>
<p>To enable it, restart the server with:</p>
{commands}
<p>Run <code>sweb --help</code> to see all options.</p>
<a href="/" class="button">&larr; Back to the home page</a>
</div>"#,
        title = encode_minimal(title),
    );
    page(title, &body)
}

/// 403 page for `/upload` when uploads are disabled.
pub fn upload_disabled() -> String {
    feature_disabled(
        "File upload is disabled",
        "File upload",
        &["sweb --upload", "sweb --enable-upload"],
    )
}

/// 403 page for `/webdav` when WebDAV is disabled.
pub fn webdav_disabled() -> String {
    feature_disabled(
        "WebDAV is disabled",
        "The WebDAV service",
        &[
            "sweb --webdav",
            "sweb --enable-webdav",
            "sweb --webdav --webdav-dir /path/to/directory",
            "sweb --webdav --webdav-readonly",
        ],
    )
}

/// Write the generated landing page into `dir`, unless it already has an
/// index file. Returns whether a page was written.
pub fn ensure_index_page(dir: &Path) -> io::Result<bool> {
    if INDEX_FILES.iter().any(|name| dir.join(name).exists()) {
        return Ok(false);
    }
    std::fs::write(dir.join(INDEX_FILES[0]), INDEX_PAGE)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::STATUS_PATH;

    #[test]
    fn success_page_escapes_name() {
        let html = upload_success("<b>&.txt", 10);
        assert!(html.contains("File name: &lt;b&gt;&amp;.txt"));
        assert!(html.contains("href=\"/%3Cb%3E%26.txt\""));
        assert!(html.contains("10 B"));
    }

    #[test]
    fn disabled_pages_name_the_flags() {
        assert!(upload_disabled().contains("sweb --upload"));
        assert!(upload_disabled().contains("sweb --enable-upload"));
        let webdav = webdav_disabled();
        assert!(webdav.contains("sweb --webdav --webdav-readonly"));
        assert!(webdav.contains("--webdav-dir"));
    }

    #[test]
    fn landing_page_polls_status() {
        assert!(INDEX_PAGE.contains(STATUS_PATH));
        assert!(INDEX_PAGE.contains("setInterval"));
    }

    #[test]
    fn sizes_are_readable() {
        assert_eq!(format_size(12), "12 B");
        assert_eq!(format_size(1536), "1.5 KiB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MiB");
    }

    #[test]
    fn index_page_is_written_once() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ensure_index_page(dir.path()).unwrap());
        std::fs::write(dir.path().join("index.html"), "mine").unwrap();
        assert!(!ensure_index_page(dir.path()).unwrap());
        let content = std::fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert_eq!(content, "mine");
    }

    #[test]
    fn index_htm_counts_as_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.htm"), "old").unwrap();
        assert!(!ensure_index_page(dir.path()).unwrap());
        assert!(!dir.path().join("index.html").exists());
    }
}
