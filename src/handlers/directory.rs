//! Static files and directory listings under a root directory.
//!
//! # Responsibilities
//! - Serve files below the configured root
//! - Serve the first existing welcome file for a directory
//! - Optionally render an HTML listing for directories without one
//!
//! # Design Decisions
//! - Declines (returns `false`) for anything it cannot serve, so later
//!   contexts or the dispatcher's 404 take over
//! - Request paths are percent-decoded before they touch the filesystem
//! - Parent-directory components are refused outright
//! - Resolved paths are canonicalized and must stay under the canonical root,
//!   so symlinks cannot reach outside it
//! - Blocking filesystem calls are fine here: chains run on the blocking pool

use std::fmt::Write as _;
use std::fs;
use std::path::{Component, Path, PathBuf};

use axum::http::{header, HeaderValue, Method};
use percent_encoding::percent_decode_str;

use crate::error::WriteAfterCloseError;
use crate::handlers::index::escape_html;
use crate::handlers::Handler;
use crate::http::{InboundRequest, ResponseWriter};

#[derive(Debug, Clone)]
pub struct DirectoryListingHandler {
    root: PathBuf,
    mount: String,
    welcome_files: Vec<String>,
    list_directories: bool,
}

impl DirectoryListingHandler {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            mount: String::from("/"),
            welcome_files: vec!["index.html".to_string()],
            list_directories: false,
        }
    }

    /// Path prefix stripped from request paths before resolving files.
    pub fn with_mount(mut self, mount: impl Into<String>) -> Self {
        self.mount = mount.into();
        self
    }

    pub fn with_welcome_files(mut self, files: Vec<String>) -> Self {
        self.welcome_files = files;
        self
    }

    pub fn with_listing(mut self, enabled: bool) -> Self {
        self.list_directories = enabled;
        self
    }

    /// Map the request path onto the filesystem, refusing traversal and
    /// paths that do not decode to UTF-8.
    fn resolve(&self, request_path: &str) -> Option<PathBuf> {
        let relative = request_path
            .strip_prefix(self.mount.trim_end_matches('/'))
            .unwrap_or(request_path);
        let decoded = percent_decode_str(relative).decode_utf8().ok()?;

        let mut resolved = self.root.clone();
        for component in Path::new(decoded.trim_start_matches('/')).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(resolved)
    }

    /// Canonical form of `path` if it exists and lies under the root.
    fn confine(&self, path: &Path) -> Option<PathBuf> {
        let root = self.root.canonicalize().ok()?;
        let canonical = path.canonicalize().ok()?;
        if canonical.starts_with(&root) {
            Some(canonical)
        } else {
            tracing::warn!(path = %path.display(), "Refusing path outside root");
            None
        }
    }

    fn serve_file(&self, path: &Path, response: &mut ResponseWriter) -> Result<bool, WriteAfterCloseError> {
        let contents = match fs::read(path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Unreadable file");
                return Ok(false);
            }
        };
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        if let Ok(value) = HeaderValue::from_str(mime.as_ref()) {
            response.set_header(header::CONTENT_TYPE, value)?;
        }
        response.set_content_length(contents.len() as u64)?;
        response.write(&contents)?;
        Ok(true)
    }

    fn serve_listing(
        &self,
        dir: &Path,
        request_path: &str,
        response: &mut ResponseWriter,
    ) -> Result<bool, WriteAfterCloseError> {
        let mut names: Vec<(String, bool)> = match fs::read_dir(dir) {
            Ok(entries) => entries
                .filter_map(Result::ok)
                .map(|entry| {
                    let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
                    (entry.file_name().to_string_lossy().into_owned(), is_dir)
                })
                .collect(),
            Err(e) => {
                tracing::debug!(path = %dir.display(), error = %e, "Unreadable directory");
                return Ok(false);
            }
        };
        names.sort();

        let title = escape_html(request_path);
        let mut page = format!(
            "<html>\n<head><title>Directory: {title}</title></head>\n<body>\n<h4>Directory: {title}</h4>\n<ul>\n"
        );
        if request_path != "/" {
            page.push_str("<li><a href=\"../\">../</a></li>\n");
        }
        for (name, is_dir) in names {
            let suffix = if is_dir { "/" } else { "" };
            let name = escape_html(&name);
            let _ = writeln!(page, "<li><a href=\"{name}{suffix}\">{name}{suffix}</a></li>");
        }
        page.push_str("</ul>\n</body></html>\n");

        response.set_content_type("text/html; charset=utf-8")?;
        response.write_str(&page)?;
        Ok(true)
    }
}

impl Handler for DirectoryListingHandler {
    fn handle(
        &self,
        request: &InboundRequest,
        response: &mut ResponseWriter,
    ) -> Result<bool, WriteAfterCloseError> {
        if request.method != Method::GET && request.method != Method::HEAD {
            return Ok(false);
        }
        let Some(resolved) = self.resolve(&request.path) else {
            tracing::warn!(request_id = %request.request_id, path = %request.path, "Refusing request path");
            return Ok(false);
        };
        let Some(path) = self.confine(&resolved) else {
            return Ok(false);
        };
        let Ok(metadata) = fs::metadata(&path) else {
            return Ok(false);
        };

        if metadata.is_file() {
            return self.serve_file(&path, response);
        }

        if !request.path.ends_with('/') {
            let mut location = format!("{}/", request.path);
            if let Some(query) = &request.query {
                location.push('?');
                location.push_str(query);
            }
            response.send_redirect(&location)?;
            return Ok(true);
        }

        for welcome in &self.welcome_files {
            let Some(candidate) = self.confine(&path.join(welcome)) else {
                continue;
            };
            if candidate.is_file() {
                return self.serve_file(&candidate, response);
            }
        }

        if self.list_directories {
            return self.serve_listing(&path, &request.path, response);
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("hello.txt"), "hi there").unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("docs").join("a.html"), "<p>a</p>").unwrap();
        fs::create_dir(dir.path().join("home")).unwrap();
        fs::write(dir.path().join("home").join("index.html"), "welcome").unwrap();
        dir
    }

    fn get(handler: &DirectoryListingHandler, path: &str) -> (bool, ResponseWriter) {
        let request = InboundRequest::new("unsecured", false, "host", path);
        let mut response = ResponseWriter::detached();
        let handled = handler.handle(&request, &mut response).unwrap();
        (handled, response)
    }

    #[test]
    fn test_serves_file() {
        let dir = site();
        let handler = DirectoryListingHandler::new(dir.path());
        let (handled, response) = get(&handler, "/hello.txt");
        assert!(handled);
        assert_eq!(response.body(), b"hi there");
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "8");
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
    }

    #[test]
    fn test_content_type_from_extension() {
        let dir = site();
        fs::write(dir.path().join("report.pdf"), "%PDF").unwrap();
        fs::write(dir.path().join("blob.unknownext"), "??").unwrap();
        let handler = DirectoryListingHandler::new(dir.path());

        let (_, response) = get(&handler, "/report.pdf");
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        let (_, response) = get(&handler, "/blob.unknownext");
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/octet-stream");
    }

    #[test]
    fn test_percent_encoded_path_is_decoded() {
        let dir = site();
        fs::write(dir.path().join("my file.txt"), "spaced").unwrap();
        let handler = DirectoryListingHandler::new(dir.path());

        let (handled, response) = get(&handler, "/my%20file.txt");
        assert!(handled);
        assert_eq!(response.body(), b"spaced");
    }

    #[test]
    fn test_encoded_traversal_and_bad_utf8_decline() {
        let dir = site();
        let handler = DirectoryListingHandler::new(dir.path().join("docs"));
        assert!(!get(&handler, "/%2e%2e/hello.txt").0);
        assert!(!get(&handler, "/..%2fhello.txt").0);
        assert!(!get(&handler, "/%ff.txt").0);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_outside_root_declines() {
        let outside = tempfile::tempdir().unwrap();
        fs::write(outside.path().join("secret.txt"), "top secret").unwrap();
        let dir = site();
        std::os::unix::fs::symlink(outside.path().join("secret.txt"), dir.path().join("link.txt")).unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("escape")).unwrap();
        let handler = DirectoryListingHandler::new(dir.path());

        let (handled, response) = get(&handler, "/link.txt");
        assert!(!handled);
        assert!(response.body().is_empty());
        assert!(!get(&handler, "/escape/secret.txt").0);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_inside_root_is_served() {
        let dir = site();
        std::os::unix::fs::symlink(dir.path().join("hello.txt"), dir.path().join("alias.txt")).unwrap();
        let handler = DirectoryListingHandler::new(dir.path());

        let (handled, response) = get(&handler, "/alias.txt");
        assert!(handled);
        assert_eq!(response.body(), b"hi there");
    }

    #[test]
    fn test_welcome_file() {
        let dir = site();
        let handler = DirectoryListingHandler::new(dir.path());
        let (handled, response) = get(&handler, "/home/");
        assert!(handled);
        assert_eq!(response.body(), b"welcome");
    }

    #[test]
    fn test_directory_without_slash_redirects() {
        let dir = site();
        let handler = DirectoryListingHandler::new(dir.path());
        let (handled, response) = get(&handler, "/docs");
        assert!(handled);
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/docs/");
    }

    #[test]
    fn test_listing_only_when_enabled() {
        let dir = site();
        let (handled, _) = get(&DirectoryListingHandler::new(dir.path()), "/docs/");
        assert!(!handled);

        let handler = DirectoryListingHandler::new(dir.path()).with_listing(true);
        let (handled, response) = get(&handler, "/docs/");
        assert!(handled);
        let body = String::from_utf8(response.body().to_vec()).unwrap();
        assert!(body.contains("<a href=\"a.html\">a.html</a>"));
    }

    #[test]
    fn test_mount_prefix_is_stripped() {
        let dir = site();
        let handler = DirectoryListingHandler::new(dir.path()).with_mount("/static");
        let (handled, response) = get(&handler, "/static/hello.txt");
        assert!(handled);
        assert_eq!(response.body(), b"hi there");
    }

    #[test]
    fn test_declines_missing_and_traversal() {
        let dir = site();
        let handler = DirectoryListingHandler::new(dir.path().join("docs"));
        assert!(!get(&handler, "/missing.txt").0);
        assert!(!get(&handler, "/../hello.txt").0);
    }
}
