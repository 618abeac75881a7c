//! Pure request-path resolution: which file a pathname maps to, and
//! with what MIME type. No I/O here, so the whole rule set tests
//! without a listener.
//!
//! Resolution order:
//! 1. any path ending in `.wasm` serves the single compiled module,
//! 2. `/public/...` serves the named file from the public directory,
//! 3. any path ending in `.js` serves by basename from the public
//!    directory (module paths in the HTML stay location-independent),
//! 4. extensionless paths fall back to `index.html` (SPA routing),
//! 5. everything else is a 404.

use std::path::{Component, Path, PathBuf};

/// Where the deployable artifacts live.
#[derive(Debug, Clone)]
pub struct SiteLayout {
    /// Directory holding the entry document and the script files.
    pub public_dir: PathBuf,
    /// The one compiled WASM module, served for every `.wasm` request.
    pub wasm_artifact: PathBuf,
    /// Entry document name for the SPA fallback.
    pub index_document: String,
}

/// Outcome of resolving a request pathname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    File { path: PathBuf, mime: &'static str },
    NotFound,
}

impl SiteLayout {
    pub fn resolve(&self, pathname: &str) -> Resolution {
        if !pathname.starts_with('/') || has_traversal(pathname) {
            return Resolution::NotFound;
        }

        if pathname.ends_with(".wasm") {
            return Resolution::File {
                path: self.wasm_artifact.clone(),
                mime: mime_for(&self.wasm_artifact),
            };
        }

        if let Some(rest) = pathname.strip_prefix("/public/") {
            let path = self.public_dir.join(rest);
            return Resolution::File {
                mime: mime_for(&path),
                path,
            };
        }

        if pathname.ends_with(".js") {
            let basename = pathname.rsplit('/').next().unwrap_or(pathname);
            let path = self.public_dir.join(basename);
            return Resolution::File {
                mime: mime_for(&path),
                path,
            };
        }

        // SPA fallback: every extensionless route serves the shell and
        // lets the client-side router take it from there.
        if extension_of(pathname).is_none() {
            let path = self.public_dir.join(&self.index_document);
            return Resolution::File {
                mime: mime_for(&path),
                path,
            };
        }

        Resolution::NotFound
    }
}

fn has_traversal(pathname: &str) -> bool {
    Path::new(pathname)
        .components()
        .any(|c| matches!(c, Component::ParentDir))
}

/// Extension of the final path segment, if any.
fn extension_of(pathname: &str) -> Option<&str> {
    let segment = pathname.rsplit('/').next()?;
    let (_, ext) = segment.rsplit_once('.')?;
    (!ext.is_empty()).then_some(ext)
}

fn mime_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") => "text/html",
        Some("js") => "application/javascript",
        Some("css") => "text/css",
        Some("wasm") => "application/wasm",
        Some("json") => "application/json",
        _ => "text/plain",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> SiteLayout {
        SiteLayout {
            public_dir: PathBuf::from("public"),
            wasm_artifact: PathBuf::from("build/tally_web_bg.wasm"),
            index_document: "index.html".to_owned(),
        }
    }

    fn file(resolution: Resolution) -> (PathBuf, &'static str) {
        match resolution {
            Resolution::File { path, mime } => (path, mime),
            Resolution::NotFound => panic!("expected a file resolution"),
        }
    }

    #[test]
    fn any_wasm_path_serves_the_single_artifact() {
        let layout = layout();
        for pathname in ["/counter.wasm", "/deep/nested/module.wasm", "/a.wasm"] {
            let (path, mime) = file(layout.resolve(pathname));
            assert_eq!(path, PathBuf::from("build/tally_web_bg.wasm"));
            assert_eq!(mime, "application/wasm");
        }
    }

    #[test]
    fn public_prefix_serves_the_named_file() {
        let (path, mime) = file(layout().resolve("/public/style.css"));
        assert_eq!(path, PathBuf::from("public/style.css"));
        assert_eq!(mime, "text/css");
    }

    #[test]
    fn js_paths_resolve_by_basename() {
        let (path, mime) = file(layout().resolve("/some/deep/app.js"));
        assert_eq!(path, PathBuf::from("public/app.js"));
        assert_eq!(mime, "application/javascript");
    }

    #[test]
    fn spa_routes_fall_back_to_the_shell() {
        let layout = layout();
        for pathname in ["/", "/counter", "/test", "/anything/else"] {
            let (path, mime) = file(layout.resolve(pathname));
            assert_eq!(path, PathBuf::from("public/index.html"));
            assert_eq!(mime, "text/html");
        }
    }

    #[test]
    fn unknown_extensions_are_not_found() {
        assert_eq!(layout().resolve("/favicon.ico"), Resolution::NotFound);
        assert_eq!(layout().resolve("/data.csv"), Resolution::NotFound);
    }

    #[test]
    fn traversal_components_are_rejected() {
        assert_eq!(layout().resolve("/public/../secret.js"), Resolution::NotFound);
        assert_eq!(layout().resolve("/../etc/passwd"), Resolution::NotFound);
        assert_eq!(layout().resolve("relative/path"), Resolution::NotFound);
    }

    #[test]
    fn unknown_mime_defaults_to_text_plain() {
        let (_, mime) = file(layout().resolve("/public/README"));
        assert_eq!(mime, "text/plain");
    }
}
