// src/services/static_files.rs

use std::path::{Component, Path, PathBuf};

use axum::{http::StatusCode, response::Response};

use crate::common::response::{not_found, raw};

const LOGIN_PAGE: &str = "login.html";
const INDEX_PAGE: &str = "index.html";

fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "html" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" => "application/javascript; charset=utf-8",
        "json" => "application/json; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}

// Resolve `.` e `..` sem tocar no disco.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

// Front-end estático servido a partir de uma raiz fixa.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
    login: PathBuf,
}

impl StaticFiles {
    pub fn new(dir: &Path) -> Self {
        let root = normalize(&std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf()));
        let login = root.join(LOGIN_PAGE);
        Self { root, login }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Caminho da URL dentro da raiz; `None` se a resolução escapa da raiz.
    pub fn safe_join(&self, url_path: &str) -> Option<PathBuf> {
        let relative = url_path.trim_start_matches('/');
        let resolved = normalize(&self.root.join(Path::new(".").join(relative)));
        resolved.starts_with(&self.root).then_some(resolved)
    }

    /// Resolve a URL para um arquivo; rotas desconhecidas recebem a página de login.
    pub async fn serve(&self, url_path: &str) -> Response {
        let mut file_path = if url_path.is_empty() || url_path == "/" {
            self.login.clone()
        } else {
            self.safe_join(url_path).unwrap_or_else(|| self.login.clone())
        };

        if tokio::fs::metadata(&file_path).await.is_ok_and(|m| m.is_dir()) {
            let index = file_path.join(INDEX_PAGE);
            file_path = if tokio::fs::metadata(&index).await.is_ok_and(|m| m.is_file()) {
                index
            } else {
                self.login.clone()
            };
        }

        match tokio::fs::read(&file_path).await {
            Ok(data) => raw(StatusCode::OK, content_type(&file_path), data),
            Err(_) if url_path != "/" && url_path != "/login.html" => {
                match tokio::fs::read(&self.login).await {
                    Ok(data) => raw(StatusCode::OK, "text/html; charset=utf-8", data),
                    Err(e) => {
                        tracing::warn!("⚠️ Página de login indisponível em {}: {}", self.login.display(), e);
                        not_found()
                    }
                }
            }
            Err(_) => not_found(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;
    use http_body_util::BodyExt;
    use std::fs;
    use tempfile::TempDir;

    // <tmp>/web com login, um script, um subdiretório com index e um segredo fora da raiz
    fn fixture() -> (TempDir, StaticFiles) {
        let tmp = tempfile::tempdir().unwrap();
        let web = tmp.path().join("web");
        fs::create_dir_all(web.join("admin")).unwrap();
        fs::create_dir_all(web.join("vazio")).unwrap();
        fs::write(web.join("login.html"), "<h1>login</h1>").unwrap();
        fs::write(web.join("app.js"), "console.log(1)").unwrap();
        fs::write(web.join("admin").join("index.html"), "<h1>admin</h1>").unwrap();
        fs::write(tmp.path().join("secret.txt"), "top secret").unwrap();
        let files = StaticFiles::new(&web);
        (tmp, files)
    }

    async fn fetch(files: &StaticFiles, path: &str) -> (StatusCode, String, String) {
        let response = files.serve(path).await;
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, content_type, String::from_utf8_lossy(&bytes).into_owned())
    }

    #[test]
    fn traversal_never_leaves_the_root() {
        let (_tmp, files) = fixture();
        let attempts = [
            "/../secret.txt",
            "/../../../../etc/passwd",
            "/admin/../../secret.txt",
            "/./../web/../secret.txt",
            "/a/b/c/../../../../..",
            "/..",
            "/admin/./../app.js",
        ];
        for attempt in attempts {
            if let Some(resolved) = files.safe_join(attempt) {
                assert!(resolved.starts_with(files.root()), "{attempt} -> {}", resolved.display());
            }
        }
        assert!(files.safe_join("/../secret.txt").is_none());
        assert_eq!(files.safe_join("/admin/../app.js"), Some(files.root().join("app.js")));
    }

    #[tokio::test]
    async fn serves_files_with_their_content_type() {
        let (_tmp, files) = fixture();
        let (status, content_type, body) = fetch(&files, "/app.js").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, "application/javascript; charset=utf-8");
        assert_eq!(body, "console.log(1)");

        let (_, _, body) = fetch(&files, "/admin/").await;
        assert_eq!(body, "<h1>admin</h1>");
    }

    #[tokio::test]
    async fn unknown_paths_and_escapes_get_the_login_page() {
        let (_tmp, files) = fixture();
        let (_, _, login) = fetch(&files, "/login.html").await;

        for path in ["/", "/no-existe", "/vazio", "/../secret.txt"] {
            let (status, _, body) = fetch(&files, path).await;
            assert_eq!(status, StatusCode::OK, "{path}");
            assert_eq!(body, login, "{path}");
        }
    }

    #[tokio::test]
    async fn missing_login_page_is_a_real_404() {
        let (tmp, files) = fixture();
        fs::remove_file(tmp.path().join("web").join("login.html")).unwrap();

        for path in ["/", "/login.html", "/dashboard"] {
            let (status, _, body) = fetch(&files, path).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
            assert_eq!(body, "Not Found");
        }
    }
}
