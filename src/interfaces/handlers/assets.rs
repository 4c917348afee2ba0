use std::path::{Component, Path, PathBuf};

use actix_web::http::StatusCode;

use crate::interfaces::dispatcher::SiteResponse;
use crate::settings::StaticSettings;

pub fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase).as_deref() {
        Some("css") => "text/css; charset=utf-8",
        Some("js") | Some("mjs") => "application/javascript; charset=utf-8",
        Some("json") | Some("map") => "application/json",
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("txt") => "text/plain; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Joins `relative` onto `root`, refusing anything that could escape it.
pub fn safe_join(root: &Path, relative: &str) -> Option<PathBuf> {
    let relative = Path::new(relative);
    let mut joined = root.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(part) => joined.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    (joined != root).then_some(joined)
}

pub async fn serve(settings: &StaticSettings, relative: &str) -> SiteResponse {
    let not_found = || SiteResponse::new(StatusCode::NOT_FOUND, "text/plain; charset=utf-8", "Not Found");

    let Some(path) = safe_join(Path::new(settings.serving_dir()), relative) else {
        tracing::warn!(path = relative, "Rejected static path");
        return not_found();
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            let cache_control = if settings.max_age_seconds > 0 {
                format!("public, max-age={}", settings.max_age_seconds)
            } else {
                "no-cache".to_string()
            };
            SiteResponse::new(StatusCode::OK, content_type_for(&path), bytes)
                .with_header("cache-control", cache_control)
        }
        Err(e) => {
            tracing::debug!(path = %path.display(), "Static file unavailable: {}", e);
            not_found()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::StaticStrategy;

    fn settings(dir: &Path, max_age_seconds: u64) -> StaticSettings {
        StaticSettings {
            url: "/static/".into(),
            source_dir: dir.to_string_lossy().into_owned(),
            root: dir.to_string_lossy().into_owned(),
            strategy: StaticStrategy::Direct,
            max_age_seconds,
        }
    }

    #[test]
    fn traversal_is_refused() {
        let root = Path::new("static");
        assert!(safe_join(root, "../Cargo.toml").is_none());
        assert!(safe_join(root, "/etc/passwd").is_none());
        assert!(safe_join(root, "css/../../secret").is_none());
        assert_eq!(safe_join(root, "css/style.css"), Some(PathBuf::from("static/css/style.css")));
    }

    #[tokio::test]
    async fn serves_existing_files_with_content_type() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("css")).unwrap();
        std::fs::write(dir.path().join("css/site.css"), "body{}").unwrap();

        let response = serve(&settings(dir.path(), 31536000), "css/site.css").await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, b"body{}");
        assert_eq!(response.header("content-type"), Some("text/css; charset=utf-8"));
        assert_eq!(response.header("cache-control"), Some("public, max-age=31536000"));
    }

    #[tokio::test]
    async fn missing_files_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let response = serve(&settings(dir.path(), 0), "js/missing.js").await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }
}
