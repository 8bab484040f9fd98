//! Optional built front end. When `frontend/dist` (or `dist`) exists it is served for
//! every non-API path that the router does not know.

use std::path::PathBuf;

use tower_http::services::ServeDir;

pub fn static_dir() -> Option<PathBuf> {
    let base = std::env::current_dir().ok()?;
    ["frontend/dist", "dist"]
        .iter()
        .map(|dir| base.join(dir))
        .find(|dir| dir.join("index.html").is_file())
}

pub fn static_service() -> Option<ServeDir> {
    static_dir().map(ServeDir::new)
}
