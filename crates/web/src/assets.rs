//! Stylesheet, scripts and icon for the pages.
//!
//! Files under `src/assets` are compiled into the binary. When that directory
//! (or `LINTEL_ASSETS_DIR`) exists at runtime it is read instead, so edits
//! show up without a rebuild.

use std::{
    hash::{DefaultHasher, Hasher},
    path::{Component, Path as FsPath, PathBuf},
    sync::LazyLock,
};

use {
    axum::{
        extract::Path,
        http::{StatusCode, header},
        response::{IntoResponse, Response},
    },
    include_dir::{Dir, include_dir},
    tracing::info,
};

static EMBEDDED: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/src/assets");

static SOURCE: LazyLock<AssetSource> = LazyLock::new(AssetSource::detect);

/// Where asset bytes come from for the lifetime of the process.
enum AssetSource {
    Disk(PathBuf),
    Embedded,
}

impl AssetSource {
    fn detect() -> Self {
        let candidates = std::env::var_os("LINTEL_ASSETS_DIR")
            .map(PathBuf::from)
            .into_iter()
            .chain([PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src/assets")]);

        for dir in candidates {
            if dir.is_dir() {
                info!(dir = %dir.display(), "serving assets from disk");
                return Self::Disk(dir);
            }
        }
        info!("serving embedded assets");
        Self::Embedded
    }

    fn read(&self, path: &str) -> Option<Vec<u8>> {
        let relative = safe_relative(path)?;
        match self {
            Self::Disk(dir) => std::fs::read(dir.join(relative)).ok(),
            Self::Embedded => EMBEDDED.get_file(relative).map(|f| f.contents().to_vec()),
        }
    }
}

/// Only plain relative paths; `..`, roots and prefixes are rejected.
fn safe_relative(path: &str) -> Option<&FsPath> {
    let path = FsPath::new(path);
    path.components()
        .all(|c| matches!(c, Component::Normal(_)))
        .then_some(path)
}

pub(crate) fn is_dev_assets() -> bool {
    matches!(*SOURCE, AssetSource::Disk(_))
}

/// Hash of every embedded file, used as the version segment of asset URLs.
pub(crate) fn asset_content_hash() -> String {
    fn visit(dir: &Dir<'_>, h: &mut DefaultHasher) {
        let mut files: Vec<_> = dir.files().collect();
        files.sort_by(|a, b| a.path().cmp(b.path()));
        for file in files {
            h.write(file.path().as_os_str().as_encoded_bytes());
            h.write(file.contents());
        }
        let mut dirs: Vec<_> = dir.dirs().collect();
        dirs.sort_by(|a, b| a.path().cmp(b.path()));
        for sub in dirs {
            visit(sub, h);
        }
    }

    let mut h = DefaultHasher::new();
    visit(&EMBEDDED, &mut h);
    format!("{:016x}", h.finish())
}

fn content_type(path: &str) -> &'static str {
    match path.rsplit_once('.').map(|(_, ext)| ext) {
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "application/javascript; charset=utf-8",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// `/assets/v/<hash>/path`. The hash changes with the content, so embedded
/// files can be cached forever.
pub async fn versioned_asset_handler(
    Path((_version, path)): Path<(String, String)>,
) -> Response {
    let cache = if is_dev_assets() {
        "no-cache, no-store"
    } else {
        "public, max-age=31536000, immutable"
    };
    serve(&path, cache)
}

/// `/assets/path`, always revalidated.
pub async fn asset_handler(Path(path): Path<String>) -> Response {
    serve(&path, "no-cache")
}

fn serve(path: &str, cache_control: &'static str) -> Response {
    let Some(body) = SOURCE.read(path) else {
        return (StatusCode::NOT_FOUND, "not found").into_response();
    };
    (
        [
            (header::CONTENT_TYPE, content_type(path)),
            (header::CACHE_CONTROL, cache_control),
            (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
        ],
        body,
    )
        .into_response()
}
