//! Read-only loaders for the project-tracking documents behind `/roadmap`
//! and `/weekly`.

use std::path::PathBuf;

use thiserror::Error;

pub(crate) mod roadmap;
pub(crate) mod weekly;

#[derive(Debug, Error)]
pub(crate) enum ProjectError {
    #[error("{0} path is required")]
    PathRequired(&'static str),
    #[error("read {what} file {path:?}: {source}")]
    Read {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse {what} {path:?}: {source}")]
    Parse {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("parse weekly update front matter {path:?}: {reason}")]
    FrontMatter { path: PathBuf, reason: &'static str },
    #[error("{0}")]
    Invalid(String),
}

pub(crate) type Result<T> = std::result::Result<T, ProjectError>;

fn read_document(what: &'static str, path: &str) -> Result<(PathBuf, String)> {
    if path.trim().is_empty() {
        return Err(ProjectError::PathRequired(what));
    }
    let path = PathBuf::from(path);
    let data = std::fs::read_to_string(&path).map_err(|source| ProjectError::Read {
        what,
        path: path.clone(),
        source,
    })?;
    Ok((path, data))
}
