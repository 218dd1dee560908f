//! Where the location list comes from.

use std::fmt;
use std::path::PathBuf;

use crate::error::LoadError;

/// A location list on disk or behind an HTTP URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationSource {
    /// Local JSON file
    File(PathBuf),
    /// Remote JSON document, fetched once
    Url(String),
}

impl LocationSource {
    /// Interpret a CLI argument: `http(s)://` prefixes select a URL, anything
    /// else is a file path.
    pub fn parse(arg: &str) -> Self {
        if arg.starts_with("http://") || arg.starts_with("https://") {
            LocationSource::Url(arg.to_string())
        } else {
            LocationSource::File(PathBuf::from(arg))
        }
    }

    /// Fetch the raw bytes of the list.
    pub async fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        match self {
            LocationSource::File(path) => {
                tokio::fs::read(path).await.map_err(|source| LoadError::Read {
                    path: path.display().to_string(),
                    source,
                })
            }
            LocationSource::Url(url) => fetch_url(url).await,
        }
    }
}

impl fmt::Display for LocationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationSource::File(path) => write!(f, "{}", path.display()),
            LocationSource::Url(url) => f.write_str(url),
        }
    }
}

async fn fetch_url(url: &str) -> Result<Vec<u8>, LoadError> {
    let unreachable = |e: reqwest::Error| LoadError::Unreachable {
        url: url.to_string(),
        message: e.to_string(),
    };

    let client = reqwest::Client::builder()
        .user_agent(concat!("bonqr/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(unreachable)?;

    let response = client.get(url).send().await.map_err(unreachable)?;
    if !response.status().is_success() {
        return Err(LoadError::Status {
            status: response.status().as_u16(),
        });
    }

    let bytes = response.bytes().await.map_err(unreachable)?;
    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(
            LocationSource::parse("https://example.com/locations.json"),
            LocationSource::Url("https://example.com/locations.json".into())
        );
        assert_eq!(
            LocationSource::parse("locations.json"),
            LocationSource::File(PathBuf::from("locations.json"))
        );
    }
}
