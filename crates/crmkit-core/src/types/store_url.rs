//! Store location.

use std::fmt;
use std::path::{Path, PathBuf};

use url::{Host, Url};

use crate::error::{Error, InvalidArgumentError};

/// Where a document store lives.
///
/// `file://` URLs name a directory on this machine. `https://` URLs name a
/// document service; plain `http://` is accepted only for loopback hosts.
///
/// ```
/// use crmkit_core::StoreUrl;
///
/// let remote = StoreUrl::new("https://docs.example.com/crm").unwrap();
/// assert_eq!(remote.api_url("collections/customers/documents"),
///            "https://docs.example.com/crm/v1/collections/customers/documents");
/// assert!(remote.local_root().is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StoreUrl {
    url: Url,
    /// Set for `file://` stores.
    root: Option<PathBuf>,
}

impl StoreUrl {
    /// Parse and classify a store location.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgumentError::StoreUrl`] for unparseable URLs,
    /// unsupported schemes, remote `file://` hosts and plain HTTP to a
    /// non-loopback host.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let raw = s.as_ref();
        let rejected = |reason: String| -> Error {
            InvalidArgumentError::StoreUrl {
                value: raw.to_string(),
                reason,
            }
            .into()
        };

        let url = Url::parse(raw).map_err(|e| rejected(e.to_string()))?;

        let root = match url.scheme() {
            "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|_| rejected("file URL must name a local directory".into()))?;
                Some(path)
            }
            "https" if url.host().is_some() => None,
            "http" if url.host().as_ref().is_some_and(is_loopback) => None,
            "http" => return Err(rejected("plain HTTP is only allowed for loopback hosts".into())),
            other => return Err(rejected(format!("unsupported scheme '{}'", other))),
        };

        Ok(Self { url, root })
    }

    /// The directory holding records, for `file://` stores.
    pub fn local_root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn is_local(&self) -> bool {
        self.root.is_some()
    }

    pub fn is_network(&self) -> bool {
        self.root.is_none()
    }

    /// Versioned API URL for `path`, kept below any base path of the store.
    pub fn api_url(&self, path: &str) -> String {
        let mut url = self.url.clone();
        let joined = format!(
            "{}/v1/{}",
            url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        url.into()
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

fn is_loopback(host: &Host<&str>) -> bool {
    match host {
        Host::Domain(name) => name.eq_ignore_ascii_case("localhost"),
        Host::Ipv4(ip) => ip.is_loopback(),
        Host::Ipv6(ip) => ip.is_loopback(),
    }
}

impl fmt::Display for StoreUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_exposes_its_root() {
        #[cfg(unix)]
        {
            let store = StoreUrl::new("file:///var/lib/crm/store/").unwrap();
            assert!(store.is_local());
            assert_eq!(store.local_root(), Some(Path::new("/var/lib/crm/store/")));
        }
    }

    #[test]
    fn file_store_on_another_host_is_rejected() {
        #[cfg(unix)]
        assert!(StoreUrl::new("file://fileserver/crm").is_err());
    }

    #[test]
    fn api_paths_join_under_base_path() {
        let bare = StoreUrl::new("https://docs.example.com").unwrap();
        assert_eq!(
            bare.api_url("/collections/projects/documents"),
            "https://docs.example.com/v1/collections/projects/documents"
        );

        let nested = StoreUrl::new("https://example.com/tenants/acme/").unwrap();
        assert_eq!(
            nested.api_url("collections/expenses/documents/e1"),
            "https://example.com/tenants/acme/v1/collections/expenses/documents/e1"
        );
    }

    #[test]
    fn plain_http_needs_loopback() {
        for ok in ["http://localhost:8088", "http://127.0.0.2", "http://[::1]:9000"] {
            assert!(StoreUrl::new(ok).unwrap().is_network(), "{ok}");
        }
        assert!(StoreUrl::new("http://docs.example.com").is_err());
    }

    #[test]
    fn other_schemes_are_rejected() {
        let err = StoreUrl::new("ftp://docs.example.com").unwrap_err();
        assert!(err.to_string().contains("unsupported scheme 'ftp'"));
        assert!(StoreUrl::new("collections/customers").is_err());
    }
}
