//! Runtime configuration: data directory, store selection and credentials.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use tracing::debug;
use url::Url;

use crmkit_core::{ApiKey, RemoteStore, StoreUrl};
use crmkit_file::{FileAuth, FileStore};
use crmkit_http::HttpStore;

use crate::cli::GlobalArgs;

/// Resolved settings shared by every command.
#[derive(Debug, Clone)]
pub struct Config {
    home: PathBuf,
    store: StoreUrl,
    api_key: Option<ApiKey>,
}

impl Config {
    /// Resolve flags and environment into a configuration.
    ///
    /// Without `--home`/`CRM_HOME` the platform data directory is used.
    /// Without `--store`/`CRM_STORE` records go to `<home>/store`.
    pub fn resolve(args: &GlobalArgs) -> Result<Self> {
        let home = match &args.home {
            Some(home) => home.clone(),
            None => default_home()?,
        };

        let store = match &args.store {
            Some(store) => StoreUrl::new(store).context("Invalid store URL")?,
            None => local_store_url(&home.join("store"))?,
        };

        let api_key = args.api_key.clone().map(ApiKey::new);

        debug!(home = %home.display(), %store, "Resolved configuration");

        Ok(Self {
            home,
            store,
            api_key,
        })
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn store_url(&self) -> &StoreUrl {
        &self.store
    }

    /// Open the session provider kept under the home directory.
    pub fn open_auth(&self) -> Result<FileAuth> {
        fs::create_dir_all(&self.home).context("Failed to create data directory")?;
        FileAuth::open(&self.home).context("Failed to load session")
    }

    /// Open the document store the store URL points at.
    pub fn open_store(&self) -> Result<Arc<dyn RemoteStore>> {
        match self.store.local_root() {
            Some(root) => Ok(Arc::new(FileStore::new(root))),
            None => {
                let store = HttpStore::new(self.store.clone(), self.api_key.clone())
                    .context("Failed to create HTTP store client")?;
                Ok(Arc::new(store))
            }
        }
    }
}

fn default_home() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "crm").context("Could not determine data directory")?;
    Ok(dirs.data_dir().to_path_buf())
}

fn local_store_url(path: &Path) -> Result<StoreUrl> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .context("Failed to resolve current directory")?
            .join(path)
    };

    let url = Url::from_directory_path(&absolute)
        .map_err(|_| anyhow::anyhow!("Cannot express {} as a file URL", absolute.display()))?;
    StoreUrl::new(url.as_str()).context("Invalid local store path")
}
