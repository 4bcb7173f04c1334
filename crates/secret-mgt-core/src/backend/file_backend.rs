//! File-based secret backend (JSON)
//!
//! Persists every tenant's secrets in a single JSON document. Values are
//! stored as given; encryption at rest is the job of whatever sits below.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tokio::sync::RwLock;

use super::traits::{BackendError, BackendResult, SecretBackend};
use crate::types::{Secret, TenantId};

/// On-disk document layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SecretDocument {
    #[serde(default)]
    tenants: BTreeMap<TenantId, Vec<Secret>>,
}

/// Secret backend backed by a JSON file
///
/// Within a process, reads share an async lock and each read-modify-write
/// holds it exclusively. Across processes the same discipline is kept with an
/// advisory lock on `<path>.lock`. Writes go to a temporary file in the same
/// directory which is then renamed over the document, so a reader sees either
/// the old or the new document and never a partial one.
///
/// On unix the document is created with mode `0600`.
///
/// # Example
///
/// ```no_run
/// use secret_mgt_core::backend::FileSecretBackend;
///
/// let backend = FileSecretBackend::new("/var/lib/secret-mgt/secrets.json");
/// ```
pub struct FileSecretBackend {
    path: PathBuf,
    lock: RwLock<()>,
}

impl FileSecretBackend {
    /// Create a backend for a specific file path
    ///
    /// The file and its parent directory are created on the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    /// Get the document path
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> BackendResult<SecretDocument> {
        let _guard = self.lock.read().await;
        let path = self.path.clone();
        blocking(move || {
            let Some(_lock) = DocumentLock::shared(&path)? else {
                return Ok(SecretDocument::default());
            };
            read_document(&path)
        })
        .await
    }

    /// Run a read-modify-write cycle under both locks
    async fn update<F>(&self, apply: F) -> BackendResult<()>
    where
        F: FnOnce(&mut SecretDocument) -> BackendResult<()> + Send,
    {
        let _guard = self.lock.write().await;

        let path = self.path.clone();
        let (lock, mut document) = blocking(move || {
            let lock = DocumentLock::exclusive(&path)?;
            let document = read_document(&path)?;
            Ok((lock, document))
        })
        .await?;

        apply(&mut document)?;

        let path = self.path.clone();
        blocking(move || {
            write_document(&path, &document)?;
            drop(lock);
            Ok(())
        })
        .await
    }
}

impl std::fmt::Debug for FileSecretBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSecretBackend")
            .field("path", &self.path)
            .finish()
    }
}

/// Advisory lock on the sidecar `<document>.lock` file, released on drop
///
/// The document itself is replaced by rename, so it cannot carry the lock.
struct DocumentLock {
    file: File,
}

impl DocumentLock {
    fn lock_path(document: &Path) -> PathBuf {
        let mut name = document.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    fn open(document: &Path) -> io::Result<File> {
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(Self::lock_path(document))
    }

    /// Take a shared lock, or `None` if the document directory does not exist
    fn shared(document: &Path) -> BackendResult<Option<Self>> {
        let file = match Self::open(document) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        FileExt::lock_shared(&file)?;
        Ok(Some(Self { file }))
    }

    /// Take an exclusive lock, creating the document directory if needed
    fn exclusive(document: &Path) -> BackendResult<Self> {
        if let Some(parent) = document.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = Self::open(document)?;
        FileExt::lock_exclusive(&file)?;
        Ok(Self { file })
    }
}

impl Drop for DocumentLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

/// A missing document is empty; anything else must parse
fn read_document(path: &Path) -> BackendResult<SecretDocument> {
    match fs::read(path) {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(SecretDocument::default()),
        Err(e) => Err(e.into()),
    }
}

fn write_document(path: &Path, document: &SecretDocument) -> BackendResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o600))?;
    }

    {
        let mut writer = BufWriter::new(&mut temp);
        serde_json::to_writer_pretty(&mut writer, document)?;
        writer.flush()?;
    }
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

async fn blocking<T, F>(task: F) -> BackendResult<T>
where
    F: FnOnce() -> BackendResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| BackendError::Other(format!("file task failed: {e}")))?
}

#[async_trait]
impl SecretBackend for FileSecretBackend {
    fn name(&self) -> &str {
        "file"
    }

    async fn add_secret(&self, tenant_id: TenantId, secret: &Secret) -> BackendResult<()> {
        self.update(|doc| {
            let name_taken = doc
                .tenants
                .get(&tenant_id)
                .is_some_and(|p| p.iter().any(|s| s.secret_name == secret.secret_name));
            if name_taken {
                return Err(BackendError::name_conflict(&secret.secret_name));
            }
            if let Some(id) = secret.id() {
                if doc.tenants.values().flatten().any(|s| s.id() == Some(id)) {
                    return Err(BackendError::id_conflict(id));
                }
            }

            doc.tenants.entry(tenant_id).or_default().push(secret.clone());
            Ok(())
        })
        .await
    }

    async fn get_secret_by_name(&self, tenant_id: TenantId, name: &str) -> BackendResult<Option<Secret>> {
        let mut document = self.load().await?;
        Ok(document
            .tenants
            .remove(&tenant_id)
            .and_then(|p| p.into_iter().find(|s| s.secret_name == name)))
    }

    async fn get_secret_by_id(&self, tenant_id: TenantId, secret_id: &str) -> BackendResult<Option<Secret>> {
        let mut document = self.load().await?;
        Ok(document
            .tenants
            .remove(&tenant_id)
            .and_then(|p| p.into_iter().find(|s| s.id() == Some(secret_id))))
    }

    async fn get_secrets(&self, tenant_id: TenantId) -> BackendResult<Option<Vec<Secret>>> {
        let mut document = self.load().await?;
        Ok(document.tenants.remove(&tenant_id))
    }

    async fn delete_secret_by_name(&self, tenant_id: TenantId, name: &str) -> BackendResult<()> {
        self.update(|doc| {
            if let Some(partition) = doc.tenants.get_mut(&tenant_id) {
                partition.retain(|s| s.secret_name != name);
            }
            Ok(())
        })
        .await
    }

    async fn delete_secret_by_id(&self, tenant_id: TenantId, secret_id: &str) -> BackendResult<()> {
        self.update(|doc| {
            if let Some(partition) = doc.tenants.get_mut(&tenant_id) {
                partition.retain(|s| s.id() != Some(secret_id));
            }
            Ok(())
        })
        .await
    }

    async fn replace_secret(&self, tenant_id: TenantId, secret: &Secret) -> BackendResult<()> {
        self.update(|doc| {
            let stored = doc
                .tenants
                .get_mut(&tenant_id)
                .and_then(|p| p.iter_mut().find(|s| s.secret_name == secret.secret_name))
                .ok_or_else(|| BackendError::not_found(&secret.secret_name))?;
            *stored = secret.clone();
            Ok(())
        })
        .await
    }
}
