//! Transfer orchestration
//!
//! Sequences list, resolve, fetch, put, copy, and delete calls for one
//! invocation. Objects are processed one at a time in listing order; a
//! failed object is recorded and the batch continues, surfacing one
//! aggregate error after every object has been attempted.

use std::path::Path;

use syncer_core::{
    expand_source, list_all_keys, relative_suffix, resolve, BatchOutcome, Error, ObjectLocator,
    ObjectStore, ResolvedKeySet, Result,
};

use crate::output::{Formatter, ProgressBar};

/// Shared state for one invocation
pub struct TransferContext<'a> {
    pub formatter: &'a Formatter,
    /// Autocomplete partial key prefixes to segment boundaries
    pub autocomplete: bool,
}

/// Join a destination key prefix and a relative suffix
fn join_key(prefix: &str, suffix: &str) -> String {
    if prefix.is_empty() {
        suffix.to_string()
    } else if prefix.ends_with('/') {
        format!("{prefix}{suffix}")
    } else {
        format!("{prefix}/{suffix}")
    }
}

/// List and resolve the keys a locator's prefix denotes
async fn resolve_remote(
    store: &dyn ObjectStore,
    locator: &ObjectLocator,
    autocomplete: bool,
) -> Result<ResolvedKeySet> {
    let listed = list_all_keys(store, &locator.bucket, &locator.key_prefix).await?;
    Ok(resolve(&locator.key_prefix, listed, autocomplete))
}

fn no_keys_matched(locator: &ObjectLocator) -> Error {
    Error::NotFound(format!(
        "No keys matched prefix '{}' in bucket '{}'",
        locator.key_prefix, locator.bucket
    ))
}

/// Whether the resolved set is a single exact match of the supplied prefix
fn is_exact(resolved: &ResolvedKeySet, prefix: &str) -> bool {
    resolved.len() == 1 && resolved[0].key == prefix
}

/// Close the batch: report failures, print the count summary, and turn a
/// non-empty failure list into an aggregate error.
fn finish_batch(
    outcome: BatchOutcome,
    verb: &str,
    done: &str,
    formatter: &Formatter,
) -> Result<Vec<String>> {
    if !outcome.failures().is_empty() {
        formatter.error(&format!("\nCouldn't {verb} the following object(s):"));
        for failure in outcome.failures() {
            formatter.error(&failure.object);
        }
    }
    formatter.status(&format!("\n{done} {} file(s).", outcome.created().len()));
    outcome.finish()
}

/// List local files matching the source argument; no mutation.
pub fn list_local(source: &Path, formatter: &Formatter) -> Result<Vec<String>> {
    let expansion = expand_source(source)?;
    let ids: Vec<String> = expansion
        .files
        .iter()
        .map(|f| f.display().to_string())
        .collect();
    for id in &ids {
        formatter.identifier(id);
    }
    formatter.status(&format!("\nFound {} object(s) in the source path.", ids.len()));
    Ok(ids)
}

/// List resolved keys under the locator's prefix; no mutation.
pub async fn list_remote(
    store: &dyn ObjectStore,
    source: &ObjectLocator,
    ctx: &TransferContext<'_>,
) -> Result<Vec<String>> {
    let resolved = resolve_remote(store, source, ctx.autocomplete).await?;
    for info in &resolved {
        ctx.formatter.identifier(&info.key);
    }
    ctx.formatter.status(&format!(
        "\nFound {} object(s) in the source path.",
        resolved.len()
    ));
    Ok(resolved.into_iter().map(|info| info.key).collect())
}

/// Upload expanded local files under the destination key prefix.
pub async fn upload(
    store: &dyn ObjectStore,
    source: &Path,
    destination: &ObjectLocator,
    ctx: &TransferContext<'_>,
) -> Result<Vec<String>> {
    let expansion = expand_source(source)?;
    ctx.formatter
        .status("Uploading objects to S3 object storage ...\n");
    let progress = ProgressBar::new(ctx.formatter.config(), expansion.files.len() as u64);

    let mut outcome = BatchOutcome::new();
    for file in &expansion.files {
        let key = join_key(&destination.key_prefix, &expansion.relative_suffix(file));
        match upload_one(store, file, &destination.bucket, &key).await {
            Ok(()) => {
                ctx.formatter.created(&key);
                outcome.record_success(key);
            }
            Err(e) => {
                ctx.formatter.error(&format!("{}: {e}", file.display()));
                outcome.record_failure(file.display().to_string(), e.to_string());
            }
        }
        progress.inc();
    }
    progress.finish_and_clear();

    finish_batch(outcome, "upload", "Uploaded", ctx.formatter)
}

async fn upload_one(
    store: &dyn ObjectStore,
    file: &Path,
    bucket: &str,
    key: &str,
) -> Result<()> {
    let data = std::fs::read(file)?;
    let content_type: Option<String> = mime_guess::from_path(file)
        .first()
        .map(|m| m.essence_str().to_string());
    store
        .put_object(bucket, key, data, content_type.as_deref())
        .await?;
    Ok(())
}

/// Download resolved keys below the destination root.
pub async fn download(
    store: &dyn ObjectStore,
    source: &ObjectLocator,
    destination: &Path,
    ctx: &TransferContext<'_>,
) -> Result<Vec<String>> {
    let resolved = resolve_remote(store, source, ctx.autocomplete).await?;
    if resolved.is_empty() {
        return Err(no_keys_matched(source));
    }
    ctx.formatter
        .status("Downloading objects from S3 object storage ...\n");
    let progress = ProgressBar::new(ctx.formatter.config(), resolved.len() as u64);

    // An exact single-key match may rename: the destination path is used
    // verbatim unless it is an existing directory.
    let rename = is_exact(&resolved, &source.key_prefix) && !destination.is_dir();

    let mut outcome = BatchOutcome::new();
    for info in &resolved {
        let dest_path = if rename {
            destination.to_path_buf()
        } else {
            destination.join(relative_suffix(&source.key_prefix, &info.key))
        };
        match download_one(store, &source.bucket, &info.key, &dest_path).await {
            Ok(()) => {
                let id = dest_path.display().to_string();
                ctx.formatter.created(&id);
                outcome.record_success(id);
            }
            Err(e) => {
                ctx.formatter.error(&format!("{}: {e}", info.key));
                outcome.record_failure(info.key.clone(), e.to_string());
            }
        }
        progress.inc();
    }
    progress.finish_and_clear();

    finish_batch(outcome, "download", "Downloaded", ctx.formatter)
}

async fn download_one(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
    dest_path: &Path,
) -> Result<()> {
    let data = store.get_object(bucket, key).await?;
    if let Some(parent) = dest_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(dest_path, data)?;
    Ok(())
}

/// Copy resolved keys from one store to another, streaming bytes without a
/// local intermediate. `server_side` short-circuits to CopyObject when both
/// locators share an endpoint.
pub async fn copy(
    source_store: &dyn ObjectStore,
    dest_store: &dyn ObjectStore,
    source: &ObjectLocator,
    destination: &ObjectLocator,
    server_side: bool,
    ctx: &TransferContext<'_>,
) -> Result<Vec<String>> {
    let resolved = resolve_remote(source_store, source, ctx.autocomplete).await?;
    if resolved.is_empty() {
        return Err(no_keys_matched(source));
    }
    ctx.formatter
        .status("Copying objects between S3 object storages ...\n");
    let progress = ProgressBar::new(ctx.formatter.config(), resolved.len() as u64);

    let rename = is_exact(&resolved, &source.key_prefix)
        && !destination.key_prefix.is_empty()
        && !destination.key_prefix.ends_with('/');

    let mut outcome = BatchOutcome::new();
    for info in &resolved {
        let dest_key = if rename {
            destination.key_prefix.clone()
        } else {
            join_key(
                &destination.key_prefix,
                relative_suffix(&source.key_prefix, &info.key),
            )
        };
        let result = if server_side {
            source_store
                .copy_object(
                    &source.bucket,
                    &info.key,
                    &destination.bucket,
                    &dest_key,
                )
                .await
        } else {
            copy_one(source_store, dest_store, source, destination, &info.key, &dest_key).await
        };
        match result {
            Ok(()) => {
                ctx.formatter.created(&dest_key);
                outcome.record_success(dest_key);
            }
            Err(e) => {
                ctx.formatter.error(&format!("{}: {e}", info.key));
                outcome.record_failure(info.key.clone(), e.to_string());
            }
        }
        progress.inc();
    }
    progress.finish_and_clear();

    finish_batch(outcome, "copy", "Copied", ctx.formatter)
}

async fn copy_one(
    source_store: &dyn ObjectStore,
    dest_store: &dyn ObjectStore,
    source: &ObjectLocator,
    destination: &ObjectLocator,
    key: &str,
    dest_key: &str,
) -> Result<()> {
    let data = source_store.get_object(&source.bucket, key).await?;
    let content_type: Option<String> = mime_guess::from_path(key)
        .first()
        .map(|m| m.essence_str().to_string());
    dest_store
        .put_object(&destination.bucket, dest_key, data, content_type.as_deref())
        .await?;
    Ok(())
}

/// Delete every resolved key under the source prefix. Zero matches is not an
/// error; the summary reports zero deletions.
pub async fn delete(
    store: &dyn ObjectStore,
    source: &ObjectLocator,
    ctx: &TransferContext<'_>,
) -> Result<Vec<String>> {
    let resolved = resolve_remote(store, source, ctx.autocomplete).await?;
    ctx.formatter
        .status("Deleting objects in S3 object storage ...\n");
    let progress = ProgressBar::new(ctx.formatter.config(), resolved.len() as u64);

    let mut outcome = BatchOutcome::new();
    for info in &resolved {
        match store.delete_object(&source.bucket, &info.key).await {
            Ok(()) => {
                ctx.formatter.created(&info.key);
                outcome.record_success(info.key.clone());
            }
            Err(e) => {
                ctx.formatter.error(&format!("{}: {e}", info.key));
                outcome.record_failure(info.key.clone(), e.to_string());
            }
        }
        progress.inc();
    }
    progress.finish_and_clear();

    finish_batch(outcome, "delete", "Deleted", ctx.formatter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputConfig;
    use async_trait::async_trait;
    use std::collections::{BTreeMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use syncer_core::{ListOptions, ListResult, ObjectInfo};
    use tempfile::TempDir;

    /// In-memory object store with per-key fault injection and call counters
    #[derive(Default)]
    struct MemoryStore {
        objects: Mutex<BTreeMap<String, Vec<u8>>>,
        fail_keys: HashSet<String>,
        gets: AtomicUsize,
        writes: AtomicUsize,
        deletes: AtomicUsize,
    }

    impl MemoryStore {
        fn with_objects(keys: &[(&str, &[u8])]) -> Self {
            let store = Self::default();
            {
                let mut objects = store.objects.lock().unwrap();
                for (key, data) in keys {
                    objects.insert(key.to_string(), data.to_vec());
                }
            }
            store
        }

        fn failing_on(mut self, key: &str) -> Self {
            self.fail_keys.insert(key.to_string());
            self
        }

        fn keys(&self) -> Vec<String> {
            self.objects.lock().unwrap().keys().cloned().collect()
        }

        fn data(&self, key: &str) -> Option<Vec<u8>> {
            self.objects.lock().unwrap().get(key).cloned()
        }

        fn check_fault(&self, key: &str) -> Result<()> {
            if self.fail_keys.contains(key) {
                Err(Error::Transport(format!("injected failure for {key}")))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl ObjectStore for MemoryStore {
        async fn list_objects(
            &self,
            _bucket: &str,
            prefix: &str,
            options: ListOptions,
        ) -> Result<ListResult> {
            let objects = self.objects.lock().unwrap();
            let page_size = options.max_keys.unwrap_or(1000) as usize;

            let matching = objects
                .iter()
                .filter(|(key, _)| key.starts_with(prefix))
                .skip_while(|(key, _)| match &options.continuation_token {
                    Some(token) => key.as_str() <= token.as_str(),
                    None => false,
                });

            let items: Vec<ObjectInfo> = matching
                .take(page_size)
                .map(|(key, data)| ObjectInfo::file(key.clone(), data.len() as i64))
                .collect();

            let truncated = items.len() == page_size;
            let continuation_token = items.last().map(|info| info.key.clone());

            Ok(ListResult {
                items,
                truncated,
                continuation_token,
            })
        }

        async fn get_object(&self, _bucket: &str, key: &str) -> Result<Vec<u8>> {
            self.check_fault(key)?;
            self.gets.fetch_add(1, Ordering::SeqCst);
            self.data(key)
                .ok_or_else(|| Error::NotFound(key.to_string()))
        }

        async fn put_object(
            &self,
            _bucket: &str,
            key: &str,
            data: Vec<u8>,
            _content_type: Option<&str>,
        ) -> Result<ObjectInfo> {
            self.check_fault(key)?;
            self.writes.fetch_add(1, Ordering::SeqCst);
            let size = data.len() as i64;
            self.objects.lock().unwrap().insert(key.to_string(), data);
            Ok(ObjectInfo::file(key, size))
        }

        async fn delete_object(&self, _bucket: &str, key: &str) -> Result<()> {
            self.check_fault(key)?;
            self.deletes.fetch_add(1, Ordering::SeqCst);
            self.objects.lock().unwrap().remove(key);
            Ok(())
        }

        async fn copy_object(
            &self,
            _src_bucket: &str,
            src_key: &str,
            _dst_bucket: &str,
            dst_key: &str,
        ) -> Result<()> {
            self.check_fault(src_key)?;
            let data = self
                .data(src_key)
                .ok_or_else(|| Error::NotFound(src_key.to_string()))?;
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.objects.lock().unwrap().insert(dst_key.to_string(), data);
            Ok(())
        }
    }

    fn quiet_formatter() -> Formatter {
        Formatter::new(OutputConfig {
            suppress: true,
            to_stdout: false,
        })
    }

    fn locator(prefix: &str) -> ObjectLocator {
        ObjectLocator::new("bucket", None, "host", 9000, prefix)
    }

    fn tree(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for file in files {
            let path = dir.path().join(file);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, file.as_bytes()).unwrap();
        }
        dir
    }

    #[test]
    fn test_join_key() {
        assert_eq!(join_key("", "a/b"), "a/b");
        assert_eq!(join_key("site", "a/b"), "site/a/b");
        assert_eq!(join_key("site/", "a/b"), "site/a/b");
    }

    #[tokio::test]
    async fn test_upload_glob_derives_destination_keys() {
        let dir = tree(&["docs/a.html", "docs/sub/b.html", "docs/sub/c.txt"]);
        let store = MemoryStore::default();
        let formatter = quiet_formatter();
        let ctx = TransferContext {
            formatter: &formatter,
            autocomplete: true,
        };

        let pattern = dir.path().join("docs/**/*.html");
        let created = upload(&store, &pattern, &locator("site"), &ctx)
            .await
            .unwrap();

        assert_eq!(created, vec!["site/a.html", "site/sub/b.html"]);
        assert_eq!(store.keys(), vec!["site/a.html", "site/sub/b.html"]);
    }

    #[tokio::test]
    async fn test_upload_single_file_uses_filename() {
        let dir = tree(&["docs/readme.md"]);
        let store = MemoryStore::default();
        let formatter = quiet_formatter();
        let ctx = TransferContext {
            formatter: &formatter,
            autocomplete: true,
        };

        let created = upload(&store, &dir.path().join("docs/readme.md"), &locator(""), &ctx)
            .await
            .unwrap();

        assert_eq!(created, vec!["readme.md"]);
    }

    #[tokio::test]
    async fn test_upload_continues_past_failures_and_aggregates() {
        let dir = tree(&["d/one.txt", "d/two.txt", "d/three.txt", "d/four.txt"]);
        let store = MemoryStore::default().failing_on("two.txt");
        let formatter = quiet_formatter();
        let ctx = TransferContext {
            formatter: &formatter,
            autocomplete: true,
        };

        let result = upload(&store, &dir.path().join("d"), &locator(""), &ctx).await;

        match result {
            Err(Error::Batch { failed }) => {
                assert_eq!(failed.len(), 1);
                assert!(failed[0].ends_with("two.txt"));
            }
            other => panic!("expected batch error, got {other:?}"),
        }
        // The remaining three objects were still attempted and stored.
        assert_eq!(store.keys(), vec!["four.txt", "one.txt", "three.txt"]);
    }

    #[tokio::test]
    async fn test_download_autocomplete_excludes_sibling_segment() {
        let store = MemoryStore::with_objects(&[
            ("project5-docs/x", b"docs"),
            ("project5/README.md", b"readme"),
            ("project5/html_docs/y", b"html"),
        ]);
        let dest = TempDir::new().unwrap();
        let formatter = quiet_formatter();
        let ctx = TransferContext {
            formatter: &formatter,
            autocomplete: true,
        };

        let created = download(&store, &locator("project5"), dest.path(), &ctx)
            .await
            .unwrap();

        assert_eq!(created.len(), 2);
        assert_eq!(
            std::fs::read(dest.path().join("README.md")).unwrap(),
            b"readme"
        );
        assert_eq!(
            std::fs::read(dest.path().join("html_docs/y")).unwrap(),
            b"html"
        );
        assert!(!dest.path().join("x").exists());
    }

    #[tokio::test]
    async fn test_download_exact_key_renames() {
        let store = MemoryStore::with_objects(&[("project5/README.md", b"readme")]);
        let dest = TempDir::new().unwrap();
        let formatter = quiet_formatter();
        let ctx = TransferContext {
            formatter: &formatter,
            autocomplete: true,
        };

        let target = dest.path().join("renamed.md");
        download(&store, &locator("project5/README.md"), &target, &ctx)
            .await
            .unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), b"readme");
    }

    #[tokio::test]
    async fn test_download_no_matches_is_not_found() {
        let store = MemoryStore::with_objects(&[("project5/README.md", b"readme")]);
        let dest = TempDir::new().unwrap();
        let formatter = quiet_formatter();
        let ctx = TransferContext {
            formatter: &formatter,
            autocomplete: false,
        };

        // A partial prefix resolves to nothing with autocompletion disabled.
        let result = download(&store, &locator("proje"), dest.path(), &ctx).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_copy_between_stores_streams_bytes() {
        let source = MemoryStore::with_objects(&[
            ("project5/README.md", b"readme"),
            ("project5/html_docs/y", b"html"),
        ]);
        let dest = MemoryStore::default();
        let formatter = quiet_formatter();
        let ctx = TransferContext {
            formatter: &formatter,
            autocomplete: true,
        };

        let created = copy(
            &source,
            &dest,
            &locator("project5"),
            &locator("backup"),
            false,
            &ctx,
        )
        .await
        .unwrap();

        assert_eq!(created, vec!["backup/README.md", "backup/html_docs/y"]);
        assert_eq!(dest.data("backup/README.md").unwrap(), b"readme");
        assert_eq!(dest.data("backup/html_docs/y").unwrap(), b"html");
    }

    #[tokio::test]
    async fn test_copy_same_endpoint_is_server_side() {
        let store = MemoryStore::with_objects(&[("a/one", b"1")]);
        let formatter = quiet_formatter();
        let ctx = TransferContext {
            formatter: &formatter,
            autocomplete: true,
        };

        copy(&store, &store, &locator("a"), &locator("b"), true, &ctx)
            .await
            .unwrap();

        assert_eq!(store.data("b/one").unwrap(), b"1");
        // CopyObject moves bytes inside the store; nothing is fetched.
        assert_eq!(store.gets.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_delete_resolved_keys_only() {
        let store = MemoryStore::with_objects(&[
            ("project5-docs/x", b"docs"),
            ("project5/README.md", b"readme"),
            ("project5/html_docs/y", b"html"),
        ]);
        let formatter = quiet_formatter();
        let ctx = TransferContext {
            formatter: &formatter,
            autocomplete: true,
        };

        let deleted = delete(&store, &locator("project5"), &ctx).await.unwrap();

        assert_eq!(deleted, vec!["project5/README.md", "project5/html_docs/y"]);
        assert_eq!(store.keys(), vec!["project5-docs/x"]);
    }

    #[tokio::test]
    async fn test_delete_zero_matches_is_success() {
        let store = MemoryStore::with_objects(&[("project5/README.md", b"readme")]);
        let formatter = quiet_formatter();
        let ctx = TransferContext {
            formatter: &formatter,
            autocomplete: true,
        };

        let deleted = delete(&store, &locator("absent"), &ctx).await.unwrap();
        assert!(deleted.is_empty());
        assert_eq!(store.keys(), vec!["project5/README.md"]);
    }

    #[tokio::test]
    async fn test_list_remote_never_mutates() {
        let store = MemoryStore::with_objects(&[
            ("project5/README.md", b"readme"),
            ("project5/html_docs/y", b"html"),
        ]);
        let formatter = quiet_formatter();
        let ctx = TransferContext {
            formatter: &formatter,
            autocomplete: true,
        };

        let keys = list_remote(&store, &locator("project5"), &ctx).await.unwrap();

        assert_eq!(keys, vec!["project5/README.md", "project5/html_docs/y"]);
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
        assert_eq!(store.deletes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_list_remote_paginates() {
        let pairs: Vec<(String, Vec<u8>)> = (0..25)
            .map(|i| (format!("logs/entry-{i:03}"), vec![b'x']))
            .collect();
        let store = MemoryStore::default();
        {
            let mut objects = store.objects.lock().unwrap();
            for (key, data) in &pairs {
                objects.insert(key.clone(), data.clone());
            }
        }
        let formatter = quiet_formatter();
        let ctx = TransferContext {
            formatter: &formatter,
            autocomplete: true,
        };

        // Page size in list_all_keys is 1000; shrink the store's pages by
        // listing through the trait directly to check the token plumbing.
        let first = store
            .list_objects("bucket", "logs/", ListOptions {
                max_keys: Some(10),
                continuation_token: None,
            })
            .await
            .unwrap();
        assert!(first.truncated);
        assert_eq!(first.items.len(), 10);

        let keys = list_remote(&store, &locator("logs/"), &ctx).await.unwrap();
        assert_eq!(keys.len(), 25);
    }

    #[test]
    fn test_list_local_reports_matches() {
        let dir = tree(&["docs/a.html", "docs/sub/b.html"]);
        let formatter = quiet_formatter();

        let ids = list_local(&dir.path().join("docs"), &formatter).unwrap();
        assert_eq!(ids.len(), 2);
    }
}
