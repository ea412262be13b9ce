use std::{
    fs,
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
};

use anyhow::Context;

use crate::{
    error::{EnframeError, EnframeResult},
    frames::sanitize_id,
};

/// Content-addressed identifier of an encoded result.
///
/// Two independently seeded 64-bit FNV-1a hashes over the result bytes,
/// printed as 32 hex characters. Identical results always share an id, so a
/// store never holds two copies of the same output and concurrent identical
/// requests cannot clobber each other with different content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ResultId {
    pub hi: u64,
    pub lo: u64,
}

impl std::fmt::Display for ResultId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

pub fn fingerprint_bytes(bytes: &[u8]) -> ResultId {
    let mut a = Fnv1a64::new(0xcbf29ce484222325);
    let mut b = Fnv1a64::new(0x9ae16a3b2f90404f);
    a.write_bytes(bytes);
    b.write_bytes(bytes);
    ResultId {
        hi: a.finish(),
        lo: b.finish(),
    }
}

/// Directory of encoded composite results, keyed by content fingerprint.
///
/// Replaces a shared "latest result" slot: every caller gets back the id of
/// the exact bytes it produced, and reading someone else's result requires
/// knowing that id.
#[derive(Debug)]
pub struct ResultStore {
    root: PathBuf,
}

impl ResultStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl AsRef<Path>) -> EnframeResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)
            .with_context(|| format!("create results dir '{}'", root.display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist encoded result bytes and return their id. Idempotent for
    /// identical bytes.
    pub fn put(&self, bytes: &[u8]) -> EnframeResult<ResultId> {
        static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

        let id = fingerprint_bytes(bytes);
        let path = self.root.join(format!("{id}.jpg"));
        if path.is_file() {
            return Ok(id);
        }

        // Stage under a writer-unique name and rename into place, so a
        // reader racing the first put of an id never observes a partial
        // file. Racing puts of the same id rename identical bytes.
        let tmp = self.root.join(format!(
            "{id}.{}.{}.tmp",
            std::process::id(),
            TMP_SEQ.fetch_add(1, Ordering::Relaxed)
        ));
        fs::write(&tmp, bytes)
            .with_context(|| format!("write result '{}'", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("publish result '{}'", path.display()))?;
        Ok(id)
    }

    /// Resolve an id to its on-disk path, for transports that serve files
    /// directly.
    pub fn path_for(&self, id: &str) -> EnframeResult<PathBuf> {
        let safe = sanitize_id(id, "result")?;
        let path = self.root.join(format!("{safe}.jpg"));
        if !path.is_file() {
            return Err(EnframeError::not_found("result image not found"));
        }
        Ok(path)
    }

    /// Read the encoded result bytes for an id.
    pub fn get(&self, id: &str) -> EnframeResult<Vec<u8>> {
        let path = self.path_for(id)?;
        let bytes =
            fs::read(&path).with_context(|| format!("read result '{}'", path.display()))?;
        Ok(bytes)
    }
}

#[derive(Clone, Copy)]
struct Fnv1a64(u64);

impl Fnv1a64 {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        self.0 = h;
    }

    fn finish(self) -> u64 {
        self.0
    }
}
