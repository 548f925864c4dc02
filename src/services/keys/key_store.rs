
use crate::contracts::jwks::JwkSet;
use crate::services::keys::key_error::KeyError;
use crate::services::keys::rsa_key::VerificationKey;
use log::{debug, info};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

pub type KeyMap = HashMap<String, Arc<VerificationKey>>;

/// Trusted public keys by key id.
///
/// The map is never mutated in place: every update parses a complete replacement first and then
/// swaps the shared pointer, so readers see either the old or the new set. The lock only guards
/// the pointer; parsing, file I/O and signature checks all happen outside of it.
pub struct KeyStore {
    keys: RwLock<Arc<KeyMap>>,
}

impl KeyStore {
    pub fn new(pem_keys: &HashMap<String, Vec<u8>>) -> Result<Self, KeyError> {
        let keys = parse_keys(pem_keys)?;
        Ok(KeyStore {
            keys: RwLock::new(Arc::new(keys)),
        })
    }

    pub fn empty() -> Self {
        KeyStore {
            keys: RwLock::new(Arc::new(KeyMap::new())),
        }
    }

    /// Replaces the whole key set. If any entry fails to parse the current set is kept.
    pub fn set_keys(&self, pem_keys: &HashMap<String, Vec<u8>>) -> Result<(), KeyError> {
        let keys = Arc::new(parse_keys(pem_keys)?);
        let key_count = keys.len();
        *self.keys.write() = keys;
        info!(key_count = key_count; "Public key set replaced");
        Ok(())
    }

    pub fn reload_from_directory(&self, directory: &Path) -> Result<(), KeyError> {
        let pem_keys = read_key_files(directory)?;
        self.set_keys(&pem_keys)
    }

    pub fn get(&self, key_id: &str) -> Option<Arc<VerificationKey>> {
        self.keys.read().get(key_id).cloned()
    }

    pub fn snapshot(&self) -> Arc<KeyMap> {
        self.keys.read().clone()
    }

    pub fn key_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.snapshot().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn jwks(&self) -> JwkSet {
        let snapshot = self.snapshot();
        let mut keys: Vec<_> = snapshot.values().map(|key| key.jwk().clone()).collect();
        keys.sort_by(|left, right| left.kid.cmp(&right.kid));
        JwkSet { keys }
    }
}

fn parse_keys(pem_keys: &HashMap<String, Vec<u8>>) -> Result<KeyMap, KeyError> {
    pem_keys
        .iter()
        .map(|(key_id, pem)| Ok((key_id.clone(), Arc::new(VerificationKey::from_pem(key_id, pem)?))))
        .collect()
}

/// Reads every non-directory entry whose name starts with an ASCII letter or digit, keyed by file name.
/// Dotfiles and temporaries written next to the keys are skipped.
pub fn read_key_files(directory: &Path) -> Result<HashMap<String, Vec<u8>>, KeyError> {
    let entries = fs::read_dir(directory).map_err(|e| KeyError::io(directory, e))?;

    let mut pem_keys = HashMap::new();
    for entry in entries {
        let entry = entry.map_err(|e| KeyError::io(directory, e))?;
        let file_type = entry.file_type().map_err(|e| KeyError::io(&entry.path(), e))?;
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        if file_type.is_dir() || !starts_with_alphanumeric(&name) {
            debug!(file = name.as_str(); "Skipping entry in key directory");
            continue;
        }
        let path = entry.path();
        let pem = fs::read(&path).map_err(|e| KeyError::io(&path, e))?;
        pem_keys.insert(name, pem);
    }
    Ok(pem_keys)
}

fn starts_with_alphanumeric(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_alphanumeric())
}
