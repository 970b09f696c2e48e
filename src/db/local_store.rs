// src/db/local_store.rs

use std::{
    collections::BTreeMap,
    io,
    path::PathBuf,
    sync::{Mutex, MutexGuard},
};

/// Armazenamento chave-valor local e persistente (o "localStorage" do balcão).
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> io::Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> io::Result<()>;
    fn remove(&self, key: &str) -> io::Result<()>;
}

/// Guarda as chaves num único arquivo JSON.
pub struct JsonFileStore {
    path: PathBuf,
    // Serializa leitura-modificação-escrita do arquivo.
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn load(&self) -> io::Result<BTreeMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => serde_json::from_str(&content)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e),
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        std::fs::write(&self.path, content)
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        let _guard = self.guard();
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        let _guard = self.guard();
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        let _guard = self.guard();
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}

/// Versão volátil: testes e execução sem IDENTITY_FILE.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    fn entries(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        self.entries().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_survives_reopening() {
        let path = std::env::temp_dir().join(format!("portaria-{}.json", uuid::Uuid::new_v4()));
        {
            let store = JsonFileStore::new(&path);
            assert_eq!(store.get("portaria_user").unwrap(), None);
            store.set("portaria_user", r#"{"name":"Carlos"}"#).unwrap();
        }

        let reopened = JsonFileStore::new(&path);
        assert_eq!(
            reopened.get("portaria_user").unwrap().as_deref(),
            Some(r#"{"name":"Carlos"}"#)
        );
        reopened.remove("portaria_user").unwrap();
        assert_eq!(reopened.get("portaria_user").unwrap(), None);

        let _ = std::fs::remove_file(path);
    }
}
