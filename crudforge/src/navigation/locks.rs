//! Per-path mutex registry for navigation files

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Serializes patches to the same file across concurrent requests
#[derive(Debug, Default)]
pub struct PatchLocks {
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl PatchLocks {
    /// The mutex guarding `path`; the same file always yields the same mutex
    pub fn lock_for(&self, path: &Path) -> Arc<Mutex<()>> {
        let key = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(locks.entry(key).or_default())
    }

    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .map(|locks| locks.len())
            .unwrap_or_else(|poisoned| poisoned.into_inner().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_path_same_lock() {
        let locks = PatchLocks::default();
        let a = locks.lock_for(Path::new("app/app.routes.ts"));
        let b = locks.lock_for(Path::new("app/app.routes.ts"));
        let c = locks.lock_for(Path::new("app/components/sidebar/sidebar.ts"));

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(locks.len(), 2);
    }

    #[test]
    fn test_concurrent_patches_serialize() {
        let locks = Arc::new(PatchLocks::default());
        let counter = Arc::new(Mutex::new(Vec::new()));

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let locks = Arc::clone(&locks);
                let counter = Arc::clone(&counter);
                std::thread::spawn(move || {
                    let lock = locks.lock_for(Path::new("shared.ts"));
                    let _guard = lock.lock().unwrap();
                    counter.lock().unwrap().push(i);
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(counter.lock().unwrap().len(), 4);
        assert_eq!(locks.len(), 1);
    }
}
