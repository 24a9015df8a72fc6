// [libs/infra/rpc/src/cache.rs]
/*!
 * =================================================================
 * APARATO: SESSION READ CACHE (V4.3)
 * CLASIFICACIÓN: INFRASTRUCTURE CORE (ESTRATO L3)
 * RESPONSABILIDAD: MEMOIZACIÓN DE LECTURAS REMOTAS POR CLAVE
 *
 * # Logic:
 * Una lectura remota se memoiza por clave dentro de la corrida y solo se
 * invalida cuando una escritura propia altera el recurso descrito. Apta
 * para lecturas concurrentes desde los workers de media.
 * =================================================================
 */

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;

/// Caché de lecturas de sesión, segura para lectores concurrentes.
#[derive(Debug, Default)]
pub struct ReadCache<K, V> {
    entries: RwLock<HashMap<K, V>>,
}

impl<K: Eq + Hash + Clone, V: Clone> ReadCache<K, V> {
    pub fn new() -> Self {
        Self { entries: RwLock::new(HashMap::new()) }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.read().expect("read cache envenenada").get(key).cloned()
    }

    pub fn put(&self, key: K, value: V) {
        self.entries.write().expect("read cache envenenada").insert(key, value);
    }

    /// Invalida una clave puntual tras una escritura al recurso descrito.
    pub fn invalidate_key(&self, key: &K) {
        self.entries.write().expect("read cache envenenada").remove(key);
    }

    pub fn clear(&self) {
        self.entries.write().expect("read cache envenenada").clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certify_cache_roundtrip_and_invalidation() {
        let cache: ReadCache<(String, String), Vec<String>> = ReadCache::new();
        let key = ("sheet-1".to_string(), "media".to_string());

        assert!(cache.get(&key).is_none());
        cache.put(key.clone(), vec!["row".into()]);
        assert_eq!(cache.get(&key).unwrap(), vec!["row".to_string()]);

        cache.invalidate_key(&key);
        assert!(cache.get(&key).is_none());
    }
}
