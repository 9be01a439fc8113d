//! Connection registry
//!
//! Maps connection names to database handles. The registry is built
//! explicitly from a [`RegistryConfig`] and owned by the caller; there is no
//! process-wide instance.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::{ConnectionConfig, RegistryConfig};
use crate::store::Database;

/// A registered connection
#[derive(Debug, Clone)]
pub struct Connection {
    config: ConnectionConfig,
    database: Arc<Database>,
}

impl Connection {
    /// Connection settings
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Connection string
    pub fn uri(&self) -> String {
        self.config.connection_uri()
    }

    /// Database handle
    pub fn database(&self) -> Arc<Database> {
        Arc::clone(&self.database)
    }
}

/// Connection name → handle
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: HashMap<String, Connection>,
    auto_index: bool,
}

impl ConnectionRegistry {
    /// Empty registry
    pub fn new(auto_index: bool) -> Self {
        Self {
            connections: HashMap::new(),
            auto_index,
        }
    }

    /// Builds a registry from configuration.
    ///
    /// Invalid entries are skipped with a warning; they never abort the
    /// remaining entries. A repeated name replaces the earlier entry.
    pub fn init(config: RegistryConfig) -> Self {
        let mut registry = Self::new(config.auto_index);
        for connection in config.connections {
            registry.register(connection);
        }
        registry
    }

    /// Adds one connection. Returns false if the entry was skipped.
    pub fn register(&mut self, config: ConnectionConfig) -> bool {
        if let Err(e) = config.validate() {
            warn!(connection = %config.name, error = %e, "skipping connection");
            return false;
        }

        debug!(
            connection = %config.name,
            database = %config.database,
            authenticated = config.credentials().is_some(),
            "connection registered"
        );

        let database = Arc::new(Database::new(config.database.clone(), self.auto_index));
        self.connections
            .insert(config.name.clone(), Connection { config, database });
        true
    }

    /// Database for a connection name
    pub fn get(&self, name: &str) -> Option<Arc<Database>> {
        self.connections.get(name).map(Connection::database)
    }

    /// Full connection entry
    pub fn connection(&self, name: &str) -> Option<&Connection> {
        self.connections.get(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.connections.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered connections
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    /// True when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_skips_invalid_entries() {
        let config = RegistryConfig::default()
            .with_connection(ConnectionConfig::new("main", "localhost:27017", "app"))
            .with_connection(ConnectionConfig::new("", "localhost:27017", "x"))
            .with_connection(ConnectionConfig::new("logs", "h2", "logs"));

        let registry = ConnectionRegistry::init(config);
        assert_eq!(registry.names(), vec!["logs".to_string(), "main".to_string()]);
        assert_eq!(registry.get("main").unwrap().name(), "app");
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_repeated_name_replaces() {
        let config = RegistryConfig::default()
            .with_connection(ConnectionConfig::new("main", "h", "first"))
            .with_connection(ConnectionConfig::new("main", "h", "second"));

        let registry = ConnectionRegistry::init(config);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("main").unwrap().name(), "second");
    }

    #[test]
    fn test_auto_index_propagates() {
        let mut config = RegistryConfig::default()
            .with_connection(ConnectionConfig::new("main", "h", "app"));
        config.auto_index = true;

        let registry = ConnectionRegistry::init(config);
        assert!(registry.get("main").unwrap().auto_index());
    }

    #[test]
    fn test_connection_uri() {
        let registry = ConnectionRegistry::init(RegistryConfig::default().with_connection(
            ConnectionConfig::new("main", "h:1", "app").with_credentials("u", "p"),
        ));
        assert_eq!(registry.connection("main").unwrap().uri(), "mongodb://u:p@h:1/app");
    }

    #[test]
    fn test_registries_are_independent() {
        let a = ConnectionRegistry::init(
            RegistryConfig::default().with_connection(ConnectionConfig::new("main", "h", "a")),
        );
        let b = ConnectionRegistry::new(false);
        assert_eq!(a.len(), 1);
        assert!(b.is_empty());
    }
}
