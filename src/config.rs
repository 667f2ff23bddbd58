//! Per-backend connection parameters
//!
//! Every public operation receives its connection parameters fresh and owns
//! exactly one backend session for its lifetime. Nothing here is pooled or
//! cached across operations.

/// Connection parameters for the relational (MySQL) backend
#[derive(Debug, Clone)]
pub struct RelationalConfig {
    /// Host name of the MySQL server
    pub host: String,
    /// Port (default: 3306)
    pub port: u16,
    /// Username, may be empty for anonymous local servers
    pub username: String,
    /// Password, may be empty
    pub password: String,
    /// Database to create (if absent) and use for all statements
    pub database: String,
}

impl RelationalConfig {
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: 3306,
            username: username.into(),
            password: password.into(),
            database: database.into(),
        }
    }

    /// Override the server port (default: 3306)
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

/// Connection parameters for the wide-column (Cassandra/CQL) backend
#[derive(Debug, Clone)]
pub struct WideColumnConfig {
    /// Contact point, `host:port`
    pub node: String,
    /// Client id used for plain-text authentication
    pub username: String,
    /// Client secret used for plain-text authentication
    pub password: String,
    /// Keyspace all statements run against
    pub keyspace: String,
}

impl WideColumnConfig {
    pub fn new(
        node: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        keyspace: impl Into<String>,
    ) -> Self {
        Self {
            node: node.into(),
            username: username.into(),
            password: password.into(),
            keyspace: keyspace.into(),
        }
    }
}

/// Connection parameters for the document (MongoDB) backend
///
/// The URI may carry `<username>` / `<password>` placeholder tokens; they are
/// substituted from the credential fields before connecting. See
/// [`crate::backend::document::render_connection_uri`].
#[derive(Debug, Clone)]
pub struct DocumentConfig {
    /// Connection URI, possibly containing placeholder tokens
    pub uri: String,
    /// Username substituted into the URI if a placeholder is present
    pub username: String,
    /// Password substituted into the URI (percent-encoded) if a placeholder
    /// is present
    pub password: String,
    /// Database all operations run against
    pub database: String,
}

impl DocumentConfig {
    pub fn new(
        uri: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            username: username.into(),
            password: password.into(),
            database: database.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relational_config_defaults() {
        let config = RelationalConfig::new("localhost", "root", "secret", "inventory");
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 3306);
        assert_eq!(config.database, "inventory");
    }

    #[test]
    fn test_relational_config_custom_port() {
        let config = RelationalConfig::new("db.internal", "root", "", "test").port(3307);
        assert_eq!(config.port, 3307);
    }

    #[test]
    fn test_wide_column_config() {
        let config = WideColumnConfig::new("10.0.0.5:9042", "client", "secret", "ks1");
        assert_eq!(config.node, "10.0.0.5:9042");
        assert_eq!(config.keyspace, "ks1");
    }

    #[test]
    fn test_document_config() {
        let config = DocumentConfig::new(
            "mongodb+srv://<username>:<password>@cluster0.example.net",
            "app",
            "p@ss",
            "appdb",
        );
        assert!(config.uri.contains("<username>"));
        assert_eq!(config.database, "appdb");
    }
}
