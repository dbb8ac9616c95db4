/// Configuration for the SQLite database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path of the database file. Created if it does not exist.
    pub path: String,
}

impl DatabaseConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::new("cars.db")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_records_path() {
        let config = DatabaseConfig::new("out/cars.db");
        assert_eq!(config.path, "out/cars.db");
    }

    #[test]
    fn test_default_path() {
        assert_eq!(DatabaseConfig::default().path, "cars.db");
    }
}
