pub mod config {
    use serde::Deserialize;

    #[derive(Deserialize, Debug, Clone)]
    pub struct Config {
        pub db_url: String,
        #[serde(default = "default_port")]
        pub port: u16,
        /// Origin allowed to call the API from a browser.
        #[serde(default = "default_cors_origin")]
        pub cors_origin: String,
    }

    impl Config {
        /// Loads configuration from environment variables.
        pub fn from_env() -> anyhow::Result<Self> {
            let settings = config::Config::builder()
                .add_source(config::Environment::default())
                .build()?;
            Self::from_settings(settings)
        }

        /// Deserializes configuration from already assembled settings.
        pub fn from_settings(settings: config::Config) -> anyhow::Result<Self> {
            let config: Config = settings.try_deserialize()?;
            Ok(config)
        }
    }

    fn default_port() -> u16 {
        3000
    }

    fn default_cors_origin() -> String {
        "http://localhost:5173".to_string()
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn can_load_config_with_defaults() {
            let settings = config::Config::builder()
                .set_override("db_url", "postgres://localhost/tasks")
                .unwrap()
                .build()
                .unwrap();

            let config = Config::from_settings(settings).unwrap();

            assert_eq!(config.db_url, "postgres://localhost/tasks");
            assert_eq!(config.port, 3000);
            assert_eq!(config.cors_origin, "http://localhost:5173");
        }

        #[test]
        fn can_parse_port_from_string_value() {
            let settings = config::Config::builder()
                .set_override("db_url", "postgres://localhost/tasks")
                .unwrap()
                .set_override("port", "8081")
                .unwrap()
                .set_override("cors_origin", "https://tasks.example.com")
                .unwrap()
                .build()
                .unwrap();

            let config = Config::from_settings(settings).unwrap();

            assert_eq!(config.port, 8081);
            assert_eq!(config.cors_origin, "https://tasks.example.com");
        }

        #[test]
        fn cannot_load_config_without_db_url() {
            let settings = config::Config::builder().build().unwrap();
            assert!(Config::from_settings(settings).is_err());
        }
    }
}
pub mod entities;
pub mod task;
pub mod web;
