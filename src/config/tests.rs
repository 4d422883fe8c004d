use super::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::index::{StopWords, VectorizerConfig};
    use crate::recommend::RecommendConfig;
    use crate::interactions::InteractionFormat;

    #[test]
    fn config_file_persistence() {
        let temp_dir = TempDir::new().expect("should create TempDir successfully");
        let config_path = temp_dir.path().join("config.toml");

        let original_config = Config {
            data: DataConfig {
                news_path: PathBuf::from("/srv/mind/news.tsv"),
                interactions_path: PathBuf::from("behaviors.tsv"),
                interactions_format: InteractionFormat::Behaviors,
            },
            vectorizer: VectorizerConfig {
                stop_words: StopWords::English,
                ..VectorizerConfig::default()
            },
            recommend: RecommendConfig {
                query_boost: 0.3,
                ..RecommendConfig::default()
            },
            base_dir: PathBuf::new(),
        };

        let toml_content = toml::to_string_pretty(&original_config)
            .expect("config should convert to toml string successfully");
        fs::write(&config_path, toml_content).expect("should write to config_path successfully");

        let content =
            fs::read_to_string(&config_path).expect("should read from config_path successfully");
        let loaded_config: Config = toml::from_str(&content).expect("should parse toml correctly");

        assert_eq!(original_config, loaded_config);
    }

    #[test]
    fn invalid_toml_handling() {
        let invalid_toml = r#"
            [recommend
            default_limit = "ten"
        "#;

        let result: Result<Config, toml::de::Error> = toml::from_str(invalid_toml);
        assert!(result.is_err());
    }

    #[test]
    fn wrong_value_type_is_rejected() {
        let invalid_toml = r#"
            [recommend]
            default_limit = "ten"
        "#;

        let result: Result<Config, toml::de::Error> = toml::from_str(invalid_toml);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_format_is_rejected() {
        let invalid_toml = r#"
            [data]
            interactions_format = "clicks"
        "#;

        let result: Result<Config, toml::de::Error> = toml::from_str(invalid_toml);
        assert!(result.is_err());
    }

    #[test]
    fn full_config_parsing() {
        let valid_toml = r#"
            [data]
            news_path = "mind/news.tsv"
            interactions_path = "mind/behaviors.tsv"
            interactions_format = "behaviors"

            [vectorizer]
            lowercase = false
            min_df = 2
            max_df = 0.8
            stop_words = "english"
            sublinear_tf = true

            [recommend]
            default_limit = 20
            query_boost = 0.5
            exclude_history = true
        "#;

        let config: Config = toml::from_str(valid_toml).expect("should parse toml successfully");
        assert_eq!(config.data.news_path, PathBuf::from("mind/news.tsv"));
        assert_eq!(config.data.interactions_format, InteractionFormat::Behaviors);
        assert!(!config.vectorizer.lowercase);
        assert_eq!(config.vectorizer.min_df, 2);
        assert!(config.vectorizer.sublinear_tf);
        assert_eq!(config.recommend.default_limit, 20);
        assert!(config.recommend.exclude_history);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_file_is_default() {
        let config: Config = toml::from_str("").expect("should parse empty toml");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn limit_boundary_validation() {
        let mut config = Config::default();

        assert!(config.set_default_limit(1).is_ok());
        assert!(config.set_default_limit(1000).is_ok());
        assert!(config.set_default_limit(0).is_err());
        assert!(config.set_default_limit(1001).is_err());
    }

    #[test]
    fn boost_boundary_validation() {
        let mut config = Config::default();

        assert!(config.set_query_boost(0.0).is_ok());
        assert!(config.set_query_boost(10.0).is_ok());
        assert!(config.set_query_boost(-0.01).is_err());
        assert!(config.set_query_boost(f32::NAN).is_err());
    }

    #[test]
    fn load_resolves_paths_against_config_dir() {
        let temp_dir = TempDir::new().expect("should create TempDir successfully");
        fs::write(
            temp_dir.path().join("config.toml"),
            "[data]\nnews_path = \"corpus.tsv\"\n",
        )
        .expect("should write config");

        let config = Config::load(temp_dir.path()).expect("config loads");
        assert_eq!(config.news_path(), temp_dir.path().join("corpus.tsv"));
        assert_eq!(
            config.interactions_path(),
            temp_dir.path().join("data/interactions.tsv")
        );
    }

    #[test]
    fn error_display_messages() {
        let errors = vec![
            ConfigError::DirectoryError,
            ConfigError::EmptyPath("news"),
            ConfigError::InvalidDefaultLimit(0),
            ConfigError::InvalidQueryBoost(-1.0),
            ConfigError::InvalidMinDf(0),
            ConfigError::InvalidMaxDf(1.5),
        ];

        for error in errors {
            let message = format!("{error}");
            assert!(!message.is_empty());
            assert!(message.len() > 10);
        }
    }
}
