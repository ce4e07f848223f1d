use crate::config::Config;
use crate::error::{RepoFusionError, Result, ValidationError};

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration
    pub fn validate(config: &Config) -> Result<()> {
        let mut errors = Vec::new();

        Self::validate_search(config, &mut errors);
        Self::validate_llm(config, &mut errors);
        Self::validate_embedding(config, &mut errors);
        Self::validate_vector(config, &mut errors);
        Self::validate_lexical(config, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(RepoFusionError::ConfigValidation { errors })
        }
    }

    fn validate_search(config: &Config, errors: &mut Vec<ValidationError>) {
        let search = &config.search;

        if search.default_limit == 0 {
            errors.push(ValidationError::new(
                "search.default_limit",
                "Default limit must be greater than 0",
            ));
        }

        if search.vector_multiplier == 0 || search.lexical_multiplier == 0 {
            errors.push(ValidationError::new(
                "search.multipliers",
                "Channel fetch multipliers must be greater than 0",
            ));
        }

        for (path, value) in [
            ("search.semantic_weight", search.semantic_weight),
            ("search.lexical_weight", search.lexical_weight),
            ("search.relevance_weight", search.relevance_weight),
        ] {
            if value <= 0.0 || value > 1.0 {
                errors.push(ValidationError::new(
                    path,
                    format!("Weight must be in (0, 1], got {}", value),
                ));
            }
        }

        if search.trend_weight < 0.0 || search.trend_weight > 1.0 {
            errors.push(ValidationError::new(
                "search.trend_weight",
                format!("Weight must be in [0, 1], got {}", search.trend_weight),
            ));
        }

        if search.timeout_secs == 0 {
            errors.push(ValidationError::new(
                "search.timeout_secs",
                "Timeout must be greater than 0",
            ));
        }
    }

    fn validate_llm(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.llm.model.is_empty() {
            errors.push(ValidationError::new("llm.model", "Model cannot be empty"));
        }
        if config.llm.api_key_env.is_empty() {
            errors.push(ValidationError::new(
                "llm.api_key_env",
                "API key environment variable name cannot be empty",
            ));
        }
    }

    fn validate_embedding(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.embedding.endpoint.is_empty() {
            errors.push(ValidationError::new(
                "embedding.endpoint",
                "Endpoint cannot be empty",
            ));
        }
        if config.embedding.dimension == 0 {
            errors.push(ValidationError::new(
                "embedding.dimension",
                "Dimension must be greater than 0",
            ));
        }
    }

    fn validate_vector(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.vector.url.is_empty() {
            errors.push(ValidationError::new("vector.url", "URL cannot be empty"));
        }
        if config.vector.collection.is_empty() {
            errors.push(ValidationError::new(
                "vector.collection",
                "Collection cannot be empty",
            ));
        }
    }

    fn validate_lexical(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.lexical.url.is_empty() {
            errors.push(ValidationError::new("lexical.url", "URL cannot be empty"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_limit_rejected() {
        let mut config = Config::default();
        config.search.default_limit = 0;
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_out_of_range_weight_rejected() {
        let mut config = Config::default();
        config.search.semantic_weight = 1.5;
        let err = ConfigValidator::validate(&config).unwrap_err();
        match err {
            RepoFusionError::ConfigValidation { errors } => {
                assert!(errors.iter().any(|e| e.path == "search.semantic_weight"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_zero_trend_weight_allowed() {
        let mut config = Config::default();
        config.search.trend_weight = 0.0;
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_empty_collection_rejected() {
        let mut config = Config::default();
        config.vector.collection = String::new();
        assert!(ConfigValidator::validate(&config).is_err());
    }
}
