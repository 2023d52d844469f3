use crate::ui::Language;
use crate::Args;
use std::path::PathBuf;

const ENCODERS_FILE: &str = "encoders.json";
const SCALER_FILE: &str = "scaler.json";
const MODEL_FILE: &str = "model.json";

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub encoders_path: PathBuf,
    pub scaler_path: PathBuf,
    pub model_path: PathBuf,
    pub language: Language,
    pub max_body_size: usize,
}

impl TryFrom<Args> for Config {
    type Error = anyhow::Error;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let dir = PathBuf::from(&args.artifacts_dir);
        let resolve = |explicit: Option<String>, file: &str| {
            explicit.map(PathBuf::from).unwrap_or_else(|| dir.join(file))
        };

        let language = args
            .language
            .parse::<Language>()
            .map_err(anyhow::Error::msg)?;

        Ok(Self {
            host: args.host,
            port: args.port,
            encoders_path: resolve(args.encoders, ENCODERS_FILE),
            scaler_path: resolve(args.scaler, SCALER_FILE),
            model_path: resolve(args.model, MODEL_FILE),
            language,
            max_body_size: args.max_body_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_paths_default_to_artifacts_dir() {
        let args = Args::parse_from(["cardio-predict-server", "--artifacts-dir", "/srv/model"]);
        let config = Config::try_from(args).unwrap();

        assert_eq!(config.encoders_path, PathBuf::from("/srv/model/encoders.json"));
        assert_eq!(config.scaler_path, PathBuf::from("/srv/model/scaler.json"));
        assert_eq!(config.model_path, PathBuf::from("/srv/model/model.json"));
        assert_eq!(config.language, Language::En);
    }

    #[test]
    fn test_explicit_path_overrides_dir() {
        let args = Args::parse_from([
            "cardio-predict-server",
            "--artifacts-dir",
            "/srv/model",
            "--model",
            "/tmp/forest.json",
        ]);
        let config = Config::try_from(args).unwrap();

        assert_eq!(config.model_path, PathBuf::from("/tmp/forest.json"));
        assert_eq!(config.scaler_path, PathBuf::from("/srv/model/scaler.json"));
    }

    #[test]
    fn test_unknown_language_is_rejected() {
        let args = Args::parse_from(["cardio-predict-server", "--language", "de"]);
        let err = Config::try_from(args).unwrap_err();
        assert!(err.to_string().contains("Unsupported language 'de'"));
    }
}
