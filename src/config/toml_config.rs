use crate::config::session::SessionInputs;
use crate::domain::model::{Locale, Store};
use crate::utils::error::{OrderTallyError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Session file, every key optional:
///
/// ```toml
/// [session]
/// store = "footpatrol"
/// locale = "uk"
/// postcode = "${POSTCODE}"
/// orders_file = "ordernumbers.txt"   # relative to this file
///
/// [lookup]
/// max_concurrency = 32
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub session: SessionSection,
    #[serde(default)]
    pub lookup: LookupSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSection {
    /// Store code or menu number.
    pub store: Option<String>,
    /// Locale code or menu number.
    pub locale: Option<String>,
    pub postcode: Option<String>,
    pub orders: Option<Vec<String>>,
    pub orders_file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupSection {
    pub endpoint: Option<String>,
    pub max_concurrency: Option<usize>,
}

impl TomlConfig {
    /// Loads a session file. A relative `orders_file` is taken relative to
    /// the session file's directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(OrderTallyError::IoError)?;
        let mut config = Self::from_toml_str(&content)?;

        let resolved = match (&config.session.orders_file, path.as_ref().parent()) {
            (Some(orders_file), Some(base_dir)) if Path::new(orders_file).is_relative() => {
                Some(base_dir.join(orders_file).to_string_lossy().into_owned())
            }
            _ => None,
        };
        if resolved.is_some() {
            config.session.orders_file = resolved;
        }

        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| OrderTallyError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| {
            OrderTallyError::ConfigValidationError {
                field: "env_substitution".to_string(),
                message: e.to_string(),
            }
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn store(&self) -> Result<Option<Store>> {
        self.session.store.as_deref().map(str::parse).transpose()
    }

    pub fn locale(&self) -> Result<Option<Locale>> {
        self.session.locale.as_deref().map(str::parse).transpose()
    }

    pub fn validate_config(&self) -> Result<()> {
        self.store()?;
        self.locale()?;

        if let Some(endpoint) = &self.lookup.endpoint {
            validation::validate_url("lookup.endpoint", endpoint)?;
        }

        if let Some(max) = self.lookup.max_concurrency {
            validation::validate_positive_number("lookup.max_concurrency", max, 1)?;
        }

        if let Some(path) = &self.session.orders_file {
            validation::validate_path("session.orders_file", path)?;
        }

        if let Some(postcode) = &self.session.postcode {
            validation::validate_non_empty_string("session.postcode", postcode)?;
        }

        Ok(())
    }

    pub fn inputs(&self) -> Result<SessionInputs> {
        self.validate()?;

        Ok(SessionInputs {
            store: self.store()?,
            locale: self.locale()?,
            postcode: self.session.postcode.clone(),
            orders: self.session.orders.clone().unwrap_or_default(),
            orders_file: self.session.orders_file.as_ref().map(PathBuf::from),
            endpoint: self.lookup.endpoint.clone(),
            max_concurrency: self.lookup.max_concurrency,
        })
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_session_file() {
        let toml_content = r#"
[session]
store = "size"
locale = "2"
postcode = "1011AB"
orders = ["A1", "A2"]

[lookup]
endpoint = "https://tracking.example.com/track-my-order"
max_concurrency = 8
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let inputs = config.inputs().unwrap();

        assert_eq!(inputs.store, Some(Store::Size));
        assert_eq!(inputs.locale, Some(Locale::Nl));
        assert_eq!(inputs.postcode.as_deref(), Some("1011AB"));
        assert_eq!(inputs.orders, vec!["A1", "A2"]);
        assert_eq!(inputs.max_concurrency, Some(8));
        assert_eq!(
            inputs.endpoint.as_deref(),
            Some("https://tracking.example.com/track-my-order")
        );
    }

    #[test]
    fn test_empty_file_is_valid() {
        let config = TomlConfig::from_toml_str("").unwrap();
        let inputs = config.inputs().unwrap();

        assert_eq!(inputs.store, None);
        assert!(inputs.orders.is_empty());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("ORDER_TALLY_TEST_POSTCODE", "M11AA");

        let toml_content = r#"
[session]
postcode = "${ORDER_TALLY_TEST_POSTCODE}"
orders_file = "${ORDER_TALLY_TEST_UNSET_VAR}.txt"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.session.postcode.as_deref(), Some("M11AA"));
        assert_eq!(
            config.session.orders_file.as_deref(),
            Some("${ORDER_TALLY_TEST_UNSET_VAR}.txt")
        );

        std::env::remove_var("ORDER_TALLY_TEST_POSTCODE");
    }

    #[test]
    fn test_config_validation() {
        let bad_store = TomlConfig::from_toml_str("[session]\nstore = \"nike\"\n").unwrap();
        assert!(bad_store.validate().is_err());

        let bad_endpoint =
            TomlConfig::from_toml_str("[lookup]\nendpoint = \"invalid-url\"\n").unwrap();
        assert!(bad_endpoint.validate().is_err());

        let zero_concurrency =
            TomlConfig::from_toml_str("[lookup]\nmax_concurrency = 0\n").unwrap();
        assert!(zero_concurrency.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = TomlConfig::from_toml_str("[session\nstore = ");
        assert!(matches!(
            result,
            Err(OrderTallyError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[session]\nstore = \"jdsports\"\nlocale = \"de\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.store().unwrap(), Some(Store::JdSports));
        assert_eq!(config.locale().unwrap(), Some(Locale::De));
    }

    #[test]
    fn test_relative_orders_file_resolves_against_session_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let config_path = dir.path().join("session.toml");
        std::fs::write(&config_path, "[session]\norders_file = \"batch.txt\"\n").unwrap();

        let config = TomlConfig::from_file(&config_path).unwrap();
        let inputs = config.inputs().unwrap();
        assert_eq!(inputs.orders_file, Some(dir.path().join("batch.txt")));
    }

    #[test]
    fn test_absolute_orders_file_is_kept() {
        let dir = tempfile::TempDir::new().unwrap();
        let orders_path = dir.path().join("orders").join("batch.txt");
        let config_path = dir.path().join("session.toml");
        std::fs::write(
            &config_path,
            format!(
                "[session]\norders_file = '{}'\n",
                orders_path.to_str().unwrap()
            ),
        )
        .unwrap();

        let config = TomlConfig::from_file(&config_path).unwrap();
        assert_eq!(
            config.session.orders_file.as_deref(),
            orders_path.to_str()
        );
    }
}
