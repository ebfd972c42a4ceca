use crate::config::prompt::DialoguerPrompter;
use crate::config::session::{Prompter, Session, SessionInputs};
use crate::config::toml_config::TomlConfig;
use crate::domain::model::{Locale, Store};
use crate::utils::error::Result;
use clap::{Parser, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "order-tally")]
#[command(about = "Look up a batch of orders and tally them by status")]
pub struct CliConfig {
    /// Store code or menu number (footpatrol, size, jdsports)
    #[arg(long)]
    pub store: Option<Store>,

    /// Locale code or menu number (uk, nl, de, dk, be, it, es, fr)
    #[arg(long)]
    pub locale: Option<Locale>,

    #[arg(long)]
    pub postcode: Option<String>,

    /// Order numbers, comma or space separated
    #[arg(long, value_delimiter = ',')]
    pub orders: Vec<String>,

    /// File with one order number per line
    #[arg(long)]
    pub orders_file: Option<PathBuf>,

    /// TOML session file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub endpoint: Option<String>,

    /// Maximum lookups in flight; unbounded when omitted
    #[arg(long)]
    pub max_concurrency: Option<usize>,

    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Fail on missing values instead of prompting
    #[arg(long)]
    pub no_prompt: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn inputs(&self) -> SessionInputs {
        SessionInputs {
            store: self.store,
            locale: self.locale,
            postcode: self.postcode.clone(),
            orders: self.orders.clone(),
            orders_file: self.orders_file.clone(),
            endpoint: self.endpoint.clone(),
            max_concurrency: self.max_concurrency,
        }
    }

    /// Flags win over the session file; anything still missing is prompted
    /// for when stdin is a terminal.
    pub fn resolve_session(&self) -> Result<Session> {
        let mut inputs = self.inputs();

        if let Some(path) = &self.config {
            tracing::info!("📁 Loading session from: {}", path.display());
            let file = TomlConfig::from_file(path)?;
            inputs = inputs.or(file.inputs()?);
        }

        let interactive = !self.no_prompt && std::io::stdin().is_terminal();
        if interactive {
            let mut prompter = DialoguerPrompter::new();
            Session::resolve(inputs, Some(&mut prompter as &mut dyn Prompter))
        } else {
            Session::resolve(inputs, None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_flags() {
        let config = CliConfig::parse_from([
            "order-tally",
            "--store",
            "3",
            "--locale",
            "de",
            "--postcode",
            "10115",
            "--orders",
            "A1,A2",
            "--max-concurrency",
            "4",
            "--format",
            "json",
        ]);

        assert_eq!(config.store, Some(Store::JdSports));
        assert_eq!(config.locale, Some(Locale::De));
        assert_eq!(config.orders, vec!["A1", "A2"]);
        assert_eq!(config.max_concurrency, Some(4));
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn test_rejects_unknown_store() {
        let result = CliConfig::try_parse_from(["order-tally", "--store", "nike"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_flags_override_session_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(
                br#"
[session]
store = "size"
locale = "nl"
postcode = "1011AB"
orders = ["F1"]
"#,
            )
            .unwrap();

        let config = CliConfig::parse_from([
            "order-tally",
            "--no-prompt",
            "--locale",
            "be",
            "--config",
            temp_file.path().to_str().unwrap(),
        ]);

        let session = config.resolve_session().unwrap();
        assert_eq!(session.store, Store::Size);
        assert_eq!(session.locale, Locale::Be);
        assert_eq!(session.order_ids, vec!["F1"]);
    }
}
