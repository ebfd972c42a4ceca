use crate::core::client::DEFAULT_ENDPOINT;
use crate::core::LookupRequest;
use crate::domain::model::{Locale, Store};
use crate::utils::error::{OrderTallyError, Result};
use crate::utils::validation::{self, Validate};
use std::path::{Path, PathBuf};

/// File read when the operator picks file input at the prompt.
pub const DEFAULT_ORDERS_FILE: &str = "ordernumbers.txt";

/// How the operator wants to supply order numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSource {
    File,
    Manual,
}

/// Interactive source for values missing from flags and the session file.
pub trait Prompter {
    fn select_store(&mut self) -> Result<Store>;
    fn select_locale(&mut self) -> Result<Locale>;
    fn postcode(&mut self) -> Result<String>;
    fn order_source(&mut self) -> Result<OrderSource>;
    fn manual_orders(&mut self) -> Result<String>;
    fn notify(&mut self, message: &str);
}

/// Partially known session values from flags or a session file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionInputs {
    pub store: Option<Store>,
    pub locale: Option<Locale>,
    pub postcode: Option<String>,
    pub orders: Vec<String>,
    pub orders_file: Option<PathBuf>,
    pub endpoint: Option<String>,
    pub max_concurrency: Option<usize>,
}

impl SessionInputs {
    /// Fills gaps in `self` from `fallback`; values already set win.
    pub fn or(self, fallback: SessionInputs) -> SessionInputs {
        // explicit orders and an explicit file are one choice, not two
        let (orders, orders_file) = if !self.orders.is_empty() || self.orders_file.is_some() {
            (self.orders, self.orders_file)
        } else {
            (fallback.orders, fallback.orders_file)
        };

        SessionInputs {
            store: self.store.or(fallback.store),
            locale: self.locale.or(fallback.locale),
            postcode: self.postcode.or(fallback.postcode),
            orders,
            orders_file,
            endpoint: self.endpoint.or(fallback.endpoint),
            max_concurrency: self.max_concurrency.or(fallback.max_concurrency),
        }
    }
}

/// Fully resolved input for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub store: Store,
    pub locale: Locale,
    pub postcode: String,
    pub order_ids: Vec<String>,
    pub endpoint: String,
    pub max_concurrency: Option<usize>,
}

impl Session {
    pub fn resolve(inputs: SessionInputs, prompter: Option<&mut dyn Prompter>) -> Result<Self> {
        Self::resolve_in(inputs, prompter, Path::new("."))
    }

    /// Like `resolve`, with the prompt's default orders file looked up in
    /// `base_dir`.
    pub fn resolve_in(
        inputs: SessionInputs,
        mut prompter: Option<&mut dyn Prompter>,
        base_dir: &Path,
    ) -> Result<Self> {
        let store = match inputs.store {
            Some(store) => store,
            None => required(&mut prompter, "store")?.select_store()?,
        };

        let locale = match inputs.locale {
            Some(locale) => locale,
            None => required(&mut prompter, "locale")?.select_locale()?,
        };

        let postcode = match inputs.postcode {
            Some(postcode) => postcode.trim().to_string(),
            None => required(&mut prompter, "postcode")?.postcode()?.trim().to_string(),
        };

        let order_ids = if !inputs.orders.is_empty() {
            parse_order_list(&inputs.orders.join(" "))
        } else if let Some(path) = &inputs.orders_file {
            read_orders_file(path)?
        } else {
            let prompter = required(&mut prompter, "orders")?;
            prompt_order_ids(prompter, &base_dir.join(DEFAULT_ORDERS_FILE))?
        };

        let session = Session {
            store,
            locale,
            postcode,
            order_ids,
            endpoint: inputs
                .endpoint
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            max_concurrency: inputs.max_concurrency,
        };
        session.validate()?;

        tracing::info!(
            "📋 Session: store={}, locale={}, {} orders",
            session.store,
            session.locale,
            session.order_ids.len()
        );
        Ok(session)
    }

    pub fn requests(&self) -> Vec<LookupRequest> {
        self.order_ids
            .iter()
            .map(|order_id| {
                LookupRequest::new(self.store, self.locale, self.postcode.clone(), order_id.clone())
            })
            .collect()
    }
}

impl Validate for Session {
    fn validate(&self) -> Result<()> {
        validation::validate_url("endpoint", &self.endpoint)?;
        validation::validate_non_empty_string("postcode", &self.postcode)?;
        validation::validate_non_empty_list("orders", &self.order_ids)?;
        if let Some(max) = self.max_concurrency {
            validation::validate_positive_number("max_concurrency", max, 1)?;
        }
        Ok(())
    }
}

fn required<'a, 'p>(
    prompter: &'a mut Option<&'p mut dyn Prompter>,
    field: &str,
) -> Result<&'a mut (dyn Prompter + 'p)> {
    prompter
        .as_deref_mut()
        .ok_or_else(|| OrderTallyError::MissingConfigError {
            field: field.to_string(),
        })
}

/// Asks until the operator supplies at least one order number.
fn prompt_order_ids(prompter: &mut dyn Prompter, default_file: &Path) -> Result<Vec<String>> {
    loop {
        match prompter.order_source()? {
            OrderSource::File => match read_orders_file(default_file) {
                Ok(ids) => return Ok(ids),
                Err(e) => {
                    tracing::warn!("Could not use {}: {}", default_file.display(), e);
                    prompter.notify(&format!(
                        "error reading {}, make sure the file exists and is in the current directory",
                        default_file.display()
                    ));
                }
            },
            OrderSource::Manual => {
                let ids = parse_order_list(&prompter.manual_orders()?);
                if !ids.is_empty() {
                    return Ok(ids);
                }
                prompter.notify("no order numbers entered");
            }
        }
    }
}

/// Splits on commas and whitespace, dropping empty entries.
pub fn parse_order_list(input: &str) -> Vec<String> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// One order number per line; handles `\r\n` and skips blank lines.
pub fn parse_order_file(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn read_orders_file(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    let ids = parse_order_file(&content);
    validation::validate_non_empty_list("orders", &ids)?;
    tracing::debug!("Read {} order numbers from {}", ids.len(), path.display());
    Ok(ids)
}
