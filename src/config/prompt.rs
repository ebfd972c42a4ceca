use crate::config::session::{OrderSource, Prompter};
use crate::domain::model::{Locale, Store};
use crate::utils::error::{OrderTallyError, Result};
use dialoguer::{theme::ColorfulTheme, Input, Select};

fn prompt_error(e: dialoguer::Error) -> OrderTallyError {
    OrderTallyError::PromptError(e.to_string())
}

/// Terminal menus for the values the operator did not pass as flags.
pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for DialoguerPrompter {
    fn select_store(&mut self) -> Result<Store> {
        let items: Vec<&str> = Store::ALL.iter().map(|store| store.display_name()).collect();
        let idx = Select::with_theme(&self.theme)
            .with_prompt("Please select your fascia")
            .items(&items)
            .default(0)
            .interact()
            .map_err(prompt_error)?;
        Ok(Store::ALL[idx])
    }

    fn select_locale(&mut self) -> Result<Locale> {
        let items: Vec<String> = Locale::ALL
            .iter()
            .map(|locale| locale.code().to_ascii_uppercase())
            .collect();
        let idx = Select::with_theme(&self.theme)
            .with_prompt("Which locale")
            .items(&items)
            .default(0)
            .interact()
            .map_err(prompt_error)?;
        Ok(Locale::ALL[idx])
    }

    fn postcode(&mut self) -> Result<String> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt("Please put in your postcode")
            .validate_with(|input: &String| -> std::result::Result<(), &str> {
                if input.trim().is_empty() {
                    Err("postcode cannot be empty")
                } else {
                    Ok(())
                }
            })
            .interact_text()
            .map_err(prompt_error)
    }

    fn order_source(&mut self) -> Result<OrderSource> {
        let items = [
            "ordernumbers.txt (one order number per line)",
            "manual input",
        ];
        let idx = Select::with_theme(&self.theme)
            .with_prompt("How do you want to input your order numbers")
            .items(&items)
            .default(0)
            .interact()
            .map_err(prompt_error)?;

        Ok(match idx {
            0 => OrderSource::File,
            _ => OrderSource::Manual,
        })
    }

    fn manual_orders(&mut self) -> Result<String> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt("Order numbers (separated by a space)")
            .interact_text()
            .map_err(prompt_error)
    }

    fn notify(&mut self, message: &str) {
        eprintln!("❌ {}", message);
    }
}
