//! # theme-cart CLI
//!
//! Command-line front end for the storefront cart client.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           theme-cart <command>                          │
//! │                                                                         │
//! │  args ───► CartConfig (file ► env ► --origin/--token) ───► CartClient  │
//! │                                                              │          │
//! │                                       stdout ◄── pretty JSON ┘          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cli;

use clap::Parser;
use serde_json::Value;
use theme_cart::{
    AddLineItemOptions, Attributes, CartClient, CartConfig, CartResult, ChangeLineItemOptions,
    Properties,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::{AttributesAction, Cli, Command, NoteAction};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "warn,theme_cart=debug"
        } else {
            "warn"
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = load_config(&cli)?;
    debug!(origin = %config.origin(), "Configuration loaded");

    let client = CartClient::from_config(&config)?;
    let output = run(&client, &config, cli.command).await?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// File and environment first, then the command-line overrides on top.
fn load_config(cli: &Cli) -> CartResult<CartConfig> {
    let mut config = CartConfig::load(cli.config.clone())?;

    if let Some(origin) = &cli.origin {
        config.storefront.origin = origin.clone();
    }
    if let Some(token) = &cli.token {
        config.storefront.cart_token = Some(token.clone());
    }

    config.validate()?;
    Ok(config)
}

async fn run(
    client: &CartClient,
    config: &CartConfig,
    command: Command,
) -> Result<Value, Box<dyn std::error::Error>> {
    let output = match command {
        Command::State => serde_json::to_value(client.get_state().await?)?,
        Command::Index { key } => Value::from(client.get_line_item_index(&key).await?),
        Command::Item { key } => serde_json::to_value(client.get_line_item(&key)?.await?)?,
        Command::Add {
            variant_id,
            quantity,
            properties,
        } => {
            let mut options = AddLineItemOptions::new();
            options.quantity = quantity;
            options.properties = into_map(properties);
            serde_json::to_value(client.add_line_item(variant_id, options)?.await?)?
        }
        Command::Change {
            key,
            quantity,
            properties,
        } => {
            let options = ChangeLineItemOptions {
                quantity,
                properties: into_map(properties),
            };
            client.change_line_item(&key, options).await?
        }
        Command::Remove { key } => client.remove_line_item(&key).await?,
        Command::Clear => serde_json::to_value(client.clear_line_items().await?)?,
        Command::Attributes { action } => match action.unwrap_or(AttributesAction::Get) {
            AttributesAction::Get => Value::Object(client.get_attributes().await?),
            AttributesAction::Set { pairs } => {
                let attributes: Attributes = pairs.into_iter().collect();
                Value::Object(client.set_attributes(&attributes).await?.attributes)
            }
            AttributesAction::Clear => {
                Value::Object(client.clear_attributes().await?.attributes)
            }
        },
        Command::Note { action } => match action.unwrap_or(NoteAction::Get) {
            NoteAction::Get => Value::from(client.get_note().await?),
            NoteAction::Set { text } => Value::from(client.set_note(Some(&text)).await?),
            NoteAction::Clear => Value::from(client.clear_note().await?),
        },
        Command::ShippingRates => serde_json::to_value(client.get_shipping_rates().await?)?,
        Command::Config => serde_json::to_value(config.redacted())?,
    };

    Ok(output)
}

fn into_map(pairs: Vec<(String, Value)>) -> Option<Properties> {
    if pairs.is_empty() {
        None
    } else {
        Some(pairs.into_iter().collect())
    }
}
