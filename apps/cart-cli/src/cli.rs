//! CLI definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

/// theme-cart - Read and edit a storefront cart from the command line
#[derive(Parser, Debug)]
#[command(
    name = "theme-cart",
    version,
    about = "Read and edit a storefront cart",
    long_about = "Talks to the storefront cart endpoints (/cart.js, /cart/add.js, ...).\n\n\
                  Results are printed as JSON on stdout. Set RUST_LOG or pass -v\n\
                  for request logs on stderr."
)]
pub struct Cli {
    /// Path to theme-cart.toml (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Storefront origin, e.g. https://example.myshopify.com
    #[arg(long, global = true)]
    pub origin: Option<String>,

    /// Value of the storefront `cart` cookie
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the full cart
    State,

    /// Print the line number of the item with KEY
    Index {
        /// Line item key, "<variant_id>:<hash>"
        key: String,
    },

    /// Print the line item with KEY (null if absent)
    Item {
        /// Line item key, "<variant_id>:<hash>"
        key: String,
    },

    /// Add a variant to the cart
    Add {
        /// Variant id
        variant_id: u64,

        /// Quantity to add
        #[arg(short, long)]
        quantity: Option<u64>,

        /// Line item property, repeatable
        #[arg(short, long = "property", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        properties: Vec<(String, Value)>,
    },

    /// Change quantity or properties of the item with KEY
    Change {
        /// Line item key, "<variant_id>:<hash>"
        key: String,

        /// New quantity
        #[arg(short, long)]
        quantity: Option<u64>,

        /// Line item property, repeatable
        #[arg(short, long = "property", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        properties: Vec<(String, Value)>,
    },

    /// Remove the item with KEY
    Remove {
        /// Line item key, "<variant_id>:<hash>"
        key: String,
    },

    /// Remove every line item
    Clear,

    /// Read or replace cart attributes
    Attributes {
        #[command(subcommand)]
        action: Option<AttributesAction>,
    },

    /// Read or replace the cart note
    Note {
        #[command(subcommand)]
        action: Option<NoteAction>,
    },

    /// Print shipping rates for the current cart
    ShippingRates,

    /// Print the effective configuration
    Config,
}

#[derive(Subcommand, Debug)]
pub enum AttributesAction {
    /// Print attributes
    Get,

    /// Replace attributes
    Set {
        #[arg(value_name = "KEY=VALUE", required = true, value_parser = parse_key_value)]
        pairs: Vec<(String, Value)>,
    },

    /// Remove all attributes
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum NoteAction {
    /// Print the note
    Get,

    /// Set the note
    Set { text: String },

    /// Remove the note
    Clear,
}

/// Parses `key=value`. The value is read as JSON when it parses, so
/// `count=3` yields a number and `gift=yes` a string.
fn parse_key_value(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;

    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}
