//! The butler's function-calling surface.
//!
//! Tool calls returned by the model are dispatched by name against the
//! inventory store and, when configured, the Home Assistant client.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use tracing::info;

use butler_core::{Error, Result};
use butler_home::{HaClient, LightState};
use butler_store::InventoryStore;

#[derive(Debug, Deserialize)]
struct QueryInventoryArgs {
    item: String,
}

#[derive(Debug, Deserialize)]
struct ChangeInventoryArgs {
    name: String,
    amount: f64,
    unit: String,
}

#[derive(Debug, Deserialize)]
struct SetLightArgs {
    location: String,
    state: String,
}

/// Dispatches tool calls by name and renders their outputs as sentences.
pub struct ToolRegistry {
    inventory: Arc<InventoryStore>,
    home: Option<Arc<HaClient>>,
}

impl ToolRegistry {
    pub fn new(inventory: Arc<InventoryStore>, home: Option<Arc<HaClient>>) -> Self {
        Self { inventory, home }
    }

    /// Function definitions sent with every completion request.
    pub fn definitions(&self) -> Vec<serde_json::Value> {
        vec![
            json!({
                "type": "function",
                "function": {
                    "name": "query_inventory",
                    "description": "Queries the home inventory for the amount of an item.",
                    "parameters": {
                        "type": "object",
                        "properties": {
                            "item": { "type": "string", "description": "Name of the inventory item." },
                        },
                        "required": ["item"],
                    },
                },
            }),
            json!({
                "type": "function",
                "function": {
                    "name": "add_to_inventory",
                    "description": "Adds an amount of an item to the home inventory.",
                    "parameters": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string", "description": "Name of the inventory item." },
                            "amount": { "type": "number", "description": "Amount to add." },
                            "unit": { "type": "string", "description": "Unit of the amount." },
                        },
                        "required": ["name", "amount", "unit"],
                    },
                },
            }),
            json!({
                "type": "function",
                "function": {
                    "name": "reduce_inventory",
                    "description": "Removes an amount of an item from the home inventory.",
                    "parameters": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string", "description": "Name of the inventory item." },
                            "amount": { "type": "number", "description": "Amount to remove." },
                            "unit": { "type": "string", "description": "Unit of the amount." },
                        },
                        "required": ["name", "amount", "unit"],
                    },
                },
            }),
            json!({
                "type": "function",
                "function": {
                    "name": "set_light_state",
                    "description": "Turns a light in the home on or off.",
                    "parameters": {
                        "type": "object",
                        "properties": {
                            "location": { "type": "string", "description": "Where the light is." },
                            "state": { "type": "string", "enum": ["on", "off"] },
                        },
                        "required": ["location", "state"],
                    },
                },
            }),
        ]
    }

    /// Run one tool call and render its output sentence. Unknown tool names
    /// and malformed arguments are errors.
    pub async fn dispatch(&self, name: &str, arguments: &str) -> Result<String> {
        info!("dispatching tool call {}", name);
        match name {
            "query_inventory" => {
                let args: QueryInventoryArgs = parse_args(name, arguments)?;
                match self.inventory.find(&args.item)? {
                    None => Ok(format!("You have no {}.", args.item)),
                    Some(item) if item.amount == 0.0 => Ok(format!("You have no {}.", item.name)),
                    Some(item) if item.amount < 0.0 => Ok(format!(
                        "You have a negative inventory of {} {} of {}, which is unusual.",
                        item.amount, item.unit, item.name
                    )),
                    Some(item) => Ok(format!(
                        "There are {} {} of {} in the inventory.",
                        item.amount, item.unit, item.name
                    )),
                }
            }
            "add_to_inventory" => {
                let args: ChangeInventoryArgs = parse_args(name, arguments)?;
                let item = self.inventory.add(&args.name, args.amount, &args.unit)?;
                Ok(format!(
                    "Added {} {} of {} to the inventory, so now you have {} {}.",
                    args.amount, item.unit, item.name, item.amount, item.unit
                ))
            }
            "reduce_inventory" => {
                let args: ChangeInventoryArgs = parse_args(name, arguments)?;
                let item = self.inventory.reduce(&args.name, args.amount, &args.unit)?;
                Ok(format!(
                    "Reduced {} {} of {} from the inventory, so now you have {} {}.",
                    args.amount, item.unit, item.name, item.amount, item.unit
                ))
            }
            "set_light_state" => {
                let args: SetLightArgs = parse_args(name, arguments)?;
                let state: LightState = args.state.parse()?;
                // Without a Home Assistant client the requested state is
                // echoed back unchanged.
                if let Some(home) = &self.home {
                    home.set_light(state).await?;
                }
                Ok(format!("Turned {} light {}", args.location, state))
            }
            other => Err(Error::Llm(format!("unknown tool '{}'", other))),
        }
    }
}

fn parse_args<'a, T: Deserialize<'a>>(name: &str, arguments: &'a str) -> Result<T> {
    serde_json::from_str(arguments)
        .map_err(|e| Error::Llm(format!("malformed arguments for tool '{}': {}", name, e)))
}
