//! Product recommendations derived from an AI reply.
//!
//! The webhook is asked for a strict JSON array but tends to wrap it in
//! prose; parsing slices the first `[`..`]` span before giving up. Every
//! failure path lands on the fixed fallback list, never an error.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq, JsonSchema)]
#[serde(default)]
pub struct Product {
    pub name: String,
    pub category: String,
    pub reason: String,
}

impl Default for Product {
    fn default() -> Self {
        Self {
            name: String::new(),
            category: "General".to_string(),
            reason: String::new(),
        }
    }
}

pub fn fallback_products() -> Vec<Product> {
    vec![
        Product {
            name: "Smart Water Bottle".to_string(),
            category: "Hydration".to_string(),
            reason: "Tracks daily water intake and reminds you to drink.".to_string(),
        },
        Product {
            name: "Sleep Tracking Ring".to_string(),
            category: "Sleep".to_string(),
            reason: "Monitors sleep stages to help build a consistent routine.".to_string(),
        },
        Product {
            name: "Resistance Band Set".to_string(),
            category: "Fitness".to_string(),
            reason: "Low-impact strength training that fits any schedule.".to_string(),
        },
    ]
}

/// Best-effort parse of an AI reply into a product list.
pub fn parse_products(reply: &str) -> Vec<Product> {
    if let Some(products) = try_parse(reply) {
        return products;
    }
    // Tolerate prose around the array: take the outermost bracketed span.
    if let (Some(start), Some(end)) = (reply.find('['), reply.rfind(']')) {
        if start < end {
            if let Some(products) = try_parse(&reply[start..=end]) {
                return products;
            }
        }
    }
    fallback_products()
}

fn try_parse(raw: &str) -> Option<Vec<Product>> {
    let products: Vec<Product> = serde_json::from_str(raw).ok()?;
    let named: Vec<Product> = products
        .into_iter()
        .filter(|p| !p.name.trim().is_empty())
        .collect();
    (!named.is_empty()).then_some(named)
}
