use serde_json::{json, Value};

use crate::model::{DietaryTag, Difficulty};

/// The instruction sent next to the fridge photo.
///
/// The prompt is loaded from `prompt.txt` at compile time using the
/// `include_str!` macro, making it easy to edit without dealing with
/// Rust string syntax.
pub const RECIPE_PROMPT: &str = include_str!("prompt.txt");

fn difficulty_values() -> Vec<&'static str> {
    Difficulty::ALL.iter().map(Difficulty::as_str).collect()
}

fn dietary_values() -> Vec<&'static str> {
    DietaryTag::ALL.iter().map(DietaryTag::id).collect()
}

const REQUIRED_FIELDS: [&str; 7] = [
    "recipeName",
    "difficulty",
    "prepTime",
    "calories",
    "ingredients",
    "instructions",
    "dietaryRestrictions",
];

/// Gemini `responseSchema` (OpenAPI subset) for an array of recipes
pub fn gemini_response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "recipeName": { "type": "STRING", "description": "The name of the recipe." },
                "difficulty": {
                    "type": "STRING",
                    "enum": difficulty_values(),
                    "description": "The difficulty level of the recipe."
                },
                "prepTime": {
                    "type": "STRING",
                    "description": "Estimated preparation time (e.g. \"30 minutes\")."
                },
                "calories": {
                    "type": "INTEGER",
                    "description": "Estimated calories per serving."
                },
                "ingredients": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": "Ingredients required for the recipe."
                },
                "instructions": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": "Step-by-step instructions."
                },
                "dietaryRestrictions": {
                    "type": "ARRAY",
                    "items": { "type": "STRING", "enum": dietary_values() },
                    "description": "Dietary restrictions the recipe satisfies. Empty array if none."
                }
            },
            "required": REQUIRED_FIELDS,
            "propertyOrdering": REQUIRED_FIELDS
        }
    })
}

/// Strict JSON Schema for OpenAI `response_format`. The root must be an object,
/// so recipes are wrapped in `{"recipes": [...]}`.
pub fn openai_response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "recipes": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "recipeName": { "type": "string" },
                        "difficulty": { "type": "string", "enum": difficulty_values() },
                        "prepTime": { "type": "string" },
                        "calories": { "type": "integer" },
                        "ingredients": { "type": "array", "items": { "type": "string" } },
                        "instructions": { "type": "array", "items": { "type": "string" } },
                        "dietaryRestrictions": {
                            "type": "array",
                            "items": { "type": "string", "enum": dietary_values() }
                        }
                    },
                    "required": REQUIRED_FIELDS,
                    "additionalProperties": false
                }
            }
        },
        "required": ["recipes"],
        "additionalProperties": false
    })
}
