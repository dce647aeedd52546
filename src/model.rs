use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How hard a recipe is to cook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dietary tag vocabulary. The model may only emit these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DietaryTag {
    Vegetarian,
    Keto,
    #[serde(rename = "Gluten-Free")]
    GlutenFree,
    Vegan,
}

impl DietaryTag {
    pub const ALL: [DietaryTag; 4] = [
        DietaryTag::Vegetarian,
        DietaryTag::Keto,
        DietaryTag::GlutenFree,
        DietaryTag::Vegan,
    ];

    /// Stable identifier, identical to the wire value
    pub fn id(&self) -> &'static str {
        match self {
            DietaryTag::Vegetarian => "Vegetarian",
            DietaryTag::Keto => "Keto",
            DietaryTag::GlutenFree => "Gluten-Free",
            DietaryTag::Vegan => "Vegan",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DietaryTag::GlutenFree => "Gluten-free",
            other => other.id(),
        }
    }
}

impl fmt::Display for DietaryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for DietaryTag {
    type Err = String;

    /// Accepts the id case-insensitively, with or without the hyphen
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();

        DietaryTag::ALL
            .into_iter()
            .find(|tag| {
                tag.id()
                    .chars()
                    .filter(|c| c.is_alphanumeric())
                    .collect::<String>()
                    .to_lowercase()
                    == normalized
            })
            .ok_or_else(|| format!("Unknown dietary tag: {}", s))
    }
}

/// An entry of the static filter catalog shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DietaryFilter {
    pub id: &'static str,
    pub label: &'static str,
    pub tag: DietaryTag,
}

/// The fixed catalog of dietary filters. Not user-extensible.
pub const DIETARY_FILTERS: [DietaryFilter; 4] = [
    DietaryFilter {
        id: "Vegetarian",
        label: "Vegetarian",
        tag: DietaryTag::Vegetarian,
    },
    DietaryFilter {
        id: "Keto",
        label: "Keto",
        tag: DietaryTag::Keto,
    },
    DietaryFilter {
        id: "Gluten-Free",
        label: "Gluten-free",
        tag: DietaryTag::GlutenFree,
    },
    DietaryFilter {
        id: "Vegan",
        label: "Vegan",
        tag: DietaryTag::Vegan,
    },
];

/// A recipe suggested by the model.
///
/// Every field is required on the wire; serde rejects a payload with a
/// missing or mistyped field instead of filling in a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub recipe_name: String,
    pub difficulty: Difficulty,
    pub prep_time: String,
    pub calories: u32,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub dietary_restrictions: Vec<DietaryTag>,
}

impl Recipe {
    pub fn has_tag(&self, tag: DietaryTag) -> bool {
        self.dietary_restrictions.contains(&tag)
    }

    /// Text spoken by read-aloud: name, ingredients label, each ingredient,
    /// instructions label, each step, joined with ". "
    pub fn read_aloud_text(&self, ingredients_label: &str, instructions_label: &str) -> String {
        std::iter::once(self.recipe_name.as_str())
            .chain(std::iter::once(ingredients_label))
            .chain(self.ingredients.iter().map(String::as_str))
            .chain(std::iter::once(instructions_label))
            .chain(self.instructions.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(". ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "recipeName": "Tomato Omelette",
            "difficulty": "Easy",
            "prepTime": "15 minutes",
            "calories": 320,
            "ingredients": ["2 eggs", "1 tomato"],
            "instructions": ["Whisk the eggs", "Cook with tomato"],
            "dietaryRestrictions": ["Vegetarian", "Gluten-Free"]
        }"#
    }

    #[test]
    fn test_recipe_deserializes_camel_case() {
        let recipe: Recipe = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(recipe.recipe_name, "Tomato Omelette");
        assert_eq!(recipe.difficulty, Difficulty::Easy);
        assert_eq!(recipe.calories, 320);
        assert!(recipe.has_tag(DietaryTag::GlutenFree));
        assert!(!recipe.has_tag(DietaryTag::Vegan));
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let json = r#"{
            "recipeName": "Soup",
            "difficulty": "Easy",
            "prepTime": "10 minutes",
            "calories": 100,
            "ingredients": [],
            "instructions": []
        }"#;
        let err = serde_json::from_str::<Recipe>(json).unwrap_err();
        assert!(err.to_string().contains("dietaryRestrictions"));
    }

    #[test]
    fn test_unknown_enum_values_are_rejected() {
        let bad_difficulty = sample_json().replace("\"Easy\"", "\"Trivial\"");
        assert!(serde_json::from_str::<Recipe>(&bad_difficulty).is_err());

        let bad_tag = sample_json().replace("\"Gluten-Free\"", "\"Paleo\"");
        assert!(serde_json::from_str::<Recipe>(&bad_tag).is_err());
    }

    #[test]
    fn test_mistyped_calories_are_rejected() {
        let negative = sample_json().replace("320", "-5");
        assert!(serde_json::from_str::<Recipe>(&negative).is_err());

        let as_string = sample_json().replace("320", "\"320\"");
        assert!(serde_json::from_str::<Recipe>(&as_string).is_err());
    }

    #[test]
    fn test_read_aloud_text_order() {
        let recipe: Recipe = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(
            recipe.read_aloud_text("Ingredients", "Instructions"),
            "Tomato Omelette. Ingredients. 2 eggs. 1 tomato. Instructions. Whisk the eggs. Cook with tomato"
        );
    }

    #[test]
    fn test_dietary_tag_from_str() {
        assert_eq!("vegan".parse::<DietaryTag>(), Ok(DietaryTag::Vegan));
        assert_eq!("gluten-free".parse::<DietaryTag>(), Ok(DietaryTag::GlutenFree));
        assert_eq!("GlutenFree".parse::<DietaryTag>(), Ok(DietaryTag::GlutenFree));
        assert!("paleo".parse::<DietaryTag>().is_err());
    }

    #[test]
    fn test_filter_catalog_matches_tags() {
        assert_eq!(DIETARY_FILTERS.len(), 4);
        for filter in DIETARY_FILTERS {
            assert_eq!(filter.id, filter.tag.id());
            assert_eq!(filter.label, filter.tag.label());
        }
    }
}
