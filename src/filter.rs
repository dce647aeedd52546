use std::collections::BTreeSet;

use crate::model::{DietaryTag, Recipe};

/// Set of dietary tags the user has switched on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveFilters {
    tags: BTreeSet<DietaryTag>,
}

impl ActiveFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch a tag on if it is off, off if it is on
    pub fn toggle(&mut self, tag: DietaryTag) {
        if !self.tags.remove(&tag) {
            self.tags.insert(tag);
        }
    }

    pub fn is_active(&self, tag: DietaryTag) -> bool {
        self.tags.contains(&tag)
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn clear(&mut self) {
        self.tags.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = DietaryTag> + '_ {
        self.tags.iter().copied()
    }

    /// True if the recipe carries every active tag
    pub fn matches(&self, recipe: &Recipe) -> bool {
        self.tags.iter().all(|tag| recipe.has_tag(*tag))
    }
}

impl FromIterator<DietaryTag> for ActiveFilters {
    fn from_iter<I: IntoIterator<Item = DietaryTag>>(iter: I) -> Self {
        Self {
            tags: iter.into_iter().collect(),
        }
    }
}

/// Recipes satisfying every active tag. No active tags returns the full list.
pub fn filter_recipes<'a>(recipes: &'a [Recipe], active: &ActiveFilters) -> Vec<&'a Recipe> {
    recipes
        .iter()
        .filter(|recipe| active.matches(recipe))
        .collect()
}
