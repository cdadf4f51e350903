use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub preparation_time_minutes: u32,
}

impl Recipe {
    pub fn uses_any<'a>(&self, mut names: impl Iterator<Item = &'a str>) -> bool {
        names.any(|n| self.ingredients.iter().any(|i| i == n))
    }
}

/// Recipes in insertion order; lookups by id are linear since the book is tiny.
#[derive(Debug, Clone, Default)]
pub struct RecipeBook {
    recipes: Vec<Recipe>,
}

impl RecipeBook {
    pub fn builtin() -> Self {
        let recipe = |id: &str, name: &str, ingredients: &[&str], instructions: &str, mins: u32| Recipe {
            id: id.to_string(),
            name: name.to_string(),
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
            instructions: instructions.to_string(),
            preparation_time_minutes: mins,
        };

        Self::new(vec![
            recipe(
                "scrambled_eggs",
                "Scrambled Eggs",
                &["egg", "milk"],
                "1. Crack eggs into a bowl\n2. Add milk and whisk\n3. Cook in a pan over medium heat\n4. Stir continuously until set",
                10,
            ),
            recipe(
                "banana_bread",
                "Banana Bread",
                &["banana", "bread", "egg"],
                "1. Mash bananas\n2. Mix with eggs\n3. Add bread cubes\n4. Bake at 180°C for 20 minutes",
                30,
            ),
            recipe(
                "tomato_salad",
                "Tomato Salad",
                &["tomato", "lettuce"],
                "1. Chop tomatoes and lettuce\n2. Mix together\n3. Add dressing to taste",
                10,
            ),
            recipe(
                "fruit_smoothie",
                "Fruit Smoothie",
                &["banana", "milk"],
                "1. Blend bananas with milk\n2. Serve cold",
                5,
            ),
        ])
    }

    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self { recipes }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }
}
