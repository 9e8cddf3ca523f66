//! Terminal rendering of normalized responses

use swasth_core::retrieval::RecipeRecord;
use swasth_core::{
    agent::{MealPlanPayload, WebRecipePayload},
    NormalizedResponse,
};

/// Render a response as plain text for the chat loop. Rendering happens in
/// English; translation applies to the rendered text afterwards.
pub fn render(response: &NormalizedResponse) -> String {
    match response {
        NormalizedResponse::Message(text) => text.clone(),
        NormalizedResponse::Plan(plan) => render_plan(plan),
        NormalizedResponse::ItemDetails(record) => render_record(record),
        NormalizedResponse::WebRecipe(recipe) => render_web_recipe(recipe),
    }
}

fn render_plan(plan: &MealPlanPayload) -> String {
    let mut out = String::new();
    out.push_str(&plan.greeting);
    out.push_str("\n\n");
    for meal in &plan.plan {
        out.push_str(&format!(
            "{}: {}\n  {}\n",
            meal.meal_time, meal.meal_name, meal.justification
        ));
    }
    out.push('\n');
    out.push_str(&plan.summary);
    out
}

fn render_record(record: &RecipeRecord) -> String {
    let mut out = format!("{}\n", record.item_name);
    if !record.item_type.is_empty() {
        out.push_str(&format!("Type: {}\n", record.item_type));
    }
    if !record.cuisine_type.is_empty() {
        out.push_str(&format!("Cuisine: {}\n", record.cuisine_type));
    }
    if !record.preparation_time.is_empty() {
        out.push_str(&format!("Prep time: {}\n", record.preparation_time));
    }
    if !record.cooking_time.is_empty() {
        out.push_str(&format!("Cooking time: {}\n", record.cooking_time));
    }

    if !record.ingredients.is_empty() {
        out.push_str("\nIngredients:\n");
        for ingredient in &record.ingredients {
            if ingredient.quantity.is_empty() {
                out.push_str(&format!("  - {}\n", ingredient.name));
            } else {
                out.push_str(&format!(
                    "  - {} ({})\n",
                    ingredient.name, ingredient.quantity
                ));
            }
        }
    }

    if !record.preparation_steps.is_empty() {
        out.push_str("\nSteps:\n");
        for (i, step) in record.preparation_steps.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", i + 1, step));
        }
    }

    out.trim_end().to_string()
}

fn render_web_recipe(recipe: &WebRecipePayload) -> String {
    format!(
        "{}\n\n{}\n\nVideo: {}",
        recipe.item_name, recipe.summary, recipe.youtube_link
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use swasth_core::agent::MealItem;
    use swasth_core::retrieval::Ingredient;

    #[test]
    fn plan_rendering_lists_every_meal() {
        let plan = MealPlanPayload {
            greeting: "Hi!".to_string(),
            plan: vec![
                MealItem {
                    meal_time: "Breakfast".to_string(),
                    meal_name: "Poha".to_string(),
                    justification: "light start".to_string(),
                },
                MealItem {
                    meal_time: "Lunch".to_string(),
                    meal_name: "Dal Tadka".to_string(),
                    justification: "protein".to_string(),
                },
            ],
            summary: "Balanced day.".to_string(),
        };

        let out = render(&NormalizedResponse::Plan(plan));
        assert!(out.starts_with("Hi!"));
        assert!(out.contains("Breakfast: Poha"));
        assert!(out.contains("Lunch: Dal Tadka"));
        assert!(out.ends_with("Balanced day."));
    }

    #[test]
    fn record_rendering_skips_empty_fields() {
        let record = RecipeRecord {
            item_name: "Dhokla".to_string(),
            cuisine_type: "Gujarati".to_string(),
            ingredients: vec![Ingredient {
                name: "gram flour".to_string(),
                quantity: "2 cups".to_string(),
            }],
            preparation_steps: vec!["Steam the batter.".to_string()],
            ..Default::default()
        };

        let out = render(&NormalizedResponse::ItemDetails(record));
        assert!(out.contains("Cuisine: Gujarati"));
        assert!(!out.contains("Prep time"));
        assert!(out.contains("- gram flour (2 cups)"));
        assert!(out.contains("1. Steam the batter."));
    }

    #[test]
    fn web_recipe_rendering_includes_the_link() {
        let recipe = WebRecipePayload {
            item_name: "dhokla".to_string(),
            summary: "A steamed snack.".to_string(),
            youtube_link: "Not found".to_string(),
        };

        let out = render(&NormalizedResponse::WebRecipe(recipe));
        assert!(out.contains("Video: Not found"));
    }
}
