//! Text rendering of an aggregated shopping list.
//!
//! Output is deterministic for a given input: groups sorted by ingredient
//! type name with sub-recipes last, lines sorted by display name within a
//! group. Checked items stay in the text with a different mark; checking
//! tracks shopping progress, not removal.

use std::collections::{HashMap, HashSet};

use crate::types::{AggregatedLine, RecipeUsed};

const UNCHECKED_MARK: &str = "•";
const CHECKED_MARK: &str = "✓";
const SUB_RECIPES_GROUP: &str = "Sub-Recipes";

/// Render the list as plain text. `checked` holds identity keys of items the
/// shopper already has; `recipes_used` feeds the footer and may be empty.
pub fn render_text(
    lines: &[AggregatedLine],
    checked: &HashSet<String>,
    recipes_used: &[RecipeUsed],
) -> String {
    let mut by_type: HashMap<&str, Vec<&AggregatedLine>> = HashMap::new();
    let mut sub_recipes: Vec<&AggregatedLine> = Vec::new();
    for line in lines {
        if line.is_sub_recipe {
            sub_recipes.push(line);
        } else {
            let group = line.type_name.as_deref().unwrap_or("Other");
            by_type.entry(group).or_default().push(line);
        }
    }

    let mut group_names: Vec<&str> = by_type.keys().copied().collect();
    group_names.sort_by_key(|name| name.to_lowercase());

    let mut out = String::from("Shopping List\n");
    for name in group_names {
        let mut group = by_type.remove(name).unwrap_or_default();
        sort_lines(&mut group);
        push_group(&mut out, name, &group, checked);
    }
    if !sub_recipes.is_empty() {
        sort_lines(&mut sub_recipes);
        push_group(&mut out, SUB_RECIPES_GROUP, &sub_recipes, checked);
    }

    if !recipes_used.is_empty() {
        out.push('\n');
        out.push_str("RECIPES USED\n");
        for recipe in recipes_used {
            match recipe.page_number {
                Some(page) => out.push_str(&format!("• {} (p. {})\n", recipe.name, page)),
                None => out.push_str(&format!("• {}\n", recipe.name)),
            }
        }
    }

    out
}

fn sort_lines(lines: &mut [&AggregatedLine]) {
    // Identity key as tie break keeps the order total when display names
    // collide case-insensitively.
    lines.sort_by_key(|l| (l.name.to_lowercase(), l.identity_key.clone()));
}

fn push_group(out: &mut String, name: &str, lines: &[&AggregatedLine], checked: &HashSet<String>) {
    out.push('\n');
    out.push_str(&name.to_uppercase());
    out.push('\n');
    for line in lines {
        out.push_str(&format_line(line, checked.contains(&line.identity_key)));
        out.push('\n');
    }
}

fn format_line(line: &AggregatedLine, is_checked: bool) -> String {
    let mark = if is_checked {
        CHECKED_MARK
    } else {
        UNCHECKED_MARK
    };

    let mut text = format!("{mark} {}", format_quantity(line.quantity));
    if let Some(qualifier) = line.size_qualifier {
        text.push(' ');
        text.push_str(qualifier.as_str());
    }
    text.push(' ');
    text.push_str(&line.unit_name);
    text.push(' ');
    text.push_str(&line.name);

    if line.recipe_volume.is_some() || line.recipe_weight.is_some() {
        let mut details = Vec::new();
        if let Some(volume) = line.recipe_volume {
            details.push(format!("{} fl oz", format_quantity(volume)));
        }
        if let Some(weight) = line.recipe_weight {
            details.push(format!("{} g", format_quantity(weight)));
        }
        text.push_str(&format!(" (need: {})", details.join(", ")));
    }

    if let (Some(yield_quantity), Some(yield_unit)) =
        (line.yield_quantity, line.yield_unit_name.as_deref())
    {
        text.push_str(&format!(
            " (yields {} {})",
            format_quantity(yield_quantity),
            yield_unit
        ));
    }

    text
}

/// Integers print bare; everything else prints with two decimals and
/// trailing zeros stripped ("1.50" → "1.5", "2.00" → "2").
pub fn format_quantity(quantity: f64) -> String {
    let rounded = quantity.round();
    if (quantity - rounded).abs() < 1e-9 {
        return format!("{}", rounded as i64);
    }
    let text = format!("{quantity:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
