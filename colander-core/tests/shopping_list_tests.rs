//! End-to-end tests over an in-memory store: the fixture mirrors a small
//! household recipe collection, and every test drives the public engine
//! entry points.

use std::collections::HashMap;

use uuid::Uuid;

use colander_core::{
    format_shopping_list, generate_shopping_list, ConversionRule, GenerateError, Ingredient,
    MemoryStore, Recipe, RecipeItem, RecipeSelection, SizeEstimationRule, SizeQualifier,
    SnapshotStore, UnitCategory,
};

struct Kitchen {
    store: MemoryStore,
    units: HashMap<&'static str, Uuid>,
    onion: Uuid,
    rice: Uuid,
    broth: Uuid,
    flour: Uuid,
    salt: Uuid,
}

impl Kitchen {
    fn unit(&self, name: &str) -> Uuid {
        self.units[name]
    }
}

fn kitchen() -> Kitchen {
    let mut store = MemoryStore::new();
    let mut units = HashMap::new();
    for (name, category) in [
        ("cup", UnitCategory::Volume),
        ("tablespoon", UnitCategory::Volume),
        ("teaspoon", UnitCategory::Volume),
        ("fluid_ounce", UnitCategory::Volume),
        ("gram", UnitCategory::Weight),
        ("kilogram", UnitCategory::Weight),
        ("piece", UnitCategory::Count),
        ("whole", UnitCategory::Count),
        ("package", UnitCategory::Count),
        ("serving", UnitCategory::Special),
        ("to_taste", UnitCategory::Special),
    ] {
        units.insert(name, store.add_unit(name, category).id);
    }

    let rule = |from: Uuid, to: Uuid, factor: f64| ConversionRule {
        from_unit_id: from,
        to_unit_id: to,
        factor,
    };

    // Onions are bought by the piece; recipes write them in grams, cups,
    // wholes, or by size.
    let onion = Ingredient {
        id: Uuid::new_v4(),
        name: "Onion".to_string(),
        type_id: Uuid::new_v4(),
        type_name: "Vegetables".to_string(),
        shopping_unit_id: units["piece"],
        conversion_rules: vec![
            rule(units["gram"], units["piece"], 0.00667),
            rule(units["cup"], units["piece"], 1.0),
            rule(units["whole"], units["piece"], 1.0),
        ],
        size_rules: vec![
            SizeEstimationRule {
                size_qualifier: SizeQualifier::Small,
                reference_value: 100.0,
                reference_unit_id: units["gram"],
            },
            SizeEstimationRule {
                size_qualifier: SizeQualifier::Medium,
                reference_value: 150.0,
                reference_unit_id: units["gram"],
            },
            SizeEstimationRule {
                size_qualifier: SizeQualifier::Large,
                reference_value: 200.0,
                reference_unit_id: units["gram"],
            },
        ],
    };

    // Rice comes in 2 kg packages: 16 cups or 2000 g per package.
    let rice = Ingredient {
        id: Uuid::new_v4(),
        name: "Rice".to_string(),
        type_id: Uuid::new_v4(),
        type_name: "Grains".to_string(),
        shopping_unit_id: units["package"],
        conversion_rules: vec![
            rule(units["cup"], units["package"], 0.0625),
            rule(units["gram"], units["package"], 0.0005),
        ],
        size_rules: vec![],
    };

    let broth = Ingredient {
        id: Uuid::new_v4(),
        name: "Vegetable Broth".to_string(),
        type_id: Uuid::new_v4(),
        type_name: "Liquids".to_string(),
        shopping_unit_id: units["fluid_ounce"],
        conversion_rules: vec![],
        size_rules: vec![],
    };

    let flour = Ingredient {
        id: Uuid::new_v4(),
        name: "Flour".to_string(),
        type_id: Uuid::new_v4(),
        type_name: "Grains".to_string(),
        shopping_unit_id: units["cup"],
        conversion_rules: vec![],
        size_rules: vec![],
    };

    let salt = Ingredient {
        id: Uuid::new_v4(),
        name: "Salt".to_string(),
        type_id: Uuid::new_v4(),
        type_name: "Spices".to_string(),
        shopping_unit_id: units["gram"],
        conversion_rules: vec![],
        size_rules: vec![],
    };

    let kitchen = Kitchen {
        onion: onion.id,
        rice: rice.id,
        broth: broth.id,
        flour: flour.id,
        salt: salt.id,
        units,
        store: {
            store.add_ingredient(onion);
            store.add_ingredient(rice);
            store.add_ingredient(broth);
            store.add_ingredient(flour);
            store.add_ingredient(salt);
            store
        },
    };
    kitchen
}

fn ingredient_item(ingredient_id: Uuid, quantity: f64, unit_id: Uuid) -> RecipeItem {
    RecipeItem::Ingredient {
        ingredient_id,
        quantity,
        unit_id,
        size_qualifier: None,
        preparation_notes: None,
    }
}

fn recipe(name: &str, yield_quantity: f64, yield_unit_id: Uuid, items: Vec<RecipeItem>) -> Recipe {
    Recipe {
        id: Uuid::new_v4(),
        name: name.to_string(),
        is_sub_recipe: false,
        yield_quantity,
        yield_unit_id,
        page_number: None,
        items,
    }
}

fn select(recipe_id: Uuid, batches: u32) -> RecipeSelection {
    RecipeSelection { recipe_id, batches }
}

#[test]
fn test_single_recipe_converts_to_shopping_units() {
    let mut kitchen = kitchen();
    let soup = recipe(
        "Butternut Soup",
        4.0,
        kitchen.unit("serving"),
        vec![
            ingredient_item(kitchen.broth, 2.0, kitchen.unit("cup")),
            ingredient_item(kitchen.onion, 2.0, kitchen.unit("whole")),
        ],
    );
    let soup_id = kitchen.store.add_recipe(soup);

    let lines = generate_shopping_list(&kitchen.store, &[select(soup_id, 2)]).unwrap();

    assert_eq!(lines.len(), 2);
    // 4 cups of broth are 32 fluid ounces by the standard table.
    assert_eq!(lines[0].name, "Vegetable Broth");
    assert!((lines[0].quantity - 32.0).abs() < 1e-9);
    assert_eq!(lines[0].unit_name, "fluid_ounce");
    // 4 whole onions are 4 pieces by the explicit rule.
    assert_eq!(lines[1].name, "Onion");
    assert!((lines[1].quantity - 4.0).abs() < 1e-9);
    assert_eq!(lines[1].unit_name, "piece");
}

#[test]
fn test_two_recipes_merge_shared_ingredient_into_one_line() {
    let mut kitchen = kitchen();
    let soup = recipe(
        "Soup",
        4.0,
        kitchen.unit("serving"),
        vec![ingredient_item(kitchen.onion, 1.0, kitchen.unit("piece"))],
    );
    let stir_fry = recipe(
        "Stir Fry",
        2.0,
        kitchen.unit("serving"),
        vec![
            ingredient_item(kitchen.onion, 300.0, kitchen.unit("gram")),
            ingredient_item(kitchen.rice, 2.0, kitchen.unit("cup")),
        ],
    );
    let soup_id = kitchen.store.add_recipe(soup);
    let stir_fry_id = kitchen.store.add_recipe(stir_fry);

    let lines =
        generate_shopping_list(&kitchen.store, &[select(soup_id, 1), select(stir_fry_id, 1)])
            .unwrap();

    let onion = lines.iter().find(|l| l.name == "Onion").unwrap();
    // 1 piece + 300 g × 0.00667 = 3.001 pieces, on a single line.
    assert!((onion.quantity - 3.001).abs() < 1e-9);
    assert_eq!(lines.iter().filter(|l| l.name == "Onion").count(), 1);
}

#[test]
fn test_sub_recipe_scales_by_yield_ratio() {
    let mut kitchen = kitchen();
    let mut sauce = recipe(
        "White Sauce",
        4.0,
        kitchen.unit("serving"),
        vec![ingredient_item(kitchen.flour, 1.0, kitchen.unit("cup"))],
    );
    sauce.is_sub_recipe = true;
    let sauce_id = kitchen.store.add_recipe(sauce);

    let dinner = recipe(
        "Dinner",
        2.0,
        kitchen.unit("serving"),
        vec![RecipeItem::SubRecipe {
            sub_recipe_id: sauce_id,
            quantity: 2.0,
            unit_id: kitchen.unit("serving"),
        }],
    );
    let dinner_id = kitchen.store.add_recipe(dinner);

    let lines = generate_shopping_list(&kitchen.store, &[select(dinner_id, 1)]).unwrap();

    // The sauce itself is listed (2 servings of it), then its flour scaled
    // by 2/4.
    let sauce_line = lines.iter().find(|l| l.is_sub_recipe).unwrap();
    assert_eq!(sauce_line.name, "White Sauce");
    assert!((sauce_line.quantity - 2.0).abs() < 1e-9);
    assert_eq!(sauce_line.yield_quantity, Some(4.0));

    let flour_line = lines.iter().find(|l| l.name == "Flour").unwrap();
    assert!((flour_line.quantity - 0.5).abs() < 1e-9);
    assert_eq!(flour_line.unit_name, "cup");
}

#[test]
fn test_cyclic_recipes_fail_generation() {
    let mut kitchen = kitchen();
    let a_id = Uuid::new_v4();
    let b_id = Uuid::new_v4();

    let mut a = recipe("Chained A", 1.0, kitchen.unit("serving"), vec![]);
    a.id = a_id;
    a.is_sub_recipe = true;
    a.items.push(RecipeItem::SubRecipe {
        sub_recipe_id: b_id,
        quantity: 1.0,
        unit_id: kitchen.unit("serving"),
    });
    let mut b = recipe("Chained B", 1.0, kitchen.unit("serving"), vec![]);
    b.id = b_id;
    b.is_sub_recipe = true;
    b.items.push(RecipeItem::SubRecipe {
        sub_recipe_id: a_id,
        quantity: 1.0,
        unit_id: kitchen.unit("serving"),
    });
    kitchen.store.add_recipe(a);
    kitchen.store.add_recipe(b);

    let result = generate_shopping_list(&kitchen.store, &[select(a_id, 1)]);
    assert!(matches!(
        result,
        Err(GenerateError::CyclicRecipeReference { .. })
    ));
}

#[test]
fn test_missing_conversion_path_blocks_the_list() {
    let mut kitchen = kitchen();
    // Rice measured in teaspoons has no rule, no shared category with
    // packages, and no size rule.
    let pilaf = recipe(
        "Pilaf",
        2.0,
        kitchen.unit("serving"),
        vec![
            ingredient_item(kitchen.onion, 1.0, kitchen.unit("piece")),
            ingredient_item(kitchen.rice, 3.0, kitchen.unit("teaspoon")),
        ],
    );
    let pilaf_id = kitchen.store.add_recipe(pilaf);

    let err = generate_shopping_list(&kitchen.store, &[select(pilaf_id, 1)]).unwrap_err();
    match err {
        GenerateError::NoConversionPath {
            ingredient,
            from_unit,
            to_unit,
        } => {
            assert_eq!(ingredient, "Rice");
            assert_eq!(from_unit, "teaspoon");
            assert_eq!(to_unit, "package");
        }
        other => panic!("expected NoConversionPath, got {other:?}"),
    }
}

#[test]
fn test_size_qualifier_fallback_resolves() {
    let mut kitchen = kitchen();
    // Carrots have no rule for "whole", so "2 medium whole" falls back to
    // the medium size rule (50 g each) and converts the grams instead.
    let carrot = Ingredient {
        id: Uuid::new_v4(),
        name: "Carrot".to_string(),
        type_id: Uuid::new_v4(),
        type_name: "Vegetables".to_string(),
        shopping_unit_id: kitchen.unit("piece"),
        conversion_rules: vec![ConversionRule {
            from_unit_id: kitchen.unit("gram"),
            to_unit_id: kitchen.unit("piece"),
            factor: 0.02,
        }],
        size_rules: vec![SizeEstimationRule {
            size_qualifier: SizeQualifier::Medium,
            reference_value: 50.0,
            reference_unit_id: kitchen.unit("gram"),
        }],
    };
    let carrot_id = kitchen.store.add_ingredient(carrot);

    let mut roast = recipe("Roast", 2.0, kitchen.unit("serving"), vec![]);
    roast.items.push(RecipeItem::Ingredient {
        ingredient_id: carrot_id,
        quantity: 2.0,
        unit_id: kitchen.unit("whole"),
        size_qualifier: Some(SizeQualifier::Medium),
        preparation_notes: None,
    });
    let roast_id = kitchen.store.add_recipe(roast);

    let lines = generate_shopping_list(&kitchen.store, &[select(roast_id, 1)]).unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].name, "Carrot");
    assert_eq!(lines[0].size_qualifier, Some(SizeQualifier::Medium));
    // 2 × 50 g × 0.02 pieces per gram.
    assert!((lines[0].quantity - 2.0).abs() < 1e-9);
    assert_eq!(lines[0].unit_name, "piece");
}

#[test]
fn test_container_totals_round_up_and_explain_need() {
    let mut kitchen = kitchen();
    let pilaf = recipe(
        "Pilaf",
        2.0,
        kitchen.unit("serving"),
        vec![ingredient_item(kitchen.rice, 10.0, kitchen.unit("cup"))],
    );
    let pilaf_id = kitchen.store.add_recipe(pilaf);

    let lines = generate_shopping_list(&kitchen.store, &[select(pilaf_id, 1)]).unwrap();
    assert_eq!(lines[0].quantity, 1.0);
    assert!((lines[0].recipe_volume.unwrap() - 80.0).abs() < 1e-9);
    assert!((lines[0].recipe_weight.unwrap() - 1250.0).abs() < 1e-9);

    let text = format_shopping_list(&kitchen.store, &[select(pilaf_id, 1)], &[]).unwrap();
    assert!(text.contains("• 1 package Rice (need: 80 fl oz, 1250 g)"));
}

#[test]
fn test_special_units_pass_through_without_summing() {
    let mut kitchen = kitchen();
    let stew = recipe(
        "Stew",
        4.0,
        kitchen.unit("serving"),
        vec![
            ingredient_item(kitchen.salt, 1.0, kitchen.unit("to_taste")),
            ingredient_item(kitchen.salt, 1.0, kitchen.unit("to_taste")),
        ],
    );
    let stew_id = kitchen.store.add_recipe(stew);

    let lines = generate_shopping_list(&kitchen.store, &[select(stew_id, 3)]).unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].unit_name, "to_taste");
    // Pass-through amounts are not summed across duplicate leaves.
    assert_eq!(lines[0].quantity, 3.0);
}

#[test]
fn test_identity_keys_survive_batch_changes() {
    let mut kitchen = kitchen();
    let soup = recipe(
        "Soup",
        4.0,
        kitchen.unit("serving"),
        vec![ingredient_item(kitchen.onion, 1.0, kitchen.unit("piece"))],
    );
    let soup_id = kitchen.store.add_recipe(soup);

    let once = generate_shopping_list(&kitchen.store, &[select(soup_id, 1)]).unwrap();
    let thrice = generate_shopping_list(&kitchen.store, &[select(soup_id, 3)]).unwrap();

    assert_eq!(once[0].identity_key, thrice[0].identity_key);
    assert!((thrice[0].quantity - 3.0).abs() < 1e-9);
}

#[test]
fn test_formatting_is_idempotent_and_replays_checked_sets() {
    let mut kitchen = kitchen();
    let mut soup = recipe(
        "Butternut Soup",
        4.0,
        kitchen.unit("serving"),
        vec![
            ingredient_item(kitchen.onion, 2.0, kitchen.unit("piece")),
            ingredient_item(kitchen.broth, 2.0, kitchen.unit("cup")),
        ],
    );
    soup.page_number = Some(42);
    let soup_id = kitchen.store.add_recipe(soup);

    let lines = generate_shopping_list(&kitchen.store, &[select(soup_id, 1)]).unwrap();
    let onion_key = lines
        .iter()
        .find(|l| l.name == "Onion")
        .unwrap()
        .identity_key
        .clone();
    let checked = vec![onion_key];

    let first = format_shopping_list(&kitchen.store, &[select(soup_id, 1)], &checked).unwrap();
    let second = format_shopping_list(&kitchen.store, &[select(soup_id, 1)], &checked).unwrap();
    assert_eq!(first, second);

    assert!(first.contains("✓ 2 piece Onion"));
    assert!(first.contains("• 16 fluid_ounce Vegetable Broth"));
    assert!(first.contains("RECIPES USED"));
    assert!(first.contains("• Butternut Soup (p. 42)"));
}

#[test]
fn test_group_ordering_in_formatted_text() {
    let mut kitchen = kitchen();
    let mut sauce = recipe(
        "Mango Sauce",
        3.0,
        kitchen.unit("cup"),
        vec![ingredient_item(kitchen.salt, 2.0, kitchen.unit("gram"))],
    );
    sauce.is_sub_recipe = true;
    let sauce_id = kitchen.store.add_recipe(sauce);

    let dinner = recipe(
        "Dinner",
        2.0,
        kitchen.unit("serving"),
        vec![
            RecipeItem::SubRecipe {
                sub_recipe_id: sauce_id,
                quantity: 1.0,
                unit_id: kitchen.unit("cup"),
            },
            ingredient_item(kitchen.onion, 1.0, kitchen.unit("piece")),
            ingredient_item(kitchen.rice, 1.0, kitchen.unit("cup")),
        ],
    );
    let dinner_id = kitchen.store.add_recipe(dinner);

    let text = format_shopping_list(&kitchen.store, &[select(dinner_id, 1)], &[]).unwrap();

    let grains = text.find("GRAINS").unwrap();
    let spices = text.find("SPICES").unwrap();
    let vegetables = text.find("VEGETABLES").unwrap();
    let subs = text.find("SUB-RECIPES").unwrap();
    assert!(grains < spices && spices < vegetables && vegetables < subs);
    assert!(text.contains("• 1 cup Mango Sauce (yields 3 cup)"));
}

#[test]
fn test_snapshots_record_and_replay() {
    let mut kitchen = kitchen();
    let soup = recipe(
        "Soup",
        4.0,
        kitchen.unit("serving"),
        vec![ingredient_item(kitchen.onion, 1.0, kitchen.unit("piece"))],
    );
    let soup_id = kitchen.store.add_recipe(soup);
    let selections = [select(soup_id, 2)];

    let lines = generate_shopping_list(&kitchen.store, &selections).unwrap();
    let recorded = kitchen.store.record(&selections, &lines).unwrap();

    let fetched = kitchen.store.fetch(recorded.id).unwrap().unwrap();
    assert_eq!(fetched.recipe_selections, selections.to_vec());
    assert_eq!(fetched.shopping_list.len(), lines.len());
    assert_eq!(fetched.shopping_list[0].identity_key, lines[0].identity_key);

    let second = kitchen.store.record(&selections, &lines).unwrap();
    let listed = kitchen.store.list().unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed[0].created_at >= listed[1].created_at);
    assert!(listed.iter().any(|s| s.id == recorded.id));
    assert!(listed.iter().any(|s| s.id == second.id));

    assert!(kitchen.store.fetch(Uuid::new_v4()).unwrap().is_none());
}
