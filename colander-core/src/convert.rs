//! Converts a recipe amount into an ingredient's shopping unit.
//!
//! Strategies run in strict priority order: same unit, ingredient-specific
//! rule, standard category table. When all three miss and the item carries a
//! size qualifier, the ingredient's size estimation rule supplies an
//! effective (quantity, unit) pair and the ladder runs once more. Anything
//! still unresolved is a hard error; a silently defaulted quantity would
//! corrupt the shopping list.

use uuid::Uuid;

use crate::error::GenerateError;
use crate::types::{Ingredient, SizeQualifier};
use crate::units::{standard_convert, UnitCatalog};

/// A resolved amount and the unit it is denominated in: the ingredient's
/// shopping unit, except for special-category pass-through which keeps the
/// source unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Converted {
    pub quantity: f64,
    pub unit_id: Uuid,
}

type Strategy = fn(&Ingredient, f64, Uuid, &UnitCatalog) -> Option<f64>;

/// Priority order matters: an explicit rule must win over the generic table.
const STRATEGIES: &[Strategy] = &[same_unit, ingredient_rule, category_table];

pub fn to_shopping_unit(
    ingredient: &Ingredient,
    quantity: f64,
    from_unit_id: Uuid,
    size_qualifier: Option<SizeQualifier>,
    catalog: &UnitCatalog,
) -> Result<Converted, GenerateError> {
    // Special units ("to taste") never take part in numeric conversion; the
    // written amount passes through in its own unit.
    if catalog.is_special(from_unit_id) || catalog.is_special(ingredient.shopping_unit_id) {
        return Ok(Converted {
            quantity,
            unit_id: from_unit_id,
        });
    }

    if let Some(converted) = run_ladder(ingredient, quantity, from_unit_id, catalog) {
        return Ok(Converted {
            quantity: converted,
            unit_id: ingredient.shopping_unit_id,
        });
    }

    // Last resort: size estimation turns "2 medium" into an amount in the
    // rule's reference unit, then the ladder runs once more. No recursion
    // back into size estimation.
    if let Some(rule) = size_qualifier.and_then(|q| ingredient.size_rule(q)) {
        tracing::debug!(
            ingredient = %ingredient.name,
            qualifier = rule.size_qualifier.as_str(),
            "falling back to size estimation"
        );
        let estimated = quantity * rule.reference_value;
        if let Some(converted) = run_ladder(ingredient, estimated, rule.reference_unit_id, catalog)
        {
            return Ok(Converted {
                quantity: converted,
                unit_id: ingredient.shopping_unit_id,
            });
        }
    }

    Err(GenerateError::NoConversionPath {
        ingredient: ingredient.name.clone(),
        from_unit: catalog.display_name(from_unit_id),
        to_unit: catalog.display_name(ingredient.shopping_unit_id),
    })
}

fn run_ladder(
    ingredient: &Ingredient,
    quantity: f64,
    from_unit_id: Uuid,
    catalog: &UnitCatalog,
) -> Option<f64> {
    STRATEGIES
        .iter()
        .find_map(|strategy| strategy(ingredient, quantity, from_unit_id, catalog))
}

fn same_unit(
    ingredient: &Ingredient,
    quantity: f64,
    from_unit_id: Uuid,
    _catalog: &UnitCatalog,
) -> Option<f64> {
    (from_unit_id == ingredient.shopping_unit_id).then_some(quantity)
}

fn ingredient_rule(
    ingredient: &Ingredient,
    quantity: f64,
    from_unit_id: Uuid,
    _catalog: &UnitCatalog,
) -> Option<f64> {
    ingredient
        .rule_from(from_unit_id)
        .filter(|rule| rule.to_unit_id == ingredient.shopping_unit_id)
        .map(|rule| quantity * rule.factor)
}

fn category_table(
    ingredient: &Ingredient,
    quantity: f64,
    from_unit_id: Uuid,
    catalog: &UnitCatalog,
) -> Option<f64> {
    let from = catalog.get(from_unit_id)?;
    let to = catalog.get(ingredient.shopping_unit_id)?;
    standard_convert(quantity, from, to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ConversionRule, SizeEstimationRule, UnitCategory, UnitType};

    struct Fixture {
        catalog: UnitCatalog,
        cup: Uuid,
        fluid_ounce: Uuid,
        gram: Uuid,
        kilogram: Uuid,
        piece: Uuid,
        to_taste: Uuid,
    }

    fn fixture() -> Fixture {
        let units = vec![
            ("cup", UnitCategory::Volume),
            ("fluid_ounce", UnitCategory::Volume),
            ("gram", UnitCategory::Weight),
            ("kilogram", UnitCategory::Weight),
            ("piece", UnitCategory::Count),
            ("to_taste", UnitCategory::Special),
        ];
        let units: Vec<UnitType> = units
            .into_iter()
            .map(|(name, category)| UnitType {
                id: Uuid::new_v4(),
                name: name.to_string(),
                category,
            })
            .collect();
        let id_of = |name: &str| units.iter().find(|u| u.name == name).map(|u| u.id);
        Fixture {
            cup: id_of("cup").unwrap(),
            fluid_ounce: id_of("fluid_ounce").unwrap(),
            gram: id_of("gram").unwrap(),
            kilogram: id_of("kilogram").unwrap(),
            piece: id_of("piece").unwrap(),
            to_taste: id_of("to_taste").unwrap(),
            catalog: UnitCatalog::from_units(units),
        }
    }

    fn ingredient(name: &str, shopping_unit_id: Uuid) -> Ingredient {
        Ingredient {
            id: Uuid::new_v4(),
            name: name.to_string(),
            type_id: Uuid::new_v4(),
            type_name: "Vegetables".to_string(),
            shopping_unit_id,
            conversion_rules: vec![],
            size_rules: vec![],
        }
    }

    #[test]
    fn test_same_unit_is_returned_unchanged() {
        let fx = fixture();
        let onion = ingredient("Onion", fx.piece);

        let converted = to_shopping_unit(&onion, 2.5, fx.piece, None, &fx.catalog).unwrap();
        assert_eq!(converted.quantity, 2.5);
        assert_eq!(converted.unit_id, fx.piece);
    }

    #[test]
    fn test_ingredient_rule_multiplies_exactly() {
        let fx = fixture();
        let mut garlic = ingredient("Garlic", fx.piece);
        garlic.conversion_rules.push(ConversionRule {
            from_unit_id: fx.gram,
            to_unit_id: fx.piece,
            factor: 0.1,
        });

        let converted = to_shopping_unit(&garlic, 30.0, fx.gram, None, &fx.catalog).unwrap();
        assert!((converted.quantity - 3.0).abs() < 1e-9);
        assert_eq!(converted.unit_id, fx.piece);
    }

    #[test]
    fn test_explicit_rule_wins_over_category_table() {
        let fx = fixture();
        // Standard table says 1 cup = 8 fluid ounces; the rule says 9.
        let mut broth = ingredient("Broth", fx.fluid_ounce);
        broth.conversion_rules.push(ConversionRule {
            from_unit_id: fx.cup,
            to_unit_id: fx.fluid_ounce,
            factor: 9.0,
        });

        let converted = to_shopping_unit(&broth, 1.0, fx.cup, None, &fx.catalog).unwrap();
        assert!((converted.quantity - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_category_table_applies_without_rule() {
        let fx = fixture();
        let broth = ingredient("Broth", fx.fluid_ounce);

        let converted = to_shopping_unit(&broth, 2.0, fx.cup, None, &fx.catalog).unwrap();
        assert!((converted.quantity - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_size_fallback_resolves_through_category_path() {
        let fx = fixture();
        let mut onion = ingredient("Onion", fx.kilogram);
        onion.size_rules.push(SizeEstimationRule {
            size_qualifier: SizeQualifier::Medium,
            reference_value: 150.0,
            reference_unit_id: fx.gram,
        });

        // No rule for piece; 2 medium pieces = 300 g = 0.3 kg.
        let converted = to_shopping_unit(
            &onion,
            2.0,
            fx.piece,
            Some(SizeQualifier::Medium),
            &fx.catalog,
        )
        .unwrap();
        assert!((converted.quantity - 0.3).abs() < 1e-9);
        assert_eq!(converted.unit_id, fx.kilogram);
    }

    #[test]
    fn test_size_fallback_does_not_recurse() {
        let fx = fixture();
        // Reference unit is a count unit with no path to the shopping unit,
        // so the single retry misses and the whole conversion fails.
        let mut onion = ingredient("Onion", fx.kilogram);
        onion.size_rules.push(SizeEstimationRule {
            size_qualifier: SizeQualifier::Medium,
            reference_value: 1.0,
            reference_unit_id: fx.piece,
        });

        let result = to_shopping_unit(
            &onion,
            2.0,
            fx.piece,
            Some(SizeQualifier::Medium),
            &fx.catalog,
        );
        assert!(matches!(
            result,
            Err(GenerateError::NoConversionPath { .. })
        ));
    }

    #[test]
    fn test_special_source_unit_passes_through() {
        let fx = fixture();
        let salt = ingredient("Salt", fx.gram);

        let converted = to_shopping_unit(&salt, 1.0, fx.to_taste, None, &fx.catalog).unwrap();
        assert_eq!(converted.quantity, 1.0);
        assert_eq!(converted.unit_id, fx.to_taste);
    }

    #[test]
    fn test_special_shopping_unit_passes_through_in_source_unit() {
        let fx = fixture();
        let seasoning = ingredient("Seasoning", fx.to_taste);

        let converted = to_shopping_unit(&seasoning, 2.0, fx.gram, None, &fx.catalog).unwrap();
        assert_eq!(converted.quantity, 2.0);
        assert_eq!(converted.unit_id, fx.gram);
    }

    #[test]
    fn test_no_path_is_an_error_with_context() {
        let fx = fixture();
        let rice = ingredient("Rice", fx.piece);

        let err = to_shopping_unit(&rice, 1.0, fx.cup, None, &fx.catalog).unwrap_err();
        match err {
            GenerateError::NoConversionPath {
                ingredient,
                from_unit,
                to_unit,
            } => {
                assert_eq!(ingredient, "Rice");
                assert_eq!(from_unit, "cup");
                assert_eq!(to_unit, "piece");
            }
            other => panic!("expected NoConversionPath, got {other:?}"),
        }
    }
}
