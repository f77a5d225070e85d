//! The standard namespace table.

use templar_storage::{IdRule, NamespaceConfig, NamespaceTable};

/// Namespace of item templates.
pub const ITEM: &str = "item";
/// Namespace of recipe and uncraft templates.
pub const RECIPE: &str = "recipe";
/// Namespace of construction templates.
pub const CONSTRUCTION: &str = "construction";

/// Type tags filed under [`ITEM`].
pub const ITEM_TYPES: [&str; 10] = [
    "ARMOR",
    "GUN",
    "TOOL",
    "GENERIC",
    "COMESTIBLE",
    "AMMO",
    "BOOK",
    "MAGAZINE",
    "CONTAINER",
    "TOOL_ARMOR",
];

/// Type tags filed under [`RECIPE`].
pub const RECIPE_TYPES: [&str; 2] = ["RECIPE", "UNCRAFT"];

/// Type tags filed under [`CONSTRUCTION`].
pub const CONSTRUCTION_TYPES: [&str; 1] = ["CONSTRUCTION"];

/// Builds the item, recipe, and construction namespaces.
///
/// Recipes fall back to `result` (plus `id_suffix`) for their identifier,
/// constructions to their normalized category and description.
#[must_use]
pub fn standard_namespaces() -> NamespaceTable {
    let mut table = NamespaceTable::new();
    for config in [
        NamespaceConfig::new(ITEM).with_type_tags(ITEM_TYPES),
        NamespaceConfig::new(RECIPE)
            .with_type_tags(RECIPE_TYPES)
            .with_id_rule(IdRule::ResultWithSuffix),
        NamespaceConfig::new(CONSTRUCTION)
            .with_type_tags(CONSTRUCTION_TYPES)
            .with_id_rule(IdRule::CategoryDescription),
    ] {
        // Names and tags above are distinct, so registration cannot fail.
        if let Err(e) = table.register(config) {
            unreachable!("standard namespace table is inconsistent: {e}");
        }
    }
    table
}
