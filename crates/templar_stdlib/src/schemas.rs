//! Reference item, recipe, and construction schemas.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use templar_engine::{Schema, Template, TemplateHeader, Templates, field};
use templar_foundation::{FieldKind, List, Result, Value};
use templar_storage::RecordStore;
use tracing::debug;

use crate::converters::{RANGE, REQUIREMENTS, standard_converters};
use crate::namespaces::{CONSTRUCTION, ITEM, RECIPE};
use crate::types::{Component, IntRange, Quality};

macro_rules! header_accessors {
    () => {
        fn header(&self) -> &TemplateHeader {
            &self.header
        }

        fn header_mut(&mut self) -> &mut TemplateHeader {
            &mut self.header
        }
    };
}

fn qualities() -> FieldKind {
    FieldKind::list(FieldKind::Map)
}

fn strings() -> FieldKind {
    FieldKind::list(FieldKind::String)
}

// =============================================================================
// Items
// =============================================================================

/// Any item: tools, weapons, armor, food.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemTemplate {
    /// Identity stamped by the materializer.
    pub header: TemplateHeader,
    /// Display name.
    pub name: String,
    /// Flavor text.
    pub description: String,
    /// Weight in grams.
    pub weight: i64,
    /// Volume in liters.
    pub volume: f64,
    /// Base price in cents.
    pub price: i64,
    /// Charges held when full.
    pub max_charges: i64,
    /// Tool qualities.
    pub qualities: Vec<Quality>,
    /// Behavior flags.
    pub flags: Vec<String>,
    /// Materials, most significant first.
    pub material: Vec<String>,
    /// Melee damage.
    pub damage: IntRange,
    /// Map glyph; superseded by tileset lookups.
    pub symbol: String,
}

impl ItemTemplate {
    /// Returns the level of `quality`, if the item has it.
    #[must_use]
    pub fn quality_level(&self, quality: &str) -> Option<i64> {
        self.qualities
            .iter()
            .filter(|q| q.id == quality)
            .map(|q| q.level)
            .max()
    }

    /// Returns true if the item carries `flag`.
    #[must_use]
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }
}

impl Template for ItemTemplate {
    const NAMESPACE: &'static str = ITEM;
    const TYPE_NAME: &'static str = "ItemTemplate";

    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<ItemTemplate>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::builder(Self::TYPE_NAME)
                .field(field!(ItemTemplate, name, FieldKind::String).required())
                .field(field!(ItemTemplate, description, FieldKind::String))
                .field(field!(ItemTemplate, weight, FieldKind::Int))
                .field(field!(ItemTemplate, volume, FieldKind::Float))
                .field(field!(ItemTemplate, price, FieldKind::Int))
                .field(field!(ItemTemplate, max_charges, FieldKind::Int))
                .field(field!(ItemTemplate, qualities, qualities()))
                .field(field!(ItemTemplate, flags, strings()))
                .field(field!(ItemTemplate, material, strings()))
                .field(field!(ItemTemplate, damage, RANGE).with_default(vec![0, 0]))
                .field(field!(ItemTemplate, symbol, FieldKind::String).obsolete())
                .build()
        })
    }

    header_accessors!();
}

// =============================================================================
// Recipes
// =============================================================================

/// A crafting recipe or uncraft (disassembly) entry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeTemplate {
    /// Identity stamped by the materializer.
    pub header: TemplateHeader,
    /// Item produced.
    pub result: String,
    /// Distinguishes alternative recipes for the same result.
    pub id_suffix: String,
    /// Crafting menu category.
    pub category: String,
    /// Governing skill.
    pub skill_used: String,
    /// Skill level needed.
    pub difficulty: i64,
    /// Crafting time in moves.
    pub time: i64,
    /// Consumed components.
    pub components: Vec<Component>,
    /// Tool qualities needed.
    pub qualities: Vec<Quality>,
}

impl Template for RecipeTemplate {
    const NAMESPACE: &'static str = RECIPE;
    const TYPE_NAME: &'static str = "RecipeTemplate";

    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<RecipeTemplate>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::builder(Self::TYPE_NAME)
                .field(field!(RecipeTemplate, result, FieldKind::String).required())
                .field(field!(RecipeTemplate, id_suffix, FieldKind::String))
                .field(field!(RecipeTemplate, category, FieldKind::String))
                .field(field!(RecipeTemplate, skill_used, FieldKind::String))
                .field(field!(RecipeTemplate, difficulty, FieldKind::Int))
                .field(field!(RecipeTemplate, time, FieldKind::Int))
                .field(field!(RecipeTemplate, components, REQUIREMENTS).with_default(List::new()))
                .field(field!(RecipeTemplate, qualities, qualities()))
                .build()
        })
    }

    header_accessors!();
}

// =============================================================================
// Constructions
// =============================================================================

/// A terrain construction step.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstructionTemplate {
    /// Identity stamped by the materializer.
    pub header: TemplateHeader,
    /// Construction menu group.
    pub category: String,
    /// What is being built.
    pub description: String,
    /// Governing skill.
    pub required_skill: String,
    /// Skill level needed.
    pub difficulty: i64,
    /// Time in minutes.
    pub time: i64,
    /// Consumed components.
    pub components: Vec<Component>,
    /// Terrain required before building, if any.
    pub pre_terrain: Option<String>,
    /// Terrain left afterwards, if any.
    pub post_terrain: Option<String>,
}

impl Template for ConstructionTemplate {
    const NAMESPACE: &'static str = CONSTRUCTION;
    const TYPE_NAME: &'static str = "ConstructionTemplate";

    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<ConstructionTemplate>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::builder(Self::TYPE_NAME)
                .field(field!(ConstructionTemplate, category, FieldKind::String).required())
                .field(field!(ConstructionTemplate, description, FieldKind::String).required())
                .field(field!(ConstructionTemplate, required_skill, FieldKind::String))
                .field(field!(ConstructionTemplate, difficulty, FieldKind::Int))
                .field(field!(ConstructionTemplate, time, FieldKind::Int))
                .field(
                    field!(ConstructionTemplate, components, REQUIREMENTS)
                        .with_default(List::new()),
                )
                .field(
                    field!(ConstructionTemplate, pre_terrain, FieldKind::String)
                        .with_default(Value::Null),
                )
                .field(
                    field!(ConstructionTemplate, post_terrain, FieldKind::String)
                        .with_default(Value::Null),
                )
                .build()
        })
    }

    header_accessors!();
}

// =============================================================================
// Facade
// =============================================================================

/// Wraps `store` in a [`Templates`] facade with the standard converters and
/// all three reference schemas registered.
///
/// # Errors
///
/// Returns an error if a schema's namespace is missing from the store's
/// namespace table.
pub fn standard_templates(store: RecordStore) -> Result<Templates> {
    debug!(
        records = store.len(),
        skipped = store.skipped(),
        "registering standard templates"
    );
    Templates::new(store, standard_converters())
        .with_template::<ItemTemplate>()?
        .with_template::<RecipeTemplate>()?
        .with_template::<ConstructionTemplate>()
}
