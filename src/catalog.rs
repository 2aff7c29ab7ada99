//! Static mapping from form field names (the HTML `name` attribute of the
//! search form, i.e. the GET parameters) to what they search in the database.
//!
//! The table is built once and never mutated. Names that are not in it are
//! ignored by every caller; an unknown field simply adds no constraint.

use std::collections::HashMap;

use lazy_static::lazy_static;

/// How a field is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Multi-valued, exact (case-insensitive) match against a value list.
    SelectList,
    /// Free text matched through the full-text index over parameter values.
    TextParam,
    /// Free text matched through the full-text index over a main-table column.
    TextMain,
    /// Single numeric exact match.
    Identifier,
}

/// The record a field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    /// Idioms live in the `strategy` table, aliased `i` in the templates.
    Idiom,
    Sentence,
}

impl Entity {
    /// Table name (and column prefix) used in the schema.
    pub fn table(&self) -> &'static str {
        match self {
            Entity::Idiom => "strategy",
            Entity::Sentence => "sentence",
        }
    }
    /// Alias of the entity's main table in the query templates.
    pub fn alias(&self) -> &'static str {
        match self {
            Entity::Idiom => "i",
            Entity::Sentence => "s",
        }
    }
}

/// What a field resolves to in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// A `parameter_definition_id` in the `*_data` tables.
    Parameter(&'static str),
    /// A column of the main table (or its full-text index).
    Column(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterDefinition {
    pub name: &'static str,
    pub category: Category,
    pub entity: Entity,
    pub target: Target,
}

impl ParameterDefinition {
    const fn new(name: &'static str, category: Category, entity: Entity, target: Target) -> Self {
        Self { name, category, entity, target }
    }
}

use Category::*;
use Entity::*;
use Target::*;

/// Every recognized form field. Some parameter ids differ from the field name,
/// so shorter GET names can be introduced without touching the database.
pub static DEFINITIONS: &[ParameterDefinition] = &[
    // idiom select lists
    ParameterDefinition::new("Voice", SelectList, Idiom, Parameter("Voice1")),
    ParameterDefinition::new("Tense", SelectList, Idiom, Parameter("Tense1")),
    ParameterDefinition::new("Aspect", SelectList, Idiom, Parameter("Aspect1")),
    ParameterDefinition::new("Modality", SelectList, Idiom, Parameter("Modality1")),
    ParameterDefinition::new("OpenPosition", SelectList, Idiom, Parameter("OpenPosition1")),
    ParameterDefinition::new("OpenAnimacy", SelectList, Idiom, Parameter("OpenAnimacy1")),
    ParameterDefinition::new("SpecialVerb", SelectList, Idiom, Parameter("SpecialVerb1")),
    ParameterDefinition::new("DODeterminer", SelectList, Idiom, Parameter("DODeterminer1")),
    ParameterDefinition::new("Modifier", SelectList, Idiom, Parameter("Modifier1")),
    ParameterDefinition::new("PossType", SelectList, Idiom, Parameter("PossType1")),
    ParameterDefinition::new("Alienability", SelectList, Idiom, Parameter("Alienability1")),
    // dialects group idioms, so this one is a column of the idiom table
    ParameterDefinition::new("Dialect", SelectList, Idiom, Column("strategy_answerset_id")),
    // sentence select lists
    ParameterDefinition::new("ManipulatedProperty", SelectList, Sentence, Parameter("Property1")),
    ParameterDefinition::new("DeterminerManipulations", SelectList, Sentence, Parameter("DeterminerManipulations1")),
    ParameterDefinition::new("ModalityManipulations", SelectList, Sentence, Parameter("ModalityManipulations1")),
    ParameterDefinition::new("PossessiveManipulations", SelectList, Sentence, Parameter("PossessiveManipulations1")),
    ParameterDefinition::new("ExternalPossessionManipulation", SelectList, Sentence, Parameter("ExternalPossessionManipulation")),
    ParameterDefinition::new("FutureWordenManipulations", SelectList, Sentence, Parameter("FutureWordenManipulations1")),
    ParameterDefinition::new("TenseVoiceAspectManipulations", SelectList, Sentence, Parameter("TenseVoiceAspectManipulations1")),
    // free text over parameter values
    ParameterDefinition::new("GenStructure", TextParam, Idiom, Parameter("GenStructure1")),
    ParameterDefinition::new("IdiomNotes", TextParam, Idiom, Parameter("IdiomNotes1")),
    ParameterDefinition::new("Judgments", TextParam, Sentence, Parameter("s:judgments1")),
    // free text over main table columns
    ParameterDefinition::new("Idiom", TextMain, Idiom, Column("strategy_name")),
    ParameterDefinition::new("Meaning", TextMain, Idiom, Column("strategy_description")),
    ParameterDefinition::new("Original", TextMain, Sentence, Column("original")),
    ParameterDefinition::new("Gloss", TextMain, Sentence, Column("gloss")),
    ParameterDefinition::new("Translation", TextMain, Sentence, Column("translation")),
    // numeric identifier
    ParameterDefinition::new("SentenceID", Identifier, Sentence, Column("sentence_id")),
];

lazy_static! {
    static ref BY_NAME: HashMap<&'static str, &'static ParameterDefinition> =
        DEFINITIONS.iter().map(|d| (d.name, d)).collect();
}

/// Full definition of a form field, `None` when the field is not recognized.
pub fn definition(name: &str) -> Option<&'static ParameterDefinition> {
    BY_NAME.get(name).copied()
}

/// Category of a form field, `None` when the field is not recognized.
pub fn classify(name: &str) -> Option<Category> {
    definition(name).map(|d| d.category)
}
