//! The canonical EURING field table.
//!
//! [`Schema`] holds the 64 field definitions in canonical order together
//! with a key index and the [`TypeRules`] used for character checks. The
//! EURING2000 layout is the first 33 fields, EURING2000+ the first 60, and
//! EURING2020 all of them.
//!
//! The standard table is built once and shared:
//!
//! ```
//! use euring::{EuringFormat, Schema};
//!
//! let schema = Schema::standard();
//! assert_eq!(schema.fields_for(EuringFormat::Euring2000).len(), 33);
//! assert_eq!(schema.field("ringing_scheme").unwrap().name, "Ringing Scheme");
//! ```
//!
//! Callers that need descriptions or different letter rules build their own
//! copy:
//!
//! ```
//! use euring::{Lookup, Schema};
//!
//! let schema = Schema::default()
//!     .with_lookup("sex_mentioned", Lookup::table([("M", "Male"), ("F", "Female")]))
//!     .unwrap();
//! assert!(schema.field("sex_mentioned").unwrap().lookup.is_some());
//! ```

use crate::error::{EuringError, Result};
use crate::field::FieldDefinition;
use crate::field_type::{FieldType, TypeRules};
use crate::formats::{EuringFormat, EURING2000_RECORD_LENGTH};
use crate::lookup::Lookup;
use crate::parsers;
use crate::utils::pad_identification_number;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::Arc;

/// Fields that only exist in EURING2020.
pub const EURING2020_ONLY_KEYS: [&str; 4] = [
    "latitude",
    "longitude",
    "current_place_code",
    "more_other_marks",
];

lazy_static! {
    static ref STANDARD: Arc<Schema> = Arc::new(Schema::default());
}

/// Ordered field definitions with a key index.
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<FieldDefinition>,
    index: HashMap<&'static str, usize>,
    positions: Vec<usize>,
    type_rules: TypeRules,
}

impl Default for Schema {
    fn default() -> Self {
        Schema::from_fields(standard_fields())
    }
}

impl Schema {
    /// The shared standard schema.
    #[must_use]
    pub fn standard() -> Arc<Schema> {
        Arc::clone(&STANDARD)
    }

    fn from_fields(fields: Vec<FieldDefinition>) -> Self {
        let index = fields
            .iter()
            .enumerate()
            .map(|(i, field)| (field.key, i))
            .collect();

        let mut positions = Vec::new();
        let mut offset = 0;
        for field in fields.iter().take(EuringFormat::Euring2000.field_count()) {
            positions.push(offset);
            offset += field.length.unwrap_or(0);
        }
        debug_assert_eq!(offset, EURING2000_RECORD_LENGTH);

        Schema {
            fields,
            index,
            positions,
            type_rules: TypeRules::default(),
        }
    }

    /// All 64 definitions in canonical order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    /// The definitions making up `format`, in wire order.
    #[must_use]
    pub fn fields_for(&self, format: EuringFormat) -> &[FieldDefinition] {
        &self.fields[..format.field_count()]
    }

    /// Look up a definition by key.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FieldDefinition> {
        self.index.get(key).map(|&i| &self.fields[i])
    }

    /// Canonical position of a key.
    #[must_use]
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Canonical position of a key, failing for unknown keys.
    ///
    /// # Errors
    ///
    /// Returns [`EuringError::UnknownField`] if the key is not in the table.
    pub fn require(&self, key: &str) -> Result<usize> {
        self.index_of(key)
            .ok_or_else(|| EuringError::UnknownField(key.to_string()))
    }

    /// Zero-based start offset and width of a EURING2000 field.
    #[must_use]
    pub fn fixed_width_span(&self, index: usize) -> Option<(usize, usize)> {
        let start = *self.positions.get(index)?;
        Some((start, self.fields[index].length.unwrap_or(0)))
    }

    /// Character-class rules in effect.
    #[must_use]
    pub fn type_rules(&self) -> &TypeRules {
        &self.type_rules
    }

    /// Replace the character-class rules.
    #[must_use]
    pub fn with_type_rules(mut self, rules: TypeRules) -> Self {
        self.type_rules = rules;
        self
    }

    /// Attach a description lookup to a field.
    ///
    /// # Errors
    ///
    /// Returns [`EuringError::UnknownField`] if the key is not in the table.
    pub fn with_lookup(mut self, key: &str, lookup: Lookup) -> Result<Self> {
        let i = self.require(key)?;
        self.fields[i].lookup = Some(lookup);
        Ok(self)
    }

    /// Attach table lookups from JSON of the form
    /// `{"field_key": {"code": "description", ...}, ...}`.
    ///
    /// # Errors
    ///
    /// Returns a JSON error for malformed input and
    /// [`EuringError::UnknownField`] for keys outside the table.
    pub fn with_lookup_tables(self, json: &str) -> Result<Self> {
        let tables: IndexMap<String, IndexMap<String, String>> = serde_json::from_str(json)?;
        tables
            .into_iter()
            .try_fold(self, |schema, (key, table)| {
                schema.with_lookup(&key, Lookup::Table(table))
            })
    }
}

fn code(
    key: &'static str,
    name: &'static str,
    field_type: FieldType,
    length: usize,
) -> FieldDefinition {
    FieldDefinition::new(key, name, field_type).length(length)
}

fn measurement(key: &'static str, name: &'static str) -> FieldDefinition {
    FieldDefinition::new(key, name, FieldType::Numeric)
        .max_length(5)
        .optional()
}

fn free_text(key: &'static str, name: &'static str) -> FieldDefinition {
    FieldDefinition::new(key, name, FieldType::Text)
        .optional()
        .known_only()
}

#[allow(clippy::too_many_lines)]
fn standard_fields() -> Vec<FieldDefinition> {
    use FieldType::{Alphabetic, Alphanumeric, Integer, NumericSigned, Text};

    vec![
        // EURING2000: 33 fields, 94 characters.
        code("ringing_scheme", "Ringing Scheme", Alphabetic, 3),
        code("primary_identification_method", "Primary Identification Method", Alphanumeric, 2),
        code("identification_number", "Identification Number (ring)", Text, 10)
            .parser(parsers::ring_number)
            .exporter(pad_identification_number),
        code("verification_of_the_metal_ring", "Verification of the Metal Ring", Integer, 1),
        code("metal_ring_information", "Metal Ring Information", Integer, 1),
        code("other_marks_information", "Other Marks Information", Alphabetic, 2),
        code("species_mentioned", "Species Mentioned", Integer, 5),
        code("species_concluded", "Species Concluded", Integer, 5),
        code("manipulated", "Manipulated", Alphabetic, 1),
        code("moved_before_recovery", "Moved Before Recovery", Integer, 1),
        code("catching_method", "Catching Method", Alphabetic, 1),
        code("catching_lures", "Catching Lures", Alphabetic, 1),
        code("sex_mentioned", "Sex Mentioned", Alphabetic, 1),
        code("sex_concluded", "Sex Concluded", Alphabetic, 1),
        code("age_mentioned", "Age Mentioned", Alphanumeric, 1),
        code("age_concluded", "Age Concluded", Alphanumeric, 1),
        code("status", "Status", Alphabetic, 1),
        code("brood_size", "Brood Size", Integer, 2),
        code("pullus_age", "Pullus Age", Integer, 2),
        code("accuracy_of_pullus_age", "Accuracy of Pullus Age", Alphanumeric, 1),
        code("date", "Date", Integer, 8)
            .known_only()
            .parser(parsers::date),
        code("accuracy_of_date", "Accuracy of Date", Integer, 1),
        code("time", "Time", Text, 4).parser(parsers::time),
        code("place_code", "Place Code", Text, 4).parser(parsers::place_code),
        code("geographical_coordinates", "Geographical Co-ordinates", Text, 15)
            .empty_value(parsers::EMPTY_COORDINATES)
            .parser(parsers::geographical_coordinates),
        code("accuracy_of_coordinates", "Accuracy of Co-ordinates", Alphanumeric, 1),
        code("condition", "Condition", Integer, 1),
        code("circumstances", "Circumstances", Integer, 2),
        code("circumstances_presumed", "Circumstances Presumed", Integer, 1),
        code("euring_code_identifier", "EURING Code Identifier", Integer, 1),
        FieldDefinition::new("distance", "Derived Data - Distance", Integer)
            .max_length(5)
            .optional(),
        code("direction", "Derived Data - Direction", Integer, 3)
            .optional()
            .parser(parsers::direction),
        FieldDefinition::new("elapsed_time", "Derived Data - Elapsed Time", Integer)
            .max_length(5)
            .optional(),
        // EURING2000+: 27 more fields.
        measurement("wing_length", "Wing Length"),
        measurement("third_primary", "Third Primary"),
        code("state_of_wing_point", "State of Wing Point", Alphabetic, 1).optional(),
        measurement("mass", "Mass"),
        code("moult", "Moult", Alphabetic, 1).optional(),
        code("plumage_code", "Plumage Code", Alphanumeric, 1).optional(),
        measurement("hind_claw", "Hind Claw"),
        measurement("bill_length", "Bill Length"),
        code("bill_method", "Bill Method", Alphabetic, 1).optional(),
        measurement("total_head_length", "Total Head Length"),
        measurement("tarsus", "Tarsus"),
        code("tarsus_method", "Tarsus Method", Alphabetic, 1).optional(),
        measurement("tail_length", "Tail Length"),
        FieldDefinition::new("tail_difference", "Tail Difference", NumericSigned)
            .max_length(5)
            .optional(),
        code("fat_score", "Fat Score", Integer, 1).optional(),
        code("fat_score_method", "Fat Score Method", Alphabetic, 1).optional(),
        code("pectoral_muscle", "Pectoral Muscle Score", Integer, 1).optional(),
        code("brood_patch", "Brood Patch", Alphanumeric, 1).optional(),
        FieldDefinition::new("primary_score", "Primary Score", Integer)
            .max_length(2)
            .optional(),
        code("primary_moult", "Primary Moult", Alphanumeric, 10).optional(),
        code("old_greater_coverts", "Old Greater Coverts", Alphanumeric, 1)
            .optional()
            .parser(parsers::old_greater_coverts),
        code("alula", "Alula", Integer, 1).optional(),
        code("carpal_covert", "Carpal Covert", Integer, 1).optional(),
        code("sexing_method", "Sexing Method", Alphabetic, 1).optional(),
        free_text("place_name", "Place Name"),
        free_text("remarks", "Remarks"),
        free_text("reference", "Reference"),
        // EURING2020: 4 more fields.
        FieldDefinition::new("latitude", "Latitude", NumericSigned)
            .max_length(8)
            .optional()
            .known_only()
            .parser(parsers::latitude),
        FieldDefinition::new("longitude", "Longitude", NumericSigned)
            .max_length(9)
            .optional()
            .known_only()
            .parser(parsers::longitude),
        code("current_place_code", "Current Place Code", Text, 4)
            .optional()
            .parser(parsers::place_code),
        FieldDefinition::new("more_other_marks", "More Other Marks", Alphabetic).optional(),
    ]
}
