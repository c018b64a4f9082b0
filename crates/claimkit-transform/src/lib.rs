//! claimkit Transform
//!
//! Converts typed domain records into documents of deterministically
//! identified claims.
//!
//! # Overview
//!
//! Every record type declares a [`RecordSchema`]: an ordered table of fields
//! with their binding options (document identity, property mnemonic,
//! declared kind, value-kind hint, unit, cardinality, default fill). The engine
//! resolves the schema against a [`MnemonicTable`](claimkit_domain::MnemonicTable), walks
//! the record's values in declaration order and builds one claim per
//! non-empty value. Every rule that does not depend on record data, such as a
//! hint the declared kind cannot honour, fails resolution.
//!
//! # Architecture
//!
//! ```text
//! Record → Resolver → Engine → Text safety → Document
//! ```
//!
//! # Key Features
//!
//! - **Deterministic ids**: claim ids derive from the document's natural key,
//!   the property mnemonic and a per-context sequence index
//! - **Composites**: a "value + meta" field becomes one claim qualified by meta claims
//! - **Embedding**: unbound nested records are flattened into their parent
//! - **Cardinality**: `min..max` bounds with `none`/`unknown` default fill
//!
//! # Example Usage
//!
//! ```
//! use claimkit_domain::{MnemonicTable, Property};
//! use claimkit_transform::{transform, FieldSchema, FieldValue, Record, RecordSchema};
//!
//! struct Product {
//!     schema: RecordSchema,
//!     sku: String,
//!     name: String,
//! }
//!
//! impl Record for Product {
//!     fn schema(&self) -> &RecordSchema {
//!         &self.schema
//!     }
//!
//!     fn values(&self) -> Vec<FieldValue> {
//!         vec![
//!             FieldValue::sequence(["shop", self.sku.as_str()]),
//!             FieldValue::single(self.name.as_str()),
//!         ]
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mnemonics = MnemonicTable::from_properties(&[Property::core("NAME", "name")])?;
//! let schema = RecordSchema::new()
//!     .field(FieldSchema::new("Id").document_id())
//!     .field(FieldSchema::new("Name").property("NAME"));
//!
//! let product = Product { schema, sku: "A-1".to_string(), name: "Widget".to_string() };
//! let documents = transform(&mnemonics, &[product])?;
//!
//! assert_eq!(documents[0].claim_count(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod engine;
mod error;
mod resolver;
mod schema;
mod text;
mod value;


pub use config::TransformConfig;
pub use engine::{transform, Transformer};
pub use error::{ErrorClass, Result, TransformError};
pub use resolver::{resolve, BoundField, Composite, FieldRole, ResolvedField, ResolvedSchema, ValueField};
pub use schema::{
    Cardinality, DefaultFill, FieldOptions, FieldSchema, RecordSchema, ValueHint, ValueKind, SKIP_MNEMONIC,
};
pub use text::{escape_html, HtmlPolicy, TextSafety, ALLOWED_SCHEMES, LINK_REL};
pub use value::{FieldValue, IntervalValue, Record, TimeValue, Value};
