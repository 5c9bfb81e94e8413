#![deny(unsafe_code)]

//! Input document loading for form generation.

pub mod documents;
pub mod error;
pub mod loader;

pub use documents::{
    FieldsDocument, parse_area_configs, parse_area_map, parse_fields_document,
    parse_label_mappings,
};
pub use error::{IngestError, Result};
pub use loader::{FormInputs, InputFiles, load_inputs, read_json, read_optional_json};
