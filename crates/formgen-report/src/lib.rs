//! Form descriptor generation.
//!
//! This crate turns a grouped layout into the files consumed by the screen
//! framework:
//!
//! - **Block form XML**: areas, ordered fields, controls, filters and field links
//! - **Properties**: area titles and field labels, Java properties escaped
//! - **Screen XML**: optional function screen hosting the block form

mod common;
mod form_xml;
mod output;
mod properties;
mod screen_xml;

pub use common::{AreaTitles, DEFAULT_FATHER_ID, ReportOptions};
pub use form_xml::{form_xml_file_name, render_form_xml};
pub use output::{
    Artifact, ArtifactKind, WrittenFile, render_artifacts, write_artifacts, write_atomic,
};
pub use properties::{escape_key, escape_value, properties_file_name, render_properties};
pub use screen_xml::{render_screen_xml, screen_function_id, screen_xml_file_name};
