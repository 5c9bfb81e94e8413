//! Shared constants and XML helpers.

use std::io::Write;

use anyhow::Result;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use serde::{Deserialize, Serialize};

use formgen_model::Area;

/// JAXB binding namespace.
pub const JAXB_NS: &str = "http://java.sun.com/xml/ns/jaxb";

/// JAXB XJC extension namespace.
pub const XJC_NS: &str = "http://java.sun.com/xml/ns/jaxb/xjc";

/// XML Schema instance namespace.
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Schema referenced by generated descriptors.
pub const FUNCTION_SCHEMA_LOCATION: &str = "http://scheme.cf.linedata.com/function.xsd";

/// Parent form of generated block forms unless configured otherwise.
pub const DEFAULT_FATHER_ID: &str = "LotIntervallePortefeuille";

/// Area titles written to the properties file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaTitles {
    pub area1: String,
    pub area2: String,
    pub area3: String,
}

impl Default for AreaTitles {
    fn default() -> Self {
        Self {
            area1: "Criteres de lancement".to_string(),
            area2: "Criteres avances".to_string(),
            area3: "Criteres de consolidation".to_string(),
        }
    }
}

impl AreaTitles {
    pub fn title(&self, area: Area) -> &str {
        match area {
            Area::Area1 => &self.area1,
            Area::Area2 => &self.area2,
            Area::Area3 => &self.area3,
        }
    }
}

/// Options shared by every generated artifact of a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    pub father_id: String,
    /// Enables the screen descriptor when set.
    pub function_name: Option<String>,
    /// Bean of field links without their own; `<formId>FieldLinkService` when unset.
    pub link_bean_id: Option<String>,
    pub area_titles: AreaTitles,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            father_id: DEFAULT_FATHER_ID.to_string(),
            function_name: None,
            link_bean_id: None,
            area_titles: AreaTitles::default(),
        }
    }
}

pub fn xml_writer<W: Write>(inner: W) -> Writer<W> {
    Writer::new_with_indent(inner, b' ', 2)
}

pub fn write_declaration<W: Write>(writer: &mut Writer<W>) -> Result<()> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    Ok(())
}

/// Write a simple text element.
pub fn write_text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Write a `<graphic>` block of boolean flags.
pub fn write_graphic<W: Write>(writer: &mut Writer<W>, flags: &[(&str, bool)]) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("graphic")))?;
    for (name, value) in flags {
        write_text_element(writer, name, bool_text(*value))?;
    }
    writer.write_event(Event::End(BytesEnd::new("graphic")))?;
    Ok(())
}

pub fn bool_text(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}
