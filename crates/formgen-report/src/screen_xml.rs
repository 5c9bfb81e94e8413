//! Screen descriptor (`<functionName>IRap.screen.xml`) hosting the block form.

use anyhow::{Context, Result};
use quick_xml::events::{BytesEnd, BytesStart, Event};

use crate::common::{
    FUNCTION_SCHEMA_LOCATION, XSI_NS, write_declaration, write_graphic, write_text_element,
    xml_writer,
};

pub fn screen_function_id(function_name: &str) -> String {
    format!("{function_name}IRap")
}

pub fn screen_xml_file_name(function_name: &str) -> String {
    format!("{}.screen.xml", screen_function_id(function_name))
}

pub fn render_screen_xml(function_name: &str, form_id: &str) -> Result<String> {
    let function_id = screen_function_id(function_name);
    let bean_id = format!("{function_name}ScreenService");
    let father_id = format!("{form_id}BlockForm");
    let action = format!("launch{function_name}");

    let mut xml = xml_writer(Vec::new());
    write_declaration(&mut xml)?;

    let mut root = BytesStart::new("function");
    root.push_attribute(("xmlns:xsi", XSI_NS));
    root.push_attribute(("xsi:noNamespaceSchemaLocation", FUNCTION_SCHEMA_LOCATION));
    root.push_attribute(("type", "create"));
    root.push_attribute(("id", function_id.as_str()));
    root.push_attribute(("beanId", bean_id.as_str()));
    root.push_attribute(("icon", "icons/kate.png"));
    xml.write_event(Event::Start(root))?;

    write_graphic(&mut xml, &[("headerVisible", true), ("borderVisible", true)])?;

    let mut form = BytesStart::new("form");
    form.push_attribute(("sortNumber", "1"));
    form.push_attribute(("id", form_id));
    form.push_attribute(("editable", "true"));
    form.push_attribute(("fatherId", father_id.as_str()));
    xml.write_event(Event::Start(form))?;
    write_graphic(&mut xml, &[("borderVisible", true), ("fieldSetMode", true)])?;
    xml.write_event(Event::End(BytesEnd::new("form")))?;

    xml.write_event(Event::Start(BytesStart::new("screenActions")))?;
    let mut screen_action = BytesStart::new("screenAction");
    screen_action.push_attribute(("id", action.as_str()));
    screen_action.push_attribute(("code", action.as_str()));
    screen_action.push_attribute(("icon", "edition"));
    screen_action.push_attribute(("evaluateControls", "true"));
    xml.write_event(Event::Start(screen_action))?;
    for name in ["actionResponses", "onSuccess", "refreshScreens", "functionIds"] {
        xml.write_event(Event::Start(BytesStart::new(name)))?;
    }
    write_text_element(&mut xml, "functionId", &function_id)?;
    for name in ["functionIds", "refreshScreens", "onSuccess", "actionResponses"] {
        xml.write_event(Event::End(BytesEnd::new(name)))?;
    }
    xml.write_event(Event::End(BytesEnd::new("screenAction")))?;
    xml.write_event(Event::End(BytesEnd::new("screenActions")))?;

    xml.write_event(Event::End(BytesEnd::new("function")))?;

    let mut bytes = xml.into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).context("screen xml is not valid UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_references_block_form() {
        let xml = render_screen_xml("Aini", "aini").unwrap();
        assert_eq!(screen_xml_file_name("Aini"), "AiniIRap.screen.xml");
        assert!(xml.contains("id=\"AiniIRap\""));
        assert!(xml.contains("beanId=\"AiniScreenService\""));
        assert!(xml.contains("fatherId=\"ainiBlockForm\""));
        assert!(xml.contains("<screenAction id=\"launchAini\" code=\"launchAini\""));
        assert!(xml.contains("<functionId>AiniIRap</functionId>"));
    }
}
