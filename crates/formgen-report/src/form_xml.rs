//! Block form descriptor (`<formId>BlockForm.block.xml`).

use std::io::Write;

use anyhow::{Context, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, Event};

use formgen_model::{Area, AreaLayout, FieldLink, GroupedLayout, LayoutField};

use crate::common::{
    FUNCTION_SCHEMA_LOCATION, JAXB_NS, ReportOptions, XJC_NS, XSI_NS, bool_text,
    write_declaration, write_graphic, write_text_element, xml_writer,
};

pub fn form_xml_file_name(form_id: &str) -> String {
    format!("{form_id}BlockForm.block.xml")
}

/// Renders the block form descriptor.
///
/// Only non-empty areas are emitted, in area1, area2, area3 order.
pub fn render_form_xml(
    layout: &GroupedLayout,
    links: &[FieldLink],
    options: &ReportOptions,
) -> Result<String> {
    let mut xml = xml_writer(Vec::new());
    write_declaration(&mut xml)?;

    let form_id = layout.form_id.as_str();
    let bean_id = format!("{form_id}FormService");
    let mut root = BytesStart::new("form");
    root.push_attribute(("xmlns:jxb", JAXB_NS));
    root.push_attribute(("xmlns:xjc", XJC_NS));
    root.push_attribute(("xmlns:xsi", XSI_NS));
    root.push_attribute(("id", form_id));
    root.push_attribute(("xsi:noNamespaceSchemaLocation", FUNCTION_SCHEMA_LOCATION));
    root.push_attribute(("fatherId", options.father_id.as_str()));
    root.push_attribute(("beanId", bean_id.as_str()));
    xml.write_event(Event::Start(root))?;

    write_graphic(
        &mut xml,
        &[
            ("headerVisible", false),
            ("collapsible", false),
            ("collapsed", false),
        ],
    )?;

    let default_link_bean = options
        .link_bean_id
        .clone()
        .unwrap_or_else(|| format!("{form_id}FieldLinkService"));
    write_field_links(&mut xml, links, &default_link_bean)?;

    xml.write_event(Event::Start(BytesStart::new("areas")))?;
    for area in layout.non_empty_areas() {
        write_area(&mut xml, area).with_context(|| format!("write {}", area.area))?;
    }
    xml.write_event(Event::End(BytesEnd::new("areas")))?;

    xml.write_event(Event::End(BytesEnd::new("form")))?;

    let mut bytes = xml.into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).context("form xml is not valid UTF-8")
}

fn write_field_links<W: Write>(
    xml: &mut Writer<W>,
    links: &[FieldLink],
    default_bean_id: &str,
) -> Result<()> {
    if links.is_empty() {
        xml.write_event(Event::Empty(BytesStart::new("fieldLinks")))?;
        return Ok(());
    }
    xml.write_event(Event::Start(BytesStart::new("fieldLinks")))?;
    for link in links {
        let mut node = BytesStart::new("fieldLink");
        node.push_attribute(("childFieldId", link.child_field_id.as_str()));
        node.push_attribute(("id", link.id.as_str()));
        node.push_attribute(("methodName", link.method_name.as_str()));
        node.push_attribute(("nature", link.nature.as_str()));
        node.push_attribute(("disabled", bool_text(link.disabled)));
        node.push_attribute(("beanId", link.bean_id.as_deref().unwrap_or(default_bean_id)));
        if link.father_field_ids.is_empty() {
            xml.write_event(Event::Empty(node))?;
            continue;
        }
        xml.write_event(Event::Start(node))?;
        for father in &link.father_field_ids {
            let mut father_node = BytesStart::new("fieldLinkFather");
            father_node.push_attribute(("fatherFieldId", father.as_str()));
            xml.write_event(Event::Empty(father_node))?;
        }
        xml.write_event(Event::End(BytesEnd::new("fieldLink")))?;
    }
    xml.write_event(Event::End(BytesEnd::new("fieldLinks")))?;
    Ok(())
}

fn write_area<W: Write>(xml: &mut Writer<W>, area: &AreaLayout) -> Result<()> {
    let sort_number = area.area.form_sort_number().to_string();
    let mut node = BytesStart::new("area");
    node.push_attribute(("id", area.area.as_str()));
    node.push_attribute(("sortNumber", sort_number.as_str()));
    xml.write_event(Event::Start(node))?;

    if area.area == Area::Area1 {
        write_graphic(xml, &[("headerVisible", false)])?;
    }

    xml.write_event(Event::Start(BytesStart::new("fields")))?;
    for field in &area.fields {
        write_field(xml, field).with_context(|| format!("write field {}", field.id()))?;
    }
    xml.write_event(Event::End(BytesEnd::new("fields")))?;

    xml.write_event(Event::End(BytesEnd::new("area")))?;
    Ok(())
}

fn write_field<W: Write>(xml: &mut Writer<W>, field: &LayoutField) -> Result<()> {
    let definition = &field.definition;
    let column_number = field.column_number.to_string();
    let sort_number = field.sort_number.to_string();
    let max_length = definition.max_length.map(|length| length.to_string());

    let mut node = BytesStart::new("field");
    node.push_attribute(("id", field.id()));
    node.push_attribute(("nature", definition.nature.as_str()));
    if let Some(default_value) = &definition.default_value {
        node.push_attribute(("defaultValue", default_value.as_str()));
    }
    node.push_attribute(("columnNumber", column_number.as_str()));
    node.push_attribute(("sortNumber", sort_number.as_str()));
    if let Some(max_length) = &max_length {
        node.push_attribute(("maxLength", max_length.as_str()));
    }
    node.push_attribute(("readOnly", bool_text(field.read_only)));
    node.push_attribute(("hidden", bool_text(field.hidden)));
    let optional = [
        ("lov", definition.lov.as_deref()),
        ("valueField", definition.value_field.as_deref()),
        ("displayTemplate", definition.display_template.as_deref()),
        ("functionId", definition.function_id.as_deref()),
        ("fkSearchField", definition.fk_search_field.as_deref()),
        (
            "clearValueIfNotInStore",
            definition.clear_value_if_not_in_store.map(bool_text),
        ),
        (
            "setWithValuesList",
            definition.set_with_values_list.map(bool_text),
        ),
    ];
    for (name, value) in optional {
        if let Some(value) = value {
            node.push_attribute((name, value));
        }
    }
    xml.write_event(Event::Start(node))?;

    write_text_element(xml, "label", &field.label)?;

    if !definition.controls.is_empty() {
        xml.write_event(Event::Start(BytesStart::new("controls")))?;
        for control in &definition.controls {
            let mut control_node = BytesStart::new("control");
            control_node.push_attribute(("id", control.id.as_str()));
            control_node.push_attribute(("nature", control.nature.as_str()));
            xml.write_event(Event::Empty(control_node))?;
        }
        xml.write_event(Event::End(BytesEnd::new("controls")))?;
    }

    if definition.nature.is_lov() && !definition.filters.is_empty() {
        xml.write_event(Event::Start(BytesStart::new("filters")))?;
        for filter in &definition.filters {
            let mut filter_node = BytesStart::new("filter");
            filter_node.push_attribute(("id", filter.id.as_str()));
            filter_node.push_attribute(("fieldId", filter.field_id.as_str()));
            xml.write_event(Event::Empty(filter_node))?;
        }
        xml.write_event(Event::End(BytesEnd::new("filters")))?;
    }

    xml.write_event(Event::End(BytesEnd::new("field")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use formgen_model::{AreaLayout, Control, FieldDefinition, Nature, PlacementOrigin};

    fn layout_field(id: &str, nature: Nature, sort: i64) -> LayoutField {
        LayoutField {
            definition: FieldDefinition::new(id, nature),
            area: Area::Area1,
            sort_number: sort,
            column_number: 1,
            origin: PlacementOrigin::Default,
            label: format!("{id} & co"),
            read_only: false,
            hidden: false,
            is_static_panel: false,
        }
    }

    fn layout(area1: Vec<LayoutField>, area3: Vec<LayoutField>) -> GroupedLayout {
        GroupedLayout {
            form_id: "aini".to_string(),
            areas: vec![
                AreaLayout {
                    area: Area::Area1,
                    fields: area1,
                },
                AreaLayout {
                    area: Area::Area2,
                    fields: Vec::new(),
                },
                AreaLayout {
                    area: Area::Area3,
                    fields: area3,
                },
            ],
            diagnostics: Vec::new(),
        }
    }

    #[test]
    fn root_attributes_and_empty_areas() {
        let xml = render_form_xml(
            &layout(vec![layout_field("xceopt", Nature::String, 10)], Vec::new()),
            &[],
            &ReportOptions::default(),
        )
        .unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("fatherId=\"LotIntervallePortefeuille\""));
        assert!(xml.contains("beanId=\"ainiFormService\""));
        assert!(xml.contains(
            "xsi:noNamespaceSchemaLocation=\"http://scheme.cf.linedata.com/function.xsd\""
        ));
        assert!(xml.contains("<area id=\"area1\" sortNumber=\"1\">"));
        assert!(!xml.contains("area2"));
        assert!(!xml.contains("area3"));
        assert!(xml.contains("<label>xceopt &amp; co</label>"));
        assert!(xml.contains("<fieldLinks/>"));
    }

    #[test]
    fn area3_is_numbered_before_area2() {
        let mut panel = layout_field("riddev", Nature::Lov, 1);
        panel.area = Area::Area3;
        panel.definition.controls = vec![Control::mandatory()];
        panel.definition.clear_value_if_not_in_store = Some(true);
        panel.definition.filters = vec![formgen_model::Filter::on_field("reiv_rceval")];
        let xml = render_form_xml(
            &layout(vec![layout_field("a", Nature::Date, 10)], vec![panel]),
            &[],
            &ReportOptions::default(),
        )
        .unwrap();
        assert!(xml.contains("<area id=\"area3\" sortNumber=\"2\">"));
        assert!(xml.contains("clearValueIfNotInStore=\"true\""));
        assert!(xml.contains("<control id=\"mandatory\" nature=\"MANDATORY\"/>"));
        assert!(xml.contains("<filter id=\"reiv_rceval\" fieldId=\"reiv_rceval\"/>"));
        let area1 = xml.find("area1").unwrap();
        let area3 = xml.find("area3").unwrap();
        assert!(area1 < area3);
    }

    #[test]
    fn link_fathers_keep_order_and_default_bean() {
        let link = FieldLink {
            child_field_id: "optcrm".to_string(),
            id: "link_optcrm".to_string(),
            method_name: "isoptcrmVisible".to_string(),
            nature: "CONDITIONNALHIDDEN".to_string(),
            disabled: false,
            father_field_ids: vec!["z".to_string(), "a".to_string()],
            bean_id: None,
        };
        let xml = render_form_xml(
            &layout(vec![layout_field("optcrm", Nature::String, 10)], Vec::new()),
            &[link],
            &ReportOptions::default(),
        )
        .unwrap();
        assert!(xml.contains("beanId=\"ainiFieldLinkService\""));
        let z = xml.find("fatherFieldId=\"z\"").unwrap();
        let a = xml.find("fatherFieldId=\"a\"").unwrap();
        assert!(z < a);
    }
}
