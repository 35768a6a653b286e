//! Reading and writing MuNG documents: XML files with a `<CropObjectList>` at the root.
//!
//! ```xml
//! <CropObjectList>
//!   <CropObjects>
//!     <CropObject>
//!       <Id>0</Id>
//!       <ClassName>notehead-full</ClassName>
//!       <Top>20</Top>
//!       <Left>30</Left>
//!       <Width>12</Width>
//!       <Height>10</Height>
//!       <Outlinks>1 4</Outlinks>
//!     </CropObject>
//!   </CropObjects>
//! </CropObjectList>
//! ```

use std::{path::Path, str::FromStr};

use anyhow::{anyhow, Context};
use itertools::Itertools;
use mungframe::{BoundingBox, DetectedObject, ObjId};
use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Reader, Writer,
};

use crate::utils::read_file_to_string;

pub fn read_objects(path: &Path) -> anyhow::Result<Vec<DetectedObject>> {
    let content = read_file_to_string(path)?;
    parse_objects(&content).with_context(|| format!("Error reading MuNG file {:?}", path))
}

pub fn write_objects(path: &Path, objects: &[DetectedObject]) -> anyhow::Result<()> {
    let xml = format_objects(objects)?;
    std::fs::write(path, xml).with_context(|| format!("Can't write {:?}", path))?;
    log::info!("Wrote {} objects to {:?}", objects.len(), path);
    Ok(())
}

/// Parses every `<CropObject>` in a MuNG document, in document order
pub fn parse_objects(content: &str) -> anyhow::Result<Vec<DetectedObject>> {
    let mut reader = Reader::from_str(content);
    reader.trim_text(true);

    let mut objects = Vec::new();
    let mut current: Option<PartialObject> = None;
    let mut field: Option<Field> = None;
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"CropObject" => current = Some(PartialObject::default()),
                name => field = Field::from_tag(name),
            },
            Event::Text(e) => {
                if let (Some(obj), Some(f)) = (&mut current, field) {
                    obj.set(f, &e.unescape()?)?;
                }
            }
            Event::End(e) => {
                if e.name().as_ref() == b"CropObject" {
                    if let Some(obj) = current.take() {
                        objects.push(obj.finish()?);
                    }
                }
                field = None;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    log::debug!("Parsed {} objects", objects.len());
    Ok(objects)
}

/// Formats `objects` as a MuNG document.  Links are written in ascending id order, and empty link
/// lists are left out.
pub fn format_objects(objects: &[DetectedObject]) -> anyhow::Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("CropObjectList")))?;
    writer.write_event(Event::Start(BytesStart::new("CropObjects")))?;
    for obj in objects {
        let bbox = obj.bbox();
        writer.write_event(Event::Start(BytesStart::new("CropObject")))?;
        write_field(&mut writer, "Id", &obj.id().to_string())?;
        write_field(&mut writer, "ClassName", obj.class_name())?;
        write_field(&mut writer, "Top", &bbox.top.to_string())?;
        write_field(&mut writer, "Left", &bbox.left.to_string())?;
        write_field(&mut writer, "Width", &bbox.width().to_string())?;
        write_field(&mut writer, "Height", &bbox.height().to_string())?;
        if !obj.inlinks().is_empty() {
            write_field(&mut writer, "Inlinks", &obj.inlinks().iter().join(" "))?;
        }
        if !obj.outlinks().is_empty() {
            write_field(&mut writer, "Outlinks", &obj.outlinks().iter().join(" "))?;
        }
        writer.write_event(Event::End(BytesEnd::new("CropObject")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("CropObjects")))?;
    writer.write_event(Event::End(BytesEnd::new("CropObjectList")))?;

    let mut xml = String::from_utf8(writer.into_inner())?;
    xml.push('\n');
    Ok(xml)
}

fn write_field(writer: &mut Writer<Vec<u8>>, tag: &str, value: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(value)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))
}

/// The children of a `<CropObject>` which we read.  Anything else (e.g. `<Mask>`) is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Id,
    ClassName,
    Top,
    Left,
    Width,
    Height,
    Inlinks,
    Outlinks,
}

impl Field {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        Some(match tag {
            b"Id" => Field::Id,
            // Older documents use `MLClassName`
            b"ClassName" | b"MLClassName" => Field::ClassName,
            b"Top" => Field::Top,
            b"Left" => Field::Left,
            b"Width" => Field::Width,
            b"Height" => Field::Height,
            b"Inlinks" => Field::Inlinks,
            b"Outlinks" => Field::Outlinks,
            _ => return None,
        })
    }
}

/// A `<CropObject>` whose fields are still being read
#[derive(Debug, Default)]
struct PartialObject {
    id: Option<ObjId>,
    class_name: Option<String>,
    top: Option<i32>,
    left: Option<i32>,
    width: Option<i32>,
    height: Option<i32>,
    inlinks: Vec<ObjId>,
    outlinks: Vec<ObjId>,
}

impl PartialObject {
    fn set(&mut self, field: Field, text: &str) -> anyhow::Result<()> {
        match field {
            Field::Id => self.id = Some(parse_value(text, "Id")?),
            Field::ClassName => self.class_name = Some(text.to_owned()),
            Field::Top => self.top = Some(parse_value(text, "Top")?),
            Field::Left => self.left = Some(parse_value(text, "Left")?),
            Field::Width => self.width = Some(parse_value(text, "Width")?),
            Field::Height => self.height = Some(parse_value(text, "Height")?),
            Field::Inlinks => self.inlinks = parse_links(text)?,
            Field::Outlinks => self.outlinks = parse_links(text)?,
        }
        Ok(())
    }

    fn finish(self) -> anyhow::Result<DetectedObject> {
        let id = self.id.ok_or_else(|| anyhow!("<CropObject> has no <Id>"))?;
        let missing = |tag: &str| anyhow!("<CropObject> {} has no <{}>", id, tag);
        let class_name = self.class_name.ok_or_else(|| missing("ClassName"))?;
        let top = self.top.ok_or_else(|| missing("Top"))?;
        let left = self.left.ok_or_else(|| missing("Left"))?;
        let width = self.width.ok_or_else(|| missing("Width"))?;
        let height = self.height.ok_or_else(|| missing("Height"))?;
        let bbox = BoundingBox::from_size(left, top, width, height).ok_or_else(|| {
            anyhow!(
                "<CropObject> {} has an invalid box: {}x{} at ({}, {})",
                id,
                width,
                height,
                left,
                top
            )
        })?;
        Ok(DetectedObject::with_links(
            id,
            class_name,
            bbox,
            self.inlinks,
            self.outlinks,
        ))
    }
}

fn parse_value<T: FromStr>(text: &str, tag: &str) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    text.trim()
        .parse()
        .with_context(|| format!("Invalid <{}> value {:?}", tag, text))
}

fn parse_links(text: &str) -> anyhow::Result<Vec<ObjId>> {
    text.split_whitespace()
        .map(|s| parse_value(s, "link"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<CropObjectList xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <CropObjects>
    <CropObject>
      <Id>0</Id>
      <ClassName>notehead-full</ClassName>
      <Top>20</Top>
      <Left>30</Left>
      <Width>12</Width>
      <Height>10</Height>
      <Mask>1:5 0:115</Mask>
      <Outlinks>2 1</Outlinks>
    </CropObject>
    <CropObject>
      <Id>1</Id>
      <MLClassName>stem</MLClassName>
      <Top>0</Top>
      <Left>41</Left>
      <Width>2</Width>
      <Height>30</Height>
      <Inlinks>0</Inlinks>
    </CropObject>
    <CropObject>
      <Id>2</Id>
      <ClassName>ledger_line</ClassName>
      <Top>25</Top>
      <Left>26</Left>
      <Width>20</Width>
      <Height>1</Height>
      <Inlinks> 0 </Inlinks>
      <Outlinks/>
    </CropObject>
  </CropObjects>
</CropObjectList>
"#;

    fn id(n: u32) -> ObjId {
        ObjId::new(n)
    }

    #[test]
    fn parse() {
        let objects = parse_objects(DOCUMENT).unwrap();
        assert_eq!(objects.len(), 3);

        let notehead = &objects[0];
        assert_eq!(notehead.id(), id(0));
        assert_eq!(notehead.class_name(), "notehead-full");
        assert_eq!(notehead.bbox(), &BoundingBox::new(30, 20, 41, 29));
        assert_eq!(notehead.outlinks().iter().copied().collect_vec(), vec![id(1), id(2)]);
        assert!(notehead.inlinks().is_empty());

        let stem = &objects[1];
        assert_eq!(stem.class_name(), "stem");
        assert_eq!(stem.bbox().height(), 30);
        assert_eq!(stem.inlinks().iter().copied().collect_vec(), vec![id(0)]);

        assert_eq!(objects[2].inlinks().len(), 1);
        assert!(objects[2].outlinks().is_empty());
    }

    #[test]
    fn write_then_read() {
        let objects = parse_objects(DOCUMENT).unwrap();
        let xml = format_objects(&objects).unwrap();
        assert_eq!(parse_objects(&xml).unwrap(), objects);
        assert!(!xml.contains("MLClassName"));
        assert!(!xml.contains("Mask"));
    }

    #[test]
    fn escaped_class_names() {
        let objects = vec![DetectedObject::new(
            id(7),
            "a<b>&c",
            BoundingBox::from_size(0, 0, 3, 3).unwrap(),
        )];
        let xml = format_objects(&objects).unwrap();
        assert!(xml.contains("a&lt;b&gt;&amp;c"));
        assert_eq!(parse_objects(&xml).unwrap(), objects);
    }

    #[test]
    fn bad_documents() {
        let object = |fields: &str| {
            format!(
                "<CropObjectList><CropObjects><CropObject>{}</CropObject></CropObjects>\
                 </CropObjectList>",
                fields
            )
        };
        let stem = "<Id>3</Id><ClassName>stem</ClassName>";
        let size = "<Top>0</Top><Left>0</Left><Width>1</Width><Height>1</Height>";

        let missing_id = object(&format!("<ClassName>stem</ClassName>{}", size));
        assert!(parse_objects(&missing_id).is_err());

        let missing_top = object(&format!(
            "{}<Left>0</Left><Width>1</Width><Height>1</Height>",
            stem
        ));
        let err = parse_objects(&missing_top).unwrap_err();
        assert_eq!(err.to_string(), "<CropObject> 3 has no <Top>");

        let bad_link = object(&format!("{}{}<Outlinks>1 x</Outlinks>", stem, size));
        assert!(parse_objects(&bad_link).is_err());

        let empty = object(&format!(
            "{}<Top>0</Top><Left>0</Left><Width>0</Width><Height>1</Height>",
            stem
        ));
        assert!(parse_objects(&empty).is_err());

        // The far edge of the box would overflow
        let huge = object(&format!(
            "{}<Top>0</Top><Left>2147483000</Left><Width>1000</Width><Height>1</Height>",
            stem
        ));
        let err = parse_objects(&huge).unwrap_err();
        assert_eq!(
            err.to_string(),
            "<CropObject> 3 has an invalid box: 1000x1 at (2147483000, 0)"
        );

        // Mismatched end tag
        assert!(parse_objects("<CropObjectList></CropObjects>").is_err());
    }
}
