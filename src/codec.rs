//! Bidirectional mapping between a [`World`] and its XML wire form.
//!
//! Wire shape:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <world name="Earth">
//!     <region id="EU" name="Europe" type="Continent">
//!         <region id="DE" name="Germany" type="Nation" capital="Berlin"/>
//!     </region>
//! </world>
//! ```
//!
//! Decoding parses depth-first into a [`RawWorld`], hands it to the
//! [`SchemaValidator`], and only then builds the typed tree; nothing is
//! defaulted for missing attributes. Encoding walks root-first,
//! depth-first with children sorted by id, and is schema-valid by
//! construction because the in-memory tree always is.

use std::io;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::domain::{Region, RegionType, World};
use crate::schema::{RawRegion, RawWorld, SchemaValidator, SchemaViolation};

pub const WORLD_TAG: &str = "world";
pub const REGION_TAG: &str = "region";
pub const ATTR_NAME: &str = "name";
pub const ATTR_ID: &str = "id";
pub const ATTR_TYPE: &str = "type";
pub const ATTR_CAPITAL: &str = "capital";

/// Why a byte stream was rejected: malformed markup, or well-formed
/// markup that violates the schema. Both leave the caller's state
/// untouched.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("malformed world document: {0}")]
    Parse(#[from] quick_xml::Error),

    #[error("truncated world document: input ended before all elements were closed")]
    Truncated,

    #[error(transparent)]
    Schema(#[from] SchemaViolation),
}

pub struct DocumentCodec;

impl DocumentCodec {
    /// Parse and validate a serialized world.
    #[instrument(level = "debug", skip(bytes), fields(len = bytes.len()))]
    pub fn decode(bytes: &[u8]) -> Result<World, DecodeError> {
        let raw = Self::parse_raw(bytes)?;
        SchemaValidator::validate(&raw)?;
        debug!(world = %raw.name, regions = raw.regions.len(), "document accepted");
        Ok(Self::build_world(&raw))
    }

    /// Event-parse the byte stream into the candidate structure.
    pub fn parse_raw(bytes: &[u8]) -> Result<RawWorld, DecodeError> {
        let mut reader = Reader::from_reader(bytes);
        reader.config_mut().trim_text(true);

        let mut doc: Option<RawWorld> = None;
        let mut closed = false;
        let mut stack: Vec<RawRegion> = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => match e.name().as_ref() {
                    b"world" => {
                        Self::open_world(&e, &mut doc, closed)?;
                    }
                    b"region" => {
                        stack.push(Self::open_region(&e, &doc, closed)?);
                    }
                    other => {
                        return Err(SchemaViolation::UnexpectedElement(
                            String::from_utf8_lossy(other).into_owned(),
                        )
                        .into())
                    }
                },
                Event::Empty(e) => match e.name().as_ref() {
                    b"world" => {
                        Self::open_world(&e, &mut doc, closed)?;
                        closed = true;
                    }
                    b"region" => {
                        let region = Self::open_region(&e, &doc, closed)?;
                        Self::attach(&mut doc, &mut stack, region);
                    }
                    other => {
                        return Err(SchemaViolation::UnexpectedElement(
                            String::from_utf8_lossy(other).into_owned(),
                        )
                        .into())
                    }
                },
                Event::End(e) => match e.name().as_ref() {
                    b"world" => closed = true,
                    _ => {
                        if let Some(region) = stack.pop() {
                            Self::attach(&mut doc, &mut stack, region);
                        }
                    }
                },
                Event::Text(_) | Event::CData(_) => {
                    return Err(SchemaViolation::UnexpectedElement("#text".to_string()).into())
                }
                Event::Eof => {
                    // The reader only flags mismatched end tags, not ones
                    // missing at end of input; an open world or region here
                    // means the document was cut short.
                    if doc.is_some() && (!closed || !stack.is_empty()) {
                        return Err(DecodeError::Truncated);
                    }
                    break;
                }
                // Declaration, comments, processing instructions, doctype
                _ => {}
            }
            buf.clear();
        }

        doc.ok_or_else(|| SchemaViolation::BadRoot.into())
    }

    /// Serialize to an in-memory buffer. Encoding cannot fail for
    /// structural reasons; only a sink can, and a `Vec` sink cannot.
    pub fn encode(world: &World) -> Vec<u8> {
        let mut out = Vec::new();
        Self::encode_to(&mut out, world).expect("writing to an in-memory buffer cannot fail");
        out
    }

    /// Serialize root-first, depth-first, children sorted by id.
    #[instrument(level = "debug", skip(sink, world), fields(world = %world.name()))]
    pub fn encode_to<W: io::Write>(sink: W, world: &World) -> io::Result<()> {
        let mut writer = Writer::new_with_indent(sink, b' ', 4);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(into_io)?;

        let mut root = BytesStart::new(WORLD_TAG);
        root.push_attribute((ATTR_NAME, world.name()));

        let children = world
            .children_sorted(world.name())
            .unwrap_or_default();
        if children.is_empty() {
            writer.write_event(Event::Empty(root)).map_err(into_io)?;
        } else {
            writer.write_event(Event::Start(root)).map_err(into_io)?;
            for child in children {
                Self::write_region(&mut writer, world, child)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new(WORLD_TAG)))
                .map_err(into_io)?;
        }
        Ok(())
    }

    fn write_region<W: io::Write>(
        writer: &mut Writer<W>,
        world: &World,
        region: &Region,
    ) -> io::Result<()> {
        let mut elem = BytesStart::new(REGION_TAG);
        elem.push_attribute((ATTR_ID, region.id.as_str()));
        elem.push_attribute((ATTR_NAME, region.name.as_str()));
        elem.push_attribute((ATTR_TYPE, region.kind.schema_name()));
        if let Some(capital) = &region.capital {
            elem.push_attribute((ATTR_CAPITAL, capital.as_str()));
        }

        let children = world.children_sorted(&region.id).unwrap_or_default();
        if children.is_empty() {
            writer.write_event(Event::Empty(elem)).map_err(into_io)?;
        } else {
            writer.write_event(Event::Start(elem)).map_err(into_io)?;
            for child in children {
                Self::write_region(writer, world, child)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new(REGION_TAG)))
                .map_err(into_io)?;
        }
        Ok(())
    }

    fn open_world(
        e: &BytesStart<'_>,
        doc: &mut Option<RawWorld>,
        closed: bool,
    ) -> Result<(), DecodeError> {
        if doc.is_some() || closed {
            return Err(SchemaViolation::UnexpectedElement(WORLD_TAG.to_string()).into());
        }
        let mut name = None;
        for (key, value) in Self::attributes(e)? {
            match key.as_str() {
                ATTR_NAME => name = Some(value),
                _ => {
                    return Err(SchemaViolation::UnexpectedAttribute {
                        element: WORLD_TAG,
                        attribute: key,
                    }
                    .into())
                }
            }
        }
        let name = name.ok_or(SchemaViolation::BadRoot)?;
        *doc = Some(RawWorld {
            name,
            regions: Vec::new(),
        });
        Ok(())
    }

    fn open_region(
        e: &BytesStart<'_>,
        doc: &Option<RawWorld>,
        closed: bool,
    ) -> Result<RawRegion, DecodeError> {
        if doc.is_none() {
            // A region as document root means the root is not <world>
            return Err(SchemaViolation::BadRoot.into());
        }
        if closed {
            return Err(SchemaViolation::UnexpectedElement(REGION_TAG.to_string()).into());
        }
        let mut region = RawRegion::default();
        for (key, value) in Self::attributes(e)? {
            match key.as_str() {
                ATTR_ID => region.id = Some(value),
                ATTR_NAME => region.name = Some(value),
                ATTR_TYPE => region.kind = Some(value),
                ATTR_CAPITAL => region.capital = Some(value),
                _ => {
                    return Err(SchemaViolation::UnexpectedAttribute {
                        element: REGION_TAG,
                        attribute: key,
                    }
                    .into())
                }
            }
        }
        Ok(region)
    }

    fn attributes(e: &BytesStart<'_>) -> Result<Vec<(String, String)>, DecodeError> {
        let mut out = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            out.push((key, value));
        }
        Ok(out)
    }

    fn attach(doc: &mut Option<RawWorld>, stack: &mut Vec<RawRegion>, region: RawRegion) {
        if let Some(parent) = stack.last_mut() {
            parent.children.push(region);
        } else if let Some(doc) = doc {
            doc.regions.push(region);
        }
    }

    /// Turn a validated candidate into the typed tree. Failures here
    /// would mean the validator and the domain invariants disagree,
    /// which is a bug, not an input error.
    fn build_world(raw: &RawWorld) -> World {
        let mut world = World::new(&raw.name);
        let mut stack: Vec<(String, &RawRegion)> = raw
            .regions
            .iter()
            .rev()
            .map(|r| (raw.name.clone(), r))
            .collect();

        while let Some((parent_id, r)) = stack.pop() {
            let id = r.id.clone().expect("validated region has an id");
            let name = r.name.clone().expect("validated region has a name");
            let kind_name = r.kind.as_deref().expect("validated region has a type");
            let kind = RegionType::from_schema_name(kind_name)
                .expect("validated region type is recognized");

            let mut region = Region::new(id.clone(), name, kind);
            region.capital = r.capital.clone();
            world
                .add_region(&parent_id, region)
                .expect("validated document satisfies the tree invariants");

            for child in r.children.iter().rev() {
                stack.push((id.clone(), child));
            }
        }
        world
    }
}

fn into_io<E: std::error::Error + Send + Sync + 'static>(e: E) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e)
}
