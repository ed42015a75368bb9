//! Schema string grammar (spec §6, §9 "Open Questions").
//!
//! The grammar is this crate's own choice — spec §9 notes it is not
//! formalized in the original source. It is kept deliberately small:
//!
//! ```text
//! leaf    := kind ("," attr)*
//! attr    := "count=" int | "offset=" int | "stride=" int
//!          | "element_bytes=" int | "endianness=" ("little" | "big")
//! object  := "{" (name ":" (leaf | object) ("," name ":" (leaf | object))*)? "}"
//! ```
//!
//! [`emit`] always produces this grammar, and [`parse_leaf_schema`] /
//! [`parse_object_schema`] always accept it, satisfying the round-trip
//! requirement in spec §8 property 1.

use indexmap::IndexMap;

use crate::dtype::{DataType, ElementKind, Endianness};
use crate::error::TreeError;
use crate::node::Node;

/// Emit the schema string for `node` (spec: `Node::schema()`).
pub fn emit(node: &Node) -> String {
    match node {
        Node::Empty => ElementKind::None.name().to_string(),
        Node::Leaf { dtype, .. } => emit_leaf(dtype),
        Node::Object { children } => {
            let mut out = String::from("{");
            for (i, (name, child)) in children.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(name);
                out.push_str(": ");
                out.push_str(&emit(child));
            }
            out.push('}');
            out
        },
    }
}

fn emit_leaf(dtype: &DataType) -> String {
    let mut out = format!("{}, count={}", dtype.kind().name(), dtype.number_of_elements());
    if dtype.offset_bytes() != 0 {
        out.push_str(&format!(", offset={}", dtype.offset_bytes()));
    }
    if dtype.stride_bytes() != dtype.element_bytes() {
        out.push_str(&format!(", stride={}", dtype.stride_bytes()));
    }
    if dtype.element_bytes() != dtype.kind().element_bytes() {
        out.push_str(&format!(", element_bytes={}", dtype.element_bytes()));
    }
    if dtype.endianness() != Endianness::native() {
        let name = match dtype.endianness() {
            Endianness::Little => "little",
            Endianness::Big => "big",
        };
        out.push_str(&format!(", endianness={name}"));
    }
    out
}

/// Parse a leaf schema string (the form `emit_leaf` produces) into a
/// [`DataType`].
pub fn parse_leaf_schema(schema: &str) -> crate::Result<DataType> {
    let schema = schema.trim();
    let mut parts = schema.split(',').map(str::trim);
    let kind_name = parts.next().ok_or_else(|| invalid(schema))?;
    let kind = ElementKind::from_name(kind_name).ok_or_else(|| invalid(schema))?;

    let mut count = 1usize;
    let mut offset = 0usize;
    let mut stride: Option<usize> = None;
    let mut element_bytes: Option<usize> = None;
    let mut endianness = Endianness::native();

    for part in parts {
        let (key, value) = part.split_once('=').ok_or_else(|| invalid(schema))?;
        let key = key.trim();
        let value = value.trim();
        match key {
            "count" => count = value.parse().map_err(|_| invalid(schema))?,
            "offset" => offset = value.parse().map_err(|_| invalid(schema))?,
            "stride" => stride = Some(value.parse().map_err(|_| invalid(schema))?),
            "element_bytes" => element_bytes = Some(value.parse().map_err(|_| invalid(schema))?),
            "endianness" => {
                endianness = match value {
                    "little" => Endianness::Little,
                    "big" => Endianness::Big,
                    _ => return Err(invalid(schema)),
                }
            },
            _ => return Err(invalid(schema)),
        }
    }

    let element_bytes = element_bytes.unwrap_or_else(|| kind.element_bytes());
    let stride = stride.unwrap_or(element_bytes);

    Ok(DataType::with_layout(kind, count, offset, stride, element_bytes, endianness))
}

/// Parse a brace-delimited object schema string into an ordered
/// `name -> schema-string` map, preserving order. Does not recurse into
/// nested object schemas; callers rebuild a [`Node`] tree by recursing
/// themselves through [`split_object_entries`].
pub fn parse_object_schema(schema: &str) -> crate::Result<IndexMap<String, String>> {
    let schema = schema.trim();
    let inner = schema
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .ok_or_else(|| invalid(schema))?;

    let mut out = IndexMap::new();
    for (name, value) in split_object_entries(inner)? {
        out.insert(name, value);
    }
    Ok(out)
}

/// Split the inside of a `{...}` object schema into `(name, schema)` pairs,
/// respecting nested braces so a nested object's commas are not mistaken
/// for top-level separators.
pub fn split_object_entries(inner: &str) -> crate::Result<Vec<(String, String)>> {
    let inner = inner.trim();
    if inner.is_empty() {
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    let bytes = inner.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' => depth -= 1,
            b',' if depth == 0 => {
                entries.push(inner[start..i].to_string());
                start = i + 1;
            },
            _ => {},
        }
    }
    entries.push(inner[start..].to_string());

    entries
        .into_iter()
        .map(|entry| {
            let (name, value) = entry.split_once(':').ok_or_else(|| invalid(inner))?;
            Ok((name.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}

fn invalid(schema: &str) -> TreeError {
    TreeError::InvalidPath {
        path: format!("<schema: {schema}>"),
    }
}

/// Rebuild a [`Node`] subtree from a schema string, recursing through
/// nested object schemas. Every produced leaf is empty (no backing bytes)
/// — callers that need a live, non-owning view should go through
/// [`Node::set_external_schema`] instead.
///
/// [`Node::set_external_schema`]: crate::Node::set_external_schema
pub fn rebuild(schema: &str) -> crate::Result<Node> {
    let schema = schema.trim();
    if schema.starts_with('{') {
        let entries = parse_object_schema(schema)?;
        let mut children = IndexMap::with_capacity(entries.len());
        for (name, child_schema) in entries {
            children.insert(name, rebuild(&child_schema)?);
        }
        Ok(Node::Object { children })
    } else {
        let dtype = parse_leaf_schema(schema)?;
        Ok(Node::Leaf {
            dtype,
            buffer: crate::buffer::BufferOwner::empty(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_schema_round_trips() {
        let mut node = Node::new();
        node.set_slice(&[1u32, 2, 3, 4]).unwrap();
        let schema = node.schema();
        let dtype = parse_leaf_schema(&schema).unwrap();
        assert_eq!(dtype, node.dtype());
    }

    #[test]
    fn strided_schema_round_trips() {
        let dtype = DataType::with_layout(
            ElementKind::U32,
            3,
            0,
            8,
            4,
            Endianness::Big,
        );
        let schema = emit_leaf(&dtype);
        assert_eq!(parse_leaf_schema(&schema).unwrap(), dtype);
    }

    #[test]
    fn object_schema_round_trips_and_preserves_order() {
        let mut root = Node::new();
        root.fetch("a.b").unwrap().set_scalar(1u32).unwrap();
        root.fetch("a.c").unwrap().set_scalar(2u32).unwrap();
        let schema = root.schema();

        let rebuilt = rebuild(&schema).unwrap();
        assert_eq!(rebuilt.child_names(), vec!["a".to_string()]);
        let Node::Object { children } = &rebuilt else {
            panic!("expected object");
        };
        let Node::Object { children: a_children } = &children["a"] else {
            panic!("expected nested object");
        };
        assert_eq!(
            a_children.keys().cloned().collect::<Vec<_>>(),
            vec!["b".to_string(), "c".to_string()]
        );
    }
}
