//! Path-addressed reads and writes into JSON section content.
//!
//! A path is a list of segments. Segments made only of ASCII digits index
//! arrays; every other segment is an object key. The dotted string form
//! `slides.0.buttons.1.label` is accepted by [`ContentPath::parse`].

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContentPathError {
    #[error("Path must not be empty")]
    EmptyPath,

    #[error("Path segment {index} is empty")]
    EmptySegment { index: usize },

    #[error("Cannot descend into {found} at '{at}'")]
    NotAContainer { at: String, found: &'static str },

    #[error("Array index {index} at '{at}' exceeds the limit of {limit}")]
    IndexTooLarge { at: String, index: usize, limit: usize },
}

/// Upper bound on array indices written through a path.
pub const MAX_ARRAY_INDEX: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl Segment {
    fn from_str(raw: &str) -> Self {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(index) = raw.parse() {
                return Segment::Index(index);
            }
        }
        Segment::Key(raw.to_string())
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Segment::Key(key) => f.write_str(key),
            Segment::Index(index) => write!(f, "{}", index),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPath {
    segments: Vec<Segment>,
}

impl ContentPath {
    /// Parses `a.b.0.c`.
    pub fn parse(path: &str) -> Result<Self, ContentPathError> {
        if path.is_empty() {
            return Err(ContentPathError::EmptyPath);
        }
        let segments = path
            .split('.')
            .enumerate()
            .map(|(index, raw)| {
                if raw.is_empty() {
                    Err(ContentPathError::EmptySegment { index })
                } else {
                    Ok(Segment::from_str(raw))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { segments })
    }

    /// Builds a path from already split segments, as the admin editor sends them.
    pub fn from_segments<S: AsRef<str>>(segments: &[S]) -> Result<Self, ContentPathError> {
        if segments.is_empty() {
            return Err(ContentPathError::EmptyPath);
        }
        let mut parsed = Vec::with_capacity(segments.len());
        for (index, raw) in segments.iter().enumerate() {
            let raw = raw.as_ref();
            if raw.is_empty() {
                return Err(ContentPathError::EmptySegment { index });
            }
            parsed.push(Segment::from_str(raw));
        }
        Ok(Self { segments: parsed })
    }

    /// A single-key path at the top of the content.
    pub fn key(name: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment::Key(name.into())],
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn child(&self, segment: Segment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    fn prefix(&self, len: usize) -> String {
        self.segments[..len]
            .iter()
            .map(Segment::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl std::fmt::Display for ContentPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.prefix(self.segments.len()))
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Reads the value at `path`. Missing keys, out-of-range indices and
/// scalars in the way all yield `None`.
pub fn get<'a>(root: &'a Value, path: &ContentPath) -> Option<&'a Value> {
    path.segments.iter().try_fold(root, |current, segment| match (current, segment) {
        (Value::Object(map), Segment::Key(key)) => map.get(key),
        (Value::Object(map), Segment::Index(index)) => map.get(&index.to_string()),
        (Value::Array(items), Segment::Index(index)) => items.get(*index),
        _ => None,
    })
}

fn empty_container_for(next: &Segment) -> Value {
    match next {
        Segment::Index(_) => Value::Array(Vec::new()),
        Segment::Key(_) => Value::Object(Map::new()),
    }
}

/// Writes `new_value` at `path`, creating intermediate containers.
///
/// A missing, null or scalar intermediate is replaced by an array when the
/// following segment is numeric and an object otherwise. Arrays are padded
/// with `null` up to the written index. Numeric segments on objects are used
/// as string keys. Only a scalar root is an error.
pub fn set(root: &mut Value, path: &ContentPath, new_value: Value) -> Result<(), ContentPathError> {
    let segments = &path.segments;
    if segments.is_empty() {
        return Err(ContentPathError::EmptyPath);
    }

    let mut current = root;
    for (depth, segment) in segments.iter().enumerate() {
        let is_last = depth + 1 == segments.len();
        let slot = slot_mut(current, segment, || path.prefix(depth + 1))?;
        if is_last {
            *slot = new_value;
            return Ok(());
        }
        if !slot.is_object() && !slot.is_array() {
            *slot = empty_container_for(&segments[depth + 1]);
        }
        current = slot;
    }
    Ok(())
}

fn slot_mut<'a>(
    current: &'a mut Value,
    segment: &Segment,
    at: impl Fn() -> String,
) -> Result<&'a mut Value, ContentPathError> {
    match current {
        Value::Object(map) => {
            let key = segment.to_string();
            Ok(map.entry(key).or_insert(Value::Null))
        }
        Value::Array(items) => match segment {
            Segment::Index(index) => {
                if *index > MAX_ARRAY_INDEX {
                    return Err(ContentPathError::IndexTooLarge {
                        at: at(),
                        index: *index,
                        limit: MAX_ARRAY_INDEX,
                    });
                }
                if items.len() <= *index {
                    items.resize(*index + 1, Value::Null);
                }
                Ok(&mut items[*index])
            }
            Segment::Key(_) => Err(ContentPathError::NotAContainer {
                at: at(),
                found: "an array with a non-numeric key",
            }),
        },
        other => Err(ContentPathError::NotAContainer {
            at: at(),
            found: kind_of(other),
        }),
    }
}

/// Removes and returns the value at `path`. Array elements after the
/// removed index shift down.
pub fn remove(root: &mut Value, path: &ContentPath) -> Option<Value> {
    let (last, parents) = path.segments.split_last()?;
    let mut current = root;
    for segment in parents {
        current = match (current, segment) {
            (Value::Object(map), seg) => map.get_mut(&seg.to_string())?,
            (Value::Array(items), Segment::Index(index)) => items.get_mut(*index)?,
            _ => return None,
        };
    }
    match (current, last) {
        (Value::Object(map), seg) => map.remove(&seg.to_string()),
        (Value::Array(items), Segment::Index(index)) if *index < items.len() => {
            Some(items.remove(*index))
        }
        _ => None,
    }
}
