//! Positional compartments of a UML class shape
//!
//! Gliffy lays out a class shape as a fixed sequence of child nodes: the
//! name box, the attribute box, then the method box. All knowledge of that
//! ordering lives here.

use serde_json::Value;

/// A named compartment of a class or interface shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Name,
    Attributes,
    Methods,
}

impl Region {
    /// Position of the compartment among the shape's children
    pub fn index(self) -> usize {
        match self {
            Region::Name => 0,
            Region::Attributes => 1,
            Region::Methods => 2,
        }
    }
}

/// Slot accessor over a shape's child list
#[derive(Debug, Clone, Copy)]
pub struct Compartments<'a> {
    children: &'a [Value],
}

impl<'a> Compartments<'a> {
    /// Compartments of `node`; a node without children has none
    pub fn of(node: &'a Value) -> Self {
        let children = node
            .get("children")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        Self { children }
    }

    /// The compartment node for `region`, if the shape has one
    pub fn region(&self, region: Region) -> Option<&'a Value> {
        self.children.get(region.index())
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}
