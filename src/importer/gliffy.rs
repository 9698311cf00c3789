//! Gliffy UML importer
//!
//! Reads the `.gliffy` JSON export of a UML class diagram. Each entry of
//! `stage.objects` is a shape; the shape's `uid` names its UML kind and its
//! children hold the rich-text labels the definitions are recovered from.

use log::{debug, info, trace};
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::core::identity::EntityId;
use crate::entities::{
    AssociationDefinition, AttributeDefinition, BaseDefinition, BaseEntity, ClassDefinition,
    ComponentHeader, InterfaceDefinition, MethodDefinition, ModelDefinition, PackageDefinition,
    Stereotype,
};
use crate::importer::compartments::{Compartments, Region};
use crate::importer::{ImportError, Importer};
use crate::json::diagnostics::parse_value;

/// Shape identifier, e.g. `com.gliffy.shape.uml.uml_v2.class.interface`
static UID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)com\.gliffy\.shape\.uml\.uml_v2\.class\.(\w*)").unwrap());

/// Label text between the closing quote of an attribute and the next tag
static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"">([a-zA-Z0-9.]*)<"#).unwrap());

static ATTRIBUTES_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">(\w*:\s?\w*)<").unwrap());

static ATTRIBUTE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w*):\s?(\w*)").unwrap());

static METHODS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r">([a-zA-Z0-9]*[(][^)]*[)]:\s?[a-zA-Z0-9<>]*)<").unwrap()
});

static METHOD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([a-zA-Z0-9]*)[(]([^)]*)[)]:\s?([a-zA-Z0-9<>]*)").unwrap()
});

static PARAMETER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([a-zA-Z0-9_]+)\s*:\s*([a-zA-Z0-9_<>]*)").unwrap()
});

/// A shape from `stage.objects` with its classification
#[derive(Debug)]
struct GliffyNode<'a> {
    id: EntityId,
    stereotype: Option<Stereotype>,
    source: &'a Value,
}

impl<'a> GliffyNode<'a> {
    fn parse(source: &'a Value) -> Self {
        let id = match source.get("id") {
            Some(Value::String(s)) if !s.is_empty() => EntityId::from(s.as_str()),
            Some(Value::Number(n)) => EntityId::from(n.to_string()),
            _ => EntityId::new(),
        };
        Self {
            id,
            stereotype: locate_stereotype(source),
            source,
        }
    }
}

/// Importer for Gliffy UML documents
#[derive(Debug, Default, Clone)]
pub struct GliffyImporter;

impl GliffyImporter {
    pub fn new() -> Self {
        Self
    }

    /// Build a class from its name, attribute and method compartments
    pub fn create_class(&self, id: EntityId, source: &Value) -> ClassDefinition {
        let compartments = Compartments::of(source);
        ClassDefinition {
            header: self.header(id, &compartments),
            attributes: find_attributes(compartments.region(Region::Attributes)),
            methods: find_methods(compartments.region(Region::Methods)),
            ..Default::default()
        }
    }

    /// Build an interface from its name and method compartments
    pub fn create_interface(&self, id: EntityId, source: &Value) -> InterfaceDefinition {
        let compartments = Compartments::of(source);
        InterfaceDefinition {
            header: self.header(id, &compartments),
            methods: find_methods(compartments.region(Region::Methods)),
            ..Default::default()
        }
    }

    /// Build a package from its name compartment
    pub fn create_package(&self, id: EntityId, source: &Value) -> PackageDefinition {
        PackageDefinition {
            id,
            name: find_name(&Compartments::of(source)),
            parent: String::new(),
        }
    }

    fn header(&self, id: EntityId, compartments: &Compartments<'_>) -> ComponentHeader {
        ComponentHeader {
            id,
            name: find_name(compartments),
            ..Default::default()
        }
    }

    /// Read a connector's endpoints from its line constraints
    ///
    /// Endpoints are resolved against the shapes seen in the same document;
    /// unknown endpoints are left empty.
    pub fn parse_association(
        &self,
        id: EntityId,
        stereotype: Stereotype,
        source: &Value,
        known: &HashMap<EntityId, Stereotype>,
    ) -> AssociationDefinition {
        let mut association = if stereotype == Stereotype::Extends {
            AssociationDefinition::generalization()
        } else {
            AssociationDefinition::implementation()
        };
        association.base.entity.id = id;

        let endpoint = |constraint: &str, kind: &str| -> Option<BaseDefinition> {
            let node_id = source
                .get("constraints")?
                .get(constraint)?
                .get(kind)?
                .get("nodeId")?;
            let node_id = match node_id {
                Value::String(s) => EntityId::from(s.as_str()),
                Value::Number(n) => EntityId::from(n.to_string()),
                _ => return None,
            };
            let stereotype = *known.get(&node_id)?;
            Some(BaseDefinition {
                entity: BaseEntity::with_id(node_id),
                stereotype,
                parent: String::new(),
            })
        };

        association.source = endpoint("startConstraint", "StartPositionConstraint");
        association.destination = endpoint("endConstraint", "EndPositionConstraint");
        association
    }
}

impl Importer for GliffyImporter {
    fn import(&self, document: &str, name: &str) -> Result<ModelDefinition, ImportError> {
        let root = parse_value(document, name)?;
        let mut model = ModelDefinition::new(name);

        let objects = root
            .get("stage")
            .and_then(|stage| stage.get("objects"))
            .and_then(Value::as_array);

        let Some(objects) = objects else {
            debug!(model = name; "Document has no stage.objects, nothing to import");
            return Ok(model);
        };

        let nodes: Vec<GliffyNode<'_>> = objects.iter().map(GliffyNode::parse).collect();
        let known: HashMap<EntityId, Stereotype> = nodes
            .iter()
            .filter_map(|n| n.stereotype.map(|s| (n.id.clone(), s)))
            .collect();

        for node in nodes {
            match node.stereotype {
                Some(stereotype) if stereotype.is_association() => {
                    // Associations are not attached to their definitions yet
                    let association =
                        self.parse_association(node.id, stereotype, node.source, &known);
                    debug!(association:? = association; "Skipping association");
                }
                Some(Stereotype::Class) => {
                    let class = self.create_class(node.id, node.source);
                    debug!(
                        class = class.header.name.as_str(),
                        attributes = class.attributes.len(),
                        methods = class.methods.len();
                        "Found class"
                    );
                    model.add_class(class);
                }
                Some(Stereotype::Interface) => {
                    let interface = self.create_interface(node.id, node.source);
                    debug!(
                        interface = interface.header.name.as_str(),
                        methods = interface.methods.len();
                        "Found interface"
                    );
                    model.add_interface(interface);
                }
                Some(Stereotype::Package) => {
                    let package = self.create_package(node.id, node.source);
                    debug!(package = package.name.as_str(); "Found package");
                    model.add_package(package);
                }
                other => {
                    trace!(id:% = node.id, stereotype:? = other; "Ignoring shape");
                }
            }
        }

        model.promote_default_package();

        info!(
            model = name,
            classes = model.classes.len(),
            interfaces = model.interfaces.len(),
            packages = model.packages.len();
            "Imported diagram"
        );

        Ok(model)
    }
}

/// Stereotype from the last segment of the shape identifier
fn locate_stereotype(source: &Value) -> Option<Stereotype> {
    let uid = source.get("uid")?.as_str()?;
    let captures = UID_PATTERN.captures(uid)?;
    captures.get(1)?.as_str().parse().ok()
}

/// The authoritative label is the last match in the name compartment
fn find_name(compartments: &Compartments<'_>) -> String {
    compartments
        .region(Region::Name)
        .and_then(|region| find_texts(region, &NAME_PATTERN).pop())
        .unwrap_or_default()
}

/// Attributes of the form `name: type`
fn find_attributes(region: Option<&Value>) -> Vec<AttributeDefinition> {
    let Some(region) = region else {
        return Vec::new();
    };

    find_texts(region, &ATTRIBUTES_PATTERN)
        .iter()
        .filter_map(|text| {
            let captures = ATTRIBUTE_PATTERN.captures(text)?;
            Some(AttributeDefinition::new(&captures[1], &captures[2]))
        })
        .collect()
}

/// Methods of the form `name(param:type, ...): returnType`
fn find_methods(region: Option<&Value>) -> Vec<MethodDefinition> {
    let Some(region) = region else {
        return Vec::new();
    };

    find_texts(region, &METHODS_PATTERN)
        .iter()
        .filter_map(|text| {
            let captures = METHOD_PATTERN.captures(text)?;
            let mut method = MethodDefinition::new(&captures[1], &captures[3]);
            for parameter in PARAMETER_PATTERN.captures_iter(&captures[2]) {
                method.add_parameter(&parameter[1], &parameter[2]);
            }
            Some(method)
        })
        .collect()
}

/// Collect pattern captures from the rich-text leaves under `node`
///
/// A child with its own children replaces what was collected so far, so
/// only the last text-bearing branch reached contributes. Leaves append
/// every non-empty captured group.
fn find_texts(node: &Value, pattern: &Regex) -> Vec<String> {
    let mut texts = Vec::new();
    let Some(children) = node.get("children").and_then(Value::as_array) else {
        return texts;
    };

    for child in children {
        if child.get("children").is_some_and(|c| !c.is_null()) {
            texts = find_texts(child, pattern);
        } else if let Some(html) = text_payload(child) {
            for captures in pattern.captures_iter(html) {
                for group in captures.iter().skip(1).flatten() {
                    if !group.as_str().is_empty() {
                        texts.push(group.as_str().to_string());
                    }
                }
            }
        }
    }

    texts
}

/// The html of a `Text` graphic, if the node carries one
fn text_payload(node: &Value) -> Option<&str> {
    let graphic = node.get("graphic")?;
    if graphic.get("type")?.as_str()? != "Text" {
        return None;
    }
    graphic.get("Text")?.get("html")?.as_str()
}
