//! UML definition types
//!
//! Renderable units (classes, interfaces, enumerations, packages) share a
//! [`ComponentHeader`] and are unified by the [`ComponentDefinition`] sum
//! type, tagged by its `stereotype` field in JSON.

use serde::{Deserialize, Serialize, Serializer};

use crate::core::identity::EntityId;
use crate::entities::stereotype::Stereotype;

fn attribute_stereotype() -> Stereotype {
    Stereotype::Attribute
}

fn method_stereotype() -> Stereotype {
    Stereotype::Method
}

/// Identity and name shared by every entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseEntity {
    /// Unique identifier (generated when not supplied)
    #[serde(default)]
    pub id: EntityId,

    /// Display name, empty until extracted
    #[serde(default)]
    pub name: String,
}

impl BaseEntity {
    /// Create an entity with a generated id and an empty name
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an entity with a caller-supplied id
    pub fn with_id(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Superclass data for all definitions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseDefinition {
    #[serde(flatten)]
    pub entity: BaseEntity,

    pub stereotype: Stereotype,

    /// Id of the enclosing diagram node (only meaningful during import)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub parent: String,
}

impl BaseDefinition {
    pub fn new(stereotype: Stereotype) -> Self {
        Self {
            entity: BaseEntity::new(),
            stereotype,
            parent: String::new(),
        }
    }

    pub fn id(&self) -> &EntityId {
        &self.entity.id
    }

    pub fn name(&self) -> &str {
        &self.entity.name
    }
}

/// An attribute (field) or a method parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    #[serde(default)]
    pub id: EntityId,

    #[serde(default)]
    pub name: String,

    /// Free-form type name, never validated
    #[serde(rename = "type", default)]
    pub type_name: String,

    #[serde(default = "attribute_stereotype")]
    pub stereotype: Stereotype,
}

impl AttributeDefinition {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            type_name: type_name.into(),
            stereotype: Stereotype::Attribute,
        }
    }
}

/// A method with its return type and ordered parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDefinition {
    #[serde(default)]
    pub id: EntityId,

    #[serde(default)]
    pub name: String,

    /// Return type, free-form
    #[serde(rename = "type", default)]
    pub type_name: String,

    #[serde(default)]
    pub parameters: Vec<AttributeDefinition>,

    #[serde(default = "method_stereotype")]
    pub stereotype: Stereotype,
}

impl MethodDefinition {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            type_name: type_name.into(),
            parameters: Vec::new(),
            stereotype: Stereotype::Method,
        }
    }

    /// Append a parameter, keeping declaration order
    pub fn add_parameter(&mut self, name: impl Into<String>, type_name: impl Into<String>) {
        self.parameters.push(AttributeDefinition::new(name, type_name));
    }
}

/// A package; its dotted name maps to output directories
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageDefinition {
    #[serde(default)]
    pub id: EntityId,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub parent: String,
}

impl PackageDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            parent: String::new(),
        }
    }

    /// Dot-separated name segments, empty for the unnamed package
    pub fn segments(&self) -> Vec<&str> {
        self.name.split('.').filter(|s| !s.is_empty()).collect()
    }
}

/// Attributes common to every renderable unit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentHeader {
    #[serde(default)]
    pub id: EntityId,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub parent: String,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "tagged::package"
    )]
    pub package: Option<PackageDefinition>,
}

impl ComponentHeader {
    pub fn with_id(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

/// An interface: a named set of methods
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceDefinition {
    #[serde(flatten)]
    pub header: ComponentHeader,

    #[serde(default)]
    pub methods: Vec<MethodDefinition>,

    /// Name of the extended interface, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub super_class: Option<String>,
}

/// A class: attributes, methods, and optional realized interfaces
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDefinition {
    #[serde(flatten)]
    pub header: ComponentHeader,

    #[serde(default)]
    pub attributes: Vec<AttributeDefinition>,

    #[serde(default)]
    pub methods: Vec<MethodDefinition>,

    /// Name of the extended class, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub super_class: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implementations: Vec<ImplementationDefinition>,
}

/// An enumeration and its literal values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnumerationDefinition {
    #[serde(flatten)]
    pub header: ComponentHeader,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub literals: Vec<String>,
}

/// Any renderable UML unit, selected by its stereotype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stereotype", rename_all = "lowercase")]
pub enum ComponentDefinition {
    Class(ClassDefinition),
    Interface(InterfaceDefinition),
    Enumeration(EnumerationDefinition),
    Package(PackageDefinition),
}

impl ComponentDefinition {
    pub fn stereotype(&self) -> Stereotype {
        match self {
            ComponentDefinition::Class(_) => Stereotype::Class,
            ComponentDefinition::Interface(_) => Stereotype::Interface,
            ComponentDefinition::Enumeration(_) => Stereotype::Enumeration,
            ComponentDefinition::Package(_) => Stereotype::Package,
        }
    }

    pub fn id(&self) -> &EntityId {
        match self {
            ComponentDefinition::Class(c) => &c.header.id,
            ComponentDefinition::Interface(i) => &i.header.id,
            ComponentDefinition::Enumeration(e) => &e.header.id,
            ComponentDefinition::Package(p) => &p.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ComponentDefinition::Class(c) => &c.header.name,
            ComponentDefinition::Interface(i) => &i.header.name,
            ComponentDefinition::Enumeration(e) => &e.header.name,
            ComponentDefinition::Package(p) => &p.name,
        }
    }

    /// The shared header, absent for packages (a package has no package)
    pub fn header(&self) -> Option<&ComponentHeader> {
        match self {
            ComponentDefinition::Class(c) => Some(&c.header),
            ComponentDefinition::Interface(i) => Some(&i.header),
            ComponentDefinition::Enumeration(e) => Some(&e.header),
            ComponentDefinition::Package(_) => None,
        }
    }

    fn header_mut(&mut self) -> Option<&mut ComponentHeader> {
        match self {
            ComponentDefinition::Class(c) => Some(&mut c.header),
            ComponentDefinition::Interface(i) => Some(&mut i.header),
            ComponentDefinition::Enumeration(e) => Some(&mut e.header),
            ComponentDefinition::Package(_) => None,
        }
    }

    pub fn package(&self) -> Option<&PackageDefinition> {
        self.header().and_then(|h| h.package.as_ref())
    }

    /// Assign the owning package; a no-op for packages themselves
    pub fn set_package(&mut self, package: PackageDefinition) {
        if let Some(header) = self.header_mut() {
            header.package = Some(package);
        }
    }
}

impl From<ClassDefinition> for ComponentDefinition {
    fn from(c: ClassDefinition) -> Self {
        ComponentDefinition::Class(c)
    }
}

impl From<InterfaceDefinition> for ComponentDefinition {
    fn from(i: InterfaceDefinition) -> Self {
        ComponentDefinition::Interface(i)
    }
}

impl From<EnumerationDefinition> for ComponentDefinition {
    fn from(e: EnumerationDefinition) -> Self {
        ComponentDefinition::Enumeration(e)
    }
}

impl From<PackageDefinition> for ComponentDefinition {
    fn from(p: PackageDefinition) -> Self {
        ComponentDefinition::Package(p)
    }
}

/// Borrowed view of a definition that serializes with its stereotype tag
#[derive(Serialize)]
#[serde(tag = "stereotype", rename_all = "lowercase")]
enum TaggedRef<'a> {
    Class(&'a ClassDefinition),
    Interface(&'a InterfaceDefinition),
    Package(&'a PackageDefinition),
}

/// `serialize_with` helpers for definitions stored outside a
/// [`ComponentDefinition`], so persisted models keep their `stereotype`
pub(crate) mod tagged {
    use super::*;

    pub fn classes<S: Serializer>(items: &[ClassDefinition], s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(items.iter().map(TaggedRef::Class))
    }

    pub fn interfaces<S: Serializer>(
        items: &[InterfaceDefinition],
        s: S,
    ) -> Result<S::Ok, S::Error> {
        s.collect_seq(items.iter().map(TaggedRef::Interface))
    }

    pub fn packages<S: Serializer>(items: &[PackageDefinition], s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(items.iter().map(TaggedRef::Package))
    }

    pub fn package<S: Serializer>(
        package: &Option<PackageDefinition>,
        s: S,
    ) -> Result<S::Ok, S::Error> {
        match package {
            Some(p) => s.serialize_some(&TaggedRef::Package(p)),
            None => s.serialize_none(),
        }
    }
}

/// A connector between two definitions
///
/// Associations are parsed from diagrams but not yet attached to the
/// definitions they connect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationDefinition {
    #[serde(flatten)]
    pub base: BaseDefinition,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<BaseDefinition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<BaseDefinition>,
}

/// An `extends` connector
pub type GeneralizationDefinition = AssociationDefinition;

/// An `implements` connector
pub type ImplementationDefinition = AssociationDefinition;

impl AssociationDefinition {
    pub fn generalization() -> GeneralizationDefinition {
        Self::of(Stereotype::Extends)
    }

    pub fn implementation() -> ImplementationDefinition {
        Self::of(Stereotype::Implements)
    }

    fn of(stereotype: Stereotype) -> Self {
        Self {
            base: BaseDefinition::new(stereotype),
            source: None,
            destination: None,
        }
    }

    pub fn is_generalization(&self) -> bool {
        self.base.stereotype == Stereotype::Extends
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> ClassDefinition {
        let mut class = ClassDefinition {
            header: ComponentHeader::with_id("4"),
            ..Default::default()
        };
        class.header.name = "Account".to_string();
        class.attributes.push(AttributeDefinition::new("balance", "double"));
        class
    }

    #[test]
    fn test_component_serializes_stereotype_tag() {
        let component = ComponentDefinition::from(account());
        let json = serde_json::to_value(&component).unwrap();
        assert_eq!(json["stereotype"], "class");
        assert_eq!(json["name"], "Account");
        assert_eq!(json["attributes"][0]["type"], "double");
    }

    #[test]
    fn test_component_deserializes_by_stereotype() {
        let json = r#"{"stereotype":"interface","id":"9","name":"Auditable","methods":[]}"#;
        let component: ComponentDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(component.stereotype(), Stereotype::Interface);
        assert_eq!(component.name(), "Auditable");
        assert_eq!(component.id().as_str(), "9");
    }

    #[test]
    fn test_nested_package_carries_stereotype() {
        let mut component = ComponentDefinition::from(account());
        component.set_package(PackageDefinition::new("com.acme"));
        let json = serde_json::to_value(&component).unwrap();
        assert_eq!(json["package"]["stereotype"], "package");
        assert_eq!(json["package"]["name"], "com.acme");

        let parsed: ComponentDefinition = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, component);
    }

    #[test]
    fn test_set_package_ignored_for_packages() {
        let mut component = ComponentDefinition::from(PackageDefinition::new("com.acme"));
        component.set_package(PackageDefinition::new("other"));
        assert!(component.package().is_none());

        let mut component = ComponentDefinition::from(account());
        component.set_package(PackageDefinition::new("com.acme"));
        assert_eq!(component.package().unwrap().name, "com.acme");
    }

    #[test]
    fn test_package_segments() {
        assert_eq!(PackageDefinition::new("com.acme.bank").segments(), vec!["com", "acme", "bank"]);
        assert!(PackageDefinition::new("").segments().is_empty());
    }

    #[test]
    fn test_method_parameters_keep_order() {
        let mut method = MethodDefinition::new("compute", "double");
        method.add_parameter("x", "int");
        method.add_parameter("y", "int");
        let names: Vec<_> = method.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert_eq!(method.stereotype, Stereotype::Method);
    }

    #[test]
    fn test_association_constructors() {
        assert!(AssociationDefinition::generalization().is_generalization());
        let implementation = AssociationDefinition::implementation();
        assert_eq!(implementation.base.stereotype, Stereotype::Implements);
        assert!(implementation.source.is_none());
    }
}
