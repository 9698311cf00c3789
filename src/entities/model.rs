//! Model aggregate root

use serde::{Deserialize, Serialize};

use crate::core::identity::EntityId;
use crate::entities::definition::{
    tagged, ClassDefinition, ComponentDefinition, InterfaceDefinition, PackageDefinition,
};
use crate::entities::stereotype::Stereotype;

fn model_stereotype() -> Stereotype {
    Stereotype::Model
}

/// Everything extracted from one diagram
///
/// This is also the persisted artifact handed from the import phase to the
/// export phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDefinition {
    #[serde(default)]
    pub id: EntityId,

    #[serde(default)]
    pub name: String,

    #[serde(default = "model_stereotype")]
    pub stereotype: Stereotype,

    #[serde(default, serialize_with = "tagged::classes")]
    pub classes: Vec<ClassDefinition>,

    #[serde(default, serialize_with = "tagged::interfaces")]
    pub interfaces: Vec<InterfaceDefinition>,

    #[serde(default, serialize_with = "tagged::packages")]
    pub packages: Vec<PackageDefinition>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "tagged::package"
    )]
    pub default_package: Option<PackageDefinition>,
}

impl Default for ModelDefinition {
    fn default() -> Self {
        Self {
            id: EntityId::new(),
            name: String::new(),
            stereotype: Stereotype::Model,
            classes: Vec::new(),
            interfaces: Vec::new(),
            packages: Vec::new(),
            default_package: None,
        }
    }
}

impl ModelDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn add_class(&mut self, class: ClassDefinition) {
        self.classes.push(class);
    }

    pub fn add_interface(&mut self, interface: InterfaceDefinition) {
        self.interfaces.push(interface);
    }

    pub fn add_package(&mut self, package: PackageDefinition) {
        self.packages.push(package);
    }

    /// Promote the only package to the default package
    ///
    /// Does nothing when zero or several packages were found.
    pub fn promote_default_package(&mut self) {
        if let [only] = self.packages.as_slice() {
            self.default_package = Some(only.clone());
        }
    }

    /// Renderable components of the given stereotype, in declaration order
    pub fn components(&self, target: Stereotype) -> Vec<ComponentDefinition> {
        match target {
            Stereotype::Class => self.classes.iter().cloned().map(Into::into).collect(),
            Stereotype::Interface => self.interfaces.iter().cloned().map(Into::into).collect(),
            Stereotype::Package => self.packages.iter().cloned().map(Into::into).collect(),
            _ => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.interfaces.is_empty() && self.packages.is_empty()
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::definition::ComponentHeader;

    fn class(name: &str) -> ClassDefinition {
        ClassDefinition {
            header: ComponentHeader {
                name: name.to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_single_package_is_promoted() {
        let mut model = ModelDefinition::new("bank");
        model.add_class(class("Account"));
        model.add_package(PackageDefinition::new("com.acme"));
        model.promote_default_package();
        assert_eq!(model.default_package.unwrap().name, "com.acme");
    }

    #[test]
    fn test_several_packages_are_not_promoted() {
        let mut model = ModelDefinition::new("bank");
        model.add_package(PackageDefinition::new("a"));
        model.add_package(PackageDefinition::new("b"));
        model.promote_default_package();
        assert!(model.default_package.is_none());
    }

    #[test]
    fn test_json_roundtrip_preserves_order() {
        let mut model = ModelDefinition::new("bank");
        model.add_class(class("Account"));
        model.add_class(class("Customer"));
        model.add_interface(InterfaceDefinition::default());
        model.add_package(PackageDefinition::new("com.acme"));
        model.promote_default_package();

        let json = model.to_json_pretty().unwrap();
        assert!(json.contains("\"defaultPackage\""));
        let parsed = ModelDefinition::from_json(&json).unwrap();

        let names: Vec<_> = parsed.classes.iter().map(|c| c.header.name.as_str()).collect();
        assert_eq!(names, vec!["Account", "Customer"]);
        assert_eq!(parsed.interfaces.len(), 1);
        assert_eq!(parsed.packages[0].name, "com.acme");
        assert_eq!(parsed, model);
    }

    #[test]
    fn test_persisted_entries_carry_stereotype() {
        let mut model = ModelDefinition::new("bank");
        model.add_class(class("Account"));
        model.add_interface(InterfaceDefinition::default());
        model.add_package(PackageDefinition::new("com.acme"));
        model.promote_default_package();

        let json: serde_json::Value =
            serde_json::from_str(&model.to_json_pretty().unwrap()).unwrap();
        assert_eq!(json["stereotype"], "model");
        assert_eq!(json["classes"][0]["stereotype"], "class");
        assert_eq!(json["interfaces"][0]["stereotype"], "interface");
        assert_eq!(json["packages"][0]["stereotype"], "package");
        assert_eq!(json["defaultPackage"]["stereotype"], "package");

        let parsed = ModelDefinition::from_json(&json.to_string()).unwrap();
        assert_eq!(parsed.classes[0].header.name, "Account");
        assert_eq!(parsed, model);
    }

    #[test]
    fn test_components_by_target() {
        let mut model = ModelDefinition::new("bank");
        model.add_class(class("Account"));
        let components = model.components(Stereotype::Class);
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].stereotype(), Stereotype::Class);
        assert!(model.components(Stereotype::Method).is_empty());
    }
}
