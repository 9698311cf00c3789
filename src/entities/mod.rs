//! UML entity types
//!
//! Pure data: definitions extracted from diagrams, the model aggregate, and
//! the job/step documents that drive import and export.

pub mod definition;
pub mod job;
pub mod model;
pub mod stereotype;

pub use definition::{
    AssociationDefinition, AttributeDefinition, BaseDefinition, BaseEntity, ClassDefinition,
    ComponentDefinition, ComponentHeader, EnumerationDefinition, GeneralizationDefinition,
    ImplementationDefinition, InterfaceDefinition, MethodDefinition, PackageDefinition,
};
pub use job::{ExportStep, ImportStep, UmlJob};
pub use model::ModelDefinition;
pub use stereotype::Stereotype;
