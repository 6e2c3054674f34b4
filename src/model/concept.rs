//! Concept taxonomy: ArchiMate elements and relationships

use std::fmt;

use super::ObjectKey;

/// Top-level taxonomy category of a concept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Strategy,
    Business,
    Application,
    Technology,
    Physical,
    Motivation,
    ImplementationMigration,
    Other,
    Relations,
}

/// ArchiMate element types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    // Strategy
    Resource,
    Capability,
    ValueStream,
    CourseOfAction,

    // Business
    BusinessActor,
    BusinessRole,
    BusinessCollaboration,
    BusinessInterface,
    BusinessProcess,
    BusinessFunction,
    BusinessInteraction,
    BusinessEvent,
    BusinessService,
    BusinessObject,
    Contract,
    Representation,
    Product,

    // Application
    ApplicationComponent,
    ApplicationCollaboration,
    ApplicationInterface,
    ApplicationFunction,
    ApplicationInteraction,
    ApplicationProcess,
    ApplicationEvent,
    ApplicationService,
    DataObject,

    // Technology
    Node,
    Device,
    SystemSoftware,
    TechnologyCollaboration,
    TechnologyInterface,
    Path,
    CommunicationNetwork,
    TechnologyFunction,
    TechnologyProcess,
    TechnologyInteraction,
    TechnologyEvent,
    TechnologyService,
    Artifact,

    // Physical
    Equipment,
    Facility,
    DistributionNetwork,
    Material,

    // Motivation
    Stakeholder,
    Driver,
    Assessment,
    Goal,
    Outcome,
    Principle,
    Requirement,
    Constraint,
    Meaning,
    Value,

    // Implementation & Migration
    WorkPackage,
    Deliverable,
    ImplementationEvent,
    Plateau,
    Gap,

    // Other
    Location,
    Grouping,
    Junction,
}

impl ElementType {
    /// Human-readable type label
    pub fn label(self) -> &'static str {
        match self {
            ElementType::Resource => "Resource",
            ElementType::Capability => "Capability",
            ElementType::ValueStream => "Value Stream",
            ElementType::CourseOfAction => "Course of Action",
            ElementType::BusinessActor => "Business Actor",
            ElementType::BusinessRole => "Business Role",
            ElementType::BusinessCollaboration => "Business Collaboration",
            ElementType::BusinessInterface => "Business Interface",
            ElementType::BusinessProcess => "Business Process",
            ElementType::BusinessFunction => "Business Function",
            ElementType::BusinessInteraction => "Business Interaction",
            ElementType::BusinessEvent => "Business Event",
            ElementType::BusinessService => "Business Service",
            ElementType::BusinessObject => "Business Object",
            ElementType::Contract => "Contract",
            ElementType::Representation => "Representation",
            ElementType::Product => "Product",
            ElementType::ApplicationComponent => "Application Component",
            ElementType::ApplicationCollaboration => "Application Collaboration",
            ElementType::ApplicationInterface => "Application Interface",
            ElementType::ApplicationFunction => "Application Function",
            ElementType::ApplicationInteraction => "Application Interaction",
            ElementType::ApplicationProcess => "Application Process",
            ElementType::ApplicationEvent => "Application Event",
            ElementType::ApplicationService => "Application Service",
            ElementType::DataObject => "Data Object",
            ElementType::Node => "Node",
            ElementType::Device => "Device",
            ElementType::SystemSoftware => "System Software",
            ElementType::TechnologyCollaboration => "Technology Collaboration",
            ElementType::TechnologyInterface => "Technology Interface",
            ElementType::Path => "Path",
            ElementType::CommunicationNetwork => "Communication Network",
            ElementType::TechnologyFunction => "Technology Function",
            ElementType::TechnologyProcess => "Technology Process",
            ElementType::TechnologyInteraction => "Technology Interaction",
            ElementType::TechnologyEvent => "Technology Event",
            ElementType::TechnologyService => "Technology Service",
            ElementType::Artifact => "Artifact",
            ElementType::Equipment => "Equipment",
            ElementType::Facility => "Facility",
            ElementType::DistributionNetwork => "Distribution Network",
            ElementType::Material => "Material",
            ElementType::Stakeholder => "Stakeholder",
            ElementType::Driver => "Driver",
            ElementType::Assessment => "Assessment",
            ElementType::Goal => "Goal",
            ElementType::Outcome => "Outcome",
            ElementType::Principle => "Principle",
            ElementType::Requirement => "Requirement",
            ElementType::Constraint => "Constraint",
            ElementType::Meaning => "Meaning",
            ElementType::Value => "Value",
            ElementType::WorkPackage => "Work Package",
            ElementType::Deliverable => "Deliverable",
            ElementType::ImplementationEvent => "Implementation Event",
            ElementType::Plateau => "Plateau",
            ElementType::Gap => "Gap",
            ElementType::Location => "Location",
            ElementType::Grouping => "Grouping",
            ElementType::Junction => "Junction",
        }
    }

    /// Taxonomy category, which decides the default folder
    pub fn category(self) -> Category {
        use ElementType::*;
        match self {
            Resource | Capability | ValueStream | CourseOfAction => Category::Strategy,
            BusinessActor | BusinessRole | BusinessCollaboration | BusinessInterface
            | BusinessProcess | BusinessFunction | BusinessInteraction | BusinessEvent
            | BusinessService | BusinessObject | Contract | Representation | Product => {
                Category::Business
            }
            ApplicationComponent | ApplicationCollaboration | ApplicationInterface
            | ApplicationFunction | ApplicationInteraction | ApplicationProcess
            | ApplicationEvent | ApplicationService | DataObject => Category::Application,
            Node | Device | SystemSoftware | TechnologyCollaboration | TechnologyInterface
            | Path | CommunicationNetwork | TechnologyFunction | TechnologyProcess
            | TechnologyInteraction | TechnologyEvent | TechnologyService | Artifact => {
                Category::Technology
            }
            Equipment | Facility | DistributionNetwork | Material => Category::Physical,
            Stakeholder | Driver | Assessment | Goal | Outcome | Principle | Requirement
            | Constraint | Meaning | Value => Category::Motivation,
            WorkPackage | Deliverable | ImplementationEvent | Plateau | Gap => {
                Category::ImplementationMigration
            }
            Location | Grouping | Junction => Category::Other,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// ArchiMate relationship types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationshipType {
    Composition,
    Aggregation,
    Assignment,
    Realization,
    Serving,
    Access,
    Influence,
    Triggering,
    Flow,
    Specialization,
    Association,
}

impl RelationshipType {
    pub const ALL: [RelationshipType; 11] = [
        RelationshipType::Composition,
        RelationshipType::Aggregation,
        RelationshipType::Assignment,
        RelationshipType::Realization,
        RelationshipType::Serving,
        RelationshipType::Access,
        RelationshipType::Influence,
        RelationshipType::Triggering,
        RelationshipType::Flow,
        RelationshipType::Specialization,
        RelationshipType::Association,
    ];

    /// Keyword used in `$keyword:source{...}` directives
    pub fn keyword(self) -> &'static str {
        match self {
            RelationshipType::Composition => "composition",
            RelationshipType::Aggregation => "aggregation",
            RelationshipType::Assignment => "assignment",
            RelationshipType::Realization => "realization",
            RelationshipType::Serving => "serving",
            RelationshipType::Access => "access",
            RelationshipType::Influence => "influence",
            RelationshipType::Triggering => "triggering",
            RelationshipType::Flow => "flow",
            RelationshipType::Specialization => "specialization",
            RelationshipType::Association => "association",
        }
    }

    /// Human-readable type label
    pub fn label(self) -> &'static str {
        match self {
            RelationshipType::Composition => "Composition relation",
            RelationshipType::Aggregation => "Aggregation relation",
            RelationshipType::Assignment => "Assignment relation",
            RelationshipType::Realization => "Realization relation",
            RelationshipType::Serving => "Serving relation",
            RelationshipType::Access => "Access relation",
            RelationshipType::Influence => "Influence relation",
            RelationshipType::Triggering => "Triggering relation",
            RelationshipType::Flow => "Flow relation",
            RelationshipType::Specialization => "Specialization relation",
            RelationshipType::Association => "Association relation",
        }
    }

    /// Look up a relationship type by keyword, ignoring case
    ///
    /// Returns None for anything that is not exactly one of the keywords.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.keyword().eq_ignore_ascii_case(keyword))
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A custom key/value property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub key: String,
    pub value: String,
}

impl Property {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// What kind of concept this is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConceptKind {
    Element(ElementType),
    /// Directed edge between two concepts
    Relationship {
        kind: RelationshipType,
        source: ObjectKey,
        target: ObjectKey,
    },
}

/// A semantic model element or relationship
#[derive(Debug, Clone)]
pub struct Concept {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) documentation: String,
    pub(crate) properties: Vec<Property>,
    pub(crate) kind: ConceptKind,
    pub(crate) folder: ObjectKey,
}

impl Concept {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn documentation(&self) -> &str {
        &self.documentation
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn kind(&self) -> &ConceptKind {
        &self.kind
    }

    /// Folder directly containing this concept
    pub fn folder(&self) -> ObjectKey {
        self.folder
    }

    pub fn category(&self) -> Category {
        match self.kind {
            ConceptKind::Element(element) => element.category(),
            ConceptKind::Relationship { .. } => Category::Relations,
        }
    }

    pub fn type_label(&self) -> &'static str {
        match self.kind {
            ConceptKind::Element(element) => element.label(),
            ConceptKind::Relationship { kind, .. } => kind.label(),
        }
    }

    pub fn is_relationship(&self) -> bool {
        matches!(self.kind, ConceptKind::Relationship { .. })
    }

    pub fn relationship_type(&self) -> Option<RelationshipType> {
        match self.kind {
            ConceptKind::Relationship { kind, .. } => Some(kind),
            ConceptKind::Element(_) => None,
        }
    }

    /// Source and target of a relationship
    pub fn endpoints(&self) -> Option<(ObjectKey, ObjectKey)> {
        match self.kind {
            ConceptKind::Relationship { source, target, .. } => Some((source, target)),
            ConceptKind::Element(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationship_keyword_ignores_case() {
        assert_eq!(
            RelationshipType::from_keyword("Assignment"),
            Some(RelationshipType::Assignment)
        );
        assert_eq!(
            RelationshipType::from_keyword("SERVING"),
            Some(RelationshipType::Serving)
        );
    }

    #[test]
    fn test_relationship_keyword_no_partial_match() {
        assert_eq!(RelationshipType::from_keyword("assign"), None);
        assert_eq!(RelationshipType::from_keyword("assignments"), None);
        assert_eq!(RelationshipType::from_keyword(""), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(ElementType::BusinessActor.label(), "Business Actor");
        assert_eq!(ElementType::CourseOfAction.label(), "Course of Action");
        assert_eq!(RelationshipType::Assignment.label(), "Assignment relation");
    }

    #[test]
    fn test_categories() {
        assert_eq!(ElementType::Capability.category(), Category::Strategy);
        assert_eq!(ElementType::DataObject.category(), Category::Application);
        assert_eq!(ElementType::Facility.category(), Category::Physical);
        assert_eq!(ElementType::Gap.category(), Category::ImplementationMigration);
        assert_eq!(ElementType::Junction.category(), Category::Other);
    }
}
