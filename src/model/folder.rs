//! Folder hierarchy for concepts and views

use super::concept::{Category, Property};
use super::ObjectKey;

/// Folder type: one of the default top-level folders, or a user subfolder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FolderType {
    Strategy,
    Business,
    Application,
    /// Holds both technology and physical elements
    Technology,
    Motivation,
    ImplementationMigration,
    Other,
    Relations,
    Views,
    User,
}

impl FolderType {
    /// Default top-level folders in creation order
    pub const TOP_LEVEL: [FolderType; 9] = [
        FolderType::Strategy,
        FolderType::Business,
        FolderType::Application,
        FolderType::Technology,
        FolderType::Motivation,
        FolderType::ImplementationMigration,
        FolderType::Other,
        FolderType::Relations,
        FolderType::Views,
    ];

    /// Default name of the top-level folder of this type
    pub fn default_name(self) -> &'static str {
        match self {
            FolderType::Strategy => "Strategy",
            FolderType::Business => "Business",
            FolderType::Application => "Application",
            FolderType::Technology => "Technology & Physical",
            FolderType::Motivation => "Motivation",
            FolderType::ImplementationMigration => "Implementation & Migration",
            FolderType::Other => "Other",
            FolderType::Relations => "Relations",
            FolderType::Views => "Views",
            FolderType::User => "New Folder",
        }
    }

    /// Top-level folder that holds concepts of a category
    pub fn for_category(category: Category) -> Self {
        match category {
            Category::Strategy => FolderType::Strategy,
            Category::Business => FolderType::Business,
            Category::Application => FolderType::Application,
            Category::Technology | Category::Physical => FolderType::Technology,
            Category::Motivation => FolderType::Motivation,
            Category::ImplementationMigration => FolderType::ImplementationMigration,
            Category::Other => FolderType::Other,
            Category::Relations => FolderType::Relations,
        }
    }
}

/// A folder in the model tree
#[derive(Debug, Clone)]
pub struct Folder {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) documentation: String,
    pub(crate) properties: Vec<Property>,
    pub(crate) folder_type: FolderType,
    /// Type of the top-level folder this one lives under (itself if top-level)
    pub(crate) root_type: FolderType,
    pub(crate) parent: Option<ObjectKey>,
}

impl Folder {
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

    pub fn folder_type(&self) -> FolderType {
        self.folder_type
    }

    pub fn root_type(&self) -> FolderType {
        self.root_type
    }

    /// Parent folder, None for top-level folders
    pub fn parent(&self) -> Option<ObjectKey> {
        self.parent
    }

    pub fn is_top_level(&self) -> bool {
        self.parent.is_none()
    }

    /// Whether this folder holds views rather than concepts
    pub fn is_view_folder(&self) -> bool {
        self.root_type == FolderType::Views
    }

    pub fn is_model_folder(&self) -> bool {
        !self.is_view_folder()
    }

    /// Whether concepts of `category` may live in this folder
    pub fn accepts(&self, category: Category) -> bool {
        self.root_type == FolderType::for_category(category)
    }
}
