use archrule_types::{Location, SourcePath};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Immutable snapshot of the analyzed code units.
///
/// Built once by an importer and shared read-only by every rule and extension of a run.
#[derive(Clone, Debug, Default)]
pub struct Classes {
    classes: Vec<ClassModel>,
    by_name: BTreeMap<String, usize>,
}

impl Classes {
    /// Later duplicates of a class name shadow earlier ones in [`Classes::get`];
    /// iteration still yields every entry.
    pub fn new(classes: Vec<ClassModel>) -> Self {
        let by_name = classes
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.clone(), i))
            .collect();
        Self { classes, by_name }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ClassModel> {
        self.classes.iter()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ClassModel> {
        self.by_name.get(name).map(|&i| &self.classes[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Distinct package names, sorted.
    pub fn packages(&self) -> BTreeSet<&str> {
        self.classes.iter().map(|c| c.package()).collect()
    }
}

impl<'a> IntoIterator for &'a Classes {
    type Item = &'a ClassModel;
    type IntoIter = std::slice::Iter<'a, ClassModel>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<ClassModel> for Classes {
    fn from_iter<I: IntoIterator<Item = ClassModel>>(iter: I) -> Self {
        Classes::new(iter.into_iter().collect())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassModel {
    /// Fully qualified name, e.g. `com.example.orders.OrderService`.
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourcePath>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,

    /// Annotation type names, simple or qualified.
    #[serde(default)]
    pub annotations: Vec<String>,

    /// Fully qualified names of classes this class depends on.
    #[serde(default)]
    pub dependencies: Vec<String>,

    #[serde(default)]
    pub fields: Vec<FieldModel>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldModel {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,

    #[serde(default)]
    pub annotations: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl ClassModel {
    pub fn package(&self) -> &str {
        self.name.rsplit_once('.').map(|(pkg, _)| pkg).unwrap_or("")
    }

    pub fn simple_name(&self) -> &str {
        self.name
            .rsplit_once('.')
            .map(|(_, simple)| simple)
            .unwrap_or(&self.name)
    }

    pub fn location(&self) -> Option<Location> {
        self.location_at(self.line)
    }

    pub fn location_at(&self, line: Option<u32>) -> Option<Location> {
        self.source.as_ref().map(|path| Location {
            path: path.clone(),
            line,
        })
    }
}

impl FieldModel {
    /// Matches either the simple or the fully qualified annotation name.
    pub fn has_annotation(&self, simple_name: &str) -> bool {
        self.annotations
            .iter()
            .any(|a| a == simple_name || a.rsplit_once('.').is_some_and(|(_, s)| s == simple_name))
    }
}
