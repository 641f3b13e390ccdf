use indexmap::IndexMap;
use log::debug;

/// One documented member of a [`Model`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Property {
    /// Member whose declared type is an enumeration
    Enum {
        /// Constant names in declaration order
        values: Vec<String>,
        description: String,
    },
    /// Member referencing any other type
    Typed {
        /// Resolved name of the declared type
        type_name: String,
        description: String,
        /// Resolved name of the element type when the declared type is parameterized
        container_of: Option<String>,
    },
}

impl Property {
    pub fn enumeration(values: Vec<String>, description: impl Into<String>) -> Self {
        Property::Enum {
            values,
            description: description.into(),
        }
    }

    pub fn typed(
        type_name: impl Into<String>,
        description: impl Into<String>,
        container_of: Option<String>,
    ) -> Self {
        Property::Typed {
            type_name: type_name.into(),
            description: description.into(),
            container_of,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Property::Enum { description, .. } | Property::Typed { description, .. } => {
                description
            }
        }
    }
}

/// A named record of documented properties for one source type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    /// Resolved type name, unique within a [`ModelSet`]
    pub id: String,
    /// Properties in discovery order
    pub properties: IndexMap<String, Property>,
}

impl Model {
    pub fn new(id: impl Into<String>, properties: IndexMap<String, Property>) -> Self {
        Self {
            id: id.into(),
            properties,
        }
    }
}

/// Insertion-ordered set of models, deduplicated by [`Model::id`].
///
/// Two different source types that translate to the same name share one entry: the
/// first one registered wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelSet {
    models: IndexMap<String, Model>,
}

impl ModelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a model unless one with the same id exists. Returns whether it was added.
    pub fn insert(&mut self, model: Model) -> bool {
        if self.models.contains_key(&model.id) {
            debug!("Model {} already registered", model.id);
            return false;
        }
        self.models.insert(model.id.clone(), model);
        true
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.models.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Model> {
        self.models.get(id)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Model> {
        self.models.values()
    }

    /// Model ids in registration order
    pub fn ids(&self) -> Vec<&str> {
        self.models.keys().map(String::as_str).collect()
    }

    /// Add every model of `other` whose id is not taken yet
    pub fn merge(&mut self, other: ModelSet) {
        for model in other.into_models() {
            self.insert(model);
        }
    }

    pub fn into_models(self) -> Vec<Model> {
        self.models.into_values().collect()
    }
}

impl IntoIterator for ModelSet {
    type Item = Model;
    type IntoIter = indexmap::map::IntoValues<String, Model>;

    fn into_iter(self) -> Self::IntoIter {
        self.models.into_values()
    }
}
