use crate::model::{Model, ModelSet, Property};
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

const SWAGGER_VERSION: &str = "1.2";

/// Builder for the model definitions document
pub struct DefinitionsBuilder {
    api_version: String,
    base_path: Option<String>,
    models: ModelSet,
}

/// Complete model definitions document (Swagger 1.2 `models` layout)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefinitionsDocument {
    #[serde(rename = "swaggerVersion")]
    pub swagger_version: String,
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    #[serde(rename = "basePath", skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    /// Model schemas keyed by model id, in discovery order
    pub models: IndexMap<String, ModelSchema>,
}

/// Schema of a single model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSchema {
    pub id: String,
    pub properties: IndexMap<String, PropertySchema>,
}

/// Schema of a single model property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySchema {
    /// Type name; `string` for enumerations
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Allowed values of an enumeration
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<String>>,
    /// Element type of a container
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<ItemsRef>,
}

/// Reference to a container's element type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemsRef {
    #[serde(rename = "$ref")]
    pub reference: String,
}

impl DefinitionsBuilder {
    pub fn new() -> Self {
        debug!("Initializing DefinitionsBuilder");
        Self {
            api_version: "1.0.0".to_string(),
            base_path: None,
            models: ModelSet::new(),
        }
    }

    /// Set the API version and base path reported in the document
    pub fn with_info(mut self, api_version: String, base_path: Option<String>) -> Self {
        self.api_version = api_version;
        self.base_path = base_path;
        self
    }

    /// Add the models discovered from one root; ids already present are kept
    pub fn add_models(&mut self, models: ModelSet) {
        debug!("Adding {} models", models.len());
        self.models.merge(models);
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Build the final document
    pub fn build(self) -> DefinitionsDocument {
        debug!("Building definitions document with {} models", self.models.len());

        let models = self
            .models
            .into_iter()
            .map(|model| (model.id.clone(), Self::model_schema(model)))
            .collect();

        DefinitionsDocument {
            swagger_version: SWAGGER_VERSION.to_string(),
            api_version: self.api_version,
            base_path: self.base_path,
            models,
        }
    }

    fn model_schema(model: Model) -> ModelSchema {
        let properties = model
            .properties
            .into_iter()
            .map(|(name, property)| (name, Self::property_schema(property)))
            .collect();

        ModelSchema {
            id: model.id,
            properties,
        }
    }

    fn property_schema(property: Property) -> PropertySchema {
        match property {
            Property::Enum {
                values,
                description,
            } => PropertySchema {
                type_name: "string".to_string(),
                description: non_empty(description),
                allowed_values: Some(values),
                items: None,
            },
            Property::Typed {
                type_name,
                description,
                container_of,
            } => PropertySchema {
                type_name,
                description: non_empty(description),
                allowed_values: None,
                items: container_of.map(|reference| ItemsRef { reference }),
            },
        }
    }
}

impl Default for DefinitionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn model(id: &str, properties: Vec<(&str, Property)>) -> Model {
        Model::new(
            id,
            properties
                .into_iter()
                .map(|(name, property)| (name.to_string(), property))
                .collect(),
        )
    }

    fn model_set(models: Vec<Model>) -> ModelSet {
        let mut set = ModelSet::new();
        for model in models {
            set.insert(model);
        }
        set
    }

    #[test]
    fn test_new_builder() {
        let document = DefinitionsBuilder::new().build();

        assert_eq!(document.swagger_version, "1.2");
        assert_eq!(document.api_version, "1.0.0");
        assert!(document.base_path.is_none());
        assert!(document.models.is_empty());
    }

    #[test]
    fn test_with_info() {
        let document = DefinitionsBuilder::new()
            .with_info("2.3".to_string(), Some("/api".to_string()))
            .build();

        assert_eq!(document.api_version, "2.3");
        assert_eq!(document.base_path.as_deref(), Some("/api"));
    }

    #[test]
    fn test_property_schemas() {
        let mut builder = DefinitionsBuilder::new();
        builder.add_models(model_set(vec![model(
            "Order",
            vec![
                ("id", Property::typed("UUID", "", None)),
                (
                    "items",
                    Property::typed("List", "the lines", Some("LineItem".to_string())),
                ),
                (
                    "status",
                    Property::enumeration(vec!["ACTIVE".to_string(), "CLOSED".to_string()], ""),
                ),
            ],
        )]));

        let document = builder.build();
        let order = &document.models["Order"];
        assert_eq!(order.id, "Order");

        assert_eq!(
            order.properties["id"],
            PropertySchema {
                type_name: "UUID".to_string(),
                description: None,
                allowed_values: None,
                items: None,
            }
        );
        assert_eq!(
            order.properties["items"],
            PropertySchema {
                type_name: "List".to_string(),
                description: Some("the lines".to_string()),
                allowed_values: None,
                items: Some(ItemsRef {
                    reference: "LineItem".to_string()
                }),
            }
        );
        assert_eq!(
            order.properties["status"],
            PropertySchema {
                type_name: "string".to_string(),
                description: None,
                allowed_values: Some(vec!["ACTIVE".to_string(), "CLOSED".to_string()]),
                items: None,
            }
        );
    }

    #[test]
    fn test_add_models_first_id_wins() {
        let mut builder = DefinitionsBuilder::new();
        builder.add_models(model_set(vec![
            model("Order", vec![("id", Property::typed("long", "", None))]),
            model("LineItem", vec![("sku", Property::typed("String", "", None))]),
        ]));
        builder.add_models(model_set(vec![
            model("LineItem", vec![("other", Property::typed("int", "", None))]),
            model("Customer", vec![("name", Property::typed("String", "", None))]),
        ]));
        assert_eq!(builder.model_count(), 3);

        let document = builder.build();
        let ids: Vec<&str> = document.models.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["Order", "LineItem", "Customer"]);
        assert!(document.models["LineItem"].properties.contains_key("sku"));
    }

    #[test]
    fn test_serialized_field_names() {
        let mut builder = DefinitionsBuilder::new().with_info("1".to_string(), None);
        builder.add_models(model_set(vec![model(
            "Cart",
            vec![("lines", Property::typed("Vec", "", Some("Line".to_string())))],
        )]));

        let value = serde_json::to_value(builder.build()).unwrap();
        assert_eq!(value["swaggerVersion"], "1.2");
        assert_eq!(value["apiVersion"], "1");
        assert!(value.get("basePath").is_none());
        assert_eq!(value["models"]["Cart"]["properties"]["lines"]["type"], "Vec");
        assert_eq!(
            value["models"]["Cart"]["properties"]["lines"]["items"]["$ref"],
            "Line"
        );
        assert!(value["models"]["Cart"]["properties"]["lines"]
            .get("description")
            .is_none());
    }
}
