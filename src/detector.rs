use crate::catalog::TypeCatalog;
use crate::oracle::Annotation;
use crate::translator::AnnotationAwareTranslator;
use clap::ValueEnum;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const JAXB_PACKAGE: &str = "javax.xml.bind.annotation.";
const JACKSON_PACKAGE: &str = "com.fasterxml.jackson.annotation.";
const SERDE_ATTRIBUTE: &str = "serde";

/// Families of naming annotations the translator chain understands
#[derive(
    Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Convention {
    /// JAXB (`@XmlElement`, `@XmlTransient`, `@XmlRootElement`)
    Jaxb,
    /// Jackson (`@JsonProperty`, `@JsonIgnore`, `@JsonRootName`)
    Jackson,
    /// serde (`#[serde(rename = "...")]`, `#[serde(skip)]`)
    Serde,
}

impl Convention {
    /// The annotation table implementing this convention
    pub fn translator(self) -> AnnotationAwareTranslator {
        match self {
            Convention::Jaxb => AnnotationAwareTranslator::new()
                .ignore("javax.xml.bind.annotation.XmlTransient")
                .element("javax.xml.bind.annotation.XmlElement", "name")
                .root_element("javax.xml.bind.annotation.XmlRootElement", "name"),
            Convention::Jackson => AnnotationAwareTranslator::new()
                .ignore("com.fasterxml.jackson.annotation.JsonIgnore")
                .element("com.fasterxml.jackson.annotation.JsonProperty", "value")
                .root_element("com.fasterxml.jackson.annotation.JsonRootName", "value"),
            Convention::Serde => AnnotationAwareTranslator::new()
                .ignore("serde::skip")
                .ignore("serde::skip_serializing")
                .element("serde", "rename")
                .root_element("serde", "rename"),
        }
    }

    /// Which convention, if any, an annotation belongs to
    fn of(annotation: &Annotation) -> Option<Self> {
        let name = annotation.name.as_str();
        if name.starts_with(JAXB_PACKAGE) {
            Some(Convention::Jaxb)
        } else if name.starts_with(JACKSON_PACKAGE) {
            Some(Convention::Jackson)
        } else if name == SERDE_ATTRIBUTE || name.starts_with("serde::") {
            Some(Convention::Serde)
        } else {
            None
        }
    }
}

/// Naming convention detector.
///
/// Looks at the annotations on every declaration, field and method of a catalog to find
/// out which naming conventions the documented types use.
pub struct ConventionDetector;

/// Result of convention detection
pub struct DetectionResult {
    /// Detected conventions, in translator-chain order
    pub conventions: Vec<Convention>,
}

impl ConventionDetector {
    pub fn detect(catalog: &TypeCatalog) -> DetectionResult {
        debug!("Detecting naming conventions in {} declarations", catalog.len());

        let mut detected = HashSet::new();

        for declaration in catalog.declarations() {
            let member_annotations = declaration
                .fields
                .iter()
                .flat_map(|f| f.annotations.iter())
                .chain(declaration.methods.iter().flat_map(|m| m.annotations.iter()));

            for annotation in declaration.annotations.iter().chain(member_annotations) {
                if let Some(convention) = Convention::of(annotation) {
                    detected.insert(convention);
                }
            }
        }

        let mut conventions: Vec<Convention> = detected.into_iter().collect();
        conventions.sort();
        debug!("Detected conventions: {:?}", conventions);

        DetectionResult { conventions }
    }
}
