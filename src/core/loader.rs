//! Dataset loading
//!
//! A dataset is a directory with this layout:
//!
//! ```text
//! manifest.yaml            # ordered list of component families
//! materials.yaml           # material catalog
//! components/<family>.yaml # line-item templates for one family
//! ```
//!
//! The default dataset is embedded in the binary. A directory with the same
//! layout can replace it at runtime.

use miette::Diagnostic;
use rust_embed::Embed;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::entities::{ComponentFamily, LineItemTemplate, MaterialCatalog, TemplateStore};
use crate::yaml::YamlSyntaxError;

pub const MANIFEST_FILE: &str = "manifest.yaml";
pub const MATERIALS_FILE: &str = "materials.yaml";
pub const COMPONENTS_DIR: &str = "components";

#[derive(Embed)]
#[folder = "data/"]
struct EmbeddedData;

/// Errors raised while loading a dataset
#[derive(Debug, Error, Diagnostic)]
pub enum DataError {
    #[error("Dataset file not found: {path}")]
    #[diagnostic(
        code(shipquote::data::missing_file),
        help("A dataset needs manifest.yaml, materials.yaml and components/<family>.yaml for every family")
    )]
    MissingFile { path: String },

    #[error("Failed to read {path}")]
    #[diagnostic(code(shipquote::data::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not valid UTF-8")]
    #[diagnostic(code(shipquote::data::encoding))]
    InvalidUtf8 { path: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Yaml(#[from] YamlSyntaxError),

    #[error("Component family '{name}' is listed more than once in the manifest")]
    #[diagnostic(code(shipquote::data::duplicate_family))]
    DuplicateFamily { name: String },

    #[error("The manifest lists no component families")]
    #[diagnostic(code(shipquote::data::empty_manifest))]
    EmptyManifest,
}

#[derive(Debug, Deserialize)]
struct Manifest {
    families: Vec<String>,
}

/// Material catalog plus component templates, shared read-only by every quote
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub materials: MaterialCatalog,
    pub templates: TemplateStore,
}

impl Dataset {
    /// Load the dataset compiled into the binary
    pub fn embedded() -> Result<Self, DataError> {
        debug!("loading embedded dataset");
        Self::from_source(|path| {
            let file = EmbeddedData::get(path).ok_or_else(|| DataError::MissingFile {
                path: path.to_string(),
            })?;
            String::from_utf8(file.data.into_owned()).map_err(|_| DataError::InvalidUtf8 {
                path: path.to_string(),
            })
        })
    }

    /// Load a dataset from a directory on disk
    pub fn load_dir(dir: &Path) -> Result<Self, DataError> {
        debug!(dir = %dir.display(), "loading dataset");
        Self::from_source(|path| read_file(&dir.join(path)))
    }

    /// Load from `dir` when given, otherwise the embedded dataset
    pub fn load(dir: Option<&Path>) -> Result<Self, DataError> {
        match dir {
            Some(dir) => Self::load_dir(dir),
            None => Self::embedded(),
        }
    }

    fn from_source(read: impl Fn(&str) -> Result<String, DataError>) -> Result<Self, DataError> {
        let manifest: Manifest = parse(&read(MANIFEST_FILE)?, MANIFEST_FILE)?;
        if manifest.families.is_empty() {
            return Err(DataError::EmptyManifest);
        }

        let materials: MaterialCatalog = parse(&read(MATERIALS_FILE)?, MATERIALS_FILE)?;

        let mut families: Vec<ComponentFamily> = Vec::with_capacity(manifest.families.len());
        for name in manifest.families {
            let name = name.trim().to_lowercase();
            if families.iter().any(|f| f.name == name) {
                return Err(DataError::DuplicateFamily { name });
            }

            let path = family_path(&name);
            let items: Vec<LineItemTemplate> = parse(&read(&path)?, &path)?;
            debug!(family = %name, items = items.len(), "loaded component family");
            families.push(ComponentFamily { name, items });
        }

        Ok(Self {
            materials,
            templates: TemplateStore::new(families),
        })
    }
}

/// Relative path of a family's template file
pub fn family_path(name: &str) -> String {
    format!("{}/{}.yaml", COMPONENTS_DIR, name)
}

fn read_file(path: &Path) -> Result<String, DataError> {
    let display = path.display().to_string();
    if !path.exists() {
        return Err(DataError::MissingFile { path: display });
    }
    fs::read_to_string(path).map_err(|source| DataError::Io {
        path: display,
        source,
    })
}

fn parse<T: DeserializeOwned + 'static>(content: &str, filename: &str) -> Result<T, DataError> {
    serde_yml::from_str(content)
        .map_err(|e| YamlSyntaxError::from_serde_error(&e, content, filename).into())
}
