use std::borrow::Cow;
use std::path::{Path, PathBuf};

use compio::fs;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::{debug, info};

use crate::ext::BestEffortPathExt;
use crate::structure::CanonicalNode;

/// What one run checks for: the required layout and the assignment-specific
/// lists and selectors. Built in immutably before the run starts.
///
/// Everything has a built-in default; a `checks.yaml` next to the grader can
/// override any field. The canonical tree keeps the file's declaration order.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    pub structure: Vec<CanonicalNode>,
    pub index_html: String,
    pub semantic_tags: Vec<String>,
    pub font_whitelist: Vec<String>,
    pub reset_tags: Vec<String>,
    pub logo_selector: String,
    pub fonts_css: String,
    pub main_css: String,
    pub stylelint_config: PathBuf,
    pub css_glob: String,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            structure: vec![
                CanonicalNode::file("index.html"),
                CanonicalNode::directory("styles", vec![CanonicalNode::file("style.css")]),
                CanonicalNode::directory("fonts", vec![CanonicalNode::file("fonts.css")]),
            ],
            index_html: "index.html".to_string(),
            semantic_tags: vec![
                "header".to_string(),
                "main".to_string(),
                "footer".to_string(),
            ],
            font_whitelist: vec![
                "Arial".to_string(),
                "Helvetica".to_string(),
                "Inter".to_string(),
                "Roboto".to_string(),
            ],
            reset_tags: vec![
                "body".to_string(),
                "h1".to_string(),
                "h2".to_string(),
                "h3".to_string(),
                "p".to_string(),
                "ul".to_string(),
            ],
            logo_selector: "header a .logo".to_string(),
            fonts_css: "fonts/fonts.css".to_string(),
            main_css: "styles/style.css".to_string(),
            stylelint_config: PathBuf::from(".stylelintrc.json"),
            css_glob: "styles/**/*.css".to_string(),
        }
    }
}

impl CheckConfig {
    /// Loads the configuration file, falling back to the defaults when it
    /// does not exist. A present but unreadable or malformed file is an
    /// error, not a silent fallback.
    pub async fn read(path: &Path) -> Result<Self, CheckConfigError> {
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "No configuration at {}, using built-in defaults",
                    path.best_effort_path_display()
                );
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(CheckConfigError::ReadError {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        debug!("Read configuration from {}", path.best_effort_path_display());
        String::from_utf8_lossy(&bytes).as_ref().try_into()
    }
}

fn key(name: &str) -> Yaml<'_> {
    Yaml::Value(Scalar::String(Cow::Borrowed(name)))
}

fn string_list(
    top_level: &LinkedHashMap<Yaml, Yaml>,
    name: &'static str,
    default: Vec<String>,
) -> Result<Vec<String>, CheckConfigError> {
    let Some(value) = top_level.get(&key(name)) else {
        return Ok(default);
    };
    let seq = value.as_sequence().ok_or(CheckConfigError::NotAList { name })?;
    seq.iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or(CheckConfigError::NotAList { name })
        })
        .collect()
}

fn string_value(
    top_level: &LinkedHashMap<Yaml, Yaml>,
    name: &'static str,
    default: String,
) -> Result<String, CheckConfigError> {
    match top_level.get(&key(name)) {
        None => Ok(default),
        Some(value) => value
            .as_str()
            .map(str::to_string)
            .ok_or(CheckConfigError::NotAString { name }),
    }
}

/// A mapping entry with a null value is a file; a nested mapping is a
/// directory.
fn parse_structure(
    mapping: &LinkedHashMap<Yaml, Yaml>,
) -> Result<Vec<CanonicalNode>, CheckConfigError> {
    let mut nodes = Vec::new();
    for (node_key, value) in mapping {
        let Yaml::Value(Scalar::String(name)) = node_key else {
            return Err(CheckConfigError::BadStructureEntry {
                entry: format!("{node_key:?}"),
            });
        };
        let node = match value {
            Yaml::Value(Scalar::Null) => CanonicalNode::file(name.as_ref()),
            Yaml::Mapping(children) => {
                CanonicalNode::directory(name.as_ref(), parse_structure(children)?)
            }
            _ => {
                return Err(CheckConfigError::BadStructureEntry {
                    entry: name.to_string(),
                });
            }
        };
        nodes.push(node);
    }
    Ok(nodes)
}

impl TryFrom<&str> for CheckConfig {
    type Error = CheckConfigError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents =
            Yaml::load_from_str(contents).map_err(|e| CheckConfigError::ParseError { source: e })?;
        let document = documents.first().ok_or(CheckConfigError::MalformedConfig)?;
        let top_level = document
            .as_mapping()
            .ok_or(CheckConfigError::TopLevelNotMap)?;

        let defaults = CheckConfig::default();

        let structure = match top_level.get(&key("structure")) {
            None => defaults.structure,
            Some(Yaml::Mapping(mapping)) => parse_structure(mapping)?,
            Some(_) => return Err(CheckConfigError::StructureNotMap),
        };

        Ok(CheckConfig {
            structure,
            index_html: string_value(top_level, "indexHtml", defaults.index_html)?,
            semantic_tags: string_list(top_level, "semanticTags", defaults.semantic_tags)?,
            font_whitelist: string_list(top_level, "fonts", defaults.font_whitelist)?,
            reset_tags: string_list(top_level, "resetTags", defaults.reset_tags)?,
            logo_selector: string_value(top_level, "logoSelector", defaults.logo_selector)?,
            fonts_css: string_value(top_level, "fontsCss", defaults.fonts_css)?,
            main_css: string_value(top_level, "mainCss", defaults.main_css)?,
            stylelint_config: string_value(
                top_level,
                "stylelintConfig",
                defaults.stylelint_config.to_string_lossy().into_owned(),
            )?
            .into(),
            css_glob: string_value(top_level, "cssGlob", defaults.css_glob)?,
        })
    }
}

#[derive(Debug, Snafu)]
pub enum CheckConfigError {
    #[snafu(display("Failed to read configuration file {}", path.best_effort_path_display()))]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse the configuration file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted configuration file"))]
    MalformedConfig,
    #[snafu(display("Top level of the configuration should be a map"))]
    TopLevelNotMap,
    #[snafu(display("The structure section should be a map"))]
    StructureNotMap,
    #[snafu(display("'{name}' should be a list of strings"))]
    NotAList { name: &'static str },
    #[snafu(display("'{name}' should be a string"))]
    NotAString { name: &'static str },
    #[snafu(display("Invalid structure entry: {entry}"))]
    BadStructureEntry { entry: String },
}
