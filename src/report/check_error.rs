use std::collections::BTreeMap;

use derive_more::Display;

/// Discriminant shared by canonical and actual tree nodes.
///
/// Its display form is spliced into the `structure.<kind>` error id, so the
/// lowercase spelling is part of the stable taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum NodeKind {
    #[display("file")]
    File,
    #[display("directory")]
    Directory,
}

/// One failed expectation, keyed by a stable dotted id.
///
/// The set of interpolation fields is closed per variant; `values()` exposes
/// them as the flat scalar map the reporting layer expects.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckError {
    /// `structure.file` / `structure.directory` - a required node is absent.
    StructureMissing { kind: NodeKind, name: String },
    /// `w3c` - one markup validator error message.
    Markup { line: u64, message: String },
    /// `stylelint.<rule>` - one linter warning.
    Stylelint {
        rule: String,
        line: u64,
        column: u64,
        text: String,
    },
    /// `alternativeFonts` - font families outside the whitelist.
    AlternativeFonts { fonts: String },
    /// `layoutDifferent` - screenshot deviates from the reference layout.
    LayoutDifferent { difference: f64 },
    /// `semanticTagsMissing` - required semantic tags absent from the page.
    SemanticTagsMissing { tags: String },
    /// `langAttrMissing` - `<html>` lacks the expected lang attribute.
    LangAttrMissing { lang: String },
    /// `orderStylesheetLinks` - font stylesheet linked after the main one.
    OrderStylesheetLinks,
    /// `notResetMargins` - tags whose margin or padding is not zeroed.
    NotResetMargins { tags: String },
    /// `titleEmmet` - the title is still the scaffold placeholder.
    TitleEmmet,
    /// `logoWrapper` - the logo is not wrapped per the expected selector.
    LogoWrapper,
    /// `prefixForEmailAndPhone` - contact links lack mailto:/tel: prefixes.
    PrefixForEmailAndPhone,
}

impl CheckError {
    /// The stable dotted taxonomy key.
    pub fn id(&self) -> String {
        match self {
            CheckError::StructureMissing { kind, .. } => format!("structure.{kind}"),
            CheckError::Markup { .. } => "w3c".to_string(),
            CheckError::Stylelint { rule, .. } => format!("stylelint.{rule}"),
            CheckError::AlternativeFonts { .. } => "alternativeFonts".to_string(),
            CheckError::LayoutDifferent { .. } => "layoutDifferent".to_string(),
            CheckError::SemanticTagsMissing { .. } => "semanticTagsMissing".to_string(),
            CheckError::LangAttrMissing { .. } => "langAttrMissing".to_string(),
            CheckError::OrderStylesheetLinks => "orderStylesheetLinks".to_string(),
            CheckError::NotResetMargins { .. } => "notResetMargins".to_string(),
            CheckError::TitleEmmet => "titleEmmet".to_string(),
            CheckError::LogoWrapper => "logoWrapper".to_string(),
            CheckError::PrefixForEmailAndPhone => "prefixForEmailAndPhone".to_string(),
        }
    }

    /// Interpolation values for the reporting layer, stringified scalars.
    pub fn values(&self) -> BTreeMap<String, String> {
        let mut values = BTreeMap::new();
        match self {
            CheckError::StructureMissing { name, .. } => {
                values.insert("name".to_string(), name.clone());
            }
            CheckError::Markup { line, message } => {
                values.insert("line".to_string(), line.to_string());
                values.insert("message".to_string(), message.clone());
            }
            CheckError::Stylelint {
                line, column, text, ..
            } => {
                values.insert("line".to_string(), line.to_string());
                values.insert("column".to_string(), column.to_string());
                values.insert("text".to_string(), text.clone());
            }
            CheckError::AlternativeFonts { fonts } => {
                values.insert("fonts".to_string(), fonts.clone());
            }
            CheckError::LayoutDifferent { difference } => {
                values.insert("difference".to_string(), format!("{difference:.2}"));
            }
            CheckError::SemanticTagsMissing { tags } | CheckError::NotResetMargins { tags } => {
                values.insert("tags".to_string(), tags.clone());
            }
            CheckError::LangAttrMissing { lang } => {
                values.insert("lang".to_string(), lang.clone());
            }
            CheckError::OrderStylesheetLinks
            | CheckError::TitleEmmet
            | CheckError::LogoWrapper
            | CheckError::PrefixForEmailAndPhone => {}
        }
        values
    }
}
