//! Column-name restyling.
//!
//! Pure string converters ([`pascal_case`], [`snake_case`], [`camel_case`],
//! [`pascal_snake_case`]) plus [`restyle_columns`], which renames every
//! column of a DataFrame in one pass.
//!
//! Word splitting treats underscores and whitespace as separators; any other
//! character (dots included) travels with its word. Capitalizing a word
//! lowercases its tail, so `XML_data` becomes `XmlData`, not `XMLData`.

use polars::prelude::*;

/// Target casing for [`restyle_columns`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseStyle {
    /// `UserName`
    Pascal,
    /// `user_name`
    Snake,
    /// `userName`
    Camel,
    /// `User_Name`
    PascalSnake,
}

impl CaseStyle {
    /// Apply this style to a single name.
    pub fn apply(self, name: &str) -> String {
        match self {
            CaseStyle::Pascal => pascal_case(name),
            CaseStyle::Snake => snake_case(name),
            CaseStyle::Camel => camel_case(name),
            CaseStyle::PascalSnake => pascal_snake_case(name),
        }
    }
}

fn words(name: &str) -> impl Iterator<Item = &str> {
    name.split(|c: char| c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// `user_name id` → `UserNameId`
pub fn pascal_case(name: &str) -> String {
    words(name).map(capitalize).collect()
}

/// `PascalCase` → `pascal_case`; every capital not at the start gets an
/// underscore in front, so `XMLData` becomes `x_m_l_data`.
pub fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() && i != 0 {
            out.push('_');
        }
        out.extend(ch.to_lowercase());
    }
    out
}

/// `user_name id` → `userNameId`; the first word is lowercased whole.
pub fn camel_case(name: &str) -> String {
    let mut parts = words(name);
    let Some(first) = parts.next() else {
        return String::new();
    };
    let mut out = first.to_lowercase();
    for word in parts {
        out.push_str(&capitalize(word));
    }
    out
}

/// `user name_id` → `User_Name_Id`
pub fn pascal_snake_case(name: &str) -> String {
    words(name).map(capitalize).collect::<Vec<_>>().join("_")
}

/// Rename every column of `df` to `style`.
///
/// Restyling can collapse distinct names into one; that surfaces as polars'
/// duplicate-column error.
///
/// # Examples
///
/// ```
/// use polars::prelude::*;
/// use polars_extensions::{CaseStyle, restyle_columns};
///
/// # fn main() -> PolarsResult<()> {
/// let df = df!("userId" => [1i64, 2], "firstName" => ["a", "b"])?;
/// let df = restyle_columns(&df, CaseStyle::Snake)?;
/// let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
/// assert_eq!(names, vec!["user_id", "first_name"]);
/// # Ok(())
/// # }
/// ```
pub fn restyle_columns(df: &DataFrame, style: CaseStyle) -> PolarsResult<DataFrame> {
    let renames: Vec<(PlSmallStr, String)> = df
        .get_column_names()
        .iter()
        .map(|name| ((*name).clone(), style.apply(name.as_str())))
        .collect();

    let mut out = df.clone();
    for (old, new) in renames {
        if old.as_str() == new {
            continue;
        }
        out.rename(old.as_str(), new.into())?;
    }
    Ok(out)
}
