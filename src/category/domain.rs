//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, UserID};

/// The identifier of a category, a UUID v4 string assigned at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing identifier, e.g. one taken from a URL.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name from `name` with surrounding whitespace removed.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a category is meant for income or expenses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryKind {
    Income,
    #[default]
    Expense,
}

impl CategoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Income => "Income",
            CategoryKind::Expense => "Expense",
        }
    }
}

impl Display for CategoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryKind {
    type Err = String;

    /// Accepts "Income" or "Expense" in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(CategoryKind::Income),
            "expense" => Ok(CategoryKind::Expense),
            _ => Err(format!("\"{s}\" is not a category kind")),
        }
    }
}

impl ToSql for CategoryKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for CategoryKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: String| FromSqlError::Other(error.into()))
    }
}

/// The colours a category can be shown in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryColor {
    #[default]
    Green,
    Blue,
    Red,
    Yellow,
    Purple,
}

impl CategoryColor {
    /// Every colour, in the order they are offered to the user.
    pub const ALL: [CategoryColor; 5] = [
        CategoryColor::Green,
        CategoryColor::Blue,
        CategoryColor::Red,
        CategoryColor::Yellow,
        CategoryColor::Purple,
    ];

    /// The palette key, e.g. "green".
    pub fn key(&self) -> &'static str {
        match self {
            CategoryColor::Green => "green",
            CategoryColor::Blue => "blue",
            CategoryColor::Red => "red",
            CategoryColor::Yellow => "yellow",
            CategoryColor::Purple => "purple",
        }
    }

    /// The CSS colour, e.g. "#14b8a6".
    pub fn hex(&self) -> &'static str {
        match self {
            CategoryColor::Green => "#14b8a6",
            CategoryColor::Blue => "#60a5fa",
            CategoryColor::Red => "#f87171",
            CategoryColor::Yellow => "#fbbf24",
            CategoryColor::Purple => "#a78bfa",
        }
    }
}

impl Display for CategoryColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for CategoryColor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryColor::ALL
            .into_iter()
            .find(|color| color.key() == s.trim())
            .ok_or_else(|| Error::InvalidCategoryColor(s.to_owned()))
    }
}

impl ToSql for CategoryColor {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.key()))
    }
}

impl FromSql for CategoryColor {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// A user-defined label for grouping transactions, e.g. "Groceries" or "Salary".
///
/// Transactions refer to categories by name only, so renaming or deleting a
/// category leaves existing transactions untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub kind: CategoryKind,
    pub color: CategoryColor,
    pub owner_id: UserID,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

/// The data needed to create a category.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub name: CategoryName,
    pub kind: CategoryKind,
    pub color: CategoryColor,
}

/// A partial update, only the fields that are `Some` are changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryPatch {
    pub name: Option<CategoryName>,
    pub kind: Option<CategoryKind>,
    pub color: Option<CategoryColor>,
}

impl CategoryPatch {
    /// Merge the patch into `category` and stamp `updated_at`, even if the patch is empty.
    pub fn apply(self, category: &mut Category, now: OffsetDateTime) {
        if let Some(name) = self.name {
            category.name = name;
        }
        if let Some(kind) = self.kind {
            category.kind = kind;
        }
        if let Some(color) = self.color {
            category.color = color;
        }

        category.updated_at = Some(now);
    }
}

/// Form data for category creation and editing.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryFormData {
    pub name: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub color: String,
}
