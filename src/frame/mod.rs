// In: src/frame/mod.rs

//! A minimal concrete table.
//!
//! `DataFrame` owns an ordered list of equal-length columns and a flag telling
//! whether it is a default table (non-nullable kinds only) or a nullable table
//! (nullable kinds only). It is the container `deserialize` produces; row-level
//! querying is out of scope.

pub mod table;

pub use table::Table;

use crate::column::{check_length, Column};
use crate::error::{DataFrameError, Result};
use hashbrown::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub struct DataFrame {
    nullable: bool,
    columns: Vec<Column>,
}

//==================================================================================
// 1. Construction
//==================================================================================

impl DataFrame {
    /// An empty table of the given flavour.
    pub fn empty(nullable: bool) -> Self {
        Self {
            nullable,
            columns: Vec::new(),
        }
    }

    /// A default table. Nullable columns are rejected.
    pub fn new_default(columns: Vec<Column>) -> Result<Self> {
        let mut frame = Self::empty(false);
        for column in columns {
            frame.add_column(column)?;
        }
        Ok(frame)
    }

    /// A nullable table. Non-nullable columns are converted to their nullable kind.
    pub fn new_nullable(columns: Vec<Column>) -> Result<Self> {
        let mut frame = Self::empty(true);
        for column in columns {
            frame.add_column(column)?;
        }
        Ok(frame)
    }

    /// Appends a column, enforcing length, nullability and label uniqueness.
    pub fn add_column(&mut self, column: Column) -> Result<()> {
        let column = if self.nullable && !column.is_nullable() {
            column.as_nullable()?
        } else if !self.nullable && column.is_nullable() {
            return Err(DataFrameError::Validation(format!(
                "A default table cannot hold the nullable column kind {}",
                column.kind()
            )));
        } else {
            column
        };
        if let Some(first) = self.columns.first() {
            check_length(&column, first.len())?;
        }
        if let Some(name) = column.name() {
            if self.column_index(name).is_some() {
                return Err(DataFrameError::Validation(format!(
                    "Duplicate column name '{}'",
                    name
                )));
            }
        }
        self.columns.push(column);
        Ok(())
    }
}

//==================================================================================
// 2. Accessors
//==================================================================================

impl DataFrame {
    pub fn rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn column(&self, index: usize) -> Result<&Column> {
        self.columns.get(index).ok_or(DataFrameError::Bounds {
            index,
            length: self.columns.len(),
        })
    }

    /// Mutable access for element-wise edits; the column keeps its kind and length.
    pub fn column_mut(&mut self, index: usize) -> Result<&mut Column> {
        let length = self.columns.len();
        self.columns
            .get_mut(index)
            .ok_or(DataFrameError::Bounds { index, length })
    }

    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.column_index(name).map(|i| &self.columns[i])
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == Some(name))
    }

    /// The explicit label of a column, or its index as decimal text.
    pub fn column_label(&self, index: usize) -> Result<String> {
        let column = self.column(index)?;
        Ok(column
            .name()
            .map_or_else(|| index.to_string(), str::to_string))
    }

    pub fn column_labels(&self) -> Vec<String> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, c)| c.name().map_or_else(|| i.to_string(), str::to_string))
            .collect()
    }

    pub fn has_column_names(&self) -> bool {
        self.columns.iter().any(|c| c.name().is_some())
    }

    /// Labels every column at once. Names must be unique and non-empty.
    pub fn set_column_names<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        if names.len() != self.columns.len() {
            return Err(DataFrameError::Validation(format!(
                "Expected {} column names but got {}",
                self.columns.len(),
                names.len()
            )));
        }
        let mut seen = HashSet::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            if name.is_empty() {
                return Err(DataFrameError::Validation(
                    "Column names must not be empty".into(),
                ));
            }
            if !seen.insert(name) {
                return Err(DataFrameError::Validation(format!(
                    "Duplicate column name '{}'",
                    name
                )));
            }
        }
        for (column, name) in self.columns.iter_mut().zip(names) {
            column.set_name(Some(name.as_ref()));
        }
        Ok(())
    }

    pub fn iter_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }
}

//==================================================================================
// 3. Flavour Conversion
//==================================================================================

impl DataFrame {
    /// A nullable copy of this table (a plain copy if it already is one).
    pub fn to_nullable(&self) -> Result<Self> {
        let columns = self
            .columns
            .iter()
            .map(Column::as_nullable)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            nullable: true,
            columns,
        })
    }

    /// A default copy of this table; nulls become their element default.
    pub fn to_default(&self) -> Result<Self> {
        let columns = self
            .columns
            .iter()
            .map(Column::as_default)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            nullable: false,
            columns,
        })
    }
}

impl Table for DataFrame {
    fn rows(&self) -> usize {
        DataFrame::rows(self)
    }

    fn columns(&self) -> usize {
        DataFrame::columns(self)
    }

    fn column_at(&self, index: usize) -> Result<&Column> {
        self.column(index)
    }

    fn is_nullable(&self) -> bool {
        self.nullable
    }

    fn from_columns(nullable: bool, columns: Vec<Column>) -> Result<Self> {
        if nullable {
            Self::new_nullable(columns)
        } else {
            Self::new_default(columns)
        }
    }
}
