use std::borrow::Cow;
use std::fmt;

use serde_json::{Map, Value};

use super::text::collapse;
use crate::error::{NotebookError, Result};

/// Kind of a notebook cell. Only code cells are rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CellType {
    Code,
    Markdown,
    Raw,
    Other(String),
}

impl CellType {
    pub fn parse(name: &str) -> Self {
        match name {
            "code" => Self::Code,
            "markdown" => Self::Markdown,
            "raw" => Self::Raw,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Code => "code",
            Self::Markdown => "markdown",
            Self::Raw => "raw",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only view of one cell in a notebook
#[derive(Debug, Clone, Copy)]
pub struct Cell<'a> {
    index: usize,
    fields: &'a Map<String, Value>,
}

impl<'a> Cell<'a> {
    pub(crate) fn new(index: usize, value: &'a Value) -> Result<Self> {
        let fields = value
            .as_object()
            .ok_or_else(|| NotebookError::wrong_type(location(index), "cell", "an object"))?;
        Ok(Self { index, fields })
    }

    /// Position of the cell in the notebook
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn location(&self) -> String {
        location(self.index)
    }

    pub fn cell_type(&self) -> Result<CellType> {
        cell_type(self.fields, self.index)
    }

    pub fn is_code(&self) -> Result<bool> {
        Ok(self.cell_type()? == CellType::Code)
    }

    /// The cell's source with fragments joined
    pub fn source_text(&self) -> Result<Cow<'a, str>> {
        let source = self
            .fields
            .get("source")
            .ok_or_else(|| NotebookError::missing(self.location(), "source"))?;
        collapse(source, &self.location(), "source")
    }

    /// Captured outputs. A cell without the field has none.
    pub fn outputs(&self) -> Result<&'a [Value]> {
        match self.fields.get("outputs") {
            None => Ok(&[]),
            Some(Value::Array(outputs)) => Ok(outputs.as_slice()),
            Some(_) => Err(NotebookError::wrong_type(
                self.location(),
                "outputs",
                "an array",
            )),
        }
    }

    pub fn execution_count(&self) -> Option<u64> {
        self.fields.get("execution_count").and_then(Value::as_u64)
    }
}

/// Mutable view of one cell in a notebook
#[derive(Debug)]
pub struct CellMut<'a> {
    index: usize,
    fields: &'a mut Map<String, Value>,
}

impl<'a> CellMut<'a> {
    pub(crate) fn new(index: usize, value: &'a mut Value) -> Result<Self> {
        let fields = value
            .as_object_mut()
            .ok_or_else(|| NotebookError::wrong_type(location(index), "cell", "an object"))?;
        Ok(Self { index, fields })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn as_cell(&self) -> Cell<'_> {
        Cell {
            index: self.index,
            fields: &*self.fields,
        }
    }

    pub(crate) fn cell_type(&self) -> Result<CellType> {
        cell_type(self.fields, self.index)
    }

    pub fn outputs_mut(&mut self) -> Result<Option<&mut Vec<Value>>> {
        match self.fields.get_mut("outputs") {
            None => Ok(None),
            Some(Value::Array(outputs)) => Ok(Some(outputs)),
            Some(_) => Err(NotebookError::wrong_type(
                location(self.index),
                "outputs",
                "an array",
            )),
        }
    }

    /// Replace the outputs, returning what was there before
    pub fn set_outputs(&mut self, outputs: Vec<Value>) -> Option<Value> {
        self.fields
            .insert("outputs".to_string(), Value::Array(outputs))
    }

    pub fn set_execution_count(&mut self, count: u64) {
        self.fields
            .insert("execution_count".to_string(), Value::from(count));
    }
}

fn cell_type(fields: &Map<String, Value>, index: usize) -> Result<CellType> {
    match fields.get("cell_type") {
        Some(Value::String(name)) => Ok(CellType::parse(name)),
        Some(_) => Err(NotebookError::wrong_type(
            location(index),
            "cell_type",
            "a string",
        )),
        None => Err(NotebookError::missing(location(index), "cell_type")),
    }
}

fn location(index: usize) -> String {
    format!("cell {}", index)
}
