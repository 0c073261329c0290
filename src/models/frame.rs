use crate::error::{AppError, Result};
use serde_json::{Map, Number, Value};
use std::io;

/// Header of the row label column written ahead of the data columns.
pub const ROW_LABEL_HEADER: &str = "";

/// In-memory table: named columns, labelled rows of JSON cells.
///
/// Row labels behave like a dataframe index. Frames built from plain rows get
/// the labels `0..n`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataFrame {
    columns: Vec<String>,
    index: Vec<Value>,
    rows: Vec<Vec<Value>>,
}

pub trait FromSheetRows: Sized {
    /// Build from worksheet rows, using the first row as headers.
    fn from_sheet_rows(rows: &[Vec<Value>]) -> Result<Self>;
}

pub trait ToSheetRows {
    /// Render as worksheet rows, header row first. With `row_names`, the
    /// labels are written as an extra leading column with an empty header.
    fn to_sheet_rows(&self, row_names: bool) -> Vec<Vec<Value>>;
}

impl DataFrame {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Result<Self> {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if let Some(dup) = first_duplicate(&columns) {
            return Err(AppError::Data(format!("Duplicate column name '{}'", dup)));
        }

        Ok(Self {
            columns,
            index: Vec::new(),
            rows: Vec::new(),
        })
    }

    pub fn from_rows<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        rows: Vec<Vec<Value>>,
    ) -> Result<Self> {
        let mut frame = Self::new(columns)?;
        for row in rows {
            frame.push_row(row)?;
        }
        Ok(frame)
    }

    /// Replace the row labels.
    pub fn with_index(mut self, labels: Vec<Value>) -> Result<Self> {
        if labels.len() != self.rows.len() {
            return Err(AppError::Data(format!(
                "Index has {} labels but frame has {} rows",
                labels.len(),
                self.rows.len()
            )));
        }
        self.index = labels;
        Ok(self)
    }

    /// Append a row labelled with its position.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        let label = Value::from(self.rows.len());
        self.push_labelled_row(label, row)
    }

    pub fn push_labelled_row(&mut self, label: Value, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(AppError::Data(format!(
                "Row {} has {} cells, expected {}",
                self.rows.len() + 1,
                row.len(),
                self.columns.len()
            )));
        }
        self.index.push(label);
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn index(&self) -> &[Value] {
        &self.index
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.column_position(column)?;
        self.rows.get(row).map(|r| &r[col])
    }

    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let col = self.column_position(name)?;
        Some(self.rows.iter().map(|r| &r[col]).collect())
    }

    /// Rows as column name to value maps, keys in column order.
    pub fn records(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect()
            })
            .collect()
    }

    /// Move `column` out of the data and use its cells as row labels.
    pub fn set_index(mut self, column: &str) -> Result<Self> {
        let col = self
            .column_position(column)
            .ok_or_else(|| AppError::Data(format!("No column named '{}'", column)))?;

        self.columns.remove(col);
        self.index = self.rows.iter_mut().map(|row| row.remove(col)).collect();
        Ok(self)
    }

    /// Fails when a column is already named like the row label column, which
    /// would leave a worksheet with a non-unique header row.
    pub fn check_row_names(&self) -> Result<()> {
        match self.column_position(ROW_LABEL_HEADER) {
            Some(_) => Err(AppError::Data(
                "Frame already has a column with an empty name; call set_index(\"\") \
                 before writing it with row labels"
                    .to_string(),
            )),
            None => Ok(()),
        }
    }

    fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Read a CSV with a header row. Numeric cells become numbers.
    pub fn from_csv<R: io::Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let mut frame = Self::new(headers.iter())?;

        for record in reader.records() {
            let record = record?;
            frame.push_row(record.iter().map(parse_cell).collect())?;
        }

        Ok(frame)
    }

    pub fn to_csv<W: io::Write>(&self, writer: W, row_names: bool) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);

        for row in self.to_sheet_rows(row_names) {
            writer.write_record(row.iter().map(cell_text))?;
        }
        writer.flush()?;

        Ok(())
    }
}

impl FromSheetRows for DataFrame {
    fn from_sheet_rows(rows: &[Vec<Value>]) -> Result<Self> {
        let Some((headers, body)) = rows.split_first() else {
            return Ok(Self::default());
        };

        let mut frame = Self::new(headers.iter().map(cell_text)).map_err(|_| {
            AppError::Data("The header row in the worksheet is not unique".to_string())
        })?;
        let width = frame.columns.len();

        for row in body {
            // Pad short rows with blanks, drop cells past the last header
            let mut cells: Vec<Value> = row.iter().take(width).cloned().collect();
            cells.resize(width, Value::String(String::new()));
            frame.push_row(cells)?;
        }

        Ok(frame)
    }
}

impl ToSheetRows for DataFrame {
    fn to_sheet_rows(&self, row_names: bool) -> Vec<Vec<Value>> {
        let mut rows = Vec::with_capacity(self.rows.len() + 1);

        let mut header = Vec::with_capacity(self.columns.len() + 1);
        if row_names {
            header.push(Value::String(ROW_LABEL_HEADER.to_string()));
        }
        header.extend(self.columns.iter().cloned().map(Value::String));
        rows.push(header);

        for (label, row) in self.index.iter().zip(&self.rows) {
            let mut out = Vec::with_capacity(row.len() + 1);
            if row_names {
                out.push(sheet_cell(label));
            }
            out.extend(row.iter().map(sheet_cell));
            rows.push(out);
        }

        rows
    }
}

/// Sheets only accept scalars, so nested values are written as JSON text.
fn sheet_cell(value: &Value) -> Value {
    match value {
        Value::Array(_) | Value::Object(_) => Value::String(value.to_string()),
        other => other.clone(),
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn parse_cell(text: &str) -> Value {
    if let Ok(i) = text.parse::<i64>() {
        return Value::from(i);
    }
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(text.to_string()))
}

fn first_duplicate(names: &[String]) -> Option<&str> {
    names
        .iter()
        .enumerate()
        .find(|&(i, name)| names[..i].contains(name))
        .map(|(_, name)| name.as_str())
}
