// =============================================================================
// Data Access Layer
// =============================================================================
//
// Everything the estimator needs is a design matrix and a response vector;
// this module is where those come from. A `DataSource` fetches a numeric
// `Table` (from a CSV file, a URL, or a bundled dataset), and a `DataSet`
// wraps the loaded table with the column bookkeeping a modelling session
// needs: pick predictors, pick the response, swap the response for another
// column, append an intercept.
//
// Every operation that needs a loaded table checks for one first and returns
// a `NotReady` error when `load()` has not succeeded yet, rather than
// panicking on a missing state.
//
// =============================================================================

use log::info;
use ndarray::{Array1, Array2};

use crate::error::{GlmFitError, Result};

pub mod loaders;

pub use loaders::{BuiltinLoader, CsvLoader, WebLoader};

/// A loaded dataset: named columns over an all-numeric value matrix.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    values: Array2<f64>,
}

impl Table {
    /// Build a table, checking that the header count matches the columns.
    pub fn new(headers: Vec<String>, values: Array2<f64>) -> Result<Self> {
        if headers.len() != values.ncols() {
            return Err(GlmFitError::DimensionMismatch(format!(
                "{} headers for {} columns",
                headers.len(),
                values.ncols()
            )));
        }
        Ok(Self { headers, values })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_cols(&self) -> usize {
        self.values.ncols()
    }

    /// Index of a named column, or `InvalidValue` listing what exists.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| {
                GlmFitError::InvalidValue(format!(
                    "no column '{}'; available: {}",
                    name,
                    self.headers.join(", ")
                ))
            })
    }

    /// A single column by name.
    pub fn column(&self, name: &str) -> Result<Array1<f64>> {
        let idx = self.column_index(name)?;
        Ok(self.values.column(idx).to_owned())
    }
}

/// Something that can produce a [`Table`]: a CSV file, a URL, a bundled
/// dataset.
pub trait DataSource {
    fn fetch(&self) -> Result<Table>;

    /// Short description used in log output, e.g. the path or URL.
    fn describe(&self) -> String;
}

/// A loaded dataset plus the current predictor/response column selection.
///
/// The selection workflow mirrors a typical modelling session:
///
/// ```no_run
/// # use glmfit_core::data::{CsvLoader, DataSet};
/// # fn main() -> glmfit_core::Result<()> {
/// let mut data = DataSet::new(Box::new(CsvLoader::new("claims.csv")));
/// data.load()?;
/// data.select_x(Some(&["age", "exposure"]))?;
/// data.select_y(Some("claims"))?;
/// data.add_constant()?;
/// let (x, y) = (data.x()?, data.y()?);
/// # Ok(())
/// # }
/// ```
pub struct DataSet {
    source: Box<dyn DataSource>,
    table: Option<Table>,
    x_cols: Option<Vec<usize>>,
    y_col: Option<usize>,
    with_constant: bool,
}

impl DataSet {
    pub fn new(source: Box<dyn DataSource>) -> Self {
        Self {
            source,
            table: None,
            x_cols: None,
            y_col: None,
            with_constant: false,
        }
    }

    /// Fetch the table from the source. Resets any previous column selection.
    pub fn load(&mut self) -> Result<()> {
        let table = self.source.fetch()?;
        info!(
            "loaded {}: {} rows, {} columns",
            self.source.describe(),
            table.n_rows(),
            table.n_cols()
        );
        self.table = Some(table);
        self.x_cols = None;
        self.y_col = None;
        self.with_constant = false;
        Ok(())
    }

    fn require_table(&self) -> Result<&Table> {
        self.table.as_ref().ok_or_else(|| {
            GlmFitError::NotReady("load a dataset before using it".to_string())
        })
    }

    /// Select predictor columns by name; `None` selects every column except
    /// the last.
    pub fn select_x(&mut self, columns: Option<&[&str]>) -> Result<()> {
        let table = self.require_table()?;
        let indices = match columns {
            Some(names) => names
                .iter()
                .map(|name| table.column_index(name))
                .collect::<Result<Vec<_>>>()?,
            None => (0..table.n_cols().saturating_sub(1)).collect(),
        };
        self.x_cols = Some(indices);
        Ok(())
    }

    /// Select the response column by name; `None` selects the last column.
    pub fn select_y(&mut self, column: Option<&str>) -> Result<()> {
        let table = self.require_table()?;
        let idx = match column {
            Some(name) => table.column_index(name)?,
            None => {
                if table.n_cols() == 0 {
                    return Err(GlmFitError::EmptyInput("table has no columns".to_string()));
                }
                table.n_cols() - 1
            }
        };
        self.y_col = Some(idx);
        Ok(())
    }

    /// Promote a different column to response: the current response column
    /// rejoins the predictors, and the named column leaves them.
    pub fn replace_y(&mut self, column: &str) -> Result<()> {
        let table = self.require_table()?;
        let new_y = table.column_index(column)?;
        let old_y = self.y_col.ok_or_else(|| {
            GlmFitError::NotReady("select a response column before replacing it".to_string())
        })?;

        if let Some(cols) = self.x_cols.as_mut() {
            cols.retain(|&c| c != new_y);
            if !cols.contains(&old_y) {
                cols.push(old_y);
            }
        }
        self.y_col = Some(new_y);
        Ok(())
    }

    /// Append an all-ones intercept column to the selected design matrix.
    pub fn add_constant(&mut self) -> Result<()> {
        self.require_table()?;
        if self.x_cols.is_none() {
            return Err(GlmFitError::NotReady(
                "select predictor columns before adding a constant".to_string(),
            ));
        }
        self.with_constant = true;
        Ok(())
    }

    /// Names of the selected predictor columns, `"constant"` last when an
    /// intercept was added.
    pub fn x_names(&self) -> Result<Vec<String>> {
        let table = self.require_table()?;
        let cols = self.x_cols.as_ref().ok_or_else(|| {
            GlmFitError::NotReady("no predictor columns selected".to_string())
        })?;
        let mut names: Vec<String> =
            cols.iter().map(|&c| table.headers()[c].clone()).collect();
        if self.with_constant {
            names.push("constant".to_string());
        }
        Ok(names)
    }

    /// The selected design matrix, one column per predictor (plus the
    /// intercept column when `add_constant` was called).
    pub fn x(&self) -> Result<Array2<f64>> {
        let table = self.require_table()?;
        let cols = self.x_cols.as_ref().ok_or_else(|| {
            GlmFitError::NotReady("no predictor columns selected".to_string())
        })?;

        let n = table.n_rows();
        let p = cols.len() + usize::from(self.with_constant);
        let mut x = Array2::zeros((n, p));
        for (j, &c) in cols.iter().enumerate() {
            x.column_mut(j).assign(&table.values.column(c));
        }
        if self.with_constant {
            x.column_mut(p - 1).fill(1.0);
        }
        Ok(x)
    }

    /// The selected response vector.
    pub fn y(&self) -> Result<Array1<f64>> {
        let table = self.require_table()?;
        let idx = self.y_col.ok_or_else(|| {
            GlmFitError::NotReady("no response column selected".to_string())
        })?;
        Ok(table.values.column(idx).to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    struct FixedSource(Table);

    impl DataSource for FixedSource {
        fn fetch(&self) -> Result<Table> {
            Ok(self.0.clone())
        }

        fn describe(&self) -> String {
            "fixture".to_string()
        }
    }

    fn sample() -> DataSet {
        let table = Table::new(
            vec!["a".into(), "b".into(), "c".into()],
            array![[1.0, 10.0, 0.0], [2.0, 20.0, 1.0], [3.0, 30.0, 0.0]],
        )
        .unwrap();
        DataSet::new(Box::new(FixedSource(table)))
    }

    #[test]
    fn operations_before_load_are_not_ready() {
        let mut data = sample();
        assert!(matches!(
            data.select_x(None).unwrap_err(),
            GlmFitError::NotReady(_)
        ));
        assert!(matches!(
            data.select_y(None).unwrap_err(),
            GlmFitError::NotReady(_)
        ));
        assert!(matches!(data.x().unwrap_err(), GlmFitError::NotReady(_)));
        assert!(matches!(data.y().unwrap_err(), GlmFitError::NotReady(_)));
    }

    #[test]
    fn default_selection_is_all_but_last_vs_last() {
        let mut data = sample();
        data.load().unwrap();
        data.select_x(None).unwrap();
        data.select_y(None).unwrap();

        let x = data.x().unwrap();
        assert_eq!(x.ncols(), 2);
        assert_eq!(x.column(0).to_owned(), array![1.0, 2.0, 3.0]);
        assert_eq!(data.y().unwrap(), array![0.0, 1.0, 0.0]);
    }

    #[test]
    fn explicit_selection_by_name() {
        let mut data = sample();
        data.load().unwrap();
        data.select_x(Some(&["b"])).unwrap();
        data.select_y(Some("a")).unwrap();

        let x = data.x().unwrap();
        assert_eq!(x.column(0).to_owned(), array![10.0, 20.0, 30.0]);
        assert_eq!(data.y().unwrap(), array![1.0, 2.0, 3.0]);
    }

    #[test]
    fn unknown_column_is_invalid() {
        let mut data = sample();
        data.load().unwrap();
        assert!(matches!(
            data.select_x(Some(&["nope"])).unwrap_err(),
            GlmFitError::InvalidValue(_)
        ));
    }

    #[test]
    fn add_constant_appends_a_ones_column() {
        let mut data = sample();
        data.load().unwrap();
        data.select_x(Some(&["a"])).unwrap();
        data.add_constant().unwrap();

        let x = data.x().unwrap();
        assert_eq!(x.ncols(), 2);
        assert!(x.column(1).iter().all(|&v| v == 1.0));
        assert_eq!(data.x_names().unwrap(), vec!["a", "constant"]);
    }

    #[test]
    fn replace_y_swaps_columns_both_ways() {
        let mut data = sample();
        data.load().unwrap();
        data.select_x(Some(&["a", "b"])).unwrap();
        data.select_y(Some("c")).unwrap();

        data.replace_y("b").unwrap();

        // b left the predictors, c joined them
        assert_eq!(data.y().unwrap(), array![10.0, 20.0, 30.0]);
        let names = data.x_names().unwrap();
        assert_eq!(names, vec!["a", "c"]);
    }
}
