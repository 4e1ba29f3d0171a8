use std::{
    error::Error,
    fmt,
    fs::File,
    io::{self, BufReader, Read},
    path::{Path, PathBuf},
    time::Duration,
};

use ndarray::{Array1, Array2};
use serde::Deserialize;

/// Where the iris table is published.
pub const DEFAULT_DATASET_URL: &str = "https://gist.githubusercontent.com/curran/a08a1080b88344b0c8a7/raw/0e7a9b0a5d22642a06d3d5b9bcbad9890c8ee534/iris.csv";

/// Column names of the four measurements, in feature order.
pub const FEATURE_NAMES: [&str; 4] = ["sepal_length", "sepal_width", "petal_length", "petal_width"];

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors produced while loading the dataset.
#[derive(Debug)]
pub enum DataError {
    /// The HTTP request could not be completed.
    Http(reqwest::Error),

    /// The server answered with a non-success status.
    Status { url: String, status: u16 },

    /// The local file could not be read.
    Io(io::Error),

    /// The body is not a valid iris CSV table.
    Csv(csv::Error),

    /// A row parsed but violates the domain constraints.
    InvalidSample { row: usize, reason: &'static str },

    /// The table has a header but no rows.
    Empty,
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::Http(e) => write!(f, "request failed: {e}"),
            DataError::Status { url, status } => write!(f, "{url} answered with status {status}"),
            DataError::Io(e) => write!(f, "io error: {e}"),
            DataError::Csv(e) => write!(f, "invalid csv: {e}"),
            DataError::InvalidSample { row, reason } => write!(f, "row {row}: {reason}"),
            DataError::Empty => write!(f, "dataset has no rows"),
        }
    }
}

impl Error for DataError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DataError::Http(e) => Some(e),
            DataError::Io(e) => Some(e),
            DataError::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for DataError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

impl From<io::Error> for DataError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for DataError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

/// The four measurements of a flower, in centimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurements {
    pub sepal_length: f64,
    pub sepal_width: f64,
    pub petal_length: f64,
    pub petal_width: f64,
}

impl Measurements {
    pub fn new(sepal_length: f64, sepal_width: f64, petal_length: f64, petal_width: f64) -> Self {
        Self {
            sepal_length,
            sepal_width,
            petal_length,
            petal_width,
        }
    }

    /// Returns the measurements in feature order.
    pub fn to_array(&self) -> [f64; 4] {
        [
            self.sepal_length,
            self.sepal_width,
            self.petal_length,
            self.petal_width,
        ]
    }

    /// Returns the measurements as a feature row for the models.
    pub fn features(&self) -> Array1<f64> {
        Array1::from(self.to_array().to_vec())
    }
}

impl From<[f64; 4]> for Measurements {
    fn from(v: [f64; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

/// A labelled flower.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub measurements: Measurements,
    pub species: String,
}

#[derive(Debug, Deserialize)]
struct Record {
    sepal_length: f64,
    sepal_width: f64,
    petal_length: f64,
    petal_width: f64,
    species: String,
}

/// Location of the iris CSV table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Remote(String),
    Local(PathBuf),
}

impl Default for DataSource {
    fn default() -> Self {
        Self::Remote(DEFAULT_DATASET_URL.to_string())
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Remote(url) => write!(f, "{url}"),
            DataSource::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// The loaded iris table. Immutable once built.
#[derive(Debug, Clone)]
pub struct IrisDataset {
    samples: Vec<Sample>,
}

impl IrisDataset {
    /// Loads the table from `source`.
    ///
    /// # Errors
    /// Returns a `DataError` if the source cannot be read or does not hold a valid table.
    pub fn load(source: &DataSource) -> Result<Self, DataError> {
        match source {
            DataSource::Remote(url) => Self::fetch(url),
            DataSource::Local(path) => Self::open(path),
        }
    }

    /// Downloads and parses the table at `url`.
    ///
    /// # Errors
    /// Returns `DataError::Http` on transport failures and `DataError::Status` on non-2xx answers.
    pub fn fetch(url: &str) -> Result<Self, DataError> {
        log::info!("fetching dataset from {url}");

        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()?;

        let response = client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(DataError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text()?;
        Self::from_reader(body.as_bytes())
    }

    /// Reads the table from a local CSV file.
    ///
    /// # Errors
    /// Returns `DataError::Io` if the file cannot be opened.
    pub fn open(path: &Path) -> Result<Self, DataError> {
        log::info!("reading dataset from {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parses a CSV table with a header row. Columns are matched by name.
    ///
    /// # Errors
    /// Returns a `DataError` if a row is malformed, a measurement is negative or
    /// not finite, a species is empty, or there are no rows.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DataError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut samples = Vec::new();
        for (idx, record) in reader.deserialize::<Record>().enumerate() {
            let record = record?;
            let row = idx + 1;

            let measurements = Measurements::new(
                record.sepal_length,
                record.sepal_width,
                record.petal_length,
                record.petal_width,
            );

            if !measurements
                .to_array()
                .iter()
                .all(|v| v.is_finite() && *v >= 0.0)
            {
                return Err(DataError::InvalidSample {
                    row,
                    reason: "measurements must be finite and non-negative",
                });
            }

            if record.species.is_empty() {
                return Err(DataError::InvalidSample {
                    row,
                    reason: "species must not be empty",
                });
            }

            samples.push(Sample {
                measurements,
                species: record.species,
            });
        }

        Self::from_samples(samples)
    }

    /// Builds a dataset from already parsed samples.
    ///
    /// # Errors
    /// Returns `DataError::Empty` if `samples` is empty.
    pub fn from_samples(samples: Vec<Sample>) -> Result<Self, DataError> {
        if samples.is_empty() {
            return Err(DataError::Empty);
        }

        Ok(Self { samples })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[inline]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Returns the design matrix, one row per sample, columns in `FEATURE_NAMES` order.
    pub fn features(&self) -> Array2<f64> {
        let mut x = Array2::zeros((self.samples.len(), FEATURE_NAMES.len()));
        for (mut row, sample) in x.rows_mut().into_iter().zip(&self.samples) {
            row.assign(&sample.measurements.features());
        }
        x
    }

    /// Returns the species column in row order.
    pub fn species(&self) -> impl Iterator<Item = &str> {
        self.samples.iter().map(|s| s.species.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = "\
sepal_length,sepal_width,petal_length,petal_width,species
5.1,3.5,1.4,0.2,setosa
7.0,3.2,4.7,1.4,versicolor
6.3,3.3,6.0,2.5,virginica
";

    #[test]
    fn parses_rows_in_order() {
        let ds = IrisDataset::from_reader(SMALL.as_bytes()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(
            ds.species().collect::<Vec<_>>(),
            ["setosa", "versicolor", "virginica"]
        );
        assert_eq!(
            ds.samples()[1].measurements,
            Measurements::new(7.0, 3.2, 4.7, 1.4)
        );
    }

    #[test]
    fn blank_lines_between_rows_are_skipped() {
        let csv = "sepal_length,sepal_width,petal_length,petal_width,species\n\n\
                   5.1,3.5,1.4,0.2,setosa\n\n\n\
                   7.0,3.2,4.7,1.4,versicolor\n\
                   \n\
                   6.3,3.3,6.0,2.5,virginica\n\n";
        let ds = IrisDataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(
            ds.species().collect::<Vec<_>>(),
            ["setosa", "versicolor", "virginica"]
        );
    }

    #[test]
    fn matches_columns_by_name() {
        let csv = "species,petal_width,petal_length,sepal_width,sepal_length\nsetosa,0.2,1.4,3.5,5.1\n";
        let ds = IrisDataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(
            ds.samples()[0].measurements,
            Measurements::new(5.1, 3.5, 1.4, 0.2)
        );
    }

    #[test]
    fn features_has_one_row_per_sample() {
        let ds = IrisDataset::from_reader(SMALL.as_bytes()).unwrap();
        let x = ds.features();
        assert_eq!(x.dim(), (3, 4));
        assert_eq!(x[[2, 2]], 6.0);
        assert_eq!(x[[0, 3]], 0.2);
    }

    #[test]
    fn rejects_negative_measurement() {
        let csv = "sepal_length,sepal_width,petal_length,petal_width,species\n5.1,-3.5,1.4,0.2,setosa\n";
        let err = IrisDataset::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::InvalidSample { row: 1, .. }), "{err}");
    }

    #[test]
    fn rejects_non_numeric_measurement() {
        let csv = "sepal_length,sepal_width,petal_length,petal_width,species\nwide,3.5,1.4,0.2,setosa\n";
        let err = IrisDataset::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::Csv(_)), "{err}");
    }

    #[test]
    fn rejects_missing_column() {
        let csv = "sepal_length,sepal_width,petal_length,species\n5.1,3.5,1.4,setosa\n";
        assert!(IrisDataset::from_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn header_only_is_empty() {
        let csv = "sepal_length,sepal_width,petal_length,petal_width,species\n";
        let err = IrisDataset::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::Empty));
    }

    #[test]
    fn missing_file_is_io_error() {
        let source = DataSource::Local(PathBuf::from("/nonexistent/iris.csv"));
        let err = IrisDataset::load(&source).unwrap_err();
        assert!(matches!(err, DataError::Io(_)));
    }

    #[test]
    fn default_source_is_the_published_table() {
        assert_eq!(
            DataSource::default().to_string(),
            DEFAULT_DATASET_URL.to_string()
        );
    }
}
