mod data;
mod encoder;
mod error;
mod linear;
mod logistic;
mod predictor;
mod stats;

pub use data::{
    DataError, DataSource, IrisDataset, Measurements, Sample, DEFAULT_DATASET_URL, FEATURE_NAMES,
};
pub use encoder::LabelEncoder;
pub use error::MlError;
pub use linear::LinearRegression;
pub use logistic::{LogisticParams, LogisticRegression};
pub use predictor::{capitalize, IrisPredictor, Mode, Prediction};
pub use stats::FitStats;
