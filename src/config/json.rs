use std::path::PathBuf;

use serde_json::Value;

use super::model::AppConfig;

/// Loads an [`AppConfig`] from a JSON file.
///
/// # Errors
/// Returns a human-readable string if the file cannot be read or parsed.
pub fn load(path: &str) -> Result<AppConfig, String> {
    let content =
        std::fs::read_to_string(path).map_err(|e| format!("cannot read '{path}': {e}"))?;

    parse(&content)
}

/// Parses an [`AppConfig`] from JSON text. Every key is optional.
///
/// # Errors
/// Returns a human-readable string on invalid JSON, wrongly typed keys or
/// out of range hyperparameters.
pub fn parse(content: &str) -> Result<AppConfig, String> {
    let val: Value = serde_json::from_str(content).map_err(|e| format!("invalid JSON: {e}"))?;
    if !val.is_object() {
        return Err("config must be a JSON object".into());
    }

    let mut cfg = AppConfig::default();

    let dataset = &val["dataset"];
    if let Some(url) = opt_str(dataset, "url", "dataset.url")? {
        cfg.dataset_url = url;
    }
    cfg.dataset_path = opt_str(dataset, "path", "dataset.path")?.map(PathBuf::from);

    let logistic = &val["logistic"];
    if let Some(c) = opt_f64(logistic, "c", "logistic.c")? {
        if !(c.is_finite() && c > 0.0) {
            return Err(format!("logistic.c must be positive, got {c}"));
        }
        cfg.logistic.c = c;
    }
    if let Some(max_iter) = opt_u64(logistic, "max_iter", "logistic.max_iter")? {
        if max_iter == 0 {
            return Err("logistic.max_iter must be at least 1".into());
        }
        cfg.logistic.max_iter = max_iter as usize;
    }
    if let Some(tol) = opt_f64(logistic, "tol", "logistic.tol")? {
        if !(tol.is_finite() && tol > 0.0) {
            return Err(format!("logistic.tol must be positive, got {tol}"));
        }
        cfg.logistic.tol = tol;
    }

    if let Some(file) = opt_str(&val, "log_file", "log_file")? {
        cfg.log_file = PathBuf::from(file);
    }

    Ok(cfg)
}

fn opt_str(val: &Value, key: &str, name: &str) -> Result<Option<String>, String> {
    match &val[key] {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Err(format!("{name} must not be empty")),
        Value::String(s) => Ok(Some(s.trim().to_string())),
        _ => Err(format!("{name} must be a string")),
    }
}

fn opt_f64(val: &Value, key: &str, name: &str) -> Result<Option<f64>, String> {
    match &val[key] {
        Value::Null => Ok(None),
        v => v
            .as_f64()
            .map(Some)
            .ok_or_else(|| format!("{name} must be a number")),
    }
}

fn opt_u64(val: &Value, key: &str, name: &str) -> Result<Option<u64>, String> {
    match &val[key] {
        Value::Null => Ok(None),
        v => v
            .as_u64()
            .map(Some)
            .ok_or_else(|| format!("{name} must be a non-negative integer")),
    }
}

#[cfg(test)]
mod tests {
    use ml_core::{DataSource, LogisticParams};

    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        assert_eq!(parse("{}").unwrap(), AppConfig::default());
    }

    #[test]
    fn reads_every_key() {
        let cfg = parse(
            r#"{
                "dataset": { "url": "http://example.org/iris.csv", "path": "iris.csv" },
                "logistic": { "c": 0.5, "max_iter": 300, "tol": 1e-6 },
                "log_file": "out.log"
            }"#,
        )
        .unwrap();

        assert_eq!(cfg.dataset_url, "http://example.org/iris.csv");
        assert_eq!(cfg.source(), DataSource::Local(PathBuf::from("iris.csv")));
        assert_eq!(
            cfg.logistic,
            LogisticParams {
                c: 0.5,
                max_iter: 300,
                tol: 1e-6
            }
        );
        assert_eq!(cfg.log_file, PathBuf::from("out.log"));
    }

    #[test]
    fn integer_c_is_accepted() {
        let cfg = parse(r#"{ "logistic": { "c": 2 } }"#).unwrap();
        assert_eq!(cfg.logistic.c, 2.0);
    }

    #[test]
    fn rejects_out_of_range_hyperparameters() {
        for bad in [
            r#"{ "logistic": { "c": 0 } }"#,
            r#"{ "logistic": { "c": -1.0 } }"#,
            r#"{ "logistic": { "max_iter": 0 } }"#,
            r#"{ "logistic": { "tol": 0.0 } }"#,
        ] {
            assert!(parse(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn rejects_wrong_types() {
        for bad in [
            r#"{ "dataset": { "url": 3 } }"#,
            r#"{ "dataset": { "path": "" } }"#,
            r#"{ "logistic": { "c": "big" } }"#,
            r#"{ "logistic": { "max_iter": 1.5 } }"#,
            r#"{ "log_file": false }"#,
            r#"[1, 2]"#,
        ] {
            assert!(parse(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn invalid_json_is_reported() {
        let err = parse("{ not json").unwrap_err();
        assert!(err.starts_with("invalid JSON"), "{err}");
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load("/nonexistent/iris-config.json").unwrap_err();
        assert!(err.contains("cannot read"), "{err}");
    }
}
