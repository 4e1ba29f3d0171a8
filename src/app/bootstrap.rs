use std::{fs::OpenOptions, path::Path};

use anyhow::{Context, Result};
use env_logger::{Env, Target};
use ml_core::{DataSource, IrisDataset, IrisPredictor};
use ratatui::{widgets::Block, Frame};

use crate::config::AppConfig;
use crate::ui::screens::{load_failed::LoadFailedState, predict::PredictState, Screen};
use crate::ui::{layout, theme::Theme, widgets};

/// Filter used when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "iris_predict=info,ml_core=info";

/// Sends `log` output to `path`, since the terminal belongs to the UI.
///
/// # Errors
/// Returns an error if the log file cannot be opened for appending.
pub fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file '{}'", path.display()))?;

    env_logger::Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER))
        .target(Target::Pipe(Box::new(file)))
        .init();

    Ok(())
}

/// Draws the loading splash shown while [`start`] blocks.
pub fn splash(f: &mut Frame, source: &DataSource) {
    let area = f.size();
    f.render_widget(Block::default().style(Theme::base()), area);
    f.render_widget(
        widgets::loading(&source.to_string()),
        layout::centered_rect(80, 30, area),
    );
}

/// Loads the dataset and fits both models, once per process.
///
/// # Returns
/// The predict screen, or the load-failed screen if either step fails.
pub fn start(config: &AppConfig) -> Screen {
    let source = config.source();

    let dataset = match IrisDataset::load(&source) {
        Ok(dataset) => dataset,
        Err(e) => {
            log::error!("cannot load dataset from {source}: {e}");
            return Screen::LoadFailed(LoadFailedState::new(source.to_string(), e.to_string()));
        }
    };
    log::info!("loaded {} samples from {source}", dataset.len());

    match IrisPredictor::fit(&dataset, &config.logistic) {
        Ok(predictor) => {
            let linear = predictor.linear();
            log::info!(
                "linear coefficients {} intercept {:.4}",
                linear.coefficients(),
                linear.intercept()
            );
            Screen::Predict(PredictState::new(source, predictor))
        }
        Err(e) => {
            log::error!("cannot fit models on {source}: {e}");
            Screen::LoadFailed(LoadFailedState::new(source.to_string(), e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn fixture() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("ml_core/tests/data/iris.csv")
    }

    #[test]
    fn splash_names_the_source() {
        use ratatui::{backend::TestBackend, Terminal};

        let source = DataSource::Local(PathBuf::from("iris.csv"));
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|f| splash(f, &source)).unwrap();

        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(text.contains(widgets::TITLE), "{text}");
        assert!(text.contains("Loading dataset from iris.csv"), "{text}");
    }

    #[test]
    fn local_dataset_opens_the_form() {
        let config = AppConfig {
            dataset_path: Some(fixture()),
            ..Default::default()
        };
        assert!(matches!(start(&config), Screen::Predict(_)));
    }

    #[test]
    fn missing_file_shows_the_failure_screen() {
        let config = AppConfig {
            dataset_path: Some(PathBuf::from("/nonexistent/iris.csv")),
            ..Default::default()
        };
        assert!(matches!(start(&config), Screen::LoadFailed(_)));
    }

    #[test]
    fn unreachable_url_shows_the_failure_screen() {
        let config = AppConfig {
            dataset_url: "http://127.0.0.1:9/iris.csv".to_string(),
            ..Default::default()
        };
        match start(&config) {
            Screen::LoadFailed(state) => {
                assert_eq!(state.source, "http://127.0.0.1:9/iris.csv");
                assert!(!state.error.is_empty());
            }
            Screen::Predict(_) => panic!("expected the load failure screen"),
        }
    }

    #[test]
    fn single_class_dataset_cannot_be_fit() {
        let dir = std::env::temp_dir().join(format!("iris-predict-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("setosa.csv");
        std::fs::write(
            &path,
            "sepal_length,sepal_width,petal_length,petal_width,species\n\
             5.1,3.5,1.4,0.2,setosa\n\
             4.9,3.0,1.4,0.2,setosa\n\
             4.7,3.2,1.3,0.2,setosa\n\
             4.6,3.1,1.5,0.2,setosa\n\
             5.0,3.6,1.4,0.3,setosa\n\
             5.4,3.9,1.7,0.4,setosa\n",
        )
        .unwrap();

        let config = AppConfig {
            dataset_path: Some(path),
            ..Default::default()
        };
        assert!(matches!(start(&config), Screen::LoadFailed(_)));
    }
}
