use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ArtifactConfig;

/// Which exported estimator an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Scaler,
    Classifier,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Scaler => f.write_str("scaler"),
            ArtifactKind::Classifier => f.write_str("classifier"),
        }
    }
}

/// The model input does not line up with what an artifact was fitted on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaMismatch {
    #[error("{artifact} expects {expected} features, received {found}")]
    Length {
        artifact: ArtifactKind,
        expected: usize,
        found: usize,
    },
    #[error("{artifact} column {position} is '{expected}' but the encoder produces '{found}'")]
    Column {
        artifact: ArtifactKind,
        position: usize,
        expected: String,
        found: String,
    },
    #[error("{artifact} records {recorded} feature names but the encoder produces {expected} columns")]
    Names {
        artifact: ArtifactKind,
        recorded: usize,
        expected: usize,
    },
}

/// Content-level defect found while parsing an artifact.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactDefect {
    #[error("malformed json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{0}")]
    Invalid(String),
}

/// Startup failure: the service cannot score anything without both artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactLoadError {
    #[error("unable to read {kind} artifact at {}: {source}", .path.display())]
    Read {
        kind: ArtifactKind,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("corrupt {kind} artifact at {}: {source}", .path.display())]
    Corrupt {
        kind: ArtifactKind,
        path: PathBuf,
        source: ArtifactDefect,
    },
}

/// Pre-fitted normalization applied before classification.
pub trait Normalizer: Send + Sync {
    fn n_features(&self) -> usize;

    /// Column names recorded at fit time, when the export kept them.
    fn feature_names(&self) -> Option<&[String]>;

    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, SchemaMismatch>;
}

/// Probability split over the binary outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassProbabilities {
    pub retain: f64,
    pub churn: f64,
}

/// Pre-fitted binary classifier where class `1` means the customer churns.
pub trait Classifier: Send + Sync {
    fn n_features(&self) -> usize;

    fn feature_names(&self) -> Option<&[String]>;

    fn predict_proba(&self, features: &[f64]) -> Result<ClassProbabilities, SchemaMismatch>;

    fn predict(&self, features: &[f64]) -> Result<u8, SchemaMismatch> {
        let probabilities = self.predict_proba(features)?;
        Ok(u8::from(probabilities.churn > 0.5))
    }
}

/// Verify that an artifact was fitted on `columns`, in that order.
pub fn verify_columns(
    artifact: ArtifactKind,
    n_features: usize,
    recorded: Option<&[String]>,
    columns: &[&str],
) -> Result<(), SchemaMismatch> {
    if n_features != columns.len() {
        return Err(SchemaMismatch::Length {
            artifact,
            expected: n_features,
            found: columns.len(),
        });
    }

    let Some(recorded) = recorded else {
        return Ok(());
    };
    if recorded.len() != columns.len() {
        return Err(SchemaMismatch::Names {
            artifact,
            recorded: recorded.len(),
            expected: columns.len(),
        });
    }

    for (position, (expected, found)) in recorded.iter().zip(columns).enumerate() {
        if expected != found {
            return Err(SchemaMismatch::Column {
                artifact,
                position,
                expected: expected.clone(),
                found: (*found).to_string(),
            });
        }
    }

    Ok(())
}

fn check_len(artifact: ArtifactKind, expected: usize, found: usize) -> Result<(), SchemaMismatch> {
    if expected == found {
        Ok(())
    } else {
        Err(SchemaMismatch::Length {
            artifact,
            expected,
            found,
        })
    }
}

fn check_names(names: Option<&[String]>, n_features: usize) -> Result<(), ArtifactDefect> {
    match names {
        Some(names) if names.len() != n_features => Err(ArtifactDefect::Invalid(format!(
            "feature_names lists {} columns for {} fitted features",
            names.len(),
            n_features
        ))),
        _ => Ok(()),
    }
}

fn open(kind: ArtifactKind, path: &Path) -> Result<BufReader<File>, ArtifactLoadError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| ArtifactLoadError::Read {
            kind,
            path: path.to_path_buf(),
            source,
        })
}

/// Standard-score scaler: `(x - mean) / scale` per column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    feature_names: Option<Vec<String>>,
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(
        feature_names: Option<Vec<String>>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    ) -> Result<Self, ArtifactDefect> {
        Self {
            feature_names,
            mean,
            scale,
        }
        .validated()
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ArtifactDefect> {
        let scaler: Self = serde_json::from_reader(reader)?;
        scaler.validated()
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ArtifactLoadError> {
        let path = path.as_ref();
        let reader = open(ArtifactKind::Scaler, path)?;
        Self::from_reader(reader).map_err(|source| ArtifactLoadError::Corrupt {
            kind: ArtifactKind::Scaler,
            path: path.to_path_buf(),
            source,
        })
    }

    fn validated(self) -> Result<Self, ArtifactDefect> {
        if self.mean.is_empty() {
            return Err(ArtifactDefect::Invalid("scaler has no fitted columns".to_string()));
        }
        if self.mean.len() != self.scale.len() {
            return Err(ArtifactDefect::Invalid(format!(
                "mean has {} entries but scale has {}",
                self.mean.len(),
                self.scale.len()
            )));
        }
        if self.mean.iter().any(|value| !value.is_finite()) {
            return Err(ArtifactDefect::Invalid("mean contains non-finite values".to_string()));
        }
        if let Some(index) = self
            .scale
            .iter()
            .position(|value| !value.is_finite() || *value <= 0.0)
        {
            return Err(ArtifactDefect::Invalid(format!(
                "scale[{index}] must be a positive finite number"
            )));
        }
        check_names(self.feature_names.as_deref(), self.mean.len())?;
        Ok(self)
    }
}

impl Normalizer for StandardScaler {
    fn n_features(&self) -> usize {
        self.mean.len()
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, SchemaMismatch> {
        check_len(ArtifactKind::Scaler, self.mean.len(), features.len())?;
        Ok(features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(value, (mean, scale))| (value - mean) / scale)
            .collect())
    }
}

const LOGISTIC_REGRESSION: &str = "logistic_regression";

/// Binary logistic regression exported as coefficients plus intercept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    model_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    feature_names: Option<Vec<String>>,
    coefficients: Vec<f64>,
    intercept: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    classes: Option<Vec<u8>>,
}

impl LogisticRegression {
    pub fn new(
        feature_names: Option<Vec<String>>,
        coefficients: Vec<f64>,
        intercept: f64,
    ) -> Result<Self, ArtifactDefect> {
        Self {
            model_type: LOGISTIC_REGRESSION.to_string(),
            feature_names,
            coefficients,
            intercept,
            classes: None,
        }
        .validated()
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ArtifactDefect> {
        let model: Self = serde_json::from_reader(reader)?;
        model.validated()
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ArtifactLoadError> {
        let path = path.as_ref();
        let reader = open(ArtifactKind::Classifier, path)?;
        Self::from_reader(reader).map_err(|source| ArtifactLoadError::Corrupt {
            kind: ArtifactKind::Classifier,
            path: path.to_path_buf(),
            source,
        })
    }

    fn validated(self) -> Result<Self, ArtifactDefect> {
        if self.model_type != LOGISTIC_REGRESSION {
            return Err(ArtifactDefect::Invalid(format!(
                "unsupported model_type '{}' (expected '{LOGISTIC_REGRESSION}')",
                self.model_type
            )));
        }
        if self.coefficients.is_empty() {
            return Err(ArtifactDefect::Invalid("classifier has no coefficients".to_string()));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|w| !w.is_finite()) {
            return Err(ArtifactDefect::Invalid(
                "coefficients and intercept must be finite".to_string(),
            ));
        }
        if let Some(classes) = &self.classes {
            if classes.as_slice() != [0, 1] {
                return Err(ArtifactDefect::Invalid(format!(
                    "classes must be [0, 1] with churn as the positive class, found {classes:?}"
                )));
            }
        }
        check_names(self.feature_names.as_deref(), self.coefficients.len())?;
        Ok(self)
    }

    fn decision_function(&self, features: &[f64]) -> f64 {
        features
            .iter()
            .zip(&self.coefficients)
            .map(|(x, w)| x * w)
            .sum::<f64>()
            + self.intercept
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl Classifier for LogisticRegression {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn predict_proba(&self, features: &[f64]) -> Result<ClassProbabilities, SchemaMismatch> {
        check_len(ArtifactKind::Classifier, self.coefficients.len(), features.len())?;
        let churn = sigmoid(self.decision_function(features));
        Ok(ClassProbabilities {
            retain: 1.0 - churn,
            churn,
        })
    }
}

/// Both exported estimators, loaded once and shared read-only.
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    pub scaler: Arc<StandardScaler>,
    pub classifier: Arc<LogisticRegression>,
}

impl ModelArtifacts {
    pub fn load(config: &ArtifactConfig) -> Result<Self, ArtifactLoadError> {
        let scaler = StandardScaler::from_path(&config.scaler_path)?;
        info!(
            path = %config.scaler_path.display(),
            features = scaler.n_features(),
            "scaler artifact loaded"
        );

        let classifier = LogisticRegression::from_path(&config.model_path)?;
        info!(
            path = %config.model_path.display(),
            features = classifier.n_features(),
            "classifier artifact loaded"
        );

        Ok(Self {
            scaler: Arc::new(scaler),
            classifier: Arc::new(classifier),
        })
    }
}
