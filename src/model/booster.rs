//! Gradient-boosted tree classifier backed by the `gbdt` crate
//!
//! Two artifact formats are accepted:
//! - `Gbdt`: a model written by `GBDT::save_model`. Its raw output is the
//!   class id itself and is rounded to the nearest integer.
//! - `XgboostDump`: the JSON tree dump of an XGBoost booster
//!   (`dump_model(path, dump_format="json")`). With a `multi:softmax` /
//!   `multi:softprob` objective the winning label index `i` maps to class id
//!   `i + 1` (XGBoost labels start at 0, fertilizer ids at 1). Other
//!   objectives are rounded like `Gbdt`.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;

use gbdt::decision_tree::{Data, DataVec, VALUE_TYPE_UNKNOWN};
use gbdt::gradient_boost::GBDT;

use super::{ClassId, Classifier, LoadError, PredictionError};
use crate::encoding::{EncodedFeatureVector, FEATURE_ORDER};

/// Class id of XGBoost label 0
pub const FIRST_CLASS_ID: ClassId = 1;

/// Columns that carry measurements (categorical codes may be missing)
const NUMERIC_COLUMNS: std::ops::Range<usize> = 2..8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelFormat {
    Gbdt,
    XgboostDump { objective: String, num_classes: usize },
}

impl ModelFormat {
    fn is_multiclass(&self) -> bool {
        matches!(
            self,
            ModelFormat::XgboostDump { objective, .. }
                if objective == "multi:softmax" || objective == "multi:softprob"
        )
    }
}

/// How the raw booster output becomes a class id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    Rounded,
    Multiclass { num_classes: usize },
}

pub struct BoostedTrees {
    model: GBDT,
    output: Output,
}

impl BoostedTrees {
    /// Wrap an in-memory model whose output is the class id
    pub fn from_model(model: GBDT) -> Self {
        Self { model, output: Output::Rounded }
    }

    pub fn load(path: impl AsRef<Path>, format: &ModelFormat) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let path_str = path
            .to_str()
            .ok_or_else(|| LoadError::Invalid(format!("non UTF-8 model path {}", path.display())))?;

        let output = match format {
            ModelFormat::XgboostDump { num_classes, .. } if format.is_multiclass() => {
                if *num_classes < 2 {
                    return Err(LoadError::Invalid(format!(
                        "multiclass objective needs at least 2 classes, got {}",
                        num_classes
                    )));
                }
                Output::Multiclass { num_classes: *num_classes }
            }
            _ => Output::Rounded,
        };

        // Parser panics on malformed dumps count as load failures
        let loaded = catch_unwind(|| match format {
            ModelFormat::Gbdt => GBDT::load_model(path_str),
            ModelFormat::XgboostDump { objective, .. } => GBDT::from_xgboost_dump(path_str, objective),
        });

        let artifact = |message: String| LoadError::Artifact {
            path: path.display().to_string(),
            message,
        };

        match loaded {
            Ok(Ok(model)) => Ok(Self { model, output }),
            Ok(Err(e)) => Err(artifact(e.to_string())),
            Err(_) => Err(artifact("model parser panicked".to_string())),
        }
    }

    /// Booster input row; missing category codes use gbdt's unknown marker
    fn test_data(features: &EncodedFeatureVector) -> Result<DataVec, PredictionError> {
        let row = features.to_row();
        for i in NUMERIC_COLUMNS {
            if !row[i].is_finite() {
                return Err(PredictionError::NonFiniteFeature {
                    feature: FEATURE_ORDER[i],
                    value: row[i],
                });
            }
        }

        let feature = row
            .iter()
            .map(|v| if v.is_nan() { VALUE_TYPE_UNKNOWN } else { *v as f32 })
            .collect();
        Ok(vec![Data::new_test_data(feature, None)])
    }
}

/// Round a raw booster value to the class id it encodes
fn round_to_class(value: f32) -> Result<ClassId, PredictionError> {
    if !value.is_finite() {
        return Err(PredictionError::Other(format!("model produced {}", value)));
    }
    Ok(value.round() as ClassId)
}

impl Classifier for BoostedTrees {
    fn predict(&self, features: &EncodedFeatureVector) -> Result<ClassId, PredictionError> {
        let data = Self::test_data(features)?;

        let result = catch_unwind(AssertUnwindSafe(|| match self.output {
            Output::Rounded => self.model.predict(&data).first().copied().map(round_to_class),
            Output::Multiclass { num_classes } => {
                let (labels, _probs) = self.model.predict_multiclass(&data, num_classes);
                labels.first().map(|label| Ok(*label as ClassId + FIRST_CLASS_ID))
            }
        }));

        match result {
            Ok(Some(class_id)) => class_id,
            Ok(None) => Err(PredictionError::Other("model returned no prediction".to_string())),
            Err(_) => Err(PredictionError::Other("model inference panicked".to_string())),
        }
    }

    fn describe(&self) -> String {
        match self.output {
            Output::Rounded => "gradient boosted trees (class id output)".to_string(),
            Output::Multiclass { num_classes } => {
                format!("gradient boosted trees ({} classes, softmax)", num_classes)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use gbdt::config::Config;

    /// Row with the given district code and nitrogen, other columns fixed
    pub(crate) fn features(district: Option<u8>, nitrogen: f64) -> EncodedFeatureVector {
        EncodedFeatureVector {
            district,
            soil_color: Some(1),
            nitrogen,
            phosphorus: 5.0,
            potassium: 5.0,
            ph: 6.5,
            rainfall: 800.0,
            temperature: 25.0,
            crop: Some(4),
        }
    }

    /// Low nitrogen → Urea (1), high nitrogen → 10:26:26 NPK (4)
    pub(crate) fn nitrogen_model() -> GBDT {
        let mut cfg = Config::new();
        cfg.set_feature_size(9);
        cfg.set_max_depth(3);
        cfg.set_iterations(20);
        cfg.set_shrinkage(0.5);

        let mut training: DataVec = [(10.0, 1.0), (12.0, 1.0), (14.0, 1.0), (60.0, 4.0), (62.0, 4.0), (64.0, 4.0)]
            .iter()
            .map(|(nitrogen, label)| {
                let row = features(Some(5), *nitrogen).to_row();
                Data::new_training_data(row.iter().map(|v| *v as f32).collect(), 1.0, *label, None)
            })
            .collect();

        let mut model = GBDT::new(&cfg);
        model.fit(&mut training);
        model
    }

    #[test]
    fn test_trained_model_predicts_class_ids() {
        let model = BoostedTrees::from_model(nitrogen_model());
        assert_eq!(model.predict(&features(Some(5), 11.0)).unwrap(), 1);
        assert_eq!(model.predict(&features(Some(5), 63.0)).unwrap(), 4);
    }

    #[test]
    fn test_unknown_category_still_predicts() {
        let model = BoostedTrees::from_model(nitrogen_model());
        assert_eq!(model.predict(&features(None, 63.0)).unwrap(), 4);
    }

    #[test]
    fn test_saved_model_round_trips_through_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        nitrogen_model().save_model(path.to_str().unwrap()).unwrap();

        let model = BoostedTrees::load(&path, &ModelFormat::Gbdt).expect("saved model should load");
        assert_eq!(model.predict(&features(Some(2), 12.0)).unwrap(), 1);
    }

    #[test]
    fn test_non_finite_measurement_rejected() {
        let model = BoostedTrees::from_model(nitrogen_model());
        let err = model.predict(&features(Some(5), f64::NAN)).unwrap_err();
        assert!(matches!(err, PredictionError::NonFiniteFeature { feature: "Nitrogen", .. }));

        let mut inf = features(Some(5), 10.0);
        inf.rainfall = f64::INFINITY;
        assert!(model.predict(&inf).is_err());
    }

    #[test]
    fn test_missing_codes_use_unknown_marker() {
        let data = BoostedTrees::test_data(&features(None, 10.0)).unwrap();
        assert_eq!(data[0].feature[0], VALUE_TYPE_UNKNOWN);
        assert_eq!(data[0].feature[2], 10.0);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round_to_class(3.6).unwrap(), 4);
        assert_eq!(round_to_class(0.9999).unwrap(), 1);
        assert!(round_to_class(f32::NAN).is_err());
    }

    #[test]
    fn test_multiclass_objectives() {
        let xgb = |objective: &str| ModelFormat::XgboostDump {
            objective: objective.to_string(),
            num_classes: 19,
        };
        assert!(xgb("multi:softmax").is_multiclass());
        assert!(xgb("multi:softprob").is_multiclass());
        assert!(!xgb("reg:linear").is_multiclass());
        assert!(!ModelFormat::Gbdt.is_multiclass());
    }

    #[test]
    fn test_load_failures() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");

        let err = BoostedTrees::load(&missing, &ModelFormat::Gbdt).err().unwrap();
        assert!(err.to_string().contains("absent.json"));

        let garbage = dir.path().join("garbage.json");
        std::fs::write(&garbage, b"not a model").unwrap();
        let xgb = ModelFormat::XgboostDump { objective: "multi:softmax".to_string(), num_classes: 19 };
        assert!(BoostedTrees::load(&garbage, &xgb).is_err());
        assert!(BoostedTrees::load(&garbage, &ModelFormat::Gbdt).is_err());

        let one_class = ModelFormat::XgboostDump { objective: "multi:softmax".to_string(), num_classes: 1 };
        assert!(matches!(
            BoostedTrees::load(&garbage, &one_class).err(),
            Some(LoadError::Invalid(_))
        ));
    }
}
