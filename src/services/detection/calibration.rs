// Calibration Profiles
// Genre-conditioned feature baselines; read-only after startup

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;
use tracing::debug;

use super::features::{Feature, FeatureVector};
use super::genre::Genre;
use crate::services::text_processor::{mean, std_dev};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Baseline {
    pub mean: f64,
    pub std_dev: f64,
}

impl Baseline {
    /// Standard deviation floor-clamped so z-scores never divide by zero.
    pub fn spread(&self, floor: f64) -> f64 {
        if self.std_dev.is_finite() {
            self.std_dev.max(floor)
        } else {
            floor
        }
    }

    fn is_usable(&self) -> bool {
        self.mean.is_finite()
    }
}

pub type CalibrationProfile = BTreeMap<Feature, Baseline>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationSet {
    pub version: String,
    #[serde(default)]
    pub profiles: BTreeMap<Genre, CalibrationProfile>,
}

static BUILTIN: OnceLock<CalibrationSet> = OnceLock::new();

impl CalibrationSet {
    /// Calibration document shipped with the crate
    pub fn builtin() -> &'static CalibrationSet {
        BUILTIN.get_or_init(|| {
            let raw = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/calibration.json"));
            serde_json::from_str(raw).expect("calibration.json parse failed")
        })
    }

    /// Baseline for a feature, falling back to the `default` genre profile.
    pub fn baseline(&self, genre: Genre, feature: Feature) -> Option<Baseline> {
        let from_genre = self
            .profiles
            .get(&genre)
            .and_then(|p| p.get(&feature))
            .copied()
            .filter(Baseline::is_usable);
        if from_genre.is_some() {
            return from_genre;
        }

        if genre != Genre::Default {
            debug!(
                "[CALIBRATION] {} has no {} baseline, using default profile",
                genre.as_str(),
                feature.as_str()
            );
        }
        self.profiles
            .get(&Genre::Default)
            .and_then(|p| p.get(&feature))
            .copied()
            .filter(Baseline::is_usable)
    }

    /// Build a calibration document from feature vectors of known-human samples.
    ///
    /// Only measurable values enter the statistics; genres without any sample are omitted.
    pub fn from_samples(version: &str, samples: &BTreeMap<Genre, Vec<FeatureVector>>) -> Self {
        let mut profiles = BTreeMap::new();
        for (genre, vectors) in samples {
            let mut profile = CalibrationProfile::new();
            for feature in Feature::SCORED {
                let values: Vec<f64> = vectors
                    .iter()
                    .filter(|v| v.is_measurable(feature))
                    .map(|v| v.get(feature))
                    .collect();
                if values.is_empty() {
                    continue;
                }
                profile.insert(
                    feature,
                    Baseline {
                        mean: mean(&values),
                        std_dev: std_dev(&values),
                    },
                );
            }
            if !profile.is_empty() {
                profiles.insert(*genre, profile);
            }
        }
        Self {
            version: version.to_string(),
            profiles,
        }
    }
}

impl Default for CalibrationSet {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::detection::features::Coverage;

    #[test]
    fn test_builtin_covers_every_genre_and_scored_feature() {
        let set = CalibrationSet::builtin();
        for genre in Genre::ALL {
            let profile = set.profiles.get(&genre).expect("profile");
            for feature in Feature::SCORED {
                assert!(profile.contains_key(&feature), "{:?} {:?}", genre, feature);
            }
        }
    }

    #[test]
    fn test_spread_is_floor_clamped() {
        let flat = Baseline { mean: 1.0, std_dev: 0.0 };
        assert_eq!(flat.spread(0.01), 0.01);
        let broken = Baseline { mean: 1.0, std_dev: f64::NAN };
        assert_eq!(broken.spread(0.01), 0.01);
    }

    #[test]
    fn test_missing_genre_falls_back_to_default() {
        let mut set = CalibrationSet::builtin().clone();
        set.profiles.remove(&Genre::Narrative);
        let expected = set.baseline(Genre::Default, Feature::Burstiness);
        assert!(expected.is_some());
        assert_eq!(set.baseline(Genre::Narrative, Feature::Burstiness), expected);
    }

    #[test]
    fn test_missing_everywhere_is_none() {
        let set = CalibrationSet {
            version: "empty".to_string(),
            profiles: BTreeMap::new(),
        };
        assert!(set.baseline(Genre::Academic, Feature::Burstiness).is_none());
    }

    #[test]
    fn test_from_samples_uses_measurable_values_only() {
        let measured = FeatureVector {
            burstiness: 4.0,
            coverage: Coverage { words: 100, sentences: 6, content_words: 40 },
            ..FeatureVector::default()
        };
        let measured_b = FeatureVector { burstiness: 8.0, ..measured.clone() };
        let too_short = FeatureVector {
            burstiness: 0.0,
            coverage: Coverage { words: 5, sentences: 1, content_words: 2 },
            ..FeatureVector::default()
        };
        let mut samples = BTreeMap::new();
        samples.insert(Genre::Narrative, vec![measured, measured_b, too_short]);

        let set = CalibrationSet::from_samples("test", &samples);
        let baseline = set.baseline(Genre::Narrative, Feature::Burstiness).expect("baseline");
        assert!((baseline.mean - 6.0).abs() < 1e-9);
        assert!((baseline.std_dev - 2.0).abs() < 1e-9);
    }
}
