use serde::{Deserialize, Serialize};

/// Inside/outside surface film coefficients for a city and assembly type
///
/// Zero on both faces means "unknown": the calculation path never waits on these.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FilmCoefficients {
    #[serde(rename = "Hi")]
    pub hi: f64,

    #[serde(rename = "Ho")]
    pub ho: f64,
}

impl FilmCoefficients {
    pub fn new(hi: f64, ho: f64) -> Self {
        Self { hi, ho }
    }

    pub fn is_known(&self) -> bool {
        self.hi != 0.0 || self.ho != 0.0
    }
}
