use serde::{Deserialize, Serialize};

/// A soil type record. The engine validates that the requested soil exists
/// and echoes it in the result; soil attributes do not influence scoring.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SoilProfile {
    pub soil_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ph_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_retention: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characteristics: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
