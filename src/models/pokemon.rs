//! Pokemon model

use serde::{Deserialize, Serialize};

/// `GET /pokemon/{name}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
    pub name: String,
    /// Experience granted for defeating it; also drives catch difficulty.
    /// The API reports `null` for some forms.
    #[serde(default)]
    pub base_experience: Option<u32>,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub weight: u32,
}
