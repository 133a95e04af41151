use serde::Deserialize;

use crate::models::frameworks::entities::OutcomeKind;

#[derive(Debug, Clone, Deserialize)]
pub struct AttainmentExportQuery {
    #[serde(default = "default_level")]
    pub level: OutcomeKind,
}

fn default_level() -> OutcomeKind {
    OutcomeKind::Plo
}
