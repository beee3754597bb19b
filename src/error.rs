//! Fouttaxonomie van de publieke operaties.
//!
//! Fouten per sample ([`crate::field::FieldError`]) komen hier niet voor: die
//! worden in de samplers opgevangen.

use thiserror::Error;

use crate::field::ExpressionError;
use crate::iso::{GridError, MeshError, RangeError};

/// Gestructureerde fout van een engine-operatie. Geen enkele variant wordt
/// automatisch opnieuw geprobeerd.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("ongeldige expressie: {0}")]
    InvalidExpression(String),
    #[error("variabelen niet toegestaan: {}. Alleen x, y, z.", .0.join(", "))]
    DisallowedVariable(Vec<String>),
    #[error("geen geldige waarden in het domein")]
    NoValidSamples,
    #[error("kon geen mesh genereren; pas de isowaarde of de grenzen aan")]
    EmptyMesh,
    #[error("parameter `{0}` ontbreekt")]
    MissingParameter(&'static str),
    #[error("ongeldig grid: {0}")]
    InvalidGrid(String),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl From<ExpressionError> for EngineError {
    fn from(error: ExpressionError) -> Self {
        match error {
            ExpressionError::DisallowedVariable(names) => Self::DisallowedVariable(names),
            other => Self::InvalidExpression(other.to_string()),
        }
    }
}

impl From<GridError> for EngineError {
    fn from(error: GridError) -> Self {
        Self::InvalidGrid(error.to_string())
    }
}

impl From<RangeError> for EngineError {
    fn from(error: RangeError) -> Self {
        match error {
            RangeError::NoValidSamples => Self::NoValidSamples,
        }
    }
}

impl From<MeshError> for EngineError {
    fn from(error: MeshError) -> Self {
        match error {
            MeshError::EmptyMesh => Self::EmptyMesh,
            other @ MeshError::DimensionMismatch { .. } => Self::InvalidGrid(other.to_string()),
        }
    }
}
