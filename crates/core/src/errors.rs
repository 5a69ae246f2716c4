use thiserror::Error;

use crate::catalog::CatalogError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("crop `{name}` is not in the catalog")]
    CropNotFound { name: String },
    #[error("soil type `{soil_type}` is not in the catalog")]
    SoilNotFound { soil_type: String },
    #[error("the fertilizer catalog has no products")]
    EmptyCatalog,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Stable machine-readable class, used for CLI envelopes and exit codes.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Domain(DomainError::CropNotFound { .. }) => "crop_not_found",
            Self::Domain(DomainError::SoilNotFound { .. }) => "soil_not_found",
            Self::Domain(DomainError::EmptyCatalog) => "empty_catalog",
            Self::Catalog(_) => "catalog_unavailable",
            Self::Configuration(_) => "config_validation",
        }
    }

    /// Whether the failure names a missing catalog record (caller input)
    /// rather than an operational fault.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Domain(DomainError::CropNotFound { .. })
                | Self::Domain(DomainError::SoilNotFound { .. })
        )
    }
}
