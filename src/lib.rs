//! Shared library for the addon registry CI helpers.
//!
//! The crate backs two binaries: `validate-addon`, which checks the
//! descriptor files changed in a pull request and reports problems as
//! workflow annotations, and `build-addons`, which folds every descriptor in
//! a directory into the published `addons.json` catalog. Public functions
//! here form the contract those binaries depend on.

pub mod annotations;
pub mod catalog;
pub mod config;
pub mod descriptor;
pub mod releases;
pub mod schema;
pub mod validation;

pub use annotations::{Annotation, Level, report};
pub use catalog::{CATALOG_FILE, CatalogSummary, build_catalog};
pub use config::ValidatorConfig;
pub use descriptor::{
    OPTIONAL_FIELDS, REQUIRED_FIELDS, descriptor_stem, is_descriptor_path, parse_descriptor,
};
pub use releases::{
    GithubReleases, ReleaseCheck, ReleaseLookupError, ReleaseResponse, ReleaseSource,
    check_releases,
};
pub use schema::{SchemaReport, validate_addon};
pub use validation::{
    ErrorKind, ValidationError, ValidationOutcome, ValidationWarning, validate_pr_changes,
};
