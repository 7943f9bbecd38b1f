use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtlasError {
    #[error("geometry fetch failed for {code}: {reason}")]
    GeometryFetch { code: String, reason: String },

    #[error("no admin code for region: {0}")]
    UnknownRegion(String),
}
