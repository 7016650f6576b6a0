use std::sync::Arc;

use crate::catalog::CatalogEntry;
use crate::error::Result;
use crate::image::Image;

use super::params::SourceParams;

/// Renders catalog sources into images.
///
/// Implementations must return the same number of images, each with pixels
/// sized to its declared height and width.
pub trait SceneCompositor: Send + Sync {
    fn gen_blob(&self, images: Vec<Image>, catalog: &[CatalogEntry]) -> Result<Vec<Image>>;
}

/// Builds the inference engine's argument object.
pub trait ArgsBuilder {
    type Args;

    fn build(
        &self,
        images: Vec<Image>,
        catalog: &[CatalogEntry],
        active_sources: &[usize],
        include_kl: bool,
    ) -> Result<Self::Args>;
}

/// An assembled fixture.
///
/// `args` owns the images; the ground-truth catalog is shared read-only
/// with whatever asserts against it.
#[derive(Clone, Debug)]
pub struct Dataset<A> {
    pub args: A,
    /// Initial guess per source, in catalog order.
    pub params: Vec<SourceParams>,
    pub catalog: Arc<[CatalogEntry]>,
    pub active_sources: Vec<usize>,
}
