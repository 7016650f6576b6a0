use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::calibrate::{load_stamp_blob, StampBlob};
use crate::catalog::CatalogEntry;
use crate::consts::{
    BAND_COUNT, MAX_ACTIVE_SOURCES, N_BODY_CANVAS, REFERENCE_BAND, SMALL_CANVAS,
    THREE_BODY_CANVAS,
};
use crate::error::{Result, StampcalError};
use crate::image::Image;
use crate::io::stamp::RawStampSource;
use crate::wcs::{CoordinateMap, IdentityMap, WcsProvider};

use super::config::FixtureConfig;
use super::params::{init_source, perturb_params};
use super::sample::{n_body_star, sample_galaxy_catalog, sample_star_catalog, three_body_catalog};
use super::types::{ArgsBuilder, Dataset, SceneCompositor};

/// Pick the sources the engine optimizes jointly.
///
/// An explicit request wins; otherwise all sources when there are at most
/// three, else the first three.
pub fn select_active_sources(total: usize, requested: Option<usize>) -> Result<Vec<usize>> {
    if total == 0 {
        return Err(StampcalError::EmptyCatalog);
    }
    match requested {
        Some(index) if index >= total => {
            Err(StampcalError::ActiveSourceOutOfRange { index, total })
        }
        Some(index) => Ok(vec![index]),
        None => Ok((0..total.min(MAX_ACTIVE_SOURCES)).collect()),
    }
}

/// Draw `count` uniform pixel positions on an `h` x `w` canvas.
///
/// For each source the row coordinate is drawn before the column one.
pub fn random_pixel_locations(rng: &mut impl Rng, count: usize, canvas: (usize, usize)) -> Vec<[f64; 2]> {
    let (h, w) = (canvas.0 as f64, canvas.1 as f64);
    (0..count)
        .map(|_| {
            let row = rng.gen::<f64>() * h;
            let col = rng.gen::<f64>() * w;
            [row, col]
        })
        .collect()
}

/// Randomly placed stars for the N-body fixture.
///
/// All positions are drawn before any is transformed, so a given seed always
/// yields the same catalog.
pub fn n_body_catalog(
    map: &dyn CoordinateMap,
    count: usize,
    canvas: (usize, usize),
    seed: Option<u64>,
) -> Vec<CatalogEntry> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let pixels = random_pixel_locations(&mut rng, count, canvas);
    map.pix_to_world_batch(&pixels)
        .into_iter()
        .enumerate()
        .map(|(s, pos)| n_body_star(pos, s))
        .collect()
}

/// Retarget every band of a blob to a shared canvas.
fn retarget(
    blob: StampBlob,
    canvas: (usize, usize),
    map: Option<Arc<dyn CoordinateMap>>,
) -> Vec<Image> {
    blob.into_iter()
        .map(|mut image| {
            image.rebind(canvas.0, canvas.1, map.clone());
            image
        })
        .collect()
}

/// Builds ground-truth fixtures from a calibrated stamp and a catalog.
pub struct DatasetAssembler<'a, C, B> {
    stamps: &'a dyn RawStampSource,
    wcs: &'a dyn WcsProvider,
    compositor: C,
    builder: B,
    config: FixtureConfig,
}

impl<'a, C, B> DatasetAssembler<'a, C, B>
where
    C: SceneCompositor,
    B: ArgsBuilder,
{
    pub fn new(
        stamps: &'a dyn RawStampSource,
        wcs: &'a dyn WcsProvider,
        compositor: C,
        builder: B,
        config: FixtureConfig,
    ) -> Self {
        Self {
            stamps,
            wcs,
            compositor,
            builder,
            config,
        }
    }

    pub fn config(&self) -> &FixtureConfig {
        &self.config
    }

    fn base_blob(&self) -> Result<StampBlob> {
        load_stamp_blob(self.stamps, self.wcs, &self.config.stamp_id)
    }

    /// One star on a 20x23 identity-mapped canvas; the star is the only active source.
    pub fn sample_star(&self, perturb: bool) -> Result<Dataset<B::Args>> {
        let images = retarget(self.base_blob()?, SMALL_CANVAS, Some(Arc::new(IdentityMap)));
        self.assemble(images, sample_star_catalog(), Some(0), perturb)
    }

    /// One galaxy on a 20x23 identity-mapped canvas.
    pub fn sample_galaxy(&self, perturb: bool) -> Result<Dataset<B::Args>> {
        let images = retarget(self.base_blob()?, SMALL_CANVAS, Some(Arc::new(IdentityMap)));
        self.assemble(images, sample_galaxy_catalog(), Some(0), perturb)
    }

    /// Two galaxies and a star on a 112x238 identity-mapped canvas.
    pub fn three_body(&self, perturb: bool) -> Result<Dataset<B::Args>> {
        let images = retarget(
            self.base_blob()?,
            THREE_BODY_CANVAS,
            Some(Arc::new(IdentityMap)),
        );
        self.assemble(images, three_body_catalog(), None, perturb)
    }

    /// `sources` stars scattered over a 900x1000 canvas that keeps the
    /// stamp's own coordinate map.
    pub fn n_body(&self, sources: usize, seed: Option<u64>, perturb: bool) -> Result<Dataset<B::Args>> {
        let images = retarget(self.base_blob()?, N_BODY_CANVAS, None);
        let map = Arc::clone(images[REFERENCE_BAND].coordinate_map());
        let catalog = n_body_catalog(map.as_ref(), sources, N_BODY_CANVAS, seed);
        self.assemble(images, catalog, None, perturb)
    }

    /// [`Self::n_body`] with the source count, seed and perturbation from the config.
    pub fn n_body_from_config(&self) -> Result<Dataset<B::Args>> {
        let n = &self.config.n_body;
        self.n_body(n.sources, n.seed, self.config.assembly.perturb)
    }

    /// Composite `catalog` into `images` and package the result.
    ///
    /// Aborts on the first failure; nothing is skipped.
    pub fn assemble(
        &self,
        images: Vec<Image>,
        catalog: Vec<CatalogEntry>,
        requested: Option<usize>,
        perturb: bool,
    ) -> Result<Dataset<B::Args>> {
        let active_sources = select_active_sources(catalog.len(), requested)?;

        let rendered = self.compositor.gen_blob(images, &catalog)?;
        if rendered.len() != BAND_COUNT {
            return Err(StampcalError::Compositor(format!(
                "expected {BAND_COUNT} images, got {}",
                rendered.len()
            )));
        }
        if let Some(bad) = rendered.iter().find(|img| !img.pixels_match_size()) {
            let (actual_height, actual_width) = bad.pixels.dim();
            return Err(StampcalError::ShapeMismatch {
                declared_height: bad.height(),
                declared_width: bad.width(),
                actual_height,
                actual_width,
            });
        }

        let mut params: Vec<_> = catalog.iter().map(init_source).collect();
        if perturb {
            params.iter_mut().for_each(perturb_params);
            debug!(sources = params.len(), "Perturbed initial guess");
        }

        let args = self.builder.build(
            rendered,
            &catalog,
            &active_sources,
            self.config.assembly.include_kl,
        )?;

        info!(
            sources = catalog.len(),
            active = ?active_sources,
            perturb,
            "Assembled dataset"
        );

        Ok(Dataset {
            args,
            params,
            catalog: Arc::from(catalog),
            active_sources,
        })
    }
}
