pub mod entry;
pub mod normalize;

pub use entry::{CatalogEntry, GalaxyShape, SourceProfile};
pub use normalize::{
    blend_flux, canonical_angle, effective_radius_pixels, floor_flux, normalize_catalog,
    normalize_catalog_strict, normalize_row, GalaxyProfile, RawShape,
};
