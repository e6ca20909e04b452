use parcelgeo_catalog::Catalog;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog,
    /// Zone radius used by `/statistics` when the request has none
    pub default_zone_size_m: f64,
}

impl AppState {
    pub fn new(catalog: Catalog, default_zone_size_m: f64) -> Self {
        Self {
            catalog,
            default_zone_size_m,
        }
    }
}
