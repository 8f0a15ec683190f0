//! Global constants for the geoscribe application

/// Initial map center longitude
pub const INITIAL_LON: f64 = 35.0;

/// Initial map center latitude
pub const INITIAL_LAT: f64 = 39.0;

/// Initial map zoom level
pub const INITIAL_ZOOM: f64 = 6.0;

/// Default viewport size used until the host reports the real canvas size
pub const DEFAULT_VIEWPORT: (f64, f64) = (1024.0, 768.0);

/// Map resolution (meters per pixel) at zoom level 0 for 256px tiles
pub const RESOLUTION_AT_ZOOM_0: f64 = 156_543.033_928_040_97;

/// Zoom range supported by the camera
pub const MIN_ZOOM: f64 = 0.0;
pub const MAX_ZOOM: f64 = 28.0;

/// Camera behaviour defaults
pub mod camera {
    /// Padding in pixels applied on every side when framing a feature
    pub const FIT_PADDING_PX: f64 = 150.0;
    /// Maximum zoom reached when framing a feature
    pub const FIT_MAX_ZOOM: f64 = 15.0;
    /// Duration of the framing animation
    pub const FIT_DURATION_MS: u32 = 1000;
    /// Zoom used when navigating to a geocoded location
    pub const GO_TO_ZOOM: f64 = 14.0;
    /// Duration of the go-to animation
    pub const GO_TO_DURATION_MS: u32 = 1500;
}

/// Pointer hit-testing thresholds, all in screen pixels
pub mod hit {
    /// Distance at which a click selects a rendered feature
    pub const FEATURE_TOLERANCE_PX: f64 = 8.0;
    /// Distance at which a drag grabs a vertex of the feature being edited
    pub const VERTEX_RADIUS_PX: f64 = 10.0;
    /// Distance threshold for closing a polygon by clicking near the first vertex
    pub const POLYGON_CLOSE_PX: f64 = 12.0;
    /// Clicks closer than this to the previous vertex are treated as the same vertex
    pub const DUPLICATE_VERTEX_PX: f64 = 1.0;
}

/// Measurement tooltip placement
pub mod tooltip {
    /// Pixel offset while the sketch is live
    pub const LIVE_OFFSET: (f64, f64) = (0.0, -15.0);
    /// Pixel offset once the measurement is finished
    pub const STATIC_OFFSET: (f64, f64) = (0.0, -7.0);
    /// Text shown before the first vertex of a measurement is placed
    pub const START_TEXT: &str = "Click to start measuring";
}

/// Geocoder defaults
pub mod geocoder {
    /// Public Nominatim search endpoint
    pub const ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";
    /// Country restriction passed to the geocoder
    pub const COUNTRY_CODES: &str = "tr";
    /// Maximum number of results shown
    pub const RESULT_LIMIT: usize = 5;
    /// Minimum query length before a search is issued
    pub const MIN_QUERY_LEN: usize = 3;
}

/// Default persistence API base URL
pub const DEFAULT_API_BASE_URL: &str = "https://localhost:7001";

/// File name offered for GeoJSON downloads
pub const EXPORT_FILE_NAME: &str = "features.geojson";

/// Fallback message when an error carries no usable text
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred.";
