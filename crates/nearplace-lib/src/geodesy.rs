//! Bearing, compass direction, and geodesic distance.
//!
//! Pure functions over coordinate pairs in decimal degrees. Bearings use the
//! spherical forward-azimuth formula; distances use the Vincenty inverse
//! solution on the WGS-84 ellipsoid, with a spherical haversine fallback for
//! the rare near-antipodal pairs where the iteration does not converge.

/// 16-point compass labels, clockwise from north in 22.5 degree sectors.
const COMPASS_LABELS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Width of one compass sector in degrees.
const SECTOR_DEGREES: f64 = 22.5;

/// WGS-84 semi-major axis in metres.
const WGS84_A: f64 = 6_378_137.0;

/// WGS-84 semi-minor axis in metres.
const WGS84_B: f64 = 6_356_752.314_245;

/// WGS-84 flattening.
const WGS84_F: f64 = 1.0 / 298.257_223_563;

/// Mean earth radius in metres, used by the haversine fallback.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Convergence threshold for the Vincenty lambda iteration, in radians.
const VINCENTY_EPSILON: f64 = 1e-12;

/// Iteration cap before falling back to the spherical formula.
const VINCENTY_MAX_ITERATIONS: usize = 200;

/// Initial bearing from point 1 towards point 2, in degrees within [0, 360).
///
/// 0 is true north, 90 is east. Coincident points yield a stable 0.0.
pub fn initial_bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let y = delta_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();

    (y.atan2(x).to_degrees() + 360.0) % 360.0
}

/// Discretize a bearing into one of the 16 compass labels.
///
/// Sectors are selected by `floor(bearing / 22.5)`, so each label covers the
/// 22.5 degrees clockwise from its heading. A bearing of exactly 360 wraps to
/// 0 before indexing.
pub fn compass_direction(bearing: f64) -> &'static str {
    let bearing = if bearing >= 360.0 { bearing - 360.0 } else { bearing };
    COMPASS_LABELS[(bearing / SECTOR_DEGREES).floor() as usize]
}

/// Geodesic distance between two points in metres.
///
/// Vincenty inverse solution on WGS-84. This is the user-facing distance and
/// is independent of the spatial index's internal candidate-selection metric.
pub fn distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    if lat1 == lat2 && lon1 == lon2 {
        return 0.0;
    }

    let u1 = ((1.0 - WGS84_F) * lat1.to_radians().tan()).atan();
    let u2 = ((1.0 - WGS84_F) * lat2.to_radians().tan()).atan();
    let l = (lon2 - lon1).to_radians();

    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    for _ in 0..VINCENTY_MAX_ITERATIONS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();

        let sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();
        if sin_sigma == 0.0 {
            // Coincident on the ellipsoid even if the inputs differed in sign of zero.
            return 0.0;
        }

        let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        let sigma = sin_sigma.atan2(cos_sigma);

        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;

        // Equatorial lines have cos_sq_alpha = 0.
        let cos_2sigma_m = if cos_sq_alpha == 0.0 {
            0.0
        } else {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        };

        let c = WGS84_F / 16.0 * cos_sq_alpha * (4.0 + WGS84_F * (4.0 - 3.0 * cos_sq_alpha));

        let lambda_prev = lambda;
        lambda = l
            + (1.0 - c)
                * WGS84_F
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m
                            + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

        if (lambda - lambda_prev).abs() < VINCENTY_EPSILON {
            let u_sq = cos_sq_alpha * (WGS84_A * WGS84_A - WGS84_B * WGS84_B) / (WGS84_B * WGS84_B);
            let a =
                1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
            let b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));

            let delta_sigma = b
                * sin_sigma
                * (cos_2sigma_m
                    + b / 4.0
                        * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)
                            - b / 6.0
                                * cos_2sigma_m
                                * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                                * (-3.0 + 4.0 * cos_2sigma_m * cos_2sigma_m)));

            return WGS84_B * a * (sigma - delta_sigma);
        }
    }

    haversine_distance(lat1, lon1, lat2, lon2)
}

/// Great-circle distance on a spherical earth, in metres.
fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (delta_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}
