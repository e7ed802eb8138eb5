//! The fixed-order model input.

use crate::WeatherCode;

/// Number of features in a [`FeatureVector`].
pub const FEATURE_COUNT: usize = 8;

/// Column names of [`FeatureVector::to_array`], in order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "total_distance",
    "turn_count",
    "junction_count",
    "avg_delay",
    "avg_speed",
    "hour_of_day",
    "weather_code",
    "traffic_light_count",
];

/// Model inputs for one candidate route.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FeatureVector {
    pub total_distance_m: f64,
    pub turn_count: u32,
    pub junction_count: u32,
    /// Mean expected delay per hop, in seconds.
    pub avg_delay_secs: f64,
    /// Distance-weighted mean speed limit, in km/h.
    pub avg_speed_kmh: f64,
    pub hour_of_day: u8,
    pub weather: WeatherCode,
    pub traffic_light_count: u32,
}

impl FeatureVector {
    /// Flatten in the order of [`FEATURE_NAMES`].
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.total_distance_m,
            f64::from(self.turn_count),
            f64::from(self.junction_count),
            self.avg_delay_secs,
            self.avg_speed_kmh,
            f64::from(self.hour_of_day),
            f64::from(self.weather.code()),
            f64::from(self.traffic_light_count),
        ]
    }
}
