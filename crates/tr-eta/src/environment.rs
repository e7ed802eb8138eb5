//! Conditions outside the road graph that the ETA model sees.

use std::fmt;

use tr_core::Position;

use crate::{EtaError, EtaResult};

/// Coarse weather class, encoded as a small integer for the model.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WeatherCode {
    #[default]
    Clear = 0,
    Cloudy = 1,
    HeavyRain = 2,
}

impl WeatherCode {
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for WeatherCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WeatherCode::Clear => "clear",
            WeatherCode::Cloudy => "cloudy",
            WeatherCode::HeavyRain => "heavy rain",
        };
        f.write_str(s)
    }
}

/// Raw weather readings from the simulator, both on a 0–100 scale.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Weather {
    pub precipitation: f64,
    pub cloudiness: f64,
}

impl Weather {
    /// Precipitation above 50 is heavy rain; otherwise cloudiness above 50
    /// is cloudy.
    pub fn code(&self) -> WeatherCode {
        if self.precipitation > 50.0 {
            WeatherCode::HeavyRain
        } else if self.cloudiness > 50.0 {
            WeatherCode::Cloudy
        } else {
            WeatherCode::Clear
        }
    }
}

impl From<Weather> for WeatherCode {
    fn from(w: Weather) -> Self {
        w.code()
    }
}

/// Caller-supplied inputs for one feature extraction.
#[derive(Clone, Debug, PartialEq)]
pub struct Environment {
    hour_of_day: u8,
    weather: WeatherCode,
    traffic_lights: Vec<Position>,
}

impl Environment {
    /// # Errors
    ///
    /// [`EtaError::InvalidHour`] unless `hour_of_day < 24`.
    pub fn new(hour_of_day: u8, weather: WeatherCode, traffic_lights: Vec<Position>) -> EtaResult<Self> {
        if hour_of_day > 23 {
            return Err(EtaError::InvalidHour(hour_of_day));
        }
        Ok(Self { hour_of_day, weather, traffic_lights })
    }

    pub fn hour_of_day(&self) -> u8 {
        self.hour_of_day
    }

    pub fn weather(&self) -> WeatherCode {
        self.weather
    }

    pub fn traffic_lights(&self) -> &[Position] {
        &self.traffic_lights
    }
}
