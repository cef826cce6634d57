//! Environment snapshot resolution
//!
//! A recommendation request may carry readings directly, inside an embedded
//! `latest` object, or not at all. Each field is resolved on its own from the
//! first source that supplies a usable value:
//!
//! 1. the request body
//! 2. the body's `latest` object
//! 3. the caller's most recent stored reading
//!
//! A JSON `null`, or a value that cannot be read as the field's type, counts
//! as absent and resolution moves on to the next source.

use serde_json::Value;

use crate::models::{Components, EnvironmentSnapshot, StoredReading};
use crate::pollution::coerce_number;
use crate::types::Coordinates;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Aqi,
    Humidity,
    Temp,
    Category,
    City,
    Components,
    MainPollutant,
    SoilMoisture,
    Coords,
}

/// JSON pointers to try for one field, per source, in order
struct FieldSources {
    field: Field,
    body: &'static [&'static str],
    latest: &'static [&'static str],
    stored: &'static [&'static str],
}

const PRECEDENCE: &[FieldSources] = &[
    FieldSources {
        field: Field::Aqi,
        body: &["/aqi", "/AQI"],
        latest: &["/latest/aqi"],
        stored: &["/aqi"],
    },
    FieldSources {
        field: Field::Humidity,
        body: &["/humidity"],
        latest: &["/latest/humidity"],
        stored: &["/humidity"],
    },
    FieldSources {
        field: Field::Temp,
        body: &["/temp"],
        latest: &["/latest/temp"],
        stored: &[],
    },
    FieldSources {
        field: Field::Category,
        body: &["/category"],
        latest: &["/latest/category"],
        stored: &["/category"],
    },
    FieldSources {
        field: Field::City,
        body: &["/city"],
        latest: &["/latest/city"],
        stored: &["/city"],
    },
    FieldSources {
        field: Field::Components,
        body: &["/components"],
        latest: &["/latest/components"],
        stored: &["/components"],
    },
    FieldSources {
        field: Field::MainPollutant,
        body: &["/main_pollutant"],
        latest: &["/latest/main_pollutant"],
        stored: &["/main_pollutant"],
    },
    FieldSources {
        field: Field::SoilMoisture,
        body: &["/soil_moisture", "/soil"],
        latest: &["/latest/soil_moisture"],
        stored: &["/soil_moisture"],
    },
    FieldSources {
        field: Field::Coords,
        body: &[],
        latest: &["/latest/raw/coord"],
        stored: &["/raw/coord"],
    },
];

/// Build a snapshot from a request body and the caller's latest reading.
///
/// `pollution_value` is left unset; see
/// [`EnvironmentSnapshot::with_pollution_value`].
pub fn build_snapshot(body: &Value, stored: Option<&StoredReading>) -> EnvironmentSnapshot {
    let stored = stored
        .and_then(|reading| serde_json::to_value(reading).ok())
        .unwrap_or(Value::Null);

    let mut snapshot = EnvironmentSnapshot::default();
    for sources in PRECEDENCE {
        let candidates = sources
            .body
            .iter()
            .chain(sources.latest)
            .filter_map(|pointer| body.pointer(pointer))
            .chain(sources.stored.iter().filter_map(|pointer| stored.pointer(pointer)));

        for candidate in candidates {
            if assign(&mut snapshot, sources.field, candidate) {
                break;
            }
        }
    }
    snapshot
}

/// Store `value` into `field` if it can be read as that field's type
fn assign(snapshot: &mut EnvironmentSnapshot, field: Field, value: &Value) -> bool {
    match field {
        Field::Aqi => set(&mut snapshot.aqi, coerce_number(value)),
        Field::Humidity => set(&mut snapshot.humidity, coerce_number(value)),
        Field::Temp => set(&mut snapshot.temp, coerce_number(value)),
        Field::SoilMoisture => set(&mut snapshot.soil_moisture, coerce_number(value)),
        Field::Category => set(&mut snapshot.category, text(value)),
        Field::City => set(&mut snapshot.city, text(value)),
        Field::MainPollutant => set(&mut snapshot.main_pollutant, text(value)),
        Field::Components => set(&mut snapshot.components, components(value)),
        Field::Coords => set(&mut snapshot.coords, coordinates(value)),
    }
}

fn set<T>(slot: &mut Option<T>, value: Option<T>) -> bool {
    let found = value.is_some();
    if found {
        *slot = value;
    }
    found
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A pollutant mapping. `null` entries are dropped; other non-numeric
/// entries are kept as NaN so they still shadow later key spellings.
fn components(value: &Value) -> Option<Components> {
    let map = value.as_object()?;
    Some(
        map.iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(name, v)| (name.clone(), coerce_number(v).unwrap_or(f64::NAN)))
            .collect(),
    )
}

fn coordinates(value: &Value) -> Option<Coordinates> {
    let lat = coerce_number(value.get("lat")?)?;
    let lon = coerce_number(value.get("lon")?)?;
    Some(Coordinates::new(lat, lon))
}
