// Weather components
//
// weather.getCurrentWeather renders a weather card whose buttons redirect to
// further weather tools; weather.getSevenDayForecast is the redirect target.
// Execution is a deterministic mock keyed on the location bytes, so tests
// and demos behave the same on every run. A location containing "fail"
// simulates an upstream fetch error.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use toolview_core::{ActionSpec, ComponentDefinition, Result};

/// Tool name for the current weather card
pub const CURRENT_WEATHER_TOOL: &str = "weather.getCurrentWeather";

/// Tool name for the seven-day forecast
pub const SEVEN_DAY_FORECAST_TOOL: &str = "weather.getSevenDayForecast";

/// Raw result of the current-weather execute function
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawWeather {
    pub city: String,
    pub temp_c: f64,
    pub condition: String,
    pub icon: String,
}

/// View data for the weather card
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherView {
    pub location: String,
    pub temperature: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

fn location_hash(location: &str) -> u32 {
    location
        .bytes()
        .fold(0u32, |acc, b| acc.wrapping_add(b as u32))
}

fn mock_condition(hash: u32) -> &'static str {
    match hash % 4 {
        0 => "Sunny",
        1 => "Cloudy",
        2 => "Rainy",
        _ => "Partly Cloudy",
    }
}

/// Build the `weather.getCurrentWeather` definition
pub fn current_weather() -> Result<ComponentDefinition> {
    ComponentDefinition::builder(CURRENT_WEATHER_TOOL)
        .description("Gets the current weather for a specified location.")
        .input_schema(json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "The city and state, e.g., San Francisco, CA"
                }
            },
            "required": ["location"],
            "additionalProperties": false
        }))
        .execute(|params| async move {
            let location = params
                .get("location")
                .and_then(Value::as_str)
                .unwrap_or("Unknown")
                .to_string();
            if location.to_lowercase().contains("fail") {
                anyhow::bail!("failed to fetch weather for {location}");
            }

            let hash = location_hash(&location);
            Ok(json!({
                "city": location,
                "temp_c": (hash % 20) + 10,
                "condition": mock_condition(hash),
                "icon": "mock_icon_url.png"
            }))
        })
        .transform(|raw| {
            let raw: RawWeather = serde_json::from_value(raw)?;
            Ok(serde_json::to_value(WeatherView {
                location: raw.city,
                temperature: format!("{}°C", raw.temp_c),
                description: raw.condition,
                icon_url: Some(raw.icon),
            })?)
        })
        .action(
            "GET_7_DAY_FORECAST",
            ActionSpec::redirect(SEVEN_DAY_FORECAST_TOOL, |params| {
                json!({
                    "city": params.get("location").cloned().unwrap_or(Value::Null),
                    "num_days": params.get("days").and_then(Value::as_u64).unwrap_or(7),
                })
            }),
        )
        .action(
            "REFRESH_CURRENT",
            ActionSpec::redirect(CURRENT_WEATHER_TOOL, |params| {
                json!({
                    "location": params.get("location").cloned().unwrap_or(Value::Null),
                })
            }),
        )
        .build()
}

/// Build the `weather.getSevenDayForecast` definition
pub fn seven_day_forecast() -> Result<ComponentDefinition> {
    ComponentDefinition::builder(SEVEN_DAY_FORECAST_TOOL)
        .description("Gets a multi-day weather forecast for a specified city.")
        .input_schema(json!({
            "type": "object",
            "properties": {
                "city": {
                    "type": "string",
                    "description": "The city to forecast."
                },
                "num_days": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": 14,
                    "description": "Number of days to forecast. Defaults to 7."
                }
            },
            "required": ["city"],
            "additionalProperties": false
        }))
        .execute(|params| async move {
            let city = params
                .get("city")
                .and_then(Value::as_str)
                .unwrap_or("Unknown")
                .to_string();
            let num_days = params
                .get("num_days")
                .and_then(Value::as_u64)
                .unwrap_or(7)
                .clamp(1, 14);

            let hash = location_hash(&city);
            let days: Vec<Value> = (0..num_days)
                .map(|day| {
                    let day_hash = hash.wrapping_add(day as u32 * 31);
                    json!({
                        "day": day + 1,
                        "temp_c": (day_hash % 20) + 10,
                        "condition": mock_condition(day_hash),
                    })
                })
                .collect();

            Ok(json!({ "city": city, "days": days }))
        })
        .transform(|raw| {
            let city = raw
                .get("city")
                .and_then(Value::as_str)
                .unwrap_or("Unknown");
            let days = raw
                .get("days")
                .and_then(Value::as_array)
                .ok_or_else(|| anyhow::anyhow!("forecast payload is missing 'days'"))?;

            let entries: Vec<Value> = days
                .iter()
                .map(|day| {
                    json!({
                        "label": format!("Day {}", day["day"]),
                        "temperature": format!("{}°C", day["temp_c"]),
                        "description": day["condition"],
                    })
                })
                .collect();

            Ok(json!({ "location": city, "days": entries }))
        })
        .action(
            "REFRESH_CURRENT",
            ActionSpec::redirect(CURRENT_WEATHER_TOOL, |params| {
                json!({
                    "location": params.get("location").cloned().unwrap_or(Value::Null),
                })
            }),
        )
        .build()
}
