use crate::model::WeatherQuery;

const NOT_AVAILABLE: &str = "n/a";

/// Formats a finished query into the human-readable report.
pub fn format_report(query: &WeatherQuery) -> String {
    let mut output = format!("\nWeather report for {}:\n", query.place);

    if let Some(label) = &query.label {
        output.push_str(&format!("  Location:    {label}\n"));
    }

    let coordinates = match query.coordinates {
        Some(c) => format!("({:.4}, {:.4})", c.latitude, c.longitude),
        None => NOT_AVAILABLE.to_string(),
    };
    output.push_str(&format!("  Coordinates: {coordinates}\n"));

    let temperature = match query.temperature_c {
        Some(t) => format!("{t:.1} \u{00b0}C"),
        None => NOT_AVAILABLE.to_string(),
    };
    output.push_str(&format!("  Temperature: {temperature}\n"));

    let humidity = match query.humidity_pct {
        Some(h) => format!("{h} %"),
        None => NOT_AVAILABLE.to_string(),
    };
    output.push_str(&format!("  Humidity:    {humidity}\n"));

    if let Some(at) = query.observed_at {
        output.push_str(&format!("  Observed:    {}\n", at.format("%Y-%m-%d %H:%M")));
    }

    output
}
