#![allow(missing_docs, dead_code)]

use jsontrellis::{Map, Schema, Value};

/// The document scrubbed through on the parser playground.
pub const PARSER_DEMO: &str = r##"{
  "title": "Hashbrown Streaming Demo",
  "version": 3,
  "status": "beta",
  "features": ["streaming", "stable identities", "reactive UI"],
  "theme": {
    "primary": "#6366f1",
    "secondary": "#14b8a6",
    "accent": null
  },
  "stats": {
    "nodes": 12,
    "latencyMs": 18.4,
    "stable": true
  },
  "contributors": [
    { "name": "Mina", "role": "Parser", "active": true },
    { "name": "Jules", "role": "Renderer", "active": false }
  ]
}"##;

pub fn parser_demo_schema() -> Schema {
    Schema::object(
        "demo-json",
        [
            ("title", Schema::string("Title").streaming()),
            ("version", Schema::number("Version")),
            ("status", Schema::string("Status")),
            (
                "features",
                Schema::array("Features", Schema::string("Feature").streaming()).streaming(),
            ),
            (
                "theme",
                Schema::object(
                    "Theme",
                    [
                        ("primary", Schema::string("Primary color")),
                        ("secondary", Schema::string("Secondary color")),
                        (
                            "accent",
                            Schema::any_of("Accent", [Schema::string("Accent"), Schema::null("")]),
                        ),
                    ],
                ),
            ),
            (
                "stats",
                Schema::object(
                    "Stats",
                    [
                        ("nodes", Schema::number("Nodes")),
                        ("latencyMs", Schema::number("Latency")),
                        ("stable", Schema::boolean("Stable")),
                    ],
                ),
            ),
            (
                "contributors",
                Schema::array(
                    "Contributors",
                    Schema::object(
                        "Contributor",
                        [
                            ("name", Schema::string("Name").streaming()),
                            ("role", Schema::string("Role").streaming()),
                            ("active", Schema::boolean("Active")),
                        ],
                    )
                    .streaming(),
                ),
            ),
        ],
    )
    .streaming()
}

/// A generated UI: a weather card followed by a markdown block.
pub const UI_DEMO: &str = r##"{
  "ui": [
    {
      "weather": {
        "props": {
          "themeColor": "#3B82F6",
          "temperature": 56.6,
          "humidity": 21,
          "windSpeed": 6.9,
          "feelsLike": 49.7,
          "location": "Huntsville, Alabama, United States"
        }
      }
    },
    {
      "Markdown": {
        "props": {
          "children": "**Huntsville, Alabama** - Current Weather\n- **Temperature:** 56.6°F (**feels like** 49.7°F)\n- **Humidity:** 21%\n- **Wind:** 6.9 mph"
        }
      }
    }
  ]
}"##;

pub fn ui_demo_schema() -> Schema {
    let weather = Schema::object(
        "Shows the weather for a given location",
        [(
            "weather",
            Schema::object(
                "Weather card",
                [(
                    "props",
                    Schema::object(
                        "Props",
                        [
                            ("location", Schema::string("The location to get the weather for").streaming()),
                            ("themeColor", Schema::string("The theme to use for the weather card")),
                            ("temperature", Schema::number("Temperature")),
                            ("humidity", Schema::number("Humidity")),
                            ("windSpeed", Schema::number("Wind speed")),
                            ("feelsLike", Schema::number("Feels like")),
                        ],
                    )
                    .streaming(),
                )],
            )
            .streaming(),
        )],
    )
    .streaming();
    let markdown = Schema::object(
        "Markdown text",
        [(
            "Markdown",
            Schema::object(
                "Markdown block",
                [(
                    "props",
                    Schema::object(
                        "Props",
                        [("children", Schema::string("Markdown source").streaming())],
                    )
                    .streaming(),
                )],
            )
            .streaming(),
        )],
    )
    .streaming();

    Schema::object(
        "Generated UI",
        [(
            "ui",
            Schema::array("Elements", Schema::any_of("Element", [weather, markdown])).streaming(),
        )],
    )
    .streaming()
}

/// Converts a `serde_json` value, used as the reference decoder.
pub fn from_serde(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(*b),
        serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(items) => Value::Array(items.iter().map(from_serde).collect()),
        serde_json::Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), from_serde(v)))
                .collect::<Map>(),
        ),
    }
}

/// Every char-aligned prefix of `doc`, shortest first, including `doc`.
pub fn char_prefixes(doc: &str) -> impl Iterator<Item = &str> {
    doc.char_indices()
        .skip(1)
        .map(|(end, _)| &doc[..end])
        .chain(core::iter::once(doc))
}
