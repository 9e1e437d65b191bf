//! Renders a weather card while the model is still writing it.
//!
//! The assistant answers with a small generated UI: a `weather` element
//! followed by a `Markdown` block. The location and the markdown text are
//! declared as streaming fields, so they are painted letter by letter. The
//! numeric readings only appear once each number is terminated, which keeps
//! a half-written `56.` from ever flashing on screen as `56`.
//!
//! Run with
//!
//! ```bash
//! cargo run -p jsontrellis --example weather_card
//! ```

#![allow(clippy::needless_raw_string_hashes)]

use jsontrellis::{FeedMode, Schema, Session, SessionOptions, Value, layout, produce_chunks};

const RESPONSE: &str = r##"{"ui":[{"weather":{"props":{"location":"Huntsville, Alabama","themeColor":"#3B82F6","temperature":56.6,"humidity":21,"windSpeed":6.9,"feelsLike":49.7}}},{"Markdown":{"props":{"children":"Cool and dry, with a noticeable chill from the breeze."}}}]}"##;

fn schema() -> Schema {
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
                            ("location", Schema::string("Location").streaming()),
                            ("themeColor", Schema::string("Theme color")),
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
                    Schema::object("Props", [("children", Schema::string("Text").streaming())])
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

fn field<'v>(value: &'v Value, path: &[&str]) -> Option<&'v Value> {
    path.iter().try_fold(value, |value, key| value.get(key))
}

fn render(value: &Value) -> String {
    let Some(elements) = value.get("ui").and_then(Value::as_array) else {
        return String::from("(nothing yet)");
    };

    let mut lines = Vec::new();
    for element in elements {
        if let Some(props) = field(element, &["weather", "props"]) {
            let reading = |key: &str, unit: &str| {
                props
                    .get(key)
                    .and_then(Value::as_f64)
                    .map_or_else(|| "…".to_string(), |n| format!("{n}{unit}"))
            };
            lines.push(format!(
                "[weather] {} | {} (feels {}) | humidity {} | wind {}",
                props.get("location").and_then(Value::as_str).unwrap_or(""),
                reading("temperature", "°F"),
                reading("feelsLike", "°F"),
                reading("humidity", "%"),
                reading("windSpeed", " mph"),
            ));
        } else if let Some(text) = field(element, &["Markdown", "props", "children"]) {
            lines.push(format!("[markdown] {}", text.as_str().unwrap_or("")));
        }
    }
    lines.join("\n")
}

fn main() {
    let mut session = Session::with_options(
        schema(),
        SessionOptions {
            feed_mode: FeedMode::Delta,
            ..Default::default()
        },
    );

    for (i, chunk) in produce_chunks(RESPONSE, 24).into_iter().enumerate() {
        let update = session.feed(chunk);
        println!("--- chunk {i:>2}, {} node(s) changed", update.changed.len());
        if let Some(value) = &update.value {
            println!("{}", render(value));
        }
    }

    let update = session.finish();
    match &update.state.error {
        Some(err) => eprintln!("stream ended early: {err}"),
        None => println!("--- complete: {}", update.state.is_complete),
    }

    print!("{}", layout(update.state).outline());
}
