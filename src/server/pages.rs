//! Server-rendered HTML pages

use std::fmt::Write;

use crate::inference::PricePrediction;
use crate::validation::RawFields;

/// Everything the prediction form page can show
#[derive(Debug, Default)]
pub struct IndexPage<'a> {
    /// Sorted neighborhood names for the select box
    pub neighborhoods: &'a [String],
    /// Previously submitted values, echoed back into the inputs
    pub form: Option<&'a RawFields>,
    pub prediction: Option<&'a PricePrediction>,
    pub error: Option<&'a str>,
}

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>House Price Prediction</title>
    <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-gray-900 text-gray-100 min-h-screen">
    <header class="bg-gray-800 border-b border-gray-700 px-6 py-4">
        <h1 class="text-xl font-bold">House Price Prediction</h1>
        <span class="text-sm text-gray-400">Random Forest Regressor</span>
    </header>
    <main class="p-6 max-w-3xl mx-auto">
"#;

const PAGE_TAIL: &str = r#"    </main>
</body>
</html>
"#;

/// Numeric inputs: (field name, label, min, max, step)
const NUMERIC_FIELDS: [(&str, &str, &str, &str, &str); 5] = [
    ("overall_qual", "Overall Quality (1-10)", "1", "10", "1"),
    ("gr_liv_area", "Living Area (sq ft)", "1", "", "any"),
    ("total_bsmt_sf", "Basement Area (sq ft)", "0", "", "any"),
    ("garage_cars", "Garage Capacity (cars)", "0", "4", "1"),
    ("year_built", "Year Built", "1800", "", "1"),
];

pub fn render_index(page: &IndexPage<'_>) -> String {
    let echoed = |name: &str| {
        page.form
            .and_then(|form| form.get(name))
            .map(|v| escape_html(v))
            .unwrap_or_default()
    };

    let mut html = String::from(PAGE_HEAD);

    if let Some(error) = page.error {
        let _ = writeln!(
            html,
            r#"        <div id="error" class="bg-red-900 border border-red-700 rounded p-4 mb-6">{}</div>"#,
            escape_html(error)
        );
    }

    if let Some(prediction) = page.prediction {
        let _ = write!(
            html,
            r#"        <div id="prediction" class="bg-gray-800 rounded-lg p-6 mb-6">
            <h2 class="text-lg font-semibold mb-2">Estimated Price</h2>
            <div class="text-3xl font-bold text-green-500">{}</div>
            <div class="text-sm text-gray-400">{}% interval: {} - {}</div>
            <div class="text-sm text-gray-400">Model R² {:.4} · RMSE {}</div>
        </div>
"#,
            format_currency(prediction.predicted_price),
            prediction.confidence,
            format_currency(prediction.lower_bound),
            format_currency(prediction.upper_bound),
            prediction.model_r2,
            format_currency(prediction.model_rmse),
        );
    }

    html.push_str(
        r#"        <form method="post" action="/predict" class="bg-gray-800 rounded-lg p-6 grid grid-cols-2 gap-4">
"#,
    );

    for (name, label, min, max, step) in NUMERIC_FIELDS {
        let max_attr = if max.is_empty() {
            String::new()
        } else {
            format!(r#" max="{}""#, max)
        };
        let _ = writeln!(
            html,
            r#"            <label class="block text-sm">{label}<input type="number" name="{name}" min="{min}"{max_attr} step="{step}" value="{value}" required class="w-full bg-gray-700 rounded p-2"></label>"#,
            value = echoed(name),
        );
    }

    let selected = echoed("neighborhood");
    html.push_str(
        r#"            <label class="block text-sm">Neighborhood<select name="neighborhood" required class="w-full bg-gray-700 rounded p-2">
"#,
    );
    for name in page.neighborhoods {
        let name = escape_html(name);
        let marker = if name == selected { " selected" } else { "" };
        let _ = writeln!(
            html,
            r#"                <option value="{name}"{marker}>{name}</option>"#
        );
    }
    html.push_str(
        r#"            </select></label>
            <button type="submit" class="col-span-2 px-6 py-2 bg-blue-600 hover:bg-blue-700 rounded">Predict Price</button>
        </form>
"#,
    );

    html.push_str(PAGE_TAIL);
    html
}

pub fn render_error(message: &str) -> String {
    let mut html = String::from(PAGE_HEAD);
    let _ = write!(
        html,
        r#"        <div id="error" class="bg-red-900 border border-red-700 rounded p-4 mb-6">{}</div>
        <a href="/" class="text-blue-400 hover:underline">Back to the prediction form</a>
"#,
        escape_html(message)
    );
    html.push_str(PAGE_TAIL);
    html
}

/// Escape text for use in HTML content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// `1234567.891` -> `$1,234,567.89`
pub fn format_currency(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, cents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x")</script> & 'y'"#),
            "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt; &amp; &#x27;y&#x27;"
        );
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(999.5), "$999.50");
        assert_eq!(format_currency(181_234.567), "$181,234.57");
        assert_eq!(format_currency(1_234_567.0), "$1,234,567.00");
    }

    #[test]
    fn test_index_lists_neighborhoods_and_selects_echo() {
        let neighborhoods = vec!["CollgCr".to_string(), "NAmes".to_string()];
        let mut form = RawFields::new();
        form.insert("neighborhood".to_string(), "NAmes".to_string());
        form.insert("gr_liv_area".to_string(), "2000".to_string());

        let html = render_index(&IndexPage {
            neighborhoods: &neighborhoods,
            form: Some(&form),
            ..Default::default()
        });

        assert!(html.contains(r#"<option value="CollgCr">CollgCr</option>"#));
        assert!(html.contains(r#"<option value="NAmes" selected>NAmes</option>"#));
        assert!(html.contains(r#"name="gr_liv_area" min="1" step="any" value="2000""#));
        assert!(!html.contains(r#"id="prediction""#));
    }

    #[test]
    fn test_index_escapes_echoed_values_and_errors() {
        let mut form = RawFields::new();
        form.insert("year_built".to_string(), "\"><b>".to_string());

        let html = render_index(&IndexPage {
            form: Some(&form),
            error: Some("<bad>"),
            ..Default::default()
        });

        assert!(html.contains("&quot;&gt;&lt;b&gt;"));
        assert!(html.contains("&lt;bad&gt;"));
        assert!(!html.contains("<bad>"));
    }

    #[test]
    fn test_index_shows_prediction() {
        let prediction = PricePrediction {
            predicted_price: 201_500.0,
            lower_bound: 150_000.0,
            upper_bound: 253_000.0,
            confidence: 95,
            model_r2: 0.8765,
            model_rmse: 28_000.0,
        };
        let html = render_index(&IndexPage {
            prediction: Some(&prediction),
            ..Default::default()
        });
        assert!(html.contains("$201,500.00"));
        assert!(html.contains("95% interval: $150,000.00 - $253,000.00"));
    }

    #[test]
    fn test_error_page() {
        let html = render_error("Page not found");
        assert!(html.contains("Page not found"));
        assert!(html.contains(r#"href="/""#));
    }
}
