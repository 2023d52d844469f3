use super::Language;
use crate::classifier::Diagnosis;
use crate::predictor::Predictor;
use crate::record::{Categorical, Feature, Numeric};
use std::collections::HashMap;
use std::fmt::Write;

/// Banner shown under the form after a submission
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Diagnosis(Diagnosis),
    Error(String),
}

/// Inputs in the left column; the rest go to the right
const LEFT_COLUMN: [Feature; 5] = [
    Feature::Numeric(Numeric::Age),
    Feature::Categorical(Categorical::Sex),
    Feature::Categorical(Categorical::ChestPainType),
    Feature::Numeric(Numeric::RestingBp),
    Feature::Numeric(Numeric::Cholesterol),
];

const RIGHT_COLUMN: [Feature; 6] = [
    Feature::Numeric(Numeric::FastingBs),
    Feature::Categorical(Categorical::RestingEcg),
    Feature::Numeric(Numeric::MaxHr),
    Feature::Categorical(Categorical::ExerciseAngina),
    Feature::Numeric(Numeric::Oldpeak),
    Feature::Categorical(Categorical::StSlope),
];

const STYLE: &str = "body{font-family:sans-serif;max-width:960px;margin:2em auto;padding:0 1em}\
h1{text-align:center;color:#c0392b}\
.columns{display:flex;gap:2em}.column{flex:1}\
label{display:block;margin-top:1em}input,select{width:100%;padding:.4em}\
button{margin-top:1.5em;padding:.6em 2em}\
.banner{margin-top:1.5em;padding:1em;border-radius:4px}\
.present,.error{background:#fdecea;color:#8a1f11}.absent{background:#e9f7ef;color:#1e6b3a}";

/// Render the full page.
///
/// `values` holds the raw field values to show; fields without an entry
/// fall back to their defaults.
pub fn render(
    predictor: &Predictor,
    language: Language,
    values: &HashMap<String, String>,
    outcome: Option<&Outcome>,
) -> String {
    let strings = language.strings();
    let mut html = String::with_capacity(4096);

    let _ = write!(
        html,
        "<!DOCTYPE html><html lang=\"{}\"><head><meta charset=\"utf-8\">\
         <title>{}</title><style>{}</style></head><body><h1>{}</h1>\
         <form method=\"post\" action=\"/predict\"><div class=\"columns\">",
        strings.lang,
        escape(strings.title),
        STYLE,
        escape(strings.title)
    );

    for column in [&LEFT_COLUMN[..], &RIGHT_COLUMN[..]] {
        html.push_str("<div class=\"column\">");
        for feature in column {
            render_input(&mut html, predictor, language, *feature, values);
        }
        html.push_str("</div>");
    }

    let _ = write!(
        html,
        "</div><button type=\"submit\">{}</button></form>",
        escape(strings.predict_button)
    );

    if let Some(outcome) = outcome {
        let (class, message) = match outcome {
            Outcome::Diagnosis(d) => (d.as_str(), language.diagnosis_message(*d).to_string()),
            Outcome::Error(e) => ("error", language.error_message(e)),
        };
        let _ = write!(
            html,
            "<div class=\"banner {}\" role=\"alert\">{}</div>",
            class,
            escape(&message)
        );
    }

    html.push_str("</body></html>");
    html
}

fn render_input(
    html: &mut String,
    predictor: &Predictor,
    language: Language,
    feature: Feature,
    values: &HashMap<String, String>,
) {
    let name = feature.name();
    let _ = write!(
        html,
        "<label for=\"{}\">{}</label>",
        name,
        escape(language.label(feature))
    );

    match feature {
        Feature::Categorical(field) => {
            let options: Vec<(String, String)> = predictor
                .vocabulary(field)
                .iter()
                .map(|v| (v.clone(), v.clone()))
                .collect();
            render_select(html, name, &options, values.get(name));
        }
        Feature::Numeric(field) => {
            let spec = field.spec();
            if spec.discrete {
                let yes_no = language.strings().yes_no;
                let options: Vec<(String, String)> = (spec.min as i64..=spec.max as i64)
                    .map(|v| {
                        let text = match v {
                            0 => format!("0 ({})", yes_no[0]),
                            1 => format!("1 ({})", yes_no[1]),
                            other => other.to_string(),
                        };
                        (v.to_string(), text)
                    })
                    .collect();
                render_select(html, name, &options, values.get(name));
            } else {
                let value = values
                    .get(name)
                    .cloned()
                    .unwrap_or_else(|| spec.default.to_string());
                let _ = write!(
                    html,
                    "<input type=\"number\" id=\"{0}\" name=\"{0}\" min=\"{1}\" max=\"{2}\" \
                     step=\"{3}\" value=\"{4}\" required>",
                    name,
                    spec.min,
                    spec.max,
                    spec.step,
                    escape(&value)
                );
            }
        }
    }
}

/// `options` are (value, text) pairs; the first is selected unless
/// `selected` names another one
fn render_select(
    html: &mut String,
    name: &str,
    options: &[(String, String)],
    selected: Option<&String>,
) {
    let _ = write!(html, "<select id=\"{0}\" name=\"{0}\">", name);
    for (value, text) in options {
        let is_selected = selected.map(|s| s == value).unwrap_or(false);
        let _ = write!(
            html,
            "<option value=\"{}\"{}>{}</option>",
            escape(value),
            if is_selected { " selected" } else { "" },
            escape(text)
        );
    }
    html.push_str("</select>");
}

/// Escape text for HTML element content and quoted attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
