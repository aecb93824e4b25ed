use axum::response::Html;

use docchat_core::Model;

const INDEX_HTML: &str = include_str!("../templates/index.html");

/// Render the index page with the model picker pre-populated.
pub fn render_index(selected: Model) -> Html<String> {
    Html(INDEX_HTML.replace("{{ model_options }}", &model_options(selected)))
}

fn model_options(selected: Model) -> String {
    Model::ALL
        .iter()
        .map(|m| {
            let attr = if *m == selected { " selected" } else { "" };
            format!("<option value=\"{0}\"{1}>{0}</option>", m.as_str(), attr)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
