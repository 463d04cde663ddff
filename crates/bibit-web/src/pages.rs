//! HTML pages for the form front end

use bibit_core::RecommendationView;

/// The input form
pub const INDEX_HTML: &str = include_str!("../static/index.html");

/// Shared stylesheet
pub const STYLE_CSS: &str = include_str!("../static/style.css");

/// Escape text for an HTML body or attribute
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="id">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title}</title>
  <link rel="stylesheet" href="/static/style.css">
</head>
<body>
  <main>
{body}
    <p><a href="/">Kembali</a></p>
  </main>
</body>
</html>
"#,
        title = escape(title),
    )
}

/// Result page
pub fn result(view: &RecommendationView) -> String {
    let explanations: String = view
        .explanations
        .iter()
        .map(|s| format!("      <li>{}</li>\n", escape(s)))
        .collect();
    let details: String = view
        .details
        .iter()
        .map(|(label, percent)| {
            format!(
                "      <tr><td>{}</td><td>{}</td></tr>\n",
                escape(label),
                escape(percent)
            )
        })
        .collect();

    let body = format!(
        r#"    <h1>Hasil Rekomendasi</h1>
    <p>Bibit terbaik: <strong>{recommendation}</strong> ({probability})</p>
    <h2>Penjelasan</h2>
    <ul>
{explanations}    </ul>
    <h2>Probabilitas Lengkap</h2>
    <table>
{details}    </table>"#,
        recommendation = escape(&view.recommendation),
        probability = escape(&view.probability),
    );
    layout("Hasil Rekomendasi", &body)
}

/// Error page
pub fn error(message: &str) -> String {
    let body = format!(
        r#"    <h1>Terjadi Kesalahan</h1>
    <p class="error">{}</p>"#,
        escape(message)
    );
    layout("Terjadi Kesalahan", &body)
}
