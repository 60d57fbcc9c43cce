//! HTML view of the retained pet records

use types::record::PetRecord;
use types::variant::ParserVariant;

const PAGE_HEAD: &str = r#"<html>
<head>
    <meta charset="utf-8">
    <title>Received Pets</title>
    <style>
        body { font-family: Arial, sans-serif; background:#121212; color:#eee; margin:20px; }
        .pet { border:1px solid #333; padding:12px; margin:12px 0; border-radius:10px; background:#1e1e1e; }
        .pet img { float:right; max-width:100px; border-radius:6px; }
        h2 { margin:0; font-size:18px; color:#ffd700; }
        p { margin:2px 0; }
        a { color:#4ea3ff; text-decoration:none; }
        pre { background:#111; padding:6px; border-radius:6px; white-space:pre-wrap; word-break:break-all; }
    </style>
</head>
<body>
    <h1>📦 Received Pets</h1>
"#;

const PAGE_TAIL: &str = "</body></html>";

/// Render `records` (already ordered) as a standalone page.
pub fn render_page(records: &[PetRecord], variant: ParserVariant) -> String {
    let mut html = String::from(PAGE_HEAD);
    for record in records {
        render_card(&mut html, record, variant);
    }
    html.push_str(PAGE_TAIL);
    html
}

fn render_card(html: &mut String, pet: &PetRecord, variant: ParserVariant) {
    let missing = variant.missing_placeholder();
    let field = |value: &Option<String>| escape_html(value.as_deref().unwrap_or(missing));

    html.push_str(&format!(
        r#"    <div class="pet">
        <img src="{thumbnail}" />
        <h2>{title}</h2>
        <p><b>Name:</b> {name}</p>
        <p><b>Value:</b> {value}</p>
        <p><b>Players:</b> {players}</p>
"#,
        thumbnail = escape_html(&pet.thumbnail_url),
        title = escape_html(&pet.title),
        name = field(&pet.name),
        value = field(&pet.value_per_second),
        players = field(&pet.player_count),
    ));

    if variant == ParserVariant::JobScript {
        html.push_str(&format!("        <p><b>Region:</b> {}</p>\n", field(&pet.region)));
    }

    html.push_str(&format!(
        "        <p><b>Mutation:</b> {}</p>\n        <p><b>Traits:</b> {}</p>\n",
        field(&pet.mutation),
        field(&pet.traits),
    ));

    match variant {
        ParserVariant::QuickJoin => {
            html.push_str(&format!(
                "        <p><b>Place ID:</b> {}</p>\n        <p><b>Job ID:</b> {}</p>\n",
                field(&pet.place_id),
                field(&pet.job_id),
            ));
            if let Some(url) = &pet.quick_join_url {
                html.push_str(&format!(
                    "        <p>🚀 <a href=\"{}\" target=\"_blank\">Quick Join</a></p>\n",
                    escape_html(url)
                ));
            }
        }
        ParserVariant::JobScript => {
            if let Some(script) = &pet.mobile_join_script {
                html.push_str(&format!(
                    "        <p><b>📱 Mobile Job:</b></p><pre>{}</pre>\n",
                    escape_html(script)
                ));
            }
            if let Some(script) = &pet.pc_join_script {
                html.push_str(&format!(
                    "        <p><b>💻 PC Job:</b></p><pre>{}</pre>\n",
                    escape_html(script)
                ));
            }
        }
    }

    html.push_str(&format!(
        "        <p><small>{}</small></p>\n    </div>\n",
        escape_html(&pet.footer_text)
    ));
}

/// Entity-encode the five HTML-significant characters.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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
