//! HTML served by the demo endpoints.
//!
//! Templates are plain strings with `{{placeholder}}` markers, filled by
//! [`result_page`]. Values must be escaped with [`escape_html`] first.

const STYLE: &str = r#"
    :root {
        --primary-color: #4A90E2;
        --secondary-color: #50E3C2;
        --text-color: #333;
        --bg-color: #f4f7f6;
        --card-bg: #fff;
        --border-color: #e0e0e0;
        --shadow-light: rgba(0, 0, 0, 0.05);
        --shadow-medium: rgba(0, 0, 0, 0.1);
    }
    body {
        font-family: 'Poppins', sans-serif;
        background-color: var(--bg-color);
        color: var(--text-color);
        margin: 0;
        padding: 20px;
        display: flex;
        justify-content: center;
        align-items: center;
        min-height: 100vh;
        box-sizing: border-box;
    }
    .container {
        background-color: var(--card-bg);
        border-radius: 12px;
        box-shadow: 0 10px 30px var(--shadow-medium);
        padding: 40px;
        max-width: 700px;
        width: 100%;
        text-align: center;
        border: 1px solid var(--border-color);
    }
    h1 { color: var(--primary-color); font-weight: 600; margin-bottom: 25px; font-size: 2.2em; }
    h2 { font-weight: 400; margin-top: 40px; margin-bottom: 20px; font-size: 1.5em; }
    form { display: flex; flex-direction: column; gap: 15px; margin-bottom: 30px; }
    input[type="text"] {
        padding: 12px;
        border: 1px solid var(--border-color);
        border-radius: 8px;
        font-size: 1em;
        outline: none;
    }
    input[type="text"]:focus { border-color: var(--primary-color); }
    button, .button-group a {
        background: linear-gradient(45deg, var(--primary-color), var(--secondary-color));
        color: white;
        border: none;
        padding: 14px 25px;
        font-size: 1.1em;
        font-weight: 600;
        border-radius: 8px;
        cursor: pointer;
        text-decoration: none;
        box-shadow: 0 5px 15px var(--shadow-light);
    }
    ul { list-style: none; padding: 0; margin: 0; text-align: left; }
    ul li {
        background-color: var(--bg-color);
        border: 1px solid var(--border-color);
        border-radius: 8px;
        padding: 12px 15px;
        margin-bottom: 10px;
    }
    ul li strong { color: var(--primary-color); margin-right: 8px; }
    a { color: var(--primary-color); font-weight: 600; }
    .qr-container {
        margin: 30px 0;
        padding: 20px;
        border: 1px solid var(--border-color);
        border-radius: 8px;
        display: inline-block;
    }
    .qr-container img { max-width: 100%; height: auto; display: block; }
    .button-group { margin-top: 30px; display: flex; justify-content: center; gap: 20px; flex-wrap: wrap; }
    @media (max-width: 600px) {
        .container { padding: 25px; margin: 10px; }
        h1 { font-size: 1.8em; }
        .button-group { flex-direction: column; gap: 15px; }
    }
"#;

const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>QR Code Generator</title>
    <style>{{style}}</style>
</head>
<body>
    <div class="container">
        <h1>QR Code Generator</h1>
        <form action="/generate" method="post">
            <input type="text" name="text" placeholder="Enter text or URL to generate QR code" required>
            <button type="submit">Generate QR Code</button>
        </form>

        <h2>API Endpoints:</h2>
        <ul>
            <li><strong>GET /qr/:text</strong> - Generate QR code from URL parameter</li>
            <li><strong>POST /generate</strong> - Generate QR code from form data</li>
            <li><strong>GET /qr-json/:text</strong> - Get QR code as base64 JSON</li>
            <li><strong>POST /qr-advanced</strong> - Advanced QR code generation with custom options</li>
        </ul>

        <p><strong>Example:</strong> <a href="/qr/Hello%20World" target="_blank">/qr/Hello World</a></p>
    </div>
</body>
</html>
"#;

const RESULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Generated QR Code</title>
    <style>{{style}}</style>
</head>
<body>
    <div class="container">
        <h1>Generated QR Code</h1>
        <p><strong>Text:</strong> {{text}}</p>
        <div class="qr-container">
            <img src="data:image/png;base64,{{image}}" alt="QR Code" />
        </div>
        <div class="button-group">
            <a href="/">&larr; Generate Another QR Code</a>
            <a href="data:image/png;base64,{{image}}" download="qrcode.png">Download QR Code</a>
        </div>
    </div>
</body>
</html>
"#;

pub(crate) fn index_page() -> String {
    INDEX_TEMPLATE.replace("{{style}}", STYLE)
}

/// `text` is escaped here; `image_base64` is trusted base64 output.
pub(crate) fn result_page(text: &str, image_base64: &str) -> String {
    RESULT_TEMPLATE
        .replace("{{style}}", STYLE)
        .replace("{{image}}", image_base64)
        .replace("{{text}}", &escape_html(text))
}

pub(crate) fn escape_html(text: &str) -> String {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<script>alert('x & y')</script>"),
            "&lt;script&gt;alert(&#39;x &amp; y&#39;)&lt;/script&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_result_page_fills_placeholders() {
        let page = result_page("{{image}} <b>", "QUJD");
        assert!(page.contains("<strong>Text:</strong> {{image}} &lt;b&gt;"));
        assert_eq!(page.matches("data:image/png;base64,QUJD").count(), 2);
        assert!(!page.contains("{{style}}"));
    }

    #[test]
    fn test_index_page_lists_endpoints() {
        let page = index_page();
        assert!(page.contains("action=\"/generate\""));
        assert!(page.contains("/qr-advanced"));
    }
}
