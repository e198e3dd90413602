//! Server-rendered HTML pages.

/// HTML-escape text for element content and attribute values.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<meta name="robots" content="noindex">
<title>{title}</title>
<style>
body {{ font-family: system-ui, sans-serif; background: #f9fafb; color: #111827; margin: 0; }}
main {{ max-width: 56rem; margin: 0 auto; padding: 2rem 1rem; }}
.card {{ background: #fff; border-radius: 8px; box-shadow: 0 1px 3px #0002; padding: 1.5rem; }}
pre {{ white-space: pre-wrap; word-break: break-word; font-family: ui-monospace, monospace; font-size: 14px; background: #f9fafb; border: 1px solid #e5e7eb; border-radius: 4px; padding: 1rem; overflow-x: auto; }}
textarea, input {{ width: 100%; box-sizing: border-box; padding: .5rem; border: 1px solid #d1d5db; border-radius: 6px; font: inherit; }}
textarea {{ font-family: ui-monospace, monospace; min-height: 16rem; }}
.row {{ display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; margin: 1rem 0; }}
button {{ background: #2563eb; color: #fff; border: none; padding: .6rem 1.4rem; border-radius: 6px; cursor: pointer; }}
button:disabled {{ background: #9ca3af; }}
.error {{ background: #fef2f2; border: 1px solid #fecaca; color: #b91c1c; padding: 1rem; border-radius: 6px; margin-bottom: 1rem; }}
.ok {{ background: #f0fdf4; border: 1px solid #bbf7d0; padding: 1rem; border-radius: 6px; margin-bottom: 1rem; }}
[hidden] {{ display: none; }}
</style>
</head>
<body>
<main><div class="card">
{body}
</div></main>
</body>
</html>"#,
        title = html_escape(title),
        body = body,
    )
}

/// Landing page with the paste creation form.
///
/// The form posts JSON to `/api/pastes` and shows the returned share URL.
pub fn index_page() -> String {
    let body = r##"<h1>Pastelite</h1>
<p>Create a text paste and share it with a link.</p>
<div id="error" class="error" hidden></div>
<div id="result" class="ok" hidden>Paste created: <a id="result-url" href="#"></a></div>
<form id="paste-form">
<label for="content">Content</label>
<textarea id="content" required placeholder="Enter your paste content here..."></textarea>
<div class="row">
<div><label for="ttl">Time to live (seconds)</label><input id="ttl" type="number" min="1" placeholder="Optional"></div>
<div><label for="views">Max views</label><input id="views" type="number" min="1" placeholder="Optional"></div>
</div>
<button id="submit" type="submit">Create paste</button>
</form>
<script>
const form = document.getElementById('paste-form');
form.addEventListener('submit', async (event) => {
  event.preventDefault();
  const error = document.getElementById('error');
  const result = document.getElementById('result');
  const button = document.getElementById('submit');
  error.hidden = true;
  result.hidden = true;
  const body = { content: document.getElementById('content').value };
  const ttl = document.getElementById('ttl').value;
  const views = document.getElementById('views').value;
  if (ttl) body.ttl_seconds = Number(ttl);
  if (views) body.max_views = Number(views);
  button.disabled = true;
  try {
    const response = await fetch('/api/pastes', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify(body),
    });
    const data = await response.json();
    if (!response.ok) {
      error.textContent = data.error || 'Failed to create paste';
      error.hidden = false;
      return;
    }
    const link = document.getElementById('result-url');
    link.textContent = data.url;
    link.href = data.url;
    result.hidden = false;
    form.reset();
  } catch (err) {
    error.textContent = 'An error occurred. Please try again.';
    error.hidden = false;
  } finally {
    button.disabled = false;
  }
});
</script>"##;
    page("Pastelite", body)
}

/// Paste view page; content is rendered as escaped plain text.
pub fn paste_page(id: &str, content: &str) -> String {
    let body = format!(
        r#"<h1>Paste content</h1>
<pre>{content}</pre>"#,
        content = html_escape(content),
    );
    page(&format!("Paste {}", id), &body)
}

/// Error page used by the HTML routes.
pub fn error_page(status: u16, message: &str) -> String {
    let body = format!(
        r#"<h1>{status}</h1>
<p>{message}</p>
<p><a href="/">Create a new paste</a></p>"#,
        status = status,
        message = html_escape(message),
    );
    page(&format!("Error {}", status), &body)
}
