use tracing::debug;

use crate::server::api::{self, ApiContext, ApiError};

pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    pub fn to_http_string(&self) -> String {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status_code,
            self.status_text,
            self.content_type,
            self.body.len(),
            self.body
        )
    }

    fn ok(content_type: &'static str, body: String) -> Self {
        Self {
            status_code: 200,
            status_text: "OK",
            content_type,
            body,
        }
    }

    fn json(body: String) -> Self {
        Self::ok("application/json", body)
    }
}

pub fn route_request(ctx: &ApiContext, method: &str, path: &str, body: &str) -> HttpResponse {
    debug!(method, path, "routing request");
    let route = path.split('?').next().unwrap_or(path);
    match (method, route) {
        ("GET", "/") => HttpResponse::ok("text/html; charset=utf-8", index_html()),
        ("GET", "/api/health") => match api::health_payload() {
            Ok(payload) => HttpResponse::json(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("GET", "/api/tier") => match api::tier_payload(path) {
            Ok(payload) => HttpResponse::json(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("POST", "/api/calculate") => json_result(api::calculate_payload(body, ctx.locale)),
        ("POST", "/api/distribute") => json_result(api::distribute_payload(body)),
        ("POST", "/api/resize") => json_result(api::resize_payload(body)),
        ("POST", "/api/rows/add") => json_result(api::row_add_payload(body)),
        ("POST", "/api/rows/remove") => json_result(api::row_remove_payload(body)),
        ("POST", "/api/rows/update") => json_result(api::row_update_payload(body)),
        ("POST", "/api/export") => match api::export_payload(body) {
            Ok(csv) => HttpResponse::ok("text/csv; charset=utf-8", csv),
            Err(err) => api_error_response(&err),
        },
        ("GET", "/api/state") => json_result(api::state_get_payload(ctx)),
        ("PUT", "/api/state") => json_result(api::state_put_payload(ctx, body)),
        ("DELETE", "/api/state") => json_result(api::state_delete_payload(ctx)),
        _ => error_response(404, "Not Found", "Route not found"),
    }
}

fn json_result(result: Result<String, ApiError>) -> HttpResponse {
    match result {
        Ok(payload) => HttpResponse::json(payload),
        Err(err) => api_error_response(&err),
    }
}

fn api_error_response(err: &ApiError) -> HttpResponse {
    match err {
        ApiError::Parse(err) => {
            error_response(400, "Bad Request", &format!("Invalid request body: {err}"))
        }
        ApiError::Distribute(err) => error_response(400, "Bad Request", &err.to_string()),
        ApiError::RowNotFound(_) => error_response(404, "Not Found", &err.to_string()),
        ApiError::Store(_) | ApiError::Csv(_) | ApiError::Poisoned => {
            error_response(500, "Internal Server Error", &err.to_string())
        }
    }
}

fn error_response(status_code: u16, status_text: &'static str, message: &str) -> HttpResponse {
    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: format!(
            "{{\n  \"status\": \"error\",\n  \"message\": {}\n}}",
            serde_json::to_string(message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
        ),
    }
}

fn index_html() -> String {
    r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width,initial-scale=1" />
  <title>Commission Calculator</title>
  <style>
    body { font-family: Arial, sans-serif; max-width: 900px; margin: 24px auto; padding: 0 12px; }
    label { display:block; margin: 8px 0 4px; font-weight: 600; }
    input { width: 100%; padding: 8px; box-sizing: border-box; }
    button { margin-top: 12px; padding: 8px 14px; }
    pre { background: #111; color: #aef2ae; padding: 12px; overflow: auto; border-radius: 6px; min-height: 180px; }
  </style>
</head>
<body>
  <h1>Target &amp; Commission Calculator</h1>

  <label for="target">Outlet target</label>
  <input id="target" type="number" min="0" value="1000000" />
  <label for="achievement">Outlet achievement (%)</label>
  <input id="achievement" type="number" min="0" max="1000" value="0" />
  <label for="count">Employee count</label>
  <input id="count" type="number" min="0" value="0" />
  <label for="rows">Rows (CSV: name,sales,target)</label>
  <input id="rows" value="" placeholder="Mona,120000,100000;Ali,80000,100000" />
  <div>
    <button id="calc-btn">Calculate</button>
    <button id="dist-btn">Distribute equally</button>
  </div>

  <pre id="output">Ready.</pre>

  <script>
    const output = document.getElementById('output');
    function payload() {
      const rows = document.getElementById('rows').value.split(';').filter(Boolean).map(line => {
        const [name, sales, target] = line.split(',');
        return { name, sales: Number(sales) || 0, target: Number(target) || 0 };
      });
      return {
        outlet_target: Number(document.getElementById('target').value) || 0,
        outlet_achievement_percent: Number(document.getElementById('achievement').value) || 0,
        suggest_count: Number(document.getElementById('count').value) || 0,
        rows,
      };
    }
    async function post(path) {
      output.textContent = 'Loading…';
      const response = await fetch(path, {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(payload()),
      });
      const text = await response.text();
      if (!response.ok) {
        try { alert(JSON.parse(text).message); } catch (e) {}
      }
      output.textContent = 'HTTP ' + response.status + '\n' + text;
    }
    document.getElementById('calc-btn').addEventListener('click', () => post('/api/calculate'));
    document.getElementById('dist-btn').addEventListener('click', () => post('/api/distribute'));
  </script>
</body>
</html>
"#
    .to_string()
}
