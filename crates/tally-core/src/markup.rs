//! HTML fragments for the three views. Pure data sinks: no logic
//! beyond interpolating already-computed display state.

use crate::widget::DisplayModel;

/// Counter view markup. `status` is the initial performance line:
/// the idle message normally, a persistent degraded message when the
/// backend failed to load.
#[must_use]
pub fn render_counter(display: &DisplayModel, status: &str) -> String {
    format!(
        r#"<div class="counter-widget">
  <h1>Tally Counter</h1>
  <div id="counter-display" class="counter-display" style="color: {color}; font-size: {font_size};">{value}</div>
  <div class="button-group">
    <button id="btn-decrement" class="btn-decrement">-</button>
    <button id="btn-reset" class="btn-reset">Reset</button>
    <button id="btn-increment" class="btn-increment">+</button>
  </div>
  <div class="stats">
    <div>Total Operations: <span id="total-ops">{total_ops}</span></div>
    <div>Performance: <span id="perf-info">{status}</span></div>
  </div>
</div>"#,
        color = display.color,
        font_size = display.font_size,
        value = display.value,
        total_ops = display.total_operations,
        status = escape_text(status),
    )
}

/// Test/benchmark view markup.
#[must_use]
pub fn render_test() -> String {
    r#"<div class="test-widget">
  <h1>Backend Test Route</h1>
  <div class="test-content">
    <h2>Counter Function Checks</h2>
    <div id="test-results"></div>
    <button id="run-tests" class="btn-test">Run All Tests</button>
  </div>
  <div class="benchmark-section">
    <h2>Performance Benchmarks</h2>
    <div id="benchmark-results"></div>
    <button id="run-benchmarks" class="btn-test">Run Benchmarks</button>
  </div>
</div>"#
        .to_owned()
}

/// Not-found view markup showing the literal requested path.
#[must_use]
pub fn render_not_found(path: &str) -> String {
    format!(
        r#"<div class="error-widget">
  <h1>404 - Route Not Found</h1>
  <p>The route "{path}" was not found.</p>
  <button data-route="/" class="btn-home">Go Home</button>
</div>"#,
        path = escape_text(path),
    )
}

/// Interpolated text is untrusted (the 404 path comes straight from
/// the location bar), so it is always entity-escaped.
fn escape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
