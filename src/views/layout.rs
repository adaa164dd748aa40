//! Page frame: head, nav bar, sidebar and main content area.

use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::{SessionId, StyleRegistry};

// ---

/// Sidebar entries as `(href, title, icon)`.
const ROUTES: [(&str, &str, &str); 4] = [
    ("/dashboard", "Dashboard", "⌂"),
    ("/stations/map", "Station Map", "◎"),
    ("/stations/list", "Station List", "▤"),
    ("/alerts", "Alerts", "⚠"),
];

/// A sidebar link is active on its own path and on any path below it.
pub fn is_active(path: &str, href: &str) -> bool {
    // ---
    path == href
        || path
            .strip_prefix(href)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Everything the frame needs besides the page body.
pub struct PageShell<'a> {
    pub title: &'a str,
    pub path: &'a str,
    pub pending_alerts: usize,
    pub styles: &'a StyleRegistry,
    pub session: Option<SessionId>,
    /// Extra head content (scripts, stylesheets) for this page.
    pub head: Option<Markup>,
}

pub fn page(shell: &PageShell<'_>, body: Markup) -> Markup {
    // ---
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (shell.title) " · Monitoring System" }
                style { (PreEscaped(BASE_CSS)) }
                @for (id, css) in shell.styles.active() {
                    style data-style-id=(id) { (PreEscaped(css)) }
                }
                @if let Some(head) = &shell.head {
                    (head)
                }
            }
            body data-session=[shell.session.map(|id| id.to_string())] {
                (nav_bar(shell.pending_alerts))
                div.frame {
                    (sidebar(shell.path))
                    main.content { (body) }
                }
                @if let Some(id) = shell.session {
                    (session_script(id))
                }
            }
        }
    }
}

fn nav_bar(pending_alerts: usize) -> Markup {
    // ---
    html! {
        header.nav {
            a.brand href="/dashboard" {
                span.logo { "◈" }
                span { "Monitoring System" }
            }
            div.nav-actions {
                a.bell href="/alerts" title="Alerts" {
                    "🔔"
                    @if pending_alerts > 0 {
                        span.bell-count { (pending_alerts) }
                    }
                }
            }
        }
    }
}

fn sidebar(path: &str) -> Markup {
    // ---
    html! {
        nav.sidebar {
            div.sidebar-links {
                @for (href, title, icon) in ROUTES {
                    a.sidebar-link.active[is_active(path, href)] href=(href) {
                        span.sidebar-icon { (icon) }
                        (title)
                    }
                }
            }
            div.sidebar-footer {
                p.strong { "Irrigation Department" }
                p.muted { "Sensor Management System" }
                p.version { "v" (env!("CARGO_PKG_VERSION")) }
            }
        }
    }
}

/// Attach to the page session; unmount it when the page goes away.
fn session_script(id: SessionId) -> Markup {
    // ---
    let script = format!(
        r#"(() => {{
  const id = "{id}";
  const events = new EventSource(`/sessions/${{id}}/events`);
  events.onmessage = (msg) => {{
    const frame = JSON.parse(msg.data);
    document.querySelectorAll("[data-clock]").forEach((el) => {{ el.textContent = frame.clock; }});
    document.querySelectorAll("[data-animate]").forEach((el) => {{
      el.classList.toggle("highlight", frame.highlight);
    }});
  }};
  events.onerror = () => events.close();
  window.addEventListener("pagehide", () => {{
    events.close();
    navigator.sendBeacon(`/sessions/${{id}}/unmount`);
  }});
}})();"#
    );
    html! { script { (PreEscaped(script)) } }
}

const BASE_CSS: &str = r#"
*{box-sizing:border-box}
body{margin:0;font-family:system-ui,-apple-system,"Segoe UI",sans-serif;background:#f8fafc;color:#0f172a}
a{color:inherit;text-decoration:none}
.nav{position:fixed;top:0;left:0;right:0;height:64px;display:flex;align-items:center;justify-content:space-between;padding:0 16px;background:rgba(255,255,255,.95);border-bottom:1px solid #e2e8f0;z-index:50}
.brand{display:flex;align-items:center;gap:8px;font-weight:700;color:#2563eb}
.logo{display:inline-flex;align-items:center;justify-content:center;width:36px;height:36px;border-radius:50%;background:rgba(37,99,235,.1)}
.bell{position:relative;font-size:20px;padding:6px}
.bell-count{position:absolute;top:-4px;right:-6px;min-width:20px;height:20px;border-radius:10px;background:#2563eb;color:#fff;font-size:11px;display:flex;align-items:center;justify-content:center}
.frame{display:flex;margin-top:64px}
.sidebar{position:fixed;top:64px;left:0;width:240px;height:calc(100vh - 64px);display:flex;flex-direction:column;border-right:1px solid #e2e8f0;background:rgba(255,255,255,.6)}
.sidebar-links{padding:16px 6px;display:flex;flex-direction:column;gap:6px}
.sidebar-link{padding:8px 12px;border-radius:6px;color:#64748b}
.sidebar-link:hover{background:rgba(37,99,235,.05);color:#0f172a}
.sidebar-link.active{background:rgba(37,99,235,.1);color:#2563eb;font-weight:500}
.sidebar-icon{display:inline-block;width:22px}
.sidebar-footer{margin:auto 20px 24px;padding:16px;border:1px solid #e2e8f0;border-radius:8px;font-size:12px;background:#fff}
.sidebar-footer p{margin:0 0 6px}
.content{flex:1;margin-left:240px;padding:12px 16px;max-width:1600px}
.muted{color:#64748b}.strong{font-weight:600}.version{font-size:11px;color:#94a3b8}
.page-head{display:flex;align-items:center;justify-content:space-between;gap:12px}
.page-head h1{font-size:28px;margin:8px 0}
.clock{font-variant-numeric:tabular-nums;color:#64748b}
.button{display:inline-flex;align-items:center;gap:6px;padding:8px 20px;border:2px solid #2563eb;border-radius:8px;background:#2563eb;color:#fff;font-weight:600}
.button:hover{background:#fff;color:#2563eb}
.button.outline{background:#fff;color:#2563eb}
.tabs{display:inline-grid;grid-template-columns:1fr 1fr;gap:4px;padding:4px;margin:12px 0;background:#e2e8f0;border-radius:8px;min-width:320px}
.tab{padding:6px 12px;text-align:center;border-radius:6px;font-size:14px}
.tab.active{background:#fff;font-weight:600}
.grid{display:grid;gap:16px;margin-bottom:16px}
.grid-4{grid-template-columns:repeat(auto-fit,minmax(220px,1fr))}
.grid-2{grid-template-columns:repeat(auto-fit,minmax(420px,1fr))}
.grid-main{grid-template-columns:2fr 1fr}
.span-2{grid-column:1/-1}
.card{background:#fff;border:1px solid #e2e8f0;border-radius:12px;box-shadow:0 1px 2px rgba(0,0,0,.05);overflow:hidden}
.card-head{padding:16px 16px 8px;background:linear-gradient(90deg,rgba(37,99,235,.05),transparent)}
.card-head h2{font-size:16px;margin:0}.card-head p{font-size:12px;margin:4px 0 0;color:#64748b}
.card-body{padding:16px}
.panel{border-radius:12px;padding:16px;border:1px solid #e2e8f0}
.panel h3{font-size:14px;margin:0 0 12px}
.stat-card{padding:14px 16px}
.stat-top{display:flex;justify-content:space-between;align-items:flex-start}
.stat-title{font-size:14px;color:#64748b;font-weight:500}
.stat-icon{display:flex;align-items:center;justify-content:center;width:36px;height:36px;border-radius:50%}
.stat-value{font-size:24px;font-weight:700;transition:transform .3s}
.stat-value.highlight{transform:scale(1.08)}
.stat-unit{margin-left:4px;font-size:14px;color:#64748b}
.stat-secondary{font-size:14px;margin-top:4px}
.stat-foot{display:flex;align-items:center;margin-top:10px;padding-top:6px;border-top:1px solid rgba(226,232,240,.5);font-size:12px}
.trend{margin-left:auto;font-weight:500}.trend.up{color:#059669}.trend.down{color:#dc2626}
.chart-head{display:flex;justify-content:space-between;align-items:center;font-size:12px;margin-bottom:8px}
.chart-stat{display:inline-flex;align-items:center;gap:6px;margin-left:12px}
.dot{display:inline-block;width:8px;height:8px;border-radius:50%}
.chart svg{display:block;width:100%;height:100%}
.alerts-panel .row{display:flex;justify-content:space-between;align-items:center;padding:8px 16px;border-top:1px solid rgba(251,191,36,.3)}
.alert-item{padding:8px 16px;border-top:1px solid rgba(251,191,36,.3)}
.alert-item .station{font-size:14px;font-weight:500;max-width:180px;overflow:hidden;text-overflow:ellipsis;white-space:nowrap}
.alert-item .message{font-size:12px;color:#64748b}
.badge{display:inline-flex;align-items:center;gap:6px;padding:2px 10px;border-radius:999px;font-size:12px;font-weight:500;border:1px solid transparent}
.badge-red{background:rgba(239,68,68,.1);color:#dc2626;border-color:#fecaca}
.badge-amber{background:rgba(245,158,11,.1);color:#d97706;border-color:#fde68a}
.badge-blue{background:rgba(59,130,246,.1);color:#2563eb;border-color:#bfdbfe}
.badge-online{background:#22c55e;color:#fff}.badge-warning{background:#f59e0b;color:#fff}
.badge-offline{background:#ef4444;color:#fff}.badge-critical{background:#b91c1c;color:#fff}
.badge .pip{width:8px;height:8px;border-radius:50%;background:#fff}
.badge .pip.pulse{animation:pulse 2s infinite}
@keyframes pulse{50%{opacity:.4}}
table.data{width:100%;border-collapse:collapse;font-size:14px}
table.data th,table.data td{padding:8px 12px;border-bottom:1px solid #e2e8f0;text-align:left}
table.data th{font-size:12px;color:#64748b;font-weight:500}
#station-map{height:600px;width:100%}
.row-inline{display:flex;justify-content:space-between;align-items:center;gap:8px}
.panel-foot{padding:12px 16px;border-top:1px solid rgba(251,191,36,.3)}.panel-foot .button{width:100%;justify-content:center}
.legend{display:flex;gap:16px;font-size:13px;color:#64748b}
tr.acknowledged td{color:#94a3b8}
.accent-emerald{background:linear-gradient(135deg,rgba(16,185,129,.1),rgba(5,150,105,.05));border-color:rgba(16,185,129,.2)}
.accent-orange{background:linear-gradient(135deg,rgba(249,115,22,.1),rgba(234,88,12,.05));border-color:rgba(249,115,22,.2)}
.accent-green{background:linear-gradient(135deg,rgba(34,197,94,.1),rgba(22,163,74,.05));border-color:rgba(34,197,94,.2)}
.accent-blue{background:linear-gradient(135deg,rgba(59,130,246,.1),rgba(37,99,235,.05));border-color:rgba(59,130,246,.2)}
.accent-cyan{background:linear-gradient(135deg,rgba(6,182,212,.1),rgba(8,145,178,.05));border-color:rgba(6,182,212,.2)}
.accent-violet{background:linear-gradient(135deg,rgba(139,92,246,.1),rgba(124,58,237,.05));border-color:rgba(139,92,246,.2)}
.accent-red{background:linear-gradient(135deg,rgba(239,68,68,.1),rgba(220,38,38,.05));border-color:rgba(239,68,68,.2)}
.accent-indigo{background:linear-gradient(135deg,rgba(99,102,241,.1),rgba(79,70,229,.05));border-color:rgba(99,102,241,.2)}
.accent-slate{background:linear-gradient(135deg,rgba(100,116,139,.1),rgba(71,85,105,.05));border-color:rgba(100,116,139,.2)}
.accent-amber{background:linear-gradient(135deg,rgba(245,158,11,.1),rgba(217,119,6,.05));border-color:rgba(245,158,11,.2)}
.marker-pulse{animation:pulse 2s infinite}
"#;
