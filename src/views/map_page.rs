//! Station map page: Leaflet assets plus the serialized [`MapView`].

use anyhow::Result;
use maud::{html, Markup, PreEscaped};

use crate::views::map::MapView;

// ---

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

/// Head fragment loading Leaflet.
pub fn map_head() -> Markup {
    // ---
    html! {
        link rel="stylesheet" href=(LEAFLET_CSS);
        script src=(LEAFLET_JS) {}
    }
}

/// JSON for an inline `<script>`; `</` is escaped so popup markup cannot
/// close the script element early.
pub fn embed_json(view: &MapView) -> Result<String> {
    // ---
    Ok(serde_json::to_string(view)?.replace("</", "<\\/"))
}

const DRAW_SCRIPT: &str = r##"
(() => {
  const view = JSON.parse(document.getElementById("map-data").textContent);
  const map = L.map("station-map").setView([view.center.lat, view.center.lng], view.zoom);
  L.tileLayer("https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png", {
    attribution: "&copy; OpenStreetMap contributors",
  }).addTo(map);
  for (const line of view.lines) {
    L.polyline([[line.from.lat, line.from.lng], [line.to.lat, line.to.lng]], {
      color: line.color, weight: 2, opacity: 0.7, dashArray: line.dash_array,
    }).addTo(map);
  }
  for (const m of view.markers) {
    const at = [m.position.lat, m.position.lng];
    if (m.pulse) {
      L.circleMarker(at, { radius: 16, color: m.pulse, weight: 2, fillOpacity: 0.15, className: "marker-pulse" }).addTo(map);
    }
    L.circleMarker(at, { radius: 9, color: "#fff", weight: 2, fillColor: m.color, fillOpacity: 1 })
      .bindPopup(m.popup_html, { maxWidth: 350 })
      .addTo(map);
  }
})();
"##;

/// Page body: legend, map container and drawing script.
pub fn map_page(view: &MapView) -> Result<Markup> {
    // ---
    let data = embed_json(view)?;

    Ok(html! {
        div.page-head {
            h1 { "Station Map" }
            div.legend {
                span { span.dot style="background:#f97316" {} " Weather stations" }
                span { span.dot style="background:#3b82f6" {} " Water stations" }
            }
        }
        div.card {
            div #station-map {}
        }
        script #map-data type="application/json" { (PreEscaped(data)) }
        script { (PreEscaped(DRAW_SCRIPT)) }
    })
}
