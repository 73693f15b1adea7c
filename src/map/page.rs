//! Leaflet page served at `/`

use crate::config::EnvMapConfig;

/// Render the map page. Markers, search results and statistics are loaded
/// from the JSON API after the page starts.
pub fn render_page(config: &EnvMapConfig) -> String {
    let (lat, lon) = config.map_center;
    let zoom = config.map_zoom;

    // NOTE: braces are doubled for format!
    format!(r####"<!DOCTYPE html>
<html lang="pl">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Mapa środowiskowa Polski</title>
    <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
    <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
    <style>
        html, body {{ margin: 0; height: 100%; font-family: Arial, sans-serif; }}
        #map {{ position: absolute; inset: 0; }}
        .panel {{ position: absolute; z-index: 1000; background: white; border-radius: 8px; box-shadow: 0 4px 20px rgba(0,0,0,0.15); padding: 10px; font-size: 13px; }}
        #search-panel {{ top: 10px; left: 60px; width: 320px; }}
        #search-panel input {{ width: 100%; box-sizing: border-box; padding: 6px; }}
        #search-results div {{ padding: 4px; cursor: pointer; border-bottom: 1px solid #eee; }}
        #search-results small {{ color: #666; display: block; }}
        #filter-panel {{ top: 10px; right: 10px; width: 220px; }}
        #stats-panel {{ bottom: 20px; right: 10px; width: 420px; max-height: 45%; overflow-y: auto; }}
        #stats-panel table {{ border-collapse: collapse; width: 100%; }}
        #stats-panel td, #stats-panel th {{ text-align: left; padding: 2px 4px; }}
        #status {{ bottom: 20px; left: 10px; display: none; color: #b00020; }}
        .station-popup h4 {{ margin: 0 0 4px; }}
        .station-popup .kind {{ margin: 0 0 6px; color: #666; }}
        .station-popup th {{ text-align: left; padding-right: 8px; }}
    </style>
</head>
<body>
<div id="map"></div>

<div id="search-panel" class="panel">
    <input id="search" type="search" placeholder="Szukaj stacji, rzeki, województwa...">
    <div id="search-results"></div>
</div>

<div id="filter-panel" class="panel">
    <strong>Warstwy</strong>
    <div id="kind-toggles"></div>
    <label><input type="checkbox" id="only-ice"> Tylko ze zjawiskami lodowymi</label><br>
    <label><input type="checkbox" id="only-growth"> Tylko z zarastaniem</label><br>
    <select id="river"><option value="">Wszystkie rzeki</option></select>
    <div id="counts"></div>
</div>

<div id="stats-panel" class="panel">
    <strong>Statystyki</strong>
    <select id="stats-kind"></select>
    <div id="stats-body"></div>
</div>

<div id="status" class="panel">Nie udało się wczytać danych. Spróbuj ponownie później.</div>

<script>
const KINDS = [
    {{ key: 'hydro', label: 'Hydrologiczna', icon: '💧' }},
    {{ key: 'hydro2', label: 'Hydrologiczna 2', icon: '🌊' }},
    {{ key: 'synop', label: 'Synoptyczna', icon: '🌤️' }},
    {{ key: 'meteo', label: 'Meteorologiczna', icon: '🌡️' }},
    {{ key: 'aq', label: 'Jakość powietrza', icon: '🌫️' }},
];

const map = L.map('map').setView([{lat}, {lon}], {zoom});
L.tileLayer('https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{
    attribution: '&copy; OpenStreetMap contributors',
    maxZoom: 19,
}}).addTo(map);

const layer = L.layerGroup().addTo(map);
const filters = {{ show_hydro: true, show_hydro2: true, show_synop: true, show_meteo: true, show_aq: true }};

function showFailure() {{
    document.getElementById('status').style.display = 'block';
}}

async function api(path, options) {{
    const response = await fetch(path, options);
    if (!response.ok) throw new Error(response.status);
    return response.json();
}}

async function loadMarkers() {{
    try {{
        const markers = await api('/api/markers', {{
            method: 'POST',
            headers: {{ 'Content-Type': 'application/json' }},
            body: JSON.stringify(filters),
        }});
        layer.clearLayers();
        const counts = {{}};
        for (const m of markers) {{
            counts[m.kind] = (counts[m.kind] || 0) + 1;
            L.circleMarker([m.lat, m.lon], {{ radius: 7, color: m.color, fillColor: m.color, fillOpacity: 0.8 }})
                .bindTooltip(m.tooltip)
                .bindPopup(m.popup_html)
                .addTo(layer);
        }}
        document.getElementById('counts').textContent =
            KINDS.map(k => `${{k.icon}} ${{counts[k.key] || 0}}`).join('  ');
    }} catch (e) {{
        showFailure();
    }}
}}

async function loadOptions() {{
    try {{
        const options = await api('/api/filters/options');
        const select = document.getElementById('river');
        for (const river of options.rivers) {{
            const option = document.createElement('option');
            option.value = river;
            option.textContent = river;
            select.appendChild(option);
        }}
    }} catch (e) {{
        showFailure();
    }}
}}

async function loadStats() {{
    const kind = document.getElementById('stats-kind').value;
    const body = document.getElementById('stats-body');
    try {{
        const stats = await api(`/api/stats/${{kind}}`);
        body.innerHTML = '';
        for (const s of stats) {{
            const table = document.createElement('table');
            const rows = [
                ['Liczba', s.count],
                ['Min / Maks', `${{s.min}} / ${{s.max}} ${{s.unit}}`],
                ['Średnia', `${{s.mean}} ${{s.unit}}`],
                ['Mediana', `${{s.median}} ${{s.unit}}`],
                ['Odch. std.', s.std_dev],
                ['Q1 / Q3 / IQR', `${{s.q1}} / ${{s.q3}} / ${{s.iqr}}`],
                ['Wsp. zmienności', `${{s.cv}}%`],
                ['Skośność / Kurtoza', `${{s.skewness}} / ${{s.kurtosis}}`],
            ];
            const caption = document.createElement('caption');
            caption.textContent = s.parameter;
            table.appendChild(caption);
            for (const [label, value] of rows) {{
                const tr = table.insertRow();
                tr.insertCell().textContent = label;
                tr.insertCell().textContent = value;
            }}
            const top = s.top_maximum[0];
            if (top) {{
                const tr = table.insertRow();
                tr.insertCell().textContent = 'Najwyższa';
                const cell = tr.insertCell();
                cell.textContent = `${{top.value}} (${{top.station_name}})`;
                cell.style.cursor = 'pointer';
                cell.onclick = () => map.setView([top.lat, top.lon], 12);
            }}
            body.appendChild(table);
        }}
        if (stats.length === 0) body.textContent = 'Brak danych';
    }} catch (e) {{
        showFailure();
    }}
}}

let searchTimer;
document.getElementById('search').addEventListener('input', (event) => {{
    clearTimeout(searchTimer);
    searchTimer = setTimeout(async () => {{
        const list = document.getElementById('search-results');
        try {{
            const results = await api(`/api/search?q=${{encodeURIComponent(event.target.value)}}`);
            list.innerHTML = '';
            for (const r of results) {{
                const item = document.createElement('div');
                item.textContent = r.display_name;
                const detail = document.createElement('small');
                detail.textContent = r.detail;
                item.appendChild(detail);
                item.onclick = () => {{
                    map.setView([r.lat, r.lon], 13);
                    list.innerHTML = '';
                }};
                list.appendChild(item);
            }}
        }} catch (e) {{
            showFailure();
        }}
    }}, 200);
}});

const toggles = document.getElementById('kind-toggles');
const statsKind = document.getElementById('stats-kind');
for (const kind of KINDS) {{
    const label = document.createElement('label');
    const box = document.createElement('input');
    box.type = 'checkbox';
    box.checked = true;
    box.onchange = () => {{ filters[`show_${{kind.key}}`] = box.checked; loadMarkers(); }};
    label.appendChild(box);
    label.append(` ${{kind.icon}} ${{kind.label}}`);
    toggles.appendChild(label);
    toggles.appendChild(document.createElement('br'));

    const option = document.createElement('option');
    option.value = kind.key;
    option.textContent = `${{kind.icon}} ${{kind.label}}`;
    statsKind.appendChild(option);
}}
statsKind.onchange = loadStats;

document.getElementById('only-ice').onchange = (e) => {{ filters.only_with_ice = e.target.checked; loadMarkers(); }};
document.getElementById('only-growth').onchange = (e) => {{ filters.only_with_growth = e.target.checked; loadMarkers(); }};
document.getElementById('river').onchange = (e) => {{ filters.selected_river = e.target.value; loadMarkers(); }};

loadMarkers();
loadOptions();
loadStats();
</script>
</body>
</html>
"####)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_uses_configured_view() {
        let config = EnvMapConfig {
            map_center: (50.0614, 19.9366),
            map_zoom: 9,
            ..Default::default()
        };

        let html = render_page(&config);
        assert!(html.contains("setView([50.0614, 19.9366], 9)"));
        assert!(html.contains("{s}.tile.openstreetmap.org/{z}/{x}/{y}.png"));
        assert!(html.contains("/api/markers"));
    }
}
