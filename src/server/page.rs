//! Dashboard shell. Draws whatever `/api/projection` returns; all filtering happens server side.

pub const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width,initial-scale=1" />
  <title>Travel Buddy</title>
  <style>
    body { font-family: 'Segoe UI', sans-serif; background: #404040; color: #fff; margin: 0; padding-bottom: 12px; }
    header { background: #303030; padding: 10px 24px; box-shadow: 2px 2px 5px #191818; }
    main { max-width: 1100px; margin: 0 auto; padding: 0 16px; }
    .controls { display: flex; gap: 12px; margin: 20px 0; }
    input, select { padding: 8px 14px; border: none; border-radius: 20px; box-shadow: 2px 2px 10px #191818; }
    input { flex: 1; }
    .panel { background: #4a4a4a; border-radius: 5px; padding: 12px; margin: 16px 0; box-shadow: 2px 2px 10px #191818; }
    .legend span { margin-right: 16px; }
    svg { width: 100%; height: 240px; }
    table { border-collapse: collapse; }
    td { padding: 2px 10px; }
  </style>
</head>
<body>
  <header><h1>Travel Buddy</h1></header>
  <main>
    <div class="controls">
      <input id="country" list="countries" placeholder="Enter a country..." />
      <datalist id="countries"></datalist>
      <select id="region"></select>
    </div>
    <div class="panel"><h2>Travel Advisory Information</h2><p id="advisory"></p></div>
    <div id="charts"></div>
    <div class="panel"><h2 id="map-title">Covid cases in the last 7 days per 100000</h2><table id="map"></table></div>
  </main>

  <script>
    const countryEl = document.getElementById('country');
    const regionEl = document.getElementById('region');

    function drawPanel(panel) {
      const div = document.createElement('div');
      div.className = 'panel';
      const h = document.createElement('h2');
      h.textContent = panel.title;
      div.appendChild(h);
      const points = panel.datasets.flatMap(d => d.points).filter(p => p.y !== null);
      const legend = document.createElement('div');
      legend.className = 'legend';
      panel.datasets.forEach(d => {
        const s = document.createElement('span');
        s.style.color = d.color;
        s.textContent = d.label;
        legend.appendChild(s);
      });
      div.appendChild(legend);
      if (points.length === 0) {
        const p = document.createElement('p');
        p.textContent = 'No data';
        div.appendChild(p);
        return div;
      }
      const xs = points.map(p => Date.parse(p.x));
      const minX = Math.min(...xs), maxX = Math.max(...xs);
      const maxY = Math.max(1, ...points.map(p => p.y));
      const svg = document.createElementNS('http://www.w3.org/2000/svg', 'svg');
      svg.setAttribute('viewBox', '0 0 1000 240');
      svg.setAttribute('preserveAspectRatio', 'none');
      panel.datasets.forEach(d => {
        // a null y breaks the line
        let segment = [];
        const flush = () => {
          if (segment.length > 1) {
            const line = document.createElementNS('http://www.w3.org/2000/svg', 'polyline');
            line.setAttribute('points', segment.join(' '));
            line.setAttribute('fill', 'none');
            line.setAttribute('stroke', d.color);
            line.setAttribute('stroke-width', '2');
            svg.appendChild(line);
          }
          segment = [];
        };
        d.points.forEach(p => {
          if (p.y === null) { flush(); return; }
          const x = maxX === minX ? 500 : (Date.parse(p.x) - minX) / (maxX - minX) * 1000;
          const y = 240 - p.y / maxY * 230;
          segment.push(x.toFixed(1) + ',' + y.toFixed(1));
        });
        flush();
      });
      div.appendChild(svg);
      return div;
    }

    function drawMap(map) {
      document.getElementById('map-title').textContent = map.colorbar_title + ' (' + map.scope + ')';
      const rows = map.locations
        .map((name, i) => [name, map.values[i]])
        .filter(r => r[1] !== null)
        .sort((a, b) => b[1] - a[1])
        .slice(0, 15);
      const table = document.getElementById('map');
      table.innerHTML = '';
      rows.forEach(([name, value]) => {
        const tr = table.insertRow();
        tr.insertCell().textContent = name;
        tr.insertCell().textContent = value.toFixed(1);
      });
    }

    async function refresh() {
      const url = '/api/projection?country=' + encodeURIComponent(countryEl.value) +
        '&region=' + encodeURIComponent(regionEl.value);
      const response = await fetch(url);
      if (!response.ok) return;
      const result = await response.json();
      document.getElementById('advisory').textContent = result.advisory_text || '';
      const charts = document.getElementById('charts');
      charts.innerHTML = '';
      [result.case_death_series, result.cumulative_series, result.vaccination_series]
        .filter(Boolean)
        .forEach(panel => charts.appendChild(drawPanel(panel)));
      drawMap(result.map);
    }

    fetch('/api/countries').then(r => r.json()).then(data => {
      const list = document.getElementById('countries');
      data.countries.forEach(c => {
        const o = document.createElement('option');
        o.value = c;
        list.appendChild(o);
      });
      data.regions.forEach(r => {
        const o = document.createElement('option');
        o.value = r;
        o.textContent = r;
        regionEl.appendChild(o);
      });
      regionEl.value = 'world';
      countryEl.value = data.default_country;
      refresh();
    });
    countryEl.addEventListener('input', refresh);
    regionEl.addEventListener('change', refresh);
  </script>
</body>
</html>
"#;
