use crate::daily_values::FACT_UNITS;
use crate::models::{IntakeReport, NutrientGroups, NutrientStatus, SupplementView};
use std::fmt::Write;

pub fn render_index(supplements: &[SupplementView], report: &IntakeReport) -> String {
    INDEX_HTML
        .replace("{{DATE}}", &escape_html(&report.date))
        .replace("{{ACTIVE_COUNT}}", &report.active_count.to_string())
        .replace("{{SUFFICIENT}}", &render_groups(&report.sufficient))
        .replace("{{INSUFFICIENT}}", &render_groups(&report.insufficient))
        .replace("{{UNTRACKED}}", &render_untracked(report))
        .replace("{{SUPPLEMENTS}}", &render_supplements(supplements))
}

fn render_supplements(supplements: &[SupplementView]) -> String {
    if supplements.is_empty() {
        return r#"<p class="muted">You haven't added any supplements yet.</p>"#.to_string();
    }

    let mut html = String::new();
    for view in supplements {
        let supplement = &view.supplement;
        let id = escape_html(&supplement.id);
        let serving = match (supplement.serving_size, supplement.serving_unit.as_deref()) {
            (Some(size), Some(unit)) => format!("{} {}", format_amount(size), escape_html(unit)),
            (Some(size), None) => format_amount(size),
            _ => String::new(),
        };
        let search_text = std::iter::once(supplement.name.as_str())
            .chain(supplement.nutrition_facts.iter().map(|fact| fact.name.as_str()))
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        let _ = write!(
            html,
            r#"<article class="card" data-id="{id}" data-search="{search}">
  <header>
    <label class="toggle"><input type="checkbox" data-action="toggle"{checked} /> <strong>{name}</strong></label>
    <span class="muted">{serving}</span>
    <button type="button" class="ghost" data-action="delete">Remove</button>
  </header>
  <table class="facts">"#,
            search = escape_html(&search_text),
            checked = if view.active { " checked" } else { "" },
            name = escape_html(&supplement.name),
        );

        for fact in &supplement.nutrition_facts {
            let amount = fact
                .amount
                .value()
                .map(format_amount)
                .unwrap_or_default();
            let _ = write!(
                html,
                r#"
    <tr data-fact="{fact_id}">
      <td><input list="nutrients" data-field="name" value="{name}" placeholder="e.g. Vitamin C" /></td>
      <td><input type="number" min="0" step="any" data-field="amount" value="{amount}" placeholder="Amount" /></td>
      <td><select data-field="unit">{units}</select></td>
      <td><button type="button" class="ghost" data-action="delete-fact">&times;</button></td>
    </tr>"#,
                fact_id = escape_html(&fact.id),
                name = escape_html(&fact.name),
                units = unit_options(&fact.unit),
            );
        }

        html.push_str(
            r#"
  </table>
  <button type="button" data-action="add-fact">Add Nutrition Fact</button>
</article>
"#,
        );
    }
    html
}

fn unit_options(selected: &str) -> String {
    let mut html = String::new();
    if !FACT_UNITS.contains(&selected) {
        let unit = escape_html(selected);
        let _ = write!(html, r#"<option value="{unit}" selected>{unit}</option>"#);
    }
    for unit in FACT_UNITS {
        let marker = if *unit == selected { " selected" } else { "" };
        let _ = write!(html, r#"<option value="{unit}"{marker}>{unit}</option>"#);
    }
    html
}

fn render_groups(groups: &NutrientGroups) -> String {
    let mut html = String::new();
    for (title, rows) in [("Vitamins", &groups.vitamins), ("Minerals", &groups.minerals)] {
        if rows.is_empty() {
            continue;
        }
        let _ = write!(
            html,
            "<h3>{title}</h3><table class=\"intake\"><thead><tr><th>Nutrient</th><th>Intake</th><th>Daily value</th><th>%</th></tr></thead><tbody>"
        );
        for status in rows.iter() {
            html.push_str(&render_status(status));
        }
        html.push_str("</tbody></table>");
    }
    if html.is_empty() {
        html.push_str(r#"<p class="muted">Nothing here yet.</p>"#);
    }
    html
}

fn render_status(status: &NutrientStatus) -> String {
    let intake_unit = status
        .intake_unit
        .as_deref()
        .unwrap_or(&status.daily_value_unit);
    format!(
        r#"<tr class="{class}"><td>{name}</td><td>{intake} {intake_unit}</td><td>{dv} {dv_unit}</td><td><div class="bar"><span style="width: {width}%"></span></div>{percentage}%</td></tr>"#,
        class = if status.meets_dv { "ok" } else { "low" },
        name = escape_html(&status.name),
        intake = format_amount(status.intake),
        intake_unit = escape_html(intake_unit),
        dv = format_amount(status.daily_value),
        dv_unit = escape_html(&status.daily_value_unit),
        width = status.percentage.min(100),
        percentage = status.percentage,
    )
}

fn render_untracked(report: &IntakeReport) -> String {
    if report.untracked.is_empty() {
        return String::new();
    }
    let mut html = String::from("<h3>Other nutrients</h3><ul class=\"untracked\">");
    for nutrient in &report.untracked {
        let _ = write!(
            html,
            "<li>{} &middot; {} {}</li>",
            escape_html(&nutrient.name),
            format_amount(nutrient.amount),
            escape_html(&nutrient.unit)
        );
    }
    html.push_str("</ul>");
    html
}

fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        let text = format!("{value:.2}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            _ => out.push(ch),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Supplement Tracker</title>
  <style>
    :root {
      --bg: #f5f0e8;
      --ink: #2b2a28;
      --muted: #6f6b64;
      --accent: #2f7d5b;
      --warn: #c8553d;
      --card: rgba(255, 255, 255, 0.9);
      --shadow: 0 18px 40px rgba(43, 42, 40, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      padding: 24px 18px 48px;
    }

    h1 {
      margin: 0 0 4px;
      font-family: Georgia, serif;
    }

    main {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(340px, 1fr));
      gap: 24px;
      margin-top: 20px;
    }

    section {
      background: var(--card);
      border-radius: 20px;
      box-shadow: var(--shadow);
      padding: 22px;
    }

    .card {
      border: 1px solid #e4ddd1;
      border-radius: 14px;
      padding: 12px;
      margin-bottom: 12px;
    }

    .card header {
      display: flex;
      align-items: center;
      gap: 10px;
      justify-content: space-between;
    }

    .muted {
      color: var(--muted);
    }

    table {
      width: 100%;
      border-collapse: collapse;
      margin: 8px 0;
    }

    td, th {
      text-align: left;
      padding: 4px 6px;
    }

    input, select, button {
      font: inherit;
      padding: 6px 8px;
      border-radius: 8px;
      border: 1px solid #d8d0c2;
    }

    button {
      background: var(--accent);
      color: #fff;
      border: none;
      cursor: pointer;
    }

    button.ghost {
      background: transparent;
      color: var(--muted);
    }

    .bar {
      display: inline-block;
      width: 70px;
      height: 8px;
      background: #ece5d8;
      border-radius: 4px;
      margin-right: 6px;
    }

    .bar span {
      display: block;
      height: 100%;
      border-radius: 4px;
      background: var(--accent);
    }

    tr.low .bar span {
      background: var(--warn);
    }

    .status {
      min-height: 1.4em;
      font-weight: 600;
    }

    .status.error {
      color: var(--warn);
    }

    .status.ok {
      color: var(--accent);
    }
  </style>
</head>
<body>
  <h1>Supplement Tracker</h1>
  <p class="muted">Today: {{DATE}} &middot; {{ACTIVE_COUNT}} active</p>
  <p class="status" id="status"></p>

  <main>
    <section>
      <h2>Supplements</h2>
      <form id="add-form">
        <input name="name" placeholder="Supplement name" required />
        <input name="serving_size" type="number" min="0" step="any" placeholder="Serving" />
        <input name="serving_unit" placeholder="Unit" />
        <button type="submit">Add Supplement</button>
      </form>
      <p><input id="search" placeholder="Search by name or nutrition fact..." /></p>
      <div id="supplements">{{SUPPLEMENTS}}</div>
    </section>

    <section>
      <h2>Insufficient</h2>
      {{INSUFFICIENT}}
    </section>

    <section>
      <h2>Sufficient</h2>
      {{SUFFICIENT}}
      {{UNTRACKED}}
    </section>
  </main>

  <datalist id="nutrients"></datalist>

  <script>
    const statusEl = document.getElementById('status');

    const setStatus = (message, tone) => {
      statusEl.textContent = message;
      statusEl.className = `status ${tone || ''}`;
    };

    const api = async (method, url, body) => {
      const res = await fetch(url, {
        method,
        headers: { 'content-type': 'application/json' },
        body: body === undefined ? undefined : JSON.stringify(body)
      });
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Request failed');
      }
      return res.status === 204 ? null : res.json();
    };

    const run = (promise, message) => {
      promise
        .then(() => {
          setStatus(message, 'ok');
          setTimeout(() => window.location.reload(), 400);
        })
        .catch((err) => setStatus(err.message, 'error'));
    };

    fetch('/api/daily-values')
      .then((res) => res.json())
      .then((values) => {
        const list = document.getElementById('nutrients');
        values.forEach((value) => {
          const option = document.createElement('option');
          option.value = value.name;
          list.appendChild(option);
        });
      })
      .catch(() => {});

    document.getElementById('add-form').addEventListener('submit', (event) => {
      event.preventDefault();
      const form = new FormData(event.target);
      const size = form.get('serving_size');
      const body = {
        name: form.get('name'),
        serving_size: size ? Number(size) : null,
        serving_unit: form.get('serving_unit') || null
      };
      run(api('POST', '/api/supplements', body), `${body.name} added to your list!`);
    });

    document.getElementById('search').addEventListener('input', (event) => {
      const term = event.target.value.trim().toLowerCase();
      document.querySelectorAll('.card').forEach((card) => {
        card.hidden = term !== '' && !card.dataset.search.includes(term);
      });
    });

    const container = document.getElementById('supplements');

    container.addEventListener('click', (event) => {
      const action = event.target.dataset.action;
      const card = event.target.closest('.card');
      if (!action || !card || action === 'toggle') {
        return;
      }
      const base = `/api/supplements/${card.dataset.id}`;
      if (action === 'delete') {
        run(api('DELETE', base), 'Supplement removed');
      } else if (action === 'add-fact') {
        run(api('POST', `${base}/facts`, {}), 'Nutrition fact added');
      } else if (action === 'delete-fact') {
        const row = event.target.closest('tr');
        run(api('DELETE', `${base}/facts/${row.dataset.fact}`), 'Nutrition fact removed');
      }
    });

    container.addEventListener('change', (event) => {
      const card = event.target.closest('.card');
      if (!card) {
        return;
      }
      const base = `/api/supplements/${card.dataset.id}`;
      if (event.target.dataset.action === 'toggle') {
        run(api('PUT', `${base}/active`, { active: event.target.checked }), 'Saved');
        return;
      }
      const field = event.target.dataset.field;
      const row = event.target.closest('tr');
      if (field && row) {
        run(api('PATCH', `${base}/facts/${row.dataset.fact}`, { [field]: event.target.value }), 'Saved');
      }
    });
  </script>
</body>
</html>
"#;
