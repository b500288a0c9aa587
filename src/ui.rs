// src/ui.rs
use crate::hitlog::HitRecord;

pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>Stock Target Monitor</title>
<style>
    body { font-family: Arial, Helvetica, sans-serif; margin: 0; background: #f4f6f8; color: #222; }
    .header { display: flex; align-items: center; gap: 12px; padding: 14px 24px; background: #1f3a5f; color: #fff; }
    .header h1 { font-size: 20px; margin: 0; flex: 1; }
    .header button { padding: 6px 14px; border: none; border-radius: 4px; background: #3d6db5; color: #fff; cursor: pointer; }
    .header button:hover { background: #4f82d0; }
    #updated { font-size: 12px; color: #cfd8e3; }
    section { margin: 18px 24px; background: #fff; border-radius: 6px; box-shadow: 0 1px 3px rgba(0,0,0,0.15); overflow: hidden; }
    .sheet-header { display: flex; align-items: center; padding: 10px 16px; background: #e8eef5; }
    .sheet-header h2 { font-size: 16px; margin: 0; flex: 1; }
    .sheet-header button { padding: 4px 12px; border: 1px solid #3d6db5; border-radius: 4px; background: #fff; color: #3d6db5; cursor: pointer; }
    table { width: 100%; border-collapse: collapse; }
    th, td { padding: 8px 16px; text-align: left; border-top: 1px solid #e3e7ec; font-size: 14px; }
    th { background: #fafbfc; font-weight: 600; }
    tr.target-hit td { background: #d4edda; font-weight: 600; }
    .empty { padding: 12px 16px; color: #888; font-size: 14px; }
</style>
</head>
<body>
<div class="header">
    <h1>Stock Target Monitor</h1>
    <span id="updated"></span>
    <button onclick="refreshAll()">Refresh All</button>
    <button onclick="reloadData()">Reload Watchlists</button>
    <button onclick="viewLog()">View Log</button>
</div>
<div id="sheets"></div>
<script>
let loadSeq = 0;

function esc(value) {
    return String(value)
        .replace(/&/g, '&amp;')
        .replace(/</g, '&lt;')
        .replace(/>/g, '&gt;')
        .replace(/"/g, '&quot;');
}

function priceCell(price) {
    return price > 0 ? '₹' + price.toFixed(2) : 'Not Available';
}

function render(data) {
    const sections = Object.keys(data).map(sheet => {
        const stocks = data[sheet];
        const body = stocks.length === 0
            ? '<div class="empty">No stocks in this sheet.</div>'
            : '<table><thead><tr>' +
              '<th>Scrip Name</th><th>Target Price</th><th>Current Price</th><th>Status</th>' +
              '</tr></thead><tbody>' +
              stocks.map(stock => {
                  const hit = stock['Status'] === 'Target Hit!';
                  return '<tr' + (hit ? ' class="target-hit"' : '') + '>' +
                      '<td>' + esc(stock['Scrip Name']) + '</td>' +
                      '<td>₹' + stock['Target Price'].toFixed(2) + '</td>' +
                      '<td>' + priceCell(stock['Current Price']) + '</td>' +
                      '<td>' + esc(stock['Status']) + '</td>' +
                      '</tr>';
              }).join('') +
              '</tbody></table>';
        return '<section>' +
            '<div class="sheet-header"><h2>' + esc(sheet) + '</h2>' +
            '<button data-sheet="' + esc(sheet) + '">Refresh</button></div>' +
            body + '</section>';
    });
    document.getElementById('sheets').innerHTML = sections.join('');
    document.getElementById('updated').textContent =
        'Updated ' + new Date().toLocaleTimeString();
}

async function loadData() {
    const seq = ++loadSeq;
    const res = await fetch('/data');
    const data = await res.json();
    if (seq !== loadSeq) return;
    render(data);
}

async function refreshAll() {
    await fetch('/refresh');
    await loadData();
}

async function refreshSheet(sheet) {
    await fetch('/refresh?sheet=' + encodeURIComponent(sheet));
    await loadData();
}

async function reloadData() {
    await fetch('/reload');
    await loadData();
}

function viewLog() {
    window.open('/log', '_blank');
}

document.getElementById('sheets').addEventListener('click', e => {
    if (e.target.dataset && e.target.dataset.sheet) {
        refreshSheet(e.target.dataset.sheet);
    }
});

loadData();
setInterval(loadData, 60000);
</script>
</body>
</html>
"##;

/// Renders the hit log as a standalone read-only page.
pub fn log_page(records: &[HitRecord]) -> String {
    let rows: String = records
        .iter()
        .map(|r| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>₹{:.2}</td><td>₹{:.2}</td><td>{}</td><td>{}</td></tr>\n",
                escape(&r.sheet_name),
                escape(&r.scrip_name),
                r.target_price,
                r.hit_price,
                escape(&r.date),
                escape(&r.time),
            )
        })
        .collect();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>Target Hit Log</title>
<style>
    body {{ font-family: Arial, Helvetica, sans-serif; margin: 24px; color: #222; }}
    table {{ border-collapse: collapse; }}
    th, td {{ padding: 6px 14px; border: 1px solid #ccc; font-size: 14px; text-align: left; }}
    th {{ background: #e8eef5; }}
</style>
</head>
<body>
<h1>Target Hit Log</h1>
<table>
<thead><tr><th>Sheet</th><th>Scrip Name</th><th>Target Price</th><th>Hit Price</th><th>Date</th><th>Time</th></tr></thead>
<tbody>
{}</tbody>
</table>
</body>
</html>
"#,
        rows
    )
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
