use crate::errors::SAVE_FAILED_MESSAGE;

pub fn render_index(today: &str) -> String {
    INDEX_HTML
        .replace("{{TODAY}}", today)
        .replace("{{SAVE_FAILED}}", SAVE_FAILED_MESSAGE)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Habit Calendar</title>
  <style>
    :root {
      --bg: #f5f7fb;
      --ink: #4a5568;
      --muted: #8a94a6;
      --accent: #667eea;
      --ok: #48bb78;
      --accident: #8B4513;
      --failed: #e53e3e;
      --card: #ffffff;
      --shadow: 0 18px 40px rgba(74, 85, 104, 0.14);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(160deg, #eef1fb, var(--bg) 55%);
      color: var(--ink);
      font-family: "Trebuchet MS", "Segoe UI", sans-serif;
      display: grid;
      place-items: start center;
      padding: 32px 16px 48px;
    }

    .app {
      width: min(760px, 100%);
      display: grid;
      gap: 22px;
    }

    header h1 {
      margin: 0;
      font-size: clamp(1.8rem, 4vw, 2.4rem);
    }

    .subtitle {
      margin: 4px 0 0;
      color: var(--muted);
    }

    .legend {
      display: flex;
      flex-wrap: wrap;
      gap: 18px;
      margin-top: 14px;
      font-size: 0.95rem;
    }

    .legend span::before {
      content: "";
      display: inline-block;
      width: 10px;
      height: 10px;
      border-radius: 50%;
      margin-right: 6px;
      background: var(--dot);
    }

    .card {
      background: var(--card);
      border-radius: 22px;
      box-shadow: var(--shadow);
      padding: 22px;
    }

    .month-nav {
      display: flex;
      align-items: center;
      justify-content: space-between;
      margin-bottom: 12px;
    }

    .month-nav h2 {
      margin: 0;
      font-size: 1.1rem;
    }

    .month-nav button {
      border: none;
      background: none;
      color: var(--accent);
      font-size: 1.4rem;
      cursor: pointer;
    }

    .grid {
      display: grid;
      grid-template-columns: repeat(7, 1fr);
      gap: 4px;
      text-align: center;
    }

    .grid .weekday {
      font-size: 0.8rem;
      color: var(--muted);
      padding-bottom: 6px;
    }

    .day {
      min-height: 54px;
      border-radius: 12px;
      border: none;
      background: transparent;
      color: var(--ink);
      font: inherit;
      cursor: pointer;
      display: grid;
      align-content: start;
      justify-items: center;
      gap: 4px;
      padding: 6px 2px;
    }

    .day:hover {
      background: #eef1fb;
    }

    .day.today {
      color: var(--accent);
      font-weight: 600;
    }

    .day.selected {
      background: var(--accent);
      color: #fff;
    }

    .dots {
      display: flex;
      flex-wrap: wrap;
      justify-content: center;
      gap: 2px;
      max-width: 46px;
      font-size: 0.65rem;
    }

    .dot {
      width: 6px;
      height: 6px;
      border-radius: 50%;
    }

    .stats {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
      gap: 14px;
    }

    .stat h3 {
      margin: 0 0 10px;
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: var(--muted);
    }

    .stat .value {
      font-size: 1.8rem;
      font-weight: 600;
    }

    .stat p {
      margin: 6px 0 0;
      color: var(--muted);
    }

    .overlay {
      position: fixed;
      inset: 0;
      background: rgba(26, 32, 44, 0.45);
      display: none;
      place-items: end center;
    }

    .overlay.open {
      display: grid;
    }

    .modal {
      width: min(520px, 100%);
      background: var(--card);
      border-radius: 22px 22px 0 0;
      padding: 22px;
      display: grid;
      gap: 16px;
    }

    .modal-header {
      display: flex;
      justify-content: space-between;
      align-items: center;
    }

    .modal-header h2 {
      margin: 0;
      font-size: 1.15rem;
    }

    .close {
      border: none;
      background: none;
      font-size: 1.6rem;
      cursor: pointer;
      color: var(--muted);
    }

    .stepper {
      display: flex;
      justify-content: space-between;
      align-items: center;
    }

    .stepper .controls {
      display: flex;
      align-items: center;
      gap: 14px;
    }

    .stepper button {
      width: 36px;
      height: 36px;
      border-radius: 50%;
      border: none;
      background: #edf2f7;
      font-size: 1.2rem;
      cursor: pointer;
    }

    .stepper .count {
      min-width: 2ch;
      text-align: center;
      font-size: 1.2rem;
      font-weight: 600;
    }

    select {
      width: 100%;
      padding: 10px;
      border-radius: 12px;
      border: 1px solid #e2e8f0;
      font: inherit;
    }

    .modal-footer {
      display: grid;
      grid-template-columns: 1fr 1fr;
      gap: 12px;
    }

    .modal-footer button {
      padding: 12px;
      border-radius: 14px;
      border: none;
      font: inherit;
      cursor: pointer;
    }

    .cancel {
      background: #edf2f7;
    }

    .save {
      background: var(--accent);
      color: #fff;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Habit Calendar</h1>
      <p class="subtitle">Track your daily habits</p>
      <div class="legend">
        <span style="--dot: var(--ok)">Successful</span>
        <span style="--dot: var(--accident)">Accidents</span>
        <span style="--dot: var(--failed)">Failed attempts</span>
      </div>
    </header>

    <section class="card">
      <div class="month-nav">
        <button type="button" id="prev-month" aria-label="Previous month">&lsaquo;</button>
        <h2 id="month-title"></h2>
        <button type="button" id="next-month" aria-label="Next month">&rsaquo;</button>
      </div>
      <div class="grid" id="calendar"></div>
    </section>

    <section class="stats">
      <div class="card stat">
        <h3>Logged days</h3>
        <div class="value" id="total-days">0</div>
      </div>
      <div class="card stat">
        <h3>Successful</h3>
        <div class="value" id="successful-percentage">0%</div>
        <p id="successful-detail"></p>
      </div>
      <div class="card stat">
        <h3>Accidents</h3>
        <div class="value" id="accident-percentage">0%</div>
        <p id="accident-detail"></p>
      </div>
      <div class="card stat">
        <h3>Failed attempts</h3>
        <div class="value" id="failed-percentage">0%</div>
        <p id="failed-detail"></p>
      </div>
    </section>
  </main>

  <div class="overlay" id="overlay">
    <div class="modal" role="dialog" aria-modal="true">
      <div class="modal-header">
        <h2 id="modal-title"></h2>
        <button type="button" class="close" id="close-modal" aria-label="Close">&times;</button>
      </div>
      <div class="stepper" data-kind="successful">
        <span>Successful</span>
        <div class="controls">
          <button type="button" data-delta="-1">-</button>
          <span class="count">0</span>
          <button type="button" data-delta="1">+</button>
        </div>
      </div>
      <div class="stepper" data-kind="accidents">
        <span>Accidents</span>
        <div class="controls">
          <button type="button" data-delta="-1">-</button>
          <span class="count">0</span>
          <button type="button" data-delta="1">+</button>
        </div>
      </div>
      <div class="stepper" data-kind="failed">
        <span>Failed attempts</span>
        <div class="controls">
          <button type="button" data-delta="-1">-</button>
          <span class="count">0</span>
          <button type="button" data-delta="1">+</button>
        </div>
      </div>
      <label>
        Bristol type
        <select id="bristol">
          <option value="">Not recorded</option>
          <option value="1">1 - Separate hard lumps</option>
          <option value="2">2 - Lumpy and sausage-like</option>
          <option value="3">3 - Sausage with cracks</option>
          <option value="4">4 - Smooth, soft sausage</option>
          <option value="5">5 - Soft blobs</option>
          <option value="6">6 - Mushy, ragged edges</option>
          <option value="7">7 - Entirely liquid</option>
        </select>
      </label>
      <div class="modal-footer">
        <button type="button" class="cancel" id="cancel">Cancel</button>
        <button type="button" class="save" id="save">Save</button>
      </div>
    </div>
  </div>

  <script>
    const TODAY = '{{TODAY}}';
    const MAX_DOTS = 8;
    const WEEKDAYS = ['Sun', 'Mon', 'Tue', 'Wed', 'Thu', 'Fri', 'Sat'];

    const calendarEl = document.getElementById('calendar');
    const monthTitleEl = document.getElementById('month-title');
    const overlayEl = document.getElementById('overlay');
    const modalTitleEl = document.getElementById('modal-title');
    const bristolEl = document.getElementById('bristol');
    const steppers = Array.from(document.querySelectorAll('.stepper'));

    let month = TODAY.slice(0, 7);
    let selected = TODAY;
    let session = null;

    const shiftMonth = (value, delta) => {
      const [year, mon] = value.split('-').map(Number);
      const date = new Date(year, mon - 1 + delta, 1);
      return `${date.getFullYear()}-${String(date.getMonth() + 1).padStart(2, '0')}`;
    };

    const renderCalendar = (data) => {
      monthTitleEl.textContent = data.month;
      calendarEl.innerHTML = WEEKDAYS.map((day) => `<div class="weekday">${day}</div>`).join('');
      data.weeks.flat().forEach((date) => {
        if (!date) {
          calendarEl.insertAdjacentHTML('beforeend', '<div></div>');
          return;
        }
        const mark = data.marks[date] || { dots: [] };
        const shown = mark.dots.slice(0, MAX_DOTS)
          .map((dot) => `<span class="dot" style="background:${dot.color}"></span>`)
          .join('');
        const extra = mark.dots.length > MAX_DOTS ? `<span>+${mark.dots.length - MAX_DOTS}</span>` : '';
        const classes = ['day'];
        if (mark.selected) classes.push('selected');
        if (date === TODAY) classes.push('today');
        calendarEl.insertAdjacentHTML(
          'beforeend',
          `<button type="button" class="${classes.join(' ')}" data-date="${date}">
             <span>${Number(date.slice(8))}</span>
             <span class="dots">${shown}${extra}</span>
           </button>`
        );
      });
    };

    const renderStats = (stats) => {
      document.getElementById('total-days').textContent = stats.total_days;
      document.getElementById('successful-percentage').textContent = `${stats.successful_percentage}%`;
      document.getElementById('accident-percentage').textContent = `${stats.accident_percentage}%`;
      document.getElementById('failed-percentage').textContent = `${stats.failed_percentage}%`;
      document.getElementById('successful-detail').textContent =
        `${stats.total_successful} total, ${stats.avg_successful_per_day.toFixed(1)} per day`;
      document.getElementById('accident-detail').textContent =
        `${stats.total_accidents} total, ${stats.avg_accidents_per_day.toFixed(1)} per day`;
      document.getElementById('failed-detail').textContent =
        `${stats.total_failed} total, ${stats.avg_failed_per_day.toFixed(1)} per day`;
    };

    const loadCalendar = async () => {
      const res = await fetch(`/api/calendar?month=${month}&selected=${selected}`);
      if (!res.ok) {
        throw new Error('Unable to load calendar');
      }
      renderCalendar(await res.json());
    };

    const loadStats = async () => {
      const res = await fetch('/api/stats');
      if (!res.ok) {
        throw new Error('Unable to load statistics');
      }
      renderStats(await res.json());
    };

    const renderSession = () => {
      steppers.forEach((row) => {
        row.querySelector('.count').textContent = session.counts[row.dataset.kind];
      });
      bristolEl.value = session.bristol_type ? String(session.bristol_type) : '';
    };

    const openSession = async (date) => {
      selected = date;
      const res = await fetch(`/api/days/${date}`);
      if (!res.ok) {
        throw new Error('Unable to load day');
      }
      const day = await res.json();
      session = {
        date,
        counts: { successful: day.successful, accidents: day.accidents, failed: day.failed },
        bristol_type: day.bristol_type
      };
      modalTitleEl.textContent = `Edit entries for ${date}`;
      renderSession();
      overlayEl.classList.add('open');
      loadCalendar().catch(console.error);
    };

    const closeSession = () => {
      session = null;
      overlayEl.classList.remove('open');
    };

    const putSession = async () => {
      try {
        const res = await fetch(`/api/days/${session.date}`, {
          method: 'PUT',
          headers: { 'content-type': 'application/json' },
          body: JSON.stringify({
            ...session.counts,
            bristol_type: bristolEl.value ? Number(bristolEl.value) : null
          })
        });
        return res.ok;
      } catch (err) {
        console.error(err);
        return false;
      }
    };

    const saveSession = async () => {
      if (!session) return;
      if (!(await putSession())) {
        alert('{{SAVE_FAILED}}');
        return;
      }
      closeSession();
      Promise.all([loadCalendar(), loadStats()]).catch(console.error);
    };

    calendarEl.addEventListener('click', (event) => {
      const button = event.target.closest('.day');
      if (button) {
        openSession(button.dataset.date).catch(console.error);
      }
    });

    steppers.forEach((row) => {
      row.querySelectorAll('button').forEach((button) => {
        button.addEventListener('click', () => {
          const kind = row.dataset.kind;
          session.counts[kind] = Math.max(0, session.counts[kind] + Number(button.dataset.delta));
          renderSession();
        });
      });
    });

    bristolEl.addEventListener('change', () => {
      session.bristol_type = bristolEl.value ? Number(bristolEl.value) : null;
    });

    document.getElementById('prev-month').addEventListener('click', () => {
      month = shiftMonth(month, -1);
      loadCalendar().catch(console.error);
    });
    document.getElementById('next-month').addEventListener('click', () => {
      month = shiftMonth(month, 1);
      loadCalendar().catch(console.error);
    });
    document.getElementById('close-modal').addEventListener('click', closeSession);
    document.getElementById('cancel').addEventListener('click', closeSession);
    document.getElementById('save').addEventListener('click', saveSession);

    Promise.all([loadCalendar(), loadStats()]).catch(console.error);
  </script>
</body>
</html>
"#;
