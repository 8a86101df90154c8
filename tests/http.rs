use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct EntryBody {
    date: String,
    kind: String,
    #[serde(rename = "bristolType")]
    bristol_type: Option<u8>,
    rating: u8,
}

#[derive(Debug, Deserialize)]
struct DayBody {
    date: String,
    successful: u32,
    accidents: u32,
    failed: u32,
    bristol_type: Option<u8>,
    entries: Vec<EntryBody>,
}

#[derive(Debug, Deserialize)]
struct DotBody {
    color: String,
}

#[derive(Debug, Deserialize)]
struct MarkBody {
    selected: bool,
    marked: bool,
    dots: Vec<DotBody>,
}

#[derive(Debug, Deserialize)]
struct CalendarBody {
    month: String,
    selected: String,
    weeks: Vec<Vec<Option<String>>>,
    marks: BTreeMap<String, MarkBody>,
}

#[derive(Debug, Deserialize)]
struct StatsBody {
    total_days: u64,
    successful_percentage: u64,
    accident_percentage: u64,
    failed_percentage: u64,
    avg_successful_per_day: f64,
}

struct TestServer {
    base_url: String,
    data_dir: PathBuf,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_dir(label: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("habit_calendar_http_{label}_{}_{}", std::process::id(), nanos));
    path
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/stats")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server(data_dir: &Path) -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_habit_calendar"))
        .env("PORT", port.to_string())
        .env("APP_DATA_DIR", data_dir)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer {
        base_url,
        data_dir: data_dir.to_path_buf(),
        child,
    }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server(&unique_data_dir("shared")).await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn put_day(client: &Client, base_url: &str, date: &str, body: serde_json::Value) -> reqwest::Response {
    client
        .put(format!("{base_url}/api/days/{date}"))
        .json(&body)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_bulk_edit_replaces_day() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = put_day(
        &client,
        &server.base_url,
        "2024-01-15",
        serde_json::json!({ "successful": 2, "accidents": 1, "failed": 0, "bristol_type": 4 }),
    )
    .await;
    assert!(response.status().is_success());

    let day: DayBody = client
        .get(format!("{}/api/days/2024-01-15", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(day.date, "2024-01-15");
    assert_eq!((day.successful, day.accidents, day.failed), (2, 1, 0));
    assert_eq!(day.bristol_type, Some(4));
    let kinds: Vec<_> = day.entries.iter().map(|entry| entry.kind.as_str()).collect();
    assert_eq!(kinds, vec!["Normal", "Normal", "Accident"]);
    assert_eq!(day.entries[0].rating, 5);
    assert_eq!(day.entries[2].rating, 1);
    assert!(day.entries.iter().all(|entry| entry.date == "2024-01-15"));
    assert!(day.entries.iter().all(|entry| entry.bristol_type == Some(4)));

    let response = put_day(
        &client,
        &server.base_url,
        "2024-01-15",
        serde_json::json!({ "successful": 0, "accidents": 0, "failed": 1 }),
    )
    .await;
    let day: DayBody = response.json().await.unwrap();
    assert_eq!((day.successful, day.accidents, day.failed), (0, 0, 1));
    assert_eq!(day.bristol_type, None);
    assert_eq!(day.entries.len(), 1);

    let stored = std::fs::read_to_string(server.data_dir.join("habit_entries.json")).unwrap();
    assert!(stored.contains("\"2024-01-15\""));
}

#[tokio::test]
async fn http_calendar_marks_logged_days() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    put_day(
        &client,
        &server.base_url,
        "2023-06-10",
        serde_json::json!({ "successful": 1, "accidents": 0, "failed": 2 }),
    )
    .await;

    let calendar: CalendarBody = client
        .get(format!("{}/api/calendar?month=2023-06&selected=2023-06-01", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(calendar.month, "2023-06");
    assert_eq!(calendar.selected, "2023-06-01");
    assert_eq!(calendar.weeks.iter().flatten().flatten().count(), 30);
    assert!(calendar.marks["2023-06-01"].selected);
    let mark = &calendar.marks["2023-06-10"];
    assert!(mark.marked);
    let colors: Vec<_> = mark.dots.iter().map(|dot| dot.color.as_str()).collect();
    assert_eq!(colors, vec!["#48bb78", "#e53e3e", "#e53e3e"]);
}

#[tokio::test]
async fn http_rejects_invalid_input() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/api/days/2024-13-01", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_day(
        &client,
        &server.base_url,
        "2024-01-16",
        serde_json::json!({ "successful": 1, "accidents": 0, "failed": 0, "bristol_type": 9 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_day(
        &client,
        &server.base_url,
        "2024-01-16",
        serde_json::json!({ "successful": -1, "accidents": 0, "failed": 0 }),
    )
    .await;
    assert!(response.status().is_client_error());

    let response = put_day(
        &client,
        &server.base_url,
        "2024-01-16",
        serde_json::json!({ "successful": 4294967295u32, "accidents": 0, "failed": 0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_day(
        &client,
        &server.base_url,
        "2024-01-16",
        serde_json::json!({ "successful": 5000, "accidents": 5000, "failed": 1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let day: DayBody = client
        .get(format!("{}/api/days/2024-01-16", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(day.entries.is_empty());

    let response = client
        .get(format!("{}/api/calendar?month=2024-1", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_statistics_survive_restart() {
    let data_dir = unique_data_dir("restart");
    let client = Client::new();

    {
        let server = spawn_server(&data_dir).await;
        let stats: StatsBody = client
            .get(format!("{}/api/stats", server.base_url))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(stats.total_days, 0);
        assert_eq!(stats.successful_percentage, 0);

        put_day(
            &client,
            &server.base_url,
            "2024-02-01",
            serde_json::json!({ "successful": 1, "accidents": 0, "failed": 0 }),
        )
        .await;
        put_day(
            &client,
            &server.base_url,
            "2024-02-02",
            serde_json::json!({ "successful": 0, "accidents": 1, "failed": 0 }),
        )
        .await;
    }

    let server = spawn_server(&data_dir).await;
    let stats: StatsBody = client
        .get(format!("{}/api/stats", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(stats.total_days, 2);
    assert_eq!(stats.successful_percentage, 50);
    assert_eq!(stats.accident_percentage, 50);
    assert_eq!(stats.failed_percentage, 0);
    assert_eq!(stats.avg_successful_per_day, 0.5);

    drop(server);
    let _ = std::fs::remove_dir_all(data_dir);
}

#[tokio::test]
async fn http_failed_save_reports_once_and_keeps_state() {
    let data_dir = unique_data_dir("blocked");
    // A directory where the snapshot file should be makes every write fail.
    std::fs::create_dir_all(data_dir.join("habit_entries.json")).unwrap();
    let server = spawn_server(&data_dir).await;
    let client = Client::new();

    let response = put_day(
        &client,
        &server.base_url,
        "2024-03-01",
        serde_json::json!({ "successful": 3, "accidents": 0, "failed": 0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text().await.unwrap(), "Failed to save entries");

    let day: DayBody = client
        .get(format!("{}/api/days/2024-03-01", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!((day.successful, day.accidents, day.failed), (0, 0, 0));
    assert!(day.entries.is_empty());

    let stats: StatsBody = client
        .get(format!("{}/api/stats", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats.total_days, 0);

    drop(server);
    let _ = std::fs::remove_dir_all(data_dir);
}
