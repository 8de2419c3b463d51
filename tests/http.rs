use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
struct Points {
    lifetime_points: i64,
    spendable_points: i64,
    streak_days: u32,
}

#[derive(Debug, Deserialize)]
struct RedeemResponse {
    success: bool,
    points: Points,
}

struct TestServer {
    base_url: String,
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

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("habit_ledger_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/points")).send().await {
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

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_habit_ledger"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

async fn get_points(client: &Client, base_url: &str) -> Points {
    client
        .get(format!("{base_url}/api/points"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn log_full_day(client: &Client, base_url: &str) -> Points {
    let mut log: Value = client
        .get(format!("{base_url}/api/logs/{}", today()))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    for habit in log["habits"].as_array_mut().expect("habits array") {
        habit["done"] = Value::Bool(true);
    }

    let response = client
        .put(format!("{base_url}/api/logs"))
        .json(&log)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    response.json().await.unwrap()
}

async fn redeem(client: &Client, base_url: &str, cost: i64) -> RedeemResponse {
    client
        .post(format!("{base_url}/api/redeem"))
        .json(&serde_json::json!({ "cost": cost }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_full_day_scores_and_starts_streak() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let points = log_full_day(&client, &server.base_url).await;
    assert!(points.lifetime_points >= 80);
    assert!(points.streak_days >= 1);

    // logging the same day again must not score it twice
    let again = log_full_day(&client, &server.base_url).await;
    assert_eq!(again, points);

    let progress: Value = client
        .get(format!("{}/api/progress", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(progress["last_7_days"][6]["date"], Value::String(today()));
    assert_eq!(progress["last_7_days"][6]["points"], 80);
}

#[tokio::test]
async fn http_redeem_checks_balance() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = log_full_day(&client, &server.base_url).await;

    let denied = redeem(&client, &server.base_url, before.spendable_points + 1).await;
    assert!(!denied.success);
    assert_eq!(denied.points, before);

    let granted = redeem(&client, &server.base_url, 10).await;
    assert!(granted.success);
    assert_eq!(granted.points.spendable_points, before.spendable_points - 10);
    assert_eq!(granted.points.lifetime_points, before.lifetime_points);

    // recomputing after an edit keeps the spend
    let after = log_full_day(&client, &server.base_url).await;
    assert_eq!(after.spendable_points, before.spendable_points - 10);
    assert_eq!(get_points(&client, &server.base_url).await, after);
}

#[tokio::test]
async fn http_reset_protocol_awards_bonus() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = get_points(&client, &server.base_url).await;
    let started = client
        .post(format!("{}/api/reset/start", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(started.status().is_success());

    let mut last: Value = Value::Null;
    for _ in 0..3 {
        last = client
            .post(format!("{}/api/reset/complete", server.base_url))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
    }

    assert_eq!(last["outcome"]["kind"], "completed");
    assert_eq!(last["protocol"]["is_active"], false);
    let after = get_points(&client, &server.base_url).await;
    assert_eq!(after.lifetime_points, before.lifetime_points + 20);
    assert_eq!(after.spendable_points, before.spendable_points + 20);

    let idle = client
        .post(format!("{}/api/reset/complete", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(idle.status().as_u16(), 400);
}

#[tokio::test]
async fn http_rejects_bad_input() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let bad_date = client
        .get(format!("{}/api/logs/2026-99-99", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_date.status().as_u16(), 400);

    let unknown_reward = client
        .post(format!("{}/api/rewards/999/redeem", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown_reward.status().as_u16(), 404);
}
