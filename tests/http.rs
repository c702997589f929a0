use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct SupplementResponse {
    id: String,
    name: String,
    active: bool,
    nutrition_facts: Vec<FactResponse>,
}

#[derive(Debug, Deserialize)]
struct FactResponse {
    id: String,
    name: String,
    amount: Value,
    unit: String,
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
    use std::sync::Once;
    use std::sync::atomic::{AtomicI32, Ordering};

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

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/intake")).send().await {
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
    let child = Command::new(env!("CARGO_BIN_EXE_supplement_tracker"))
        .env("HOST", "127.0.0.1")
        .env("PORT", port.to_string())
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

/// Deletes every supplement so intake assertions start from an empty active set.
async fn reset(client: &Client, base_url: &str) {
    let supplements: Vec<SupplementResponse> = client
        .get(format!("{base_url}/api/supplements"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    for supplement in supplements {
        client
            .delete(format!("{base_url}/api/supplements/{}", supplement.id))
            .send()
            .await
            .unwrap();
    }
}

async fn create_supplement(client: &Client, base_url: &str, name: &str) -> SupplementResponse {
    let response = client
        .post(format!("{base_url}/api/supplements"))
        .json(&json!({ "name": name, "serving_size": 1, "serving_unit": "tablets" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.unwrap()
}

async fn add_fact(client: &Client, base_url: &str, id: &str, body: Value) -> FactResponse {
    let response = client
        .post(format!("{base_url}/api/supplements/{id}/facts"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.unwrap()
}

async fn set_active(client: &Client, base_url: &str, id: &str, active: bool) {
    let response: SupplementResponse = client
        .put(format!("{base_url}/api/supplements/{id}/active"))
        .json(&json!({ "active": active }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(response.active, active);
}

async fn intake(client: &Client, base_url: &str) -> Value {
    client
        .get(format!("{base_url}/api/intake"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

fn find_status<'a>(report: &'a Value, group: &str, bucket: &str, name: &str) -> Option<&'a Value> {
    report[group][bucket]
        .as_array()?
        .iter()
        .find(|status| status["name"] == name)
}

#[tokio::test]
async fn http_create_requires_name() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/supplements", server.base_url))
        .json(&json!({ "name": "  " }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.text().await.unwrap(), "Supplement name is required.");
}

#[tokio::test]
async fn http_active_supplements_aggregate_into_intake() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = server.base_url.as_str();
    reset(&client, base).await;

    let first = create_supplement(&client, base, "Citrus C").await;
    let second = create_supplement(&client, base, "Berry C").await;
    for supplement in [&first, &second] {
        add_fact(
            &client,
            base,
            &supplement.id,
            json!({ "name": "Vitamin C", "amount": 50, "unit": "mg" }),
        )
        .await;
        set_active(&client, base, &supplement.id, true).await;
    }

    let report = intake(&client, base).await;
    assert_eq!(report["active_count"], 2);
    let vitamin_c = find_status(&report, "sufficient", "vitamins", "Vitamin C")
        .expect("vitamin c should be sufficient");
    assert_eq!(vitamin_c["intake"].as_f64(), Some(100.0));
    assert_eq!(vitamin_c["percentage"], 111);
    assert_eq!(vitamin_c["meets_dv"], true);

    set_active(&client, base, &second.id, false).await;
    let report = intake(&client, base).await;
    let vitamin_c = find_status(&report, "insufficient", "vitamins", "Vitamin C")
        .expect("vitamin c should be insufficient");
    assert_eq!(vitamin_c["intake"].as_f64(), Some(50.0));
    assert_eq!(vitamin_c["percentage"], 56);

    let zinc = find_status(&report, "insufficient", "minerals", "Zinc").unwrap();
    assert_eq!(zinc["intake"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn http_deleting_active_supplement_clears_its_intake() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = server.base_url.as_str();
    reset(&client, base).await;

    let supplement = create_supplement(&client, base, "Iron Bisglycinate").await;
    add_fact(&client, base, &supplement.id, json!({ "name": "Iron", "amount": 18 })).await;
    set_active(&client, base, &supplement.id, true).await;
    let report = intake(&client, base).await;
    assert!(find_status(&report, "sufficient", "minerals", "Iron").is_some());

    let response = client
        .delete(format!("{base}/api/supplements/{}", supplement.id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let report = intake(&client, base).await;
    assert_eq!(report["active_count"], 0);
    assert!(find_status(&report, "insufficient", "minerals", "Iron").is_some());

    let response = client
        .get(format!("{base}/api/supplements/{}", supplement.id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_fact_edits_and_search() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = server.base_url.as_str();
    reset(&client, base).await;

    let supplement = create_supplement(&client, base, "Daily Multi").await;
    create_supplement(&client, base, "Fish Oil").await;
    let fact = add_fact(&client, base, &supplement.id, json!({})).await;
    assert_eq!(fact.name, "");
    assert_eq!(fact.amount, json!(""));
    assert_eq!(fact.unit, "mg");

    let updated: FactResponse = client
        .patch(format!("{base}/api/supplements/{}/facts/{}", supplement.id, fact.id))
        .json(&json!({ "name": "Zinc", "amount": "11" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated.name, "Zinc");
    assert_eq!(updated.amount.as_f64(), Some(11.0));

    let found: Vec<SupplementResponse> = client
        .get(format!("{base}/api/supplements?q=zinc"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Daily Multi");
    assert_eq!(found[0].nutrition_facts.len(), 1);

    let response = client
        .patch(format!("{base}/api/supplements/{}/facts/{}", supplement.id, fact.id))
        .json(&json!({ "amount": -3 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_index_lists_supplements() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = server.base_url.as_str();
    reset(&client, base).await;

    create_supplement(&client, base, "Magnesium Glycinate").await;
    let body = client
        .get(format!("{base}/"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("Supplement Tracker"));
    assert!(body.contains("Magnesium Glycinate"));
}

#[tokio::test]
async fn http_daily_values_table() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let values: Vec<Value> = client
        .get(format!("{}/api/daily-values", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(values.len(), 27);
    assert_eq!(values[1]["name"], "Vitamin C");
    assert_eq!(values[1]["category"], "vitamin");
}
