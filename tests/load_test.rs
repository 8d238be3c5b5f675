//! Concurrent load against the proxy: throughput report plus the
//! round-robin fairness bound.

use std::collections::HashMap;
use std::time::{Duration, Instant};
use worker_proxy::config::{SelectionMode, WorkerConfig};

mod common;

use common::{config, start_proxy, start_worker, worker_url};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_load_fairness() {
    // 1. Setup workers
    let w1 = start_worker("w1").await;
    let w2 = start_worker("w2").await;
    let w3 = start_worker("w3").await;

    // 2. Start proxy
    let proxy = start_proxy(config(
        SelectionMode::RoundRobin,
        vec![
            WorkerConfig::new(worker_url(w1)),
            WorkerConfig::new(worker_url(w2)),
            WorkerConfig::new(worker_url(w3)),
        ],
    ))
    .await;

    // 3. Run load
    let concurrency = 20;
    let requests_per_task = 30;
    let total_requests = concurrency * requests_per_task;

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let start = Instant::now();

    let mut tasks = Vec::new();
    for _ in 0..concurrency {
        let client = client.clone();
        let url = proxy.url("/");
        tasks.push(tokio::spawn(async move {
            let mut served = Vec::new();
            let mut latencies = Vec::new();
            for _ in 0..requests_per_task {
                let req_start = Instant::now();
                if let Ok(res) = client.get(&url).send().await {
                    if res.status().is_success() {
                        latencies.push(req_start.elapsed());
                        served.push(res.text().await.unwrap_or_default());
                    }
                }
            }
            (served, latencies)
        }));
    }

    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut all_latencies: Vec<Duration> = Vec::new();
    for task in tasks {
        let (served, latencies) = task.await.unwrap();
        for name in served {
            *counts.entry(name).or_default() += 1;
        }
        all_latencies.extend(latencies);
    }
    let duration = start.elapsed();

    assert_eq!(all_latencies.len(), total_requests, "every request should succeed");

    // Every request advances the cursor once, so the split is exact.
    for name in ["w1", "w2", "w3"] {
        assert_eq!(counts.get(name).copied().unwrap_or(0), total_requests / 3, "{name}");
    }

    all_latencies.sort();
    let p50 = all_latencies[all_latencies.len() / 2];
    let p99 = all_latencies[(all_latencies.len() as f64 * 0.99) as usize];

    println!("\n--- Load Test Results ---");
    println!("Total Requests: {}", total_requests);
    println!("Concurrency:    {}", concurrency);
    println!("Total Duration: {:?}", duration);
    println!("Requests/sec:   {:.2}", total_requests as f64 / duration.as_secs_f64());
    println!("P50 Latency:    {:?}", p50);
    println!("P99 Latency:    {:?}", p99);
    println!("Distribution:   {:?}", counts);
    println!("-------------------------\n");
}
