// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use image::{ImageFormat, Rgba, RgbaImage};
use preload_agents::{AssetLoadingAgent, CycleOutcome};
use preload_core::{AssetKind, LoaderConfig};
use preload_io::MemoryFetcher;
use preload_telemetry::{MetricId, MetricsRegistry};

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255]));
    let mut cursor = Cursor::new(Vec::new());
    image.write_to(&mut cursor, ImageFormat::Png).unwrap();
    cursor.into_inner()
}

fn wav_bytes() -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for i in 0..800i32 {
            writer.write_sample(((i % 100) * 100) as i16).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

/// Config for paused-clock tests: decoding stays on the current thread.
fn inline_decoding() -> LoaderConfig {
    LoaderConfig {
        decode_on_blocking_pool: false,
        ..LoaderConfig::default()
    }
}

fn completion_counter(agent: &mut AssetLoadingAgent) -> Arc<AtomicUsize> {
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = fired.clone();
    agent.on_complete(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    fired
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_loads_every_kind_in_one_cycle() -> Result<()> {
    let fetcher = MemoryFetcher::new()
        .with("img/hero.png", png_bytes(4, 2))
        .with("sfx/click.wav", wav_bytes())
        .with("data/level.json", br#"{"name": "intro", "enemies": 3}"#.to_vec());
    let mut agent = AssetLoadingAgent::new(fetcher);
    agent
        .queue_image("hero", "img/hero.png")
        .queue_audio("click", "sfx/click.wav")
        .queue_data("level", "data/level.json");

    let seen_in_handler = Arc::new(Mutex::new(0usize));
    let seen = seen_in_handler.clone();
    agent.on_complete(move |table| {
        *seen.lock().unwrap() = table.len();
    });

    let cycle = agent.start_loading()?;
    assert_eq!(cycle.total(), 3);
    let outcome = cycle.finished().await;

    assert_eq!(
        outcome,
        CycleOutcome::Completed {
            succeeded: 3,
            failed: 0
        }
    );
    assert_eq!(*seen_in_handler.lock().unwrap(), 3);
    assert!(agent.is_load_complete());
    assert_eq!(agent.progress(), 1.0);

    let hero = agent.image("hero").expect("image should be loaded");
    assert_eq!((hero.width, hero.height), (4, 2));
    assert_eq!(hero.pixel(0, 0), Some([255, 0, 0, 255]));

    let click = agent.sound("click").expect("sound should be loaded");
    assert_eq!(click.channels, 1);
    assert_eq!(click.sample_rate, 8000);
    assert_eq!(click.samples.len(), 800);

    let level = agent.data("level").expect("data should be loaded");
    assert_eq!(level["enemies"], 3);

    // Keys are scoped per kind.
    assert!(agent.get_asset(AssetKind::Data, "hero").is_none());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_progress_is_monotonic_and_ends_at_one() -> Result<()> {
    let fetcher = MemoryFetcher::new();
    for (i, delay_ms) in [40u64, 10, 30, 20, 0].into_iter().enumerate() {
        fetcher.insert_delayed(
            format!("data/{i}.json"),
            format!("{{\"index\": {i}}}"),
            Duration::from_millis(delay_ms),
        );
    }
    let mut agent = AssetLoadingAgent::new(fetcher).with_config(inline_decoding());
    for i in 0..5 {
        agent.queue_data(format!("entry{i}"), format!("data/{i}.json"));
    }
    assert_eq!(agent.counts(), (0, 5));

    let observed = Arc::new(Mutex::new(Vec::new()));
    let sink = observed.clone();
    agent.on_progress(move |fraction| sink.lock().unwrap().push(fraction));

    agent.start_loading()?.finished().await;

    let observed = observed.lock().unwrap().clone();
    assert_eq!(observed, vec![0.2, 0.4, 0.6, 0.8, 1.0]);
    assert_eq!(agent.counts(), (5, 5));
    Ok(())
}

#[tokio::test]
async fn test_failures_count_toward_completion() -> Result<()> {
    let fetcher = MemoryFetcher::new()
        .with("img/broken.png", b"definitely not a png".to_vec())
        .with("data/ok.json", b"[1, 2, 3]".to_vec())
        .with_failure("data/offline.json", "connection refused");
    let mut agent = AssetLoadingAgent::new(fetcher);
    agent
        .queue_image("broken", "img/broken.png")
        .queue_data("ok", "data/ok.json")
        .queue_data("offline", "data/offline.json")
        .queue_audio("missing", "sfx/missing.wav");
    let fired = completion_counter(&mut agent);

    let outcome = agent.start_loading()?.finished().await;

    assert_eq!(
        outcome,
        CycleOutcome::Completed {
            succeeded: 1,
            failed: 3
        }
    );
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert!(agent.is_load_complete());
    assert_eq!(agent.progress(), 1.0);
    assert!(agent.image("broken").is_none());
    assert!(agent.get_asset(AssetKind::Data, "offline").is_none());
    assert!(agent.sound("missing").is_none());
    assert_eq!(agent.assets().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_empty_cycle_completes_asynchronously() -> Result<()> {
    let mut agent = AssetLoadingAgent::new(MemoryFetcher::new());
    let tables = Arc::new(Mutex::new(Vec::new()));
    let sink = tables.clone();
    agent.on_complete(move |table| sink.lock().unwrap().push(table.len()));

    let cycle = agent.start_loading()?;
    // The current-thread runtime has not polled the cycle task yet.
    assert!(tables.lock().unwrap().is_empty());
    assert_eq!(cycle.total(), 0);

    let outcome = cycle.finished().await;

    assert_eq!(
        outcome,
        CycleOutcome::Completed {
            succeeded: 0,
            failed: 0
        }
    );
    assert_eq!(*tables.lock().unwrap(), vec![0]);
    assert!(agent.is_load_complete());
    assert_eq!(agent.progress(), 0.0);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_reset_discards_late_settlements() -> Result<()> {
    let fetcher = MemoryFetcher::new()
        .with_delayed("data/slow.json", b"{}".to_vec(), Duration::from_millis(100));
    let mut agent = AssetLoadingAgent::new(fetcher).with_config(inline_decoding());
    agent.queue_data("slow", "data/slow.json");
    let fired = completion_counter(&mut agent);
    let progress_calls = Arc::new(AtomicUsize::new(0));
    let calls = progress_calls.clone();
    agent.on_progress(move |_| {
        calls.fetch_add(1, Ordering::SeqCst);
    });

    let cycle = agent.start_loading()?;
    tokio::time::sleep(Duration::from_millis(10)).await;
    agent.reset();

    assert_eq!(agent.progress(), 0.0);
    assert_eq!(agent.counts(), (0, 0));
    assert_eq!(cycle.finished().await, CycleOutcome::Superseded);

    // Let the in-flight fetch settle against the abandoned generation.
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert!(agent.data("slow").is_none());
    assert_eq!(agent.counts(), (0, 0));
    assert_eq!(fired.load(Ordering::SeqCst), 0);
    assert_eq!(progress_calls.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_cycle_timeout_settles_hanging_requests() -> Result<()> {
    let fetcher = MemoryFetcher::new()
        .with_hanging("data/never.json")
        .with("data/ok.json", b"true".to_vec());
    let (sender, receiver) = crossbeam_channel::unbounded();
    let mut agent = AssetLoadingAgent::new(fetcher)
        .with_config(inline_decoding().with_cycle_timeout(Duration::from_secs(2)))
        .with_event_sender(sender);
    agent
        .queue_data("never", "data/never.json")
        .queue_data("ok", "data/ok.json");
    let fired = completion_counter(&mut agent);

    let outcome = agent.start_loading()?.finished().await;

    assert_eq!(
        outcome,
        CycleOutcome::Completed {
            succeeded: 1,
            failed: 1
        }
    );
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert!(agent.data("ok").is_some());

    let timed_out = receiver.try_iter().any(|event| {
        matches!(
            event,
            preload_agents::LoadEvent::Settled {
                error: Some(preload_core::LoadError::TimedOut { .. }),
                ..
            }
        )
    });
    assert!(timed_out, "the hanging request should settle as timed out");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_last_request_for_a_key_wins() -> Result<()> {
    // The earlier request settles last; it must not overwrite the later one.
    let fetcher = MemoryFetcher::new()
        .with_delayed("data/old.json", br#""old""#.to_vec(), Duration::from_millis(50))
        .with("data/new.json", br#""new""#.to_vec());
    let mut agent = AssetLoadingAgent::new(fetcher).with_config(inline_decoding());
    agent
        .queue_data("settings", "data/old.json")
        .queue_data("settings", "data/new.json");

    let outcome = agent.start_loading()?.finished().await;

    assert_eq!(
        outcome,
        CycleOutcome::Completed {
            succeeded: 2,
            failed: 0
        }
    );
    let settings = agent.data("settings").expect("settings should be loaded");
    assert_eq!(*settings, serde_json::json!("new"));
    assert_eq!(agent.assets().len(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_enqueue_while_loading_waits_for_next_cycle() -> Result<()> {
    let fetcher = MemoryFetcher::new()
        .with_delayed("data/a.json", b"1".to_vec(), Duration::from_millis(30))
        .with("data/b.json", b"2".to_vec());
    let mut agent = AssetLoadingAgent::new(fetcher).with_config(inline_decoding());
    agent.queue_data("a", "data/a.json");

    let first = agent.start_loading()?;
    agent.queue_data("b", "data/b.json");

    assert_eq!(agent.counts(), (0, 1));
    assert_eq!(agent.queued(), 1);

    // A second start while loading hands back the running cycle.
    let again = agent.start_loading()?;
    assert_eq!(again.generation(), first.generation());

    first.finished().await;
    assert!(agent.data("b").is_none());

    let second = agent.start_loading()?;
    assert!(second.generation() > again.generation());
    second.finished().await;

    assert!(agent.data("a").is_some());
    assert!(agent.data("b").is_some());
    assert_eq!(agent.counts(), (1, 1));
    Ok(())
}

#[tokio::test]
async fn test_completion_handler_fires_once_per_cycle() -> Result<()> {
    let fetcher = MemoryFetcher::new().with("data/x.json", b"null".to_vec());
    let mut agent = AssetLoadingAgent::new(fetcher);
    let fired = completion_counter(&mut agent);

    agent.queue_data("x", "data/x.json");
    agent.start_loading()?.finished().await;
    agent.queue_data("x", "data/x.json");
    agent.start_loading()?.finished().await;

    assert_eq!(fired.load(Ordering::SeqCst), 2);
    Ok(())
}

#[tokio::test]
async fn test_loader_metrics_track_settlements() -> Result<()> {
    let fetcher = MemoryFetcher::new()
        .with("data/ok.json", b"{}".to_vec())
        .with("data/bad.json", b"{".to_vec());
    let registry = MetricsRegistry::new();
    let mut agent =
        AssetLoadingAgent::new(fetcher).with_metrics_registry(registry.clone())?;
    agent
        .queue_data("ok", "data/ok.json")
        .queue_data("bad", "data/bad.json");

    agent.start_loading()?.finished().await;

    let settled = registry.get(&MetricId::new("assets", "settled_total"))?;
    let failed = registry.get(&MetricId::new("assets", "failed_total"))?;
    let load_time = registry.get(&MetricId::new("assets", "load_time"))?;
    assert_eq!(settled.as_counter(), Some(2));
    assert_eq!(failed.as_counter(), Some(1));
    assert_eq!(load_time.sample_count(), Some(2));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_undrained_event_channel_does_not_stall_loading() -> Result<()> {
    let fetcher = MemoryFetcher::new();
    for i in 0..4 {
        fetcher.insert(format!("data/{i}.json"), format!("{i}"));
    }
    let (sender, receiver) = crossbeam_channel::bounded(1);
    let mut agent = AssetLoadingAgent::new(fetcher).with_event_sender(sender);
    for i in 0..4 {
        agent.queue_data(format!("entry{i}"), format!("data/{i}.json"));
    }

    let cycle = agent.start_loading()?;
    let outcome = tokio::time::timeout(Duration::from_secs(5), cycle.finished()).await?;

    assert_eq!(
        outcome,
        CycleOutcome::Completed {
            succeeded: 4,
            failed: 0
        }
    );
    // Nobody drained the channel, yet queries still answer.
    assert_eq!(agent.progress(), 1.0);
    assert!(agent.is_load_complete());
    assert!(agent.data("entry3").is_some());
    assert_eq!(receiver.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_registering_a_handler_replaces_the_previous_one() -> Result<()> {
    let fetcher = MemoryFetcher::new().with("data/x.json", b"{}".to_vec());
    let mut agent = AssetLoadingAgent::new(fetcher);
    agent.queue_data("x", "data/x.json");

    let first_complete = completion_counter(&mut agent);
    let second_complete = completion_counter(&mut agent);

    let first_progress = Arc::new(AtomicUsize::new(0));
    let second_progress = Arc::new(AtomicUsize::new(0));
    let calls = first_progress.clone();
    agent.on_progress(move |_| {
        calls.fetch_add(1, Ordering::SeqCst);
    });
    let calls = second_progress.clone();
    agent.on_progress(move |_| {
        calls.fetch_add(1, Ordering::SeqCst);
    });

    agent.start_loading()?.finished().await;

    assert_eq!(first_complete.load(Ordering::SeqCst), 0);
    assert_eq!(second_complete.load(Ordering::SeqCst), 1);
    assert_eq!(first_progress.load(Ordering::SeqCst), 0);
    assert_eq!(second_progress.load(Ordering::SeqCst), 1);
    Ok(())
}
