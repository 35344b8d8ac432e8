use tank_cli::sim::{rng_for, school_from_roster, swim, SwimOptions};
use tank_cli::store::FishStore;
use tank_core::StopFlag;
use tank_shared::{NewFish, RenderFrame, TankSettings};

fn stocked_store(dir: &tempfile::TempDir) -> FishStore {
    let store = FishStore::new(dir.path().join("fish.json"));
    for (name, personality) in [("Finn", "slow"), ("Scales", "fast"), ("Coral", "medium")] {
        let mut fish = NewFish::new(name, format!("https://example.com/{}.png", name));
        fish.personality = personality.to_string();
        store.create(fish).unwrap();
    }
    store
}

async fn record_run(store: &FishStore, seed: u64, frames: u64) -> Vec<Vec<RenderFrame>> {
    let settings = TankSettings::default();
    let roster = store.all().unwrap();
    let mut rng = rng_for(Some(seed));
    let school = school_from_roster(
        &roster,
        &settings.profile(),
        &settings.tank_config(),
        &mut rng,
    );

    let options = SwimOptions {
        fps: 1000.0,
        frames: Some(frames),
        seed: Some(seed),
    };
    let mut recorded = Vec::new();
    swim(school, &settings, &options, rng, StopFlag::new(), |_, frames| {
        recorded.push(frames.to_vec());
        Ok(())
    })
    .await
    .unwrap();
    recorded
}

#[tokio::test]
async fn test_roster_fish_swim_inside_the_tank() {
    let dir = tempfile::tempdir().unwrap();
    let store = stocked_store(&dir);
    let ids: Vec<String> = store.all().unwrap().into_iter().map(|f| f.id).collect();

    let recorded = record_run(&store, 99, 200).await;

    assert_eq!(recorded.len(), 200);
    for frames in &recorded {
        let frame_ids: Vec<&str> = frames.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(frame_ids, ids.iter().map(String::as_str).collect::<Vec<_>>());
        for frame in frames {
            assert!(frame.left >= 2.0 && frame.left <= 88.0);
            // Rendered top carries the wobble on top of the clamped position.
            assert!(frame.top >= 5.0 - 0.3 - 1e-4 && frame.top <= 70.0 + 0.3 + 1e-4);
            assert!(frame.tilt.abs() <= 0.3 * 2.0 * 5.0 + 1e-4);
        }
    }
}

#[tokio::test]
async fn test_same_seed_same_frames() {
    let dir = tempfile::tempdir().unwrap();
    let store = stocked_store(&dir);

    let first = record_run(&store, 5, 50).await;
    let second = record_run(&store, 5, 50).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_removed_fish_no_longer_swims() {
    let dir = tempfile::tempdir().unwrap();
    let store = stocked_store(&dir);
    let gone = store.all().unwrap()[0].id.clone();
    assert!(store.delete(&gone).unwrap());

    let recorded = record_run(&store, 3, 10).await;

    for frames in &recorded {
        assert_eq!(frames.len(), 2);
        assert!(frames.iter().all(|f| f.id != gone));
    }
}
