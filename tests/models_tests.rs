// Wire format of snapshots (JSON, camelCase)

use container_pulse::models::*;

fn host() -> HostSnapshot {
    HostSnapshot {
        hostname: "box".into(),
        total_memory: 16384,
        memory_usage_percent: 42.5,
        cpu_cores: 8,
        cpu_usage: 13.0,
        load_average: LoadAverage(1.0, 0.5, 0.25),
    }
}

fn container() -> ContainerSnapshot {
    ContainerSnapshot {
        id: "abc123".into(),
        name: "web".into(),
        image: "nginx:1.27".into(),
        status: "Up 2 hours".into(),
        cpu: 3.5,
        ram_usage: 128,
        ram_limit: 512,
    }
}

#[test]
fn test_metrics_snapshot_wire_shape() {
    let snapshot = Snapshot::Metrics {
        containers: vec![container()],
        host: host(),
    };
    let json: serde_json::Value = serde_json::to_value(&snapshot).unwrap();

    let c = &json["containers"][0];
    for key in ["id", "name", "image", "status", "cpu", "ramUsage", "ramLimit"] {
        assert!(c.get(key).is_some(), "container missing {}", key);
    }
    assert_eq!(c["ramLimit"], 512);

    let h = &json["host"];
    for key in [
        "hostname",
        "totalMemory",
        "memoryUsagePercent",
        "cpuCores",
        "cpuUsage",
        "loadAverage",
    ] {
        assert!(h.get(key).is_some(), "host missing {}", key);
    }
    assert_eq!(h["loadAverage"], serde_json::json!([1.0, 0.5, 0.25]));
    assert!(json.get("error").is_none());
}

#[test]
fn test_error_snapshot_wire_shape() {
    let json = serde_json::to_string(&Snapshot::error("docker unavailable")).unwrap();
    assert_eq!(json, r#"{"error":"docker unavailable"}"#);
}

#[test]
fn test_snapshot_decodes_both_shapes() {
    let metrics = Snapshot::Metrics {
        containers: vec![container()],
        host: host(),
    };
    let text = serde_json::to_string(&metrics).unwrap();
    assert_eq!(serde_json::from_str::<Snapshot>(&text).unwrap(), metrics);

    let err: Snapshot = serde_json::from_str(r#"{"error":"x"}"#).unwrap();
    assert!(err.is_error());
    assert_eq!(err.container_ids().count(), 0);
}

#[test]
fn test_snapshot_rejects_unrelated_json() {
    assert!(serde_json::from_str::<Snapshot>(r#"{"containers":[]}"#).is_err());
    assert!(serde_json::from_str::<Snapshot>("[]").is_err());
}

#[test]
fn test_container_state_from_docker() {
    assert_eq!(ContainerState::from_docker("running"), ContainerState::Running);
    assert_eq!(ContainerState::from_docker("Exited"), ContainerState::Exited);
    assert_eq!(ContainerState::from_docker("dead"), ContainerState::Dead);
    assert_eq!(ContainerState::from_docker("weird"), ContainerState::Unknown);
    assert!(ContainerState::Running.is_running());
    assert!(!ContainerState::Paused.is_running());
}

#[test]
fn test_idle_container_keeps_metadata() {
    let listing = ContainerListing {
        id: "x".into(),
        name: "db".into(),
        image: "postgres".into(),
        state: ContainerState::Exited,
        status: "Exited (1)".into(),
    };
    let idle = ContainerSnapshot::idle(&listing);
    assert_eq!(idle.name, "db");
    assert_eq!(idle.status, "Exited (1)");
    assert_eq!((idle.cpu, idle.ram_usage, idle.ram_limit), (0.0, 0, 0));
}

#[test]
fn test_same_run_detection() {
    let earlier = RawUsageSample {
        cpu_total: 100,
        started_at: Some("t0".into()),
        ..Default::default()
    };
    let later = RawUsageSample {
        cpu_total: 200,
        started_at: Some("t0".into()),
        ..Default::default()
    };
    assert!(later.same_run_as(&earlier));

    let restarted = RawUsageSample {
        started_at: Some("t1".into()),
        ..later.clone()
    };
    assert!(!restarted.same_run_as(&earlier));

    let counter_reset = RawUsageSample {
        cpu_total: 50,
        started_at: None,
        ..Default::default()
    };
    assert!(!counter_reset.same_run_as(&earlier));
}

#[test]
fn test_bytes_to_mib_rounds_down() {
    assert_eq!(bytes_to_mib(BYTES_PER_MIB * 3 - 1), 2);
    assert_eq!(bytes_to_mib(0), 0);
}
