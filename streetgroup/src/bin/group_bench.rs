use std::time::Instant;
use streetgroup::{BuildOptions, GroupingConfig, NoopObserver, Polyline, StreetNetwork};

// Street grid: each row and column split into short pieces with a small
// jitter so consecutive pieces connect and crossings do not.
fn build_grid(rows: usize, pieces: usize, step: f64) -> StreetNetwork {
    let mut net = StreetNetwork::new();
    let span = pieces as f64 * step;
    for r in 0..rows {
        let c = r as f64 * span / rows as f64 + 0.37;
        for k in 0..pieces {
            let s0 = k as f64 * step; let s1 = s0 + step;
            let wob = if k % 2 == 0 { 0.01 } else { -0.01 };
            let _ = net.add_polyline(&[(s0, c), (0.5 * (s0 + s1), c + wob), (s1, c)]);
            let _ = net.add_polyline(&[(c, s0), (c + wob, 0.5 * (s0 + s1)), (c, s1)]);
        }
    }
    net
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() { return 0.0; }
    let idx = ((sorted.len() as f64 - 1.0) * p).round() as usize;
    sorted[idx.min(sorted.len()-1)]
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let mut rows = 40usize;
    let mut pieces = 50usize;
    let mut runs = 5usize;
    let mut prefilter = true;
    let mut preset = "intersection".to_string();
    let mut assert_ms: Option<f64> = None;
    for a in &args[1..] {
        if let Some(val)=a.strip_prefix("--rows=") { if let Ok(v)=val.parse() { rows=v; } }
        else if let Some(val)=a.strip_prefix("--pieces=") { if let Ok(v)=val.parse() { pieces=v; } }
        else if let Some(val)=a.strip_prefix("--runs=") { if let Ok(v)=val.parse() { runs=v; } }
        else if let Some(val)=a.strip_prefix("--preset=") { preset=val.to_string(); }
        else if a == "--no-prefilter" { prefilter=false; }
        else if let Some(val)=a.strip_prefix("--assert-ms=") { if let Ok(v)=val.parse() { assert_ms=Some(v); } }
    }

    let Some(connectivity) = streetgroup::ConnectivityConfig::preset(&preset) else {
        eprintln!("unknown preset '{}'", preset);
        std::process::exit(2);
    };
    let mut net = build_grid(rows, pieces, 10.0);
    let cfg = GroupingConfig { connectivity, build: BuildOptions { prefilter }, ..GroupingConfig::default() };
    if let Err(e) = net.set_config(cfg) { eprintln!("{}", e); std::process::exit(2); }
    let points: usize = net.records().iter().filter_map(|r| r.polyline()).map(Polyline::len).sum();

    let mut times_ms: Vec<f64> = Vec::with_capacity(runs);
    let mut clusters = 0usize; let mut edges = 0usize;
    for _ in 0..runs.max(1) {
        let t0 = Instant::now();
        match net.group_with_observer(&NoopObserver) {
            Ok(out) => { clusters = out.cluster_count(); edges = out.graph.edge_count(); }
            Err(e) => { eprintln!("{}", e); std::process::exit(1); }
        }
        times_ms.push(t0.elapsed().as_secs_f64() * 1000.0);
    }
    times_ms.sort_by(|a, b| a.total_cmp(b));
    let med = percentile(&times_ms, 0.5);
    let p90 = percentile(&times_ms, 0.9);
    println!("lines={} points={} preset={} prefilter={} edges={} clusters={} median_ms={:.3} p90_ms={:.3}", net.len(), points, preset, prefilter, edges, clusters, med, p90);
    if let Some(th) = assert_ms { if med > th { eprintln!("FAIL: median {:.3} ms > threshold {:.3} ms", med, th); std::process::exit(1); } }
}
