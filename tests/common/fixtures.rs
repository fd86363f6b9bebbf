#![allow(dead_code)]

use std::fmt::Write as _;

/// Builds text in the shape `go tool pprof -top` prints.
#[derive(Debug, Clone, Default)]
pub struct TopReport {
    duration_s: Option<f64>,
    total_ms: Option<f64>,
    rows: Vec<(f64, f64, String)>,
}

impl TopReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duration(mut self, seconds: f64) -> Self {
        self.duration_s = Some(seconds);
        self
    }

    pub fn total_ms(mut self, ms: f64) -> Self {
        self.total_ms = Some(ms);
        self
    }

    /// Add a row with flat and cumulative times in milliseconds.
    pub fn row(mut self, name: &str, flat_ms: f64, cum_ms: f64) -> Self {
        self.rows.push((flat_ms, cum_ms, name.to_string()));
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::from("File: game\nType: cpu\n");
        match (self.duration_s, self.total_ms) {
            (Some(d), Some(t)) => {
                let _ = writeln!(out, "Duration: {d:.2}s, Total samples = {t}ms (100.00%)");
            }
            (Some(d), None) => {
                let _ = writeln!(out, "Duration: {d:.2}s");
            }
            (None, Some(t)) => {
                let _ = writeln!(out, "Total samples = {t}ms");
            }
            (None, None) => {}
        }
        out.push_str("      flat  flat%   sum%        cum   cum%\n");
        for (flat, cum, name) in &self.rows {
            let _ = writeln!(
                out,
                "{flat:>8}ms  1.00%  1.00% {cum:>8}ms  2.00%  {name}"
            );
        }
        out
    }
}

/// A baseline/candidate pair exercising every report section.
pub fn baseline_report() -> TopReport {
    TopReport::new()
        .duration(30.0)
        .total_ms(10_000.0)
        .row("game_main/world.(*Map).Update", 120.0, 1000.0)
        .row("runtime.mallocgc", 400.0, 500.0)
        .row("github.com/bytearena/ecs.(*Manager).Query", 50.0, 600.0)
        .row("game_main/vector.FindPath", 10.0, 300.0)
        .row("main.steady", 10.0, 100.0)
        .row("main.removedHelper", 20.0, 900.0)
}

pub fn candidate_report() -> TopReport {
    TopReport::new()
        .duration(30.0)
        .total_ms(12_500.0)
        .row("game_main/world.(*Map).Update", 120.0, 1500.0)
        .row("runtime.mallocgc", 100.0, 200.0)
        .row("github.com/bytearena/ecs.(*Manager).Query", 50.0, 300.0)
        .row("game_main/vector.FindPath", 10.0, 900.0)
        .row("main.steady", 10.0, 105.0)
        .row("main.addedHelper", 5.0, 250.0)
}
