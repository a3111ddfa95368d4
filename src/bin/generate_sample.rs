use std::path::Path;

use anyhow::{Context, Result};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

const HEADER: [&str; 11] = [
    "Label", "Subject", "Tracker", "Timestamp", "Target-ID", "Target-X", "Target-Y", "Cursor-X",
    "Cursor-Y", "Actual-X", "Actual-Y",
];

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    // 3×3 grid of targets on a 1920×1080 display, 10% margin
    let targets: Vec<(i64, i64, i64)> = (0..9)
        .map(|i| {
            let col = i % 3;
            let row = i / 3;
            (i + 1, 192 + col * 768, 108 + row * 432)
        })
        .collect();

    // (tracker, label, spread in px, systematic offset in px)
    let conditions = [
        ("Eyelink", "Calibrated", 12.0, (0.0, 0.0)),
        ("Eyelink", "Drifted", 18.0, (35.0, -20.0)),
        ("Gazepoint", "Calibrated", 30.0, (5.0, 10.0)),
        ("Mouse", "Baseline", 4.0, (0.0, 0.0)),
    ];
    let samples_per_target = 20;

    let output_path = Path::new("sample_session.csv");
    let mut writer = csv::Writer::from_path(output_path).context("creating output file")?;
    writer.write_record(HEADER).context("writing header")?;

    let mut timestamp: u64 = 0;
    let mut rows = 0usize;
    for (tracker, label, spread, (dx, dy)) in conditions {
        for &(id, tx, ty) in &targets {
            for _ in 0..samples_per_target {
                timestamp += 16;
                let ax = rng.gauss(tx as f64 + dx, spread).round() as i64;
                let ay = rng.gauss(ty as f64 + dy, spread).round() as i64;
                writer
                    .write_record([
                        label.to_string(),
                        "P01".to_string(),
                        tracker.to_string(),
                        timestamp.to_string(),
                        id.to_string(),
                        tx.to_string(),
                        ty.to_string(),
                        ax.to_string(),
                        ay.to_string(),
                        ax.to_string(),
                        ay.to_string(),
                    ])
                    .context("writing row")?;
                rows += 1;
            }
        }
    }
    writer.flush().context("flushing output")?;

    println!(
        "Wrote {rows} rows ({} targets, {} series) to {}",
        targets.len(),
        conditions.len(),
        output_path.display()
    );
    Ok(())
}
