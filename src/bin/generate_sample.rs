//! Writes a synthetic `Data.csv` in the layout the renderer expects: a title
//! row, the header on the second row, an unlabeled spacer column and the
//! mass-balance column under its long source name.

use anyhow::{Context, Result};

const SOURCES: [(&str, f64); 6] = [
    ("Berkeley Earth", 0.00),
    ("ERA5", 0.02),
    ("GISTEMP", -0.01),
    ("HadCRUT5", -0.03),
    ("JRA-3Q", 0.01),
    ("NOAAGlobalTemp", -0.02),
];

const FIRST_YEAR: i32 = 1950;
const LAST_YEAR: i32 = 2024;

/// Anomaly trend: flat until 1975, then warming that speeds up.
fn trend(year: i32) -> f64 {
    let t = (year - 1975).max(0) as f64;
    -0.05 + 0.012 * t + 0.0001 * t * t
}

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

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let output_path = "Data.csv";

    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;

    writer.write_record(["Global temperature anomalies and glacier mass balance (synthetic)"])?;

    let mut header = vec!["year".to_string()];
    header.extend(SOURCES.iter().map(|(name, _)| name.to_string()));
    header.push(String::new());
    header.push("World Glacier Monitoring Service".to_string());
    writer.write_record(&header)?;

    let mut mass_balance = 0.0;
    for year in FIRST_YEAR..=LAST_YEAR {
        let base = trend(year) + rng.gauss(0.0, 0.08);
        let mut record = vec![year.to_string()];
        for &(_, offset) in &SOURCES {
            let anomaly = base + offset + rng.gauss(0.0, 0.02);
            record.push(format!("{anomaly:.3}"));
        }
        record.push(String::new());
        record.push(format!("{mass_balance:.2}"));
        writer.write_record(&record)?;

        // Losses grow with warming.
        mass_balance -= 0.15 + 0.6 * trend(year).max(0.0) + rng.gauss(0.0, 0.1);
    }
    writer.flush()?;

    println!(
        "Wrote {} years ({} temperature sources) to {output_path}",
        LAST_YEAR - FIRST_YEAR + 1,
        SOURCES.len()
    );
    Ok(())
}
