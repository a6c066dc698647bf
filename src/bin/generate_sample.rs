use std::f64::consts::PI;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const SAMPLE_RATE_HZ: f64 = 1000.0;
const DURATION_SECS: f64 = 20.0;
const ROWS: usize = 12;

fn gaussian(t: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(t - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// One heartbeat centred on `beat`: P wave, QRS complex, T wave.
fn beat_shape(t: f64, beat: f64) -> f64 {
    gaussian(t, beat - 0.20, 0.025, 0.15)
        + gaussian(t, beat - 0.025, 0.008, -0.12)
        + gaussian(t, beat, 0.010, 1.0)
        + gaussian(t, beat + 0.025, 0.008, -0.25)
        + gaussian(t, beat + 0.30, 0.045, 0.30)
}

/// A synthetic ECG trace. `irregular` jitters the beat spacing strongly.
fn generate_ecg(heart_rate_bpm: f64, irregular: bool, rng: &mut SimpleRng) -> Vec<f64> {
    let n = (SAMPLE_RATE_HZ * DURATION_SECS) as usize;
    let rr = 60.0 / heart_rate_bpm;

    let mut beats = Vec::new();
    let mut t = rng.next_f64() * rr;
    while t < DURATION_SECS + 0.5 {
        beats.push(t);
        let jitter = if irregular { 0.35 } else { 0.03 };
        t += rr * (1.0 + rng.gauss(0.0, jitter)).max(0.4);
    }

    let wander_phase = rng.next_f64() * 2.0 * PI;
    (0..n)
        .map(|i| {
            let t = i as f64 / SAMPLE_RATE_HZ;
            let heart: f64 = beats
                .iter()
                .filter(|&&b| (t - b).abs() < 0.6)
                .map(|&b| beat_shape(t, b))
                .sum();
            let wander = 0.15 * (2.0 * PI * 0.3 * t + wander_phase).sin();
            let mains = 0.05 * (2.0 * PI * 50.0 * t).sin();
            heart + wander + mains + rng.gauss(0.0, 0.03)
        })
        .collect()
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
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    // Every third subject gets an irregular rhythm.
    let rows: Vec<Vec<f64>> = (0..ROWS)
        .map(|i| {
            let heart_rate = 55.0 + rng.next_f64() * 45.0;
            generate_ecg(heart_rate, i % 3 == 2, &mut rng)
        })
        .collect();
    let n_samples = rows[0].len();

    // Write CSV: header of sample indices, one subject per line.
    let csv_path = "sample_ecg.csv";
    let mut writer = csv::Writer::from_path(csv_path).expect("Failed to create CSV file");
    writer
        .write_record((0..n_samples).map(|i| i.to_string()))
        .expect("Failed to write header");
    for row in &rows {
        writer
            .write_record(row.iter().map(|v| format!("{v:.5}")))
            .expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush CSV");

    // Write Parquet: one Float64 column per sample position.
    let schema = Arc::new(Schema::new(
        (0..n_samples)
            .map(|i| Field::new(i.to_string(), DataType::Float64, false))
            .collect::<Vec<_>>(),
    ));
    let columns: Vec<ArrayRef> = (0..n_samples)
        .map(|j| {
            Arc::new(Float64Array::from(
                rows.iter().map(|row| row[j]).collect::<Vec<_>>(),
            )) as ArrayRef
        })
        .collect();
    let batch =
        RecordBatch::try_new(schema.clone(), columns).expect("Failed to create RecordBatch");

    let parquet_path = "sample_ecg.parquet";
    let file = std::fs::File::create(parquet_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!("Wrote {ROWS} signals ({n_samples} samples each) to {csv_path} and {parquet_path}");
}
