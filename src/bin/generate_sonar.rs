use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use rusty_sonar::FEATURE_COUNT;

const MINES: usize = 111;
const ROCKS: usize = 97;
const DEMO_ROWS: usize = 20;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Band energies for one return: a sum of peaks plus noise, clipped to [0, 1].
fn generate_return(peaks: &[(f64, f64, f64)], noise: &Normal<f64>, rng: &mut StdRng) -> Vec<f64> {
    (0..FEATURE_COUNT)
        .map(|band| {
            let x = band as f64;
            let signal: f64 = peaks
                .iter()
                .map(|&(mu, sigma, amp)| gaussian(x, mu, sigma, amp))
                .sum();
            (signal + noise.sample(rng)).clamp(0.0, 1.0)
        })
        .collect()
}

/// Metal cylinders ring in the mid bands; rocks spread energy lower and wider.
fn profile(label: char, rng: &mut StdRng) -> Vec<(f64, f64, f64)> {
    let jitter = |rng: &mut StdRng, v: f64, spread: f64| v + rng.gen_range(-spread..spread);
    match label {
        'M' => vec![
            (jitter(rng, 22.0, 4.0), jitter(rng, 5.0, 1.5), jitter(rng, 0.75, 0.15)),
            (jitter(rng, 36.0, 4.0), jitter(rng, 4.0, 1.0), jitter(rng, 0.55, 0.15)),
            (jitter(rng, 48.0, 3.0), 3.0, jitter(rng, 0.15, 0.05)),
        ],
        _ => vec![
            (jitter(rng, 15.0, 5.0), jitter(rng, 8.0, 2.0), jitter(rng, 0.6, 0.15)),
            (jitter(rng, 30.0, 6.0), jitter(rng, 9.0, 2.0), jitter(rng, 0.35, 0.1)),
        ],
    }
}

fn format_row(features: &[f64], label: char) -> String {
    let mut parts: Vec<String> = features.iter().map(|v| format!("{v:.4}")).collect();
    parts.push(label.to_string());
    parts.join(",")
}

fn write_rows(path: &Path, rows: &[String]) -> Result<()> {
    let mut file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writeln!(file, "{row}").with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("public"));
    fs::create_dir_all(&out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = StdRng::seed_from_u64(42);
    let noise = Normal::new(0.0, 0.03).context("building noise distribution")?;

    let mut labels: Vec<char> = std::iter::repeat('M')
        .take(MINES)
        .chain(std::iter::repeat('R').take(ROCKS))
        .collect();
    // keep classes interleaved the way field recordings arrive
    rand::seq::SliceRandom::shuffle(labels.as_mut_slice(), &mut rng);

    let mut training = Vec::with_capacity(labels.len());
    for &label in &labels {
        let peaks = profile(label, &mut rng);
        training.push(format_row(&generate_return(&peaks, &noise, &mut rng), label));
    }

    let mut demo = Vec::with_capacity(DEMO_ROWS);
    for i in 0..DEMO_ROWS {
        let label = if i % 2 == 0 { 'M' } else { 'R' };
        let peaks = profile(label, &mut rng);
        demo.push(format_row(&generate_return(&peaks, &noise, &mut rng), label));
    }

    let training_path = out_dir.join("sonar.csv");
    let demo_path = out_dir.join("sonar_samples.txt");
    write_rows(&training_path, &training)?;
    write_rows(&demo_path, &demo)?;

    println!(
        "Wrote {} training rows ({MINES} mine, {ROCKS} rock) to {} and {} demo rows to {}",
        training.len(),
        training_path.display(),
        demo.len(),
        demo_path.display()
    );
    Ok(())
}
