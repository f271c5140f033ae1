use std::path::PathBuf;

use anyhow::{Context, Result};
use limesoda::{save_file, DatasetRecord, Table};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal, Uniform};

/// Assign folds 1..=n_folds round-robin over a shuffled row order, so
/// every fold gets `n / n_folds` (±1) rows.
fn assign_folds(n: usize, n_folds: i64, rng: &mut StdRng) -> Vec<i64> {
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);
    let mut folds = vec![0; n];
    for (k, &row) in order.iter().enumerate() {
        folds[row] = (k as i64 % n_folds) + 1;
    }
    folds
}

/// A synthetic field survey: a sampling grid with terrain, sensor and
/// remote-sensing covariates driving three soil properties.
fn generate_field(n: usize, with_coordinates: bool, rng: &mut StdRng) -> Result<DatasetRecord> {
    let noise = Normal::new(0.0, 1.0).context("building noise distribution")?;
    let jitter = Uniform::new(-5.0, 5.0);

    let side = (n as f64).sqrt().ceil() as usize;
    let mut x = Vec::with_capacity(n);
    let mut y = Vec::with_capacity(n);
    for i in 0..n {
        // 25 m grid in UTM-like metres.
        x.push(410_000.0 + (i % side) as f64 * 25.0 + jitter.sample(rng));
        y.push(5_820_000.0 + (i / side) as f64 * 25.0 + jitter.sample(rng));
    }

    let mut altitude = Vec::with_capacity(n);
    let mut slope = Vec::with_capacity(n);
    let mut era = Vec::with_capacity(n);
    let mut ndvi = Vec::with_capacity(n);
    let mut soc = Vec::with_capacity(n);
    let mut ph = Vec::with_capacity(n);
    let mut clay = Vec::with_capacity(n);

    for i in 0..n {
        let u = (x[i] - 410_000.0) / (side as f64 * 25.0);
        let v = (y[i] - 5_820_000.0) / (side as f64 * 25.0);

        let alt = 50.0 + 8.0 * u - 5.0 * v + 0.5 * noise.sample(rng);
        let slp = (2.0 + 1.5 * (u * 6.0).sin() + 0.3 * noise.sample(rng)).max(0.0);
        let clay_v = (8.0 + 12.0 * v + 2.0 * noise.sample(rng)).max(1.0);
        let era_v = 200.0 - 6.0 * clay_v + 10.0 * noise.sample(rng);
        let ndvi_v = (0.2 + 0.02 * clay_v + 0.03 * noise.sample(rng)).clamp(-1.0, 1.0);
        let soc_v = (0.6 + 0.04 * clay_v - 0.01 * (alt - 50.0) + 0.1 * noise.sample(rng)).max(0.05);
        let ph_v = 5.5 + 0.08 * clay_v - 0.1 * slp + 0.2 * noise.sample(rng);

        altitude.push(alt);
        slope.push(slp);
        era.push(era_v);
        ndvi.push(ndvi_v);
        soc.push(soc_v);
        ph.push(ph_v);
        clay.push(clay_v);
    }

    let dataset = Table::from_columns(vec![
        ("Altitude", altitude),
        ("Slope", slope),
        ("ERa", era),
        ("NDVI", ndvi),
        ("SOC_target", soc),
        ("pH_target", ph),
        ("Clay_target", clay),
    ])?;
    let coordinates = if with_coordinates {
        Some(Table::from_columns(vec![("x_coord", x), ("y_coord", y)])?)
    } else {
        None
    };
    let folds = assign_folds(n, 10, rng);

    Ok(DatasetRecord::new(dataset, folds, coordinates)?)
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| "sample_data".to_string()));
    let seed: u64 = match args.next() {
        Some(s) => s.parse().with_context(|| format!("seed '{s}' is not an integer"))?,
        None => 2025,
    };

    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;
    let mut rng = StdRng::seed_from_u64(seed);

    let outputs = [
        ("SYN_120.parquet", 120, true),
        ("SYN_64.json", 64, true),
        ("SYNP_40.csv", 40, false),
    ];
    for (file, n, with_coordinates) in outputs {
        let record = generate_field(n, with_coordinates, &mut rng)?;
        let path = out_dir.join(file);
        save_file(&record, &path).with_context(|| format!("writing {}", path.display()))?;
        println!(
            "Wrote {} samples ({} columns, coordinates: {with_coordinates}) to {}",
            record.len(),
            record.dataset.n_cols(),
            path.display()
        );
    }

    Ok(())
}
