use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

/// Write a synthetic benchmark data set laid out the way the harness does.
#[derive(Parser, Debug)]
#[command(name = "generate_sample")]
struct Args {
    /// Root directory; `experiments/`, `frequency_distribution/...` and
    /// `filtrado/` go below it.
    #[arg(long, default_value = "data")]
    out: PathBuf,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

const KS: [u32; 3] = [11, 21, 31];
const QUANTILES: usize = 200;

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

fn write_csv(path: &Path, headers: &[&str], rows: &[Vec<f64>]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row.iter().map(|v| v.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

/// Query latency in ns: the plain vector scans, the others are cheaper.
fn query_rows(rng: &mut SimpleRng, base_ns: f64, k: u32) -> Vec<Vec<f64>> {
    (0..QUANTILES)
        .map(|i| {
            let q = i as f64 / (QUANTILES - 1) as f64;
            let scale = base_ns * (1.0 + k as f64 / 40.0);
            let quantile_mean = scale * (1.0 + q) + rng.gauss(0.0, scale * 0.1);
            let rank_mean = scale * (2.0 - q) + rng.gauss(0.0, scale * 0.1);
            vec![
                q,
                quantile_mean.max(1.0),
                (scale * 0.05 + rng.gauss(0.0, scale * 0.01)).abs(),
                rank_mean.max(1.0),
                (scale * 0.05 + rng.gauss(0.0, scale * 0.01)).abs(),
            ]
        })
        .collect()
}

/// Real vs estimated frequency/rank; low quantiles have frequency 0.
fn distribution_rows(rng: &mut SimpleRng, k: u32) -> Vec<Vec<f64>> {
    let noise = 0.5 + k as f64 / 20.0;
    (0..QUANTILES)
        .map(|i| {
            let q = i as f64 / (QUANTILES - 1) as f64;
            let real_quantile = if q < 0.1 { 0.0 } else { (q * 50.0).powi(2).floor() };
            let estimated_quantile = (real_quantile + rng.gauss(0.0, noise)).max(0.0).round();
            let real_rank = (q * 10_000.0).floor();
            let estimated_rank = (real_rank + rng.gauss(0.0, noise * 10.0)).max(0.0).round();
            vec![q, real_quantile, estimated_quantile, real_rank, estimated_rank]
        })
        .collect()
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    let experiments = args.out.join("experiments");
    let distributions = args
        .out
        .join("frequency_distribution")
        .join("NB_100_BC_10_CS_100");
    std::fs::create_dir_all(&experiments).context("creating experiments dir")?;
    std::fs::create_dir_all(&distributions).context("creating distribution dir")?;

    let structures = [("plain_v", 400.0), ("compressed_v", 120.0), ("sketch", 40.0)];
    let query_headers = [
        "quantile",
        "quantile_t_mean",
        "quantile_t_stdev",
        "rank_t_mean",
        "rank_t_stdev",
    ];
    for k in KS {
        for (tag, base_ns) in structures {
            let path = experiments.join(format!("consultas_{tag}_k{k}.csv"));
            write_csv(&path, &query_headers, &query_rows(&mut rng, base_ns, k))?;
        }
    }

    for (tag, base_ns) in structures {
        let rows: Vec<Vec<f64>> = KS
            .iter()
            .map(|&k| {
                let mean = base_ns * 1e7 * k as f64;
                vec![k as f64, mean, (mean * 0.05 + rng.gauss(0.0, mean * 0.01)).abs()]
            })
            .collect();
        let path = experiments.join(format!("construccion_{tag}.csv"));
        write_csv(&path, &["n", "t_mean", "t_stdev"], &rows)?;
    }

    for k in KS {
        let path = distributions.join(format!("{k}mers_distribution.csv"));
        write_csv(
            &path,
            &[
                "quantile",
                "real_quantile",
                "estimated_quantile",
                "real_rank",
                "estimated_rank",
            ],
            &distribution_rows(&mut rng, k),
        )?;

        let elements = 1_000_000.0 * k as f64;
        let unique = elements / 4.0;
        let memory = vec![vec![
            elements,
            unique,
            2048.0 * k as f64,
            unique * 8.0,
            unique * 2.5,
        ]];
        let path = distributions.join(format!("{k}mers_memory.csv"));
        write_csv(
            &path,
            &[
                "elements",
                "unique_elements",
                "sketch_memory",
                "vector_memory",
                "compressed_vector_memory",
            ],
            &memory,
        )?;
    }

    let filtering = args.out.join("filtrado");
    std::fs::create_dir_all(&filtering).context("creating filtering dir")?;
    let filter_rows: Vec<Vec<f64>> = KS
        .iter()
        .map(|&k| {
            let elements = 50_000_000.0 * k as f64;
            let eliminated = (elements * 0.3 + rng.gauss(0.0, elements * 0.01)).round();
            vec![
                k as f64,
                0.05,
                0.95,
                2.0,
                (40.0 + k as f64).round(),
                elements,
                (eliminated * 0.8).round(),
                eliminated,
            ]
        })
        .collect();
    write_csv(
        &filtering.join("resultados_filtro_genomas.csv"),
        &[
            "k",
            "lower_quantile",
            "upper_quantile",
            "lower_bound",
            "upper_bound",
            "elements",
            "unique_elim_e",
            "elim_e",
        ],
        &filter_rows,
    )?;

    println!(
        "Wrote sample data for K = {KS:?} to {}, {} and {}",
        experiments.display(),
        distributions.display(),
        filtering.display()
    );
    Ok(())
}
