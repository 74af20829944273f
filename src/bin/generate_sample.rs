//! Writes a synthetic LED current sweep as SpecWin Pro `.ISD` files.
//!
//! Usage: `generate_sample [OUT_DIR]` (default `sample_sweep/LED1_P1N2`).

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Deterministic Gaussian detector noise: splitmix64 uniforms fed through
/// Box-Muller.
struct Noise {
    state: u64,
    sigma: f64,
}

impl Noise {
    fn new(seed: u64, sigma: f64) -> Self {
        Noise { state: seed, sigma }
    }

    fn uniform(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D1_049B_B133_111E);
        z ^= z >> 31;
        (z >> 11) as f64 / (1u64 << 53) as f64
    }

    fn sample(&mut self) -> f64 {
        let u1 = self.uniform().max(1e-15);
        let u2 = self.uniform();
        self.sigma * (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }
}

/// One `.ISD` file: header, `Data` marker, tab-separated samples.
fn render_isd(current_ma: f64, wavelengths: &[f64], noise: &mut Noise) -> String {
    // Green InGaN emitter: the peak blue-shifts and broadens with current.
    let peak_nm = 528.0 - 2.0 * current_ma.ln_1p();
    let width_nm = 14.0 + 4.0 * current_ma.sqrt();
    let amplitude = 0.35e-3 * current_ma;

    let mut text = String::new();
    text.push_str("[General]\n");
    text.push_str("Software=SpecWin Pro\n");
    text.push_str("RadiometricUnit=W\n");
    text.push_str("Width50 [nm]=0\n");
    text.push_str("[Currentsource]\n");
    let _ = writeln!(text, "Currentsource/SourceCurrent={current_ma}");
    let _ = writeln!(text, "Currentsource/SourceVoltage={:.3}", 2.6 + 0.08 * current_ma.ln_1p());
    text.push_str("[Spectrum]\n");
    let _ = writeln!(text, "NumberOfDataX={}", wavelengths.len());
    text.push_str("Data\n");
    for &wl in wavelengths {
        let power = gaussian(wl, peak_nm, width_nm, amplitude) + noise.sample();
        let _ = writeln!(text, "{wl:.1}\t{power:.6e}");
    }
    text
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_sweep").join("LED1_P1N2"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut noise = Noise::new(42, 2.0e-9);

    // Wavelengths: 380 → 780 nm, step 0.5
    let wavelengths: Vec<f64> = (0..=800).map(|i| 380.0 + i as f64 * 0.5).collect();
    let currents_ma = [0.001, 0.005, 0.01, 0.02, 0.05, 0.1, 0.2, 0.5, 1.0, 2.0];

    for (i, &current) in currents_ma.iter().enumerate() {
        let path = out_dir.join(format!("LED1_P1N2_{i:02}.ISD"));
        std::fs::write(&path, render_isd(current, &wavelengths, &mut noise))
            .with_context(|| format!("writing {}", path.display()))?;
    }

    println!(
        "Wrote {} spectra ({} wavelengths each) to {}",
        currents_ma.len(),
        wavelengths.len(),
        out_dir.display()
    );
    Ok(())
}
