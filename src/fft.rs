//! In-place radix-2 Cooley-Tukey FFT over 2048-sample real frames.
//!
//! This is hand-rolled rather than delegated to an FFT crate: bit-for-bit
//! reproducibility across implementations depends on a fixed butterfly
//! order and twiddle-factor computation, which an off-the-shelf FFT crate
//! doesn't contractually guarantee.

use std::f32::consts::PI;
use std::sync::OnceLock;

use crate::config::SAMPLES_PER_FRAME;

const FFT_BITS: u32 = 11; // 2^11 == 2048

fn reverse_bits(mut n: u16) -> u16 {
    let mut res = 0u16;
    for _ in 0..FFT_BITS {
        res = (res << 1) | (n & 1);
        n >>= 1;
    }
    res
}

fn bit_reversal_table() -> &'static [u16; SAMPLES_PER_FRAME] {
    static TABLE: OnceLock<[u16; SAMPLES_PER_FRAME]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = [0u16; SAMPLES_PER_FRAME];
        for (i, slot) in table.iter_mut().enumerate() {
            *slot = reverse_bits(i as u16);
        }
        table
    })
}

/// Forces eager initialization of the bit-reversal table.
pub fn init() {
    bit_reversal_table();
}

/// Complex FFT scratch buffers, reused across a worker's assigned frame
/// range so we never allocate inside the inner loop.
pub struct FftScratch {
    real: [f32; SAMPLES_PER_FRAME],
    imaginary: [f32; SAMPLES_PER_FRAME],
}

impl Default for FftScratch {
    fn default() -> Self {
        Self::new()
    }
}

impl FftScratch {
    pub fn new() -> Self {
        Self {
            real: [0.0; SAMPLES_PER_FRAME],
            imaginary: [0.0; SAMPLES_PER_FRAME],
        }
    }

    /// Computes the FFT of `source` (a windowed frame of SAMPLES_PER_FRAME
    /// real samples), leaving the result in `self.real`/`self.imaginary`.
    pub fn transform(&mut self, source: &[f32; SAMPLES_PER_FRAME]) {
        self.real.copy_from_slice(source);
        self.imaginary.fill(0.0);
        self.inplace_fft();
    }

    pub fn real(&self) -> &[f32; SAMPLES_PER_FRAME] {
        &self.real
    }

    pub fn imaginary(&self) -> &[f32; SAMPLES_PER_FRAME] {
        &self.imaginary
    }

    fn inplace_fft(&mut self) {
        let reversed = bit_reversal_table();
        for k in 0..SAMPLES_PER_FRAME {
            let j = reversed[k] as usize;
            if j > k {
                self.real.swap(j, k);
                self.imaginary.swap(j, k);
            }
        }

        let mut l = 2usize;
        while l <= SAMPLES_PER_FRAME {
            for k in 0..l / 2 {
                let kth = -2.0 * k as f32 * PI / l as f32;
                let w_real = kth.cos();
                let w_imaginary = kth.sin();
                let mut j = 0;
                while j < SAMPLES_PER_FRAME / l {
                    let index = j * l + k + l / 2;
                    let index2 = j * l + k;

                    let tao_real = w_real * self.real[index] - w_imaginary * self.imaginary[index];
                    let tao_imaginary =
                        w_real * self.imaginary[index] + w_imaginary * self.real[index];

                    self.real[index] = self.real[index2] - tao_real;
                    self.imaginary[index] = self.imaginary[index2] - tao_imaginary;

                    self.real[index2] += tao_real;
                    self.imaginary[index2] += tao_imaginary;

                    j += 1;
                }
            }
            l *= 2;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dc_signal_has_energy_only_in_bin_zero() {
        let source = [1.0f32; SAMPLES_PER_FRAME];
        let mut scratch = FftScratch::new();
        scratch.transform(&source);
        assert!((scratch.real()[0] - SAMPLES_PER_FRAME as f32).abs() < 1e-2);
        for i in 1..SAMPLES_PER_FRAME {
            assert!(scratch.real()[i].abs() < 1e-1, "bin {i} leaked energy");
            assert!(scratch.imaginary()[i].abs() < 1e-1, "bin {i} leaked energy");
        }
    }

    #[test]
    fn zero_signal_transforms_to_zero() {
        let source = [0.0f32; SAMPLES_PER_FRAME];
        let mut scratch = FftScratch::new();
        scratch.transform(&source);
        assert!(scratch.real().iter().all(|&v| v == 0.0));
        assert!(scratch.imaginary().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn pure_tone_peaks_at_expected_bin() {
        // A tone at bin k (amplitude 1) over N samples is sin(2*pi*k*n/N).
        let k = 100;
        let mut source = [0.0f32; SAMPLES_PER_FRAME];
        for (n, sample) in source.iter_mut().enumerate() {
            *sample = (2.0 * PI * k as f32 * n as f32 / SAMPLES_PER_FRAME as f32).sin();
        }
        let mut scratch = FftScratch::new();
        scratch.transform(&source);
        let magnitude = |i: usize| {
            let re = scratch.real()[i];
            let im = scratch.imaginary()[i];
            re * re + im * im
        };
        let peak_bin = (0..SAMPLES_PER_FRAME / 2)
            .max_by(|&a, &b| magnitude(a).partial_cmp(&magnitude(b)).unwrap())
            .unwrap();
        assert_eq!(peak_bin, k);
    }
}
