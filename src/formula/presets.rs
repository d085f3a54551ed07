//! Built-in bytebeat formulas
//!
//! A small registry of classic single-expression formulas plus two that
//! exercise the channel register and the scratch bank. All arithmetic is
//! wrapping unsigned 32-bit; the driver keeps only the low 8 bits of each
//! result.

use super::{Reg, Registers};

/// Signature of a built-in formula
pub type PresetFn = fn(u32, &mut Registers) -> u32;

/// Registry of built-in formulas; the first entry is the default
pub const PRESETS: &[(&str, PresetFn)] = &[
    ("melody", melody),
    ("sierpinski", sierpinski),
    ("glitch", glitch),
    ("stereo", stereo),
    ("scratch", scratch),
];

/// Look up a built-in formula by name
pub fn by_name(name: &str) -> Option<PresetFn> {
    PRESETS
        .iter()
        .find(|(preset_name, _)| *preset_name == name)
        .map(|(_, formula)| *formula)
}

/// Names of all built-in formulas, in registry order
pub fn names() -> Vec<&'static str> {
    PRESETS.iter().map(|(name, _)| *name).collect()
}

/// `t*(42&t>>10)` - the "forty-two melody"
fn melody(t: u32, _regs: &mut Registers) -> u32 {
    t.wrapping_mul(42 & (t >> 10))
}

/// `t&t>>8` - Sierpinski harmony
fn sierpinski(t: u32, _regs: &mut Registers) -> u32 {
    t & (t >> 8)
}

/// `(t*5&t>>7)|(t*3&t>>10)` - overlapping glitch voices
fn glitch(t: u32, _regs: &mut Registers) -> u32 {
    (t.wrapping_mul(5) & (t >> 7)) | (t.wrapping_mul(3) & (t >> 10))
}

/// Channel-aware variant of the glitch voice: the second channel runs one
/// multiplier step higher, detuning it against the first.
fn stereo(t: u32, regs: &mut Registers) -> u32 {
    let multiplier = 5 + regs[Reg::C];
    t.wrapping_mul(multiplier) & (t >> 7)
}

/// Builds its voice through the scratch bank: `a` holds a feedback term,
/// `b` a gated copy, the sample is their union.
fn scratch(t: u32, regs: &mut Registers) -> u32 {
    regs[Reg::A] = t ^ (t >> 6);
    regs[Reg::B] = regs[Reg::A].wrapping_mul((t >> 11) & 3);
    regs[Reg::A] | regs[Reg::B]
}
