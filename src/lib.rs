//! Procedural Android launcher icon generator.
//!
//! Renders a diagonal colour ramp with a centred letter and writes it as
//! `ic_launcher.png` / `ic_launcher_round.png` for each mipmap density.

pub mod density;
pub mod glyph;
pub mod icon_gen;
pub mod logger;
