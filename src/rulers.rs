//! Tick layout for the pixel rulers drawn along the image edges.
//!
//! Positions are in original-image pixels; the canvas maps them through the display
//! scale so labels keep reading in source pixels at any zoom.

pub const RULER_THICKNESS: f32 = 30.0;

const TICK_STEP: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tick {
    pub position: u32,
    pub length: u32,
    /// Only major ticks carry a label.
    pub labelled: bool,
}

pub fn ticks(extent: u32) -> Vec<Tick> {
    (0..=extent)
        .step_by(TICK_STEP as usize)
        .map(|position| {
            let major = position % 100 == 0;
            let length = if major {
                15
            } else if position % 50 == 0 {
                10
            } else {
                5
            };
            Tick {
                position,
                length,
                labelled: major,
            }
        })
        .collect()
}
