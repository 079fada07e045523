use crate::canvas::{PixelSource, Rgb};
use crate::wire::WireOrder;

/// Trailing byte of every frame: tells the receiver the buffer is
/// complete and should be flipped to the display.
pub const SYNC_BYTE: u8 = 0x01;

/// Encode one frame: RGB triples in wire order, then the sync byte.
///
/// A wire-order coordinate outside the surface's bounds encodes as black
/// rather than failing the frame. Stateless; the returned buffer is
/// always exactly `3 * pixel_count + 1` bytes.
pub fn encode<S: PixelSource + ?Sized>(source: &S, order: &WireOrder) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(order.len() * 3 + 1);
    let (width, height) = (source.width(), source.height());
    for (x, y) in order.iter() {
        let rgb = if x < width && y < height {
            source.pixel(x, y)
        } else {
            Rgb::BLACK
        };
        buffer.push(clamp_channel(rgb.r));
        buffer.push(clamp_channel(rgb.g));
        buffer.push(clamp_channel(rgb.b));
    }
    buffer.push(SYNC_BYTE);
    buffer
}

// The receiver treats a literal 0x01 anywhere in the colour stream as
// the frame sync marker, and long runs of all-1 bits (0xFF) have been
// seen to desynchronise its bit clock. Both values are shifted to the
// nearest safe neighbour.
fn clamp_channel(value: u8) -> u8 {
    match value {
        1 => 2,
        255 => 254,
        other => other,
    }
}
