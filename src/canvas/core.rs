/// 24-bit colour with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::from_hex(0x000000);
    pub const WHITE: Rgb = Rgb::from_hex(0xFFFFFF);
    pub const RED: Rgb = Rgb::from_hex(0xFF0000);
    pub const GREEN: Rgb = Rgb::from_hex(0x00FF00);
    pub const BLUE: Rgb = Rgb::from_hex(0x0000FF);
    pub const YELLOW: Rgb = Rgb::from_hex(0xFFFF00);
    pub const MAGENTA: Rgb = Rgb::from_hex(0xFF00FF);
    pub const CYAN: Rgb = Rgb::from_hex(0x00FFFF);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Unpack a packed `0xRRGGBB` value.
    pub const fn from_hex(value: u32) -> Self {
        Self {
            r: (value >> 16) as u8,
            g: (value >> 8) as u8,
            b: value as u8,
        }
    }

    pub const fn to_hex(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

/// Read-only pixel access the frame encoder needs from a surface.
///
/// The encoder checks bounds itself and substitutes black for anything
/// outside them, so `pixel` is only ever called with in-range
/// coordinates.
pub trait PixelSource {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn pixel(&self, x: u32, y: u32) -> Rgb;
}

/// Drawable surface covering the logical floor coordinate range.
///
/// Writes outside the surface are silently dropped, so drawing code can
/// run shapes off the edge of the floor without bounds arithmetic.
#[derive(Debug, Clone)]
pub struct FloorCanvas {
    width: u32,
    height: u32,
    data: Vec<Rgb>,
}

impl FloorCanvas {
    /// Create a canvas cleared to black.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_colour(width, height, Rgb::BLACK)
    }

    pub fn with_colour(width: u32, height: u32, colour: Rgb) -> Self {
        Self {
            width,
            height,
            data: vec![colour; (width * height) as usize],
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn in_range(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, colour: Rgb) {
        if x < self.width && y < self.height {
            self.data[(y * self.width + x) as usize] = colour;
        }
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x < self.width && y < self.height {
            Some(self.data[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Clear the whole canvas to a single colour.
    pub fn fill(&mut self, colour: Rgb) {
        self.data.fill(colour);
    }

    /// Draw a straight line between two cells, stepping along whichever
    /// axis has the most pixels so the line has no gaps. Endpoints may
    /// lie off the canvas.
    pub fn draw_line(&mut self, from_x: i64, from_y: i64, to_x: i64, to_y: i64, colour: Rgb) {
        if from_x == to_x && from_y == to_y {
            self.set_pixel_signed(from_x, from_y, colour);
            return;
        }

        if (from_x - to_x).abs() > (from_y - to_y).abs() {
            let (from_x, from_y, to_x, to_y) = if to_x < from_x {
                (to_x, to_y, from_x, from_y)
            } else {
                (from_x, from_y, to_x, to_y)
            };
            let gradient = (to_y - from_y) as f64 / (to_x - from_x) as f64;
            for step in 0..=(to_x - from_x) {
                let y = gradient * step as f64 + from_y as f64;
                self.set_pixel_signed(from_x + step, y as i64, colour);
            }
        } else {
            let (from_x, from_y, to_x, to_y) = if to_y < from_y {
                (to_x, to_y, from_x, from_y)
            } else {
                (from_x, from_y, to_x, to_y)
            };
            let gradient = (to_x - from_x) as f64 / (to_y - from_y) as f64;
            for step in 0..=(to_y - from_y) {
                let x = gradient * step as f64 + from_x as f64;
                self.set_pixel_signed(x as i64, from_y + step, colour);
            }
        }
    }

    fn set_pixel_signed(&mut self, x: i64, y: i64, colour: Rgb) {
        if self.in_range(x, y) {
            self.set_pixel(x as u32, y as u32, colour);
        }
    }
}

impl PixelSource for FloorCanvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel(&self, x: u32, y: u32) -> Rgb {
        self.data[(y * self.width + x) as usize]
    }
}
