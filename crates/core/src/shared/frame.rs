use ndarray::ArrayView3;

/// A single camera/stream frame: contiguous bytes in row-major order,
/// either 1-channel grayscale or 3-channel RGB.
///
/// Format conversion happens at I/O boundaries only; the reducer never
/// looks at pixel data, and detectors take whatever plane they need.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Position of this frame within its source sequence.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(
            (
                self.height as usize,
                self.width as usize,
                self.channels as usize,
            ),
            &self.data,
        )
        .expect("Frame data length must match dimensions")
    }

    /// Grayscale plane for classifier input.
    ///
    /// Single-channel frames are returned as-is; RGB frames are converted
    /// with the BT.601 luma weights.
    pub fn to_luma(&self) -> Vec<u8> {
        match self.channels {
            1 => self.data.clone(),
            _ => self
                .data
                .chunks_exact(self.channels as usize)
                .map(|px| {
                    let r = px[0] as f32;
                    let g = px[1] as f32;
                    let b = px[2] as f32;
                    (0.299 * r + 0.587 * g + 0.114 * b).round() as u8
                })
                .collect(),
        }
    }
}
