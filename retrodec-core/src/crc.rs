//! CRC digests for checking decompressed data.
//!
//! - **CRC-32 (ISO 3309)**: StuffIt 5, ZIP-era tools.
//! - **CRC-16/ARC**: ARC, LHA, StuffIt 1.x members.
//!
//! Both are meant to be fed from an [`Output`](crate::output::Output) write
//! listener, so the checksum is computed over exactly the bytes written:
//!
//! ```
//! use retrodec_core::crc::Crc16;
//! use retrodec_core::output::Output;
//!
//! let mut buf = Vec::new();
//! let mut crc = Crc16::new();
//! {
//!     let mut out = Output::new(&mut buf).with_listener(|data: &[u8]| crc.update(data));
//!     out.write(b"123456789");
//! }
//! assert_eq!(crc.value(), 0xBB3D);
//! ```

/// CRC-32 lookup table (polynomial 0xEDB88320, reflected).
const CRC32_TABLE: [u32; 256] = {
    let mut table = [0u32; 256];
    let mut i = 0usize;
    while i < 256 {
        let mut crc = i as u32;
        let mut j = 0;
        while j < 8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ 0xEDB88320;
            } else {
                crc >>= 1;
            }
            j += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
};

/// CRC-16/ARC lookup table (polynomial 0xA001, reflected).
const CRC16_TABLE: [u16; 256] = {
    let mut table = [0u16; 256];
    let mut i = 0usize;
    while i < 256 {
        let mut crc = i as u16;
        let mut j = 0;
        while j < 8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ 0xA001;
            } else {
                crc >>= 1;
            }
            j += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
};

/// Running CRC-32.
#[derive(Debug, Clone, Copy)]
pub struct Crc32 {
    state: u32,
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

impl Crc32 {
    /// Start a new digest.
    pub fn new() -> Self {
        Self { state: 0xFFFF_FFFF }
    }

    /// Restart from scratch.
    pub fn reset(&mut self) {
        self.state = 0xFFFF_FFFF;
    }

    /// Feed more data.
    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            let index = ((self.state ^ u32::from(byte)) & 0xFF) as usize;
            self.state = (self.state >> 8) ^ CRC32_TABLE[index];
        }
    }

    /// CRC of everything fed so far.
    pub fn value(&self) -> u32 {
        self.state ^ 0xFFFF_FFFF
    }

    /// One-shot CRC of `data`.
    pub fn compute(data: &[u8]) -> u32 {
        let mut crc = Self::new();
        crc.update(data);
        crc.value()
    }
}

/// Running CRC-16/ARC.
#[derive(Debug, Clone, Copy, Default)]
pub struct Crc16 {
    state: u16,
}

impl Crc16 {
    /// Start a new digest.
    pub fn new() -> Self {
        Self { state: 0 }
    }

    /// Restart from scratch.
    pub fn reset(&mut self) {
        self.state = 0;
    }

    /// Feed more data.
    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            let index = ((self.state ^ u16::from(byte)) & 0xFF) as usize;
            self.state = (self.state >> 8) ^ CRC16_TABLE[index];
        }
    }

    /// CRC of everything fed so far.
    pub fn value(&self) -> u16 {
        self.state
    }

    /// One-shot CRC of `data`.
    pub fn compute(data: &[u8]) -> u16 {
        let mut crc = Self::new();
        crc.update(data);
        crc.value()
    }
}
