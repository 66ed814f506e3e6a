//! LZSS window configuration for the classic (Okumura) dialect.

/// Window size shared by every supported LZSS dialect.
pub const WINDOW_SIZE: usize = 4096;

/// Configuration for [`LzssDecoder`](crate::LzssDecoder).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LzssConfig {
    /// Start writing at `4096 - 16` instead of `4096 - 18`.
    pub szdd_start_offset: bool,
    /// Preload the LArc "lz5" dictionary instead of filling the window
    /// with spaces.
    pub lz5_window: bool,
}

impl LzssConfig {
    /// Okumura's LZSS.C, also used by many DOS-era archivers.
    pub const OKUMURA: Self = Self {
        szdd_start_offset: false,
        lz5_window: false,
    };

    /// Microsoft SZDD ("COMPRESS.EXE") files.
    pub const SZDD: Self = Self {
        szdd_start_offset: true,
        lz5_window: false,
    };

    /// LArc method lz5.
    pub const LZ5: Self = Self {
        szdd_start_offset: false,
        lz5_window: true,
    };

    /// Initial window cursor.
    pub fn start_pos(&self) -> usize {
        if self.szdd_start_offset {
            WINDOW_SIZE - 16
        } else {
            WINDOW_SIZE - 18
        }
    }
}
