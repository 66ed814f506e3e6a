//! LZW variant of IBM's DSK diskette images.
//!
//! Differences from the compress family:
//!
//! - fixed 12-bit codes, packed MSB-first, two codes per three bytes
//! - code 0 ends the stream; codes 1..=256 are the literal bytes 0..=255
//! - the table never clears. Once every code is in use, each new string
//!   replaces the least recently built entry that no other entry extends.
//!
//! Every entry is a (prefix, last byte) pair. An entry that is the prefix
//! of another is pinned with a use count and leaves the eviction list until
//! its last extension is evicted, so prefix chains stay valid.

use log::{debug, trace};
use retrodec_core::error::{DecodeError, Result};
use retrodec_core::filter::Decoder;
use retrodec_core::output::Output;

/// Code that ends a DSK stream.
pub const DSK_STOP_CODE: u16 = 0;

/// First code assigned to a built string.
pub const DSK_FIRST_DYNAMIC: u16 = 257;

/// Number of codes 12-bit codes can address.
pub const DSK_MAX_TABLE: u16 = 4096;

/// Longest string a code may stand for.
const MAX_STRING_LEN: u16 = 4096;

/// "No entry" marker in the eviction list. Code 0 never names a string.
const NIL: u16 = 0;

/// DSK LZW configuration parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DskLzwConfig {
    /// Number of codes in the table, literals included (258..=4096).
    pub table_size: u16,
}

impl Default for DskLzwConfig {
    fn default() -> Self {
        Self::DSK
    }
}

impl DskLzwConfig {
    /// The table used by DSK images.
    pub const DSK: Self = Self {
        table_size: DSK_MAX_TABLE,
    };

    /// Create a configuration.
    pub fn new(table_size: u16) -> Self {
        Self { table_size }
    }

    /// Check that the parameters are usable.
    pub fn validate(&self) -> Result<()> {
        if !(DSK_FIRST_DYNAMIC + 1..=DSK_MAX_TABLE).contains(&self.table_size) {
            return Err(DecodeError::invalid_parameter(format!(
                "table_size must be in {}..={DSK_MAX_TABLE}, got {}",
                DSK_FIRST_DYNAMIC + 1,
                self.table_size
            )));
        }
        Ok(())
    }
}

fn bad_data() -> DecodeError {
    DecodeError::invalid_data("Bad compressed data")
}

/// Reads 12-bit codes: `AA AB BB` holds codes `AAA` and `BBB`.
struct CodeReader<'a> {
    data: &'a [u8],
    pos: usize,
    hold: u8,
    high: bool,
}

impl<'a> CodeReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            hold: 0,
            high: true,
        }
    }

    /// Bytes past the end read as zero; only the start of a code checks
    /// for end of input.
    fn byte(&mut self) -> u8 {
        let b = self.data.get(self.pos).copied().unwrap_or(0);
        self.pos += 1;
        b
    }

    fn next_code(&mut self) -> Option<u16> {
        if self.pos >= self.data.len() {
            return None;
        }
        let code = if self.high {
            let hi = u16::from(self.byte()) << 4;
            self.hold = self.byte();
            hi | u16::from(self.hold >> 4)
        } else {
            (u16::from(self.hold & 0x0F) << 8) | u16::from(self.byte())
        };
        self.high = !self.high;
        Some(code)
    }

    fn bytes_consumed(&self) -> u64 {
        self.pos.min(self.data.len()) as u64
    }
}

/// Code table with least-recently-built eviction.
#[derive(Debug, Clone)]
struct DskTable {
    prefix: Vec<u16>,
    last: Vec<u8>,
    first: Vec<u8>,
    len: Vec<u16>,
    /// Cleared on eviction. `len` is kept, so a stale prefix is detectable.
    present: Vec<bool>,
    /// Extensions pinning the entry. Literals start at 1 and never drop
    /// below it.
    usecount: Vec<u32>,
    older: Vec<u16>,
    newer: Vec<u16>,
    oldest: u16,
    newest: u16,
    evictions: u64,
}

impl DskTable {
    fn new(table_size: u16) -> Self {
        let size = usize::from(table_size);
        let mut table = Self {
            prefix: vec![NIL; size],
            last: vec![0; size],
            first: vec![0; size],
            len: vec![0; size],
            present: vec![false; size],
            usecount: vec![0; size],
            older: vec![NIL; size],
            newer: vec![NIL; size],
            oldest: NIL,
            newest: NIL,
            evictions: 0,
        };
        for code in 1..=256u16 {
            let c = usize::from(code);
            let byte = (code - 1) as u8;
            table.last[c] = byte;
            table.first[c] = byte;
            table.len[c] = 1;
            table.present[c] = true;
            table.usecount[c] = 1;
        }
        for code in DSK_FIRST_DYNAMIC..table_size {
            table.push_newest(code);
        }
        table
    }

    fn size(&self) -> usize {
        self.len.len()
    }

    fn push_newest(&mut self, code: u16) {
        let c = usize::from(code);
        self.older[c] = self.newest;
        self.newer[c] = NIL;
        if self.newest == NIL {
            self.oldest = code;
        } else {
            self.newer[usize::from(self.newest)] = code;
        }
        self.newest = code;
    }

    fn unlink(&mut self, code: u16) {
        let c = usize::from(code);
        let (older, newer) = (self.older[c], self.newer[c]);
        if code == self.newest {
            self.newest = older;
        } else if newer != NIL {
            self.older[usize::from(newer)] = older;
        }
        if code == self.oldest {
            self.oldest = newer;
        } else if older != NIL {
            self.newer[usize::from(older)] = newer;
        }
        self.older[c] = NIL;
        self.newer[c] = NIL;
    }

    /// Take the oldest unpinned entry and release its hold on its prefix.
    fn evict_oldest(&mut self) -> Option<u16> {
        let code = self.oldest;
        if code == NIL {
            return None;
        }
        self.unlink(code);
        let c = usize::from(code);
        let prefix = self.prefix[c];
        if prefix != NIL {
            let p = usize::from(prefix);
            self.usecount[p] = self.usecount[p].saturating_sub(1);
            if self.usecount[p] == 0 {
                self.push_newest(prefix);
            }
        }
        self.prefix[c] = NIL;
        self.present[c] = false;
        if self.len[c] > 0 {
            self.evictions += 1;
        }
        Some(code)
    }

    /// Pin `code` as the prefix of one more entry.
    fn reserve(&mut self, code: u16) {
        let c = usize::from(code);
        if self.usecount[c] > 0 {
            self.usecount[c] += 1;
        } else {
            self.unlink(code);
            self.usecount[c] = 1;
        }
    }

    /// Build the entry announced by reading `newcode` after `oldcode`: the
    /// string of `oldcode` plus the first byte of `newcode`'s string.
    fn build(&mut self, oldcode: u16, newcode: u16) -> Result<()> {
        let entry = self.evict_oldest().ok_or_else(bad_data)?;
        let old = usize::from(oldcode);
        let newlen = self.len[old] + 1;
        if newlen > MAX_STRING_LEN {
            return Err(bad_data());
        }
        if newlen > 1 && !self.present[old] {
            return Err(bad_data());
        }
        // KwKwK: the code being read is the one being built right now
        let source = if newcode != entry { newcode } else { oldcode };
        if !self.present[usize::from(source)] {
            return Err(bad_data());
        }
        let byte = self.first[usize::from(source)];

        let e = usize::from(entry);
        self.last[e] = byte;
        self.len[e] = newlen;
        self.present[e] = true;
        if newlen > 1 {
            self.prefix[e] = oldcode;
            self.first[e] = self.first[old];
            self.reserve(oldcode);
        } else {
            self.first[e] = byte;
        }
        self.push_newest(entry);
        Ok(())
    }

    /// Write the string for `code` into `string`. Unbuilt codes are empty.
    fn expand(&self, code: u16, string: &mut Vec<u8>) {
        string.clear();
        let c = usize::from(code);
        if !self.present[c] {
            return;
        }
        let len = usize::from(self.len[c]);
        string.resize(len, 0);
        let mut cur = c;
        for slot in string.iter_mut().rev() {
            *slot = self.last[cur];
            cur = usize::from(self.prefix[cur]);
        }
    }
}

/// DSK LZW decoder.
#[derive(Debug, Clone)]
pub struct DskLzwDecoder {
    config: DskLzwConfig,
}

impl DskLzwDecoder {
    /// Create a decoder. Fails if the configuration is invalid.
    pub fn new(config: DskLzwConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration in use.
    pub fn config(&self) -> DskLzwConfig {
        self.config
    }
}

impl Decoder for DskLzwDecoder {
    fn name(&self) -> &'static str {
        "dskdcmprs"
    }

    fn decode(&mut self, input: &[u8], out: &mut Output<'_>) -> Result<Option<u64>> {
        let mut table = DskTable::new(self.config.table_size);
        let mut codes = CodeReader::new(input);
        let mut string = Vec::with_capacity(256);
        let mut oldcode = NIL;

        while !out.is_full() {
            let Some(newcode) = codes.next_code() else {
                break;
            };
            if newcode == DSK_STOP_CODE {
                trace!("dskdcmprs: stop code at {}", codes.bytes_consumed());
                break;
            }
            if usize::from(newcode) >= table.size() {
                debug!("dskdcmprs: code {newcode} outside a {} entry table", table.size());
                return Err(bad_data());
            }
            if oldcode != NIL {
                table.build(oldcode, newcode)?;
            }
            table.expand(newcode, &mut string);
            out.write(&string);
            oldcode = newcode;
        }

        debug!(
            "dskdcmprs: {} bytes out, {} evictions",
            out.len(),
            table.evictions
        );
        Ok(Some(codes.bytes_consumed()))
    }
}
