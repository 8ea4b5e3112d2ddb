use std::io::{self, Write};

/// Output sink for encoders that inserts a newline every `width` columns.
///
/// `width == 0` disables wrapping. The column counter belongs to one input
/// stream; construct a fresh wrapper per stream.
pub struct LineWrapper<W: Write> {
    out: W,
    width: usize,
    column: usize,
}

impl<W: Write> LineWrapper<W> {
    pub fn new(out: W, width: usize) -> Self {
        Self {
            out,
            width,
            column: 0,
        }
    }

    /// Characters written since the last line break.
    #[inline]
    pub fn column(&self) -> usize {
        self.column
    }

    /// Write symbols with the wrap checked after every character, so no line
    /// exceeds `width`. Runs are copied whole up to each line boundary.
    pub fn write_symbols(&mut self, mut data: &[u8]) -> io::Result<()> {
        if self.width == 0 {
            self.column += data.len();
            return self.out.write_all(data);
        }

        while !data.is_empty() {
            let space = self.width - self.column;
            if data.len() < space {
                self.out.write_all(data)?;
                self.column += data.len();
                break;
            }
            self.out.write_all(&data[..space])?;
            self.out.write_all(b"\n")?;
            self.column = 0;
            data = &data[space..];
        }
        Ok(())
    }

    /// Write a multi-character unit and check the wrap once after it.
    /// Lines may run past `width` by up to `group.len() - 1` characters.
    pub fn write_group(&mut self, group: &[u8]) -> io::Result<()> {
        self.out.write_all(group)?;
        self.column += group.len();
        if self.width > 0 && self.column >= self.width {
            self.out.write_all(b"\n")?;
            self.column = 0;
        }
        Ok(())
    }

    /// End the stream: a final line break if wrapping left a line open.
    pub fn finish(mut self) -> io::Result<W> {
        if self.width > 0 && self.column > 0 {
            self.out.write_all(b"\n")?;
        }
        Ok(self.out)
    }
}
