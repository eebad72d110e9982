use crate::models::Location;

/// Maps byte offsets of one source text to 1-based line/column positions
pub struct LocationConverter {
    /// Byte offset of the first character of every line
    line_starts: Vec<usize>,
    len: usize,
}

impl LocationConverter {
    pub fn new(source: &str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(idx, _)| idx + 1))
            .collect();
        Self {
            line_starts,
            len: source.len(),
        }
    }

    /// Offsets past the end clamp to the end of the text
    pub fn location(&self, offset: usize) -> Location {
        let offset = offset.min(self.len);
        // Lines starting at or before the offset
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let line_start = self.line_starts[line - 1];
        Location::new(line, offset - line_start + 1)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_character_is_line_one_column_one() {
        let converter = LocationConverter::new("line1\nline2\nline3");
        assert_eq!(converter.location(0), Location::new(1, 1));
        assert_eq!(converter.location(4), Location::new(1, 5));
    }

    #[test]
    fn newline_belongs_to_the_line_it_ends() {
        let converter = LocationConverter::new("line1\nline2\nline3");
        assert_eq!(converter.location(5), Location::new(1, 6));
        assert_eq!(converter.location(6), Location::new(2, 1));
        assert_eq!(converter.location(12), Location::new(3, 1));
        assert_eq!(converter.line_count(), 3);
    }

    #[test]
    fn method_inside_class() {
        let converter = LocationConverter::new("class A {\n  run() {}\n}");
        assert_eq!(converter.location(12), Location::new(2, 3));
    }

    #[test]
    fn out_of_range_offsets_clamp() {
        let converter = LocationConverter::new("ab\ncd");
        assert_eq!(converter.location(100), Location::new(2, 3));

        let empty = LocationConverter::new("");
        assert_eq!(empty.location(0), Location::new(1, 1));
        assert_eq!(empty.location(3), Location::new(1, 1));
    }
}
