use std::io::{BufRead, BufReader, Lines, Read};

/// Yields JSON transfer requests, one per non-blank line, with their
/// 1-based line number. Decoding is left to the engine.
pub struct RequestReader<R> {
    lines: Lines<BufReader<R>>,
    line: u64,
}

impl<R> RequestReader<R>
where
    R: Read,
{
    pub fn new(source: R) -> Self {
        Self {
            lines: BufReader::new(source).lines(),
            line: 0,
        }
    }
}

impl<R> Iterator for RequestReader<R>
where
    R: Read,
{
    type Item = std::io::Result<(u64, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.line += 1;
            match self.lines.next()? {
                Ok(text) if text.trim().is_empty() => continue,
                Ok(text) => return Some(Ok((self.line, text))),
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_blank_lines() {
        let input = "{\"a\": 1}\n\n   \n{\"b\": 2}\n";
        let rows: Vec<_> = RequestReader::new(input.as_bytes())
            .map(Result::unwrap)
            .collect();
        assert_eq!(
            rows,
            vec![(1, "{\"a\": 1}".to_string()), (4, "{\"b\": 2}".to_string())]
        );
    }
}
