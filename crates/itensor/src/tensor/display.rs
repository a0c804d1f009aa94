//! Human-readable formatting.

use std::fmt;

use crate::config::PRINT_THRESHOLD;
use crate::counter::Counter;

use super::{ITensor, stored_norm};

/// Header line: log-scale, rank, indices, then length and norm.
impl fmt::Display for ITensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "log_scale = {}, r = {}: {}", self.log_scale, self.rank(), self.indices)?;
        match &self.store {
            None => write!(f, " (storage is null)"),
            Some(d) => write!(
                f,
                " (L={},N={:.2})",
                d.len(),
                stored_norm(d.as_slice()) * self.log_scale.exp()
            ),
        }
    }
}

/// Header plus every element whose stored magnitude exceeds
/// `PRINT_THRESHOLD`, one per line as `(digits) value`.
pub struct DataDisplay<'a>(&'a ITensor);

impl ITensor {
    /// Formatter that also lists the elements.
    ///
    /// ```
    /// use itensor::{ITensor, Index};
    ///
    /// let i = Index::new("i", 3);
    /// let t = ITensor::from_vec(&[i], vec![0.0, 2.0, 0.0]).unwrap();
    /// let text = t.display_data().to_string();
    /// assert!(text.ends_with("(1) 2\n"));
    /// ```
    pub fn display_data(&self) -> DataDisplay<'_> {
        DataDisplay(self)
    }
}

impl fmt::Display for DataDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = self.0;
        writeln!(f, "{t}")?;
        let Some(store) = &t.store else {
            return Ok(());
        };
        let scale = t.scale_factor();
        let data = store.as_slice();
        let mut counter = Counter::new(&t.indices.dims());
        while !counter.is_done() {
            let v = data[counter.offset()];
            if v.abs() > PRINT_THRESHOLD {
                f.write_str("(")?;
                for (n, d) in counter.digits().iter().enumerate() {
                    if n > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{d}")?;
                }
                writeln!(f, ") {}", v * scale)?;
            }
            counter.advance();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::index::Index;
    use crate::tensor::ITensor;

    #[test]
    fn test_header() {
        let i = Index::new("i", 2);
        let t = ITensor::from_vec(&[i], vec![3.0, 4.0]).unwrap();
        let s = t.to_string();
        assert!(s.starts_with("log_scale = 0, r = 1: [(i,2,Link)]"));
        assert!(s.ends_with("(L=2,N=5.00)"));
        assert!(ITensor::null().to_string().ends_with("(storage is null)"));
    }

    #[test]
    fn test_data_lines_skip_small_and_apply_scale() {
        let i = Index::new("i", 2);
        let j = Index::new("j", 2);
        let t = ITensor::from_vec(&[i, j], vec![1.0, 1e-12, 0.0, 2.0]).unwrap() * -1.0;
        let text = t.display_data().to_string();
        let lines: Vec<&str> = text.lines().skip(1).collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("(0 0) -1"));
        assert!(lines[1].starts_with("(1 1) -2"));
    }
}
