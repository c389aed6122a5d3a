//! Named sample series sharing one time axis.

use core::fmt;

use ct_core::Points;

use crate::error::DataResult;
use crate::format::{Csv, Dat, Format};
use crate::merge::merge_rows;

/// One column of a [`Data`] bundle.
pub struct DataContent<'a> {
    pub name: String,
    pub unit: String,
    /// Must be strictly ascending in `x`.
    pub points: Points<'a>,
}

impl<'a> DataContent<'a> {
    pub fn new(name: impl Into<String>, unit: impl Into<String>, points: Points<'a>) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            points,
        }
    }
}

impl fmt::Debug for DataContent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataContent")
            .field("name", &self.name)
            .field("unit", &self.unit)
            .finish_non_exhaustive()
    }
}

/// Series to be written as one table.
///
/// The streams are consumed by writing, so a bundle can be written once.
#[derive(Debug, Default)]
pub struct Data<'a> {
    /// The time column holds unix seconds.
    pub time_is_date: bool,
    pub time_unit: String,
    pub content: Vec<DataContent<'a>>,
}

impl<'a> Data<'a> {
    pub fn new(time_unit: impl Into<String>) -> Self {
        Self {
            time_is_date: false,
            time_unit: time_unit.into(),
            content: Vec::new(),
        }
    }

    pub fn with_date_time(mut self) -> Self {
        self.time_is_date = true;
        self
    }

    pub fn add(&mut self, content: DataContent<'a>) -> &mut Self {
        self.content.push(content);
        self
    }

    /// Tab separated text, `-` for a missing sample.
    pub fn dat_file(self) -> DataResult<String> {
        self.write_file(&Dat)
    }

    /// Quoted comma separated text, `""` for a missing sample.
    pub fn csv_file(self) -> DataResult<String> {
        let csv = Csv {
            is_date: self.time_is_date,
        };
        self.write_file(&csv)
    }

    pub fn write_file<F: Format>(self, format: &F) -> DataResult<String> {
        let mut out = String::new();
        format.write_header(&mut out, &self);
        merge_rows(self.content, format, &mut out)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ct_core::{points_from_vec, Point};

    fn series(name: &str, xs: &[f64]) -> DataContent<'static> {
        let pts = xs.iter().map(|&x| Point::new(x, x * 10.0)).collect();
        DataContent::new(name, "V", points_from_vec(pts))
    }

    #[test]
    fn empty_bundle_is_header_only() {
        assert_eq!(Data::new("s").dat_file().unwrap(), "#time[s]");
        assert_eq!(Data::new("s").csv_file().unwrap(), "\"time[s]\"");
    }

    #[test]
    fn date_header() {
        let mut d = Data::new("s").with_date_time();
        d.add(series("a", &[]));
        assert_eq!(d.dat_file().unwrap(), "#time is unix date\n#time[s]\ta[V]");
    }

    #[test]
    fn empty_series_leaves_column_blank() {
        let mut d = Data::new("s");
        d.add(series("a", &[0.5, 1.0])).add(series("b", &[]));
        assert_eq!(d.dat_file().unwrap(), "#time[s]\ta[V]\tb[V]\n0.5\t5\t-\n1\t10\t-");
    }

    #[test]
    fn debug_omits_stream() {
        let c = series("a", &[1.0]);
        assert_eq!(format!("{c:?}"), "DataContent { name: \"a\", unit: \"V\", .. }");
    }
}
